use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, TransactionBehavior};

use crate::db::queries;
use crate::models::{Booking, BookingRequest, BookingStatus, Business, Slot};
use crate::services::scheduling::{has_conflict, is_within_hours, BookingError};

/// A booking that passed the admission checks and was stored, together with
/// the business it belongs to.
#[derive(Debug, Clone)]
pub struct Admission {
    pub booking: Booking,
    pub business: Business,
}

/// Validates `request` and, if every rule passes, stores it as a confirmed
/// booking.
///
/// Lookups, the hours and conflict checks and the insert all run inside one
/// `BEGIN IMMEDIATE` transaction, so two requests racing for overlapping
/// slots of the same business cannot both be admitted.
pub fn admit_booking(
    conn: &mut Connection,
    request: &BookingRequest,
    today: NaiveDate,
) -> Result<Admission, BookingError> {
    let req = request.validate()?;

    if req.date < today {
        return Err(BookingError::PastDate);
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let business = queries::get_business(&tx, req.business_id)?
        .ok_or(BookingError::BusinessNotFound(req.business_id))?;
    let service = queries::get_service(&tx, req.service_id)?
        .filter(|s| s.business_id == business.id)
        .ok_or(BookingError::ServiceNotFound(req.service_id))?;

    if !is_within_hours(
        business.hours.as_ref(),
        req.date,
        req.time,
        service.duration_minutes,
    ) {
        return Err(BookingError::OutsideBusinessHours {
            hours: business
                .hours
                .map(|h| h.to_human_readable())
                .unwrap_or_default(),
        });
    }

    let candidate = Slot::starting_at(req.date.and_time(req.time), service.duration_minutes)
        .ok_or_else(|| {
            BookingError::Invalid(format!(
                "service {} has an unusable duration of {} minutes",
                service.id, service.duration_minutes
            ))
        })?;
    let existing = queries::get_confirmed_bookings_on(&tx, business.id, req.date)?
        .iter()
        .map(|b| {
            b.slot().ok_or_else(|| {
                anyhow::anyhow!(
                    "booking {} has an unusable duration of {} minutes",
                    b.id,
                    b.duration_minutes
                )
            })
        })
        .collect::<anyhow::Result<Vec<Slot>>>()?;

    if has_conflict(&candidate, &existing) {
        return Err(BookingError::Conflict);
    }

    let mut booking = Booking {
        id: 0,
        business_id: business.id,
        service_id: Some(service.id),
        service_name: service.name,
        duration_minutes: service.duration_minutes,
        customer_name: req.customer_name,
        customer_phone: req.customer_phone,
        booking_date: req.date,
        booking_time: req.time,
        status: BookingStatus::Confirmed,
        created_at: Utc::now().naive_utc(),
    };

    booking.id = queries::create_booking(&tx, &booking).map_err(|e| {
        if is_unique_violation(&e) {
            BookingError::Conflict
        } else {
            BookingError::Storage(e)
        }
    })?;
    tx.commit()?;

    tracing::info!(
        booking_id = booking.id,
        business_id = business.id,
        date = %booking.booking_date,
        time = %booking.booking_time.format("%H:%M"),
        "booking admitted"
    );

    Ok(Admission { booking, business })
}

#[derive(Debug, Clone)]
pub struct Cancellation {
    pub booking: Booking,
    /// False when the booking was already cancelled.
    pub changed: bool,
}

/// Marks the booking cancelled. Cancelling an already cancelled booking
/// succeeds and leaves it cancelled.
pub fn cancel_booking(conn: &Connection, booking_id: i64) -> Result<Cancellation, BookingError> {
    let mut booking =
        queries::get_booking(conn, booking_id)?.ok_or(BookingError::BookingNotFound(booking_id))?;
    let changed = booking.status != BookingStatus::Cancelled;

    queries::update_booking_status(conn, booking_id, BookingStatus::Cancelled)?;
    booking.status = BookingStatus::Cancelled;

    tracing::info!(booking_id, changed, "booking cancelled");
    Ok(Cancellation { booking, changed })
}

fn is_unique_violation(e: &anyhow::Error) -> bool {
    matches!(
        e.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(err, _))
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
