use chrono::{NaiveDate, NaiveTime};

use crate::models::{OperatingHours, Slot};

/// Why a booking was not admitted. The `Display` text is safe to show to the
/// customer as-is.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("{0}")]
    Invalid(String),

    #[error("business {0} not found")]
    BusinessNotFound(i64),

    #[error("service {0} not found")]
    ServiceNotFound(i64),

    #[error("booking {0} not found")]
    BookingNotFound(i64),

    #[error("Bookings cannot be made for a date in the past.")]
    PastDate,

    #[error("That time is outside our business hours. We're open {hours}.")]
    OutsideBusinessHours { hours: String },

    #[error("Sorry, that time slot is already taken. Could you pick a different time?")]
    Conflict,

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for BookingError {
    fn from(e: rusqlite::Error) -> Self {
        BookingError::Storage(e.into())
    }
}

/// Whether `[date+start, date+start+duration)` fits the business's window.
/// A business without configured hours is open all day.
pub fn is_within_hours(
    hours: Option<&OperatingHours>,
    date: NaiveDate,
    start: NaiveTime,
    duration_minutes: i64,
) -> bool {
    match hours {
        Some(h) => h.contains(date, start, duration_minutes),
        None => true,
    }
}

/// Whether `candidate` overlaps any of the `existing` slots.
pub fn has_conflict<'a, I>(candidate: &Slot, existing: I) -> bool
where
    I: IntoIterator<Item = &'a Slot>,
{
    existing.into_iter().any(|slot| slot.overlaps(candidate))
}
