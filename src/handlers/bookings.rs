use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::Local;
use serde::Serialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::BookingRequest;
use crate::services::booking;
use crate::services::notifications;
use crate::services::scheduling::BookingError;
use crate::state::AppState;

// POST /book-appointment/
pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BookingRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let today = Local::now().date_naive();

    let result = {
        let mut db = state.db();
        booking::admit_booking(&mut db, &body, today)
    };

    let admission = match result {
        Ok(a) => a,
        Err(e) => {
            if !matches!(e, BookingError::Storage(_)) {
                tracing::info!(
                    business_id = body.business_id,
                    date = %body.booking_date,
                    time = %body.booking_time,
                    reason = %e,
                    "booking rejected"
                );
            }
            return Err(e.into());
        }
    };

    notifications::dispatch(
        state.messaging.clone(),
        notifications::booking_confirmed_messages(&admission.business, &admission.booking),
    );

    Ok(Json(serde_json::json!({
        "status": "success",
        "booking_id": admission.booking.id,
    })))
}

// GET /business/:id/bookings
#[derive(Serialize)]
pub struct BookingResponse {
    id: i64,
    customer_name: String,
    customer_phone: String,
    booking_date: String,
    booking_time: String,
    duration_minutes: i64,
    status: String,
    service_id: Option<i64>,
    service_name: String,
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Path(business_id): Path<i64>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let bookings = {
        let db = state.db();
        if queries::get_business(&db, business_id)?.is_none() {
            return Err(AppError::NotFound(format!("business {business_id}")));
        }
        queries::get_bookings_for_business(&db, business_id)?
    };

    let response = bookings
        .into_iter()
        .map(|b| BookingResponse {
            id: b.id,
            customer_name: b.customer_name,
            customer_phone: b.customer_phone,
            booking_date: b.booking_date.format("%Y-%m-%d").to_string(),
            booking_time: b.booking_time.format("%H:%M").to_string(),
            duration_minutes: b.duration_minutes,
            status: b.status.as_str().to_string(),
            service_id: b.service_id,
            service_name: b.service_name,
        })
        .collect();

    Ok(Json(response))
}

// POST /bookings/:id/cancel
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let cancellation = {
        let db = state.db();
        booking::cancel_booking(&db, id)?
    };

    if cancellation.changed {
        notifications::dispatch(
            state.messaging.clone(),
            notifications::booking_cancelled_messages(&cancellation.booking),
        );
    }

    Ok(Json(serde_json::json!({ "message": "Cancelled" })))
}
