use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::models::{Booking, Business};
use crate::services::messaging::MessagingProvider;

pub fn booking_confirmed_messages(business: &Business, booking: &Booking) -> Vec<(String, String)> {
    let when = format!(
        "{} at {}",
        booking.booking_date.format("%Y-%m-%d"),
        booking.booking_time.format("%H:%M")
    );
    vec![
        (
            business.owner_phone.clone(),
            format!(
                "New booking: {} ({}) for {}, {}",
                booking.customer_name, booking.customer_phone, booking.service_name, when
            ),
        ),
        (
            booking.customer_phone.clone(),
            format!(
                "Your booking at {} is confirmed: {}, {}.",
                business.name, booking.service_name, when
            ),
        ),
    ]
}

pub fn booking_cancelled_messages(booking: &Booking) -> Vec<(String, String)> {
    vec![(
        booking.customer_phone.clone(),
        format!(
            "Your booking for {} on {} at {} has been cancelled.",
            booking.service_name,
            booking.booking_date.format("%Y-%m-%d"),
            booking.booking_time.format("%H:%M")
        ),
    )]
}

/// Delivers `messages` in the background. Failures are logged and never
/// reach the caller.
pub fn dispatch(
    messaging: Arc<dyn MessagingProvider>,
    messages: Vec<(String, String)>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        for (to, body) in messages {
            if to.trim().is_empty() {
                tracing::warn!("notification recipient missing, skipping");
                continue;
            }
            if let Err(e) = messaging.send_message(&to, &body).await {
                tracing::error!(error = %e, to = %to, "failed to deliver notification");
            }
        }
    })
}
