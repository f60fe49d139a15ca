use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::hours::parse_time;
use super::Slot;
use crate::services::scheduling::BookingError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub business_id: i64,
    /// Cleared when the service is deleted; `service_name` keeps the label.
    pub service_id: Option<i64>,
    pub service_name: String,
    /// Service duration captured at admission time.
    pub duration_minutes: i64,
    pub customer_name: String,
    pub customer_phone: String,
    pub booking_date: NaiveDate,
    #[serde(with = "crate::models::hours::hhmm")]
    pub booking_time: NaiveTime,
    pub status: BookingStatus,
    pub created_at: NaiveDateTime,
}

impl Booking {
    /// `None` if the stored duration runs past the representable calendar.
    pub fn slot(&self) -> Option<Slot> {
        Slot::starting_at(
            self.booking_date.and_time(self.booking_time),
            self.duration_minutes,
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

/// Inbound booking request, as submitted by a customer.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub business_id: i64,
    pub service_id: i64,
    pub customer_name: String,
    pub customer_phone: String,
    pub booking_date: String,
    pub booking_time: String,
}

/// A `BookingRequest` whose fields passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidBookingRequest {
    pub business_id: i64,
    pub service_id: i64,
    pub customer_name: String,
    pub customer_phone: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl BookingRequest {
    pub fn validate(&self) -> Result<ValidBookingRequest, BookingError> {
        let customer_name = self.customer_name.trim();
        if customer_name.is_empty() {
            return Err(BookingError::Invalid("customer name is required".to_string()));
        }
        let customer_phone = self.customer_phone.trim();
        if customer_phone.is_empty() {
            return Err(BookingError::Invalid("customer phone is required".to_string()));
        }

        let date = NaiveDate::parse_from_str(self.booking_date.trim(), DATE_FORMAT).map_err(|_| {
            BookingError::Invalid(format!(
                "invalid date: {} (expected YYYY-MM-DD)",
                self.booking_date
            ))
        })?;
        let time = parse_time(&self.booking_time)
            .map_err(|e| BookingError::Invalid(e.to_string()))?;

        Ok(ValidBookingRequest {
            business_id: self.business_id,
            service_id: self.service_id,
            customer_name: customer_name.to_string(),
            customer_phone: customer_phone.to_string(),
            date,
            time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(date: &str, time: &str) -> BookingRequest {
        BookingRequest {
            business_id: 1,
            service_id: 2,
            customer_name: " Alice ".to_string(),
            customer_phone: "+15551110000".to_string(),
            booking_date: date.to_string(),
            booking_time: time.to_string(),
        }
    }

    #[test]
    fn test_validate_parses_date_and_time() {
        let valid = request("2030-06-16", "14:30").validate().unwrap();
        assert_eq!(valid.date, NaiveDate::from_ymd_opt(2030, 6, 16).unwrap());
        assert_eq!(valid.time, NaiveTime::from_hms_opt(14, 30, 0).unwrap());
        assert_eq!(valid.customer_name, "Alice");
    }

    #[test]
    fn test_validate_rejects_malformed_date() {
        for bad in ["16/06/2030", "2030-13-01", "2030-02-30", "tomorrow", ""] {
            let err = request(bad, "10:00").validate().unwrap_err();
            assert!(matches!(err, BookingError::Invalid(_)), "{bad}");
        }
    }

    #[test]
    fn test_validate_rejects_malformed_time() {
        for bad in ["24:00", "10:60", "10", "10:00pm", ""] {
            let err = request("2030-06-16", bad).validate().unwrap_err();
            assert!(matches!(err, BookingError::Invalid(_)), "{bad}");
        }
    }

    #[test]
    fn test_validate_requires_customer() {
        let mut req = request("2030-06-16", "10:00");
        req.customer_name = "   ".to_string();
        assert!(matches!(req.validate(), Err(BookingError::Invalid(_))));
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(BookingStatus::parse("cancelled"), Some(BookingStatus::Cancelled));
        assert_eq!(
            BookingStatus::parse(BookingStatus::Confirmed.as_str()),
            Some(BookingStatus::Confirmed)
        );
        assert_eq!(BookingStatus::parse("pending"), None);
        assert_eq!(BookingStatus::parse(""), None);
    }
}
