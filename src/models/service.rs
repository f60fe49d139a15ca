use serde::{Deserialize, Serialize};

/// Bookings never span more than one day.
pub const MAX_DURATION_MINUTES: i64 = 24 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub business_id: i64,
    pub name: String,
    #[serde(rename = "duration")]
    pub duration_minutes: i64,
    pub price: f64,
}

/// Editable fields of a service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceFields {
    pub name: String,
    #[serde(rename = "duration")]
    pub duration_minutes: i64,
    pub price: f64,
}

impl ServiceFields {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("service name is required".to_string());
        }
        if self.duration_minutes <= 0 {
            return Err("duration must be a positive number of minutes".to_string());
        }
        if self.duration_minutes > MAX_DURATION_MINUTES {
            return Err(format!("duration must be at most {MAX_DURATION_MINUTES} minutes"));
        }
        if self.price.is_nan() || self.price < 0.0 {
            return Err("price must not be negative".to_string());
        }
        Ok(())
    }
}
