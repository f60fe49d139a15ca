use serde::{Deserialize, Serialize};

use super::OperatingHours;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Business {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub owner_phone: String,
    #[serde(skip_serializing)]
    pub password: String,
    /// `None` means the business never configured hours: the whole day is bookable.
    pub hours: Option<OperatingHours>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBusiness {
    pub name: String,
    pub slug: String,
    pub owner_phone: String,
    pub password: String,
    pub hours: Option<OperatingHours>,
}

impl NewBusiness {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("business name is required".to_string());
        }
        if !is_valid_slug(&self.slug) {
            return Err(format!(
                "invalid slug: {} (use lowercase letters, digits and '-')",
                self.slug
            ));
        }
        if self.owner_phone.trim().is_empty() {
            return Err("owner phone is required".to_string());
        }
        if self.password.is_empty() {
            return Err("password is required".to_string());
        }
        Ok(())
    }
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
