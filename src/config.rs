use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    /// Bearer token for the super-admin API.
    pub admin_token: String,
    pub ultramsg_instance_id: String,
    pub ultramsg_token: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "booking.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            ultramsg_instance_id: env::var("ULTRAMSG_INSTANCE_ID").unwrap_or_default(),
            ultramsg_token: env::var("ULTRAMSG_TOKEN").unwrap_or_default(),
        }
    }

    pub fn messaging_configured(&self) -> bool {
        !(self.ultramsg_instance_id.trim().is_empty() || self.ultramsg_token.trim().is_empty())
    }
}
