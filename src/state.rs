use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::services::messaging::MessagingProvider;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub messaging: Arc<dyn MessagingProvider>,
}

impl AppState {
    /// Locks the shared connection for the duration of one request step.
    pub fn db(&self) -> MutexGuard<'_, Connection> {
        // A panic while holding the lock leaves the connection usable; any
        // open transaction was rolled back when it was dropped.
        self.db.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
