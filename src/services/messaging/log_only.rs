use async_trait::async_trait;

use super::MessagingProvider;

/// Stand-in used when no messaging credentials are configured: messages are
/// written to the log instead of being delivered.
pub struct LogOnlyProvider;

#[async_trait]
impl MessagingProvider for LogOnlyProvider {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()> {
        tracing::info!(to = %to, body = %body, "simulated message delivery");
        Ok(())
    }
}
