use anyhow::Context;
use async_trait::async_trait;

use super::MessagingProvider;

/// WhatsApp delivery through the UltraMsg chat API.
pub struct UltraMsgProvider {
    instance_id: String,
    token: String,
    base_url: String,
    client: reqwest::Client,
}

impl UltraMsgProvider {
    pub fn new(instance_id: String, token: String) -> Self {
        Self::with_base_url(instance_id, token, "https://api.ultramsg.com".to_string())
    }

    pub fn with_base_url(instance_id: String, token: String, base_url: String) -> Self {
        Self {
            instance_id,
            token,
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}/messages/chat",
            self.base_url.trim_end_matches('/'),
            self.instance_id
        )
    }
}

#[async_trait]
impl MessagingProvider for UltraMsgProvider {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()> {
        self.client
            .post(self.endpoint())
            .form(&[("token", self.token.as_str()), ("to", to), ("body", body)])
            .send()
            .await
            .context("failed to send UltraMsg message")?
            .error_for_status()
            .context("UltraMsg API returned error")?;

        Ok(())
    }
}
