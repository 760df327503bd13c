//! Twilio WhatsApp channel.
//!
//! Sends group broadcasts through the Twilio Messages API.
//! Requires: Account SID + Auth Token, a WhatsApp-enabled sending number,
//! and the destination group number.

use async_trait::async_trait;

use gatherbot_core::config::TwilioConfig;
use gatherbot_core::error::{GatherBotError, Result};
use gatherbot_core::traits::Channel;
use gatherbot_core::types::OutgoingMessage;

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Twilio WhatsApp channel implementation.
pub struct TwilioWhatsAppChannel {
    config: TwilioConfig,
    client: reqwest::Client,
    connected: bool,
}

impl TwilioWhatsAppChannel {
    pub fn new(config: TwilioConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            connected: false,
        }
    }

    fn account_url(&self) -> String {
        format!("{TWILIO_API_BASE}/Accounts/{}.json", self.config.account_sid)
    }

    fn messages_url(&self) -> String {
        format!(
            "{TWILIO_API_BASE}/Accounts/{}/Messages.json",
            self.config.account_sid
        )
    }

    /// Send a text message to the configured group number.
    async fn send_text_message(&self, text: &str) -> Result<String> {
        let params = [
            ("To", self.config.group_number.as_str()),
            ("From", self.config.from_number.as_str()),
            ("Body", text),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| GatherBotError::Channel(format!("Twilio API request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(GatherBotError::Channel(format!(
                "Twilio API error {status}: {error_text}"
            )));
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GatherBotError::Channel(format!("Invalid Twilio response: {e}")))?;

        let message_sid = result["sid"].as_str().unwrap_or("unknown").to_string();
        tracing::debug!(
            "WhatsApp message sent: {} → {}",
            message_sid,
            self.config.group_number
        );
        Ok(message_sid)
    }
}

#[async_trait]
impl Channel for TwilioWhatsAppChannel {
    fn name(&self) -> &str {
        "whatsapp"
    }

    async fn connect(&mut self) -> Result<()> {
        if self.config.account_sid.is_empty() || self.config.auth_token.is_empty() {
            return Err(GatherBotError::Config(
                "Twilio account_sid/auth_token not configured".into(),
            ));
        }
        if self.config.from_number.is_empty() || self.config.group_number.is_empty() {
            return Err(GatherBotError::Config(
                "Twilio from_number/group_number not configured".into(),
            ));
        }

        // Verify credentials by fetching the account resource.
        let response = self
            .client
            .get(self.account_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .send()
            .await
            .map_err(|e| GatherBotError::Channel(format!("Twilio verification failed: {e}")))?;

        if response.status().is_success() {
            self.connected = true;
            tracing::info!(
                "Twilio WhatsApp: connected (account={})",
                self.config.account_sid
            );
            Ok(())
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(GatherBotError::AuthFailed(format!(
                "Twilio credential verification failed: {text}"
            )))
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn send(&self, message: OutgoingMessage) -> Result<()> {
        self.send_text_message(&message.content).await?;
        Ok(())
    }
}
