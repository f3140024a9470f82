//! Minimal Telegram Bot API client.
//!
//! Only the three methods the bot needs: `getMe` to learn its own username,
//! `getUpdates` for long polling and `sendMessage` for replies. Replies go
//! back into the same forum thread when the command came from one.

use anyhow::{anyhow, Result};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;

use crate::config::{SecretsConfig, TelegramConfig};

/// Envelope every Bot API method answers with.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(default = "Option::default")]
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_result(self, method: &str) -> Result<T> {
        if !self.ok {
            return Err(anyhow!(
                "{} failed: {}",
                method,
                self.description.unwrap_or_else(|| "no description".to_string())
            ));
        }
        self.result
            .ok_or_else(|| anyhow!("{} returned ok without a result", method))
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub message_thread_id: Option<i64>,
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Serialize)]
struct GetUpdatesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: [&'static str; 1],
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message_thread_id: Option<i64>,
}

/// Bot API client bound to one bot token.
pub struct TelegramClient {
    client: reqwest::Client,
    api_base: String,
    token: String,
    poll_timeout: Duration,
    request_timeout: Duration,
}

impl TelegramClient {
    pub fn new(telegram: &TelegramConfig, secrets: &SecretsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: telegram.api_base.trim_end_matches('/').to_string(),
            token: secrets.token.clone(),
            poll_timeout: Duration::from_secs(telegram.poll_timeout_seconds),
            request_timeout: Duration::from_secs(telegram.request_timeout_seconds),
        }
    }

    /// Method URL. Contains the token, so never log it.
    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: for<'de> Deserialize<'de>,
    {
        trace!("calling {}", method);
        let request = self.client.post(self.method_url(method)).json(body).send();
        let response = timeout(self.request_timeout, request)
            .await
            .map_err(|_| anyhow!("{} timed out after {:?}", method, self.request_timeout))?
            .map_err(|e| anyhow!("{} request failed: {}", method, e.without_url()))?;

        let status = response.status();
        let parsed: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| anyhow!("{} returned unreadable JSON ({}): {}", method, status, e.without_url()))?;
        parsed.into_result(method)
    }

    /// The bot's own account, used to filter `/cmd@OtherBot` commands.
    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Long-poll for new messages after `offset`.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>> {
        let body = GetUpdatesRequest {
            offset,
            timeout: self.poll_timeout.as_secs(),
            allowed_updates: ["message"],
        };
        let updates: Vec<Update> = self.call("getUpdates", &body).await?;
        if !updates.is_empty() {
            debug!("received {} update(s)", updates.len());
        }
        Ok(updates)
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        message_thread_id: Option<i64>,
    ) -> Result<()> {
        let body = SendMessageRequest {
            chat_id,
            text,
            message_thread_id,
        };
        let _sent: Message = self.call("sendMessage", &body).await?;
        Ok(())
    }
}
