use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::config::EmailConfig;
use crate::error::{Error, Result};

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Outbound delivery of transactional email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Development transport: logs the message instead of delivering it.
#[derive(Debug, Default, Clone)]
pub struct LogTransport;

#[async_trait]
impl NotificationTransport for LogTransport {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, message: &EmailMessage) -> Result<()> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "email transport not configured; message logged only"
        );
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct ResendBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Clone)]
pub struct ResendTransport {
    client: Client,
    api_key: String,
    from: String,
}

impl ResendTransport {
    pub fn new(client: Client, api_key: String, from: String) -> Self {
        Self {
            client,
            api_key,
            from,
        }
    }
}

#[async_trait]
impl NotificationTransport for ResendTransport {
    fn name(&self) -> &'static str {
        "resend"
    }

    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let body = ResendBody {
            from: &self.from,
            to: [&message.to],
            subject: &message.subject,
            html: &message.html,
        };
        let resp = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Internal(format!(
                "email provider returned {}: {}",
                status, text
            )));
        }
        Ok(())
    }
}

/// Hands messages to the transport on a detached task.
///
/// Callers never await delivery; the outcome is logged by the task. The
/// returned handle lets tests observe it.
#[derive(Clone)]
pub struct EmailDispatcher {
    transport: Arc<dyn NotificationTransport>,
    admin_email: Option<String>,
}

impl EmailDispatcher {
    pub fn new(transport: Arc<dyn NotificationTransport>, admin_email: Option<String>) -> Self {
        Self {
            transport,
            admin_email,
        }
    }

    pub fn from_config(config: &EmailConfig, client: Client) -> Self {
        let transport: Arc<dyn NotificationTransport> = match &config.resend_api_key {
            Some(key) => Arc::new(ResendTransport::new(client, key.clone(), config.from.clone())),
            None => Arc::new(LogTransport),
        };
        Self::new(transport, config.admin_email.clone())
    }

    pub fn admin_email(&self) -> Option<&str> {
        self.admin_email.as_deref()
    }

    pub fn dispatch(&self, message: EmailMessage) -> JoinHandle<bool> {
        let transport = self.transport.clone();
        tokio::spawn(async move {
            match transport.send(&message).await {
                Ok(()) => {
                    tracing::info!(
                        transport = transport.name(),
                        to = %message.to,
                        subject = %message.subject,
                        "email delivered"
                    );
                    true
                }
                Err(e) => {
                    tracing::warn!(
                        transport = transport.name(),
                        to = %message.to,
                        error = %e,
                        "email delivery failed"
                    );
                    false
                }
            }
        })
    }
}

pub fn verification_email(to: &str, name: &str, code: &str, expire_minutes: i64) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: format!("Verify your Chazas account - Code: {}", code),
        html: format!(
            "<p>Hi {name}!</p>\
             <p>Use this code to confirm your email address:</p>\
             <p style=\"font-size:32px;letter-spacing:10px;font-weight:bold\">{code}</p>\
             <p>The code expires in <strong>{expire_minutes} minutes</strong>.</p>\
             <p>If you did not request it, ignore this message.</p>",
            name = html_escape(name),
            code = code,
            expire_minutes = expire_minutes,
        ),
    }
}

pub fn notification_email(to: &str, title: &str, body: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: format!("[Chazas] {}", title),
        html: format!("<h3>{}</h3><p>{}</p>", html_escape(title), html_escape(body)),
    }
}

pub fn contact_email(
    admin: &str,
    from_email: &str,
    from_name: Option<&str>,
    subject: &str,
    message: &str,
) -> EmailMessage {
    EmailMessage {
        to: admin.to_string(),
        subject: format!("[Chazas Contact] {}", subject),
        html: format!(
            "<p><strong>From:</strong> {} &lt;{}&gt;</p><p>{}</p>",
            html_escape(from_name.unwrap_or("Anonymous")),
            html_escape(from_email),
            html_escape(message),
        ),
    }
}

fn html_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
