//! Share-link tokens, expiry, URLs and the recipient notification.

use crate::models::ShareableLink;
use crate::services::email::{EmailMessage, EmailProvider};
use crate::services::i18n::Translator;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

pub const DEFAULT_EXPIRES_HOURS: u32 = 168;
pub const MAX_EXPIRES_HOURS: u32 = 8760;

/// `{uuid v4}-{base36 millisecond timestamp}`
pub fn generate_token(now: DateTime<Utc>) -> String {
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
    format!("{}-{}", Uuid::new_v4(), to_base36(millis))
}

pub fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(DIGITS[(value % 36) as usize] as char);
        value /= 36;
    }
    digits.iter().rev().collect()
}

pub fn expires_at(created_at: DateTime<Utc>, expires_hours: u32) -> DateTime<Utc> {
    created_at + Duration::hours(i64::from(expires_hours))
}

/// The request's `Origin` wins over the configured base so links point back at
/// the frontend that issued them.
pub fn share_url(origin: Option<&str>, default_base_url: &str, token: &str) -> String {
    let base = origin
        .map(str::trim)
        .filter(|origin| !origin.is_empty() && *origin != "null")
        .unwrap_or(default_base_url);
    format!("{}/share/{}", base.trim_end_matches('/'), token)
}

/// Result of the optional recipient email, reported separately from link creation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NotificationOutcome {
    NotRequested,
    Sent,
    Failed { reason: String },
}

impl NotificationOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationOutcome::NotRequested => "not_requested",
            NotificationOutcome::Sent => "sent",
            NotificationOutcome::Failed { .. } => "failed",
        }
    }
}

pub fn compose_email(
    translator: &Translator,
    locale: &str,
    link: &ShareableLink,
    url: &str,
    recipient: &str,
) -> EmailMessage {
    let name = link
        .recipient_name
        .clone()
        .unwrap_or_else(|| translator.translate(locale, "share.default_recipient").to_string());
    let expires = link.expires_at.format("%Y-%m-%d %H:%M UTC").to_string();

    let mut lines = vec![
        translator.format(locale, "share.email_greeting", &[("name", name.as_str())]),
        String::new(),
        translator.format(locale, "share.email_body", &[("url", url)]),
    ];
    if let Some(purpose) = &link.purpose {
        lines.push(translator.format(
            locale,
            "share.email_purpose",
            &[("purpose", purpose.as_str())],
        ));
    }
    lines.push(translator.format(locale, "share.email_expiry", &[("expires", expires.as_str())]));

    EmailMessage {
        to: recipient.to_string(),
        subject: translator.translate(locale, "share.email_subject").to_string(),
        body_text: lines.join("\n"),
        body_html: None,
    }
}

/// Best-effort send; a failure is logged and reported, never propagated.
pub async fn notify_recipient(
    provider: &dyn EmailProvider,
    message: &EmailMessage,
    link_id: &str,
) -> NotificationOutcome {
    match provider.send(message).await {
        Ok(_) => NotificationOutcome::Sent,
        Err(e) => {
            tracing::warn!(
                link_id = %link_id,
                to = %message.to,
                error = %e,
                "Share link created but notification email failed"
            );
            NotificationOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}
