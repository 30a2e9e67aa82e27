//! Typed notification messages and their canonical string-to-sign.
//!
//! Raw payloads arrive as a flat map of string keys. [`Message::from_fields`]
//! dispatches on the `Type` discriminator, enforces the per-variant required
//! keys, and produces an immutable message. Each variant defines its own
//! canonicalization: the exact byte string the provider signed, which
//! signature verification must reproduce bit-exact.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MessageError;

/// Keys every message variant must carry.
const COMMON_REQUIRED_KEYS: &[&str] = &[
    "Message",
    "MessageId",
    "Timestamp",
    "TopicArn",
    "Type",
    "Signature",
    "SigningCertURL",
];

/// Additional keys required by subscription confirmations.
const CONFIRMATION_REQUIRED_KEYS: &[&str] = &[
    "Message",
    "MessageId",
    "Timestamp",
    "TopicArn",
    "Type",
    "Signature",
    "SigningCertURL",
    "SubscribeURL",
    "Token",
];

// ---------------------------------------------------------------------------
// MessageKind — closed set of message discriminators
// ---------------------------------------------------------------------------

/// The closed set of notification message kinds.
///
/// Exhaustive (no `#[non_exhaustive]`) so a new wire discriminator forces
/// compile-time review of every match site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    Notification,
    SubscriptionConfirmation,
}

impl MessageKind {
    /// Resolve a `Type` discriminator string to a message kind.
    pub fn from_discriminator(value: &str) -> Option<Self> {
        match value {
            "Notification" => Some(MessageKind::Notification),
            "SubscriptionConfirmation" => Some(MessageKind::SubscriptionConfirmation),
            _ => None,
        }
    }

    /// The wire value of the `Type` field for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Notification => "Notification",
            MessageKind::SubscriptionConfirmation => "SubscriptionConfirmation",
        }
    }

    /// Keys that must be present in the raw payload for this kind.
    pub fn required_keys(self) -> &'static [&'static str] {
        match self {
            MessageKind::Notification => COMMON_REQUIRED_KEYS,
            MessageKind::SubscriptionConfirmation => CONFIRMATION_REQUIRED_KEYS,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Message variants
// ---------------------------------------------------------------------------

/// A delivered notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub(crate) message_id: String,
    pub(crate) timestamp: String,
    pub(crate) topic_arn: String,
    pub(crate) message: String,
    pub(crate) subject: Option<String>,
    pub(crate) signature: String,
    pub(crate) signing_cert_url: String,
    pub(crate) signature_version: String,
}

/// A subscription confirmation challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionConfirmationMessage {
    pub(crate) message_id: String,
    pub(crate) timestamp: String,
    pub(crate) topic_arn: String,
    pub(crate) message: String,
    pub(crate) subscribe_url: String,
    pub(crate) token: String,
    pub(crate) signature: String,
    pub(crate) signing_cert_url: String,
    pub(crate) signature_version: String,
}

/// An immutable, validated notification message.
///
/// Constructed once from a fully-populated field set via [`Message::from_fields`]
/// or [`Message::from_json`]; all accessors are total afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    Notification(NotificationMessage),
    SubscriptionConfirmation(SubscriptionConfirmationMessage),
}

impl Message {
    /// Construct a message from a flat map of raw payload fields.
    ///
    /// Fails with [`MessageError::InvalidInput`] if the `Type` discriminator
    /// is missing or unrecognized, or if any key required by the resolved
    /// variant is absent. On success the message carries exactly the
    /// validated fields.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, MessageError> {
        let discriminator = fields.get("Type").ok_or_else(|| {
            MessageError::InvalidInput("the \"Type\" key is required".to_string())
        })?;

        let kind = MessageKind::from_discriminator(discriminator).ok_or_else(|| {
            MessageError::InvalidInput(format!(
                "the \"Type\" key has unrecognized value \"{discriminator}\""
            ))
        })?;

        for key in kind.required_keys() {
            if !fields.contains_key(*key) {
                return Err(MessageError::InvalidInput(format!(
                    "the \"{key}\" key is required for {kind} messages"
                )));
            }
        }

        // Absent defaults to version 1 per the provider contract.
        let signature_version = fields
            .get("SignatureVersion")
            .cloned()
            .unwrap_or_else(|| "1".to_string());

        let require = |key: &str| -> String {
            // Presence was checked above against the required-key list.
            fields.get(key).cloned().unwrap_or_default()
        };

        Ok(match kind {
            MessageKind::Notification => Message::Notification(NotificationMessage {
                message_id: require("MessageId"),
                timestamp: require("Timestamp"),
                topic_arn: require("TopicArn"),
                message: require("Message"),
                subject: fields.get("Subject").cloned(),
                signature: require("Signature"),
                signing_cert_url: require("SigningCertURL"),
                signature_version,
            }),
            MessageKind::SubscriptionConfirmation => {
                Message::SubscriptionConfirmation(SubscriptionConfirmationMessage {
                    message_id: require("MessageId"),
                    timestamp: require("Timestamp"),
                    topic_arn: require("TopicArn"),
                    message: require("Message"),
                    subscribe_url: require("SubscribeURL"),
                    token: require("Token"),
                    signature: require("Signature"),
                    signing_cert_url: require("SigningCertURL"),
                    signature_version,
                })
            }
        })
    }

    /// Construct a message from a raw JSON POST body.
    ///
    /// The provider delivers notifications as a flat JSON object of string
    /// values; anything else is rejected as invalid input.
    pub fn from_json(body: &str) -> Result<Self, MessageError> {
        let value: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| MessageError::InvalidInput(format!("payload is not valid JSON: {e}")))?;

        let object = value.as_object().ok_or_else(|| {
            MessageError::InvalidInput("payload is not a JSON object".to_string())
        })?;

        let mut fields = HashMap::with_capacity(object.len());
        for (key, value) in object {
            if let Some(s) = value.as_str() {
                fields.insert(key.clone(), s.to_string());
            }
        }

        Self::from_fields(&fields)
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Notification(_) => MessageKind::Notification,
            Message::SubscriptionConfirmation(_) => MessageKind::SubscriptionConfirmation,
        }
    }

    pub fn message_id(&self) -> &str {
        match self {
            Message::Notification(m) => &m.message_id,
            Message::SubscriptionConfirmation(m) => &m.message_id,
        }
    }

    /// The `Timestamp` field as delivered (ISO-8601 string).
    pub fn timestamp(&self) -> &str {
        match self {
            Message::Notification(m) => &m.timestamp,
            Message::SubscriptionConfirmation(m) => &m.timestamp,
        }
    }

    /// Parse the delivery timestamp as UTC.
    pub fn timestamp_utc(&self) -> Result<DateTime<Utc>, MessageError> {
        DateTime::parse_from_rfc3339(self.timestamp())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                MessageError::InvalidInput(format!(
                    "the \"Timestamp\" key is not a valid ISO-8601 timestamp: {e}"
                ))
            })
    }

    pub fn topic_arn(&self) -> &str {
        match self {
            Message::Notification(m) => &m.topic_arn,
            Message::SubscriptionConfirmation(m) => &m.topic_arn,
        }
    }

    /// The payload body of the notification.
    pub fn message(&self) -> &str {
        match self {
            Message::Notification(m) => &m.message,
            Message::SubscriptionConfirmation(m) => &m.message,
        }
    }

    /// The base64-encoded signature over [`Message::string_to_sign`].
    pub fn signature(&self) -> &str {
        match self {
            Message::Notification(m) => &m.signature,
            Message::SubscriptionConfirmation(m) => &m.signature,
        }
    }

    pub fn signing_cert_url(&self) -> &str {
        match self {
            Message::Notification(m) => &m.signing_cert_url,
            Message::SubscriptionConfirmation(m) => &m.signing_cert_url,
        }
    }

    /// The `SignatureVersion` field ("1" = SHA-1 with RSA, "2" = SHA-256
    /// with RSA). Defaults to "1" when the payload omits it.
    pub fn signature_version(&self) -> &str {
        match self {
            Message::Notification(m) => &m.signature_version,
            Message::SubscriptionConfirmation(m) => &m.signature_version,
        }
    }

    /// The optional `Subject` of a notification; `None` for other variants.
    pub fn subject(&self) -> Option<&str> {
        match self {
            Message::Notification(m) => m.subject.as_deref(),
            Message::SubscriptionConfirmation(_) => None,
        }
    }

    /// The confirmation `SubscribeURL`; `None` for other variants.
    pub fn subscribe_url(&self) -> Option<&str> {
        match self {
            Message::Notification(_) => None,
            Message::SubscriptionConfirmation(m) => Some(&m.subscribe_url),
        }
    }

    /// The confirmation `Token`; `None` for other variants.
    pub fn token(&self) -> Option<&str> {
        match self {
            Message::Notification(_) => None,
            Message::SubscriptionConfirmation(m) => Some(&m.token),
        }
    }

    /// Produce the canonical string the provider signed.
    ///
    /// The format is newline-terminated `Key\nValue\n` pairs with the keys in
    /// a fixed alphabetical order. The field selection and order are part of
    /// the provider's wire contract: any deviation makes signature
    /// verification fail with no other signal.
    ///
    /// Notification messages include `Subject` only when it was present in
    /// the payload.
    pub fn string_to_sign(&self) -> String {
        let mut pairs: Vec<(&str, &str)> = Vec::with_capacity(7);
        match self {
            Message::Notification(m) => {
                pairs.push(("Message", m.message.as_str()));
                pairs.push(("MessageId", m.message_id.as_str()));
                if let Some(subject) = &m.subject {
                    pairs.push(("Subject", subject.as_str()));
                }
                pairs.push(("Timestamp", m.timestamp.as_str()));
                pairs.push(("TopicArn", m.topic_arn.as_str()));
                pairs.push(("Type", MessageKind::Notification.as_str()));
            }
            Message::SubscriptionConfirmation(m) => {
                pairs.push(("Message", m.message.as_str()));
                pairs.push(("MessageId", m.message_id.as_str()));
                pairs.push(("SubscribeURL", m.subscribe_url.as_str()));
                pairs.push(("Timestamp", m.timestamp.as_str()));
                pairs.push(("Token", m.token.as_str()));
                pairs.push(("TopicArn", m.topic_arn.as_str()));
                pairs.push(("Type", MessageKind::SubscriptionConfirmation.as_str()));
            }
        }

        let mut out = String::new();
        for (key, value) in pairs {
            out.push_str(key);
            out.push('\n');
            out.push_str(value);
            out.push('\n');
        }
        out
    }
}
