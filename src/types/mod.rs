use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ============= Records =============

/// The authenticated account, as returned by `/auth/me` and `/auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend identifier
    pub id: i64,
    /// Login name
    pub username: String,
    /// Contact address (not echoed by every endpoint)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Account creation time
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// A configured Instagram auto-responder profile owned by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chatbot {
    /// Backend identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Instagram business account id
    pub instagram_account_id: String,
    /// Instagram handle without the leading `@`
    #[serde(default)]
    pub instagram_username: Option<String>,
    /// Page access token; the backend does not echo it on reads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Whether the bot answers incoming messages
    pub is_active: bool,
    /// Creation time
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    /// Last modification time
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A trigger-text to response-text mapping scoped to one chatbot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    /// Backend identifier
    pub id: i64,
    /// Owning chatbot
    pub chatbot_id: i64,
    /// Text that triggers the reply
    pub trigger: String,
    /// Reply sent when the trigger matches
    pub response: String,
    /// Disabled rules are kept but never matched
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Creation time
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

// ============= Authentication Types =============

/// Credentials posted to `/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Login name
    pub username: String,
    /// Plain-text password
    pub password: String,
}

/// Payload posted to `/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Login name
    pub username: String,
    /// Contact address
    pub email: String,
    /// Plain-text password
    pub password: String,
}

/// Body of a successful login.
///
/// The token is optional on the wire so that a response without one can be
/// reported as [`AppError::MissingToken`] instead of a decode failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Bearer credential for subsequent calls
    #[serde(default)]
    pub access_token: Option<String>,
    /// Usually `"bearer"`
    #[serde(default)]
    pub token_type: Option<String>,
}

// ============= Chatbot / Keyword Requests =============

/// Body of `POST /chatbots`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewChatbot {
    /// Display name
    pub name: String,
    /// Instagram business account id
    pub instagram_account_id: String,
    /// Handle without the leading `@`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram_username: Option<String>,
    /// Page access token
    pub access_token: String,
}

/// Partial body of `PUT /chatbots/{id}`; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatbotUpdate {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New handle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram_username: Option<String>,
    /// Replacement page access token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Activate or deactivate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ChatbotUpdate {
    /// Update that only flips the active flag.
    pub fn active(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Default::default()
        }
    }
}

/// Body of `POST /keywords`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewKeyword {
    /// Text that triggers the reply
    pub trigger: String,
    /// Reply sent when the trigger matches
    pub response: String,
    /// Owning chatbot
    pub chatbot_id: i64,
}

/// Partial body of `PUT /keywords/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordUpdate {
    /// New trigger
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    /// New response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    /// Enable or disable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

// ============= Error Types =============

/// Error body shape used by the backend (`{"detail": ...}`).
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    /// Flatten `detail` into one message.
    ///
    /// `detail` is either a plain string or a list of validation entries
    /// carrying a `msg` field.
    pub fn message(&self) -> Option<String> {
        match &self.detail {
            serde_json::Value::String(s) => (!s.is_empty()).then(|| s.clone()),
            serde_json::Value::Array(items) => {
                let msgs: Vec<String> = items
                    .iter()
                    .filter_map(|item| match item {
                        serde_json::Value::String(s) => Some(s.clone()),
                        other => other.get("msg").and_then(|m| m.as_str()).map(String::from),
                    })
                    .collect();
                if msgs.is_empty() {
                    None
                } else {
                    Some(msgs.join("; "))
                }
            }
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// Everything the console can fail with.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request never got a response
    #[error("Network error: {0}")]
    Network(String),

    /// 401 or 403
    #[error("Unauthorized ({status}): {}", .detail.as_deref().unwrap_or("invalid or expired credentials"))]
    Unauthorized {
        /// HTTP status
        status: u16,
        /// Backend `detail`, if any
        detail: Option<String>,
    },

    /// Any other non-success status

    #[error("Request failed with status {status}{}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    Api {
        /// HTTP status
        status: u16,
        /// Backend `detail`, if any
        detail: Option<String>,
    },

    /// The response body did not match the expected shape
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// A form failed local validation; nothing was sent
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Login succeeded without an `access_token`
    #[error("No access token received")]
    MissingToken,

    /// Reading or writing the token file failed
    #[error("Token storage error: {0}")]
    Storage(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Prompting on the terminal failed
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// The owning view was unmounted before the request finished
    #[error("Request cancelled")]
    Cancelled,
}

impl AppError {
    /// Map a non-success HTTP status and its optional detail to an error.
    pub fn from_status(status: u16, detail: Option<String>) -> Self {
        match status {
            401 | 403 => AppError::Unauthorized { status, detail },
            _ => AppError::Api { status, detail },
        }
    }

    /// Backend-provided detail message, if the backend sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            AppError::Unauthorized { detail, .. } | AppError::Api { detail, .. } => {
                detail.as_deref()
            }
            AppError::Validation(msg) => Some(msg),
            _ => None,
        }
    }

    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Unauthorized { status, .. } | AppError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The token was rejected (or credentials were wrong).
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, AppError::Unauthorized { .. })
    }

    /// Failures that say nothing about the token: transport errors and 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::Network(_) => true,
            AppError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

/// Result alias over [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;

// ============= Timestamps =============

/// Lenient timestamp parsing.
///
/// The backend serializes naive UTC datetimes (no offset); RFC 3339 values
/// are accepted as well.
pub mod timestamp {
    use super::*;

    /// Parse an RFC 3339 or naive ISO-8601 timestamp, assuming UTC for the latter.
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub(crate) fn deserialize_opt<'de, D>(
        deserializer: D,
    ) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}"))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn test_chatbot_accepts_naive_timestamps() {
        let bot: Chatbot = serde_json::from_value(json!({
            "id": 3,
            "name": "Support",
            "instagram_account_id": "17841400123456789",
            "instagram_username": null,
            "is_active": true,
            "created_at": "2024-05-01T10:15:30.123456",
            "updated_at": "2024-05-02T08:00:00"
        }))
        .expect("should deserialize");

        assert_eq!(bot.created_at.year(), 2024);
        assert_eq!(bot.created_at.hour(), 10);
        assert!(bot.instagram_username.is_none());
        assert!(bot.access_token.is_none());
        assert!(bot.updated_at.is_some());
    }

    #[test]
    fn test_timestamp_rfc3339_is_normalized_to_utc() {
        let ts = timestamp::parse("2024-05-01T12:00:00+02:00").expect("should parse");
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn test_timestamp_rejects_garbage() {
        assert!(timestamp::parse("yesterday").is_none());
    }

    #[test]
    fn test_keyword_defaults_to_active() {
        let kw: Keyword = serde_json::from_value(json!({
            "id": 1,
            "chatbot_id": 7,
            "trigger": "hello",
            "response": "hi there!"
        }))
        .expect("should deserialize");

        assert!(kw.is_active);
        assert!(kw.created_at.is_none());
    }

    #[test]
    fn test_chatbot_update_only_serializes_present_fields() {
        let body = serde_json::to_value(ChatbotUpdate::active(false)).unwrap();
        assert_eq!(body, json!({ "is_active": false }));
    }

    #[test]
    fn test_new_chatbot_omits_missing_username() {
        let body = serde_json::to_value(NewChatbot {
            name: "Bot".into(),
            instagram_account_id: "1".into(),
            instagram_username: None,
            access_token: "tok".into(),
        })
        .unwrap();
        assert!(body.get("instagram_username").is_none());
    }

    #[test]
    fn test_error_body_string_detail() {
        let body: ErrorBody =
            serde_json::from_value(json!({ "detail": "Chatbot not found" })).unwrap();
        assert_eq!(body.message().as_deref(), Some("Chatbot not found"));
    }

    #[test]
    fn test_error_body_validation_list() {
        let body: ErrorBody = serde_json::from_value(json!({
            "detail": [
                { "loc": ["body", "name"], "msg": "field required", "type": "value_error.missing" },
                { "loc": ["body", "access_token"], "msg": "field required", "type": "value_error.missing" }
            ]
        }))
        .unwrap();
        assert_eq!(
            body.message().as_deref(),
            Some("field required; field required")
        );
    }

    #[test]
    fn test_status_mapping() {
        assert!(AppError::from_status(401, None).is_auth_failure());
        assert!(AppError::from_status(403, None).is_auth_failure());
        assert!(!AppError::from_status(404, None).is_auth_failure());
        assert!(AppError::from_status(503, None).is_transient());
        assert!(!AppError::from_status(400, None).is_transient());
        assert!(AppError::Network("refused".into()).is_transient());
    }

    #[test]
    fn test_error_detail_passthrough() {
        let err = AppError::from_status(
            400,
            Some("Chatbot for this Instagram account already exists".into()),
        );
        assert_eq!(
            err.detail(),
            Some("Chatbot for this Instagram account already exists")
        );
        assert_eq!(err.status(), Some(400));
        assert!(AppError::MissingToken.detail().is_none());
    }
}
