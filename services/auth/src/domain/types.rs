use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// One-time passcode issued to an email address.
#[derive(Debug, Clone)]
pub struct OtpCode {
    pub id: Uuid,
    /// Normalized (trimmed, lower-cased) before storage.
    pub email: String,
    pub code: String,
    pub used: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Account record held by the external identity provider. Queried per
/// request and never cached locally; the provider is the system of record.
#[derive(Debug, Clone)]
pub struct IdentityUser {
    pub id: Uuid,
    pub email: String,
}

/// Opaque session bundle minted by the identity provider and forwarded to
/// the client verbatim. This service never reads past present/absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session(pub serde_json::Value);

/// Short-lived sign-in link minted by the identity provider's admin API.
#[derive(Debug, Clone)]
pub struct SignInLink {
    pub action_link: String,
}

impl SignInLink {
    /// Extract the embedded one-time token and its type from the action
    /// link's query string. `None` when the provider returned a link
    /// without them — callers treat that the same as a failed redemption.
    pub fn token(&self) -> Option<(String, String)> {
        let url = Url::parse(&self.action_link).ok()?;
        let mut token = None;
        let mut token_type = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "token" => token = Some(value.into_owned()),
                "type" => token_type = Some(value.into_owned()),
                _ => {}
            }
        }
        Some((token?, token_type?))
    }
}

/// OTP validity window in seconds.
pub const OTP_TTL_SECS: i64 = 600;
