use serde::{Deserialize, Serialize};

/// Opaque session bundle issued by the identity provider. The flow only
/// cares about present/absent; the two accessors below read just enough to
/// talk to the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session(pub serde_json::Value);

impl Session {
    /// Bearer token for provider calls that require one (sign-out).
    pub fn access_token(&self) -> Option<&str> {
        self.0.get("access_token").and_then(|v| v.as_str())
    }

    /// The authenticated user object embedded in the session, if present.
    pub fn user(&self) -> Option<&serde_json::Value> {
        self.0.get("user")
    }
}

/// UI phase of the sign-in flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    /// Choosing between sign-in methods.
    ModeSelect,
    /// Email form shown, no code requested yet.
    EmailEntry,
    /// A code has been sent; waiting for the user to type it.
    CodeEntry,
}

/// Body of a successful verifier response. Fields are optional because the
/// service emits a different subset per outcome.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub is_new_user: Option<bool>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub session: Option<Session>,
    #[serde(default)]
    pub no_session_yet: Option<bool>,
}
