use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Auth service error variants. Display strings double as the client-facing
/// `error` message, so upstream detail stays in the source chain only.
/// Wrong and expired codes share one variant on purpose — callers must not
/// be able to tell which occurred.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("email is required")]
    EmailRequired,
    #[error("email and code are required")]
    MissingCredentials,
    #[error("invalid or expired verification code")]
    InvalidCode,
    #[error("failed to generate verification code")]
    CodeStore(#[source] anyhow::Error),
    #[error("failed to send verification email")]
    EmailDelivery(#[source] anyhow::Error),
    #[error("failed to sign in")]
    SignIn(#[source] anyhow::Error),
    #[error("failed to create account")]
    AccountCreate(#[source] anyhow::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmailRequired => "EMAIL_REQUIRED",
            Self::MissingCredentials => "MISSING_CREDENTIALS",
            Self::InvalidCode => "INVALID_CODE",
            Self::CodeStore(_) => "CODE_STORE",
            Self::EmailDelivery(_) => "EMAIL_DELIVERY",
            Self::SignIn(_) => "SIGN_IN",
            Self::AccountCreate(_) => "ACCOUNT_CREATE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::EmailRequired | Self::MissingCredentials | Self::InvalidCode => {
                StatusCode::BAD_REQUEST
            }
            Self::CodeStore(_)
            | Self::EmailDelivery(_)
            | Self::SignIn(_)
            | Self::AccountCreate(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        // 4xx are expected client outcomes and already recorded by the
        // TraceLayer; only 5xx carry an upstream source chain worth logging.
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = ?self, "request failed");
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
