use anyhow::{Context as _, anyhow};
use serde::Deserialize;
use serde_json::json;

use crate::error::AuthClientError;
use crate::flow::{AuthApi, SessionGateway};
use crate::types::{Session, VerifyResponse};

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Convert a non-success auth-service response into an error, preferring
/// the message in its `{"error": ...}` body.
async fn rejection(response: reqwest::Response) -> AuthClientError {
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(ErrorBody {
            error: Some(message),
        }) => AuthClientError::Rejected(message),
        _ => AuthClientError::Transport(anyhow!("auth service returned {status}")),
    }
}

// ── HttpAuthApi ──────────────────────────────────────────────────────────────

/// reqwest-backed `AuthApi` against the auth service.
#[derive(Clone)]
pub struct HttpAuthApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl AuthApi for HttpAuthApi {
    async fn send_code(&self, email: &str) -> Result<(), AuthClientError> {
        let response = self
            .http
            .post(self.endpoint("auth/otp"))
            .json(&json!({ "email": email }))
            .send()
            .await
            .context("send otp request")?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        Ok(())
    }

    async fn verify_code(
        &self,
        email: &str,
        code: &str,
        full_name: Option<&str>,
    ) -> Result<VerifyResponse, AuthClientError> {
        let response = self
            .http
            .post(self.endpoint("auth/otp/verify"))
            .json(&json!({ "email": email, "code": code, "fullName": full_name }))
            .send()
            .await
            .context("verify otp request")?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        let body = response
            .json::<VerifyResponse>()
            .await
            .context("decode verify response")?;
        Ok(body)
    }
}

// ── HttpSessionGateway ───────────────────────────────────────────────────────

/// reqwest-backed `SessionGateway` over the identity provider's public API.
/// Holds the publishable (anon) key — never the service-role key.
#[derive(Clone)]
pub struct HttpSessionGateway {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    /// Refresh token persisted from a previous run, used to restore the
    /// ambient session on startup. Absent on first launch.
    refresh_token: Option<String>,
}

impl HttpSessionGateway {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            refresh_token: None,
        }
    }

    pub fn with_refresh_token(mut self, token: impl Into<String>) -> Self {
        self.refresh_token = Some(token.into());
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl SessionGateway for HttpSessionGateway {
    async fn fetch_session(&self) -> Result<Option<Session>, AuthClientError> {
        let Some(refresh_token) = self.refresh_token.as_deref() else {
            return Ok(None);
        };
        let response = self
            .http
            .post(self.endpoint("token"))
            .query(&[("grant_type", "refresh_token")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .context("refresh session")?;

        // A stale or revoked refresh token simply means no ambient session.
        if !response.status().is_success() {
            return Ok(None);
        }
        let session: serde_json::Value = response.json().await.context("decode session")?;
        Ok(Some(Session(session)))
    }

    async fn request_sign_in_link(&self, email: &str) -> Result<(), AuthClientError> {
        let response = self
            .http
            .post(self.endpoint("otp"))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "create_user": false }))
            .send()
            .await
            .context("request sign-in link")?;

        if !response.status().is_success() {
            return Err(AuthClientError::Transport(anyhow!(
                "identity provider returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn sign_out(&self, session: &Session) -> Result<(), AuthClientError> {
        let Some(token) = session.access_token() else {
            return Ok(());
        };
        let response = self
            .http
            .post(self.endpoint("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .context("sign out")?;

        // 401 means the session is already gone server-side.
        if !response.status().is_success()
            && response.status() != reqwest::StatusCode::UNAUTHORIZED
        {
            return Err(AuthClientError::Transport(anyhow!(
                "identity provider returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}
