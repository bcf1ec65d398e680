use anyhow::{Context as _, anyhow};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::domain::repository::{CreateUserOutcome, IdentityProvider};
use crate::domain::types::{IdentityUser, Session, SignInLink};
use crate::error::AuthServiceError;

/// HTTP client for the identity provider's administrative API. Every call
/// authenticates with the service-role key; this type must never be
/// constructed with a client-side key.
#[derive(Clone)]
pub struct HttpIdentityProvider {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

#[derive(Deserialize)]
struct UserPayload {
    id: Uuid,
    email: String,
}

#[derive(Deserialize)]
struct UserListPayload {
    users: Vec<UserPayload>,
}

#[derive(Deserialize)]
struct GenerateLinkPayload {
    properties: LinkProperties,
}

#[derive(Deserialize)]
struct LinkProperties {
    action_link: String,
}

impl HttpIdentityProvider {
    pub fn new(http: reqwest::Client, base_url: String, service_key: String) -> Self {
        Self {
            http,
            base_url,
            service_key,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
    }
}

impl IdentityProvider for HttpIdentityProvider {
    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<IdentityUser>, AuthServiceError> {
        let response = self
            .authed(self.http.get(self.endpoint("admin/users")))
            .query(&[("email", email)])
            .send()
            .await
            .context("list users by email")?
            .error_for_status()
            .context("list users by email")?;

        let payload: UserListPayload = response.json().await.context("decode user list")?;
        Ok(payload
            .users
            .into_iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .map(|u| IdentityUser {
                id: u.id,
                email: u.email,
            }))
    }

    async fn create_user(
        &self,
        email: &str,
        full_name: Option<&str>,
    ) -> Result<CreateUserOutcome, AuthServiceError> {
        let body = json!({
            "email": email,
            "email_confirm": true,
            "user_metadata": { "full_name": full_name.unwrap_or("") },
        });
        let response = self
            .authed(self.http.post(self.endpoint("admin/users")))
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthServiceError::AccountCreate(e.into()))?;

        // Conflict means another request created the account first; the
        // provider owns uniqueness, so this is a signal, not a failure.
        if response.status() == StatusCode::CONFLICT
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
        {
            return Ok(CreateUserOutcome::AlreadyExists);
        }
        if !response.status().is_success() {
            return Err(AuthServiceError::AccountCreate(anyhow!(
                "identity provider returned {}",
                response.status()
            )));
        }

        let payload: UserPayload = response
            .json()
            .await
            .map_err(|e| AuthServiceError::AccountCreate(e.into()))?;
        Ok(CreateUserOutcome::Created(IdentityUser {
            id: payload.id,
            email: payload.email,
        }))
    }

    async fn mint_sign_in_link(&self, email: &str) -> Result<SignInLink, AuthServiceError> {
        let body = json!({ "type": "magiclink", "email": email });
        let response = self
            .authed(self.http.post(self.endpoint("admin/generate_link")))
            .json(&body)
            .send()
            .await
            .context("mint sign-in link")?
            .error_for_status()
            .context("mint sign-in link")?;

        let payload: GenerateLinkPayload =
            response.json().await.context("decode sign-in link")?;
        Ok(SignInLink {
            action_link: payload.properties.action_link,
        })
    }

    async fn redeem_link_token(
        &self,
        token: &str,
        token_type: &str,
    ) -> Result<Session, AuthServiceError> {
        let body = json!({ "type": token_type, "token_hash": token });
        let response = self
            .authed(self.http.post(self.endpoint("verify")))
            .json(&body)
            .send()
            .await
            .context("redeem sign-in token")?
            .error_for_status()
            .context("redeem sign-in token")?;

        let session: serde_json::Value = response.json().await.context("decode session")?;
        Ok(Session(session))
    }
}
