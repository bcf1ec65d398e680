#![allow(async_fn_in_trait)]

use crate::error::AuthClientError;
use crate::types::{AuthPhase, Session, VerifyResponse};

/// Port over the auth service's two OTP endpoints.
pub trait AuthApi {
    async fn send_code(&self, email: &str) -> Result<(), AuthClientError>;
    async fn verify_code(
        &self,
        email: &str,
        code: &str,
        full_name: Option<&str>,
    ) -> Result<VerifyResponse, AuthClientError>;
}

/// Port over the identity provider's client-facing session API.
pub trait SessionGateway {
    /// The provider's view of the current session, if any.
    async fn fetch_session(&self) -> Result<Option<Session>, AuthClientError>;

    /// Ask the provider for a native sign-in link. Must never create an
    /// account — the verifier has already settled identity.
    async fn request_sign_in_link(&self, email: &str) -> Result<(), AuthClientError>;

    /// Invalidate the session server-side.
    async fn sign_out(&self, session: &Session) -> Result<(), AuthClientError>;
}

/// Terminal status of a verification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInStatus {
    /// A session is active; the flow is complete.
    SignedIn { is_new_user: bool },
    /// The code was accepted but no session materialized. The caller
    /// prompts a retry or waits for the provider's sign-in link.
    VerifiedAwaitingSession { is_new_user: bool },
}

/// In-page state holder for the two-step sign-in flow.
///
/// The session slot is written by both the ambient change notifications
/// (`on_session_change`) and the explicit fetch in `init`. Last write wins;
/// both reflect the provider's truth at near-identical times, so order does
/// not matter.
pub struct AuthFlow<A, G>
where
    A: AuthApi,
    G: SessionGateway,
{
    api: A,
    gateway: G,
    phase: AuthPhase,
    session: Option<Session>,
}

impl<A, G> AuthFlow<A, G>
where
    A: AuthApi,
    G: SessionGateway,
{
    pub fn new(api: A, gateway: G) -> Self {
        Self {
            api,
            gateway,
            phase: AuthPhase::ModeSelect,
            session: None,
        }
    }

    /// One explicit session fetch on mount, so an already-authenticated
    /// user is reflected without a fresh login.
    pub async fn init(&mut self) -> Result<(), AuthClientError> {
        self.session = self.gateway.fetch_session().await?;
        Ok(())
    }

    /// Ambient session-change notification from the provider.
    pub fn on_session_change(&mut self, session: Option<Session>) {
        self.session = session;
    }

    pub fn phase(&self) -> AuthPhase {
        self.phase
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&serde_json::Value> {
        self.session.as_ref().and_then(Session::user)
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// Enter the email sign-in path.
    pub fn start_email_sign_in(&mut self) {
        self.phase = AuthPhase::EmailEntry;
    }

    /// Request a code. Advances to code entry only on success; on error the
    /// message is surfaced and the phase stays put.
    pub async fn send_otp(&mut self, email: &str) -> Result<(), AuthClientError> {
        self.api.send_code(email).await?;
        self.phase = AuthPhase::CodeEntry;
        Ok(())
    }

    /// Submit the code. A session in the response is adopted directly;
    /// otherwise the flow falls back to a provider-native sign-in link and
    /// one session re-fetch before giving up on this attempt.
    pub async fn verify_otp(
        &mut self,
        email: &str,
        code: &str,
        full_name: Option<&str>,
    ) -> Result<SignInStatus, AuthClientError> {
        let response = self.api.verify_code(email, code, full_name).await?;
        let is_new_user = response.is_new_user.unwrap_or(false);

        if let Some(session) = response.session {
            self.session = Some(session);
            return Ok(SignInStatus::SignedIn { is_new_user });
        }

        // The code is already consumed; a failed link request must not fail
        // the attempt.
        if let Err(e) = self.gateway.request_sign_in_link(email).await {
            tracing::warn!(error = %e, "fallback sign-in link request failed");
        }

        let session = match self.gateway.fetch_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "session fetch after fallback failed");
                None
            }
        };

        match session {
            Some(session) => {
                self.session = Some(session);
                Ok(SignInStatus::SignedIn { is_new_user })
            }
            None => Ok(SignInStatus::VerifiedAwaitingSession { is_new_user }),
        }
    }

    /// Clear local state and invalidate the session server-side. Local
    /// state is cleared even when the provider call fails.
    pub async fn sign_out(&mut self) -> Result<(), AuthClientError> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };
        self.phase = AuthPhase::ModeSelect;
        self.gateway.sign_out(&session).await
    }
}
