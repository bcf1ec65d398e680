#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use crate::domain::types::{IdentityUser, OtpCode, Session, SignInLink};
use crate::error::AuthServiceError;

/// Repository for one-time passcodes.
pub trait OtpCodeRepository: Send + Sync {
    /// Mark every unused code for this email as used. Returns the number of
    /// rows touched. Runs without a row lock, so a concurrent issuance can
    /// still land a second live row (accepted, see `consume_valid`).
    async fn invalidate_unused(&self, email: &str) -> Result<u64, AuthServiceError>;

    /// Insert a freshly issued code.
    async fn create(&self, code: &OtpCode) -> Result<(), AuthServiceError>;

    /// Consume a live code: a single conditional update flips `used` where
    /// `(email, code)` matches an unused row expiring after `now`, and the
    /// affected-row count is the verdict. Never a read-then-write pair:
    /// two concurrent calls for the same code must not both succeed.
    async fn consume_valid(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AuthServiceError>;
}

/// Outcome of an account-creation call.
#[derive(Debug)]
pub enum CreateUserOutcome {
    Created(IdentityUser),
    /// The provider already holds an account for this email. Uniqueness is
    /// the provider's call; the verifier re-resolves instead of failing.
    AlreadyExists,
}

/// Port over the external identity provider's administrative API.
pub trait IdentityProvider: Send + Sync {
    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<IdentityUser>, AuthServiceError>;

    /// Create an account with the email already marked confirmed — the OTP
    /// proved ownership before this is called.
    async fn create_user(
        &self,
        email: &str,
        full_name: Option<&str>,
    ) -> Result<CreateUserOutcome, AuthServiceError>;

    /// Mint a short-lived sign-in link for the email.
    async fn mint_sign_in_link(&self, email: &str) -> Result<SignInLink, AuthServiceError>;

    /// Redeem the one-time token embedded in a sign-in link for a session.
    /// Callers treat failure as "no session yet", never as fatal.
    async fn redeem_link_token(
        &self,
        token: &str,
        token_type: &str,
    ) -> Result<Session, AuthServiceError>;
}

/// Port for outbound transactional email.
pub trait Mailer: Send + Sync {
    async fn send_code_email(&self, to: &str, code: &str) -> Result<(), AuthServiceError>;
}

/// Clock port so expiry checks are testable without sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used outside tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
