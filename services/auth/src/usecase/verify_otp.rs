use uuid::Uuid;

use crate::domain::repository::{Clock, CreateUserOutcome, IdentityProvider, OtpCodeRepository};
use crate::domain::types::{IdentityUser, Session, SignInLink};
use crate::error::AuthServiceError;

pub struct VerifyOtpInput {
    pub email: String,
    pub code: String,
    /// Display name, used only when a fresh account is created.
    pub full_name: Option<String>,
}

/// Tri-state verification result. "Code accepted but no session" is a
/// success variant, not an error — the client recovers without re-entering
/// the code.
#[derive(Debug)]
pub enum VerifyOutcome {
    /// Existing account, session minted.
    SignedIn { session: Session },
    /// Fresh account. `session` is `None` when redemption failed; the
    /// client then completes sign-in by a secondary path.
    NewUser {
        user_id: Uuid,
        session: Option<Session>,
    },
    /// Existing account, code consumed, redemption failed.
    VerifiedNoSession { user_id: Uuid },
}

pub struct VerifyOtpUseCase<R, I, C>
where
    R: OtpCodeRepository,
    I: IdentityProvider,
    C: Clock,
{
    pub otp_codes: R,
    pub identity: I,
    pub clock: C,
}

impl<R, I, C> VerifyOtpUseCase<R, I, C>
where
    R: OtpCodeRepository,
    I: IdentityProvider,
    C: Clock,
{
    pub async fn execute(&self, input: VerifyOtpInput) -> Result<VerifyOutcome, AuthServiceError> {
        let email = input.email.trim().to_lowercase();
        let code = input.code.trim().to_owned();
        if email.is_empty() || code.is_empty() {
            return Err(AuthServiceError::MissingCredentials);
        }

        // Single-use commit point: one conditional update against the
        // store. Expired and wrong codes are indistinguishable from here on.
        let consumed = self
            .otp_codes
            .consume_valid(&email, &code, self.clock.now())
            .await?;
        if !consumed {
            return Err(AuthServiceError::InvalidCode);
        }

        match self.identity.find_user_by_email(&email).await? {
            Some(user) => self.resolve_existing(&email, user).await,
            None => self.resolve_new(&email, input.full_name.as_deref()).await,
        }
    }

    async fn resolve_existing(
        &self,
        email: &str,
        user: IdentityUser,
    ) -> Result<VerifyOutcome, AuthServiceError> {
        let link = self
            .identity
            .mint_sign_in_link(email)
            .await
            .map_err(|e| AuthServiceError::SignIn(e.into()))?;

        match self.redeem(&link).await {
            Some(session) => Ok(VerifyOutcome::SignedIn { session }),
            // Email ownership is already proven; the client falls back to a
            // lower-privilege sign-in path instead of re-entering the code.
            None => Ok(VerifyOutcome::VerifiedNoSession { user_id: user.id }),
        }
    }

    async fn resolve_new(
        &self,
        email: &str,
        full_name: Option<&str>,
    ) -> Result<VerifyOutcome, AuthServiceError> {
        let user = match self.identity.create_user(email, full_name).await? {
            CreateUserOutcome::Created(user) => user,
            // Lost the creation race; the provider is the uniqueness
            // authority, so re-resolve as an existing account.
            CreateUserOutcome::AlreadyExists => {
                return match self.identity.find_user_by_email(email).await? {
                    Some(user) => self.resolve_existing(email, user).await,
                    None => Err(AuthServiceError::Internal(anyhow::anyhow!(
                        "provider reported an existing account for {email} but lookup found none"
                    ))),
                };
            }
        };

        // Session materialization is best-effort for fresh accounts.
        let session = match self.identity.mint_sign_in_link(email).await {
            Ok(link) => self.redeem(&link).await,
            Err(e) => {
                tracing::warn!(error = %e, "sign-in link mint failed for new account");
                None
            }
        };

        Ok(VerifyOutcome::NewUser {
            user_id: user.id,
            session,
        })
    }

    /// Redeem the link's one-time token. Any failure is "no session yet".
    async fn redeem(&self, link: &SignInLink) -> Option<Session> {
        let Some((token, token_type)) = link.token() else {
            tracing::warn!("sign-in link carried no redeemable token");
            return None;
        };
        match self.identity.redeem_link_token(&token, &token_type).await {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(error = %e, "sign-in link redemption failed");
                None
            }
        }
    }
}
