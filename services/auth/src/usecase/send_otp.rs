use chrono::Duration;
use rand::RngExt;
use uuid::Uuid;

use crate::domain::repository::{Clock, Mailer, OtpCodeRepository};
use crate::domain::types::{OTP_TTL_SECS, OtpCode};
use crate::error::AuthServiceError;

/// Codes are 6-digit numeric strings, uniform over [100000, 999999].
fn generate_code() -> String {
    let mut rng = rand::rng();
    rng.random_range(100_000..1_000_000u32).to_string()
}

pub struct SendOtpInput {
    pub email: String,
}

pub struct SendOtpUseCase<R, M, C>
where
    R: OtpCodeRepository,
    M: Mailer,
    C: Clock,
{
    pub otp_codes: R,
    pub mailer: M,
    pub clock: C,
}

impl<R, M, C> SendOtpUseCase<R, M, C>
where
    R: OtpCodeRepository,
    M: Mailer,
    C: Clock,
{
    pub async fn execute(&self, input: SendOtpInput) -> Result<(), AuthServiceError> {
        let email = input.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AuthServiceError::EmailRequired);
        }

        // Supersede outstanding codes before inserting the new one.
        // Best-effort: no row lock, and a failure here must not block
        // issuance. Verification keys on (email, code) either way.
        if let Err(e) = self.otp_codes.invalidate_unused(&email).await {
            tracing::warn!(error = %e, "failed to invalidate outstanding codes");
        }

        let now = self.clock.now();
        let otp = OtpCode {
            id: Uuid::new_v4(),
            email: email.clone(),
            code: generate_code(),
            used: false,
            expires_at: now + Duration::seconds(OTP_TTL_SECS),
            created_at: now,
        };

        self.otp_codes
            .create(&otp)
            .await
            .map_err(|e| AuthServiceError::CodeStore(e.into()))?;

        // Delivery only after the row is durable; an email that never
        // arrives is recovered by requesting a fresh code, not by retrying.
        self.mailer.send_code_email(&email, &otp.code).await?;

        Ok(())
    }
}
