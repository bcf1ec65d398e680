use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use lovelite_auth::domain::repository::{
    Clock, CreateUserOutcome, IdentityProvider, Mailer, OtpCodeRepository,
};
use lovelite_auth::domain::types::{IdentityUser, OtpCode, Session, SignInLink};
use lovelite_auth::error::AuthServiceError;

// ── FixedClock ───────────────────────────────────────────────────────────────

/// Clock pinned to a single instant, so expiry is simulated instead of
/// slept through.
#[derive(Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// ── MockOtpRepo ──────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockOtpRepo {
    pub codes: Arc<Mutex<Vec<OtpCode>>>,
    pub fail_create: bool,
}

impl MockOtpRepo {
    pub fn new(codes: Vec<OtpCode>) -> Self {
        Self {
            codes: Arc::new(Mutex::new(codes)),
            fail_create: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Shared handle to the stored rows for post-execution inspection.
    pub fn codes_handle(&self) -> Arc<Mutex<Vec<OtpCode>>> {
        Arc::clone(&self.codes)
    }
}

impl OtpCodeRepository for MockOtpRepo {
    async fn invalidate_unused(&self, email: &str) -> Result<u64, AuthServiceError> {
        let mut codes = self.codes.lock().unwrap();
        let mut touched = 0;
        for code in codes.iter_mut().filter(|c| c.email == email && !c.used) {
            code.used = true;
            touched += 1;
        }
        Ok(touched)
    }

    async fn create(&self, code: &OtpCode) -> Result<(), AuthServiceError> {
        if self.fail_create {
            return Err(AuthServiceError::Internal(anyhow::anyhow!(
                "insert rejected"
            )));
        }
        self.codes.lock().unwrap().push(code.clone());
        Ok(())
    }

    async fn consume_valid(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AuthServiceError> {
        // Mirrors the conditional-update contract: check and flip under one
        // lock, report whether a row was affected.
        let mut codes = self.codes.lock().unwrap();
        match codes
            .iter_mut()
            .find(|c| c.email == email && c.code == code && !c.used && c.expires_at > now)
        {
            Some(row) => {
                row.used = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ── MockIdentityProvider ─────────────────────────────────────────────────────

pub struct MockIdentityProvider {
    pub users: Arc<Mutex<Vec<IdentityUser>>>,
    pub mint_fails: bool,
    pub redeem_fails: bool,
    /// Models losing the creation race: when set, `create_user` reports a
    /// conflict and this account becomes visible to subsequent lookups, as
    /// if a concurrent request created it between lookup and create.
    pub conflict_winner: Option<IdentityUser>,
}

impl MockIdentityProvider {
    pub fn new(users: Vec<IdentityUser>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            mint_fails: false,
            redeem_fails: false,
            conflict_winner: None,
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn users_handle(&self) -> Arc<Mutex<Vec<IdentityUser>>> {
        Arc::clone(&self.users)
    }
}

impl IdentityProvider for MockIdentityProvider {
    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<IdentityUser>, AuthServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create_user(
        &self,
        email: &str,
        _full_name: Option<&str>,
    ) -> Result<CreateUserOutcome, AuthServiceError> {
        if let Some(winner) = &self.conflict_winner {
            self.users.lock().unwrap().push(winner.clone());
            return Ok(CreateUserOutcome::AlreadyExists);
        }
        let user = IdentityUser {
            id: Uuid::new_v4(),
            email: email.to_owned(),
        };
        self.users.lock().unwrap().push(user.clone());
        Ok(CreateUserOutcome::Created(user))
    }

    async fn mint_sign_in_link(&self, email: &str) -> Result<SignInLink, AuthServiceError> {
        if self.mint_fails {
            return Err(AuthServiceError::Internal(anyhow::anyhow!(
                "link mint unavailable"
            )));
        }
        Ok(SignInLink {
            action_link: format!(
                "https://id.test/verify?token=tok-{email}&type=magiclink"
            ),
        })
    }

    async fn redeem_link_token(
        &self,
        token: &str,
        _token_type: &str,
    ) -> Result<Session, AuthServiceError> {
        if self.redeem_fails {
            return Err(AuthServiceError::Internal(anyhow::anyhow!(
                "token rejected"
            )));
        }
        Ok(Session(json!({
            "access_token": format!("atk-{token}"),
            "token_type": "bearer",
        })))
    }
}

// ── MockMailer ───────────────────────────────────────────────────────────────

pub struct MockMailer {
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
    pub fail: bool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
            fail: false,
        }
    }

    pub fn sent_handle(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        Arc::clone(&self.sent)
    }
}

impl Mailer for MockMailer {
    async fn send_code_email(&self, to: &str, code: &str) -> Result<(), AuthServiceError> {
        if self.fail {
            return Err(AuthServiceError::EmailDelivery(anyhow::anyhow!(
                "provider rejected the message"
            )));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_owned(), code.to_owned()));
        Ok(())
    }
}

// ── Fixture helpers ──────────────────────────────────────────────────────────

pub fn test_identity_user(email: &str) -> IdentityUser {
    IdentityUser {
        id: Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap(),
        email: email.to_owned(),
    }
}

pub fn test_otp_code(email: &str, code: &str, now: DateTime<Utc>) -> OtpCode {
    OtpCode {
        id: Uuid::new_v4(),
        email: email.to_owned(),
        code: code.to_owned(),
        used: false,
        expires_at: now + chrono::Duration::seconds(600),
        created_at: now,
    }
}
