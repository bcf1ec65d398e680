use sea_orm::DatabaseConnection;

use crate::config::AuthConfig;
use crate::infra::db::DbOtpCodeRepository;
use crate::infra::identity::HttpIdentityProvider;
use crate::infra::mailer::ResendMailer;

/// Shared application state passed to every handler via axum `State`.
/// Every cross-request dependency lives here — handlers and usecases hold
/// no process globals.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub http: reqwest::Client,
    pub identity_url: String,
    pub identity_service_key: String,
    pub resend_api_key: String,
    pub email_from: String,
}

impl AppState {
    pub fn new(db: DatabaseConnection, http: reqwest::Client, config: &AuthConfig) -> Self {
        Self {
            db,
            http,
            identity_url: config.identity_url.clone(),
            identity_service_key: config.identity_service_key.clone(),
            resend_api_key: config.resend_api_key.clone(),
            email_from: config.email_from.clone(),
        }
    }

    pub fn otp_repo(&self) -> DbOtpCodeRepository {
        DbOtpCodeRepository {
            db: self.db.clone(),
        }
    }

    pub fn identity(&self) -> HttpIdentityProvider {
        HttpIdentityProvider::new(
            self.http.clone(),
            self.identity_url.clone(),
            self.identity_service_key.clone(),
        )
    }

    pub fn mailer(&self) -> ResendMailer {
        ResendMailer::new(
            self.http.clone(),
            self.resend_api_key.clone(),
            self.email_from.clone(),
        )
    }
}
