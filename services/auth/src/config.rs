/// Auth service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AuthConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Identity provider base URL (e.g. "https://id.lovelite.app/auth/v1").
    /// Env var: `IDENTITY_URL`.
    pub identity_url: String,
    /// Service-role key for the identity provider's admin API. Never
    /// shipped to clients.
    pub identity_service_key: String,
    /// API key for the Resend transactional-email API.
    pub resend_api_key: String,
    /// From header for verification emails. Env var: `EMAIL_FROM`.
    pub email_from: String,
    /// TCP port to listen on (default 3110). Env var: `AUTH_PORT`.
    pub auth_port: u16,
}

const DEFAULT_EMAIL_FROM: &str = "LoveLite <onboarding@resend.dev>";

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            identity_url: std::env::var("IDENTITY_URL").expect("IDENTITY_URL"),
            identity_service_key: std::env::var("IDENTITY_SERVICE_KEY")
                .expect("IDENTITY_SERVICE_KEY"),
            resend_api_key: std::env::var("RESEND_API_KEY").expect("RESEND_API_KEY"),
            email_from: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| DEFAULT_EMAIL_FROM.to_owned()),
            auth_port: std::env::var("AUTH_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3110),
        }
    }
}
