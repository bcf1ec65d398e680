use anyhow::anyhow;
use serde_json::json;

use crate::domain::repository::Mailer;
use crate::error::AuthServiceError;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

const CODE_EMAIL_SUBJECT: &str = "Your LoveLite Verification Code";

/// Fixed HTML body for the verification email; `{code}` is interpolated.
const CODE_EMAIL_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
  <body style="font-family: -apple-system, 'Segoe UI', Roboto, Arial, sans-serif; background-color: #FDF8F3; margin: 0; padding: 40px 20px;">
    <div style="max-width: 480px; margin: 0 auto; background: white; border-radius: 16px; padding: 40px;">
      <h1 style="font-family: Georgia, serif; font-size: 28px; color: #1a1a1a; text-align: center; margin: 0 0 32px;">LoveLite</h1>
      <h2 style="font-size: 20px; color: #1a1a1a; text-align: center; margin-bottom: 16px;">Your Verification Code</h2>
      <p style="color: #666; text-align: center; font-size: 15px;">Enter this code to verify your email and continue your journey:</p>
      <div style="background: linear-gradient(135deg, #D4A574 0%, #E8B4B8 100%); border-radius: 12px; padding: 24px; text-align: center; margin: 24px 0;">
        <span style="font-size: 36px; font-weight: bold; letter-spacing: 8px; color: white; font-family: monospace;">{code}</span>
      </div>
      <p style="color: #999; text-align: center; font-size: 13px;">This code expires in 10 minutes.</p>
      <p style="color: #999; text-align: center; font-size: 13px;">If you didn't request this code, you can safely ignore this email.</p>
    </div>
  </body>
</html>"#;

/// Thin client for the Resend transactional-email API. Templating only —
/// delivery failures surface to the caller and are never retried here.
#[derive(Clone)]
pub struct ResendMailer {
    http: reqwest::Client,
    api_key: String,
    from: String,
}

impl ResendMailer {
    pub fn new(http: reqwest::Client, api_key: String, from: String) -> Self {
        Self {
            http,
            api_key,
            from,
        }
    }
}

impl Mailer for ResendMailer {
    async fn send_code_email(&self, to: &str, code: &str) -> Result<(), AuthServiceError> {
        let body = json!({
            "from": self.from,
            "to": [to],
            "subject": CODE_EMAIL_SUBJECT,
            "html": CODE_EMAIL_TEMPLATE.replace("{code}", code),
        });

        let response = self
            .http
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthServiceError::EmailDelivery(e.into()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(AuthServiceError::EmailDelivery(anyhow!(
                "email provider returned {status}: {detail}"
            )));
        }
        Ok(())
    }
}
