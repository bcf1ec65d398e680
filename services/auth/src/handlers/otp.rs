use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::domain::repository::SystemClock;
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::send_otp::{SendOtpInput, SendOtpUseCase};
use crate::usecase::verify_otp::{VerifyOtpInput, VerifyOtpUseCase, VerifyOutcome};

// Absent fields deserialize to empty strings so the usecase owns the
// "required" validation and its error message, not the JSON extractor.

#[derive(Deserialize)]
pub struct SendOtpRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

pub async fn send_otp(
    State(state): State<AppState>,
    Json(body): Json<SendOtpRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = SendOtpUseCase {
        otp_codes: state.otp_repo(),
        mailer: state.mailer(),
        clock: SystemClock,
    };
    usecase.execute(SendOtpInput { email: body.email }).await?;
    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}

pub async fn verify_otp(
    State(state): State<AppState>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = VerifyOtpUseCase {
        otp_codes: state.otp_repo(),
        identity: state.identity(),
        clock: SystemClock,
    };
    let outcome = usecase
        .execute(VerifyOtpInput {
            email: body.email,
            code: body.code,
            full_name: body.full_name,
        })
        .await?;

    let body = match outcome {
        VerifyOutcome::SignedIn { session } => json!({
            "success": true,
            "session": session,
        }),
        VerifyOutcome::NewUser { user_id, session } => json!({
            "success": true,
            "isNewUser": true,
            "userId": user_id,
            "session": session,
        }),
        VerifyOutcome::VerifiedNoSession { user_id } => json!({
            "success": true,
            "isNewUser": false,
            "noSessionYet": true,
            "userId": user_id,
        }),
    };
    Ok((StatusCode::OK, Json(body)))
}
