use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use lovelite_core::health::{healthz, readyz};
use lovelite_core::middleware::request_id_layer;

use crate::handlers::otp::{send_otp, verify_otp};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // OTP
        .route("/auth/otp", post(send_otp))
        .route("/auth/otp/verify", post(verify_otp))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
