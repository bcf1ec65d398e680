use axum::http::StatusCode;

/// Handler for `GET /healthz` — process liveness.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Handler for `GET /readyz` — readiness. Services that gate readiness on a
/// dependency (database, upstream API) mount their own handler instead.
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}
