//! Session teardown.

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;

use crate::AppState;

/// Handler to discard the session cookie.
pub async fn handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, state.token.removal_cookie())],
        StatusCode::NO_CONTENT,
    )
}
