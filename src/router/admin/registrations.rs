//! Pending membership applications.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::AppState;
use crate::error::Result;
use crate::guard::AdminUser;
use crate::user::PendingRegistration;

/// Applications awaiting a decision, oldest first.
pub async fn list_handler(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> Result<Json<Vec<PendingRegistration>>> {
    let registrations = state.users.repo.pending_registrations().await?;

    Ok(Json(registrations))
}

/// Remove an application entirely. The account row goes with it; the
/// questionnaire and notifications cascade.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    AdminUser(_): AdminUser,
) -> Result<StatusCode> {
    state.users.repo.delete(user_id).await?;

    tracing::info!(user_id, "registration deleted");

    Ok(StatusCode::NO_CONTENT)
}
