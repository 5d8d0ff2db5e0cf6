//! Workflow notifications feed.

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::Result;
use crate::guard::AdminUser;
use crate::notification::Notification;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    unread: Option<bool>,
}

/// Newest notifications first; `?unread=true` narrows to unread rows.
pub async fn list_handler(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Notification>>> {
    let notifications = state
        .notifications
        .list(query.unread.unwrap_or(false))
        .await?;

    Ok(Json(notifications))
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct MarkReadBody {
    /// Without ids, every unread notification is marked.
    pub ids: Option<Vec<i64>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarkReadResponse {
    pub updated: u64,
}

/// Bulk mark-as-read. An empty body (`{}`) marks everything.
pub async fn mark_read_handler(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(body): Json<MarkReadBody>,
) -> Result<Json<MarkReadResponse>> {
    let updated = state
        .notifications
        .mark_read(body.ids.as_deref())
        .await?;

    Ok(Json(MarkReadResponse { updated }))
}
