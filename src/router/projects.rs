//! Projects HTTP API. Same contract as research posts.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::AppState;
use crate::content::Post;
use crate::error::Result;
use crate::guard::CurrentUser;
use crate::router::Valid;
use crate::router::posts::{Body, PostStore, ensure_can_edit};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    featured: Option<bool>,
}

fn store(state: &AppState) -> PostStore {
    PostStore::projects(state.db.postgres.clone())
}

/// Published projects, newest first.
pub async fn list_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Post>>> {
    let posts = store(&state)
        .list_public(query.featured.unwrap_or(false))
        .await?;

    Ok(Json(posts))
}

pub async fn create_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Valid(body): Valid<Body>,
) -> Result<(StatusCode, Json<Post>)> {
    let post = store(&state).insert(user.id, &body).await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// Dashboard view: unpublished entries included, ownership enforced.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Post>> {
    let post = store(&state).find(id).await?;
    ensure_can_edit(&user, &post)?;

    Ok(Json(post))
}

pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    CurrentUser(user): CurrentUser,
    Valid(body): Valid<Body>,
) -> Result<Json<Post>> {
    let store = store(&state);
    let post = store.find(id).await?;
    ensure_can_edit(&user, &post)?;

    Ok(Json(store.update(id, &body).await?))
}

pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode> {
    let store = store(&state);
    let post = store.find(id).await?;
    ensure_can_edit(&user, &post)?;

    store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
