//! Category management for research and project posts.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::content::Category;
use crate::error::{Result, ServerError};
use crate::guard::AdminUser;
use crate::router::Valid;

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[validate(length(min = 1, max = 100, message = "Name is required."))]
    pub name: String,
    #[validate(custom(
        function = "crate::router::validate_slug",
        message = "Slug must be lowercase alphanumeric with dashes."
    ))]
    pub slug: String,
    pub description: Option<String>,
}

pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>> {
    let categories = sqlx::query_as::<_, Category>(
        r#"SELECT id, name, slug, description, created_at
            FROM categories ORDER BY name ASC"#,
    )
    .fetch_all(&state.db.postgres)
    .await?;

    Ok(Json(categories))
}

pub async fn create_handler(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Valid(body): Valid<Body>,
) -> Result<(StatusCode, Json<Category>)> {
    let category = sqlx::query_as::<_, Category>(
        r#"INSERT INTO categories (name, slug, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, slug, description, created_at"#,
    )
    .bind(&body.name)
    .bind(&body.slug)
    .bind(&body.description)
    .fetch_one(&state.db.postgres)
    .await
    .map_err(conflict_on_slug)?;

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AdminUser(_): AdminUser,
    Valid(body): Valid<Body>,
) -> Result<Json<Category>> {
    let category = sqlx::query_as::<_, Category>(
        r#"UPDATE categories SET name = $1, slug = $2, description = $3
            WHERE id = $4
            RETURNING id, name, slug, description, created_at"#,
    )
    .bind(&body.name)
    .bind(&body.slug)
    .bind(&body.description)
    .bind(id)
    .fetch_optional(&state.db.postgres)
    .await
    .map_err(conflict_on_slug)?
    .ok_or(ServerError::NotFound {
        resource: "category",
    })?;

    Ok(Json(category))
}

pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AdminUser(_): AdminUser,
) -> Result<StatusCode> {
    let result = sqlx::query(r#"DELETE FROM categories WHERE id = $1"#)
        .bind(id)
        .execute(&state.db.postgres)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ServerError::NotFound {
            resource: "category",
        });
    }

    Ok(StatusCode::NO_CONTENT)
}

fn conflict_on_slug(err: sqlx::Error) -> ServerError {
    match err.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => {
            ServerError::Conflict("slug already used".into())
        },
        _ => err.into(),
    }
}
