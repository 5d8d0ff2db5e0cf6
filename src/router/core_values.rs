//! Core values shown on the about page.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::content::CoreValue;
use crate::error::{Result, ServerError};
use crate::guard::AdminUser;
use crate::router::Valid;

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[validate(length(min = 1, max = 100, message = "Title is required."))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required."))]
    pub description: String,
    pub icon: Option<String>,
    #[serde(default)]
    pub display_order: i32,
}

pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<CoreValue>>> {
    let values = sqlx::query_as::<_, CoreValue>(
        r#"SELECT id, title, description, icon, display_order
            FROM core_values ORDER BY display_order ASC, id ASC"#,
    )
    .fetch_all(&state.db.postgres)
    .await?;

    Ok(Json(values))
}

pub async fn create_handler(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Valid(body): Valid<Body>,
) -> Result<(StatusCode, Json<CoreValue>)> {
    let value = sqlx::query_as::<_, CoreValue>(
        r#"INSERT INTO core_values (title, description, icon, display_order)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, icon, display_order"#,
    )
    .bind(&body.title)
    .bind(&body.description)
    .bind(&body.icon)
    .bind(body.display_order)
    .fetch_one(&state.db.postgres)
    .await?;

    Ok((StatusCode::CREATED, Json(value)))
}

pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AdminUser(_): AdminUser,
    Valid(body): Valid<Body>,
) -> Result<Json<CoreValue>> {
    let value = sqlx::query_as::<_, CoreValue>(
        r#"UPDATE core_values
            SET title = $1, description = $2, icon = $3, display_order = $4
            WHERE id = $5
            RETURNING id, title, description, icon, display_order"#,
    )
    .bind(&body.title)
    .bind(&body.description)
    .bind(&body.icon)
    .bind(body.display_order)
    .bind(id)
    .fetch_optional(&state.db.postgres)
    .await?
    .ok_or(ServerError::NotFound {
        resource: "core value",
    })?;

    Ok(Json(value))
}

pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AdminUser(_): AdminUser,
) -> Result<StatusCode> {
    let result = sqlx::query(r#"DELETE FROM core_values WHERE id = $1"#)
        .bind(id)
        .execute(&state.db.postgres)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ServerError::NotFound {
            resource: "core value",
        });
    }

    Ok(StatusCode::NO_CONTENT)
}
