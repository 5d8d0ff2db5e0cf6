//! Timeline milestones shown on the about page.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::content::TimelineMilestone;
use crate::error::{Result, ServerError};
use crate::guard::AdminUser;
use crate::router::Valid;

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[validate(range(min = 1900, max = 2200, message = "Year must be plausible."))]
    pub year: i32,
    #[validate(length(min = 1, max = 150, message = "Title is required."))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required."))]
    pub description: String,
    #[serde(default)]
    pub display_order: i32,
}

pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<TimelineMilestone>>> {
    let milestones = sqlx::query_as::<_, TimelineMilestone>(
        r#"SELECT id, year, title, description, display_order
            FROM timeline_milestones
            ORDER BY display_order ASC, year ASC, id ASC"#,
    )
    .fetch_all(&state.db.postgres)
    .await?;

    Ok(Json(milestones))
}

pub async fn create_handler(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Valid(body): Valid<Body>,
) -> Result<(StatusCode, Json<TimelineMilestone>)> {
    let milestone = sqlx::query_as::<_, TimelineMilestone>(
        r#"INSERT INTO timeline_milestones (year, title, description, display_order)
            VALUES ($1, $2, $3, $4)
            RETURNING id, year, title, description, display_order"#,
    )
    .bind(body.year)
    .bind(&body.title)
    .bind(&body.description)
    .bind(body.display_order)
    .fetch_one(&state.db.postgres)
    .await?;

    Ok((StatusCode::CREATED, Json(milestone)))
}

pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AdminUser(_): AdminUser,
    Valid(body): Valid<Body>,
) -> Result<Json<TimelineMilestone>> {
    let milestone = sqlx::query_as::<_, TimelineMilestone>(
        r#"UPDATE timeline_milestones
            SET year = $1, title = $2, description = $3, display_order = $4
            WHERE id = $5
            RETURNING id, year, title, description, display_order"#,
    )
    .bind(body.year)
    .bind(&body.title)
    .bind(&body.description)
    .bind(body.display_order)
    .bind(id)
    .fetch_optional(&state.db.postgres)
    .await?
    .ok_or(ServerError::NotFound {
        resource: "milestone",
    })?;

    Ok(Json(milestone))
}

pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AdminUser(_): AdminUser,
) -> Result<StatusCode> {
    let result =
        sqlx::query(r#"DELETE FROM timeline_milestones WHERE id = $1"#)
            .bind(id)
            .execute(&state.db.postgres)
            .await?;

    if result.rows_affected() == 0 {
        return Err(ServerError::NotFound {
            resource: "milestone",
        });
    }

    Ok(StatusCode::NO_CONTENT)
}
