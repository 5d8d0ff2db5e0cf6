//! Team page management.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::content::{TeamMember, TeamRole};
use crate::error::{Result, ServerError};
use crate::guard::AdminUser;
use crate::router::Valid;

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[validate(length(min = 1, max = 100, message = "Name is required."))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "Title is required."))]
    pub title: String,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    #[serde(default)]
    pub team_role: TeamRole,
    #[serde(default)]
    pub display_order: i32,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    featured: Option<bool>,
}

/// List team members ordered by display order.
///
/// `?featured=true` narrows to founders, admins and coordinators, the
/// subset promoted on the homepage.
pub async fn list_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<TeamMember>>> {
    let members = if query.featured.unwrap_or(false) {
        sqlx::query_as::<_, TeamMember>(
            r#"SELECT id, name, title, bio, photo_url, team_role,
                    display_order, created_at
                FROM team_members
                WHERE team_role IN ('FOUNDER', 'ADMIN', 'COORDINATOR')
                ORDER BY display_order ASC, id ASC"#,
        )
        .fetch_all(&state.db.postgres)
        .await?
    } else {
        sqlx::query_as::<_, TeamMember>(
            r#"SELECT id, name, title, bio, photo_url, team_role,
                    display_order, created_at
                FROM team_members ORDER BY display_order ASC, id ASC"#,
        )
        .fetch_all(&state.db.postgres)
        .await?
    };

    Ok(Json(members))
}

pub async fn create_handler(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Valid(body): Valid<Body>,
) -> Result<(StatusCode, Json<TeamMember>)> {
    let member = sqlx::query_as::<_, TeamMember>(
        r#"INSERT INTO team_members
                (name, title, bio, photo_url, team_role, display_order)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, title, bio, photo_url, team_role,
                display_order, created_at"#,
    )
    .bind(&body.name)
    .bind(&body.title)
    .bind(&body.bio)
    .bind(&body.photo_url)
    .bind(body.team_role)
    .bind(body.display_order)
    .fetch_one(&state.db.postgres)
    .await?;

    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AdminUser(_): AdminUser,
    Valid(body): Valid<Body>,
) -> Result<Json<TeamMember>> {
    let member = sqlx::query_as::<_, TeamMember>(
        r#"UPDATE team_members
            SET name = $1, title = $2, bio = $3, photo_url = $4,
                team_role = $5, display_order = $6
            WHERE id = $7
            RETURNING id, name, title, bio, photo_url, team_role,
                display_order, created_at"#,
    )
    .bind(&body.name)
    .bind(&body.title)
    .bind(&body.bio)
    .bind(&body.photo_url)
    .bind(body.team_role)
    .bind(body.display_order)
    .bind(id)
    .fetch_optional(&state.db.postgres)
    .await?
    .ok_or(ServerError::NotFound {
        resource: "team member",
    })?;

    Ok(Json(member))
}

pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AdminUser(_): AdminUser,
) -> Result<StatusCode> {
    let result = sqlx::query(r#"DELETE FROM team_members WHERE id = $1"#)
        .bind(id)
        .execute(&state.db.postgres)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ServerError::NotFound {
            resource: "team member",
        });
    }

    Ok(StatusCode::NO_CONTENT)
}
