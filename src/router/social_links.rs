//! Social links shown in the site footer.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::content::SocialLink;
use crate::error::{Result, ServerError};
use crate::guard::AdminUser;
use crate::router::Valid;

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[validate(length(min = 1, max = 50, message = "Platform is required."))]
    pub platform: String,
    #[validate(url(message = "Url must be valid."))]
    pub url: String,
    #[serde(default)]
    pub display_order: i32,
}

pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<SocialLink>>> {
    let links = sqlx::query_as::<_, SocialLink>(
        r#"SELECT id, platform, url, display_order
            FROM social_links ORDER BY display_order ASC, id ASC"#,
    )
    .fetch_all(&state.db.postgres)
    .await?;

    Ok(Json(links))
}

pub async fn create_handler(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Valid(body): Valid<Body>,
) -> Result<(StatusCode, Json<SocialLink>)> {
    let link = sqlx::query_as::<_, SocialLink>(
        r#"INSERT INTO social_links (platform, url, display_order)
            VALUES ($1, $2, $3)
            RETURNING id, platform, url, display_order"#,
    )
    .bind(&body.platform)
    .bind(&body.url)
    .bind(body.display_order)
    .fetch_one(&state.db.postgres)
    .await?;

    Ok((StatusCode::CREATED, Json(link)))
}

pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AdminUser(_): AdminUser,
    Valid(body): Valid<Body>,
) -> Result<Json<SocialLink>> {
    let link = sqlx::query_as::<_, SocialLink>(
        r#"UPDATE social_links SET platform = $1, url = $2, display_order = $3
            WHERE id = $4
            RETURNING id, platform, url, display_order"#,
    )
    .bind(&body.platform)
    .bind(&body.url)
    .bind(body.display_order)
    .bind(id)
    .fetch_optional(&state.db.postgres)
    .await?
    .ok_or(ServerError::NotFound {
        resource: "social link",
    })?;

    Ok(Json(link))
}

pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AdminUser(_): AdminUser,
) -> Result<StatusCode> {
    let result = sqlx::query(r#"DELETE FROM social_links WHERE id = $1"#)
        .bind(id)
        .execute(&state.db.postgres)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ServerError::NotFound {
            resource: "social link",
        });
    }

    Ok(StatusCode::NO_CONTENT)
}
