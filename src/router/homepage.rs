//! Homepage hero management.
//!
//! Singleton resource: GET returns the latest revision, PUT stores a new
//! one.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::content::HomepageSettings;
use crate::error::{Result, ServerError};
use crate::guard::AdminUser;
use crate::router::Valid;

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[validate(length(min = 1, message = "Hero title is required."))]
    pub hero_title: String,
    #[validate(length(min = 1, message = "Hero subtitle is required."))]
    pub hero_subtitle: String,
    pub hero_image_url: Option<String>,
    pub cta_label: Option<String>,
    pub cta_url: Option<String>,
}

pub async fn get_handler(
    State(state): State<AppState>,
) -> Result<Json<HomepageSettings>> {
    let settings = sqlx::query_as::<_, HomepageSettings>(
        r#"SELECT id, hero_title, hero_subtitle, hero_image_url, cta_label,
                cta_url, created_at
            FROM homepage_settings ORDER BY created_at DESC, id DESC LIMIT 1"#,
    )
    .fetch_optional(&state.db.postgres)
    .await?
    .ok_or(ServerError::NotFound {
        resource: "homepage settings",
    })?;

    Ok(Json(settings))
}

pub async fn update_handler(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Valid(body): Valid<Body>,
) -> Result<Json<HomepageSettings>> {
    let settings = sqlx::query_as::<_, HomepageSettings>(
        r#"INSERT INTO homepage_settings
                (hero_title, hero_subtitle, hero_image_url, cta_label, cta_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, hero_title, hero_subtitle, hero_image_url, cta_label,
                cta_url, created_at"#,
    )
    .bind(&body.hero_title)
    .bind(&body.hero_subtitle)
    .bind(&body.hero_image_url)
    .bind(&body.cta_label)
    .bind(&body.cta_url)
    .fetch_one(&state.db.postgres)
    .await?;

    Ok(Json(settings))
}
