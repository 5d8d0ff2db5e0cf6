//! About-section management.
//!
//! Singleton resource: GET returns the latest revision, PUT stores a new
//! one.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::content::AboutSection;
use crate::error::{Result, ServerError};
use crate::guard::AdminUser;
use crate::router::Valid;

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[validate(length(min = 1, message = "Title is required."))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required."))]
    pub content: String,
    pub mission: Option<String>,
    pub vision: Option<String>,
    pub image_url: Option<String>,
}

pub async fn get_handler(
    State(state): State<AppState>,
) -> Result<Json<AboutSection>> {
    let section = sqlx::query_as::<_, AboutSection>(
        r#"SELECT id, title, content, mission, vision, image_url, created_at
            FROM about_sections ORDER BY created_at DESC, id DESC LIMIT 1"#,
    )
    .fetch_optional(&state.db.postgres)
    .await?
    .ok_or(ServerError::NotFound { resource: "about" })?;

    Ok(Json(section))
}

pub async fn update_handler(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Valid(body): Valid<Body>,
) -> Result<Json<AboutSection>> {
    let section = sqlx::query_as::<_, AboutSection>(
        r#"INSERT INTO about_sections (title, content, mission, vision, image_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, content, mission, vision, image_url, created_at"#,
    )
    .bind(&body.title)
    .bind(&body.content)
    .bind(&body.mission)
    .bind(&body.vision)
    .bind(&body.image_url)
    .fetch_one(&state.db.postgres)
    .await?;

    Ok(Json(section))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::{Pool, Postgres};

    use crate::user::Role;
    use crate::*;

    #[sqlx::test]
    async fn test_get_without_content_is_404(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let response = make_request(
            app,
            Method::GET,
            "/api/about",
            None,
            None,
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql"))]
    async fn test_update_requires_admin(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state.clone());

        let body = json!({
            "title": "About Arive Lab",
            "content": "We do open research.",
        })
        .to_string();

        // No cookie.
        let response = make_request(
            app.clone(),
            Method::PUT,
            "/api/about",
            None,
            None,
            body.clone(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Member token.
        let member_token = state
            .token
            .create(2, "member@arive-lab.org", Role::Member)
            .unwrap();
        let response = make_request(
            app.clone(),
            Method::PUT,
            "/api/about",
            Some(&format!("auth-token={member_token}")),
            None,
            body.clone(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Admin token.
        let admin_token = state
            .token
            .create(1, "root@arive-lab.org", Role::Admin)
            .unwrap();
        let response = make_request(
            app.clone(),
            Method::PUT,
            "/api/about",
            Some(&format!("auth-token={admin_token}")),
            None,
            body,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        // The new revision is now public.
        let response = make_request(
            app,
            Method::GET,
            "/api/about",
            None,
            None,
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
