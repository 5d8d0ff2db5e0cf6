//! Session creation.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::Result;
use crate::router::Valid;
use crate::user::User;
use crate::AppState;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Body {
    #[validate(email(message = "Email must be formatted."))]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub user: User,
    pub token: String,
}

/// Handler to open a session.
///
/// Only APPROVED accounts may log in; the signed token lands in an
/// HttpOnly cookie and is also returned raw.
pub async fn handler(
    State(state): State<AppState>,
    Valid(body): Valid<Body>,
) -> Result<impl IntoResponse> {
    let user = state
        .users
        .authenticate(&body.email, &body.password)
        .await?;

    let token = state.token.create(user.id, &user.email, user.role)?;
    let cookie = state.token.session_cookie(&token);

    tracing::info!(user_id = user.id, "session opened");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(Response { user, token }),
    ))
}

#[cfg(test)]
pub(super) mod tests {
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use serde_json::json;
    use sqlx::{Pool, Postgres};

    use super::Response;
    use crate::router::auth::register::tests::{
        alice_fields, submit_registration,
    };
    use crate::user::Role;
    use crate::*;

    pub async fn login(
        app: axum::Router,
        email: &str,
        password: &str,
    ) -> axum::http::Response<axum::body::Body> {
        make_request(
            app,
            Method::POST,
            "/api/auth/login",
            None,
            None,
            json!({ "email": email, "password": password }).to_string(),
        )
        .await
    }

    /// Pull the `auth-token` pair out of a login response.
    pub fn session_cookie(
        response: &axum::http::Response<axum::body::Body>,
    ) -> String {
        response
            .headers()
            .get(axum::http::header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .expect("missing session cookie")
            .to_owned()
    }

    #[sqlx::test]
    async fn test_login_pending_user_is_forbidden(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let response =
            submit_registration(app.clone(), &alice_fields()).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        // Correct password, still refused while PENDING.
        let response =
            login(app.clone(), "alice@example.com", "s3cure-Passw0rd!").await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // Wrong password on a PENDING account is also a 403.
        let response =
            login(app, "alice@example.com", "wrong-password").await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[sqlx::test]
    async fn test_login_issues_cookie_with_matching_role(
        pool: Pool<Postgres>,
    ) {
        let state = router::state(pool);
        let app = app(state.clone());

        submit_registration(app.clone(), &alice_fields()).await;
        sqlx::query("UPDATE users SET status = 'APPROVED' WHERE email = $1")
            .bind("alice@example.com")
            .execute(&state.db.postgres)
            .await
            .unwrap();

        let response =
            login(app.clone(), "alice@example.com", "s3cure-Passw0rd!").await;
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = session_cookie(&response);
        let raw_token = cookie.strip_prefix("auth-token=").unwrap();
        let claims = state.token.decode(raw_token).unwrap();
        assert_eq!(claims.role, Role::Member);
        assert_eq!(claims.email, "alice@example.com");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Response = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.token, raw_token);
        assert_eq!(body.user.role, Role::Member);

        // Wrong password on the APPROVED account is a 401.
        let response = login(app, "alice@example.com", "wrong-password").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
