//! Current account lookup.

use axum::Json;

use crate::guard::CurrentUser;
use crate::user::User;

/// Handler returning the account behind the session cookie.
pub async fn handler(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use sqlx::{Pool, Postgres};

    use crate::router::auth::login::tests::{login, session_cookie};
    use crate::router::auth::register::tests::{
        alice_fields, submit_registration,
    };
    use crate::user::{Role, User};
    use crate::*;

    #[sqlx::test]
    async fn test_me_requires_cookie(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let response = make_request(
            app,
            Method::GET,
            "/api/auth/me",
            None,
            None,
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Full lifecycle: register, approve, login, read own account.
    #[sqlx::test(fixtures("../../../fixtures/users.sql"))]
    async fn test_registration_approval_login_flow(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state.clone());

        let response =
            submit_registration(app.clone(), &alice_fields()).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let alice: User = serde_json::from_slice(&body).unwrap();

        // Admin approves through the dashboard endpoint.
        let admin_token = state
            .token
            .create(1, "root@arive-lab.org", Role::Admin)
            .unwrap();
        let response = make_request(
            app.clone(),
            Method::PATCH,
            &format!("/api/admin/users/{}/approve", alice.id),
            Some(&format!("auth-token={admin_token}")),
            None,
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response =
            login(app.clone(), "alice@example.com", "s3cure-Passw0rd!").await;
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = session_cookie(&response);

        let response = make_request(
            app,
            Method::GET,
            "/api/auth/me",
            Some(&cookie),
            None,
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let user: User = serde_json::from_slice(&body).unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.role, Role::Member);
    }
}
