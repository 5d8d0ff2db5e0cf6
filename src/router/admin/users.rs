//! Account administration: listing and approval decisions.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use validator::{ValidationError, ValidationErrors};

use crate::AppState;
use crate::error::Result;
use crate::guard::AdminUser;
use crate::user::{AdminAction, User, UserStatus};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    status: Option<UserStatus>,
}

/// Accounts, newest first, optionally narrowed by status.
pub async fn list_handler(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<User>>> {
    let users = state.users.repo.list(query.status).await?;

    Ok(Json(users))
}

/// Apply an approval decision to an account.
///
/// `action` is one of `approve`, `reject` or `suspend`; anything else is
/// a 400. The decision, its notification and (on reject) the read-flag
/// sweep commit atomically.
pub async fn action_handler(
    State(state): State<AppState>,
    Path((user_id, action)): Path<(i64, String)>,
    AdminUser(admin): AdminUser,
) -> Result<Json<User>> {
    let Some(action) = AdminAction::parse(&action) else {
        let mut errors = ValidationErrors::new();
        errors.add(
            "action",
            ValidationError::new("action")
                .with_message("Action must be approve, reject or suspend.".into()),
        );
        return Err(errors.into());
    };

    let user = state.users.repo.apply_action(user_id, action).await?;

    tracing::info!(
        admin_id = admin.id,
        user_id = user.id,
        status = ?user.status,
        "admin decision applied"
    );

    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use sqlx::{Pool, Postgres};

    use crate::notification::{Notification, NotificationKind};
    use crate::router::auth::register::tests::{
        alice_fields, submit_registration,
    };
    use crate::user::{Role, User, UserStatus};
    use crate::*;

    fn admin_cookie(state: &AppState) -> String {
        let token = state
            .token
            .create(1, "root@arive-lab.org", Role::Admin)
            .unwrap();
        format!("auth-token={token}")
    }

    async fn patch_action(
        app: axum::Router,
        cookie: &str,
        user_id: i64,
        action: &str,
    ) -> axum::http::Response<axum::body::Body> {
        make_request(
            app,
            Method::PATCH,
            &format!("/api/admin/users/{user_id}/{action}"),
            Some(cookie),
            None,
            String::default(),
        )
        .await
    }

    #[sqlx::test(fixtures("../../../fixtures/users.sql"))]
    async fn test_admin_gate(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state.clone());

        // No cookie.
        let response = make_request(
            app.clone(),
            Method::GET,
            "/api/admin/registrations",
            None,
            None,
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Member-role token.
        let member = state
            .token
            .create(2, "member@arive-lab.org", Role::Member)
            .unwrap();
        let response = make_request(
            app.clone(),
            Method::GET,
            "/api/admin/registrations",
            Some(&format!("auth-token={member}")),
            None,
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Admin-role token whose backing account is no longer approved.
        let suspended_admin = state
            .token
            .create(4, "former-admin@arive-lab.org", Role::Admin)
            .unwrap();
        let response = make_request(
            app,
            Method::GET,
            "/api/admin/registrations",
            Some(&format!("auth-token={suspended_admin}")),
            None,
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[sqlx::test(fixtures("../../../fixtures/users.sql"))]
    async fn test_unknown_action_and_user(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state.clone());
        let cookie = admin_cookie(&state);

        let response = patch_action(app.clone(), &cookie, 2, "promote").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response =
            patch_action(app, &cookie, 99_999, "approve").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(fixtures("../../../fixtures/users.sql"))]
    async fn test_reject_marks_registration_notifications_read(
        pool: Pool<Postgres>,
    ) {
        let state = router::state(pool);
        let app = app(state.clone());
        let cookie = admin_cookie(&state);

        let response =
            submit_registration(app.clone(), &alice_fields()).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let alice: User = serde_json::from_slice(&body).unwrap();

        // Registration produced an unread NEW_REGISTRATION notification.
        let unread: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM notifications
                WHERE user_id = $1 AND kind = 'NEW_REGISTRATION' AND NOT is_read"#,
        )
        .bind(alice.id)
        .fetch_one(&state.db.postgres)
        .await
        .unwrap();
        assert_eq!(unread, 1);

        let response =
            patch_action(app.clone(), &cookie, alice.id, "reject").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let rejected: User = serde_json::from_slice(&body).unwrap();
        assert_eq!(rejected.status, UserStatus::Rejected);

        let unread: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM notifications
                WHERE user_id = $1 AND kind = 'NEW_REGISTRATION' AND NOT is_read"#,
        )
        .bind(alice.id)
        .fetch_one(&state.db.postgres)
        .await
        .unwrap();
        assert_eq!(unread, 0);

        // The rejection itself is recorded.
        let response = make_request(
            app,
            Method::GET,
            "/api/admin/notifications?unread=true",
            Some(&cookie),
            None,
            String::default(),
        )
        .await;
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let notifications: Vec<Notification> =
            serde_json::from_slice(&body).unwrap();
        assert!(notifications.iter().any(|n| {
            n.user_id == alice.id && n.kind == NotificationKind::UserRejected
        }));
    }

    // Transitions are unconditional: a rejected account can still be
    // approved afterwards.
    #[sqlx::test(fixtures("../../../fixtures/users.sql"))]
    async fn test_reapprove_after_reject(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state.clone());
        let cookie = admin_cookie(&state);

        let response =
            submit_registration(app.clone(), &alice_fields()).await;
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let alice: User = serde_json::from_slice(&body).unwrap();

        patch_action(app.clone(), &cookie, alice.id, "reject").await;
        let response =
            patch_action(app, &cookie, alice.id, "approve").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let approved: User = serde_json::from_slice(&body).unwrap();
        assert_eq!(approved.status, UserStatus::Approved);
    }
}
