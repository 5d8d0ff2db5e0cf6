//! Membership application intake.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::{Json, body::Bytes};
use validator::Validate;

use crate::error::Result;
use crate::upload;
use crate::user::{NewUser, User};
use crate::AppState;

const PHOTO_FOLDER: &str = "members";

/// Personal and questionnaire fields of the multipart submission.
#[derive(Debug, Default, Validate)]
pub struct Form {
    #[validate(length(min = 1, message = "First name is required."))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required."))]
    pub last_name: String,
    #[validate(email(message = "Email must be formatted."))]
    pub email: String,
    #[validate(length(
        min = 8,
        max = 255,
        message = "Password must contain at least 8 characters."
    ))]
    pub password: String,
    pub phone: Option<String>,
    #[validate(length(min = 1, message = "Motivation is required."))]
    pub motivation: String,
    #[validate(length(min = 1, message = "Skills are required."))]
    pub skills: String,
    #[validate(length(min = 1, message = "Availability is required."))]
    pub availability: String,
}

/// Handler to register a new member.
///
/// The account is created PENDING; an admin decision makes it usable.
pub async fn handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<User>)> {
    let mut form = Form::default();
    let mut photo: Option<(Option<String>, Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_owned();

        match name.as_str() {
            "firstName" => form.first_name = field.text().await?,
            "lastName" => form.last_name = field.text().await?,
            "email" => form.email = field.text().await?,
            "password" => form.password = field.text().await?,
            "phone" => form.phone = Some(field.text().await?),
            "motivation" => form.motivation = field.text().await?,
            "skills" => form.skills = field.text().await?,
            "availability" => form.availability = field.text().await?,
            "photo" => {
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    photo = Some((content_type, bytes));
                }
            },
            // Unknown fields are ignored.
            _ => {},
        }
    }

    form.validate()?;

    let photo_url = match &photo {
        Some((content_type, bytes)) => Some(
            upload::store_image(
                &state.config.uploads,
                PHOTO_FOLDER,
                content_type.as_deref(),
                bytes,
            )
            .await?,
        ),
        None => None,
    };

    let user = state
        .users
        .register(NewUser {
            email: form.email,
            password: form.password,
            first_name: form.first_name,
            last_name: form.last_name,
            phone: form.phone,
            photo_url,
            motivation: form.motivation,
            skills: form.skills,
            availability: form.availability,
        })
        .await?;

    tracing::info!(user_id = user.id, "membership application received");

    Ok((StatusCode::CREATED, Json(user)))
}

#[cfg(test)]
pub(crate) mod tests {
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use sqlx::{Pool, Postgres};

    use crate::user::{User, UserStatus};
    use crate::*;

    /// Multipart encoder for tests.
    pub fn multipart_body(fields: &[(&str, &str)]) -> (String, String) {
        let boundary = "test-boundary".to_string();
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!("--{boundary}--\r\n"));
        (boundary, body)
    }

    pub fn alice_fields() -> Vec<(&'static str, &'static str)> {
        vec![
            ("firstName", "Alice"),
            ("lastName", "Moreau"),
            ("email", "alice@example.com"),
            ("password", "s3cure-Passw0rd!"),
            ("motivation", "I want to contribute to open research."),
            ("skills", "Rust, data analysis"),
            ("availability", "weekends"),
        ]
    }

    pub async fn submit_registration(
        app: axum::Router,
        fields: &[(&str, &str)],
    ) -> axum::http::Response<axum::body::Body> {
        let (boundary, body) = multipart_body(fields);

        make_request(
            app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(&format!("multipart/form-data; boundary={boundary}")),
            body,
        )
        .await
    }

    #[sqlx::test]
    async fn test_register_creates_pending_user(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let response = submit_registration(app, &alice_fields()).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let user: User = serde_json::from_slice(&body).unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.status, UserStatus::Pending);

        // Password must never be serialized.
        let raw: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(raw.get("password").is_none());
    }

    #[sqlx::test]
    async fn test_register_duplicate_email(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state.clone());

        let response =
            submit_registration(app.clone(), &alice_fields()).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = submit_registration(app, &alice_fields()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE email = $1",
        )
        .bind("alice@example.com")
        .fetch_one(&state.db.postgres)
        .await
        .unwrap();
        assert_eq!(count, 1);
    }

    #[sqlx::test]
    async fn test_register_missing_questionnaire(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let mut fields = alice_fields();
        fields.retain(|(name, _)| *name != "motivation");

        let response = submit_registration(app, &fields).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
