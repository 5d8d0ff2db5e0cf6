//! Contact details and visitor submissions.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::content::{ContactInfo, ContactSubmission};
use crate::error::{Result, ServerError};
use crate::guard::AdminUser;
use crate::router::Valid;

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InfoBody {
    #[validate(email(message = "Email must be formatted."))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone is required."))]
    pub phone: String,
    #[validate(length(min = 1, message = "Address is required."))]
    pub address: String,
}

/// Singleton: latest contact details shown on the public site.
pub async fn get_info_handler(
    State(state): State<AppState>,
) -> Result<Json<ContactInfo>> {
    let info = sqlx::query_as::<_, ContactInfo>(
        r#"SELECT id, email, phone, address, created_at
            FROM contact_info ORDER BY created_at DESC, id DESC LIMIT 1"#,
    )
    .fetch_optional(&state.db.postgres)
    .await?
    .ok_or(ServerError::NotFound {
        resource: "contact info",
    })?;

    Ok(Json(info))
}

pub async fn update_info_handler(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Valid(body): Valid<InfoBody>,
) -> Result<Json<ContactInfo>> {
    let info = sqlx::query_as::<_, ContactInfo>(
        r#"INSERT INTO contact_info (email, phone, address)
            VALUES ($1, $2, $3)
            RETURNING id, email, phone, address, created_at"#,
    )
    .bind(&body.email)
    .bind(&body.phone)
    .bind(&body.address)
    .fetch_one(&state.db.postgres)
    .await?;

    Ok(Json(info))
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionBody {
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,
    #[validate(email(message = "Email must be formatted."))]
    pub email: String,
    #[validate(length(min = 1, message = "Subject is required."))]
    pub subject: String,
    #[validate(length(min = 1, message = "Message is required."))]
    pub message: String,
}

/// Public contact-form intake.
pub async fn submit_handler(
    State(state): State<AppState>,
    Valid(body): Valid<SubmissionBody>,
) -> Result<(StatusCode, Json<ContactSubmission>)> {
    let submission = sqlx::query_as::<_, ContactSubmission>(
        r#"INSERT INTO contact_submissions (name, email, subject, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, subject, message, created_at"#,
    )
    .bind(&body.name)
    .bind(&body.email)
    .bind(&body.subject)
    .bind(&body.message)
    .fetch_one(&state.db.postgres)
    .await?;

    Ok((StatusCode::CREATED, Json(submission)))
}

/// Admin view of received submissions, newest first.
pub async fn list_submissions_handler(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> Result<Json<Vec<ContactSubmission>>> {
    let submissions = sqlx::query_as::<_, ContactSubmission>(
        r#"SELECT id, name, email, subject, message, created_at
            FROM contact_submissions ORDER BY created_at DESC"#,
    )
    .fetch_all(&state.db.postgres)
    .await?;

    Ok(Json(submissions))
}
