//! Workflow event records shown on the admin dashboard.

use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, Pool, Postgres};

use crate::error::Result;

/// Kind of workflow event a [`Notification`] records.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "notification_kind")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    #[sqlx(rename = "NEW_REGISTRATION")]
    NewRegistration,
    #[sqlx(rename = "USER_APPROVED")]
    UserApproved,
    #[sqlx(rename = "USER_REJECTED")]
    UserRejected,
    #[sqlx(rename = "USER_SUSPENDED")]
    UserSuspended,
}

/// Notification as saved on database.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub kind: NotificationKind,
    pub message: String,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Insert a notification inside the caller's transaction.
///
/// Registration and admin-action side effects must commit atomically with
/// the write that caused them, so this takes the open connection.
pub async fn insert(
    conn: &mut PgConnection,
    user_id: i64,
    kind: NotificationKind,
    message: &str,
) -> Result<()> {
    sqlx::query(
        r#"INSERT INTO notifications (user_id, kind, message) VALUES ($1, $2, $3)"#,
    )
    .bind(user_id)
    .bind(kind)
    .bind(message)
    .execute(conn)
    .await?;

    Ok(())
}

/// Mark a user's unread registration notifications as read, inside the
/// caller's transaction. Used when an admin rejects the registration.
pub async fn mark_registration_read(
    conn: &mut PgConnection,
    user_id: i64,
) -> Result<()> {
    sqlx::query(
        r#"UPDATE notifications SET is_read = TRUE
            WHERE user_id = $1 AND kind = $2 AND NOT is_read"#,
    )
    .bind(user_id)
    .bind(NotificationKind::NewRegistration)
    .execute(conn)
    .await?;

    Ok(())
}

/// Handle notification reads for the admin dashboard.
#[derive(Clone)]
pub struct NotificationRepository {
    pool: Pool<Postgres>,
}

impl NotificationRepository {
    /// Create a new [`NotificationRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List notifications, newest first.
    pub async fn list(&self, unread_only: bool) -> Result<Vec<Notification>> {
        let query = if unread_only {
            r#"SELECT id, user_id, kind, message, is_read, created_at
                FROM notifications WHERE NOT is_read ORDER BY created_at DESC"#
        } else {
            r#"SELECT id, user_id, kind, message, is_read, created_at
                FROM notifications ORDER BY created_at DESC"#
        };

        Ok(sqlx::query_as::<_, Notification>(query)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Bulk mark-as-read. With `ids`, only those rows; without, every
    /// unread row. Returns the number of rows updated.
    pub async fn mark_read(&self, ids: Option<&[i64]>) -> Result<u64> {
        let result = match ids {
            Some(ids) => {
                sqlx::query(
                    r#"UPDATE notifications SET is_read = TRUE
                        WHERE id = ANY($1) AND NOT is_read"#,
                )
                .bind(ids)
                .execute(&self.pool)
                .await?
            },
            None => {
                sqlx::query(
                    r#"UPDATE notifications SET is_read = TRUE WHERE NOT is_read"#,
                )
                .execute(&self.pool)
                .await?
            },
        };

        Ok(result.rows_affected())
    }
}
