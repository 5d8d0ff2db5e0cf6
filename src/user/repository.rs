//! Handle database requests for accounts.

use serde::Serialize;
use sqlx::{Pool, Postgres};

use crate::error::{Result, ServerError};
use crate::notification;
use crate::notification::NotificationKind;
use crate::user::{AdminAction, User, UserStatus};

const USER_COLUMNS: &str = "id, email, password, first_name, last_name, \
     phone, photo_url, role, status, created_at, updated_at";

/// Fields required to persist a new account with its questionnaire.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub email: String,
    /// Already hashed (PHC string).
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub motivation: String,
    pub skills: String,
    pub availability: String,
}

/// Pending account joined with its questionnaire, for the admin dashboard.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PendingRegistration {
    pub user_id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub status: UserStatus,
    pub motivation: String,
    pub skills: String,
    pub availability: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Clone)]
pub struct UserRepository {
    pool: Pool<Postgres>,
}

impl UserRepository {
    /// Create a new [`UserRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Persist a new account: user row, questionnaire row and the
    /// NEW_REGISTRATION notification commit as one transaction.
    pub async fn register(&self, new_user: &NewUser) -> Result<User> {
        let mut tx = self.pool.begin().await?;
        let email = new_user.email.to_lowercase();

        let user = sqlx::query_as::<_, User>(&format!(
            r#"INSERT INTO users (email, password, first_name, last_name, phone, photo_url)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING {USER_COLUMNS}"#,
        ))
        .bind(&email)
        .bind(&new_user.password)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.phone)
        .bind(&new_user.photo_url)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| match err.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => {
                ServerError::Conflict("email already registered".into())
            },
            _ => err.into(),
        })?;

        sqlx::query(
            r#"INSERT INTO user_registrations (user_id, motivation, skills, availability)
                VALUES ($1, $2, $3, $4)"#,
        )
        .bind(user.id)
        .bind(&new_user.motivation)
        .bind(&new_user.skills)
        .bind(&new_user.availability)
        .execute(&mut *tx)
        .await?;

        notification::insert(
            &mut tx,
            user.id,
            NotificationKind::NewRegistration,
            &format!(
                "{} {} applied for membership",
                user.first_name, user.last_name
            ),
        )
        .await?;

        tx.commit().await?;

        Ok(user)
    }

    /// Find a user using `id` field.
    pub async fn find_by_id(&self, user_id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"SELECT {USER_COLUMNS} FROM users WHERE id = $1"#,
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user using `email` field.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"SELECT {USER_COLUMNS} FROM users WHERE email = $1"#,
        ))
        .bind(email.to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// List users, optionally narrowed by status.
    pub async fn list(&self, status: Option<UserStatus>) -> Result<Vec<User>> {
        let users = match status {
            Some(status) => {
                sqlx::query_as::<_, User>(&format!(
                    r#"SELECT {USER_COLUMNS} FROM users
                        WHERE status = $1 ORDER BY created_at DESC"#,
                ))
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            },
            None => {
                sqlx::query_as::<_, User>(&format!(
                    r#"SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"#,
                ))
                .fetch_all(&self.pool)
                .await?
            },
        };

        Ok(users)
    }

    /// Apply an admin decision to an account.
    ///
    /// The status write, the outcome notification and (on reject) the
    /// read-flag sweep commit as one transaction. The transition itself is
    /// unconditional with respect to the prior status.
    pub async fn apply_action(
        &self,
        user_id: i64,
        action: AdminAction,
    ) -> Result<User> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"UPDATE users SET status = $1, updated_at = NOW()
                WHERE id = $2 RETURNING {USER_COLUMNS}"#,
        ))
        .bind(action.target_status())
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ServerError::NotFound { resource: "user" })?;

        let (kind, outcome) = match action {
            AdminAction::Approve => (NotificationKind::UserApproved, "approved"),
            AdminAction::Reject => (NotificationKind::UserRejected, "rejected"),
            AdminAction::Suspend => {
                (NotificationKind::UserSuspended, "suspended")
            },
        };

        notification::insert(
            &mut tx,
            user.id,
            kind,
            &format!("membership of {} has been {outcome}", user.email),
        )
        .await?;

        if action == AdminAction::Reject {
            notification::mark_registration_read(&mut tx, user.id).await?;
        }

        tx.commit().await?;

        Ok(user)
    }

    /// Pending accounts with their questionnaires, oldest first.
    pub async fn pending_registrations(
        &self,
    ) -> Result<Vec<PendingRegistration>> {
        let rows = sqlx::query_as::<_, PendingRegistration>(
            r#"SELECT u.id AS user_id, u.email, u.first_name, u.last_name,
                    u.phone, u.photo_url, u.status,
                    r.motivation, r.skills, r.availability, r.created_at
                FROM users u
                JOIN user_registrations r ON r.user_id = u.id
                WHERE u.status = $1
                ORDER BY r.created_at ASC"#,
        )
        .bind(UserStatus::Pending)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Delete an account. Registration and notifications cascade.
    pub async fn delete(&self, user_id: i64) -> Result<()> {
        let result = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServerError::NotFound { resource: "user" });
        }

        Ok(())
    }
}
