use sqlx::{Pool, Postgres};

use crate::crypto::PasswordManager;
use crate::error::{Result, ServerError};
use crate::user::{NewUser, User, UserRepository, UserStatus};

/// User manager.
#[derive(Clone)]
pub struct UserService {
    pub repo: UserRepository,
    pwd: PasswordManager,
}

impl UserService {
    /// Create a new [`UserService`].
    pub fn new(pool: Pool<Postgres>, pwd: PasswordManager) -> Self {
        Self {
            repo: UserRepository::new(pool),
            pwd,
        }
    }

    /// Register a new account.
    ///
    /// Hashes the password, then persists user, questionnaire and the
    /// registration notification atomically. The account starts PENDING.
    pub async fn register(&self, mut new_user: NewUser) -> Result<User> {
        new_user.password = self
            .pwd
            .hash_password(&new_user.password)
            .map_err(|err| ServerError::internal("cannot hash password", err))?;

        self.repo.register(&new_user).await
    }

    /// Check credentials for a login attempt.
    ///
    /// A non-APPROVED account is refused with 403 before the password is
    /// even looked at; unknown email and wrong password are both 401.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User> {
        let user = self
            .repo
            .find_by_email(email)
            .await?
            .ok_or(ServerError::Unauthorized)?;

        if user.status != UserStatus::Approved {
            return Err(ServerError::Forbidden(
                "account is not approved".into(),
            ));
        }

        self.pwd
            .verify_password(password, &user.password)
            .map_err(|_| ServerError::Unauthorized)?;

        Ok(user)
    }
}
