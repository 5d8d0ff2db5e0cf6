//! HTTP route handlers, one module per resource.

pub mod about;
pub mod admin;
pub mod auth;
pub mod categories;
pub mod contact;
pub mod core_values;
pub mod homepage;
pub mod milestones;
pub mod posts;
pub mod projects;
pub mod research;
pub mod social_links;
pub mod status;
pub mod team_members;
pub mod upload;

use axum::Json;
use axum::extract::{FromRequest, Request};
use validator::{Validate, ValidationError};

use crate::AppState;
use crate::error::Result;

/// JSON body extractor running `validator` checks before the handler.
pub struct Valid<T>(pub T);

impl<T> FromRequest<AppState> for Valid<T>
where
    T: serde::de::DeserializeOwned + Validate,
{
    type Rejection = crate::ServerError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;

        Ok(Self(value))
    }
}

/// Slugs address content publicly; keep them URL-safe.
pub fn validate_slug(slug: &str) -> std::result::Result<(), ValidationError> {
    let valid = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("slug"))
    }
}

#[cfg(test)]
pub fn state(pool: sqlx::PgPool) -> AppState {
    use std::sync::Arc;

    use crate::config::{Argon2, Configuration};
    use crate::crypto::PasswordManager;
    use crate::database::Database;
    use crate::notification::NotificationRepository;
    use crate::token::TokenManager;
    use crate::user::UserService;

    // Cheap argon2 parameters so tests stay quick.
    let pwd = PasswordManager::new(Some(Argon2 {
        memory_cost: 8,
        iterations: 1,
        parallelism: 1,
        hash_length: 32,
    }))
    .expect("cannot build password manager");

    AppState {
        config: Arc::new(Configuration::default()),
        db: Database {
            postgres: pool.clone(),
        },
        users: UserService::new(pool.clone(), pwd),
        notifications: NotificationRepository::new(pool),
        token: TokenManager::new("arive-lab.org", "test-secret"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_validation() {
        assert!(validate_slug("quantum-sensing").is_ok());
        assert!(validate_slug("2024-report").is_ok());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("Quantum").is_err());
        assert!(validate_slug("a b").is_err());
        assert!(validate_slug("a_b").is_err());
    }
}
