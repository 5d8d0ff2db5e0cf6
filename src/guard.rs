//! Authorization guards for routes.
//!
//! The auth gate lives here once, instead of being repeated in every
//! handler: read cookie, decode token, check role, re-check the account
//! against the database.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use crate::error::Result;
use crate::token::Claims;
use crate::user::{Role, User, UserStatus};
use crate::{AppState, ServerError};

/// The account behind the session cookie. Status must be APPROVED.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Same as [`CurrentUser`] with the ADMIN role required, both on the token
/// claims and on the re-fetched account.
#[derive(Clone, Debug)]
pub struct AdminUser(pub User);

/// Decode the session cookie. Missing cookie, malformed token, expiry and
/// forgery all end up as 401.
fn claims(state: &AppState, parts: &Parts) -> Result<Claims> {
    let cookies = parts
        .headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .ok_or(ServerError::Unauthorized)?;

    let token = crate::token::from_cookie_header(cookies)
        .ok_or(ServerError::Unauthorized)?;

    state.token.decode(token)
}

/// Re-fetch the account behind the token. Defends against the role or
/// approval changing after issuance.
async fn fetch_approved(state: &AppState, user_id: i64) -> Result<User> {
    let user = state
        .users
        .repo
        .find_by_id(user_id)
        .await?
        .ok_or(ServerError::Unauthorized)?;

    if user.status != UserStatus::Approved {
        return Err(ServerError::Unauthorized);
    }

    Ok(user)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self> {
        let claims = claims(state, parts)?;
        let user = fetch_approved(state, claims.sub).await?;

        Ok(Self(user))
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self> {
        let claims = claims(state, parts)?;

        // Role claim is checked before touching the database.
        if claims.role != Role::Admin {
            return Err(ServerError::Unauthorized);
        }

        let user = fetch_approved(state, claims.sub).await?;
        if user.role != Role::Admin {
            return Err(ServerError::Unauthorized);
        }

        Ok(Self(user))
    }
}
