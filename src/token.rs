//! Manage session tokens (json web tokens).

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServerError};
use crate::user::Role;

/// Cookie carrying the session token.
pub const COOKIE_NAME: &str = "auth-token";
/// Session lifetime, in seconds.
pub const EXPIRATION_TIME: u64 = 60 * 60 * 24; // 24 hours.

/// Pieces of information asserted on a session token.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Recipients that the token is intended for.
    pub aud: String,
    /// Identifies the expiration time on or after which the token must not
    /// be accepted for processing.
    pub exp: u64,
    /// Identifies the time at which the token was issued.
    pub iat: u64,
    /// Identifies the organization that issued the token.
    pub iss: String,
    /// User ID.
    pub sub: i64,
    /// Email of the user at issuance time.
    pub email: String,
    /// Role of the user at issuance time.
    pub role: Role,
}

/// Manage session tokens.
#[derive(Clone)]
pub struct TokenManager {
    algorithm: Algorithm,
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    name: String,
    audience: String,
}

impl TokenManager {
    /// Create a new [`TokenManager`] instance.
    pub fn new(name: &str, secret: &str) -> Self {
        Self {
            algorithm: Algorithm::HS256,
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            name: name.to_owned(),
            audience: name.to_owned(),
        }
    }

    /// Set `audience` field on tokens.
    pub fn audience(&mut self, audience: &str) {
        self.audience = audience.to_owned();
    }

    /// Create a new signed token for a user.
    pub fn create(&self, user_id: i64, email: &str, role: Role) -> Result<String> {
        let time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|err| ServerError::internal("time went backwards", err))?
            .as_secs();
        let header = Header::new(self.algorithm);
        let claims = Claims {
            aud: self.audience.clone(),
            exp: time + EXPIRATION_TIME,
            iat: time,
            iss: self.name.clone(),
            sub: user_id,
            email: email.to_owned(),
            role,
        };

        encode(&header, &claims, &self.encoding_key)
            .map_err(|err| ServerError::internal("cannot sign token", err))
    }

    /// Decode and check a token.
    ///
    /// Any failure (expiry, forgery, malformed input) maps to
    /// [`ServerError::Unauthorized`], never to a 500.
    pub fn decode(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_audience(&[&self.audience]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| ServerError::Unauthorized)
    }

    /// `Set-Cookie` value establishing a session.
    pub fn session_cookie(&self, token: &str) -> String {
        let secure = if cfg!(debug_assertions) { "" } else { "; Secure" };
        format!(
            "{COOKIE_NAME}={token}; HttpOnly; SameSite=Strict; Path=/; Max-Age={EXPIRATION_TIME}{secure}"
        )
    }

    /// `Set-Cookie` value discarding the session.
    pub fn removal_cookie(&self) -> String {
        format!("{COOKIE_NAME}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0")
    }
}

/// Extract the session token from a `Cookie` header value.
pub fn from_cookie_header(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        pair.trim()
            .strip_prefix(COOKIE_NAME)
            .and_then(|rest| rest.strip_prefix('='))
            .filter(|value| !value.is_empty())
    })
}
