use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims as issued by the hosted auth service.
///
/// Providers vary in which extra claims they attach; only the fields below
/// are relied upon, and they are normalized into `AuthUser` at the
/// extraction boundary.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account ID (UUID).
    pub sub: String,
    /// Account email, when the issuer includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Expiration timestamp.
    pub exp: usize,
}

/// Issue a token with the same shape as the hosted auth service's.
///
/// The production issuer is external; this exists for tests and local
/// tooling that need a valid bearer token against a known secret.
pub fn sign(owner_id: Uuid, email: Option<&str>, secret: &str) -> Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::days(7))
        .expect("valid timestamp")
        .timestamp();

    let claims = Claims {
        sub: owner_id.to_string(),
        email: email.map(str::to_owned),
        exp: expiration as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify and decode a bearer token.
pub fn verify(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
