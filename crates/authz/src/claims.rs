//! Token claims model (transport-agnostic).
//!
//! Credential verification and token issuance belong to the identity layer;
//! this module only validates the decoded claims deterministically and defines
//! the seam (`JwtValidator`) the HTTP boundary plugs into.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use warden_core::UserId;

/// The minimal set of claims warden expects once a token has been decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorClaims {
    /// Subject / actor identifier.
    pub sub: UserId,

    /// Display identity for audit rendering.
    pub username: String,
    pub email: String,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    #[error("malformed token: {0}")]
    Malformed(String),
}

/// Deterministically validate claims.
///
/// Note: this validates the *claims* only. Signature verification / decoding
/// happens in the [`JwtValidator`] implementation.
pub fn validate_claims(
    claims: &ActorClaims,
    now: DateTime<Utc>,
) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

/// Seam for bearer-token verification at the HTTP boundary.
pub trait JwtValidator: Send + Sync {
    fn validate(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<ActorClaims, TokenValidationError>;
}

/// HS256 token validator.
pub struct Hs256JwtValidator {
    key: DecodingKey,
}

impl Hs256JwtValidator {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_ref()),
        }
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<ActorClaims, TokenValidationError> {
        // Expiry is checked by `validate_claims` against the caller's clock,
        // not by the decoder (our claims carry RFC 3339 timestamps, not `exp`).
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<ActorClaims>(token, &self.key, &validation)
            .map_err(|e| TokenValidationError::Malformed(e.to_string()))?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}
