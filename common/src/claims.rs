// common/src/claims.rs
//! Reads the claims embedded in a bearer token.
//!
//! The signature is NOT verified: the dashboard only uses the claims to decide
//! where to send the user and whether the token has run out. Every backend
//! request carries the token and is authorized server-side.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DecodeError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub email: String,
    /// Raw role claim; may hold values outside [`crate::models::Role`]
    pub role: String,
    pub name: Option<String>,
    /// `iat`, seconds since the epoch
    pub issued_at: i64,
    /// `exp`, seconds since the epoch
    pub expiry: i64,
}

impl Claims {
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expiry <= now
    }
}

#[derive(Debug, Deserialize)]
struct RawClaims {
    id: Option<Value>,
    sub: Option<Value>,
    email: Option<String>,
    role: Option<String>,
    name: Option<String>,
    iat: Option<i64>,
    exp: Option<i64>,
}

fn id_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decode the payload of `token` without checking its signature or its clock claims
pub fn decode_claims(token: &str) -> Result<Claims, DecodeError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let raw = decode::<RawClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| DecodeError::Malformed(e.to_string()))?
        .claims;

    let id = raw
        .id
        .and_then(id_text)
        .or_else(|| raw.sub.and_then(id_text))
        .ok_or(DecodeError::MissingClaim("id"))?;

    Ok(Claims {
        id,
        email: raw.email.ok_or(DecodeError::MissingClaim("email"))?,
        role: raw.role.ok_or(DecodeError::MissingClaim("role"))?,
        name: raw.name,
        issued_at: raw.iat.ok_or(DecodeError::MissingClaim("iat"))?,
        expiry: raw.exp.ok_or(DecodeError::MissingClaim("exp"))?,
    })
}
