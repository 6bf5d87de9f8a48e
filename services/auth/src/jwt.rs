//! Access token payload decoding
//!
//! The backend signs and verifies its own tokens. Here we only read the
//! payload to learn who logged in and when the token expires, so the signature
//! is not checked and no key is configured.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::error::AuthError;

/// Claims the backend puts in its access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User ID
    #[serde(deserialize_with = "string_or_number")]
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Display name
    #[serde(default, alias = "full_name")]
    pub name: Option<String>,
    /// Role code (e.g. "coordenador")
    #[serde(default, alias = "role")]
    pub role_code: Option<String>,
    #[serde(default)]
    pub organization_id: Option<i64>,
    /// Permission flags, sent either as a map or as a list of granted names
    #[serde(default, deserialize_with = "permission_flags")]
    pub permissions: HashMap<String, bool>,
    /// Expiration time (seconds since epoch)
    #[serde(default)]
    pub exp: Option<i64>,
    /// Issued at time
    #[serde(default)]
    pub iat: Option<i64>,
}

/// Decode the payload of `token` without verifying its signature
pub fn decode_claims(token: &str) -> Result<TokenClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let token_data = decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    })
}

fn permission_flags<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<HashMap<String, bool>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flags {
        Map(HashMap<String, bool>),
        List(Vec<String>),
    }

    Ok(match Option::<Flags>::deserialize(deserializer)? {
        Some(Flags::Map(map)) => map,
        Some(Flags::List(names)) => names.into_iter().map(|name| (name, true)).collect(),
        None => HashMap::new(),
    })
}
