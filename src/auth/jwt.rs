//! JWT token generation and validation

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// User ID
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Subject, the user's email
    #[serde(default)]
    pub sub: String,
    /// Expiration timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

/// HS256 keys derived from the shared secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, lifetime: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        }
    }

    /// Generate a JWT token for a user
    pub fn generate_token(&self, id: i64, name: &str, email: &str) -> anyhow::Result<String> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?;

        let claims = Claims {
            id,
            name: name.to_owned(),
            email: email.to_owned(),
            sub: email.to_owned(),
            exp: Some((now + self.lifetime).as_secs()),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Validate and decode a JWT token
    ///
    /// Only HS256 is accepted. `exp` is checked when present but not required.
    pub fn validate_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();

        Ok(decode::<Claims>(token, &self.decoding, &validation)?.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key_minimum_32_characters_long";

    #[test]
    fn generated_tokens_validate() {
        let keys = JwtKeys::new(SECRET, Duration::from_secs(60));
        let token = keys.generate_token(7, "John", "john@recipehub.localhost").unwrap();

        let claims = keys.validate_token(&token).unwrap();

        assert_eq!(claims.id, 7);
        assert_eq!(claims.name, "John");
        assert_eq!(claims.sub, "john@recipehub.localhost");
        assert!(claims.exp.is_some());
    }

    #[test]
    fn tokens_from_another_secret_are_rejected() {
        let keys = JwtKeys::new(SECRET, Duration::from_secs(60));
        let other = JwtKeys::new("another_secret_key_minimum_32_characters", Duration::from_secs(60));
        let token = other.generate_token(7, "John", "john@recipehub.localhost").unwrap();

        assert!(keys.validate_token(&token).is_err());
    }

    #[test]
    fn tokens_without_identity_are_rejected() {
        let keys = JwtKeys::new(SECRET, Duration::from_secs(60));
        let token = encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({"sub": "john@recipehub.localhost"}),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(keys.validate_token(&token).is_err());
    }

    #[test]
    fn tokens_without_exp_are_accepted() {
        let keys = JwtKeys::new(SECRET, Duration::from_secs(60));
        let token = encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({"id": 1, "name": "Jane", "email": "jane@recipehub.localhost"}),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let claims = keys.validate_token(&token).unwrap();

        assert_eq!(claims.email, "jane@recipehub.localhost");
        assert_eq!(claims.exp, None);
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let keys = JwtKeys::new(SECRET, Duration::from_secs(60));
        let token = encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({"id": 1, "name": "Jane", "email": "jane@recipehub.localhost", "exp": 1_000}),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(keys.validate_token(&token).is_err());
    }
}
