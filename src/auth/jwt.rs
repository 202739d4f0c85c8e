//! JWT token handling

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::AuthResult;
use crate::models::Role;

/// Token payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 signer/verifier keyed by the shared secret
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtManager {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Issue a token valid from now
    pub fn generate_token(&self, user_id: i64, role: Role) -> AuthResult<String> {
        self.generate_token_at(user_id, role, Utc::now())
    }

    /// Issue a token as if it were `issued_at`
    pub fn generate_token_at(
        &self,
        user_id: i64,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> AuthResult<String> {
        let claims = Claims {
            user_id,
            role,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Verify signature and expiry
    pub fn validate_token(&self, token: &str) -> AuthResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_carries_user_and_role() {
        let jwt = JwtManager::new("rahasia", 24);
        let token = jwt.generate_token(7, Role::Admin).unwrap();
        let claims = jwt.validate_token(&token).unwrap();

        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let jwt = JwtManager::new("rahasia", 24);
        let token = jwt
            .generate_token_at(7, Role::User, Utc::now() - Duration::hours(48))
            .unwrap();
        assert!(jwt.validate_token(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = JwtManager::new("satu", 24).generate_token(1, Role::User).unwrap();
        assert!(JwtManager::new("dua", 24).validate_token(&token).is_err());
        assert!(JwtManager::new("satu", 24).validate_token("bukan.token.jwt").is_err());
    }
}
