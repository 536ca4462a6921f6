//! Password hashing and signed tokens.
//!
//! Tokens are HS256 JWTs carrying the user id in `sub` and a `token_type`
//! tag. Validation needs only the signing secret, so there is no server-side
//! revocation: a token stays valid until it expires.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Roughly 100ms per hash on commodity hardware.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

/// The claim set of every issued token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub token_type: TokenType,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies tokens with a server-held secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn issue(&self, user_id: Uuid, token_type: TokenType) -> ResultEngine<String> {
        let ttl = match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        };
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            token_type,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| EngineError::TokenSigning(err.to_string()))
    }

    /// Checks signature, expiry and type tag, then returns the subject.
    ///
    /// Every failure collapses into [`EngineError::InvalidToken`].
    pub fn validate(&self, token: &str, expected: TokenType) -> ResultEngine<Uuid> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|err| {
            tracing::debug!("token rejected: {err}");
            EngineError::InvalidToken
        })?;
        if data.claims.token_type != expected {
            tracing::debug!("token rejected: expected {expected:?} token");
            return Err(EngineError::InvalidToken);
        }
        Uuid::parse_str(&data.claims.sub).map_err(|_| EngineError::InvalidToken)
    }
}

pub fn hash_password(password: &str, cost: u32) -> ResultEngine<String> {
    bcrypt::hash(password, cost).map_err(|err| EngineError::Hashing(err.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> ResultEngine<bool> {
    bcrypt::verify(password, hash).map_err(|err| EngineError::Hashing(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret", Duration::minutes(15), Duration::days(7))
    }

    #[test]
    fn access_token_round_trip() {
        let issuer = issuer();
        let user_id = Uuid::new_v4();

        let token = issuer.issue(user_id, TokenType::Access).unwrap();

        assert_eq!(issuer.validate(&token, TokenType::Access).unwrap(), user_id);
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let issuer = issuer();
        let token = issuer.issue(Uuid::new_v4(), TokenType::Refresh).unwrap();

        assert_eq!(
            issuer.validate(&token, TokenType::Access),
            Err(EngineError::InvalidToken)
        );
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let other = TokenIssuer::new("other-secret", Duration::minutes(15), Duration::days(7));
        let token = other.issue(Uuid::new_v4(), TokenType::Access).unwrap();

        assert_eq!(
            issuer().validate(&token, TokenType::Access),
            Err(EngineError::InvalidToken)
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = TokenIssuer::new("test-secret", Duration::minutes(-5), Duration::days(7));
        let token = issuer.issue(Uuid::new_v4(), TokenType::Access).unwrap();

        assert_eq!(
            issuer.validate(&token, TokenType::Access),
            Err(EngineError::InvalidToken)
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(
            issuer().validate("not.a.token", TokenType::Access),
            Err(EngineError::InvalidToken)
        );
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("pw123", 4).unwrap();

        assert!(verify_password("pw123", &hash).unwrap());
        assert!(!verify_password("pw124", &hash).unwrap());
    }
}
