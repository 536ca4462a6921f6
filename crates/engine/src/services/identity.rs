//! Identity & access: registration, login, refresh, token validation.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    EngineError, NewUser, ResultEngine, User, UserStore,
    auth::{self, TokenIssuer, TokenType},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Hashes the password and stores a new user. A taken email is `Conflict`.
    async fn register(&self, name: &str, email: &str, password: &str) -> ResultEngine<User>;

    /// Unknown email and wrong password both yield `InvalidCredentials`.
    async fn authenticate(&self, email: &str, password: &str) -> ResultEngine<TokenPair>;

    /// Exchanges a refresh token for a new access token. The refresh token
    /// itself is not rotated.
    async fn refresh(&self, refresh_token: &str) -> ResultEngine<String>;

    /// Pure check of signature, expiry and type tag; no store lookup.
    fn validate(&self, token: &str, expected: TokenType) -> ResultEngine<Uuid>;

    async fn profile(&self, user_id: Uuid) -> ResultEngine<User>;
}

pub struct Auth<S> {
    store: S,
    issuer: TokenIssuer,
    bcrypt_cost: u32,
}

impl<S> Auth<S> {
    pub fn new(store: S, issuer: TokenIssuer, bcrypt_cost: u32) -> Self {
        Self {
            store,
            issuer,
            bcrypt_cost,
        }
    }
}

fn validate_registration(name: &str, email: &str, password: &str) -> ResultEngine<(String, String)> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > 100 {
        return Err(EngineError::Validation(
            "name must be between 1 and 100 characters".to_string(),
        ));
    }

    let email = email.trim().to_lowercase();
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    };
    if !well_formed {
        return Err(EngineError::Validation("invalid email".to_string()));
    }

    if password.is_empty() {
        return Err(EngineError::Validation("password is required".to_string()));
    }
    Ok((name.to_string(), email))
}

#[async_trait]
impl<S: UserStore> AuthService for Auth<S> {
    async fn register(&self, name: &str, email: &str, password: &str) -> ResultEngine<User> {
        let (name, email) = validate_registration(name, email, password)?;
        let password_hash = auth::hash_password(password, self.bcrypt_cost)?;

        let user = self
            .store
            .create_user(NewUser {
                name,
                email,
                password_hash,
            })
            .await?;
        tracing::info!("registered user {}", user.id);
        Ok(user)
    }

    async fn authenticate(&self, email: &str, password: &str) -> ResultEngine<TokenPair> {
        let email = email.trim().to_lowercase();
        let Some(credentials) = self.store.credentials_by_email(&email).await? else {
            tracing::debug!("login rejected: unknown email");
            return Err(EngineError::InvalidCredentials);
        };
        if !auth::verify_password(password, &credentials.password_hash)? {
            tracing::debug!("login rejected: password mismatch for {}", credentials.user.id);
            return Err(EngineError::InvalidCredentials);
        }

        let user_id = credentials.user.id;
        Ok(TokenPair {
            access_token: self.issuer.issue(user_id, TokenType::Access)?,
            refresh_token: self.issuer.issue(user_id, TokenType::Refresh)?,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> ResultEngine<String> {
        let user_id = self.issuer.validate(refresh_token, TokenType::Refresh)?;
        self.issuer.issue(user_id, TokenType::Access)
    }

    fn validate(&self, token: &str, expected: TokenType) -> ResultEngine<Uuid> {
        self.issuer.validate(token, expected)
    }

    async fn profile(&self, user_id: Uuid) -> ResultEngine<User> {
        self.store
            .user_by_id(user_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(user_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::services::fakes::MemoryStore;

    fn service() -> Auth<MemoryStore> {
        let issuer = TokenIssuer::new("secret", Duration::minutes(15), Duration::days(7));
        Auth::new(MemoryStore::default(), issuer, 4)
    }

    #[tokio::test]
    async fn register_then_login_round_trip() {
        let auth = service();
        let user = auth.register("A", "a@x.com", "pw123").await.unwrap();

        let tokens = auth.authenticate("a@x.com", "pw123").await.unwrap();

        assert_eq!(
            auth.validate(&tokens.access_token, TokenType::Access).unwrap(),
            user.id
        );
        assert_eq!(
            auth.validate(&tokens.refresh_token, TokenType::Refresh).unwrap(),
            user.id
        );
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let auth = service();
        auth.register("A", "a@x.com", "pw123").await.unwrap();

        let wrong_password = auth.authenticate("a@x.com", "pw124").await.unwrap_err();
        let unknown = auth.authenticate("b@x.com", "pw123").await.unwrap_err();

        assert_eq!(wrong_password, EngineError::InvalidCredentials);
        assert_eq!(unknown, EngineError::InvalidCredentials);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let auth = service();
        auth.register("A", "a@x.com", "pw123").await.unwrap();

        let err = auth.register("B", "A@X.com", "pw123").await.unwrap_err();

        assert!(matches!(err, EngineError::Conflict(_)));
    }

    #[tokio::test]
    async fn refresh_issues_access_token() {
        let auth = service();
        let user = auth.register("A", "a@x.com", "pw123").await.unwrap();
        let tokens = auth.authenticate("a@x.com", "pw123").await.unwrap();

        let access = auth.refresh(&tokens.refresh_token).await.unwrap();

        assert_eq!(auth.validate(&access, TokenType::Access).unwrap(), user.id);
        assert_eq!(
            auth.refresh(&tokens.access_token).await,
            Err(EngineError::InvalidToken)
        );
    }

    #[tokio::test]
    async fn registration_input_is_validated() {
        let auth = service();
        for (name, email, password) in [
            ("", "a@x.com", "pw123"),
            ("A", "ax.com", "pw123"),
            ("A", "@x.com", "pw123"),
            ("A", "a@", "pw123"),
            ("A", "a@b@c", "pw123"),
            ("A", "a@x.com", ""),
        ] {
            let err = auth.register(name, email, password).await.unwrap_err();
            assert!(matches!(err, EngineError::Validation(_)), "{name} {email}");
        }
    }

    #[tokio::test]
    async fn profile_of_missing_user_is_not_found() {
        let err = service().profile(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }
}
