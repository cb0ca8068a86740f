//! Authentication service with login, register, and token management

use std::sync::Arc;

use tracing::{info, warn};

use tms_security::jwt::JwtService;
use tms_security::password::{PasswordError, PasswordService};
use tms_security::token;

use crate::domain::{Role, User};
use crate::error::DomainError;
use crate::repositories::{NewUser, UserRepository};

pub struct AuthService<R: UserRepository> {
    user_repo: Arc<R>,
    jwt: JwtService,
}

#[derive(Debug, Clone)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user: UserInfo,
    pub tokens: AuthTokens,
}

#[derive(Debug, Clone)]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub team_id: Option<i64>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            team_id: user.team_id,
        }
    }
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(user_repo: Arc<R>, jwt: JwtService) -> Self {
        Self { user_repo, jwt }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, DomainError> {
        info!("Login attempt for email: {}", email);

        let user = self.user_repo.find_by_email(email).await?.ok_or_else(|| {
            warn!("Login failed: email not found: {}", email);
            DomainError::InvalidCredentials
        })?;

        if !user.can_login() {
            warn!("Login failed: user not active: {}", email);
            return Err(DomainError::UserNotActive);
        }

        let stored_hash = user.password_hash.as_ref().ok_or(DomainError::InvalidCredentials)?;
        let password_valid = PasswordService::verify(password, stored_hash)
            .map_err(|_| DomainError::InvalidCredentials)?;
        if !password_valid {
            warn!("Login failed: invalid password for: {}", email);
            return Err(DomainError::InvalidCredentials);
        }

        let tokens = self.issue_tokens(&user).await?;

        info!("Login successful for: {}", email);
        Ok(LoginResult { user: UserInfo::from(&user), tokens })
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
        team_id: Option<i64>,
    ) -> Result<UserInfo, DomainError> {
        info!("Registration attempt for email: {}", email);

        if self.user_repo.find_by_email(email).await?.is_some() {
            warn!("Registration failed: email already exists: {}", email);
            return Err(DomainError::EmailAlreadyExists(email.to_string()));
        }

        PasswordService::check_strength(password, &[name, email]).map_err(|e| match e {
            PasswordError::TooWeak => DomainError::PasswordTooWeak,
            other => DomainError::InternalError(other.to_string()),
        })?;

        let password_hash = PasswordService::hash(password)
            .map_err(|e| DomainError::InternalError(e.to_string()))?;

        let created = self
            .user_repo
            .create(&NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
                role,
                team_id,
            })
            .await?;

        info!("Registration successful for: {}", email);
        Ok(UserInfo::from(&created))
    }

    /// Rotate both tokens off a valid refresh token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<LoginResult, DomainError> {
        let fingerprint = token::fingerprint(refresh_token);
        let user = self
            .user_repo
            .find_by_refresh_token_hash(&fingerprint)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        if !user.is_active {
            return Err(DomainError::UserNotActive);
        }

        let tokens = self.issue_tokens(&user).await?;
        Ok(LoginResult { user: UserInfo::from(&user), tokens })
    }

    pub async fn logout(&self, user_id: i64) -> Result<(), DomainError> {
        self.user_repo.clear_refresh_token(user_id).await?;
        info!("User {} logged out", user_id);
        Ok(())
    }

    async fn issue_tokens(&self, user: &User) -> Result<AuthTokens, DomainError> {
        let access_token = self
            .jwt
            .generate_access_token(user.id, user.role.as_str())
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;

        // Opaque refresh token; only its fingerprint is persisted.
        let refresh_token = token::generate_refresh_token();
        self.user_repo
            .record_login(user.id, &token::fingerprint(&refresh_token))
            .await?;

        Ok(AuthTokens { access_token, refresh_token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::user_repository::MockUserRepository;
    use chrono::Utc;

    fn jwt() -> JwtService {
        JwtService::new("unit-secret".into(), 900, 604800)
    }

    fn user(password: &str) -> User {
        User {
            id: 3,
            name: "Asha".into(),
            email: "asha@example.com".into(),
            password_hash: Some(PasswordService::hash(password).unwrap()),
            role: Role::TenderExecutive,
            team_id: Some(2),
            is_active: true,
            refresh_token_hash: None,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn login_issues_tokens_and_records_fingerprint() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(user("tr0ub4dor&3 horse cell"))));
        repo.expect_record_login()
            .withf(|id, hash| *id == 3 && hash.len() == 64)
            .returning(|_, _| Ok(()));

        let svc = AuthService::new(Arc::new(repo), jwt());
        let result = svc.login("asha@example.com", "tr0ub4dor&3 horse cell").await.unwrap();
        assert_eq!(result.user.id, 3);
        assert!(!result.tokens.access_token.is_empty());
        assert_ne!(result.tokens.access_token, result.tokens.refresh_token);
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(user("tr0ub4dor&3 horse cell"))));

        let svc = AuthService::new(Arc::new(repo), jwt());
        let err = svc.login("asha@example.com", "nope").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn inactive_users_cannot_login() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| {
            let mut u = user("tr0ub4dor&3 horse cell");
            u.is_active = false;
            Ok(Some(u))
        });

        let svc = AuthService::new(Arc::new(repo), jwt());
        let err = svc.login("asha@example.com", "tr0ub4dor&3 horse cell").await.unwrap_err();
        assert!(matches!(err, DomainError::UserNotActive));
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(user("tr0ub4dor&3 horse cell"))));

        let svc = AuthService::new(Arc::new(repo), jwt());
        let err = svc
            .register("Asha", "asha@example.com", "tr0ub4dor&3 horse cell", Role::TenderExecutive, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::EmailAlreadyExists(_)));
    }

    #[tokio::test]
    async fn register_rejects_weak_passwords() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let svc = AuthService::new(Arc::new(repo), jwt());
        let err = svc
            .register("Asha", "asha@example.com", "password1", Role::TenderExecutive, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::PasswordTooWeak));
    }
}
