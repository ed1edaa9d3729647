//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{
    auth::{
        errors::AuthServiceError,
        models::{ApiTokenUuid, NewUser, User, UserUuid},
        repository::PgAuthRepository,
    },
    database::Db,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAuthRepository::new(),
        }
    }

    /// Create a user account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::AlreadyExists`] when the UUID or email is
    /// taken.
    pub async fn create_user(&self, user: NewUser) -> Result<User, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_user(&mut tx, &user).await?;

        tx.commit().await?;

        Ok(created)
    }

    /// Issue a fresh API token for a user and return the raw token.
    ///
    /// Only the hash is stored; the raw value cannot be recovered later.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::NotFound`] for an unknown user.
    pub async fn issue_token(&self, user: UserUuid) -> Result<String, AuthServiceError> {
        let raw_token = generate_token();

        let mut tx = self.db.begin().await?;

        self.repository
            .create_token(&mut tx, ApiTokenUuid::new(), user, &hash_token(&raw_token))
            .await?;

        tx.commit().await?;

        Ok(raw_token)
    }

    /// Revoke a token so it no longer authenticates.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::NotFound`] when the token does not exist
    /// or is already revoked.
    pub async fn revoke_token(&self, token: ApiTokenUuid) -> Result<(), AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.revoke_token(&mut tx, token).await?;

        if rows_affected == 0 {
            return Err(AuthServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, token: &str) -> Result<UserUuid, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let user = self
            .repository
            .find_user_by_token_hash(&mut tx, &hash_token(token))
            .await?;

        tx.commit().await?;

        user.ok_or(AuthServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a raw bearer token to the user it belongs to.
    async fn authenticate_bearer(&self, token: &str) -> Result<UserUuid, AuthServiceError>;
}

fn generate_token() -> String {
    format!("bz_{}{}", Uuid::now_v7().simple(), Uuid::now_v7().simple())
}

fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn issued_token_authenticates_its_user() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ana@example.com").await?;

        let token = ctx.auth.issue_token(user.uuid).await?;
        let resolved = ctx.auth.authenticate_bearer(&token).await?;

        assert_eq!(resolved, user.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_token_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.auth.authenticate_bearer("bz_not_a_real_token").await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn revoked_token_no_longer_authenticates() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ana@example.com").await?;

        let token = ctx.auth.issue_token(user.uuid).await?;

        // look the token row up through its hash to revoke it
        let token_uuid: uuid::Uuid = sqlx::query_scalar(
            "SELECT uuid FROM api_tokens WHERE user_uuid = $1",
        )
        .bind(user.uuid.into_uuid())
        .fetch_one(ctx.db.pool())
        .await?;

        ctx.auth
            .revoke_token(ApiTokenUuid::from_uuid(token_uuid))
            .await?;

        let result = ctx.auth.authenticate_bearer(&token).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound after revocation, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.create_user("ana@example.com").await?;

        let result = ctx
            .auth
            .create_user(NewUser {
                uuid: UserUuid::new(),
                email: "ana@example.com".to_string(),
                name: "Ana".to_string(),
            })
            .await;

        assert!(
            matches!(result, Err(AuthServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn token_hash_is_deterministic_and_hex() {
        let hash = hash_token("bz_example");

        assert_eq!(hash, hash_token("bz_example"));
        assert_eq!(hash.len(), 64, "SHA-256 hex digest length");
    }
}
