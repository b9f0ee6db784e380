//! `SeaORM` implementation of the `AuthService` trait.

use std::sync::Arc;

use crate::config::SecurityConfig;
use crate::db::{Store, User, is_unique_violation};
use crate::entities::users::Role;
use crate::services::auth_service::{AuthError, AuthService, AuthenticationResponse};
use crate::services::token::{Claims, TokenIssuer};
use async_trait::async_trait;
use tracing::{info, warn};

pub struct SeaOrmAuthService {
    store: Store,
    tokens: Arc<TokenIssuer>,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, tokens: Arc<TokenIssuer>, security: SecurityConfig) -> Self {
        Self {
            store,
            tokens,
            security,
        }
    }
}

fn require_non_empty(value: &str, field: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn map_write_error(err: anyhow::Error) -> AuthError {
    if is_unique_violation(&err) {
        AuthError::Conflict("Email is already registered".to_string())
    } else {
        AuthError::Database(format!("{err:#}"))
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthenticationResponse, AuthError> {
        require_non_empty(username, "Username")?;
        require_non_empty(email, "Email")?;
        if password.is_empty() {
            return Err(AuthError::Validation("Password is required".to_string()));
        }

        // Self-registration never grants anything above Technicien.
        let user = self
            .store
            .create_user(username, email, password, Role::Technicien, &self.security)
            .await
            .map_err(map_write_error)?;

        let token = self.tokens.issue(&user)?;

        info!(user_id = user.id, "Registered new user {}", user.email);

        Ok(AuthenticationResponse::new(token, &user))
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticationResponse, AuthError> {
        let is_valid = self
            .store
            .verify_user_password(email, password, &self.security)
            .await?;

        if !is_valid {
            metrics::counter!("auth_attempts_total", "outcome" => "rejected").increment(1);
            warn!("Rejected credentials for {email}");
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .store
            .get_user_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let token = self.tokens.issue(&user)?;

        metrics::counter!("auth_attempts_total", "outcome" => "accepted").increment(1);

        Ok(AuthenticationResponse::new(token, &user))
    }

    async fn update_user(
        &self,
        user_id: i32,
        username: &str,
        email: &str,
    ) -> Result<(), AuthError> {
        require_non_empty(username, "Username")?;
        require_non_empty(email, "Email")?;

        self.store
            .update_user_profile(user_id, username, email)
            .await
            .map_err(map_write_error)?
            .ok_or(AuthError::UserNotFound)?;

        info!(user_id, "Updated user profile");
        Ok(())
    }

    async fn current_user(&self, user_id: i32) -> Result<User, AuthError> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        Ok(self.tokens.verify(token)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_security() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            jwt_secret: "test-secret-test-secret-test-secret!".to_string(),
            ..SecurityConfig::default()
        }
    }

    async fn service() -> (SeaOrmAuthService, Store) {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let security = fast_security();
        let tokens = Arc::new(TokenIssuer::new(&security));
        (
            SeaOrmAuthService::new(store.clone(), tokens, security),
            store,
        )
    }

    #[tokio::test]
    async fn register_always_creates_technicien() {
        let (svc, store) = service().await;

        let resp = svc.register("alice", "alice@x.com", "pw1").await.unwrap();
        assert_eq!(resp.role, "Technicien");
        assert_eq!(resp.email, "alice@x.com");
        assert_eq!(resp.username, "alice");

        let stored = store.get_user(resp.id).await.unwrap().unwrap();
        assert_eq!(stored.role, Role::Technicien);
    }

    #[tokio::test]
    async fn register_then_authenticate_yields_decodable_token() {
        let (svc, _) = service().await;
        svc.register("alice", "alice@x.com", "pw1").await.unwrap();

        let resp = svc.authenticate("alice@x.com", "pw1").await.unwrap();
        let claims = svc.verify_token(&resp.token).unwrap();
        assert_eq!(claims.role, Role::Technicien);
        assert_eq!(claims.sub, "alice@x.com");
        assert_eq!(claims.user_id, resp.id);
    }

    #[tokio::test]
    async fn authenticate_reflects_role_at_issuance() {
        let (svc, store) = service().await;
        let registered = svc.register("carol", "carol@x.com", "pw").await.unwrap();

        store
            .set_user_role(registered.id, Role::Admin)
            .await
            .unwrap();

        let resp = svc.authenticate("carol@x.com", "pw").await.unwrap();
        assert_eq!(resp.role, "Admin");
        assert_eq!(svc.verify_token(&resp.token).unwrap().role, Role::Admin);

        // The registration token still carries the old role.
        let old = svc.verify_token(&registered.token).unwrap();
        assert_eq!(old.role, Role::Technicien);
    }

    #[tokio::test]
    async fn wrong_credentials_never_issue_token_or_mutate() {
        let (svc, store) = service().await;
        let registered = svc.register("alice", "alice@x.com", "pw1").await.unwrap();
        let before = store.get_user(registered.id).await.unwrap().unwrap();

        let err = svc.authenticate("alice@x.com", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        let err = svc.authenticate("nobody@x.com", "pw1").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        let after = store.get_user(registered.id).await.unwrap().unwrap();
        assert_eq!(before, after);
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_user_changes_only_username_and_email() {
        let (svc, store) = service().await;
        let registered = svc.register("alice", "alice@x.com", "pw1").await.unwrap();

        svc.update_user(registered.id, "alice2", "alice2@x.com")
            .await
            .unwrap();

        let updated = store.get_user(registered.id).await.unwrap().unwrap();
        assert_eq!(updated.username, "alice2");
        assert_eq!(updated.email, "alice2@x.com");
        assert_eq!(updated.role, Role::Technicien);

        // Password hash untouched: old password still works under the new email.
        assert!(svc.authenticate("alice2@x.com", "pw1").await.is_ok());
    }

    #[tokio::test]
    async fn update_missing_user_is_not_found() {
        let (svc, store) = service().await;

        let err = svc.update_user(999, "ghost", "ghost@x.com").await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
        assert!(store.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_fields_are_rejected() {
        let (svc, store) = service().await;

        assert!(matches!(
            svc.register("", "a@x.com", "pw").await,
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            svc.register("a", "a@x.com", "").await,
            Err(AuthError::Validation(_))
        ));
        assert!(store.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let (svc, _) = service().await;
        svc.register("alice", "alice@x.com", "pw1").await.unwrap();

        let err = svc.register("other", "alice@x.com", "pw2").await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_to_taken_email_is_conflict() {
        let (svc, store) = service().await;
        svc.register("alice", "alice@x.com", "pw1").await.unwrap();
        let bob = svc.register("bob", "bob@x.com", "pw2").await.unwrap();

        let err = svc
            .update_user(bob.id, "bobby", "alice@x.com")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)));

        let stored = store.get_user(bob.id).await.unwrap().unwrap();
        assert_eq!(stored.username, "bob");
        assert_eq!(stored.email, "bob@x.com");
    }
}
