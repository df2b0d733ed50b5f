/// Admin account operations
///
/// Sign-in, sign-out, session lookup, password reset and allow-list
/// maintenance. Every change to admin_users reloads the access snapshot.

use crate::auth::access::AccessRegistry;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::{Session, SessionStore};
use crate::content::storage::ContentStorage;
use crate::content::types::AdminUser;
use crate::error::{AppError, AppResult};
use crate::mail::{password_reset_email, Mailer};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AuthService {
    storage: ContentStorage,
    sessions: Arc<SessionStore>,
    access: Arc<AccessRegistry>,
    mailer: Mailer,
    base_url: String,
    site_name: String,
}

impl AuthService {
    pub fn new(
        storage: ContentStorage,
        sessions: Arc<SessionStore>,
        access: Arc<AccessRegistry>,
        mailer: Mailer,
        base_url: &str,
        site_name: &str,
    ) -> Self {
        Self {
            storage,
            sessions,
            access,
            mailer,
            base_url: base_url.trim_end_matches('/').to_string(),
            site_name: site_name.to_string(),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn access(&self) -> &AccessRegistry {
        &self.access
    }

    /// Create the primary admin account if it does not exist yet
    pub async fn bootstrap(&self, email: &str, password: &str) -> AppResult<()> {
        if self.storage.get_admin_user(email).await?.is_some() {
            tracing::debug!("Primary admin {} already exists", email);
            return Ok(());
        }

        let hash = hash_password(password)?;
        self.storage.upsert_admin_user(email, Some(&hash)).await?;
        self.access.reload().await?;

        tracing::info!("👤 Bootstrapped primary admin {}", email);
        Ok(())
    }

    /// Verify credentials and open a session
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<Session> {
        let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

        let user = self.storage.get_admin_user(email).await?.ok_or_else(invalid)?;
        let hash = user.password_hash.as_deref().ok_or_else(invalid)?;
        if !verify_password(password, hash) {
            tracing::warn!("🚫 Failed sign-in for {}", user.email);
            return Err(invalid());
        }

        if !self.access.snapshot().allows(&user.email) {
            return Err(AppError::Unauthorized(format!("{} is not an admin", user.email)));
        }

        Ok(self.sessions.create(&user.email).await)
    }

    pub async fn get_session(&self, token: &str) -> Option<Session> {
        self.sessions.get(token).await
    }

    pub async fn sign_out(&self, token: &str) {
        if self.sessions.revoke(token).await {
            tracing::info!("🔓 Session closed");
        }
    }

    /// Email a reset link when the address belongs to an admin.
    /// Unknown addresses and delivery failures are only logged.
    pub async fn reset_password_for_email(&self, email: &str) -> AppResult<()> {
        let Some(user) = self.storage.get_admin_user(email).await? else {
            tracing::info!("Password reset requested for unknown address {}", email.trim());
            return Ok(());
        };

        let token = self.sessions.create_reset_token(&user.email).await;
        let url = format!("{}/admin/reset-password?token={}", self.base_url, token);
        let message = password_reset_email(&user.email, &url, &self.site_name);

        if let Err(e) = self.mailer.send(&message).await {
            tracing::error!("❌ Could not send password reset to {}: {}", user.email, e);
        }
        Ok(())
    }

    /// Redeem a reset token and set the new password; signs the user out everywhere.
    /// A rejected password leaves the token usable for another attempt.
    pub async fn confirm_password_reset(&self, token: &str, password: &str) -> AppResult<()> {
        let hash = hash_password(password)?;

        let email = self
            .sessions
            .consume_reset_token(token)
            .await
            .ok_or_else(|| AppError::Unauthorized("Reset link is invalid or expired".to_string()))?;

        self.storage.set_admin_password(&email, &hash).await?;
        let closed = self.sessions.revoke_email(&email).await;

        tracing::info!("🔑 Password reset for {} ({} sessions closed)", email, closed);
        Ok(())
    }

    pub async fn list_admin_users(&self) -> AppResult<Vec<AdminUser>> {
        self.storage.list_admin_users().await
    }

    /// Allow-list an address, optionally setting its password
    pub async fn add_admin_user(&self, email: &str, password: Option<&str>) -> AppResult<AdminUser> {
        let hash = match password.filter(|p| !p.is_empty()) {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let user = self.storage.upsert_admin_user(email, hash.as_deref()).await?;
        self.access.reload().await?;
        Ok(user)
    }

    /// Remove an address from the allow-list and close its sessions.
    /// The configured primary admin cannot be removed.
    pub async fn remove_admin_user(&self, email: &str) -> AppResult<()> {
        if self.access.snapshot().primary() == email.trim().to_lowercase() {
            return Err(AppError::Validation("The primary admin cannot be removed".to_string()));
        }

        if !self.storage.delete_admin_user(email).await? {
            return Err(AppError::NotFound(format!("Admin user {}", email)));
        }
        self.sessions.revoke_email(email).await;
        self.access.reload().await?;

        tracing::info!("👤 Removed admin user {}", email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MailConfig;
    use crate::content::database::ContentDatabase;

    async fn service() -> AuthService {
        let db = ContentDatabase::in_memory().await.unwrap();
        let storage = ContentStorage::new(db.pool());
        let access = Arc::new(AccessRegistry::new("owner@studio.example", storage.clone()));
        let mailer = Mailer::new(MailConfig {
            api_url: "http://127.0.0.1:9/emails".to_string(),
            api_key: None,
            from: "Studio <noreply@studio.example>".to_string(),
            inbox: "owner@studio.example".to_string(),
        });
        AuthService::new(
            storage,
            Arc::new(SessionStore::new(12)),
            access,
            mailer,
            "https://studio.example",
            "Studio",
        )
    }

    #[tokio::test]
    async fn bootstrap_then_sign_in() {
        let auth = service().await;
        auth.bootstrap("owner@studio.example", "correct horse").await.unwrap();

        let session = auth.sign_in_with_password("Owner@Studio.Example", "correct horse").await.unwrap();
        assert_eq!(session.email, "owner@studio.example");
        assert!(auth.get_session(&session.token).await.is_some());

        auth.sign_out(&session.token).await;
        assert!(auth.get_session(&session.token).await.is_none());
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let auth = service().await;
        auth.bootstrap("owner@studio.example", "correct horse").await.unwrap();

        let err = auth.sign_in_with_password("owner@studio.example", "battery staple").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
        let err = auth.sign_in_with_password("nobody@studio.example", "correct horse").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn password_reset_replaces_the_password_and_closes_sessions() {
        let auth = service().await;
        auth.bootstrap("owner@studio.example", "correct horse").await.unwrap();
        let session = auth.sign_in_with_password("owner@studio.example", "correct horse").await.unwrap();

        // Delivery fails (no API key) but the request still succeeds
        auth.reset_password_for_email("owner@studio.example").await.unwrap();

        let token = auth.sessions().create_reset_token("owner@studio.example").await;
        auth.confirm_password_reset(&token, "new password!").await.unwrap();

        assert!(auth.get_session(&session.token).await.is_none());
        assert!(auth.sign_in_with_password("owner@studio.example", "new password!").await.is_ok());
        assert!(auth.sign_in_with_password("owner@studio.example", "correct horse").await.is_err());
    }

    #[tokio::test]
    async fn rejected_password_keeps_the_reset_token() {
        let auth = service().await;
        auth.bootstrap("owner@studio.example", "correct horse").await.unwrap();
        let token = auth.sessions().create_reset_token("owner@studio.example").await;

        let err = auth.confirm_password_reset(&token, "short").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        auth.confirm_password_reset(&token, "long enough pw").await.unwrap();
        assert!(auth.sign_in_with_password("owner@studio.example", "long enough pw").await.is_ok());

        // Redeemed tokens are single-use
        let err = auth.confirm_password_reset(&token, "another password").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn removed_users_lose_access() {
        let auth = service().await;
        auth.add_admin_user("editor@studio.example", Some("editor pass")).await.unwrap();
        assert!(auth.access().snapshot().allows("editor@studio.example"));

        let session = auth.sign_in_with_password("editor@studio.example", "editor pass").await.unwrap();
        auth.remove_admin_user("editor@studio.example").await.unwrap();

        assert!(!auth.access().snapshot().allows("editor@studio.example"));
        assert!(auth.get_session(&session.token).await.is_none());
    }

    #[tokio::test]
    async fn primary_admin_cannot_be_removed() {
        let auth = service().await;
        auth.bootstrap("owner@studio.example", "correct horse").await.unwrap();
        assert!(matches!(
            auth.remove_admin_user("OWNER@studio.example").await,
            Err(AppError::Validation(_))
        ));
    }
}
