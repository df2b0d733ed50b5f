/// Admin allow-list and authorization decisions
///
/// The allow-list is the configured admin address plus every `admin_users` row.
/// It is held behind an ArcSwap so request handlers read a consistent snapshot
/// without locking, and admin-user changes swap in a fresh one atomically.

use crate::content::storage::ContentStorage;
use crate::error::AppResult;
use arc_swap::ArcSwap;
use std::collections::HashSet;
use std::sync::Arc;

/// Immutable snapshot of who may use the console
#[derive(Debug, Clone)]
pub struct AccessList {
    primary: String,
    allowed: HashSet<String>,
}

impl AccessList {
    pub fn new(primary: &str, allowed: impl IntoIterator<Item = String>) -> Self {
        Self {
            primary: primary.trim().to_lowercase(),
            allowed: allowed.into_iter().map(|e| e.trim().to_lowercase()).collect(),
        }
    }

    /// Case-insensitive membership
    pub fn allows(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        !email.is_empty() && (email == self.primary || self.allowed.contains(&email))
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }
}

/// Outcome of checking a request against the allow-list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    Allowed { email: String },
    /// Development bypass via the dev-login flag
    DevBypass,
    RedirectToLogin,
}

/// Decide whether a request may enter `/admin`
pub fn authorize(session_email: Option<&str>, access: &AccessList, dev_login: bool) -> Authorization {
    match session_email {
        Some(email) if access.allows(email) => Authorization::Allowed {
            email: email.trim().to_lowercase(),
        },
        _ if dev_login => Authorization::DevBypass,
        _ => Authorization::RedirectToLogin,
    }
}

/// Hot-reloadable allow-list
#[derive(Debug)]
pub struct AccessRegistry {
    list: ArcSwap<AccessList>,
    primary: String,
    storage: ContentStorage,
}

impl AccessRegistry {
    pub fn new(primary: &str, storage: ContentStorage) -> Self {
        Self {
            list: ArcSwap::new(Arc::new(AccessList::new(primary, Vec::new()))),
            primary: primary.to_string(),
            storage,
        }
    }

    /// Rebuild the snapshot from admin_users and swap it in
    pub async fn reload(&self) -> AppResult<()> {
        let users = self.storage.list_admin_users().await?;
        let count = users.len();
        let list = AccessList::new(&self.primary, users.into_iter().map(|u| u.email));
        self.list.store(Arc::new(list));

        tracing::info!("🔑 Admin allow-list reloaded ({} users)", count);
        Ok(())
    }

    pub fn snapshot(&self) -> Arc<AccessList> {
        self.list.load_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::database::ContentDatabase;

    fn access() -> AccessList {
        AccessList::new("Owner@Studio.Example", vec!["editor@studio.example".to_string()])
    }

    #[test]
    fn primary_address_matches_case_insensitively() {
        assert_eq!(
            authorize(Some("OWNER@studio.example"), &access(), false),
            Authorization::Allowed { email: "owner@studio.example".to_string() }
        );
    }

    #[test]
    fn other_addresses_are_redirected_to_login() {
        assert_eq!(
            authorize(Some("intruder@example.com"), &access(), false),
            Authorization::RedirectToLogin
        );
        assert_eq!(authorize(None, &access(), false), Authorization::RedirectToLogin);
    }

    #[test]
    fn dev_login_flag_bypasses_the_check() {
        assert_eq!(authorize(None, &access(), true), Authorization::DevBypass);
        assert_eq!(
            authorize(Some("intruder@example.com"), &access(), true),
            Authorization::DevBypass
        );
    }

    #[test]
    fn allow_listed_addresses_are_admitted() {
        assert!(access().allows(" Editor@Studio.example "));
        assert!(!access().allows(""));
    }

    #[tokio::test]
    async fn reload_picks_up_new_admin_users() {
        let db = ContentDatabase::in_memory().await.unwrap();
        let storage = ContentStorage::new(db.pool());
        let registry = AccessRegistry::new("owner@studio.example", storage.clone());

        assert!(!registry.snapshot().allows("editor@studio.example"));

        storage.upsert_admin_user("editor@studio.example", None).await.unwrap();
        registry.reload().await.unwrap();

        assert!(registry.snapshot().allows("editor@studio.example"));
        assert!(registry.snapshot().allows("owner@studio.example"));
    }
}
