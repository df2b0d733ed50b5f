/// Admin sessions and password-reset tokens
///
/// Both live in memory only; a restart signs everybody out and voids pending
/// reset links.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::RwLock;

pub const SESSION_COOKIE: &str = "studio_session";
pub const DEV_LOGIN_COOKIE: &str = "admin_dev_login";

/// How long a reset link stays valid
const RESET_TTL_MINUTES: i64 = 60;

/// A signed-in admin
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    #[serde(skip_serializing)]
    pub token: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone)]
struct ResetToken {
    email: String,
    expires_at: DateTime<Utc>,
}

fn random_token() -> String {
    format!("{}{}", uuid::Uuid::new_v4().simple(), uuid::Uuid::new_v4().simple())
}

/// In-memory session and reset-token store
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    resets: RwLock<HashMap<String, ResetToken>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_hours: i64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            resets: RwLock::new(HashMap::new()),
            ttl: Duration::hours(ttl_hours.max(1)),
        }
    }

    /// Open a session for an authenticated email
    pub async fn create(&self, email: &str) -> Session {
        let now = Utc::now();
        let session = Session {
            token: random_token(),
            email: email.trim().to_lowercase(),
            created_at: now,
            expires_at: now + self.ttl,
        };

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| !s.is_expired(now));
        sessions.insert(session.token.clone(), session.clone());

        tracing::info!("🔐 Session opened for {}", session.email);
        session
    }

    /// Look up a live session; expired sessions are dropped
    pub async fn get(&self, token: &str) -> Option<Session> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                Some(session) if !session.is_expired(now) => return Some(session.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        self.sessions.write().await.remove(token);
        None
    }

    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Sign an address out everywhere (after a password change or removal)
    pub async fn revoke_email(&self, email: &str) -> usize {
        let email = email.trim().to_lowercase();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.email != email);
        before - sessions.len()
    }

    /// Issue a one-hour reset token
    pub async fn create_reset_token(&self, email: &str) -> String {
        let now = Utc::now();
        let token = random_token();

        let mut resets = self.resets.write().await;
        resets.retain(|_, r| r.expires_at > now);
        resets.insert(
            token.clone(),
            ResetToken {
                email: email.trim().to_lowercase(),
                expires_at: now + Duration::minutes(RESET_TTL_MINUTES),
            },
        );

        token
    }

    /// Redeem a reset token once, returning its email if it was still valid
    pub async fn consume_reset_token(&self, token: &str) -> Option<String> {
        let reset = self.resets.write().await.remove(token)?;
        (reset.expires_at > Utc::now()).then_some(reset.email)
    }
}
