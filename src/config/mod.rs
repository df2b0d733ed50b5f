/// Configuration management for the studio site
///
/// Handles server binding, the content database, public site identity,
/// admin access and the transactional email provider.

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Database and media storage configuration
    pub database: DatabaseConfig,
    /// Public site identity
    pub site: SiteConfig,
    /// Admin console access
    pub admin: AdminConfig,
    /// Transactional email provider
    pub mail: MailConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
}

/// Content database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection URL (e.g., "sqlite://data/studio.db" or "sqlite::memory:")
    pub url: String,
    /// Directory that holds uploaded media, one sub-directory per bucket
    pub media_dir: String,
}

/// Public site identity used in URLs, titles and the sitemap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute base URL without trailing slash (e.g., "https://studio.example")
    pub base_url: String,
    /// Studio name, used as the fallback page title
    pub name: String,
}

/// Admin console access
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// The primary admin address; always allowed in addition to the admin_users table
    pub email: String,
    /// When set, the primary admin account is created on startup if missing
    pub bootstrap_password: Option<String>,
    /// Honour the `admin_dev_login=true` cookie (local development only)
    pub dev_login: bool,
    /// Session lifetime
    pub session_ttl_hours: i64,
}

/// Email provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// HTTP endpoint of the email API
    pub api_url: String,
    /// Bearer key; sending fails with a configuration error when absent
    pub api_key: Option<String>,
    /// Sender, e.g. "Studio <noreply@studio.example>"
    pub from: String,
    /// Where contact and proposal submissions are delivered
    pub inbox: String,
}

impl Config {
    /// Public base URL with any trailing slash removed
    pub fn base_url(&self) -> &str {
        self.site.base_url.trim_end_matches('/')
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_flag(key: &str) -> bool {
    matches!(
        std::env::var(key).map(|v| v.to_ascii_lowercase()).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

impl Default for Config {
    /// Default configuration with ENV_VAR support for k8s/container deployment
    fn default() -> Self {
        let admin_email = env_or("STUDIO_ADMIN_EMAIL", "admin@localhost");

        Self {
            server: ServerConfig {
                host: env_or("STUDIO_HOST", "0.0.0.0"),
                port: env_or("STUDIO_PORT", "3004").parse().unwrap_or(3004),
            },
            database: DatabaseConfig {
                url: env_or("STUDIO_DATABASE_URL", "sqlite://data/studio.db"),
                media_dir: env_or("STUDIO_MEDIA_DIR", "data/media"),
            },
            site: SiteConfig {
                base_url: env_or("STUDIO_SITE_URL", "http://localhost:3004"),
                name: env_or("STUDIO_SITE_NAME", "Studio"),
            },
            admin: AdminConfig {
                email: admin_email.clone(),
                bootstrap_password: std::env::var("STUDIO_ADMIN_PASSWORD").ok(),
                dev_login: env_flag("STUDIO_DEV_LOGIN"),
                session_ttl_hours: env_or("STUDIO_SESSION_TTL_HOURS", "12").parse().unwrap_or(12),
            },
            mail: MailConfig {
                api_url: env_or("STUDIO_MAIL_API_URL", "https://api.resend.com/emails"),
                api_key: std::env::var("STUDIO_MAIL_API_KEY").ok(),
                from: env_or("STUDIO_MAIL_FROM", "Studio <noreply@localhost>"),
                inbox: env_or("STUDIO_MAIL_INBOX", &admin_email),
            },
        }
    }
}
