/// Content database connection and schema
///
/// One SQLite database holds every table the site reads:
/// - projects: portfolio entries with media, taxonomy and SEO fields
/// - page_seo: per-route metadata
/// - analytics_codes: one snippet per tracking platform
/// - admin_users: console allow-list with password hashes

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Owner of the content connection pool
#[derive(Debug, Clone)]
pub struct ContentDatabase {
    pool: SqlitePool,
}

impl ContentDatabase {
    /// Open (creating if missing) the database at `url` and initialise the schema
    pub async fn connect(url: &str) -> Result<Self> {
        if url.contains(":memory:") {
            return Self::in_memory().await;
        }

        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| anyhow::anyhow!("Invalid database URL '{}': {}", url, e))?
            .create_if_missing(true)
            .foreign_keys(true);

        if let Some(parent) = Path::new(options.get_filename()).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    anyhow::anyhow!("Failed to create database directory '{}': {}", parent.display(), e)
                })?;
            }
        }

        tracing::info!("🗄️ Opening content database: {}", options.get_filename().display());
        let pool = SqlitePool::connect_with(options).await?;

        let database = Self { pool };
        database.init_schema().await?;

        tracing::info!("✅ Content database ready");
        Ok(database)
    }

    /// Private in-memory database, used by tests and throwaway instances.
    /// A single connection keeps every query on the same memory database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let database = Self { pool };
        database.init_schema().await?;
        Ok(database)
    }

    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    /// Create tables and indexes. Safe to call repeatedly (IF NOT EXISTS).
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS projects (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE,
                category TEXT NOT NULL,
                subcategory TEXT NOT NULL,
                summary TEXT NOT NULL DEFAULT '',
                cover_image TEXT,
                gallery JSON NOT NULL DEFAULT '[]',
                case_study_content JSON NOT NULL DEFAULT '{}',
                show_in_carousel INTEGER NOT NULL DEFAULT 0,
                carousel_order INTEGER,
                status TEXT NOT NULL DEFAULT 'Draft',
                meta_title TEXT,
                meta_description TEXT,
                meta_keywords TEXT,
                canonical_url TEXT,
                og_title TEXT,
                og_description TEXT,
                og_image TEXT,
                schema_json TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS page_seo (
                page_slug TEXT PRIMARY KEY,
                meta_title TEXT,
                meta_description TEXT,
                meta_keywords TEXT,
                canonical_url TEXT,
                is_indexed INTEGER NOT NULL DEFAULT 1,
                is_followed INTEGER NOT NULL DEFAULT 1,
                og_title TEXT,
                og_description TEXT,
                og_image TEXT,
                og_type TEXT,
                schema_json TEXT,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS analytics_codes (
                platform TEXT PRIMARY KEY,
                code TEXT NOT NULL,
                enabled INTEGER NOT NULL DEFAULT 0,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS admin_users (
                email TEXT PRIMARY KEY,
                password_hash TEXT,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_projects_listing ON projects(status, category, subcategory)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_projects_carousel ON projects(show_in_carousel, carousel_order)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
