/// SQLite persistence layer for site content
///
/// CRUD over projects, page SEO rows, analytics codes and admin users.
/// Gallery and case-study documents are stored as JSON text columns.

use crate::content::carousel::assign_carousel_order;
use crate::content::types::{
    AdminUser, AnalyticsCode, PageSeo, Project, ProjectFilter, ProjectInput, ProjectSeo,
    ProjectStatus,
};
use crate::error::{AppError, AppResult};
use chrono::SecondsFormat;
use sqlx::{
    sqlite::{SqlitePool, SqliteRow},
    QueryBuilder, Row, Sqlite,
};
use std::collections::HashSet;

const PROJECT_COLUMNS: &str = "id, title, slug, category, subcategory, summary, cover_image, \
    gallery, case_study_content, show_in_carousel, carousel_order, status, meta_title, \
    meta_description, meta_keywords, canonical_url, og_title, og_description, og_image, \
    schema_json, created_at, updated_at";

const PAGE_SEO_COLUMNS: &str = "page_slug, meta_title, meta_description, meta_keywords, \
    canonical_url, is_indexed, is_followed, og_title, og_description, og_image, og_type, \
    schema_json, updated_at";

/// Current time in the stored RFC 3339 form
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// SQLite-based content storage
#[derive(Debug, Clone)]
pub struct ContentStorage {
    pool: SqlitePool,
}

impl ContentStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Cheap round trip used by the health check
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // ---- projects -------------------------------------------------------

    /// List projects matching the filter, newest first
    pub async fn list_projects(&self, filter: &ProjectFilter) -> AppResult<Vec<Project>> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM projects WHERE 1 = 1", PROJECT_COLUMNS));

        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(category) = filter.category {
            query.push(" AND category = ").push_bind(category.label());
        }
        if let Some(subcategory) = filter.subcategory {
            query.push(" AND subcategory = ").push_bind(subcategory.label());
        }
        query.push(" ORDER BY created_at DESC, title ASC");
        if let Some(limit) = filter.limit {
            query.push(" LIMIT ").push_bind(limit.max(0));
        }

        let rows = query.build().fetch_all(&self.pool).await?;
        rows.iter().map(project_from_row).collect()
    }

    /// Published projects flagged for the homepage carousel, in carousel order
    pub async fn list_carousel(&self) -> AppResult<Vec<Project>> {
        let sql = format!(
            "SELECT {} FROM projects \
             WHERE status = 'Published' AND show_in_carousel = 1 \
             ORDER BY carousel_order IS NULL, carousel_order ASC, title ASC",
            PROJECT_COLUMNS
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(project_from_row).collect()
    }

    pub async fn get_project(&self, id: &str) -> AppResult<Option<Project>> {
        let sql = format!("SELECT {} FROM projects WHERE id = ?", PROJECT_COLUMNS);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(project_from_row).transpose()
    }

    pub async fn get_project_by_slug(&self, slug: &str) -> AppResult<Option<Project>> {
        let sql = format!("SELECT {} FROM projects WHERE slug = ?", PROJECT_COLUMNS);
        let row = sqlx::query(&sql).bind(slug).fetch_optional(&self.pool).await?;
        row.as_ref().map(project_from_row).transpose()
    }

    /// Insert a new project. Duplicate slugs surface as `Conflict`.
    pub async fn create_project(&self, input: ProjectInput) -> AppResult<Project> {
        let input = input.normalized()?;
        let id = uuid::Uuid::new_v4().to_string();
        let now = timestamp_now();

        sqlx::query(
            r#"
            INSERT INTO projects (
                id, title, slug, category, subcategory, summary, cover_image, gallery,
                case_study_content, show_in_carousel, carousel_order, status, meta_title,
                meta_description, meta_keywords, canonical_url, og_title, og_description,
                og_image, schema_json, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&input.title)
        .bind(input.slug.as_deref())
        .bind(input.category.label())
        .bind(input.subcategory.label())
        .bind(&input.summary)
        .bind(input.cover_image.as_deref())
        .bind(serde_json::to_string(&input.gallery)?)
        .bind(serde_json::to_string(&input.case_study_content)?)
        .bind(input.show_in_carousel)
        .bind(input.carousel_order)
        .bind(input.status.as_str())
        .bind(input.seo.meta_title.as_deref())
        .bind(input.seo.meta_description.as_deref())
        .bind(input.seo.meta_keywords.as_deref())
        .bind(input.seo.canonical_url.as_deref())
        .bind(input.seo.og_title.as_deref())
        .bind(input.seo.og_description.as_deref())
        .bind(input.seo.og_image.as_deref())
        .bind(input.seo.schema_json.as_deref())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        tracing::info!("📝 Created project {} ({})", id, input.title);

        self.get_project(&id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Project {} vanished after insert", id)))
    }

    /// Overwrite every editable column of an existing project
    pub async fn update_project(&self, id: &str, input: ProjectInput) -> AppResult<Project> {
        let input = input.normalized()?;

        let result = sqlx::query(
            r#"
            UPDATE projects SET
                title = ?, slug = ?, category = ?, subcategory = ?, summary = ?,
                cover_image = ?, gallery = ?, case_study_content = ?, show_in_carousel = ?,
                carousel_order = ?, status = ?, meta_title = ?, meta_description = ?,
                meta_keywords = ?, canonical_url = ?, og_title = ?, og_description = ?,
                og_image = ?, schema_json = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.title)
        .bind(input.slug.as_deref())
        .bind(input.category.label())
        .bind(input.subcategory.label())
        .bind(&input.summary)
        .bind(input.cover_image.as_deref())
        .bind(serde_json::to_string(&input.gallery)?)
        .bind(serde_json::to_string(&input.case_study_content)?)
        .bind(input.show_in_carousel)
        .bind(input.carousel_order)
        .bind(input.status.as_str())
        .bind(input.seo.meta_title.as_deref())
        .bind(input.seo.meta_description.as_deref())
        .bind(input.seo.meta_keywords.as_deref())
        .bind(input.seo.canonical_url.as_deref())
        .bind(input.seo.og_title.as_deref())
        .bind(input.seo.og_description.as_deref())
        .bind(input.seo.og_image.as_deref())
        .bind(input.seo.schema_json.as_deref())
        .bind(timestamp_now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Project {}", id)));
        }

        tracing::info!("📝 Updated project {} ({})", id, input.title);

        self.get_project(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project {}", id)))
    }

    pub async fn delete_project(&self, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Write the carousel sequence in one transaction.
    ///
    /// `ids[0]` gets order 1, `ids[1]` order 2, and so on. An unknown id aborts
    /// the whole write; nothing is partially applied. `updated_at` is left alone.
    pub async fn set_carousel_order(&self, ids: &[String]) -> AppResult<()> {
        let mut seen = HashSet::new();
        if let Some(duplicate) = ids.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(AppError::Validation(format!(
                "Project {} appears twice in the carousel order",
                duplicate
            )));
        }

        let mut tx = self.pool.begin().await?;

        for (id, order) in assign_carousel_order(ids) {
            let result = sqlx::query("UPDATE projects SET carousel_order = ? WHERE id = ?")
                .bind(order)
                .bind(&id)
                .execute(&mut *tx)
                .await?;

            if result.rows_affected() == 0 {
                tracing::warn!("Carousel reorder aborted: unknown project {}", id);
                return Err(AppError::NotFound(format!("Project {}", id)));
            }
        }

        tx.commit().await?;

        tracing::info!("🎠 Saved carousel order for {} projects", ids.len());
        Ok(())
    }

    // ---- page SEO -------------------------------------------------------

    pub async fn get_page_seo(&self, page_slug: &str) -> AppResult<Option<PageSeo>> {
        let sql = format!("SELECT {} FROM page_seo WHERE page_slug = ?", PAGE_SEO_COLUMNS);
        let row = sqlx::query(&sql).bind(page_slug).fetch_optional(&self.pool).await?;
        row.as_ref().map(page_seo_from_row).transpose()
    }

    pub async fn list_page_seo(&self) -> AppResult<Vec<PageSeo>> {
        let sql = format!("SELECT {} FROM page_seo ORDER BY page_slug", PAGE_SEO_COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(page_seo_from_row).collect()
    }

    /// Insert or replace the row for `row.page_slug`
    pub async fn upsert_page_seo(&self, row: &PageSeo) -> AppResult<PageSeo> {
        let page_slug = row.page_slug.trim().trim_matches('/');
        if page_slug.is_empty() {
            return Err(AppError::Validation("Page slug is required".to_string()));
        }

        sqlx::query(
            r#"
            INSERT INTO page_seo (
                page_slug, meta_title, meta_description, meta_keywords, canonical_url,
                is_indexed, is_followed, og_title, og_description, og_image, og_type,
                schema_json, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(page_slug) DO UPDATE SET
                meta_title = excluded.meta_title,
                meta_description = excluded.meta_description,
                meta_keywords = excluded.meta_keywords,
                canonical_url = excluded.canonical_url,
                is_indexed = excluded.is_indexed,
                is_followed = excluded.is_followed,
                og_title = excluded.og_title,
                og_description = excluded.og_description,
                og_image = excluded.og_image,
                og_type = excluded.og_type,
                schema_json = excluded.schema_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(page_slug)
        .bind(row.meta_title.as_deref())
        .bind(row.meta_description.as_deref())
        .bind(row.meta_keywords.as_deref())
        .bind(row.canonical_url.as_deref())
        .bind(row.is_indexed)
        .bind(row.is_followed)
        .bind(row.og_title.as_deref())
        .bind(row.og_description.as_deref())
        .bind(row.og_image.as_deref())
        .bind(row.og_type.as_deref())
        .bind(row.schema_json.as_deref())
        .bind(timestamp_now())
        .execute(&self.pool)
        .await?;

        tracing::info!("🔎 Saved SEO for page '{}'", page_slug);

        self.get_page_seo(page_slug)
            .await?
            .ok_or_else(|| AppError::Internal(format!("SEO row '{}' vanished after upsert", page_slug)))
    }

    pub async fn delete_page_seo(&self, page_slug: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM page_seo WHERE page_slug = ?")
            .bind(page_slug)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ---- analytics ------------------------------------------------------

    pub async fn list_analytics_codes(&self) -> AppResult<Vec<AnalyticsCode>> {
        let rows = sqlx::query(
            "SELECT platform, code, enabled, updated_at FROM analytics_codes ORDER BY platform",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(analytics_from_row).collect())
    }

    pub async fn list_enabled_analytics_codes(&self) -> AppResult<Vec<AnalyticsCode>> {
        let rows = sqlx::query(
            "SELECT platform, code, enabled, updated_at FROM analytics_codes \
             WHERE enabled = 1 ORDER BY platform",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(analytics_from_row).collect())
    }

    pub async fn upsert_analytics_code(&self, code: &AnalyticsCode) -> AppResult<AnalyticsCode> {
        let platform = code.platform.trim().to_lowercase();
        if platform.is_empty() {
            return Err(AppError::Validation("Platform is required".to_string()));
        }

        let now = timestamp_now();
        sqlx::query(
            r#"
            INSERT INTO analytics_codes (platform, code, enabled, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(platform) DO UPDATE SET
                code = excluded.code,
                enabled = excluded.enabled,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&platform)
        .bind(&code.code)
        .bind(code.enabled)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        tracing::info!("📈 Saved analytics code for '{}' (enabled: {})", platform, code.enabled);

        Ok(AnalyticsCode {
            platform,
            code: code.code.clone(),
            enabled: code.enabled,
            updated_at: now,
        })
    }

    pub async fn delete_analytics_code(&self, platform: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM analytics_codes WHERE platform = ?")
            .bind(platform.to_lowercase())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ---- admin users ----------------------------------------------------

    pub async fn list_admin_users(&self) -> AppResult<Vec<AdminUser>> {
        let rows = sqlx::query("SELECT email, password_hash, created_at FROM admin_users ORDER BY email")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(admin_from_row).collect())
    }

    pub async fn get_admin_user(&self, email: &str) -> AppResult<Option<AdminUser>> {
        let row = sqlx::query("SELECT email, password_hash, created_at FROM admin_users WHERE email = ?")
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(admin_from_row))
    }

    /// Add an allow-listed address, replacing its password hash if it exists
    pub async fn upsert_admin_user(&self, email: &str, password_hash: Option<&str>) -> AppResult<AdminUser> {
        let email = email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(AppError::Validation(format!("'{}' is not an email address", email)));
        }

        sqlx::query(
            r#"
            INSERT INTO admin_users (email, password_hash, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT(email) DO UPDATE SET
                password_hash = COALESCE(excluded.password_hash, admin_users.password_hash)
            "#,
        )
        .bind(&email)
        .bind(password_hash)
        .bind(timestamp_now())
        .execute(&self.pool)
        .await?;

        tracing::info!("👤 Saved admin user {}", email);

        self.get_admin_user(&email)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Admin user {} vanished after upsert", email)))
    }

    pub async fn set_admin_password(&self, email: &str, password_hash: &str) -> AppResult<()> {
        let result = sqlx::query("UPDATE admin_users SET password_hash = ? WHERE email = ?")
            .bind(password_hash)
            .bind(email.trim().to_lowercase())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Admin user {}", email)));
        }
        Ok(())
    }

    pub async fn delete_admin_user(&self, email: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM admin_users WHERE email = ?")
            .bind(email.trim().to_lowercase())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Row counts for the admin dashboard: (projects, published, page_seo, analytics)
    pub async fn counts(&self) -> AppResult<(i64, i64, i64, i64)> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM projects) AS projects,
                (SELECT COUNT(*) FROM projects WHERE status = 'Published') AS published,
                (SELECT COUNT(*) FROM page_seo) AS pages,
                (SELECT COUNT(*) FROM analytics_codes) AS analytics
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok((
            row.try_get("projects")?,
            row.try_get("published")?,
            row.try_get("pages")?,
            row.try_get("analytics")?,
        ))
    }
}

fn project_from_row(row: &SqliteRow) -> AppResult<Project> {
    let category: String = row.try_get("category")?;
    let subcategory: String = row.try_get("subcategory")?;
    let status: String = row.try_get("status")?;
    let gallery: String = row.try_get("gallery")?;
    let content: String = row.try_get("case_study_content")?;

    Ok(Project {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        slug: row.try_get("slug")?,
        category: category.parse().map_err(AppError::Database)?,
        subcategory: subcategory.parse().map_err(AppError::Database)?,
        summary: row.try_get("summary")?,
        cover_image: row.try_get("cover_image")?,
        gallery: serde_json::from_str(&gallery)?,
        case_study_content: serde_json::from_str(&content)?,
        show_in_carousel: row.try_get("show_in_carousel")?,
        carousel_order: row.try_get("carousel_order")?,
        status: status.parse::<ProjectStatus>().map_err(AppError::Database)?,
        seo: ProjectSeo {
            meta_title: row.try_get("meta_title")?,
            meta_description: row.try_get("meta_description")?,
            meta_keywords: row.try_get("meta_keywords")?,
            canonical_url: row.try_get("canonical_url")?,
            og_title: row.try_get("og_title")?,
            og_description: row.try_get("og_description")?,
            og_image: row.try_get("og_image")?,
            schema_json: row.try_get("schema_json")?,
        },
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn page_seo_from_row(row: &SqliteRow) -> AppResult<PageSeo> {
    Ok(PageSeo {
        page_slug: row.try_get("page_slug")?,
        meta_title: row.try_get("meta_title")?,
        meta_description: row.try_get("meta_description")?,
        meta_keywords: row.try_get("meta_keywords")?,
        canonical_url: row.try_get("canonical_url")?,
        is_indexed: row.try_get("is_indexed")?,
        is_followed: row.try_get("is_followed")?,
        og_title: row.try_get("og_title")?,
        og_description: row.try_get("og_description")?,
        og_image: row.try_get("og_image")?,
        og_type: row.try_get("og_type")?,
        schema_json: row.try_get("schema_json")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn analytics_from_row(row: &SqliteRow) -> AnalyticsCode {
    AnalyticsCode {
        platform: row.get("platform"),
        code: row.get("code"),
        enabled: row.get("enabled"),
        updated_at: row.get("updated_at"),
    }
}

fn admin_from_row(row: &SqliteRow) -> AdminUser {
    AdminUser {
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::database::ContentDatabase;
    use crate::content::taxonomy::{Category, Subcategory};
    use serde_json::json;

    async fn storage() -> ContentStorage {
        let db = ContentDatabase::in_memory().await.expect("in-memory database");
        ContentStorage::new(db.pool())
    }

    fn input(title: &str, status: &str, carousel: bool) -> ProjectInput {
        serde_json::from_value(json!({
            "title": title,
            "category": "Architectural Visualization",
            "subcategory": "Exterior Renderings",
            "summary": "A project",
            "gallery": ["https://cdn.example/a.jpg", "https://cdn.example/b.jpg"],
            "show_in_carousel": carousel,
            "status": status
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn creates_and_reads_back_projects() {
        let storage = storage().await;
        let created = storage.create_project(input("Harbour Tower", "Published", false)).await.unwrap();

        assert_eq!(created.slug, "harbour-tower");
        assert_eq!(created.gallery.len(), 2);
        assert_eq!(created.category, Category::ArchitecturalVisualization);
        assert_eq!(created.created_at, created.updated_at);

        let by_slug = storage.get_project_by_slug("harbour-tower").await.unwrap().unwrap();
        assert_eq!(by_slug, created);
    }

    #[tokio::test]
    async fn duplicate_slug_is_a_conflict() {
        let storage = storage().await;
        storage.create_project(input("Harbour Tower", "Draft", false)).await.unwrap();
        let err = storage.create_project(input("Harbour Tower", "Draft", false)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn filters_by_status_and_taxonomy() {
        let storage = storage().await;
        storage.create_project(input("Published One", "Published", false)).await.unwrap();
        storage.create_project(input("Draft One", "Draft", false)).await.unwrap();

        let published = storage.list_projects(&ProjectFilter::published()).await.unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].title, "Published One");

        let filter = ProjectFilter {
            subcategory: Some(Subcategory::FloorPlans),
            ..ProjectFilter::published()
        };
        assert!(storage.list_projects(&filter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_of_missing_project_is_not_found() {
        let storage = storage().await;
        let err = storage.update_project("nope", input("Ghost", "Draft", false)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn carousel_order_is_written_in_sequence() {
        let storage = storage().await;
        let a = storage.create_project(input("Alpha", "Published", true)).await.unwrap();
        let b = storage.create_project(input("Bravo", "Published", true)).await.unwrap();
        let c = storage.create_project(input("Charlie", "Published", true)).await.unwrap();

        storage
            .set_carousel_order(&[c.id.clone(), a.id.clone(), b.id.clone()])
            .await
            .unwrap();

        let carousel = storage.list_carousel().await.unwrap();
        let titles: Vec<_> = carousel.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Charlie", "Alpha", "Bravo"]);
        let orders: Vec<_> = carousel.iter().map(|p| p.carousel_order).collect();
        assert_eq!(orders, vec![Some(1), Some(2), Some(3)]);
    }

    #[tokio::test]
    async fn carousel_reorder_with_unknown_id_changes_nothing() {
        let storage = storage().await;
        let a = storage.create_project(input("Alpha", "Published", true)).await.unwrap();
        let b = storage.create_project(input("Bravo", "Published", true)).await.unwrap();
        storage.set_carousel_order(&[a.id.clone(), b.id.clone()]).await.unwrap();

        let err = storage
            .set_carousel_order(&[b.id.clone(), "missing".to_string(), a.id.clone()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let titles: Vec<_> = storage
            .list_carousel()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Alpha", "Bravo"]);
    }

    #[tokio::test]
    async fn page_seo_upsert_replaces_existing_row() {
        let storage = storage().await;
        let mut row = PageSeo::empty("home");
        row.meta_title = Some("Home".to_string());
        storage.upsert_page_seo(&row).await.unwrap();

        row.meta_title = Some("Welcome".to_string());
        row.is_indexed = false;
        let saved = storage.upsert_page_seo(&row).await.unwrap();

        assert_eq!(saved.meta_title.as_deref(), Some("Welcome"));
        assert!(!saved.is_indexed);
        assert_eq!(storage.list_page_seo().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn only_enabled_analytics_codes_are_listed_for_injection() {
        let storage = storage().await;
        for (platform, enabled) in [("ga4", true), ("hotjar", false)] {
            storage
                .upsert_analytics_code(&AnalyticsCode {
                    platform: platform.to_string(),
                    code: "console.log(1)".to_string(),
                    enabled,
                    updated_at: String::new(),
                })
                .await
                .unwrap();
        }

        let enabled = storage.list_enabled_analytics_codes().await.unwrap();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].platform, "ga4");
        assert_eq!(storage.list_analytics_codes().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn admin_emails_are_stored_lowercase() {
        let storage = storage().await;
        storage.upsert_admin_user("Owner@Studio.Example", Some("hash")).await.unwrap();

        let user = storage.get_admin_user("owner@studio.example").await.unwrap().unwrap();
        assert_eq!(user.email, "owner@studio.example");

        // Re-adding without a password keeps the existing hash
        storage.upsert_admin_user("owner@studio.example", None).await.unwrap();
        let user = storage.get_admin_user("OWNER@studio.example").await.unwrap().unwrap();
        assert_eq!(user.password_hash.as_deref(), Some("hash"));
    }
}
