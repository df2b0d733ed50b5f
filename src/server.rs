/// Server setup and initialization
///
/// Wires together all components: content store, access registry, sessions,
/// mailer, media store and HTTP routes.

use crate::{
    api::{
        create_admin_routes, create_auth_routes, create_public_routes, create_site_routes, site::not_found,
        AppState,
    },
    auth::{AccessRegistry, AuthService, SessionStore},
    config::Config,
    content::{ContentDatabase, ContentStorage},
    mail::Mailer,
    media::MediaStore,
};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Build the shared application state
///
/// Opens the database, loads the admin allow-list and creates the primary
/// admin account when a bootstrap password is configured.
pub async fn build_state(config: Config) -> Result<AppState> {
    tracing::info!("🏗️ Initializing content database");
    let database = ContentDatabase::connect(&config.database.url).await?;
    let storage = ContentStorage::new(database.pool());

    tracing::info!("📁 Ensuring media directory exists: {}", config.database.media_dir);
    std::fs::create_dir_all(&config.database.media_dir)
        .map_err(|e| anyhow::anyhow!("Failed to create media directory: {}", e))?;
    let media = MediaStore::new(&config.database.media_dir, config.base_url());

    tracing::info!("🔐 Loading admin allow-list");
    let access = Arc::new(AccessRegistry::new(&config.admin.email, storage.clone()));
    access
        .reload()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load admin users: {}", e))?;

    let mailer = Mailer::new(config.mail.clone());
    if config.mail.api_key.is_none() {
        tracing::warn!("⚠️ No mail API key configured; contact forms will fail to deliver");
    }

    let auth = Arc::new(AuthService::new(
        storage.clone(),
        Arc::new(SessionStore::new(config.admin.session_ttl_hours)),
        access,
        mailer.clone(),
        config.base_url(),
        &config.site.name,
    ));

    if let Some(password) = config.admin.bootstrap_password.as_deref() {
        auth.bootstrap(&config.admin.email, password)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bootstrap admin account: {}", e))?;
    }

    if config.admin.dev_login {
        tracing::warn!("⚠️ Dev login is enabled: the admin_dev_login cookie bypasses sign-in");
    }

    Ok(AppState {
        config: Arc::new(config),
        storage,
        auth,
        mailer,
        media,
    })
}

/// Assemble every route around an existing state
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Public JSON, forms, sitemap, robots, media, health
        .merge(create_public_routes())
        // Marketing pages
        .merge(create_site_routes())
        // Admin sign-in and password reset
        .merge(create_auth_routes())
        // Admin console
        .merge(create_admin_routes())
        .fallback(not_found)
        .with_state(state)
}

/// Create the main Axum application with all routes
pub async fn create_app(config: Config) -> Result<Router> {
    let state = build_state(config).await?;

    tracing::info!("📡 Creating HTTP router with all endpoints");
    let app = build_router(state);

    tracing::info!("✅ Application initialized successfully");
    Ok(app)
}

/// Start the HTTP server with the given configuration
pub async fn start_server(config: Config) -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("Starting {} site server...", config.site.name);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let app = create_app(config).await?;

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
