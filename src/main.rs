/// Studio site server
///
/// Main entry point. Loads configuration from the environment and serves:
/// - Marketing pages at /, /expertise/*, /contact, /proposal, /legal/*
/// - Public JSON at /api/*, plus /sitemap.xml and /robots.txt
/// - The admin console at /admin and /admin/api/*
/// - Health check at /healthz

use studio_site::{config::Config, server::start_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration (defaults to 0.0.0.0:3004 and data/studio.db)
    let config = Config::default();

    start_server(config).await?;

    Ok(())
}
