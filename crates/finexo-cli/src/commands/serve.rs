//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_auth: bool,
    static_dir: Option<&Path>,
) -> Result<()> {
    let jwt_secret = std::env::var("FINEXO_JWT_SECRET")
        .ok()
        .filter(|s| !s.trim().is_empty());

    // Comma-separated list of origins allowed to call the API cross-origin
    let allowed_origins: Vec<String> = std::env::var("FINEXO_ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if !no_auth && jwt_secret.is_none() {
        anyhow::bail!(
            "Authentication is enabled but FINEXO_JWT_SECRET is not set. \
             Set it, or pass --no-auth for local development."
        );
    }

    println!("🚀 Starting Finexo web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
        println!("      Requests act as the X-User-Id header, or 'local-dev'");
    } else {
        println!("   🔐 Authentication: bearer JWT (HS256, FINEXO_JWT_SECRET)");
    }
    if !allowed_origins.is_empty() {
        println!(
            "   🌐 Allowed origins: {} (FINEXO_ALLOWED_ORIGINS)",
            allowed_origins.join(", ")
        );
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path)?;

    let config = finexo_server::ServerConfig {
        require_auth: !no_auth,
        jwt_secret,
        allowed_origins,
    };

    let static_dir_str = match static_dir {
        Some(dir) => Some(dir.to_str().context("Static dir path must be valid UTF-8")?),
        None => None,
    };
    finexo_server::serve_with_config(db, host, port, static_dir_str, config).await?;

    Ok(())
}
