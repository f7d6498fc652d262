use anyhow::{Context, Result};
use std::path::Path;

/// Default secret mount path checked before the environment variable,
/// following the Docker/Kubernetes file-based secret convention.
const DEFAULT_SECRET_FILE: &str = "/run/secrets/openai_api_key";

/// Application configuration loaded from environment variables.
///
/// The API credential is optional at startup: a missing key is logged and
/// then reported per-request as CREDENTIAL_MISSING rather than crashing
/// the process.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: resolve_api_key(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Layered credential lookup: deployment secret file first, then the
/// process environment.
fn resolve_api_key() -> Option<String> {
    let secret_path =
        std::env::var("OPENAI_API_KEY_FILE").unwrap_or_else(|_| DEFAULT_SECRET_FILE.to_string());
    if let Some(key) = read_secret_file(Path::new(&secret_path)) {
        return Some(key);
    }
    std::env::var("OPENAI_API_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}

fn read_secret_file(path: &Path) -> Option<String> {
    std::fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
