use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

// Default configuration constants
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_PUBLIC_BASE_URL: &str = "";
pub const DEFAULT_EDITOR_DEBOUNCE_MS: u64 = 800;

/// File name offered when the generated configuration is downloaded or saved.
pub const DOWNLOAD_FILE_NAME: &str = "aws-spot-fleet-config.json";

pub fn load_env_file(env_file: Option<&str>) {
    if let Some(path) = env_file {
        dotenvy::from_path(Path::new(path)).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

pub fn get_public_base_url() -> String {
    sanitize_base_url(&env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| DEFAULT_PUBLIC_BASE_URL.to_string()))
}

/// Optional newline-separated instance type catalog replacing the built-in list.
pub fn get_instance_types_file() -> Option<PathBuf> {
    env::var("INSTANCE_TYPES_FILE")
        .ok()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
}

/// Quiet interval after which a JSON editor draft is committed to the form.
pub fn get_editor_quiet_interval() -> Duration {
    let ms = env::var("EDITOR_DEBOUNCE_MS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_EDITOR_DEBOUNCE_MS);
    Duration::from_millis(ms)
}

pub fn sanitize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        format!("http://localhost:{}", DEFAULT_PORT)
    } else {
        trimmed.to_string()
    }
}
