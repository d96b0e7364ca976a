//! Configuration loader
//!
//! ## Loading Strategy
//! 1. `VSPHEREDB_CONFIG` names an explicit file, which is loaded directly
//! 2. Otherwise all required environment variables are tried
//! 3. If any is missing, the first probed config file is loaded
//!
//! ## Environment Variables
//! Required:
//! - `VSPHEREDB_DB_PATH`: Database file path
//! - `VSPHEREDB_VCENTER_UUID`: vCenter instance UUID
//! - `VSPHEREDB_VCENTER_NAME`: vCenter display name
//! - `VSPHEREDB_API_URL`: Base URL of the property collector gateway
//! - `VSPHEREDB_API_USERNAME`, `VSPHEREDB_API_PASSWORD`: Basic auth credentials
//!
//! Optional:
//! - `VSPHEREDB_DB_POOL_SIZE`: Connection pool size
//! - `VSPHEREDB_HTTP_TIMEOUT`: Request timeout in seconds
//! - `VSPHEREDB_HTTP_MAX_ATTEMPTS`: Attempts per request, retries included
//! - `VSPHEREDB_HTTP_ACCEPT_INVALID_CERTS`: Skip TLS verification (true/false)
//! - `VSPHEREDB_HTTP_PROXY`: Proxy URL; otherwise `HTTPS_PROXY`/`HTTP_PROXY`/`NO_PROXY` apply
//! - `VSPHEREDB_SYNC_KINDS`: Comma separated object kinds, e.g. `HostSystem,VirtualMachine`
//!
//! A file-based config without a password picks up `VSPHEREDB_API_PASSWORD`,
//! so credentials can stay out of the file.
//!
//! ## File Locations
//! `vspheredb.toml`, `vspheredb.json`, `config.toml` and `config.json` in the
//! working directory, its parent, and next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use uuid::Uuid;
use vspheredb_domain::{
    Config, DatabaseConfig, HttpConfig, ObjectKind, Result, SyncConfig, VCenterConfig,
    VsphereDbError,
};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["vspheredb.toml", "vspheredb.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `VsphereDbError::Config` if no source yields a complete, valid
/// configuration.
pub fn load() -> Result<Config> {
    if let Ok(explicit) = std::env::var("VSPHEREDB_CONFIG") {
        return load_from_file(Some(PathBuf::from(explicit)));
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Environment configuration incomplete, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `VsphereDbError::Config` if required variables are missing or any
/// variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let db_path = env_var("VSPHEREDB_DB_PATH")?;
    let instance_uuid = env_var("VSPHEREDB_VCENTER_UUID").and_then(|s| {
        Uuid::parse_str(s.trim())
            .map_err(|e| VsphereDbError::Config(format!("Invalid vCenter UUID: {e}")))
    })?;
    let name = env_var("VSPHEREDB_VCENTER_NAME")?;
    let api_url = env_var("VSPHEREDB_API_URL")?;
    let username = env_var("VSPHEREDB_API_USERNAME")?;
    let password = env_var("VSPHEREDB_API_PASSWORD")?;

    let defaults = DatabaseConfig::default();
    let pool_size = env_parse("VSPHEREDB_DB_POOL_SIZE", "pool size")?.unwrap_or(defaults.pool_size);

    let http_defaults = HttpConfig::default();
    let http = HttpConfig {
        timeout_secs: env_parse("VSPHEREDB_HTTP_TIMEOUT", "HTTP timeout")?
            .unwrap_or(http_defaults.timeout_secs),
        max_attempts: env_parse("VSPHEREDB_HTTP_MAX_ATTEMPTS", "HTTP max attempts")?
            .unwrap_or(http_defaults.max_attempts),
        accept_invalid_certs: env_bool(
            "VSPHEREDB_HTTP_ACCEPT_INVALID_CERTS",
            http_defaults.accept_invalid_certs,
        ),
        proxy: std::env::var("VSPHEREDB_HTTP_PROXY").ok().filter(|url| !url.trim().is_empty()),
    };

    let sync = match std::env::var("VSPHEREDB_SYNC_KINDS") {
        Ok(list) => SyncConfig { object_kinds: parse_kinds(&list)? },
        Err(_) => SyncConfig::default(),
    };

    let config = Config {
        database: DatabaseConfig { path: db_path, pool_size },
        vcenter: VCenterConfig { instance_uuid, name, api_url, username, password },
        http,
        sync,
    };
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations via
/// [`probe_config_paths`].
///
/// # Errors
/// Returns `VsphereDbError::Config` if the file is missing, unreadable, or
/// invalid.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(VsphereDbError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            VsphereDbError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| VsphereDbError::Config(format!("Failed to read config file: {e}")))?;

    let mut config = parse_config(&contents, &config_path)?;
    if config.vcenter.password.is_empty() {
        if let Ok(password) = std::env::var("VSPHEREDB_API_PASSWORD") {
            config.vcenter.password = password;
        }
    }
    config.validate()?;
    Ok(config)
}

/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| VsphereDbError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| VsphereDbError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(VsphereDbError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a configuration file
///
/// Returns the first existing candidate, or `None`.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.clone());
        dirs.push(cwd.join(".."));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn parse_kinds(list: &str) -> Result<Vec<ObjectKind>> {
    let mut kinds = Vec::new();
    for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let kind = ObjectKind::from_str(name)
            .map_err(|e| VsphereDbError::Config(format!("VSPHEREDB_SYNC_KINDS: {e}")))?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    if kinds.is_empty() {
        return Err(VsphereDbError::Config("VSPHEREDB_SYNC_KINDS names no object kind".into()));
    }
    Ok(kinds)
}

/// Get required environment variable
///
/// # Errors
/// Returns `VsphereDbError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        VsphereDbError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Parse an optional environment variable, `None` when unset.
fn env_parse<T>(key: &str, what: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| VsphereDbError::Config(format!("Invalid {what}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
