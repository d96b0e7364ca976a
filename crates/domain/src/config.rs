//! Configuration management

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Result, VsphereDbError};
use crate::types::ObjectKind;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub vcenter: VCenterConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

/// Connection details of the vCenter to mirror
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VCenterConfig {
    /// Instance UUID of the vCenter, namespace for all derived object UUIDs
    pub instance_uuid: Uuid,
    pub name: String,
    /// Base URL of the property collector API
    pub api_url: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    /// Total attempts per request, initial try included
    pub max_attempts: u32,
    /// Accept self-signed vCenter certificates
    pub accept_invalid_certs: bool,
    /// Explicit proxy URL; the standard proxy variables apply when unset
    pub proxy: Option<String>,
}

/// Which object kinds a pass covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub object_kinds: Vec<ObjectKind>,
}

impl Config {
    /// Reject settings that deserialize fine but cannot drive a sync pass.
    ///
    /// # Errors
    /// Returns `VsphereDbError::Config` naming the first offending setting.
    pub fn validate(&self) -> Result<()> {
        if self.sync.object_kinds.is_empty() {
            return Err(VsphereDbError::Config("sync.object_kinds names no object kind".into()));
        }
        if self.database.pool_size == 0 {
            return Err(VsphereDbError::Config("database.pool_size must be at least 1".into()));
        }
        if self.http.max_attempts == 0 {
            return Err(VsphereDbError::Config("http.max_attempts must be at least 1".into()));
        }
        Ok(())
    }
}

fn default_pool_size() -> u32 {
    4
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30, max_attempts: 3, accept_invalid_certs: false, proxy: None }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { object_kinds: ObjectKind::ALL.to_vec() }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "vspheredb.db".to_string(), pool_size: default_pool_size() }
    }
}
