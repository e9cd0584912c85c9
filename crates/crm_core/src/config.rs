//! Runtime configuration for services and logging.
//!
//! # Responsibility
//! - Hold simulated latency per operation class.
//! - Hold logging bootstrap parameters.
//!
//! # Invariants
//! - Defaults reproduce the browser mock layer: 300 ms for reads and writes,
//!   200 ms for filtered queries and stage moves.
//! - Invalid overrides are rejected, never silently ignored.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const ENV_LATENCY_MS: &str = "CRM_LATENCY_MS";
pub const ENV_QUERY_LATENCY_MS: &str = "CRM_QUERY_LATENCY_MS";
pub const ENV_LOG_LEVEL: &str = "CRM_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "CRM_LOG_DIR";

/// Class of service operation, used to pick a simulated latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpClass {
    /// Full reads and single-record lookups.
    Read,
    /// Filtered queries and aggregates.
    Query,
    /// Create, update and delete.
    Write,
    /// Deal stage moves.
    Stage,
}

/// Simulated latency per operation class, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    pub read_ms: u64,
    pub query_ms: u64,
    pub write_ms: u64,
    pub stage_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            read_ms: 300,
            query_ms: 200,
            write_ms: 300,
            stage_ms: 200,
        }
    }
}

impl LatencyConfig {
    /// No artificial delay; operations still yield once.
    pub fn immediate() -> Self {
        Self {
            read_ms: 0,
            query_ms: 0,
            write_ms: 0,
            stage_ms: 0,
        }
    }

    pub fn duration(&self, op: OpClass) -> Duration {
        let millis = match op {
            OpClass::Read => self.read_ms,
            OpClass::Query => self.query_ms,
            OpClass::Write => self.write_ms,
            OpClass::Stage => self.stage_ms,
        };
        Duration::from_millis(millis)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrmConfig {
    pub latency: LatencyConfig,
    pub log_level: String,
    /// Absolute directory for rolling log files; logging is off when unset.
    pub log_dir: Option<String>,
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            latency: LatencyConfig::default(),
            log_level: crate::logging::default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CrmConfig {
    /// Default configuration without simulated latency.
    pub fn immediate() -> Self {
        Self {
            latency: LatencyConfig::immediate(),
            ..Self::default()
        }
    }

    /// Parses a JSON document; omitted fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|err| format!("invalid config json: {err}"))
    }

    /// Applies `CRM_*` environment overrides on top of `self`.
    pub fn with_env_overrides(self) -> Result<Self, String> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup.
    ///
    /// `CRM_LATENCY_MS` sets read, write and stage latency;
    /// `CRM_QUERY_LATENCY_MS` sets query latency.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_LATENCY_MS) {
            let millis = parse_millis(ENV_LATENCY_MS, &raw)?;
            self.latency.read_ms = millis;
            self.latency.write_ms = millis;
            self.latency.stage_ms = millis;
        }
        if let Some(raw) = lookup(ENV_QUERY_LATENCY_MS) {
            self.latency.query_ms = parse_millis(ENV_QUERY_LATENCY_MS, &raw)?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level.trim().to_string();
        }
        if let Some(dir) = lookup(ENV_LOG_DIR) {
            let trimmed = dir.trim();
            self.log_dir = (!trimmed.is_empty()).then(|| trimmed.to_string());
        }
        Ok(self)
    }
}

fn parse_millis(key: &str, raw: &str) -> Result<u64, String> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| format!("`{key}` must be a non-negative integer, got `{raw}`"))
}
