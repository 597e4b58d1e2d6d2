//! Effective configuration with provenance
//!
//! Records the merged configuration and where each layer came from.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use mpd_resolver::{ConflictPolicy, ResolverOptions};
use mpd_schema::{family_by_name, SchemaNode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::defaults::BuiltinDefaults;
use super::merge::merge_layers;

/// Schema identifier of the serialized effective config
pub const SCHEMA_ID: &str = "mpd-inherit/effective_config@1";

/// Project config file name, looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = ".mpd-inherit.toml";

/// Upper bound accepted for `resolver.max_depth`
const MAX_DEPTH_LIMIT: u64 = 4096;

/// Origin of a configuration layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    Host,
    Project,
    Cli,
}

/// A contributing layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 of the raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Merged configuration with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub schema_id: String,

    pub created_at: DateTime<Utc>,

    /// The merged configuration object
    pub config: Value,

    /// Contributing layers in precedence order
    pub sources: Vec<ConfigSource>,
}

/// Host config location: `$HOME/.config/mpd-inherit/config.toml`
pub fn default_host_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".config/mpd-inherit/config.toml"))
}

impl EffectiveConfig {
    /// Build the effective config; missing files are skipped.
    pub fn build(
        host_config_path: Option<&Path>,
        project_config_path: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<Self, ConfigError> {
        let mut layers = vec![BuiltinDefaults::default().to_value()];
        let mut sources = vec![ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        }];

        for (origin, path) in [
            (ConfigOrigin::Host, host_config_path),
            (ConfigOrigin::Project, project_config_path),
        ] {
            let Some(path) = path.filter(|p| p.exists()) else {
                continue;
            };
            let (value, digest) = Self::load_toml_file(path)?;
            tracing::debug!(origin = ?origin, path = %path.display(), "loaded config layer");
            layers.push(value);
            sources.push(ConfigSource {
                origin,
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            });
        }

        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let merged = merge_layers(layers);
        Self::validate_config(&merged)?;

        Ok(Self {
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            config: merged,
            sources,
        })
    }

    /// Read a TOML file, returning it as JSON plus its digest
    fn load_toml_file(path: &Path) -> Result<(Value, String), ConfigError> {
        let bytes = fs::read(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        let digest = hex::encode(Sha256::digest(&bytes));

        let contents = String::from_utf8(bytes)
            .map_err(|e| ConfigError::Parse(format!("{}: invalid UTF-8: {}", path.display(), e)))?;

        let toml_value: toml::Value = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;

        Ok((Self::toml_to_json(toml_value), digest))
    }

    fn toml_to_json(toml: toml::Value) -> Value {
        match toml {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(i) => Value::Number(i.into()),
            toml::Value::Float(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => Value::String(dt.to_string()),
            toml::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Self::toml_to_json).collect())
            }
            toml::Value::Table(table) => Value::Object(
                table
                    .into_iter()
                    .map(|(k, v)| (k, Self::toml_to_json(v)))
                    .collect(),
            ),
        }
    }

    fn validate_config(config: &Value) -> Result<(), ConfigError> {
        if let Some(depth) = config.get("resolver").and_then(|r| r.get("max_depth")) {
            if !matches!(depth.as_u64(), Some(d) if d > 0 && d <= MAX_DEPTH_LIMIT) {
                return Err(ConfigError::Validation(format!(
                    "resolver.max_depth must be an integer in (0, {}]",
                    MAX_DEPTH_LIMIT
                )));
            }
        }

        if let Some(policy) = config.get("resolver").and_then(|r| r.get("conflict_policy")) {
            let parsed = policy
                .as_str()
                .ok_or_else(|| "conflict policy must be a string".to_string())
                .and_then(|s| s.parse::<ConflictPolicy>());
            if let Err(e) = parsed {
                return Err(ConfigError::Validation(format!("resolver.conflict_policy: {}", e)));
            }
        }

        let families = config
            .get("families")
            .and_then(Value::as_array)
            .ok_or_else(|| ConfigError::Validation("families must be a list".to_string()))?;
        if families.is_empty() {
            return Err(ConfigError::Validation(
                "families must name at least one family".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for family in families {
            let Some(name) = family.as_str().filter(|n| family_by_name(n).is_some()) else {
                return Err(ConfigError::Validation(format!(
                    "unknown family {} in families",
                    family
                )));
            };
            if !seen.insert(name) {
                return Err(ConfigError::Validation(format!(
                    "family {} listed more than once in families",
                    family
                )));
            }
        }

        Ok(())
    }

    /// Typed resolver options
    pub fn resolver_options(&self) -> ResolverOptions {
        let mut options = ResolverOptions::default();
        if let Some(policy) = self
            .get_str("resolver.conflict_policy")
            .and_then(|s| s.parse().ok())
        {
            options.conflict_policy = policy;
        }
        if let Some(depth) = self.get_u64("resolver.max_depth") {
            options.max_depth = depth as usize;
        }
        options
    }

    /// Configured families, in application order
    pub fn families(&self) -> Vec<&'static SchemaNode> {
        self.family_names()
            .into_iter()
            .filter_map(family_by_name)
            .collect()
    }

    pub fn family_names(&self) -> Vec<&str> {
        self.get("families")
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Get a config value by dot-separated path
    pub fn get(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.config, |current, part| current.get(part))
    }

    pub fn get_u64(&self, path: &str) -> Option<u64> {
        self.get(path).and_then(|v| v.as_u64())
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|v| v.as_str())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
