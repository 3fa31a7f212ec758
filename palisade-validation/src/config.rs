// Environment-driven configuration

use crate::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;

/// Field name used in messages until a rule is bound to a named field.
pub const DEFAULT_FIELD_NAME: &str = "The Field";

const DEFAULT_REGEX_SIZE_LIMIT: usize = 1 << 20;

static CONFIG: Lazy<ValidationConfig> = Lazy::new(|| match ValidationConfig::from_env() {
    Ok(config) => config,
    Err(e) => {
        tracing::warn!(target: "palisade::config", "Falling back to default configuration: {}", e);
        ValidationConfig::default()
    }
});

/// Library-wide settings.
///
/// Read once from `PALISADE_*` environment variables:
///
/// | variable | default |
/// |---|---|
/// | `PALISADE_DEFAULT_FIELD_NAME` | `The Field` |
/// | `PALISADE_HUMANIZE_FIELD_NAMES` | `true` |
/// | `PALISADE_REGEX_SIZE_LIMIT` | `1048576` |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    pub default_field_name: String,
    pub humanize_field_names: bool,
    /// Compiled size limit applied to caller-supplied patterns.
    pub regex_size_limit: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            default_field_name: DEFAULT_FIELD_NAME.to_string(),
            humanize_field_names: true,
            regex_size_limit: DEFAULT_REGEX_SIZE_LIMIT,
        }
    }
}

impl ValidationConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(&EnvLoader::new(Some("PALISADE".to_string())).load())
    }

    /// Build from already-collected, lowercased keys (prefix removed).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(name) = vars.get("default_field_name") {
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::Config {
                    key: "default_field_name".to_string(),
                    message: "must not be blank".to_string(),
                });
            }
            config.default_field_name = name.to_string();
        }

        if let Some(flag) = vars.get("humanize_field_names") {
            config.humanize_field_names = parse_flag("humanize_field_names", flag)?;
        }

        if let Some(limit) = vars.get("regex_size_limit") {
            config.regex_size_limit = limit.trim().parse().map_err(|_| Error::Config {
                key: "regex_size_limit".to_string(),
                message: format!("'{}' is not a byte count", limit),
            })?;
        }

        Ok(config)
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config {
            key: key.to_string(),
            message: format!("'{}' is not a boolean", raw),
        }),
    }
}

/// The process-wide configuration, loaded on first use.
pub fn config() -> &'static ValidationConfig {
    &CONFIG
}

/// Environment variable loader
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Collect matching variables, keyed by lowercased name without the prefix.
    pub fn load(&self) -> HashMap<String, String> {
        let mut vars = HashMap::new();

        for (key, value) in env::vars() {
            match self.prefix {
                Some(ref prefix) => {
                    if let Some(rest) = key.strip_prefix(prefix.as_str()) {
                        vars.insert(rest.trim_start_matches('_').to_lowercase(), value);
                    }
                }
                None => {
                    vars.insert(key.to_lowercase(), value);
                }
            }
        }

        vars
    }
}
