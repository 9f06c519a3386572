//! Request validation configuration.
//!
//! Loaded from TOML with optional environment overrides. Precedence, lowest
//! to highest:
//! 1. Defaults (no application id check, 150 second tolerance)
//! 2. File values
//! 3. `<PREFIX>_*` environment variables
//!
//! ```toml
//! application_id = "amzn1.ask.skill.xyzzy"
//! timestamp_tolerance_secs = 150
//! ignore_timestamp = false
//! ```

use std::env::VarError;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// Default maximum skew between request creation and processing.
pub const DEFAULT_TIMESTAMP_TOLERANCE_SECS: u64 = 150;

/// Default prefix for environment overrides.
pub const DEFAULT_ENV_PREFIX: &str = "ASKIT";

const OVERRIDE_SUFFIXES: [&str; 3] = [
    "APPLICATION_ID",
    "TIMESTAMP_TOLERANCE_SECS",
    "IGNORE_TIMESTAMP",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid value for ${var}: {value:?} (expected: {expected})")]
    InvalidEnvValue {
        var: String,
        value: String,
        expected: &'static str,
    },
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Expected `session.application.applicationId`. Unset or empty skips the
    /// identity check.
    #[serde(default)]
    pub application_id: Option<String>,

    /// Maximum allowed |now - request.timestamp| in seconds.
    #[serde(default = "default_timestamp_tolerance_secs")]
    pub timestamp_tolerance_secs: u64,

    /// Disable the freshness check entirely (offline testing and replay).
    #[serde(default)]
    pub ignore_timestamp: bool,
}

fn default_timestamp_tolerance_secs() -> u64 {
    DEFAULT_TIMESTAMP_TOLERANCE_SECS
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            application_id: None,
            timestamp_tolerance_secs: DEFAULT_TIMESTAMP_TOLERANCE_SECS,
            ignore_timestamp: false,
        }
    }
}

impl ValidationConfig {
    pub fn with_application_id(mut self, application_id: impl Into<String>) -> Self {
        self.application_id = Some(application_id.into());
        self
    }

    pub fn with_timestamp_tolerance_secs(mut self, secs: u64) -> Self {
        self.timestamp_tolerance_secs = secs;
        self
    }

    pub fn ignoring_timestamp(mut self) -> Self {
        self.ignore_timestamp = true;
        self
    }

    /// The configured application id, treating `""` as unset.
    pub fn expected_application_id(&self) -> Option<&str> {
        self.application_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Apply `<prefix>_APPLICATION_ID`, `<prefix>_TIMESTAMP_TOLERANCE_SECS` and
    /// `<prefix>_IGNORE_TIMESTAMP` from the process environment.
    ///
    /// Only those three variables are read; the rest of the environment is
    /// never inspected.
    pub fn with_env_overrides(self, prefix: &str) -> Result<Self, ConfigError> {
        self.with_overrides_lookup(prefix, read_env)
    }

    /// Same as [`Self::with_env_overrides`] but resolves each variable through
    /// `lookup`. A non-Unicode value is rejected; an absent one is skipped.
    pub fn with_overrides_lookup<F>(self, prefix: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let mut vars = Vec::new();
        for suffix in OVERRIDE_SUFFIXES {
            let var = format!("{prefix}_{suffix}");
            match lookup(&var) {
                Ok(value) => {
                    tracing::debug!("applying env override {var}");
                    vars.push((var, value));
                }
                Err(VarError::NotPresent) => {}
                Err(VarError::NotUnicode(raw)) => {
                    return Err(ConfigError::InvalidEnvValue {
                        var,
                        value: raw.to_string_lossy().into_owned(),
                        expected: "valid Unicode",
                    });
                }
            }
        }
        self.with_overrides_from(prefix, vars)
    }

    /// Apply overrides from explicit `(name, value)` pairs. Names that are not
    /// one of the `<prefix>_*` overrides are ignored.
    pub fn with_overrides_from<I, K, V>(
        mut self,
        prefix: &str,
        vars: I,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let application_id_var = format!("{prefix}_APPLICATION_ID");
        let tolerance_var = format!("{prefix}_TIMESTAMP_TOLERANCE_SECS");
        let ignore_var = format!("{prefix}_IGNORE_TIMESTAMP");

        for (key, value) in vars {
            let key = key.as_ref();
            if key == application_id_var {
                self.application_id = Some(value.into());
            } else if key == tolerance_var {
                let value = value.into();
                self.timestamp_tolerance_secs = value.trim().parse().map_err(|_| {
                    ConfigError::InvalidEnvValue {
                        var: tolerance_var.clone(),
                        value,
                        expected: "non-negative integer seconds",
                    }
                })?;
            } else if key == ignore_var {
                let value = value.into();
                self.ignore_timestamp =
                    parse_bool(&value).ok_or_else(|| ConfigError::InvalidEnvValue {
                        var: ignore_var.clone(),
                        value,
                        expected: "true, false, 1 or 0",
                    })?;
            }
        }

        Ok(self)
    }
}

fn read_env(name: &str) -> Result<String, VarError> {
    std::env::var(name)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
