//! Configuration for Sharpen (`sharpen.toml`).
//!
//! Every section has defaults, so an empty file (or no file at all) yields
//! [`SharpenConfig::default`]. Unknown keys are rejected.

use std::path::Path;
use std::sync::Once;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

mod schema;

pub use schema::{json_schema, json_schema_string};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct SharpenConfig {
    #[serde(default)]
    pub names: NamesConfig,
    #[serde(default)]
    pub refactorings: RefactoringsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Names given to declarations that refactorings introduce.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct NamesConfig {
    /// Method created by "extract method".
    pub extracted_method: String,
    /// Local created by "introduce variable".
    pub introduced_local: String,
    /// Prefix of the locals created by "introduce explaining variables";
    /// a running number is appended.
    pub explaining_variable_prefix: String,
    pub renamed_local: String,
    pub renamed_parameter: String,
    pub parameter_object_type: String,
    pub parameter_object_parameter: String,
    /// Receiver parameter added by "make method static".
    pub receiver_parameter: String,
    /// Local introduced by "remove assignment to parameter".
    pub temp_variable: String,
    pub magic_number_constant: String,
    pub singleton_accessor: String,
    pub singleton_field: String,
    /// Prepended to the type name to name a factory method.
    pub factory_method_prefix: String,
    /// Prepended to the capitalized field name to name an encapsulating
    /// property.
    pub property_prefix: String,
}

impl Default for NamesConfig {
    fn default() -> Self {
        Self {
            extracted_method: "NewMethod".to_owned(),
            introduced_local: "newVariable".to_owned(),
            explaining_variable_prefix: "isVar".to_owned(),
            renamed_local: "newVariableName".to_owned(),
            renamed_parameter: "newParameterName".to_owned(),
            parameter_object_type: "ParameterObject".to_owned(),
            parameter_object_parameter: "parameterObject".to_owned(),
            receiver_parameter: "self".to_owned(),
            temp_variable: "tempVariable".to_owned(),
            magic_number_constant: "MAGIC_NUMBER".to_owned(),
            singleton_accessor: "Instance".to_owned(),
            singleton_field: "instance".to_owned(),
            factory_method_prefix: "Create".to_owned(),
            property_prefix: "Get".to_owned(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct RefactoringsConfig {
    /// Refactoring ids (kebab-case, e.g. `extract-method`) that are never
    /// offered.
    pub disabled: Vec<String>,
}

impl RefactoringsConfig {
    pub fn is_enabled(&self, id: &str) -> bool {
        !self.disabled.iter().any(|disabled| disabled.trim() == id)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Either a simple level (`info`, `debug`, ...) or an `EnvFilter`
    /// directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    /// Maps the usual level spellings onto `EnvFilter` levels; anything else
    /// is passed through as a directive string.
    fn normalize_level_directives(input: &str) -> String {
        let level = input.trim();
        if level.is_empty() {
            return Self::default_level();
        }
        let lower = level.to_ascii_lowercase();
        match lower.as_str() {
            "warning" => "warn".to_owned(),
            "trace" | "debug" | "info" | "warn" | "error" => lower,
            _ => level.to_owned(),
        }
    }

    /// The effective filter: the configured level, merged with `RUST_LOG`
    /// when that is set.
    pub fn env_filter(&self) -> EnvFilter {
        let configured = Self::normalize_level_directives(&self.level);
        let from_env = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        let candidates = match from_env {
            Some(env) => vec![format!("{configured},{env}"), env, configured],
            None => vec![configured],
        };
        candidates
            .into_iter()
            .find_map(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::default().add_directive(LevelFilter::INFO.into()))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // Keep the message only; the default rendering quotes the input.
        ConfigError::Toml(err.message().to_owned())
    }
}

impl SharpenConfig {
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::load_from_str(&text)?;
        tracing::debug!(
            target: "sharpen.config",
            path = %path.display(),
            disabled = config.refactorings.disabled.len(),
            "loaded config"
        );
        Ok(config)
    }
}

static TRACING_INIT: Once = Once::new();

/// Installs the global `tracing` subscriber, writing to stderr. Only the
/// first call in a process has an effect, and a subscriber a host installed
/// earlier is left in place.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let fmt = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false);
        let layer: Box<dyn Layer<_> + Send + Sync> = match config.json {
            true => fmt.json().boxed(),
            false => fmt.boxed(),
        };
        let installed = tracing_subscriber::registry()
            .with(config.env_filter())
            .with(layer)
            .try_init();
        if installed.is_err() {
            tracing::debug!(target: "sharpen.config", "keeping existing subscriber");
        }
    });
}
