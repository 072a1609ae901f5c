//! Configuration management for `bq`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. CLI overrides
//! 2. Environment variables (`BQ_*`)
//! 3. Explicit config file (`--config`)
//! 4. Project config (`.bq/config.yaml`)
//! 5. User config (`~/.config/bq/config.yaml`)
//! 6. Defaults
//!
//! Keys are flattened with dots (`sort.field`) and compared after
//! normalization, so `BQ_SORT_FIELD`, `sort_field` and `sort.field` all name
//! the same setting.

use crate::error::{QueryError, Result};
use crate::query::{LogicalField, QueryState, SortDirection};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::io::{self, IsTerminal};
use std::path::Path;
use tracing::debug;

/// Prefix for environment overrides.
const ENV_PREFIX: &str = "BQ_";

pub const KEY_SORT_FIELD: &str = "sort.field";
pub const KEY_SORT_DIRECTION: &str = "sort.direction";
pub const KEY_COLOR: &str = "color";
pub const KEY_SEARCH_GROUP: &str = "search.group";
pub const KEY_MAX_WIDTH: &str = "display.max-width";

/// One configuration source: flattened keys to string values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub values: HashMap<String, String>,
}

impl ConfigLayer {
    /// Set `key` (normalized) to `value`.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(normalize_key(key), value.into());
    }

    /// Look up `key` (normalized).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&normalize_key(key)).map(String::as_str)
    }

    /// Merge another layer on top of this one (higher precedence wins).
    pub fn merge_from(&mut self, other: &Self) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Merge multiple layers in precedence order (lowest to highest).
    #[must_use]
    pub fn merge_layers(layers: &[Self]) -> Self {
        let mut merged = Self::default();
        for layer in layers {
            merged.merge_from(layer);
        }
        merged
    }

    /// Build a layer from a YAML file path. Missing files return empty config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let value: serde_yaml::Value = serde_yaml::from_str(&contents)?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(layer_from_yaml_value(&value))
    }

    /// Build a layer from `BQ_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(env::vars())
    }

    fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut layer = Self::default();
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                layer.set(stripped, value);
            }
        }
        layer
    }
}

/// CLI overrides for config loading (optional).
///
/// Per-command flags such as `--sort` are applied to the query state by the
/// command itself; only global flags live here.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub no_color: Option<bool>,
}

impl CliOverrides {
    #[must_use]
    pub fn as_layer(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::default();
        if self.no_color == Some(true) {
            layer.set(KEY_COLOR, "never");
        }
        layer
    }
}

/// Load project config (`<root>/.bq/config.yaml`).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ConfigLayer> {
    ConfigLayer::from_yaml(&project_root.join(".bq").join("config.yaml"))
}

/// Load user config (`~/.config/bq/config.yaml`).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<ConfigLayer> {
    let Ok(home) = env::var("HOME") else {
        return Ok(ConfigLayer::default());
    };
    let path = Path::new(&home)
        .join(".config")
        .join("bq")
        .join("config.yaml");
    ConfigLayer::from_yaml(&path)
}

/// Load a config file named on the command line. Unlike discovered files it must exist.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, or not valid YAML.
pub fn load_explicit_config(path: &Path) -> Result<ConfigLayer> {
    if !path.is_file() {
        return Err(QueryError::Config(format!(
            "config file not found: {}",
            path.display()
        )));
    }
    ConfigLayer::from_yaml(path)
}

/// Default config layer (lowest precedence).
#[must_use]
pub fn default_config_layer() -> ConfigLayer {
    let mut layer = ConfigLayer::default();
    layer.set(KEY_SORT_FIELD, QueryState::DEFAULT_SORT_FIELD.as_str());
    layer.set(KEY_SORT_DIRECTION, SortDirection::default().as_str());
    layer.set(KEY_COLOR, "auto");
    layer.set(KEY_SEARCH_GROUP, "true");
    layer
}

/// Load configuration with the documented precedence order.
///
/// # Errors
///
/// Returns an error if any config file cannot be read or parsed, or the
/// explicit config file does not exist.
pub fn load_config(
    project_root: &Path,
    explicit: Option<&Path>,
    cli: &CliOverrides,
) -> Result<ConfigLayer> {
    let defaults = default_config_layer();
    let user = load_user_config()?;
    let project = load_project_config(project_root)?;
    let explicit = match explicit {
        Some(path) => load_explicit_config(path)?,
        None => ConfigLayer::default(),
    };
    let env_layer = ConfigLayer::from_env();
    let cli_layer = cli.as_layer();

    Ok(ConfigLayer::merge_layers(&[
        defaults, user, project, explicit, env_layer, cli_layer,
    ]))
}

/// Load and resolve typed settings in one step.
///
/// # Errors
///
/// Returns an error if any config source cannot be loaded or holds an
/// invalid value.
pub fn load_settings(
    project_root: &Path,
    explicit: Option<&Path>,
    cli: &CliOverrides,
) -> Result<Settings> {
    let layer = load_config(project_root, explicit, cli)?;
    Settings::from_layer(&layer)
}

/// Color preference from config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Resolve `Auto` against `NO_COLOR` and whether stdout is a terminal.
    #[must_use]
    pub fn use_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal(),
        }
    }
}

/// Typed settings resolved from a merged [`ConfigLayer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub sort_field: LogicalField,
    pub sort_direction: SortDirection,
    pub color: ColorChoice,
    pub search_group: bool,
    pub max_width: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sort_field: QueryState::DEFAULT_SORT_FIELD,
            sort_direction: SortDirection::default(),
            color: ColorChoice::default(),
            search_group: true,
            max_width: None,
        }
    }
}

impl Settings {
    /// Parse typed settings, falling back to defaults for missing keys.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Config`] naming the key when a value is invalid.
    pub fn from_layer(layer: &ConfigLayer) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(value) = non_empty(layer.get(KEY_SORT_FIELD)) {
            settings.sort_field = LogicalField::parse_known(value)
                .ok_or_else(|| invalid_value(KEY_SORT_FIELD, value))?;
        }
        if let Some(value) = non_empty(layer.get(KEY_SORT_DIRECTION)) {
            settings.sort_direction = value
                .parse()
                .map_err(|_| invalid_value(KEY_SORT_DIRECTION, value))?;
        }
        if let Some(value) = non_empty(layer.get(KEY_COLOR)) {
            settings.color = parse_color(value).ok_or_else(|| invalid_value(KEY_COLOR, value))?;
        }
        if let Some(value) = non_empty(layer.get(KEY_SEARCH_GROUP)) {
            settings.search_group =
                parse_bool(value).ok_or_else(|| invalid_value(KEY_SEARCH_GROUP, value))?;
        }
        if let Some(value) = non_empty(layer.get(KEY_MAX_WIDTH)) {
            let width = value
                .trim()
                .parse::<usize>()
                .map_err(|_| invalid_value(KEY_MAX_WIDTH, value))?;
            settings.max_width = (width > 0).then_some(width);
        }

        Ok(settings)
    }
}

fn invalid_value(key: &str, value: &str) -> QueryError {
    QueryError::Config(format!("invalid value for {key}: '{value}'"))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

fn parse_color(value: &str) -> Option<ColorChoice> {
    match value.trim().to_lowercase().as_str() {
        "auto" => Some(ColorChoice::Auto),
        "always" => Some(ColorChoice::Always),
        "never" => Some(ColorChoice::Never),
        other => parse_bool(other).map(|enabled| {
            if enabled {
                ColorChoice::Always
            } else {
                ColorChoice::Never
            }
        }),
    }
}

/// Normalize a config key: lowercase, with `_`, `-` and `.` all read as `.`.
fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace(['_', '-'], ".")
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

fn layer_from_yaml_value(value: &serde_yaml::Value) -> ConfigLayer {
    let mut flat = HashMap::new();
    flatten_yaml(value, "", &mut flat);

    let mut layer = ConfigLayer::default();
    for (key, value) in flat {
        layer.set(&key, value);
    }
    layer
}

fn flatten_yaml(value: &serde_yaml::Value, prefix: &str, out: &mut HashMap<String, String>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (key, value) in map {
                let Some(key_str) = key.as_str() else {
                    continue;
                };
                let next_prefix = if prefix.is_empty() {
                    key_str.to_string()
                } else {
                    format!("{prefix}.{key_str}")
                };
                flatten_yaml(value, &next_prefix, out);
            }
        }
        serde_yaml::Value::Sequence(values) => {
            let joined = values
                .iter()
                .filter_map(yaml_scalar_to_string)
                .collect::<Vec<_>>()
                .join(",");
            out.insert(prefix.to_string(), joined);
        }
        _ => {
            if let Some(value) = yaml_scalar_to_string(value) {
                out.insert(prefix.to_string(), value);
            }
        }
    }
}

fn yaml_scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Bool(v) => Some(v.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Null
        | serde_yaml::Value::Sequence(_)
        | serde_yaml::Value::Mapping(_) => None,
        serde_yaml::Value::Tagged(tagged) => yaml_scalar_to_string(&tagged.value),
    }
}
