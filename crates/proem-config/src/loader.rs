//! Config file discovery and layered loading.
//!
//! Implements the `Config::load()` algorithm:
//! 1. Parse `defaults.toml` as the base
//! 2. Merge `~/.proem/config.toml` (user)
//! 3. Merge `{workspace}/.proem/config.toml` (workspace)
//! 4. Apply `PROEM_*` env var fallbacks for fields no file set
//! 5. Deserialize the merged tree into [`Config`]
//! 6. Validate

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::merge::{contains_path, deep_merge};
use crate::types::Config;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum allowed config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Directory holding config files under the home and workspace roots.
const CONFIG_DIR: &str = ".proem";

/// Config file name.
const CONFIG_FILE: &str = "config.toml";

/// Environment variables consulted for fields no config file sets, with the
/// dotted field each one fills.
const ENV_FALLBACKS: [(&str, &str); 2] = [
    ("PROEM_LOG_LEVEL", "logging.level"),
    ("PROEM_LOG_FORMAT", "logging.format"),
];

/// A loaded configuration and the files it came from.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The merged, validated configuration.
    pub config: Config,
    /// Config files that were found and merged, in merge order.
    pub loaded_files: Vec<PathBuf>,
}

/// Load configuration with layered file precedence.
///
/// `workspace_root` is the root of the current project. If `None`, the
/// workspace layer is skipped. `home_override` replaces the user's home
/// directory for user-level discovery; `{home}/.proem/config.toml` is read
/// either way.
///
/// # Errors
///
/// Returns a [`ConfigError`] if any config file is unreadable, oversized or
/// malformed, or if the merged configuration fails validation.
pub fn load(
    workspace_root: Option<&Path>,
    home_override: Option<&Path>,
) -> ConfigResult<ResolvedConfig> {
    let home_dir = match home_override {
        Some(h) => h.to_path_buf(),
        None => home_directory()?,
    };
    load_layers(workspace_root, &home_dir, &collect_env_vars())
}

/// Load a config from a specific file path (no layering).
///
/// Keys missing from the file take their built-in defaults.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
/// validation.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let Some(overlay) = try_load_file(path)? else {
        return Err(ConfigError::ReadError {
            path: path.display().to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
    };

    let mut merged = parse_defaults()?;
    deep_merge(&mut merged, &overlay);
    finish(merged, &path.display().to_string())
}

fn load_layers(
    workspace_root: Option<&Path>,
    home_dir: &Path,
    env_vars: &HashMap<String, String>,
) -> ConfigResult<ResolvedConfig> {
    let mut merged = parse_defaults()?;
    // Everything any file set, used to decide which env fallbacks apply.
    let mut from_files = toml::Value::Table(toml::Table::new());
    let mut loaded_files = Vec::new();

    let user_path = home_dir.join(CONFIG_DIR).join(CONFIG_FILE);
    let workspace_path = workspace_root.map(|root| root.join(CONFIG_DIR).join(CONFIG_FILE));

    for path in std::iter::once(user_path).chain(workspace_path) {
        if let Some(overlay) = try_load_file(&path)? {
            deep_merge(&mut merged, &overlay);
            deep_merge(&mut from_files, &overlay);
            info!(path = %path.display(), "loaded config file");
            loaded_files.push(path);
        }
    }

    let env_count = apply_env_fallbacks(&mut merged, &from_files, env_vars);
    if env_count > 0 {
        debug!(count = env_count, "applied environment variable fallbacks");
    }

    let config = finish(merged, "<merged config>")?;
    Ok(ResolvedConfig {
        config,
        loaded_files,
    })
}

fn parse_defaults() -> ConfigResult<toml::Value> {
    toml::from_str(DEFAULTS_TOML).map_err(|e| ConfigError::ParseError {
        path: "<embedded defaults>".to_owned(),
        source: e,
    })
}

fn finish(merged: toml::Value, origin: &str) -> ConfigResult<Config> {
    let config: Config = merged
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::ParseError {
            path: origin.to_owned(),
            source: e,
        })?;

    validate::validate(&config)?;
    Ok(config)
}

/// Fill fields that no config file set from `PROEM_*` variables.
/// Returns how many fields were filled.
fn apply_env_fallbacks(
    merged: &mut toml::Value,
    from_files: &toml::Value,
    env_vars: &HashMap<String, String>,
) -> usize {
    let mut applied: usize = 0;
    for (var, field) in ENV_FALLBACKS {
        let Some(value) = env_vars.get(var) else {
            continue;
        };
        if contains_path(from_files, field) {
            debug!(var, field, "config file value takes precedence over env var");
            continue;
        }
        if set_path(merged, field, toml::Value::String(value.clone())) {
            applied = applied.saturating_add(1);
        }
    }
    applied
}

/// Set a dotted `path` in `tree`, creating intermediate tables.
fn set_path(tree: &mut toml::Value, path: &str, value: toml::Value) -> bool {
    let mut node = tree;
    let mut keys = path.split('.').peekable();
    while let Some(key) = keys.next() {
        let Some(table) = node.as_table_mut() else {
            return false;
        };
        if keys.peek().is_none() {
            table.insert(key.to_owned(), value);
            return true;
        }
        node = table
            .entry(key)
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
    }
    false
}

fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(key, _)| key.starts_with("PROEM_"))
        .collect()
}

/// Try to load a file, returning `None` if the file doesn't exist.
///
/// Uses a single read operation rather than a separate exists check.
fn try_load_file(path: &Path) -> ConfigResult<Option<toml::Value>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, skipping");
            return Ok(None);
        },
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.display().to_string(),
                source: e,
            });
        },
    };

    let size = u64::try_from(content.len()).unwrap_or(u64::MAX);
    if size > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::invalid(
            path.display().to_string(),
            format!("config file is {size} bytes, exceeding the {MAX_CONFIG_FILE_SIZE} byte limit"),
        ));
    }

    let value: toml::Value = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(Some(value))
}

/// Determine the user's home directory.
fn home_directory() -> ConfigResult<PathBuf> {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDir)
}
