//! Post-merge configuration validation.

use std::collections::HashSet;

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Accepted values for `logging.level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Accepted values for `logging.format`.
pub const LOG_FORMATS: [&str; 4] = ["pretty", "compact", "json", "full"];

/// Validate a fully-merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_logging(config)?;
    validate_chain(config)?;
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        return Err(ConfigError::invalid(
            "logging.level",
            format!(
                "unsupported log level '{}'; expected one of: {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        ));
    }

    if !LOG_FORMATS.contains(&config.logging.format.as_str()) {
        return Err(ConfigError::invalid(
            "logging.format",
            format!(
                "unsupported log format '{}'; expected one of: {}",
                config.logging.format,
                LOG_FORMATS.join(", ")
            ),
        ));
    }

    Ok(())
}

fn validate_chain(config: &Config) -> ConfigResult<()> {
    let chain = &config.chain;

    if chain.stages.is_empty() {
        return Err(ConfigError::invalid(
            "chain.stages",
            "at least one stage is required",
        ));
    }

    let mut seen = HashSet::new();
    for stage in &chain.stages {
        if stage.trim().is_empty() {
            return Err(ConfigError::invalid(
                "chain.stages",
                "stage names must not be empty",
            ));
        }
        if !seen.insert(stage.as_str()) {
            return Err(ConfigError::invalid(
                "chain.stages",
                format!("stage '{stage}' is listed more than once"),
            ));
        }
    }

    // Sorted so the reported key does not depend on hash order.
    let mut eager: Vec<&String> = chain.eager.keys().collect();
    eager.sort();
    if let Some(stray) = eager.into_iter().find(|name| !seen.contains(name.as_str())) {
        return Err(ConfigError::invalid(
            format!("chain.eager.{stray}"),
            format!("stage '{stray}' is not listed in chain.stages"),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_invalid_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_owned();
        let err = validate(&config).unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationError { ref field, .. } if field == "logging.level")
        );
    }

    #[test]
    fn test_invalid_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_owned();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_chain_rejected() {
        let mut config = Config::default();
        config.chain.stages.clear();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_duplicate_stage_rejected() {
        let mut config = Config::default();
        config.chain.stages.push("route".to_owned());
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_blank_stage_rejected() {
        let mut config = Config::default();
        config.chain.stages.push("  ".to_owned());
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_eager_must_name_listed_stage() {
        let mut config = Config::default();
        config.chain.eager.insert("route".to_owned(), false);
        assert!(validate(&config).is_ok());

        config.chain.eager.insert("dispatch".to_owned(), true);
        let err = validate(&config).unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationError { ref field, .. } if field == "chain.eager.dispatch")
        );
    }
}
