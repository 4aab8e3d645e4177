//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.podium/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PodiumConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
    #[serde(default)]
    pub evaluators: Vec<InterpreterEntry>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub start_evaluating: Option<bool>,
    pub min_width: Option<u16>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EvaluatorConfig {
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InterpreterEntry {
    pub language: String,
    pub command: Vec<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_EVAL_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MIN_WIDTH: u16 = 20;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub start_evaluating: bool,
    pub min_width: u16,
    pub eval_timeout: Duration,
    pub interpreters: HashMap<String, Vec<String>>,
}

/// Settings that came from command-line flags.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub exec: bool,
    pub timeout_secs: Option<u64>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.podium/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".podium").join("config.toml"))
}

/// Load config from `~/.podium/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `PodiumConfig::default()`.
pub fn load_config() -> Result<PodiumConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(PodiumConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(PodiumConfig::default());
    }

    load_config_from(&path)
}

/// Load config from an explicit path. A malformed file is `ConfigError::Parse`.
pub fn load_config_from(path: &Path) -> Result<PodiumConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: PodiumConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Podium Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# start_evaluating = false          # Same as passing --exec
# min_width = 20                    # Narrowest width slides are laid out for

# [evaluator]
# timeout_secs = 10                 # Or set PODIUM_EVAL_TIMEOUT

# [[evaluators]]
# language = "python"
# command = ["python3", "-q"]

# [[evaluators]]
# language = "rust"
# command = ["rust-script", "-"]
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &PodiumConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, std::env::var("PODIUM_EVAL_TIMEOUT").ok())
}

fn resolve_with_env(
    config: &PodiumConfig,
    cli: &CliOverrides,
    env_timeout: Option<String>,
) -> ResolvedConfig {
    // Timeout: CLI → env → config → default
    let env_timeout = env_timeout.and_then(|raw| match raw.trim().parse::<u64>() {
        Ok(secs) => Some(secs),
        Err(e) => {
            warn!("Ignoring PODIUM_EVAL_TIMEOUT={:?}: {}", raw, e);
            None
        }
    });
    let timeout_secs = cli
        .timeout_secs
        .or(env_timeout)
        .or(config.evaluator.timeout_secs)
        .unwrap_or(DEFAULT_EVAL_TIMEOUT_SECS)
        .max(1);

    // Later entries for the same language win
    let interpreters = config
        .evaluators
        .iter()
        .map(|entry| (entry.language.to_lowercase(), entry.command.clone()))
        .collect();

    ResolvedConfig {
        start_evaluating: cli.exec || config.general.start_evaluating.unwrap_or(false),
        min_width: config
            .general
            .min_width
            .unwrap_or(DEFAULT_MIN_WIDTH)
            .max(DEFAULT_MIN_WIDTH),
        eval_timeout: Duration::from_secs(timeout_secs),
        interpreters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = PodiumConfig::default();
        assert!(config.evaluators.is_empty());
        assert!(config.general.start_evaluating.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&PodiumConfig::default(), &CliOverrides::default(), None);
        assert!(!resolved.start_evaluating);
        assert_eq!(resolved.min_width, DEFAULT_MIN_WIDTH);
        assert_eq!(resolved.eval_timeout, Duration::from_secs(DEFAULT_EVAL_TIMEOUT_SECS));
        assert!(resolved.interpreters.is_empty());
    }

    #[test]
    fn test_timeout_precedence() {
        let config = PodiumConfig {
            evaluator: EvaluatorConfig {
                timeout_secs: Some(30),
            },
            ..Default::default()
        };
        let none = CliOverrides::default();
        assert_eq!(
            resolve_with_env(&config, &none, None).eval_timeout,
            Duration::from_secs(30)
        );
        assert_eq!(
            resolve_with_env(&config, &none, Some("5".into())).eval_timeout,
            Duration::from_secs(5)
        );
        let cli = CliOverrides {
            exec: false,
            timeout_secs: Some(2),
        };
        assert_eq!(
            resolve_with_env(&config, &cli, Some("5".into())).eval_timeout,
            Duration::from_secs(2)
        );
    }

    #[test]
    fn test_bad_env_timeout_ignored() {
        let resolved = resolve_with_env(
            &PodiumConfig::default(),
            &CliOverrides::default(),
            Some("soon".into()),
        );
        assert_eq!(resolved.eval_timeout, Duration::from_secs(DEFAULT_EVAL_TIMEOUT_SECS));
    }

    #[test]
    fn test_zero_timeout_raised_to_one_second() {
        let cli = CliOverrides {
            exec: false,
            timeout_secs: Some(0),
        };
        let resolved = resolve_with_env(&PodiumConfig::default(), &cli, None);
        assert_eq!(resolved.eval_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_cli_exec_wins() {
        let config = PodiumConfig {
            general: GeneralConfig {
                start_evaluating: Some(false),
                min_width: Some(5),
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            exec: true,
            timeout_secs: None,
        };
        let resolved = resolve_with_env(&config, &cli, None);
        assert!(resolved.start_evaluating);
        assert_eq!(resolved.min_width, DEFAULT_MIN_WIDTH);
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
start_evaluating = true
min_width = 40

[evaluator]
timeout_secs = 3

[[evaluators]]
language = "Python"
command = ["python3", "-q"]

[[evaluators]]
language = "lua"
command = ["lua", "-"]
"#;
        let config: PodiumConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.start_evaluating, Some(true));
        assert_eq!(config.evaluators.len(), 2);

        let resolved = resolve_with_env(&config, &CliOverrides::default(), None);
        assert!(resolved.start_evaluating);
        assert_eq!(resolved.min_width, 40);
        assert_eq!(resolved.eval_timeout, Duration::from_secs(3));
        assert_eq!(
            resolved.interpreters.get("python"),
            Some(&vec!["python3".to_string(), "-q".to_string()])
        );
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[evaluator]
timeout_secs = 4
"#;
        let config: PodiumConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.evaluator.timeout_secs, Some(4));
        assert!(config.general.min_width.is_none());
        assert!(config.evaluators.is_empty());
    }

    #[test]
    fn test_load_config_from_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[general\nmin_width = ").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_generated_default_is_valid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        generate_default_config(&path);
        let config = load_config_from(&path).unwrap();
        assert!(config.evaluators.is_empty());
    }
}
