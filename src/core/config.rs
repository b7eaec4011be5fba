//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.soma/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use clap::ValueEnum;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::core::engine::Granularity;
use crate::core::phrases::Locale;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SomaConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub narration: NarrationConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub granularity: Option<Granularity>,
    pub locale: Option<Locale>,
    /// Path to a user catalog, relative to `~/.soma/`.
    pub catalog_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NarrationConfig {
    pub enabled: Option<bool>,
    pub command: Option<String>,
    /// Arguments before the spoken text; `{lang}` expands to the locale tag.
    pub args: Option<Vec<String>>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_NARRATION_COMMAND: &str = "espeak-ng";

pub fn default_narration_args() -> Vec<String> {
    vec!["-v".to_string(), "{lang}".to_string()]
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub granularity: Granularity,
    pub locale: Locale,
    pub catalog_path: Option<PathBuf>,
    pub narration_enabled: bool,
    pub narration_command: String,
    pub narration_args: Vec<String>,
}

/// CLI flags that participate in resolution (None = not specified).
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub granularity: Option<Granularity>,
    pub locale: Option<Locale>,
    pub catalog: Option<PathBuf>,
    pub narrate: bool,
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

/// Returns the path to `~/.soma/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".soma").join("config.toml"))
}

/// Load config from `~/.soma/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `SomaConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<SomaConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(SomaConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(SomaConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: SomaConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {config:?}");
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Soma Configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# granularity = "column"       # "column" (3 steps) or "micro" (6 steps)
# locale = "pt-br"             # "pt-br" or "en"
# catalog_file = "exercises.toml"  # Path relative to ~/.soma/

# [narration]
# enabled = false
# command = "espeak-ng"        # Any TTS command that takes text as last arg;
#                              # set to "" to disable audio entirely

# args = ["-v", "{lang}"]      # {lang} expands to the locale tag (pt-BR)
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env
/// vars → CLI flags.
pub fn resolve(config: &SomaConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Granularity: CLI → env → config → default
    let granularity = cli
        .granularity
        .or_else(|| env_enum::<Granularity>("SOMA_GRANULARITY"))
        .or(config.general.granularity)
        .unwrap_or_default();

    // Locale: CLI → env → config → default
    let locale = cli
        .locale
        .or_else(|| env_enum::<Locale>("SOMA_LOCALE"))
        .or(config.general.locale)
        .unwrap_or_default();

    // Catalog: a CLI path is taken as-is; the config entry is relative
    // to ~/.soma/.
    let catalog_path = cli.catalog.clone().or_else(|| {
        let file = config.general.catalog_file.as_ref()?;
        let home = dirs::home_dir()?;
        Some(home.join(".soma").join(file))
    });

    // Narration command: env → config → default
    let narration_command = std::env::var("SOMA_NARRATION_COMMAND")
        .ok()
        .or_else(|| config.narration.command.clone())
        .unwrap_or_else(|| DEFAULT_NARRATION_COMMAND.to_string());

    ResolvedConfig {
        granularity,
        locale,
        catalog_path,
        narration_enabled: cli.narrate || config.narration.enabled.unwrap_or(false),
        narration_command,
        narration_args: config
            .narration
            .args
            .clone()
            .unwrap_or_else(default_narration_args),
    }
}

/// Parses a `ValueEnum` from an environment variable, case-insensitively.
fn env_enum<T: ValueEnum>(var: &str) -> Option<T> {
    let value = std::env::var(var).ok()?;
    match T::from_str(&value, true) {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("Ignoring unrecognized {var}={value}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = SomaConfig::default();
        assert!(config.general.granularity.is_none());
        assert!(config.narration.enabled.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve(&SomaConfig::default(), &CliOverrides::default());
        assert_eq!(resolved.granularity, Granularity::Column);
        assert_eq!(resolved.locale, Locale::PtBr);
        assert!(!resolved.narration_enabled);
        assert_eq!(resolved.narration_command, DEFAULT_NARRATION_COMMAND);
        assert_eq!(resolved.narration_args, vec!["-v", "{lang}"]);
        assert!(resolved.catalog_path.is_none());
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = SomaConfig {
            general: GeneralConfig {
                granularity: Some(Granularity::Micro),
                locale: Some(Locale::En),
                catalog_file: None,
            },
            narration: NarrationConfig {
                enabled: Some(true),
                command: Some("say".to_string()),
                args: Some(vec![]),
            },
        };
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.granularity, Granularity::Micro);
        assert_eq!(resolved.locale, Locale::En);
        assert!(resolved.narration_enabled);
        assert_eq!(resolved.narration_command, "say");
        assert!(resolved.narration_args.is_empty());
    }

    #[test]
    fn test_resolve_cli_flags_win() {
        let config = SomaConfig {
            general: GeneralConfig {
                granularity: Some(Granularity::Micro),
                locale: Some(Locale::En),
                catalog_file: None,
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            granularity: Some(Granularity::Column),
            locale: Some(Locale::PtBr),
            catalog: Some(PathBuf::from("/tmp/custom.toml")),
            narrate: true,
        };
        let resolved = resolve(&config, &cli);
        assert_eq!(resolved.granularity, Granularity::Column);
        assert_eq!(resolved.locale, Locale::PtBr);
        assert_eq!(resolved.catalog_path, Some(PathBuf::from("/tmp/custom.toml")));
        assert!(resolved.narration_enabled);
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
granularity = "micro"
locale = "en"
catalog_file = "exercises.toml"

[narration]
enabled = true
command = "espeak-ng"
args = ["-v", "{lang}", "-s", "130"]
"#;
        let config: SomaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.granularity, Some(Granularity::Micro));
        assert_eq!(config.general.locale, Some(Locale::En));
        assert_eq!(config.general.catalog_file.as_deref(), Some("exercises.toml"));
        assert_eq!(config.narration.enabled, Some(true));
        assert_eq!(
            config.narration.args.as_deref(),
            Some(&["-v".to_string(), "{lang}".to_string(), "-s".to_string(), "130".to_string()][..])
        );
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing — everything else stays default
        let toml_str = r#"
[general]
locale = "en"
"#;
        let config: SomaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.locale, Some(Locale::En));
        assert!(config.general.granularity.is_none());
        assert!(config.narration.command.is_none());
    }
}
