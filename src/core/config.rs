//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.twenty48/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TwentyConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub input: InputConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub data_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct InputConfig {
    pub swipe_threshold: Option<f32>,
    pub cell_width: Option<f32>,
    pub cell_height: Option<f32>,
}

// ============================================================================
// Defaults
// ============================================================================

/// Minimum drag distance, in units, for a swipe to count.
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 30.0;
/// Units per terminal column.
pub const DEFAULT_CELL_WIDTH: f32 = 10.0;
/// Units per terminal row. Rows are roughly twice as tall as columns are wide.
pub const DEFAULT_CELL_HEIGHT: f32 = 20.0;
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

const APP_DIR: &str = ".twenty48";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSettings {
    pub swipe_threshold: f32,
    pub cell_width: f32,
    pub cell_height: f32,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Holds the saved game and the log file.
    pub data_dir: PathBuf,
    /// Fixed RNG seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
    pub log_level: LevelFilter,
    pub input: InputSettings,
    /// Ignore any saved game and start fresh.
    pub new_game: bool,
    /// Values that were ignored while resolving. `resolve` runs before the
    /// logger exists, so the caller logs these once it is up.
    pub warnings: Vec<String>,
}

/// Values supplied on the command line. `None` = not specified.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub data_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub new_game: bool,
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

/// Returns `~/.twenty48`.
pub fn app_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DIR))
}

/// Returns the path to `~/.twenty48/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    app_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.twenty48/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `TwentyConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<TwentyConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(TwentyConfig::default());
        }
    };
    load_config_from(&path)
}

/// Load config from an explicit path, generating a default file if absent.
pub fn load_config_from(path: &Path) -> Result<TwentyConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(TwentyConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: TwentyConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# twenty48 Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# data_dir = "/home/me/.twenty48"   # Or set TWENTY48_DATA_DIR / --data-dir
# seed = 42                         # Or set TWENTY48_SEED / --seed
# log_level = "debug"               # "off", "error", "warn", "info", "debug", "trace"

# [input]
# swipe_threshold = 30.0            # Minimum drag distance in units
# cell_width = 10.0                 # Units per terminal column
# cell_height = 20.0                # Units per terminal row
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
pub fn resolve(config: &TwentyConfig, cli: &CliOverrides) -> ResolvedConfig {
    let mut warnings = Vec::new();

    // Data dir: CLI → env → config → ~/.twenty48 → ./.twenty48
    let data_dir = cli
        .data_dir
        .clone()
        .or_else(|| std::env::var_os("TWENTY48_DATA_DIR").map(PathBuf::from))
        .or_else(|| config.general.data_dir.clone())
        .or_else(app_dir)
        .unwrap_or_else(|| PathBuf::from(APP_DIR));

    // Seed: CLI → env → config
    let seed = cli
        .seed
        .or_else(|| match std::env::var("TWENTY48_SEED") {
            Ok(raw) => match raw.trim().parse() {
                Ok(seed) => Some(seed),
                Err(e) => {
                    warnings.push(format!("Ignoring TWENTY48_SEED={raw:?}: {e}"));
                    None
                }
            },
            Err(_) => None,
        })
        .or(config.general.seed);

    let log_level = resolve_log_level(config.general.log_level.as_deref(), &mut warnings);
    let input = resolve_input(&config.input, &mut warnings);

    ResolvedConfig {
        data_dir,
        seed,
        log_level,
        input,
        new_game: cli.new_game,
        warnings,
    }
}

fn resolve_log_level(raw: Option<&str>, warnings: &mut Vec<String>) -> LevelFilter {
    match raw {
        Some(level) => level.parse().unwrap_or_else(|_| {
            warnings.push(format!("Unknown log_level {level:?}, using {DEFAULT_LOG_LEVEL}"));
            DEFAULT_LOG_LEVEL
        }),
        None => DEFAULT_LOG_LEVEL,
    }
}

/// Non-positive or non-finite sizes fall back to the defaults.
fn resolve_input(input: &InputConfig, warnings: &mut Vec<String>) -> InputSettings {
    let mut positive = |value: Option<f32>, default: f32, name: &str| match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        Some(v) => {
            warnings.push(format!("Ignoring input.{name} = {v}, using {default}"));
            default
        }
        None => default,
    };
    InputSettings {
        swipe_threshold: positive(
            input.swipe_threshold,
            DEFAULT_SWIPE_THRESHOLD,
            "swipe_threshold",
        ),
        cell_width: positive(input.cell_width, DEFAULT_CELL_WIDTH, "cell_width"),
        cell_height: positive(input.cell_height, DEFAULT_CELL_HEIGHT, "cell_height"),
    }
}
