use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_DIR_NAME: &str = "todo";
const CONFIG_ENV_VAR: &str = "TODO_CONFIG_PATH";

pub const DEFAULT_TITLE_WIDTH: usize = 30;
pub const DEFAULT_DESCRIPTION_WIDTH: usize = 40;
// Room for the ".." marker plus at least one character.
const MIN_COLUMN_WIDTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub accent: &'static str,
    pub muted: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub fn plain() -> Self {
        Self {
            accent: "",
            muted: "",
            reset: "",
        }
    }

    pub fn accentize(&self, text: &str) -> String {
        paint(self.accent, self.reset, text)
    }

    pub fn mutedize(&self, text: &str) -> String {
        paint(self.muted, self.reset, text)
    }
}

fn paint(color: &str, reset: &str, text: &str) -> String {
    if color.is_empty() {
        text.to_string()
    } else {
        format!("{color}{text}{reset}")
    }
}

pub fn palette_for_theme(theme: Option<&str>) -> Palette {
    match theme.and_then(canonical_theme_name).as_deref() {
        Some("noir") => Palette {
            accent: "\x1b[38;5;208m",
            muted: "\x1b[38;5;250m",
            reset: "\x1b[0m",
        },
        Some("solarized") => Palette {
            accent: "\x1b[38;5;108m",
            muted: "\x1b[38;5;250m",
            reset: "\x1b[0m",
        },
        _ => Palette::plain(),
    }
}

/// Lowercases `raw` and collapses every run of non-alphanumerics into `_`.
pub fn canonical_key(raw: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn canonical_theme_name(raw: &str) -> Option<String> {
    let name = match canonical_key(raw) {
        Some(name) => name,
        None => return Some("default".to_string()),
    };

    match name.as_str() {
        "vanilla" | "light" => Some("default".to_string()),
        "dark" | "dark_mode" | "darkmode" => Some("noir".to_string()),
        _ => Some(name),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub aliases: HashMap<String, String>,
    #[serde(default = "default_title_width")]
    pub title_width: usize,
    #[serde(default = "default_description_width")]
    pub description_width: usize,
}

fn default_title_width() -> usize {
    DEFAULT_TITLE_WIDTH
}

fn default_description_width() -> usize {
    DEFAULT_DESCRIPTION_WIDTH
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: None,
            aliases: HashMap::new(),
            title_width: DEFAULT_TITLE_WIDTH,
            description_width: DEFAULT_DESCRIPTION_WIDTH,
        }
    }
}

impl Config {
    pub fn palette(&self) -> Palette {
        palette_for_theme(self.theme.as_deref())
    }

    pub fn alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub theme: Option<String>,
    pub aliases: HashMap<String, String>,
    pub title_width: Option<usize>,
    pub description_width: Option<usize>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME))
    }
}

/// Loads the config file, falling back to defaults when it cannot be used.
///
/// A missing file is not an error. Any other failure is logged and returned
/// alongside the defaults so the caller can surface it.
pub fn load_config_with_fallback() -> ConfigLoad {
    let load = match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    };

    if let Some(err) = load.error.as_ref() {
        warn!(error = %err, "using default configuration");
    }
    load
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    normalize_config(config)
}

fn normalize_config(mut config: Config) -> Result<Config, AppError> {
    config.theme = config.theme.and_then(|name| canonical_theme_name(&name));
    check_column_width("title_width", config.title_width)?;
    check_column_width("description_width", config.description_width)?;
    Ok(config)
}

pub fn check_column_width(field: &str, width: usize) -> Result<(), AppError> {
    if width < MIN_COLUMN_WIDTH {
        return Err(AppError::invalid_data(format!(
            "{field} must be at least {MIN_COLUMN_WIDTH}"
        )));
    }
    Ok(())
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(normalized) = overrides.theme.as_deref().and_then(canonical_theme_name) {
        merged.theme = Some(normalized);
    }

    for (alias, value) in &overrides.aliases {
        merged.aliases.insert(alias.clone(), value.clone());
    }

    if let Some(width) = overrides.title_width {
        merged.title_width = width;
    }
    if let Some(width) = overrides.description_width {
        merged.description_width = width;
    }

    merged
}
