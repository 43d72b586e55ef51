//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Config file: `--config <file>`, else `$XDG_CONFIG_HOME/outliner/outliner.toml`
//! 3. Environment variables: `OUTLINER_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Unified configuration for outliner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Spaces of indentation per nesting level
    pub indent: usize,
    /// Marker drawn in front of every node
    pub bullet: String,
    /// Write logs here instead of stderr (the editor owns the terminal)
    pub log_file: Option<PathBuf>,
    /// Print the outline to stdout when the editor exits
    pub print_on_exit: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            indent: 2,
            bullet: "-".into(),
            log_file: None,
            print_on_exit: false,
        }
    }
}

/// Raw settings for intermediate parsing (None means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub indent: Option<usize>,
    pub bullet: Option<String>,
    pub log_file: Option<PathBuf>,
    pub print_on_exit: Option<bool>,
}

/// Get the XDG config directory for outliner.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "outliner").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("outliner.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; unknown variables leave the input as is.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            indent: overlay.indent.unwrap_or(self.indent),
            bullet: overlay
                .bullet
                .clone()
                .unwrap_or_else(|| self.bullet.clone()),
            log_file: overlay.log_file.clone().or_else(|| self.log_file.clone()),
            print_on_exit: overlay.print_on_exit.unwrap_or(self.print_on_exit),
        }
    }

    fn expand_paths(&mut self) {
        if let Some(log_file) = &self.log_file {
            let expanded = expand_env_vars(log_file.to_string_lossy().as_ref());
            self.log_file = Some(PathBuf::from(expanded));
        }
    }

    /// Load settings with layered precedence.
    ///
    /// An explicit `config_file` must exist; the global file is optional.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        match config_file {
            Some(path) => {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
            None => {
                if let Some(global_path) = global_config_path() {
                    if global_path.exists() {
                        let raw = load_raw_settings(&global_path)?;
                        current = current.merge_with(&raw);
                    }
                }
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.validate()?;
        Ok(current)
    }

    /// Apply OUTLINER_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("OUTLINER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_int("indent") {
            settings.indent = usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("indent must not be negative: {}", val),
            })?;
        }
        if let Ok(val) = config.get_string("bullet") {
            settings.bullet = val;
        }
        if let Ok(val) = config.get_string("log_file") {
            settings.log_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_bool("print_on_exit") {
            settings.print_on_exit = val;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.bullet.contains(['\n', '\r']) {
            return Err(ApplicationError::Config {
                message: "bullet must be a single line".into(),
            });
        }
        Ok(())
    }

    /// Serialize settings to TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize: {}", e),
        })
    }

    /// Commented template for a fresh config file.
    pub fn template() -> String {
        r#"# outliner configuration
# Location: ~/.config/outliner/outliner.toml (or pass --config <file>)
# Every key can be overridden with an OUTLINER_<KEY> environment variable.

# Spaces of indentation per nesting level
# indent = 2

# Marker drawn in front of every node
# bullet = "-"

# Log file; ~ and $VARS are expanded. Without it logs go to stderr.
# log_file = "~/.local/state/outliner/outliner.log"

# Print the outline as a tree when the editor exits
# print_on_exit = false
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
