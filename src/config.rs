//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/coursetree/coursetree.toml`
//! 3. Local config: `./.coursetree.toml`, or the file passed with `--config`
//! 4. Environment variables: `COURSETREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{expand_env_vars, DeleteStrategy, Order};

/// Unified configuration for coursetree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Course data file (default: courses.txt)
    pub data_file: PathBuf,
    /// Traversal order used by `list` when none is given
    pub listing_order: Order,
    /// Deletion strategy used by `delete` when none is given
    pub delete_strategy: DeleteStrategy,
    /// Rebuild the tree after loading if it is out of balance
    pub balance_on_load: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("courses.txt"),
            listing_order: Order::In,
            delete_strategy: DeleteStrategy::Merging,
            balance_on_load: false,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_file: Option<PathBuf>,
    pub listing_order: Option<Order>,
    pub delete_strategy: Option<DeleteStrategy>,
    pub balance_on_load: Option<bool>,
}

/// Get the XDG config directory for coursetree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "coursetree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("coursetree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".coursetree.toml")
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

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.data_file.to_string_lossy().as_ref());
        self.data_file = PathBuf::from(expanded);
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_file: overlay
                .data_file
                .clone()
                .unwrap_or_else(|| self.data_file.clone()),
            listing_order: overlay.listing_order.unwrap_or(self.listing_order),
            delete_strategy: overlay.delete_strategy.unwrap_or(self.delete_strategy),
            balance_on_load: overlay.balance_on_load.unwrap_or(self.balance_on_load),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Local config file; when `None`, `./.coursetree.toml` is used if present
    ///
    /// An explicitly given local file must exist. The implicit one is optional.
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("config: global {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        // 3. Local config
        match local {
            Some(path) => {
                debug!("config: local {}", path.display());
                current = current.merge_with(&load_raw_settings(path)?);
            }
            None => {
                let implicit = local_config_path(Path::new("."));
                if implicit.exists() {
                    debug!("config: local {}", implicit.display());
                    current = current.merge_with(&load_raw_settings(&implicit)?);
                }
            }
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply COURSETREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("COURSETREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_file") {
            settings.data_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("listing_order") {
            settings.listing_order = val.parse().map_err(|message| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get_string("delete_strategy") {
            settings.delete_strategy = val.parse().map_err(|message| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get_bool("balance_on_load") {
            settings.balance_on_load = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# coursetree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/coursetree/coursetree.toml
#   Local:  ./.coursetree.toml (or --config <file>)
#   Env:    COURSETREE_* environment variables

# Course data file, one "code|subject_code|subject_name|semester|year|seats|registered|price" per line
# data_file = "~/courses.txt"

# Default traversal for `list`: pre, in, post, breadth
# listing_order = "in"

# Default deletion strategy for `delete`: merging, copying
# delete_strategy = "merging"

# Rebuild the tree after loading when it is out of balance
# balance_on_load = false
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_created_then_in_order_and_merging() {
        let settings = Settings::default();
        assert_eq!(settings.data_file, PathBuf::from("courses.txt"));
        assert_eq!(settings.listing_order, Order::In);
        assert_eq!(settings.delete_strategy, DeleteStrategy::Merging);
        assert!(!settings.balance_on_load);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_only_specified_fields_change() {
        let base = Settings::default();
        let overlay = RawSettings {
            data_file: None,
            listing_order: Some(Order::Breadth),
            delete_strategy: None,
            balance_on_load: Some(true),
        };

        let result = base.merge_with(&overlay);

        assert_eq!(result.data_file, PathBuf::from("courses.txt"));
        assert_eq!(result.listing_order, Order::Breadth);
        assert_eq!(result.delete_strategy, DeleteStrategy::Merging);
        assert!(result.balance_on_load);
    }

    #[test]
    fn given_tilde_in_data_file_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            data_file: PathBuf::from("~/courses.txt"),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let data_file = settings.data_file.to_string_lossy();
        assert!(
            data_file.starts_with(&home),
            "data_file should start with home dir: {}",
            data_file
        );
        assert!(!data_file.contains('~'));
    }

    #[test]
    fn given_settings_when_serialized_then_parses_back() {
        let settings = Settings {
            listing_order: Order::Post,
            delete_strategy: DeleteStrategy::Copying,
            ..Settings::default()
        };
        let text = settings.to_toml().unwrap();
        assert!(text.contains("listing_order = \"post\""));
        assert!(text.contains("delete_strategy = \"copying\""));
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml_with_defaults() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.data_file.is_none());
        assert!(raw.listing_order.is_none());
    }
}
