//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treedit/treedit.toml`
//! 3. Local config: `<dir>/.treedit.toml`
//! 4. Environment variables: `TREEDIT_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, Map};
use directories::ProjectDirs;
use serde::de::value::StrDeserializer;
use serde::de::IntoDeserializer;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::seed::resolve_seed_path;
use crate::application::{read_text, ApplicationError, DeleteStrategy};
use crate::domain::IdStrategy;

/// Unified configuration for treedit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Seed document for the initial tree (default: none, start from an empty root)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_file: Option<PathBuf>,
    /// Label of the root when no seed file is configured
    pub root_label: String,
    /// Id generator for new nodes
    pub id_strategy: IdStrategy,
    /// What a plain delete does
    pub delete_strategy: DeleteStrategy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed_file: None,
            root_label: "root".into(),
            id_strategy: IdStrategy::default(),
            delete_strategy: DeleteStrategy::default(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub seed_file: Option<PathBuf>,
    pub root_label: Option<String>,
    pub id_strategy: Option<IdStrategy>,
    pub delete_strategy: Option<DeleteStrategy>,
}

/// Get the XDG config directory for treedit.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treedit").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treedit.toml"))
}

/// Get the path to the local config file in `dir`.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".treedit.toml")
}

/// Load a TOML file into RawSettings for manual merging.
///
/// A relative `seed_file` is resolved against the file's own directory.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = read_text(path, "config")?;
    let mut raw: RawSettings = toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })?;

    if let Some(seed) = raw.seed_file.take() {
        let expanded = PathBuf::from(expand_env_vars(&seed.to_string_lossy()));
        raw.seed_file = Some(match path.parent() {
            Some(dir) => resolve_seed_path(dir, &expanded),
            None => expanded,
        });
    }
    Ok(raw)
}

/// Expand `~`, `$VAR` and `${VAR}`; the input is returned as-is on failure.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(seed) = &self.seed_file {
            let expanded = expand_env_vars(seed.to_string_lossy().as_ref());
            self.seed_file = Some(PathBuf::from(expanded));
        }
    }

    /// Merge overlay config onto self (base): overlay wins where specified.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            seed_file: overlay
                .seed_file
                .clone()
                .or_else(|| self.seed_file.clone()),
            root_label: overlay
                .root_label
                .clone()
                .unwrap_or_else(|| self.root_label.clone()),
            id_strategy: overlay.id_strategy.unwrap_or(self.id_strategy),
            delete_strategy: overlay.delete_strategy.unwrap_or(self.delete_strategy),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.treedit.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref(), local_dir, None)
    }

    /// Load settings from explicit layers.
    ///
    /// # Arguments
    /// * `global` - Global config file; skipped when `None` or missing
    /// * `local_dir` - Optional directory holding a `.treedit.toml`
    /// * `env` - `TREEDIT_*` variables to apply; `None` reads the process environment
    pub fn load_from(
        global: Option<&Path>,
        local_dir: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global {
            if global_path.exists() {
                debug!(path = %global_path.display(), "loading global config");
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!(path = %local_path.display(), "loading local config");
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current, env)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply TREEDIT_* environment variables as explicit overrides.
    fn apply_env_overrides(
        mut settings: Self,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(Environment::with_prefix("TREEDIT").source(env))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("seed_file") {
            settings.seed_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("root_label") {
            settings.root_label = val;
        }
        if let Ok(val) = config.get_string("id_strategy") {
            settings.id_strategy = parse_variant(&val, "id_strategy")?;
        }
        if let Ok(val) = config.get_string("delete_strategy") {
            settings.delete_strategy = parse_variant(&val, "delete_strategy")?;
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
        r#"# treedit configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treedit/treedit.toml
#   Local:  <dir>/.treedit.toml
#   Env:    TREEDIT_* environment variables

# Seed document for the initial tree (.json or .toml), relative to this file
# seed_file = "tree.json"

# Root label when no seed file is set
# root_label = "root"

# Ids for new nodes: "sequential" or "random"
# id_strategy = "sequential"

# Plain delete behaviour: "cascade" or "splice"
# delete_strategy = "cascade"
"#
        .to_string()
    }
}

/// Parse a lowercase enum variant the same way the TOML files spell it.
fn parse_variant<T: for<'de> Deserialize<'de>>(
    value: &str,
    key: &str,
) -> Result<T, ApplicationError> {
    let lowered = value.to_lowercase();
    let de: StrDeserializer<'_, serde::de::value::Error> = lowered.as_str().into_deserializer();
    T::deserialize(de).map_err(|e| ApplicationError::Config {
        message: format!("{key}: {e}"),
    })
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
    fn given_no_config_when_defaults_then_sequential_cascade() {
        let settings = Settings::default();
        assert_eq!(settings.seed_file, None);
        assert_eq!(settings.root_label, "root");
        assert_eq!(settings.id_strategy, IdStrategy::Sequential);
        assert_eq!(settings.delete_strategy, DeleteStrategy::Cascade);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_keeps_unspecified() {
        let base = Settings::default();
        let overlay = RawSettings {
            delete_strategy: Some(DeleteStrategy::Splice),
            ..Default::default()
        };
        let merged = base.merge_with(&overlay);
        assert_eq!(merged.delete_strategy, DeleteStrategy::Splice);
        assert_eq!(merged.id_strategy, IdStrategy::Sequential);
        assert_eq!(merged.root_label, "root");
    }

    #[test]
    fn given_variant_names_when_parsing_then_case_insensitive() {
        let id: IdStrategy = parse_variant("Random", "id_strategy").unwrap();
        assert_eq!(id, IdStrategy::Random);
        let del: DeleteStrategy = parse_variant("splice", "delete_strategy").unwrap();
        assert_eq!(del, DeleteStrategy::Splice);
        assert!(parse_variant::<DeleteStrategy>("prune", "delete_strategy").is_err());
    }

    #[test]
    fn given_tilde_in_seed_file_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            seed_file: Some(PathBuf::from("~/tree.json")),
            ..Default::default()
        };
        settings.expand_paths();
        let seed = settings.seed_file.unwrap();
        assert!(!seed.to_string_lossy().starts_with('~'));
        assert!(seed.ends_with("tree.json"));
    }

    fn env(pairs: &[(&str, &str)]) -> Option<Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn given_env_overrides_when_applied_then_win_over_base() {
        let base = Settings {
            root_label: "catalog".into(),
            ..Default::default()
        };
        let settings = Settings::apply_env_overrides(
            base,
            env(&[
                ("TREEDIT_DELETE_STRATEGY", "splice"),
                ("TREEDIT_ROOT_LABEL", "inventory"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.delete_strategy, DeleteStrategy::Splice);
        assert_eq!(settings.root_label, "inventory");
        assert_eq!(settings.id_strategy, IdStrategy::Sequential);
    }

    #[test]
    fn given_bogus_env_variant_when_applied_then_config_error() {
        let err = Settings::apply_env_overrides(
            Settings::default(),
            env(&[("TREEDIT_ID_STRATEGY", "bogus")]),
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("config error: id_strategy"));
    }

    #[test]
    fn given_settings_when_to_toml_then_lowercase_variants() {
        let toml = Settings::default().to_toml().unwrap();
        assert!(toml.contains(r#"id_strategy = "sequential""#));
        assert!(toml.contains(r#"delete_strategy = "cascade""#));
    }
}
