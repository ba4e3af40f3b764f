// src/core/settings.rs

//! User-level settings (`~/.config/tinypanel/settings.toml`).
//!
//! A default file is written on first use so the user has something to edit.

use crate::constants::DEFAULT_TEMPLATE_REPO;
use crate::core::paths::{self, PathError};
use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse settings.toml: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Failed to serialize settings to TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Settings {
    /// Git URL (or local path) of the template repository consumed by the
    /// `create` wizard.
    pub template_repo: String,
    /// Shell program used for terminal sessions. Platform default when
    /// absent.
    #[serde(default)]
    pub shell: Option<String>,
    /// Editor command template for `edit`; `{file}`, `{line}` and `{column}`
    /// placeholders are substituted before launch (e.g.
    /// `code --goto {file}:{line}:{column}`).
    #[serde(default)]
    pub editor_cmd: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            template_repo: DEFAULT_TEMPLATE_REPO.to_string(),
            shell: None,
            editor_cmd: None,
        }
    }
}

impl Settings {
    /// The template repo value with `~` and environment variables expanded,
    /// so a local checkout can serve as the template source.
    pub fn template_repo_expanded(&self) -> String {
        shellexpand::full(&self.template_repo)
            .map(|expanded| expanded.into_owned())
            .unwrap_or_else(|_| self.template_repo.clone())
    }
}

/// Loads the settings file, writing the defaults first if it is missing.
pub fn load() -> Result<Settings, SettingsError> {
    let path = paths::get_settings_path()?;
    if !path.exists() {
        let defaults = Settings::default();
        fs::write(&path, toml::to_string_pretty(&defaults)?)?;
        return Ok(defaults);
    }
    let content = fs::read_to_string(&path)?;
    Ok(toml::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_serialize_to_parseable_toml() {
        let text = toml::to_string_pretty(&Settings::default()).unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed.template_repo, DEFAULT_TEMPLATE_REPO);
        assert!(parsed.shell.is_none());
    }

    #[test]
    fn missing_optional_fields_deserialize_to_none() {
        let parsed: Settings = toml::from_str("template_repo = \"x.git\"\n").unwrap();
        assert_eq!(parsed.template_repo, "x.git");
        assert!(parsed.shell.is_none());
        assert!(parsed.editor_cmd.is_none());
    }

    #[test]
    fn template_repo_without_expansions_passes_through() {
        let settings = Settings {
            template_repo: "https://example.com/kit.git".to_string(),
            ..Default::default()
        };
        assert_eq!(
            settings.template_repo_expanded(),
            "https://example.com/kit.git"
        );
    }
}
