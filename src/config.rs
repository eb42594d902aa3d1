//! Demonstrator configuration.
//!
//! Defaults reproduce the standard transcript. A `fault-demo.toml` in the working
//! directory may move the scratch paths or rename the missing class; the
//! scenarios and their order stay fixed. `NO_COLOR` is the only environment
//! variable read here and it only decides whether colour codes are emitted.

use crate::error::DemoError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// File looked up in the working directory by [`DemoConfig::load`].
pub const CONFIG_FILE: &str = "fault-demo.toml";

/// Inputs the trigger actions operate on.
///
/// Every field has a default chosen so the documented fault fires; a
/// `fault-demo.toml` only needs to name the fields it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Target of the restricted write; must not be writable.
    pub restricted_path: PathBuf,
    pub missing_path: PathBuf,
    /// Scratch file for the end-of-stream demonstration. Left behind afterwards.
    pub data_path: PathBuf,
    /// SQLite file whose parent directory does not exist.
    pub database_path: PathBuf,
    pub class_name: String,
    pub color: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            restricted_path: PathBuf::from("/root/restricted/test.txt"),
            missing_path: PathBuf::from("nonexistent.txt"),
            data_path: PathBuf::from("test.dat"),
            database_path: PathBuf::from("nonexistentdb/app.db"),
            class_name: "com.nonexistent.Class".to_string(),
            color: true,
        }
    }
}

impl DemoConfig {
    /// Read `fault-demo.toml` from the working directory, or fall back to defaults.
    pub fn load() -> Result<Self, DemoError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self, DemoError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| DemoError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, DemoError> {
        Ok(toml::from_str(content)?)
    }

    /// Colours are used only on a terminal and never when `NO_COLOR` is set.
    pub fn use_colors(&self, is_terminal: bool) -> bool {
        self.color && is_terminal && std::env::var_os("NO_COLOR").is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = DemoConfig::default();
        assert_eq!(config.missing_path, PathBuf::from("nonexistent.txt"));
        assert_eq!(config.data_path, PathBuf::from("test.dat"));
        assert_eq!(config.class_name, "com.nonexistent.Class");
        assert!(config.color);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = DemoConfig::from_toml_str("data_path = \"/tmp/x.dat\"\ncolor = false\n").unwrap();
        assert_eq!(config.data_path, PathBuf::from("/tmp/x.dat"));
        assert!(!config.color);
        assert_eq!(config.missing_path, DemoConfig::default().missing_path);
    }

    #[test]
    fn test_invalid_toml() {
        let result = DemoConfig::from_toml_str("color = \"maybe\"");
        assert!(matches!(result, Err(DemoError::Config(_))));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = DemoConfig::load_from(Path::new("/nonexistent/fault-demo.toml")).unwrap();
        assert_eq!(config, DemoConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "class_name = \"demo.Missing\"").unwrap();
        let config = DemoConfig::load_from(file.path()).unwrap();
        assert_eq!(config.class_name, "demo.Missing");
    }

    #[test]
    fn test_no_color_environment() {
        let config = DemoConfig::default();
        let previous = std::env::var_os("NO_COLOR");
        std::env::set_var("NO_COLOR", "1");
        assert!(!config.use_colors(true));
        std::env::remove_var("NO_COLOR");
        assert!(config.use_colors(true));
        if let Some(value) = previous {
            std::env::set_var("NO_COLOR", value);
        }
    }

    #[test]
    fn test_colors_need_terminal() {
        let config = DemoConfig {
            color: true,
            ..DemoConfig::default()
        };
        assert!(!config.use_colors(false));

        let plain = DemoConfig {
            color: false,
            ..DemoConfig::default()
        };
        assert!(!plain.use_colors(true));
    }
}
