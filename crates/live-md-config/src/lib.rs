use live_md_engine::DecorationOptions;
use live_md_engine::options::{DEFAULT_CODE_LANGUAGE, PLACEHOLDER_IMAGE_URL};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Markdown file opened at startup
    pub document_path: Option<PathBuf>,
    pub render: RenderSettings,
}

/// How previews are built. Every key is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Shown for images with an empty URL
    pub placeholder_image_url: String,
    /// `data-lang` for fences without an info string
    pub default_code_language: String,
    /// CSS width for image previews, e.g. `"480px"`
    pub image_width: Option<String>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            placeholder_image_url: PLACEHOLDER_IMAGE_URL.to_string(),
            default_code_language: DEFAULT_CODE_LANGUAGE.to_string(),
            image_width: None,
        }
    }
}

impl RenderSettings {
    pub fn decoration_options(&self) -> DecorationOptions {
        DecorationOptions {
            placeholder_image_url: self.placeholder_image_url.clone(),
            default_code_language: self.default_code_language.clone(),
            image_width: self.image_width.clone(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the document path
        config.document_path = config
            .document_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/live-md");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
