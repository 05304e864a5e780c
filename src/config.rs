use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::workflows::scorer::ScoringWeights;
use crate::workflows::strategies::Thresholds;

const YT_DLP_ENV: &str = "PODCAST_FINDER_YT_DLP";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub yt_dlp_path: String,
    pub output_dir: PathBuf,
    pub audio_format: String,
    pub audio_quality: String,
    /// Results requested per video search query.
    pub search_results: u32,
    /// Results kept per web search query.
    pub web_results: usize,
    pub scoring: ScoringWeights,
    pub thresholds: Thresholds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            yt_dlp_path: "yt-dlp".to_string(),
            output_dir: PathBuf::from("."),
            audio_format: "mp3".to_string(),
            audio_quality: "192".to_string(),
            search_results: 5,
            web_results: 10,
            scoring: ScoringWeights::default(),
            thresholds: Thresholds::default(),
        }
    }
}

impl Config {
    /// Loads `config.toml` from the user config dir, then applies env overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&get_config_path())?;
        if let Ok(path) = env::var(YT_DLP_ENV) {
            config.yt_dlp_path = path;
        }
        Ok(config)
    }

    /// A missing file yields defaults; a malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }
}

fn get_config_dir_path() -> PathBuf {
    xdir::config()
        .map(|path| path.join("podcast-finder"))
        // If the standard path could not be found (e.g.`$HOME` is not set),
        // default to the current directory.
        .unwrap_or_default()
}

fn get_config_path() -> PathBuf {
    get_config_dir_path().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
audio_format = "m4a"
search_results = 8

[scoring]
channel_exact = 45.0

[thresholds]
primary = 60.0
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.audio_format, "m4a");
        assert_eq!(config.search_results, 8);
        assert_eq!(config.yt_dlp_path, "yt-dlp");
        assert_eq!(config.scoring.channel_exact, 45.0);
        assert_eq!(config.scoring.duration_exact, 50.0);
        assert_eq!(config.thresholds.primary, 60.0);
        assert_eq!(config.thresholds.web, 40.0);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "search_results = \"lots\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
