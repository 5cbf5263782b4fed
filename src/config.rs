//! Settings file handling
//!
//! Settings live in `{config_dir}/papersearch/config.json`. A missing file
//! means defaults; any field left out of the file keeps its default.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::search::{PipelineOptions, SnippetOptions};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the search service; `/search?query=` is appended
    pub oracle_url: String,
    pub request_timeout_secs: u64,
    /// Quiet period before the suggestion list is refiltered
    pub debounce_ms: u64,
    /// Per-character delay when replaying a dictated transcript
    pub typing_interval_ms: u64,
    pub page_size: usize,
    pub recent_capacity: usize,
    pub context_words: usize,
    pub preview_words: usize,
    /// Local suggestion list filtered while typing
    pub suggestions: Vec<String>,
    /// Dictation program whose stdout is taken as the transcript
    pub speech_command: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            oracle_url: "http://localhost:5000/api/".to_string(),
            request_timeout_secs: 30,
            debounce_ms: 300,
            typing_interval_ms: 100,
            page_size: 10,
            recent_capacity: 5,
            context_words: 10,
            preview_words: 20,
            suggestions: Vec::new(),
            speech_command: None,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn typing_interval(&self) -> Duration {
        Duration::from_millis(self.typing_interval_ms)
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            page_size: self.page_size,
            snippet: SnippetOptions {
                context_words: self.context_words,
                preview_words: self.preview_words,
            },
        }
    }
}

/// Default location of the settings file
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Cannot determine config directory")?;

    Ok(config_dir.join("papersearch").join("config.json"))
}

/// Load settings from `path`, or from the default location when `None`
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };

    if !path.exists() {
        return Ok(Settings::default());
    }

    let data = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let settings: Settings = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;

    Ok(settings)
}

/// Read a newline-separated suggestion list, skipping blank lines
pub fn load_suggestions(path: &Path) -> Result<Vec<String>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read suggestions file {}", path.display()))?;

    Ok(data
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_settings(Some(&dir.path().join("absent.json"))).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.debounce(), Duration::from_millis(300));
        assert_eq!(settings.typing_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "oracle_url": "https://portal.example.edu/api/", "page_size": 25, "suggestions": ["graph theory"] }"#,
        )
        .unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.oracle_url, "https://portal.example.edu/api/");
        assert_eq!(settings.page_size, 25);
        assert_eq!(settings.suggestions, vec!["graph theory"]);
        assert_eq!(settings.recent_capacity, 5);
        assert_eq!(settings.pipeline_options().page_size, 25);
        assert_eq!(settings.pipeline_options().snippet.context_words, 10);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_settings(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_load_suggestions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("suggestions.txt");
        fs::write(&path, "graph theory\n\n  machine learning  \n").unwrap();

        let suggestions = load_suggestions(&path).unwrap();
        assert_eq!(suggestions, vec!["graph theory", "machine learning"]);
    }
}
