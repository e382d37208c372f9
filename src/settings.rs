//! Run configuration.
//!
//! Everything the driver forwards to the crawlers lives in [`Settings`]. The
//! defaults are the values the driver has always used; a TOML file can
//! override any subset of them.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crawler::SearchEngine;

pub const DEFAULT_SETTINGS_FILE: &str = "crawl.toml";
pub const FLICKR_API_KEY_VAR: &str = "FLICKR_API_KEY";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagMode {
    /// Photos must carry every tag.
    All,
    /// Photos may carry any of the tags.
    Any,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub max_num: u32,
    pub storage_root: PathBuf,
    pub keyword_file: PathBuf,
    pub domain_file: PathBuf,
    pub google: SearchSettings,
    pub bing: SearchSettings,
    pub baidu: SearchSettings,
    pub flickr: FlickrSettings,
    pub greedy: GreedySettings,
    pub backend: BackendSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            max_num: 2000,
            storage_root: PathBuf::from("images"),
            keyword_file: PathBuf::from("keyword.txt"),
            domain_file: PathBuf::from("domain.txt"),
            google: SearchSettings {
                downloader_threads: Some(4),
                log_level: Some(LogLevel::Info),
            },
            bing: SearchSettings {
                downloader_threads: None,
                log_level: Some(LogLevel::Info),
            },
            baidu: SearchSettings {
                downloader_threads: Some(4),
                log_level: None,
            },
            flickr: FlickrSettings::default(),
            greedy: GreedySettings::default(),
            backend: BackendSettings::default(),
        }
    }
}

/// Google, Bing and Baidu share this shape.
///
/// `None` leaves the choice to the crawler.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub downloader_threads: Option<u32>,
    pub log_level: Option<LogLevel>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FlickrSettings {
    pub api_key: Option<String>,
    pub downloader_threads: Option<u32>,
    pub log_level: Option<LogLevel>,
    pub tag_mode: TagMode,
    pub group_id: String,
}

impl Default for FlickrSettings {
    fn default() -> Self {
        FlickrSettings {
            api_key: None,
            downloader_threads: Some(4),
            log_level: Some(LogLevel::Info),
            tag_mode: TagMode::All,
            group_id: "68012010@N00".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GreedySettings {
    pub parser_threads: Option<u32>,
    pub log_level: Option<LogLevel>,
    /// Smallest accepted image, width then height.
    pub min_size: (u32, u32),
}

impl Default for GreedySettings {
    fn default() -> Self {
        GreedySettings {
            parser_threads: Some(4),
            log_level: None,
            min_size: (10, 10),
        }
    }
}

/// How crawl jobs reach the crawler.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendSettings {
    /// Log jobs, run nothing.
    Plan,
    /// Run `program args...` per job with the job as JSON on stdin.
    Command {
        program: PathBuf,
        #[serde(default)]
        args: Vec<String>,
    },
    /// POST each job as JSON to `endpoint`.
    Http {
        endpoint: String,
        #[serde(default = "default_connect_timeout")]
        connect_timeout_secs: u64,
        #[serde(default = "default_io_timeout")]
        io_timeout_secs: u64,
    },
}

impl Default for BackendSettings {
    fn default() -> Self {
        BackendSettings::Plan
    }
}

fn default_connect_timeout() -> u64 {
    5
}

// Crawls run long; the service answers once the job is done.
fn default_io_timeout() -> u64 {
    3600
}

impl Settings {
    /// Loads settings from `path`, or from [`DEFAULT_SETTINGS_FILE`] when it
    /// exists, or falls back to the defaults.
    pub fn load(path: Option<&Path>) -> Result<Settings, SettingsError> {
        let mut settings = match path {
            Some(path) => Settings::from_file(path)?,
            None if Path::new(DEFAULT_SETTINGS_FILE).exists() => {
                Settings::from_file(Path::new(DEFAULT_SETTINGS_FILE))?
            }
            None => Settings::default(),
        };
        if settings.flickr.api_key.is_none() {
            settings.flickr.api_key = env::var(FLICKR_API_KEY_VAR).ok().filter(|k| !k.is_empty());
        }
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Settings, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_owned(),
            source,
        })?;
        Settings::from_toml(&text).map_err(|source| SettingsError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Settings, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn search(&self, engine: SearchEngine) -> &SearchSettings {
        match engine {
            SearchEngine::Google => &self.google,
            SearchEngine::Bing => &self.bing,
            SearchEngine::Baidu => &self.baidu,
        }
    }
}
