//! Crawl jobs and the interface the driver hands them to.
//!
//! The driver never fetches anything itself. Each job describes one call into
//! an external image crawler: where to store results, how many to fetch, and
//! the filters the crawler family understands.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::settings::{LogLevel, TagMode};
use crate::target::Target;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("failed to start crawler {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to hand job to crawler: {0}")]
    Io(#[from] std::io::Error),

    #[error("crawler exited with {0}")]
    ExitStatus(std::process::ExitStatus),

    #[error("failed to build crawl request: {0}")]
    Request(#[from] hyper::http::Error),

    #[error("crawl service unreachable: {0}")]
    Http(#[from] hyper::Error),

    #[error("crawl service answered {status}: {body}")]
    HttpStatus {
        status: hyper::StatusCode,
        body: String,
    },

    #[error("failed to encode crawl job: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{target} crawler needs {credential}")]
    MissingCredential {
        target: Target,
        credential: &'static str,
    },
}

/// Keyword search engines driven the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    Google,
    Bing,
    Baidu,
}

impl SearchEngine {
    pub fn target(&self) -> Target {
        match self {
            SearchEngine::Google => Target::Google,
            SearchEngine::Bing => Target::Bing,
            SearchEngine::Baidu => Target::Baidu,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchJob {
    pub engine: SearchEngine,
    pub keyword: String,
    pub storage_root: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloader_threads: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<LogLevel>,
    pub max_num: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlickrJob {
    pub api_key: String,
    pub tags: String,
    pub tag_mode: TagMode,
    pub group_id: String,
    pub storage_root: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloader_threads: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<LogLevel>,
    pub max_num: u32,
}

/// Seeded from domains rather than a search query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GreedyJob {
    pub domains: Vec<String>,
    pub keywords: Vec<String>,
    pub min_size: (u32, u32),
    pub storage_root: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parser_threads: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<LogLevel>,
}

/// Wire form of a job, tagged with the crawler family.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "crawler", rename_all = "lowercase")]
pub enum CrawlJob<'a> {
    Search(&'a SearchJob),
    Flickr(&'a FlickrJob),
    Greedy(&'a GreedyJob),
}

impl CrawlJob<'_> {
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// An external image crawler, one method per crawler family.
///
/// Each call blocks until the crawl is finished. Results are written by the
/// crawler under the job's storage root and never reported back.
#[async_trait]
pub trait ImageCrawler: Send + Sync {
    async fn search(&self, job: &SearchJob) -> Result<(), CrawlError>;

    async fn flickr(&self, job: &FlickrJob) -> Result<(), CrawlError>;

    async fn greedy(&self, job: &GreedyJob) -> Result<(), CrawlError>;
}
