use std::{
    collections::BTreeSet,
    path::{Component, Path, PathBuf},
};

use tracing::info;

use crate::crawler::{CrawlError, FlickrJob, GreedyJob, ImageCrawler, SearchEngine, SearchJob};
use crate::settings::Settings;
use crate::target::Target;

/// Runs the resolved targets against a crawler, one job at a time.
pub struct Dispatcher<'a, C: ?Sized> {
    settings: &'a Settings,
    keywords: &'a [String],
    domains: &'a [String],
    crawler: &'a C,
}

impl<'a, C: ImageCrawler + ?Sized> Dispatcher<'a, C> {
    pub fn new(
        settings: &'a Settings,
        keywords: &'a [String],
        domains: &'a [String],
        crawler: &'a C,
    ) -> Dispatcher<'a, C> {
        Dispatcher {
            settings,
            keywords,
            domains,
            crawler,
        }
    }

    /// Runs every target in `targets` in dispatch order and returns how many
    /// crawls were made. Stops at the first failing crawl.
    pub async fn run(&self, targets: &BTreeSet<Target>) -> Result<usize, CrawlError> {
        let mut crawls = 0;
        for target in targets {
            crawls += match target {
                Target::Google => self.search(SearchEngine::Google).await?,
                Target::Bing => self.search(SearchEngine::Bing).await?,
                Target::Baidu => self.search(SearchEngine::Baidu).await?,
                Target::Flickr => self.flickr().await?,
                Target::Greedy => self.greedy().await?,
            };
        }
        Ok(crawls)
    }

    /// `{storage_root}/{target}/{keyword}`, with the keyword confined to
    /// plain path segments so it can never climb out of the target directory.
    fn keyword_root(&self, target: Target, keyword: &str) -> PathBuf {
        let mut root = self.settings.storage_root.join(target.name());
        root.extend(Path::new(keyword).components().filter_map(|c| match c {
            Component::Normal(segment) => Some(segment),
            _ => None,
        }));
        root
    }

    pub fn search_job(&self, engine: SearchEngine, keyword: &str) -> SearchJob {
        let config = self.settings.search(engine);
        SearchJob {
            engine,
            keyword: keyword.to_string(),
            storage_root: self.keyword_root(engine.target(), keyword),
            downloader_threads: config.downloader_threads,
            log_level: config.log_level,
            max_num: self.settings.max_num,
        }
    }

    async fn search(&self, engine: SearchEngine) -> Result<usize, CrawlError> {
        for keyword in self.keywords {
            let job = self.search_job(engine, keyword);
            info!(crawler = %engine.target(), keyword = %keyword, root = %job.storage_root.display(), "crawling");
            self.crawler.search(&job).await?;
        }
        Ok(self.keywords.len())
    }

    pub fn flickr_job(&self, api_key: &str, keyword: &str) -> FlickrJob {
        let config = &self.settings.flickr;
        FlickrJob {
            api_key: api_key.to_string(),
            tags: keyword.to_string(),
            tag_mode: config.tag_mode,
            group_id: config.group_id.clone(),
            storage_root: self.keyword_root(Target::Flickr, keyword),
            downloader_threads: config.downloader_threads,
            log_level: config.log_level,
            max_num: self.settings.max_num,
        }
    }

    async fn flickr(&self) -> Result<usize, CrawlError> {
        if self.keywords.is_empty() {
            return Ok(0);
        }
        let api_key = self
            .settings
            .flickr
            .api_key
            .as_deref()
            .ok_or(CrawlError::MissingCredential {
                target: Target::Flickr,
                credential: "an api key",
            })?;
        for keyword in self.keywords {
            let job = self.flickr_job(api_key, keyword);
            info!(crawler = %Target::Flickr, keyword = %keyword, root = %job.storage_root.display(), "crawling");
            self.crawler.flickr(&job).await?;
        }
        Ok(self.keywords.len())
    }

    pub fn greedy_job(&self) -> GreedyJob {
        let config = &self.settings.greedy;
        GreedyJob {
            domains: self.domains.to_vec(),
            keywords: self.keywords.to_vec(),
            min_size: config.min_size,
            storage_root: self.settings.storage_root.join(Target::Greedy.name()),
            parser_threads: config.parser_threads,
            log_level: config.log_level,
        }
    }

    async fn greedy(&self) -> Result<usize, CrawlError> {
        let job = self.greedy_job();
        info!(
            crawler = %Target::Greedy,
            domains = job.domains.len(),
            keywords = job.keywords.len(),
            root = %job.storage_root.display(),
            "crawling"
        );
        self.crawler.greedy(&job).await?;
        Ok(1)
    }
}
