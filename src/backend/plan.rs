use async_trait::async_trait;
use tracing::info;

use crate::crawler::{CrawlError, CrawlJob, FlickrJob, GreedyJob, ImageCrawler, SearchJob};

/// Dry run: logs each job and reports success.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlanCrawler;

impl PlanCrawler {
    fn log(&self, job: CrawlJob<'_>) -> Result<(), CrawlError> {
        let json = serde_json::to_string(&job)?;
        info!(job = %json, "planned crawl");
        Ok(())
    }
}

#[async_trait]
impl ImageCrawler for PlanCrawler {
    async fn search(&self, job: &SearchJob) -> Result<(), CrawlError> {
        self.log(CrawlJob::Search(job))
    }

    async fn flickr(&self, job: &FlickrJob) -> Result<(), CrawlError> {
        self.log(CrawlJob::Flickr(job))
    }

    async fn greedy(&self, job: &GreedyJob) -> Result<(), CrawlError> {
        self.log(CrawlJob::Greedy(job))
    }
}
