use std::time::Duration;

use async_trait::async_trait;
use hyper::{
    client::{connect::dns::GaiResolver, HttpConnector},
    header::{ACCEPT, CONTENT_TYPE},
    Body, Client, Method, Request,
};
use hyper_timeout::TimeoutConnector;
use hyper_tls::HttpsConnector;
use tracing::debug;

use crate::crawler::{CrawlError, CrawlJob, FlickrJob, GreedyJob, ImageCrawler, SearchJob};

type HyperClient = Client<TimeoutConnector<HttpsConnector<HttpConnector<GaiResolver>>>>;

/// Hands jobs to a crawl service over HTTP(S).
///
/// Each job is POSTed as JSON to one endpoint. The service is expected to
/// answer once the crawl is done; any non-2xx answer fails the crawl.
pub struct HttpCrawler {
    client: HyperClient,
    endpoint: String,
}

impl HttpCrawler {
    pub fn new(endpoint: String, connect_timeout: Duration, io_timeout: Duration) -> HttpCrawler {
        let mut connector = TimeoutConnector::new(HttpsConnector::new());
        connector.set_connect_timeout(Some(connect_timeout));
        connector.set_read_timeout(Some(io_timeout));
        connector.set_write_timeout(Some(io_timeout));
        let client: HyperClient = Client::builder().build(connector);
        HttpCrawler { client, endpoint }
    }

    fn create_request(&self, payload: Vec<u8>) -> Result<Request<Body>, hyper::http::Error> {
        Request::builder()
            .method(Method::POST)
            .uri(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(Body::from(payload))
    }

    async fn submit(&self, job: CrawlJob<'_>) -> Result<(), CrawlError> {
        let req = self.create_request(job.to_json()?)?;
        let res = self.client.request(req).await?;
        let (head, body) = res.into_parts();
        let bytes = hyper::body::to_bytes(body).await?;
        debug!(endpoint = %self.endpoint, status = head.status.as_u16(), "crawl service answered");
        if !head.status.is_success() {
            return Err(CrawlError::HttpStatus {
                status: head.status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ImageCrawler for HttpCrawler {
    async fn search(&self, job: &SearchJob) -> Result<(), CrawlError> {
        self.submit(CrawlJob::Search(job)).await
    }

    async fn flickr(&self, job: &FlickrJob) -> Result<(), CrawlError> {
        self.submit(CrawlJob::Flickr(job)).await
    }

    async fn greedy(&self, job: &GreedyJob) -> Result<(), CrawlError> {
        self.submit(CrawlJob::Greedy(job)).await
    }
}
