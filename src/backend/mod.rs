//! Ways of handing crawl jobs to the external crawler.

mod command;
mod http;
mod plan;

pub use command::CommandCrawler;
pub use http::HttpCrawler;
pub use plan::PlanCrawler;

use std::time::Duration;

use crate::crawler::ImageCrawler;
use crate::settings::BackendSettings;

pub fn build(settings: &BackendSettings) -> Box<dyn ImageCrawler> {
    match settings {
        BackendSettings::Plan => Box::new(PlanCrawler),
        BackendSettings::Command { program, args } => {
            Box::new(CommandCrawler::new(program.clone(), args.clone()))
        }
        BackendSettings::Http {
            endpoint,
            connect_timeout_secs,
            io_timeout_secs,
        } => Box::new(HttpCrawler::new(
            endpoint.clone(),
            Duration::from_secs(*connect_timeout_secs),
            Duration::from_secs(*io_timeout_secs),
        )),
    }
}
