extern crate image_crawl_driver;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use image_crawl_driver::{backend, dispatch::Dispatcher, input, settings::Settings, target};
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about=None)]
struct Args {
    /// Crawlers to run: google, bing, baidu, flickr, greedy, or all.
    /// Defaults to all, which is google, bing and baidu.
    targets: Vec<String>,

    /// Settings file. Uses crawl.toml when present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(io::stderr)
        .init();

    let settings = Settings::load(args.config.as_deref()).context("failed to load settings")?;

    let keywords = input::load_keywords(&settings.keyword_file)?;
    input::echo(&keywords, io::stdout().lock())?;
    let domains = input::load_domains(&settings.domain_file)?;
    input::echo(&domains, io::stdout().lock())?;

    let targets = target::resolve(&args.targets);
    let crawler = backend::build(&settings.backend);
    let crawls = Dispatcher::new(&settings, &keywords, &domains, &*crawler)
        .run(&targets)
        .await
        .context("crawl failed")?;

    info!(crawls, "done");
    Ok(())
}
