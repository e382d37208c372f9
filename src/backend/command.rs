use std::{path::PathBuf, process::Stdio};

use async_trait::async_trait;
use tokio::{io::AsyncWriteExt, process::Command};
use tracing::debug;

use crate::crawler::{CrawlError, CrawlJob, FlickrJob, GreedyJob, ImageCrawler, SearchJob};

/// Runs an external program once per job.
///
/// The job is written to the child's stdin as a single JSON document and
/// stdin is closed. The child's stdout and stderr go straight to ours. Any
/// exit status other than success fails the crawl.
#[derive(Debug, Clone)]
pub struct CommandCrawler {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandCrawler {
    pub fn new(program: PathBuf, args: Vec<String>) -> CommandCrawler {
        CommandCrawler { program, args }
    }

    async fn run(&self, job: CrawlJob<'_>) -> Result<(), CrawlError> {
        let payload = job.to_json()?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CrawlError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        debug!(program = %self.program.display(), pid = child.id(), "crawler started");

        let handed_over = match child.stdin.take() {
            Some(mut stdin) => match stdin.write_all(&payload).await {
                Ok(()) => stdin.shutdown().await,
                Err(e) => Err(e),
            },
            None => Ok(()),
        };

        // A child that dies early breaks the pipe; its exit status says why.
        let status = child.wait().await?;
        if !status.success() {
            return Err(CrawlError::ExitStatus(status));
        }
        handed_over?;
        Ok(())
    }
}

#[async_trait]
impl ImageCrawler for CommandCrawler {
    async fn search(&self, job: &SearchJob) -> Result<(), CrawlError> {
        self.run(CrawlJob::Search(job)).await
    }

    async fn flickr(&self, job: &FlickrJob) -> Result<(), CrawlError> {
        self.run(CrawlJob::Flickr(job)).await
    }

    async fn greedy(&self, job: &GreedyJob) -> Result<(), CrawlError> {
        self.run(CrawlJob::Greedy(job)).await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::crawler::SearchEngine;

    fn job(dir: &std::path::Path) -> SearchJob {
        SearchJob {
            engine: SearchEngine::Google,
            keyword: "heron".to_string(),
            storage_root: dir.join("images/google/heron"),
            downloader_threads: Some(4),
            log_level: None,
            max_num: 5,
        }
    }

    fn sh(script: String) -> CommandCrawler {
        CommandCrawler::new(PathBuf::from("sh"), vec!["-c".to_string(), script])
    }

    #[tokio::test]
    async fn job_arrives_on_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("job.json");
        let crawler = sh(format!("cat > '{}'", out.display()));

        crawler.search(&job(dir.path())).await.unwrap();

        let written: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
        assert_eq!(written["crawler"], "search");
        assert_eq!(written["engine"], "google");
        assert_eq!(written["keyword"], "heron");
        assert_eq!(written["max_num"], 5);
    }

    #[tokio::test]
    async fn failing_exit_status_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let crawler = sh("cat > /dev/null; exit 3".to_string());
        match crawler.search(&job(dir.path())).await {
            Err(CrawlError::ExitStatus(status)) => assert_eq!(status.code(), Some(3)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn early_exit_reports_status_not_broken_pipe() {
        let dir = tempfile::tempdir().unwrap();
        let crawler = sh("exit 7".to_string());
        let job = GreedyJob {
            domains: (0..5000)
                .map(|i| format!("https://host-{}.example.org", i))
                .collect(),
            keywords: vec!["kingfisher".to_string(); 2000],
            min_size: (10, 10),
            storage_root: dir.path().join("images/greedy"),
            parser_threads: Some(4),
            log_level: None,
        };
        match crawler.greedy(&job).await {
            Err(CrawlError::ExitStatus(status)) => assert_eq!(status.code(), Some(7)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let program = dir.path().join("no-such-crawler");
        let crawler = CommandCrawler::new(program.clone(), Vec::new());
        match crawler.search(&job(dir.path())).await {
            Err(CrawlError::Spawn { program: p, .. }) => assert_eq!(p, program),
            other => panic!("unexpected {:?}", other),
        }
    }
}
