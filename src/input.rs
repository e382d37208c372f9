use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::warn;
use url::{Position, Url};

#[derive(Error, Debug)]
#[error("failed to read {path}: {source}")]
pub struct InputError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Reads a text file into one string per line, terminators stripped.
pub fn read_lines(path: &Path) -> Result<Vec<String>, InputError> {
    Ok(fs::read_to_string(path)
        .map_err(|source| InputError {
            path: path.to_owned(),
            source,
        })?
        .lines()
        .map(String::from)
        .collect())
}

pub fn load_keywords(path: &Path) -> Result<Vec<String>, InputError> {
    read_lines(path)
}

pub fn load_domains(path: &Path) -> Result<Vec<String>, InputError> {
    Ok(read_lines(path)?
        .iter()
        .map(|line| normalize_domain(line))
        .collect())
}

/// Cuts a URL down to `scheme://netloc`.
///
/// Userinfo and port survive, everything after the port is dropped. The host
/// comes back lowercased and a scheme's default port is omitted. Lines that
/// are not absolute URLs are returned unchanged.
pub fn normalize_domain(line: &str) -> String {
    match Url::parse(line) {
        Ok(url) if url.has_authority() => url[..Position::AfterPort].to_string(),
        Ok(url) => format!("{}://", url.scheme()),
        Err(e) => {
            warn!(line, error = %e, "domain line is not an absolute url, keeping it as is");
            line.to_string()
        }
    }
}

pub fn echo<W: Write>(values: &[String], mut out: W) -> io::Result<()> {
    for value in values {
        writeln!(out, "{}", value)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    fn file_with(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn lines_keep_order_and_duplicates() {
        let file = file_with("cat\ndog\ncat\n");
        let lines = read_lines(file.path()).unwrap();
        assert_eq!(lines, vec!["cat", "dog", "cat"]);
    }

    #[test]
    fn blank_lines_are_not_filtered() {
        let file = file_with("red panda\n\nsea otter");
        let lines = read_lines(file.path()).unwrap();
        assert_eq!(lines, vec!["red panda", "", "sea otter"]);
    }

    #[test]
    fn crlf_terminators_are_stripped() {
        let file = file_with("tiger\r\nlion\r\n");
        assert_eq!(read_lines(file.path()).unwrap(), vec!["tiger", "lion"]);
    }

    #[test]
    fn empty_file_has_no_keywords() {
        let file = file_with("");
        assert!(load_keywords(file.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keyword.txt");
        let err = read_lines(&path).unwrap_err();
        assert_eq!(err.path, path);
        assert_eq!(err.source.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn path_and_query_are_discarded() {
        assert_eq!(
            normalize_domain("https://example.com/gallery/cats?page=2#top"),
            "https://example.com"
        );
        assert_eq!(normalize_domain("http://example.com"), "http://example.com");
    }

    #[test]
    fn port_and_userinfo_are_kept() {
        assert_eq!(
            normalize_domain("http://user:pw@images.example.org:8080/a/b"),
            "http://user:pw@images.example.org:8080"
        );
    }

    #[test]
    fn host_is_lowercased_and_default_port_dropped() {
        assert_eq!(
            normalize_domain("https://Example.COM:443/x"),
            "https://example.com"
        );
        assert_eq!(
            normalize_domain("https://Example.COM:8443/x"),
            "https://example.com:8443"
        );
    }

    #[test]
    fn bare_host_is_kept_verbatim() {
        assert_eq!(normalize_domain("example.com"), "example.com");
    }

    #[test]
    fn domains_are_normalized_in_order() {
        let file = file_with("https://a.example/x\nhttp://b.example/y?z=1\n");
        assert_eq!(
            load_domains(file.path()).unwrap(),
            vec!["https://a.example", "http://b.example"]
        );
    }

    #[test]
    fn echo_writes_one_value_per_line() {
        let mut out = Vec::new();
        echo(&["a".to_string(), "b".to_string()], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a\nb\n");
    }
}
