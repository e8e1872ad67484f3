//! Request list loading
//!
//! The input format is plain text with one request per line:
//!
//! ```text
//! # comment
//! example.com A
//! example.org   AAAA
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. The remaining
//! whitespace-separated fields are joined with single spaces to form the
//! request key, and the key bytes become the payload.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ratebench_core::Request;

/// Errors raised while loading a request list
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The file could not be opened or read
    #[error("failed to read request list: {0}")]
    Io(#[from] std::io::Error),

    /// The input held no requests after filtering
    #[error("no requests found in input")]
    Empty,

    /// A line could not be turned into a request
    #[error("invalid line {line}: {reason}")]
    InvalidLine {
        /// 1-based line number
        line: usize,
        /// What was wrong with it
        reason: String,
    },
}

/// Load requests from a file
pub fn load_requests(path: impl AsRef<Path>) -> Result<Vec<Request>, DatasetError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let requests = parse_requests(BufReader::new(file))?;

    tracing::debug!(
        path = %path.display(),
        requests = requests.len(),
        "Loaded request list"
    );

    Ok(requests)
}

/// Parse requests from any buffered reader
pub fn parse_requests(reader: impl BufRead) -> Result<Vec<Request>, DatasetError> {
    let mut requests = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(key) = parse_line(&line).map_err(|reason| DatasetError::InvalidLine {
            line: idx + 1,
            reason,
        })? {
            requests.push(Request::from_key(key));
        }
    }

    if requests.is_empty() {
        return Err(DatasetError::Empty);
    }

    Ok(requests)
}

/// Normalise one line into a key, `None` for blank lines and comments
fn parse_line(line: &str) -> Result<Option<String>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    if line.chars().any(|c| c.is_control() && !c.is_whitespace()) {
        return Err(format!("control character in '{}'", line.escape_debug()));
    }

    Ok(Some(line.split_whitespace().collect::<Vec<_>>().join(" ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_skips_blank_and_comments() {
        let input = "# header\n\nexample.com A\n   \n  # indented comment\nexample.org AAAA\n";
        let requests = parse_requests(Cursor::new(input)).unwrap();

        let keys: Vec<_> = requests.iter().map(|r| r.key()).collect();
        assert_eq!(keys, vec!["example.com A", "example.org AAAA"]);
    }

    #[test]
    fn test_parse_normalises_whitespace() {
        let requests = parse_requests(Cursor::new("  example.com \t  MX  \n")).unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].key(), "example.com MX");
        assert_eq!(requests[0].payload(), b"example.com MX");
    }

    #[test]
    fn test_parse_keeps_duplicates_in_order() {
        let requests = parse_requests(Cursor::new("a\nb\na\n")).unwrap();
        let keys: Vec<_> = requests.iter().map(|r| r.key()).collect();
        assert_eq!(keys, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_parse_empty_input() {
        let err = parse_requests(Cursor::new("# only comments\n\n")).unwrap_err();
        assert!(matches!(err, DatasetError::Empty));
    }

    #[test]
    fn test_parse_rejects_control_characters() {
        let err = parse_requests(Cursor::new("ok\nbad\u{7}line\n")).unwrap_err();
        match err {
            DatasetError::InvalidLine { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_requests_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "example.com A").unwrap();
        writeln!(file, "# skipped").unwrap();
        writeln!(file, "example.net TXT").unwrap();

        let requests = load_requests(file.path()).unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].key(), "example.net TXT");
    }

    #[test]
    fn test_load_requests_missing_file() {
        let err = load_requests("/nonexistent/requests.txt").unwrap_err();
        assert!(matches!(err, DatasetError::Io(_)));
        assert!(err.to_string().contains("failed to read"));
    }
}
