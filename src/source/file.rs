//! File-based data source.
//!
//! Polls a JSON snapshot file of captured endpoint responses.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, warn};

use super::{DashboardSnapshot, DataSource, Update};

/// A data source that reads endpoint responses from a snapshot file.
///
/// The source tracks the file's modification time and only yields new
/// updates when the file has been rewritten. Each read is split into one
/// update per endpoint present in the file.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
    pending: VecDeque<Update>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
            pending: VecDeque::new(),
        }
    }

    /// Returns the path being monitored.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get_modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn read_file(&mut self) -> Option<DashboardSnapshot> {
        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(snapshot) => {
                    self.last_error = None;
                    Some(snapshot)
                }
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "snapshot parse failed");
                    self.last_error = Some(format!("Parse error: {}", e));
                    None
                }
            },
            Err(e) => {
                self.last_error = Some(format!("Read error: {}", e));
                None
            }
        }
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<Update> {
        if let Some(update) = self.pending.pop_front() {
            return Some(update);
        }

        let current_modified = self.get_modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,        // First poll, always read
            (Some(_), None) => false, // File disappeared, keep what we have
            (Some(last), Some(current)) => current > last,
        };

        if file_changed {
            if let Some(snapshot) = self.read_file() {
                self.last_modified = current_modified;
                self.pending.extend(snapshot.into_updates());
                debug!(path = %self.path.display(), updates = self.pending.len(), "snapshot loaded");
                return self.pending.pop_front();
            }
        }

        None
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Endpoint;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "httptrace": {
                "traces": [
                    { "timestamp": "t1", "request": { "method": "GET", "uri": "/a" }, "response": { "status": 200 } },
                    { "timestamp": "t2", "request": { "method": "GET", "uri": "/b" }, "response": { "status": 500 } }
                ]
            },
            "health": { "status": "UP", "components": { "diskSpace": { "status": "UP", "details": { "free": 1048576 } } } },
            "cpu": { "name": "system.cpu.count", "measurements": [{ "statistic": "VALUE", "value": 4.0 }] },
            "uptime": { "name": "process.uptime", "measurements": [{ "statistic": "VALUE", "value": 3725.0 }] }
        }"#
    }

    fn drain(source: &mut FileSource) -> Vec<Update> {
        std::iter::from_fn(|| source.poll()).collect()
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/dashboard.json");
        assert_eq!(source.path(), Path::new("/tmp/dashboard.json"));
        assert_eq!(source.description(), "file: /tmp/dashboard.json");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_poll_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());

        // First read yields one update per endpoint
        let updates = drain(&mut source);
        let endpoints: Vec<Endpoint> = updates.iter().map(Update::endpoint).collect();
        assert_eq!(endpoints, Endpoint::ALL.to_vec());

        // Unchanged file yields nothing
        assert!(source.poll().is_none());
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_detects_changes() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());
        let _ = drain(&mut source);

        std::thread::sleep(std::time::Duration::from_millis(10));
        std::fs::write(file.path(), r#"{ "health": { "status": "DOWN" } }"#).unwrap();

        // Filesystems with coarse mtime resolution may not see the change
        let updates = drain(&mut source);
        if !updates.is_empty() {
            assert_eq!(updates.len(), 1);
            assert!(matches!(&updates[0], Update::Health(h) if h.status.as_deref() == Some("DOWN")));
        }
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/dashboard.json");

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Read error"));
    }

    #[test]
    fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut source = FileSource::new(file.path());

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Parse error"));
    }
}
