//! Reader for the mesh membership store.
//!
//! The mesh daemon writes one JSON object per line:
//!
//! ```text
//! {"hostname":"peer1.mesh","ips":["fd00::1"]}
//! {"hostname":"peer2.mesh","ips":["fd00::2","fd00::3"]}
//! ```
//!
//! The file is reopened on every read. Lines that fail to parse are logged
//! and skipped; they never fail the read as a whole.

use mesh_dns_application::ports::{HostRecordSource, HostRecords};
use mesh_dns_domain::config::MESH_STORE_FILE;
use mesh_dns_domain::{HostRecord, StoreError};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::PathBuf;
use tracing::{debug, error, warn};

pub struct JsonLinesHostStore {
    state_dir: PathBuf,
}

impl JsonLinesHostStore {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }
}

impl HostRecordSource for JsonLinesHostStore {
    fn open(&self) -> Result<HostRecords, StoreError> {
        let path = self.location();

        let file = File::open(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                error!(path = %path.display(), "{} not found", path.display());
                StoreError::NotFound { path: path.clone() }
            } else {
                error!(path = %path.display(), error = %e, "Error opening mesh store");
                StoreError::Unreadable {
                    path: path.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        debug!(path = %path.display(), "Mesh store opened");
        Ok(Box::new(HostRecordLines::new(BufReader::new(file), path)))
    }

    fn location(&self) -> PathBuf {
        self.state_dir.join(MESH_STORE_FILE)
    }
}

/// Lazily parses host records out of a line-delimited reader.
///
/// A read error other than invalid UTF-8 ends the sequence; whatever was
/// yielded before stands.
pub struct HostRecordLines<R> {
    lines: Lines<R>,
    path: PathBuf,
    line_number: usize,
    finished: bool,
}

impl<R: BufRead> HostRecordLines<R> {
    pub fn new(reader: R, path: PathBuf) -> Self {
        Self {
            lines: reader.lines(),
            path,
            line_number: 0,
            finished: false,
        }
    }
}

impl<R: BufRead> Iterator for HostRecordLines<R> {
    type Item = HostRecord;

    fn next(&mut self) -> Option<HostRecord> {
        if self.finished {
            return None;
        }

        loop {
            let Some(next_line) = self.lines.next() else {
                self.finished = true;
                return None;
            };
            self.line_number += 1;

            let line = match next_line {
                Ok(line) => line,
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    warn!(
                        path = %self.path.display(),
                        line_number = self.line_number,
                        error = %e,
                        "Skipping non UTF-8 line in mesh store"
                    );
                    continue;
                }
                Err(e) => {
                    error!(
                        path = %self.path.display(),
                        line_number = self.line_number,
                        error = %e,
                        "Error reading mesh store"
                    );
                    self.finished = true;
                    return None;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<HostRecord>(&line) {
                Ok(record) => return Some(record),
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        line_number = self.line_number,
                        line = %line,
                        error = %e,
                        "Error parsing mesh store line"
                    );
                }
            }
        }
    }
}
