#![allow(dead_code)]

use mesh_dns_application::ports::{HostRecordSource, HostRecords};
use mesh_dns_domain::{HostRecord, StoreError};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub fn host(hostname: &str, addresses: &[&str]) -> HostRecord {
    HostRecord::new(
        hostname,
        addresses.iter().map(|a| a.to_string()).collect(),
    )
}

/// In-memory store that counts how many records each read pulls.
pub struct CountingStore {
    path: PathBuf,
    records: Vec<HostRecord>,
    pulled: Arc<AtomicUsize>,
    opens: AtomicUsize,
}

impl CountingStore {
    pub fn new(records: Vec<HostRecord>) -> Self {
        Self {
            path: PathBuf::from("/mock/dns.json"),
            records,
            pulled: Arc::new(AtomicUsize::new(0)),
            opens: AtomicUsize::new(0),
        }
    }

    pub fn pulled(&self) -> usize {
        self.pulled.load(Ordering::SeqCst)
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl HostRecordSource for CountingStore {
    fn open(&self) -> Result<HostRecords, StoreError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let pulled = Arc::clone(&self.pulled);
        let records = self.records.clone();
        Ok(Box::new(records.into_iter().inspect(move |_| {
            pulled.fetch_add(1, Ordering::SeqCst);
        })))
    }

    fn location(&self) -> PathBuf {
        self.path.clone()
    }
}

/// Store whose backing file never exists.
pub struct MissingStore {
    path: PathBuf,
}

impl MissingStore {
    pub fn new(path: &str) -> Self {
        Self {
            path: PathBuf::from(path),
        }
    }
}

impl HostRecordSource for MissingStore {
    fn open(&self) -> Result<HostRecords, StoreError> {
        Err(StoreError::NotFound {
            path: self.path.clone(),
        })
    }

    fn location(&self) -> PathBuf {
        self.path.clone()
    }
}

impl CountingStore {
    /// Records as a plain iterator, for driving `resolve` directly.
    pub fn open_all(&self) -> impl Iterator<Item = HostRecord> {
        self.records.clone().into_iter()
    }
}
