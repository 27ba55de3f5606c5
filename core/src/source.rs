//! Record sources: where a view's record set comes from.
//!
//! The console has no backend. Sources return fixture literals (after a
//! simulated network delay) or JSON fixture files. A real deployment swaps
//! in a source that performs the HTTP/RPC call and returns the same shapes.

use serde::de::DeserializeOwned;
use std::{marker::PhantomData, path::PathBuf, thread, time::Duration};

use crate::{
    error::{ConsoleError, ConsoleResult},
    record::Record,
};

pub trait RecordSource<R: Record> {
    fn name(&self) -> &str;

    fn fetch(&mut self) -> ConsoleResult<Vec<R>>;
}

/// A fixed record set returned after `latency`.
pub struct StaticSource<R> {
    name: String,
    records: Vec<R>,
    latency: Duration,
}

impl<R: Record> StaticSource<R> {
    pub fn new(name: impl Into<String>, records: Vec<R>) -> Self {
        Self {
            name: name.into(),
            records,
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl<R: Record> RecordSource<R> for StaticSource<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&mut self) -> ConsoleResult<Vec<R>> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        Ok(self.records.clone())
    }
}

/// Reads a JSON array of records from disk on every fetch.
pub struct JsonFileSource<R> {
    name: String,
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R> JsonFileSource<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: format!("file:{}", path.display()),
            path,
            _record: PhantomData,
        }
    }
}

impl<R: Record + DeserializeOwned> RecordSource<R> for JsonFileSource<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&mut self) -> ConsoleResult<Vec<R>> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            ConsoleError::SourceUnavailable {
                source_name: self.name.clone(),
                reason: e.to_string(),
            }
        })?;
        let records: Vec<R> = serde_json::from_str(&content)?;
        log::debug!("{}: read {} records", self.name, records.len());
        Ok(records)
    }
}

/// Always fails. Stands in for an unreachable backend.
pub struct FailingSource {
    name: String,
    reason: String,
}

impl FailingSource {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl<R: Record> RecordSource<R> for FailingSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&mut self) -> ConsoleResult<Vec<R>> {
        Err(ConsoleError::SourceUnavailable {
            source_name: self.name.clone(),
            reason: self.reason.clone(),
        })
    }
}
