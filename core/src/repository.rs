//! Per-record-type repositories.
//!
//! RULE: Record sets are never edited in place. Every mutation swaps in a
//! new set (copy-on-write through `Arc::make_mut`), so a snapshot taken
//! before a mutation never observes it.

use std::{collections::HashSet, sync::Arc};

use crate::{
    error::{ConsoleError, ConsoleResult},
    pipeline::apply_query,
    query::Query,
    record::Record,
};

/// The data-layer contract a list view talks to.
pub trait RecordRepository<R: Record> {
    /// Records matching `query`, filtered then sorted.
    fn list(&self, query: &Query<R::Field>) -> Vec<R>;

    fn get(&self, id: &str) -> ConsoleResult<&R>;

    /// Replace record `id` with `patch(current)`. Returns `(before, after)`.
    fn mutate<P>(&mut self, id: &str, patch: P) -> ConsoleResult<(R, R)>
    where
        P: FnOnce(&R) -> ConsoleResult<R>;

    fn remove(&mut self, id: &str) -> ConsoleResult<R>;
}

pub struct InMemoryRepository<R> {
    records: Arc<Vec<R>>,
}

impl<R: Record> Default for InMemoryRepository<R> {
    fn default() -> Self {
        Self { records: Arc::new(Vec::new()) }
    }
}

impl<R: Record> InMemoryRepository<R> {
    pub fn with_records(records: Vec<R>) -> ConsoleResult<Self> {
        ensure_unique_ids(&records)?;
        Ok(Self { records: Arc::new(records) })
    }

    /// An immutable view of the current set. Later mutations don't touch it.
    pub fn snapshot(&self) -> Arc<Vec<R>> {
        Arc::clone(&self.records)
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Swap in a whole new set, e.g. after a refresh.
    pub fn replace_all(&mut self, records: Vec<R>) -> ConsoleResult<()> {
        ensure_unique_ids(&records)?;
        self.records = Arc::new(records);
        Ok(())
    }

    /// Apply `patch` to every id in `ids`. All-or-nothing: if any id is
    /// unknown or repeated, or any patch fails, the set is left unchanged.
    pub fn mutate_many<P>(&mut self, ids: &[String], patch: P) -> ConsoleResult<Vec<(R, R)>>
    where
        P: Fn(&R) -> ConsoleResult<R>,
    {
        let mut seen = HashSet::with_capacity(ids.len());
        if let Some(dup) = ids.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(ConsoleError::DuplicateRecordId { id: dup.clone() });
        }

        let mut staged = Vec::with_capacity(ids.len());
        for id in ids {
            let idx = self.position(id)?;
            let before = &self.records[idx];
            let after = patch(before)?;
            check_same_id(before, &after)?;
            staged.push((idx, before.clone(), after));
        }

        let records = Arc::make_mut(&mut self.records);
        let mut changes = Vec::with_capacity(staged.len());
        for (idx, before, after) in staged {
            records[idx] = after.clone();
            changes.push((before, after));
        }
        log::debug!("bulk mutation touched {} records", changes.len());
        Ok(changes)
    }

    fn position(&self, id: &str) -> ConsoleResult<usize> {
        self.records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| ConsoleError::RecordNotFound { id: id.to_string() })
    }
}

impl<R: Record> RecordRepository<R> for InMemoryRepository<R> {
    fn list(&self, query: &Query<R::Field>) -> Vec<R> {
        apply_query(&self.records, query).into_iter().cloned().collect()
    }

    fn get(&self, id: &str) -> ConsoleResult<&R> {
        let idx = self.position(id)?;
        Ok(&self.records[idx])
    }

    fn mutate<P>(&mut self, id: &str, patch: P) -> ConsoleResult<(R, R)>
    where
        P: FnOnce(&R) -> ConsoleResult<R>,
    {
        let idx = self.position(id)?;
        let before = self.records[idx].clone();
        let after = patch(&before)?;
        check_same_id(&before, &after)?;
        Arc::make_mut(&mut self.records)[idx] = after.clone();
        Ok((before, after))
    }

    fn remove(&mut self, id: &str) -> ConsoleResult<R> {
        let idx = self.position(id)?;
        Ok(Arc::make_mut(&mut self.records).remove(idx))
    }
}

fn ensure_unique_ids<R: Record>(records: &[R]) -> ConsoleResult<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for r in records {
        if !seen.insert(r.id()) {
            return Err(ConsoleError::DuplicateRecordId { id: r.id().to_string() });
        }
    }
    Ok(())
}

fn check_same_id<R: Record>(before: &R, after: &R) -> ConsoleResult<()> {
    if before.id() != after.id() {
        return Err(ConsoleError::IdChanged {
            from: before.id().to_string(),
            to: after.id().to_string(),
        });
    }
    Ok(())
}
