//! Two-level stub index.
//!
//! Records are filed under `service -> method -> bucket` where each bucket is
//! an insertion-ordered list of identifiers, and a flat `id -> record` map
//! serves point lookups. Both live behind a single `RwLock`, so every
//! operation below is atomic with respect to the others and a record is always
//! filed under exactly its latest coordinates.

use crate::error::IndexError;
use crate::record::Record;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

type Buckets = HashMap<String, HashMap<String, Vec<Uuid>>>;

struct IndexState<R> {
    records: HashMap<Uuid, Arc<R>>,
    services: Buckets,
}

impl<R> Default for IndexState<R> {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
            services: HashMap::new(),
        }
    }
}

impl<R: Record> IndexState<R> {
    fn bucket(&self, service: &str, method: &str) -> Result<&Vec<Uuid>, IndexError> {
        let methods = self
            .services
            .get(service)
            .ok_or_else(|| IndexError::ServiceMissing(service.to_string()))?;
        methods
            .get(method)
            .ok_or_else(|| IndexError::MethodMissing {
                service: service.to_string(),
                method: method.to_string(),
            })
    }

    fn attach(&mut self, service: &str, method: &str, id: Uuid) {
        self.services
            .entry(service.to_string())
            .or_default()
            .entry(method.to_string())
            .or_default()
            .push(id);
    }

    /// Remove `id` from its bucket, pruning the method and then the service
    /// when they become empty.
    fn detach(&mut self, service: &str, method: &str, id: Uuid) {
        let Some(methods) = self.services.get_mut(service) else {
            return;
        };
        if let Some(bucket) = methods.get_mut(method) {
            if let Some(pos) = bucket.iter().position(|existing| *existing == id) {
                bucket.remove(pos);
            }
            if bucket.is_empty() {
                methods.remove(method);
            }
        }
        if methods.is_empty() {
            self.services.remove(service);
        }
    }
}

/// Thread-safe index of records keyed by identifier and by (service, method).
pub struct StubIndex<R> {
    state: RwLock<IndexState<R>>,
}

impl<R: Record> Default for StubIndex<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> StubIndex<R> {
    pub fn len(&self) -> usize {
        self.state.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().records.is_empty()
    }
}

impl<R: Record> StubIndex<R> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(IndexState::default()),
        }
    }

    /// Insert or replace each record, returning their identifiers in input order.
    ///
    /// A record whose coordinates are unchanged keeps its place in its bucket;
    /// one whose coordinates changed moves to the end of the new bucket.
    pub fn upsert(&self, records: impl IntoIterator<Item = R>) -> Vec<Uuid> {
        self.upsert_counted(records).0
    }

    /// Like [`StubIndex::upsert`], also returning how many records were new.
    pub(crate) fn upsert_counted(&self, records: impl IntoIterator<Item = R>) -> (Vec<Uuid>, usize) {
        let mut state = self.state.write();
        let mut ids = Vec::new();
        let mut added = 0;

        for record in records {
            let id = record.id();
            let record = Arc::new(record);

            match state.records.insert(id, Arc::clone(&record)) {
                Some(previous)
                    if previous.service() == record.service()
                        && previous.method() == record.method() => {}
                Some(previous) => {
                    debug!(
                        "Moving stub {} from {}/{} to {}/{}",
                        id,
                        previous.service(),
                        previous.method(),
                        record.service(),
                        record.method()
                    );
                    state.detach(previous.service(), previous.method(), id);
                    state.attach(record.service(), record.method(), id);
                }
                None => {
                    state.attach(record.service(), record.method(), id);
                    added += 1;
                }
            }

            ids.push(id);
        }

        (ids, added)
    }

    /// Remove the given identifiers, returning how many were actually present.
    pub fn delete(&self, ids: impl IntoIterator<Item = Uuid>) -> usize {
        let mut state = self.state.write();
        let mut removed = 0;

        for id in ids {
            if let Some(record) = state.records.remove(&id) {
                state.detach(record.service(), record.method(), id);
                removed += 1;
            }
        }

        removed
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<Arc<R>> {
        self.state.read().records.get(&id).cloned()
    }

    /// Look up several identifiers, skipping the ones that are absent.
    pub fn find_by_ids(&self, ids: impl IntoIterator<Item = Uuid>) -> Vec<Arc<R>> {
        let state = self.state.read();
        ids.into_iter()
            .filter_map(|id| state.records.get(&id).cloned())
            .collect()
    }

    /// Copy of the bucket for (service, method), in insertion order.
    pub fn find_all(&self, service: &str, method: &str) -> Result<Vec<Arc<R>>, IndexError> {
        let state = self.state.read();
        let bucket = state.bucket(service, method)?;
        Ok(bucket
            .iter()
            .filter_map(|id| state.records.get(id).cloned())
            .collect())
    }

    /// Check that (service, method) has a bucket without copying it.
    ///
    /// Returns the number of records in the bucket.
    pub fn position(&self, service: &str, method: &str) -> Result<usize, IndexError> {
        self.state.read().bucket(service, method).map(Vec::len)
    }

    /// Every stored record, in no particular order.
    pub fn values(&self) -> Vec<Arc<R>> {
        self.state.read().records.values().cloned().collect()
    }

    /// Names of every service that currently has at least one record.
    pub fn services(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.read().services.keys().cloned().collect();
        names.sort();
        names
    }

    /// Remove every record, returning how many were stored.
    pub fn clear(&self) -> usize {
        let mut state = self.state.write();
        let removed = state.records.len();
        state.records.clear();
        state.services.clear();
        removed
    }

    /// Panics if the flat map and the buckets disagree.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let state = self.state.read();
        let mut filed = 0;
        for (service, methods) in &state.services {
            assert!(!methods.is_empty(), "service {service} left without methods");
            for (method, bucket) in methods {
                assert!(!bucket.is_empty(), "bucket {service}/{method} left empty");
                for id in bucket {
                    let record = state
                        .records
                        .get(id)
                        .unwrap_or_else(|| panic!("{id} filed but not stored"));
                    assert_eq!(record.service(), service);
                    assert_eq!(record.method(), method);
                    filed += 1;
                }
            }
        }
        assert_eq!(filed, state.records.len(), "records filed more than once");
    }
}
