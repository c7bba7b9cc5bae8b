//! Query resolution and usage tracking.
//!
//! The [`Resolver`] owns a [`StubIndex`] and a [`Matcher`] and is the public
//! entry point of the registry:
//!
//! - CRUD and enumeration delegate to the index
//! - `find` resolves a query to a strict match or the closest candidate
//! - `used` / `unused` / `coverage` report which stubs answered real requests
//!
//! ## Locking
//!
//! The usage set has its own `RwLock`, separate from the index lock. `find`
//! reads the index and then marks the winner in a second critical section, so
//! a stub deleted in between may still be marked. Usage tracking is
//! best-effort diagnostics; `used()` only ever reports stubs that are still
//! stored.

mod result;


pub use result::FindResult;

use crate::config::RegistryConfig;
use crate::coverage::CoverageReport;
use crate::error::RegistryError;
use crate::index::StubIndex;
use crate::matcher::Matcher;
use crate::metrics::{self, LookupOutcome};
use crate::query::Query;
use crate::record::Record;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

pub struct Resolver<R, M> {
    index: StubIndex<R>,
    matcher: M,
    config: RegistryConfig,
    /// Stubs returned as a strict match to a non-internal query
    used: RwLock<HashSet<Uuid>>,
}

impl<R: Record, M: Matcher<R>> Resolver<R, M> {
    pub fn new(index: StubIndex<R>, matcher: M) -> Self {
        metrics::add_stubs(index.len());
        Self {
            index,
            matcher,
            config: RegistryConfig::default(),
            used: RwLock::new(HashSet::new()),
        }
    }

    /// Build a resolver with an explicit configuration, rejecting one that
    /// fails [`RegistryConfig::validate`].
    pub fn with_config(
        index: StubIndex<R>,
        matcher: M,
        config: RegistryConfig,
    ) -> Result<Self, anyhow::Error> {
        config.validate()?;
        metrics::add_stubs(index.len());
        Ok(Self {
            index,
            matcher,
            config,
            used: RwLock::new(HashSet::new()),
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Start a query for (service, method) from raw request headers, flagged
    /// internal when the configured internal header is present.
    pub fn query(
        &self,
        service: impl Into<String>,
        method: impl Into<String>,
        headers: HashMap<String, String>,
    ) -> Query {
        Query::new(service, method).with_headers_flagged_by(headers, &self.config.internal_header)
    }

    /// Insert or replace stubs, returning their identifiers in input order.
    pub fn upsert(&self, records: impl IntoIterator<Item = R>) -> Vec<Uuid> {
        let (ids, added) = self.index.upsert_counted(records);
        metrics::add_stubs(added);
        info!("Upserted {} stubs", ids.len());
        ids
    }

    /// Remove stubs by identifier, returning how many were present.
    pub fn delete(&self, ids: impl IntoIterator<Item = Uuid>) -> usize {
        let removed = self.index.delete(ids);
        metrics::remove_stubs(removed);
        info!("Deleted {} stubs", removed);
        removed
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<Arc<R>> {
        self.index.find_by_id(id)
    }

    /// Every stub filed under (service, method), in insertion order.
    pub fn find_by(&self, service: &str, method: &str) -> Result<Vec<Arc<R>>, RegistryError> {
        Ok(self.index.find_all(service, method)?)
    }

    pub fn all(&self) -> Vec<Arc<R>> {
        self.index.values()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Stubs that have answered at least one non-internal query.
    pub fn used(&self) -> Vec<Arc<R>> {
        let used = self.used.read();
        self.index.find_by_ids(used.iter().copied())
    }

    /// Stored stubs that have never answered a non-internal query.
    pub fn unused(&self) -> Vec<Arc<R>> {
        let used = self.used.read();
        self.index
            .values()
            .into_iter()
            .filter(|record| !used.contains(&record.id()))
            .collect()
    }

    /// Used/unused summary taken from a single snapshot of the usage set.
    pub fn coverage(&self) -> CoverageReport {
        let used = self.used.read();
        let (hit, missed): (Vec<Arc<R>>, Vec<Arc<R>>) = self
            .index
            .values()
            .into_iter()
            .partition(|record| used.contains(&record.id()));
        CoverageReport::from_partition(&hit, &missed)
    }

    /// Drop every stub and forget all usage.
    pub fn clear(&self) {
        let mut used = self.used.write();
        used.clear();
        let removed = self.index.clear();
        metrics::remove_stubs(removed);
        info!("Cleared all stubs and usage");
    }

    /// Resolve a query.
    ///
    /// With an explicit id the (service, method) pair must exist and the id
    /// must be stored; otherwise every stub in the bucket is ranked and the
    /// best strict match wins, falling back to the closest candidate.
    pub fn find(&self, query: &Query) -> Result<FindResult<R>, RegistryError> {
        let start = Instant::now();
        let result = match query.id {
            Some(id) => self.search_by_id(query, id),
            None => self.search(query),
        };

        let outcome = match &result {
            Ok(found) if found.is_exact() => LookupOutcome::Found,
            Ok(_) => LookupOutcome::Similar,
            Err(e) => LookupOutcome::Failed(e.kind()),
        };
        metrics::record_lookup(outcome, start.elapsed().as_secs_f64());
        debug!(
            "Resolved {}/{} (internal={}): {}",
            query.service,
            query.method,
            query.internal,
            outcome.as_str()
        );

        result
    }

    fn search_by_id(&self, query: &Query, id: Uuid) -> Result<FindResult<R>, RegistryError> {
        self.index.position(&query.service, &query.method)?;

        match self.index.find_by_id(id) {
            Some(record) => {
                self.mark(query, id);
                Ok(FindResult::exact(record))
            }
            // An unknown id under a known pair reports the service, not the stub.
            None => Err(RegistryError::ServiceNotFound(query.service.clone())),
        }
    }

    fn search(&self, query: &Query) -> Result<FindResult<R>, RegistryError> {
        let candidates = self.find_by(&query.service, &query.method)?;

        let mut found: Option<(&Arc<R>, f64)> = None;
        let mut similar: Option<&Arc<R>> = None;
        let mut similar_rank = self.config.min_similarity;

        for candidate in &candidates {
            let rank = self.matcher.rank(query, candidate);

            if rank > similar_rank {
                similar = Some(candidate);
                similar_rank = rank;
            }

            if self.matcher.is_match(query, candidate)
                && found.is_none_or(|(_, best)| rank > best)
            {
                found = Some((candidate, rank));
            }
        }

        if let Some((record, rank)) = found {
            debug!("Strict match {} (rank {:.3})", record.id(), rank);
            self.mark(query, record.id());
            return Ok(FindResult::exact(Arc::clone(record)));
        }

        match similar {
            Some(record) => {
                debug!("Closest candidate {} (rank {:.3})", record.id(), similar_rank);
                Ok(FindResult::closest(Arc::clone(record)))
            }
            None => Err(RegistryError::StubNotFound {
                service: query.service.clone(),
                method: query.method.clone(),
            }),
        }
    }

    /// Record that `id` answered `query`. Internal queries are ignored.
    pub fn mark(&self, query: &Query, id: Uuid) {
        if query.internal || !self.config.usage_tracking {
            return;
        }
        self.used.write().insert(id);
    }
}

impl<R, M> Drop for Resolver<R, M> {
    fn drop(&mut self) {
        metrics::remove_stubs(self.index.len());
    }
}
