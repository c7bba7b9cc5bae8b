//! Usage coverage report for the administrative surface.
//!
//! Summarizes which stubs have answered real requests, overall and per
//! service, and lists the ones that never did.

use crate::record::Record;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    pub total: usize,
    pub used: usize,
    pub unused: usize,
    /// Sorted by service name
    pub services: Vec<ServiceCoverage>,
    pub unused_stubs: Vec<StubRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCoverage {
    pub service: String,
    pub used: usize,
    pub unused: usize,
}

/// Coordinates of one stub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StubRef {
    pub id: Uuid,
    pub service: String,
    pub method: String,
}

impl CoverageReport {
    /// Build a report from a used/unused partition of the stored records.
    pub fn from_partition<R: Record>(used: &[Arc<R>], unused: &[Arc<R>]) -> Self {
        let mut per_service: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for record in used {
            per_service.entry(record.service()).or_default().0 += 1;
        }
        for record in unused {
            per_service.entry(record.service()).or_default().1 += 1;
        }

        let mut unused_stubs: Vec<StubRef> = unused
            .iter()
            .map(|record| StubRef {
                id: record.id(),
                service: record.service().to_string(),
                method: record.method().to_string(),
            })
            .collect();
        unused_stubs.sort_by(|a, b| {
            (&a.service, &a.method, a.id).cmp(&(&b.service, &b.method, b.id))
        });

        Self {
            total: used.len() + unused.len(),
            used: used.len(),
            unused: unused.len(),
            services: per_service
                .into_iter()
                .map(|(service, (used, unused))| ServiceCoverage {
                    service: service.to_string(),
                    used,
                    unused,
                })
                .collect(),
            unused_stubs,
        }
    }

    /// Fraction of stubs that have been used; 1.0 when nothing is stored.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.used as f64 / self.total as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        self.unused == 0
    }
}
