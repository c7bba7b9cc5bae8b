//! Strict matching and similarity ranking of records against queries.
//!
//! The resolver only depends on the [`Matcher`] trait. [`StubMatcher`] is the
//! implementation for [`Stub`] records.

use crate::predicate::{contains, deep_equals, similarity, RegexCache};
use crate::query::Query;
use crate::stub::{InputCriteria, Stub};
use serde_json::{Map, Value};

/// Weight applied to partial similarity so an unsatisfied field always scores
/// below a satisfied one.
const PARTIAL_WEIGHT: f64 = 0.9;

/// Decides whether a record answers a query, and how close it comes if not.
///
/// Both methods must be pure and deterministic.
pub trait Matcher<R>: Send + Sync {
    /// True iff every criterion the record declares holds exactly for the query.
    fn is_match(&self, query: &Query, record: &R) -> bool;

    /// Closeness in `[0, 1]`. A record that matches exactly attains the
    /// highest score that record can reach.
    fn rank(&self, query: &Query, record: &R) -> f64;
}

/// [`Matcher`] for [`Stub`] records.
///
/// `headers` criteria are checked against the query headers with
/// case-insensitive names, `input` criteria against the query payload.
/// `input.equals` is an exact object match; every other operator only
/// constrains the fields it names.
#[derive(Debug, Default)]
pub struct StubMatcher {
    regexes: RegexCache,
}

/// One criteria group paired with the query values it is checked against.
struct Group<'a> {
    criteria: &'a InputCriteria,
    actual: &'a Map<String, Value>,
    /// Whether `equals` must cover the whole payload
    exact: bool,
    /// Whether field names compare case-insensitively (`actual` keys are lowercase)
    fold_keys: bool,
}

impl Group<'_> {
    fn lookup(&self, key: &str) -> Option<&Value> {
        if self.fold_keys {
            self.actual.get(&key.to_lowercase())
        } else {
            self.actual.get(key)
        }
    }

    /// Payload fields that `equals` does not account for.
    fn extra_fields(&self) -> usize {
        match (&self.criteria.equals, self.exact) {
            (Some(equals), true) => self
                .actual
                .keys()
                .filter(|key| !equals.contains_key(key.as_str()))
                .count(),
            _ => 0,
        }
    }
}

impl StubMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn groups<'a>(
        stub: &'a Stub,
        query: &'a Query,
        headers: &'a Map<String, Value>,
    ) -> [Group<'a>; 2] {
        [
            Group {
                criteria: &stub.headers,
                actual: headers,
                exact: false,
                fold_keys: true,
            },
            Group {
                criteria: &stub.input,
                actual: &query.data,
                exact: true,
                fold_keys: false,
            },
        ]
    }

    fn group_matches(&self, group: &Group<'_>) -> bool {
        let ignore_order = group.criteria.ignore_array_order;

        if let Some(equals) = &group.criteria.equals {
            let satisfied = (!group.exact || group.extra_fields() == 0)
                && equals.iter().all(|(key, expected)| {
                    group
                        .lookup(key)
                        .is_some_and(|actual| deep_equals(expected, actual, ignore_order))
                });
            if !satisfied {
                return false;
            }
        }

        if let Some(fields) = &group.criteria.contains {
            let satisfied = fields.iter().all(|(key, expected)| {
                group
                    .lookup(key)
                    .is_some_and(|actual| contains(expected, actual, ignore_order))
            });
            if !satisfied {
                return false;
            }
        }

        if let Some(fields) = &group.criteria.matches {
            let satisfied = fields.iter().all(|(key, expected)| {
                group
                    .lookup(key)
                    .is_some_and(|actual| self.regexes.matches(expected, actual))
            });
            if !satisfied {
                return false;
            }
        }

        true
    }

    /// Sum of per-field scores and the number of fields they were taken over.
    fn group_score(&self, group: &Group<'_>) -> (f64, usize) {
        let ignore_order = group.criteria.ignore_array_order;
        let mut total = 0.0;
        let mut fields = group.extra_fields();

        if let Some(equals) = &group.criteria.equals {
            for (key, expected) in equals {
                fields += 1;
                total += match group.lookup(key) {
                    Some(actual) if deep_equals(expected, actual, ignore_order) => 1.0,
                    Some(actual) => similarity(expected, actual) * PARTIAL_WEIGHT,
                    None => 0.0,
                };
            }
        }

        if let Some(contained) = &group.criteria.contains {
            for (key, expected) in contained {
                fields += 1;
                total += match group.lookup(key) {
                    Some(actual) if contains(expected, actual, ignore_order) => 1.0,
                    Some(actual) => similarity(expected, actual) * PARTIAL_WEIGHT,
                    None => 0.0,
                };
            }
        }

        if let Some(patterns) = &group.criteria.matches {
            for (key, expected) in patterns {
                fields += 1;
                if group
                    .lookup(key)
                    .is_some_and(|actual| self.regexes.matches(expected, actual))
                {
                    total += 1.0;
                }
            }
        }

        (total, fields)
    }
}

/// Query headers keyed by lowercase name.
fn normalized_headers(query: &Query) -> Map<String, Value> {
    query
        .headers
        .iter()
        .map(|(k, v)| (k.to_lowercase(), Value::String(v.clone())))
        .collect()
}

impl Matcher<Stub> for StubMatcher {
    fn is_match(&self, query: &Query, stub: &Stub) -> bool {
        let headers = normalized_headers(query);
        Self::groups(stub, query, &headers)
            .iter()
            .all(|group| self.group_matches(group))
    }

    fn rank(&self, query: &Query, stub: &Stub) -> f64 {
        let headers = normalized_headers(query);

        let (total, fields) = Self::groups(stub, query, &headers)
            .iter()
            .map(|group| self.group_score(group))
            .fold((0.0, 0), |(t, f), (gt, gf)| (t + gt, f + gf));

        if fields == 0 {
            0.0
        } else {
            total / fields as f64
        }
    }
}
