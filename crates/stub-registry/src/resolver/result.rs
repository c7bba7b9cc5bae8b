//! Outcome of a successful resolution.

use std::sync::Arc;

/// Either the stub that strictly matched a query, or, when none did, the
/// closest non-matching candidate. Exactly one side is populated.
#[derive(Debug)]
pub struct FindResult<R> {
    found: Option<Arc<R>>,
    similar: Option<Arc<R>>,
}

impl<R> Clone for FindResult<R> {
    fn clone(&self) -> Self {
        Self {
            found: self.found.clone(),
            similar: self.similar.clone(),
        }
    }
}

impl<R> FindResult<R> {
    pub(crate) fn exact(record: Arc<R>) -> Self {
        Self {
            found: Some(record),
            similar: None,
        }
    }

    pub(crate) fn closest(record: Arc<R>) -> Self {
        Self {
            found: None,
            similar: Some(record),
        }
    }

    /// The strict match, if any.
    pub fn found(&self) -> Option<&Arc<R>> {
        self.found.as_ref()
    }

    /// The closest candidate. Only set when there is no strict match.
    pub fn similar(&self) -> Option<&Arc<R>> {
        self.similar.as_ref()
    }

    pub fn is_exact(&self) -> bool {
        self.found.is_some()
    }
}
