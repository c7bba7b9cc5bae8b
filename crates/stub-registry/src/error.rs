//! Error types for the stub registry.
//!
//! Two tiers exist: [`IndexError`] is what the index reports about its own
//! buckets, and [`RegistryError`] is what callers of the resolver see. The only
//! place one becomes the other is the `From` impl below.

use serde::Serialize;

/// Bucket lookup failures reported by [`crate::index::StubIndex`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error("no bucket for service '{0}'")]
    ServiceMissing(String),
    #[error("service '{service}' has no bucket for method '{method}'")]
    MethodMissing { service: String, method: String },
}

/// Public lookup failures returned by [`crate::resolver::Resolver`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("service not found: {0}")]
    ServiceNotFound(String),
    #[error("method not found: {service}/{method}")]
    MethodNotFound { service: String, method: String },
    #[error("stub not found for {service}/{method}")]
    StubNotFound { service: String, method: String },
}

/// Payload-free discriminant of [`RegistryError`], for transports that map
/// each kind to a distinct request-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ServiceNotFound,
    MethodNotFound,
    StubNotFound,
}

impl ErrorKind {
    /// Label used in logs and metric outcomes.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ServiceNotFound => "service_not_found",
            ErrorKind::MethodNotFound => "method_not_found",
            ErrorKind::StubNotFound => "stub_not_found",
        }
    }
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::ServiceNotFound(_) => ErrorKind::ServiceNotFound,
            RegistryError::MethodNotFound { .. } => ErrorKind::MethodNotFound,
            RegistryError::StubNotFound { .. } => ErrorKind::StubNotFound,
        }
    }
}

impl From<IndexError> for RegistryError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::ServiceMissing(service) => RegistryError::ServiceNotFound(service),
            IndexError::MethodMissing { service, method } => {
                RegistryError::MethodNotFound { service, method }
            }
        }
    }
}
