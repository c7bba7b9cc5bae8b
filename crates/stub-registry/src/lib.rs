//! In-memory stub registry for mock servers.
//!
//! Stubs are filed by (service, method) in a [`StubIndex`] and resolved
//! against incoming [`Query`] values by a [`Resolver`], which picks the best
//! strict match, falls back to the closest candidate, and keeps track of which
//! stubs have answered real requests.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use stub_registry::{Query, Resolver, Stub, StubIndex, StubMatcher};
//!
//! let resolver = Resolver::new(StubIndex::new(), StubMatcher::new());
//! let stub = Stub::new("Greeter", "SayHello")
//!     .with_input_equals(json!({"name": "Bob"}))
//!     .with_output(json!({"message": "Hello Bob"}));
//! resolver.upsert([stub.clone()]);
//!
//! let query = Query::new("Greeter", "SayHello").with_data(json!({"name": "Bob"}));
//! let result = resolver.find(&query).unwrap();
//! assert_eq!(result.found().map(|s| s.id), Some(stub.id));
//! assert_eq!(resolver.used().len(), 1);
//! ```

pub mod config;
pub mod coverage;
pub mod error;
pub mod index;
pub mod matcher;
pub mod metrics;
pub mod predicate;
pub mod query;
pub mod record;
pub mod resolver;
pub mod stub;

pub use config::RegistryConfig;
pub use coverage::{CoverageReport, ServiceCoverage, StubRef};
pub use error::{ErrorKind, IndexError, RegistryError};
pub use index::StubIndex;
pub use matcher::{Matcher, StubMatcher};
pub use query::{Query, DEFAULT_INTERNAL_HEADER};
pub use record::Record;
pub use resolver::{FindResult, Resolver};
pub use stub::{InputCriteria, Stub, StubOutput};
