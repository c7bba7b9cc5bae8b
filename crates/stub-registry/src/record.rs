//! The capability every stored entry must expose.

use uuid::Uuid;

/// A record that can be filed in a [`crate::index::StubIndex`].
///
/// The index only needs the identifier and the (service, method) coordinate;
/// everything else about the record is opaque to it and is interpreted by a
/// [`crate::matcher::Matcher`].
pub trait Record: Send + Sync + 'static {
    fn id(&self) -> Uuid;
    fn service(&self) -> &str;
    fn method(&self) -> &str;
}
