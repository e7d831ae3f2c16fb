//! External URL resolution.
//!
//! A redirect target may be an opaque reference that has to be turned into a concrete
//! absolute URL before the response can be finalized, such as a storage object that is
//! only reachable through a time-limited signed URL. This is the single point where
//! building a response suspends.
//!
//! - [`UrlResolver`]: the interface injected into the [`Finalizer`](crate::Finalizer)
//! - [`PassthroughResolver`]: resolves nothing, every URL is used as is
//! - [`StorageUrlResolver`]: signs `scheme://bucket/key` references through a [`UrlSigner`]
//! - [`TimeoutResolver`]: bounds the latency of another resolver

use crate::error::ResolveError;
use async_trait::async_trait;
use std::sync::Arc;

mod storage;
mod timeout;

pub use storage::SignOperation;
pub use storage::SignedUrlParams;
pub use storage::StorageRef;
pub use storage::StorageUrlResolver;
pub use storage::UrlSigner;
pub use timeout::TimeoutResolver;

#[cfg(test)]
pub use storage::MockUrlSigner;

#[async_trait]
pub trait UrlResolver: Send + Sync {
    /// Whether `uri` must go through [`UrlResolver::resolve`].
    ///
    /// URIs that need no resolution are used as is, without suspending.
    fn needs_resolution(&self, uri: &str) -> bool;

    /// Resolves `uri` into an absolute URL.
    async fn resolve(&self, uri: &str) -> Result<String, ResolveError>;
}

#[async_trait]
impl<R: UrlResolver + ?Sized> UrlResolver for Arc<R> {
    fn needs_resolution(&self, uri: &str) -> bool {
        (**self).needs_resolution(uri)
    }

    async fn resolve(&self, uri: &str) -> Result<String, ResolveError> {
        (**self).resolve(uri).await
    }
}

/// A resolver that never resolves anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughResolver;

#[async_trait]
impl UrlResolver for PassthroughResolver {
    fn needs_resolution(&self, _uri: &str) -> bool {
        false
    }

    async fn resolve(&self, uri: &str) -> Result<String, ResolveError> {
        Ok(uri.to_owned())
    }
}
