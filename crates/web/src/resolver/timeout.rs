use crate::error::ResolveError;
use crate::resolver::UrlResolver;
use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

/// Races another resolver against a deadline.
///
/// An expired deadline is reported as [`ResolveError::Timeout`] and goes through the same
/// error path as a failed resolution.
#[derive(Debug)]
pub struct TimeoutResolver<R> {
    inner: R,
    timeout: Duration,
}

impl<R: UrlResolver> TimeoutResolver<R> {
    pub fn new(inner: R, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl<R: UrlResolver> UrlResolver for TimeoutResolver<R> {
    fn needs_resolution(&self, uri: &str) -> bool {
        self.inner.needs_resolution(uri)
    }

    async fn resolve(&self, uri: &str) -> Result<String, ResolveError> {
        match tokio::time::timeout(self.timeout, self.inner.resolve(uri)).await {
            Ok(result) => result,
            Err(_elapsed) => {
                warn!(uri, timeout = ?self.timeout, "url resolution timed out");
                Err(ResolveError::timeout(self.timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowResolver(Duration);

    #[async_trait]
    impl UrlResolver for SlowResolver {
        fn needs_resolution(&self, _uri: &str) -> bool {
            true
        }

        async fn resolve(&self, uri: &str) -> Result<String, ResolveError> {
            tokio::time::sleep(self.0).await;
            Ok(format!("https://resolved/{uri}"))
        }
    }

    #[tokio::test]
    async fn resolves_within_deadline() {
        let resolver = TimeoutResolver::new(SlowResolver(Duration::from_millis(1)), Duration::from_secs(5));

        assert!(resolver.needs_resolution("anything"));
        assert_eq!(resolver.resolve("key").await.unwrap(), "https://resolved/key");
    }

    #[tokio::test]
    async fn times_out() {
        let resolver = TimeoutResolver::new(SlowResolver(Duration::from_secs(30)), Duration::from_millis(10));

        let error = resolver.resolve("key").await.unwrap_err();
        assert!(matches!(error, ResolveError::Timeout { after } if after == Duration::from_millis(10)));
        assert_eq!(error.to_string(), "resolution timed out after 10ms");
    }
}
