//! Signed URLs for storage references.
//!
//! A storage reference looks like `s3://bucket/some/key`. Resolving it asks a signing
//! collaborator for a time-limited URL to the object:
//!
//! ```text
//! signed_url(GetObject, { Bucket: "bucket", Key: "some/key", Expires: 900 })
//! ```
//!
//! The collaborator is never retried here, retry policy belongs to it.

use crate::error::{BoxError, ResolveError};
use crate::resolver::UrlResolver;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, trace};

/// Default lifetime of a signed URL.
pub const DEFAULT_EXPIRES: Duration = Duration::from_secs(900);

/// Default scheme of a storage reference.
pub const DEFAULT_SCHEME: &str = "s3";

/// The operation a URL is signed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SignOperation {
    #[serde(rename = "getObject")]
    GetObject,
}

/// Parameters handed to the signing collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignedUrlParams {
    pub bucket: String,
    pub key: String,
    /// Lifetime of the signed URL in seconds.
    pub expires: u64,
}

/// The external service issuing signed URLs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlSigner: Send + Sync {
    async fn signed_url(&self, operation: SignOperation, params: SignedUrlParams) -> Result<String, BoxError>;
}

/// A parsed `scheme://bucket/key` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageRef {
    pub bucket: String,
    pub key: String,
}

impl StorageRef {
    /// Returns true when `uri` uses `scheme`, compared case-insensitively.
    pub fn matches(scheme: &str, uri: &str) -> bool {
        uri.len() > scheme.len()
            && uri.is_char_boundary(scheme.len())
            && uri[..scheme.len()].eq_ignore_ascii_case(scheme)
            && uri[scheme.len()..].starts_with("://")
    }

    /// Parses `uri` into a bucket and a key, both must be non empty.
    pub fn parse(scheme: &str, uri: &str) -> Result<Self, ResolveError> {
        if !Self::matches(scheme, uri) {
            return Err(ResolveError::invalid_reference(uri));
        }

        let location = &uri[scheme.len() + 3..];
        match location.split_once('/') {
            Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => {
                Ok(Self { bucket: bucket.to_owned(), key: key.to_owned() })
            }
            _ => Err(ResolveError::invalid_reference(uri)),
        }
    }
}

/// Resolves storage references into signed URLs.
///
/// # Example
/// ```no_run
/// use micro_reply::resolver::{SignOperation, SignedUrlParams, StorageUrlResolver, UrlSigner};
/// use micro_reply::BoxError;
/// use std::time::Duration;
///
/// struct Signer;
///
/// #[async_trait::async_trait]
/// impl UrlSigner for Signer {
///     async fn signed_url(&self, _op: SignOperation, params: SignedUrlParams) -> Result<String, BoxError> {
///         Ok(format!("https://{}.example.com/{}?Expires={}", params.bucket, params.key, params.expires))
///     }
/// }
///
/// let resolver = StorageUrlResolver::new(Signer).expires(Duration::from_secs(60));
/// ```
#[derive(Debug)]
pub struct StorageUrlResolver<S> {
    signer: S,
    scheme: String,
    expires: Duration,
}

impl<S: UrlSigner> StorageUrlResolver<S> {
    pub fn new(signer: S) -> Self {
        Self { signer, scheme: DEFAULT_SCHEME.to_owned(), expires: DEFAULT_EXPIRES }
    }

    /// Sets the scheme recognized as a storage reference.
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Sets the lifetime of the signed URLs produced by [`UrlResolver::resolve`].
    pub fn expires(mut self, expires: Duration) -> Self {
        self.expires = expires;
        self
    }

    /// Signs `uri` with a custom lifetime.
    pub async fn signed_link(&self, uri: &str, expires: Duration) -> Result<String, ResolveError> {
        let StorageRef { bucket, key } = StorageRef::parse(&self.scheme, uri)?;
        let params = SignedUrlParams { bucket, key, expires: expires.as_secs() };

        trace!(bucket = %params.bucket, key = %params.key, expires = params.expires, "signing storage url");
        let url = self.signer.signed_url(SignOperation::GetObject, params).await.map_err(ResolveError::sign)?;
        debug!(uri, "storage reference resolved");
        Ok(url)
    }
}

#[async_trait]
impl<S: UrlSigner> UrlResolver for StorageUrlResolver<S> {
    fn needs_resolution(&self, uri: &str) -> bool {
        StorageRef::matches(&self.scheme, uri)
    }

    async fn resolve(&self, uri: &str) -> Result<String, ResolveError> {
        self.signed_link(uri, self.expires).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    const SIGNED: &str =
        "https://s3.amazonaws.com/my-test-bucket/test/test.txt?AWSAccessKeyId=AKXYZ&Expires=1534290845&Signature=XYZ";

    fn params(bucket: &str, key: &str, expires: u64) -> SignedUrlParams {
        SignedUrlParams { bucket: bucket.into(), key: key.into(), expires }
    }

    #[test]
    fn parse_reference() {
        let reference = StorageRef::parse("s3", "s3://my-test-bucket/test/test.txt").unwrap();
        assert_eq!(reference, StorageRef { bucket: "my-test-bucket".into(), key: "test/test.txt".into() });

        assert!(StorageRef::parse("s3", "S3://bucket/key").is_ok());
        assert!(matches!(StorageRef::parse("s3", "s3://bucket"), Err(ResolveError::InvalidReference { .. })));
        assert!(matches!(StorageRef::parse("s3", "s3:///key"), Err(ResolveError::InvalidReference { .. })));
        assert!(matches!(StorageRef::parse("s3", "s3://bucket/"), Err(ResolveError::InvalidReference { .. })));
        assert!(matches!(StorageRef::parse("s3", "http://bucket/key"), Err(ResolveError::InvalidReference { .. })));
    }

    #[test]
    fn scheme_matching() {
        assert!(StorageRef::matches("s3", "s3://b/k"));
        assert!(StorageRef::matches("s3", "S3://b/k"));
        assert!(!StorageRef::matches("s3", "s3:/b/k"));
        assert!(!StorageRef::matches("s3", "s3"));
        assert!(!StorageRef::matches("s3", "https://b/k"));
        assert!(!StorageRef::matches("s3", "é3://b/k"));
    }

    #[test]
    fn params_wire_shape() {
        let json = serde_json::to_value(params("my-test-bucket", "test/test.txt", 900)).unwrap();
        assert_eq!(json, serde_json::json!({ "Bucket": "my-test-bucket", "Key": "test/test.txt", "Expires": 900 }));
    }

    #[tokio::test]
    async fn resolve_signs_with_default_expiry() {
        let mut signer = MockUrlSigner::new();
        signer
            .expect_signed_url()
            .with(eq(SignOperation::GetObject), eq(params("my-test-bucket", "test/test.txt", 900)))
            .times(1)
            .returning(|_, _| Ok(SIGNED.to_string()));

        let resolver = StorageUrlResolver::new(signer);
        assert!(resolver.needs_resolution("s3://my-test-bucket/test/test.txt"));
        assert!(!resolver.needs_resolution("http://www.github.com"));

        let url = resolver.resolve("s3://my-test-bucket/test/test.txt").await.unwrap();
        assert_eq!(url, SIGNED);
    }

    #[tokio::test]
    async fn custom_scheme_and_expiry() {
        let mut signer = MockUrlSigner::new();
        signer
            .expect_signed_url()
            .with(eq(SignOperation::GetObject), eq(params("bucket", "key", 60)))
            .times(1)
            .returning(|_, _| Ok("https://signed".to_string()));

        let resolver = StorageUrlResolver::new(signer).scheme("gs").expires(Duration::from_secs(60));
        assert!(!resolver.needs_resolution("s3://bucket/key"));
        assert_eq!(resolver.resolve("gs://bucket/key").await.unwrap(), "https://signed");
    }

    #[tokio::test]
    async fn signed_link_overrides_expiry() {
        let mut signer = MockUrlSigner::new();
        signer
            .expect_signed_url()
            .with(eq(SignOperation::GetObject), eq(params("bucket", "key", 30)))
            .times(1)
            .returning(|_, _| Ok("https://signed".to_string()));

        let resolver = StorageUrlResolver::new(signer);
        assert_eq!(resolver.signed_link("s3://bucket/key", Duration::from_secs(30)).await.unwrap(), "https://signed");
    }

    #[tokio::test]
    async fn signer_failure() {
        let mut signer = MockUrlSigner::new();
        signer.expect_signed_url().times(1).returning(|_, _| Err("access denied".into()));

        let resolver = StorageUrlResolver::new(signer);
        let error = resolver.resolve("s3://bucket/key").await.unwrap_err();
        assert!(matches!(error, ResolveError::Sign { .. }));
        assert_eq!(error.to_string(), "signing failed: access denied");
    }

    #[tokio::test]
    async fn invalid_reference_never_reaches_signer() {
        let mut signer = MockUrlSigner::new();
        signer.expect_signed_url().never();

        let resolver = StorageUrlResolver::new(signer);
        assert!(matches!(resolver.resolve("s3://bucket").await, Err(ResolveError::InvalidReference { .. })));
    }
}
