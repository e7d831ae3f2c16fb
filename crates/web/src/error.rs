use micro_reply_http::protocol::StatusError;
use std::error::Error;
use std::time::Duration;
use thiserror::Error;

/// Boxed error type returned by handlers and signing collaborators.
pub type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("signing failed: {source}")]
    Sign { source: BoxError },

    #[error("resolution timed out after {}ms", .after.as_millis())]
    Timeout { after: Duration },

    #[error("invalid storage reference: {uri}")]
    InvalidReference { uri: String },
}

impl ResolveError {
    pub fn sign<E: Into<BoxError>>(e: E) -> Self {
        Self::Sign { source: e.into() }
    }

    pub fn timeout(after: Duration) -> Self {
        Self::Timeout { after }
    }

    pub fn invalid_reference<S: ToString>(uri: S) -> Self {
        Self::InvalidReference { uri: uri.to_string() }
    }
}

#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("{code} is an invalid redirect status code")]
    InvalidRedirectStatus { code: u16 },

    #[error(transparent)]
    InvalidStatus {
        #[from]
        source: StatusError,
    },

    #[error("unable to resolve redirect url: {source}")]
    Resolution {
        #[from]
        source: ResolveError,
    },

    #[error("unable to serialize body: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },

    #[error("{reason}")]
    Handler { reason: String },

    #[error("response has already been finalized")]
    FinalizeReused,
}

impl ResponseError {
    pub fn invalid_redirect_status(code: u16) -> Self {
        Self::InvalidRedirectStatus { code }
    }

    pub fn handler<E: ToString>(e: E) -> Self {
        Self::Handler { reason: e.to_string() }
    }

    /// Whether the error depends on request data and can be turned into a 500 envelope.
    ///
    /// Reusing a finalized response is a defect of the calling code and is surfaced instead.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ResponseError::FinalizeReused)
    }
}
