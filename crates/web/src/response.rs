//! Per-request response state.
//!
//! A [`ResponseContext`] is created when a handler invocation begins and is mutated only by
//! that invocation. Handler code records what the response should be (a plain body, a JSONP
//! body or a redirect) and the [`Finalizer`](crate::Finalizer) turns that into an
//! [`Envelope`] exactly once.
//!
//! Every mutating operation returns `Result<&mut Self, ResponseError>` so they chain with `?`:
//!
//! ```
//! use micro_reply::ResponseContext;
//!
//! # fn main() -> Result<(), micro_reply::ResponseError> {
//! let mut res = ResponseContext::new();
//! res.location("http://www.github.com")?.html("Location header set")?;
//! assert_eq!(res.get_header("Location"), Some("http://www.github.com"));
//! # Ok(())
//! # }
//! ```
//!
//! Data dependent failures (an invalid status, a body that cannot be serialized) never
//! surface here, they are recorded and turn the response into a 500 error envelope when it
//! is finalized. The only error these operations return is
//! [`ResponseError::FinalizeReused`].

use crate::content_type;
use crate::error::ResponseError;
use crate::redirect::{DEFAULT_REDIRECT_STATUS, validate_redirect_status};
use http::header::{CONTENT_TYPE, LOCATION};
use micro_reply_http::codec::encode_header_url;
use micro_reply_http::protocol::{
    BodyValue, DEFAULT_STATUS, Envelope, ResponseHeaders, reason_phrase, validate_status,
};
use serde::Serialize;
use std::mem;
use tracing::{debug, warn};

/// Lifecycle of a response.
///
/// `Pending -> Resolving -> Serialized -> Emitted`, `Resolving` is skipped when the response
/// has nothing to resolve. `Emitted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseState {
    Pending,
    Resolving,
    Serialized,
    Emitted,
}

/// The high level instruction the response body is produced from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Directive {
    Send(BodyValue),
    Jsonp(BodyValue),
    Redirect { status: u16, url: String },
}

#[derive(Debug)]
pub struct ResponseContext {
    pub(crate) headers: ResponseHeaders,
    pub(crate) status: u16,
    pub(crate) body: String,
    pub(crate) is_base64_encoded: bool,
    directive: Directive,
    failure: Option<ResponseError>,
    state: ResponseState,
}

impl Default for ResponseContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseContext {
    pub fn new() -> Self {
        Self {
            headers: ResponseHeaders::new(),
            status: DEFAULT_STATUS,
            body: String::new(),
            is_base64_encoded: false,
            directive: Directive::Send(BodyValue::Empty),
            failure: None,
            state: ResponseState::Pending,
        }
    }

    /// Sets the status code.
    ///
    /// A code outside the canonical HTTP range turns the response into an error response.
    pub fn status(&mut self, code: u16) -> Result<&mut Self, ResponseError> {
        self.ensure_open()?;
        match validate_status(code) {
            Ok(_) => self.status = code,
            Err(e) => self.fail(e.into()),
        }
        Ok(self)
    }

    /// Sets a header, replacing any value set under the same name in any casing.
    pub fn header(&mut self, name: impl AsRef<str>, value: impl Into<String>) -> Result<&mut Self, ResponseError> {
        self.ensure_open()?;
        self.headers.set(name, value);
        Ok(self)
    }

    pub fn remove_header(&mut self, name: impl AsRef<str>) -> Result<&mut Self, ResponseError> {
        self.ensure_open()?;
        self.headers.remove(name);
        Ok(self)
    }

    pub fn get_header(&self, name: impl AsRef<str>) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn has_header(&self, name: impl AsRef<str>) -> bool {
        self.headers.has(name)
    }

    /// Sets the `Content-Type` from a mime type or a file extension such as `html` or `.png`.
    ///
    /// Unknown extensions and malformed mime types leave the header untouched.
    pub fn content_type(&mut self, kind: &str) -> Result<&mut Self, ResponseError> {
        self.ensure_open()?;
        match content_type::lookup(kind) {
            Some(value) => self.headers.set(CONTENT_TYPE, value),
            None => debug!(kind, "unknown or malformed content type, header unchanged"),
        }
        Ok(self)
    }

    /// Sends a value as the body.
    ///
    /// Text is sent as is, everything else as JSON. The content type defaults to
    /// `application/json` unless it was set before.
    pub fn send(&mut self, value: impl Into<BodyValue>) -> Result<&mut Self, ResponseError> {
        self.ensure_open()?;
        self.directive = Directive::Send(value.into());
        Ok(self)
    }

    /// Sends any serializable value as the body.
    pub fn send_serialize<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<&mut Self, ResponseError> {
        self.ensure_open()?;
        match BodyValue::from_serialize(value) {
            Ok(body) => self.directive = Directive::Send(body),
            Err(e) => self.fail(e.into()),
        }
        Ok(self)
    }

    /// Sends a value as JSON, quoting text, and sets `Content-Type: application/json`.
    pub fn json(&mut self, value: impl Into<BodyValue>) -> Result<&mut Self, ResponseError> {
        self.ensure_open()?;
        self.headers.set(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
        self.directive = Directive::Send(BodyValue::Text(value.into().into_json()));
        Ok(self)
    }

    /// Sends text as the body with `Content-Type: text/html`.
    pub fn html(&mut self, text: impl Into<String>) -> Result<&mut Self, ResponseError> {
        self.ensure_open()?;
        self.headers.set(CONTENT_TYPE, mime::TEXT_HTML.as_ref());
        self.directive = Directive::Send(BodyValue::Text(text.into()));
        Ok(self)
    }

    /// Sends a body that is already base64 encoded and flags the envelope accordingly.
    pub fn send_base64(&mut self, encoded: impl Into<String>) -> Result<&mut Self, ResponseError> {
        self.ensure_open()?;
        self.is_base64_encoded = true;
        self.directive = Directive::Send(BodyValue::Text(encoded.into()));
        Ok(self)
    }

    /// Sets the status and sends its reason phrase as the body.
    pub fn send_status(&mut self, code: u16) -> Result<&mut Self, ResponseError> {
        self.status(code)?.send(reason_phrase(code))
    }

    /// Sends a value wrapped in a JSONP callback.
    ///
    /// The callback name is taken from the request query when the response is finalized.
    pub fn jsonp(&mut self, value: impl Into<BodyValue>) -> Result<&mut Self, ResponseError> {
        self.ensure_open()?;
        self.directive = Directive::Jsonp(value.into());
        Ok(self)
    }

    /// Sets the `Location` header without touching the status or the body.
    pub fn location(&mut self, url: &str) -> Result<&mut Self, ResponseError> {
        self.ensure_open()?;
        self.headers.set(LOCATION, encode_header_url(url));
        Ok(self)
    }

    /// Redirects to `url` with a `302` status.
    pub fn redirect(&mut self, url: impl Into<String>) -> Result<&mut Self, ResponseError> {
        self.redirect_with(DEFAULT_REDIRECT_STATUS, url)
    }

    /// Redirects to `url` with the given redirect status.
    ///
    /// An invalid status turns the response into an error response right away, whatever is
    /// sent afterwards. `url` is resolved when the response is finalized.
    pub fn redirect_with(&mut self, status: u16, url: impl Into<String>) -> Result<&mut Self, ResponseError> {
        self.ensure_open()?;
        match validate_redirect_status(status) {
            Ok(status) => self.directive = Directive::Redirect { status, url: url.into() },
            Err(e) => self.fail(e),
        }
        Ok(self)
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &ResponseHeaders {
        &self.headers
    }

    pub fn is_base64_encoded(&self) -> bool {
        self.is_base64_encoded
    }

    pub fn state(&self) -> ResponseState {
        self.state
    }

    #[inline]
    pub fn is_emitted(&self) -> bool {
        self.state == ResponseState::Emitted
    }

    /// Records a failure, the response will finalize into an error envelope.
    ///
    /// The first recorded failure wins.
    pub(crate) fn fail(&mut self, error: ResponseError) {
        warn!(cause = %error, "response failed");
        if self.failure.is_none() {
            self.failure = Some(error);
        }
    }

    pub(crate) fn ensure_open(&self) -> Result<(), ResponseError> {
        if self.is_emitted() {
            return Err(ResponseError::FinalizeReused);
        }
        Ok(())
    }

    pub(crate) fn transition(&mut self, state: ResponseState) {
        debug!(from = ?self.state, to = ?state, "response state changed");
        self.state = state;
    }

    pub(crate) fn take_directive(&mut self) -> Directive {
        mem::replace(&mut self.directive, Directive::Send(BodyValue::Empty))
    }

    pub(crate) fn take_failure(&mut self) -> Option<ResponseError> {
        self.failure.take()
    }

    /// Replaces whatever was built so far with a 500 JSON error response.
    pub(crate) fn render_error(&mut self, error: &ResponseError) {
        self.headers.clear();
        self.headers.set(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
        self.status = 500;
        self.is_base64_encoded = false;
        self.body = serde_json::json!({ "error": error.to_string() }).to_string();
    }

    /// Freezes the current state into an envelope and marks the response emitted.
    pub(crate) fn emit(&mut self) -> Envelope {
        self.transition(ResponseState::Emitted);
        Envelope::new(mem::take(&mut self.headers), self.status, mem::take(&mut self.body), self.is_base64_encoded)
    }
}
