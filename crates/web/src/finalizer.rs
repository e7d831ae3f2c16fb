//! Response finalization.
//!
//! Finalizing freezes a [`ResponseContext`] into an [`Envelope`]:
//!
//! 1. await the pending URL resolution, if the response redirects to a reference that needs one
//! 2. run the active directive (plain body, JSONP or redirect) to produce the body and headers
//! 3. apply the default `application/json` content type when none was set
//! 4. assemble `{headers, statusCode, body, isBase64Encoded}` and mark the response emitted
//!
//! Data dependent failures are converted into a 500 JSON envelope here. Finalizing the same
//! response twice is the only error surfaced to the caller.

use crate::error::{ResolveError, ResponseError};
use crate::jsonp;
use crate::redirect;
use crate::request::RequestContext;
use crate::resolver::{PassthroughResolver, UrlResolver};
use crate::response::{Directive, ResponseContext, ResponseState};
use http::header::CONTENT_TYPE;
use micro_reply_http::protocol::Envelope;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, warn};

pub struct Finalizer {
    resolver: Arc<dyn UrlResolver>,
    callback_params: Vec<String>,
}

impl fmt::Debug for Finalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Finalizer").field("callback_params", &self.callback_params).finish_non_exhaustive()
    }
}

impl Default for Finalizer {
    fn default() -> Self {
        Self::new(Arc::new(PassthroughResolver))
    }
}

impl Finalizer {
    pub fn new(resolver: Arc<dyn UrlResolver>) -> Self {
        Self { resolver, callback_params: vec![jsonp::DEFAULT_CALLBACK.to_owned()] }
    }

    /// Sets the query parameters a JSONP callback name is looked up under, in order.
    pub fn callback_params(mut self, params: Vec<String>) -> Self {
        self.callback_params = params;
        self
    }

    /// Finalizes `res` into an envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError::FinalizeReused`] when `res` was already finalized. Every
    /// other failure is turned into a 500 envelope.
    pub async fn finalize(&self, res: &mut ResponseContext, req: &RequestContext) -> Result<Envelope, ResponseError> {
        if let Err(e) = res.ensure_open() {
            error!(path = req.path(), "response finalized more than once");
            return Err(e);
        }

        let directive = res.take_directive();
        let outcome = match res.take_failure() {
            Some(failure) => Err(failure),
            None => self.render(res, directive, req).await,
        };

        if let Err(e) = outcome {
            if !e.is_recoverable() {
                error!(path = req.path(), cause = %e, "response can not be recovered");
                return Err(e);
            }
            warn!(path = req.path(), cause = %e, "sending error response");
            res.render_error(&e);
        }

        res.headers.apply_default(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
        let envelope = res.emit();
        debug!(status = envelope.status_code(), "response emitted");
        Ok(envelope)
    }

    /// Finalizes `res` and hands the outcome to `callback`, exactly once.
    pub async fn finalize_with<F>(&self, res: &mut ResponseContext, req: &RequestContext, callback: F)
    where
        F: FnOnce(Result<Envelope, ResponseError>),
    {
        let outcome = self.finalize(res, req).await;
        callback(outcome);
    }

    async fn render(
        &self,
        res: &mut ResponseContext,
        directive: Directive,
        req: &RequestContext,
    ) -> Result<(), ResponseError> {
        match directive {
            Directive::Send(value) => {
                debug!(empty = value.is_empty(), "serializing body");
                let serialized = value.serialize();
                res.headers.apply_default(CONTENT_TYPE, serialized.content_type.as_ref());
                res.body = serialized.body;
            }
            Directive::Jsonp(value) => {
                let callback = jsonp::callback_name(req, self.callback_params.as_slice());
                debug!(callback, "wrapping jsonp body");
                res.body = jsonp::wrap(callback, value);
            }
            Directive::Redirect { status, url } => {
                let status = redirect::validate_redirect_status(status)?;
                let url = self.resolve_target(res, url).await?;
                redirect::apply(res, status, &url);
            }
        }

        res.transition(ResponseState::Serialized);
        Ok(())
    }

    async fn resolve_target(&self, res: &mut ResponseContext, url: String) -> Result<String, ResolveError> {
        if !self.resolver.needs_resolution(&url) {
            return Ok(url);
        }

        res.transition(ResponseState::Resolving);
        debug!(url = %url, "awaiting external url resolution");
        self.resolver.resolve(&url).await
    }
}
