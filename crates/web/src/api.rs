//! The API entry point.
//!
//! [`Api`] runs a handler for an incoming [`Event`] and finalizes what it produced:
//!
//! ```no_run
//! use micro_reply::{handler_fn, Api, Event};
//!
//! # async fn run(event: Event) {
//! let api = Api::builder().version("v1.0").callback("cb").build();
//! let handler = handler_fn(|_req, res| {
//!     res.jsonp(serde_json::json!({ "foo": "bar" }))?;
//!     Ok(())
//! });
//!
//! api.run(event, &handler, |outcome| match outcome {
//!     Ok(envelope) => println!("{}", envelope.body()),
//!     Err(e) => eprintln!("{e}"),
//! })
//! .await;
//! # }
//! ```

use crate::error::ResponseError;
use crate::finalizer::Finalizer;
use crate::handler::ResponseHandler;
use crate::jsonp::DEFAULT_CALLBACK;
use crate::request::{Event, RequestContext};
use crate::resolver::{PassthroughResolver, UrlResolver};
use crate::response::ResponseContext;
use micro_reply_http::protocol::Envelope;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use tracing::{Instrument, info_span, warn};

/// Options an [`Api`] is configured with.
///
/// ```
/// use micro_reply::ApiOptions;
///
/// let options: ApiOptions = serde_json::from_str(r#"{ "version": "v1.0", "callback": "cb" }"#).unwrap();
/// assert_eq!(options.callback_params(), vec!["cb".to_string(), "callback".to_string()]);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiOptions {
    /// Informational version of the API, attached to the request span.
    pub version: Option<String>,
    /// Alternate query parameter a JSONP callback name is read from.
    pub callback: Option<String>,
}

impl ApiOptions {
    /// Query parameters looked up for a JSONP callback: the configured alternate first,
    /// then `callback`.
    pub fn callback_params(&self) -> Vec<String> {
        let mut params = Vec::with_capacity(2);
        if let Some(callback) = self.callback.as_deref().filter(|callback| *callback != DEFAULT_CALLBACK) {
            params.push(callback.to_owned());
        }
        params.push(DEFAULT_CALLBACK.to_owned());
        params
    }
}

pub struct ApiBuilder {
    options: ApiOptions,
    resolver: Option<Arc<dyn UrlResolver>>,
}

impl fmt::Debug for ApiBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiBuilder").field("options", &self.options).finish_non_exhaustive()
    }
}

impl ApiBuilder {
    fn new() -> Self {
        Self { options: ApiOptions::default(), resolver: None }
    }

    pub fn options(mut self, options: ApiOptions) -> Self {
        self.options = options;
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.options.version = Some(version.into());
        self
    }

    pub fn callback(mut self, callback: impl Into<String>) -> Self {
        self.options.callback = Some(callback.into());
        self
    }

    pub fn resolver(mut self, resolver: impl UrlResolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    pub fn build(self) -> Api {
        let resolver = self.resolver.unwrap_or_else(|| Arc::new(PassthroughResolver));
        let finalizer = Finalizer::new(resolver).callback_params(self.options.callback_params());
        Api { options: self.options, finalizer }
    }
}

#[derive(Debug)]
pub struct Api {
    options: ApiOptions,
    finalizer: Finalizer,
}

impl Api {
    pub fn builder() -> ApiBuilder {
        ApiBuilder::new()
    }

    pub fn options(&self) -> &ApiOptions {
        &self.options
    }

    /// Runs `handler` for `event` and finalizes the response.
    ///
    /// A handler error is turned into a 500 error envelope.
    pub async fn handle(&self, event: Event, handler: &dyn ResponseHandler) -> Result<Envelope, ResponseError> {
        let req = RequestContext::from(event);
        let span = info_span!(
            "request",
            version = self.options.version.as_deref().unwrap_or("-"),
            method = %req.method(),
            path = req.path()
        );

        async {
            let mut res = ResponseContext::new();
            if let Err(e) = handler.handle(&req, &mut res) {
                warn!(cause = %e, "handler failed");
                res.fail(ResponseError::handler(e));
            }
            self.finalizer.finalize(&mut res, &req).await
        }
        .instrument(span)
        .await
    }

    /// Runs `handler` for `event` and hands the outcome to the completion `callback`.
    ///
    /// The callback fires exactly once, after any pending resolution completed and the
    /// envelope is fully assembled.
    pub async fn run<F>(&self, event: Event, handler: &dyn ResponseHandler, callback: F)
    where
        F: FnOnce(Result<Envelope, ResponseError>),
    {
        let outcome = self.handle(event, handler).await;
        callback(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::handler::handler_fn;
    use crate::resolver::{MockUrlSigner, SignOperation, SignedUrlParams, StorageUrlResolver};
    use mockall::predicate::eq;
    use serde_json::{Value, json};

    fn api() -> Api {
        Api::builder().version("v1.0").build()
    }

    fn event(query: Option<Value>) -> Event {
        let mut event = json!({
            "httpMethod": "get",
            "path": "/test",
            "body": {},
            "headers": { "Content-Type": "application/json" }
        });
        if let Some(query) = query {
            event["queryStringParameters"] = query;
        }
        serde_json::from_value(event).unwrap()
    }

    async fn call<F>(api: &Api, event: Event, f: F) -> Value
    where
        F: Fn(&RequestContext, &mut ResponseContext) -> Result<(), BoxError> + Send + Sync,
    {
        let handler = handler_fn(f);
        let mut result = None;
        api.run(event, &handler, |outcome| result = Some(outcome)).await;
        let envelope = result.expect("callback must be invoked").unwrap();
        serde_json::to_value(&envelope).unwrap()
    }

    fn envelope(headers: Value, status: u16, body: &str) -> Value {
        json!({ "headers": headers, "statusCode": status, "body": body, "isBase64Encoded": false })
    }

    #[tokio::test]
    async fn object_response() {
        let result = call(&api(), event(None), |_req, res| {
            res.send(json!({ "object": true }))?;
            Ok(())
        })
        .await;
        assert_eq!(result, envelope(json!({ "content-type": "application/json" }), 200, r#"{"object":true}"#));
    }

    #[tokio::test]
    async fn number_response() {
        let result = call(&api(), event(None), |_req, res| {
            res.send(123)?;
            Ok(())
        })
        .await;
        assert_eq!(result, envelope(json!({ "content-type": "application/json" }), 200, "123"));
    }

    #[tokio::test]
    async fn array_response() {
        let result = call(&api(), event(None), |_req, res| {
            res.send(json!([1, 2, 3]))?;
            Ok(())
        })
        .await;
        assert_eq!(result, envelope(json!({ "content-type": "application/json" }), 200, "[1,2,3]"));
    }

    #[tokio::test]
    async fn string_response() {
        let result = call(&api(), event(None), |_req, res| {
            res.send("this is a string")?;
            Ok(())
        })
        .await;
        assert_eq!(result, envelope(json!({ "content-type": "application/json" }), 200, "this is a string"));
    }

    #[tokio::test]
    async fn empty_response() {
        let result = call(&api(), event(None), |_req, res| {
            res.send(())?;
            Ok(())
        })
        .await;
        assert_eq!(result, envelope(json!({ "content-type": "application/json" }), 200, ""));
    }

    #[tokio::test]
    async fn jsonp_default_callback() {
        let result = call(&api(), event(None), |_req, res| {
            res.jsonp(json!({ "foo": "bar" }))?;
            Ok(())
        })
        .await;
        assert_eq!(result, envelope(json!({ "content-type": "application/json" }), 200, r#"callback({"foo":"bar"})"#));
    }

    #[tokio::test]
    async fn jsonp_callback_param() {
        let result = call(&api(), event(Some(json!({ "callback": "foo" }))), |_req, res| {
            res.jsonp(json!({ "foo": "bar" }))?;
            Ok(())
        })
        .await;
        assert_eq!(result, envelope(json!({ "content-type": "application/json" }), 200, r#"foo({"foo":"bar"})"#));
    }

    #[tokio::test]
    async fn jsonp_configured_cb_param() {
        let api = Api::builder().version("v1.0").callback("cb").build();
        let result = call(&api, event(Some(json!({ "cb": "bar" }))), |_req, res| {
            res.jsonp(json!({ "foo": "bar" }))?;
            Ok(())
        })
        .await;
        assert_eq!(result, envelope(json!({ "content-type": "application/json" }), 200, r#"bar({"foo":"bar"})"#));
    }

    #[tokio::test]
    async fn jsonp_callback_with_spaces() {
        let result = call(&api(), event(Some(json!({ "callback": "foo bar" }))), |_req, res| {
            res.jsonp(json!({ "foo": "bar" }))?;
            Ok(())
        })
        .await;
        assert_eq!(result, envelope(json!({ "content-type": "application/json" }), 200, r#"foo_bar({"foo":"bar"})"#));
    }

    #[tokio::test]
    async fn jsonp_empty_callback_uses_default() {
        let result = call(&api(), event(Some(json!({ "callback": "" }))), |_req, res| {
            res.jsonp(json!({ "foo": "bar" }))?;
            Ok(())
        })
        .await;
        assert_eq!(result, envelope(json!({ "content-type": "application/json" }), 200, r#"callback({"foo":"bar"})"#));
    }

    #[tokio::test]
    async fn location() {
        let result = call(&api(), event(None), |_req, res| {
            res.location("http://www.github.com")?.html("Location header set")?;
            Ok(())
        })
        .await;
        assert_eq!(
            result,
            envelope(json!({ "location": "http://www.github.com", "content-type": "text/html" }), 200, "Location header set")
        );
    }

    #[tokio::test]
    async fn location_encodes_url() {
        let result = call(&api(), event(None), |_req, res| {
            res.location("http://www.github.com?foo=bar with space")?.html("Location header set")?;
            Ok(())
        })
        .await;
        assert_eq!(
            result,
            envelope(
                json!({ "location": "http://www.github.com?foo=bar%20with%20space", "content-type": "text/html" }),
                200,
                "Location header set"
            )
        );
    }

    #[tokio::test]
    async fn redirect_default_302() {
        let result = call(&api(), event(None), |_req, res| {
            res.redirect("http://www.github.com")?;
            Ok(())
        })
        .await;
        assert_eq!(
            result,
            envelope(
                json!({ "location": "http://www.github.com", "content-type": "text/html" }),
                302,
                r#"<p>302 Redirecting to <a href="http://www.github.com">http://www.github.com</a></p>"#
            )
        );
    }

    #[tokio::test]
    async fn redirect_301() {
        let result = call(&api(), event(None), |_req, res| {
            res.redirect_with(301, "http://www.github.com")?;
            Ok(())
        })
        .await;
        assert_eq!(
            result,
            envelope(
                json!({ "location": "http://www.github.com", "content-type": "text/html" }),
                301,
                r#"<p>301 Redirecting to <a href="http://www.github.com">http://www.github.com</a></p>"#
            )
        );
    }

    #[tokio::test]
    async fn redirect_invalid_code() {
        let result = call(&api(), event(None), |_req, res| {
            res.redirect_with(310, "http://www.github.com")?;
            Ok(())
        })
        .await;
        assert_eq!(
            result,
            envelope(json!({ "content-type": "application/json" }), 500, r#"{"error":"310 is an invalid redirect status code"}"#)
        );
    }

    #[tokio::test]
    async fn invalid_redirect_is_not_overridden_by_send() {
        let result = call(&api(), event(None), |_req, res| {
            res.redirect_with(310, "http://x")?;
            res.send("ok")?;
            Ok(())
        })
        .await;
        assert_eq!(
            result,
            envelope(json!({ "content-type": "application/json" }), 500, r#"{"error":"310 is an invalid redirect status code"}"#)
        );
    }

    #[tokio::test]
    async fn redirect_escapes_html() {
        let result = call(&api(), event(None), |_req, res| {
            res.redirect("http://www.github.com?foo=bar&bat=baz<script>alert('not good')</script>")?;
            Ok(())
        })
        .await;
        assert_eq!(
            result,
            envelope(
                json!({
                    "location": "http://www.github.com?foo=bar&bat=baz%3Cscript%3Ealert('not%20good')%3C/script%3E",
                    "content-type": "text/html"
                }),
                302,
                "<p>302 Redirecting to <a href=\"http://www.github.com?foo=bar&amp;bat=baz&lt;script&gt;alert(&#39;not good&#39;)&lt;/script&gt;\">http://www.github.com?foo=bar&amp;bat=baz&lt;script&gt;alert(&#39;not good&#39;)&lt;/script&gt;</a></p>"
            )
        );
    }

    #[tokio::test]
    async fn storage_path() {
        let signed =
            "https://s3.amazonaws.com/my-test-bucket/test/test.txt?AWSAccessKeyId=AKXYZ&Expires=1534290845&Signature=XYZ";
        let mut signer = MockUrlSigner::new();
        signer
            .expect_signed_url()
            .with(
                eq(SignOperation::GetObject),
                eq(SignedUrlParams { bucket: "my-test-bucket".into(), key: "test/test.txt".into(), expires: 900 }),
            )
            .times(1)
            .returning(move |_, _| Ok(signed.to_string()));

        let api = Api::builder().version("v1.0").resolver(StorageUrlResolver::new(signer)).build();
        let result = call(&api, event(None), |_req, res| {
            res.redirect("s3://my-test-bucket/test/test.txt")?;
            Ok(())
        })
        .await;
        assert_eq!(
            result,
            envelope(
                json!({ "location": signed, "content-type": "text/html" }),
                302,
                "<p>302 Redirecting to <a href=\"https://s3.amazonaws.com/my-test-bucket/test/test.txt?AWSAccessKeyId=AKXYZ&amp;Expires=1534290845&amp;Signature=XYZ\">https://s3.amazonaws.com/my-test-bucket/test/test.txt?AWSAccessKeyId=AKXYZ&amp;Expires=1534290845&amp;Signature=XYZ</a></p>"
            )
        );
    }

    #[tokio::test]
    async fn handler_error() {
        let result = call(&api(), event(None), |_req, res| {
            res.header("X-Partial", "1")?;
            Err("something went wrong".into())
        })
        .await;
        assert_eq!(result, envelope(json!({ "content-type": "application/json" }), 500, r#"{"error":"something went wrong"}"#));
    }

    #[test]
    fn callback_params_order() {
        assert_eq!(ApiOptions::default().callback_params(), vec!["callback".to_string()]);

        let options = ApiOptions { callback: Some("cb".into()), ..ApiOptions::default() };
        assert_eq!(options.callback_params(), vec!["cb".to_string(), "callback".to_string()]);

        let options = ApiOptions { callback: Some("callback".into()), ..ApiOptions::default() };
        assert_eq!(options.callback_params(), vec!["callback".to_string()]);
    }
}
