//! An async response serialization engine for serverless style HTTP handlers.
//!
//! A handler receives a [`RequestContext`] and records what the response should be on a
//! [`ResponseContext`]: headers, a status, a plain body, a JSONP body or a redirect. The
//! [`Finalizer`] turns that into an [`Envelope`](micro_reply_http::protocol::Envelope)
//! exactly once, awaiting an external [`UrlResolver`](resolver::UrlResolver) when a redirect
//! targets a storage reference such as `s3://bucket/key`.
//!
//! [`Api`] ties the pieces together:
//!
//! ```no_run
//! use micro_reply::{handler_fn, Api, Event};
//!
//! # async fn run(event: Event) -> Result<(), micro_reply::ResponseError> {
//! let api = Api::builder().version("v1.0").build();
//! let handler = handler_fn(|_req, res| {
//!     res.redirect("http://www.github.com")?;
//!     Ok(())
//! });
//!
//! let envelope = api.handle(event, &handler).await?;
//! assert_eq!(envelope.status_code(), 302);
//! # Ok(())
//! # }
//! ```

mod api;
mod content_type;
mod error;
mod finalizer;
mod handler;
mod request;
mod response;

pub mod jsonp;
pub mod redirect;
pub mod resolver;

pub use api::Api;
pub use api::ApiBuilder;
pub use api::ApiOptions;
pub use error::BoxError;
pub use error::ResolveError;
pub use error::ResponseError;
pub use finalizer::Finalizer;
pub use handler::FnHandler;
pub use handler::ResponseHandler;
pub use handler::handler_fn;
pub use request::Event;
pub use request::RequestContext;
pub use response::ResponseContext;
pub use response::ResponseState;
