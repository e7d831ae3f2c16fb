//! Response envelope primitives for request/response style handlers
//!
//! This crate provides the low level building blocks used to turn whatever a handler produced
//! into a normalized, wire-ready response envelope:
//!
//! ```text
//! {
//!   headers: { <lowercase-name>: <string>, ... },
//!   statusCode: <integer>,
//!   body: <string>,
//!   isBase64Encoded: <boolean>
//! }
//! ```
//!
//! It has no notion of routing, handlers or asynchronous resolution; those live in the
//! `micro-reply` crate which is built on top of this one.
//!
//! # Example
//!
//! ```
//! use micro_reply_http::protocol::{BodyValue, Envelope, ResponseHeaders};
//! use serde_json::json;
//!
//! let serialized = BodyValue::from(json!({ "object": true })).serialize();
//!
//! let mut headers = ResponseHeaders::new();
//! headers.apply_default("Content-Type", serialized.content_type.as_ref());
//!
//! let envelope = Envelope::new(headers, 200, serialized.body, false);
//! assert_eq!(envelope.body(), r#"{"object":true}"#);
//! assert_eq!(envelope.headers().get("content-type"), Some("application/json"));
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: the envelope, the case-insensitive header bag, the body serializer and
//!   status code validation
//! - [`codec`]: the two escaping routines applied to generated markup and header values
//!
//! # Error Handling
//!
//! - [`protocol::StatusError`]: a status code outside the canonical range
//! - [`protocol::EnvelopeError`]: an envelope that cannot become an `http::Response`

pub mod codec;
pub mod protocol;
