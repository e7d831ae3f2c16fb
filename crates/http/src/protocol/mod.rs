//! Response envelope abstractions.
//!
//! This module provides the types a response is assembled from before it is emitted:
//!
//! - **Headers** ([`header`]): [`ResponseHeaders`], an ordered header bag keyed by
//!   case-insensitive names, emitted lower-cased
//! - **Body** ([`body`]): [`BodyValue`], the closed set of body shapes, and its serializer
//! - **Status** ([`status`]): validation against the canonical HTTP range
//! - **Envelope** ([`envelope`]): [`Envelope`], the finalized `{headers, statusCode, body,
//!   isBase64Encoded}` record
//! - **Errors** ([`error`]): [`StatusError`] and [`EnvelopeError`]

mod header;
pub use header::HeaderKey;
pub use header::ResponseHeaders;

mod body;
pub use body::BodyValue;
pub use body::Scalar;
pub use body::SerializedBody;

mod status;
pub use status::DEFAULT_STATUS;
pub use status::STATUS_RANGE;
pub use status::reason_phrase;
pub use status::validate_status;

mod envelope;
pub use envelope::Envelope;

mod error;
pub use error::EnvelopeError;
pub use error::StatusError;
