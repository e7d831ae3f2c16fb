//! The finalized response envelope.
//!
//! An [`Envelope`] is what a finalized response freezes into. It serializes to the wire
//! shape consumed by the outer dispatcher:
//!
//! ```text
//! { "headers": {..}, "statusCode": 200, "body": "..", "isBase64Encoded": false }
//! ```

use crate::protocol::{EnvelopeError, ResponseHeaders, validate_status};
use http::{HeaderName, HeaderValue, Response};
use serde::Serialize;
use tracing::error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    headers: ResponseHeaders,
    status_code: u16,
    body: String,
    is_base64_encoded: bool,
}

impl Envelope {
    pub fn new(headers: ResponseHeaders, status_code: u16, body: String, is_base64_encoded: bool) -> Self {
        Self { headers, status_code, body, is_base64_encoded }
    }

    pub fn headers(&self) -> &ResponseHeaders {
        &self.headers
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_base64_encoded(&self) -> bool {
        self.is_base64_encoded
    }

    pub fn into_parts(self) -> (ResponseHeaders, u16, String, bool) {
        (self.headers, self.status_code, self.body, self.is_base64_encoded)
    }

    /// Serializes the envelope to its JSON wire form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Converts an envelope into an `http::Response`, validating every header.
///
/// The body is kept as is; a base64 encoded body stays encoded.
impl TryFrom<Envelope> for Response<String> {
    type Error = EnvelopeError;

    fn try_from(envelope: Envelope) -> Result<Self, Self::Error> {
        let (envelope_headers, status_code, body, _is_base64_encoded) = envelope.into_parts();
        let status = validate_status(status_code)?;

        let mut builder = Response::builder().status(status);
        if let Some(headers) = builder.headers_mut() {
            headers.reserve(envelope_headers.len());
            for (name, value) in envelope_headers.iter() {
                let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                    error!(header = name, cause = %e, "invalid header name");
                    EnvelopeError::invalid_header_name(name)
                })?;
                let header_value = HeaderValue::from_str(value).map_err(|e| {
                    error!(header = name, cause = %e, "invalid header value");
                    EnvelopeError::invalid_header_value(name)
                })?;
                headers.insert(header_name, header_value);
            }
        }

        Ok(builder.body(body)?)
    }
}
