//! Redirect policy: status validation, the `Location` header and the HTML fallback body.

use crate::error::ResponseError;
use crate::response::ResponseContext;
use http::header::{CONTENT_TYPE, LOCATION};
use micro_reply_http::codec::{encode_header_url, escape_html};

/// Status used by [`ResponseContext::redirect`].
pub const DEFAULT_REDIRECT_STATUS: u16 = 302;

/// Every status accepted for a redirect, 306 is unassigned.
pub const REDIRECT_STATUSES: [u16; 8] = [300, 301, 302, 303, 304, 305, 307, 308];

pub fn validate_redirect_status(code: u16) -> Result<u16, ResponseError> {
    if REDIRECT_STATUSES.contains(&code) {
        Ok(code)
    } else {
        Err(ResponseError::invalid_redirect_status(code))
    }
}

/// Builds the HTML body sent along with a redirect.
///
/// The URL is entity escaped in both the attribute and the link text.
pub fn redirect_body(status: u16, url: &str) -> String {
    let escaped = escape_html(url);
    format!(r#"<p>{status} Redirecting to <a href="{escaped}">{escaped}</a></p>"#)
}

/// Turns `res` into a redirect to an already resolved `url`.
pub(crate) fn apply(res: &mut ResponseContext, status: u16, url: &str) {
    res.status = status;
    res.headers.set(LOCATION, encode_header_url(url));
    res.headers.set(CONTENT_TYPE, mime::TEXT_HTML.as_ref());
    res.body = redirect_body(status, url);
}
