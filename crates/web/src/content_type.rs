//! Content type lookup for the `content_type` response operation.

use http::HeaderValue;
use mime::Mime;
use once_cell::sync::Lazy;
use std::collections::HashMap;

static SHORTHANDS: Lazy<HashMap<&'static str, Mime>> = Lazy::new(|| {
    HashMap::from([
        ("json", mime::APPLICATION_JSON),
        ("html", mime::TEXT_HTML),
        ("htm", mime::TEXT_HTML),
        ("txt", mime::TEXT_PLAIN),
        ("text", mime::TEXT_PLAIN),
        ("css", mime::TEXT_CSS),
        ("js", mime::APPLICATION_JAVASCRIPT),
        ("xml", mime::TEXT_XML),
        ("csv", mime::TEXT_CSV),
        ("png", mime::IMAGE_PNG),
        ("jpg", mime::IMAGE_JPEG),
        ("jpeg", mime::IMAGE_JPEG),
        ("gif", mime::IMAGE_GIF),
        ("svg", mime::IMAGE_SVG),
        ("pdf", mime::APPLICATION_PDF),
        ("bin", mime::APPLICATION_OCTET_STREAM),
        ("form", mime::APPLICATION_WWW_FORM_URLENCODED),
    ])
});

/// Resolves `kind` into a content type value.
///
/// A value that already looks like a mime type (it contains a `/`) is used as is once it
/// parses as a mime type and is a valid header value, otherwise it is looked up as a file
/// extension, with or without a leading dot. Unknown extensions and malformed mime types
/// yield `None`.
pub(crate) fn lookup(kind: &str) -> Option<String> {
    if kind.contains('/') {
        let valid = kind.parse::<Mime>().is_ok() && HeaderValue::from_str(kind).is_ok();
        return valid.then(|| kind.to_owned());
    }
    let extension = kind.trim_start_matches('.').to_ascii_lowercase();
    SHORTHANDS.get(extension.as_str()).map(|mime| mime.as_ref().to_owned())
}
