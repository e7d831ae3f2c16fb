use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters that may not appear raw in a URL carried by a header value.
///
/// Everything URI-structural (`?`, `&`, `=`, `:`, `/`, `#`, ...) is left alone. Non ascii
/// characters are always encoded as their UTF-8 bytes.
const HEADER_URL: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`').add(b'{').add(b'}');

/// Percent-encodes the characters of `url` that are unsafe in a header value.
///
/// Existing escape sequences such as `%20` are kept, a `%` that does not start one is
/// encoded as `%25`.
pub fn encode_header_url(url: &str) -> String {
    let mut encoded = String::with_capacity(url.len());
    let mut start = 0;

    for (index, _) in url.match_indices('%') {
        encoded.extend(utf8_percent_encode(&url[start..index], HEADER_URL));
        if is_escape_sequence(&url.as_bytes()[index + 1..]) {
            encoded.push('%');
        } else {
            encoded.push_str("%25");
        }
        start = index + 1;
    }

    encoded.extend(utf8_percent_encode(&url[start..], HEADER_URL));
    encoded
}

#[inline]
fn is_escape_sequence(rest: &[u8]) -> bool {
    matches!(rest, [high, low, ..] if high.is_ascii_hexdigit() && low.is_ascii_hexdigit())
}
