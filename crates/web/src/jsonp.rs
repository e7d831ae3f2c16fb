//! JSONP body wrapping.

use crate::request::RequestContext;
use micro_reply_http::protocol::BodyValue;

/// Callback name used when the request names none.
pub const DEFAULT_CALLBACK: &str = "callback";

/// Picks the callback name from the request query.
///
/// `params` are tried in order, the first one with a non empty value in the query wins.
pub fn callback_name<'a, S: AsRef<str>>(req: &'a RequestContext, params: &[S]) -> &'a str {
    params
        .iter()
        .find_map(|param| req.query(param.as_ref()).filter(|name| !name.is_empty()))
        .unwrap_or(DEFAULT_CALLBACK)
}

/// Replaces every character outside `[A-Za-z0-9_$]` with `_`.
///
/// A name made only of replaced characters becomes a run of `_`, still a valid identifier.
pub fn sanitize_callback(name: &str) -> String {
    name.chars().map(|ch| if ch.is_ascii_alphanumeric() || ch == '_' || ch == '$' { ch } else { '_' }).collect()
}

/// Wraps the JSON form of `value` in a call to `callback`.
pub fn wrap(callback: &str, value: BodyValue) -> String {
    format!("{}({})", sanitize_callback(callback), value.into_json())
}
