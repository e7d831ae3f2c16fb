//! Request side information a response may depend on.
//!
//! This module contains:
//! - `Event`: the incoming proxy event as delivered by the outer dispatcher
//! - `RequestContext`: the read-only view handlers and the finalizer work with

use http::Method;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::warn;

/// An API-Gateway style proxy event.
///
/// Only the fields a response can depend on are kept. Missing fields fall back to their
/// defaults, so a partially filled event still deserializes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    pub http_method: String,
    pub path: String,
    pub query_string_parameters: Option<HashMap<String, String>>,
    /// Used when `queryStringParameters` is absent.
    pub raw_query_string: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    pub body: Option<serde_json::Value>,
    pub is_base64_encoded: bool,
}

/// Represents the request a response is being built for.
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    path: String,
    query: HashMap<String, String>,
    headers: HashMap<String, String>,
    body: Option<serde_json::Value>,
}

impl RequestContext {
    /// Creates a new RequestContext with no query parameters, headers or body
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: HashMap::new(), headers: HashMap::new(), body: None }
    }

    /// Adds a query parameter, keeping the first value seen for a name
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.entry(name.into()).or_insert_with(|| value.into());
        self
    }

    /// Adds a request header, names are matched case-insensitively
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Returns the HTTP method of the request
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the value of a query parameter
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Returns all query parameters
    pub fn query_params(&self) -> &HashMap<String, String> {
        &self.query
    }

    /// Returns the value of a request header
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Returns the request body, if any
    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }
}

impl From<Event> for RequestContext {
    fn from(event: Event) -> Self {
        let method = Method::from_bytes(event.http_method.to_ascii_uppercase().as_bytes()).unwrap_or_else(|e| {
            warn!(method = %event.http_method, cause = %e, "invalid http method, fallback to GET");
            Method::GET
        });

        let query = match (event.query_string_parameters, event.raw_query_string) {
            (Some(params), _) => params,
            (None, Some(raw)) => parse_raw_query(&raw),
            (None, None) => HashMap::new(),
        };

        let headers = event
            .headers
            .unwrap_or_default()
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .collect();

        Self { method, path: event.path, query, headers, body: event.body }
    }
}

fn parse_raw_query(raw: &str) -> HashMap<String, String> {
    match serde_urlencoded::from_str::<Vec<(String, String)>>(raw.trim_start_matches('?')) {
        Ok(pairs) => {
            let mut query = HashMap::with_capacity(pairs.len());
            for (name, value) in pairs {
                query.entry(name).or_insert(value);
            }
            query
        }
        Err(e) => {
            warn!(query = raw, cause = %e, "unable to parse raw query string");
            HashMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_event() {
        let event: Event = serde_json::from_value(json!({
            "httpMethod": "get",
            "path": "/testJSONPResponse",
            "body": {},
            "headers": { "Content-Type": "application/json" },
            "queryStringParameters": { "callback": "foo" }
        }))
        .unwrap();

        let req = RequestContext::from(event);
        assert_eq!(req.method(), &Method::GET);
        assert_eq!(req.path(), "/testJSONPResponse");
        assert_eq!(req.query("callback"), Some("foo"));
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(req.body(), Some(&json!({})));
    }

    #[test]
    fn raw_query_string_is_parsed() {
        let event = Event {
            http_method: "POST".into(),
            raw_query_string: Some("cb=bar&cb=baz&callback=foo%20bar".into()),
            ..Event::default()
        };

        let req = RequestContext::from(event);
        assert_eq!(req.method(), &Method::POST);
        assert_eq!(req.query("cb"), Some("bar"));
        assert_eq!(req.query("callback"), Some("foo bar"));
    }

    #[test]
    fn structured_query_wins_over_raw() {
        let event = Event {
            query_string_parameters: Some(HashMap::from([("a".to_string(), "1".to_string())])),
            raw_query_string: Some("a=2".into()),
            ..Event::default()
        };

        assert_eq!(RequestContext::from(event).query("a"), Some("1"));
    }

    #[test]
    fn empty_method_falls_back_to_get() {
        let req = RequestContext::from(Event::default());
        assert_eq!(req.method(), &Method::GET);
        assert!(req.query_params().is_empty());
    }

    #[test]
    fn builder_style() {
        let req = RequestContext::new(Method::GET, "/").with_query("callback", "a").with_query("callback", "b").with_header("X-Id", "1");
        assert_eq!(req.query("callback"), Some("a"));
        assert_eq!(req.header("x-id"), Some("1"));
    }
}
