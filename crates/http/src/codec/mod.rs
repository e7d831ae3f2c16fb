//! Escaping codecs for generated responses
//!
//! A redirect renders the same raw URL twice inside one response, once per context, and each
//! context gets its own codec:
//!
//! - [`encode_header_url`]: minimal, structure preserving percent-encoding for a URL placed
//!   into a header value such as `Location`
//! - [`escape_html`]: full entity escaping for text interpolated into generated markup
//!
//! # Example
//!
//! ```
//! use micro_reply_http::codec::{encode_header_url, escape_html};
//!
//! let url = "http://x?a=1&b=<2>";
//! assert_eq!(encode_header_url(url), "http://x?a=1&b=%3C2%3E");
//! assert_eq!(escape_html(url), "http://x?a=1&amp;b=&lt;2&gt;");
//! ```

mod html;
mod url;

pub use html::escape_html;
pub use url::encode_header_url;
