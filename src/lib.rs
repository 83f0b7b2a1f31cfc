//! URL parsing and serialization per the WHATWG URL Standard.
//!
//! The whole pipeline is implemented here: the state-machine parser, host
//! parsing (IPv6 literals, opaque hosts, registrable domains through IDNA
//! ToASCII with punycode), and set-parameterized percent encoding.
//!
//! ```
//! let url = wurl::Url::parse("https://example.com/foo", None).unwrap();
//! assert_eq!(url.scheme(), "https");
//! assert_eq!(url.to_string(), "https://example.com/foo");
//! ```
//!
//! Parsing never panics and never raises on bad input; [`parse`] returns a
//! [`ParseOutcome`] value carrying either the URL (possibly with
//! accumulated validation warnings) or the diagnostic list of a failure.

mod character_sets;
mod checkers;
mod error;
mod host;
mod host_parser;
mod ipv4;
mod ipv6;
mod parser;
mod path;
mod pointer;
mod scheme;
mod unicode;
mod url;

pub use error::{ParseError, Severity, ValidationError};
pub use host::{Host, IpAddress};
pub use parser::{parse, parse_with_base};
pub use path::UrlPath;
pub use url::{ParseOutcome, Url};
