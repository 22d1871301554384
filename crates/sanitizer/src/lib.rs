//! Event-producing core of an HTML sanitizer.
//!
//! [`sanitize`] turns untrusted markup into a balanced sequence of decoded
//! [`Policy`] events. The policy decides what to keep and renders it; this crate
//! only guarantees that what it hands over is well-formed: names are canonical,
//! text and attribute values are fully entity-decoded, attribute lists always
//! pair names with values, and every opened element is closed.

pub mod attributes;
pub mod balancer;
pub mod entities;
pub mod entity_names;
pub mod lexer;
pub mod perf_fixtures;
pub mod trie;

mod config;
mod error;
mod names;
mod policy;
mod sanitizer;
mod token;

pub use crate::attributes::{AttributeAccumulator, strip_quotes};
pub use crate::balancer::TagBalancer;
pub use crate::config::SanitizerConfig;
pub use crate::entities::decode;
pub use crate::error::ParseError;
pub use crate::lexer::HtmlLexer;
pub use crate::names::canonical_name;
pub use crate::policy::Policy;
pub use crate::sanitizer::{Sanitizer, sanitize};
pub use crate::token::{Span, Token, TokenKind, TokenSource};
pub use crate::trie::{Trie, TrieError};
