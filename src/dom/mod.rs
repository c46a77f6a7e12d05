//! HTML document tree.
//!
//! html5ever parses into an arena ([`Dom`]) which can then be reshaped in
//! place and written back out with [`to_pretty_html`].

mod arena;
mod serialize;
mod tree_sink;

pub use arena::{Attribute, Dom, Node, NodeData, NodeId};
pub use serialize::{to_html, to_pretty_html};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use tree_sink::DomSink;

/// Parse an HTML document.
///
/// Parsing never fails: malformed markup is repaired the way browsers do,
/// and missing `html`, `head` and `body` elements are synthesized.
pub fn parse_html(html: &str) -> Dom {
    parse_document(DomSink::new(), ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}
