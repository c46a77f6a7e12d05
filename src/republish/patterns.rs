//! Cached regex patterns for classifying image sources.
//!
//! Uses LazyLock to compile patterns once on first use.

use regex_lite::Regex;
use std::sync::LazyLock;

/// Matches `data:image/<fmt>;base64,<data>` anywhere in a `src` value.
pub static DATA_URI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"data:image/(?P<fmt>\S+);base64,(?P<data>\S+)").unwrap()
});

/// Matches `assets/<path>` or `/assets/<path>` at the start of a `src` value.
pub static ASSET_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/?assets/(?P<path>.+)").unwrap());
