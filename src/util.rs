//! Byte-level helpers shared by the republisher.

use std::borrow::Cow;

/// Decode bytes to a string.
///
/// Tries UTF-8 first (a BOM is handled by encoding_rs), then falls back to
/// Windows-1252, which older exports sometimes use. Uses `Cow<str>` to avoid
/// allocation when the input is valid UTF-8.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Guess an image's data-URI format tag from its leading bytes.
///
/// Returns tags as they appear after `image/` in a data URI (`png`, `jpeg`,
/// ...), or `None` when the bytes are not a recognized raster or SVG image.
pub fn sniff_image_format(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(&[0x89, b'P', b'N', b'G']) {
        return Some("png");
    }
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("jpeg");
    }
    if data.starts_with(b"GIF8") {
        return Some("gif");
    }
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return Some("webp");
    }

    let head = &data[..data.len().min(256)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start();
    if head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg")) {
        return Some("svg+xml");
    }

    None
}

/// Whether a declared data-URI format agrees with the sniffed one.
///
/// `jpg` is accepted for `jpeg`; unknown payloads always agree.
pub fn format_matches(declared: &str, data: &[u8]) -> bool {
    let Some(sniffed) = sniff_image_format(data) else {
        return true;
    };
    let declared = declared.to_ascii_lowercase();
    match declared.as_str() {
        "jpg" => sniffed == "jpeg",
        "svg" => sniffed == "svg+xml",
        other => other == sniffed,
    }
}
