//! Image source classification and content-derived filenames.

use std::path::{Component, Path};

use base64::Engine;
use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use sha2::{Digest, Sha256};

use super::patterns::{ASSET_PATH_RE, DATA_URI_RE};
use super::{HASH_PREFIX_LEN, IMG_PREFIX};
use crate::error::{Error, Result};

/// What an `<img src>` value refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource<'a> {
    /// Base64 payload embedded in a data URI.
    Inline { format: &'a str, payload: &'a str },
    /// File under the `assets/` folder next to the input HTML.
    Asset { path: &'a str },
    /// Anything else; left as is.
    Unrecognized,
}

impl<'a> ImageSource<'a> {
    /// Classify a `src` attribute value.
    ///
    /// Data URIs take precedence over asset paths.
    pub fn classify(src: &'a str) -> Self {
        if let Some(caps) = DATA_URI_RE.captures(src)
            && let (Some(format), Some(payload)) = (caps.name("fmt"), caps.name("data"))
        {
            return ImageSource::Inline {
                format: format.as_str(),
                payload: payload.as_str(),
            };
        }

        if let Some(path) = ASSET_PATH_RE.captures(src).and_then(|c| c.name("path")) {
            return ImageSource::Asset {
                path: path.as_str(),
            };
        }

        ImageSource::Unrecognized
    }
}

/// Standard base64 that tolerates non-zero bits in the last symbol, as
/// notebook exporters occasionally produce.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Reject asset paths that would resolve outside the folder they are
/// joined onto (absolute paths, `..`, drive prefixes).
pub fn check_asset_path(path: &str) -> Result<()> {
    let mut normal = false;
    for component in Path::new(path).components() {
        match component {
            Component::Normal(_) => normal = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(Error::UnsafeAssetPath(path.to_string()));
            }
        }
    }
    if normal {
        Ok(())
    } else {
        Err(Error::UnsafeAssetPath(path.to_string()))
    }
}

/// Filename for an inline image: prefix, truncated SHA-256 of the payload
/// text, then the declared format as extension.
pub fn inline_filename(format: &str, payload: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(payload.as_bytes()));
    format!("{IMG_PREFIX}{}.{format}", &digest[..HASH_PREFIX_LEN])
}

/// An inline image extracted from the document, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub filename: String,
    pub data: Vec<u8>,
}

impl InlineImage {
    /// Decode a data-URI payload.
    pub fn decode(format: &str, payload: &str) -> Result<Self> {
        let filename = inline_filename(format, payload);
        let data = PAYLOAD_ENGINE
            .decode(payload)
            .map_err(|source| Error::InvalidPayload {
                filename: filename.clone(),
                source,
            })?;

        if !crate::util::format_matches(format, &data) {
            log::warn!(
                "{filename}: payload does not look like image/{format} ({})",
                crate::util::sniff_image_format(&data).unwrap_or("unknown")
            );
        }

        Ok(Self { filename, data })
    }
}
