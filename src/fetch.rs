//! Downloading images for use in a notebook.

use std::io::Read;

use image::DynamicImage;

use crate::error::Result;

/// Largest response body read when fetching an image.
pub const MAX_IMAGE_BYTES: u64 = 64 * 1024 * 1024;

/// Fetch `url` and decode the response body as an image.
pub fn url_image(url: &str) -> Result<DynamicImage> {
    let bytes = fetch_bytes(url)?;
    decode_image(&bytes)
}

/// GET `url` and return its body, up to [`MAX_IMAGE_BYTES`].
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    log::debug!("Fetching {url}");
    let response = ureq::get(url).call().map_err(Box::new)?;

    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(MAX_IMAGE_BYTES)
        .read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Decode image bytes, guessing the format from their content.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}
