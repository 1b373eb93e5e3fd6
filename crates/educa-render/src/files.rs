//! Saving generated images.

use std::path::Path;

use educa_genai::ImageDataUri;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{RenderError, Result};

#[allow(clippy::expect_used)]
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Suggested download name for a mold: `molde-<description>.png`, with each
/// run of whitespace replaced by a single `-`.
///
/// Path separators become `-` too, so the name is always a single path
/// component.
#[must_use]
pub fn mold_file_name(description: &str) -> String {
    let slug = WHITESPACE_RUN
        .replace_all(description, "-")
        .replace(['/', '\\'], "-");
    format!("molde-{slug}.png")
}

/// Decodes `image` and writes the raw bytes to `path`.
///
/// # Errors
///
/// Returns [`RenderError::InvalidImage`] if the payload is not valid base64,
/// or [`RenderError::Io`] if the file cannot be written.
pub fn write_image(image: &ImageDataUri, path: &Path) -> Result<()> {
    let bytes = image
        .decode_bytes()
        .map_err(|e| RenderError::InvalidImage(e.to_string()))?;
    std::fs::write(path, bytes)?;
    Ok(())
}
