use std::fs;
use std::path::Path;

use base64::{engine::general_purpose, Engine as _};

/// Reads the whole file and returns it as standard, padded base64.
pub fn encode_image(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(general_purpose::STANDARD.encode(bytes))
}

/// Wraps encoded bytes in a data URI. The media type is always JPEG, whatever
/// the source extension.
pub fn image_data_uri(image_b64: &str) -> String {
    format!("data:image/jpeg;base64,{image_b64}")
}
