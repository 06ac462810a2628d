// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Inline image encoding (base64 data URIs).

use crate::error::AppError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

/// Assumed type of a bare base64 payload without a data URI header.
const DEFAULT_MIME: &str = "image/jpeg";

/// Encode raw image bytes as `data:<mime>;base64,<payload>`.
pub fn encode_data_uri(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

/// Normalize a stored inline image to a data URI.
pub fn to_data_uri(inline: &str) -> String {
    let inline = inline.trim();
    if inline.starts_with("data:") {
        inline.to_string()
    } else {
        format!("data:{};base64,{}", DEFAULT_MIME, inline)
    }
}

/// Split a data URI into its MIME type and decoded bytes.
pub fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>), AppError> {
    let uri = to_data_uri(uri);
    let (header, payload) = uri
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .ok_or_else(|| AppError::Validation("Malformed image data.".to_string()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| AppError::Validation("Image data must be base64 encoded.".to_string()))?;
    let bytes = BASE64
        .decode(payload)
        .map_err(|_| AppError::Validation("Malformed image data.".to_string()))?;
    Ok((mime.to_string(), bytes))
}

/// Whether a string is a remote image URL.
pub fn is_remote_url(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_then_decode() {
        let uri = encode_data_uri(&[0xFF, 0xD8, 0xFF], "image/png");
        assert_eq!(uri, "data:image/png;base64,/9j/");
        let (mime, bytes) = decode_data_uri(&uri).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, vec![0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_bare_payload_gets_default_header() {
        assert_eq!(to_data_uri("/9j/"), "data:image/jpeg;base64,/9j/");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(decode_data_uri("data:image/png;base64,@@@").is_err());
        assert!(decode_data_uri("data:image/png,plain").is_err());
    }
}
