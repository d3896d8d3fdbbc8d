use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Decode a base64 image, accepting an optional `data:image/...;base64,` prefix.
pub fn decode_base64_image(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let payload = match encoded.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(";base64,")
            .map(|(_, data)| data)
            .unwrap_or(rest),
        None => encoded,
    };
    STANDARD.decode(payload.trim())
}

/// Detect an image MIME type from its leading bytes.
pub fn sniff_image_type(data: &[u8]) -> Option<&'static str> {
    match data {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some("image/png"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        [b'B', b'M', ..] => Some("image/bmp"),
        _ => None,
    }
}

/// MIME type for an object: sniffed from content, else guessed from the key's extension.
pub fn content_type_for(data: &[u8], key: &str) -> String {
    sniff_image_type(data)
        .map(str::to_string)
        .unwrap_or_else(|| {
            mime_guess::from_path(key)
                .first_or_octet_stream()
                .to_string()
        })
}
