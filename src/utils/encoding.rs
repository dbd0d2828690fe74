use base64::{engine::general_purpose, DecodeError, Engine as _};

/// Decodes a client-supplied base64 image payload. A `data:...;base64,`
/// header is stripped if present, and missing padding is corrected by
/// right-padding with `=` before decoding.
pub fn decode_base64_image(input: &str) -> Result<Vec<u8>, DecodeError> {
    let payload = if input.starts_with("data:") {
        input.split_once(',').map(|(_, rest)| rest).unwrap_or(input)
    } else {
        input
    };

    let mut normalized = payload.trim().to_string();
    let missing_padding = normalized.len() % 4;
    if missing_padding != 0 {
        normalized.push_str(&"=".repeat(4 - missing_padding));
    }

    general_purpose::STANDARD.decode(normalized)
}

pub fn encode_base64(data: &[u8]) -> String {
    general_purpose::STANDARD.encode(data)
}
