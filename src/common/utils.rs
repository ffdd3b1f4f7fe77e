//! Utility functions for mkv

use percent_encoding::{percent_decode_str, percent_encode, AsciiSet, CONTROLS};

/// Bytes that must be escaped when a raw key is put back into a URL path.
/// `/` stays literal so keys read like paths.
const KEY_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'%')
    .add(b'?')
    .add(b'#')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Turn the (percent-encoded) URL path of a request into the raw key bytes.
///
/// No UTF-8 validation is done; `%ff` yields the byte `0xff`.
pub fn key_from_path(path: &str) -> Vec<u8> {
    percent_decode_str(path).collect()
}

/// Encode raw key bytes for use as a URL path. Non-ASCII bytes are escaped.
pub fn key_to_path(key: &[u8]) -> String {
    let encoded = percent_encode(key, KEY_ENCODE_SET).to_string();
    if encoded.starts_with('/') {
        encoded
    } else {
        format!("/{}", encoded)
    }
}

/// Printable form of a key for logs and error messages.
pub fn display_key(key: &[u8]) -> String {
    key.escape_ascii().to_string()
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_idx])
}
