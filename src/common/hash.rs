//! Hashing utilities for mkv
//!
//! - MD5 bucket prefix + base64 key for on-volume paths
//! - HRW (Highest Random Weight) scores for volume placement
//!
//! MD5 is used for placement and layout only, never for integrity. It keeps
//! paths byte-compatible with volumes written by existing deployments.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use md5::{Digest, Md5};

/// Derive the path a key lives under on whichever volume holds it.
///
/// Returns `/aa/bb/<base64(key)>` where `aa` and `bb` are the first two bytes
/// of MD5(key) in lowercase hex, bounding each volume to 256x256 buckets.
pub fn derive_path(key: &[u8]) -> String {
    let digest = Md5::digest(key);
    format!(
        "/{:02x}/{:02x}/{}",
        digest[0],
        digest[1],
        STANDARD.encode(key)
    )
}

/// Recover the key from a derived path (the segment after the bucket prefix).
pub fn decode_path(path: &str) -> Option<Vec<u8>> {
    let mut parts = path.strip_prefix('/')?.splitn(3, '/');
    let aa = parts.next()?;
    let bb = parts.next()?;
    let encoded = parts.next()?;
    if aa.len() != 2 || bb.len() != 2 {
        return None;
    }
    STANDARD.decode(encoded).ok()
}

/// HRW weight of `node` for `key`: MD5(node ‖ key) as a big-endian integer.
pub fn hrw_score(node: &str, key: &[u8]) -> u128 {
    let mut hasher = Md5::new();
    hasher.update(node.as_bytes());
    hasher.update(key);
    u128::from_be_bytes(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_lower_hex_byte(s: &str) -> bool {
        s.len() == 2
            && s
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    }

    #[test]
    fn test_derive_path_known_vectors() {
        assert_eq!(derive_path(b"/abc"), "/48/2a/L2FiYw==");
        assert_eq!(derive_path(b"hello"), "/5d/41/aGVsbG8=");
        assert_eq!(derive_path(&[0x00, 0xff, 0x10]), "/48/1e/AP8Q");
    }

    #[test]
    fn test_derive_path_empty_key() {
        assert_eq!(derive_path(b""), "/d4/1d/");
    }

    #[test]
    fn test_derive_path_deterministic() {
        let key = b"/photos/2024/cat.jpg";
        assert_eq!(derive_path(key), derive_path(key));
    }

    #[test]
    fn test_derive_path_shape() {
        for i in 0..500u32 {
            let key: Vec<u8> = (0..(i % 40)).map(|j| (i * 31 + j * 7) as u8).collect();
            let path = derive_path(&key);
            let mut parts = path[1..].splitn(3, '/');
            assert!(is_lower_hex_byte(parts.next().unwrap()));
            assert!(is_lower_hex_byte(parts.next().unwrap()));
            assert_eq!(STANDARD.decode(parts.next().unwrap()).unwrap(), key);
        }
    }

    #[test]
    fn test_decode_path_roundtrip() {
        let key = b"/a/b c?d";
        assert_eq!(decode_path(&derive_path(key)).unwrap(), key);
        assert!(decode_path("/zz/L2FiYw==").is_none());
        assert!(decode_path("no-leading-slash").is_none());
        assert!(decode_path("/ab/cd/!!!").is_none());
    }

    #[test]
    fn test_hrw_score_known_vectors() {
        assert_eq!(
            hrw_score("v1", b"/abc"),
            0x505c37b1ad409c677eeef7968bac937d
        );
        assert_eq!(
            hrw_score("v2", b"/abc"),
            0x3fc655d38e89516207db4a6c1d860e2d
        );
    }
}
