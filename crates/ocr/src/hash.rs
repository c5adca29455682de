use sha2::{Digest, Sha256};

/// Compute SHA-256 of an in-memory byte slice.
pub fn sha256_bytes(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Content fingerprint of an image body: lowercase hex SHA-256 (64 chars).
/// Used when the remote server does not hand out an ETag.
pub fn content_fingerprint(data: &[u8]) -> String {
    hex::encode(sha256_bytes(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_known_vector() {
        // SHA-256 of empty bytes is a known constant.
        assert_eq!(
            content_fingerprint(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn fingerprint_deterministic() {
        assert_eq!(content_fingerprint(b"hello"), content_fingerprint(b"hello"));
        assert_ne!(content_fingerprint(b"hello"), content_fingerprint(b"world"));
    }

    #[test]
    fn fingerprint_length() {
        assert_eq!(content_fingerprint(b"test").len(), 64);
    }
}
