use vos_types::ContentHash;

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag that is prepended to every hash
/// computation, so a body and a credential with identical bytes never
/// produce the same digest.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for object bodies (the etag of a stored version).
    pub const BODY: Self = Self {
        domain: "vos-body-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> ContentHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        ContentHash::from_hash(*hasher.finalize().as_bytes())
    }

    /// Verify that data produces the expected hash.
    pub fn verify(&self, data: &[u8], expected: &ContentHash) -> bool {
        self.hash(data) == *expected
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let data = b"{\"name\":\"John\"}";
        assert_eq!(ContentHasher::BODY.hash(data), ContentHasher::BODY.hash(data));
    }

    #[test]
    fn different_domains_produce_different_hashes() {
        let data = b"same content";
        let custom = ContentHasher::new("vos-test-v1");
        assert_ne!(ContentHasher::BODY.hash(data), custom.hash(data));
    }

    #[test]
    fn verify_correct_data() {
        let id = ContentHasher::BODY.hash(b"test data");
        assert!(ContentHasher::BODY.verify(b"test data", &id));
    }

    #[test]
    fn verify_detects_single_bit_flip() {
        let id = ContentHasher::BODY.hash(b"original");
        assert!(!ContentHasher::BODY.verify(b"originam", &id));
    }

    #[test]
    fn empty_body_has_a_hash() {
        let id = ContentHasher::BODY.hash(b"");
        assert!(ContentHasher::BODY.verify(b"", &id));
        assert_eq!(ContentHasher::BODY.domain(), "vos-body-v1");
    }
}
