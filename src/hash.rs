//! Hashing utilities for the policy equality engine.

use crate::canonicalization::canonical_hash;
use crate::error::Result;
use crate::types::Constraint;
use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of data and returns hex string.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Computes SHA-256 hash of a string.
pub fn sha256_str(s: &str) -> String {
    sha256_hex(s.as_bytes())
}

/// Computes the content digest of a constraint tree.
///
/// The digest is the SHA-256 of the tree's canonical JSON form, so it
/// depends only on the values the constraint holds, never on the order its
/// serialization happened to use. The comparator breaks ties between
/// multiplicity constraints of the same kind with this digest.
pub fn constraint_digest(constraint: &Constraint) -> Result<String> {
    let value = serde_json::to_value(constraint)?;
    canonical_hash(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Expression, Operator};

    fn atomic(left: &str, right: &str) -> Constraint {
        Constraint::atomic(
            Expression::literal(left),
            Operator::Eq,
            Expression::literal(right),
        )
    }

    #[test]
    fn test_sha256() {
        let hash = sha256_str("hello");
        assert_eq!(hash.len(), 64); // SHA-256 is 32 bytes = 64 hex chars
    }

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_str(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_constraint_digest_is_deterministic() {
        let one = constraint_digest(&atomic("Membership", "active")).unwrap();
        let two = constraint_digest(&atomic("Membership", "active")).unwrap();
        assert_eq!(one, two);
        assert_eq!(one.len(), 64);
        assert!(one.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_constraint_digest_differs_per_content() {
        let one = constraint_digest(&atomic("Membership", "active")).unwrap();
        let two = constraint_digest(&atomic("Membership", "expired")).unwrap();
        assert_ne!(one, two);
    }

    #[test]
    fn test_constraint_digest_sees_child_order() {
        // The digest hashes the tree as given. Reordered children are a
        // different tree; making them equal is the canonicalizer's job,
        // not the hash's.
        let one = constraint_digest(&Constraint::and(vec![
            atomic("a", "1"),
            atomic("b", "2"),
        ]))
        .unwrap();
        let two = constraint_digest(&Constraint::and(vec![
            atomic("b", "2"),
            atomic("a", "1"),
        ]))
        .unwrap();
        assert_ne!(one, two);
    }
}
