// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Manifest fingerprints — SHA-256 over the exact bytes written to disk.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of `data` and return it as a lowercase hex string.
///
/// The move journal stores these for the manifests a split read and wrote,
/// which is how a re-run recognises an input it has already split.
pub fn fingerprint(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Whether `data` hashes to `expected_hex` (compared case-insensitively).
pub fn matches_fingerprint(data: &[u8], expected_hex: &str) -> bool {
    fingerprint(data).eq_ignore_ascii_case(expected_hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// SHA-256 of the empty byte slice (well-known constant).
    const EMPTY_SHA256: &str =
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn fingerprint_empty_input() {
        assert_eq!(fingerprint(b""), EMPTY_SHA256);
    }

    #[test]
    fn fingerprint_known_value() {
        // SHA-256("hello") — verified against coreutils sha256sum.
        let expected = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";
        assert_eq!(fingerprint(b"hello"), expected);
    }

    #[test]
    fn matching_fingerprint() {
        let data = br#"{"frames":[]}"#;
        let hex = fingerprint(data);
        assert!(matches_fingerprint(data, &hex));
        assert!(matches_fingerprint(data, &hex.to_ascii_uppercase()));
    }

    #[test]
    fn mismatched_fingerprint() {
        assert!(!matches_fingerprint(b"a", "0000"));
    }
}
