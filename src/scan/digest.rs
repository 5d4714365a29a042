// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Content digest engine
//!
//! Produces `sha256-<base64>` tokens usable both as an `integrity` attribute
//! value and, single-quoted, as a CSP source expression.

use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::InlineElement;

/// Kind of inline element a digest was computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Script,
    Style,
}

/// A content digest paired with the exact content it was computed over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestRecord {
    /// Self-describing digest token, e.g. `sha256-47DEQpj8...`
    pub digest: String,
    /// The exact content that was hashed
    pub content: String,
    /// Script or style
    pub kind: ElementKind,
}

/// Compute the CSP digest token for a text blob.
///
/// Hashes the exact UTF-8 bytes of `content`. No trimming or normalization:
/// whitespace-different content yields a different token, matching what
/// browsers hash when enforcing `script-src`/`style-src`.
pub fn digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let hash = hasher.finalize();
    format!(
        "sha256-{}",
        base64::engine::general_purpose::STANDARD.encode(hash)
    )
}

/// Digest a batch of scanned inline elements
pub fn digest_elements(elements: &[InlineElement], kind: ElementKind) -> Vec<DigestRecord> {
    elements
        .iter()
        .map(|element| DigestRecord {
            digest: digest(&element.content),
            content: element.content.clone(),
            kind,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_deterministic() {
        let content = "console.log('hello')";
        assert_eq!(digest(content), digest(content));
    }

    #[test]
    fn test_digest_distinct_inputs() {
        assert_ne!(digest("const a = 1;"), digest("const a = 2;"));
        assert_ne!(digest("code"), digest(" code"));
        assert_ne!(digest("code"), digest("code\n"));
    }

    #[test]
    fn test_digest_format() {
        let token = digest("body { margin: 0; }");
        assert!(token.starts_with("sha256-"));
        // 32 raw bytes -> 44 base64 chars
        assert_eq!(token.len(), "sha256-".len() + 44);
    }

    #[test]
    fn test_digest_empty_string() {
        // Known SHA-256 of the empty string
        assert_eq!(
            digest(""),
            "sha256-47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU="
        );
    }

    #[test]
    fn test_digest_known_vector() {
        // echo -n 'alert(1)' | openssl dgst -sha256 -binary | openssl base64
        assert_eq!(
            digest("alert(1)"),
            "sha256-bhHHL3z2vDgxUt0W3dWQOrprscmda2Y5pLsLg4GF+pI="
        );
    }

    #[test]
    fn test_digest_elements_keeps_order() {
        let elements = vec![
            InlineElement {
                content: "const a = 1;".to_string(),
                start: 8,
                end: 20,
            },
            InlineElement {
                content: "const b = 2;".to_string(),
                start: 40,
                end: 52,
            },
        ];

        let records = digest_elements(&elements, ElementKind::Script);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].content, "const a = 1;");
        assert_eq!(records[0].digest, digest("const a = 1;"));
        assert_eq!(records[1].kind, ElementKind::Script);
    }
}
