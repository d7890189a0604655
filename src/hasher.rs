//! Source fingerprinting.
//!
//! This module provides the [`SourceHasher`] type used to compute a
//! stable SHA-256 digest of a strings file's raw text. The digest is
//! stamped into parsed trees and embedded in generated key modules so
//! downstream tooling can detect stale output.
//!
//! # Examples
//!
//! ```
//! use kotoba::hasher::SourceHasher;
//!
//! let hash = SourceHasher::hash("[]");
//! assert_eq!(hash.len(), 64);
//! ```

use sha2::{Digest, Sha256};

/// Computes stable digests of raw source text.
pub struct SourceHasher;

impl SourceHasher {
    /// Calculate the lowercase-hex SHA-256 digest of `source`.
    #[must_use]
    pub fn hash(source: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(source.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
