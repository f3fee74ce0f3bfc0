//! Output content hash.
//!
//! Buffers are hashed by their decimal rendering: every byte is written in
//! base 10 with no separator, and the resulting text is hashed with SHA-256.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the concatenated decimal digits of `bytes`.
///
/// # Examples
///
/// ```
/// use benchmarks::hash::content_hash;
///
/// // Same digest as hashing the text "1210"
/// assert_eq!(content_hash(&[1, 210]), content_hash(&[12, 10]));
/// ```
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    let mut digits = itoa::Buffer::new();
    for &byte in bytes {
        hasher.update(digits.format(byte).as_bytes());
    }
    format!("{:x}", hasher.finalize())
}
