//! Content fingerprinting

use crate::error::RevError;
use crate::file::Contents;
use crate::types::{Fingerprint, FINGERPRINT_LEN};
use md5::{Digest, Md5};

/// Compute the fingerprint of `content`: MD5 digest, lowercase hex, first 32 chars.
///
/// Empty content is valid and fingerprints deterministically.
pub fn fingerprint(content: impl AsRef<[u8]>) -> Fingerprint {
    let mut hasher = Md5::new();
    hasher.update(content.as_ref());
    let mut hex = hex::encode(hasher.finalize());
    hex.truncate(FINGERPRINT_LEN);
    hex
}

/// Fingerprint file contents. Only buffered contents can be hashed.
pub fn fingerprint_contents(contents: &Contents) -> Result<Fingerprint, RevError> {
    match contents {
        Contents::Buffer(bytes) => Ok(fingerprint(bytes)),
        Contents::Null => Err(RevError::InvalidInput(
            "Expected buffered contents, got null".to_string(),
        )),
        Contents::Stream(_) => Err(RevError::InvalidInput(
            "Expected buffered contents, got a stream".to_string(),
        )),
    }
}
