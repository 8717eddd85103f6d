//! Location fingerprinting.

use sha2::{Digest, Sha256};

/// Produces the deterministic digest of an interpolated path, used as the
/// result cache key.
///
/// Two navigations with an identical interpolated path must collide (that is
/// the cache hit); two distinct paths must not collide in practice.
pub trait Fingerprint {
    /// Digest `path` into a cache key.
    #[must_use]
    fn digest(&self, path: &str) -> String;
}

/// The default [`Fingerprint`], a hex-encoded SHA-256 of the path.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Fingerprint;

impl Fingerprint for Sha256Fingerprint {
    fn digest(&self, path: &str) -> String {
        use std::fmt::Write;

        let hash = Sha256::digest(path.as_bytes());
        let mut out = String::with_capacity(hash.len() * 2);
        for byte in hash {
            write!(out, "{byte:02x}").unwrap();
        }
        out
    }
}
