// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Opaque reference to an encrypted value held by the arithmetic backend. A handle never carries
/// plaintext; whoever holds one still needs a grant in the [`crate::AccessControlLedger`] before
/// the decryption service will open it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Handle([u8; 32]);

impl Handle {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive a handle by hashing the given parts in order. Each part is length prefixed so that
    /// `["ab", "c"]` and `["a", "bc"]` never collide.
    pub fn digest<'a>(parts: impl IntoIterator<Item = &'a [u8]>) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update((part.len() as u64).to_le_bytes());
            hasher.update(part);
        }
        Self(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ct:{}", &hex::encode(self.0)[0..10])
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_deterministic() {
        let a = Handle::digest([b"add".as_slice(), b"x", b"y"]);
        let b = Handle::digest([b"add".as_slice(), b"x", b"y"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_digest_is_length_prefixed() {
        let a = Handle::digest([b"ab".as_slice(), b"c"]);
        let b = Handle::digest([b"a".as_slice(), b"bc"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_is_short() {
        let handle = Handle::new([0xab; 32]);
        assert_eq!(handle.to_string(), "ct:ababababab");
    }
}
