//! Ed25519 signatures.
//!
//! Edwards Digital Signature Algorithm (EdDSA) over Curve25519 as
//! specified in RFC 8032: <https://tools.ietf.org/html/rfc8032>
//!
//! PureEdDSA only (no prehash variant). Verification is strict: the
//! signature's `S` must be fully reduced, `R` and the public key must be
//! canonical encodings, and the group equation `[S]B = R + [k]A` is
//! checked without cofactor multiplication, using projective equality.
//!
//! ```
//! use kurv::edwards::{Curve, ED25519};
//! use kurv_ed25519::SigningKey;
//!
//! let curve = Curve::new(&ED25519);
//! let key = SigningKey::from_bytes(&curve, &[0x42; 32]);
//! let signature = key.sign(b"message");
//! key.verifying_key().verify(b"message", &signature).unwrap();
//! ```

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod signing;
mod verifying;

pub use crate::signing::SigningKey;
pub use crate::verifying::VerifyingKey;

// Re-export the Edwards curve context this crate signs over.
pub use kurv::{self, edwards::Curve};

// Re-export the `signature` crate (and select types).
pub use signature::{self, Error, Result};

use core::fmt::{self, Debug};

/// Length of an Ed25519 signature in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Length of an Ed25519 public key in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Length of an Ed25519 secret key seed in bytes.
pub const SECRET_KEY_LENGTH: usize = 32;

/// Size of a single component of an Ed25519 signature.
const COMPONENT_SIZE: usize = SIGNATURE_LENGTH / 2;

/// Ed25519 signature: the encoded point `R` followed by the little-endian
/// scalar `s`.
///
/// Parsing performs no validation; the range and canonicality rules are
/// enforced by [`VerifyingKey::verify`].
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Signature {
    r: [u8; COMPONENT_SIZE],
    s: [u8; COMPONENT_SIZE],
}

impl Signature {
    /// Parse an Ed25519 signature from a byte array.
    pub fn from_bytes(bytes: &[u8; SIGNATURE_LENGTH]) -> Self {
        let mut r = [0u8; COMPONENT_SIZE];
        let mut s = [0u8; COMPONENT_SIZE];
        r.copy_from_slice(&bytes[..COMPONENT_SIZE]);
        s.copy_from_slice(&bytes[COMPONENT_SIZE..]);
        Signature { r, s }
    }

    /// Parse an Ed25519 signature from a byte slice.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        <&[u8; SIGNATURE_LENGTH]>::try_from(bytes)
            .map(Self::from_bytes)
            .map_err(|_| Error::new())
    }

    /// Bytes for the `R` component of a signature.
    pub fn r_bytes(&self) -> &[u8; COMPONENT_SIZE] {
        &self.r
    }

    /// Bytes for the `s` component of a signature.
    pub fn s_bytes(&self) -> &[u8; COMPONENT_SIZE] {
        &self.s
    }

    /// Return the inner byte array.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut out = [0u8; SIGNATURE_LENGTH];
        out[..COMPONENT_SIZE].copy_from_slice(&self.r);
        out[COMPONENT_SIZE..].copy_from_slice(&self.s);
        out
    }
}

impl From<[u8; SIGNATURE_LENGTH]> for Signature {
    fn from(bytes: [u8; SIGNATURE_LENGTH]) -> Signature {
        Signature::from_bytes(&bytes)
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_slice(bytes)
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature(R: {:02x?}, s: {:02x?})", &self.r, &self.s)
    }
}
