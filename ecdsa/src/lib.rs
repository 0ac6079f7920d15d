//! Elliptic Curve Digital Signature Algorithm (ECDSA) over the `kurv`
//! short Weierstrass curves.
//!
//! Signatures are fixed-width `r ‖ s` byte strings (no ASN.1 framing);
//! signing is deterministic per RFC 6979 with the curve's associated
//! digest driving the HMAC-DRBG, always emits low-S signatures, and
//! returns a [`RecoveryId`] from which [`VerifyingKey::recover_from_prehash`]
//! reconstructs the public key.
//!
//! Keys are bound to a [`Curve`] context:
//!
//! ```
//! use kurv::wei::{Curve, P256};
//! use kurv_ecdsa::SigningKey;
//!
//! let curve = Curve::new(&P256);
//! let key = SigningKey::from_bytes(&curve, &[0x17; 32]).unwrap();
//! let prehash = [0xab; 32]; // SHA-256 output of the message
//! let (signature, recovery_id) = key.sign_prehash(&prehash).unwrap();
//! key.verifying_key().verify_prehash(&prehash, &signature).unwrap();
//! # let _ = recovery_id;
//! ```

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod recovery;
mod rfc6979;
mod signing;
mod verifying;

pub use crate::recovery::RecoveryId;
pub use crate::rfc6979::NonceGenerator;
pub use crate::signing::SigningKey;
pub use crate::verifying::VerifyingKey;

// Re-export the curve contexts this crate signs over.
pub use kurv::{self, wei::Curve};

// Re-export the `signature` crate (and select types).
pub use signature::{self, Error, Result};

use kurv::scalar::Scalar;
use kurv::MAX_BYTES;

/// Upper bound on deterministic nonce attempts before signing reports
/// failure. RFC 6979 rejection needs one try in practice; the cap exists
/// so the loop provably terminates.
pub const MAX_NONCE_RETRIES: usize = 256;

/// An ECDSA signature: the scalar pair `(r, s)`, both in `[1, n-1]`.
///
/// Serialized as the two fixed-width big-endian scalars concatenated, so a
/// P-256 signature is 64 bytes and a P-521 signature 132 bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    pub(crate) r: Scalar,
    pub(crate) s: Scalar,
}

/// A serialized signature; the live prefix is twice the curve's scalar
/// width.
#[derive(Clone, Copy)]
pub struct SignatureBytes {
    bytes: [u8; 2 * MAX_BYTES],
    len: usize,
}

impl AsRef<[u8]> for SignatureBytes {
    fn as_ref(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl core::fmt::Debug for SignatureBytes {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SignatureBytes({:02x?})", self.as_ref())
    }
}

impl PartialEq for SignatureBytes {
    fn eq(&self, other: &Self) -> bool {
        self.as_ref() == other.as_ref()
    }
}

impl Eq for SignatureBytes {}

impl Signature {
    /// Parses the fixed-width `r ‖ s` form, rejecting zero or out-of-range
    /// components.
    pub fn from_bytes(curve: &Curve, bytes: &[u8]) -> Result<Self> {
        let sc = curve.scalar_field();
        let size = sc.size();
        if bytes.len() != 2 * size {
            return Err(Error::new());
        }
        let r = Option::<Scalar>::from(sc.import(&bytes[..size])).ok_or_else(Error::new)?;
        let s = Option::<Scalar>::from(sc.import(&bytes[size..])).ok_or_else(Error::new)?;
        if bool::from(sc.is_zero(&r)) || bool::from(sc.is_zero(&s)) {
            return Err(Error::new());
        }
        Ok(Signature { r, s })
    }

    /// Serializes the fixed-width `r ‖ s` form.
    pub fn to_bytes(&self, curve: &Curve) -> SignatureBytes {
        let sc = curve.scalar_field();
        let size = sc.size();
        let mut out = SignatureBytes {
            bytes: [0; 2 * MAX_BYTES],
            len: 2 * size,
        };
        sc.export(&self.r, &mut out.bytes[..size]);
        sc.export(&self.s, &mut out.bytes[size..2 * size]);
        out
    }

    /// The `r` component.
    pub fn r(&self) -> &Scalar {
        &self.r
    }

    /// The `s` component.
    pub fn s(&self) -> &Scalar {
        &self.s
    }

    /// Normalizes into low-S form, returning `Some` when the signature was
    /// high. Signatures produced by [`SigningKey::sign_prehash`] are
    /// already normalized.
    pub fn normalize_s(&self, curve: &Curve) -> Option<Self> {
        let sc = curve.scalar_field();
        let (s, was_high) = sc.minimize(&self.s);
        bool::from(was_high).then_some(Signature { r: self.r, s })
    }
}
