//! Ed25519 verifying keys.

use kurv::edwards::{AffinePoint, Curve};
use kurv::scalar::Scalar;
use sha2::{Digest, Sha512};

use crate::{Error, Result, Signature, PUBLIC_KEY_LENGTH};

/// Ed25519 public key: a canonical compressed point, bound to a curve
/// context.
#[derive(Clone, Copy)]
pub struct VerifyingKey<'c> {
    curve: &'c Curve,
    bytes: [u8; PUBLIC_KEY_LENGTH],
    point: AffinePoint,
}

impl<'c> VerifyingKey<'c> {
    /// Decode a verifying key from its RFC 8032 encoding; fails on
    /// non-canonical or off-curve values.
    pub fn from_bytes(curve: &'c Curve, bytes: &[u8; PUBLIC_KEY_LENGTH]) -> Result<Self> {
        let point = curve.import_point(bytes).ok_or_else(Error::new)?;
        Ok(VerifyingKey {
            curve,
            bytes: *bytes,
            point,
        })
    }

    pub(crate) fn from_parts(
        curve: &'c Curve,
        bytes: [u8; PUBLIC_KEY_LENGTH],
        point: AffinePoint,
    ) -> Self {
        VerifyingKey {
            curve,
            bytes,
            point,
        }
    }

    /// Borrow the encoded form.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.bytes
    }

    /// Return the encoded form.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.bytes
    }

    /// The curve context this key verifies over.
    pub fn curve(&self) -> &'c Curve {
        self.curve
    }

    /// Strict PureEdDSA verification (RFC 8032 §5.1.7): `S` must be fully
    /// reduced, `R` canonical, and `[S]B = R + [k]A` must hold exactly
    /// (no cofactor multiplication). The comparison is projective, so a
    /// malleated `R` encoding cannot slip through.
    pub fn verify(&self, msg: &[u8], signature: &Signature) -> Result<()> {
        let curve = self.curve;

        let s = Option::<Scalar>::from(curve.scalar_from_le_bytes(signature.s_bytes()))
            .ok_or_else(Error::new)?;
        let big_r = curve.import_point(signature.r_bytes()).ok_or_else(Error::new)?;

        // k = H(R || A || M) mod n
        let mut h = Sha512::new();
        h.update(signature.r_bytes());
        h.update(self.bytes);
        h.update(msg);
        let k = curve.scalar_reduce_wide_le(&h.finalize());

        // [S]B - [k]A == R
        let q = curve.mul_double_var(&s, &curve.affine_neg(&self.point), &k);
        if bool::from(curve.equal(&q, &curve.to_extended(&big_r))) {
            Ok(())
        } else {
            Err(Error::new())
        }
    }
}

impl PartialEq for VerifyingKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for VerifyingKey<'_> {}

impl core::fmt::Debug for VerifyingKey<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "VerifyingKey({:02x?})", &self.bytes)
    }
}
