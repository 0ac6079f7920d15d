//! ECDSA verifying: checking signatures are authentic using a
//! [`VerifyingKey`], and recovering keys from recoverable signatures.

use kurv::subtle::ConstantTimeEq;
use kurv::wei::{AffinePoint, Curve, EncodedPoint};

use crate::{Error, RecoveryId, Result, Signature};

/// ECDSA public key used for verifying signatures, bound to a curve
/// context.
///
/// Always a validated, non-infinity point on the curve.
#[derive(Clone, Copy)]
pub struct VerifyingKey<'c> {
    curve: &'c Curve,
    point: AffinePoint,
}

impl<'c> VerifyingKey<'c> {
    /// Initialize a [`VerifyingKey`] from a SEC1-encoded point
    /// (compressed or uncompressed); the point at infinity is rejected.
    pub fn from_sec1_bytes(curve: &'c Curve, bytes: &[u8]) -> Result<Self> {
        let point = curve.import_point(bytes).ok_or_else(Error::new)?;
        if bool::from(point.is_identity()) {
            return Err(Error::new());
        }
        Ok(VerifyingKey { curve, point })
    }

    /// Initialize a [`VerifyingKey`] from an affine point already known to
    /// be valid (used by key generation and recovery).
    pub(crate) fn from_affine_unchecked(curve: &'c Curve, point: AffinePoint) -> Self {
        VerifyingKey { curve, point }
    }

    /// Serialize this key as a SEC1 [`EncodedPoint`].
    pub fn to_sec1_bytes(&self, compress: bool) -> EncodedPoint {
        self.curve.export_point(&self.point, compress)
    }

    /// Borrow the inner affine point.
    pub fn as_affine(&self) -> &AffinePoint {
        &self.point
    }

    /// The curve context this key verifies over.
    pub fn curve(&self) -> &'c Curve {
        self.curve
    }

    /// Verify the signature against the given message prehash.
    ///
    /// Accepts both low-S and high-S signatures; callers enforcing
    /// malleability rules apply [`Signature::normalize_s`] themselves.
    pub fn verify_prehash(&self, prehash: &[u8], signature: &Signature) -> Result<()> {
        let curve = self.curve;
        let sc = curve.scalar_field();

        // Signature construction guarantees r, s in [1, n-1].
        let z = sc.reduce_bytes(prehash);
        let s_inv = sc.invert(&signature.s);
        let u1 = sc.mul(&z, &s_inv);
        let u2 = sc.mul(&signature.r, &s_inv);

        let big_r = curve.mul_double_var(&u1, &self.point, &u2);
        if bool::from(curve.is_identity(&big_r)) {
            return Err(Error::new());
        }

        let (x, _) = curve.x_mod_n(&curve.to_affine(&big_r));
        if bool::from(x.ct_eq(&signature.r)) {
            Ok(())
        } else {
            Err(Error::new())
        }
    }

    /// Recover a [`VerifyingKey`] from the given message prehash, the
    /// signature over it, and a [`RecoveryId`].
    pub fn recover_from_prehash(
        curve: &'c Curve,
        prehash: &[u8],
        signature: &Signature,
        recovery_id: RecoveryId,
    ) -> Result<Self> {
        let sc = curve.scalar_field();

        let big_r = curve
            .point_from_r(
                &signature.r,
                recovery_id.is_x_reduced(),
                recovery_id.is_y_odd(),
            )
            .ok_or_else(Error::new)?;

        // Q = r^-1 (s R - z G)
        let z = sc.reduce_bytes(prehash);
        let r_inv = sc.invert(&signature.r);
        let u1 = sc.neg(&sc.mul(&r_inv, &z));
        let u2 = sc.mul(&r_inv, &signature.s);

        let q = curve.mul_double_var(&u1, &big_r, &u2);
        if bool::from(curve.is_identity(&q)) {
            return Err(Error::new());
        }
        Ok(VerifyingKey {
            curve,
            point: curve.to_affine(&q),
        })
    }

    /// Reconstruct `r` candidates for all recovery IDs and return the one
    /// matching this key, if any.
    pub fn trial_recovery_from_prehash(
        &self,
        prehash: &[u8],
        signature: &Signature,
    ) -> Result<RecoveryId> {
        for byte in 0..=RecoveryId::MAX {
            let recovery_id = RecoveryId::try_from(byte)?;
            if let Ok(vk) =
                Self::recover_from_prehash(self.curve, prehash, signature, recovery_id)
            {
                if &vk == self {
                    return Ok(recovery_id);
                }
            }
        }
        Err(Error::new())
    }
}

impl PartialEq for VerifyingKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.curve.affine_equal(&self.point, &other.point))
    }
}

impl Eq for VerifyingKey<'_> {}

impl core::fmt::Debug for VerifyingKey<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "VerifyingKey<{}>({:02x?})",
            self.curve.id(),
            self.to_sec1_bytes(true).as_ref()
        )
    }
}
