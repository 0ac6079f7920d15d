//! ECDSA signing: producing signatures using a [`SigningKey`].

use hmac::digest::{core_api::BlockSizeUser, Digest, FixedOutputReset};
use kurv::rand_core::CryptoRngCore;
use kurv::scalar::{Scalar, ScalarBytes};
use kurv::wei::{AffinePoint, Curve, NonceDigest};
use kurv::zeroize::{Zeroize, Zeroizing};
use sha2::{Sha256, Sha384, Sha512};

use crate::rfc6979::NonceGenerator;
use crate::{Error, RecoveryId, Result, Signature, VerifyingKey, MAX_NONCE_RETRIES};

/// ECDSA secret key used for signing, bound to a curve context.
///
/// The secret scalar is a nonzero element of the curve's scalar field; it
/// is wiped on drop.
#[derive(Clone)]
pub struct SigningKey<'c> {
    curve: &'c Curve,
    secret: Scalar,
    /// Verifying key which corresponds to this signing key.
    public: AffinePoint,
}

impl<'c> SigningKey<'c> {
    /// Generate a cryptographically random [`SigningKey`].
    pub fn random(curve: &'c Curve, rng: &mut (impl CryptoRngCore + ?Sized)) -> Self {
        let secret = curve.scalar_field().random(rng);
        let public = curve.to_affine(&curve.mul_g(&secret));
        SigningKey {
            curve,
            secret,
            public,
        }
    }

    /// Initialize a signing key from a big-endian scalar in `[1, n-1]`.
    pub fn from_bytes(curve: &'c Curve, bytes: &[u8]) -> Result<Self> {
        let sc = curve.scalar_field();
        let secret = Option::<Scalar>::from(sc.import(bytes)).ok_or_else(Error::new)?;
        if bool::from(sc.is_zero(&secret)) {
            return Err(Error::new());
        }
        let public = curve.to_affine(&curve.mul_g(&secret));
        Ok(SigningKey {
            curve,
            secret,
            public,
        })
    }

    /// Serialize this [`SigningKey`] as a fixed-width big-endian scalar.
    ///
    /// # ⚠️ Warning
    ///
    /// This value is key material.
    pub fn to_bytes(&self) -> ScalarBytes {
        self.curve.scalar_field().to_bytes(&self.secret)
    }

    /// The curve context this key signs over.
    pub fn curve(&self) -> &'c Curve {
        self.curve
    }

    /// Get the [`VerifyingKey`] which corresponds to this [`SigningKey`].
    pub fn verifying_key(&self) -> VerifyingKey<'c> {
        VerifyingKey::from_affine_unchecked(self.curve, self.public)
    }

    /// Sign the given message prehash (any length; truncated to the curve
    /// width per SEC1), returning the low-S signature and the recovery ID.
    ///
    /// The ephemeral scalar is derived deterministically per RFC 6979 from
    /// the secret key and the reduced message, using the curve's
    /// associated digest.
    pub fn sign_prehash(&self, prehash: &[u8]) -> Result<(Signature, RecoveryId)> {
        match self.curve.nonce_digest() {
            NonceDigest::Sha256 => self.sign_prehash_with::<Sha256>(prehash),
            NonceDigest::Sha384 => self.sign_prehash_with::<Sha384>(prehash),
            NonceDigest::Sha512 => self.sign_prehash_with::<Sha512>(prehash),
        }
    }

    fn sign_prehash_with<D>(&self, prehash: &[u8]) -> Result<(Signature, RecoveryId)>
    where
        D: Digest + BlockSizeUser + FixedOutputReset,
    {
        let curve = self.curve;
        let sc = curve.scalar_field();

        let z = sc.reduce_bytes(prehash);
        let mut nonces = NonceGenerator::<D>::new(sc, &self.secret, &z);

        for _ in 0..MAX_NONCE_RETRIES {
            let k = match Option::<Scalar>::from(nonces.generate()) {
                Some(k) => Zeroizing::new(k),
                None => continue,
            };

            let big_r = curve.to_affine(&curve.mul_g(&k));
            let (r, x_reduced) = curve.x_mod_n(&big_r);
            if bool::from(sc.is_zero(&r)) {
                continue;
            }

            let k_inv = Zeroizing::new(sc.invert(&k));
            let mut rd = sc.mul(&r, &self.secret);
            let s = sc.mul(&k_inv, &sc.add(&z, &rd));
            rd.zeroize();
            if bool::from(sc.is_zero(&s)) {
                continue;
            }

            // Low-S normalization flips the parity of y(kG).
            let (s, flipped) = sc.minimize(&s);
            let y_odd = curve.is_y_odd(&big_r) ^ flipped;
            let id = RecoveryId::new(y_odd.into(), x_reduced.into());
            return Ok((Signature { r, s }, id));
        }

        // The DRBG failed to produce a usable nonce; astronomically
        // improbable, surfaced as a hard error.
        Err(Error::new())
    }
}

impl Drop for SigningKey<'_> {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}
