//! Ed25519 signing keys.

use kurv::edwards::Curve;
use kurv::scalar::Scalar;
use kurv::zeroize::{Zeroize, Zeroizing};
use sha2::{Digest, Sha512};

use crate::{Signature, VerifyingKey, SECRET_KEY_LENGTH};

/// Ed25519 secret key: the RFC 8032 32-byte seed together with its
/// expanded scalar and prefix, bound to a curve context.
///
/// All secret material is wiped on drop.
#[derive(Clone)]
pub struct SigningKey<'c> {
    curve: &'c Curve,
    seed: [u8; SECRET_KEY_LENGTH],
    scalar: Scalar,
    prefix: [u8; 32],
    public: VerifyingKey<'c>,
}

impl<'c> SigningKey<'c> {
    /// Expand a 32-byte seed into a signing key (RFC 8032 §5.1.5): hash
    /// with SHA-512, clamp the first half into the scalar, keep the second
    /// half as the signing prefix.
    pub fn from_bytes(curve: &'c Curve, seed: &[u8; SECRET_KEY_LENGTH]) -> Self {
        let mut h = Zeroizing::new([0u8; 64]);
        h.copy_from_slice(&Sha512::digest(seed));

        let mut scalar_bytes = Zeroizing::new([0u8; 32]);
        scalar_bytes.copy_from_slice(&h[..32]);
        scalar_bytes[0] &= 248;
        scalar_bytes[31] &= 127;
        scalar_bytes[31] |= 64;

        // The clamped value lies above the group order; reduce it, which
        // leaves both the public key and every signature unchanged.
        let scalar = curve.scalar_reduce_wide_le(&scalar_bytes[..]);

        let mut prefix = [0u8; 32];
        prefix.copy_from_slice(&h[32..]);

        let point = curve.to_affine(&curve.mul_g(&scalar));
        let public = VerifyingKey::from_parts(curve, curve.export_point(&point), point);

        SigningKey {
            curve,
            seed: *seed,
            scalar,
            prefix,
            public,
        }
    }

    /// Return the seed this key was expanded from.
    ///
    /// # ⚠️ Warning
    ///
    /// This value is key material.
    pub fn to_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        self.seed
    }

    /// The curve context this key signs over.
    pub fn curve(&self) -> &'c Curve {
        self.curve
    }

    /// Get the [`VerifyingKey`] which corresponds to this [`SigningKey`].
    pub fn verifying_key(&self) -> VerifyingKey<'c> {
        self.public
    }

    /// Sign the message with PureEdDSA (RFC 8032 §5.1.6).
    pub fn sign(&self, msg: &[u8]) -> Signature {
        let curve = self.curve;
        let sc = curve.scalar_field();

        // r = H(prefix || M) mod n; secret, reduced in constant time.
        let mut h = Sha512::new();
        h.update(self.prefix);
        h.update(msg);
        let r = Zeroizing::new(curve.scalar_reduce_wide_le(&h.finalize()));

        let r_bytes = curve.export_point(&curve.to_affine(&curve.mul_g(&r)));

        // k = H(R || A || M) mod n
        let mut h = Sha512::new();
        h.update(r_bytes);
        h.update(self.public.as_bytes());
        h.update(msg);
        let k = curve.scalar_reduce_wide_le(&h.finalize());

        // S = r + k * a mod n
        let s = sc.add(&r, &sc.mul(&k, &self.scalar));

        let mut sig = [0u8; 64];
        sig[..32].copy_from_slice(&r_bytes);
        sig[32..].copy_from_slice(&curve.scalar_to_le_bytes(&s));
        Signature::from_bytes(&sig)
    }
}

impl Drop for SigningKey<'_> {
    fn drop(&mut self) {
        self.seed.zeroize();
        self.scalar.zeroize();
        self.prefix.zeroize();
    }
}
