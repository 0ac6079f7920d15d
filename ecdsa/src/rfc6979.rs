//! Deterministic nonce derivation per RFC 6979.
//!
//! A [`NonceGenerator`] is the HMAC-DRBG of RFC 6979 §3.2 bound to a
//! curve's scalar field: it is seeded from the secret scalar and the
//! reduced message scalar, produces candidate nonces at the field's byte
//! width, and applies the bits2int truncation plus the zero / out-of-range
//! rejection rule itself, so signing only loops on [`NonceGenerator::generate`]
//! until it gets a usable `k`. The digest parameter follows the curve
//! (SHA-256 for the 224/256-bit curves, SHA-384 for P-384, SHA-512 for
//! P-521).

use hmac::{
    digest::{core_api::BlockSizeUser, Digest, FixedOutputReset, Mac, Output},
    SimpleHmac,
};
use kurv::scalar::{Scalar, ScalarField};
use kurv::subtle::CtOption;
use kurv::zeroize::{Zeroize, Zeroizing};
use kurv::MAX_BYTES;

/// RFC 6979 HMAC-DRBG producing candidate ephemeral scalars.
///
/// Holds the rolling HMAC key `K` and chaining block `V` of the RFC's
/// state machine; `V` is wiped on drop.
pub struct NonceGenerator<D>
where
    D: Digest + BlockSizeUser + FixedOutputReset,
{
    sc: ScalarField,
    key: SimpleHmac<D>,
    chain: Output<D>,
}

impl<D> NonceGenerator<D>
where
    D: Digest + BlockSizeUser + FixedOutputReset,
{
    /// Seeds the generator with the secret scalar as entropy input and the
    /// reduced message as nonce (`bits2octets(H(m))`), both serialized at
    /// the scalar field's width.
    pub fn new(sc: &ScalarField, secret: &Scalar, message: &Scalar) -> Self {
        let size = sc.size();
        let mut secret_bytes = Zeroizing::new([0u8; MAX_BYTES]);
        sc.export(secret, &mut secret_bytes[..size]);
        let mut message_bytes = [0u8; MAX_BYTES];
        sc.export(message, &mut message_bytes[..size]);

        let mut drbg = NonceGenerator {
            sc: *sc,
            key: SimpleHmac::new(&Default::default()),
            chain: Output::<D>::default(),
        };
        for b in drbg.chain.iter_mut() {
            *b = 0x01;
        }
        drbg.rekey(0x00, &secret_bytes[..size], &message_bytes[..size]);
        drbg.rekey(0x01, &secret_bytes[..size], &message_bytes[..size]);
        drbg
    }

    /// One chaining update: `V = HMAC_K(V)`.
    fn step(&mut self) {
        self.key.update(&self.chain);
        self.chain = self.key.finalize_reset().into_bytes();
    }

    /// Key refresh: `K = HMAC_K(V || round || secret || message)` followed
    /// by a chaining update. Both seeding rounds and the between-candidates
    /// update (with empty seed material) come through here.
    fn rekey(&mut self, round: u8, secret: &[u8], message: &[u8]) {
        self.key.update(&self.chain);
        self.key.update(&[round]);
        self.key.update(secret);
        self.key.update(message);
        let new_key = self.key.finalize_reset().into_bytes();
        self.key = SimpleHmac::new_from_slice(&new_key).expect("HMAC accepts any key size");
        self.step();
    }

    /// Produces the next candidate scalar: chaining blocks concatenated to
    /// the scalar width, truncated bits2int-style, rejected (`None`) when
    /// zero or not below the group order.
    pub fn generate(&mut self) -> CtOption<Scalar> {
        let size = self.sc.size();
        let mut buf = Zeroizing::new([0u8; MAX_BYTES]);
        let mut filled = 0;
        while filled < size {
            self.step();
            let take = self.chain.len().min(size - filled);
            buf[filled..filled + take].copy_from_slice(&self.chain[..take]);
            filled += take;
        }
        self.rekey(0x00, &[], &[]);
        self.sc.candidate(&buf[..size])
    }
}

impl<D> Drop for NonceGenerator<D>
where
    D: Digest + BlockSizeUser + FixedOutputReset,
{
    fn drop(&mut self) {
        self.chain.as_mut_slice().zeroize();
    }
}
