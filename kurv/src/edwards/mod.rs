//! Twisted Edwards curves (Ed25519): context, group law, multiplication,
//! and the RFC 8032 point codec.

mod mul;
mod point;

pub use point::{AffinePoint, ExtendedPoint};

use hex_literal::hex;
use rand_core::CryptoRngCore;
use subtle::{Choice, CtOption};

use crate::field::{Field, FieldElement};
use crate::scalar::{Scalar, ScalarField};

use mul::{AffineTable, EDWARDS_COMB_WINDOWS};

/// Static description of a supported twisted Edwards curve (a = -1).
pub struct CurveParams {
    pub(crate) id: &'static str,
    pub(crate) bits: usize,
    pub(crate) order_bits: usize,
    pub(crate) p: &'static [u8],
    pub(crate) n: &'static [u8],
    pub(crate) d: &'static [u8],
    pub(crate) gx: &'static [u8],
    pub(crate) gy: &'static [u8],
}

/// Ed25519: -x^2 + y^2 = 1 + d x^2 y^2 over GF(2^255 - 19).
pub static ED25519: CurveParams = CurveParams {
    id: "ED25519",
    bits: 255,
    order_bits: 253,
    p: &hex!("7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffed"),
    n: &hex!("1000000000000000000000000000000014def9dea2f79cd65812631a5cf5d3ed"),
    d: &hex!("52036cee2b6ffe738cc740797779e89800700a4d4141d8ab75eb4dce135978a3"),
    gx: &hex!("216936d3cd6e53fec0a4e231fdd6dc5c692cc7609525a7b2c9562d608f25d51a"),
    gy: &hex!("6666666666666666666666666666666666666666666666666666666666666658"),
};

/// A twisted Edwards curve context.
///
/// Immutable after construction except for the blinding pair, which only
/// [`Curve::randomize`] touches.
#[derive(Clone)]
pub struct Curve {
    pub(crate) fe: Field,
    pub(crate) sc: ScalarField,
    pub(crate) d: FieldElement,
    pub(crate) d2: FieldElement,
    pub(crate) g: AffinePoint,
    id: &'static str,
    pub(crate) comb: [AffineTable; EDWARDS_COMB_WINDOWS],
    pub(crate) blind: Scalar,
    pub(crate) unblind: ExtendedPoint,
}

impl Curve {
    /// Builds the context and precomputes the fixed-base comb table.
    pub fn new(params: &CurveParams) -> Curve {
        let fe = Field::new(params.p, params.bits);
        let sc = ScalarField::new(params.n, params.order_bits);

        let d = fe.from_bytes(params.d).expect("curve coefficient d out of range");
        let d2 = fe.add(&d, &d);
        let g = AffinePoint {
            x: fe.from_bytes(params.gx).expect("generator x out of range"),
            y: fe.from_bytes(params.gy).expect("generator y out of range"),
        };

        let identity = ExtendedPoint {
            x: FieldElement::ZERO,
            y: fe.one(),
            z: fe.one(),
            t: FieldElement::ZERO,
        };

        let mut curve = Curve {
            fe,
            sc,
            d,
            d2,
            g,
            id: params.id,
            comb: [AffineTable::new(); EDWARDS_COMB_WINDOWS],
            blind: Scalar::ZERO,
            unblind: identity,
        };
        debug_assert!(bool::from(curve.affine_validate(&curve.g)));
        curve.build_comb();
        curve
    }

    /// Short curve name.
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// The prime-field engine.
    pub fn field(&self) -> &Field {
        &self.fe
    }

    /// The scalar-field engine.
    pub fn scalar_field(&self) -> &ScalarField {
        &self.sc
    }

    /// The base point.
    pub fn generator(&self) -> AffinePoint {
        self.g
    }

    /// Re-derives the blinding pair from fresh entropy; see the
    /// Weierstrass counterpart for the contract.
    pub fn randomize(&mut self, rng: &mut (impl CryptoRngCore + ?Sized)) {
        let blind = self.sc.random(rng);
        let point = self.mul_g(&blind);
        self.blind = blind;
        self.unblind = self.neg(&point);
    }

    /// Builds an affine point from raw little-endian coordinates, rejecting
    /// out-of-range values and points off the curve.
    pub fn point_from_xy(&self, x: &[u8; 32], y: &[u8; 32]) -> Option<AffinePoint> {
        let mut xbe = [0u8; 32];
        let mut ybe = [0u8; 32];
        for i in 0..32 {
            xbe[31 - i] = x[i];
            ybe[31 - i] = y[i];
        }
        let x = Option::<FieldElement>::from(self.fe.from_bytes(&xbe))?;
        let y = Option::<FieldElement>::from(self.fe.from_bytes(&ybe))?;
        let p = AffinePoint { x, y };
        bool::from(self.affine_validate(&p)).then_some(p)
    }

    /// Decodes an RFC 8032 point: 32-byte little-endian y with the x sign
    /// in the top bit. Rejects y >= p, non-residues, and the non-canonical
    /// "negative zero" x.
    pub fn import_point(&self, bytes: &[u8]) -> Option<AffinePoint> {
        if bytes.len() != 32 {
            return None;
        }
        let sign = bytes[31] >> 7;
        let mut be = [0u8; 32];
        for (i, b) in bytes.iter().enumerate() {
            be[31 - i] = *b;
        }
        be[0] &= 0x7f;

        let f = &self.fe;
        let y = Option::<FieldElement>::from(f.from_bytes(&be))?;

        // x^2 = (y^2 - 1) / (d y^2 + 1)
        let yy = f.sqr(&y);
        let u = f.sub(&yy, &f.one());
        let v = f.add(&f.mul(&self.d, &yy), &f.one());
        let (x, ok) = f.isqrt(&u, &v);
        if !bool::from(ok) {
            return None;
        }
        if bool::from(f.is_zero(&x)) && sign == 1 {
            return None;
        }
        let x = f.cneg(&x, f.is_odd(&x) ^ Choice::from(sign));
        Some(AffinePoint { x, y })
    }

    /// Encodes a point in RFC 8032 form.
    pub fn export_point(&self, p: &AffinePoint) -> [u8; 32] {
        let f = &self.fe;
        let mut be = [0u8; 32];
        f.to_bytes(&p.y, &mut be);
        let mut le = [0u8; 32];
        for (i, b) in be.iter().enumerate() {
            le[31 - i] = *b;
        }
        le[31] |= f.is_odd(&p.x).unwrap_u8() << 7;
        le
    }

    /// Decodes a little-endian scalar, rejecting values >= n.
    pub fn scalar_from_le_bytes(&self, bytes: &[u8; 32]) -> CtOption<Scalar> {
        let mut be = [0u8; 32];
        for (i, b) in bytes.iter().enumerate() {
            be[31 - i] = *b;
        }
        self.sc.import(&be)
    }

    /// Encodes a scalar in little-endian form.
    pub fn scalar_to_le_bytes(&self, s: &Scalar) -> [u8; 32] {
        let mut be = [0u8; 32];
        self.sc.export(s, &mut be);
        let mut le = [0u8; 32];
        for (i, b) in be.iter().enumerate() {
            le[31 - i] = *b;
        }
        le
    }

    /// Reduces a little-endian integer of up to 64 bytes modulo n.
    /// Constant-time; the EdDSA hash-derived scalars are secret.
    pub fn scalar_reduce_wide_le(&self, bytes: &[u8]) -> Scalar {
        debug_assert!(bytes.len() <= 64);
        let mut be = [0u8; 64];
        for (i, b) in bytes.iter().enumerate() {
            be[bytes.len() - 1 - i] = *b;
        }
        self.sc.reduce_bytes_wide(&be[..bytes.len()])
    }
}
