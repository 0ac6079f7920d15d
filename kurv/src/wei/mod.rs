//! Short Weierstrass curves: context, group law, and multiplication.
//!
//! A [`Curve`] is built once from the static parameters of one of the
//! supported curves and then shared; every field, scalar, and point routine
//! hangs off it. The context owns the fixed-base comb table and the
//! blinding pair, so it is a large value — callers typically keep it in a
//! `static`, a box, or an outer stack frame.

mod curves;
mod mul;
mod point;

pub use curves::{P224, P256, P384, P521, SECP256K1};
pub use mul::COMB_TEETH;
pub use point::{AffinePoint, ProjectivePoint};

use rand_core::CryptoRngCore;
use subtle::Choice;

use crate::field::{Field, FieldElement};
use crate::limb::MAX_BYTES;
use crate::mpn;
use crate::scalar::{Scalar, ScalarField};

use mul::{AffineTable, MAX_COMB_WINDOWS};

/// Doubling-formula class, keyed by the curve coefficient `a`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveKind {
    /// a = -3 (the NIST curves).
    MinusThree,
    /// a = 0 (secp256k1).
    Zero,
    /// Any other a.
    Generic,
}

/// Digest a curve associates with RFC 6979 nonce generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NonceDigest {
    /// HMAC-SHA-256.
    Sha256,
    /// HMAC-SHA-384.
    Sha384,
    /// HMAC-SHA-512.
    Sha512,
}

/// GLV endomorphism constants, in their serialized form.
pub(crate) struct EndoParams {
    pub(crate) beta: &'static [u8],
    pub(crate) minus_lambda: &'static [u8],
    pub(crate) minus_b1: &'static [u8],
    pub(crate) minus_b2: &'static [u8],
    pub(crate) g1: &'static [u8],
    pub(crate) g2: &'static [u8],
}

/// Static description of a supported curve.
pub struct CurveParams {
    pub(crate) id: &'static str,
    pub(crate) bits: usize,
    pub(crate) p: &'static [u8],
    pub(crate) n: &'static [u8],
    pub(crate) a: &'static [u8],
    pub(crate) b: &'static [u8],
    pub(crate) gx: &'static [u8],
    pub(crate) gy: &'static [u8],
    pub(crate) kind: CurveKind,
    pub(crate) digest: NonceDigest,
    pub(crate) endo: Option<EndoParams>,
}

/// Decoded GLV endomorphism descriptor.
#[derive(Clone)]
pub(crate) struct Endo {
    pub(crate) beta: FieldElement,
    pub(crate) minus_lambda: Scalar,
    pub(crate) minus_b1: Scalar,
    pub(crate) minus_b2: Scalar,
    pub(crate) g1: Scalar,
    pub(crate) g2: Scalar,
}

/// A SEC1-encoded point: compressed, uncompressed, or the single-byte
/// infinity encoding.
#[derive(Clone, Copy)]
pub struct EncodedPoint {
    bytes: [u8; 1 + 2 * MAX_BYTES],
    len: usize,
}

impl AsRef<[u8]> for EncodedPoint {
    fn as_ref(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl core::fmt::Debug for EncodedPoint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "EncodedPoint({:02x?})", self.as_ref())
    }
}

impl PartialEq for EncodedPoint {
    fn eq(&self, other: &Self) -> bool {
        self.as_ref() == other.as_ref()
    }
}

impl Eq for EncodedPoint {}

/// A short Weierstrass curve context.
///
/// Immutable after construction except for the blinding pair, which only
/// [`Curve::randomize`] touches; shared references are safe across threads
/// for every other operation.
#[derive(Clone)]
pub struct Curve {
    pub(crate) fe: Field,
    pub(crate) sc: ScalarField,
    pub(crate) a: FieldElement,
    pub(crate) b: FieldElement,
    pub(crate) g: AffinePoint,
    pub(crate) kind: CurveKind,
    digest: NonceDigest,
    id: &'static str,
    pub(crate) endo: Option<Endo>,
    pub(crate) comb: [AffineTable; MAX_COMB_WINDOWS],
    pub(crate) blind: Scalar,
    pub(crate) unblind: ProjectivePoint,
}

impl Curve {
    /// Builds a curve context, deriving the field engines and precomputing
    /// the fixed-base comb table. The blinding pair starts out zeroed; call
    /// [`Curve::randomize`] to activate it.
    pub fn new(params: &CurveParams) -> Curve {
        let fe = Field::new(params.p, params.bits);
        let sc = ScalarField::new(params.n, params.bits);
        debug_assert_eq!(fe.size(), sc.size());

        let a = fe.from_bytes(params.a).expect("curve coefficient a out of range");
        let b = fe.from_bytes(params.b).expect("curve coefficient b out of range");
        let g = AffinePoint {
            x: fe.from_bytes(params.gx).expect("generator x out of range"),
            y: fe.from_bytes(params.gy).expect("generator y out of range"),
            infinity: Choice::from(0),
        };

        let endo = params.endo.as_ref().map(|e| Endo {
            beta: fe.from_bytes(e.beta).expect("endomorphism beta out of range"),
            minus_lambda: sc.import(e.minus_lambda).expect("endomorphism lambda out of range"),
            minus_b1: sc.import(e.minus_b1).expect("endomorphism b1 out of range"),
            minus_b2: sc.import(e.minus_b2).expect("endomorphism b2 out of range"),
            g1: sc.import(e.g1).expect("endomorphism g1 out of range"),
            g2: sc.import(e.g2).expect("endomorphism g2 out of range"),
        });

        let identity = ProjectivePoint {
            x: fe.one(),
            y: fe.one(),
            z: FieldElement::ZERO,
        };

        let mut curve = Curve {
            fe,
            sc,
            a,
            b,
            g,
            kind: params.kind,
            digest: params.digest,
            id: params.id,
            endo,
            comb: [AffineTable::new(); MAX_COMB_WINDOWS],
            blind: Scalar::ZERO,
            unblind: identity,
        };
        debug_assert!(bool::from(curve.affine_validate(&curve.g)));
        curve.build_comb();
        curve
    }

    /// Short curve name, e.g. `"P-256"`.
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

    /// Digest used for deterministic nonce derivation on this curve.
    pub fn nonce_digest(&self) -> NonceDigest {
        self.digest
    }

    /// Re-derives the blinding pair from fresh entropy. Requires exclusive
    /// access; every signing operation afterwards combs over re-randomized
    /// table offsets. Verification results are unaffected.
    pub fn randomize(&mut self, rng: &mut (impl CryptoRngCore + ?Sized)) {
        let blind = self.sc.random(rng);
        let point = self.mul_g(&blind);
        self.blind = blind;
        self.unblind = self.neg(&point);
    }

    /// Parity of the affine y-coordinate.
    pub fn is_y_odd(&self, p: &AffinePoint) -> Choice {
        self.fe.is_odd(&p.y)
    }

    /// Lifts the affine x-coordinate into the scalar field, returning the
    /// reduced value and whether a reduction took place (`x >= n`).
    pub fn x_mod_n(&self, p: &AffinePoint) -> (Scalar, Choice) {
        let k = self.sc.limbs();
        let mut s = Scalar(self.fe.canonical(&p.x));
        let over = !mpn::lt(&s.0[..k], self.sc.order());
        mpn::cond_sub(&mut s.0[..k], self.sc.order(), over);
        (s, over)
    }

    /// Reconstructs the ephemeral point of a recoverable signature from its
    /// reduced x-coordinate, the overflow flag, and the y parity.
    pub fn point_from_r(&self, r: &Scalar, x_reduced: bool, y_odd: bool) -> Option<AffinePoint> {
        let k = self.sc.limbs();
        let mut xl = r.0;
        if x_reduced {
            let carry = mpn::cond_add(&mut xl[..k], self.sc.order(), Choice::from(1));
            if carry != 0 {
                return None;
            }
        }

        let s = self.fe.size();
        let mut enc = [0u8; 1 + MAX_BYTES];
        enc[0] = 0x02 | y_odd as u8;
        mpn::to_be_bytes(&mut enc[1..1 + s], &xl[..k]);
        self.import_point(&enc[..1 + s])
    }

    /// Builds an affine point from raw big-endian coordinates, rejecting
    /// out-of-range values and points off the curve.
    pub fn point_from_xy(&self, x: &[u8], y: &[u8]) -> Option<AffinePoint> {
        let x = Option::<FieldElement>::from(self.fe.from_bytes(x))?;
        let y = Option::<FieldElement>::from(self.fe.from_bytes(y))?;
        let p = AffinePoint {
            x,
            y,
            infinity: Choice::from(0),
        };
        bool::from(self.affine_validate(&p)).then_some(p)
    }

    /// Decodes a SEC1 point: `0x00` (infinity), `0x02`/`0x03` ‖ x
    /// (compressed), or `0x04` ‖ x ‖ y (uncompressed). The decoded point is
    /// guaranteed to satisfy the curve equation.
    pub fn import_point(&self, bytes: &[u8]) -> Option<AffinePoint> {
        let s = self.fe.size();
        let (&tag, rest) = bytes.split_first()?;
        match tag {
            0x00 => rest.is_empty().then(AffinePoint::identity),
            0x02 | 0x03 => {
                if rest.len() != s {
                    return None;
                }
                let x = Option::<FieldElement>::from(self.fe.from_bytes(rest))?;
                let f = &self.fe;
                let rhs = f.add(&f.add(&f.mul(&f.sqr(&x), &x), &f.mul(&self.a, &x)), &self.b);
                let (y, ok) = f.sqrt(&rhs);
                if !bool::from(ok) {
                    return None;
                }
                let want_odd = Choice::from(tag & 1);
                let y = f.cneg(&y, f.is_odd(&y) ^ want_odd);
                Some(AffinePoint {
                    x,
                    y,
                    infinity: Choice::from(0),
                })
            }
            0x04 => {
                if rest.len() != 2 * s {
                    return None;
                }
                let x = Option::<FieldElement>::from(self.fe.from_bytes(&rest[..s]))?;
                let y = Option::<FieldElement>::from(self.fe.from_bytes(&rest[s..]))?;
                let p = AffinePoint {
                    x,
                    y,
                    infinity: Choice::from(0),
                };
                bool::from(self.affine_validate(&p)).then_some(p)
            }
            _ => None,
        }
    }

    /// Encodes a point in SEC1 form. Infinity encodes as the single byte
    /// `0x00` regardless of `compress`.
    pub fn export_point(&self, p: &AffinePoint, compress: bool) -> EncodedPoint {
        let s = self.fe.size();
        let mut out = EncodedPoint {
            bytes: [0; 1 + 2 * MAX_BYTES],
            len: 1,
        };
        if bool::from(p.infinity) {
            return out;
        }
        if compress {
            out.bytes[0] = 0x02 | self.is_y_odd(p).unwrap_u8();
            self.fe.to_bytes(&p.x, &mut out.bytes[1..1 + s]);
            out.len = 1 + s;
        } else {
            out.bytes[0] = 0x04;
            self.fe.to_bytes(&p.x, &mut out.bytes[1..1 + s]);
            self.fe.to_bytes(&p.y, &mut out.bytes[1 + s..1 + 2 * s]);
            out.len = 1 + 2 * s;
        }
        out
    }
}
