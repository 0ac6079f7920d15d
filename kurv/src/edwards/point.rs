//! Twisted Edwards points for a = -1 in affine and extended coordinates.
//!
//! Addition uses the unified Hisil–Wong–Carter–Dawson formulas with the
//! premultiplied 2d constant; they are complete for Ed25519 (a square,
//! d non-square), so no case analysis or infinity flag exists anywhere in
//! this module. The identity (0, 1) is an ordinary point.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

use crate::field::FieldElement;

use super::Curve;

/// An affine Edwards point (x, y).
#[derive(Clone, Copy, Debug)]
pub struct AffinePoint {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
}

impl ConditionallySelectable for AffinePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        AffinePoint {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
        }
    }
}

impl Zeroize for AffinePoint {
    fn zeroize(&mut self) {
        self.x.zeroize();
        self.y.zeroize();
    }
}

/// An extended Edwards point (X : Y : Z : T) with x = X/Z, y = Y/Z,
/// T = XY/Z.
#[derive(Clone, Copy, Debug)]
pub struct ExtendedPoint {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
    pub(crate) t: FieldElement,
}

impl ConditionallySelectable for ExtendedPoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        ExtendedPoint {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
            t: FieldElement::conditional_select(&a.t, &b.t, choice),
        }
    }
}

impl Zeroize for ExtendedPoint {
    fn zeroize(&mut self) {
        self.x.zeroize();
        self.y.zeroize();
        self.z.zeroize();
        self.t.zeroize();
    }
}

impl Curve {
    /// The affine identity (0, 1).
    pub fn affine_identity(&self) -> AffinePoint {
        AffinePoint {
            x: FieldElement::ZERO,
            y: self.fe.one(),
        }
    }

    /// The extended identity (0 : 1 : 1 : 0).
    pub fn identity(&self) -> ExtendedPoint {
        ExtendedPoint {
            x: FieldElement::ZERO,
            y: self.fe.one(),
            z: self.fe.one(),
            t: FieldElement::ZERO,
        }
    }

    /// Whether `p` is the identity.
    pub fn is_identity(&self, p: &ExtendedPoint) -> Choice {
        self.fe.is_zero(&p.x) & p.y.ct_eq(&p.z)
    }

    /// Lifts an affine point into extended coordinates.
    pub fn to_extended(&self, p: &AffinePoint) -> ExtendedPoint {
        ExtendedPoint {
            x: p.x,
            y: p.y,
            z: self.fe.one(),
            t: self.fe.mul(&p.x, &p.y),
        }
    }

    /// Normalizes to affine coordinates.
    pub fn to_affine(&self, p: &ExtendedPoint) -> AffinePoint {
        let zi = self.fe.invert(&p.z);
        AffinePoint {
            x: self.fe.mul(&p.x, &zi),
            y: self.fe.mul(&p.y, &zi),
        }
    }

    /// Extended negation.
    pub fn neg(&self, p: &ExtendedPoint) -> ExtendedPoint {
        ExtendedPoint {
            x: self.fe.neg(&p.x),
            y: p.y,
            z: p.z,
            t: self.fe.neg(&p.t),
        }
    }

    /// Affine negation.
    pub fn affine_neg(&self, p: &AffinePoint) -> AffinePoint {
        AffinePoint {
            x: self.fe.neg(&p.x),
            y: p.y,
        }
    }

    /// Unified extended addition; complete on this curve.
    pub fn add(&self, p: &ExtendedPoint, q: &ExtendedPoint) -> ExtendedPoint {
        let f = &self.fe;
        let a = f.mul(&f.sub(&p.y, &p.x), &f.sub(&q.y, &q.x));
        let b = f.mul(&f.add(&p.y, &p.x), &f.add(&q.y, &q.x));
        let c = f.mul(&f.mul(&p.t, &self.d2), &q.t);
        let d = f.small_mul(&f.mul(&p.z, &q.z), 2);
        let e = f.sub(&b, &a);
        let ff = f.sub(&d, &c);
        let g = f.add(&d, &c);
        let h = f.add(&b, &a);
        ExtendedPoint {
            x: f.mul(&e, &ff),
            y: f.mul(&g, &h),
            z: f.mul(&ff, &g),
            t: f.mul(&e, &h),
        }
    }

    /// Extended subtraction.
    pub fn sub(&self, p: &ExtendedPoint, q: &ExtendedPoint) -> ExtendedPoint {
        self.add(p, &self.neg(q))
    }

    /// Mixed addition of an extended and an affine point (Z2 = 1, with the
    /// affine T recomputed on the fly). Equally complete; adding (0, 1)
    /// returns `p` unchanged up to projective scaling.
    pub fn add_affine(&self, p: &ExtendedPoint, q: &AffinePoint) -> ExtendedPoint {
        let f = &self.fe;
        let t2 = f.mul(&q.x, &q.y);
        let a = f.mul(&f.sub(&p.y, &p.x), &f.sub(&q.y, &q.x));
        let b = f.mul(&f.add(&p.y, &p.x), &f.add(&q.y, &q.x));
        let c = f.mul(&f.mul(&p.t, &self.d2), &t2);
        let d = f.small_mul(&p.z, 2);
        let e = f.sub(&b, &a);
        let ff = f.sub(&d, &c);
        let g = f.add(&d, &c);
        let h = f.add(&b, &a);
        ExtendedPoint {
            x: f.mul(&e, &ff),
            y: f.mul(&g, &h),
            z: f.mul(&ff, &g),
            t: f.mul(&e, &h),
        }
    }

    /// Mixed subtraction.
    pub fn sub_affine(&self, p: &ExtendedPoint, q: &AffinePoint) -> ExtendedPoint {
        self.add_affine(p, &self.affine_neg(q))
    }

    /// Extended doubling.
    pub fn dbl(&self, p: &ExtendedPoint) -> ExtendedPoint {
        let f = &self.fe;
        let xx = f.sqr(&p.x);
        let yy = f.sqr(&p.y);
        let zz2 = f.small_mul(&f.sqr(&p.z), 2);
        let xy2 = f.sub(&f.sub(&f.sqr(&f.add(&p.x, &p.y)), &xx), &yy);
        let h = f.add(&yy, &xx);
        let g = f.sub(&yy, &xx);
        let ff = f.sub(&zz2, &g);
        ExtendedPoint {
            x: f.mul(&xy2, &ff),
            y: f.mul(&g, &h),
            z: f.mul(&g, &ff),
            t: f.mul(&xy2, &h),
        }
    }

    /// Affine addition through extended coordinates.
    pub fn affine_add(&self, p: &AffinePoint, q: &AffinePoint) -> AffinePoint {
        self.to_affine(&self.add_affine(&self.to_extended(p), q))
    }

    /// Affine doubling.
    pub fn affine_dbl(&self, p: &AffinePoint) -> AffinePoint {
        self.to_affine(&self.dbl(&self.to_extended(p)))
    }

    /// Constant-time projective equality.
    pub fn equal(&self, p: &ExtendedPoint, q: &ExtendedPoint) -> Choice {
        let f = &self.fe;
        let x_eq = f.mul(&p.x, &q.z).ct_eq(&f.mul(&q.x, &p.z));
        let y_eq = f.mul(&p.y, &q.z).ct_eq(&f.mul(&q.y, &p.z));
        x_eq & y_eq
    }

    /// Constant-time affine equality.
    pub fn affine_equal(&self, p: &AffinePoint, q: &AffinePoint) -> Choice {
        p.x.ct_eq(&q.x) & p.y.ct_eq(&q.y)
    }

    /// Checks the extended-coordinate curve equation
    /// `(-X^2 + Y^2) Z^2 = Z^4 + d X^2 Y^2` and the `T Z = X Y` constraint.
    pub fn validate(&self, p: &ExtendedPoint) -> Choice {
        let f = &self.fe;
        let xx = f.sqr(&p.x);
        let yy = f.sqr(&p.y);
        let zz = f.sqr(&p.z);
        let lhs = f.mul(&f.sub(&yy, &xx), &zz);
        let rhs = f.add(&f.sqr(&zz), &f.mul(&self.d, &f.mul(&xx, &yy)));
        let t_ok = f.mul(&p.t, &p.z).ct_eq(&f.mul(&p.x, &p.y));
        lhs.ct_eq(&rhs) & t_ok & !f.is_zero(&p.z)
    }

    /// Checks the affine curve equation `-x^2 + y^2 = 1 + d x^2 y^2`.
    pub fn affine_validate(&self, p: &AffinePoint) -> Choice {
        let f = &self.fe;
        let xx = f.sqr(&p.x);
        let yy = f.sqr(&p.y);
        let lhs = f.sub(&yy, &xx);
        let rhs = f.add(&f.one(), &f.mul(&self.d, &f.mul(&xx, &yy)));
        lhs.ct_eq(&rhs)
    }
}
