//! Affine and Jacobian point types with the short-Weierstrass group law.
//!
//! Addition follows add-2007-bl with the degenerate cases (doubling, either
//! operand at infinity, P + (-P)) resolved by conditional selection so the
//! executed instruction sequence never depends on the inputs. Doubling
//! dispatches on the public curve class: dbl-2001-b for a = -3, dbl-2009-l
//! for a = 0, dbl-2007-bl otherwise.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

use crate::field::FieldElement;

use super::{Curve, CurveKind};

/// A point in affine coordinates, with a constant-time infinity flag.
#[derive(Clone, Copy, Debug)]
pub struct AffinePoint {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) infinity: Choice,
}

impl AffinePoint {
    /// The point at infinity.
    pub fn identity() -> Self {
        AffinePoint {
            x: FieldElement::ZERO,
            y: FieldElement::ZERO,
            infinity: Choice::from(1),
        }
    }

    /// Whether this is the point at infinity.
    pub fn is_identity(&self) -> Choice {
        self.infinity
    }
}

impl ConditionallySelectable for AffinePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        AffinePoint {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            infinity: Choice::conditional_select(&a.infinity, &b.infinity, choice),
        }
    }
}

impl Zeroize for AffinePoint {
    fn zeroize(&mut self) {
        self.x.zeroize();
        self.y.zeroize();
        self.infinity = Choice::from(1);
    }
}

/// A point in Jacobian coordinates; `Z = 0` encodes infinity.
#[derive(Clone, Copy, Debug)]
pub struct ProjectivePoint {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
}

impl ConditionallySelectable for ProjectivePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        ProjectivePoint {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl Zeroize for ProjectivePoint {
    fn zeroize(&mut self) {
        self.x.zeroize();
        self.y.zeroize();
        self.z.zeroize();
    }
}

impl Curve {
    /// The group identity in Jacobian coordinates.
    pub fn identity(&self) -> ProjectivePoint {
        ProjectivePoint {
            x: self.fe.one(),
            y: self.fe.one(),
            z: FieldElement::ZERO,
        }
    }

    /// Whether `p` is the identity.
    pub fn is_identity(&self, p: &ProjectivePoint) -> Choice {
        self.fe.is_zero(&p.z)
    }

    /// Lifts an affine point to Jacobian coordinates.
    pub fn to_projective(&self, p: &AffinePoint) -> ProjectivePoint {
        let lifted = ProjectivePoint {
            x: p.x,
            y: p.y,
            z: self.fe.one(),
        };
        ProjectivePoint::conditional_select(&lifted, &self.identity(), p.infinity)
    }

    /// Normalizes to affine coordinates; the identity maps to the affine
    /// infinity flag. Constant-time (inversion of Z = 0 yields zero).
    pub fn to_affine(&self, p: &ProjectivePoint) -> AffinePoint {
        let f = &self.fe;
        let zi = f.invert(&p.z);
        let zi2 = f.sqr(&zi);
        AffinePoint {
            x: f.mul(&p.x, &zi2),
            y: f.mul(&p.y, &f.mul(&zi2, &zi)),
            infinity: self.is_identity(p),
        }
    }

    /// Jacobian negation.
    pub fn neg(&self, p: &ProjectivePoint) -> ProjectivePoint {
        ProjectivePoint {
            x: p.x,
            y: self.fe.neg(&p.y),
            z: p.z,
        }
    }

    /// Affine negation.
    pub fn affine_neg(&self, p: &AffinePoint) -> AffinePoint {
        AffinePoint {
            x: p.x,
            y: self.fe.neg(&p.y),
            infinity: p.infinity,
        }
    }

    /// Jacobian doubling. Complete: doubling the identity (or a Z = 0
    /// representative) stays at infinity.
    pub fn dbl(&self, p: &ProjectivePoint) -> ProjectivePoint {
        match self.kind {
            CurveKind::MinusThree => self.dbl_minus3(p),
            CurveKind::Zero => self.dbl_zero(p),
            CurveKind::Generic => self.dbl_generic(p),
        }
    }

    /// dbl-2001-b, valid for a = -3.
    fn dbl_minus3(&self, p: &ProjectivePoint) -> ProjectivePoint {
        let f = &self.fe;
        let delta = f.sqr(&p.z);
        let gamma = f.sqr(&p.y);
        let beta = f.mul(&p.x, &gamma);
        let alpha = f.small_mul(&f.mul(&f.sub(&p.x, &delta), &f.add(&p.x, &delta)), 3);
        let x3 = f.sub(&f.sqr(&alpha), &f.small_mul(&beta, 8));
        let z3 = f.sub(&f.sub(&f.sqr(&f.add(&p.y, &p.z)), &gamma), &delta);
        let y3 = f.sub(
            &f.mul(&alpha, &f.sub(&f.small_mul(&beta, 4), &x3)),
            &f.small_mul(&f.sqr(&gamma), 8),
        );
        ProjectivePoint { x: x3, y: y3, z: z3 }
    }

    /// dbl-2009-l, valid for a = 0.
    fn dbl_zero(&self, p: &ProjectivePoint) -> ProjectivePoint {
        let f = &self.fe;
        let a = f.sqr(&p.x);
        let b = f.sqr(&p.y);
        let c = f.sqr(&b);
        let d = f.small_mul(&f.sub(&f.sub(&f.sqr(&f.add(&p.x, &b)), &a), &c), 2);
        let e = f.small_mul(&a, 3);
        let x3 = f.sub(&f.sqr(&e), &f.small_mul(&d, 2));
        let y3 = f.sub(&f.mul(&e, &f.sub(&d, &x3)), &f.small_mul(&c, 8));
        let z3 = f.small_mul(&f.mul(&p.y, &p.z), 2);
        ProjectivePoint { x: x3, y: y3, z: z3 }
    }

    /// dbl-2007-bl for arbitrary a.
    fn dbl_generic(&self, p: &ProjectivePoint) -> ProjectivePoint {
        let f = &self.fe;
        let xx = f.sqr(&p.x);
        let yy = f.sqr(&p.y);
        let yyyy = f.sqr(&yy);
        let zz = f.sqr(&p.z);
        let s = f.small_mul(&f.sub(&f.sub(&f.sqr(&f.add(&p.x, &yy)), &xx), &yyyy), 2);
        let m = f.add(&f.small_mul(&xx, 3), &f.mul(&self.a, &f.sqr(&zz)));
        let x3 = f.sub(&f.sqr(&m), &f.small_mul(&s, 2));
        let y3 = f.sub(&f.mul(&m, &f.sub(&s, &x3)), &f.small_mul(&yyyy, 8));
        let z3 = f.sub(&f.sub(&f.sqr(&f.add(&p.y, &p.z)), &yy), &zz);
        ProjectivePoint { x: x3, y: y3, z: z3 }
    }

    /// Jacobian addition (add-2007-bl), uniform over every input class.
    pub fn add(&self, p: &ProjectivePoint, q: &ProjectivePoint) -> ProjectivePoint {
        let f = &self.fe;
        let z1z1 = f.sqr(&p.z);
        let z2z2 = f.sqr(&q.z);
        let u1 = f.mul(&p.x, &z2z2);
        let u2 = f.mul(&q.x, &z1z1);
        let s1 = f.mul(&p.y, &f.mul(&q.z, &z2z2));
        let s2 = f.mul(&q.y, &f.mul(&p.z, &z1z1));
        let h = f.sub(&u2, &u1);
        let rr = f.small_mul(&f.sub(&s2, &s1), 2);
        let i = f.sqr(&f.small_mul(&h, 2));
        let j = f.mul(&h, &i);
        let v = f.mul(&u1, &i);
        let x3 = f.sub(&f.sub(&f.sqr(&rr), &j), &f.small_mul(&v, 2));
        let y3 = f.sub(&f.mul(&rr, &f.sub(&v, &x3)), &f.small_mul(&f.mul(&s1, &j), 2));
        let z3 = f.mul(&f.sub(&f.sub(&f.sqr(&f.add(&p.z, &q.z)), &z1z1), &z2z2), &h);

        let mut r = ProjectivePoint { x: x3, y: y3, z: z3 };
        // P == Q leaves H = r = 0 and the formula breaks down; P == -Q
        // leaves Z3 = 0 which is already the right answer.
        let degenerate = f.is_zero(&h) & f.is_zero(&rr);
        r = ProjectivePoint::conditional_select(&r, &self.dbl(p), degenerate);
        r = ProjectivePoint::conditional_select(&r, q, self.is_identity(p));
        r = ProjectivePoint::conditional_select(&r, p, self.is_identity(q));
        r
    }

    /// Jacobian subtraction.
    pub fn sub(&self, p: &ProjectivePoint, q: &ProjectivePoint) -> ProjectivePoint {
        self.add(p, &self.neg(q))
    }

    /// Mixed addition (madd-2007-bl) of a Jacobian and an affine point.
    pub fn mixed_add(&self, p: &ProjectivePoint, q: &AffinePoint) -> ProjectivePoint {
        let f = &self.fe;
        let z1z1 = f.sqr(&p.z);
        let u2 = f.mul(&q.x, &z1z1);
        let s2 = f.mul(&q.y, &f.mul(&p.z, &z1z1));
        let h = f.sub(&u2, &p.x);
        let hh = f.sqr(&h);
        let i = f.small_mul(&hh, 4);
        let j = f.mul(&h, &i);
        let rr = f.small_mul(&f.sub(&s2, &p.y), 2);
        let v = f.mul(&p.x, &i);
        let x3 = f.sub(&f.sub(&f.sqr(&rr), &j), &f.small_mul(&v, 2));
        let y3 = f.sub(&f.mul(&rr, &f.sub(&v, &x3)), &f.small_mul(&f.mul(&p.y, &j), 2));
        let z3 = f.sub(&f.sub(&f.sqr(&f.add(&p.z, &h)), &z1z1), &hh);

        let mut r = ProjectivePoint { x: x3, y: y3, z: z3 };
        let degenerate = f.is_zero(&h) & f.is_zero(&rr);
        r = ProjectivePoint::conditional_select(&r, &self.dbl(p), degenerate);
        r = ProjectivePoint::conditional_select(&r, &self.to_projective(q), self.is_identity(p));
        r = ProjectivePoint::conditional_select(&r, p, q.infinity);
        r
    }

    /// Mixed subtraction.
    pub fn mixed_sub(&self, p: &ProjectivePoint, q: &AffinePoint) -> ProjectivePoint {
        self.mixed_add(p, &self.affine_neg(q))
    }

    /// Constant-time Jacobian equality.
    pub fn equal(&self, p: &ProjectivePoint, q: &ProjectivePoint) -> Choice {
        let f = &self.fe;
        let z1z1 = f.sqr(&p.z);
        let z2z2 = f.sqr(&q.z);
        let x_eq = f.mul(&p.x, &z2z2).ct_eq(&f.mul(&q.x, &z1z1));
        let y_eq = f
            .mul(&p.y, &f.mul(&q.z, &z2z2))
            .ct_eq(&f.mul(&q.y, &f.mul(&p.z, &z1z1)));
        let inf1 = self.is_identity(p);
        let inf2 = self.is_identity(q);
        (inf1 & inf2) | (!inf1 & !inf2 & x_eq & y_eq)
    }

    /// Constant-time affine equality.
    pub fn affine_equal(&self, p: &AffinePoint, q: &AffinePoint) -> Choice {
        (p.infinity & q.infinity)
            | (!p.infinity & !q.infinity & p.x.ct_eq(&q.x) & p.y.ct_eq(&q.y))
    }

    /// Checks the Jacobian curve equation
    /// `Y^2 = X^3 + a*X*Z^4 + b*Z^6`; the identity validates.
    pub fn validate_projective(&self, p: &ProjectivePoint) -> Choice {
        let f = &self.fe;
        let z2 = f.sqr(&p.z);
        let z4 = f.sqr(&z2);
        let z6 = f.mul(&z4, &z2);
        let rhs = f.add(
            &f.add(&f.mul(&f.sqr(&p.x), &p.x), &f.mul(&f.mul(&self.a, &p.x), &z4)),
            &f.mul(&self.b, &z6),
        );
        self.is_identity(p) | f.sqr(&p.y).ct_eq(&rhs)
    }

    /// Checks the affine curve equation `y^2 = x^3 + a*x + b`; the point at
    /// infinity validates.
    pub fn affine_validate(&self, p: &AffinePoint) -> Choice {
        let f = &self.fe;
        let rhs = f.add(&f.add(&f.mul(&f.sqr(&p.x), &p.x), &f.mul(&self.a, &p.x)), &self.b);
        p.infinity | f.sqr(&p.y).ct_eq(&rhs)
    }

    /// Affine addition, routed through Jacobian coordinates.
    pub fn affine_add(&self, p: &AffinePoint, q: &AffinePoint) -> AffinePoint {
        self.to_affine(&self.mixed_add(&self.to_projective(p), q))
    }

    /// Affine doubling.
    pub fn affine_dbl(&self, p: &AffinePoint) -> AffinePoint {
        self.to_affine(&self.dbl(&self.to_projective(p)))
    }
}
