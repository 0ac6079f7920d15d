//! Scalar multiplication: fixed-base comb, variable-base signed-window
//! ladder (with the GLV interleave on secp256k1), and variable-time joint
//! sparse form evaluation for the verification hot path.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::scalar::{Scalar, MAX_JSF, MAX_RADIX16};

use super::{AffinePoint, Curve, Endo, ProjectivePoint};

/// Points per comb window: 2^(w-1) for window width 4.
pub const COMB_TEETH: usize = 8;

/// Comb windows for the widest supported order.
pub(crate) const MAX_COMB_WINDOWS: usize = MAX_RADIX16;

/// Radix-16 digits of a GLV half-width sub-scalar (<= 129 bits).
const ENDO_WINDOWS: usize = 33;

/// One comb window: `[1P, 2P, ..., 8P]` in affine form.
#[derive(Clone, Copy)]
pub(crate) struct AffineTable([AffinePoint; COMB_TEETH]);

impl AffineTable {
    pub(crate) fn new() -> Self {
        AffineTable([AffinePoint::identity(); COMB_TEETH])
    }

    /// Returns `x * P` for `x` in `[-8, 8]`, scanning every entry under a
    /// mask and conditionally negating, so neither the index nor the sign
    /// leaves a trace.
    fn select(&self, curve: &Curve, x: i8) -> AffinePoint {
        debug_assert!((-8..=8).contains(&x));
        let xmask = x >> 7;
        let xabs = (x + xmask) ^ xmask;

        let mut t = AffinePoint::identity();
        for (j, entry) in self.0.iter().enumerate() {
            let c = (xabs as u8).ct_eq(&(j as u8 + 1));
            t.conditional_assign(entry, c);
        }
        let neg = Choice::from((xmask & 1) as u8);
        AffinePoint::conditional_select(&t, &curve.affine_neg(&t), neg)
    }

    /// Direct-indexed lookup for verification-only paths.
    fn select_vartime(&self, curve: &Curve, x: i8) -> AffinePoint {
        if x > 0 {
            self.0[x as usize - 1]
        } else if x < 0 {
            curve.affine_neg(&self.0[(-x) as usize - 1])
        } else {
            AffinePoint::identity()
        }
    }
}

/// Per-call window table over a variable base point, kept projective.
struct LookupTable([ProjectivePoint; COMB_TEETH]);

impl LookupTable {
    fn new(curve: &Curve, p: &ProjectivePoint) -> Self {
        let mut pts = [*p; COMB_TEETH];
        for j in 0..COMB_TEETH - 1 {
            pts[j + 1] = curve.add(p, &pts[j]);
        }
        LookupTable(pts)
    }

    fn select(&self, curve: &Curve, x: i8) -> ProjectivePoint {
        debug_assert!((-8..=8).contains(&x));
        let xmask = x >> 7;
        let xabs = (x + xmask) ^ xmask;

        let mut t = curve.identity();
        for (j, entry) in self.0.iter().enumerate() {
            let c = (xabs as u8).ct_eq(&(j as u8 + 1));
            t.conditional_assign(entry, c);
        }
        let neg = Choice::from((xmask & 1) as u8);
        ProjectivePoint::conditional_select(&t, &curve.neg(&t), neg)
    }

    fn select_vartime(&self, curve: &Curve, x: i8) -> ProjectivePoint {
        if x > 0 {
            self.0[x as usize - 1]
        } else if x < 0 {
            curve.neg(&self.0[(-x) as usize - 1])
        } else {
            curve.identity()
        }
    }
}

impl Curve {
    pub(crate) fn comb_windows(&self) -> usize {
        (self.sc.bits() + 3) / 4 + 1
    }

    /// Fills the fixed-base comb: window `i` holds `[1..8] * 16^i * G` in
    /// affine form, normalized with one batched inversion per window.
    pub(crate) fn build_comb(&mut self) {
        let windows = self.comb_windows();
        let mut base = self.to_projective(&self.g);
        for w in 0..windows {
            let mut row = [base; COMB_TEETH];
            for j in 1..COMB_TEETH {
                row[j] = self.add(&row[j - 1], &base);
            }
            self.comb[w] = AffineTable(self.batch_to_affine(&row));
            for _ in 0..4 {
                base = self.dbl(&base);
            }
        }
    }

    /// Montgomery's simultaneous-inversion trick. The inputs are known
    /// nonzero multiples of the prime-order base point, so no Z can vanish.
    fn batch_to_affine(&self, pts: &[ProjectivePoint; COMB_TEETH]) -> [AffinePoint; COMB_TEETH] {
        let f = &self.fe;
        let mut prefix = [f.one(); COMB_TEETH];
        prefix[0] = pts[0].z;
        for i in 1..COMB_TEETH {
            prefix[i] = f.mul(&prefix[i - 1], &pts[i].z);
        }

        let mut inv = f.invert(&prefix[COMB_TEETH - 1]);
        let mut out = [AffinePoint::identity(); COMB_TEETH];
        for i in (0..COMB_TEETH).rev() {
            debug_assert!(!bool::from(f.is_zero(&pts[i].z)));
            let zi = if i == 0 {
                inv
            } else {
                f.mul(&inv, &prefix[i - 1])
            };
            if i > 0 {
                inv = f.mul(&inv, &pts[i].z);
            }
            let zi2 = f.sqr(&zi);
            out[i] = AffinePoint {
                x: f.mul(&pts[i].x, &zi2),
                y: f.mul(&pts[i].y, &f.mul(&zi2, &zi)),
                infinity: Choice::from(0),
            };
        }
        out
    }

    /// Constant-time fixed-base multiplication `k * G`.
    ///
    /// The comb runs over `k + blind` and starts from the stored unblinding
    /// point, so after [`Curve::randomize`] the table access pattern is
    /// decorrelated from `k` across calls.
    pub fn mul_g(&self, k: &Scalar) -> ProjectivePoint {
        let windows = self.comb_windows();
        let kb = self.sc.add(k, &self.blind);
        let mut digits = [0i8; MAX_RADIX16];
        self.sc.recode_radix16(&kb, windows, &mut digits);

        let mut acc = self.unblind;
        for (w, table) in self.comb[..windows].iter().enumerate() {
            acc = self.mixed_add(&acc, &table.select(self, digits[w]));
        }
        acc
    }

    /// Variable-time fixed-base multiplication; verification inputs only.
    pub fn mul_g_var(&self, k: &Scalar) -> ProjectivePoint {
        let windows = self.comb_windows();
        let mut digits = [0i8; MAX_RADIX16];
        self.sc.recode_radix16(k, windows, &mut digits);

        let mut acc = self.identity();
        for (w, table) in self.comb[..windows].iter().enumerate() {
            if digits[w] != 0 {
                acc = self.mixed_add(&acc, &table.select_vartime(self, digits[w]));
            }
        }
        acc
    }

    /// Constant-time variable-base multiplication `k * P`.
    pub fn mul(&self, p: &AffinePoint, k: &Scalar) -> ProjectivePoint {
        if let Some(endo) = &self.endo {
            return self.mul_endo(endo, p, k);
        }

        let table = LookupTable::new(self, &self.to_projective(p));
        let windows = self.comb_windows();
        let mut digits = [0i8; MAX_RADIX16];
        self.sc.recode_radix16(k, windows, &mut digits);

        let mut acc = table.select(self, digits[windows - 1]);
        for i in (0..windows - 1).rev() {
            for _ in 0..4 {
                acc = self.dbl(&acc);
            }
            acc = self.add(&acc, &table.select(self, digits[i]));
        }
        acc
    }

    /// Variable-time variable-base multiplication; verification inputs
    /// only. Produces the same result as [`Curve::mul`] on every input.
    pub fn mul_var(&self, p: &AffinePoint, k: &Scalar) -> ProjectivePoint {
        let table = LookupTable::new(self, &self.to_projective(p));
        let windows = self.comb_windows();
        let mut digits = [0i8; MAX_RADIX16];
        self.sc.recode_radix16(k, windows, &mut digits);

        let mut acc = self.identity();
        for i in (0..windows).rev() {
            if i != windows - 1 {
                for _ in 0..4 {
                    acc = self.dbl(&acc);
                }
            }
            if digits[i] != 0 {
                acc = self.add(&acc, &table.select_vartime(self, digits[i]));
            }
        }
        acc
    }

    /// GLV split: `r1 + r2 * lambda == k (mod n)` with both halves close to
    /// `sqrt(n)`.
    fn split(&self, endo: &Endo, k: &Scalar) -> (Scalar, Scalar) {
        let sc = &self.sc;
        let c1 = sc.mul_shift(k, &endo.g1, 272);
        let c2 = sc.mul_shift(k, &endo.g2, 272);
        let c1 = sc.mul(&c1, &endo.minus_b1);
        let c2 = sc.mul(&c2, &endo.minus_b2);
        let r2 = sc.add(&c1, &c2);
        let r1 = sc.add(k, &sc.mul(&r2, &endo.minus_lambda));
        (r1, r2)
    }

    /// `lambda * P = (beta * x, y)`.
    fn endomorphism(&self, endo: &Endo, p: &AffinePoint) -> AffinePoint {
        AffinePoint {
            x: self.fe.mul(&p.x, &endo.beta),
            y: p.y,
            infinity: p.infinity,
        }
    }

    /// Endomorphism-accelerated constant-time ladder: two interleaved
    /// half-width digit streams over `P` and `lambda * P`.
    fn mul_endo(&self, endo: &Endo, p: &AffinePoint, k: &Scalar) -> ProjectivePoint {
        let sc = &self.sc;
        let (r1, r2) = self.split(endo, k);

        // Fold "negative" halves into the tables so the digits stay short.
        let (r1, s1) = sc.minimize(&r1);
        let (r2, s2) = sc.minimize(&r2);

        let pj = self.to_projective(p);
        let pj1 = ProjectivePoint::conditional_select(&pj, &self.neg(&pj), s1);
        let pl = self.to_projective(&self.endomorphism(endo, p));
        let pj2 = ProjectivePoint::conditional_select(&pl, &self.neg(&pl), s2);

        let t1 = LookupTable::new(self, &pj1);
        let t2 = LookupTable::new(self, &pj2);

        let mut d1 = [0i8; MAX_RADIX16];
        let mut d2 = [0i8; MAX_RADIX16];
        sc.recode_radix16(&r1, ENDO_WINDOWS, &mut d1);
        sc.recode_radix16(&r2, ENDO_WINDOWS, &mut d2);

        let mut acc = self.add(
            &t1.select(self, d1[ENDO_WINDOWS - 1]),
            &t2.select(self, d2[ENDO_WINDOWS - 1]),
        );
        for i in (0..ENDO_WINDOWS - 1).rev() {
            for _ in 0..4 {
                acc = self.dbl(&acc);
            }
            acc = self.add(&acc, &t1.select(self, d1[i]));
            acc = self.add(&acc, &t2.select(self, d2[i]));
        }
        acc
    }

    /// Variable-time `k1 * G + k2 * P`; the verification hot path.
    ///
    /// Joint sparse form over the scalar pair; on secp256k1 both scalars
    /// are endomorphism-split first and two JSF pairs run interleaved.
    pub fn mul_double_var(&self, k1: &Scalar, p: &AffinePoint, k2: &Scalar) -> ProjectivePoint {
        if let Some(endo) = &self.endo {
            return self.mul_double_endo_var(endo, k1, p, k2);
        }

        let g = self.g;
        let pair = JsfPair::new(self, k1, &g, k2, p);
        let mut acc = self.identity();
        for i in (0..pair.len).rev() {
            acc = self.dbl(&acc);
            acc = pair.step(self, acc, i);
        }
        acc
    }

    fn mul_double_endo_var(
        &self,
        endo: &Endo,
        k1: &Scalar,
        p: &AffinePoint,
        k2: &Scalar,
    ) -> ProjectivePoint {
        let sc = &self.sc;

        let (a1, b1) = self.split(endo, k1);
        let (a1, sa1) = sc.minimize(&a1);
        let (b1, sb1) = sc.minimize(&b1);
        let ga = self.affine_cneg_var(&self.g, sa1.into());
        let gl = self.affine_cneg_var(&self.endomorphism(endo, &self.g), sb1.into());
        let pair1 = JsfPair::new(self, &a1, &ga, &b1, &gl);

        let (a2, b2) = self.split(endo, k2);
        let (a2, sa2) = sc.minimize(&a2);
        let (b2, sb2) = sc.minimize(&b2);
        let pa = self.affine_cneg_var(p, sa2.into());
        let pl = self.affine_cneg_var(&self.endomorphism(endo, p), sb2.into());
        let pair2 = JsfPair::new(self, &a2, &pa, &b2, &pl);

        let mut acc = self.identity();
        for i in (0..pair1.len.max(pair2.len)).rev() {
            acc = self.dbl(&acc);
            if i < pair1.len {
                acc = pair1.step(self, acc, i);
            }
            if i < pair2.len {
                acc = pair2.step(self, acc, i);
            }
        }
        acc
    }

    fn affine_cneg_var(&self, p: &AffinePoint, neg: bool) -> AffinePoint {
        if neg {
            self.affine_neg(p)
        } else {
            *p
        }
    }
}

/// A recoded scalar pair with the `±A`, `±B`, `±(A+B)`, `±(A-B)` combo
/// points needed to evaluate it.
struct JsfPair {
    d0: [i8; MAX_JSF],
    d1: [i8; MAX_JSF],
    len: usize,
    a: AffinePoint,
    b: AffinePoint,
    sum: ProjectivePoint,
    diff: ProjectivePoint,
}

impl JsfPair {
    fn new(curve: &Curve, k0: &Scalar, a: &AffinePoint, k1: &Scalar, b: &AffinePoint) -> Self {
        let mut d0 = [0i8; MAX_JSF];
        let mut d1 = [0i8; MAX_JSF];
        let len = curve.sc.jsf(k0, k1, &mut d0, &mut d1);
        let aj = curve.to_projective(a);
        let sum = curve.mixed_add(&aj, b);
        let diff = curve.mixed_sub(&aj, b);
        JsfPair {
            d0,
            d1,
            len,
            a: *a,
            b: *b,
            sum,
            diff,
        }
    }

    fn step(&self, curve: &Curve, acc: ProjectivePoint, i: usize) -> ProjectivePoint {
        match (self.d0[i], self.d1[i]) {
            (1, 0) => curve.mixed_add(&acc, &self.a),
            (-1, 0) => curve.mixed_sub(&acc, &self.a),
            (0, 1) => curve.mixed_add(&acc, &self.b),
            (0, -1) => curve.mixed_sub(&acc, &self.b),
            (1, 1) => curve.add(&acc, &self.sum),
            (-1, -1) => curve.add(&acc, &curve.neg(&self.sum)),
            (1, -1) => curve.add(&acc, &self.diff),
            (-1, 1) => curve.add(&acc, &curve.neg(&self.diff)),
            _ => acc,
        }
    }
}
