//! Edwards scalar multiplication: fixed-base comb, signed-window ladder,
//! and joint-sparse-form double multiplication for verification.
//!
//! The structure mirrors the Weierstrass engine; completeness of the
//! unified addition removes every degenerate-case select.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::scalar::{Scalar, MAX_JSF, MAX_RADIX16};
use crate::wei::COMB_TEETH;

use super::{AffinePoint, Curve, ExtendedPoint};

/// Comb windows for the Ed25519 order (253 bits, width-4 digits, plus the
/// recoding carry window).
pub(crate) const EDWARDS_COMB_WINDOWS: usize = (253 + 3) / 4 + 1;

/// One comb window: `[1P, ..., 8P]` in affine form.
#[derive(Clone, Copy)]
pub(crate) struct AffineTable([AffinePoint; COMB_TEETH]);

impl AffineTable {
    pub(crate) fn new() -> Self {
        AffineTable(
            [AffinePoint {
                x: crate::field::FieldElement::ZERO,
                y: crate::field::FieldElement::ZERO,
            }; COMB_TEETH],
        )
    }

    fn select(&self, curve: &Curve, x: i8) -> AffinePoint {
        debug_assert!((-8..=8).contains(&x));
        let xmask = x >> 7;
        let xabs = (x + xmask) ^ xmask;

        let mut t = curve.affine_identity();
        for (j, entry) in self.0.iter().enumerate() {
            let c = (xabs as u8).ct_eq(&(j as u8 + 1));
            t.conditional_assign(entry, c);
        }
        let neg = Choice::from((xmask & 1) as u8);
        AffinePoint::conditional_select(&t, &curve.affine_neg(&t), neg)
    }

    fn select_vartime(&self, curve: &Curve, x: i8) -> AffinePoint {
        if x > 0 {
            self.0[x as usize - 1]
        } else if x < 0 {
            curve.affine_neg(&self.0[(-x) as usize - 1])
        } else {
            curve.affine_identity()
        }
    }
}

/// Per-call window table over a variable base point.
struct LookupTable([ExtendedPoint; COMB_TEETH]);

impl LookupTable {
    fn new(curve: &Curve, p: &ExtendedPoint) -> Self {
        let mut pts = [*p; COMB_TEETH];
        for j in 0..COMB_TEETH - 1 {
            pts[j + 1] = curve.add(p, &pts[j]);
        }
        LookupTable(pts)
    }

    fn select(&self, curve: &Curve, x: i8) -> ExtendedPoint {
        debug_assert!((-8..=8).contains(&x));
        let xmask = x >> 7;
        let xabs = (x + xmask) ^ xmask;

        let mut t = curve.identity();
        for (j, entry) in self.0.iter().enumerate() {
            let c = (xabs as u8).ct_eq(&(j as u8 + 1));
            t.conditional_assign(entry, c);
        }
        let neg = Choice::from((xmask & 1) as u8);
        ExtendedPoint::conditional_select(&t, &curve.neg(&t), neg)
    }

    fn select_vartime(&self, curve: &Curve, x: i8) -> ExtendedPoint {
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
    fn comb_windows(&self) -> usize {
        (self.sc.bits() + 3) / 4 + 1
    }

    pub(crate) fn build_comb(&mut self) {
        let windows = self.comb_windows();
        debug_assert_eq!(windows, EDWARDS_COMB_WINDOWS);
        let mut base = self.to_extended(&self.g);
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

    fn batch_to_affine(&self, pts: &[ExtendedPoint; COMB_TEETH]) -> [AffinePoint; COMB_TEETH] {
        let f = &self.fe;
        let mut prefix = [f.one(); COMB_TEETH];
        prefix[0] = pts[0].z;
        for i in 1..COMB_TEETH {
            prefix[i] = f.mul(&prefix[i - 1], &pts[i].z);
        }

        let mut inv = f.invert(&prefix[COMB_TEETH - 1]);
        let mut out = [self.affine_identity(); COMB_TEETH];
        for i in (0..COMB_TEETH).rev() {
            let zi = if i == 0 {
                inv
            } else {
                f.mul(&inv, &prefix[i - 1])
            };
            if i > 0 {
                inv = f.mul(&inv, &pts[i].z);
            }
            out[i] = AffinePoint {
                x: f.mul(&pts[i].x, &zi),
                y: f.mul(&pts[i].y, &zi),
            };
        }
        out
    }

    /// Constant-time fixed-base multiplication `k * G`, blinded when the
    /// context has been randomized.
    pub fn mul_g(&self, k: &Scalar) -> ExtendedPoint {
        let windows = self.comb_windows();
        let kb = self.sc.add(k, &self.blind);
        let mut digits = [0i8; MAX_RADIX16];
        self.sc.recode_radix16(&kb, windows, &mut digits);

        let mut acc = self.unblind;
        for (w, table) in self.comb[..windows].iter().enumerate() {
            acc = self.add_affine(&acc, &table.select(self, digits[w]));
        }
        acc
    }

    /// Variable-time fixed-base multiplication; verification inputs only.
    pub fn mul_g_var(&self, k: &Scalar) -> ExtendedPoint {
        let windows = self.comb_windows();
        let mut digits = [0i8; MAX_RADIX16];
        self.sc.recode_radix16(k, windows, &mut digits);

        let mut acc = self.identity();
        for (w, table) in self.comb[..windows].iter().enumerate() {
            if digits[w] != 0 {
                acc = self.add_affine(&acc, &table.select_vartime(self, digits[w]));
            }
        }
        acc
    }

    /// Constant-time variable-base multiplication `k * P`.
    pub fn mul(&self, p: &AffinePoint, k: &Scalar) -> ExtendedPoint {
        let table = LookupTable::new(self, &self.to_extended(p));
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
    /// only.
    pub fn mul_var(&self, p: &AffinePoint, k: &Scalar) -> ExtendedPoint {
        let table = LookupTable::new(self, &self.to_extended(p));
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

    /// Variable-time `k1 * G + k2 * P` over the joint sparse form; the
    /// verification hot path.
    pub fn mul_double_var(&self, k1: &Scalar, p: &AffinePoint, k2: &Scalar) -> ExtendedPoint {
        let mut d0 = [0i8; MAX_JSF];
        let mut d1 = [0i8; MAX_JSF];
        let len = self.sc.jsf(k1, k2, &mut d0, &mut d1);

        let g = self.g;
        let gj = self.to_extended(&g);
        let sum = self.add_affine(&gj, p);
        let diff = self.sub_affine(&gj, p);

        let mut acc = self.identity();
        for i in (0..len).rev() {
            acc = self.dbl(&acc);
            acc = match (d0[i], d1[i]) {
                (1, 0) => self.add_affine(&acc, &g),
                (-1, 0) => self.sub_affine(&acc, &g),
                (0, 1) => self.add_affine(&acc, p),
                (0, -1) => self.sub_affine(&acc, p),
                (1, 1) => self.add(&acc, &sum),
                (-1, -1) => self.add(&acc, &self.neg(&sum)),
                (1, -1) => self.add(&acc, &diff),
                (-1, 1) => self.add(&acc, &self.neg(&diff)),
                _ => acc,
            };
        }
        acc
    }
}
