//! Arithmetic modulo a curve's group order.
//!
//! Scalars are plain (non-Montgomery) fully reduced values; multiplication
//! reduces the double-width product with Barrett's method, whose constant
//! `mu = floor(b^2k / n)` is derived once at context initialization. The
//! wide reduction is constant-time, which matters for EdDSA where the
//! reduced 512-bit hash is secret.

use rand_core::CryptoRngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};
use zeroize::Zeroize;

use crate::limb::{adc, Limb, LIMB_BITS, MAX_LIMBS, MAX_WIDE_LIMBS};
use crate::mpn;

/// An integer in `[0, n)` for the curve order `n`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Scalar(pub(crate) [Limb; MAX_LIMBS]);

impl Scalar {
    /// The zero scalar.
    pub const ZERO: Self = Self([0; MAX_LIMBS]);

    /// The scalar one.
    pub const ONE: Self = {
        let mut l = [0; MAX_LIMBS];
        l[0] = 1;
        Self(l)
    };

    /// Reads the `i`-th radix-16 digit. Limb widths are a multiple of four
    /// bits, so nibbles never straddle a limb.
    pub(crate) fn nibble(&self, i: usize) -> u8 {
        let bitpos = i * 4;
        let limb = bitpos / LIMB_BITS;
        if limb >= MAX_LIMBS {
            return 0;
        }
        ((self.0[limb] >> (bitpos % LIMB_BITS)) & 0xf) as u8
    }
}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut r = *a;
        mpn::conditional_assign(&mut r.0, &b.0, choice);
        r
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        mpn::eq(&self.0, &other.0)
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Scalar {}

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Arithmetic engine for integers modulo the group order.
#[derive(Clone, Copy)]
pub struct ScalarField {
    limbs: usize,
    bits: usize,
    size: usize,
    n: [Limb; MAX_LIMBS],
    /// floor(n / 2), for the low-half test.
    nh: [Limb; MAX_LIMBS],
    /// floor(b^2k / n), k + 1 limbs.
    mu: [Limb; MAX_LIMBS + 1],
    /// n - 2; the Fermat inversion exponent.
    inv_exp: [Limb; MAX_LIMBS],
}

impl ScalarField {
    /// Builds the engine from the big-endian group order of `bits` bits.
    pub fn new(n_bytes: &[u8], bits: usize) -> Self {
        let limbs = (bits + LIMB_BITS - 1) / LIMB_BITS;
        let size = (bits + 7) / 8;
        debug_assert_eq!(n_bytes.len(), size);

        let mut n = [0; MAX_LIMBS];
        mpn::from_be_bytes(&mut n[..limbs], n_bytes);

        let mut nh = n;
        mpn::shr(&mut nh[..limbs], 1);

        let mut mu = [0; MAX_LIMBS + 1];
        mpn::div_pow2(&mut mu[..limbs + 1], 2 * limbs * LIMB_BITS, &n[..limbs]);

        let mut inv_exp = n;
        let mut borrow = 0;
        {
            let (w, bw) = crate::limb::sbb(inv_exp[0], 2, borrow);
            inv_exp[0] = w;
            borrow = bw;
            for l in inv_exp[1..limbs].iter_mut() {
                let (w, bw) = crate::limb::sbb(*l, 0, borrow);
                *l = w;
                borrow = bw;
            }
        }
        debug_assert_eq!(borrow, 0);

        ScalarField {
            limbs,
            bits,
            size,
            n,
            nh,
            mu,
            inv_exp,
        }
    }

    /// Canonical byte width of an encoded scalar.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Bit length of the order.
    pub fn bits(&self) -> usize {
        self.bits
    }

    pub(crate) fn limbs(&self) -> usize {
        self.limbs
    }

    pub(crate) fn order(&self) -> &[Limb] {
        &self.n[..self.limbs]
    }

    /// Barrett reduction of a double-width value.
    pub(crate) fn reduce_wide(&self, t: &[Limb; MAX_WIDE_LIMBS]) -> Scalar {
        let k = self.limbs;

        // q3 = floor(floor(t / b^(k-1)) * mu / b^(k+1))
        let mut q2 = [0 as Limb; 2 * MAX_LIMBS + 2];
        mpn::mul(&mut q2[..2 * (k + 1)], &t[k - 1..2 * k], &self.mu[..k + 1]);

        // r = (t - q3 * n) mod b^(k+1); in [0, 3n).
        let mut q3n = [0 as Limb; 2 * MAX_LIMBS + 1];
        mpn::mul(&mut q3n[..2 * k + 1], &q2[k + 1..2 * (k + 1)], &self.n[..k]);

        let mut r = [0 as Limb; MAX_LIMBS + 1];
        mpn::sub(&mut r[..k + 1], &t[..k + 1], &q3n[..k + 1]);

        let mut nx = [0 as Limb; MAX_LIMBS + 1];
        nx[..k].copy_from_slice(&self.n[..k]);
        for _ in 0..2 {
            let ge = !mpn::lt(&r[..k + 1], &nx[..k + 1]);
            mpn::cond_sub(&mut r[..k + 1], &nx[..k + 1], ge);
        }
        debug_assert_eq!(r[k], 0);

        let mut out = Scalar::ZERO;
        out.0[..k].copy_from_slice(&r[..k]);
        out
    }

    /// Reduces an arbitrary-width big-endian integer (up to `2 * size`
    /// bytes) modulo n. Constant-time in the value.
    pub fn reduce_bytes_wide(&self, bytes: &[u8]) -> Scalar {
        debug_assert!(bytes.len() <= 2 * self.limbs * (LIMB_BITS / 8));
        let mut t = [0 as Limb; MAX_WIDE_LIMBS];
        mpn::from_be_bytes(&mut t[..2 * self.limbs], bytes);
        self.reduce_wide(&t)
    }

    /// Returns `a + b mod n`.
    pub fn add(&self, a: &Scalar, b: &Scalar) -> Scalar {
        let k = self.limbs;
        let mut r = Scalar::ZERO;
        let carry = mpn::add(&mut r.0[..k], &a.0[..k], &b.0[..k]);

        let mut d = [0; MAX_LIMBS];
        let borrow = mpn::sub(&mut d[..k], &r.0[..k], &self.n[..k]);
        let take = Choice::from((carry & 1) as u8) | !Choice::from((borrow & 1) as u8);
        mpn::conditional_assign(&mut r.0[..k], &d[..k], take);
        r
    }

    /// Returns `a - b mod n`.
    pub fn sub(&self, a: &Scalar, b: &Scalar) -> Scalar {
        let k = self.limbs;
        let mut r = Scalar::ZERO;
        let borrow = mpn::sub(&mut r.0[..k], &a.0[..k], &b.0[..k]);
        mpn::cond_add(&mut r.0[..k], &self.n[..k], Choice::from((borrow & 1) as u8));
        r
    }

    /// Returns `-a mod n`.
    pub fn neg(&self, a: &Scalar) -> Scalar {
        self.sub(&Scalar::ZERO, a)
    }

    /// Negates when `flag` is set.
    pub fn cneg(&self, a: &Scalar, flag: Choice) -> Scalar {
        let n = self.neg(a);
        Scalar::conditional_select(a, &n, flag)
    }

    /// Returns `a * b mod n`.
    pub fn mul(&self, a: &Scalar, b: &Scalar) -> Scalar {
        let k = self.limbs;
        let mut wide = [0 as Limb; MAX_WIDE_LIMBS];
        mpn::mul(&mut wide[..2 * k], &a.0[..k], &b.0[..k]);
        self.reduce_wide(&wide)
    }

    /// Returns `a^2 mod n`.
    pub fn sqr(&self, a: &Scalar) -> Scalar {
        self.mul(a, a)
    }

    /// Returns `floor(a * b / 2^shift)`, rounded to nearest. Used by the
    /// secp256k1 endomorphism decomposition; `shift` is a public constant.
    pub(crate) fn mul_shift(&self, a: &Scalar, b: &Scalar, shift: usize) -> Scalar {
        let k = self.limbs;
        let mut wide = [0 as Limb; MAX_WIDE_LIMBS];
        mpn::mul(&mut wide[..2 * k], &a.0[..k], &b.0[..k]);

        let round = mpn::bit(&wide[..2 * k], shift - 1);
        mpn::shr_vartime(&mut wide[..2 * k], shift);

        let mut r = Scalar::ZERO;
        r.0[..k].copy_from_slice(&wide[..k]);
        let mut carry = round;
        for l in r.0[..k].iter_mut() {
            let (w, c) = adc(*l, 0, carry);
            *l = w;
            carry = c;
        }
        debug_assert!(bool::from(mpn::lt(&r.0[..k], &self.n[..k])));
        r
    }

    /// Fixed-window exponentiation by a public exponent.
    fn pow(&self, a: &Scalar, exp: &[Limb; MAX_LIMBS]) -> Scalar {
        let mut table = [Scalar::ONE; 16];
        for i in 1..16 {
            table[i] = self.mul(&table[i - 1], a);
        }
        let mut acc = Scalar::ONE;
        let nibbles = self.limbs * (LIMB_BITS / 4);
        for i in (0..nibbles).rev() {
            for _ in 0..4 {
                acc = self.sqr(&acc);
            }
            let nib = ((exp[(i * 4) / LIMB_BITS] >> ((i * 4) % LIMB_BITS)) & 0xf) as usize;
            acc = self.mul(&acc, &table[nib]);
        }
        acc
    }

    /// Returns `a^-1 mod n`; zero maps to zero.
    pub fn invert(&self, a: &Scalar) -> Scalar {
        self.pow(a, &self.inv_exp)
    }

    /// Constant-time zero test.
    pub fn is_zero(&self, a: &Scalar) -> Choice {
        mpn::is_zero(&a.0)
    }

    /// Whether `a > n/2`.
    pub fn is_high(&self, a: &Scalar) -> Choice {
        mpn::lt(&self.nh[..self.limbs], &a.0[..self.limbs])
    }

    /// Returns `min(a, n - a)` along with the mask telling whether the
    /// negation was taken.
    pub fn minimize(&self, a: &Scalar) -> (Scalar, Choice) {
        let high = self.is_high(a);
        (self.cneg(a, high), high)
    }

    /// Decodes an exact-width big-endian scalar; fails on values `>= n` or
    /// a wrong length.
    pub fn import(&self, bytes: &[u8]) -> CtOption<Scalar> {
        if bytes.len() != self.size {
            return CtOption::new(Scalar::ZERO, Choice::from(0));
        }
        let mut s = Scalar::ZERO;
        mpn::from_be_bytes(&mut s.0[..self.limbs], bytes);
        let ok = mpn::lt(&s.0[..self.limbs], &self.n[..self.limbs]);
        CtOption::new(s, ok)
    }

    /// SEC1 bits2int conversion of a message digest of any length: keep the
    /// leftmost `bits` bits, then reduce once. Never fails.
    pub fn reduce_bytes(&self, bytes: &[u8]) -> Scalar {
        let mut s = Scalar::ZERO;
        let take = bytes.len().min(self.size);
        mpn::from_be_bytes(&mut s.0[..self.limbs], &bytes[..take]);
        let excess = (take * 8).saturating_sub(self.bits);
        mpn::shr(&mut s.0[..self.limbs], excess);

        let ge = !mpn::lt(&s.0[..self.limbs], &self.n[..self.limbs]);
        mpn::cond_sub(&mut s.0[..self.limbs], &self.n[..self.limbs], ge);
        s
    }

    /// bits2int conversion of a DRBG candidate of exactly `size` bytes,
    /// rejecting zero and out-of-range values instead of reducing them
    /// (RFC 6979 nonce acceptance rule).
    pub fn candidate(&self, bytes: &[u8]) -> CtOption<Scalar> {
        if bytes.len() != self.size {
            return CtOption::new(Scalar::ZERO, Choice::from(0));
        }
        let mut s = Scalar::ZERO;
        mpn::from_be_bytes(&mut s.0[..self.limbs], bytes);
        mpn::shr(&mut s.0[..self.limbs], self.size * 8 - self.bits);
        let ok = mpn::lt(&s.0[..self.limbs], &self.n[..self.limbs]) & !self.is_zero(&s);
        CtOption::new(s, ok)
    }

    /// Encodes the fixed-width big-endian form into `out`, which must be
    /// exactly [`ScalarField::size`] bytes.
    pub fn export(&self, a: &Scalar, out: &mut [u8]) {
        debug_assert_eq!(out.len(), self.size);
        mpn::to_be_bytes(out, &a.0[..self.limbs]);
    }

    /// Encodes the fixed-width big-endian form into an owned buffer.
    pub fn to_bytes(&self, a: &Scalar) -> ScalarBytes {
        let mut out = ScalarBytes {
            bytes: [0; crate::limb::MAX_BYTES],
            len: self.size,
        };
        self.export(a, &mut out.bytes[..self.size]);
        out
    }

    /// Samples a uniform nonzero scalar by rejection.
    pub fn random(&self, rng: &mut (impl CryptoRngCore + ?Sized)) -> Scalar {
        let mut bytes = zeroize::Zeroizing::new([0u8; crate::limb::MAX_BYTES]);
        loop {
            rng.fill_bytes(&mut bytes[..self.size]);
            if let Some(s) = Option::<Scalar>::from(self.candidate(&bytes[..self.size])) {
                return s;
            }
        }
    }

    /// Signed radix-16 recoding: `sum(out[i] * 16^i) == k` with digits in
    /// `[-8, 8]`. Constant-time. The caller must pick `windows` so that
    /// `k < 8 * 16^(windows - 1)`, leaving the top digit room for the final
    /// carry; full-width scalars use `bits/4 + 1` windows, GLV half-width
    /// scalars 33.
    pub(crate) fn recode_radix16(&self, k: &Scalar, windows: usize, out: &mut [i8]) {
        debug_assert!(windows <= out.len());
        for (i, d) in out.iter_mut().enumerate().take(windows) {
            *d = k.nibble(i) as i8;
        }
        for i in 0..windows - 1 {
            let carry = (out[i] + 8) >> 4;
            out[i] -= carry << 4;
            out[i + 1] += carry;
        }
        debug_assert!(out[windows - 1] <= 8);
    }

    /// Joint sparse form of `(k0, k1)`: matched signed-digit expansions in
    /// {-1, 0, 1} minimizing nonzero columns. Variable-time; used only on
    /// verification inputs. Returns the digit count.
    pub(crate) fn jsf(&self, k0: &Scalar, k1: &Scalar, d0: &mut [i8], d1: &mut [i8]) -> usize {
        let k = self.limbs;
        let mut n0 = k0.0;
        let mut n1 = k1.0;
        let mut c0 = 0i32;
        let mut c1 = 0i32;
        let mut j = 0;

        loop {
            let done0 = bool::from(mpn::is_zero(&n0[..k])) && c0 == 0;
            let done1 = bool::from(mpn::is_zero(&n1[..k])) && c1 == 0;
            if done0 && done1 {
                break;
            }

            let l0 = ((n0[0] & 7) as i32 + c0) & 7;
            let l1 = ((n1[0] & 7) as i32 + c1) & 7;

            let u0 = if l0 & 1 == 1 {
                let mut u = 2 - (l0 & 3);
                if (l0 == 3 || l0 == 5) && l1 & 3 == 2 {
                    u = -u;
                }
                u
            } else {
                0
            };
            let u1 = if l1 & 1 == 1 {
                let mut u = 2 - (l1 & 3);
                if (l1 == 3 || l1 == 5) && l0 & 3 == 2 {
                    u = -u;
                }
                u
            } else {
                0
            };

            if 2 * c0 == 1 + u0 {
                c0 = 1 - c0;
            }
            if 2 * c1 == 1 + u1 {
                c1 = 1 - c1;
            }

            d0[j] = u0 as i8;
            d1[j] = u1 as i8;
            j += 1;

            mpn::shr(&mut n0[..k], 1);
            mpn::shr(&mut n1[..k], 1);
        }
        j
    }
}

/// A fixed-capacity encoded scalar; the live prefix is the curve's scalar
/// width.
#[derive(Clone, Copy)]
pub struct ScalarBytes {
    bytes: [u8; crate::limb::MAX_BYTES],
    len: usize,
}

impl AsRef<[u8]> for ScalarBytes {
    fn as_ref(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl core::fmt::Debug for ScalarBytes {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ScalarBytes({:02x?})", self.as_ref())
    }
}

impl PartialEq for ScalarBytes {
    fn eq(&self, other: &Self) -> bool {
        self.as_ref() == other.as_ref()
    }
}

impl Eq for ScalarBytes {}

impl Zeroize for ScalarBytes {
    fn zeroize(&mut self) {
        self.bytes.zeroize();
    }
}

/// Digits of a full-width signed radix-16 recoding.
pub(crate) const MAX_RADIX16: usize = (crate::limb::MAX_BITS + 3) / 4 + 1;

/// Digits of a full-width joint sparse form.
pub(crate) const MAX_JSF: usize = crate::limb::MAX_BITS + 2;
