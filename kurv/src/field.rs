//! Prime-field arithmetic modulo a runtime curve prime.
//!
//! Elements live in Montgomery form inside fixed-capacity limb arrays; one
//! engine serves every supported prime. The [`Field`] descriptor is derived
//! at curve-context initialization from the published modulus alone: the
//! word inverse by Newton iteration, the Montgomery residues by a doubling
//! ladder, and the square-root strategy from the residue class of `p`.
//!
//! Every operation is constant-time with respect to element values. The only
//! data-dependent work happens on the public descriptor (limb counts, the
//! exponents of Fermat inversion, Tonelli–Shanks iteration counts), which is
//! fixed per curve.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};
use zeroize::Zeroize;

use crate::limb::{adc, inv_mod_limb, mac, Limb, LIMB_BITS, MAX_LIMBS};
use crate::mpn;

/// An element of GF(p), in Montgomery form.
///
/// The representation is canonical: limbs always hold a fully reduced value,
/// so constant-time equality can compare limbs directly.
#[derive(Clone, Copy, Debug, Default)]
pub struct FieldElement(pub(crate) [Limb; MAX_LIMBS]);

impl FieldElement {
    /// The additive identity (zero is its own Montgomery image).
    pub const ZERO: Self = Self([0; MAX_LIMBS]);
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut r = *a;
        mpn::conditional_assign(&mut r.0, &b.0, choice);
        r
    }
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &Self) -> Choice {
        mpn::eq(&self.0, &other.0)
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for FieldElement {}

impl Zeroize for FieldElement {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Square-root procedure selected by the residue class of `p`.
#[derive(Clone, Copy)]
enum SqrtStrategy {
    /// p ≡ 3 (mod 4): candidate root is `x^((p+1)/4)`.
    ThreeMod4 { exp: [Limb; MAX_LIMBS] },
    /// p ≡ 1 (mod 4): constant-time Tonelli–Shanks with `p - 1 = q · 2^s`.
    TonelliShanks {
        s: u32,
        q: [Limb; MAX_LIMBS],
        /// (q + 1) / 2
        q_half: [Limb; MAX_LIMBS],
        /// z^q for a fixed quadratic non-residue z.
        c: FieldElement,
    },
}

/// Arithmetic engine for GF(p).
#[derive(Clone, Copy)]
pub struct Field {
    limbs: usize,
    bits: usize,
    size: usize,
    p: [Limb; MAX_LIMBS],
    /// -p^-1 mod 2^LIMB_BITS
    n0: Limb,
    /// R mod p; the multiplicative identity.
    one: FieldElement,
    /// R^2 mod p; converts into Montgomery form.
    r2: FieldElement,
    /// p - 2; the Fermat inversion exponent.
    inv_exp: [Limb; MAX_LIMBS],
    sqrt: SqrtStrategy,
}

impl Field {
    /// Builds the engine from the big-endian modulus. `p` must be an odd
    /// prime of exactly `bits` bits and `ceil(bits/8)` bytes.
    pub fn new(p_bytes: &[u8], bits: usize) -> Self {
        let limbs = (bits + LIMB_BITS - 1) / LIMB_BITS;
        let size = (bits + 7) / 8;
        debug_assert_eq!(p_bytes.len(), size);

        let mut p = [0; MAX_LIMBS];
        mpn::from_be_bytes(&mut p[..limbs], p_bytes);
        debug_assert_eq!(p[0] & 1, 1);

        let n0 = inv_mod_limb(p[0]).wrapping_neg();

        let mut inv_exp = p;
        let two = [2 as Limb];
        let mut borrow = 0;
        {
            let (w, bw) = crate::limb::sbb(inv_exp[0], two[0], borrow);
            inv_exp[0] = w;
            borrow = bw;
            for l in inv_exp[1..limbs].iter_mut() {
                let (w, bw) = crate::limb::sbb(*l, 0, borrow);
                *l = w;
                borrow = bw;
            }
        }
        debug_assert_eq!(borrow, 0);

        let mut field = Field {
            limbs,
            bits,
            size,
            p,
            n0,
            one: FieldElement::ZERO,
            r2: FieldElement::ZERO,
            inv_exp,
            sqrt: SqrtStrategy::ThreeMod4 { exp: [0; MAX_LIMBS] },
        };

        // R mod p by doubling 1 for limbs*LIMB_BITS steps, then R^2 mod p by
        // doubling for as many again.
        let mut x = FieldElement::ZERO;
        x.0[0] = 1;
        field.reduce_once(&mut x.0, 0);
        for _ in 0..limbs * LIMB_BITS {
            x = field.add(&x, &x);
        }
        field.one = x;
        for _ in 0..limbs * LIMB_BITS {
            x = field.add(&x, &x);
        }
        field.r2 = x;

        field.sqrt = field.sqrt_strategy();
        field
    }

    /// Canonical byte width of an encoded element.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Bit length of the modulus.
    pub fn bits(&self) -> usize {
        self.bits
    }

    /// The multiplicative identity.
    pub fn one(&self) -> FieldElement {
        self.one
    }

    fn sqrt_strategy(&self) -> SqrtStrategy {
        if self.p[0] & 3 == 3 {
            // (p + 1) / 4
            let mut exp = self.p;
            let mut carry = 1 as Limb;
            for l in exp[..self.limbs].iter_mut() {
                let (w, c) = adc(*l, 0, carry);
                *l = w;
                carry = c;
            }
            debug_assert_eq!(carry, 0);
            mpn::shr(&mut exp[..self.limbs], 2);
            return SqrtStrategy::ThreeMod4 { exp };
        }

        // p - 1 = q * 2^s
        let mut pm1 = self.p;
        pm1[0] -= 1;
        let mut s = 0u32;
        while mpn::bit(&pm1[..self.limbs], s as usize) == 0 {
            s += 1;
        }
        let mut q = pm1;
        mpn::shr_vartime(&mut q[..self.limbs], s as usize);

        let mut q_half = q;
        let mut carry = 1 as Limb;
        for l in q_half[..self.limbs].iter_mut() {
            let (w, c) = adc(*l, 0, carry);
            *l = w;
            carry = c;
        }
        debug_assert_eq!(carry, 0);
        mpn::shr(&mut q_half[..self.limbs], 1);

        // Smallest quadratic non-residue by the Euler criterion. The search
        // is variable-time over the public modulus only.
        let minus_one = self.neg(&self.one);
        let mut half = pm1;
        mpn::shr(&mut half[..self.limbs], 1);
        let mut candidate = 2u32;
        let c = loop {
            let mut cand = FieldElement::ZERO;
            cand.0[0] = candidate as Limb;
            let cand = self.to_mont_raw(&cand.0);
            if self.pow(&cand, &half) == minus_one {
                break self.pow(&cand, &q);
            }
            candidate += 1;
        };

        SqrtStrategy::TonelliShanks { s, q, q_half, c }
    }

    /// Subtracts `p` once when `extra * 2^kw + r >= p`, with `extra` in
    /// {0, 1}.
    fn reduce_once(&self, r: &mut [Limb; MAX_LIMBS], extra: Limb) {
        let k = self.limbs;
        let mut d = [0; MAX_LIMBS];
        let borrow = mpn::sub(&mut d[..k], &r[..k], &self.p[..k]);
        let take = Choice::from((extra & 1) as u8) | !Choice::from((borrow & 1) as u8);
        mpn::conditional_assign(&mut r[..k], &d[..k], take);
    }

    /// Word-by-word Montgomery product (CIOS). Inputs reduced, output
    /// reduced.
    fn mont_mul(&self, a: &[Limb; MAX_LIMBS], b: &[Limb; MAX_LIMBS]) -> [Limb; MAX_LIMBS] {
        let k = self.limbs;
        let mut t = [0 as Limb; MAX_LIMBS + 2];

        for i in 0..k {
            let bi = b[i];
            let mut carry = 0;
            for j in 0..k {
                let (lo, hi) = mac(t[j], a[j], bi, carry);
                t[j] = lo;
                carry = hi;
            }
            let (s, c2) = adc(t[k], carry, 0);
            t[k] = s;
            t[k + 1] = c2;

            let m = t[0].wrapping_mul(self.n0);
            let (_, mut carry) = mac(t[0], m, self.p[0], 0);
            for j in 1..k {
                let (lo, hi) = mac(t[j], m, self.p[j], carry);
                t[j - 1] = lo;
                carry = hi;
            }
            let (s, c2) = adc(t[k], carry, 0);
            t[k - 1] = s;
            t[k] = t[k + 1] + c2;
        }

        let mut r = [0; MAX_LIMBS];
        r[..k].copy_from_slice(&t[..k]);
        self.reduce_once(&mut r, t[k]);
        r
    }

    fn to_mont_raw(&self, a: &[Limb; MAX_LIMBS]) -> FieldElement {
        FieldElement(self.mont_mul(a, &self.r2.0))
    }

    /// Leaves Montgomery form, yielding canonical little-endian limbs.
    pub(crate) fn canonical(&self, a: &FieldElement) -> [Limb; MAX_LIMBS] {
        let mut unit = [0; MAX_LIMBS];
        unit[0] = 1;
        self.mont_mul(&a.0, &unit)
    }

    /// Returns `a + b mod p`.
    pub fn add(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        let k = self.limbs;
        let mut r = FieldElement::ZERO;
        let carry = mpn::add(&mut r.0[..k], &a.0[..k], &b.0[..k]);
        self.reduce_once(&mut r.0, carry);
        r
    }

    /// Returns `a - b mod p`.
    pub fn sub(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        let k = self.limbs;
        let mut r = FieldElement::ZERO;
        let borrow = mpn::sub(&mut r.0[..k], &a.0[..k], &b.0[..k]);
        mpn::cond_add(&mut r.0[..k], &self.p[..k], Choice::from((borrow & 1) as u8));
        r
    }

    /// Returns `-a mod p`.
    pub fn neg(&self, a: &FieldElement) -> FieldElement {
        let k = self.limbs;
        let mut r = FieldElement::ZERO;
        mpn::sub(&mut r.0[..k], &self.p[..k], &a.0[..k]);
        // p - 0 must stay 0.
        let zero = self.is_zero(a);
        FieldElement::conditional_select(&r, &FieldElement::ZERO, zero)
    }

    /// Negates when `flag` is set.
    pub fn cneg(&self, a: &FieldElement, flag: Choice) -> FieldElement {
        let n = self.neg(a);
        FieldElement::conditional_select(a, &n, flag)
    }

    /// Returns `a * b mod p`.
    pub fn mul(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        FieldElement(self.mont_mul(&a.0, &b.0))
    }

    /// Returns `a^2 mod p`.
    pub fn sqr(&self, a: &FieldElement) -> FieldElement {
        self.mul(a, a)
    }

    /// Multiplies by a small public constant via a double-and-add chain.
    pub fn small_mul(&self, a: &FieldElement, w: u32) -> FieldElement {
        debug_assert!(w > 0);
        let mut acc = FieldElement::ZERO;
        for i in (0..32 - w.leading_zeros()).rev() {
            acc = self.add(&acc, &acc);
            if (w >> i) & 1 == 1 {
                acc = self.add(&acc, a);
            }
        }
        acc
    }

    /// Fixed-window exponentiation by a public `limbs`-sized exponent.
    pub(crate) fn pow(&self, a: &FieldElement, exp: &[Limb; MAX_LIMBS]) -> FieldElement {
        let mut table = [self.one; 16];
        for i in 1..16 {
            table[i] = self.mul(&table[i - 1], a);
        }
        let mut acc = self.one;
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

    /// Returns `a^-1 mod p` by Fermat's little theorem; zero maps to zero.
    pub fn invert(&self, a: &FieldElement) -> FieldElement {
        self.pow(a, &self.inv_exp)
    }

    /// Returns a square root candidate together with a mask telling whether
    /// the input was a quadratic residue. The root's sign is unspecified;
    /// callers normalize parity with [`Field::cneg`].
    pub fn sqrt(&self, a: &FieldElement) -> (FieldElement, Choice) {
        let root = match &self.sqrt {
            SqrtStrategy::ThreeMod4 { exp } => self.pow(a, exp),
            SqrtStrategy::TonelliShanks { s, q, q_half, c } => {
                let minus_one = self.neg(&self.one);
                let mut cc = *c;
                let mut t = self.pow(a, q);
                let mut r = self.pow(a, q_half);
                for i in (1..*s).rev() {
                    let mut d = t;
                    for _ in 0..i - 1 {
                        d = self.sqr(&d);
                    }
                    let flip = d.ct_eq(&minus_one);
                    let rc = self.mul(&r, &cc);
                    r = FieldElement::conditional_select(&r, &rc, flip);
                    let c2 = self.sqr(&cc);
                    let tc = self.mul(&t, &c2);
                    t = FieldElement::conditional_select(&t, &tc, flip);
                    cc = c2;
                }
                r
            }
        };
        let is_square = self.sqr(&root).ct_eq(a);
        (root, is_square)
    }

    /// Returns `sqrt(u / v)` with the residue mask of the quotient.
    pub fn isqrt(&self, u: &FieldElement, v: &FieldElement) -> (FieldElement, Choice) {
        let vi = self.invert(v);
        let x = self.mul(u, &vi);
        self.sqrt(&x)
    }

    /// Constant-time zero test.
    pub fn is_zero(&self, a: &FieldElement) -> Choice {
        mpn::is_zero(&a.0)
    }

    /// Parity of the canonical representative.
    pub fn is_odd(&self, a: &FieldElement) -> Choice {
        let c = self.canonical(a);
        Choice::from((c[0] & 1) as u8)
    }

    /// Decodes a fully reduced big-endian representative; fails on values
    /// `>= p` or on a wrong length.
    pub fn from_bytes(&self, bytes: &[u8]) -> CtOption<FieldElement> {
        if bytes.len() != self.size {
            return CtOption::new(FieldElement::ZERO, Choice::from(0));
        }
        let mut l = [0; MAX_LIMBS];
        mpn::from_be_bytes(&mut l[..self.limbs], bytes);
        let ok = mpn::lt(&l[..self.limbs], &self.p[..self.limbs]);
        CtOption::new(self.to_mont_raw(&l), ok)
    }

    /// Encodes the canonical big-endian representative into `out`, which
    /// must be exactly [`Field::size`] bytes.
    pub fn to_bytes(&self, a: &FieldElement, out: &mut [u8]) {
        debug_assert_eq!(out.len(), self.size);
        let c = self.canonical(a);
        mpn::to_be_bytes(out, &c[..self.limbs]);
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use proptest::prelude::*;
    use subtle::ConstantTimeEq;

    use super::{Field, FieldElement};

    fn p256() -> Field {
        Field::new(
            &hex!("ffffffff00000001000000000000000000000000ffffffffffffffffffffffff"),
            256,
        )
    }

    fn p224() -> Field {
        Field::new(&hex!("ffffffffffffffffffffffffffffffff000000000000000000000001"), 224)
    }

    fn fe(field: &Field, n: u64) -> FieldElement {
        let mut bytes = [0u8; 66];
        let size = field.size();
        bytes[size - 8..size].copy_from_slice(&n.to_be_bytes());
        field.from_bytes(&bytes[..size]).unwrap()
    }

    #[test]
    fn identities() {
        let f = p256();
        let one = f.one();
        assert_eq!(f.mul(&one, &one), one);
        assert_eq!(f.add(&FieldElement::ZERO, &one), one);
        assert_eq!(f.sub(&one, &one), FieldElement::ZERO);
        assert_eq!(fe(&f, 1), one);
    }

    #[test]
    fn inversion() {
        let f = p256();
        for n in [1u64, 2, 3, 0xdeadbeef, u64::MAX] {
            let a = fe(&f, n);
            let ai = f.invert(&a);
            assert_eq!(f.mul(&a, &ai), f.one());
        }
        assert_eq!(f.invert(&FieldElement::ZERO), FieldElement::ZERO);
    }

    #[test]
    fn square_roots_three_mod_four() {
        let f = p256();
        for n in [2u64, 3, 5, 9, 1 << 62] {
            let a = fe(&f, n);
            let sq = f.sqr(&a);
            let (r, ok) = f.sqrt(&sq);
            assert!(bool::from(ok));
            assert_eq!(f.sqr(&r), sq);
        }
    }

    #[test]
    fn square_roots_tonelli_shanks() {
        // P-224 is 1 mod 4 and exercises the s = 96 path.
        let f = p224();
        for n in [2u64, 7, 11, 1234567] {
            let a = fe(&f, n);
            let sq = f.sqr(&a);
            let (r, ok) = f.sqrt(&sq);
            assert!(bool::from(ok));
            assert_eq!(f.sqr(&r), sq);
        }
    }

    #[test]
    fn nonresidue_detected() {
        let f = p256();
        // -1 is a non-residue mod a 3-mod-4 prime.
        let m1 = f.neg(&f.one());
        let (_, ok) = f.sqrt(&m1);
        assert!(!bool::from(ok));
    }

    #[test]
    fn byte_round_trip() {
        let f = p256();
        let a = fe(&f, 0x0123456789abcdef);
        let mut out = [0u8; 32];
        f.to_bytes(&a, &mut out);
        let b = f.from_bytes(&out).unwrap();
        assert!(bool::from(a.ct_eq(&b)));
    }

    #[test]
    fn rejects_modulus() {
        let f = p256();
        let mut bytes = [0u8; 32];
        f.to_bytes(&f.neg(&f.one()), &mut bytes); // p - 1 decodes
        assert!(bool::from(f.from_bytes(&bytes).is_some()));
        let p = hex!("ffffffff00000001000000000000000000000000ffffffffffffffffffffffff");
        assert!(bool::from(f.from_bytes(&p).is_none()));
    }

    proptest! {
        #[test]
        fn add_then_sub(a in any::<u64>(), b in any::<u64>()) {
            let f = p256();
            let x = fe(&f, a);
            let y = fe(&f, b);
            prop_assert_eq!(f.sub(&f.add(&x, &y), &y), x);
        }

        #[test]
        fn mul_matches_small_products(a in 1u32..1000, b in 1u32..1000) {
            let f = p256();
            let x = fe(&f, a as u64);
            let y = fe(&f, b as u64);
            prop_assert_eq!(f.mul(&x, &y), fe(&f, (a as u64) * (b as u64)));
        }
    }
}
