//! Portable constant-time elliptic curve arithmetic.
//!
//! This crate implements the arithmetic core shared by the `kurv-ecdsa`
//! and `kurv-ed25519` signature crates: fixed-width multi-precision limb
//! routines, Montgomery prime fields and Barrett scalar fields derived at
//! runtime from published curve parameters, the short Weierstrass group
//! law in affine/Jacobian coordinates ([`wei`]), the twisted Edwards group
//! law in affine/extended coordinates ([`edwards`]), and fixed-base comb /
//! variable-base window / joint-sparse-form scalar multiplication.
//!
//! Supported curves: NIST P-224, P-256, P-384, P-521, secp256k1 (with GLV
//! endomorphism acceleration), and Ed25519.
//!
//! ## Constant-time contract
//!
//! Outside of the explicitly variable-time entry points (`*_var`, meant
//! for verification inputs, which are public), no operation branches on
//! secret data or indexes memory by it: comparisons travel as
//! [`subtle::Choice`], table lookups scan every entry under a mask, and
//! loop bounds derive only from public per-curve parameters.
//!
//! ## Usage
//!
//! ```
//! use kurv::wei::{Curve, P256};
//!
//! let curve = Curve::new(&P256);
//! let g = curve.generator();
//! assert!(bool::from(curve.affine_validate(&g)));
//! ```

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

#[cfg(test)]
extern crate std;

pub mod edwards;
pub mod field;
mod limb;
mod mpn;
pub mod scalar;
pub mod wei;

pub use limb::{Limb, LIMB_BITS, MAX_BYTES};

// Re-export the crates whose types appear in this API.
pub use rand_core;
pub use subtle;
pub use zeroize;
