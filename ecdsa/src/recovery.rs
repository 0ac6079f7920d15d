//! Recovery identifiers for recoverable signatures.

use crate::{Error, Result};

/// Two bits of side information captured while signing that let a
/// verifier rebuild the ephemeral point `R` — and from it the public key —
/// out of a signature's `r` component.
///
/// The first flag records the parity of `y(R)`, disambiguating the two
/// square roots during decompression. The second records whether `x(R)`
/// exceeded the group order and was reduced when `r` was formed; that can
/// only happen in the narrow band between `n` and `p`, so identifiers 2
/// and 3 are astronomically rare on the supported curves (and unreachable
/// on P-521).
///
/// On the wire the identifier is a byte in `0..=3`, low bit = parity,
/// high bit = reduction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RecoveryId {
    y_odd: bool,
    x_reduced: bool,
}

impl RecoveryId {
    /// Largest valid byte encoding (inclusive).
    pub const MAX: u8 = 3;

    /// Assembles an identifier from the parity of `y(R)` and the
    /// x-reduction flag.
    pub const fn new(is_y_odd: bool, is_x_reduced: bool) -> Self {
        RecoveryId {
            y_odd: is_y_odd,
            x_reduced: is_x_reduced,
        }
    }

    /// Whether the affine y-coordinate of the ephemeral point was odd.
    pub const fn is_y_odd(self) -> bool {
        self.y_odd
    }

    /// Whether the affine x-coordinate was reduced modulo the order.
    pub const fn is_x_reduced(self) -> bool {
        self.x_reduced
    }

    /// Parses the byte encoding; values above [`RecoveryId::MAX`] are
    /// meaningless and rejected.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        if byte > Self::MAX {
            return None;
        }
        Some(RecoveryId {
            y_odd: byte & 1 != 0,
            x_reduced: byte & 2 != 0,
        })
    }

    /// The byte encoding.
    pub const fn to_byte(self) -> u8 {
        self.y_odd as u8 | (self.x_reduced as u8) << 1
    }
}

impl TryFrom<u8> for RecoveryId {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self> {
        Self::from_byte(byte).ok_or_else(Error::new)
    }
}

impl From<RecoveryId> for u8 {
    fn from(id: RecoveryId) -> u8 {
        id.to_byte()
    }
}

#[cfg(test)]
mod tests {
    use kurv::wei::{Curve, P256};

    use super::RecoveryId;

    #[test]
    fn byte_encoding_round_trips() {
        for byte in 0u8..=RecoveryId::MAX {
            let id = RecoveryId::from_byte(byte).unwrap();
            assert_eq!(id.to_byte(), byte);
            assert_eq!(u8::from(id), byte);
            assert_eq!(id.is_y_odd(), byte & 1 != 0);
            assert_eq!(id.is_x_reduced(), byte & 2 != 0);
            assert_eq!(id, RecoveryId::new(byte & 1 != 0, byte & 2 != 0));
        }
        for byte in RecoveryId::MAX + 1..=u8::MAX {
            assert!(RecoveryId::from_byte(byte).is_none());
            assert!(RecoveryId::try_from(byte).is_err());
        }
    }

    #[test]
    fn selects_the_ephemeral_point() {
        // Reconstructing R from (r, id) finds the generator again when the
        // id captures its y parity, and its negation when flipped.
        let curve = Curve::new(&P256);
        let g = curve.generator();
        let (r, reduced) = curve.x_mod_n(&g);
        assert!(!bool::from(reduced));

        let id = RecoveryId::new(bool::from(curve.is_y_odd(&g)), false);
        let point = curve
            .point_from_r(&r, id.is_x_reduced(), id.is_y_odd())
            .unwrap();
        assert!(bool::from(curve.affine_equal(&point, &g)));

        let flipped = RecoveryId::new(!id.is_y_odd(), id.is_x_reduced());
        let point = curve
            .point_from_r(&r, flipped.is_x_reduced(), flipped.is_y_odd())
            .unwrap();
        assert!(bool::from(curve.affine_equal(&point, &curve.affine_neg(&g))));
    }
}
