//! Static parameters for the supported short Weierstrass curves.
//!
//! All values are the published SEC2/FIPS constants in big-endian form. The
//! secp256k1 entry additionally carries the GLV endomorphism constants from
//! libsecp256k1: `lambda * (x, y) = (beta * x, y)`, and the lattice basis
//! used to decompose scalars into half-width pairs.

use hex_literal::hex;

use super::{CurveKind, CurveParams, EndoParams, NonceDigest};

/// NIST P-224 / secp224r1.
pub static P224: CurveParams = CurveParams {
    id: "P-224",
    bits: 224,
    p: &hex!("ffffffffffffffffffffffffffffffff000000000000000000000001"),
    n: &hex!("ffffffffffffffffffffffffffff16a2e0b8f03e13dd29455c5c2a3d"),
    a: &hex!("fffffffffffffffffffffffffffffffefffffffffffffffffffffffe"),
    b: &hex!("b4050a850c04b3abf54132565044b0b7d7bfd8ba270b39432355ffb4"),
    gx: &hex!("b70e0cbd6bb4bf7f321390b94a03c1d356c21122343280d6115c1d21"),
    gy: &hex!("bd376388b5f723fb4c22dfe6cd4375a05a07476444d5819985007e34"),
    kind: CurveKind::MinusThree,
    digest: NonceDigest::Sha256,
    endo: None,
};

/// NIST P-256 / secp256r1.
pub static P256: CurveParams = CurveParams {
    id: "P-256",
    bits: 256,
    p: &hex!("ffffffff00000001000000000000000000000000ffffffffffffffffffffffff"),
    n: &hex!("ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551"),
    a: &hex!("ffffffff00000001000000000000000000000000fffffffffffffffffffffffc"),
    b: &hex!("5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b"),
    gx: &hex!("6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296"),
    gy: &hex!("4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5"),
    kind: CurveKind::MinusThree,
    digest: NonceDigest::Sha256,
    endo: None,
};

/// NIST P-384 / secp384r1.
pub static P384: CurveParams = CurveParams {
    id: "P-384",
    bits: 384,
    p: &hex!(
        "fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffe"
        "ffffffff0000000000000000ffffffff"
    ),
    n: &hex!(
        "ffffffffffffffffffffffffffffffffffffffffffffffffc7634d81f4372ddf"
        "581a0db248b0a77aecec196accc52973"
    ),
    a: &hex!(
        "fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffe"
        "ffffffff0000000000000000fffffffc"
    ),
    b: &hex!(
        "b3312fa7e23ee7e4988e056be3f82d19181d9c6efe8141120314088f5013875a"
        "c656398d8a2ed19d2a85c8edd3ec2aef"
    ),
    gx: &hex!(
        "aa87ca22be8b05378eb1c71ef320ad746e1d3b628ba79b9859f741e082542a38"
        "5502f25dbf55296c3a545e3872760ab7"
    ),
    gy: &hex!(
        "3617de4a96262c6f5d9e98bf9292dc29f8f41dbd289a147ce9da3113b5f0b8c0"
        "0a60b1ce1d7e819d7a431d7c90ea0e5f"
    ),
    kind: CurveKind::MinusThree,
    digest: NonceDigest::Sha384,
    endo: None,
};

/// NIST P-521 / secp521r1.
pub static P521: CurveParams = CurveParams {
    id: "P-521",
    bits: 521,
    p: &hex!(
        "01ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
        "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
        "ffff"
    ),
    n: &hex!(
        "01fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffa"
        "51868783bf2f966b7fcc0148f709a5d03bb5c9b8899c47aebb6fb71e91386409"
    ),
    a: &hex!(
        "01ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
        "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
        "fffc"
    ),
    b: &hex!(
        "0051953eb9618e1c9a1f929a21a0b68540eea2da725b99b315f3b8b489918ef1"
        "09e156193951ec7e937b1652c0bd3bb1bf073573df883d2c34f1ef451fd46b50"
        "3f00"
    ),
    gx: &hex!(
        "00c6858e06b70404e9cd9e3ecb662395b4429c648139053fb521f828af606b4d"
        "3dbaa14b5e77efe75928fe1dc127a2ffa8de3348b3c1856a429bf97e7e31c2e5"
        "bd66"
    ),
    gy: &hex!(
        "011839296a789a3bc0045c8a5fb42c7d1bd998f54449579b446817afbd17273e"
        "662c97ee72995ef42640c550b9013fad0761353c7086a272c24088be94769fd1"
        "6650"
    ),
    kind: CurveKind::MinusThree,
    digest: NonceDigest::Sha512,
    endo: None,
};

/// secp256k1, with the GLV endomorphism enabled.
pub static SECP256K1: CurveParams = CurveParams {
    id: "secp256k1",
    bits: 256,
    p: &hex!("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f"),
    n: &hex!("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141"),
    a: &hex!("0000000000000000000000000000000000000000000000000000000000000000"),
    b: &hex!("0000000000000000000000000000000000000000000000000000000000000007"),
    gx: &hex!("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"),
    gy: &hex!("483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"),
    kind: CurveKind::Zero,
    digest: NonceDigest::Sha256,
    endo: Some(EndoParams {
        beta: &hex!("7ae96a2b657c07106e64479eac3434e99cf0497512f58995c1396c28719501ee"),
        minus_lambda: &hex!("ac9c52b33fa3cf1f5ad9e3fd77ed9ba4a880b9fc8ec739c2e0cfc810b51283cf"),
        minus_b1: &hex!("00000000000000000000000000000000e4437ed6010e88286f547fa90abfe4c3"),
        minus_b2: &hex!("fffffffffffffffffffffffffffffffe8a280ac50774346dd765cda83db1562c"),
        g1: &hex!("00000000000000000000000000003086d221a7d46bcde86c90e49284eb153dab"),
        g2: &hex!("0000000000000000000000000000e4437ed6010e88286f547fa90abfe4c42212"),
    }),
};
