//! RFC 8032 test vectors and strictness checks for Ed25519.

use hex_literal::hex;
use kurv::edwards::{Curve, ED25519};
use kurv_ed25519::{Signature, SigningKey, VerifyingKey};
use rand_core::{OsRng, RngCore};

fn check_vector(seed: &[u8; 32], public: &[u8; 32], msg: &[u8], sig: &[u8; 64]) {
    let mut curve = Curve::new(&ED25519);
    curve.randomize(&mut OsRng);

    let key = SigningKey::from_bytes(&curve, seed);
    assert_eq!(key.verifying_key().to_bytes(), *public);

    let signature = key.sign(msg);
    assert_eq!(signature.to_bytes(), *sig);

    let vk = VerifyingKey::from_bytes(&curve, public).unwrap();
    vk.verify(msg, &signature).unwrap();
    vk.verify(msg, &Signature::from_bytes(sig)).unwrap();
}

#[test]
fn rfc8032_test_1() {
    check_vector(
        &hex!("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60"),
        &hex!("d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a"),
        b"",
        &hex!(
            "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e06522490155"
            "5fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b"
        ),
    );
}

#[test]
fn rfc8032_test_2() {
    check_vector(
        &hex!("4ccd089b28ff96da9db6c346ec114e0f5b8a319f35aba624da8cf6ed4fb8a6fb"),
        &hex!("3d4017c3e843895a92b70aa74d1b7ebc9c982ccf2ec4968cc0cd55f12af4660c"),
        &hex!("72"),
        &hex!(
            "92a009a9f0d4cab8720e820b5f642540a2b27b5416503f8fb3762223ebdb69da"
            "085ac1e43e15996e458f3613d0f11d8c387b2eaeb4302aeeb00d291612bb0c00"
        ),
    );
}

#[test]
fn rfc8032_test_3() {
    check_vector(
        &hex!("c5aa8df43f9f837bedb7442f31dcb7b166d38535076f094b85ce3a2e0b4458f7"),
        &hex!("fc51cd8e6218a1a38da47ed00230f0580816ed13ba3303ac5deb911548908025"),
        &hex!("af82"),
        &hex!(
            "6291d657deec24024827e69c3abe01a30ce548a284743a445e3680d7db5ac3ac"
            "18ff9b538d16f290ae67f760984dc6594a7c15e9716ed28dc027beceea1ec40a"
        ),
    );
}

#[test]
fn reference_vector() {
    check_vector(
        &hex!("d74c0153c5cdf48b7b3e602c2e4b36af2be662e6d783845fc4960f16250d23be"),
        &hex!("750dcf38c4579c65ea16160c51c6422d72763e697fd86d095e91733b1aab4b7e"),
        &hex!("9d89d6bd578361a99f018b2348ed97f1dd06d179e7e1a2baee59560abe54af06"),
        &hex!(
            "e233f6440e5a88c8dc206bfb5ee24197292b89396b26390a4257067001575a06"
            "61955a70d9144f929efd0ff52012a87489e10595450976 2d82b269ec82527b08"
        ),
    );
}

#[test]
fn rejects_unreduced_s() {
    let curve = Curve::new(&ED25519);
    let seed = [7u8; 32];
    let key = SigningKey::from_bytes(&curve, &seed);
    let vk = key.verifying_key();
    let sig = key.sign(b"test");

    // Replace s with the group order (the smallest unreduced value).
    let mut forged = sig.to_bytes();
    forged[32..]
        .copy_from_slice(&hex!("edd3f55c1a631258d69cf7a2def9de1400000000000000000000000000000010"));
    assert!(vk.verify(b"test", &Signature::from_bytes(&forged)).is_err());

    // s >= 2^253 is likewise out of range.
    let mut forged = sig.to_bytes();
    forged[63] |= 0xf0;
    assert!(vk.verify(b"test", &Signature::from_bytes(&forged)).is_err());
}

#[test]
fn rejects_non_canonical_r_and_keys() {
    let curve = Curve::new(&ED25519);
    let key = SigningKey::from_bytes(&curve, &[9u8; 32]);
    let vk = key.verifying_key();
    let sig = key.sign(b"test");

    // R = encoding of p (non-canonical y) must fail to decode.
    let mut forged = sig.to_bytes();
    forged[..32]
        .copy_from_slice(&hex!("edffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f"));
    assert!(vk.verify(b"test", &Signature::from_bytes(&forged)).is_err());

    // Same rule for public keys.
    let bad_pk = hex!("edffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f");
    assert!(VerifyingKey::from_bytes(&curve, &bad_pk).is_err());
}

#[test]
fn randomized_sign_verify_bitflips() {
    let mut curve = Curve::new(&ED25519);
    curve.randomize(&mut OsRng);

    for _ in 0..4 {
        let mut seed = [0u8; 32];
        OsRng.fill_bytes(&mut seed);
        let mut msg = [0u8; 32];
        OsRng.fill_bytes(&mut msg);

        let key = SigningKey::from_bytes(&curve, &seed);
        let vk = key.verifying_key();
        let sig = key.sign(&msg);
        vk.verify(&msg, &sig).unwrap();

        let bit = (OsRng.next_u32() as usize) % 256;

        let mut bad = msg;
        bad[bit / 8] ^= 1 << (bit % 8);
        assert!(vk.verify(&bad, &sig).is_err());

        for half in [0, 32] {
            let mut bad = sig.to_bytes();
            bad[half + bit / 8] ^= 1 << (bit % 8);
            assert!(vk.verify(&msg, &Signature::from_bytes(&bad)).is_err());
        }

        let mut bad_pk = vk.to_bytes();
        bad_pk[bit / 8] ^= 1 << (bit % 8);
        match VerifyingKey::from_bytes(&curve, &bad_pk) {
            Ok(bad_vk) => assert!(bad_vk.verify(&msg, &sig).is_err()),
            Err(_) => {}
        }
    }
}

#[test]
fn keys_round_trip() {
    let curve = Curve::new(&ED25519);
    let seed = hex!("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60");
    let key = SigningKey::from_bytes(&curve, &seed);
    assert_eq!(key.to_bytes(), seed);

    let vk = VerifyingKey::from_bytes(&curve, &key.verifying_key().to_bytes()).unwrap();
    assert_eq!(vk, key.verifying_key());
}
