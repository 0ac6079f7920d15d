//! End-to-end ECDSA vectors for every supported curve: deterministic
//! signatures, public keys, verification, and recovery, byte for byte.

use hex_literal::hex;
use kurv::wei::{Curve, CurveParams, P224, P256, P384, P521, SECP256K1};
use kurv_ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use rand_core::{OsRng, RngCore};

struct Vector {
    params: &'static CurveParams,
    priv_bytes: &'static [u8],
    pub_bytes: &'static [u8],
    msg: &'static [u8],
    sig: &'static [u8],
    recovery_id: u8,
}

fn check_vector(v: &Vector) {
    let mut curve = Curve::new(v.params);
    curve.randomize(&mut OsRng);

    let key = SigningKey::from_bytes(&curve, v.priv_bytes).unwrap();
    let (sig, id) = key.sign_prehash(v.msg).unwrap();
    assert_eq!(sig.to_bytes(&curve).as_ref(), v.sig, "{} signature", curve.id());
    assert_eq!(id, RecoveryId::try_from(v.recovery_id).unwrap(), "{} recovery id", curve.id());

    let vk = key.verifying_key();
    assert_eq!(vk.to_sec1_bytes(true).as_ref(), v.pub_bytes, "{} pubkey", curve.id());

    let vk2 = VerifyingKey::from_sec1_bytes(&curve, v.pub_bytes).unwrap();
    vk2.verify_prehash(v.msg, &sig).unwrap();

    let parsed = Signature::from_bytes(&curve, v.sig).unwrap();
    vk2.verify_prehash(v.msg, &parsed).unwrap();

    let recovered = VerifyingKey::recover_from_prehash(&curve, v.msg, &parsed, id).unwrap();
    assert_eq!(recovered, vk2, "{} recovery", curve.id());
    assert_eq!(vk2.trial_recovery_from_prehash(v.msg, &parsed).unwrap(), id);
}

#[test]
fn p224_vector() {
    check_vector(&Vector {
        params: &P224,
        priv_bytes: &hex!("03184cae2f684828fbe684685ebeade42e81621ac3e9def7b674d24c"),
        pub_bytes: &hex!("03cfef229d703e5c4539473d854e15668a1f8a5e95e6c5244b134c09dd"),
        msg: &hex!("0d768cad891306be8ab97d1d92122df498a225f6cb986ae848d84d10b0150bec"),
        sig: &hex!(
            "119455810efe95fe3798568cf1b353cd6199ecc2d040b0bf73d3213943532e35"
            "121ee0ed1768779f85e0cb011a6c320299afe4f51581ccfa"
        ),
        recovery_id: 0,
    });
}

#[test]
fn p256_vector() {
    check_vector(&Vector {
        params: &P256,
        priv_bytes: &hex!("43f729cc1d9494feb28c1e1d36dbcddfdcd717988d51da888feabc9e55e171b8"),
        pub_bytes: &hex!("03802b0dc263d91bc5831b9efcc2b50e5bb5d902bd67a404f7b752db3eedeb39bf"),
        msg: &hex!("51890598bff4a6468635e8d1903edc7e9bf4eba756e97f3ca01a2ca9365404ae"),
        sig: &hex!(
            "f5b08560d4c67b9da2e5da5322101c9644386d7ec8d68fc64ab5fec65466f95e"
            "333e7d9c7cf2635e72497dcfffcb3896a2561020ee5642994511437500 0d96c5"
        ),
        recovery_id: 1,
    });
}

#[test]
fn p384_vector() {
    check_vector(&Vector {
        params: &P384,
        priv_bytes: &hex!(
            "914fead324c196e213213b2b95b3968046 8ee9b10d56335f4704e6f7df2a54ca"
            "18e1de2ecfa8924c61b5614f410963fa"
        ),
        pub_bytes: &hex!(
            "0215d60babdbea58e19a84bf5e3a6bbfb4626ad91bb5d3924bc6386eb710667b"
            "0ffb683e004563e538158d0d58bfb12097"
        ),
        msg: &hex!(
            "44f046cf4181d901ffd39cce82ff05c7fd7bf9833558b76846c554a67329f40e"
            "6593e2d91cc80771498f77173acbf5f6"
        ),
        sig: &hex!(
            "562f6a5dbc58a9d5a0e3e010ff8e84f6e8d70c633e90498e32d2ce6e669a0503"
            "cd11f9de8d8c0488cadc9c36dd3015c56bd9ede836a8c7f5bf03efc0cdc45302"
            "2882b916306eb261e1dd547ad53a34081ea678d5184fb79509f03157d1ac4906"
        ),
        recovery_id: 1,
    });
}

#[test]
fn p521_vector() {
    check_vector(&Vector {
        params: &P521,
        priv_bytes: &hex!(
            "0031703d9434b12afc32b5512339a2c785b6b6ff22f4a1dd04e8e0c2fc628d9d"
            "9b41fc7c28f4fb4225f132bd6f92dcb6c05643c3d49c06b2d26d15be0be06a15"
            "7778"
        ),
        pub_bytes: &hex!(
            "030007302949b5e2962ff211cf4723492a34ced71a1bc0ed342151dcf1b8e1a1"
            "9c6b66f2cd54be406242b25450 22f341844c33847ab0387ea23a005d41a0e56a"
            "937a50"
        ),
        msg: &hex!(
            "5dedf58de6015e542ad1806e47692d8648af84311058374d46d912a1e5a32062"
            "0be4eac88ccc52a7aa17d4653754a4e3b4922ee928b8fb7e2f55d4d51586aec6"
        ),
        sig: &hex!(
            "01488eb18e717ece215ab90261b7aa5a1c042e5c0b02249e91af87104e14c967"
            "b8f05c70f000d8e1dce4f23514d94aeffb2ac8275e036e556bf8fee94bb5cf39"
            "b8d80094f00126b6129eb1ca5819d60fcb347b4402be210e6e5271bed613b651"
            "98b07983730fe54c176dd21e2398b5d166c14071a4425087dca9b5e20e8dd73d"
            "3ae1e217"
        ),
        recovery_id: 0,
    });
}

#[test]
fn secp256k1_vector() {
    check_vector(&Vector {
        params: &SECP256K1,
        priv_bytes: &hex!("cc524c2fe62cc8b820bc830890bedd623d3a836dce22517023bcda4f1c5c756e"),
        pub_bytes: &hex!("0203cad7f301acf0bb102bc7e680dcb074003ffda0a6be696ad0cf129b87576cd0"),
        msg: &hex!("fa09ee3d85c4938e098fbbf6a4f761a0537e465f610b7873fb264306c37b336c"),
        sig: &hex!(
            "83ecd1ab7c388dc9f0957ae39e9c40df99f830300425ead6659f1acdedbec9e6"
            "1778974e168da0cd64d0f8963148ecbc7fa7325c5a8f1b9b3aa0eacf74568c1a"
        ),
        recovery_id: 0,
    });
}

/// RFC 6979 A.2.5: P-256 with SHA-256, message "sample". The published
/// signature is high-S; signing emits its low-S twin with the same r,
/// and verification accepts both forms.
#[test]
fn rfc6979_p256_sample() {
    let curve = Curve::new(&P256);
    let sc = curve.scalar_field();

    let priv_bytes = hex!("c9afa9d845ba75166b5c215767b1d6934e50c3db36e89b127b8a622b120f6721");
    let prehash = hex!("af2bdbe1aa9b6ec1e2ade1d694f41fc71a831d0268e9891562113d8a62add1bf");
    let r_expect = hex!("efd48b2aacb6a8fd1140dd9cd45e81d69d2c877b56aaf991c34d0ea84eaf3716");
    let s_expect = hex!("f7cb1c942d657c41d436c7a1b6e29f65f3e900dbb9aff4064dc4ab2f843acda8");
    let pub_uncompressed = hex!(
        "04"
        "60fed4ba255a9d31c961eb74c6356d68c049b8923b61fa6ce669622e60f29fb6"
        "7903fe1008b8bc99a41ae9e95628bc64f2f1b20c2d7e9f5177a3c294d4462299"
    );

    let key = SigningKey::from_bytes(&curve, &priv_bytes).unwrap();
    assert_eq!(
        key.verifying_key().to_sec1_bytes(false).as_ref(),
        &pub_uncompressed
    );

    let (sig, _) = key.sign_prehash(&prehash).unwrap();
    let r = sc.import(&r_expect).unwrap();
    let s_high = sc.import(&s_expect).unwrap();
    let (s_low, was_high) = sc.minimize(&s_high);
    assert!(bool::from(was_high));
    assert_eq!(*sig.r(), r);
    assert_eq!(*sig.s(), s_low);

    // The published high-S signature verifies as-is.
    let mut high = [0u8; 64];
    high[..32].copy_from_slice(&r_expect);
    high[32..].copy_from_slice(&s_expect);
    let high = Signature::from_bytes(&curve, &high).unwrap();
    key.verifying_key().verify_prehash(&prehash, &high).unwrap();
    assert_eq!(high.normalize_s(&curve).unwrap(), sig);
    assert!(sig.normalize_s(&curve).is_none());
}

#[test]
fn rejects_invalid_keys_and_signatures() {
    let curve = Curve::new(&P256);
    let sc = curve.scalar_field();
    let size = sc.size();

    // Private keys: zero and n are out of range.
    assert!(SigningKey::from_bytes(&curve, &[0u8; 32]).is_err());
    let mut order = [0u8; 66];
    sc.export(&sc.neg(&sc.reduce_bytes(&[1])), &mut order[..size]); // n - 1
    assert!(SigningKey::from_bytes(&curve, &order[..size]).is_ok());
    assert!(SigningKey::from_bytes(&curve, &[0xff; 32]).is_err()); // >= n
    assert!(SigningKey::from_bytes(&curve, &[0x01; 16]).is_err()); // wrong len

    // Public keys: infinity is rejected even though it decodes.
    assert!(VerifyingKey::from_sec1_bytes(&curve, &[0x00]).is_err());

    // Signatures with r = 0 or s = 0 are rejected at parse time.
    let mut sig = [0u8; 64];
    sig[63] = 1;
    assert!(Signature::from_bytes(&curve, &sig).is_err()); // r = 0
    sig[31] = 1;
    sig[63] = 0;
    assert!(Signature::from_bytes(&curve, &sig).is_err()); // s = 0
    assert!(Signature::from_bytes(&curve, &[0x01; 63]).is_err()); // length
}

#[test]
fn randomized_sign_verify_recover() {
    for params in [&P224, &P256, &P384, &P521, &SECP256K1] {
        let mut curve = Curve::new(params);
        curve.randomize(&mut OsRng);
        let size = curve.scalar_field().size();

        let key = SigningKey::random(&curve, &mut OsRng);
        let vk = key.verifying_key();

        let mut msg = vec![0u8; size];
        OsRng.fill_bytes(&mut msg);

        let (sig, id) = key.sign_prehash(&msg).unwrap();
        vk.verify_prehash(&msg, &sig).unwrap();

        // Produced signatures are always low-S.
        assert!(!bool::from(curve.scalar_field().is_high(sig.s())));

        let recovered = VerifyingKey::recover_from_prehash(&curve, &msg, &sig, id).unwrap();
        assert_eq!(recovered, vk);

        // Flipping any single bit of the message, signature, or public key
        // must break verification.
        let mut sig_bytes = [0u8; 132];
        sig_bytes[..2 * size].copy_from_slice(sig.to_bytes(&curve).as_ref());
        let bit = (OsRng.next_u32() as usize) % (size * 8);

        let mut bad_msg = msg.clone();
        bad_msg[bit / 8] ^= 1 << (bit % 8);
        assert!(vk.verify_prehash(&bad_msg, &sig).is_err());

        for part in [0, 1] {
            let mut bad = sig_bytes;
            bad[part * size + bit / 8] ^= 1 << (bit % 8);
            match Signature::from_bytes(&curve, &bad[..2 * size]) {
                Ok(bad_sig) => assert!(vk.verify_prehash(&msg, &bad_sig).is_err()),
                Err(_) => {}
            }
        }

        let mut bad_pub = [0u8; 67];
        let enc = vk.to_sec1_bytes(true);
        bad_pub[..enc.as_ref().len()].copy_from_slice(enc.as_ref());
        bad_pub[1 + bit / 8] ^= 1 << (bit % 8);
        match VerifyingKey::from_sec1_bytes(&curve, &bad_pub[..enc.as_ref().len()]) {
            Ok(bad_vk) => assert!(bad_vk.verify_prehash(&msg, &sig).is_err()),
            Err(_) => {}
        }
    }
}
