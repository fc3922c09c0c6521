//! ECDSA key generation, signing and verification (FIPS 186-4 sections 6.2, 6.4).
//!
//! Nonces are drawn at random (appendix B.5.1 style: `bitlength(n) + 64` random
//! bits reduced into `[1, n-1]`), or supplied by the caller to reproduce
//! published vectors.

#![forbid(unsafe_code)]

use std::marker::PhantomData;

use nistec_core::{invariant_violation, Error, Result};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::curve::{Curve, ScalarElement};
use crate::hash::{DigestReduction, HashAlgorithm};
use crate::mul::{multiply, multiply_generator};
use crate::point::{add_general, is_on_curve, Point};
use crate::uint::Uint;

/// Upper bound on nonce draws when signing keeps producing r = 0 or s = 0.
pub const MAX_SIGN_ATTEMPTS: usize = 64;

/// Private scalar and, when known, the matching public point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPair<C: Curve> {
    pub public: Option<Point<C>>,
    pub private: Uint,
}

/// ECDSA signature (r, s).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    pub r: Uint,
    pub s: Uint,
}

impl Signature {
    pub fn new(r: Uint, s: Uint) -> Self {
        Self { r, s }
    }
}

/// Signing and verification engine for curve `C`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ecdsa<C: Curve> {
    hash: HashAlgorithm,
    reduction: DigestReduction,
    _curve: PhantomData<C>,
}

impl<C: Curve> Default for Ecdsa<C> {
    fn default() -> Self {
        Self {
            hash: C::PARAMS.hash,
            reduction: DigestReduction::default(),
            _curve: PhantomData,
        }
    }
}

impl<C: Curve> Ecdsa<C> {
    /// Engine using the curve's designated hash.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hash(mut self, hash: HashAlgorithm) -> Self {
        self.hash = hash;
        self
    }

    pub fn with_digest_reduction(mut self, reduction: DigestReduction) -> Self {
        self.reduction = reduction;
        self
    }

    pub fn hash(&self) -> HashAlgorithm {
        self.hash
    }

    pub fn digest_reduction(&self) -> DigestReduction {
        self.reduction
    }

    /// Generate a random key pair.
    pub fn generate_keypair<R: RngCore + CryptoRng + ?Sized>(&self, rng: &mut R) -> KeyPair<C> {
        let private = random_scalar::<C, R>(rng);
        KeyPair {
            public: Some(multiply_generator(&private)),
            private,
        }
    }

    /// Key pair for a given private scalar, which must lie in [1, n-1].
    pub fn keypair_from_private(&self, private: &Uint) -> Result<KeyPair<C>> {
        check_scalar_range::<C>(private)?;
        Ok(KeyPair {
            public: Some(multiply_generator(private)),
            private: *private,
        })
    }

    /// Sign `message` with a random nonce.
    ///
    /// Returns None if the key pair carries a public key and the fresh
    /// signature does not verify against it.
    pub fn sign<R: RngCore + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
        message: &[u8],
        key_pair: &KeyPair<C>,
    ) -> Option<Signature> {
        self.sign_digest(rng, &self.hash.digest(message), key_pair)
    }

    /// Sign a precomputed digest with a random nonce.
    pub fn sign_digest<R: RngCore + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
        digest: &[u8],
        key_pair: &KeyPair<C>,
    ) -> Option<Signature> {
        let z = self.digest_to_scalar(digest);
        self.sign_scalar(rng, &z, key_pair, None)
    }

    /// Sign `message` with the caller's nonce `k`, which must lie in [1, n-1].
    ///
    /// If `k` yields r = 0 or s = 0 the signature is retried with random
    /// nonces from the operating system.
    pub fn sign_with_nonce(
        &self,
        message: &[u8],
        key_pair: &KeyPair<C>,
        k: &Uint,
    ) -> Result<Option<Signature>> {
        check_scalar_range::<C>(k)?;
        let z = self.digest_to_scalar(&self.hash.digest(message));
        Ok(self.sign_scalar(&mut OsRng, &z, key_pair, Some(ScalarElement::<C>::from_uint(k))))
    }

    /// Verify `signature` over `message` against `public`.
    pub fn verify(&self, message: &[u8], public: &Point<C>, signature: &Signature) -> bool {
        self.verify_digest(&self.hash.digest(message), public, signature)
    }

    /// Verify `signature` over a precomputed digest.
    pub fn verify_digest(&self, digest: &[u8], public: &Point<C>, signature: &Signature) -> bool {
        // Range checks come before any curve arithmetic.
        if check_scalar_range::<C>(&signature.r).is_err()
            || check_scalar_range::<C>(&signature.s).is_err()
        {
            return false;
        }
        if !is_on_curve(public) {
            return false;
        }
        let z = self.digest_to_scalar(digest);
        verify_scalar(&z, public, signature)
    }

    fn digest_to_scalar(&self, digest: &[u8]) -> ScalarElement<C> {
        let z = self.reduction.to_integer(digest, &C::scalar_modulus());
        ScalarElement::<C>::from_uint(&z)
    }

    fn sign_scalar<R: RngCore + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
        z: &ScalarElement<C>,
        key_pair: &KeyPair<C>,
        mut nonce: Option<ScalarElement<C>>,
    ) -> Option<Signature> {
        let d = ScalarElement::<C>::from_uint(&key_pair.private);

        for _ in 0..MAX_SIGN_ATTEMPTS {
            let k = match nonce.take() {
                Some(k) => k,
                None => ScalarElement::<C>::from_uint(&random_scalar::<C, R>(rng)),
            };
            let Some(signature) = sign_once(z, &d, &k) else {
                continue;
            };

            return match &key_pair.public {
                Some(public) if !verify_scalar(z, public, &signature) => None,
                _ => Some(signature),
            };
        }

        invariant_violation("no usable nonce after the maximum number of signing attempts")
    }
}

/// One signing attempt; None when r or s is zero.
fn sign_once<C: Curve>(
    z: &ScalarElement<C>,
    d: &ScalarElement<C>,
    k: &ScalarElement<C>,
) -> Option<Signature> {
    let (x, _) = multiply_generator::<C>(&k.to_uint()).coordinates()?;
    let r = ScalarElement::<C>::from_uint(&x);
    if r.is_zero() {
        return None;
    }

    let s = k.inverse().mul(&z.add(&d.mul(&r)));
    if s.is_zero() {
        return None;
    }

    Some(Signature {
        r: r.to_uint(),
        s: s.to_uint(),
    })
}

/// Core check once r and s are known to be in [1, n-1].
fn verify_scalar<C: Curve>(z: &ScalarElement<C>, public: &Point<C>, signature: &Signature) -> bool {
    let r = ScalarElement::<C>::from_uint(&signature.r);
    let Some(w) = ScalarElement::<C>::from_uint(&signature.s).checked_inverse() else {
        return false;
    };
    let u1 = z.mul(&w);
    let u2 = r.mul(&w);

    let v = add_general(
        &multiply_generator::<C>(&u1.to_uint()),
        &multiply(&u2.to_uint(), public),
    );
    match v.coordinates() {
        Some((x, _)) => ScalarElement::<C>::from_uint(&x) == r,
        None => false,
    }
}

fn check_scalar_range<C: Curve>(value: &Uint) -> Result<()> {
    if value.is_zero() || *value >= C::PARAMS.n {
        return Err(Error::ScalarOutOfRange);
    }
    Ok(())
}

/// Uniform-ish scalar in [1, n-1]: `c mod (n - 1) + 1` for a random `c` of
/// `bitlength(n) + 64` bits.
fn random_scalar<C: Curve, R: RngCore + ?Sized>(rng: &mut R) -> Uint {
    let n = C::PARAMS.n;
    let c = Uint::random_bits(rng, n.bits() + 64);
    c.rem(&n.wrapping_sub(&Uint::ONE)).wrapping_add(&Uint::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{NistP256, NistP384, NistP521};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    fn uint(hex: &str) -> Uint {
        Uint::parse_be_hex(hex).unwrap()
    }

    fn point<C: Curve>(x: &str, y: &str) -> Point<C> {
        Point::from_coordinates(&uint(x), &uint(y)).unwrap()
    }

    fn roundtrip<C: Curve>(seed: u64, rounds: usize) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let ecdsa = Ecdsa::<C>::new();

        for _ in 0..rounds {
            let key_pair = ecdsa.generate_keypair(&mut rng);
            let len = rng.gen_range(0..1024);
            let mut message = vec![0u8; len];
            rng.fill_bytes(&mut message);

            let signature = ecdsa.sign(&mut rng, &message, &key_pair).unwrap();
            let public = key_pair.public.unwrap();
            assert!(ecdsa.verify(&message, &public, &signature));
        }
    }

    #[test]
    fn test_roundtrip_p256() {
        roundtrip::<NistP256>(1, 4);
    }

    #[test]
    fn test_roundtrip_p384() {
        roundtrip::<NistP384>(2, 3);
    }

    #[test]
    fn test_roundtrip_p521() {
        roundtrip::<NistP521>(3, 2);
    }

    #[test]
    #[ignore]
    fn test_roundtrip_many() {
        roundtrip::<NistP256>(10, 1000);
        roundtrip::<NistP384>(11, 1000);
        roundtrip::<NistP521>(12, 1000);
    }

    #[test]
    fn test_generated_private_in_range() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for _ in 0..200 {
            let d = random_scalar::<NistP521, _>(&mut rng);
            assert!(!d.is_zero());
            assert!(d < NistP521::PARAMS.n);
        }
    }

    #[test]
    fn test_tampering_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let ecdsa = Ecdsa::<NistP256>::new();
        let key_pair = ecdsa.generate_keypair(&mut rng);
        let public = key_pair.public.unwrap();
        let message = b"tamper with me".to_vec();
        let signature = ecdsa.sign(&mut rng, &message, &key_pair).unwrap();

        let mut flipped = message.clone();
        flipped[3] ^= 0x10;
        assert!(!ecdsa.verify(&flipped, &public, &signature));

        let bad_r = Signature::new(signature.r.flip_bit(5), signature.s);
        assert!(!ecdsa.verify(&message, &public, &bad_r));

        let bad_s = Signature::new(signature.r, signature.s.flip_bit(200));
        assert!(!ecdsa.verify(&message, &public, &bad_s));

        let other = ecdsa.generate_keypair(&mut rng).public.unwrap();
        assert!(!ecdsa.verify(&message, &other, &signature));
    }

    #[test]
    fn test_signature_domain_rejected() {
        let ecdsa = Ecdsa::<NistP256>::new();
        let n = NistP256::PARAMS.n;
        let g = Point::<NistP256>::generator();
        // Not on the curve; the range check must reject before it matters.
        let off_curve = point::<NistP256>("01", "01");

        for signature in [
            Signature::new(Uint::ZERO, Uint::ONE),
            Signature::new(Uint::ONE, Uint::ZERO),
            Signature::new(n, Uint::ONE),
            Signature::new(Uint::ONE, n),
        ] {
            assert!(!ecdsa.verify(b"sample", &g, &signature));
            assert!(!ecdsa.verify(b"sample", &off_curve, &signature));
        }
        assert!(!ecdsa.verify(b"sample", &Point::Infinity, &Signature::new(Uint::ONE, Uint::ONE)));
    }

    #[test]
    fn test_private_key_range() {
        let ecdsa = Ecdsa::<NistP384>::new();
        let n = NistP384::PARAMS.n;
        assert_eq!(
            ecdsa.keypair_from_private(&Uint::ZERO),
            Err(Error::ScalarOutOfRange)
        );
        assert_eq!(ecdsa.keypair_from_private(&n), Err(Error::ScalarOutOfRange));

        let key_pair = ecdsa.keypair_from_private(&Uint::ONE).unwrap();
        assert_eq!(key_pair.public, Some(Point::generator()));
    }

    #[test]
    fn test_nonce_range() {
        let ecdsa = Ecdsa::<NistP256>::new();
        let key_pair = ecdsa.keypair_from_private(&Uint::from_u64(2)).unwrap();
        assert_eq!(
            ecdsa.sign_with_nonce(b"m", &key_pair, &Uint::ZERO),
            Err(Error::ScalarOutOfRange)
        );
        assert_eq!(
            ecdsa.sign_with_nonce(b"m", &key_pair, &NistP256::PARAMS.n),
            Err(Error::ScalarOutOfRange)
        );
    }

    #[test]
    fn test_self_check_rejects_mismatched_public() {
        let ecdsa = Ecdsa::<NistP256>::new();
        let key_pair = KeyPair {
            public: Some(Point::<NistP256>::generator()),
            private: Uint::from_u64(12345),
        };
        let k = Uint::from_u64(999);
        assert_eq!(ecdsa.sign_with_nonce(b"sample", &key_pair, &k), Ok(None));

        // Without a public key there is nothing to check against.
        let unchecked = KeyPair {
            public: None,
            ..key_pair
        };
        assert!(ecdsa
            .sign_with_nonce(b"sample", &unchecked, &k)
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_zero_s_retries_with_fresh_nonce() {
        // Choose d so that z + d*r = 0 (mod n) for the nonce k; s would be zero.
        let ecdsa = Ecdsa::<NistP256>::new();
        let message = b"degenerate";
        let k = Uint::from_u64(0xdead_beef);

        let z = ecdsa.digest_to_scalar(&HashAlgorithm::Sha256.digest(message));
        let (x, _) = multiply_generator::<NistP256>(&k).coordinates().unwrap();
        let r = ScalarElement::<NistP256>::from_uint(&x);
        let d = z.neg().div(&r);

        let key_pair = ecdsa.keypair_from_private(&d.to_uint()).unwrap();
        let signature = ecdsa
            .sign_with_nonce(message, &key_pair, &k)
            .unwrap()
            .unwrap();

        assert_ne!(signature.r, r.to_uint());
        assert!(ecdsa.verify(message, &key_pair.public.unwrap(), &signature));
    }

    #[test]
    fn test_p256_sig_gen_vector() {
        // CAVP SigGen.txt, [P-256,SHA-256].
        let ecdsa = Ecdsa::<NistP256>::new();
        let message = hex::decode(
            "5905238877c77421f73e43ee3da6f2d9e2ccad5fc942dcec0cbd25482935faaf416983fe165b1a045ee2bcd2e6dca3bdf46c4310a7461f9a37960ca672d3feb5473e253605fb1ddfd28065b53cb5858a8ad28175bf9bd386a5e471ea7a65c17cc934a9d791e91491eb3754d03799790fe2d308d16146d5c9b0d0debd97d79ce8",
        )
        .unwrap();
        let d = uint("519b423d715f8b581f4fa8ee59f4771a5b44c8130b4e3eacca54a56dda72b464");
        let k = uint("94a1bbb14b906a61a280f245f9e93c7f3b4a6247824f5d33b9670787642a68de");

        let key_pair = ecdsa.keypair_from_private(&d).unwrap();
        assert_eq!(
            key_pair.public,
            Some(point(
                "1ccbe91c075fc7f4f033bfa248db8fccd3565de94bbfb12f3c59ff46c271bf83",
                "ce4014c68811f9a21a1fdb2c0e6113e06db7ca93b7404e78dc7ccd5ca89a4ca9",
            ))
        );

        let signature = ecdsa
            .sign_with_nonce(&message, &key_pair, &k)
            .unwrap()
            .unwrap();
        assert_eq!(
            signature.r,
            uint("f3ac8061b514795b8843e3d6629527ed2afd6b1f6a555a7acabb5e6f79c8c2ac")
        );
        assert_eq!(
            signature.s,
            uint("8bf77819ca05a6b2786c76262bf7371cef97b218e96f175a3ccdda2acc058903")
        );
    }

    #[test]
    fn test_p256_sig_ver_vector() {
        let ecdsa = Ecdsa::<NistP256>::new();
        let message = hex::decode(
            "e1130af6a38ccb412a9c8d13e15dbfc9e69a16385af3c3f1e5da954fd5e7c45fd75e2b8c36699228e92840c0562fbf3772f07e17f1add56588dd45f7450e1217ad239922dd9c32695dc71ff2424ca0dec1321aa47064a044b7fe3c2b97d03ce470a592304c5ef21eed9f93da56bb232d1eeb0035f9bf0dfafdcc4606272b20a3",
        )
        .unwrap();
        let public = point::<NistP256>(
            "e424dc61d4bb3cb7ef4344a7f8957a0c5134e16f7a67c074f82e6e12f49abf3c",
            "970eed7aa2bc48651545949de1dddaf0127e5965ac85d1243d6f60e7dfaee927",
        );
        let signature = Signature::new(
            uint("bf96b99aa49c705c910be33142017c642ff540c76349b9dab72f981fd9347f4f"),
            uint("17c55095819089c2e03b9cd415abdf12444e323075d98f31920b9e0f57ec871c"),
        );
        assert!(ecdsa.verify(&message, &public, &signature));
    }

    #[test]
    fn test_rfc6979_p256_sample() {
        let ecdsa = Ecdsa::<NistP256>::new();
        let x = uint("c9afa9d845ba75166b5c215767b1d6934e50c3db36e89b127b8a622b120f6721");
        let k = uint("a6e3c57dd01abe90086538398355dd4c3b17aa873382b0f24d6129493d8aad60");

        let key_pair = ecdsa.keypair_from_private(&x).unwrap();
        assert_eq!(
            key_pair.public,
            Some(point(
                "60fed4ba255a9d31c961eb74c6356d68c049b8923b61fa6ce669622e60f29fb6",
                "7903fe1008b8bc99a41ae9e95628bc64f2f1b20c2d7e9f5177a3c294d4462299",
            ))
        );

        let signature = ecdsa
            .sign_with_nonce(b"sample", &key_pair, &k)
            .unwrap()
            .unwrap();
        assert_eq!(
            signature,
            Signature::new(
                uint("efd48b2aacb6a8fd1140dd9cd45e81d69d2c877b56aaf991c34d0ea84eaf3716"),
                uint("f7cb1c942d657c41d436c7a1b6e29f65f3e900dbb9aff4064dc4ab2f843acda8"),
            )
        );
    }

    #[test]
    fn test_rfc6979_p384_sample() {
        let ecdsa = Ecdsa::<NistP384>::new();
        let x = uint("6b9d3dad2e1b8c1c05b19875b6659f4de23c3b667bf297ba9aa47740787137d896d5724e4c70a825f872c9ea60d2edf5");
        let key_pair = ecdsa.keypair_from_private(&x).unwrap();
        let public = key_pair.public.unwrap();

        assert_eq!(
            public,
            point(
                "ec3a4e415b4e19a4568618029f427fa5da9a8bc4ae92e02e06aae5286b300c64def8f0ea9055866064a254515480bc13",
                "8015d9b72d7d57244ea8ef9ac0c621896708a59367f9dfb9f54ca84b3f1c9db1288b231c3ae0d4fe7344fd2533264720",
            )
        );

        let signature = Signature::new(
            uint("94edbb92a5ecb8aad4736e56c691916b3f88140666ce9fa73d64c4ea95ad133c81a648152e44acf96e36dd1e80fabe46"),
            uint("99ef4aeb15f178cea1fe40db2603138f130e740a19624526203b6351d0a3a94fa329c145786e679e7b82c71a38628ac8"),
        );
        assert!(ecdsa.verify(b"sample", &public, &signature));
        assert!(!ecdsa.verify(b"test", &public, &signature));
    }

    #[test]
    fn test_rfc6979_p521_sample() {
        let ecdsa = Ecdsa::<NistP521>::new();
        let x = uint("00fad06daa62ba3b25d2fb40133da757205de67f5bb0018fee8c86e1b68c7e75caa896eb32f1f47c70855836a6d16fcc1466f6d8fbec67db89ec0c08b0e996b83538");
        let key_pair = ecdsa.keypair_from_private(&x).unwrap();
        let public = key_pair.public.unwrap();

        assert_eq!(
            public,
            point(
                "01894550d0785932e00eaa23b694f213f8c3121f86dc97a04e5a7167db4e5bcd371123d46e45db6b5d5370a7f20fb633155d38ffa16d2bd761dcac474b9a2f5023a4",
                "00493101c962cd4d2fddf782285e64584139c2f91b47f87ff82354d6630f746a28a0db25741b5b34a828008b22acc23f924faafbd4d33f81ea66956dfeaa2bfdfcf5",
            )
        );

        let signature = Signature::new(
            uint("00c328fafcbd79dd77850370c46325d987cb525569fb63c5d3bc53950e6d4c5f174e25a1ee9017b5d450606add152b534931d7d4e8455cc91f9b15bf05ec36e377fa"),
            uint("00617cce7cf5064806c467f678d3b4080d6f1cc50af26ca209417308281b68af282623eaa63e5b5c0723d8b8c37ff0777b1a20f8ccb1dccc43997f1ee0e44da4a67a"),
        );
        assert!(ecdsa.verify(b"sample", &public, &signature));
    }

    #[test]
    fn test_fixed_nonce_p384_p521() {
        // Expected values computed independently with arbitrary-precision arithmetic.
        let k = uint("1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef");

        let ecdsa = Ecdsa::<NistP384>::new();
        let key_pair = ecdsa
            .keypair_from_private(&uint("6b9d3dad2e1b8c1c05b19875b6659f4de23c3b667bf297ba9aa47740787137d896d5724e4c70a825f872c9ea60d2edf5"))
            .unwrap();
        let signature = ecdsa.sign_with_nonce(b"test", &key_pair, &k).unwrap().unwrap();
        assert_eq!(
            signature,
            Signature::new(
                uint("c787d37c05c2c199a12c7e85baa2354aaad83260c08a156dce611b3cdfce17076f28fc663c8a5f74b82e910595e2d6b5"),
                uint("a8c5fa901acabe27e774e8252f9bff9df10c33d94c2ef2f884fed5148255956d5747f7e62fb66bd324e8227caf95bddc"),
            )
        );

        let ecdsa = Ecdsa::<NistP521>::new();
        let key_pair = ecdsa
            .keypair_from_private(&uint("00fad06daa62ba3b25d2fb40133da757205de67f5bb0018fee8c86e1b68c7e75caa896eb32f1f47c70855836a6d16fcc1466f6d8fbec67db89ec0c08b0e996b83538"))
            .unwrap();
        let signature = ecdsa.sign_with_nonce(b"test", &key_pair, &k).unwrap().unwrap();
        assert_eq!(
            signature,
            Signature::new(
                uint("019b66aeace7baa73019f26e8515a760c19dcab435ed7fa056b4ba630f636adb6408782216502501b76a6d5805ff775ed6eae79ddaccd54a008028fd357d4764da51"),
                uint("01d76b2f63c730d87628419d5699cfac67cd11e25140f7f3bde1a988a89ef2383ac085bd5a8f586d2d4c8bc87463c8313a8b4a08a6786c52dd75eef353074947ece4"),
            )
        );
    }

    #[test]
    fn test_p384_prehash_sha256() {
        // SigGen.txt [P-384,SHA-256]; the digest is shorter than the order.
        let ecdsa = Ecdsa::<NistP384>::new()
            .with_hash(HashAlgorithm::Sha256)
            .with_digest_reduction(DigestReduction::Leftmost);
        let public = point::<NistP384>(
            "0400193b21f07cd059826e9453d3e96dd145041c97d49ff6b7047f86bb0b0439e909274cb9c282bfab88674c0765bc75",
            "f70d89c52acbc70468d2c5ae75c76d7f69b76af62dcf95e99eba5dd11adf8f42ec9a425b0c5ec98e2f234a926b82a147",
        );
        let signature = Signature::new(
            uint("b11db00cdaf53286d4483f38cd02785948477ed7ebc2ad609054551da0ab0359978c61851788aa2ec3267946d440e878"),
            uint("16007873c5b0604ce68112a8fee973e8e2b6e3319c683a762ff5065a076512d7c98b27e74b7887671048ac027df8cbf2"),
        );
        let digest =
            hex::decode("bbbd0a5f645d3fda10e288d172b299455f9dff00e0fbc2833e18cd017d7f3ed1").unwrap();

        assert!(ecdsa.verify_digest(&digest, &public, &signature));
        assert!(Ecdsa::<NistP384>::new().verify_digest(&digest, &public, &signature));
    }

    #[test]
    fn test_engine_defaults() {
        let ecdsa = Ecdsa::<NistP521>::default();
        assert_eq!(ecdsa.hash(), HashAlgorithm::Sha512);
        assert_eq!(ecdsa.digest_reduction(), DigestReduction::ModOrder);
        let ecdsa = ecdsa.with_hash(HashAlgorithm::Sha224);
        assert_eq!(ecdsa.hash(), HashAlgorithm::Sha224);
    }
}
