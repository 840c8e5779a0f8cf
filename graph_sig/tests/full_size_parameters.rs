use ark_std::rand::{rngs::StdRng, SeedableRng};
use graph_sig::prelude::*;
use num_bigint::{BigInt, RandBigInt};
use sha2::Sha256;
use std::time::Instant;

// Generating two 1024 bit safe primes takes minutes in debug builds
#[test]
#[ignore]
fn sign_and_verify_with_2048_bit_modulus() {
    let mut rng = StdRng::seed_from_u64(0u64);
    let params = KeyGenParameters::default();

    let start = Instant::now();
    let key_pair = SignerKeyPair::generate(&mut rng, params).unwrap();
    println!("Time to generate 2048 bit key pair {:?}", start.elapsed());
    let pk = &key_pair.public_key;
    assert_eq!(pk.N.bits(), 2048);
    assert!(pk.is_valid());

    let key_signature = KeySignature::new::<_, Sha256>(&mut rng, &key_pair).unwrap();
    key_signature.verify::<Sha256>(pk).unwrap();

    let m = BigInt::from(rng.gen_biguint(params.l_m as u64));
    let mut bases = BaseCollection::new();
    bases.add(BaseRepresentation::from_key(pk, BaseType::Base0, 0, m).unwrap());
    let start = Instant::now();
    let signature = GSSignature::oracle_sign(&mut rng, bases, &key_pair.secret_key, pk).unwrap();
    println!("Time to sign {:?}", start.elapsed());
    assert_eq!(signature.v.bits(), params.l_v as u64);

    let start = Instant::now();
    signature.verify(pk).unwrap();
    println!("Time to verify {:?}", start.elapsed());

    let mut tampered = signature.clone();
    tampered.e += 2u32;
    assert!(tampered.verify(pk).unwrap_err().is_verification_failure());

    let blinded = signature.blind(&mut rng, pk).unwrap();
    assert_ne!(blinded.A, signature.A);
    blinded.verify(pk).unwrap();

    let proof = PossessionProof::new::<_, Sha256, _>(&mut rng, &signature, pk, b"nonce").unwrap();
    proof.verify::<Sha256, _>(pk, b"nonce").unwrap();
}
