use ark_std::rand::{rngs::StdRng, RngCore, SeedableRng};
use graph_sig::prelude::*;
use num_bigint::{BigInt, RandBigInt};
use sha2::Sha256;
use std::sync::OnceLock;

/// Smallest parameters satisfying every constraint with a 512 bit modulus
pub fn test_params() -> KeyGenParameters {
    KeyGenParameters {
        l_n: 512,
        l_gamma: 416,
        l_rho: 64,
        l_m: 64,
        l_res: 1,
        l_e: 237,
        l_prime_e: 60,
        l_v: 788,
        l_statzk: 40,
        l_H: 128,
        l_r: 40,
        l_pt: 40,
    }
}

pub fn test_graph_params() -> GraphEncodingParameters {
    GraphEncodingParameters {
        l_V: 8,
        l_prime_V: 16,
        l_E: 12,
        l_L: 16,
        l_prime_L: 8,
    }
}

pub fn extended_key_pair_with<R: RngCore>(
    rng: &mut R,
    params: KeyGenParameters,
    graph_params: GraphEncodingParameters,
) -> ExtendedKeyPair {
    let key_pair = SignerKeyPair::generate(rng, params).unwrap();
    ExtendedKeyPair::generate(rng, key_pair, graph_params).unwrap()
}

/// Extended key pair for the test parameters, generated once per test binary
pub fn extended_key_pair() -> &'static ExtendedKeyPair {
    static KEY: OnceLock<ExtendedKeyPair> = OnceLock::new();
    KEY.get_or_init(|| {
        let mut rng = StdRng::seed_from_u64(0u64);
        extended_key_pair_with(&mut rng, test_params(), test_graph_params())
    })
}

/// A triangle with a pendant vertex, some vertices and edges labelled
pub fn sample_graph() -> Graph {
    let mut graph = Graph::new();
    graph
        .add_vertex(1, vec![1])
        .add_vertex(2, vec![2, 3])
        .add_vertex(3, vec![])
        .add_vertex(6, vec![1, 4])
        .add_edge(1, 2, vec![5])
        .add_edge(2, 3, vec![])
        .add_edge(3, 1, vec![5, 6])
        .add_edge(3, 6, vec![7]);
    graph
}

pub fn random_master_secret<R: RngCore>(rng: &mut R, params: &KeyGenParameters) -> BigInt {
    BigInt::from(rng.gen_biguint(params.l_m as u64))
}

/// Runs issuance of a signature on `graph` and a random master secret
pub fn issue_graph_signature<R: RngCore>(
    rng: &mut R,
    key_pair: &ExtendedKeyPair,
    graph: &Graph,
) -> GSSignature {
    let pk = &key_pair.public_key;
    let messages = GraphEncoder::new(pk).encode(graph).unwrap();
    let msk = random_master_secret(rng, &pk.signer_key.params);
    let signer = SignerSession::new(rng, &key_pair.secret_key.signer_key, pk).unwrap();
    let (recipient, commitment) =
        RecipientSession::commit::<_, Sha256>(rng, pk, msk, signer.nonce()).unwrap();
    let response = signer
        .sign::<_, Sha256>(rng, &commitment, messages)
        .unwrap();
    recipient.complete::<Sha256>(response).unwrap()
}
