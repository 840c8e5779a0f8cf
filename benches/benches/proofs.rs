use ark_std::rand::{rngs::StdRng, SeedableRng};
use benches::setup_graphs;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use graph_sig::prelude::*;
use sha2::Sha256;
use test_utils::keys::{extended_key_pair, issue_graph_signature};

fn key_proofs_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0u64);
    let key_pair = extended_key_pair();
    let pk = &key_pair.public_key;
    let signer_key_pair = key_pair.signer_key_pair();

    let mut group = c.benchmark_group("Key proofs");
    group.bench_function("key signature", |b| {
        b.iter(|| KeySignature::new::<_, Sha256>(&mut rng, black_box(&signer_key_pair)).unwrap())
    });
    let key_signature = KeySignature::new::<_, Sha256>(&mut rng, &signer_key_pair).unwrap();
    group.bench_function("key signature verify", |b| {
        b.iter(|| key_signature.verify::<Sha256>(black_box(&pk.signer_key)).unwrap())
    });
    group.bench_function("group setup proof", |b| {
        b.iter(|| GroupSetupProof::new::<_, Sha256>(&mut rng, black_box(key_pair)).unwrap())
    });
    let setup_proof = GroupSetupProof::new::<_, Sha256>(&mut rng, key_pair).unwrap();
    group.bench_function("group setup proof verify", |b| {
        b.iter(|| setup_proof.verify::<Sha256>(black_box(pk)).unwrap())
    });
    group.finish();
}

fn possession_proof_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0u64);
    let key_pair = extended_key_pair();
    let pk = &key_pair.public_key;
    setup_graphs!(key_pair, edge_count_range, graphs_range, messages_range);
    let sigs_range = graphs_range
        .iter()
        .map(|g| issue_graph_signature(&mut rng, key_pair, g))
        .collect::<Vec<_>>();
    let nonce = b"test nonce";

    let mut prove_group = c.benchmark_group("Possession proof");
    for (i, count) in edge_count_range.iter().enumerate() {
        prove_group.bench_with_input(BenchmarkId::from_parameter(*count), &i, |b, &i| {
            b.iter(|| {
                PossessionProof::new::<_, Sha256, _>(
                    &mut rng,
                    black_box(&sigs_range[i]),
                    pk,
                    nonce,
                )
                .unwrap()
            });
        });
    }
    prove_group.finish();

    let proofs_range = sigs_range
        .iter()
        .map(|s| PossessionProof::new::<_, Sha256, _>(&mut rng, s, pk, nonce).unwrap())
        .collect::<Vec<_>>();

    let mut verify_group = c.benchmark_group("Possession proof verifying");
    for (i, count) in edge_count_range.iter().enumerate() {
        verify_group.bench_with_input(BenchmarkId::from_parameter(*count), &i, |b, &i| {
            b.iter(|| {
                proofs_range[i]
                    .verify::<Sha256, _>(black_box(pk), nonce)
                    .unwrap()
            });
        });
    }
    verify_group.finish();
    assert_eq!(messages_range.len(), proofs_range.len());
}

criterion_group!(benches, key_proofs_benchmark, possession_proof_benchmark);
criterion_main!(benches);
