use ark_std::rand::{rngs::StdRng, SeedableRng};
use benches::setup_graphs;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use graph_sig::prelude::*;
use test_utils::keys::{extended_key_pair, test_graph_params, test_params};

fn key_generation_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0u64);
    let mut group = c.benchmark_group("Key generation");
    group.sample_size(10);
    group.bench_function("signer key", |b| {
        b.iter(|| SignerKeyPair::generate(&mut rng, black_box(test_params())).unwrap())
    });
    let key_pair = extended_key_pair().signer_key_pair();
    group.bench_function("extended key", |b| {
        b.iter(|| {
            ExtendedKeyPair::generate(
                &mut rng,
                black_box(key_pair.clone()),
                black_box(test_graph_params()),
            )
            .unwrap()
        })
    });
    group.finish();
}

fn sign_verify_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0u64);
    let key_pair = extended_key_pair();
    let pk = &key_pair.public_key;
    let sk = &key_pair.secret_key.signer_key;
    setup_graphs!(key_pair, edge_count_range, graphs_range, messages_range);

    let mut sign_group = c.benchmark_group("Graph signing");
    for (i, count) in edge_count_range.iter().enumerate() {
        sign_group.bench_with_input(BenchmarkId::from_parameter(*count), &i, |b, &i| {
            b.iter(|| {
                GSSignature::oracle_sign(&mut rng, black_box(messages_range[i].clone()), sk, pk)
                    .unwrap()
            });
        });
    }
    sign_group.finish();

    let sigs_range = messages_range
        .iter()
        .map(|m| GSSignature::oracle_sign(&mut rng, m.clone(), sk, pk).unwrap())
        .collect::<Vec<_>>();

    let mut verify_group = c.benchmark_group("Graph signature verifying");
    for (i, count) in edge_count_range.iter().enumerate() {
        verify_group.bench_with_input(BenchmarkId::from_parameter(*count), &i, |b, &i| {
            b.iter(|| sigs_range[i].verify(black_box(pk)).unwrap());
        });
    }
    verify_group.finish();

    let mut blind_group = c.benchmark_group("Graph signature blinding");
    for (i, count) in edge_count_range.iter().enumerate() {
        blind_group.bench_with_input(BenchmarkId::from_parameter(*count), &i, |b, &i| {
            b.iter(|| sigs_range[i].blind(&mut rng, black_box(pk)).unwrap());
        });
    }
    blind_group.finish();
    assert_eq!(graphs_range.len(), sigs_range.len());
}

criterion_group!(benches, key_generation_benchmark, sign_verify_benchmark);
criterion_main!(benches);
