use ark_std::rand::{rngs::StdRng, SeedableRng};
use benches::setup_graphs;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use graph_sig::prelude::*;
use sha2::Sha256;
use test_utils::keys::{extended_key_pair, issue_graph_signature, random_master_secret};

fn issuance_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0u64);
    let key_pair = extended_key_pair();
    let pk = &key_pair.public_key;
    let sk = &key_pair.secret_key.signer_key;
    setup_graphs!(key_pair, edge_count_range, graphs_range, messages_range);

    let msk = random_master_secret(&mut rng, &pk.signer_key.params);
    let mut commit_group = c.benchmark_group("Recipient commitment");
    commit_group.bench_function("commit", |b| {
        b.iter(|| {
            let signer = SignerSession::new(&mut rng, sk, pk).unwrap();
            RecipientSession::commit::<_, Sha256>(
                &mut rng,
                black_box(pk),
                black_box(msk.clone()),
                signer.nonce(),
            )
            .unwrap()
        })
    });
    commit_group.finish();

    let mut sign_group = c.benchmark_group("Issuance signing");
    for (i, count) in edge_count_range.iter().enumerate() {
        sign_group.bench_with_input(BenchmarkId::from_parameter(*count), &i, |b, &i| {
            b.iter_batched(
                || {
                    let signer = SignerSession::new(&mut rng, sk, pk).unwrap();
                    let (_, commitment) = RecipientSession::commit::<_, Sha256>(
                        &mut rng,
                        pk,
                        msk.clone(),
                        signer.nonce(),
                    )
                    .unwrap();
                    (signer, commitment)
                },
                |(signer, commitment)| {
                    signer
                        .sign::<_, Sha256>(
                            &mut StdRng::seed_from_u64(1u64),
                            &commitment,
                            black_box(messages_range[i].clone()),
                        )
                        .unwrap()
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    sign_group.finish();

    let mut issue_group = c.benchmark_group("Full issuance");
    issue_group.sample_size(20);
    for (i, count) in edge_count_range.iter().enumerate() {
        issue_group.bench_with_input(BenchmarkId::from_parameter(*count), &i, |b, &i| {
            b.iter(|| issue_graph_signature(&mut rng, key_pair, black_box(&graphs_range[i])));
        });
    }
    issue_group.finish();
}

criterion_group!(benches, issuance_benchmark);
criterion_main!(benches);
