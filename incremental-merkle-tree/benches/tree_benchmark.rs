#[macro_use]
extern crate criterion;

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use incremental_merkle_tree::{
    DefaultHasher, FieldElement, IncrementalMerkleTree, create_merkle_tree, verify_membership,
};

const DEPTH: u8 = 20;

fn prepare_tree(count: u64) -> IncrementalMerkleTree<DefaultHasher> {
    let mut tree = create_merkle_tree(DEPTH, FieldElement::ZERO, DefaultHasher::default())
        .expect("create tree");
    for i in 0..count {
        tree.insert(FieldElement::from_u64(i)).unwrap().expect("insert");
    }
    tree
}

/// Walks leaf indices in a fixed scattered order.
fn scattered(step: u64, count: u64) -> u64 {
    step.wrapping_mul(7919) % count
}

fn bench(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("tree insertion");
        let inputs = [1_000u64, 10_000, 100_000];
        for input in inputs.iter() {
            group.bench_with_input(BenchmarkId::new("times", input), &input, |b, &&size| {
                b.iter(|| prepare_tree(size));
            });
        }
    }

    c.bench_function("tree get path", |b| {
        let count = 100_000;
        let tree = prepare_tree(count);
        let mut step = 0;
        b.iter(|| {
            step += 1;
            black_box(tree.get_path_update(scattered(step, count)).unwrap())
        });
    });

    c.bench_function("tree update", |b| {
        let count = 100_000;
        let mut tree = prepare_tree(count);
        let mut step = 0;
        b.iter(|| {
            step += 1;
            let index = scattered(step, count);
            let path = tree.get_path_update(index).unwrap().expect("path");
            tree.update(index, FieldElement::from_u64(step), &path.path)
                .unwrap()
                .expect("update")
        });
    });

    c.bench_function("tree verify", |b| {
        let count = 100_000;
        let tree = prepare_tree(count);
        let hasher = DefaultHasher::default();
        let proofs: Vec<_> = (0..10_000)
            .map(|step| {
                let index = scattered(step, count);
                let path = tree.get_path_update(index).unwrap().expect("path");
                (index, tree.leaves()[index as usize], path)
            })
            .collect();
        let mut step = 0;
        b.iter(|| {
            step = (step + 1) % proofs.len();
            let (index, leaf, path) = &proofs[step];
            let verified = verify_membership(&hasher, *index, leaf, &path.path, tree.root())
                .unwrap()
                .expect("verify");
            assert!(verified);
        });
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(20);
    targets = bench
);
criterion_main!(benches);
