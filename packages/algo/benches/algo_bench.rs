//! Benchmark suite for memorank-algo
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use memorank_algo::{apply, next_group, CatalogEntry, Item, Population};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn population(n: u32) -> Population {
    let items = (1..=n)
        .map(|id| {
            Item::new(CatalogEntry::new(id, format!("item-{id}"), id))
                .with_rating(1300 + (id as i32 * 37) % 400)
        })
        .collect();
    Population::from_items(items).expect("benchmark population")
}

fn bench_apply(c: &mut Criterion) {
    c.bench_function("elo::apply", |b| {
        let mut winner = Item::new(CatalogEntry::new(1, "winner", 1));
        let mut loser = Item::new(CatalogEntry::new(2, "loser", 2));
        b.iter(|| apply(black_box(&mut winner), black_box(&mut loser)))
    });
}

fn bench_next_group(c: &mut Criterion) {
    let pop = population(1025);
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    c.bench_function("next_group uniform (1025 items)", |b| {
        b.iter(|| next_group(&pop, black_box(0), 5, &mut rng))
    });
    c.bench_function("next_group biased (1025 items)", |b| {
        b.iter(|| next_group(&pop, black_box(500), 5, &mut rng))
    });
}

criterion_group!(benches, bench_apply, bench_next_group);
criterion_main!(benches);
