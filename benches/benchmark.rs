use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use searchtree::{Balance, Color, Height, Natural, Tree, Unbalanced};

const N: usize = 100_000;

fn bench_engine<B: Balance + Clone>(c: &mut Criterion, engine: &str, values: &[i32]) {
    c.bench_function(&format!("{engine}_insert"), |b| {
        let mut map = Tree::<i32, i32, B, Natural<i32>>::new();
        b.iter(|| {
            for value in values {
                map.insert(*value, *value);
            }
        })
    });

    let mut map = Tree::<i32, i32, B, Natural<i32>>::new();
    for value in values {
        map.insert(*value, *value);
    }

    c.bench_function(&format!("{engine}_get"), |b| {
        b.iter(|| {
            for value in values {
                black_box(map.get(value));
            }
        })
    });

    c.bench_function(&format!("{engine}_iter"), |b| {
        b.iter(|| {
            for (k, v) in &map {
                black_box((k, v));
            }
        })
    });

    c.bench_function(&format!("{engine}_cursor_rev"), |b| {
        b.iter(|| {
            let mut cursor = map.cursor();
            cursor.end();
            while cursor.move_prev() {
                black_box(cursor.key_value());
            }
        })
    });

    c.bench_function(&format!("{engine}_remove"), |b| {
        let mut map = map.clone();
        b.iter(|| {
            for value in values {
                map.remove(value);
            }
        })
    });
}

pub fn benchmarks(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let values: Vec<i32> = (1..=N).map(|_| rng.gen()).collect();

    bench_engine::<Unbalanced>(c, "bst", &values);
    bench_engine::<Height>(c, "avl", &values);
    bench_engine::<Color>(c, "rb", &values);
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
