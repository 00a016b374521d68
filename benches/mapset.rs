use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kui_engine::keycode::KeyCode;
use kui_engine::mapset::MappingSet;

/// Build a mapping set of `n` single-character triggers plus one long
/// trigger chain, so the matcher has both a wide sorted run and a deep
/// one to walk.
fn bench_set(n: usize) -> MappingSet {
    let mut set = MappingSet::new();
    for i in 0..n {
        let trigger = format!("k{i:04}");
        set.register(&trigger, "X").unwrap();
    }
    set.register("jjjjjjjj", "Z").unwrap();
    set
}

fn bench_matcher_feed(c: &mut Criterion) {
    let set = bench_set(256);

    c.bench_function("mapset::feed_single_unmatched_key", |b| {
        b.iter(|| {
            let mut m = set.matcher();
            black_box(m.feed(b'x' as KeyCode, 0).unwrap());
            black_box(m.state());
        })
    });

    c.bench_function("mapset::feed_full_trigger_match", |b| {
        b.iter(|| {
            let mut m = set.matcher();
            for (i, &byte) in b"k0042".iter().enumerate() {
                if m.feed(byte as KeyCode, i).is_err() {
                    break;
                }
            }
            m.finalize();
            black_box(m.matched());
        })
    });

    c.bench_function("mapset::feed_long_chain", |b| {
        b.iter(|| {
            let mut m = set.matcher();
            for (i, &byte) in b"jjjjjjjj".iter().enumerate() {
                if m.feed(byte as KeyCode, i).is_err() {
                    break;
                }
            }
            m.finalize();
            black_box(m.matched());
        })
    });
}

fn bench_register_deregister(c: &mut Criterion) {
    c.bench_function("mapset::register_into_sorted_set", |b| {
        b.iter(|| {
            let mut set = bench_set(256);
            black_box(set.register("zzzz", "new").unwrap());
        })
    });

    c.bench_function("mapset::deregister_existing", |b| {
        b.iter_batched(
            || bench_set(256),
            |mut set| black_box(set.deregister("k0100").unwrap()),
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_matcher_feed, bench_register_deregister);
criterion_main!(benches);
