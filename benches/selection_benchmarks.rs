use std::collections::BTreeMap;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use una_words::catalog::{Catalog, Meta, Pack, WordEntry, resolver};
use una_words::engine::progress::ProgressStore;
use una_words::engine::selector::{SESSION_SIZE, build_session, rank, sample};
use una_words::session::SessionMode;

/// A pack of `count` words plus an include of the same size, with every
/// tenth word archived.
fn make_catalog(count: usize) -> Catalog {
    let mut library = BTreeMap::new();
    let mut own = Vec::with_capacity(count);
    let mut other = Vec::with_capacity(count);
    for i in 0..count * 2 {
        let id = format!("w{i:05}");
        let mut entry = WordEntry::new(&format!("word{i}"), "meaning");
        entry.archived = i % 10 == 0;
        library.insert(id.clone(), entry);
        if i < count {
            own.push(id);
        } else {
            other.push(id);
        }
    }
    let packs = vec![
        Pack {
            id: "big".to_string(),
            title: "Big".to_string(),
            content: own,
            include: vec!["other".to_string()],
        },
        Pack {
            id: "other".to_string(),
            title: "Other".to_string(),
            content: other,
            include: Vec::new(),
        },
    ];
    Catalog::new(Meta::default(), library, packs)
}

fn make_progress(catalog: &Catalog) -> ProgressStore {
    let mut progress = ProgressStore::in_memory();
    for (i, id) in catalog.library.keys().enumerate() {
        let record = progress.get(id);
        record.score = (i % 11) as i32 * 10;
        record.wrong_count = (i % 7) as u32;
        record.hint_count = (i % 3) as u32;
    }
    progress
}

fn bench_expand(c: &mut Criterion) {
    let catalog = make_catalog(2_000);

    c.bench_function("expand (2000 + 2000 include)", |b| {
        b.iter(|| resolver::expand(black_box(&catalog), "big"))
    });
}

fn bench_rank_and_sample(c: &mut Criterion) {
    let catalog = make_catalog(2_000);
    let mut progress = make_progress(&catalog);
    let eligible = resolver::expand(&catalog, "big");
    let mut rng = SmallRng::seed_from_u64(17);

    c.bench_function("rank (3600 eligible)", |b| {
        b.iter(|| rank(black_box(&eligible), &mut progress))
    });

    let ranked = rank(&eligible, &mut progress);
    c.bench_function("sample 5 of 3600", |b| {
        b.iter(|| sample(black_box(ranked.clone()), SESSION_SIZE, &mut rng))
    });
}

fn bench_build_session(c: &mut Criterion) {
    let catalog = make_catalog(2_000);
    let mut progress = make_progress(&catalog);
    let mut rng = SmallRng::seed_from_u64(99);

    c.bench_function("build_session (large pack)", |b| {
        b.iter(|| {
            build_session(
                black_box(&catalog),
                &mut progress,
                "big",
                SessionMode::Practice,
                &mut rng,
            )
        })
    });
}

criterion_group!(benches, bench_expand, bench_rank_and_sample, bench_build_session);
criterion_main!(benches);
