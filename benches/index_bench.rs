use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use entity_index::{
    ArchetypeId, ArchetypeSignature, Archetypes, Entity, EntityInfoStorage, Slot,
    DEFAULT_ENTITIES_PER_CHUNK,
};

fn populated_index(count: usize) -> (Archetypes, EntityInfoStorage, ArchetypeId) {
    let mut archetypes = Archetypes::new();
    let mut info = EntityInfoStorage::new();
    let id = archetypes.get_or_create(ArchetypeSignature::new(), DEFAULT_ENTITIES_PER_CHUNK);
    for entity_id in 0..count {
        let slot = archetypes
            .get_mut(id)
            .unwrap()
            .allocate_row(Entity::new(entity_id, 0));
        info.add(entity_id, 0, id, slot);
    }
    (archetypes, info, id)
}

fn lookup_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    let (_, info, _) = populated_index(100_000);

    group.bench_function("slot_100k_entities", |b| {
        b.iter(|| {
            let mut acc = 0usize;
            for id in 0..100_000 {
                acc += info.slot(black_box(id)).index;
            }
            acc
        })
    });

    group.bench_function("try_get_version_hit_and_miss", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for id in 0..200_000 {
                if info.try_get_version(black_box(id)).is_some() {
                    hits += 1;
                }
            }
            hits
        })
    });

    group.finish();
}

fn churn_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");

    group.bench_function("add_remove_10k", |b| {
        b.iter_batched(
            EntityInfoStorage::new,
            |mut info| {
                for id in 0..10_000 {
                    info.add(id, 0, ArchetypeId(0), Slot::new(id & 1023, id >> 10));
                }
                for id in 0..10_000 {
                    info.remove(id);
                }
                info
            },
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

fn shift_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("shift");

    group.bench_function("compact_front_removal_10k", |b| {
        b.iter_batched(
            || populated_index(10_000),
            |(mut archetypes, mut info, id)| {
                info.remove(0);
                let archetype = archetypes.get_mut(id).unwrap();
                let from = archetype.last_slot();
                archetype.compact_remove(Slot::new(0, 0));
                let archetype = archetypes.get(id).unwrap();
                info.shift(archetype, from, id, archetype, Slot::new(0, 0));
                (archetypes, info)
            },
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

criterion_group!(benches, lookup_benchmark, churn_benchmark, shift_benchmark);
criterion_main!(benches);
