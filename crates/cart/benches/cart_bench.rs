use cart::{CartStore, CartView, MemoryStorage, MemorySurface, Product};
use criterion::{Criterion, criterion_group, criterion_main};

fn filled_store(lines: usize) -> CartStore<MemoryStorage> {
    let mut store = CartStore::load(MemoryStorage::new());
    for i in 0..lines {
        store.add_item(Product::new(format!("p{i}"), "Bench hoodie", 2000i64).with_size("M"));
    }
    store
}

fn bench_add_item(c: &mut Criterion) {
    let mut store = filled_store(20);

    c.bench_function("cart/add_existing_item", |b| {
        b.iter(|| {
            store.add_item(Product::new("p10", "Bench hoodie", 2000i64).with_size("M"));
        });
    });
}

fn bench_snapshot_round_trip(c: &mut Criterion) {
    let store = filled_store(20);
    let storage = store.storage().clone();

    c.bench_function("cart/load_snapshot", |b| {
        b.iter(|| {
            let reloaded = CartStore::load(storage.clone());
            assert_eq!(reloaded.len(), 20);
        });
    });
}

fn bench_render(c: &mut Criterion) {
    let store = filled_store(20);
    let mut view = CartView::new(MemorySurface::new());

    c.bench_function("cart/refresh_view", |b| {
        b.iter(|| view.refresh(&store));
    });
}

criterion_group!(benches, bench_add_item, bench_snapshot_round_trip, bench_render);
criterion_main!(benches);
