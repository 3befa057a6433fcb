//! Integration tests for the cart.
//!
//! These tests drive `CartStore` and `CartView` together the way a page
//! session does: mutate, persist, reload and render.

use cart::{
    CART_STORAGE_KEY, CartCommand, CartStore, CartView, DEFAULT_SIZE, FileStorage, MemoryStorage,
    MemorySurface, Product, Slot, SlotContent,
};

fn hoodie() -> Product {
    Product::new("p1", "Hoodie", 2000i64).with_size("M")
}

mod scenarios {
    use super::*;

    #[test]
    fn add_to_empty_cart() {
        let mut store = CartStore::load(MemoryStorage::new());

        store.add_item(hoodie());

        assert_eq!(store.count(), 1);
        assert_eq!(store.total(), 2000);
    }

    #[test]
    fn adding_same_product_and_size_increments_line() {
        let mut store = CartStore::load(MemoryStorage::new());
        store.add_item(hoodie());

        let quantity = store.add_item(hoodie());

        assert_eq!(quantity, 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.total(), 4000);
    }

    #[test]
    fn removing_missing_line_leaves_cart_unchanged() {
        let storage = MemoryStorage::new();
        let mut store = CartStore::load(storage.clone());
        store.add_item(hoodie());
        let before = store.snapshot();
        let persisted = storage.raw(CART_STORAGE_KEY);

        assert!(!store.remove_item("missing-id", DEFAULT_SIZE));
        assert_eq!(store.snapshot(), before);
        assert_eq!(storage.raw(CART_STORAGE_KEY), persisted);
    }
}

mod persistence {
    use super::*;

    #[test]
    fn memory_round_trip_reproduces_cart() {
        let storage = MemoryStorage::new();
        let mut store = CartStore::load(storage.clone());
        store.add_item(hoodie());
        store.add_item(hoodie());
        store.add_item(Product::new("p2", "Cap", "900").with_image("img/cap_black.png"));

        let reloaded = CartStore::load(storage);

        assert_eq!(reloaded.snapshot(), store.snapshot());
        assert_eq!(reloaded.total(), store.total());
    }

    #[test]
    fn file_round_trip_reproduces_cart() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CartStore::load(FileStorage::new(dir.path()));
        store.add_item(hoodie());
        store.add_item(Product::new("p3", "Poster", 1500i64));
        store.set_quantity("p3", 4, DEFAULT_SIZE);

        let reloaded = CartStore::load(FileStorage::new(dir.path()));

        assert_eq!(reloaded.snapshot(), store.snapshot());
        assert_eq!(reloaded.count(), 5);
    }

    #[test]
    fn snapshot_uses_wire_field_names() {
        let storage = MemoryStorage::new();
        let mut store = CartStore::load(storage.clone());
        store.add_item(hoodie());

        let raw = storage.raw(CART_STORAGE_KEY).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(
            value,
            serde_json::json!([{
                "id": "p1",
                "name": "Hoodie",
                "price": 2000,
                "image": "",
                "size": "M",
                "quantity": 1
            }])
        );
    }

    #[test]
    fn malformed_snapshot_loads_empty_and_recovers() {
        let storage = MemoryStorage::with_value(CART_STORAGE_KEY, "{not json");
        let mut store = CartStore::load(storage.clone());
        assert!(store.is_empty());

        store.add_item(hoodie());
        assert_eq!(CartStore::load(storage).count(), 1);
    }
}

mod properties {
    use super::*;

    #[test]
    fn set_quantity_zero_matches_remove() {
        let mut by_quantity = CartStore::load(MemoryStorage::new());
        let mut by_remove = CartStore::load(MemoryStorage::new());
        for store in [&mut by_quantity, &mut by_remove] {
            store.add_item(hoodie());
            store.add_item(Product::new("p2", "Cap", 900i64));
        }

        assert!(by_quantity.set_quantity("p1", 0, "M"));
        assert!(by_remove.remove_item("p1", "M"));

        assert_eq!(by_quantity.snapshot(), by_remove.snapshot());
        assert_eq!(
            by_quantity.storage().raw(CART_STORAGE_KEY),
            by_remove.storage().raw(CART_STORAGE_KEY)
        );
    }

    #[test]
    fn repeated_adds_make_one_line() {
        let mut store = CartStore::load(MemoryStorage::new());
        for _ in 0..7 {
            store.add_item(hoodie());
        }

        assert_eq!(store.len(), 1);
        assert_eq!(store.find("p1", "M").unwrap().quantity, 7);
    }

    #[test]
    fn sizes_are_separate_lines() {
        let mut store = CartStore::load(MemoryStorage::new());
        store.add_item(hoodie());
        store.add_item(Product::new("p1", "Hoodie", 2000i64).with_size("L"));

        assert_eq!(store.len(), 2);
        assert_eq!(store.total(), 4000);
    }

    #[test]
    fn total_ignores_bad_prices() {
        let mut store = CartStore::load(MemoryStorage::new());
        store.add_item(Product::new("a", "Negative", -500i64));
        store.add_item(Product::new("b", "Garbage", "free"));
        store.add_item(Product::new("c", "Pin", 300i64));

        assert_eq!(store.total(), 300);
    }
}

mod view {
    use super::*;

    #[test]
    fn render_twice_is_identical() {
        let mut store = CartStore::load(MemoryStorage::new());
        store.add_item(hoodie());
        let mut view = CartView::new(MemorySurface::new());

        view.refresh(&store);
        let first = view.surface().clone();
        view.refresh(&store);

        for slot in [Slot::CartList, Slot::CartTotal, Slot::Badge, Slot::OrderSummary] {
            assert_eq!(view.surface().state(slot), first.state(slot));
        }
    }

    #[test]
    fn list_and_summary_stay_consistent() {
        let mut store = CartStore::load(MemoryStorage::new());
        store.add_item(hoodie());
        store.add_item(Product::new("p2", "Cap", 900i64));
        let mut view = CartView::new(MemorySurface::new());
        view.refresh(&store);

        let increment = CartCommand::Increment {
            product_id: "p2".to_string(),
            size: DEFAULT_SIZE.to_string(),
        };
        assert!(view.dispatch(&mut store, &increment));

        let surface = view.surface();
        assert_eq!(surface.text(Slot::CartTotal), Some("3800"));
        assert_eq!(surface.text(Slot::OrderTotal), Some("3800 ₽"));
        assert_eq!(surface.text(Slot::Badge), Some("3"));
        let summary = surface.rows(Slot::OrderSummary).unwrap();
        assert_eq!(summary[1].label, "Cap x2");
        assert_eq!(summary[1].cost(), "1800 ₽");
    }

    #[test]
    fn clearing_shows_empty_state() {
        let mut store = CartStore::load(MemoryStorage::new());
        store.add_item(hoodie());
        let mut view = CartView::new(MemorySurface::new());

        assert!(view.dispatch(&mut store, &CartCommand::Clear));

        assert!(matches!(
            view.surface().content(Slot::CartList),
            Some(SlotContent::Empty(empty)) if empty.link_href == "category.html"
        ));
        assert!(!view.surface().is_visible(Slot::Badge));
    }
}
