//! One page session: cart, view, notices and checkout wired together.

use std::time::Instant;

use cart::{
    CartCommand, CartStorage, CartStore, CartView, NotificationCenter, Product, ViewSurface,
};
use common::OrderAccepted;

use crate::error::Result;
use crate::flow::OrderFlow;
use crate::gateway::Backend;
use crate::validation::CheckoutForm;

/// Storefront session over a storage backend, a view surface and a shop backend.
#[derive(Debug)]
pub struct Storefront<S: CartStorage, V: ViewSurface, B: Backend> {
    store: CartStore<S>,
    view: CartView<V>,
    notices: NotificationCenter,
    flow: OrderFlow<B>,
}

impl<S, V, B> Storefront<S, V, B>
where
    S: CartStorage,
    V: ViewSurface,
    B: Backend,
{
    /// Loads the persisted cart and renders it.
    pub fn open(storage: S, surface: V, backend: B) -> Self {
        let store = CartStore::load(storage);
        let mut view = CartView::new(surface);
        view.refresh(&store);
        Self {
            store,
            view,
            notices: NotificationCenter::new(),
            flow: OrderFlow::new(backend),
        }
    }

    pub fn cart(&self) -> &CartStore<S> {
        &self.store
    }

    pub fn view(&self) -> &CartView<V> {
        &self.view
    }

    pub fn notices(&self) -> &NotificationCenter {
        &self.notices
    }

    pub fn backend(&self) -> &B {
        self.flow.backend()
    }

    /// Adds one unit of `product` and tells the customer.
    pub fn add_to_cart(&mut self, product: Product) -> u32 {
        let quantity = self.store.add_item(product);
        self.view.refresh(&self.store);
        self.notify("Added to cart");
        quantity
    }

    /// Applies a command from the cart page.
    pub fn dispatch(&mut self, command: &CartCommand) -> bool {
        let changed = self.view.dispatch(&mut self.store, command);
        if changed && *command == CartCommand::Clear {
            self.notify("Cart cleared");
        }
        changed
    }

    /// Submits the checkout form.
    pub async fn checkout(&mut self, form: &CheckoutForm) -> Result<OrderAccepted> {
        self.flow
            .submit(&mut self.store, &mut self.view, &mut self.notices, form)
            .await
    }

    /// Picks up changes another page made to the persisted cart.
    pub fn reload(&mut self) {
        self.store.reload();
        self.view.sync(&self.store);
    }

    /// Dismisses the notice if its time is up.
    pub fn tick(&mut self, now: Instant) {
        if self.notices.expire(now) {
            self.view.show_notice(None);
        }
    }

    fn notify(&mut self, message: &str) {
        self.notices.notify(message);
        self.view.show_notice(self.notices.current());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::InMemoryBackend;
    use cart::{DEFAULT_SIZE, MemoryStorage, MemorySurface, Slot};
    use std::time::Duration;

    fn session() -> Storefront<MemoryStorage, MemorySurface, InMemoryBackend> {
        Storefront::open(MemoryStorage::new(), MemorySurface::new(), InMemoryBackend::new())
    }

    #[test]
    fn test_add_to_cart_notifies_and_renders() {
        let mut shop = session();

        shop.add_to_cart(Product::new("p1", "Hoodie", 2000i64).with_size("M"));
        let quantity = shop.add_to_cart(Product::new("p1", "Hoodie", 2000i64).with_size("M"));

        assert_eq!(quantity, 2);
        let surface = shop.view().surface();
        assert_eq!(surface.text(Slot::Badge), Some("2"));
        assert_eq!(surface.text(Slot::Notification), Some("Added to cart"));
        assert!(surface.is_visible(Slot::Notification));
    }

    #[test]
    fn test_clear_notifies() {
        let mut shop = session();
        shop.add_to_cart(Product::new("p2", "Cap", 900i64));

        assert!(shop.dispatch(&CartCommand::Clear));
        assert_eq!(
            shop.view().surface().text(Slot::Notification),
            Some("Cart cleared")
        );
    }

    #[test]
    fn test_tick_hides_expired_notice() {
        let mut shop = session();
        shop.add_to_cart(Product::new("p2", "Cap", 900i64));

        shop.tick(Instant::now() + Duration::from_secs(10));

        assert!(shop.notices().current().is_none());
        assert!(!shop.view().surface().is_visible(Slot::Notification));
    }

    #[test]
    fn test_reload_sees_other_page() {
        let storage = MemoryStorage::new();
        let mut shop = Storefront::open(storage.clone(), MemorySurface::new(), InMemoryBackend::new());
        let mut other = CartStore::load(storage);
        other.add_item(Product::new("p3", "Pin", 300i64));

        shop.reload();

        assert!(shop.cart().find("p3", DEFAULT_SIZE).is_some());
        assert_eq!(shop.view().surface().text(Slot::Badge), Some("1"));
    }
}
