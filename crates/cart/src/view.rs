//! Projection of the cart into view slots, and the commands its controls emit.

use crate::notification::Notice;
use crate::storage::CartStorage;
use crate::store::CartStore;
use crate::surface::{EmptyState, RowView, Slot, SlotContent, ViewSurface, format_price};

/// Prompt shown before the whole cart is emptied.
pub const CLEAR_PROMPT: &str = "Clear the cart?";

const SUBMIT_LABEL: &str = "Place order";
const SUBMITTING_LABEL: &str = "Sending...";

/// A user action on the cart page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartCommand {
    Increment { product_id: String, size: String },
    Decrement { product_id: String, size: String },
    Remove { product_id: String, size: String },
    Clear,
}

/// Visible state of the checkout form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutState {
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

/// Renders a `CartStore` into a `ViewSurface` and applies `CartCommand`s.
///
/// Every render replaces its slots wholesale, so rendering the same store
/// revision twice leaves the surface unchanged.
#[derive(Debug)]
pub struct CartView<V: ViewSurface> {
    surface: V,
    rendered_revision: Option<u64>,
}

impl<V: ViewSurface> CartView<V> {
    pub fn new(surface: V) -> Self {
        Self {
            surface,
            rendered_revision: None,
        }
    }

    pub fn surface(&self) -> &V {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut V {
        &mut self.surface
    }

    pub fn into_surface(self) -> V {
        self.surface
    }

    /// Renders the cart list, its total and the order summary.
    pub fn render_list<S: CartStorage>(&mut self, store: &CartStore<S>) {
        if store.is_empty() {
            self.surface.replace(
                Slot::CartList,
                SlotContent::Empty(EmptyState {
                    message: "Your cart is empty".to_string(),
                    link_label: "Go to catalog".to_string(),
                    link_href: "category.html".to_string(),
                }),
            );
        } else {
            let rows = store
                .lines()
                .iter()
                .map(|line| RowView {
                    label: line.label(),
                    image: line.image_ref.clone(),
                    quantity: Some(line.quantity),
                    amount: line.subtotal(),
                    actions: vec![
                        CartCommand::Decrement {
                            product_id: line.product_id.clone(),
                            size: line.size.clone(),
                        },
                        CartCommand::Increment {
                            product_id: line.product_id.clone(),
                            size: line.size.clone(),
                        },
                        CartCommand::Remove {
                            product_id: line.product_id.clone(),
                            size: line.size.clone(),
                        },
                    ],
                })
                .collect();
            self.surface.replace(Slot::CartList, SlotContent::Rows(rows));
        }

        self.surface
            .replace(Slot::CartTotal, SlotContent::Text(store.total().to_string()));
        self.render_order_summary(store);
        self.rendered_revision = Some(store.revision());
    }

    /// Shows the item count on the badge, hiding it when the cart is empty.
    pub fn update_badge<S: CartStorage>(&mut self, store: &CartStore<S>) {
        let count = store.count();
        self.surface
            .replace(Slot::Badge, SlotContent::Text(count.to_string()));
        self.surface.set_visible(Slot::Badge, count > 0);
    }

    /// Renders the read-only summary next to the checkout form.
    pub fn render_order_summary<S: CartStorage>(&mut self, store: &CartStore<S>) {
        let rows = store
            .lines()
            .iter()
            .map(|line| RowView {
                label: format!("{} x{}", line.label(), line.quantity),
                image: line.image_ref.clone(),
                quantity: None,
                amount: line.subtotal(),
                actions: Vec::new(),
            })
            .collect();
        self.surface
            .replace(Slot::OrderSummary, SlotContent::Rows(rows));
        self.surface
            .replace(Slot::OrderTotal, SlotContent::Text(format_price(store.total())));
    }

    /// Renders the list and the badge.
    pub fn refresh<S: CartStorage>(&mut self, store: &CartStore<S>) {
        self.render_list(store);
        self.update_badge(store);
    }

    /// Refreshes only if the store changed since the last render.
    pub fn sync<S: CartStorage>(&mut self, store: &CartStore<S>) -> bool {
        if self.rendered_revision == Some(store.revision()) {
            return false;
        }
        self.refresh(store);
        true
    }

    /// Applies a command to the store and re-renders if it changed anything.
    pub fn dispatch<S: CartStorage>(
        &mut self,
        store: &mut CartStore<S>,
        command: &CartCommand,
    ) -> bool {
        let changed = match command {
            CartCommand::Increment { product_id, size } => match store.find(product_id, size) {
                Some(line) => {
                    let quantity = line.quantity.saturating_add(1);
                    store.set_quantity(product_id, quantity, size)
                }
                None => false,
            },
            CartCommand::Decrement { product_id, size } => match store.find(product_id, size) {
                Some(line) => {
                    let quantity = line.quantity.saturating_sub(1);
                    store.set_quantity(product_id, quantity, size)
                }
                None => false,
            },
            CartCommand::Remove { product_id, size } => store.remove_item(product_id, size),
            CartCommand::Clear => {
                if store.is_empty() || !self.surface.confirm(CLEAR_PROMPT) {
                    false
                } else {
                    store.clear();
                    true
                }
            }
        };

        if changed {
            self.refresh(store);
        }
        changed
    }

    /// Switches the checkout form between its idle, busy and outcome states.
    pub fn show_checkout_state(&mut self, state: &CheckoutState) {
        match state {
            CheckoutState::Idle => {
                self.surface.set_enabled(Slot::SubmitButton, true);
                self.surface
                    .replace(Slot::SubmitButton, SlotContent::Text(SUBMIT_LABEL.to_string()));
            }
            CheckoutState::Submitting => {
                self.surface.set_enabled(Slot::SubmitButton, false);
                self.surface.replace(
                    Slot::SubmitButton,
                    SlotContent::Text(SUBMITTING_LABEL.to_string()),
                );
                self.surface.set_visible(Slot::ErrorState, false);
            }
            CheckoutState::Succeeded => {
                self.surface.set_visible(Slot::CheckoutForm, false);
                self.surface.set_visible(Slot::SuccessState, true);
                self.surface.set_visible(Slot::ErrorState, false);
            }
            CheckoutState::Failed(reason) => {
                self.surface
                    .replace(Slot::ErrorState, SlotContent::Text(reason.clone()));
                self.surface.set_visible(Slot::ErrorState, true);
                self.surface.set_visible(Slot::SuccessState, false);
            }
        }
    }

    /// Mirrors the notification center into its slot.
    pub fn show_notice(&mut self, notice: Option<&Notice>) {
        match notice {
            Some(notice) => {
                self.surface
                    .replace(Slot::Notification, SlotContent::Text(notice.message.clone()));
                self.surface.set_visible(Slot::Notification, true);
            }
            None => self.surface.set_visible(Slot::Notification, false),
        }
    }
}
