//! Cart state machine with snapshot persistence.

use common::OrderLine;

use crate::line::{CartLine, Product};
use crate::storage::{CART_STORAGE_KEY, CartStorage};

/// Single source of truth for the cart contents of one session.
///
/// Every mutation writes the whole snapshot back to storage and bumps
/// `revision()`, which views compare against to know when to re-render.
/// The in-memory state wins if a write fails: the failure is logged and the
/// next successful write catches storage up.
#[derive(Debug)]
pub struct CartStore<S: CartStorage> {
    storage: S,
    lines: Vec<CartLine>,
    revision: u64,
}

impl<S: CartStorage> CartStore<S> {
    /// Hydrates a store from the persisted snapshot.
    ///
    /// A missing, unreadable or malformed snapshot yields an empty cart.
    pub fn load(storage: S) -> Self {
        let lines = read_snapshot(&storage);
        tracing::debug!(lines = lines.len(), "cart loaded");
        Self {
            storage,
            lines,
            revision: 0,
        }
    }

    /// Re-reads the snapshot, discarding in-memory state.
    pub fn reload(&mut self) {
        self.lines = read_snapshot(&self.storage);
        self.revision += 1;
    }

    /// Adds one unit of `product` and returns the resulting line quantity.
    ///
    /// Adding the same (id, size) again increments the existing line.
    pub fn add_item(&mut self, product: Product) -> u32 {
        let quantity = match self
            .lines
            .iter_mut()
            .find(|line| line.matches(&product.id, &product.size))
        {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(1);
                line.quantity
            }
            None => {
                self.lines.push(CartLine {
                    unit_price: product.price.coerce(),
                    product_id: product.id,
                    display_name: product.name,
                    image_ref: product.image,
                    size: product.size,
                    quantity: 1,
                });
                1
            }
        };

        self.commit();
        quantity
    }

    /// Removes the (id, size) line. Returns false if there was none.
    pub fn remove_item(&mut self, product_id: &str, size: &str) -> bool {
        let Some(index) = self
            .lines
            .iter()
            .position(|line| line.matches(product_id, size))
        else {
            return false;
        };

        self.lines.remove(index);
        self.commit();
        true
    }

    /// Overwrites the quantity of the (id, size) line.
    ///
    /// A quantity of 0 removes the line. Returns false if there is no line.
    pub fn set_quantity(&mut self, product_id: &str, new_quantity: u32, size: &str) -> bool {
        if new_quantity < 1 {
            return self.remove_item(product_id, size);
        }

        let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.matches(product_id, size))
        else {
            return false;
        };

        line.quantity = new_quantity;
        self.commit();
        true
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.commit();
    }

    /// Sum of price × quantity over all lines.
    pub fn total(&self) -> u64 {
        self.lines
            .iter()
            .fold(0u64, |acc, line| acc.saturating_add(line.subtotal()))
    }

    /// Sum of quantities over all lines.
    pub fn count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn find(&self, product_id: &str, size: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.matches(product_id, size))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Increases on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn snapshot(&self) -> Vec<CartLine> {
        self.lines.clone()
    }

    /// Copy of the lines as they go into an order.
    pub fn order_lines(&self) -> Vec<OrderLine> {
        self.lines.iter().map(OrderLine::from).collect()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn commit(&mut self) {
        self.revision += 1;
        self.persist();
    }

    fn persist(&mut self) {
        let snapshot = match serde_json::to_string(&self.lines) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode cart snapshot");
                return;
            }
        };

        if let Err(e) = self.storage.write(CART_STORAGE_KEY, &snapshot) {
            tracing::warn!(error = %e, "failed to persist cart snapshot");
        }
    }
}

fn read_snapshot<S: CartStorage>(storage: &S) -> Vec<CartLine> {
    let raw = match storage.read(CART_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "cart storage unreadable, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<CartLine>>(&raw) {
        Ok(lines) => merge_lines(lines),
        Err(e) => {
            tracing::warn!(error = %e, "malformed cart snapshot, starting empty");
            Vec::new()
        }
    }
}

/// Drops empty lines and folds repeated (id, size) pairs into the first
/// occurrence, so the cart holds at most one line per pair.
fn merge_lines(lines: Vec<CartLine>) -> Vec<CartLine> {
    let mut merged: Vec<CartLine> = Vec::with_capacity(lines.len());
    for line in lines.into_iter().filter(|line| line.quantity > 0) {
        match merged
            .iter_mut()
            .find(|existing| existing.matches(&line.product_id, &line.size))
        {
            Some(existing) => {
                tracing::debug!(id = %line.product_id, size = %line.size, "merging duplicate cart line");
                existing.quantity = existing.quantity.saturating_add(line.quantity);
            }
            None => merged.push(line),
        }
    }
    merged
}
