//! Named-slot binding between the cart view and whatever displays it.

use std::collections::HashMap;

use crate::view::CartCommand;

/// Semantic place in the page the view writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    CartList,
    CartTotal,
    Badge,
    OrderSummary,
    OrderTotal,
    Notification,
    CheckoutForm,
    SubmitButton,
    SuccessState,
    ErrorState,
}

impl Slot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::CartList => "cart-list",
            Slot::CartTotal => "cart-total",
            Slot::Badge => "badge",
            Slot::OrderSummary => "order-summary",
            Slot::OrderTotal => "order-total",
            Slot::Notification => "notification",
            Slot::CheckoutForm => "checkout-form",
            Slot::SubmitButton => "submit-button",
            Slot::SuccessState => "success-state",
            Slot::ErrorState => "error-state",
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Suffix for amounts shown to the customer.
pub const CURRENCY: &str = "₽";

/// Formats an amount the way the page shows it, e.g. `"4000 ₽"`.
pub fn format_price(amount: u64) -> String {
    format!("{amount} {CURRENCY}")
}

/// One rendered row of a list slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub label: String,
    pub image: String,
    /// Shown with +/- controls in the cart list; folded into the label in
    /// the order summary.
    pub quantity: Option<u32>,
    pub amount: u64,
    /// Commands bound to the row's controls.
    pub actions: Vec<CartCommand>,
}

impl RowView {
    /// The row amount with the currency suffix.
    pub fn cost(&self) -> String {
        format_price(self.amount)
    }
}

/// Placeholder shown instead of rows when the cart is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub link_label: String,
    pub link_href: String,
}

/// Content written into a slot. Always replaces what was there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotContent {
    Text(String),
    Rows(Vec<RowView>),
    Empty(EmptyState),
}

/// Output side of the view.
pub trait ViewSurface {
    /// Replaces the whole content of `slot`.
    fn replace(&mut self, slot: Slot, content: SlotContent);

    fn set_visible(&mut self, slot: Slot, visible: bool);

    fn set_enabled(&mut self, slot: Slot, enabled: bool);

    /// Asks the user a yes/no question.
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Recorded state of one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotState {
    pub content: Option<SlotContent>,
    pub visible: bool,
    pub enabled: bool,
}

impl Default for SlotState {
    fn default() -> Self {
        Self {
            content: None,
            visible: true,
            enabled: true,
        }
    }
}

/// Surface that keeps slot state in memory.
///
/// Used for headless sessions and for inspecting what the view produced.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    slots: HashMap<Slot, SlotState>,
    confirm_answer: bool,
    prompts: Vec<String>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            confirm_answer: true,
            prompts: Vec::new(),
        }
    }
}

impl MemorySurface {
    /// Creates a surface that answers yes to every confirmation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the answer given to future confirmations.
    pub fn set_confirm_answer(&mut self, answer: bool) {
        self.confirm_answer = answer;
    }

    /// Returns the state of a slot (default state if never written).
    pub fn state(&self, slot: Slot) -> SlotState {
        self.slots.get(&slot).cloned().unwrap_or_default()
    }

    pub fn content(&self, slot: Slot) -> Option<&SlotContent> {
        self.slots.get(&slot)?.content.as_ref()
    }

    /// Returns the slot's text, if it holds text.
    pub fn text(&self, slot: Slot) -> Option<&str> {
        match self.content(slot)? {
            SlotContent::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the slot's rows, if it holds rows.
    pub fn rows(&self, slot: Slot) -> Option<&[RowView]> {
        match self.content(slot)? {
            SlotContent::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn is_visible(&self, slot: Slot) -> bool {
        self.slots.get(&slot).is_none_or(|state| state.visible)
    }

    pub fn is_enabled(&self, slot: Slot) -> bool {
        self.slots.get(&slot).is_none_or(|state| state.enabled)
    }

    /// Prompts shown through `confirm`, oldest first.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut SlotState {
        self.slots.entry(slot).or_default()
    }
}

impl ViewSurface for MemorySurface {
    fn replace(&mut self, slot: Slot, content: SlotContent) {
        self.slot_mut(slot).content = Some(content);
    }

    fn set_visible(&mut self, slot: Slot, visible: bool) {
        self.slot_mut(slot).visible = visible;
    }

    fn set_enabled(&mut self, slot: Slot, enabled: bool) {
        self.slot_mut(slot).enabled = enabled;
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        self.prompts.push(prompt.to_string());
        self.confirm_answer
    }
}
