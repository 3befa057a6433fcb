//! Checkout form validation.

use std::sync::LazyLock;

use common::CustomerDetails;
use regex::Regex;

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+7)?\s?\(?\d{3}\)?\s?\d{3}[\s-]?\d{2}[\s-]?\d{2}$").expect("valid phone regex")
});

static ZIP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{6}$").expect("valid zip regex"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

const PHONE_DIGITS: usize = 11;
const MIN_NAME_WORDS: usize = 3;
const MIN_ADDRESS_CHARS: usize = 10;

/// Raw checkout form input as typed by the customer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub name: String,
    pub phone: String,
    pub zip: String,
    pub address: String,
    pub email: String,
}

impl CheckoutForm {
    /// Customer details with surrounding whitespace removed.
    pub fn to_customer(&self) -> CustomerDetails {
        CustomerDetails {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            zip: self.zip.trim().to_string(),
            address: self.address.trim().to_string(),
            email: self.email.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Phone,
    Zip,
    Address,
    Email,
}

/// A failed rule and the message shown for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: Field, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Checks every field and returns all failures in form order.
///
/// An empty result means the form is valid.
pub fn validate(form: &CheckoutForm) -> Vec<FieldError> {
    let customer = form.to_customer();
    let mut errors = Vec::new();

    if customer.name.split_whitespace().count() < MIN_NAME_WORDS {
        errors.push(FieldError::new(
            Field::Name,
            "Full name must have three words (last name, first name, patronymic)",
        ));
    }

    if !is_valid_phone(&customer.phone) {
        errors.push(FieldError::new(
            Field::Phone,
            "Enter a valid Russian phone number (e.g. +7 (999) 123-45-67)",
        ));
    }

    if !ZIP_RE.is_match(&customer.zip) {
        errors.push(FieldError::new(Field::Zip, "Postal code must be 6 digits"));
    }

    if customer.address.chars().count() < MIN_ADDRESS_CHARS {
        errors.push(FieldError::new(
            Field::Address,
            "Enter the full delivery address (at least 10 characters)",
        ));
    }

    if !is_valid_email(&customer.email) {
        errors.push(FieldError::new(Field::Email, "Enter a valid email address"));
    }

    errors
}

pub fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    digits == PHONE_DIGITS && PHONE_RE.is_match(phone)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}
