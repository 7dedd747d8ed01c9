//! Form validation for order reservations and contact messages.
//!
//! Errors are collected per field; when a field breaks several rules only the
//! first message is kept.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Number;

use bullion_catalog::Sku;

/// Orders above this many coins go through the contact form instead.
pub const MAX_ORDER_QUANTITY: i64 = 100;

const NOTES_MAX: usize = 500;

/// Field name -> first failing rule's message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field` unless the field already failed.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl core::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

fn check_length(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    min: usize,
    max: usize,
    label: &str,
) {
    let len = value.chars().count();
    if len < min {
        errors.add(field, format!("{label} must be at least {min} characters"));
    } else if len > max {
        errors.add(field, format!("{label} must be less than {max} characters"));
    }
}

/// Pragmatic address check: `local@domain.tld`, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty() && !host.ends_with('.'),
        None => false,
    }
}

fn is_valid_phone(phone: &str) -> bool {
    phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '+' | '(' | ')'))
}

/// Integral value of a JSON number; `3.0` counts, `2.5` does not.
fn whole_number(value: &Number) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    if value.as_u64().is_some() {
        return Some(i64::MAX);
    }
    value
        .as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        .map(|f| f as i64)
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Raw reservation form as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// SKU of the product being reserved, or the coin's display name when
    /// `coin_sku` is set.
    pub product: String,
    /// Any JSON number; whole numbers only pass validation.
    pub quantity: Number,
    #[serde(default)]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub agreed_to_terms: bool,
    /// Set when reserving an individually listed coin.
    #[serde(default)]
    pub coin_sku: Option<String>,
}

/// What a validated order reserves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderTarget {
    /// A spot-priced catalog product.
    Product(Sku),
    /// A listed numismatic coin.
    Coin(Sku),
}

impl OrderTarget {
    pub fn sku(&self) -> &Sku {
        match self {
            Self::Product(sku) | Self::Coin(sku) => sku,
        }
    }
}

/// A reservation form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidOrder {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub target: OrderTarget,
    pub quantity: u32,
    pub shipping_address: Option<String>,
    pub notes: Option<String>,
}

impl OrderRequest {
    pub fn validate(&self) -> Result<ValidOrder, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = self.name.trim();
        check_length(&mut errors, "name", name, 2, 100, "Name");

        let email = self.email.trim();
        if !is_valid_email(email) {
            errors.add("email", "Please enter a valid email address");
        }

        let phone = non_blank(&self.phone);
        if phone.as_deref().is_some_and(|p| !is_valid_phone(p)) {
            errors.add("phone", "Please enter a valid phone number");
        }

        let target = if self.product.trim().is_empty() {
            errors.add("product", "Please select a product");
            None
        } else if let Some(coin_sku) = &self.coin_sku {
            match Sku::parse(coin_sku) {
                Ok(sku) => Some(OrderTarget::Coin(sku)),
                Err(_) => {
                    errors.add("coinSku", "Please select a valid coin");
                    None
                }
            }
        } else {
            match Sku::parse(&self.product) {
                Ok(sku) => Some(OrderTarget::Product(sku)),
                Err(_) => {
                    errors.add("product", "Please select a valid product");
                    None
                }
            }
        };

        let quantity = match whole_number(&self.quantity) {
            None => {
                errors.add("quantity", "Quantity must be a whole number");
                None
            }
            Some(q) if q < 1 => {
                errors.add("quantity", "Quantity must be at least 1");
                None
            }
            Some(q) if q > MAX_ORDER_QUANTITY => {
                errors.add(
                    "quantity",
                    "For orders over 100 coins, please contact us directly",
                );
                None
            }
            Some(q) => u32::try_from(q).ok(),
        };

        let notes = non_blank(&self.notes);
        if notes.as_deref().is_some_and(|n| n.chars().count() > NOTES_MAX) {
            errors.add("notes", "Notes must be less than 500 characters");
        }

        if !self.agreed_to_terms {
            errors.add("agreedToTerms", "You must agree to the terms and conditions");
        }

        match (target, quantity) {
            (Some(target), Some(quantity)) if errors.is_empty() => Ok(ValidOrder {
                name: name.to_string(),
                email: email.to_string(),
                phone,
                target,
                quantity,
                shipping_address: non_blank(&self.shipping_address),
                notes,
            }),
            _ => Err(errors),
        }
    }
}

/// Raw contact form as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// A contact form that passed validation (fields trimmed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidContact {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactRequest {
    pub fn validate(&self) -> Result<ValidContact, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = self.name.trim();
        check_length(&mut errors, "name", name, 2, 100, "Name");

        let email = self.email.trim();
        if !is_valid_email(email) {
            errors.add("email", "Please enter a valid email address");
        }

        let subject = self.subject.trim();
        check_length(&mut errors, "subject", subject, 3, 200, "Subject");

        let message = self.message.trim();
        check_length(&mut errors, "message", message, 10, 2000, "Message");

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(ValidContact {
            name: name.to_string(),
            email: email.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn valid_order_request() -> OrderRequest {
        OrderRequest {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: Some("(555) 123-4567".to_string()),
            product: "MORGAN-BU".to_string(),
            quantity: Number::from(4u32),
            shipping_address: Some("1 Analytical Way, London".to_string()),
            notes: None,
            agreed_to_terms: true,
            coin_sku: None,
        }
    }

    pub(crate) fn coin_order_request(sku: &str) -> OrderRequest {
        OrderRequest {
            product: format!("Listed coin (SKU: {sku})"),
            quantity: Number::from(1u32),
            coin_sku: Some(sku.to_string()),
            ..valid_order_request()
        }
    }

    pub(crate) fn valid_contact_request() -> ContactRequest {
        ContactRequest {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Carson City dollars".to_string(),
            message: "Do you have any 1893-CC in stock?".to_string(),
        }
    }

    #[test]
    fn valid_order_passes_and_is_normalized() {
        let mut req = valid_order_request();
        req.name = "  Ada Lovelace ".to_string();
        req.notes = Some("   ".to_string());

        let order = req.validate().unwrap();
        assert_eq!(order.name, "Ada Lovelace");
        assert_eq!(order.target, OrderTarget::Product(Sku::parse("MORGAN-BU").unwrap()));
        assert_eq!(order.quantity, 4);
        assert_eq!(order.notes, None);
    }

    #[test]
    fn quantity_bounds_are_enforced() {
        let mut req = valid_order_request();
        req.quantity = Number::from(0u32);
        let errs = req.validate().unwrap_err();
        assert_eq!(errs.get("quantity"), Some("Quantity must be at least 1"));

        req.quantity = Number::from(101u32);
        let errs = req.validate().unwrap_err();
        assert_eq!(
            errs.get("quantity"),
            Some("For orders over 100 coins, please contact us directly")
        );

        req.quantity = Number::from(100u32);
        assert_eq!(req.validate().unwrap().quantity, 100);

        req.quantity = Number::from(u64::MAX);
        assert_eq!(
            req.validate().unwrap_err().get("quantity"),
            Some("For orders over 100 coins, please contact us directly")
        );
    }

    #[test]
    fn fractional_quantity_is_a_field_error() {
        let mut req = valid_order_request();
        req.quantity = Number::from_f64(2.5).unwrap();
        let errs = req.validate().unwrap_err();
        assert_eq!(errs.get("quantity"), Some("Quantity must be a whole number"));
        assert_eq!(errs.len(), 1);

        req.quantity = Number::from_f64(3.0).unwrap();
        assert_eq!(req.validate().unwrap().quantity, 3);
    }

    #[test]
    fn fractional_quantity_in_json_reaches_validation() {
        let json = r#"{
            "name": "Ada", "email": "ada@example.com",
            "product": "PEACE-BU", "quantity": 2.5, "agreedToTerms": true
        }"#;
        let req: OrderRequest = serde_json::from_str(json).unwrap();
        assert_eq!(
            req.validate().unwrap_err().get("quantity"),
            Some("Quantity must be a whole number")
        );
    }

    #[test]
    fn coin_sku_selects_a_coin_target() {
        let order = coin_order_request("MORGAN-1881-S-MS65").validate().unwrap();
        assert_eq!(
            order.target,
            OrderTarget::Coin(Sku::parse("MORGAN-1881-S-MS65").unwrap())
        );
        assert_eq!(order.target.sku().as_str(), "MORGAN-1881-S-MS65");

        let errs = coin_order_request("not a sku").validate().unwrap_err();
        assert_eq!(errs.get("coinSku"), Some("Please select a valid coin"));
    }

    #[test]
    fn every_failing_field_is_reported_once() {
        let req = OrderRequest {
            name: "A".to_string(),
            email: "not-an-email".to_string(),
            phone: Some("call me".to_string()),
            product: String::new(),
            quantity: Number::from(-3i64),
            shipping_address: None,
            notes: Some("x".repeat(501)),
            agreed_to_terms: false,
            coin_sku: None,
        };
        let errs = req.validate().unwrap_err();
        let fields: Vec<_> = errs.fields().collect();
        assert_eq!(
            fields,
            ["agreedToTerms", "email", "name", "notes", "phone", "product", "quantity"]
        );
        assert_eq!(errs.get("name"), Some("Name must be at least 2 characters"));
        assert_eq!(errs.get("product"), Some("Please select a product"));
    }

    #[test]
    fn first_message_per_field_wins() {
        let mut errs = ValidationErrors::new();
        errs.add("email", "first");
        errs.add("email", "second");
        assert_eq!(errs.get("email"), Some("first"));
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.to_string(), "email: first");
    }

    #[test]
    fn email_check_accepts_common_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@@b.com"));
        assert!(!is_valid_email("a@.com"));
    }

    #[test]
    fn order_request_deserializes_from_camel_case() {
        let json = r#"{
            "name": "Ada", "email": "ada@example.com",
            "product": "PEACE-BU", "quantity": 2, "agreedToTerms": true
        }"#;
        let req: OrderRequest = serde_json::from_str(json).unwrap();
        assert!(req.agreed_to_terms);
        assert_eq!(req.phone, None);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn contact_lengths_are_enforced() {
        assert!(valid_contact_request().validate().is_ok());

        let mut req = valid_contact_request();
        req.subject = "Hi".to_string();
        req.message = "short".to_string();
        let errs = req.validate().unwrap_err();
        assert_eq!(errs.get("subject"), Some("Subject must be at least 3 characters"));
        assert_eq!(errs.get("message"), Some("Message must be at least 10 characters"));

        let mut req = valid_contact_request();
        req.message = "m".repeat(2001);
        assert_eq!(
            req.validate().unwrap_err().get("message"),
            Some("Message must be less than 2000 characters")
        );
    }
}
