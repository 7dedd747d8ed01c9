//! Notification emails for reservations and contact messages.
//!
//! Rendering is pure; delivery goes through a [`Notifier`]. A failed delivery
//! is logged and never turns a successful request into an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::order::{Reservation, PAYMENT_WINDOW_HOURS};
use crate::validation::ValidContact;

const BRAND: &str = "Bache & Co.";
const DEADLINE_FORMAT: &str = "%A, %B %-d, %Y at %-I:%M %p UTC";

/// Sender and back-office addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub from: String,
    pub admin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("mail transport rejected message to {to}: {reason}")]
    Rejected { to: String, reason: String },

    #[error("mail transport unavailable: {0}")]
    Unavailable(String),
}

/// Outbound mail transport.
pub trait Notifier: Send + Sync {
    fn send(&self, message: &EmailMessage) -> Result<(), NotifyError>;

    /// Send and swallow the failure after logging it.
    fn send_or_log(&self, message: &EmailMessage) -> bool {
        match self.send(message) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(
                    error = %err,
                    to = %message.to,
                    subject = %message.subject,
                    "notification failed"
                );
                false
            }
        }
    }
}

impl<N> Notifier for std::sync::Arc<N>
where
    N: Notifier + ?Sized,
{
    fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        (**self).send(message)
    }
}

/// Writes messages to the tracing log instead of a mail API.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        tracing::info!(
            from = %message.from,
            to = %message.to,
            reply_to = message.reply_to.as_deref().unwrap_or(""),
            subject = %message.subject,
            body_len = message.text.len(),
            "email queued"
        );
        Ok(())
    }
}

fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value.as_deref().unwrap_or(default)
}

impl MailSettings {
    pub fn new(from: impl Into<String>, admin: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            admin: admin.into(),
        }
    }

    /// Back-office alert for a new reservation; replies go to the customer.
    pub fn order_admin_notification(&self, reservation: &Reservation) -> EmailMessage {
        let summary = &reservation.summary;
        let customer = &reservation.customer;
        let total = summary.total.format_usd();
        let products = summary
            .items
            .iter()
            .map(|item| item.product_name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let mut text = String::new();
        text.push_str("NEW ORDER RECEIVED\n==================\n\n");
        text.push_str(&format!("Order ID: {}\n", reservation.order_id));
        text.push_str(&format!("Date: {}\n\n", summary.created_at.to_rfc3339()));
        text.push_str("CUSTOMER INFORMATION\n--------------------\n");
        text.push_str(&format!("Name: {}\n", customer.name));
        text.push_str(&format!("Email: {}\n", customer.email));
        text.push_str(&format!(
            "Phone: {}\n\n",
            or_default(&customer.phone, "Not provided")
        ));
        text.push_str("ORDER DETAILS\n-------------\n");
        for item in &summary.items {
            text.push_str(&format!(
                "{} (SKU {}) x {} @ {} (spot {}, premium {})\n",
                item.product_name,
                item.sku,
                item.quantity,
                item.price_per_unit.format_usd(),
                item.spot_price_at_order,
                item.premium.format_usd(),
            ));
        }
        text.push_str(&format!("Subtotal: {}\n", summary.subtotal.format_usd()));
        text.push_str(&format!("Shipping: {}\n", summary.shipping.format_usd()));
        text.push_str(&format!("Total: {total}\n\n"));
        text.push_str(&format!(
            "Shipping Address:\n{}\n\n",
            or_default(&customer.shipping_address, "To be confirmed")
        ));
        text.push_str(&format!(
            "Customer Notes:\n{}\n\n",
            or_default(&customer.notes, "None")
        ));
        text.push_str("==================\nACTION REQUIRED:\n");
        text.push_str("1. Reply to this email with wire transfer details\n");
        text.push_str("2. Mark coin as \"reserved\" in inventory\n");
        text.push_str(&format!(
            "3. Monitor for payment within {PAYMENT_WINDOW_HOURS} hours\n\n"
        ));
        text.push_str("Reply directly to respond to customer.");

        EmailMessage {
            from: self.from.clone(),
            to: self.admin.clone(),
            reply_to: Some(customer.email.clone()),
            subject: format!("NEW ORDER: {} - {total} - {products}", reservation.order_id),
            text,
        }
    }

    /// Confirmation with wire instructions and the payment deadline.
    pub fn order_customer_confirmation(&self, reservation: &Reservation) -> EmailMessage {
        let summary = &reservation.summary;
        let wire = &reservation.wire_instructions;
        let deadline = wire.payment_deadline.format(DEADLINE_FORMAT);

        let mut text = String::new();
        text.push_str("BACHE & CO. - ORDER CONFIRMATION\n================================\n\n");
        text.push_str(&format!(
            "Thank you for your reservation, {}!\n\n",
            reservation.customer.name
        ));
        text.push_str("ORDER DETAILS\n-------------\n");
        text.push_str(&format!("Order Reference: {}\n", reservation.order_id));
        for item in &summary.items {
            text.push_str(&format!(
                "Item: {} x {} @ {}\n",
                item.product_name,
                item.quantity,
                item.price_per_unit.format_usd()
            ));
        }
        text.push_str(&format!("Total: {}\n\n", summary.total.format_usd()));
        text.push_str("PAYMENT INSTRUCTIONS\n--------------------\n");
        text.push_str("To complete your purchase, please send payment via wire transfer:\n\n");
        text.push_str(&format!("Bank Name: {}\n", wire.bank_name));
        text.push_str(&format!("Reference/Memo: {}\n\n", wire.reference));
        text.push_str(&format!(
            "IMPORTANT: Include your order reference ({}) in the wire memo.\n\n",
            wire.reference
        ));
        text.push_str("PAYMENT DEADLINE\n----------------\n");
        text.push_str(&format!("{deadline}\n\n"));
        text.push_str(&format!(
            "Your coin is reserved for {PAYMENT_WINDOW_HOURS} hours. If payment is not \
             received by this time,\nthe reservation will be released.\n\n"
        ));
        text.push_str(&format!(
            "QUESTIONS?\n----------\nReply to this email or contact us at {}\n\n",
            self.admin
        ));
        text.push_str(&format!("Thank you for choosing {BRAND}!"));

        EmailMessage {
            from: self.from.clone(),
            to: reservation.customer.email.clone(),
            reply_to: None,
            subject: format!("Order Confirmed - {} | {BRAND}", reservation.order_id),
            text,
        }
    }

    pub fn contact_notification(&self, contact: &ValidContact) -> EmailMessage {
        let text = format!(
            "NEW CONTACT MESSAGE\n===================\n\n\
             From: {}\nEmail: {}\nSubject: {}\n\nMessage:\n{}\n\n\
             ===================\nReply directly to this email to respond to the customer.",
            contact.name, contact.email, contact.subject, contact.message
        );

        EmailMessage {
            from: self.from.clone(),
            to: self.admin.clone(),
            reply_to: Some(contact.email.clone()),
            subject: format!("Contact Form: {}", contact.subject),
            text,
        }
    }
}
