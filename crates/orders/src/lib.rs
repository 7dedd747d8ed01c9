//! Order reservations and contact messages.
//!
//! Requests are validated into typed values, priced at submission time
//! through [`bullion_pricing::PricingService`] or the coin inventory, and
//! turned into notification emails. Nothing here persists state or takes
//! payment.

pub mod error;
pub mod notify;
pub mod order;
pub mod validation;

pub use error::OrderError;
pub use notify::{EmailMessage, LogNotifier, MailSettings, Notifier, NotifyError};
pub use order::{
    reserve, Customer, OrderId, OrderItem, OrderStatus, OrderSummary, Reservation,
    ReservationPolicy, WireInstructions, PAYMENT_WINDOW_HOURS,
};
pub use validation::{
    ContactRequest, OrderRequest, OrderTarget, ValidContact, ValidOrder, ValidationErrors,
    MAX_ORDER_QUANTITY,
};
