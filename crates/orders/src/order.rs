use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bullion_catalog::{CatalogRepository, CoinCatalog, Sku};
use bullion_core::Money;
use bullion_pricing::{coin_quote, PricingError, PricingService, SpotPrice, SpotPriceSource};

use crate::error::OrderError;
use crate::validation::{OrderRequest, OrderTarget, ValidOrder};

/// How long a reservation is held waiting for the wire transfer.
pub const PAYMENT_WINDOW_HOURS: i64 = 72;

const ORDER_ID_PREFIX: &str = "BCO";
const SUFFIX_LEN: usize = 5;
const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Human-quotable order reference, `BCO-<unix millis>-<5 base36 chars>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn generate(now: DateTime<Utc>) -> Self {
        let mut n = Uuid::new_v4().as_u128();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| {
                let c = BASE36[(n % 36) as usize] as char;
                n /= 36;
                c
            })
            .collect();
        Self(format!("{ORDER_ID_PREFIX}-{}-{suffix}", now.timestamp_millis()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Order lifecycle values. Only `PendingConfirmation` is produced here; the
/// later states are set by back-office handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    PendingConfirmation,
    PendingPayment,
    PaymentReceived,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

/// Priced line, frozen at the spot price in effect at submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub sku: Sku,
    pub product_name: String,
    pub quantity: u32,
    pub price_per_unit: Money,
    pub premium: Money,
    pub spot_price_at_order: SpotPrice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub order_id: OrderId,
    pub items: Vec<OrderItem>,
    pub subtotal: Money,
    pub shipping: Money,
    pub total: Money,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireInstructions {
    pub bank_name: String,
    pub reference: OrderId,
    pub payment_deadline: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub shipping_address: Option<String>,
    pub notes: Option<String>,
}

/// Outcome of a successful reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub order_id: OrderId,
    pub customer: Customer,
    pub summary: OrderSummary,
    pub wire_instructions: WireInstructions,
}

/// Dealer-side knobs for reservations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationPolicy {
    /// Flat shipping charge added to every order.
    pub shipping: Money,
    pub bank_name: String,
}

impl Default for ReservationPolicy {
    fn default() -> Self {
        Self {
            shipping: Money::ZERO,
            bank_name: "To be provided via email".to_string(),
        }
    }
}

/// Priced line plus the tier label used for logging.
struct PricedLine {
    item: OrderItem,
    subtotal: Money,
    tier: String,
}

fn price_product<C, S>(
    pricing: &PricingService<C, S>,
    sku: Sku,
    quantity: u32,
) -> Result<PricedLine, OrderError>
where
    C: CatalogRepository,
    S: SpotPriceSource,
{
    let product = pricing.product(&sku)?;
    if !product.in_stock {
        return Err(OrderError::OutOfStock(sku));
    }
    let quote = pricing.quote(&sku, quantity)?;

    Ok(PricedLine {
        item: OrderItem {
            sku,
            product_name: product.name.clone(),
            quantity,
            price_per_unit: quote.price_per_unit,
            premium: quote.tier.premium,
            spot_price_at_order: quote.spot_price,
        },
        subtotal: quote.total,
        tier: quote.tier.label,
    })
}

fn price_coin(
    coins: &CoinCatalog,
    spot: SpotPrice,
    sku: Sku,
    quantity: u32,
) -> Result<PricedLine, OrderError> {
    let coin = coins
        .get(&sku)
        .ok_or_else(|| OrderError::UnknownCoin(sku.clone()))?;
    if !coin.can_reserve(quantity) {
        return Err(OrderError::CoinUnavailable(sku));
    }
    let quote = coin_quote(spot, coin)?;
    let subtotal = quote
        .price
        .checked_times(quantity)
        .ok_or(PricingError::Overflow("order total"))?;

    Ok(PricedLine {
        item: OrderItem {
            sku,
            product_name: coin.name.clone(),
            quantity,
            price_per_unit: quote.price,
            premium: quote.premium.unwrap_or(Money::ZERO),
            spot_price_at_order: spot,
        },
        subtotal,
        tier: "single coin".to_string(),
    })
}

/// Validate, price and reserve an order for a catalog product or a listed coin.
///
/// The price is recomputed from the current spot quote; whatever the client
/// displayed is not trusted.
pub fn reserve<C, S>(
    pricing: &PricingService<C, S>,
    coins: &CoinCatalog,
    request: &OrderRequest,
    policy: &ReservationPolicy,
    now: DateTime<Utc>,
) -> Result<Reservation, OrderError>
where
    C: CatalogRepository,
    S: SpotPriceSource,
{
    let order = request.validate()?;
    let ValidOrder {
        name,
        email,
        phone,
        target,
        quantity,
        shipping_address,
        notes,
    } = order;

    let line = match target {
        OrderTarget::Product(sku) => price_product(pricing, sku, quantity)?,
        OrderTarget::Coin(sku) => price_coin(coins, pricing.spot_price(), sku, quantity)?,
    };
    let subtotal = line.subtotal;
    let total = subtotal
        .checked_add(policy.shipping)
        .ok_or(PricingError::Overflow("order total with shipping"))?;

    let order_id = OrderId::generate(now);
    tracing::info!(
        order_id = %order_id,
        sku = %line.item.sku,
        quantity,
        tier = %line.tier,
        total = %total,
        customer = %email,
        "order reserved"
    );

    Ok(Reservation {
        order_id: order_id.clone(),
        customer: Customer {
            name,
            email,
            phone,
            shipping_address,
            notes,
        },
        summary: OrderSummary {
            order_id: order_id.clone(),
            items: vec![line.item],
            subtotal,
            shipping: policy.shipping,
            total,
            status: OrderStatus::PendingConfirmation,
            created_at: now,
        },
        wire_instructions: WireInstructions {
            bank_name: policy.bank_name.clone(),
            reference: order_id,
            payment_deadline: now + Duration::hours(PAYMENT_WINDOW_HOURS),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::tests::{coin_order_request, valid_order_request};
    use bullion_catalog::{InMemoryCatalog, ProductCatalog};
    use bullion_pricing::FallbackSpotPrice;
    use serde_json::Number;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
    }

    fn pricing() -> PricingService<InMemoryCatalog, FallbackSpotPrice> {
        let catalog = InMemoryCatalog::builtin().unwrap();
        let spot = FallbackSpotPrice::from_catalog(&catalog).unwrap();
        PricingService::new(catalog, spot)
    }

    fn coins() -> CoinCatalog {
        CoinCatalog::builtin().unwrap()
    }

    #[test]
    fn reservation_is_priced_at_submission_spot() {
        let r = reserve(&pricing(), &coins(), &valid_order_request(), &ReservationPolicy::default(), test_time())
            .unwrap();

        let item = &r.summary.items[0];
        assert_eq!(item.sku.as_str(), "MORGAN-BU");
        assert_eq!(item.quantity, 4);
        assert_eq!(item.premium, Money::from_cents(2200));
        assert_eq!(item.price_per_unit.amount(), dec!(91.6096));
        assert_eq!(item.spot_price_at_order.per_oz(), dec!(90));

        assert_eq!(r.summary.subtotal.format_usd(), "$366.44");
        assert_eq!(r.summary.total, r.summary.subtotal);
        assert_eq!(r.summary.status, OrderStatus::PendingConfirmation);
        assert_eq!(r.customer.name, "Ada Lovelace");
    }

    #[test]
    fn shipping_is_added_to_total() {
        let policy = ReservationPolicy {
            shipping: Money::from_cents(1500),
            ..ReservationPolicy::default()
        };
        let r = reserve(&pricing(), &coins(), &valid_order_request(), &policy, test_time()).unwrap();
        assert_eq!(r.summary.shipping, Money::from_cents(1500));
        assert_eq!(
            r.summary.total.amount(),
            r.summary.subtotal.amount() + dec!(15)
        );
    }

    #[test]
    fn wire_instructions_reference_order_and_hold_for_72_hours() {
        let r = reserve(&pricing(), &coins(), &valid_order_request(), &ReservationPolicy::default(), test_time())
            .unwrap();
        assert_eq!(r.wire_instructions.reference, r.order_id);
        assert_eq!(r.summary.order_id, r.order_id);
        assert_eq!(r.wire_instructions.bank_name, "To be provided via email");
        assert_eq!(
            r.wire_instructions.payment_deadline,
            Utc.with_ymd_and_hms(2025, 1, 18, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn invalid_request_is_rejected_before_pricing() {
        let mut req = valid_order_request();
        req.agreed_to_terms = false;
        let err = reserve(&pricing(), &coins(), &req, &ReservationPolicy::default(), test_time()).unwrap_err();
        match err {
            OrderError::Invalid(errors) => assert!(errors.get("agreedToTerms").is_some()),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_product_is_reported() {
        let mut req = valid_order_request();
        req.product = "WALKER-1943".to_string();
        let err = reserve(&pricing(), &coins(), &req, &ReservationPolicy::default(), test_time()).unwrap_err();
        assert_eq!(err, OrderError::UnknownProduct(Sku::parse("WALKER-1943").unwrap()));
    }

    #[test]
    fn out_of_stock_product_cannot_be_reserved() {
        let json = r#"{
            "products": [{
                "sku": "MORGAN-BU", "name": "Morgan", "shortName": "Morgan",
                "weightOz": 0.77344, "purity": 0.9, "inStock": false,
                "premiumTiers": [{ "minQty": 1, "maxQty": null, "premium": 22, "label": "any" }]
            }],
            "spotPriceFallback": 90
        }"#;
        let catalog = InMemoryCatalog::new(ProductCatalog::from_json(json).unwrap()).unwrap();
        let spot = FallbackSpotPrice::from_catalog(&catalog).unwrap();
        let svc = PricingService::new(catalog, spot);

        let err = reserve(&svc, &coins(), &valid_order_request(), &ReservationPolicy::default(), test_time())
            .unwrap_err();
        assert!(matches!(err, OrderError::OutOfStock(_)));
    }

    #[test]
    fn total_beyond_decimal_range_is_an_error() {
        let policy = ReservationPolicy {
            shipping: Money::new(rust_decimal::Decimal::MAX),
            ..ReservationPolicy::default()
        };
        let err = reserve(&pricing(), &coins(), &valid_order_request(), &policy, test_time())
            .unwrap_err();
        assert!(matches!(err, OrderError::Pricing(PricingError::Overflow(_))));
    }

    #[test]
    fn fixed_price_coin_is_reserved_at_its_listed_price() {
        let req = coin_order_request("MORGAN-1893-CC-MS63");
        let r = reserve(&pricing(), &coins(), &req, &ReservationPolicy::default(), test_time())
            .unwrap();

        let item = &r.summary.items[0];
        assert_eq!(item.sku.as_str(), "MORGAN-1893-CC-MS63");
        assert_eq!(item.product_name, "1893-CC Morgan Silver Dollar PCGS MS63");
        assert_eq!(item.quantity, 1);
        assert_eq!(item.price_per_unit, Money::from_cents(425_000));
        assert_eq!(item.premium, Money::ZERO);
        assert_eq!(r.summary.total.format_usd(), "$4,250.00");
    }

    #[test]
    fn spot_based_coin_is_repriced_at_the_current_spot() {
        let mut req = coin_order_request("PEACE-1922-VF");
        req.quantity = Number::from(2u32);
        let r = reserve(&pricing(), &coins(), &req, &ReservationPolicy::default(), test_time())
            .unwrap();
        assert_eq!(r.summary.items[0].price_per_unit.amount(), dec!(91.6096));
        assert_eq!(r.summary.items[0].premium, Money::from_cents(2200));
        assert_eq!(r.summary.subtotal.amount(), dec!(183.2192));
    }

    #[test]
    fn coins_that_cannot_be_bought_online_are_rejected() {
        let policy = ReservationPolicy::default();
        let attempt = |sku: &str| {
            reserve(&pricing(), &coins(), &coin_order_request(sku), &policy, test_time()).unwrap_err()
        };

        assert!(matches!(
            attempt("MORGAN-1895-P-PR62"),
            OrderError::Pricing(PricingError::CallForPrice(_))
        ));
        assert!(matches!(attempt("MORGAN-1889-CC-VF20"), OrderError::CoinUnavailable(_)));
        assert!(matches!(attempt("PEACE-1928-MS62"), OrderError::CoinUnavailable(_)));
        assert_eq!(
            attempt("MORGAN-1901-S"),
            OrderError::UnknownCoin(Sku::parse("MORGAN-1901-S").unwrap())
        );

        let mut too_many = coin_order_request("MORGAN-1881-S-MS65");
        too_many.quantity = Number::from(4u32);
        let err = reserve(&pricing(), &coins(), &too_many, &policy, test_time()).unwrap_err();
        assert!(matches!(err, OrderError::CoinUnavailable(_)));
    }

    #[test]
    fn pricing_errors_other_than_unknown_product_are_wrapped() {
        let err: OrderError = PricingError::InvalidQuantity(0).into();
        assert_eq!(err, OrderError::Pricing(PricingError::InvalidQuantity(0)));
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(OrderStatus::PendingConfirmation).unwrap(),
            serde_json::json!("pending_confirmation")
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: generated ids always have the documented shape.
        #[test]
        fn order_id_has_expected_shape(secs in 0i64..4_000_000_000i64) {
            let now = Utc.timestamp_opt(secs, 0).unwrap();
            let id = OrderId::generate(now);
            let parts: Vec<_> = id.as_str().split('-').collect();

            prop_assert_eq!(parts.len(), 3);
            prop_assert_eq!(parts[0], "BCO");
            prop_assert_eq!(parts[1].parse::<i64>().unwrap(), now.timestamp_millis());
            prop_assert_eq!(parts[2].len(), 5);
            prop_assert!(parts[2].chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        }
    }
}
