use crate::core::types::Market;
use rust_decimal::{Decimal, RoundingStrategy};

/// Truncate toward zero to `places` decimals. `None` leaves the value as is.
pub fn truncate(value: Decimal, places: Option<u32>) -> Decimal {
    places.map_or(value, |dp| {
        value.round_dp_with_strategy(dp, RoundingStrategy::ToZero)
    })
}

/// Round half away from zero to `places` decimals.
pub fn round(value: Decimal, places: Option<u32>) -> Decimal {
    places.map_or(value, |dp| {
        value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
    })
}

/// Amount formatted for the wire: truncated, trailing zeros dropped.
pub fn amount_to_precision(market: &Market, amount: Decimal) -> String {
    truncate(amount, market.precision.amount)
        .normalize()
        .to_string()
}

/// Price formatted for the wire: rounded, trailing zeros dropped.
pub fn price_to_precision(market: &Market, price: Decimal) -> String {
    round(price, market.precision.price).normalize().to_string()
}
