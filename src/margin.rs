//! Forward margin formulas over a raw position.
//!
//! A position is `(quote, base)`: free collateral plus signed base holdings.
//! Everything below derives from one identity, `margin = quote + base * price`,
//! together with `leverage = notional / margin` and the liquidation relation in
//! [`liquidation_price_with_buffer`]. All arithmetic stays in `Decimal`; no
//! value ever passes through a float.

use crate::config::RiskParams;
use crate::types::{Price, Quote, SignedSize};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Leverage reported when margin is zero or negative: the account is already
/// past the point where leverage is meaningful (infinite risk).
pub const LEVERAGE_UNDEFINED: Decimal = dec!(-1);

/// `|base| * price`, the absolute position value.
pub fn calc_notional_value(base: SignedSize, price: Price) -> Quote {
    Quote::new(base.abs() * price.value())
}

/// Account equity: what the account is worth if closed out at `price`.
pub fn calc_total_margin(quote: Quote, base: SignedSize, price: Price) -> Quote {
    Quote::new(quote.value() + base.value() * price.value())
}

/// Quote borrowed from the protocol to hold the position. Never negative.
pub fn calc_borrowed(quote: Quote, base: SignedSize, price: Price) -> Quote {
    let notional = calc_notional_value(base, price);
    let margin = calc_total_margin(quote, base, price);
    Quote::new(Decimal::ZERO.max(notional.value() - margin.value()))
}

/// Current leverage multiplier, or [`LEVERAGE_UNDEFINED`] when margin <= 0.
pub fn calc_leverage(quote: Quote, base: SignedSize, price: Price) -> Decimal {
    let margin = calc_total_margin(quote, base, price);
    if margin.value() <= Decimal::ZERO {
        return LEVERAGE_UNDEFINED;
    }
    calc_notional_value(base, price).value() / margin.value()
}

// the liquidation guard: no borrowings and a non-negative base carries no
// liquidation risk at all
fn has_liquidation_risk(quote: Quote, base: SignedSize, price: Price) -> bool {
    calc_borrowed(quote, base, price).value() > Decimal::ZERO || base.is_short()
}

/// Minimum margin the account must hold to avoid liquidation: the full gas
/// reimbursement buffer plus notional at max leverage. Zero for an unleveraged
/// long or flat account.
pub fn calc_minimum_margin(
    quote: Quote,
    base: SignedSize,
    price: Price,
    params: &RiskParams,
) -> Quote {
    if has_liquidation_risk(quote, base, price) {
        let notional = calc_notional_value(base, price);
        Quote::new(params.liquidation_buffer() + notional.value() / params.max_leverage)
    } else {
        Quote::zero()
    }
}

/// The linear relation between a position and the price at which its margin
/// falls to minimum margin for a given buffer. Both directions collapse into
/// one formula keyed on the sign of `base`:
///
/// `liq = maxLev * (buffer - quote) / (base * (maxLev - sign(base)))`
///
/// Caller guarantees `base != 0`.
pub fn liquidation_price_with_buffer(
    quote: Quote,
    base: SignedSize,
    buffer: Decimal,
    max_leverage: Decimal,
) -> Decimal {
    debug_assert!(!base.is_zero(), "liquidation price needs a position");
    let sign = if base.is_long() { dec!(1) } else { dec!(-1) };
    max_leverage * (buffer - quote.value()) / (base.value() * (max_leverage - sign))
}

/// Price at which the account becomes eligible for liquidation. Zero when the
/// account has no liquidation risk.
pub fn calc_liquidation_price(
    quote: Quote,
    base: SignedSize,
    price: Price,
    params: &RiskParams,
) -> Decimal {
    if base.is_zero() || !has_liquidation_risk(quote, base, price) {
        return Decimal::ZERO;
    }
    liquidation_price_with_buffer(quote, base, params.liquidation_buffer(), params.max_leverage)
}

/// Price at which liquidating the account turns profitable for the liquidator.
/// Zero when the account has no liquidation risk.
pub fn calc_profitable_liquidation_price(
    quote: Quote,
    base: SignedSize,
    price: Price,
    params: &RiskParams,
) -> Decimal {
    if base.is_zero() || !has_liquidation_risk(quote, base, price) {
        return Decimal::ZERO;
    }
    liquidation_price_with_buffer(quote, base, params.profitable_buffer(), params.max_leverage)
}

/// Quote that can be withdrawn while leaving exactly minimum margin behind.
/// Withdrawing all of it parks the account just above its liquidation price.
pub fn calc_withdrawable(
    quote: Quote,
    base: SignedSize,
    price: Price,
    params: &RiskParams,
) -> Quote {
    let margin = calc_total_margin(quote, base, price);
    let reserved = if !base.is_zero() {
        params.liquidation_buffer()
            + calc_notional_value(base, price).value() / params.max_leverage
    } else {
        Decimal::ZERO
    };
    Quote::new(margin.value() - reserved)
}

/// Notional the account could still take on: margin headroom at max leverage.
pub fn calc_buying_power(
    quote: Quote,
    base: SignedSize,
    price: Price,
    params: &RiskParams,
) -> Quote {
    let margin = calc_total_margin(quote, base, price);
    let minimum = calc_minimum_margin(quote, base, price, params);
    Quote::new(Decimal::ZERO.max((margin.value() - minimum.value()) * params.max_leverage))
}

/// Share of margin above the minimum requirement, as a percentage.
/// Zero when margin is non-positive (the account is past the point of having
/// available margin).
pub fn calc_available_margin_percent(
    quote: Quote,
    base: SignedSize,
    price: Price,
    params: &RiskParams,
) -> Decimal {
    let margin = calc_total_margin(quote, base, price);
    if margin.value() <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let minimum = calc_minimum_margin(quote, base, price, params);
    (Decimal::ONE - minimum.value() / margin.value()) * dec!(100)
}
