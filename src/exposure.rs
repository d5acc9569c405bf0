//! Trade sizing against live order-book depth.
//!
//! Given a buying-power budget and the book's best levels, work out how much
//! exposure the budget actually buys, the volume-weighted price it would pay,
//! and the slippage versus the top of book. Orders must arrive sorted by
//! execution priority (best price first); this module consumes them greedily
//! and never reorders them.

use crate::types::{InputError, Price, Quote};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One price level of resting depth. Amount is in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatOrder {
    pub price: Price,
    pub amount: Decimal,
}

impl FlatOrder {
    pub fn new(price: Price, amount: Decimal) -> Result<Self, InputError> {
        if amount <= Decimal::ZERO {
            return Err(InputError::NonPositiveAmount { value: amount });
        }
        Ok(Self { price, amount })
    }
}

/// What a budget buys from the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeExposure {
    pub exposure: Decimal,
    pub slippage: Decimal,
    pub trade_price: Decimal,
}

impl TradeExposure {
    fn empty() -> Self {
        Self {
            exposure: Decimal::ZERO,
            slippage: Decimal::ZERO,
            trade_price: Decimal::ZERO,
        }
    }
}

/// Walk the book with `buying_power = quote * leverage`, eating whole levels
/// while the budget covers them and a fraction of the first level it cannot.
/// Budget left after the last level is simply unused: exposure is capped by
/// the depth on offer.
pub fn calc_trade_exposure(quote: Quote, leverage: Decimal, orders: &[FlatOrder]) -> TradeExposure {
    let Some(first) = orders.first() else {
        return TradeExposure::empty();
    };

    let mut exposure = Decimal::ZERO;
    let mut sum_of_weights = Decimal::ZERO;
    let mut total_units = Decimal::ZERO;
    let mut buying_power = quote.value() * leverage;

    for order in orders {
        let order_price = order.price.value();
        let cost = order.amount * order_price;
        if buying_power - cost >= Decimal::ZERO {
            // eat the whole level
            total_units += order_price * order.amount;
            sum_of_weights += order.amount;
            exposure += cost;
            buying_power -= cost;
        } else {
            // eat what the remaining budget covers, then stop
            if buying_power > Decimal::ZERO {
                total_units += buying_power * order_price;
                sum_of_weights += buying_power;
                exposure += buying_power / order_price;
            }
            break;
        }
    }

    let expected_price = first.price.value();
    // weighted average of the prices by how much was taken at each
    let trade_price = if !total_units.is_zero() {
        total_units / sum_of_weights
    } else {
        expected_price
    };

    TradeExposure {
        exposure,
        slippage: ((expected_price - trade_price) / expected_price).abs(),
        trade_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn book() -> Vec<FlatOrder> {
        vec![
            FlatOrder::new(Price::new_unchecked(dec!(1)), dec!(10)).unwrap(),
            FlatOrder::new(Price::new_unchecked(dec!(1.1)), dec!(20)).unwrap(),
            FlatOrder::new(Price::new_unchecked(dec!(1.2)), dec!(30)).unwrap(),
        ]
    }

    fn assert_close(actual: Decimal, expected: Decimal, eps: Decimal) {
        assert!(
            (actual - expected).abs() < eps,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn empty_book() {
        let result = calc_trade_exposure(Quote::new(dec!(100)), dec!(1), &[]);
        assert_eq!(result.exposure, Decimal::ZERO);
        assert_eq!(result.slippage, Decimal::ZERO);
        assert_eq!(result.trade_price, Decimal::ZERO);
    }

    #[test]
    fn zero_budget_defaults_to_best_price() {
        let result = calc_trade_exposure(Quote::zero(), dec!(1), &book());
        assert_eq!(result.exposure, Decimal::ZERO);
        assert_eq!(result.slippage, Decimal::ZERO);
        assert_eq!(result.trade_price, dec!(1));
    }

    #[test]
    fn fits_inside_best_level() {
        let result = calc_trade_exposure(Quote::new(dec!(10)), dec!(1), &book());
        assert_eq!(result.exposure, dec!(10));
        assert_eq!(result.slippage, Decimal::ZERO);
        assert_eq!(result.trade_price, dec!(1));
    }

    #[test]
    fn spills_into_second_level() {
        let result = calc_trade_exposure(Quote::new(dec!(20)), dec!(1), &book());
        // 10 at $1 plus 10/1.1 of the second level
        assert_close(result.exposure, dec!(19.0909090909), dec!(0.000000001));
        assert_eq!(result.trade_price, dec!(1.05));
        assert_close(result.slippage, dec!(0.05), dec!(0.000000001));
    }

    #[test]
    fn exhausts_the_book() {
        let result = calc_trade_exposure(Quote::new(dec!(68)), dec!(1), &book());
        assert_eq!(result.exposure, dec!(68));
        assert_close(
            result.trade_price,
            dec!(1.13333333333333333333),
            dec!(0.000000000000000001),
        );
        assert_close(result.slippage, dec!(0.133333), dec!(0.00001));
    }

    #[test]
    fn budget_beyond_book_is_unused() {
        let capped = calc_trade_exposure(Quote::new(dec!(300)), dec!(1), &book());
        let exact = calc_trade_exposure(Quote::new(dec!(68)), dec!(1), &book());
        assert_eq!(capped, exact);
    }

    #[test]
    fn leverage_scales_the_budget() {
        let levered = calc_trade_exposure(Quote::new(dec!(34)), dec!(2), &book());
        let unlevered = calc_trade_exposure(Quote::new(dec!(68)), dec!(1), &book());
        assert_eq!(levered, unlevered);
    }

    #[test]
    fn order_rejects_non_positive_amount() {
        let result = FlatOrder::new(Price::new_unchecked(dec!(1)), dec!(0));
        assert!(matches!(
            result,
            Err(InputError::NonPositiveAmount { .. })
        ));
    }
}
