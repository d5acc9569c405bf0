//! Inverse position solvers.
//!
//! A position's risk is described by four mutually dependent parameters:
//! exposure, leverage, margin and liquidation price. Fix any two and the other
//! two follow from the invariant system
//!
//! - `margin = quote + base * price`
//! - `leverage = |base| * price / margin`
//! - `liq = maxLev * (buffer - quote) / (base * (maxLev - sign))`
//!
//! where `base = sign * exposure` and `buffer` is the profitable liquidation
//! buffer from [`RiskParams`]. Each of the six known-pairs gets one resolution
//! path; both directions flow through the same formulas via `side.sign()`, so
//! the long and short branches cannot drift apart.
//!
//! Round-trip contract: feed any two fields of a solver's output (or of a
//! forward computation with the profitable buffer) into the matching solver
//! and the other two come back, up to rounding.

use crate::config::RiskParams;
use crate::margin::liquidation_price_with_buffer;
use crate::types::{Price, Quote, Side, SignedSize};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The full risk description every solver returns, whichever pair was known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskTuple {
    /// Unsigned base exposure.
    pub exposure: Decimal,
    pub leverage: Decimal,
    pub margin: Decimal,
    pub liquidation_price: Decimal,
}

/// Which two of the four risk parameters the caller knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KnownPair {
    ExposureLeverage { exposure: Decimal, leverage: Decimal },
    ExposureMargin { exposure: Decimal, margin: Decimal },
    ExposureLiquidation { exposure: Decimal, liquidation_price: Decimal },
    MarginLeverage { margin: Decimal, leverage: Decimal },
    MarginLiquidation { margin: Decimal, liquidation_price: Decimal },
    LeverageLiquidation { leverage: Decimal, liquidation_price: Decimal },
}

/// Resolve the remaining two risk parameters from a known pair.
pub fn solve_position(
    pair: KnownPair,
    price: Price,
    side: Side,
    params: &RiskParams,
) -> RiskTuple {
    match pair {
        KnownPair::ExposureLeverage { exposure, leverage } => {
            calc_from_exposure_and_leverage(exposure, leverage, price, side, params)
        }
        KnownPair::ExposureMargin { exposure, margin } => {
            calc_from_exposure_and_margin(exposure, margin, price, side, params)
        }
        KnownPair::ExposureLiquidation {
            exposure,
            liquidation_price,
        } => calc_from_exposure_and_liquidation(exposure, liquidation_price, price, side, params),
        KnownPair::MarginLeverage { margin, leverage } => {
            calc_from_margin_and_leverage(margin, leverage, price, side, params)
        }
        KnownPair::MarginLiquidation {
            margin,
            liquidation_price,
        } => calc_from_margin_and_liquidation(margin, liquidation_price, price, side, params),
        KnownPair::LeverageLiquidation {
            leverage,
            liquidation_price,
        } => calc_from_leverage_and_liquidation(leverage, liquidation_price, price, side, params),
    }
}

// liquidation price of the signed position (quote, base) under the profitable buffer
fn liquidation_of(quote: Decimal, base: Decimal, params: &RiskParams) -> Decimal {
    liquidation_price_with_buffer(
        Quote::new(quote),
        SignedSize::new(base),
        params.profitable_buffer(),
        params.max_leverage,
    )
}

// quote balance implied by a liquidation price: the relation above solved for quote
fn quote_at_liquidation(
    liquidation_price: Decimal,
    base: Decimal,
    side: Side,
    params: &RiskParams,
) -> Decimal {
    params.profitable_buffer()
        - liquidation_price * base * (params.max_leverage - side.sign()) / params.max_leverage
}

pub fn calc_from_exposure_and_leverage(
    exposure: Decimal,
    leverage: Decimal,
    price: Price,
    side: Side,
    params: &RiskParams,
) -> RiskTuple {
    let base = side.sign() * exposure;
    let notional = exposure * price.value();
    let margin = notional / leverage;
    let quote = margin - base * price.value();
    RiskTuple {
        exposure,
        leverage,
        margin,
        liquidation_price: liquidation_of(quote, base, params),
    }
}

pub fn calc_from_exposure_and_margin(
    exposure: Decimal,
    margin: Decimal,
    price: Price,
    side: Side,
    params: &RiskParams,
) -> RiskTuple {
    let base = side.sign() * exposure;
    let leverage = exposure * price.value() / margin;
    let quote = margin - base * price.value();
    RiskTuple {
        exposure,
        leverage,
        margin,
        liquidation_price: liquidation_of(quote, base, params),
    }
}

pub fn calc_from_exposure_and_liquidation(
    exposure: Decimal,
    liquidation_price: Decimal,
    price: Price,
    side: Side,
    params: &RiskParams,
) -> RiskTuple {
    let base = side.sign() * exposure;
    let quote = quote_at_liquidation(liquidation_price, base, side, params);
    let margin = quote + base * price.value();
    RiskTuple {
        exposure,
        leverage: exposure * price.value() / margin,
        margin,
        liquidation_price,
    }
}

pub fn calc_from_margin_and_leverage(
    margin: Decimal,
    leverage: Decimal,
    price: Price,
    side: Side,
    params: &RiskParams,
) -> RiskTuple {
    let exposure = margin * leverage / price.value();
    let base = side.sign() * exposure;
    let quote = margin - base * price.value();
    RiskTuple {
        exposure,
        leverage,
        margin,
        liquidation_price: liquidation_of(quote, base, params),
    }
}

pub fn calc_from_margin_and_liquidation(
    margin: Decimal,
    liquidation_price: Decimal,
    price: Price,
    side: Side,
    params: &RiskParams,
) -> RiskTuple {
    // margin identity with quote eliminated, solved for base
    let base = (margin - params.profitable_buffer())
        / (price.value()
            - liquidation_price * (params.max_leverage - side.sign()) / params.max_leverage);
    let exposure = base.abs();
    RiskTuple {
        exposure,
        leverage: exposure * price.value() / margin,
        margin,
        liquidation_price,
    }
}

pub fn calc_from_leverage_and_liquidation(
    leverage: Decimal,
    liquidation_price: Decimal,
    price: Price,
    side: Side,
    params: &RiskParams,
) -> RiskTuple {
    // leverage * margin = |base| * price with quote eliminated, solved for base
    let base = leverage * params.profitable_buffer()
        / (side.sign() * price.value()
            - leverage
                * (price.value()
                    - liquidation_price * (params.max_leverage - side.sign())
                        / params.max_leverage));
    let quote = quote_at_liquidation(liquidation_price, base, side, params);
    RiskTuple {
        exposure: base.abs(),
        leverage,
        margin: quote + base * price.value(),
        liquidation_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn params() -> RiskParams {
        RiskParams::default()
    }

    fn assert_close(actual: Decimal, expected: Decimal) {
        let scale = actual.abs().max(expected.abs()).max(Decimal::ONE);
        assert!(
            ((actual - expected) / scale).abs() < dec!(0.000000001),
            "expected {expected}, got {actual}"
        );
    }

    fn assert_tuple_close(actual: RiskTuple, expected: RiskTuple) {
        assert_close(actual.exposure, expected.exposure);
        assert_close(actual.leverage, expected.leverage);
        assert_close(actual.margin, expected.margin);
        assert_close(actual.liquidation_price, expected.liquidation_price);
    }

    #[test]
    fn exposure_and_leverage_long() {
        let result = calc_from_exposure_and_leverage(
            dec!(1000),
            dec!(5),
            Price::new_unchecked(dec!(1)),
            Side::Long,
            &params(),
        );
        assert_eq!(result.exposure, dec!(1000));
        assert_eq!(result.leverage, dec!(5));
        assert_eq!(result.margin, dec!(200));
        assert_close(result.liquidation_price, dec!(0.94387755102040816327));
    }

    #[test]
    fn exposure_and_leverage_short() {
        let result = calc_from_exposure_and_leverage(
            dec!(1000),
            dec!(5),
            Price::new_unchecked(dec!(1)),
            Side::Short,
            &params(),
        );
        assert_eq!(result.margin, dec!(200));
        assert_close(result.liquidation_price, dec!(1.05392156862745098039));
    }

    #[test]
    fn exposure_and_leverage_long_at_100() {
        let result = calc_from_exposure_and_leverage(
            dec!(10),
            dec!(2),
            Price::new_unchecked(dec!(100)),
            Side::Long,
            &params(),
        );
        assert_eq!(result.margin, dec!(500));
        assert_close(result.liquidation_price, dec!(63.77551020408163265306));
    }

    #[test]
    fn exposure_and_leverage_short_at_100() {
        let result = calc_from_exposure_and_leverage(
            dec!(10),
            dec!(2),
            Price::new_unchecked(dec!(100)),
            Side::Short,
            &params(),
        );
        assert_eq!(result.margin, dec!(500));
        assert_close(result.liquidation_price, dec!(134.80392156862745098039));
    }

    #[test]
    fn exposure_and_margin_long() {
        let result = calc_from_exposure_and_margin(
            dec!(20),
            dec!(1),
            Price::new_unchecked(dec!(1)),
            Side::Long,
            &params(),
        );
        assert_eq!(result.leverage, dec!(20));
        assert_close(result.liquidation_price, dec!(7.34693877551020408163));
    }

    #[test]
    fn exposure_and_margin_short() {
        let result = calc_from_exposure_and_margin(
            dec!(20),
            dec!(1),
            Price::new_unchecked(dec!(1)),
            Side::Short,
            &params(),
        );
        assert_eq!(result.leverage, dec!(20));
        // an underwater short: liquidation clears below zero
        assert_close(result.liquidation_price, dec!(-5.0980392156862745098));
    }

    #[test]
    fn exposure_and_liquidation_long() {
        let result = calc_from_exposure_and_liquidation(
            dec!(35),
            dec!(0.5),
            Price::new_unchecked(dec!(1)),
            Side::Long,
            &params(),
        );
        assert_close(result.margin, dec!(142.85));
        assert_close(result.leverage, dec!(0.24501225061253062653));
    }

    #[test]
    fn exposure_and_liquidation_short() {
        let result = calc_from_exposure_and_liquidation(
            dec!(35),
            dec!(1.5),
            Price::new_unchecked(dec!(1)),
            Side::Short,
            &params(),
        );
        assert_close(result.margin, dec!(143.55));
        assert_close(result.leverage, dec!(0.24381748519679554162));
    }

    #[test]
    fn margin_and_leverage_long() {
        let result = calc_from_margin_and_leverage(
            dec!(300),
            dec!(10),
            Price::new_unchecked(dec!(1)),
            Side::Long,
            &params(),
        );
        assert_eq!(result.exposure, dec!(3000));
        assert_close(result.liquidation_price, dec!(0.96088435374149659864));
    }

    #[test]
    fn margin_and_leverage_short() {
        let result = calc_from_margin_and_leverage(
            dec!(300),
            dec!(10),
            Price::new_unchecked(dec!(1)),
            Side::Short,
            &params(),
        );
        assert_eq!(result.exposure, dec!(3000));
        assert_close(result.liquidation_price, dec!(1.03758169934640522876));
    }

    #[test]
    fn margin_and_liquidation_long() {
        let result = calc_from_margin_and_liquidation(
            dec!(400),
            dec!(0.5),
            Price::new_unchecked(dec!(1)),
            Side::Long,
            &params(),
        );
        assert_close(result.exposure, dec!(539.21568627450980392157));
        assert_close(result.leverage, dec!(1.3480392156862745098));
    }

    #[test]
    fn margin_and_liquidation_short() {
        let result = calc_from_margin_and_liquidation(
            dec!(700),
            dec!(1.25),
            Price::new_unchecked(dec!(1)),
            Side::Short,
            &params(),
        );
        assert_close(result.exposure, dec!(2090.90909090909090909091));
        assert_close(result.leverage, dec!(2.98701298701298701299));
    }

    #[test]
    fn leverage_and_liquidation_long() {
        let result = calc_from_leverage_and_liquidation(
            dec!(35),
            dec!(120),
            Price::new_unchecked(dec!(1)),
            Side::Long,
            &params(),
        );
        assert_close(result.exposure, dec!(1.07177853993140617344));
        assert_close(result.margin, dec!(0.030622243998040176896));
    }

    #[test]
    fn leverage_and_liquidation_short_round_trips() {
        // short 10 units at $100 with margin 200: forward gives leverage 5 and
        // a profitable liquidation near 105.39; solving back recovers the position
        let price = Price::new_unchecked(dec!(100));
        let forward = calc_from_exposure_and_leverage(dec!(10), dec!(5), price, Side::Short, &params());
        let solved = calc_from_leverage_and_liquidation(
            forward.leverage,
            forward.liquidation_price,
            price,
            Side::Short,
            &params(),
        );
        assert_tuple_close(solved, forward);
    }

    #[test]
    fn dispatch_matches_direct_calls() {
        let price = Price::new_unchecked(dec!(100));
        let direct =
            calc_from_exposure_and_leverage(dec!(10), dec!(5), price, Side::Short, &params());
        let dispatched = solve_position(
            KnownPair::ExposureLeverage {
                exposure: dec!(10),
                leverage: dec!(5),
            },
            price,
            Side::Short,
            &params(),
        );
        assert_eq!(direct, dispatched);
    }

    #[test]
    fn all_solvers_agree_on_one_position() {
        let price = Price::new_unchecked(dec!(100));
        let p = params();
        for side in [Side::Long, Side::Short] {
            let t = calc_from_exposure_and_leverage(dec!(10), dec!(5), price, side, &p);
            let pairs = [
                KnownPair::ExposureMargin {
                    exposure: t.exposure,
                    margin: t.margin,
                },
                KnownPair::ExposureLiquidation {
                    exposure: t.exposure,
                    liquidation_price: t.liquidation_price,
                },
                KnownPair::MarginLeverage {
                    margin: t.margin,
                    leverage: t.leverage,
                },
                KnownPair::MarginLiquidation {
                    margin: t.margin,
                    liquidation_price: t.liquidation_price,
                },
                KnownPair::LeverageLiquidation {
                    leverage: t.leverage,
                    liquidation_price: t.liquidation_price,
                },
            ];
            for pair in pairs {
                assert_tuple_close(solve_position(pair, price, side, &p), t);
            }
        }
    }
}
