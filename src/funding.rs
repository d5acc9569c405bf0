//! Funding and insurance settlement deltas.
//!
//! Rates arrive as cumulative indices: the market tracks a global cumulative
//! funding rate, each account remembers the index it last settled at, and the
//! payment owed is the position scaled by the index gap. The insurance pool
//! settles the same way, scaled by the account's leveraged notional (its
//! borrowings) instead of raw size. This module only computes the signed
//! deltas; applying them to balances is the caller's job.

use crate::types::{Quote, SignedSize};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

// hourly insurance compounding: 24 * 365
const HOURLY_COMPOUND_FREQUENCY: Decimal = dec!(8760);

/// Quote owed by the position for the unsettled funding index gap.
/// Positive means the caller deducts from the account.
pub fn calc_funding_rate_payment(
    base: SignedSize,
    global_cumulative_rate: Decimal,
    user_cumulative_rate: Decimal,
) -> Quote {
    Quote::new(base.value() * (user_cumulative_rate - global_cumulative_rate))
}

/// Quote moved between the account and the insurance pool for the unsettled
/// insurance index gap, scaled by the account's leveraged notional value.
pub fn calc_insurance_funding_rate_payment(
    leveraged_notional: Quote,
    global_cumulative_rate: Decimal,
    user_cumulative_rate: Decimal,
) -> Quote {
    Quote::new(leveraged_notional.value() * (user_cumulative_rate - global_cumulative_rate))
}

/// Simple annualised return of the insurance pool: hourly rate on the
/// market's borrowings, over the pool's holdings.
pub fn calc_insurance_apr(
    funding_rate: Decimal,
    insurance_fund_holdings: Quote,
    leveraged_notional: Quote,
) -> Decimal {
    leveraged_notional.value() * funding_rate * HOURLY_COMPOUND_FREQUENCY
        / insurance_fund_holdings.value()
}

/// APR compounded hourly.
pub fn calc_insurance_apy(
    funding_rate: Decimal,
    insurance_fund_holdings: Quote,
    leveraged_notional: Quote,
) -> Decimal {
    let apr = calc_insurance_apr(funding_rate, insurance_fund_holdings, leveraged_notional);
    (Decimal::ONE + apr / HOURLY_COMPOUND_FREQUENCY).powi(8760) - Decimal::ONE
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn funding_payment_long() {
        let payment =
            calc_funding_rate_payment(SignedSize::new(dec!(10)), dec!(0.05), dec!(0.10));
        // 10 * (0.10 - 0.05)
        assert_eq!(payment.value(), dec!(0.5));
    }

    #[test]
    fn funding_payment_short_flips_sign() {
        let payment =
            calc_funding_rate_payment(SignedSize::new(dec!(-10)), dec!(0.05), dec!(0.10));
        assert_eq!(payment.value(), dec!(-0.5));
    }

    #[test]
    fn funding_payment_settled_account_owes_nothing() {
        let payment = calc_funding_rate_payment(SignedSize::new(dec!(10)), dec!(0.1), dec!(0.1));
        assert_eq!(payment.value(), Decimal::ZERO);
    }

    #[test]
    fn funding_zero_sum_between_opposite_positions() {
        let long = calc_funding_rate_payment(SignedSize::new(dec!(7)), dec!(0.02), dec!(0.09));
        let short = calc_funding_rate_payment(SignedSize::new(dec!(-7)), dec!(0.02), dec!(0.09));
        assert_eq!(long.value() + short.value(), Decimal::ZERO);
    }

    #[test]
    fn insurance_payment_scales_with_borrowings() {
        let payment = calc_insurance_funding_rate_payment(
            Quote::new(dec!(800)),
            dec!(0.001),
            dec!(0.003),
        );
        // 800 * 0.002
        assert_eq!(payment.value(), dec!(1.6));
    }

    #[test]
    fn insurance_apr() {
        let apr = calc_insurance_apr(
            dec!(0.00001),
            Quote::new(dec!(10000)),
            Quote::new(dec!(50000)),
        );
        // 50000 * 0.00001 * 8760 / 10000
        assert_eq!(apr, dec!(0.438));
    }

    #[test]
    fn insurance_apy_exceeds_apr() {
        let holdings = Quote::new(dec!(10000));
        let notional = Quote::new(dec!(50000));
        let apr = calc_insurance_apr(dec!(0.00001), holdings, notional);
        let apy = calc_insurance_apy(dec!(0.00001), holdings, notional);
        assert!(apy > apr);
        // hourly compounding of 43.8% APR lands just under 55%
        assert!(apy < dec!(0.56));
    }
}
