//! Margin Core Simulation.
//!
//! Walks the calculation layer end to end: a position risk report, trade
//! sizing against order-book depth, inverse solving from a desired risk
//! profile, and a funding settlement pass.

use margin_core::*;
use rust_decimal_macros::dec;

fn main() {
    println!("Margin Core Calculation Engine");
    println!("Forward margin, trade sizing, inverse solving, settlement\n");

    scenario_1_position_report();
    scenario_2_trade_sizing();
    scenario_3_inverse_solving();
    scenario_4_settlement();

    println!("\nAll scenarios completed.");
}

/// Risk report for a short position: deposit 1200, short 10 units at $100.
fn scenario_1_position_report() {
    println!("Scenario 1: Position Risk Report\n");

    let params = RiskParams::default();
    let price = Price::new_unchecked(dec!(100));
    let pos = Position::new(Quote::new(dec!(1200)), SignedSize::new(dec!(-10)));

    println!("  Position: {} units, {} quote collateral", pos.base, pos.quote);
    println!("  Mark price: ${price}");
    println!("  Margin:            {}", pos.margin(price));
    println!("  Notional:          {}", pos.notional(price));
    println!("  Borrowed:          {}", pos.borrowed(price));
    println!("  Leverage:          {}x", pos.leverage(price));
    println!("  Minimum margin:    {}", pos.minimum_margin(price, &params));
    println!("  Withdrawable:      {}", pos.withdrawable(price, &params));
    println!(
        "  Liquidation at:    {} (profitable at {})",
        pos.liquidation_price(price, &params).round_dp(4),
        pos.profitable_liquidation_price(price, &params).round_dp(4),
    );
    println!("  Buying power:      {}\n", pos.buying_power(price, &params));
}

/// Size a trade against three levels of depth.
fn scenario_2_trade_sizing() {
    println!("Scenario 2: Trade Sizing Against the Book\n");

    let book = vec![
        FlatOrder::new(Price::new_unchecked(dec!(1)), dec!(10)).unwrap(),
        FlatOrder::new(Price::new_unchecked(dec!(1.1)), dec!(20)).unwrap(),
        FlatOrder::new(Price::new_unchecked(dec!(1.2)), dec!(30)).unwrap(),
    ];

    for budget in [dec!(10), dec!(20), dec!(68), dec!(300)] {
        let result = calc_trade_exposure(Quote::new(budget), dec!(1), &book);
        println!(
            "  budget {:>4}: exposure {:>12}, avg price {:>8}, slippage {:>8}",
            budget,
            result.exposure.round_dp(6),
            result.trade_price.round_dp(4),
            result.slippage.round_dp(4),
        );
    }
    println!();
}

/// Derive the full risk tuple from two desired parameters.
fn scenario_3_inverse_solving() {
    println!("Scenario 3: Inverse Solving\n");

    let params = RiskParams::default();
    let price = Price::new_unchecked(dec!(100));

    let from_target = solve_position(
        KnownPair::ExposureLeverage {
            exposure: dec!(10),
            leverage: dec!(5),
        },
        price,
        Side::Short,
        &params,
    );
    println!("  Want: short 10 units at 5x");
    println!(
        "  Need margin {}, liquidated (profitably) at {}",
        from_target.margin,
        from_target.liquidation_price.round_dp(4),
    );

    let from_liquidation = solve_position(
        KnownPair::MarginLiquidation {
            margin: from_target.margin,
            liquidation_price: from_target.liquidation_price,
        },
        price,
        Side::Short,
        &params,
    );
    println!(
        "  Check: that margin and liquidation price imply exposure {} at {}x\n",
        from_liquidation.exposure.round_dp(6),
        from_liquidation.leverage.round_dp(6),
    );
}

/// Funding settlement and unrealised PnL for an open short.
fn scenario_4_settlement() {
    println!("Scenario 4: Settlement Pass\n");

    let base = SignedSize::new(dec!(-10));
    let price = Price::new_unchecked(dec!(96));

    let funding = calc_funding_rate_payment(base, dec!(0.0004), dec!(0.0010));
    let insurance =
        calc_insurance_funding_rate_payment(Quote::new(dec!(800)), dec!(0.0001), dec!(0.0003));
    println!("  Funding delta:   {}", funding);
    println!("  Insurance delta: {}", insurance);

    let fills = vec![
        Fill::new(Price::new_unchecked(dec!(101)), dec!(4), Side::Short, Timestamp::from_millis(200)).unwrap(),
        Fill::new(Price::new_unchecked(dec!(99)), dec!(6), Side::Short, Timestamp::from_millis(100)).unwrap(),
    ];
    let pnl = calc_unrealised(base, price, &fills);
    println!("  Unrealised PnL at ${price}: {}", pnl);
}
