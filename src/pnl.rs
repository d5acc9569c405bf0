//! Unrealised PnL from a weighted-average cost basis.
//!
//! The entry price of an open position is reconstructed from the account's
//! fill history: walk the fills newest first, keep only those on the
//! position's own side, and consume them until the open size is covered. The
//! last contributing fill counts only for the portion still needed.

use crate::types::{InputError, Price, Quote, Side, SignedSize, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A historical fill: an order level plus the side it executed on.
/// Wire polarity for `side` is `false` = long, `true` = short
/// (see [`Side::from_flag`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    pub price: Price,
    pub amount: Decimal,
    pub side: Side,
    pub executed_at: Timestamp,
}

impl Fill {
    pub fn new(
        price: Price,
        amount: Decimal,
        side: Side,
        executed_at: Timestamp,
    ) -> Result<Self, InputError> {
        if amount <= Decimal::ZERO {
            return Err(InputError::NonPositiveAmount { value: amount });
        }
        Ok(Self {
            price,
            amount,
            side,
            executed_at,
        })
    }
}

/// Orders fills newest first, the precondition of the cost-basis walk.
pub fn sort_newest_first(fills: &mut [Fill]) {
    fills.sort_by(|a, b| b.executed_at.cmp(&a.executed_at));
}

/// Volume-weighted average entry price of the open position, from fills
/// sorted newest first. `None` for a flat position or when no fill matches
/// the position's side.
pub fn calc_average_entry_price(base: SignedSize, fills: &[Fill]) -> Option<Decimal> {
    let side = base.side()?;
    let mut remaining = base.abs();
    let mut units = Decimal::ZERO;
    let mut weights = Decimal::ZERO;

    for fill in fills {
        if fill.side != side {
            continue;
        }
        if remaining.is_zero() {
            break;
        }
        let taken = fill.amount.min(remaining);
        units += taken * fill.price.value();
        weights += taken;
        remaining -= taken;
    }

    if weights.is_zero() {
        None
    } else {
        Some(units / weights)
    }
}

/// Unrealised PnL of the position at `price`:
/// `base * price - base * avgEntry`. Zero when there is no position or no
/// matching fill history.
pub fn calc_unrealised(base: SignedSize, price: Price, fills: &[Fill]) -> Quote {
    match calc_average_entry_price(base, fills) {
        Some(avg_price) => Quote::new(base.value() * price.value() - base.value() * avg_price),
        None => Quote::zero(),
    }
}
