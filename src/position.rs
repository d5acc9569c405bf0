//! Position snapshot: free collateral plus signed base holdings.
//!
//! Thin view over the margin formulas. The struct is immutable here; trade
//! execution, funding settlement and insurance settlement live outside this
//! crate and apply the deltas it computes.

use crate::config::RiskParams;
use crate::margin;
use crate::pnl::{self, Fill};
use crate::types::{Price, Quote, Side, SignedSize};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Free collateral in the settlement currency, net of position cost.
    pub quote: Quote,
    /// Signed holdings of the underlying.
    pub base: SignedSize,
}

impl Position {
    pub fn new(quote: Quote, base: SignedSize) -> Self {
        Self { quote, base }
    }

    pub fn flat(quote: Quote) -> Self {
        Self {
            quote,
            base: SignedSize::zero(),
        }
    }

    pub fn is_flat(&self) -> bool {
        self.base.is_zero()
    }

    pub fn side(&self) -> Option<Side> {
        self.base.side()
    }

    pub fn notional(&self, price: Price) -> Quote {
        margin::calc_notional_value(self.base, price)
    }

    /// Account equity at `price`.
    pub fn margin(&self, price: Price) -> Quote {
        margin::calc_total_margin(self.quote, self.base, price)
    }

    pub fn borrowed(&self, price: Price) -> Quote {
        margin::calc_borrowed(self.quote, self.base, price)
    }

    pub fn leverage(&self, price: Price) -> Decimal {
        margin::calc_leverage(self.quote, self.base, price)
    }

    pub fn minimum_margin(&self, price: Price, params: &RiskParams) -> Quote {
        margin::calc_minimum_margin(self.quote, self.base, price, params)
    }

    pub fn liquidation_price(&self, price: Price, params: &RiskParams) -> Decimal {
        margin::calc_liquidation_price(self.quote, self.base, price, params)
    }

    pub fn profitable_liquidation_price(&self, price: Price, params: &RiskParams) -> Decimal {
        margin::calc_profitable_liquidation_price(self.quote, self.base, price, params)
    }

    pub fn withdrawable(&self, price: Price, params: &RiskParams) -> Quote {
        margin::calc_withdrawable(self.quote, self.base, price, params)
    }

    pub fn buying_power(&self, price: Price, params: &RiskParams) -> Quote {
        margin::calc_buying_power(self.quote, self.base, price, params)
    }

    pub fn available_margin_percent(&self, price: Price, params: &RiskParams) -> Decimal {
        margin::calc_available_margin_percent(self.quote, self.base, price, params)
    }

    /// Unrealised PnL against the account's fill history (newest first).
    pub fn unrealised_pnl(&self, price: Price, fills: &[Fill]) -> Quote {
        pnl::calc_unrealised(self.base, price, fills)
    }
}
