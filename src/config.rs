//! Risk parameters shared by every margin computation.
//!
//! One market = one `RiskParams`. The gas constants price the cost of a
//! liquidator transaction: a liquidatable account must always leave enough
//! margin to reimburse `gas_multiplier` times the gas cost, and a liquidation
//! only turns profitable once the remaining buffer exceeds one gas cost less.
//! Markets with different gas assumptions get their own instance; nothing here
//! is a process-wide global.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskParams {
    /// Maximum leverage accounts can trade at in this market.
    pub max_leverage: Decimal,
    /// Quote cost of a liquidation transaction at reference gas prices.
    pub gas_cost: Decimal,
    /// Gas reimbursements a liquidatable account must be able to cover.
    pub gas_multiplier: Decimal,
}

impl Default for RiskParams {
    fn default() -> Self {
        // 25 quote units ~ one liquidation at 250 gwei with the reference asset at 1700
        Self {
            max_leverage: dec!(50),
            gas_cost: dec!(25),
            gas_multiplier: dec!(6),
        }
    }
}

impl RiskParams {
    // Lower-leverage preset for thin or volatile markets.
    pub fn conservative() -> Self {
        Self {
            max_leverage: dec!(10),
            ..Self::default()
        }
    }

    /// Margin offset at which an account becomes eligible for liquidation.
    pub fn liquidation_buffer(&self) -> Decimal {
        self.gas_cost * self.gas_multiplier
    }

    /// Margin offset at which liquidating the account turns profitable:
    /// the eligible buffer net of one gas reimbursement.
    pub fn profitable_buffer(&self) -> Decimal {
        self.gas_cost * (self.gas_multiplier - Decimal::ONE)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_leverage <= Decimal::ZERO {
            return Err(ConfigError::InvalidLeverage {
                reason: "max leverage must be positive".to_string(),
            });
        }
        if self.gas_cost <= Decimal::ZERO {
            return Err(ConfigError::InvalidGas {
                reason: "gas cost must be positive".to_string(),
            });
        }
        if self.gas_multiplier <= Decimal::ONE {
            return Err(ConfigError::InvalidGas {
                reason: "gas multiplier must exceed 1".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid leverage config: {reason}")]
    InvalidLeverage { reason: String },
    #[error("invalid gas config: {reason}")]
    InvalidGas { reason: String },
}
