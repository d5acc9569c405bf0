// margin-core: margin accounting and exposure pricing for perpetual futures.
// pure calculation layer: every function is deterministic, side-effect free,
// and safe to call from any number of threads on independent inputs.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: Side, SignedSize, Price, Quote, Timestamp
//   2.x  config.rs: risk params: max leverage, gas constants, buffers
//   3.x  margin.rs: forward formulas: margin, leverage, liquidation, withdrawable
//   4.x  exposure.rs: order-book walk: exposure, trade price, slippage
//   5.x  calculator.rs: inverse solvers: full risk tuple from any known pair
//   6.x  pnl.rs: weighted-average cost basis, unrealised pnl
//   7.x  funding.rs: funding + insurance settlement deltas, pool APR/APY
//   8.x  position.rs: position snapshot over the margin formulas

pub mod calculator;
pub mod config;
pub mod exposure;
pub mod funding;
pub mod margin;
pub mod pnl;
pub mod position;
pub mod types;

// re exports for convenience
pub use calculator::*;
pub use config::*;
pub use exposure::*;
pub use funding::*;
pub use margin::*;
pub use pnl::*;
pub use position::*;
pub use types::*;
