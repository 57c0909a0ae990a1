pub mod amortization;
pub mod error;
pub mod pmi;
pub mod scenarios;
pub mod types;
pub mod validation;

#[cfg(feature = "heloc")]
pub mod heloc;

#[cfg(feature = "budgeting")]
pub mod budgeting;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub use error::{CalculationError, ErrorCode};
pub use types::*;

/// Standard result type for all calculation operations
pub type CalcResult<T> = Result<T, CalculationError>;

/// Hard ceiling on any month-by-month simulation, regardless of the
/// caller-supplied projection length. Guarantees termination when a payment
/// is too small to ever amortize the balance.
pub const MAX_SIMULATION_MONTHS: u32 = 600;

/// Balances at or below this are treated as paid off.
pub const BALANCE_EPSILON: Decimal = dec!(0.01);
