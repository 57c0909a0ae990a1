use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable error category attached to every calculation failure.
///
/// The application-surface codes (DatabaseError, AuthenticationRequired,
/// RateLimitExceeded) are part of the shared taxonomy the host application
/// maps onto; the core itself only ever raises the calculation codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationFailed,
    InvalidInterestRate,
    InvalidLoanTerm,
    InvalidPayment,
    NegativeAmortization,
    InsufficientPayment,
    CalculationOverflow,
    HelocExceedsLimit,
    InsufficientDiscretionary,
    UnderwaterMortgage,
    DatabaseError,
    AuthenticationRequired,
    RateLimitExceeded,
    InternalError,
    InvalidCalculationInput,
}

/// A calculation failure with both a technical message and user-facing copy.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct CalculationError {
    pub code: ErrorCode,
    pub message: String,
    pub user_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl CalculationError {
    /// Build an error from its code, filling in the user-facing template.
    /// `detail` is interpolated into the technical message.
    pub fn from_code(code: ErrorCode, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        let (user_message, suggestion) = user_copy(code);
        CalculationError {
            code,
            message: detail,
            user_message: user_message.to_string(),
            suggestion: suggestion.map(str::to_string),
        }
    }

    /// Shorthand for structurally invalid numeric input.
    pub fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        Self::from_code(
            ErrorCode::InvalidCalculationInput,
            format!("Invalid input: {field} — {}", reason.into()),
        )
    }
}

/// User-facing message and remediation suggestion per code.
fn user_copy(code: ErrorCode) -> (&'static str, Option<&'static str>) {
    match code {
        ErrorCode::ValidationFailed => (
            "Some of the values you entered are invalid.",
            Some("Review the highlighted fields and correct them before recalculating."),
        ),
        ErrorCode::InvalidInterestRate => (
            "The interest rate is outside the supported range.",
            Some("Enter the rate as a decimal between 0 and 0.30 (e.g. 0.065 for 6.5%)."),
        ),
        ErrorCode::InvalidLoanTerm => (
            "The loan term is not valid.",
            Some("The term must be a whole number of months greater than zero."),
        ),
        ErrorCode::InvalidPayment => (
            "The monthly payment is not valid.",
            Some("The payment must be a positive dollar amount."),
        ),
        ErrorCode::NegativeAmortization => (
            "The payment is too small to reduce the loan balance.",
            Some("Increase the monthly payment above the monthly interest charge."),
        ),
        ErrorCode::InsufficientPayment => (
            "The payment does not cover the required minimum.",
            Some("Raise the payment or extend the loan term."),
        ),
        ErrorCode::CalculationOverflow => (
            "The calculation produced a number too large to represent.",
            Some("Check that balances, rates, and terms are realistic."),
        ),
        ErrorCode::HelocExceedsLimit => (
            "The HELOC balance would exceed the credit limit.",
            Some("Reduce the draw amount or raise the HELOC limit."),
        ),
        ErrorCode::InsufficientDiscretionary => (
            "There is not enough discretionary income for this strategy.",
            Some("Lower expenses, raise income, or reduce the principal multiplier."),
        ),
        ErrorCode::UnderwaterMortgage => (
            "The mortgage balance exceeds the property value.",
            Some("Verify the property value and current balance."),
        ),
        ErrorCode::DatabaseError => (
            "A storage error occurred while saving your scenario.",
            Some("Try again; if the problem persists, contact support."),
        ),
        ErrorCode::AuthenticationRequired => (
            "You need to be signed in to do that.",
            Some("Sign in and retry."),
        ),
        ErrorCode::RateLimitExceeded => (
            "Too many calculations in a short period.",
            Some("Wait a moment before recalculating."),
        ),
        ErrorCode::InternalError => (
            "Something went wrong while calculating.",
            Some("Try again; if the problem persists, contact support."),
        ),
        ErrorCode::InvalidCalculationInput => (
            "One of the calculation inputs is not a valid number.",
            Some("All balances and values must be positive numbers."),
        ),
    }
}

impl From<serde_json::Error> for CalculationError {
    fn from(e: serde_json::Error) -> Self {
        CalculationError::from_code(ErrorCode::InternalError, e.to_string())
    }
}
