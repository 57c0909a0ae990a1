//! Fixed-rate mortgage amortization: payment formula, full schedule
//! generation, and the closed-form remaining-balance lookup.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::{CalculationError, ErrorCode};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::{CalcResult, BALANCE_EPSILON, MAX_SIMULATION_MONTHS};

const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Parameters of a fixed-rate mortgage. Immutable per simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageInput {
    /// Original loan principal.
    pub principal: Money,
    /// Annual interest rate as a decimal (0.065 = 6.5%).
    pub annual_interest_rate: Rate,
    /// Declared loan term in months.
    pub term_in_months: u32,
    /// Outstanding balance today (defaults to `principal`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_balance: Option<Money>,
    /// Actual monthly payment (defaults to the standard computed payment).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_payment: Option<Money>,
    /// Appraised property value, enabling LTV/PMI tracking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_value: Option<Money>,
    /// Monthly PMI premium while PMI is required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pmi_monthly: Option<Money>,
}

/// One month of an amortization schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// Month number (1-indexed).
    pub month: u32,
    pub beginning_balance: Money,
    pub payment_amount: Money,
    pub principal_payment: Money,
    pub interest_payment: Money,
    pub ending_balance: Money,
    pub cumulative_interest: Money,
    pub cumulative_principal: Money,
}

/// Full amortization result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_payments: Money,
    pub payoff_months: u32,
    pub schedule: Vec<AmortizationRow>,
}

// ---------------------------------------------------------------------------
// Payment formula
// ---------------------------------------------------------------------------

/// Standard fixed-rate payment: M = P * r(1+r)^n / ((1+r)^n - 1)
/// where r is the monthly rate. Zero-rate loans amortize straight-line.
pub fn monthly_payment(principal: Money, annual_rate: Rate, term_months: u32) -> CalcResult<Money> {
    if principal <= Decimal::ZERO {
        return Err(CalculationError::invalid_input(
            "principal",
            "must be positive",
        ));
    }
    if term_months == 0 {
        return Err(CalculationError::from_code(
            ErrorCode::InvalidLoanTerm,
            "term_in_months must be greater than zero",
        ));
    }

    let monthly_rate = annual_rate / MONTHS_PER_YEAR;
    if monthly_rate.is_zero() {
        return Ok(principal / Decimal::from(term_months));
    }

    let compound = compound_factor(monthly_rate, term_months);
    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        return Err(CalculationError::from_code(
            ErrorCode::CalculationOverflow,
            "payment denominator collapsed to zero",
        ));
    }

    Ok(principal * monthly_rate * compound / denominator)
}

/// (1 + r)^n via iterative multiplication.
fn compound_factor(monthly_rate: Rate, months: u32) -> Decimal {
    let mut compound = Decimal::ONE;
    for _ in 0..months {
        compound *= Decimal::ONE + monthly_rate;
    }
    compound
}

// ---------------------------------------------------------------------------
// Schedule generation
// ---------------------------------------------------------------------------

/// Generate a month-by-month amortization schedule.
///
/// Terminates when the balance drops to `BALANCE_EPSILON` or the declared
/// term is exhausted (hard-capped at `MAX_SIMULATION_MONTHS`). A payment too
/// small to amortize is not an error here — the schedule runs to the bound
/// and a warning is attached; pre-flight detection lives in the validation
/// layer.
pub fn generate_amortization_schedule(
    input: &MortgageInput,
) -> CalcResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.annual_interest_rate < Decimal::ZERO {
        return Err(CalculationError::from_code(
            ErrorCode::InvalidInterestRate,
            format!("annual rate {} is negative", input.annual_interest_rate),
        ));
    }
    if let Some(p) = input.monthly_payment {
        if p <= Decimal::ZERO {
            return Err(CalculationError::from_code(
                ErrorCode::InvalidPayment,
                format!("monthly payment {p} must be positive"),
            ));
        }
    }

    let standard_payment = monthly_payment(
        input.principal,
        input.annual_interest_rate,
        input.term_in_months,
    )?;
    let payment = input.monthly_payment.unwrap_or(standard_payment);
    let monthly_rate = input.annual_interest_rate / MONTHS_PER_YEAR;

    let mut balance = input.current_balance.unwrap_or(input.principal);
    let term_bound = input.term_in_months.min(MAX_SIMULATION_MONTHS);

    let mut schedule: Vec<AmortizationRow> = Vec::with_capacity(term_bound as usize);
    let mut cumulative_interest = Decimal::ZERO;
    let mut cumulative_principal = Decimal::ZERO;
    let mut total_payments = Decimal::ZERO;

    let mut month = 1u32;
    while balance > BALANCE_EPSILON && month <= term_bound {
        let beginning_balance = balance;
        let interest = balance * monthly_rate;
        let mut principal_part = payment - interest;
        if principal_part > balance {
            // Final payment clamps to the remaining balance.
            principal_part = balance;
        }

        balance -= principal_part;
        cumulative_interest += interest;
        cumulative_principal += principal_part;
        let paid = principal_part + interest;
        total_payments += paid;

        schedule.push(AmortizationRow {
            month,
            beginning_balance,
            payment_amount: paid,
            principal_payment: principal_part,
            interest_payment: interest,
            ending_balance: balance,
            cumulative_interest,
            cumulative_principal,
        });

        month += 1;
    }

    if balance > BALANCE_EPSILON {
        warnings.push(format!(
            "Balance of {balance:.2} remains after {} months — payment {payment:.2} does not fully amortize the loan",
            month - 1
        ));
    }

    let output = AmortizationOutput {
        monthly_payment: payment,
        total_interest: cumulative_interest,
        total_payments,
        payoff_months: schedule.len() as u32,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Rate Amortization Schedule",
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Remaining balance (closed form)
// ---------------------------------------------------------------------------

/// Outstanding balance after `months_paid` scheduled payments, without
/// generating the schedule:
/// B = P * ((1+r)^n - (1+r)^p) / ((1+r)^n - 1)
pub fn remaining_balance(
    principal: Money,
    annual_rate: Rate,
    term_months: u32,
    months_paid: u32,
) -> CalcResult<Money> {
    if principal <= Decimal::ZERO {
        return Err(CalculationError::invalid_input(
            "principal",
            "must be positive",
        ));
    }
    if term_months == 0 {
        return Err(CalculationError::from_code(
            ErrorCode::InvalidLoanTerm,
            "term_in_months must be greater than zero",
        ));
    }
    if months_paid >= term_months {
        return Ok(Decimal::ZERO);
    }

    let monthly_rate = annual_rate / MONTHS_PER_YEAR;
    if monthly_rate.is_zero() {
        let paid = principal * Decimal::from(months_paid) / Decimal::from(term_months);
        return Ok(principal - paid);
    }

    let full = compound_factor(monthly_rate, term_months);
    let partial = compound_factor(monthly_rate, months_paid);
    let denominator = full - Decimal::ONE;
    if denominator.is_zero() {
        return Err(CalculationError::from_code(
            ErrorCode::CalculationOverflow,
            "remaining balance denominator collapsed to zero",
        ));
    }

    Ok(principal * (full - partial) / denominator)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
