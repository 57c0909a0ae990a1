//! HELOC-assisted mortgage acceleration: a month-by-month simulation of the
//! combined mortgage + HELOC payoff strategy, and the comparison against the
//! traditional fixed-amortization baseline.
//!
//! Strategy per month: discretionary income goes to extra mortgage principal
//! first; when a strategic opportunity exists (HELOC cheaper than the
//! mortgage, or the mortgage is nearly extinguished) spare HELOC capacity is
//! drawn to retire mortgage principal early; leftover discretionary pays the
//! HELOC back down.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{generate_amortization_schedule, MortgageInput};
use crate::error::{CalculationError, ErrorCode};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::{CalcResult, BALANCE_EPSILON, MAX_SIMULATION_MONTHS};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Equity share at which PMI drops off in this engine. The budgeting
/// orchestrator uses a 78-LTV rule instead; the two engines deliberately
/// keep their own thresholds.
const PMI_EQUITY_THRESHOLD_PCT: Decimal = dec!(20);

/// A mortgage balance below this fraction of the HELOC limit counts as a
/// strategic payoff opportunity even when the HELOC rate is higher.
const SMALL_BALANCE_FRACTION: Decimal = dec!(0.10);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Inputs for the combined mortgage + HELOC acceleration strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelocInput {
    pub mortgage_balance: Money,
    pub mortgage_rate: Rate,
    pub mortgage_payment: Money,
    pub heloc_limit: Money,
    pub heloc_rate: Rate,
    /// Cash available each month beyond the regular payment.
    pub discretionary_income: Money,
    /// Credit actually drawable (defaults to `heloc_limit`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heloc_available_credit: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_value: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pmi_monthly: Option<Money>,
}

/// One month of the accelerated schedule.
///
/// `heloc_balance` is the beginning-of-month balance, before this month's
/// draws and paydown net out. `total_monthly_payment` is out-of-pocket cash
/// (mortgage payment + discretionary used + PMI); HELOC draws are financed,
/// not cash, and are excluded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelocMonthlyRow {
    pub month: u32,
    pub beginning_balance: Money,
    pub payment_amount: Money,
    pub principal_payment: Money,
    pub interest_payment: Money,
    pub ending_balance: Money,
    pub cumulative_interest: Money,
    pub cumulative_principal: Money,
    pub heloc_balance: Money,
    pub heloc_payment: Money,
    pub heloc_interest: Money,
    pub total_monthly_payment: Money,
    pub discretionary_used: Money,
    pub pmi_payment: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_equity_percentage: Option<Decimal>,
}

/// Result of the acceleration simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelocOutput {
    pub payoff_months: u32,
    /// Mortgage interest + HELOC interest combined.
    pub total_interest: Money,
    pub total_heloc_interest: Money,
    pub total_mortgage_interest: Money,
    pub schedule: Vec<HelocMonthlyRow>,
    pub max_heloc_used: Money,
    pub average_heloc_balance: Money,
}

/// Headline numbers for one strategy inside a comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategySnapshot {
    pub payoff_months: u32,
    pub total_interest: Money,
    pub monthly_payment: Money,
}

/// Traditional vs. accelerated comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub traditional: StrategySnapshot,
    pub accelerated: StrategySnapshot,
    pub time_saved_months: i64,
    pub interest_saved: Money,
    pub percentage_interest_saved: Decimal,
    /// Average accelerated out-of-pocket month minus the traditional payment.
    pub monthly_payment_difference: Money,
    pub max_heloc_used: Money,
}

// ---------------------------------------------------------------------------
// Acceleration simulation
// ---------------------------------------------------------------------------

/// Simulate the combined mortgage + HELOC payoff, capped at
/// `MAX_SIMULATION_MONTHS`. Terminates when the mortgage balance reaches
/// `BALANCE_EPSILON`; any HELOC balance outstanding at that point is
/// reported through the final row and the max/average statistics.
pub fn calculate_heloc_acceleration(
    input: &HelocInput,
) -> CalcResult<ComputationOutput<HelocOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let available_credit = input.heloc_available_credit.unwrap_or(input.heloc_limit);
    let monthly_mortgage_rate = input.mortgage_rate / MONTHS_PER_YEAR;
    let monthly_heloc_rate = input.heloc_rate / MONTHS_PER_YEAR;

    let mut discretionary = input.discretionary_income;
    if discretionary < Decimal::ZERO {
        warnings.push(format!(
            "Discretionary income {discretionary} is negative — treated as zero for acceleration"
        ));
        discretionary = Decimal::ZERO;
    }

    let mut mortgage_balance = input.mortgage_balance;
    let mut heloc_balance = Decimal::ZERO;

    let mut schedule: Vec<HelocMonthlyRow> = Vec::new();
    let mut cumulative_interest = Decimal::ZERO;
    let mut cumulative_principal = Decimal::ZERO;
    let mut total_mortgage_interest = Decimal::ZERO;
    let mut total_heloc_interest = Decimal::ZERO;
    let mut max_heloc_used = Decimal::ZERO;
    let mut heloc_balance_sum = Decimal::ZERO;
    let mut pmi_eliminated = false;
    let mut over_limit_warned = false;

    let mut month = 1u32;
    while mortgage_balance > BALANCE_EPSILON && month <= MAX_SIMULATION_MONTHS {
        let beginning_balance = mortgage_balance;
        let beginning_heloc_balance = heloc_balance;

        let mortgage_interest = mortgage_balance * monthly_mortgage_rate;
        let heloc_interest = heloc_balance * monthly_heloc_rate;

        // PMI drops permanently once equity reaches the threshold.
        let mut current_equity_percentage = None;
        let pmi_payment = match input.property_value {
            Some(pv) => {
                let equity_pct = (pv - mortgage_balance) / pv * dec!(100);
                current_equity_percentage = Some(equity_pct);
                if equity_pct >= PMI_EQUITY_THRESHOLD_PCT {
                    pmi_eliminated = true;
                }
                if pmi_eliminated {
                    Decimal::ZERO
                } else {
                    input.pmi_monthly.unwrap_or(Decimal::ZERO)
                }
            }
            None => Decimal::ZERO,
        };

        // Base principal from the regular payment.
        let mut base_principal = input.mortgage_payment - mortgage_interest;
        if base_principal > mortgage_balance {
            base_principal = mortgage_balance;
        }

        // Discretionary goes to extra mortgage principal first; whatever the
        // mortgage cannot absorb is left over for HELOC paydown.
        let room = (mortgage_balance - base_principal).max(Decimal::ZERO);
        let extra_principal = discretionary.min(room);
        let leftover_discretionary = discretionary - extra_principal;

        // Strategic HELOC draw toward the remaining mortgage balance.
        let mut draw = Decimal::ZERO;
        let spare_capacity = (available_credit - heloc_balance).max(Decimal::ZERO);
        let still_needed = mortgage_balance - base_principal - extra_principal;
        let opportunity = input.mortgage_rate >= input.heloc_rate
            || (input.heloc_limit > Decimal::ZERO
                && mortgage_balance < input.heloc_limit * SMALL_BALANCE_FRACTION);
        if opportunity && spare_capacity > Decimal::ZERO && still_needed > Decimal::ZERO {
            draw = spare_capacity.min(still_needed);
            heloc_balance += draw;
        }

        let principal_payment = base_principal + extra_principal + draw;
        mortgage_balance -= principal_payment;

        // HELOC accrues, then leftover discretionary pays it down
        // (interest first).
        let heloc_owed = heloc_balance + heloc_interest;
        let heloc_payment = leftover_discretionary.min(heloc_owed);
        heloc_balance = heloc_owed - heloc_payment;

        if heloc_balance > available_credit && !over_limit_warned {
            over_limit_warned = true;
            warnings.push(format!(
                "HELOC balance {heloc_balance:.2} exceeds available credit {available_credit:.2} through accrued interest"
            ));
        }

        max_heloc_used = max_heloc_used.max(heloc_balance);
        heloc_balance_sum += heloc_balance;

        cumulative_interest += mortgage_interest + heloc_interest;
        cumulative_principal += principal_payment;
        total_mortgage_interest += mortgage_interest;
        total_heloc_interest += heloc_interest;

        let discretionary_used = extra_principal + heloc_payment;
        let total_monthly_payment =
            mortgage_interest + base_principal + discretionary_used + pmi_payment;

        schedule.push(HelocMonthlyRow {
            month,
            beginning_balance,
            payment_amount: base_principal + mortgage_interest,
            principal_payment,
            interest_payment: mortgage_interest,
            ending_balance: mortgage_balance,
            cumulative_interest,
            cumulative_principal,
            heloc_balance: beginning_heloc_balance,
            heloc_payment,
            heloc_interest,
            total_monthly_payment,
            discretionary_used,
            pmi_payment,
            current_equity_percentage,
        });

        month += 1;
    }

    if mortgage_balance > BALANCE_EPSILON {
        warnings.push(format!(
            "Mortgage balance of {mortgage_balance:.2} remains after {MAX_SIMULATION_MONTHS} months — the payment does not amortize the loan"
        ));
    }

    let payoff_months = schedule.len() as u32;
    let average_heloc_balance = if payoff_months == 0 {
        Decimal::ZERO
    } else {
        heloc_balance_sum / Decimal::from(payoff_months)
    };

    let output = HelocOutput {
        payoff_months,
        total_interest: total_mortgage_interest + total_heloc_interest,
        total_heloc_interest,
        total_mortgage_interest,
        schedule,
        max_heloc_used,
        average_heloc_balance,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "HELOC Acceleration Simulation",
        warnings,
        elapsed,
        output,
    ))
}

fn validate_input(input: &HelocInput) -> CalcResult<()> {
    if input.mortgage_balance <= Decimal::ZERO {
        return Err(CalculationError::invalid_input(
            "mortgage_balance",
            "must be positive",
        ));
    }
    if input.mortgage_payment <= Decimal::ZERO {
        return Err(CalculationError::from_code(
            ErrorCode::InvalidPayment,
            format!("mortgage payment {} must be positive", input.mortgage_payment),
        ));
    }
    if input.mortgage_rate < Decimal::ZERO || input.heloc_rate < Decimal::ZERO {
        return Err(CalculationError::from_code(
            ErrorCode::InvalidInterestRate,
            "rates must be non-negative",
        ));
    }
    if input.heloc_limit < Decimal::ZERO {
        return Err(CalculationError::invalid_input(
            "heloc_limit",
            "must not be negative",
        ));
    }
    if let Some(available) = input.heloc_available_credit {
        if available > input.heloc_limit {
            return Err(CalculationError::from_code(
                ErrorCode::HelocExceedsLimit,
                format!(
                    "available credit {available} exceeds HELOC limit {}",
                    input.heloc_limit
                ),
            ));
        }
    }
    if let Some(pv) = input.property_value {
        if pv <= Decimal::ZERO {
            return Err(CalculationError::invalid_input(
                "property_value",
                "must be positive",
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Strategy comparison
// ---------------------------------------------------------------------------

/// Run both strategies and diff them.
pub fn compare_strategies(
    mortgage: &MortgageInput,
    heloc: &HelocInput,
) -> CalcResult<ComputationOutput<StrategyComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let traditional = generate_amortization_schedule(mortgage)?;
    let accelerated = calculate_heloc_acceleration(heloc)?;
    warnings.extend(traditional.warnings.iter().cloned());
    warnings.extend(accelerated.warnings.iter().cloned());

    let trad = &traditional.result;
    let accel = &accelerated.result;

    let time_saved_months = i64::from(trad.payoff_months) - i64::from(accel.payoff_months);
    let interest_saved = trad.total_interest - accel.total_interest;
    let percentage_interest_saved = if trad.total_interest.is_zero() {
        Decimal::ZERO
    } else {
        interest_saved / trad.total_interest * dec!(100)
    };

    let average_accelerated_payment = if accel.schedule.is_empty() {
        Decimal::ZERO
    } else {
        accel
            .schedule
            .iter()
            .map(|row| row.total_monthly_payment)
            .sum::<Decimal>()
            / Decimal::from(accel.schedule.len() as u64)
    };

    let output = StrategyComparison {
        traditional: StrategySnapshot {
            payoff_months: trad.payoff_months,
            total_interest: trad.total_interest,
            monthly_payment: trad.monthly_payment,
        },
        accelerated: StrategySnapshot {
            payoff_months: accel.payoff_months,
            total_interest: accel.total_interest,
            monthly_payment: average_accelerated_payment,
        },
        time_saved_months,
        interest_saved,
        percentage_interest_saved,
        monthly_payment_difference: average_accelerated_payment - trad.monthly_payment,
        max_heloc_used: accel.max_heloc_used,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Traditional vs. HELOC Acceleration Comparison",
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_input() -> HelocInput {
        HelocInput {
            mortgage_balance: dec!(250000),
            mortgage_rate: dec!(0.06),
            mortgage_payment: dec!(1798.65),
            heloc_limit: dec!(20000),
            heloc_rate: dec!(0.08),
            discretionary_income: dec!(500),
            heloc_available_credit: None,
            property_value: None,
            pmi_monthly: None,
        }
    }

    #[test]
    fn test_acceleration_beats_minimum_payment() {
        let out = calculate_heloc_acceleration(&sample_input()).unwrap();
        // $500/mo extra should shave years off a 30-year payoff.
        assert!(out.result.payoff_months < 300);
        assert!(out.result.payoff_months > 120);
    }

    #[test]
    fn test_rows_chain() {
        let out = calculate_heloc_acceleration(&sample_input()).unwrap();
        for pair in out.result.schedule.windows(2) {
            assert_eq!(pair[0].ending_balance, pair[1].beginning_balance);
        }
        let last = out.result.schedule.last().unwrap();
        assert!(last.ending_balance <= BALANCE_EPSILON);
    }

    #[test]
    fn test_heloc_draw_when_rate_favorable() {
        let mut input = sample_input();
        input.heloc_rate = dec!(0.05); // cheaper than the mortgage
        let out = calculate_heloc_acceleration(&input).unwrap();
        // The full line is drawn in month 1 toward principal.
        let first = &out.result.schedule[0];
        assert_eq!(first.heloc_balance, Decimal::ZERO); // beginning-of-month value
        assert!(first.principal_payment > dec!(20000));
        assert!(out.result.max_heloc_used > Decimal::ZERO);
    }

    #[test]
    fn test_no_draw_while_rate_unfavorable_and_balance_large() {
        let out = calculate_heloc_acceleration(&sample_input()).unwrap();
        // 8% HELOC vs 6% mortgage: no draws until the balance is below 10%
        // of the limit ($2,000).
        for row in &out.result.schedule {
            if row.beginning_balance >= dec!(2000) {
                assert_eq!(row.heloc_balance, Decimal::ZERO, "month {}", row.month);
            }
        }
        assert!(out.result.max_heloc_used <= dec!(2000));
    }

    #[test]
    fn test_heloc_draws_never_exceed_available_credit() {
        let mut input = sample_input();
        input.heloc_rate = dec!(0.05);
        input.heloc_available_credit = Some(dec!(15000));
        let out = calculate_heloc_acceleration(&input).unwrap();
        // Peak usage is capped by the drawable credit plus accrued interest
        // on an undrawn month; draws themselves never push past the cap.
        let first = &out.result.schedule[0];
        assert!(first.principal_payment <= dec!(1798.65) + dec!(500) + dec!(15000));
    }

    #[test]
    fn test_pmi_eliminated_at_twenty_percent_equity() {
        let mut input = sample_input();
        input.property_value = Some(dec!(290000)); // ~13.8% equity at start
        input.pmi_monthly = Some(dec!(180));
        let out = calculate_heloc_acceleration(&input).unwrap();

        let mut seen_zero = false;
        for row in &out.result.schedule {
            let equity = row.current_equity_percentage.unwrap();
            if equity >= dec!(20) {
                seen_zero = true;
            }
            if seen_zero {
                assert_eq!(row.pmi_payment, Decimal::ZERO, "month {}", row.month);
            } else {
                assert_eq!(row.pmi_payment, dec!(180), "month {}", row.month);
            }
        }
        assert!(seen_zero, "equity never reached 20%");
    }

    #[test]
    fn test_zero_heloc_limit_still_accelerates() {
        let mut input = sample_input();
        input.heloc_limit = Decimal::ZERO;
        let out = calculate_heloc_acceleration(&input).unwrap();
        assert_eq!(out.result.max_heloc_used, Decimal::ZERO);
        assert_eq!(out.result.total_heloc_interest, Decimal::ZERO);
        assert!(out.result.payoff_months < 300);
    }

    #[test]
    fn test_available_credit_above_limit_rejected() {
        let mut input = sample_input();
        input.heloc_available_credit = Some(dec!(25000));
        let err = calculate_heloc_acceleration(&input).unwrap_err();
        assert_eq!(err.code, ErrorCode::HelocExceedsLimit);
    }

    #[test]
    fn test_negative_discretionary_clamped_with_warning() {
        let mut input = sample_input();
        input.discretionary_income = dec!(-200);
        let out = calculate_heloc_acceleration(&input).unwrap();
        assert!(!out.warnings.is_empty());
        // Behaves like the plain payment schedule (~238 months at this
        // payment), clearly slower than with the $500/mo acceleration.
        let baseline = out.result.payoff_months;
        let accelerated = calculate_heloc_acceleration(&sample_input())
            .unwrap()
            .result
            .payoff_months;
        assert!(baseline > accelerated + 48, "baseline {baseline} vs accelerated {accelerated}");
    }

    #[test]
    fn test_compare_strategies_saves_time_and_interest() {
        let mortgage = MortgageInput {
            principal: dec!(250000),
            annual_interest_rate: dec!(0.06),
            term_in_months: 360,
            current_balance: None,
            monthly_payment: None,
            property_value: None,
            pmi_monthly: None,
        };
        let out = compare_strategies(&mortgage, &sample_input()).unwrap();
        let cmp = &out.result;
        assert!(cmp.time_saved_months > 0);
        assert!(cmp.interest_saved > Decimal::ZERO);
        assert!(cmp.percentage_interest_saved > Decimal::ZERO);
        // Paying extra every month costs more per month than the baseline.
        assert!(cmp.monthly_payment_difference > Decimal::ZERO);
    }
}
