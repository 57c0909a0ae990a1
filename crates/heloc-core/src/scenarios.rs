//! Dated income/expense perturbations and the per-month adjustment engine.
//!
//! Scenarios are immutable inputs evaluated functionally for a given month;
//! nothing here mutates scenario state between months.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

#[cfg(feature = "budgeting")]
use crate::budgeting::BudgetScenario;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Recurrence pattern of a scenario within its `[start_month, end_month]`
/// window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Monthly,
    Quarterly,
    Annually,
    OneTime,
}

/// A dated change to gross income. `amount` is signed: a negative amount
/// models a pay cut or job loss. `tax_rate` applies to the gross amount
/// before it reaches take-home income.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeScenario {
    pub name: String,
    pub amount: Money,
    pub start_month: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_month: Option<u32>,
    pub frequency: Frequency,
    pub is_active: bool,
    pub tax_rate: Rate,
}

/// A dated change to monthly expenses. `amount` must be positive; the
/// essential flag and priority level are informational for the UI and do
/// not affect simulation math.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseScenario {
    pub name: String,
    pub amount: Money,
    pub start_month: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_month: Option<u32>,
    pub frequency: Frequency,
    pub is_active: bool,
    pub is_essential: bool,
    pub priority_level: u8,
}

/// Income or expense scenario as a proper sum type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scenario {
    Income(IncomeScenario),
    Expense(ExpenseScenario),
}

impl Scenario {
    pub fn name(&self) -> &str {
        match self {
            Scenario::Income(s) => &s.name,
            Scenario::Expense(s) => &s.name,
        }
    }
}

/// Adjusted income/expense stream for one month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioAdjustment {
    pub adjusted_income: Money,
    pub adjusted_expenses: Money,
    /// `adjusted_income - adjusted_expenses`; may be negative.
    pub discretionary_income: Money,
    /// Human-readable audit trail of scenarios that contributed this month.
    pub scenarios_applied: Vec<String>,
}

/// Heuristic aggregate effect of a single scenario, for UI display only.
/// The orchestrator never consumes these estimates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioImpact {
    pub scenario_name: String,
    pub months_affected: u32,
    /// Net change to discretionary income summed over the analysis window.
    pub total_discretionary_change: Money,
    pub average_monthly_change: Money,
    /// Positive = payoff accelerated, negative = payoff delayed.
    pub estimated_months_saved: Decimal,
    pub estimated_interest_saved: Money,
}

// ---------------------------------------------------------------------------
// Recurrence
// ---------------------------------------------------------------------------

/// Contribution of a recurring amount in `current_month`, anchored at
/// `start_month`. Callers are responsible for the window check.
pub fn monthly_amount(
    amount: Money,
    frequency: Frequency,
    current_month: u32,
    start_month: u32,
) -> Money {
    let elapsed = current_month.saturating_sub(start_month);
    match frequency {
        Frequency::Monthly => amount,
        Frequency::Quarterly => {
            if elapsed % 3 == 0 {
                amount
            } else {
                Decimal::ZERO
            }
        }
        Frequency::Annually => {
            if elapsed % 12 == 0 {
                amount
            } else {
                Decimal::ZERO
            }
        }
        Frequency::OneTime => {
            if current_month == start_month {
                amount
            } else {
                Decimal::ZERO
            }
        }
    }
}

fn in_window(month: u32, start_month: u32, end_month: Option<u32>) -> bool {
    month >= start_month && end_month.is_none_or(|end| month <= end)
}

fn signed(amount: Money) -> String {
    if amount.is_sign_negative() {
        amount.to_string()
    } else {
        format!("+{amount}")
    }
}

// ---------------------------------------------------------------------------
// Per-month application
// ---------------------------------------------------------------------------

/// Apply every active scenario whose window contains `month` to the base
/// income/expense stream. Income contributions are tax-adjusted before
/// being added; expense contributions are added unmodified. Total function:
/// discretionary income is not clamped and may be negative.
pub fn apply_scenarios(
    base_income: Money,
    base_expenses: Money,
    month: u32,
    income_scenarios: &[IncomeScenario],
    expense_scenarios: &[ExpenseScenario],
) -> ScenarioAdjustment {
    let mut adjusted_income = base_income;
    let mut adjusted_expenses = base_expenses;
    let mut scenarios_applied: Vec<String> = Vec::new();

    for scenario in income_scenarios {
        if !scenario.is_active || !in_window(month, scenario.start_month, scenario.end_month) {
            continue;
        }
        let gross = monthly_amount(scenario.amount, scenario.frequency, month, scenario.start_month);
        if gross.is_zero() {
            continue;
        }
        let net = gross * (Decimal::ONE - scenario.tax_rate);
        adjusted_income += net;
        scenarios_applied.push(format!("{}: {} income", scenario.name, signed(net)));
    }

    for scenario in expense_scenarios {
        if !scenario.is_active || !in_window(month, scenario.start_month, scenario.end_month) {
            continue;
        }
        let amount = monthly_amount(scenario.amount, scenario.frequency, month, scenario.start_month);
        if amount.is_zero() {
            continue;
        }
        adjusted_expenses += amount;
        scenarios_applied.push(format!("{}: {} expenses", scenario.name, signed(amount)));
    }

    ScenarioAdjustment {
        adjusted_income,
        adjusted_expenses,
        discretionary_income: adjusted_income - adjusted_expenses,
        scenarios_applied,
    }
}

// ---------------------------------------------------------------------------
// Isolated impact estimate
// ---------------------------------------------------------------------------

/// Rule-of-thumb multipliers for the impact estimate: $1,000 of additional
/// monthly principal is worth roughly 1.5 months of payoff time, and each
/// month saved roughly $1,500 of interest.
#[cfg(feature = "budgeting")]
const MONTHS_SAVED_PER_1000: Decimal = dec!(1.5);
#[cfg(feature = "budgeting")]
const INTEREST_PER_MONTH_SAVED: Decimal = dec!(1500);

/// Estimate the aggregate effect of a single scenario in isolation over
/// `months_to_analyze` months (default 60 at the call sites).
#[cfg(feature = "budgeting")]
pub fn calculate_scenario_impact(
    scenario: &Scenario,
    base: &BudgetScenario,
    months_to_analyze: u32,
) -> ScenarioImpact {
    let months_to_analyze = months_to_analyze.max(1);
    let mut total = Decimal::ZERO;
    let mut months_affected = 0u32;

    for month in 1..=months_to_analyze {
        let change = match scenario {
            Scenario::Income(s) => {
                if !s.is_active || !in_window(month, s.start_month, s.end_month) {
                    continue;
                }
                let gross = monthly_amount(s.amount, s.frequency, month, s.start_month);
                gross * (Decimal::ONE - s.tax_rate)
            }
            Scenario::Expense(s) => {
                if !s.is_active || !in_window(month, s.start_month, s.end_month) {
                    continue;
                }
                // Expenses reduce discretionary income.
                -monthly_amount(s.amount, s.frequency, month, s.start_month)
            }
        };
        if !change.is_zero() {
            months_affected += 1;
            total += change;
        }
    }

    let average = total / Decimal::from(months_to_analyze);
    // Discretionary changes reach the mortgage scaled by the budget's
    // principal multiplier.
    let additional_principal = average * base.principal_multiplier;
    let estimated_months_saved = additional_principal / dec!(1000) * MONTHS_SAVED_PER_1000;
    let estimated_interest_saved = estimated_months_saved * INTEREST_PER_MONTH_SAVED;

    ScenarioImpact {
        scenario_name: scenario.name().to_string(),
        months_affected,
        total_discretionary_change: total,
        average_monthly_change: average,
        estimated_months_saved,
        estimated_interest_saved,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn raise_at_13() -> IncomeScenario {
        IncomeScenario {
            name: "Raise".into(),
            amount: dec!(500),
            start_month: 13,
            end_month: None,
            frequency: Frequency::Monthly,
            is_active: true,
            tax_rate: dec!(0.25),
        }
    }

    fn one_time_repair() -> ExpenseScenario {
        ExpenseScenario {
            name: "Roof repair".into(),
            amount: dec!(5000),
            start_month: 6,
            end_month: Some(6),
            frequency: Frequency::OneTime,
            is_active: true,
            is_essential: true,
            priority_level: 9,
        }
    }

    #[test]
    fn test_raise_before_and_after_start() {
        let incomes = vec![raise_at_13()];
        let m1 = apply_scenarios(dec!(6000), dec!(4000), 1, &incomes, &[]);
        assert_eq!(m1.adjusted_income, dec!(6000));
        assert_eq!(m1.discretionary_income, dec!(2000));
        assert!(m1.scenarios_applied.is_empty());

        // Month 13: 6000 + 500 * (1 - 0.25) = 6375
        let m13 = apply_scenarios(dec!(6000), dec!(4000), 13, &incomes, &[]);
        assert_eq!(m13.adjusted_income, dec!(6375));
        assert_eq!(m13.discretionary_income, dec!(2375));
        assert_eq!(m13.scenarios_applied.len(), 1);
    }

    #[test]
    fn test_one_time_expense_reverts() {
        let expenses = vec![one_time_repair()];
        let m5 = apply_scenarios(dec!(6000), dec!(4000), 5, &[], &expenses);
        assert_eq!(m5.adjusted_expenses, dec!(4000));

        let m6 = apply_scenarios(dec!(6000), dec!(4000), 6, &[], &expenses);
        assert_eq!(m6.adjusted_expenses, dec!(9000));
        assert_eq!(m6.discretionary_income, dec!(-3000));

        let m7 = apply_scenarios(dec!(6000), dec!(4000), 7, &[], &expenses);
        assert_eq!(m7.adjusted_expenses, dec!(4000));
    }

    #[test]
    fn test_quarterly_anchored_at_start() {
        // Starts month 4: fires at 4, 7, 10, ...
        assert_eq!(
            monthly_amount(dec!(900), Frequency::Quarterly, 4, 4),
            dec!(900)
        );
        assert_eq!(
            monthly_amount(dec!(900), Frequency::Quarterly, 5, 4),
            Decimal::ZERO
        );
        assert_eq!(
            monthly_amount(dec!(900), Frequency::Quarterly, 7, 4),
            dec!(900)
        );
    }

    #[test]
    fn test_annual_anchored_at_start() {
        assert_eq!(
            monthly_amount(dec!(1200), Frequency::Annually, 3, 3),
            dec!(1200)
        );
        assert_eq!(
            monthly_amount(dec!(1200), Frequency::Annually, 14, 3),
            Decimal::ZERO
        );
        assert_eq!(
            monthly_amount(dec!(1200), Frequency::Annually, 15, 3),
            dec!(1200)
        );
    }

    #[test]
    fn test_inactive_scenario_ignored() {
        let mut raise = raise_at_13();
        raise.is_active = false;
        let m13 = apply_scenarios(dec!(6000), dec!(4000), 13, &[raise], &[]);
        assert_eq!(m13.adjusted_income, dec!(6000));
    }

    #[test]
    fn test_window_end_respected() {
        let mut raise = raise_at_13();
        raise.end_month = Some(24);
        let incomes = vec![raise];
        let m24 = apply_scenarios(dec!(6000), dec!(4000), 24, &incomes, &[]);
        assert_eq!(m24.adjusted_income, dec!(6375));
        let m25 = apply_scenarios(dec!(6000), dec!(4000), 25, &incomes, &[]);
        assert_eq!(m25.adjusted_income, dec!(6000));
    }

    #[test]
    fn test_negative_income_scenario_models_pay_cut() {
        let cut = IncomeScenario {
            name: "Hours reduced".into(),
            amount: dec!(-1000),
            start_month: 1,
            end_month: None,
            frequency: Frequency::Monthly,
            is_active: true,
            tax_rate: dec!(0.20),
        };
        let m1 = apply_scenarios(dec!(6000), dec!(4000), 1, &[cut], &[]);
        // 6000 - 1000 * 0.80 = 5200
        assert_eq!(m1.adjusted_income, dec!(5200));
        assert_eq!(m1.discretionary_income, dec!(1200));
    }

    #[test]
    fn test_discretionary_identity() {
        let incomes = vec![raise_at_13()];
        let expenses = vec![one_time_repair()];
        for month in 1..=24 {
            let adj = apply_scenarios(dec!(6000), dec!(4000), month, &incomes, &expenses);
            assert_eq!(
                adj.discretionary_income,
                adj.adjusted_income - adj.adjusted_expenses
            );
        }
    }

    #[cfg(feature = "budgeting")]
    mod impact {
        use super::*;
        use crate::budgeting::BudgetScenario;

        fn base_budget() -> BudgetScenario {
            BudgetScenario::new("base", dec!(7500), dec!(6000), dec!(4000), None, None)
        }

        #[test]
        fn test_income_impact_positive() {
            let scenario = Scenario::Income(IncomeScenario {
                name: "Side gig".into(),
                amount: dec!(1000),
                start_month: 1,
                end_month: None,
                frequency: Frequency::Monthly,
                is_active: true,
                tax_rate: dec!(0.25),
            });
            let impact = calculate_scenario_impact(&scenario, &base_budget(), 60);
            assert_eq!(impact.months_affected, 60);
            // 60 * 750 = 45000
            assert_eq!(impact.total_discretionary_change, dec!(45000));
            assert_eq!(impact.average_monthly_change, dec!(750));
            // 750 × 3 multiplier = 2250 of principal → 3.375 months
            assert_eq!(impact.estimated_months_saved, dec!(3.3750));
            assert_eq!(impact.estimated_interest_saved, dec!(5062.50000));
        }

        #[test]
        fn test_expense_impact_negative() {
            let scenario = Scenario::Expense(ExpenseScenario {
                name: "Childcare".into(),
                amount: dec!(1200),
                start_month: 1,
                end_month: Some(12),
                frequency: Frequency::Monthly,
                is_active: true,
                is_essential: true,
                priority_level: 10,
            });
            let impact = calculate_scenario_impact(&scenario, &base_budget(), 60);
            assert_eq!(impact.months_affected, 12);
            assert_eq!(impact.total_discretionary_change, dec!(-14400));
            assert!(impact.estimated_months_saved < Decimal::ZERO);
        }

        #[test]
        fn test_one_time_impact_single_month() {
            let scenario = Scenario::Income(IncomeScenario {
                name: "Bonus".into(),
                amount: dec!(5000),
                start_month: 6,
                end_month: Some(6),
                frequency: Frequency::OneTime,
                is_active: true,
                tax_rate: dec!(0.30),
            });
            let impact = calculate_scenario_impact(&scenario, &base_budget(), 60);
            assert_eq!(impact.months_affected, 1);
            assert_eq!(impact.total_discretionary_change, dec!(3500));
        }
    }
}
