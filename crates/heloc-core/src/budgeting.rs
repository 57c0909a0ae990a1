//! Budgeting acceleration orchestrator: composes the amortization engine,
//! the scenario engine, and the HELOC draw/paydown policy into a single
//! month-by-month projection, compared against the traditional baseline.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{generate_amortization_schedule, MortgageInput};
use crate::heloc::HelocInput;
use crate::scenarios::{apply_scenarios, ExpenseScenario, Frequency, IncomeScenario};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::{CalcResult, BALANCE_EPSILON, MAX_SIMULATION_MONTHS};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Recommended principal payment = discretionary income × this multiplier.
pub const DEFAULT_PRINCIPAL_MULTIPLIER: Decimal = dec!(3.0);

/// Default projection horizon.
pub const DEFAULT_MONTHS_TO_PROJECT: u32 = 360;

/// LTV at or below which this orchestrator drops PMI. The HELOC engine uses
/// a 20%-equity rule instead; thresholds are deliberately per-engine.
const PMI_REMOVAL_LTV: Decimal = dec!(78);

/// Gross income estimate multiplier for live requests that omit gross.
const GROSS_FROM_NET_FACTOR: Decimal = dec!(1.25);

/// Months of detail returned to live-preview callers.
const LIVE_PREVIEW_MONTHS: usize = 60;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A saved (or ephemeral) budget configuration. Created once per simulation
/// request and never mutated mid-run; per-month adjustments are computed
/// functionally from the scenario lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetScenario {
    pub name: String,
    pub monthly_gross_income: Money,
    pub monthly_net_income: Money,
    pub monthly_expenses: Money,
    /// `monthly_net_income - monthly_expenses`.
    pub base_discretionary_income: Money,
    pub principal_multiplier: Decimal,
    /// `base_discretionary_income × principal_multiplier`, floored at zero.
    pub recommended_principal_payment: Money,
    /// Fixed override; replaces the recommended payment entirely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_principal_payment: Option<Money>,
}

impl BudgetScenario {
    pub fn new(
        name: &str,
        monthly_gross_income: Money,
        monthly_net_income: Money,
        monthly_expenses: Money,
        principal_multiplier: Option<Decimal>,
        custom_principal_payment: Option<Money>,
    ) -> Self {
        let multiplier = principal_multiplier.unwrap_or(DEFAULT_PRINCIPAL_MULTIPLIER);
        let base_discretionary_income = monthly_net_income - monthly_expenses;
        BudgetScenario {
            name: name.to_string(),
            monthly_gross_income,
            monthly_net_income,
            monthly_expenses,
            base_discretionary_income,
            principal_multiplier: multiplier,
            recommended_principal_payment: (base_discretionary_income * multiplier)
                .max(Decimal::ZERO),
            custom_principal_payment,
        }
    }
}

/// One projected month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetMonthRow {
    pub month: u32,
    pub gross_income: Money,
    pub net_income: Money,
    pub total_expenses: Money,
    pub discretionary_income: Money,
    pub recommended_principal_payment: Money,
    pub actual_principal_payment: Money,
    pub beginning_mortgage_balance: Money,
    pub ending_mortgage_balance: Money,
    pub mortgage_interest: Money,
    pub mortgage_principal: Money,
    pub beginning_heloc_balance: Money,
    pub ending_heloc_balance: Money,
    pub heloc_payment: Money,
    pub heloc_interest: Money,
    pub heloc_principal: Money,
    pub pmi_payment: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_ltv: Option<Decimal>,
    /// Monotonic: once true, stays true for the rest of the run.
    pub pmi_eliminated: bool,
    pub cumulative_interest_paid: Money,
    pub cumulative_principal_paid: Money,
    pub cumulative_interest_saved: Money,
    /// How many months ahead of the traditional schedule the current
    /// balance level is.
    pub months_ahead_of_traditional: i64,
    pub total_monthly_outflow: Money,
    pub remaining_cash_flow: Money,
    pub cash_flow_stress_ratio: Decimal,
    pub scenarios_applied: Vec<String>,
}

/// Aggregate statistics for a projection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationSummary {
    pub total_months: u32,
    pub total_interest_saved: Money,
    /// First month where PMI was eliminated; 0 if never.
    pub pmi_elimination_month: u32,
    pub max_discretionary_income: Money,
    pub min_discretionary_income: Money,
    pub average_discretionary_income: Money,
    pub traditional_payoff_months: u32,
    pub budgeting_payoff_months: u32,
    pub months_saved: i64,
}

/// Traditional baseline headline numbers embedded in the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraditionalComparison {
    pub monthly_payment: Money,
    pub payoff_months: u32,
    pub total_interest: Money,
}

/// Full orchestrator result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetingOutput {
    pub summary: CalculationSummary,
    pub monthly_results: Vec<BudgetMonthRow>,
    pub traditional_comparison: TraditionalComparison,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Project the budgeting acceleration strategy month by month.
///
/// The loop runs while the mortgage balance exceeds `BALANCE_EPSILON`, up to
/// `months_to_project` months and never past `MAX_SIMULATION_MONTHS`.
pub fn calculate_budgeting_acceleration(
    scenario: &BudgetScenario,
    mortgage: &MortgageInput,
    heloc: Option<&HelocInput>,
    income_scenarios: &[IncomeScenario],
    expense_scenarios: &[ExpenseScenario],
    months_to_project: u32,
) -> CalcResult<ComputationOutput<BudgetingOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let traditional = generate_amortization_schedule(mortgage)?;
    warnings.extend(traditional.warnings.iter().cloned());
    let trad = traditional.result;

    let base_payment = mortgage.monthly_payment.unwrap_or(trad.monthly_payment);
    let monthly_rate = mortgage.annual_interest_rate / MONTHS_PER_YEAR;

    let heloc_limit = heloc.map(|h| h.heloc_limit).unwrap_or(Decimal::ZERO);
    let heloc_available = heloc
        .and_then(|h| h.heloc_available_credit)
        .unwrap_or(heloc_limit);
    let monthly_heloc_rate = heloc
        .map(|h| h.heloc_rate / MONTHS_PER_YEAR)
        .unwrap_or(Decimal::ZERO);

    let month_cap = months_to_project.min(MAX_SIMULATION_MONTHS);

    let mut mortgage_balance = mortgage.current_balance.unwrap_or(mortgage.principal);
    let mut heloc_balance = Decimal::ZERO;
    let mut pmi_eliminated = false;
    let mut cumulative_interest_saved = Decimal::ZERO;
    let mut trad_cursor = 0usize;

    let mut rows: Vec<BudgetMonthRow> = Vec::new();

    let mut month = 1u32;
    while mortgage_balance > BALANCE_EPSILON && month <= month_cap {
        // 1. Scenario-adjusted income and expenses for this month.
        let adjustment = apply_scenarios(
            scenario.monthly_net_income,
            scenario.monthly_expenses,
            month,
            income_scenarios,
            expense_scenarios,
        );
        let discretionary = adjustment.discretionary_income;

        // 2–3. Recommended payment, replaced wholesale by any fixed override.
        let recommended = (discretionary * scenario.principal_multiplier).max(Decimal::ZERO);
        let actual = scenario.custom_principal_payment.unwrap_or(recommended);

        // 4. Mortgage accrual and principal application.
        let beginning_mortgage_balance = mortgage_balance;
        let mortgage_interest = mortgage_balance * monthly_rate;
        let base_principal = base_payment - mortgage_interest;
        let total_principal = (base_principal + actual).min(mortgage_balance);
        let applied_extra = (total_principal - base_principal).max(Decimal::ZERO);

        // 5. Fund any shortfall beyond discretionary from the HELOC.
        let beginning_heloc_balance = heloc_balance;
        let mut draw = Decimal::ZERO;
        if heloc.is_some() && heloc_limit > Decimal::ZERO {
            let cash_available = discretionary.max(Decimal::ZERO);
            let shortfall = (applied_extra - cash_available).max(Decimal::ZERO);
            let spare = (heloc_available - heloc_balance).max(Decimal::ZERO);
            draw = shortfall.min(spare);
        }

        // 6. HELOC accrues on its current balance; leftover discretionary
        // pays it down, interest first.
        let heloc_interest = heloc_balance * monthly_heloc_rate;
        let leftover = (discretionary - applied_extra).max(Decimal::ZERO);
        let heloc_owed = heloc_balance + draw + heloc_interest;
        let heloc_payment = leftover.min(heloc_owed);
        heloc_balance = heloc_owed - heloc_payment;
        let heloc_principal = (heloc_payment - heloc_interest).max(Decimal::ZERO);

        mortgage_balance -= total_principal;

        // 7. PMI: removed permanently once LTV reaches the threshold.
        let mut current_ltv = None;
        let pmi_payment = match mortgage.property_value {
            Some(pv) if pv > Decimal::ZERO => {
                let ltv = beginning_mortgage_balance / pv * dec!(100);
                current_ltv = Some(ltv);
                if ltv <= PMI_REMOVAL_LTV {
                    pmi_eliminated = true;
                }
                if pmi_eliminated {
                    Decimal::ZERO
                } else {
                    mortgage.pmi_monthly.unwrap_or(Decimal::ZERO)
                }
            }
            _ => Decimal::ZERO,
        };

        // 8. Interest saved against the same-indexed traditional month.
        if let Some(trad_row) = trad.schedule.get(month as usize - 1) {
            cumulative_interest_saved += trad_row.interest_payment - mortgage_interest;
        }

        // Months ahead: where the traditional schedule first reaches the
        // balance we are at now.
        while trad_cursor < trad.schedule.len()
            && trad.schedule[trad_cursor].ending_balance > mortgage_balance
        {
            trad_cursor += 1;
        }
        let months_ahead_of_traditional = (trad_cursor as i64 + 1) - i64::from(month);

        // Out-of-pocket cash this month; HELOC draws are financed, not cash.
        let mortgage_cash = mortgage_interest + base_principal.min(total_principal);
        let extra_cash = (applied_extra - draw).max(Decimal::ZERO);
        let total_monthly_outflow = adjustment.adjusted_expenses
            + mortgage_cash
            + extra_cash
            + heloc_payment
            + pmi_payment;
        let remaining_cash_flow = adjustment.adjusted_income - total_monthly_outflow;
        let cash_flow_stress_ratio = if adjustment.adjusted_income > Decimal::ZERO {
            total_monthly_outflow / adjustment.adjusted_income
        } else {
            Decimal::ZERO
        };

        rows.push(BudgetMonthRow {
            month,
            gross_income: scenario.monthly_gross_income,
            net_income: adjustment.adjusted_income,
            total_expenses: adjustment.adjusted_expenses,
            discretionary_income: discretionary,
            recommended_principal_payment: recommended,
            actual_principal_payment: actual,
            beginning_mortgage_balance,
            ending_mortgage_balance: mortgage_balance,
            mortgage_interest,
            mortgage_principal: total_principal,
            beginning_heloc_balance,
            ending_heloc_balance: heloc_balance,
            heloc_payment,
            heloc_interest,
            heloc_principal,
            pmi_payment,
            current_ltv,
            pmi_eliminated,
            cumulative_interest_paid: Decimal::ZERO, // filled by the second pass
            cumulative_principal_paid: Decimal::ZERO, // filled by the second pass
            cumulative_interest_saved,
            months_ahead_of_traditional,
            total_monthly_outflow,
            remaining_cash_flow,
            cash_flow_stress_ratio,
            scenarios_applied: adjustment.scenarios_applied,
        });

        month += 1;
    }

    if mortgage_balance > BALANCE_EPSILON {
        warnings.push(format!(
            "Mortgage balance of {mortgage_balance:.2} remains after {} projected months",
            rows.len()
        ));
    }

    // Second pass: cumulative totals need mortgage and HELOC interest from
    // the same iteration, so they are recomputed over the finished rows
    // rather than carried through the main loop.
    let mut cumulative_interest = Decimal::ZERO;
    let mut cumulative_principal = Decimal::ZERO;
    for row in &mut rows {
        cumulative_interest += row.mortgage_interest + row.heloc_interest;
        cumulative_principal += row.mortgage_principal + row.heloc_principal;
        row.cumulative_interest_paid = cumulative_interest;
        row.cumulative_principal_paid = cumulative_principal;
    }

    let summary = summarize(&rows, &trad, cumulative_interest);
    let output = BudgetingOutput {
        summary,
        monthly_results: rows,
        traditional_comparison: TraditionalComparison {
            monthly_payment: trad.monthly_payment,
            payoff_months: trad.payoff_months,
            total_interest: trad.total_interest,
        },
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Budgeting Acceleration Projection",
        warnings,
        elapsed,
        output,
    ))
}

fn summarize(
    rows: &[BudgetMonthRow],
    trad: &crate::amortization::AmortizationOutput,
    total_interest_paid: Money,
) -> CalculationSummary {
    let total_months = rows.len() as u32;

    let mut max_discretionary = Decimal::MIN;
    let mut min_discretionary = Decimal::MAX;
    let mut discretionary_sum = Decimal::ZERO;
    let mut pmi_elimination_month = 0u32;

    for row in rows {
        max_discretionary = max_discretionary.max(row.discretionary_income);
        min_discretionary = min_discretionary.min(row.discretionary_income);
        discretionary_sum += row.discretionary_income;
        if pmi_elimination_month == 0 && row.pmi_eliminated {
            pmi_elimination_month = row.month;
        }
    }

    let average_discretionary = if total_months == 0 {
        Decimal::ZERO
    } else {
        discretionary_sum / Decimal::from(total_months)
    };
    if total_months == 0 {
        max_discretionary = Decimal::ZERO;
        min_discretionary = Decimal::ZERO;
    }

    CalculationSummary {
        total_months,
        total_interest_saved: trad.total_interest - total_interest_paid,
        pmi_elimination_month,
        max_discretionary_income: max_discretionary,
        min_discretionary_income: min_discretionary,
        average_discretionary_income: average_discretionary,
        traditional_payoff_months: trad.payoff_months,
        budgeting_payoff_months: total_months,
        months_saved: i64::from(trad.payoff_months) - i64::from(total_months),
    }
}

// ---------------------------------------------------------------------------
// Live calculation façade
// ---------------------------------------------------------------------------

/// Income or expense marker on a live-request scenario descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Income,
    Expense,
}

/// Loose scenario shape accepted from the live-preview form; converted into
/// the typed scenarios before simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioDescriptor {
    pub name: String,
    pub kind: ScenarioKind,
    pub amount: Money,
    pub start_month: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_month: Option<u32>,
    pub frequency: Frequency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_essential: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_level: Option<u8>,
}

/// Live-preview request from the calculator form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveCalculationRequest {
    pub monthly_net_income: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_gross_income: Option<Money>,
    pub monthly_expenses: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_multiplier: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_principal_payment: Option<Money>,
    pub mortgage: MortgageInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heloc: Option<HelocInput>,
    #[serde(default)]
    pub scenarios: Vec<ScenarioDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months_to_project: Option<u32>,
}

/// Truncated response shape for live display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveCalculationResponse {
    pub payoff_months: u32,
    pub months_saved: i64,
    pub total_interest_saved: Money,
    pub pmi_elimination_month: u32,
    pub summary: CalculationSummary,
    /// First 60 months of detail.
    pub monthly_preview: Vec<BudgetMonthRow>,
}

/// Thin façade over the orchestrator for live form preview: builds an
/// ephemeral budget scenario (estimating gross income when absent), converts
/// descriptor scenarios into typed ones, and truncates the detail rows.
pub fn calculate_live(
    request: &LiveCalculationRequest,
) -> CalcResult<ComputationOutput<LiveCalculationResponse>> {
    let start = Instant::now();
    let gross = request
        .monthly_gross_income
        .unwrap_or(request.monthly_net_income * GROSS_FROM_NET_FACTOR);

    let scenario = BudgetScenario::new(
        "live",
        gross,
        request.monthly_net_income,
        request.monthly_expenses,
        request.principal_multiplier,
        request.custom_principal_payment,
    );

    let mut income_scenarios: Vec<IncomeScenario> = Vec::new();
    let mut expense_scenarios: Vec<ExpenseScenario> = Vec::new();
    for descriptor in &request.scenarios {
        match descriptor.kind {
            ScenarioKind::Income => income_scenarios.push(IncomeScenario {
                name: descriptor.name.clone(),
                amount: descriptor.amount,
                start_month: descriptor.start_month,
                end_month: descriptor.end_month,
                frequency: descriptor.frequency,
                is_active: true,
                tax_rate: descriptor.tax_rate.unwrap_or(Decimal::ZERO),
            }),
            ScenarioKind::Expense => expense_scenarios.push(ExpenseScenario {
                name: descriptor.name.clone(),
                amount: descriptor.amount,
                start_month: descriptor.start_month,
                end_month: descriptor.end_month,
                frequency: descriptor.frequency,
                is_active: true,
                is_essential: descriptor.is_essential.unwrap_or(false),
                priority_level: descriptor.priority_level.unwrap_or(5),
            }),
        }
    }

    let projected = calculate_budgeting_acceleration(
        &scenario,
        &request.mortgage,
        request.heloc.as_ref(),
        &income_scenarios,
        &expense_scenarios,
        request.months_to_project.unwrap_or(DEFAULT_MONTHS_TO_PROJECT),
    )?;

    let warnings = projected.warnings.clone();
    let result = projected.result;
    let mut monthly_preview = result.monthly_results;
    monthly_preview.truncate(LIVE_PREVIEW_MONTHS);

    let response = LiveCalculationResponse {
        payoff_months: result.summary.budgeting_payoff_months,
        months_saved: result.summary.months_saved,
        total_interest_saved: result.summary.total_interest_saved,
        pmi_elimination_month: result.summary.pmi_elimination_month,
        summary: result.summary,
        monthly_preview,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Live Budgeting Preview",
        warnings,
        elapsed,
        response,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
