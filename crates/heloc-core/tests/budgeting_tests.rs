#![cfg(feature = "budgeting")]

use heloc_core::amortization::MortgageInput;
use heloc_core::budgeting::{
    calculate_budgeting_acceleration, calculate_live, BudgetScenario, LiveCalculationRequest,
    ScenarioDescriptor, ScenarioKind, DEFAULT_MONTHS_TO_PROJECT,
};
use heloc_core::heloc::HelocInput;
use heloc_core::scenarios::{ExpenseScenario, Frequency, IncomeScenario};
use heloc_core::validation::{validate_calculator_inputs, ValidationInput};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn mortgage() -> MortgageInput {
    MortgageInput {
        principal: dec!(300000),
        annual_interest_rate: dec!(0.0625),
        term_in_months: 360,
        current_balance: None,
        monthly_payment: None,
        property_value: Some(dec!(340000)),
        pmi_monthly: Some(dec!(210)),
    }
}

fn budget() -> BudgetScenario {
    BudgetScenario::new("household", dec!(9000), dec!(7200), dec!(5000), None, None)
}

fn heloc() -> HelocInput {
    HelocInput {
        mortgage_balance: dec!(300000),
        mortgage_rate: dec!(0.0625),
        mortgage_payment: dec!(1847.15),
        heloc_limit: dec!(40000),
        heloc_rate: dec!(0.09),
        discretionary_income: dec!(2200),
        heloc_available_credit: None,
        property_value: Some(dec!(340000)),
        pmi_monthly: Some(dec!(210)),
    }
}

// ===========================================================================
// Full pipeline: validate, then orchestrate
// ===========================================================================

#[test]
fn test_validated_inputs_then_full_projection() {
    let validation = validate_calculator_inputs(&ValidationInput {
        principal: Some(dec!(300000)),
        annual_interest_rate: Some(dec!(0.0625)),
        term_in_months: Some(dec!(360)),
        property_value: Some(dec!(340000)),
        pmi_monthly: Some(dec!(210)),
        monthly_gross_income: Some(dec!(9000)),
        monthly_net_income: Some(dec!(7200)),
        monthly_expenses: Some(dec!(5000)),
        discretionary_income: Some(dec!(2200)),
        heloc_limit: Some(dec!(40000)),
        heloc_rate: Some(dec!(0.09)),
        ..ValidationInput::default()
    });
    assert!(validation.is_valid, "errors: {:?}", validation.errors);

    let out = calculate_budgeting_acceleration(
        &budget(),
        &mortgage(),
        Some(&heloc()),
        &[],
        &[],
        DEFAULT_MONTHS_TO_PROJECT,
    )
    .unwrap();

    let summary = &out.result.summary;
    assert!(summary.budgeting_payoff_months < summary.traditional_payoff_months);
    assert!(summary.total_interest_saved > Decimal::ZERO);
    assert!(summary.pmi_elimination_month > 0);
    assert_eq!(summary.total_months, out.result.monthly_results.len() as u32);
}

// ===========================================================================
// Scenario-driven projections
// ===========================================================================

#[test]
fn test_raise_increases_discretionary_stats() {
    let raise = IncomeScenario {
        name: "Raise".into(),
        amount: dec!(800),
        start_month: 13,
        end_month: None,
        frequency: Frequency::Monthly,
        is_active: true,
        tax_rate: dec!(0.25),
    };

    let without = calculate_budgeting_acceleration(
        &budget(),
        &mortgage(),
        None,
        &[],
        &[],
        DEFAULT_MONTHS_TO_PROJECT,
    )
    .unwrap();
    let with = calculate_budgeting_acceleration(
        &budget(),
        &mortgage(),
        None,
        &[raise],
        &[],
        DEFAULT_MONTHS_TO_PROJECT,
    )
    .unwrap();

    assert_eq!(
        with.result.summary.min_discretionary_income,
        without.result.summary.min_discretionary_income
    );
    assert_eq!(
        with.result.summary.max_discretionary_income,
        dec!(2200) + dec!(600)
    );
    assert!(
        with.result.summary.budgeting_payoff_months
            <= without.result.summary.budgeting_payoff_months
    );
}

#[test]
fn test_emergency_expense_slows_payoff() {
    let emergency = ExpenseScenario {
        name: "Roof".into(),
        amount: dec!(2000),
        start_month: 1,
        end_month: Some(24),
        frequency: Frequency::Monthly,
        is_active: true,
        is_essential: true,
        priority_level: 10,
    };

    let baseline = calculate_budgeting_acceleration(
        &budget(),
        &mortgage(),
        None,
        &[],
        &[],
        DEFAULT_MONTHS_TO_PROJECT,
    )
    .unwrap();
    let strained = calculate_budgeting_acceleration(
        &budget(),
        &mortgage(),
        None,
        &[],
        &[emergency],
        DEFAULT_MONTHS_TO_PROJECT,
    )
    .unwrap();

    assert!(
        strained.result.summary.budgeting_payoff_months
            > baseline.result.summary.budgeting_payoff_months
    );
    assert_eq!(
        strained.result.summary.min_discretionary_income,
        dec!(200)
    );
}

// ===========================================================================
// Row-level invariants
// ===========================================================================

#[test]
fn test_pmi_monotonic_across_run() {
    let out = calculate_budgeting_acceleration(
        &budget(),
        &mortgage(),
        Some(&heloc()),
        &[],
        &[],
        DEFAULT_MONTHS_TO_PROJECT,
    )
    .unwrap();

    let mut eliminated = false;
    for row in &out.result.monthly_results {
        if eliminated {
            assert!(row.pmi_eliminated, "month {} regressed", row.month);
            assert_eq!(row.pmi_payment, Decimal::ZERO);
        }
        eliminated = eliminated || row.pmi_eliminated;
    }
    assert!(eliminated);
}

#[test]
fn test_mortgage_rows_balance_identity() {
    let out = calculate_budgeting_acceleration(
        &budget(),
        &mortgage(),
        Some(&heloc()),
        &[],
        &[],
        DEFAULT_MONTHS_TO_PROJECT,
    )
    .unwrap();
    for row in &out.result.monthly_results {
        assert_eq!(
            row.ending_mortgage_balance,
            row.beginning_mortgage_balance - row.mortgage_principal
        );
    }
}

// ===========================================================================
// Live façade
// ===========================================================================

#[test]
fn test_live_preview_shape() {
    let request = LiveCalculationRequest {
        monthly_net_income: dec!(7200),
        monthly_gross_income: None,
        monthly_expenses: dec!(5000),
        principal_multiplier: None,
        custom_principal_payment: None,
        mortgage: mortgage(),
        heloc: Some(heloc()),
        scenarios: vec![ScenarioDescriptor {
            name: "Annual bonus".into(),
            kind: ScenarioKind::Income,
            amount: dec!(6000),
            start_month: 12,
            end_month: None,
            frequency: Frequency::Annually,
            tax_rate: Some(dec!(0.3)),
            is_essential: None,
            priority_level: None,
        }],
        months_to_project: None,
    };

    let out = calculate_live(&request).unwrap();
    let response = &out.result;

    assert!(response.monthly_preview.len() <= 60);
    assert_eq!(response.monthly_preview[0].gross_income, dec!(9000));
    assert_eq!(response.payoff_months, response.summary.budgeting_payoff_months);
    assert!(response.months_saved > 0);

    // The annual bonus lands in month 12: 6000 × 0.7 = 4200 extra.
    let month_12 = &response.monthly_preview[11];
    assert_eq!(month_12.discretionary_income, dec!(2200) + dec!(4200));
}
