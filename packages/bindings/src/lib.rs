use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
struct PaymentBindingInput {
    principal: rust_decimal::Decimal,
    annual_interest_rate: rust_decimal::Decimal,
    term_in_months: u32,
}

#[napi]
pub fn calculate_payment(input_json: String) -> NapiResult<String> {
    let input: PaymentBindingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let payment = heloc_core::amortization::monthly_payment(
        input.principal,
        input.annual_interest_rate,
        input.term_in_months,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&payment).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: heloc_core::amortization::MortgageInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = heloc_core::amortization::generate_amortization_schedule(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(serde::Deserialize)]
struct RemainingBalanceBindingInput {
    principal: rust_decimal::Decimal,
    annual_interest_rate: rust_decimal::Decimal,
    term_in_months: u32,
    months_paid: u32,
}

#[napi]
pub fn remaining_balance(input_json: String) -> NapiResult<String> {
    let input: RemainingBalanceBindingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let balance = heloc_core::amortization::remaining_balance(
        input.principal,
        input.annual_interest_rate,
        input.term_in_months,
        input.months_paid,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&balance).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// HELOC acceleration
// ---------------------------------------------------------------------------

#[napi]
pub fn heloc_acceleration(input_json: String) -> NapiResult<String> {
    let input: heloc_core::heloc::HelocInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        heloc_core::heloc::calculate_heloc_acceleration(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(serde::Deserialize)]
struct CompareBindingInput {
    mortgage: heloc_core::amortization::MortgageInput,
    heloc: heloc_core::heloc::HelocInput,
}

#[napi]
pub fn compare_strategies(input_json: String) -> NapiResult<String> {
    let input: CompareBindingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = heloc_core::heloc::compare_strategies(&input.mortgage, &input.heloc)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Budgeting orchestration
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
struct BudgetingBindingInput {
    budget: heloc_core::budgeting::BudgetScenario,
    mortgage: heloc_core::amortization::MortgageInput,
    #[serde(default)]
    heloc: Option<heloc_core::heloc::HelocInput>,
    #[serde(default)]
    income_scenarios: Vec<heloc_core::scenarios::IncomeScenario>,
    #[serde(default)]
    expense_scenarios: Vec<heloc_core::scenarios::ExpenseScenario>,
    #[serde(default)]
    months_to_project: Option<u32>,
}

#[napi]
pub fn budgeting_acceleration(input_json: String) -> NapiResult<String> {
    let input: BudgetingBindingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = heloc_core::budgeting::calculate_budgeting_acceleration(
        &input.budget,
        &input.mortgage,
        input.heloc.as_ref(),
        &input.income_scenarios,
        &input.expense_scenarios,
        input
            .months_to_project
            .unwrap_or(heloc_core::budgeting::DEFAULT_MONTHS_TO_PROJECT),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn live_calculation(input_json: String) -> NapiResult<String> {
    let input: heloc_core::budgeting::LiveCalculationRequest =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = heloc_core::budgeting::calculate_live(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
struct ImpactBindingInput {
    scenario: heloc_core::scenarios::Scenario,
    budget: heloc_core::budgeting::BudgetScenario,
    #[serde(default)]
    months_to_analyze: Option<u32>,
}

#[napi]
pub fn scenario_impact(input_json: String) -> NapiResult<String> {
    let input: ImpactBindingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let impact = heloc_core::scenarios::calculate_scenario_impact(
        &input.scenario,
        &input.budget,
        input.months_to_analyze.unwrap_or(60),
    );
    serde_json::to_string(&impact).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[napi]
pub fn validate_inputs(input_json: String) -> NapiResult<String> {
    let input: heloc_core::validation::ValidationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let report = heloc_core::validation::validate_calculator_inputs(&input);
    serde_json::to_string(&report).map_err(to_napi_error)
}

#[napi]
pub fn validate_scenarios(input_json: String) -> NapiResult<String> {
    let scenarios: Vec<heloc_core::scenarios::Scenario> =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let report = heloc_core::validation::validate_scenarios(&scenarios);
    serde_json::to_string(&report).map_err(to_napi_error)
}

#[derive(serde::Deserialize)]
struct LtvBindingInput {
    loan_amount: rust_decimal::Decimal,
    property_value: rust_decimal::Decimal,
}

#[napi]
pub fn safe_ltv(input_json: String) -> NapiResult<String> {
    let input: LtvBindingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let result = heloc_core::pmi::safe_ltv_calculation(input.loan_amount, input.property_value);
    serde_json::to_string(&result).map_err(to_napi_error)
}
