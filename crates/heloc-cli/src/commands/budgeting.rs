use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use heloc_core::amortization::MortgageInput;
use heloc_core::budgeting::{
    calculate_budgeting_acceleration, calculate_live, BudgetScenario, LiveCalculationRequest,
    DEFAULT_MONTHS_TO_PROJECT,
};
use heloc_core::heloc::HelocInput;
use heloc_core::scenarios::{ExpenseScenario, IncomeScenario};
use rust_decimal::Decimal;

use crate::input;

/// Arguments for the budgeting acceleration projection
#[derive(Args)]
pub struct BudgetArgs {
    /// Path to a JSON/YAML projection file (see `budget` input shape)
    #[arg(long)]
    pub input: Option<String>,

    /// Months to project (hard-capped at 600)
    #[arg(long)]
    pub months: Option<u32>,
}

/// Arguments for the live-preview calculation
#[derive(Args)]
pub struct LiveArgs {
    /// Path to a JSON/YAML live-request file
    #[arg(long)]
    pub input: Option<String>,
}

/// Budget projection input shape: the budget plus the loans and scenario
/// lists it runs against.
#[derive(Deserialize)]
struct BudgetProjectionInput {
    budget: BudgetSpec,
    mortgage: MortgageInput,
    #[serde(default)]
    heloc: Option<HelocInput>,
    #[serde(default)]
    income_scenarios: Vec<IncomeScenario>,
    #[serde(default)]
    expense_scenarios: Vec<ExpenseScenario>,
    #[serde(default)]
    months_to_project: Option<u32>,
}

/// Loose budget shape; derived fields are computed, not supplied.
#[derive(Deserialize)]
struct BudgetSpec {
    #[serde(default = "default_budget_name")]
    name: String,
    monthly_gross_income: Decimal,
    monthly_net_income: Decimal,
    monthly_expenses: Decimal,
    #[serde(default)]
    principal_multiplier: Option<Decimal>,
    #[serde(default)]
    custom_principal_payment: Option<Decimal>,
}

fn default_budget_name() -> String {
    "cli".to_string()
}

impl BudgetSpec {
    fn into_scenario(self) -> BudgetScenario {
        BudgetScenario::new(
            &self.name,
            self.monthly_gross_income,
            self.monthly_net_income,
            self.monthly_expenses,
            self.principal_multiplier,
            self.custom_principal_payment,
        )
    }
}

pub fn run_budget(args: BudgetArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let projection: BudgetProjectionInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("budget requires --input or piped JSON".into());
    };

    let months = args
        .months
        .or(projection.months_to_project)
        .unwrap_or(DEFAULT_MONTHS_TO_PROJECT);

    let output = calculate_budgeting_acceleration(
        &projection.budget.into_scenario(),
        &projection.mortgage,
        projection.heloc.as_ref(),
        &projection.income_scenarios,
        &projection.expense_scenarios,
        months,
    )?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_live(args: LiveArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: LiveCalculationRequest = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("live requires --input or piped JSON".into());
    };

    let output = calculate_live(&request)?;
    Ok(serde_json::to_value(output)?)
}
