use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use heloc_core::budgeting::BudgetScenario;
use heloc_core::scenarios::{calculate_scenario_impact, Scenario};

use crate::input;

const DEFAULT_IMPACT_MONTHS: u32 = 60;

/// Arguments for the isolated scenario impact estimate
#[derive(Args)]
pub struct ImpactArgs {
    /// Path to a JSON/YAML file with { "scenario": ..., "budget": ... }
    #[arg(long)]
    pub input: Option<String>,

    /// Analysis window in months
    #[arg(long, default_value_t = DEFAULT_IMPACT_MONTHS)]
    pub months: u32,
}

#[derive(Deserialize)]
struct ImpactInput {
    scenario: Scenario,
    budget: ImpactBudget,
}

#[derive(Deserialize)]
struct ImpactBudget {
    monthly_gross_income: Decimal,
    monthly_net_income: Decimal,
    monthly_expenses: Decimal,
    #[serde(default)]
    principal_multiplier: Option<Decimal>,
}

pub fn run_impact(args: ImpactArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let impact_input: ImpactInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("impact requires --input or piped JSON with scenario and budget sections".into());
    };

    let budget = BudgetScenario::new(
        "impact",
        impact_input.budget.monthly_gross_income,
        impact_input.budget.monthly_net_income,
        impact_input.budget.monthly_expenses,
        impact_input.budget.principal_multiplier,
        None,
    );

    let impact = calculate_scenario_impact(&impact_input.scenario, &budget, args.months);
    Ok(serde_json::to_value(impact)?)
}
