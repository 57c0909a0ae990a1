use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use heloc_core::pmi::{calculate_ltv, is_mip_required, suggested_monthly_pmi};
use heloc_core::scenarios::Scenario;
use heloc_core::validation::{validate_calculator_inputs, validate_scenarios, ValidationInput};

use crate::input;

/// Arguments for input validation
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to a JSON/YAML file with calculator inputs
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a JSON/YAML file with a scenario list to validate instead
    #[arg(long)]
    pub scenarios: Option<String>,
}

/// Arguments for LTV and PMI suggestion
#[derive(Args)]
pub struct LtvArgs {
    /// Current loan balance
    #[arg(long)]
    pub loan: Decimal,

    /// Appraised property value
    #[arg(long)]
    pub value: Decimal,
}

pub fn run_validate(args: ValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.scenarios {
        let scenarios: Vec<Scenario> = input::file::read_input(path)?;
        let report = validate_scenarios(&scenarios);
        return Ok(serde_json::to_value(report)?);
    }

    let validation_input: ValidationInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("validate requires --input, --scenarios, or piped JSON".into());
    };

    let report = validate_calculator_inputs(&validation_input);
    Ok(serde_json::to_value(report)?)
}

pub fn run_ltv(args: LtvArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let ltv = calculate_ltv(args.loan, args.value)?;
    Ok(json!({
        "ltv": ltv,
        "mip_required": is_mip_required(ltv),
        "suggested_monthly_pmi": suggested_monthly_pmi(args.loan, ltv),
    }))
}
