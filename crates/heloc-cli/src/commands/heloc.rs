use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use heloc_core::amortization::MortgageInput;
use heloc_core::heloc::{calculate_heloc_acceleration, compare_strategies, HelocInput};

use crate::input;

/// Arguments for the HELOC acceleration simulation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AccelerateArgs {
    /// Current mortgage balance
    #[arg(long)]
    pub mortgage_balance: Option<Decimal>,

    /// Annual mortgage rate as a decimal
    #[arg(long)]
    pub mortgage_rate: Option<Decimal>,

    /// Regular monthly mortgage payment
    #[arg(long)]
    pub mortgage_payment: Option<Decimal>,

    /// HELOC credit limit
    #[arg(long)]
    pub heloc_limit: Option<Decimal>,

    /// Annual HELOC rate as a decimal
    #[arg(long)]
    pub heloc_rate: Option<Decimal>,

    /// Monthly discretionary income available for acceleration
    #[arg(long)]
    pub discretionary: Option<Decimal>,

    /// Drawable HELOC credit (defaults to the limit)
    #[arg(long)]
    pub available_credit: Option<Decimal>,

    /// Appraised property value (enables PMI tracking)
    #[arg(long)]
    pub property_value: Option<Decimal>,

    /// Monthly PMI premium
    #[arg(long)]
    pub pmi: Option<Decimal>,

    /// Path to a JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the strategy comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to a JSON/YAML file with { "mortgage": ..., "heloc": ... }
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Deserialize)]
struct CompareInput {
    mortgage: MortgageInput,
    heloc: HelocInput,
}

impl AccelerateArgs {
    fn into_input(self) -> Result<HelocInput, Box<dyn std::error::Error>> {
        Ok(HelocInput {
            mortgage_balance: self
                .mortgage_balance
                .ok_or("--mortgage-balance is required (or provide --input)")?,
            mortgage_rate: self
                .mortgage_rate
                .ok_or("--mortgage-rate is required (or provide --input)")?,
            mortgage_payment: self
                .mortgage_payment
                .ok_or("--mortgage-payment is required (or provide --input)")?,
            heloc_limit: self
                .heloc_limit
                .ok_or("--heloc-limit is required (or provide --input)")?,
            heloc_rate: self
                .heloc_rate
                .ok_or("--heloc-rate is required (or provide --input)")?,
            discretionary_income: self
                .discretionary
                .ok_or("--discretionary is required (or provide --input)")?,
            heloc_available_credit: self.available_credit,
            property_value: self.property_value,
            pmi_monthly: self.pmi,
        })
    }
}

pub fn run_accelerate(args: AccelerateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let heloc_input: HelocInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        args.into_input()?
    };

    let output = calculate_heloc_acceleration(&heloc_input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let compare_input: CompareInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("compare requires --input or piped JSON with mortgage and heloc sections".into());
    };

    let output = compare_strategies(&compare_input.mortgage, &compare_input.heloc)?;
    Ok(serde_json::to_value(output)?)
}
