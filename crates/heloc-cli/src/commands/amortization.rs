use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use heloc_core::amortization::{
    self, generate_amortization_schedule, monthly_payment, remaining_balance,
};

use crate::input;

/// Arguments for the standard payment calculation
#[derive(Args)]
pub struct PaymentArgs {
    /// Loan principal in dollars
    #[arg(long)]
    pub principal: Decimal,

    /// Annual interest rate as a decimal (e.g. 0.065 for 6.5%)
    #[arg(long)]
    pub rate: Decimal,

    /// Loan term in months
    #[arg(long)]
    pub term: u32,
}

/// Arguments for amortization schedule generation
#[derive(Args)]
pub struct AmortizeArgs {
    /// Loan principal in dollars
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate as a decimal
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in months
    #[arg(long)]
    pub term: Option<u32>,

    /// Outstanding balance today (defaults to principal)
    #[arg(long)]
    pub current_balance: Option<Decimal>,

    /// Actual monthly payment (defaults to the standard payment)
    #[arg(long)]
    pub payment: Option<Decimal>,

    /// Path to a JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the closed-form remaining balance lookup
#[derive(Args)]
pub struct BalanceArgs {
    /// Loan principal in dollars
    #[arg(long)]
    pub principal: Decimal,

    /// Annual interest rate as a decimal
    #[arg(long)]
    pub rate: Decimal,

    /// Loan term in months
    #[arg(long)]
    pub term: u32,

    /// Number of payments already made
    #[arg(long)]
    pub months_paid: u32,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let payment = monthly_payment(args.principal, args.rate, args.term)?;
    Ok(json!({
        "monthly_payment": payment,
        "principal": args.principal,
        "annual_interest_rate": args.rate,
        "term_in_months": args.term,
    }))
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mortgage: amortization::MortgageInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        amortization::MortgageInput {
            principal: args.principal.ok_or("--principal is required (or provide --input)")?,
            annual_interest_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_in_months: args.term.ok_or("--term is required (or provide --input)")?,
            current_balance: args.current_balance,
            monthly_payment: args.payment,
            property_value: None,
            pmi_monthly: None,
        }
    };

    let output = generate_amortization_schedule(&mortgage)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_balance(args: BalanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let balance = remaining_balance(args.principal, args.rate, args.term, args.months_paid)?;
    Ok(json!({
        "remaining_balance": balance,
        "months_paid": args.months_paid,
        "months_remaining": args.term.saturating_sub(args.months_paid),
    }))
}
