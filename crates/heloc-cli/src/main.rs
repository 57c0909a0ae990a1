mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::amortization::{AmortizeArgs, BalanceArgs, PaymentArgs};
use commands::budgeting::{BudgetArgs, LiveArgs};
use commands::heloc::{AccelerateArgs, CompareArgs};
use commands::scenarios::ImpactArgs;
use commands::validation::{LtvArgs, ValidateArgs};

/// HELOC mortgage-acceleration calculations
#[derive(Parser)]
#[command(
    name = "heloc",
    version,
    about = "HELOC mortgage-acceleration calculations",
    long_about = "A CLI for mortgage amortization and HELOC acceleration analysis \
                  with decimal precision. Supports payment and schedule generation, \
                  HELOC acceleration simulation, budgeting projections with \
                  income/expense scenarios, and input validation."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the standard fixed-rate monthly payment
    Payment(PaymentArgs),
    /// Generate a full amortization schedule
    Amortize(AmortizeArgs),
    /// Remaining balance after a number of payments (closed form)
    Balance(BalanceArgs),
    /// Simulate the HELOC acceleration strategy
    Accelerate(AccelerateArgs),
    /// Compare traditional vs. HELOC-accelerated payoff
    Compare(CompareArgs),
    /// Run the budgeting acceleration projection
    Budget(BudgetArgs),
    /// Live-preview projection from a calculator request
    Live(LiveArgs),
    /// Estimate the isolated impact of a single scenario
    Impact(ImpactArgs),
    /// Validate calculator inputs or scenario lists
    Validate(ValidateArgs),
    /// Loan-to-value ratio and PMI suggestion
    Ltv(LtvArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::amortization::run_payment(args),
        Commands::Amortize(args) => commands::amortization::run_amortize(args),
        Commands::Balance(args) => commands::amortization::run_balance(args),
        Commands::Accelerate(args) => commands::heloc::run_accelerate(args),
        Commands::Compare(args) => commands::heloc::run_compare(args),
        Commands::Budget(args) => commands::budgeting::run_budget(args),
        Commands::Live(args) => commands::budgeting::run_live(args),
        Commands::Impact(args) => commands::scenarios::run_impact(args),
        Commands::Validate(args) => commands::validation::run_validate(args),
        Commands::Ltv(args) => commands::validation::run_ltv(args),
        Commands::Version => {
            println!("heloc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
