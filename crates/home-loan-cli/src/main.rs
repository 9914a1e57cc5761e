mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::advisory::AdvisoryArgs;
use commands::loan::LoanArgs;
use commands::prepayment::PrepaymentArgs;

/// Housing-loan schedules and prepayment planning
#[derive(Parser)]
#[command(
    name = "hloan",
    version,
    about = "Housing-loan schedules and prepayment planning",
    long_about = "A CLI for housing-loan calculations with decimal precision. \
                  Quotes equal-payment and equal-principal schedules for commercial, \
                  provident-fund, and combination loans, simulates annual lump-sum \
                  prepayment, and grades repayment pressure against household income."
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
    /// Quote a loan under both repayment conventions
    Loan(LoanArgs),
    /// Simulate an annual lump-sum prepayment policy
    Prepayment(PrepaymentArgs),
    /// Assess repayment pressure and render planning commentary
    Advisory(AdvisoryArgs),
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
        Commands::Loan(args) => commands::loan::run_loan(args),
        Commands::Prepayment(args) => commands::prepayment::run_prepayment(args),
        Commands::Advisory(args) => commands::advisory::run_advisory(args),
        Commands::Version => {
            println!("hloan {}", env!("CARGO_PKG_VERSION"));
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
