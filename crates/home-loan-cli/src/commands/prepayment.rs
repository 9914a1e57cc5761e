use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use home_loan_core::prepayment::{self, LumpSumOrder, PrepaymentInput};

use crate::commands::loan::{resolve_tranches, MethodChoice, TrancheArgs, TEN_THOUSAND};
use crate::input;

/// Tranche the annual lump sum pays down first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ApplyFirst {
    Commercial,
    Provident,
}

impl From<ApplyFirst> for LumpSumOrder {
    fn from(choice: ApplyFirst) -> Self {
        match choice {
            ApplyFirst::Commercial => LumpSumOrder::CommercialFirst,
            ApplyFirst::Provident => LumpSumOrder::ProvidentFirst,
        }
    }
}

/// Arguments for the annual lump-sum prepayment simulation
#[derive(Args)]
pub struct PrepaymentArgs {
    #[command(flatten)]
    pub tranches: TrancheArgs,

    /// Lump sum applied every 12th month, in ten-thousands
    #[arg(long)]
    pub yearly_amount: Option<Decimal>,

    /// Repayment convention for the scheduled payments
    #[arg(long, value_enum, default_value = "equal-payment")]
    pub method: MethodChoice,

    /// Tranche the lump sum pays down first
    #[arg(long, value_enum, default_value = "commercial")]
    pub apply_first: ApplyFirst,

    /// Balance at or below this counts as fully repaid, base currency units
    #[arg(long, default_value = "0.1")]
    pub payoff_epsilon: Decimal,

    /// Path to a JSON or YAML input file, base currency units (overrides flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_prepayment(args: PrepaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sim_input: PrepaymentInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_piped()? {
        serde_json::from_value(data)?
    } else {
        let (commercial, provident) = resolve_tranches(&args.tranches)?;
        let yearly = args
            .yearly_amount
            .ok_or("--yearly-amount is required (or provide --input)")?;
        if yearly <= Decimal::ZERO {
            return Err("--yearly-amount must be positive".into());
        }
        PrepaymentInput {
            commercial,
            provident,
            years: args.tranches.years,
            method: args.method.into(),
            yearly_lump_sum: yearly * TEN_THOUSAND,
            lump_sum_order: args.apply_first.into(),
            payoff_epsilon: args.payoff_epsilon,
        }
    };

    let result = prepayment::simulate_prepayment(&sim_input)?;
    Ok(serde_json::to_value(result)?)
}
