use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use home_loan_core::affordability::{
    self, AffordabilityInput, AffordabilityOutput, PressureLevel,
};
use home_loan_core::amortization::{self, LoanInput};

use crate::commands::loan::{resolve_tranches, MethodChoice, TrancheArgs, TEN_THOUSAND};
use crate::input;

/// Arguments for the affordability assessment and planning commentary
#[derive(Args)]
pub struct AdvisoryArgs {
    /// Gross monthly household income, base currency units
    #[arg(long)]
    pub monthly_income: Option<Decimal>,

    /// Scheduled monthly payment, base currency units (otherwise derived
    /// from the loan flags)
    #[arg(long)]
    pub monthly_payment: Option<Decimal>,

    /// Monthly provident-fund contribution, base currency units
    #[arg(long)]
    pub fund_contribution: Option<Decimal>,

    /// Provident-fund account balance, in ten-thousands
    #[arg(long)]
    pub fund_balance: Option<Decimal>,

    /// Convention used when deriving the payment from loan flags
    #[arg(long, value_enum, default_value = "equal-payment")]
    pub method: MethodChoice,

    #[command(flatten)]
    pub tranches: TrancheArgs,

    /// Path to a JSON or YAML input file, base currency units (overrides flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_advisory(args: AdvisoryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assessment_input: AffordabilityInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_piped()? {
        serde_json::from_value(data)?
    } else {
        let income = args
            .monthly_income
            .ok_or("--monthly-income is required (or provide --input)")?;
        let payment = match args.monthly_payment {
            Some(payment) => payment,
            None => derived_monthly_payment(&args)?,
        };
        AffordabilityInput {
            monthly_payment: payment,
            monthly_income: income,
            monthly_fund_contribution: args.fund_contribution,
            fund_balance: args.fund_balance.map(|balance| balance * TEN_THOUSAND),
        }
    };

    let assessment = affordability::assess_affordability(&assessment_input)?;
    let commentary = render_commentary(&assessment.result);

    let mut value = serde_json::to_value(&assessment)?;
    if let Some(result) = value.get_mut("result").and_then(|v| v.as_object_mut()) {
        result.insert("commentary".to_string(), serde_json::to_value(&commentary)?);
    }
    Ok(value)
}

/// Quote the loan described by the flags and take the chosen convention's
/// monthly payment (first month's payment under equal-principal).
fn derived_monthly_payment(args: &AdvisoryArgs) -> Result<Decimal, Box<dyn std::error::Error>> {
    let (commercial, provident) = resolve_tranches(&args.tranches)?;
    let quote = amortization::calculate_loan(&LoanInput {
        commercial,
        provident,
        years: args.tranches.years,
    })?;
    let schedule = match args.method {
        MethodChoice::EqualPayment => &quote.result.equal_payment,
        MethodChoice::EqualPrincipal => &quote.result.equal_principal,
    };
    Ok(schedule.monthly_payment)
}

/// Deterministic planning commentary rendered from the assessment numbers.
/// Always four sections, in a fixed order.
fn render_commentary(out: &AffordabilityOutput) -> Vec<String> {
    let mut sections = Vec::with_capacity(4);
    let gross = out.payment_to_income_pct.round_dp(1);

    sections.push(match out.pressure {
        PressureLevel::Comfortable => format!(
            "Repayment pressure: the payment takes {gross}% of monthly income, \
             a comfortable level that leaves room for saving."
        ),
        PressureLevel::Moderate => format!(
            "Repayment pressure: the payment takes {gross}% of monthly income. \
             This is manageable but the household budget should be planned around it."
        ),
        PressureLevel::Severe => format!(
            "Repayment pressure: the payment takes {gross}% of monthly income, \
             above the 50% line where repayment strain becomes severe."
        ),
    });

    sections.push(
        match (out.fund_offset_pct, out.net_payment_to_income_pct) {
            (Some(offset), Some(net)) => format!(
                "Provident-fund support: the monthly contribution covers {}% of the \
                 payment, bringing the out-of-pocket burden down to {}% of income.",
                offset.round_dp(1),
                net.round_dp(1)
            ),
            _ => "Provident-fund support: no monthly contribution was provided; the \
                  payment is carried entirely out of pocket."
                .to_string(),
        },
    );

    let reserve = out.suggested_reserve.round_dp(2);
    sections.push(match out.fund_runway_months {
        Some(runway) => format!(
            "Risk buffer: the provident-fund balance alone could carry the payment \
             for about {} months. Keep a cash reserve of {reserve} (six months of \
             payments) for income interruptions.",
            runway.round_dp(0)
        ),
        None => format!(
            "Risk buffer: keep a cash reserve of {reserve} (six months of payments) \
             for income interruptions."
        ),
    });

    sections.push(
        match out.pressure {
            PressureLevel::Comfortable => {
                "Planning guidance: capacity exists for voluntary prepayments; an \
                 annual lump sum against the higher-rate tranche cuts total interest."
            }
            PressureLevel::Moderate => {
                "Planning guidance: build the cash reserve before voluntary \
                 prepayments, and revisit the budget if income changes."
            }
            PressureLevel::Severe => {
                "Planning guidance: restructure before committing; stretching the \
                 term or raising the down payment brings the ratio into a \
                 sustainable band."
            }
        }
        .to_string(),
    );

    sections
}
