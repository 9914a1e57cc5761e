use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use home_loan_core::amortization::{self, LoanInput};
use home_loan_core::types::{LoanTranche, RepaymentMethod};

use crate::input;

/// User-facing amounts are entered in ten-thousands of currency units; the
/// core works in base units.
pub const TEN_THOUSAND: Decimal = dec!(10_000);

/// Terms offered on the standard menu.
const TERM_MENU: [u32; 6] = [5, 10, 15, 20, 25, 30];

/// Which tranches the loan draws on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LoanType {
    Commercial,
    Provident,
    Combination,
}

/// Repayment convention as a CLI choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodChoice {
    EqualPayment,
    EqualPrincipal,
}

impl From<MethodChoice> for RepaymentMethod {
    fn from(choice: MethodChoice) -> Self {
        match choice {
            MethodChoice::EqualPayment => RepaymentMethod::EqualPayment,
            MethodChoice::EqualPrincipal => RepaymentMethod::EqualPrincipal,
        }
    }
}

/// Flags shared by every command that describes a loan. Amounts are in
/// ten-thousands of currency units.
#[derive(Args)]
pub struct TrancheArgs {
    /// Which tranches the loan uses
    #[arg(long, value_enum, default_value = "commercial")]
    pub loan_type: LoanType,

    /// Property price in ten-thousands, paired with --down-payment-pct
    #[arg(long)]
    pub total_price: Option<Decimal>,

    /// Down payment as a whole-number percentage of the price (0-95)
    #[arg(long, default_value = "30")]
    pub down_payment_pct: u32,

    /// Loan amount in ten-thousands, entered directly
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Commercial tranche amount in ten-thousands (combination loans)
    #[arg(long)]
    pub commercial_amount: Option<Decimal>,

    /// Provident tranche amount in ten-thousands (combination loans)
    #[arg(long)]
    pub provident_amount: Option<Decimal>,

    /// Term in whole years (5, 10, 15, 20, 25, or 30)
    #[arg(long, default_value = "30")]
    pub years: u32,

    /// Commercial annual rate in percent
    #[arg(long, default_value = "3.45")]
    pub commercial_rate: Decimal,

    /// Provident annual rate in percent
    #[arg(long, default_value = "2.85")]
    pub provident_rate: Decimal,
}

/// Arguments for the dual-convention loan quote
#[derive(Args)]
pub struct LoanArgs {
    #[command(flatten)]
    pub tranches: TrancheArgs,

    /// Path to a JSON or YAML input file, base currency units (overrides flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_loan(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input: LoanInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_piped()? {
        serde_json::from_value(data)?
    } else {
        let (commercial, provident) = resolve_tranches(&args.tranches)?;
        LoanInput {
            commercial,
            provident,
            years: args.tranches.years,
        }
    };

    let result = amortization::calculate_loan(&loan_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Turn the flag set into base-unit tranches. Missing or ambiguous amounts
/// are rejected here, before the core is reached.
pub fn resolve_tranches(
    args: &TrancheArgs,
) -> Result<(LoanTranche, LoanTranche), Box<dyn std::error::Error>> {
    if !TERM_MENU.contains(&args.years) {
        return Err(format!(
            "--years must be one of 5, 10, 15, 20, 25, or 30 (got {})",
            args.years
        )
        .into());
    }
    if args.down_payment_pct > 95 {
        return Err("--down-payment-pct must be between 0 and 95".into());
    }

    match args.loan_type {
        LoanType::Combination => {
            if args.total_price.is_some() || args.amount.is_some() {
                return Err("combination loans take --commercial-amount and \
                     --provident-amount, not --total-price or --amount"
                    .into());
            }
            let commercial = args
                .commercial_amount
                .ok_or("--commercial-amount is required for combination loans")?;
            let provident = args
                .provident_amount
                .ok_or("--provident-amount is required for combination loans")?;
            Ok((
                LoanTranche {
                    principal: commercial * TEN_THOUSAND,
                    annual_rate_pct: args.commercial_rate,
                },
                LoanTranche {
                    principal: provident * TEN_THOUSAND,
                    annual_rate_pct: args.provident_rate,
                },
            ))
        }
        LoanType::Commercial | LoanType::Provident => {
            if args.commercial_amount.is_some() || args.provident_amount.is_some() {
                return Err(
                    "--commercial-amount and --provident-amount are only for \
                     --loan-type combination"
                        .into(),
                );
            }
            let principal = match (args.total_price, args.amount) {
                (Some(_), Some(_)) => {
                    return Err("provide --total-price or --amount, not both".into())
                }
                (Some(price), None) => {
                    price * (Decimal::ONE - Decimal::from(args.down_payment_pct) / dec!(100))
                }
                (None, Some(amount)) => amount,
                (None, None) => {
                    return Err(
                        "provide --total-price with --down-payment-pct, or --amount".into()
                    )
                }
            } * TEN_THOUSAND;

            let (commercial, provident) = match args.loan_type {
                LoanType::Commercial => (principal, Decimal::ZERO),
                _ => (Decimal::ZERO, principal),
            };
            Ok((
                LoanTranche {
                    principal: commercial,
                    annual_rate_pct: args.commercial_rate,
                },
                LoanTranche {
                    principal: provident,
                    annual_rate_pct: args.provident_rate,
                },
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> TrancheArgs {
        TrancheArgs {
            loan_type: LoanType::Commercial,
            total_price: None,
            down_payment_pct: 30,
            amount: None,
            commercial_amount: None,
            provident_amount: None,
            years: 30,
            commercial_rate: dec!(3.45),
            provident_rate: dec!(2.85),
        }
    }

    #[test]
    fn test_direct_amount_converts_ten_thousands() {
        let mut args = base_args();
        args.amount = Some(dec!(100));
        let (commercial, provident) = resolve_tranches(&args).unwrap();
        assert_eq!(commercial.principal, dec!(1_000_000));
        assert_eq!(provident.principal, Decimal::ZERO);
    }

    #[test]
    fn test_price_minus_down_payment() {
        let mut args = base_args();
        args.total_price = Some(dec!(100));
        let (commercial, _) = resolve_tranches(&args).unwrap();
        // 30% down on a 1,000,000 price leaves 700,000 borrowed.
        assert_eq!(commercial.principal, dec!(700_000));
    }

    #[test]
    fn test_provident_type_fills_provident_tranche() {
        let mut args = base_args();
        args.loan_type = LoanType::Provident;
        args.amount = Some(dec!(50));
        let (commercial, provident) = resolve_tranches(&args).unwrap();
        assert_eq!(commercial.principal, Decimal::ZERO);
        assert_eq!(provident.principal, dec!(500_000));
        assert_eq!(provident.annual_rate_pct, dec!(2.85));
    }

    #[test]
    fn test_combination_requires_both_amounts() {
        let mut args = base_args();
        args.loan_type = LoanType::Combination;
        args.commercial_amount = Some(dec!(100));
        let err = resolve_tranches(&args).unwrap_err();
        assert!(err.to_string().contains("--provident-amount"));

        args.provident_amount = Some(dec!(50));
        let (commercial, provident) = resolve_tranches(&args).unwrap();
        assert_eq!(commercial.principal, dec!(1_000_000));
        assert_eq!(provident.principal, dec!(500_000));
    }

    #[test]
    fn test_both_price_and_amount_is_ambiguous() {
        let mut args = base_args();
        args.total_price = Some(dec!(100));
        args.amount = Some(dec!(70));
        let err = resolve_tranches(&args).unwrap_err();
        assert!(err.to_string().contains("not both"));
    }

    #[test]
    fn test_missing_amount_rejected() {
        let err = resolve_tranches(&base_args()).unwrap_err();
        assert!(err.to_string().contains("--total-price"));
    }

    #[test]
    fn test_years_off_menu_rejected() {
        let mut args = base_args();
        args.amount = Some(dec!(100));
        args.years = 7;
        let err = resolve_tranches(&args).unwrap_err();
        assert!(err.to_string().contains("5, 10, 15, 20, 25, or 30"));
    }

    #[test]
    fn test_down_payment_above_95_rejected() {
        let mut args = base_args();
        args.total_price = Some(dec!(100));
        args.down_payment_pct = 96;
        let err = resolve_tranches(&args).unwrap_err();
        assert!(err.to_string().contains("0 and 95"));
    }
}
