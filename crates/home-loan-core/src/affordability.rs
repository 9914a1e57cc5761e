//! Repayment-pressure assessment for a scheduled housing-loan payment.
//!
//! Relates a monthly payment to household income and optional provident-fund
//! support, and grades the burden into pressure bands. All math in
//! `rust_decimal::Decimal`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::HomeLoanError;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::HomeLoanResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Gross payment-to-income below this is comfortable.
const COMFORTABLE_CEILING_PCT: Decimal = dec!(30);

/// Gross payment-to-income above this is severe.
const MODERATE_CEILING_PCT: Decimal = dec!(50);

/// Months of payments to hold as a liquidity reserve.
const RESERVE_MONTHS: Decimal = dec!(6);

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInput {
    /// Scheduled combined monthly payment.
    pub monthly_payment: Money,
    /// Gross monthly household income. Must be positive.
    pub monthly_income: Money,
    /// Monthly provident-fund contribution available to offset the payment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_fund_contribution: Option<Money>,
    /// Standing provident-fund account balance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fund_balance: Option<Money>,
}

/// Burden band judged on the gross payment-to-income ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PressureLevel {
    /// Below 30% of income.
    Comfortable,
    /// 30% to 50% of income.
    Moderate,
    /// Above 50% of income.
    Severe,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityOutput {
    /// Payment as a percentage of income.
    pub payment_to_income_pct: Decimal,
    /// Same ratio after the fund contribution offsets the payment, floored
    /// at zero. `None` without a contribution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_payment_to_income_pct: Option<Decimal>,
    /// Share of the payment the monthly contribution covers, capped at 100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fund_offset_pct: Option<Decimal>,
    /// Months the standing fund balance alone could cover the payment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fund_runway_months: Option<Decimal>,
    pub pressure: PressureLevel,
    /// Recommended liquidity buffer: six months of payments.
    pub suggested_reserve: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Grade a scheduled monthly payment against household income and
/// provident-fund support.
pub fn assess_affordability(
    input: &AffordabilityInput,
) -> HomeLoanResult<ComputationOutput<AffordabilityOutput>> {
    let start = Instant::now();

    let (output, warnings) = compute_affordability(input)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Payment-to-Income Affordability Assessment",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

fn compute_affordability(
    input: &AffordabilityInput,
) -> HomeLoanResult<(AffordabilityOutput, Vec<String>)> {
    let mut warnings: Vec<String> = Vec::new();
    validate_affordability(input)?;

    let hundred = dec!(100);
    let payment_to_income_pct = input.monthly_payment / input.monthly_income * hundred;

    let net_payment_to_income_pct = input.monthly_fund_contribution.map(|contribution| {
        let mut net = input.monthly_payment - contribution;
        if net < Decimal::ZERO {
            net = Decimal::ZERO;
        }
        net / input.monthly_income * hundred
    });

    let fund_offset_pct = input.monthly_fund_contribution.map(|contribution| {
        if input.monthly_payment.is_zero() {
            // Nothing to cover counts as fully covered.
            return hundred;
        }
        let mut offset = contribution / input.monthly_payment * hundred;
        if offset > hundred {
            offset = hundred;
        }
        offset
    });

    let fund_runway_months = match input.fund_balance {
        Some(balance) if !input.monthly_payment.is_zero() => {
            Some(balance / input.monthly_payment)
        }
        _ => None,
    };

    let pressure = if payment_to_income_pct < COMFORTABLE_CEILING_PCT {
        PressureLevel::Comfortable
    } else if payment_to_income_pct <= MODERATE_CEILING_PCT {
        PressureLevel::Moderate
    } else {
        PressureLevel::Severe
    };

    if pressure == PressureLevel::Severe {
        warnings.push(format!(
            "Payment consumes {:.1}% of monthly income, above the {MODERATE_CEILING_PCT}% severe-pressure line",
            payment_to_income_pct
        ));
    }

    let output = AffordabilityOutput {
        payment_to_income_pct,
        net_payment_to_income_pct,
        fund_offset_pct,
        fund_runway_months,
        pressure,
        suggested_reserve: input.monthly_payment * RESERVE_MONTHS,
    };
    Ok((output, warnings))
}

fn validate_affordability(input: &AffordabilityInput) -> HomeLoanResult<()> {
    if input.monthly_payment < Decimal::ZERO {
        return Err(HomeLoanError::InvalidInput {
            field: "monthly_payment".to_string(),
            reason: "Monthly payment cannot be negative.".to_string(),
        });
    }
    if input.monthly_income <= Decimal::ZERO {
        return Err(HomeLoanError::InvalidInput {
            field: "monthly_income".to_string(),
            reason: "Monthly income must be positive.".to_string(),
        });
    }
    if let Some(contribution) = input.monthly_fund_contribution {
        if contribution < Decimal::ZERO {
            return Err(HomeLoanError::InvalidInput {
                field: "monthly_fund_contribution".to_string(),
                reason: "Fund contribution cannot be negative.".to_string(),
            });
        }
    }
    if let Some(balance) = input.fund_balance {
        if balance < Decimal::ZERO {
            return Err(HomeLoanError::InvalidInput {
                field: "fund_balance".to_string(),
                reason: "Fund balance cannot be negative.".to_string(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
