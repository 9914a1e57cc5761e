//! Housing-loan amortization: monthly schedules, tranche combination, quotes.
//!
//! Builds exact month-by-month repayment schedules for a single loan tranche
//! under the equal-payment (annuity) or equal-principal convention, merges a
//! commercial and a provident-fund tranche into one combined schedule, and
//! quotes both conventions side by side for the same loan. All math in
//! `rust_decimal::Decimal`.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::HomeLoanError;
use crate::types::{with_metadata, ComputationOutput, LoanTranche, Money, Rate, RepaymentMethod};
use crate::HomeLoanResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Longest supported loan term.
pub const MAX_TERM_YEARS: u32 = 50;

/// Highest supported annual rate, in percent.
pub const MAX_ANNUAL_RATE_PCT: Decimal = dec!(36);

/// Annual rates above this trigger a warning, in percent.
const HIGH_RATE_WARNING_PCT: Decimal = dec!(10);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Single-tranche amortization request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    /// Amount borrowed, base currency units.
    pub principal: Money,
    /// Annual interest rate in percent (e.g., 4.9 = 4.9%).
    pub annual_rate_pct: Rate,
    /// Term in whole years.
    pub years: u32,
    /// Amortization convention.
    pub method: RepaymentMethod,
}

/// Full loan request: commercial and provident-fund tranches over a shared
/// term. Either tranche may carry zero principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    pub commercial: LoanTranche,
    pub provident: LoanTranche,
    /// Term in whole years, shared by both tranches.
    pub years: u32,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One month of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Month number, 1-indexed.
    pub month: u32,
    /// Total payment due this month.
    pub payment: Money,
    /// Principal portion of the payment.
    pub principal_portion: Money,
    /// Interest portion of the payment.
    pub interest_portion: Money,
    /// Principal outstanding after this month's payment. Exactly zero at the
    /// final month.
    pub remaining_principal: Money,
}

/// A fully amortized loan (single tranche or combined).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSchedule {
    /// Amount borrowed.
    pub principal: Money,
    /// Term in whole years.
    pub years: u32,
    /// Fixed payment under equal-payment; first month's payment under
    /// equal-principal.
    pub monthly_payment: Money,
    /// Month-over-month payment decrease; equal-principal only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_decrease: Option<Money>,
    /// Principal plus all interest over the term.
    pub total_payment: Money,
    /// Interest accrued over the term, summed across the schedule.
    pub total_interest: Money,
    /// One entry per month, length `years * 12`.
    pub schedule: Vec<ScheduleEntry>,
}

/// Both conventions computed for the same loan, for side-by-side display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanQuote {
    pub equal_payment: LoanSchedule,
    pub equal_principal: LoanSchedule,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Amortize a single tranche under the requested convention.
pub fn amortize(input: &AmortizationInput) -> HomeLoanResult<ComputationOutput<LoanSchedule>> {
    let start = Instant::now();

    let (schedule, warnings) = compute_amortization(input)?;
    let methodology = match input.method {
        RepaymentMethod::EqualPayment => "Equal-Payment (Annuity) Amortization",
        RepaymentMethod::EqualPrincipal => "Equal-Principal Amortization",
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, warnings, elapsed, schedule))
}

/// Amortize both tranches of a loan under both conventions and combine them
/// per convention.
pub fn calculate_loan(input: &LoanInput) -> HomeLoanResult<ComputationOutput<LoanQuote>> {
    let start = Instant::now();

    let (quote, warnings) = compute_loan_quote(input)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Dual-Convention Housing Loan Quote",
        input,
        warnings,
        elapsed,
        quote,
    ))
}

/// Merge two schedules over the same term into one combined schedule. Every
/// numeric field is the element-wise sum; entries are summed index-wise.
pub fn combine_schedules(a: &LoanSchedule, b: &LoanSchedule) -> HomeLoanResult<LoanSchedule> {
    if a.years != b.years || a.schedule.len() != b.schedule.len() {
        return Err(HomeLoanError::MismatchedSchedules {
            left_months: a.schedule.len() as u32,
            right_months: b.schedule.len() as u32,
        });
    }

    let schedule: Vec<ScheduleEntry> = a
        .schedule
        .iter()
        .zip(&b.schedule)
        .map(|(x, y)| ScheduleEntry {
            month: x.month,
            payment: x.payment + y.payment,
            principal_portion: x.principal_portion + y.principal_portion,
            interest_portion: x.interest_portion + y.interest_portion,
            remaining_principal: x.remaining_principal + y.remaining_principal,
        })
        .collect();

    let monthly_decrease = match (a.monthly_decrease, b.monthly_decrease) {
        (None, None) => None,
        (x, y) => Some(x.unwrap_or(Decimal::ZERO) + y.unwrap_or(Decimal::ZERO)),
    };

    Ok(LoanSchedule {
        principal: a.principal + b.principal,
        years: a.years,
        monthly_payment: a.monthly_payment + b.monthly_payment,
        monthly_decrease,
        total_payment: a.total_payment + b.total_payment,
        total_interest: a.total_interest + b.total_interest,
        schedule,
    })
}

// ---------------------------------------------------------------------------
// Schedule construction
// ---------------------------------------------------------------------------

fn compute_amortization(
    input: &AmortizationInput,
) -> HomeLoanResult<(LoanSchedule, Vec<String>)> {
    let mut warnings: Vec<String> = Vec::new();

    validate_tranche("", input.principal, input.annual_rate_pct)?;
    validate_term(input.years)?;
    push_high_rate_warning(&mut warnings, "Loan", input.annual_rate_pct);

    let schedule = build_schedule(
        input.principal,
        input.annual_rate_pct,
        input.years,
        input.method,
    );
    Ok((schedule, warnings))
}

fn compute_loan_quote(input: &LoanInput) -> HomeLoanResult<(LoanQuote, Vec<String>)> {
    let mut warnings: Vec<String> = Vec::new();

    validate_tranche(
        "commercial.",
        input.commercial.principal,
        input.commercial.annual_rate_pct,
    )?;
    validate_tranche(
        "provident.",
        input.provident.principal,
        input.provident.annual_rate_pct,
    )?;
    validate_term(input.years)?;

    if input.commercial.principal.is_zero() && input.provident.principal.is_zero() {
        warnings.push("Both tranches have zero principal; all schedules will be zero.".to_string());
    }
    push_high_rate_warning(
        &mut warnings,
        "Commercial tranche",
        input.commercial.annual_rate_pct,
    );
    push_high_rate_warning(
        &mut warnings,
        "Provident tranche",
        input.provident.annual_rate_pct,
    );

    let equal_payment = combine_schedules(
        &build_schedule(
            input.commercial.principal,
            input.commercial.annual_rate_pct,
            input.years,
            RepaymentMethod::EqualPayment,
        ),
        &build_schedule(
            input.provident.principal,
            input.provident.annual_rate_pct,
            input.years,
            RepaymentMethod::EqualPayment,
        ),
    )?;
    let equal_principal = combine_schedules(
        &build_schedule(
            input.commercial.principal,
            input.commercial.annual_rate_pct,
            input.years,
            RepaymentMethod::EqualPrincipal,
        ),
        &build_schedule(
            input.provident.principal,
            input.provident.annual_rate_pct,
            input.years,
            RepaymentMethod::EqualPrincipal,
        ),
    )?;

    Ok((
        LoanQuote {
            equal_payment,
            equal_principal,
        },
        warnings,
    ))
}

/// Build the full monthly schedule for one tranche. Inputs are assumed
/// validated. A zero principal falls through the normal loop and produces a
/// full-length all-zero schedule.
pub(crate) fn build_schedule(
    principal: Money,
    annual_rate_pct: Rate,
    years: u32,
    method: RepaymentMethod,
) -> LoanSchedule {
    let months = years * 12;
    let r = monthly_rate(annual_rate_pct);

    let mut entries: Vec<ScheduleEntry> = Vec::with_capacity(months as usize);
    let mut remaining = principal;
    let mut total_interest = Decimal::ZERO;

    let (monthly_payment, monthly_decrease) = match method {
        RepaymentMethod::EqualPayment => {
            let payment = annuity_payment(principal, r, months);
            for month in 1..=months {
                let interest_portion = remaining * r;
                let principal_portion = payment - interest_portion;
                remaining -= principal_portion;
                // Final month lands on exactly zero, absorbing accumulated
                // rounding drift.
                if remaining < Decimal::ZERO || month == months {
                    remaining = Decimal::ZERO;
                }
                total_interest += interest_portion;
                entries.push(ScheduleEntry {
                    month,
                    payment,
                    principal_portion,
                    interest_portion,
                    remaining_principal: remaining,
                });
            }
            (payment, None)
        }
        RepaymentMethod::EqualPrincipal => {
            let fixed = principal / Decimal::from(months);
            let mut first_payment = Decimal::ZERO;
            let mut second_payment = Decimal::ZERO;
            for month in 1..=months {
                let interest_portion = remaining * r;
                let payment = fixed + interest_portion;
                remaining -= fixed;
                if remaining < Decimal::ZERO || month == months {
                    remaining = Decimal::ZERO;
                }
                total_interest += interest_portion;
                if month == 1 {
                    first_payment = payment;
                } else if month == 2 {
                    second_payment = payment;
                }
                entries.push(ScheduleEntry {
                    month,
                    payment,
                    principal_portion: fixed,
                    interest_portion,
                    remaining_principal: remaining,
                });
            }
            let decrease = (months > 1).then_some(first_payment - second_payment);
            (first_payment, decrease)
        }
    };

    LoanSchedule {
        principal,
        years,
        monthly_payment,
        monthly_decrease,
        total_payment: principal + total_interest,
        total_interest,
        schedule: entries,
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate one tranche's principal and rate. `prefix` qualifies the field
/// name in error messages (e.g. `"commercial."`).
pub(crate) fn validate_tranche(
    prefix: &str,
    principal: Money,
    annual_rate_pct: Rate,
) -> HomeLoanResult<()> {
    if principal < Decimal::ZERO {
        return Err(HomeLoanError::InvalidInput {
            field: format!("{prefix}principal"),
            reason: "Principal cannot be negative.".to_string(),
        });
    }
    if annual_rate_pct < Decimal::ZERO {
        return Err(HomeLoanError::InvalidInput {
            field: format!("{prefix}annual_rate_pct"),
            reason: "Annual rate cannot be negative.".to_string(),
        });
    }
    if annual_rate_pct > MAX_ANNUAL_RATE_PCT {
        return Err(HomeLoanError::InvalidInput {
            field: format!("{prefix}annual_rate_pct"),
            reason: format!("Annual rates above {MAX_ANNUAL_RATE_PCT}% are not supported."),
        });
    }
    Ok(())
}

pub(crate) fn validate_term(years: u32) -> HomeLoanResult<()> {
    if years < 1 {
        return Err(HomeLoanError::InvalidInput {
            field: "years".to_string(),
            reason: "Term must be at least one year.".to_string(),
        });
    }
    if years > MAX_TERM_YEARS {
        return Err(HomeLoanError::InvalidInput {
            field: "years".to_string(),
            reason: format!("Terms above {MAX_TERM_YEARS} years are not supported."),
        });
    }
    Ok(())
}

pub(crate) fn push_high_rate_warning(warnings: &mut Vec<String>, label: &str, rate: Rate) {
    if rate > HIGH_RATE_WARNING_PCT {
        warnings.push(format!(
            "{label} rate {rate}% is unusually high for a housing loan"
        ));
    }
}

// ---------------------------------------------------------------------------
// Decimal math helpers
// ---------------------------------------------------------------------------

/// Monthly rate from an annual percentage: `pct / 100 / 12`.
pub(crate) fn monthly_rate(annual_rate_pct: Rate) -> Rate {
    annual_rate_pct / dec!(100) / dec!(12)
}

/// Level payment for a fresh amortization of `balance` over `months`:
/// `balance * r * (1+r)^months / ((1+r)^months - 1)`. Degenerates to
/// straight division when the rate is zero.
pub(crate) fn annuity_payment(balance: Money, monthly_rate: Rate, months: u32) -> Money {
    if months == 0 {
        return balance;
    }
    if monthly_rate <= Decimal::ZERO {
        return balance / Decimal::from(months);
    }
    let growth = (Decimal::ONE + monthly_rate).powu(months as u64);
    balance * monthly_rate * growth / (growth - Decimal::ONE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
