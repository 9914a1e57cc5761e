//! Annual lump-sum prepayment simulation under "reduce payment, keep term".
//!
//! Re-runs amortization month by month from live tranche balances, injects a
//! fixed lump sum every 12th month, re-derives the scheduled payment after
//! every injection, and reports interest saved against the no-prepayment
//! baseline plus a year-by-year snapshot table. All math in
//! `rust_decimal::Decimal`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{
    annuity_payment, build_schedule, combine_schedules, monthly_rate, push_high_rate_warning,
    validate_term, validate_tranche,
};
use crate::error::HomeLoanError;
use crate::types::{with_metadata, ComputationOutput, LoanTranche, Money, Rate, RepaymentMethod};
use crate::HomeLoanResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default balance threshold at or below which a tranche counts as fully
/// repaid.
pub const DEFAULT_PAYOFF_EPSILON: Decimal = dec!(0.1);

/// Payoff thresholds above this trigger a warning.
const LARGE_EPSILON_WARNING: Decimal = dec!(1);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Order in which the annual lump sum is applied across tranches. The first
/// tranche absorbs as much of the lump sum as its balance allows; any
/// leftover goes to the other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LumpSumOrder {
    /// Commercial tranche first (conventionally the higher-rate tranche).
    #[default]
    CommercialFirst,
    ProvidentFirst,
}

/// Prepayment simulation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepaymentInput {
    pub commercial: LoanTranche,
    pub provident: LoanTranche,
    /// Term in whole years, shared by both tranches.
    pub years: u32,
    /// Amortization convention for the scheduled payments.
    pub method: RepaymentMethod,
    /// Lump sum applied to principal every 12th month. Must be positive.
    pub yearly_lump_sum: Money,
    /// Tranche order for lump-sum application.
    #[serde(default)]
    pub lump_sum_order: LumpSumOrder,
    /// Balance at or below this counts as fully repaid.
    #[serde(default = "default_payoff_epsilon")]
    pub payoff_epsilon: Money,
}

fn default_payoff_epsilon() -> Money {
    DEFAULT_PAYOFF_EPSILON
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Year-end state recorded right after that year's lump sum is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepaymentYearSnapshot {
    /// Loan year, 1-indexed.
    pub year: u32,
    /// Combined remaining principal after this year's lump sum.
    pub remaining_principal: Money,
    /// Combined scheduled payment for the first month of the following year.
    pub next_monthly_payment: Money,
}

/// Prepayment simulation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepaymentOutput {
    /// Total interest over the term with no prepayments, same convention.
    pub baseline_interest: Money,
    /// Total interest accrued with the prepayment policy applied.
    pub total_interest: Money,
    /// `baseline_interest - total_interest`.
    pub interest_saved: Money,
    /// First month at which both tranches reach zero balance. For any loan
    /// with principal this is at latest the final month of the term.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_month: Option<u32>,
    /// One snapshot per loan year, zero-filled through the original term
    /// after payoff.
    pub schedule: Vec<PrepaymentYearSnapshot>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Simulate an annual lump-sum prepayment policy. The term never shortens;
/// each prepayment lowers the payment re-derived for the remaining months.
pub fn simulate_prepayment(
    input: &PrepaymentInput,
) -> HomeLoanResult<ComputationOutput<PrepaymentOutput>> {
    let start = Instant::now();

    let (output, warnings) = compute_prepayment(input)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Annual Lump-Sum Prepayment Simulation (reduce payment, keep term)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Scheduled monthly split for one tranche at the simulation's current state.
struct Installment {
    payment: Money,
    interest: Money,
    principal: Money,
}

fn compute_prepayment(
    input: &PrepaymentInput,
) -> HomeLoanResult<(PrepaymentOutput, Vec<String>)> {
    let mut warnings: Vec<String> = Vec::new();
    validate_prepayment(input)?;

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
    if input.payoff_epsilon > LARGE_EPSILON_WARNING {
        warnings.push(format!(
            "Payoff threshold of {} currency units will forgive residual balances early",
            input.payoff_epsilon
        ));
    }

    let had_principal =
        !(input.commercial.principal.is_zero() && input.provident.principal.is_zero());
    if !had_principal {
        warnings.push("Both tranches have zero principal; nothing to prepay.".to_string());
    }

    let total_months = input.years * 12;
    let comm_rate = monthly_rate(input.commercial.annual_rate_pct);
    let prov_rate = monthly_rate(input.provident.annual_rate_pct);
    let eps = input.payoff_epsilon;

    let mut commercial = input.commercial.principal;
    let mut provident = input.provident.principal;
    let mut total_interest = Decimal::ZERO;
    let mut payoff_month: Option<u32> = None;
    let mut snapshots: Vec<PrepaymentYearSnapshot> = Vec::with_capacity(input.years as usize);

    for m in 1..=total_months {
        // The current month counts as part of the remaining horizon.
        let remaining_months = total_months - m + 1;

        let comm = scheduled_installment(commercial, comm_rate, remaining_months, input.method, eps);
        let prov = scheduled_installment(provident, prov_rate, remaining_months, input.method, eps);
        total_interest += comm.interest + prov.interest;

        commercial -= comm.principal;
        if commercial < Decimal::ZERO {
            commercial = Decimal::ZERO;
        }
        provident -= prov.principal;
        if provident < Decimal::ZERO {
            provident = Decimal::ZERO;
        }

        if m % 12 == 0 && (commercial > Decimal::ZERO || provident > Decimal::ZERO) {
            apply_lump_sum(
                &mut commercial,
                &mut provident,
                input.yearly_lump_sum,
                input.lump_sum_order,
            );

            // First payment of the following year, re-derived from the
            // post-prepayment balances over the original remaining horizon.
            let next_months = total_months - m;
            let next_monthly_payment = if next_months > 0 {
                scheduled_installment(commercial, comm_rate, next_months, input.method, eps).payment
                    + scheduled_installment(provident, prov_rate, next_months, input.method, eps)
                        .payment
            } else {
                Decimal::ZERO
            };

            snapshots.push(PrepaymentYearSnapshot {
                year: m / 12,
                remaining_principal: commercial + provident,
                next_monthly_payment,
            });
        }

        if had_principal
            && payoff_month.is_none()
            && commercial.is_zero()
            && provident.is_zero()
        {
            payoff_month = Some(m);
        }
    }

    // Zero-fill so the snapshot table always spans the full term.
    let last_year = snapshots.last().map_or(0, |s| s.year);
    for year in (last_year + 1)..=input.years {
        snapshots.push(PrepaymentYearSnapshot {
            year,
            remaining_principal: Decimal::ZERO,
            next_monthly_payment: Decimal::ZERO,
        });
    }

    if let Some(month) = payoff_month {
        if month <= 12 {
            warnings.push(format!(
                "Yearly lump sum retires the loan within the first year (month {month})"
            ));
        }
    }

    let baseline_interest = baseline_interest(input)?;
    let output = PrepaymentOutput {
        baseline_interest,
        total_interest,
        interest_saved: baseline_interest - total_interest,
        payoff_month,
        schedule: snapshots,
    };
    Ok((output, warnings))
}

/// Scheduled split for one tranche this month: a fresh amortization of the
/// live balance over the remaining horizon. Balances at or below `epsilon`
/// are treated as fully repaid and contribute nothing.
fn scheduled_installment(
    balance: Money,
    monthly_rate: Rate,
    remaining_months: u32,
    method: RepaymentMethod,
    epsilon: Money,
) -> Installment {
    if balance <= epsilon {
        return Installment {
            payment: Decimal::ZERO,
            interest: Decimal::ZERO,
            principal: Decimal::ZERO,
        };
    }

    let interest = balance * monthly_rate;
    if remaining_months <= 1 {
        // A one-month horizon pays the whole balance exactly.
        return Installment {
            payment: balance + interest,
            interest,
            principal: balance,
        };
    }

    match method {
        RepaymentMethod::EqualPayment => {
            let payment = annuity_payment(balance, monthly_rate, remaining_months);
            let mut principal = payment - interest;
            if principal > balance {
                principal = balance;
            }
            if principal < Decimal::ZERO {
                principal = Decimal::ZERO;
            }
            Installment {
                payment,
                interest,
                principal,
            }
        }
        RepaymentMethod::EqualPrincipal => {
            let principal = balance / Decimal::from(remaining_months);
            Installment {
                payment: principal + interest,
                interest,
                principal,
            }
        }
    }
}

/// Apply the annual lump sum across the two tranches in policy order,
/// capping at each tranche's balance.
fn apply_lump_sum(
    commercial: &mut Money,
    provident: &mut Money,
    lump_sum: Money,
    order: LumpSumOrder,
) {
    let (first, second) = match order {
        LumpSumOrder::CommercialFirst => (commercial, provident),
        LumpSumOrder::ProvidentFirst => (provident, commercial),
    };
    let applied_first = lump_sum.min(*first);
    *first -= applied_first;
    let applied_second = (lump_sum - applied_first).min(*second);
    *second -= applied_second;
}

/// Total interest of the no-prepayment baseline, same tranches, same term,
/// same convention.
fn baseline_interest(input: &PrepaymentInput) -> HomeLoanResult<Money> {
    let comm = build_schedule(
        input.commercial.principal,
        input.commercial.annual_rate_pct,
        input.years,
        input.method,
    );
    let prov = build_schedule(
        input.provident.principal,
        input.provident.annual_rate_pct,
        input.years,
        input.method,
    );
    Ok(combine_schedules(&comm, &prov)?.total_interest)
}

fn validate_prepayment(input: &PrepaymentInput) -> HomeLoanResult<()> {
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

    if input.yearly_lump_sum <= Decimal::ZERO {
        return Err(HomeLoanError::InvalidInput {
            field: "yearly_lump_sum".to_string(),
            reason: "Yearly lump sum must be positive.".to_string(),
        });
    }
    if input.payoff_epsilon < Decimal::ZERO {
        return Err(HomeLoanError::InvalidInput {
            field: "payoff_epsilon".to_string(),
            reason: "Payoff threshold cannot be negative.".to_string(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
