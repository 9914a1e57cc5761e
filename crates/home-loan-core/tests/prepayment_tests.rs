use home_loan_core::affordability::{assess_affordability, AffordabilityInput, PressureLevel};
use home_loan_core::amortization::{calculate_loan, LoanInput};
use home_loan_core::prepayment::{
    simulate_prepayment, LumpSumOrder, PrepaymentInput, DEFAULT_PAYOFF_EPSILON,
};
use home_loan_core::types::{LoanTranche, RepaymentMethod};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, what: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tol,
        "{what}: expected {expected}, got {actual} (diff {diff})"
    );
}

fn planned_loan() -> LoanInput {
    // A 1,000,000 commercial tranche at 4.9% alongside a 500,000 provident
    // tranche at 2.85%, both over 30 years.
    LoanInput {
        commercial: LoanTranche {
            principal: dec!(1_000_000),
            annual_rate_pct: dec!(4.9),
        },
        provident: LoanTranche {
            principal: dec!(500_000),
            annual_rate_pct: dec!(2.85),
        },
        years: 30,
    }
}

fn planned_prepayment() -> PrepaymentInput {
    // The same loan with 50,000 set aside for principal every December.
    let loan = planned_loan();
    PrepaymentInput {
        commercial: loan.commercial,
        provident: loan.provident,
        years: loan.years,
        method: RepaymentMethod::EqualPayment,
        yearly_lump_sum: dec!(50_000),
        lump_sum_order: LumpSumOrder::CommercialFirst,
        payoff_epsilon: DEFAULT_PAYOFF_EPSILON,
    }
}

// ===========================================================================
// Simulation consistency with the loan quote
// ===========================================================================

#[test]
fn test_equal_principal_baseline_reconciles_with_quote() {
    let mut input = planned_prepayment();
    input.method = RepaymentMethod::EqualPrincipal;
    let sim = simulate_prepayment(&input).unwrap().result;
    let quote = calculate_loan(&planned_loan()).unwrap().result;

    // The no-prepayment baseline is the same loan the quote prices.
    assert_eq!(sim.baseline_interest, quote.equal_principal.total_interest);
    assert_eq!(sim.interest_saved, sim.baseline_interest - sim.total_interest);
    assert!(sim.total_interest < sim.baseline_interest);
}

#[test]
fn test_snapshot_payment_rederived_from_balance() {
    let mut input = planned_prepayment();
    input.provident.principal = Decimal::ZERO;
    let out = simulate_prepayment(&input).unwrap().result;
    let snap = &out.schedule[0];

    // 348 months remain after the first year's lump sum; the next payment
    // must be a fresh annuity on the reduced balance over that horizon.
    let r = dec!(4.9) / dec!(100) / dec!(12);
    let growth = (Decimal::ONE + r).powu(348);
    assert_eq!(
        snap.next_monthly_payment,
        snap.remaining_principal * r * growth / (growth - Decimal::ONE)
    );
}

// ===========================================================================
// Apply-order policy
// ===========================================================================

#[test]
fn test_apply_order_shifts_payment_but_not_balance() {
    let cf = simulate_prepayment(&planned_prepayment()).unwrap().result;

    let mut input = planned_prepayment();
    input.lump_sum_order = LumpSumOrder::ProvidentFirst;
    let pf = simulate_prepayment(&input).unwrap().result;

    // Either order consumes the full 50,000, so year-1 balances agree, but
    // retiring the cheap tranche first trims less off the combined payment.
    assert_eq!(
        cf.schedule[0].remaining_principal,
        pf.schedule[0].remaining_principal
    );
    assert!(pf.schedule[0].next_monthly_payment > cf.schedule[0].next_monthly_payment);
    assert_close(
        pf.schedule[0].next_monthly_payment,
        dec!(7163.75),
        dec!(0.01),
        "provident-first next payment",
    );
    assert!(cf.interest_saved > pf.interest_saved);
}

// ===========================================================================
// Affordability of the planned payment
// ===========================================================================

#[test]
fn test_quote_payment_grades_moderate() {
    let quote = calculate_loan(&planned_loan()).unwrap().result;
    let payment = quote.equal_payment.monthly_payment;

    let out = assess_affordability(&AffordabilityInput {
        monthly_payment: payment,
        monthly_income: dec!(20_000),
        monthly_fund_contribution: None,
        fund_balance: None,
    })
    .unwrap()
    .result;

    assert_close(
        out.payment_to_income_pct,
        dec!(36.8753),
        dec!(0.01),
        "payment-to-income",
    );
    assert_eq!(out.pressure, PressureLevel::Moderate);
    assert_eq!(out.suggested_reserve, payment * dec!(6));
    assert_eq!(out.net_payment_to_income_pct, None);
    assert_eq!(out.fund_runway_months, None);
}

#[test]
fn test_prepayment_relieves_payment_pressure() {
    let quote = calculate_loan(&planned_loan()).unwrap().result;
    let sim = simulate_prepayment(&planned_prepayment()).unwrap().result;

    let grade = |payment: Decimal| {
        assess_affordability(&AffordabilityInput {
            monthly_payment: payment,
            monthly_income: dec!(20_000),
            monthly_fund_contribution: None,
            fund_balance: None,
        })
        .unwrap()
        .result
    };

    let before = grade(quote.equal_payment.monthly_payment);
    let after = grade(sim.schedule[0].next_monthly_payment);

    assert!(after.payment_to_income_pct < before.payment_to_income_pct);
    assert_close(
        after.payment_to_income_pct,
        dec!(35.5282),
        dec!(0.01),
        "year-1 payment-to-income",
    );
    assert_eq!(before.pressure, PressureLevel::Moderate);
    assert_eq!(after.pressure, PressureLevel::Moderate);
}

// ===========================================================================
// Envelope JSON at the crate surface
// ===========================================================================

#[test]
fn test_simulation_envelope_shape() {
    let out = simulate_prepayment(&planned_prepayment()).unwrap();
    let json = serde_json::to_value(&out).unwrap();

    assert_eq!(json["result"]["payoff_month"], 252);
    assert!(json["result"]["interest_saved"].is_string());
    assert_eq!(json["result"]["schedule"].as_array().unwrap().len(), 30);
    assert_eq!(json["assumptions"]["method"], "EqualPayment");
    assert_eq!(json["assumptions"]["lump_sum_order"], "CommercialFirst");
    assert_eq!(json["assumptions"]["payoff_epsilon"], "0.1");
    assert_eq!(json["metadata"]["precision"], "rust_decimal_128bit");
    assert!(json["warnings"].as_array().unwrap().is_empty());
}
