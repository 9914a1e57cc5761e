use home_loan_core::amortization::{
    amortize, calculate_loan, combine_schedules, AmortizationInput, LoanInput,
};
use home_loan_core::types::{LoanTranche, RepaymentMethod};
use home_loan_core::HomeLoanError;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

// ===========================================================================
// Equal-payment schedules
// ===========================================================================

fn sample_commercial_loan() -> AmortizationInput {
    // A typical first-home commercial tranche.
    AmortizationInput {
        principal: dec!(1_000_000),
        annual_rate_pct: dec!(4.9),
        years: 30,
        method: RepaymentMethod::EqualPayment,
    }
}

#[test]
fn test_equal_payment_matches_annuity_formula() {
    let out = amortize(&sample_commercial_loan()).unwrap().result;

    // payment = P * r * (1+r)^n / ((1+r)^n - 1)
    let r = dec!(4.9) / dec!(100) / dec!(12);
    let growth = (Decimal::ONE + r).powu(360);
    let expected = dec!(1_000_000) * r * growth / (growth - Decimal::ONE);
    assert_eq!(out.monthly_payment, expected);
}

#[test]
fn test_equal_payment_retires_at_term() {
    let out = amortize(&sample_commercial_loan()).unwrap().result;
    assert_eq!(out.schedule.len(), 360);
    assert_eq!(out.schedule[359].remaining_principal, Decimal::ZERO);
    assert_eq!(out.total_payment - out.principal, out.total_interest);
}

// ===========================================================================
// Equal-principal schedules
// ===========================================================================

#[test]
fn test_equal_principal_first_payment_formula() {
    let mut input = sample_commercial_loan();
    input.method = RepaymentMethod::EqualPrincipal;
    let out = amortize(&input).unwrap().result;

    // first payment = P/n + P*r
    let r = dec!(4.9) / dec!(100) / dec!(12);
    let fixed = dec!(1_000_000) / Decimal::from(360u32);
    assert_eq!(out.monthly_payment, fixed + dec!(1_000_000) * r);
    assert_eq!(out.schedule[0].principal_portion, fixed);
}

#[test]
fn test_equal_principal_cheaper_than_equal_payment() {
    let ep = amortize(&sample_commercial_loan()).unwrap().result;

    let mut input = sample_commercial_loan();
    input.method = RepaymentMethod::EqualPrincipal;
    let eprin = amortize(&input).unwrap().result;

    // Principal retires faster under equal-principal, so less interest
    // accrues over the same term.
    assert!(eprin.total_interest < ep.total_interest);
}

// ===========================================================================
// Tranche combination
// ===========================================================================

#[test]
fn test_combined_schedule_is_fieldwise_sum() {
    let quote = calculate_loan(&LoanInput {
        commercial: LoanTranche {
            principal: dec!(800_000),
            annual_rate_pct: dec!(4.2),
        },
        provident: LoanTranche {
            principal: dec!(400_000),
            annual_rate_pct: dec!(3.1),
        },
        years: 20,
    })
    .unwrap()
    .result;

    let commercial = amortize(&AmortizationInput {
        principal: dec!(800_000),
        annual_rate_pct: dec!(4.2),
        years: 20,
        method: RepaymentMethod::EqualPayment,
    })
    .unwrap()
    .result;
    let provident = amortize(&AmortizationInput {
        principal: dec!(400_000),
        annual_rate_pct: dec!(3.1),
        years: 20,
        method: RepaymentMethod::EqualPayment,
    })
    .unwrap()
    .result;

    let combined = combine_schedules(&commercial, &provident).unwrap();
    assert_eq!(quote.equal_payment.principal, dec!(1_200_000));
    assert_eq!(quote.equal_payment.monthly_payment, combined.monthly_payment);
    assert_eq!(quote.equal_payment.total_interest, combined.total_interest);
    for month in [0, 119, 239] {
        assert_eq!(
            quote.equal_payment.schedule[month].payment,
            commercial.schedule[month].payment + provident.schedule[month].payment
        );
    }
}

#[test]
fn test_combination_rejects_mismatched_terms() {
    let short = amortize(&AmortizationInput {
        principal: dec!(100_000),
        annual_rate_pct: dec!(4.9),
        years: 10,
        method: RepaymentMethod::EqualPayment,
    })
    .unwrap()
    .result;
    let long = amortize(&sample_commercial_loan()).unwrap().result;

    let err = combine_schedules(&short, &long).unwrap_err();
    match err {
        HomeLoanError::MismatchedSchedules {
            left_months,
            right_months,
        } => {
            assert_eq!(left_months, 120);
            assert_eq!(right_months, 360);
        }
        other => panic!("Expected MismatchedSchedules, got {other:?}"),
    }
}

// ===========================================================================
// Dual-convention quote
// ===========================================================================

#[test]
fn test_quote_reports_both_conventions() {
    let quote = calculate_loan(&LoanInput {
        commercial: LoanTranche {
            principal: dec!(1_000_000),
            annual_rate_pct: dec!(4.9),
        },
        provident: LoanTranche {
            principal: dec!(500_000),
            annual_rate_pct: dec!(2.85),
        },
        years: 30,
    })
    .unwrap()
    .result;

    assert_eq!(quote.equal_payment.monthly_decrease, None);
    assert!(quote.equal_principal.monthly_decrease.is_some());
    // Same loan, so equal-principal saves interest either way you quote it.
    assert!(quote.equal_principal.total_interest < quote.equal_payment.total_interest);
    // First equal-principal payment exceeds the level annuity.
    assert!(quote.equal_principal.monthly_payment > quote.equal_payment.monthly_payment);
}

// ===========================================================================
// Envelope serialization
// ===========================================================================

#[test]
fn test_envelope_serializes_money_as_strings() {
    let out = amortize(&sample_commercial_loan()).unwrap();
    let json = serde_json::to_value(&out).unwrap();

    assert!(json["result"]["monthly_payment"].is_string());
    assert!(json["result"]["schedule"][0]["payment"].is_string());
    assert_eq!(json["assumptions"]["years"], 30);
    assert_eq!(json["metadata"]["precision"], "rust_decimal_128bit");
    assert!(json["methodology"]
        .as_str()
        .unwrap()
        .contains("Equal-Payment"));
}

#[test]
fn test_equal_payment_json_omits_monthly_decrease() {
    let out = amortize(&sample_commercial_loan()).unwrap();
    let json = serde_json::to_value(&out).unwrap();
    // monthly_decrease is skipped entirely for equal-payment schedules.
    assert!(json["result"].get("monthly_decrease").is_none());
}
