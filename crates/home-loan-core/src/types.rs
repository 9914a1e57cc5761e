use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values, in base currency units. Wraps Decimal to prevent
/// accidental f64 usage.
pub type Money = Decimal;

/// Interest rates expressed as annual percentages (3.45 = 3.45%).
/// Monthly rates are derived as `pct / 100 / 12` at the point of use.
pub type Rate = Decimal;

/// Amortization convention for a housing loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepaymentMethod {
    /// Constant total monthly payment; the interest portion shrinks and the
    /// principal portion grows over the term (annuity / level payment).
    EqualPayment,
    /// Constant monthly principal portion; the total payment decreases
    /// month over month.
    EqualPrincipal,
}

/// One independently rated portion of a housing loan. A combined loan is a
/// commercial tranche plus a provident-fund tranche amortized over the same
/// term. A zero-principal tranche means "not used" and amortizes to an
/// all-zero schedule of full length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTranche {
    /// Amount borrowed, base currency units.
    pub principal: Money,
    /// Annual interest rate in percent (e.g., 3.45 = 3.45%).
    pub annual_rate_pct: Rate,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
