pub mod affordability;
pub mod amortization;
pub mod error;
pub mod prepayment;
pub mod types;

pub use error::HomeLoanError;
pub use types::*;

/// Standard result type for all housing-loan operations
pub type HomeLoanResult<T> = Result<T, HomeLoanError>;
