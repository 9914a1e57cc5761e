pub mod advisory;
pub mod loan;
pub mod prepayment;
