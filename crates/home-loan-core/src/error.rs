use thiserror::Error;

#[derive(Debug, Error)]
pub enum HomeLoanError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error(
        "Mismatched schedules: cannot combine {left_months}-month and {right_months}-month schedules"
    )]
    MismatchedSchedules { left_months: u32, right_months: u32 },
}
