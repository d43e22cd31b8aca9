use thiserror::Error;

/// Errors that may be raised while evaluating a program against an input.
///
/// A failed match is not an error; it is reported as `Ok(None)` by
/// [`crate::run`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    #[error("input is not valid UTF-8 after byte offset {valid_up_to}")]
    InvalidEncoding { valid_up_to: usize },
    #[error("step budget of {budget} exhausted at byte offset {position}")]
    BudgetExhausted { budget: u64, position: usize },
}
