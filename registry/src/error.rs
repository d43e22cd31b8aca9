use ere_compiler::PatternError;
use ere_runtime::ExecError;
use thiserror::Error;

use crate::Handle;

/// Errors surfaced at the registry boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The handle was never issued or has already been released.
    #[error("invalid handle {0}")]
    InvalidHandle(Handle),
    #[error("invalid pattern: {0}")]
    Pattern(#[from] PatternError),
    #[error("execution failed: {0}")]
    Execution(#[from] ExecError),
}

pub type RegistryResult<T> = Result<T, RegistryError>;
