use thiserror::Error;

/// Represents all error types that may _expectedly_ occur while parsing or
/// compiling a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PatternErrorKind {
    #[error("unbalanced parenthesis")]
    UnbalancedParenthesis,
    #[error("repetition operator has no operand")]
    MissingRepetitionOperand,
    #[error("invalid repetition bounds")]
    InvalidRepetitionBounds,
    #[error("unterminated bracket expression")]
    UnterminatedBracket,
    #[error("invalid character class")]
    InvalidCharacterClass,
    #[error("invalid range end")]
    InvalidRange,
    #[error("trailing backslash")]
    TrailingEscape,
    #[error("back-references are not supported")]
    UnsupportedBackreference,
    #[error("compiled program exceeds the maximum size")]
    ProgramTooLarge,
    #[error("groups or repetitions nested too deeply")]
    NestingTooDeep,
}

/// A malformed or oversized pattern, alongside the byte offset into the
/// pattern at which the problem was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at position {position}")]
pub struct PatternError {
    kind: PatternErrorKind,
    position: usize,
}

impl PatternError {
    pub fn new(kind: PatternErrorKind, position: usize) -> Self {
        Self { kind, position }
    }

    pub fn kind(&self) -> PatternErrorKind {
        self.kind
    }

    /// The byte offset into the pattern.
    pub fn position(&self) -> usize {
        self.position
    }
}
