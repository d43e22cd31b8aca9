use bitflags::bitflags;

bitflags! {
    /// Matching behaviour fixed when a program is compiled.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MatchMode: u8 {
        /// Characters are compared after simple case folding.
        const CASE_INSENSITIVE = 0b00000001;
        /// `^` and `$` additionally match after and before a `\n`.
        const NEWLINE = 0b00000010;
    }
}

bitflags! {
    /// Per-call execution flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ExecFlags: u8 {
        /// The start of the input is not the beginning of a line.
        const NOTBOL = 0b00000001;
        /// The end of the input is not the end of a line.
        const NOTEOL = 0b00000010;
    }
}

/// Options accepted by [`crate::run`].
///
/// # Example
///
/// ```
/// use ere_runtime::{ExecFlags, ExecOptions};
///
/// let options = ExecOptions::default()
///     .with_flags(ExecFlags::NOTBOL)
///     .with_step_budget(10_000);
///
/// assert!(options.flags.contains(ExecFlags::NOTBOL));
/// assert_eq!(Some(10_000), options.step_budget);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOptions {
    pub flags: ExecFlags,
    /// Upper bound on the number of thread steps a single run may take. The
    /// budget is checked between character advances.
    pub step_budget: Option<u64>,
}

impl ExecOptions {
    #[must_use]
    pub fn with_flags(mut self, flags: ExecFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_step_budget(mut self, budget: u64) -> Self {
        self.step_budget = Some(budget);
        self
    }
}

impl From<ExecFlags> for ExecOptions {
    fn from(flags: ExecFlags) -> Self {
        Self::default().with_flags(flags)
    }
}
