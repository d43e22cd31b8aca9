use ere_compiler::{compile_pattern, CompileFlags, PatternError};
use ere_runtime::{run_bytes, Captures, ExecError, ExecOptions, Instructions};

/// A pattern compiled into an immutable program, safe to share between
/// threads and evaluate concurrently.
#[derive(Debug)]
pub struct CompiledPattern {
    program: Instructions,
    nsub: usize,
    pattern: String,
    flags: CompileFlags,
}

impl CompiledPattern {
    /// Parses and compiles `pattern`.
    ///
    /// # Example
    ///
    /// ```
    /// use ere_registry::{CompiledPattern, CompileFlags, ExecOptions};
    ///
    /// let pattern = CompiledPattern::new("(a|ab)(c|bcd)", CompileFlags::EXTENDED).unwrap();
    /// let captures = pattern.exec(b"abcd", &ExecOptions::default()).unwrap().unwrap();
    ///
    /// assert_eq!(2, pattern.nsub());
    /// assert_eq!(vec![(0, 4), (0, 1), (1, 4)], captures.to_offsets());
    /// ```
    pub fn new(pattern: &str, flags: CompileFlags) -> Result<Self, PatternError> {
        let program = compile_pattern(pattern, flags)?;
        let nsub = program.save_groups().saturating_sub(1);

        Ok(Self {
            program,
            nsub,
            pattern: pattern.to_string(),
            flags,
        })
    }

    /// Matches the program against `input`, returning `nsub + 1` groups
    /// on success.
    pub fn exec(
        &self,
        input: &[u8],
        options: &ExecOptions,
    ) -> Result<Option<Captures>, ExecError> {
        run_bytes(&self.program, input, options)
    }

    /// The number of capturing groups in the pattern.
    pub fn nsub(&self) -> usize {
        self.nsub
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn flags(&self) -> CompileFlags {
        self.flags
    }

    pub fn program(&self) -> &Instructions {
        &self.program
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ere_compiler::PatternErrorKind;
    use ere_runtime::ExecFlags;

    #[test]
    fn should_report_capture_count_regardless_of_nosub() {
        let input_output = vec![
            ("abc", CompileFlags::EXTENDED, 0),
            ("(a)(b(c))", CompileFlags::EXTENDED, 3),
            ("(?:a)(b)", CompileFlags::EXTENDED, 1),
            ("(a)(b)", CompileFlags::EXTENDED | CompileFlags::NOSUB, 2),
            ("\\(a\\)(b)", CompileFlags::empty(), 1),
        ];

        for (case_id, (pattern, flags, nsub)) in input_output.into_iter().enumerate() {
            let compiled = CompiledPattern::new(pattern, flags).expect("pattern should compile");
            assert_eq!((case_id, nsub), (case_id, compiled.nsub()));
        }
    }

    #[test]
    fn should_leave_subgroups_unset_under_nosub() {
        let compiled = CompiledPattern::new("(a)(b)", CompileFlags::EXTENDED | CompileFlags::NOSUB)
            .expect("pattern should compile");

        let captures = compiled
            .exec(b"xab", &ExecOptions::default())
            .expect("exec should not error");

        assert_eq!(
            Some(vec![(1, 3), (-1, -1), (-1, -1)]),
            captures.map(|captures| captures.to_offsets())
        );
    }

    #[test]
    fn should_surface_pattern_errors() {
        let err = CompiledPattern::new("a(b", CompileFlags::EXTENDED)
            .expect_err("pattern should not compile");

        assert_eq!(PatternErrorKind::UnbalancedParenthesis, err.kind());
        assert_eq!(3, err.position());
    }

    #[test]
    fn should_reject_invalid_encoding() {
        let compiled = CompiledPattern::new("a", CompileFlags::EXTENDED)
            .expect("pattern should compile");

        assert_eq!(
            Err(ExecError::InvalidEncoding { valid_up_to: 2 }),
            compiled.exec(b"xa\xff", &ExecOptions::from(ExecFlags::empty()))
        );
    }
}
