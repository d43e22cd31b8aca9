use bitflags::bitflags;
use ere_runtime::MatchMode;

use crate::parser::Syntax;

bitflags! {
    /// Flags accepted when compiling a pattern.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CompileFlags: u8 {
        /// Use extended rather than basic syntax.
        const EXTENDED = 0b00000001;
        /// Ignore case when matching.
        const ICASE = 0b00000010;
        /// Only report the span of the whole match.
        const NOSUB = 0b00000100;
        /// Treat `\n` as a line separator for anchors, `.` and negated
        /// bracket expressions.
        const NEWLINE = 0b00001000;
    }
}

impl CompileFlags {
    pub fn syntax(&self) -> Syntax {
        if self.contains(Self::EXTENDED) {
            Syntax::Extended
        } else {
            Syntax::Basic
        }
    }

    pub fn match_mode(&self) -> MatchMode {
        let mut mode = MatchMode::empty();
        mode.set(MatchMode::CASE_INSENSITIVE, self.contains(Self::ICASE));
        mode.set(MatchMode::NEWLINE, self.contains(Self::NEWLINE));
        mode
    }
}
