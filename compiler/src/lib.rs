//! Provides for the parsing and compilation of a POSIX regular expression
//! into it's corresponding runtime program.
//!
//! # Example
//!
//! ```rust
//! // Parsing and compilation of a regular expression into a runnable program is
//! // accomplished by a single function exposed in the `ere_compiler` crate.
//! use ere_compiler::{compile_pattern, CompileFlags};
//!
//! // Evaluating a given input against a program is accomplished via a single
//! // exposed function in the `ere_runtime` crate.
//! use ere_runtime::{run, ExecOptions, SaveGroupSlot};
//!
//! // A standard extended regex pattern to be parsed.
//! let pattern = "(l+)o";
//!
//! let program = compile_pattern(pattern, CompileFlags::EXTENDED).expect("failed to compile");
//!
//! let input = "hello\nworld";
//! let result = run(&program, input, &ExecOptions::default()).expect("run should not error");
//!
//! // The returned captures hold the overall match followed by one slot per
//! // capture group, each a non-inclusive byte range into the input.
//! assert_eq!(
//!     Some(vec![
//!         SaveGroupSlot::complete(2, 5),
//!         SaveGroupSlot::complete(2, 4),
//!     ]),
//!     result.map(|captures| captures.iter().cloned().collect::<Vec<_>>())
//! )
//! ```

pub mod ast;
pub mod compiler;
pub mod error;
pub mod flags;
pub mod parser;

pub use compiler::{compile, MAX_PROGRAM_LEN};
pub use error::{PatternError, PatternErrorKind};
pub use flags::CompileFlags;
pub use parser::{parse, Syntax, MAX_NESTING_DEPTH, RE_DUP_MAX};

use ere_runtime::Instructions;

/// Parses `pattern` in the syntax selected by `flags` and compiles it into
/// a program. The number of capture groups is available from the program
/// as `save_groups() - 1`.
pub fn compile_pattern(pattern: &str, flags: CompileFlags) -> Result<Instructions, PatternError> {
    parse(pattern, flags.syntax()).and_then(|regex_ast| compile(regex_ast, flags))
}
