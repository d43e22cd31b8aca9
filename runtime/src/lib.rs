//! A linear-time evaluator for compiled POSIX regular expression programs.
//!
//! Programs are flat instruction lists produced by the `ere-compiler` crate,
//! evaluated with a Pike-style simulation that tracks every live thread in
//! lockstep over the input, never backtracking.
//!
//! # Example
//!
//! ```
//! use ere_runtime::*;
//!
//! // `^(a|b)`
//! let program = Instructions::default().with_opcodes(vec![
//!     Opcode::Save(InstSave::new(0)),
//!     Opcode::Save(InstSave::new(2)),
//!     Opcode::Split(InstSplit::new(InstIndex::from(3), InstIndex::from(5))),
//!     Opcode::Consume(InstConsume::new('a')),
//!     Opcode::Jmp(InstJmp::new(InstIndex::from(6))),
//!     Opcode::Consume(InstConsume::new('b')),
//!     Opcode::Save(InstSave::new(3)),
//!     Opcode::Save(InstSave::new(1)),
//!     Opcode::Match,
//! ]);
//!
//! let captures = run(&program, "bc", &ExecOptions::default()).unwrap();
//!
//! assert_eq!(
//!     Some(Captures::new(vec![
//!         SaveGroupSlot::complete(0, 1),
//!         SaveGroupSlot::complete(0, 1),
//!     ])),
//!     captures
//! );
//! ```

mod error;
mod flags;
mod sparse_set;

pub use error::ExecError;
pub use flags::{ExecFlags, ExecOptions, MatchMode};

use sparse_set::SparseSet;
use std::fmt::{Debug, Display};

/// Represents a defined match group for a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveGroupSlot {
    #[default]
    None,
    Complete {
        start: usize,
        end: usize,
    },
}

impl SaveGroupSlot {
    /// Returns a completed save group from its constituent parts.
    pub const fn complete(start: usize, end: usize) -> Self {
        Self::Complete { start, end }
    }

    /// Returns the slot as a `(start, end)` offset pair, using `(-1, -1)` for
    /// a group that did not participate in the match.
    pub fn as_offsets(&self) -> (isize, isize) {
        match self {
            SaveGroupSlot::None => (-1, -1),
            SaveGroupSlot::Complete { start, end } => (to_offset(*start), to_offset(*end)),
        }
    }
}

fn to_offset(idx: usize) -> isize {
    isize::try_from(idx).unwrap_or(isize::MAX)
}

/// The result of a successful run. Holds exactly one slot per save group,
/// group 0 being the span of the entire match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captures {
    groups: Vec<SaveGroupSlot>,
}

impl Captures {
    #[must_use]
    pub fn new(groups: Vec<SaveGroupSlot>) -> Self {
        Self { groups }
    }

    /// Pairs up raw start/end slots into save groups. A group is only
    /// complete if both of its slots were written.
    fn from_slots(slots: &[Option<usize>], save_groups: usize) -> Self {
        let groups = (0..save_groups)
            .map(|group| {
                let start = slots.get(group * 2).copied().flatten();
                let end = slots.get(group * 2 + 1).copied().flatten();

                match (start, end) {
                    (Some(start), Some(end)) if start <= end => SaveGroupSlot::complete(start, end),
                    _ => SaveGroupSlot::None,
                }
            })
            .collect();

        Self { groups }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, group: usize) -> Option<&SaveGroupSlot> {
        self.groups.get(group)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SaveGroupSlot> {
        self.groups.iter()
    }

    /// Renders every group as a `(start, end)` offset pair in the layout of a
    /// POSIX `regmatch_t` array.
    pub fn to_offsets(&self) -> Vec<(isize, isize)> {
        self.groups.iter().map(SaveGroupSlot::as_offsets).collect()
    }
}

impl std::ops::Index<usize> for Captures {
    type Output = SaveGroupSlot;

    fn index(&self, index: usize) -> &Self::Output {
        &self.groups[index]
    }
}

type Slots = Box<[Option<usize>]>;

/// Represents a single candidate path through a program.
#[derive(Debug)]
struct Thread {
    slots: Slots,
    inst: InstIndex,
}

impl Thread {
    fn new(slots: Slots, inst: InstIndex) -> Self {
        Self { slots, inst }
    }

    /// The offset the thread's match began at, if it has begun.
    fn start(&self) -> Option<usize> {
        self.slots.first().copied().flatten()
    }
}

/// A priority ordered list of threads alongside the set of instructions
/// already visited in the current step.
#[derive(Debug)]
struct Threads {
    gen: SparseSet,
    threads: Vec<Thread>,
}

impl Threads {
    fn with_set_size(set_capacity: usize) -> Self {
        Self {
            threads: Vec::with_capacity(set_capacity),
            gen: SparseSet::new(set_capacity),
        }
    }

    fn clear(&mut self) {
        self.threads.clear();
        self.gen.clear();
    }
}

#[derive(Default, Debug, PartialEq)]
pub struct Instructions {
    sets: Vec<CharacterSet>,
    program: Vec<Instruction>,
    mode: MatchMode,
    save_groups: usize,
}

impl Instructions {
    #[must_use]
    pub fn new(sets: Vec<CharacterSet>, program: Vec<Opcode>) -> Self {
        Self::default().with_sets(sets).with_opcodes(program)
    }

    /// Replaces the program's opcodes. The save group count is derived from
    /// the highest save slot referenced.
    pub fn with_opcodes(self, program: Vec<Opcode>) -> Self {
        let save_groups = program
            .iter()
            .filter_map(|opcode| match opcode {
                Opcode::Save(InstSave { slot_id }) => Some(slot_id / 2 + 1),
                _ => None,
            })
            .max()
            .unwrap_or(0);

        Self {
            sets: self.sets,
            program: program
                .into_iter()
                .enumerate()
                .map(|(id, opcode)| Instruction::new(id, opcode))
                .collect(),
            mode: self.mode,
            save_groups,
        }
    }

    pub fn with_sets(self, sets: Vec<CharacterSet>) -> Self {
        Self { sets, ..self }
    }

    pub fn with_mode(self, mode: MatchMode) -> Self {
        Self { mode, ..self }
    }

    /// Overrides the number of save groups reported for a match. Groups with
    /// no corresponding save instructions are reported as unset.
    pub fn with_save_groups(self, save_groups: usize) -> Self {
        Self {
            save_groups,
            ..self
        }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// The number of groups, including the implicit group 0, a match reports.
    pub fn save_groups(&self) -> usize {
        self.save_groups
    }

    pub fn sets(&self) -> &[CharacterSet] {
        &self.sets
    }

    pub fn len(&self) -> usize {
        self.program.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Display for Instructions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for inst in self.program.iter() {
            writeln!(f, "{}", inst)?
        }

        Ok(())
    }
}

impl std::ops::Index<InstIndex> for Instructions {
    type Output = Opcode;

    fn index(&self, index: InstIndex) -> &Self::Output {
        let idx = index.as_usize();
        &self.program[idx].opcode
    }
}

impl AsRef<[Instruction]> for Instructions {
    fn as_ref(&self) -> &[Instruction] {
        &self.program
    }
}

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstIndex(u32);

impl InstIndex {
    #[inline]
    fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for InstIndex {
    fn from(ptr: u32) -> Self {
        Self(ptr)
    }
}

impl std::ops::Add<u32> for InstIndex {
    type Output = Self;

    fn add(self, rhs: u32) -> Self::Output {
        InstIndex::from(self.0 + rhs)
    }
}

#[derive(Debug, PartialEq)]
pub struct Instruction {
    id: usize,
    opcode: Opcode,
}

impl Instruction {
    #[must_use]
    pub fn new(id: usize, opcode: Opcode) -> Self {
        Self { id, opcode }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}: {}", self.id, self.opcode)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Opcode {
    Any,
    Consume(InstConsume),
    ConsumeSet(InstConsumeSet),
    Epsilon(InstEpsilon),
    Split(InstSplit),
    Jmp(InstJmp),
    Save(InstSave),
    Reset(InstReset),
    Match,
}

impl Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Opcode::Match => Display::fmt(&InstMatch, f),
            Opcode::Consume(i) => Display::fmt(&i, f),
            Opcode::ConsumeSet(i) => Display::fmt(&i, f),
            Opcode::Epsilon(i) => Display::fmt(&i, f),
            Opcode::Split(i) => Display::fmt(&i, f),
            Opcode::Any => Display::fmt(&InstAny::new(), f),
            Opcode::Jmp(i) => Display::fmt(&i, f),
            Opcode::Save(i) => Display::fmt(&i, f),
            Opcode::Reset(i) => Display::fmt(&i, f),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct InstMatch;

impl Display for InstMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Match",)
    }
}

#[derive(Debug, PartialEq)]
pub struct InstAny;

impl InstAny {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for InstAny {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for InstAny {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Any")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstConsume {
    value: char,
}

impl InstConsume {
    #[must_use]
    pub fn new(value: char) -> Self {
        Self { value }
    }
}

impl Display for InstConsume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Consume: {:?}", self.value)
    }
}

/// Represents a type that can be used as a comparative character set.
trait CharacterRangeSetVerifiable {
    fn in_set(&self, value: char) -> bool;
}

impl CharacterRangeSetVerifiable for std::ops::RangeInclusive<char> {
    fn in_set(&self, value: char) -> bool {
        self.contains(&value)
    }
}

impl CharacterRangeSetVerifiable for char {
    fn in_set(&self, value: char) -> bool {
        *self == value
    }
}

impl<CRSV: CharacterRangeSetVerifiable> CharacterRangeSetVerifiable for Vec<CRSV> {
    fn in_set(&self, value: char) -> bool {
        self.iter().any(|r| r.in_set(value))
    }
}

/// Folds a character to its lowercase form when that form is a single
/// character, otherwise leaves it untouched.
fn fold_case(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(folded), None) => folded,
        _ => c,
    }
}

fn unfold_case(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(unfolded), None) => unfolded,
        _ => c,
    }
}

/// Representing a runtime-dispatchable set of characters by associating a sets
/// membership to a character alphabet.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterSet {
    membership: SetMembership,
    set: CharacterAlphabet,
}

impl CharacterSet {
    pub fn inclusive(set: CharacterAlphabet) -> Self {
        Self {
            membership: SetMembership::Inclusive,
            set,
        }
    }

    pub fn exclusive(set: CharacterAlphabet) -> Self {
        Self {
            membership: SetMembership::Exclusive,
            set,
        }
    }

    /// Tests membership under the given matching mode. Case folding is
    /// applied to the alphabet before the set's membership is, so a negated
    /// set excludes every case variant of its members.
    fn matches(&self, value: char, mode: MatchMode) -> bool {
        let in_alphabet = if mode.contains(MatchMode::CASE_INSENSITIVE) {
            self.set.in_set(value)
                || self.set.in_set(fold_case(value))
                || self.set.in_set(unfold_case(value))
        } else {
            self.set.in_set(value)
        };

        match self.membership {
            SetMembership::Inclusive => in_alphabet,
            SetMembership::Exclusive => !in_alphabet,
        }
    }
}

/// Represents a runtime dispatchable set of characters.
#[derive(Debug, Clone, PartialEq)]
pub enum CharacterAlphabet {
    /// Represents a range of values i.e. `0-9`, `a-z`, `A-Z`, etc...
    Range(std::ops::RangeInclusive<char>),
    /// Represents an explicitly defined set of values. i.e. `[abz]`, `[127]`
    Explicit(Vec<char>),
    /// Represents a set of range of values i.e. `[0-9a-zA-Z]`,  etc...
    Ranges(Vec<std::ops::RangeInclusive<char>>),
    /// Represents a named character class i.e. `[:alpha:]`.
    Class(PosixClass),
    /// Represents the union of multiple alphabets.
    Union(Vec<CharacterAlphabet>),
}

impl CharacterAlphabet {
    /// Joins a group of character sets into a single alphabet. Literal
    /// members are collapsed into one `Ranges` variant while named classes
    /// are kept alongside it.
    pub fn join(sets: Vec<Self>) -> CharacterAlphabet {
        let mut ranges = vec![];
        let mut others = vec![];

        for set in sets {
            match set {
                CharacterAlphabet::Range(r) => ranges.push(r),
                CharacterAlphabet::Ranges(rs) => ranges.extend(rs),
                CharacterAlphabet::Explicit(explicit_chars) => {
                    ranges.extend(explicit_chars.into_iter().map(|c| c..=c))
                }
                other => others.push(other),
            }
        }

        match (ranges.is_empty(), others.len()) {
            (true, 1) => others.remove(0),
            (true, _) => CharacterAlphabet::Union(others),
            (false, 0) => CharacterAlphabet::Ranges(ranges),
            (false, _) => {
                others.insert(0, CharacterAlphabet::Ranges(ranges));
                CharacterAlphabet::Union(others)
            }
        }
    }
}

impl CharacterRangeSetVerifiable for CharacterAlphabet {
    fn in_set(&self, value: char) -> bool {
        match self {
            CharacterAlphabet::Range(r) => r.in_set(value),
            CharacterAlphabet::Explicit(v) => v.in_set(value),
            CharacterAlphabet::Ranges(ranges) => ranges.in_set(value),
            CharacterAlphabet::Class(class) => class.contains(value),
            CharacterAlphabet::Union(alphabets) => alphabets.in_set(value),
        }
    }
}

/// The POSIX named character classes usable within a bracket expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosixClass {
    Alnum,
    Alpha,
    Blank,
    Cntrl,
    Digit,
    Graph,
    Lower,
    Print,
    Punct,
    Space,
    Upper,
    Xdigit,
}

impl PosixClass {
    /// Resolves a class from the name found between `[:` and `:]`.
    pub fn from_name(name: &str) -> Option<Self> {
        let class = match name {
            "alnum" => Self::Alnum,
            "alpha" => Self::Alpha,
            "blank" => Self::Blank,
            "cntrl" => Self::Cntrl,
            "digit" => Self::Digit,
            "graph" => Self::Graph,
            "lower" => Self::Lower,
            "print" => Self::Print,
            "punct" => Self::Punct,
            "space" => Self::Space,
            "upper" => Self::Upper,
            "xdigit" => Self::Xdigit,
            _ => return None,
        };

        Some(class)
    }

    pub fn contains(&self, c: char) -> bool {
        match self {
            Self::Alnum => c.is_alphanumeric(),
            Self::Alpha => c.is_alphabetic(),
            Self::Blank => c == ' ' || c == '\t',
            Self::Cntrl => c.is_control(),
            Self::Digit => c.is_ascii_digit(),
            Self::Graph => !c.is_control() && !c.is_whitespace(),
            Self::Lower => c.is_lowercase(),
            Self::Print => !c.is_control(),
            Self::Punct => c.is_ascii_punctuation(),
            Self::Space => c.is_whitespace(),
            Self::Upper => c.is_uppercase(),
            Self::Xdigit => c.is_ascii_hexdigit(),
        }
    }
}

/// Denotes whether a given set is inclusive or exclusive to a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetMembership {
    /// States that a set is inclusive of a value, i.e. the value is a member of
    /// the set.
    Inclusive,
    /// States that a set is exclusive of a value, i.e. the value is not a
    /// member of the set.
    Exclusive,
}

/// ConsumeSet provides richer matching patterns than the more constrained
/// Consume or Any instructions allowing for the matching from a set of
/// characters. This functions as a brevity tool to prevent long alternations.
#[derive(Debug, Clone, PartialEq)]
pub struct InstConsumeSet {
    pub idx: usize,
}

impl InstConsumeSet {
    pub fn new(idx: usize) -> Self {
        Self::member_of(idx)
    }

    pub fn member_of(idx: usize) -> Self {
        Self { idx }
    }
}

impl Display for InstConsumeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ConsumeSet: {{{:04}}}", self.idx)
    }
}

/// Zero-width conditions evaluated against the current input position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpsilonCond {
    /// `^`
    StartOfLine,
    /// `$`
    EndOfLine,
}

impl Display for EpsilonCond {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EpsilonCond::StartOfLine => write!(f, "StartOfLine"),
            EpsilonCond::EndOfLine => write!(f, "EndOfLine"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstEpsilon {
    cond: EpsilonCond,
}

impl InstEpsilon {
    #[must_use]
    pub fn new(cond: EpsilonCond) -> Self {
        Self { cond }
    }
}

impl Display for InstEpsilon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Epsilon: {{{}}}", self.cond)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstSplit {
    x_branch: InstIndex,
    y_branch: InstIndex,
}

impl InstSplit {
    /// Forks a thread in two, `x` being the preferred branch.
    #[must_use]
    pub fn new(x: InstIndex, y: InstIndex) -> Self {
        Self {
            x_branch: x,
            y_branch: y,
        }
    }
}

impl Display for InstSplit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Split: ({:04}), ({:04})",
            self.x_branch.as_u32(),
            self.y_branch.as_u32()
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstJmp {
    next: InstIndex,
}

impl InstJmp {
    pub fn new(next: InstIndex) -> Self {
        Self { next }
    }
}

impl Display for InstJmp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JumpAbs: ({:04})", self.next.as_u32())
    }
}

/// Records the current input offset into a slot. Group `n` owns slots `2n`
/// (start) and `2n + 1` (end).
#[derive(Debug, Clone, PartialEq)]
pub struct InstSave {
    slot_id: usize,
}

impl InstSave {
    #[must_use]
    pub fn new(slot_id: usize) -> Self {
        Self { slot_id }
    }
}

impl Display for InstSave {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Save[{:04}]", self.slot_id)
    }
}

/// Clears a run of slots, marking the groups that own them as unset.
#[derive(Debug, Clone, PartialEq)]
pub struct InstReset {
    slots: std::ops::Range<u32>,
}

impl InstReset {
    #[must_use]
    pub fn new(slots: std::ops::Range<u32>) -> Self {
        Self { slots }
    }
}

impl Display for InstReset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Reset[{:04}..{:04}]", self.slots.start, self.slots.end)
    }
}

fn get_at(input: &str, idx: usize) -> Option<char> {
    input.get(idx..).and_then(|remainder| remainder.chars().next())
}

fn get_before(input: &str, idx: usize) -> Option<char> {
    input.get(..idx).and_then(|prefix| prefix.chars().next_back())
}

/// Everything needed to evaluate a character or condition at a position
/// that isn't owned by an individual thread.
struct Context<'a> {
    input: &'a str,
    mode: MatchMode,
    flags: ExecFlags,
}

impl<'a> Context<'a> {
    fn satisfies(&self, cond: EpsilonCond, sp: usize) -> bool {
        let newline = self.mode.contains(MatchMode::NEWLINE);

        match cond {
            EpsilonCond::StartOfLine => {
                (sp == 0 && !self.flags.contains(ExecFlags::NOTBOL))
                    || (newline && get_before(self.input, sp) == Some('\n'))
            }
            EpsilonCond::EndOfLine => {
                (sp == self.input.len() && !self.flags.contains(ExecFlags::NOTEOL))
                    || (newline && get_at(self.input, sp) == Some('\n'))
            }
        }
    }

    fn matches_char(&self, expected: char, c: char) -> bool {
        let case_insensitive = self.mode.contains(MatchMode::CASE_INSENSITIVE);

        expected == c || (case_insensitive && fold_case(expected) == fold_case(c))
    }
}

/// Follows every epsilon transition reachable from `t`, appending the
/// resulting consuming or matching threads to `thread_list` in priority
/// order.
fn add_thread(
    program: &Instructions,
    thread_list: &mut Threads,
    t: Thread,
    sp: usize,
    ctx: &Context<'_>,
) {
    let mut stack = vec![t];

    while let Some(Thread { mut slots, inst }) = stack.pop() {
        let inst_idx = inst.as_usize();

        // Don't visit states we've already added. The first visitor has
        // the higher priority.
        if inst_idx >= program.len() || !thread_list.gen.insert(inst_idx) {
            continue;
        }

        match &program[inst] {
            Opcode::Split(InstSplit { x_branch, y_branch }) => {
                // x is pushed last so that it is explored first.
                stack.push(Thread::new(slots.clone(), *y_branch));
                stack.push(Thread::new(slots, *x_branch));
            }
            Opcode::Jmp(InstJmp { next }) => stack.push(Thread::new(slots, *next)),
            Opcode::Save(InstSave { slot_id }) => {
                if let Some(slot) = slots.get_mut(*slot_id) {
                    *slot = Some(sp);
                }

                stack.push(Thread::new(slots, inst + 1));
            }
            Opcode::Reset(InstReset { slots: range }) => {
                let range = range.start as usize..range.end as usize;
                if let Some(cleared) = slots.get_mut(range) {
                    cleared.fill(None);
                }

                stack.push(Thread::new(slots, inst + 1));
            }
            Opcode::Epsilon(InstEpsilon { cond }) => {
                if ctx.satisfies(*cond, sp) {
                    stack.push(Thread::new(slots, inst + 1));
                }
            }
            Opcode::Any | Opcode::Consume(_) | Opcode::ConsumeSet(_) | Opcode::Match => {
                thread_list.threads.push(Thread::new(slots, inst))
            }
        }
    }
}

/// Decodes `input` as UTF-8 before evaluating it with [`run`], reporting
/// malformed input as [`ExecError::InvalidEncoding`].
pub fn run_bytes(
    program: &Instructions,
    input: &[u8],
    options: &ExecOptions,
) -> Result<Option<Captures>, ExecError> {
    let input = std::str::from_utf8(input).map_err(|e| ExecError::InvalidEncoding {
        valid_up_to: e.valid_up_to(),
    })?;

    run(program, input, options)
}

/// Executes a given program against an input. If a match is found the save
/// groups of the leftmost-longest match are returned, with byte offsets
/// into `input`.
///
/// Among matches starting at the same offset the longest wins. Among those
/// of equal length the thread that preferred earlier alternatives and
/// greedier repetitions wins, which is also the path whose captures are
/// reported.
pub fn run(
    program: &Instructions,
    input: &str,
    options: &ExecOptions,
) -> Result<Option<Captures>, ExecError> {
    use core::mem::swap;

    let program_len = program.len();
    let slot_cnt = program.save_groups.max(1) * 2;
    let ctx = Context {
        input,
        mode: program.mode,
        flags: options.flags,
    };

    let mut current_thread_list = Threads::with_set_size(program_len);
    let mut next_thread_list = Threads::with_set_size(program_len);
    let mut best: Option<Slots> = None;
    let mut steps: u64 = 0;
    let mut input_idx = 0;

    tracing::event!(
        tracing::Level::TRACE,
        operation = "run",
        program_len = program_len as u64,
        input_len = input.len() as u64
    );

    add_thread(
        program,
        &mut current_thread_list,
        Thread::new(vec![None; slot_cnt].into_boxed_slice(), InstIndex::from(0)),
        input_idx,
        &ctx,
    );

    loop {
        steps += current_thread_list.threads.len() as u64;
        if let Some(budget) = options.step_budget.filter(|&budget| steps > budget) {
            tracing::event!(
                tracing::Level::DEBUG,
                operation = "run",
                budget,
                position = input_idx as u64,
                "step budget exhausted"
            );
            return Err(ExecError::BudgetExhausted {
                budget,
                position: input_idx,
            });
        }

        let next_char = get_at(input, input_idx);
        let next_idx = input_idx + next_char.map_or(0, char::len_utf8);

        for thread in current_thread_list.threads.drain(..) {
            // once a match is found, only threads that began at the same
            // offset may extend it.
            if let Some(best_start) = best.as_ref().and_then(|slots| slots[0]) {
                if thread.start().map_or(true, |start| start > best_start) {
                    continue;
                }
            }

            let advances = match &program[thread.inst] {
                Opcode::Match => {
                    let end = thread.slots.get(1).copied().flatten();
                    let is_longer = match best.as_ref() {
                        None => true,
                        Some(best_slots) => end > best_slots[1],
                    };

                    if is_longer {
                        best = Some(thread.slots);
                    }
                    continue;
                }
                Opcode::Any => next_char.is_some(),
                Opcode::Consume(InstConsume { value }) => {
                    next_char.map_or(false, |c| ctx.matches_char(*value, c))
                }
                Opcode::ConsumeSet(InstConsumeSet { idx }) => next_char.map_or(false, |c| {
                    program
                        .sets
                        .get(*idx)
                        .map_or(false, |set| set.matches(c, ctx.mode))
                }),
                _ => false,
            };

            if advances {
                add_thread(
                    program,
                    &mut next_thread_list,
                    Thread::new(thread.slots, thread.inst + 1),
                    next_idx,
                    &ctx,
                );
            }
        }

        if next_char.is_none() || next_thread_list.threads.is_empty() {
            break;
        }

        input_idx = next_idx;
        swap(&mut current_thread_list, &mut next_thread_list);
        next_thread_list.clear();
    }

    Ok(best.map(|slots| Captures::from_slots(&slots, program.save_groups)))
}
