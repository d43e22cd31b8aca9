//! Provides methods and types to facilitate the compilation of a parsed regex
//! ast into runtime bytecode.
//!
//! # Example
//!
//! ```
//! use ere_compiler::ast::*;
//! use ere_compiler::{compile, CompileFlags};
//! use ere_runtime::*;
//!
//! // approximate to `ab`
//! let regex_ast = Regex::new(
//!     Node::Concat(vec![
//!         Node::Literal(Literal::Character('a')),
//!         Node::Literal(Literal::Character('b')),
//!     ]),
//!     0,
//! );
//!
//! assert_eq!(
//!     Ok(Instructions::default().with_opcodes(vec![
//!         Opcode::Split(InstSplit::new(InstIndex::from(3), InstIndex::from(1))),
//!         Opcode::Any,
//!         Opcode::Jmp(InstJmp::new(InstIndex::from(0))),
//!         Opcode::Save(InstSave::new(0)),
//!         Opcode::Consume(InstConsume::new('a')),
//!         Opcode::Consume(InstConsume::new('b')),
//!         Opcode::Save(InstSave::new(1)),
//!         Opcode::Match,
//!     ])),
//!     compile(regex_ast, CompileFlags::EXTENDED)
//! )
//! ```
use ere_runtime::*;

use super::ast;
use crate::error::{PatternError, PatternErrorKind};
use crate::flags::CompileFlags;
use crate::parser::MAX_NESTING_DEPTH;

/// The largest number of instructions a compiled program may contain.
pub const MAX_PROGRAM_LEN: usize = 1 << 16;

/// A parsed group nests at most three nodes per level: the group, an
/// alternation and a concatenation.
const MAX_NODE_DEPTH: usize = 3 * MAX_NESTING_DEPTH + 1;

/// A internal representation of the `ere_runtime::Opcode` type, with relative
/// addressing.
///
/// ## Note
/// This type is meant to exist only internally and should be
/// refined to the `ere_runtime::Opcode` type.
#[derive(Debug, Clone, PartialEq)]
enum RelativeOpcode {
    Any,
    Consume(char),
    ConsumeSet(CharacterSet),
    Epsilon(EpsilonCond),
    Split(i32, i32),
    Jmp(i32),
    Save(usize),
    /// Clears the slots in `start..end`.
    Reset(usize, usize),
    Match,
}

impl RelativeOpcode {
    fn into_opcode_with_index(self, sets: &mut Vec<CharacterSet>, idx: i32) -> Option<Opcode> {
        match self {
            RelativeOpcode::Any => Some(Opcode::Any),
            RelativeOpcode::Consume(c) => Some(Opcode::Consume(InstConsume::new(c))),
            RelativeOpcode::Epsilon(ec) => Some(Opcode::Epsilon(InstEpsilon::new(ec))),
            RelativeOpcode::Split(rel_x, rel_y) => {
                let x: u32 = idx.checked_add(rel_x)?.try_into().ok()?;
                let y: u32 = idx.checked_add(rel_y)?.try_into().ok()?;

                Some(Opcode::Split(InstSplit::new(
                    InstIndex::from(x),
                    InstIndex::from(y),
                )))
            }
            RelativeOpcode::Jmp(rel_jmp_to) => {
                let jmp_to: u32 = idx.checked_add(rel_jmp_to)?.try_into().ok()?;

                Some(Opcode::Jmp(InstJmp::new(InstIndex::from(jmp_to))))
            }
            RelativeOpcode::Save(slot) => Some(Opcode::Save(InstSave::new(slot))),
            RelativeOpcode::Reset(start, end) => {
                let start = u32::try_from(start).ok()?;
                let end = u32::try_from(end).ok()?;

                Some(Opcode::Reset(InstReset::new(start..end)))
            }
            RelativeOpcode::Match => Some(Opcode::Match),
            RelativeOpcode::ConsumeSet(char_set) => {
                let found = sets.iter().position(|set| set == &char_set);
                let set_idx = match found {
                    Some(set_idx) => set_idx,
                    None => {
                        let set_idx = sets.len();
                        sets.push(char_set);
                        set_idx
                    }
                };

                Some(Opcode::ConsumeSet(InstConsumeSet::new(set_idx)))
            }
        }
    }
}

type RelativeOpcodes = Vec<RelativeOpcode>;

fn program_too_large() -> PatternError {
    PatternError::new(PatternErrorKind::ProgramTooLarge, 0)
}

fn within_program_len(opcodes: RelativeOpcodes) -> Result<RelativeOpcodes, PatternError> {
    if opcodes.len() > MAX_PROGRAM_LEN {
        Err(program_too_large())
    } else {
        Ok(opcodes)
    }
}

/// Accepts a parsed AST and attempts to compile it into a runnable bytecode
/// program for use with the ere-runtime crate.
///
/// Slot 0 and 1 of the resulting program bound the overall match, while
/// capture group `n` is recorded in slots `2n` and `2n + 1`. A program that
/// would exceed [`MAX_PROGRAM_LEN`] instructions is rejected with
/// [`PatternErrorKind::ProgramTooLarge`], reported at offset 0. Trees nested
/// deeper than any parsed pattern can be fail with
/// [`PatternErrorKind::NestingTooDeep`], also at offset 0.
#[tracing::instrument(
    level = "debug",
    skip(regex_ast),
    fields(capture_groups = regex_ast.capture_groups as u64)
)]
pub fn compile(regex_ast: ast::Regex, flags: CompileFlags) -> Result<Instructions, PatternError> {
    let ast::Regex {
        expression,
        capture_groups,
    } = regex_ast;

    // in newline mode a `^` may match after any `\n`, so the search prefix
    // is kept.
    let anchored = expression.is_start_anchored() && !flags.contains(CompileFlags::NEWLINE);

    let compiler = Compiler { flags };
    let body = compiler.node(expression, 1)?;

    // match anything
    let prefix = if anchored {
        vec![]
    } else {
        vec![
            RelativeOpcode::Split(3, 1),
            RelativeOpcode::Any,
            RelativeOpcode::Jmp(-2),
        ]
    };

    let relative_ops: RelativeOpcodes = prefix
        .into_iter()
        .chain([RelativeOpcode::Save(0)])
        .chain(body)
        .chain([RelativeOpcode::Save(1), RelativeOpcode::Match])
        .collect();

    if relative_ops.len() > MAX_PROGRAM_LEN {
        return Err(program_too_large());
    }

    let (sets, absolute_insts) = relative_ops.into_iter().enumerate().try_fold(
        (vec![], vec![]),
        |(mut sets, mut insts), (idx, opcode)| {
            let idx = i32::try_from(idx).map_err(|_| program_too_large())?;
            let absolute_opcode = opcode
                .into_opcode_with_index(&mut sets, idx)
                .ok_or_else(program_too_large)?;
            insts.push(absolute_opcode);

            Ok::<_, PatternError>((sets, insts))
        },
    )?;

    tracing::event!(
        tracing::Level::DEBUG,
        operation = "compile",
        program_len = absolute_insts.len() as u64,
        sets = sets.len() as u64,
        anchored
    );

    Ok(Instructions::new(sets, absolute_insts)
        .with_mode(flags.match_mode())
        .with_save_groups(capture_groups + 1))
}

/// Expands a repetition of `$consumer`. The unbounded form appends a loop
/// after `$min` mandatory copies, while the bounded form appends
/// `$max - $min` nested optional copies, each of which skips to the end of
/// the block.
macro_rules! generate_range_quantifier_block {
    ($min:expr, $consumer:expr) => {{
        let consumer: RelativeOpcodes = $consumer;
        let len = consumer.len() as i32;

        consumer
            .iter()
            .cloned()
            .cycle()
            .take(consumer.len() * $min as usize)
            // jump past end of expression
            .chain([RelativeOpcode::Split(1, len + 2)])
            .chain(consumer.iter().cloned())
            // return to split
            .chain([RelativeOpcode::Jmp(-len - 1)])
            .collect::<RelativeOpcodes>()
    }};

    ($min:expr, $max:expr, $consumer:expr) => {{
        let consumer: RelativeOpcodes = $consumer;
        let len = consumer.len() as i32;
        let optional = ($max - $min) as i32;

        consumer
            .iter()
            .cloned()
            .cycle()
            .take(consumer.len() * $min as usize)
            .chain((0..optional).flat_map(|copy| {
                // jump past every remaining copy
                [RelativeOpcode::Split(1, (optional - copy) * (len + 1))]
                    .into_iter()
                    .chain(consumer.iter().cloned())
            }))
            .collect::<RelativeOpcodes>()
    }};
}

struct Compiler {
    flags: CompileFlags,
}

impl Compiler {
    fn node(&self, node: ast::Node, depth: usize) -> Result<RelativeOpcodes, PatternError> {
        if depth > MAX_NODE_DEPTH {
            return Err(PatternError::new(PatternErrorKind::NestingTooDeep, 0));
        }

        let depth = depth + 1;
        match node {
            ast::Node::Empty => Ok(vec![]),
            ast::Node::Literal(literal) => Ok(self.literal(literal)),
            ast::Node::Concat(nodes) => nodes.into_iter().try_fold(vec![], |mut opcodes, node| {
                opcodes.extend(self.node(node, depth)?);
                within_program_len(opcodes)
            }),
            ast::Node::Alternation(nodes) => {
                let mut total_len = 0;
                let branches = nodes
                    .into_iter()
                    .map(|node| {
                        let branch = within_program_len(self.node(node, depth)?)?;

                        // each branch but the last adds a split and a jump.
                        total_len += branch.len() + 2;
                        if total_len > MAX_PROGRAM_LEN + 2 {
                            return Err(program_too_large());
                        }
                        Ok(branch)
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                alternations_for_supplied_relative_opcodes(branches)
            }
            ast::Node::Repetition(repetition) => self.repetition(repetition, depth),
            ast::Node::Group(group) => self.group(group, depth),
            ast::Node::Anchor(anchor) => Ok(vec![RelativeOpcode::Epsilon(match anchor {
                ast::Anchor::StartOfLine => EpsilonCond::StartOfLine,
                ast::Anchor::EndOfLine => EpsilonCond::EndOfLine,
            })]),
        }
    }

    fn literal(&self, literal: ast::Literal) -> RelativeOpcodes {
        let newline = self.flags.contains(CompileFlags::NEWLINE);

        let opcode = match literal {
            ast::Literal::AnyCharacter if newline => RelativeOpcode::ConsumeSet(
                CharacterSet::exclusive(CharacterAlphabet::Explicit(vec!['\n'])),
            ),
            ast::Literal::AnyCharacter => RelativeOpcode::Any,
            ast::Literal::Character(c) => RelativeOpcode::Consume(c),
            ast::Literal::CharacterGroup(group) => self.character_group(group),
        };

        vec![opcode]
    }

    fn character_group(&self, cg: ast::CharacterGroup) -> RelativeOpcode {
        let ast::CharacterGroup { negated, items } = cg;

        if let (false, [ast::CharacterGroupItem::Char(c)]) = (negated, items.as_slice()) {
            return RelativeOpcode::Consume(*c);
        }

        // a negated group never matches a line separator in newline mode.
        let newline = (negated && self.flags.contains(CompileFlags::NEWLINE))
            .then(|| CharacterAlphabet::Explicit(vec!['\n']));

        let alphabets = items
            .into_iter()
            .map(character_group_item_to_alphabet)
            .chain(newline)
            .collect();
        let alphabet = CharacterAlphabet::join(alphabets);

        let set = if negated {
            CharacterSet::exclusive(alphabet)
        } else {
            CharacterSet::inclusive(alphabet)
        };

        RelativeOpcode::ConsumeSet(set)
    }

    fn repetition(
        &self,
        repetition: ast::Repetition,
        depth: usize,
    ) -> Result<RelativeOpcodes, PatternError> {
        let ast::Repetition {
            expression,
            quantifier,
        } = repetition;

        let optional = match quantifier.max() {
            Some(max) => {
                let optional = max.checked_sub(quantifier.min()).ok_or_else(|| {
                    PatternError::new(PatternErrorKind::InvalidRepetitionBounds, 0)
                })?;
                Some(optional as usize)
            }
            None => None,
        };

        let rel_ops = self.node(*expression, depth)?;

        let len = rel_ops.len();
        let min = quantifier.min() as usize;
        let expanded_len = match optional {
            Some(optional) => optional.saturating_mul(len + 1),
            None => len + 2,
        }
        .saturating_add(min.saturating_mul(len));

        if expanded_len > MAX_PROGRAM_LEN {
            return Err(program_too_large());
        }

        let quantified = match quantifier.max() {
            Some(max) => generate_range_quantifier_block!(quantifier.min(), max, rel_ops),
            None => generate_range_quantifier_block!(quantifier.min(), rel_ops),
        };

        Ok(quantified)
    }

    fn group(&self, group: ast::Group, depth: usize) -> Result<RelativeOpcodes, PatternError> {
        let ast::Group { expression, index } = group;
        let insts = self.node(*expression, depth)?;

        match index {
            Some(index) if !self.flags.contains(CompileFlags::NOSUB) => {
                let start_slot = index * 2;
                let save_group_prefix = [RelativeOpcode::Save(start_slot)];
                let save_group_suffix = [RelativeOpcode::Save(start_slot + 1)];

                // nested groups are cleared on entry so a prior iteration
                // can't leave them outside of this group's span.
                let nested_reset = insts
                    .iter()
                    .filter_map(|opcode| match opcode {
                        RelativeOpcode::Save(slot) => Some(*slot),
                        _ => None,
                    })
                    .max()
                    .map(|last_slot| RelativeOpcode::Reset(start_slot + 2, last_slot + 1));

                Ok(save_group_prefix
                    .into_iter()
                    .chain(nested_reset)
                    .chain(insts)
                    .chain(save_group_suffix)
                    .collect())
            }
            _ => Ok(insts),
        }
    }
}

fn character_group_item_to_alphabet(cgi: ast::CharacterGroupItem) -> CharacterAlphabet {
    match cgi {
        ast::CharacterGroupItem::CharacterClass(class) => CharacterAlphabet::Class(class),
        ast::CharacterGroupItem::CharacterRange(lower, upper) => {
            CharacterAlphabet::Range(lower..=upper)
        }
        ast::CharacterGroupItem::Char(c) => CharacterAlphabet::Explicit(vec![c]),
    }
}

fn alternations_for_supplied_relative_opcodes(
    rel_ops: Vec<RelativeOpcodes>,
) -> Result<RelativeOpcodes, PatternError> {
    let subexpr_cnt = rel_ops.len();

    let length_of_rel_ops: Vec<_> = rel_ops
        .iter()
        .enumerate()
        .map(|(idx, subexpr)| ((idx + 1 == subexpr_cnt), subexpr))
        .map(|(is_last, subexpr)| {
            // last alternation doesn't require a split prefix and jump suffix
            if is_last {
                subexpr.len()
            } else {
                subexpr.len() + 2
            }
        })
        .collect();

    let total_length_of_compiled_expr: usize = length_of_rel_ops.iter().sum();
    if total_length_of_compiled_expr > MAX_PROGRAM_LEN {
        return Err(program_too_large());
    }

    let start_end_offsets_by_subexpr: Vec<(usize, usize)> = length_of_rel_ops
        .iter()
        .fold(
            // add 1 to set end at first instruction of next expr
            (total_length_of_compiled_expr + 1, vec![]),
            |(offset_to_end, mut acc), &subexpr_len| {
                let new_offset_to_end = offset_to_end - subexpr_len;

                acc.push((subexpr_len, new_offset_to_end));
                (new_offset_to_end, acc)
            },
        )
        .1;

    let mut compiled = Vec::with_capacity(total_length_of_compiled_expr);
    for (idx, (ops, (start, end))) in rel_ops
        .into_iter()
        .zip(start_end_offsets_by_subexpr)
        .enumerate()
    {
        if idx + 1 == subexpr_cnt {
            compiled.extend(ops);
            continue;
        }

        // bounded by MAX_PROGRAM_LEN above.
        let start = i32::try_from(start).map_err(|_| program_too_large())?;
        let end = i32::try_from(end).map_err(|_| program_too_large())?;

        compiled.push(RelativeOpcode::Split(1, start));
        compiled.extend(ops);
        compiled.push(RelativeOpcode::Jmp(end));
    }

    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, Syntax};

    fn compile_ere(pattern: &str, flags: CompileFlags) -> Result<Instructions, PatternError> {
        let regex_ast = parse(pattern, Syntax::Extended).expect("pattern should parse");
        compile(regex_ast, flags | CompileFlags::EXTENDED)
    }

    /// Prepends the unanchored search prefix and wraps `body` in the
    /// overall match slots. The body begins at index 4.
    fn unanchored(body: Vec<Opcode>) -> Vec<Opcode> {
        vec![
            split(3, 1),
            Opcode::Any,
            jmp(0),
            Opcode::Save(InstSave::new(0)),
        ]
        .into_iter()
        .chain(body)
        .chain([Opcode::Save(InstSave::new(1)), Opcode::Match])
        .collect()
    }

    fn split(x: u32, y: u32) -> Opcode {
        Opcode::Split(InstSplit::new(InstIndex::from(x), InstIndex::from(y)))
    }

    fn jmp(next: u32) -> Opcode {
        Opcode::Jmp(InstJmp::new(InstIndex::from(next)))
    }

    fn consume(c: char) -> Opcode {
        Opcode::Consume(InstConsume::new(c))
    }

    fn save(slot_id: usize) -> Opcode {
        Opcode::Save(InstSave::new(slot_id))
    }

    #[test]
    fn should_compile_unanchored_character_match() {
        assert_eq!(
            Ok(Instructions::default().with_opcodes(unanchored(vec![consume('a'), consume('b')]))),
            compile_ere("ab", CompileFlags::empty())
        )
    }

    #[test]
    fn should_compile_anchored_character_match() {
        assert_eq!(
            Ok(Instructions::default().with_opcodes(vec![
                save(0),
                Opcode::Epsilon(InstEpsilon::new(EpsilonCond::StartOfLine)),
                consume('a'),
                consume('b'),
                Opcode::Epsilon(InstEpsilon::new(EpsilonCond::EndOfLine)),
                save(1),
                Opcode::Match,
            ])),
            compile_ere("^ab$", CompileFlags::empty())
        )
    }

    #[test]
    fn should_keep_search_prefix_for_anchored_newline_patterns() {
        assert_eq!(
            Ok(Instructions::default()
                .with_opcodes(unanchored(vec![
                    Opcode::Epsilon(InstEpsilon::new(EpsilonCond::StartOfLine)),
                    consume('a'),
                ]))
                .with_mode(MatchMode::NEWLINE)),
            compile_ere("^a", CompileFlags::NEWLINE)
        )
    }

    #[test]
    fn should_compile_alternation() {
        assert_eq!(
            Ok(Instructions::default().with_opcodes(unanchored(vec![
                split(5, 7),
                consume('a'),
                jmp(11),
                split(8, 10),
                consume('b'),
                jmp(11),
                consume('c'),
            ]))),
            compile_ere("a|b|c", CompileFlags::empty())
        )
    }

    #[test]
    fn should_compile_repetition_quantifiers() {
        let input_output = vec![
            (
                "a*",
                vec![split(5, 7), consume('a'), jmp(4)],
            ),
            (
                "a+",
                vec![consume('a'), split(6, 8), consume('a'), jmp(5)],
            ),
            ("a?", vec![split(5, 6), consume('a')]),
            ("a{2}", vec![consume('a'), consume('a')]),
            ("a{0}", vec![]),
            (
                "a{1,3}",
                vec![consume('a'), split(6, 9), consume('a'), split(8, 9), consume('a')],
            ),
            (
                "a{2,}",
                vec![consume('a'), consume('a'), split(7, 9), consume('a'), jmp(6)],
            ),
        ];

        for (case_id, (input, body)) in input_output.into_iter().enumerate() {
            assert_eq!(
                (case_id, Ok(Instructions::default().with_opcodes(unanchored(body)))),
                (case_id, compile_ere(input, CompileFlags::empty()))
            )
        }
    }

    #[test]
    fn should_reuse_save_slots_across_repeated_groups() {
        // `(a){2}`
        assert_eq!(
            Ok(Instructions::default().with_opcodes(unanchored(vec![
                save(2),
                consume('a'),
                save(3),
                save(2),
                consume('a'),
                save(3),
            ]))),
            compile_ere("(a){2}", CompileFlags::empty())
        )
    }

    #[test]
    fn should_reset_nested_groups_on_group_entry() {
        assert_eq!(
            Ok(Instructions::default().with_opcodes(unanchored(vec![
                save(2),
                Opcode::Reset(InstReset::new(4..6)),
                split(7, 11),
                save(4),
                consume('a'),
                save(5),
                jmp(12),
                consume('b'),
                save(3),
            ]))),
            compile_ere("((a)|b)", CompileFlags::empty())
        )
    }

    #[test]
    fn should_omit_subgroup_saves_when_nosub_is_set() {
        assert_eq!(
            Ok(Instructions::default()
                .with_opcodes(unanchored(vec![consume('a'), consume('b')]))
                .with_save_groups(2)),
            compile_ere("(a)(?:b)", CompileFlags::NOSUB)
        )
    }

    #[test]
    fn should_compile_character_groups_into_deduplicated_sets() {
        let lower = CharacterSet::inclusive(CharacterAlphabet::Ranges(vec!['a'..='c']));

        assert_eq!(
            Ok(Instructions::new(
                vec![lower],
                unanchored(vec![
                    Opcode::ConsumeSet(InstConsumeSet::new(0)),
                    Opcode::ConsumeSet(InstConsumeSet::new(0)),
                ])
            )),
            compile_ere("[a-c][a-c]", CompileFlags::empty())
        );

        // a single member group is a plain character match.
        assert_eq!(
            Ok(Instructions::default().with_opcodes(unanchored(vec![consume('.')]))),
            compile_ere("[.]", CompileFlags::empty())
        );
    }

    #[test]
    fn should_join_character_group_alphabets() {
        let set = CharacterSet::exclusive(CharacterAlphabet::Union(vec![
            CharacterAlphabet::Ranges(vec!['x'..='x', '0'..='3']),
            CharacterAlphabet::Class(PosixClass::Alpha),
        ]));

        assert_eq!(
            Ok(Instructions::new(
                vec![set],
                unanchored(vec![Opcode::ConsumeSet(InstConsumeSet::new(0))])
            )),
            compile_ere("[^x[:alpha:]0-3]", CompileFlags::empty())
        );
    }

    #[test]
    fn should_exclude_newlines_from_dot_and_negated_groups_in_newline_mode() {
        let dot = CharacterSet::exclusive(CharacterAlphabet::Explicit(vec!['\n']));
        let negated = CharacterSet::exclusive(CharacterAlphabet::Ranges(vec![
            'a'..='a',
            '\n'..='\n',
        ]));

        assert_eq!(
            Ok(Instructions::new(
                vec![dot, negated],
                unanchored(vec![
                    Opcode::ConsumeSet(InstConsumeSet::new(0)),
                    Opcode::ConsumeSet(InstConsumeSet::new(1)),
                ])
            )
            .with_mode(MatchMode::NEWLINE)),
            compile_ere(".[^a]", CompileFlags::NEWLINE)
        );

        assert_eq!(
            Ok(Instructions::default().with_opcodes(unanchored(vec![Opcode::Any]))),
            compile_ere(".", CompileFlags::empty())
        );
    }

    #[test]
    fn should_reject_oversized_programs() {
        assert_eq!(
            Err(PatternError::new(PatternErrorKind::ProgramTooLarge, 0)),
            compile_ere("((a{255}){255}){255}", CompileFlags::empty())
        );
    }

    #[test]
    fn should_reject_oversized_concatenations_and_alternations() {
        let concatenated = "a{255}{255}".repeat(300);
        let alternated = vec!["a{255}{255}"; 300].join("|");

        for (case_id, pattern) in [concatenated, alternated].iter().enumerate() {
            assert_eq!(
                (case_id, Err(PatternError::new(PatternErrorKind::ProgramTooLarge, 0))),
                (case_id, compile_ere(pattern, CompileFlags::empty()))
            );
        }
    }

    #[test]
    fn should_reject_inverted_repetition_bounds() {
        let regex_ast = ast::Regex::new(
            ast::Repetition::new(
                ast::Node::Literal(ast::Literal::Character('a')),
                ast::QuantifierType::MatchBetweenRange {
                    lower_bound: 3,
                    upper_bound: 2,
                },
            )
            .into(),
            0,
        );

        assert_eq!(
            Err(PatternError::new(PatternErrorKind::InvalidRepetitionBounds, 0)),
            compile(regex_ast, CompileFlags::EXTENDED)
        );
    }

    #[test]
    fn should_reject_trees_nested_deeper_than_any_pattern() {
        let expression = (0..MAX_NODE_DEPTH + 1).fold(
            ast::Node::Literal(ast::Literal::Character('a')),
            |node, _| ast::Group::non_capturing(node).into(),
        );

        assert_eq!(
            Err(PatternError::new(PatternErrorKind::NestingTooDeep, 0)),
            compile(ast::Regex::new(expression, 0), CompileFlags::EXTENDED)
        );
    }

    #[test]
    fn should_render_compiled_program() {
        let prog = compile_ere("^a", CompileFlags::empty()).expect("pattern should compile");

        assert_eq!(
            "0000: Save[0000]\n0001: Epsilon: {StartOfLine}\n0002: Consume: 'a'\n0003: Save[0001]\n0004: Match\n",
            prog.to_string()
        );
    }
}
