//! A recursive descent parser for POSIX extended and basic regular
//! expressions.
//!
//! The pattern is consumed as a slice of `(byte offset, char)` pairs so that
//! every error can report the byte offset it was raised at.

use ere_runtime::PosixClass;

use super::ast::{self, Node};
use crate::error::{PatternError, PatternErrorKind};

/// The largest repetition count accepted within an interval expression.
pub const RE_DUP_MAX: u32 = 255;

/// The deepest nesting of groups and stacked repetition operators a pattern
/// may contain, i.e. `((a))` nests 3 deep and `a**` nests 3 deep.
pub const MAX_NESTING_DEPTH: usize = 256;

/// The dialect a pattern is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Syntax {
    /// POSIX extended regular expressions.
    #[default]
    Extended,
    /// POSIX basic regular expressions.
    Basic,
}

/// Parses a pattern into its abstract syntax tree.
///
/// # Example
///
/// ```
/// use ere_compiler::ast::*;
/// use ere_compiler::{parse, Syntax};
///
/// let regex = parse("a|(b)", Syntax::Extended).unwrap();
///
/// assert_eq!(1, regex.capture_groups);
/// assert_eq!(
///     Node::Alternation(vec![
///         Node::Literal(Literal::Character('a')),
///         Node::Group(Group::capturing(Node::Literal(Literal::Character('b')), 1)),
///     ]),
///     regex.expression
/// );
/// ```
#[tracing::instrument(level = "trace", fields(pattern_len = pattern.len() as u64))]
pub fn parse(pattern: &str, syntax: Syntax) -> Result<ast::Regex, PatternError> {
    let input: Vec<(usize, char)> = pattern.char_indices().collect();
    let mut parser = Parser {
        input: &input,
        idx: 0,
        end: pattern.len(),
        syntax,
        capture_groups: 0,
        depth: 0,
        nesting: 0,
    };

    let expression = parser.expression()?;
    match parser.peek() {
        None => Ok(ast::Regex::new(expression, parser.capture_groups)),
        Some(_) => Err(parser.error(PatternErrorKind::UnbalancedParenthesis)),
    }
}

/// A single member of a bracket expression prior to range resolution.
enum BracketTerm {
    Char(char),
    Class(PosixClass),
}

struct Parser<'a> {
    input: &'a [(usize, char)],
    idx: usize,
    /// Byte length of the pattern, reported for errors at end of input.
    end: usize,
    syntax: Syntax,
    capture_groups: usize,
    /// Number of currently open groups.
    depth: usize,
    /// The deepest item nesting seen so far within the innermost open group.
    nesting: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input.get(self.idx + n).map(|&(_, c)| c)
    }

    fn bump(&mut self) -> Option<char> {
        let next = self.peek()?;
        self.idx += 1;
        Some(next)
    }

    fn eat(&mut self, expected: char) -> bool {
        let found = self.peek() == Some(expected);
        if found {
            self.idx += 1;
        }
        found
    }

    /// Consumes a backslash-escaped character, i.e. `\)`.
    fn eat_escaped(&mut self, expected: char) -> bool {
        let found = self.peek() == Some('\\') && self.peek_nth(1) == Some(expected);
        if found {
            self.idx += 2;
        }
        found
    }

    /// The byte offset of the next unconsumed character.
    fn offset(&self) -> usize {
        self.input.get(self.idx).map_or(self.end, |&(pos, _)| pos)
    }

    fn error(&self, kind: PatternErrorKind) -> PatternError {
        PatternError::new(kind, self.offset())
    }

    fn at_group_close(&self) -> bool {
        match self.syntax {
            Syntax::Extended => self.peek() == Some(')'),
            Syntax::Basic => self.peek() == Some('\\') && self.peek_nth(1) == Some(')'),
        }
    }

    fn at_branch_end(&self) -> bool {
        self.peek().is_none() || self.at_group_close()
    }

    // Expression

    fn expression(&mut self) -> Result<Node, PatternError> {
        let mut branches = vec![self.branch()?];

        while self.syntax == Syntax::Extended && self.eat('|') {
            branches.push(self.branch()?);
        }

        Ok(Node::alternation(branches))
    }

    fn branch(&mut self) -> Result<Node, PatternError> {
        let mut items = vec![];

        loop {
            match self.peek() {
                None => break,
                Some('|') if self.syntax == Syntax::Extended => break,
                Some(_) if self.at_group_close() => {
                    if self.depth == 0 {
                        return Err(self.error(PatternErrorKind::UnbalancedParenthesis));
                    }
                    break;
                }
                Some(_) => {
                    let item = self.item(items.is_empty())?;
                    items.push(item);
                }
            }
        }

        Ok(Node::concat(items))
    }

    fn item(&mut self, at_branch_start: bool) -> Result<Node, PatternError> {
        let position = self.offset();

        // items within a group report their nesting into a fresh scope.
        let enclosing = std::mem::take(&mut self.nesting);
        let atom = match self.syntax {
            Syntax::Extended => self.extended_atom()?,
            Syntax::Basic => self.basic_atom(at_branch_start)?,
        };
        let nesting = std::mem::replace(&mut self.nesting, enclosing) + 1;

        if nesting > MAX_NESTING_DEPTH {
            return Err(PatternError::new(PatternErrorKind::NestingTooDeep, position));
        }

        let (item, nesting) = self.quantified(atom, nesting)?;
        self.nesting = self.nesting.max(nesting);

        Ok(item)
    }

    // Atoms

    fn extended_atom(&mut self) -> Result<Node, PatternError> {
        let position = self.offset();
        let Some(next) = self.bump() else {
            return Ok(Node::Empty);
        };

        match next {
            '(' => self.group(position),
            '[' => self
                .character_group()
                .map(|group| ast::Literal::from(group).into()),
            '.' => Ok(ast::Literal::AnyCharacter.into()),
            '^' => Ok(ast::Anchor::StartOfLine.into()),
            '$' => Ok(ast::Anchor::EndOfLine.into()),
            '*' | '+' | '?' | '{' => Err(PatternError::new(
                PatternErrorKind::MissingRepetitionOperand,
                position,
            )),
            '\\' => self.escaped(position),
            c => Ok(ast::Literal::from(c).into()),
        }
    }

    fn basic_atom(&mut self, at_branch_start: bool) -> Result<Node, PatternError> {
        let position = self.offset();
        let Some(next) = self.bump() else {
            return Ok(Node::Empty);
        };

        match next {
            '[' => self
                .character_group()
                .map(|group| ast::Literal::from(group).into()),
            '.' => Ok(ast::Literal::AnyCharacter.into()),
            '^' if at_branch_start => Ok(ast::Anchor::StartOfLine.into()),
            '$' if self.at_branch_end() => Ok(ast::Anchor::EndOfLine.into()),
            '\\' => match self.peek() {
                Some('(') => {
                    self.idx += 1;
                    self.group(position)
                }
                Some('{') => Err(PatternError::new(
                    PatternErrorKind::MissingRepetitionOperand,
                    position,
                )),
                _ => self.escaped(position),
            },
            // a leading `*` is an ordinary character in basic syntax.
            c => Ok(ast::Literal::from(c).into()),
        }
    }

    /// Resolves the character following a `\`.
    fn escaped(&mut self, position: usize) -> Result<Node, PatternError> {
        match self.bump() {
            None => Err(PatternError::new(
                PatternErrorKind::TrailingEscape,
                position,
            )),
            Some('1'..='9') => Err(PatternError::new(
                PatternErrorKind::UnsupportedBackreference,
                position,
            )),
            Some(c) => Ok(ast::Literal::from(c).into()),
        }
    }

    // Group

    /// Parses the remainder of a group following its opening parenthesis,
    /// found at `position`.
    fn group(&mut self, position: usize) -> Result<Node, PatternError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(PatternError::new(PatternErrorKind::NestingTooDeep, position));
        }

        let non_capturing = self.syntax == Syntax::Extended
            && self.peek() == Some('?')
            && self.peek_nth(1) == Some(':');

        let index = if non_capturing {
            self.idx += 2;
            None
        } else {
            self.capture_groups += 1;
            Some(self.capture_groups)
        };

        self.depth += 1;
        let expression = self.expression()?;
        self.depth -= 1;

        let closed = match self.syntax {
            Syntax::Extended => self.eat(')'),
            Syntax::Basic => self.eat_escaped(')'),
        };
        if !closed {
            return Err(self.error(PatternErrorKind::UnbalancedParenthesis));
        }

        let group = match index {
            Some(index) => ast::Group::capturing(expression, index),
            None => ast::Group::non_capturing(expression),
        };
        Ok(group.into())
    }

    // Quantifiers

    /// Applies every repetition operator following `atom`, returning the
    /// repeated node and its nesting depth.
    fn quantified(&mut self, atom: Node, nesting: usize) -> Result<(Node, usize), PatternError> {
        // in basic syntax a `*` following an anchor is an ordinary character
        // and is picked up as the next atom.
        if self.syntax == Syntax::Basic && matches!(atom, Node::Anchor(_)) {
            return Ok((atom, nesting));
        }

        let mut node = atom;
        let mut nesting = nesting;
        loop {
            let position = self.offset();
            let Some(quantifier) = self.quantifier()? else {
                break;
            };

            if matches!(node, Node::Anchor(_)) {
                return Err(PatternError::new(
                    PatternErrorKind::MissingRepetitionOperand,
                    position,
                ));
            }

            nesting += 1;
            if nesting > MAX_NESTING_DEPTH {
                return Err(PatternError::new(PatternErrorKind::NestingTooDeep, position));
            }

            node = ast::Repetition::new(node, quantifier).into();
        }

        Ok((node, nesting))
    }

    fn quantifier(&mut self) -> Result<Option<ast::QuantifierType>, PatternError> {
        use ast::QuantifierType;

        let position = self.offset();
        let quantifier = match (self.syntax, self.peek(), self.peek_nth(1)) {
            (_, Some('*'), _) => QuantifierType::ZeroOrMore,
            (Syntax::Extended, Some('+'), _) => QuantifierType::OneOrMore,
            (Syntax::Extended, Some('?'), _) => QuantifierType::ZeroOrOne,
            (Syntax::Extended, Some('{'), _) => {
                self.idx += 1;
                return self.range_quantifier(position).map(Some);
            }
            (Syntax::Basic, Some('\\'), Some('{')) => {
                self.idx += 2;
                return self.range_quantifier(position).map(Some);
            }
            _ => return Ok(None),
        };

        self.idx += 1;
        Ok(Some(quantifier))
    }

    /// A Regex Range Qualifier representable by the following three expressions.
    /// `{n}`: Match exactly.
    /// `{n,}`: Match at least.
    /// `{n,m}` Match between range.
    fn range_quantifier(&mut self, position: usize) -> Result<ast::QuantifierType, PatternError> {
        use ast::QuantifierType;

        let invalid = PatternError::new(PatternErrorKind::InvalidRepetitionBounds, position);

        let lower_bound = self.integer().ok_or(invalid.clone())?;
        let upper_bound = if self.eat(',') {
            Some(self.integer())
        } else {
            None
        };

        let closed = match self.syntax {
            Syntax::Extended => self.eat('}'),
            Syntax::Basic => self.eat_escaped('}'),
        };
        if !closed {
            return Err(invalid);
        }

        let quantifier = match upper_bound {
            None => QuantifierType::MatchExactRange(lower_bound),
            Some(None) => QuantifierType::MatchAtLeastRange(lower_bound),
            Some(Some(upper_bound)) => QuantifierType::MatchBetweenRange {
                lower_bound,
                upper_bound,
            },
        };

        let max = quantifier.max().unwrap_or(quantifier.min());
        if quantifier.min() > max || max > RE_DUP_MAX {
            return Err(invalid);
        }

        Ok(quantifier)
    }

    // Character Classes

    /// Parses the remainder of a bracket expression following its opening
    /// `[`.
    fn character_group(&mut self) -> Result<ast::CharacterGroup, PatternError> {
        use ast::CharacterGroupItem;

        let negated = self.eat('^');
        let mut items = vec![];

        // a `]` is only literal as the first member.
        let mut first = true;
        loop {
            let position = self.offset();
            match self.peek() {
                None => return Err(self.error(PatternErrorKind::UnterminatedBracket)),
                Some(']') if !first => {
                    self.idx += 1;
                    break;
                }
                Some(_) => first = false,
            }

            match self.bracket_term()? {
                BracketTerm::Class(class) => {
                    if self.at_range_separator() {
                        return Err(PatternError::new(PatternErrorKind::InvalidRange, position));
                    }
                    items.push(CharacterGroupItem::CharacterClass(class));
                }
                BracketTerm::Char(lower) if self.at_range_separator() => {
                    // skip the `-`
                    self.idx += 1;

                    match self.bracket_term()? {
                        BracketTerm::Char(upper) if lower <= upper => {
                            items.push(CharacterGroupItem::CharacterRange(lower, upper))
                        }
                        _ => {
                            return Err(PatternError::new(
                                PatternErrorKind::InvalidRange,
                                position,
                            ))
                        }
                    }
                }
                BracketTerm::Char(c) => items.push(CharacterGroupItem::Char(c)),
            }
        }

        Ok(ast::CharacterGroup::new(negated, items))
    }

    /// A `-` is a range separator unless it closes the bracket expression.
    fn at_range_separator(&self) -> bool {
        self.peek() == Some('-') && self.peek_nth(1).map_or(false, |c| c != ']')
    }

    fn bracket_term(&mut self) -> Result<BracketTerm, PatternError> {
        let position = self.offset();

        match (self.peek(), self.peek_nth(1)) {
            (Some('['), Some(delim @ (':' | '=' | '.'))) => {
                self.idx += 2;
                let name = self.take_until_closing(delim)?;
                let invalid = PatternError::new(PatternErrorKind::InvalidCharacterClass, position);

                if delim == ':' {
                    return PosixClass::from_name(&name)
                        .map(BracketTerm::Class)
                        .ok_or(invalid);
                }

                // equivalence classes and collating symbols are limited to
                // a single character.
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(BracketTerm::Char(c)),
                    _ => Err(invalid),
                }
            }
            (Some(c), _) => {
                self.idx += 1;
                Ok(BracketTerm::Char(c))
            }
            (None, _) => Err(self.error(PatternErrorKind::UnterminatedBracket)),
        }
    }

    /// Collects characters up to a closing `delim]` pair, consuming the pair.
    fn take_until_closing(&mut self, delim: char) -> Result<String, PatternError> {
        let mut name = String::new();

        loop {
            match (self.peek(), self.peek_nth(1)) {
                (Some(c), Some(']')) if c == delim => {
                    self.idx += 2;
                    return Ok(name);
                }
                (Some(c), _) => {
                    name.push(c);
                    self.idx += 1;
                }
                (None, _) => return Err(self.error(PatternErrorKind::UnterminatedBracket)),
            }
        }
    }

    // Terminals

    /// Consumes a run of decimal digits, saturating rather than overflowing.
    fn integer(&mut self) -> Option<u32> {
        let mut value: Option<u32> = None;

        while let Some(digit) = self.peek().and_then(|c| c.to_digit(10)) {
            self.idx += 1;
            value = Some(
                value
                    .unwrap_or(0)
                    .saturating_mul(10)
                    .saturating_add(digit),
            );
        }

        value
    }
}
