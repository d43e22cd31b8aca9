//! The abstract syntax tree produced by [`crate::parse`].

use ere_runtime::PosixClass;

/// A parsed pattern alongside the number of capturing groups it defines.
#[derive(Debug, PartialEq)]
pub struct Regex {
    pub expression: Node,
    pub capture_groups: usize,
}

impl Regex {
    pub fn new(expression: Node, capture_groups: usize) -> Self {
        Self {
            expression,
            capture_groups,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Node {
    /// Matches the empty string, i.e. an empty branch `a|` or group `()`.
    Empty,
    Literal(Literal),
    Concat(Vec<Node>),
    Alternation(Vec<Node>),
    Repetition(Repetition),
    Group(Group),
    Anchor(Anchor),
}

impl Node {
    /// Builds a concatenation, collapsing trivial sequences.
    pub fn concat(mut nodes: Vec<Node>) -> Self {
        match nodes.len() {
            0 => Node::Empty,
            1 => nodes.pop().unwrap_or(Node::Empty),
            _ => Node::Concat(nodes),
        }
    }

    /// Builds an alternation, collapsing a single branch to itself.
    pub fn alternation(mut nodes: Vec<Node>) -> Self {
        match nodes.len() {
            0 => Node::Empty,
            1 => nodes.pop().unwrap_or(Node::Empty),
            _ => Node::Alternation(nodes),
        }
    }

    /// Returns `true` if every path through the node begins with a `^`.
    pub fn is_start_anchored(&self) -> bool {
        match self {
            Node::Anchor(Anchor::StartOfLine) => true,
            Node::Concat(nodes) => nodes.first().map_or(false, Node::is_start_anchored),
            Node::Alternation(nodes) => nodes.iter().all(Node::is_start_anchored),
            Node::Group(Group { expression, .. }) => expression.is_start_anchored(),
            _ => false,
        }
    }
}

impl From<Literal> for Node {
    fn from(src: Literal) -> Self {
        Self::Literal(src)
    }
}

impl From<Repetition> for Node {
    fn from(src: Repetition) -> Self {
        Self::Repetition(src)
    }
}

impl From<Group> for Node {
    fn from(src: Group) -> Self {
        Self::Group(src)
    }
}

impl From<Anchor> for Node {
    fn from(src: Anchor) -> Self {
        Self::Anchor(src)
    }
}

// Literals

#[derive(Debug, PartialEq)]
pub enum Literal {
    /// `.`
    AnyCharacter,
    Character(char),
    /// A bracket expression, i.e. `[a-z]`.
    CharacterGroup(CharacterGroup),
}

impl From<char> for Literal {
    fn from(src: char) -> Self {
        Self::Character(src)
    }
}

impl From<CharacterGroup> for Literal {
    fn from(src: CharacterGroup) -> Self {
        Self::CharacterGroup(src)
    }
}

#[derive(Debug, PartialEq)]
pub struct CharacterGroup {
    pub negated: bool,
    pub items: Vec<CharacterGroupItem>,
}

impl CharacterGroup {
    pub fn new(negated: bool, items: Vec<CharacterGroupItem>) -> Self {
        Self { negated, items }
    }
}

#[derive(Debug, PartialEq)]
pub enum CharacterGroupItem {
    Char(char),
    CharacterRange(char, char),
    CharacterClass(PosixClass),
}

// Quantifiers

#[derive(Debug, PartialEq)]
pub struct Repetition {
    pub expression: Box<Node>,
    pub quantifier: QuantifierType,
}

impl Repetition {
    pub fn new(expression: Node, quantifier: QuantifierType) -> Self {
        Self {
            expression: Box::new(expression),
            quantifier,
        }
    }
}

/// Represents all variants of quantifier types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantifierType {
    /// `{n}`
    MatchExactRange(u32),
    /// `{n,}`
    MatchAtLeastRange(u32),
    /// `{n,m}`
    MatchBetweenRange { lower_bound: u32, upper_bound: u32 },
    /// Represents a quantifier representing a match of zero or more of the
    /// preceeding field. Represented by the `*` quantifier.
    ZeroOrMore,
    /// Represents a quantifier representing a match of one or more of the
    /// preceeding field. Represented by the `+` quantifier.
    OneOrMore,
    /// Represents an optional quantifier representing a match of zero or one
    /// field. Represented by the `?` quantifier.
    ZeroOrOne,
}

impl QuantifierType {
    /// The minimum number of repetitions.
    pub fn min(&self) -> u32 {
        match self {
            Self::ZeroOrMore | Self::ZeroOrOne => 0,
            Self::OneOrMore => 1,
            Self::MatchExactRange(n) | Self::MatchAtLeastRange(n) => *n,
            Self::MatchBetweenRange { lower_bound, .. } => *lower_bound,
        }
    }

    /// The maximum number of repetitions, `None` being unbounded.
    pub fn max(&self) -> Option<u32> {
        match self {
            Self::ZeroOrMore | Self::OneOrMore | Self::MatchAtLeastRange(_) => None,
            Self::ZeroOrOne => Some(1),
            Self::MatchExactRange(n) => Some(*n),
            Self::MatchBetweenRange { upper_bound, .. } => Some(*upper_bound),
        }
    }
}

// Groups

#[derive(Debug, PartialEq)]
pub struct Group {
    pub expression: Box<Node>,
    /// The 1-based capture index, `None` for a non-capturing group.
    pub index: Option<usize>,
}

impl Group {
    pub fn capturing(expression: Node, index: usize) -> Self {
        Self {
            expression: Box::new(expression),
            index: Some(index),
        }
    }

    pub fn non_capturing(expression: Node) -> Self {
        Self {
            expression: Box::new(expression),
            index: None,
        }
    }
}

// Anchors

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// `^`
    StartOfLine,
    /// `$`
    EndOfLine,
}
