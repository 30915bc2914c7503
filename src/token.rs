//! The token definition for the search expression language.

/// A token is a single unit of the language, with a specific kind and location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub span: Span,
}

/// The kind of a token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind<'a> {
    // Literals
    /// `p7`, `P12`: the digits following the period marker
    Period(&'a str),
    /// `1/2/2025`, `01-02-2025`: the raw digit runs, separators dropped
    Date {
        day: &'a str,
        month: &'a str,
        year: &'a str,
    },
    Number(&'a str),
    Word(&'a str),

    // Punctuation
    Ellipsis, // ...

    // Special
    Illegal, // An illegal/unknown character or an incomplete date
}

/// Represents a span in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// The starting byte offset.
    pub start: usize,
    /// The ending byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}
