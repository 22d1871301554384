//! Token model shared by token sources and the event loop.

use crate::error::ParseError;

/// Byte span into the input string.
///
/// Invariant: both ends lie on UTF-8 char boundaries of the input that produced
/// the token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Slice `input` by this span, or `None` when the span is out of bounds,
    /// reversed, or off a char boundary.
    pub fn slice(self, input: &str) -> Option<&str> {
        input.get(self.start..self.end)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Character data that may contain references.
    Text,
    /// Raw character data (e.g. `<script>` bodies), never decoded.
    Unescaped,
    /// `<name` or `</name`.
    TagBegin,
    AttrName,
    /// Raw attribute value, quotes included when present.
    AttrValue,
    /// The `>` closing a tag.
    TagEnd,
    Comment,
    /// `<!...>`, including doctypes.
    Directive,
    /// `<?...>`.
    ProcessingInstruction,
    /// Tag-internal noise such as a stray `/` or `=`.
    Ignorable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }
}

/// A stream of tokens over one input string.
///
/// The event loop only consumes this interface; any tokenizer that reports
/// spans into the same input can drive it. Tokens whose spans do not slice
/// that input are skipped.
pub trait TokenSource {
    /// The next token, `Ok(None)` at end of input, or a fatal error.
    fn next_token(&mut self) -> Result<Option<Token>, ParseError>;
}

impl TokenSource for std::vec::IntoIter<Token> {
    fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        Ok(self.next())
    }
}
