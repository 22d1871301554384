//! Tolerant HTML lexer producing the [`TokenSource`] stream the sanitizer consumes.
//!
//! Not the HTML5 tokenizer state machine: it splits input into text, tag and
//! markup-declaration tokens, never fails on malformed markup, and reports spans
//! only. Decoding and canonicalization happen in the event loop.
//!
//! Rules:
//! - A `<` starts markup only when followed by an ASCII letter, `/` + ASCII
//!   letter, `!` or `?`. Any other `<` is text.
//! - Tag and attribute names end at ASCII whitespace, `/`, `>` (and `=` for
//!   attribute names).
//! - Quoted attribute values keep their quotes. An unclosed quote ends at the
//!   next `>`.
//! - After the `>` of a raw-text element (`script`, `style`, ...) everything up
//!   to the matching `</name` is one `Unescaped` token; `textarea` and `title`
//!   bodies are `Text` (references still decoded). `plaintext` runs to the end.
//!
//! Invariant: every span boundary is an ASCII structural byte or the end of
//! input, so spans are always UTF-8 char boundaries.

use memchr::memchr;

use crate::error::ParseError;
use crate::names::canonical_name;
use crate::token::{Token, TokenKind, TokenSource};

const COMMENT_START: &[u8] = b"<!--";
const COMMENT_END: &str = "-->";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RawTextKind {
    /// Body is emitted as `Unescaped`.
    RawText,
    /// Body is emitted as `Text`.
    Rcdata,
    /// Everything to the end of input is `Unescaped`.
    Plaintext,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RawTextElement {
    name: &'static str,
    kind: RawTextKind,
}

fn raw_text_element(name: &str) -> Option<RawTextElement> {
    let (name, kind) = match name {
        "script" => ("script", RawTextKind::RawText),
        "style" => ("style", RawTextKind::RawText),
        "xmp" => ("xmp", RawTextKind::RawText),
        "iframe" => ("iframe", RawTextKind::RawText),
        "noembed" => ("noembed", RawTextKind::RawText),
        "noframes" => ("noframes", RawTextKind::RawText),
        "noscript" => ("noscript", RawTextKind::RawText),
        "textarea" => ("textarea", RawTextKind::Rcdata),
        "title" => ("title", RawTextKind::Rcdata),
        "plaintext" => ("plaintext", RawTextKind::Plaintext),
        _ => return None,
    };
    Some(RawTextElement { name, kind })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LexState {
    Data,
    /// Between `<name` and `>`. Carries the raw-text element to switch to
    /// once the tag ends.
    InTag(Option<RawTextElement>),
    /// Just consumed `=`; a value may follow.
    BeforeValue(Option<RawTextElement>),
    RawText(RawTextElement),
}

/// Lexer over a complete input string.
pub struct HtmlLexer<'a> {
    input: &'a str,
    pos: usize,
    state: LexState,
    max_input_bytes: usize,
    checked_len: bool,
}

impl<'a> HtmlLexer<'a> {
    pub fn new(input: &'a str, max_input_bytes: usize) -> Self {
        Self {
            input,
            pos: 0,
            state: LexState::Data,
            max_input_bytes,
            checked_len: false,
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    fn at(&self, i: usize) -> Option<u8> {
        self.bytes().get(i).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.at(self.pos).is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn emit(&mut self, kind: TokenKind, start: usize, end: usize) -> Token {
        let token = Token::new(kind, start, end);
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "sanitizer.lexer", "emit token: {token:?}");
        self.pos = end;
        token
    }

    fn starts_markup(&self, lt: usize) -> bool {
        match self.at(lt + 1) {
            Some(b'!' | b'?') => true,
            Some(b'/') => self.at(lt + 2).is_some_and(|b| b.is_ascii_alphabetic()),
            Some(b) => b.is_ascii_alphabetic(),
            None => false,
        }
    }

    fn lex_data(&mut self) -> Option<Token> {
        let len = self.input.len();
        let start = self.pos;
        if start >= len {
            return None;
        }
        if self.at(start) == Some(b'<') && self.starts_markup(start) {
            return Some(self.lex_markup());
        }

        let bytes = self.bytes();
        let mut search = start + 1;
        let end = loop {
            match memchr(b'<', &bytes[search..]) {
                Some(rel) if self.starts_markup(search + rel) => break search + rel,
                Some(rel) => search += rel + 1,
                None => break len,
            }
        };
        Some(self.emit(TokenKind::Text, start, end))
    }

    fn lex_markup(&mut self) -> Token {
        let start = self.pos;
        let bytes = self.bytes();
        if bytes[start..].starts_with(COMMENT_START) {
            let body = start + COMMENT_START.len();
            let end = self.input[body..]
                .find(COMMENT_END)
                .map_or(self.input.len(), |rel| body + rel + COMMENT_END.len());
            return self.emit(TokenKind::Comment, start, end);
        }
        let kind = match bytes[start + 1] {
            b'!' => Some(TokenKind::Directive),
            b'?' => Some(TokenKind::ProcessingInstruction),
            _ => None,
        };
        if let Some(kind) = kind {
            let end = memchr(b'>', &bytes[start..]).map_or(bytes.len(), |rel| start + rel + 1);
            return self.emit(kind, start, end);
        }

        let is_close = bytes[start + 1] == b'/';
        let name_start = if is_close { start + 2 } else { start + 1 };
        let mut name_end = name_start;
        while name_end < bytes.len() && !is_name_terminator(bytes[name_end]) {
            name_end += 1;
        }
        let raw = if is_close {
            None
        } else {
            raw_text_element(&canonical_name(&self.input[name_start..name_end]))
        };
        let token = self.emit(TokenKind::TagBegin, start, name_end);
        self.state = LexState::InTag(raw);
        token
    }

    fn lex_in_tag(&mut self, raw: Option<RawTextElement>) -> Option<Token> {
        self.skip_whitespace();
        let start = self.pos;
        let b = self.at(start)?;
        match b {
            b'>' => {
                self.state = match raw {
                    Some(element) => LexState::RawText(element),
                    None => LexState::Data,
                };
                Some(self.emit(TokenKind::TagEnd, start, start + 1))
            }
            b'/' => Some(self.emit(TokenKind::Ignorable, start, start + 1)),
            b'=' => {
                self.state = LexState::BeforeValue(raw);
                Some(self.emit(TokenKind::Ignorable, start, start + 1))
            }
            _ => {
                let bytes = self.bytes();
                let mut end = start;
                while end < bytes.len() && !is_name_terminator(bytes[end]) && bytes[end] != b'=' {
                    end += 1;
                }
                let token = self.emit(TokenKind::AttrName, start, end);
                self.skip_whitespace();
                if self.at(self.pos) == Some(b'=') {
                    self.pos += 1;
                    self.state = LexState::BeforeValue(raw);
                } else {
                    // Whitespace is skipped again on the next call.
                    self.pos = end;
                }
                Some(token)
            }
        }
    }

    fn lex_before_value(&mut self, raw: Option<RawTextElement>) -> Option<Token> {
        self.skip_whitespace();
        self.state = LexState::InTag(raw);
        let start = self.pos;
        let bytes = self.bytes();
        let quote = match self.at(start)? {
            b'>' => return self.lex_in_tag(raw),
            q @ (b'"' | b'\'') => Some(q),
            _ => None,
        };
        let end = match quote {
            Some(q) => match memchr(q, &bytes[start + 1..]) {
                Some(rel) => start + 1 + rel + 1,
                None => memchr(b'>', &bytes[start..]).map_or(bytes.len(), |rel| start + rel),
            },
            None => {
                let mut end = start;
                while end < bytes.len() && !bytes[end].is_ascii_whitespace() && bytes[end] != b'>'
                {
                    end += 1;
                }
                end
            }
        };
        Some(self.emit(TokenKind::AttrValue, start, end))
    }

    fn lex_raw_text(&mut self, element: RawTextElement) -> Option<Token> {
        self.state = LexState::Data;
        let start = self.pos;
        let body_end = match element.kind {
            RawTextKind::Plaintext => self.input.len(),
            RawTextKind::RawText | RawTextKind::Rcdata => {
                find_close_tag(&self.input[start..], element.name)
                    .map_or(self.input.len(), |rel| start + rel)
            }
        };
        if body_end == start {
            return self.lex_data();
        }
        let kind = match element.kind {
            RawTextKind::Rcdata => TokenKind::Text,
            RawTextKind::RawText | RawTextKind::Plaintext => TokenKind::Unescaped,
        };
        Some(self.emit(kind, start, body_end))
    }
}

impl TokenSource for HtmlLexer<'_> {
    fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        if !self.checked_len {
            self.checked_len = true;
            if self.input.len() > self.max_input_bytes {
                // Nothing is lexed after a fatal error.
                self.pos = self.input.len();
                self.state = LexState::Data;
                return Err(ParseError::InputTooLarge {
                    len: self.input.len(),
                    limit: self.max_input_bytes,
                });
            }
        }
        Ok(match self.state {
            LexState::Data => self.lex_data(),
            LexState::InTag(raw) => self.lex_in_tag(raw),
            LexState::BeforeValue(raw) => self.lex_before_value(raw),
            LexState::RawText(element) => self.lex_raw_text(element),
        })
    }
}

impl Iterator for HtmlLexer<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

fn is_name_terminator(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'/' || b == b'>'
}

/// Offset of the first `</name` (ASCII case-insensitive) in `haystack` that is
/// followed by whitespace, `/`, `>` or the end of input.
///
/// Only matches starting at an ASCII `<` are attempted; `<` never occurs inside
/// a multi-byte UTF-8 sequence.
fn find_close_tag(haystack: &str, name: &str) -> Option<usize> {
    let bytes = haystack.as_bytes();
    let name = name.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let lt = i + memchr(b'<', &bytes[i..])?;
        let name_start = lt + 2;
        let name_end = name_start + name.len();
        if bytes.get(lt + 1) == Some(&b'/')
            && bytes
                .get(name_start..name_end)
                .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name))
            && bytes.get(name_end).is_none_or(|b| is_name_terminator(*b))
        {
            return Some(lt);
        }
        i = lt + 1;
    }
    None
}
