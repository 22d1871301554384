//! The sanitization event loop.
//!
//! Drives a [`TokenSource`] over the input and turns its tokens into
//! [`Policy`] events:
//!
//! ```text
//! open_document
//!   ( text | open_tag | close_tag )*
//! close_document
//! ```
//!
//! Events pass through a [`TagBalancer`] first, so the policy only sees balanced
//! nesting. Malformed constructs are recovered from locally (see
//! [`crate::attributes`] and [`crate::entities`]); the only failure is a fatal
//! error from the token source, which aborts the loop without `close_document`.

use crate::attributes::AttributeAccumulator;
use crate::balancer::TagBalancer;
use crate::config::SanitizerConfig;
use crate::entities::decode;
use crate::error::ParseError;
use crate::lexer::HtmlLexer;
use crate::names::canonical_name;
use crate::policy::Policy;
use crate::token::{Token, TokenKind, TokenSource};

/// Sanitizes HTML with the default [`SanitizerConfig`].
///
/// ```
/// use sanitizer::{Policy, sanitize};
///
/// #[derive(Default)]
/// struct Collect(Vec<String>);
///
/// impl Policy for Collect {
///     fn open_tag(&mut self, name: &str, attrs: &mut Vec<String>) {
///         self.0.push(format!("<{name} {attrs:?}>"));
///     }
///     fn close_tag(&mut self, name: &str) {
///         self.0.push(format!("</{name}>"));
///     }
///     fn text(&mut self, chunk: &str) {
///         self.0.push(chunk.to_owned());
///     }
/// }
///
/// let mut policy = Collect::default();
/// sanitize("<A HREF='x&amp;y'>t&lt;1</a>", &mut policy).unwrap();
/// assert_eq!(policy.0, ["<a [\"href\", \"x&y\"]>", "t<1", "</a>"]);
/// ```
pub fn sanitize<P: Policy>(html: &str, policy: P) -> Result<(), ParseError> {
    Sanitizer::default().sanitize(html, policy)
}

/// Reusable sanitizer entry point carrying its configuration.
#[derive(Clone, Debug, Default)]
pub struct Sanitizer {
    config: SanitizerConfig,
}

impl Sanitizer {
    pub fn new(config: SanitizerConfig) -> Self {
        Self { config }
    }

    /// Tokenize `html` with [`HtmlLexer`] and dispatch its events to `policy`.
    pub fn sanitize<P: Policy>(&self, html: &str, policy: P) -> Result<(), ParseError> {
        let lexer = HtmlLexer::new(html, self.config.max_input_bytes);
        self.sanitize_tokens(html, lexer, policy)
    }

    /// Dispatch events for a token stream produced over `html` by any tokenizer.
    pub fn sanitize_tokens<P, T>(&self, html: &str, tokens: T, policy: P) -> Result<(), ParseError>
    where
        P: Policy,
        T: TokenSource,
    {
        let mut receiver = TagBalancer::new(policy, self.config.max_nesting_depth);
        let mut event_loop = EventLoop {
            html,
            tokens,
            receiver: &mut receiver,
            attrs: AttributeAccumulator::new(),
        };
        event_loop.run()
    }
}

struct EventLoop<'a, T, R> {
    html: &'a str,
    tokens: T,
    receiver: R,
    attrs: AttributeAccumulator,
}

impl<'a, T: TokenSource, R: Policy> EventLoop<'a, T, R> {
    fn run(&mut self) -> Result<(), ParseError> {
        self.receiver.open_document();
        while let Some(token) = self.tokens.next_token()? {
            self.dispatch(token)?;
        }
        self.receiver.close_document();
        Ok(())
    }

    /// The source text of `token`, or `None` (logged) when its span does not
    /// slice the input.
    fn source_of(&self, token: Token) -> Option<&'a str> {
        let raw = token.span.slice(self.html);
        if raw.is_none() {
            log::debug!(
                target: "sanitizer",
                "skipping {:?} token with invalid span {:?}",
                token.kind,
                token.span
            );
        }
        raw
    }

    fn dispatch(&mut self, token: Token) -> Result<(), ParseError> {
        let Some(raw) = self.source_of(token) else {
            return Ok(());
        };
        match token.kind {
            TokenKind::Text => {
                let decoded = decode(raw);
                if !decoded.is_empty() {
                    self.receiver.text(&decoded);
                }
            }
            TokenKind::Unescaped => {
                if !raw.is_empty() {
                    self.receiver.text(raw);
                }
            }
            TokenKind::TagBegin => {
                let body = raw.strip_prefix('<').unwrap_or(raw);
                match body.strip_prefix('/') {
                    Some(name) => {
                        self.receiver.close_tag(&canonical_name(name));
                        self.skip_tag_body()?;
                    }
                    None => self.open_tag(body)?,
                }
            }
            // Comments, directives, processing instructions and stray tag noise.
            _ => {
                #[cfg(any(test, feature = "debug-stats"))]
                log::trace!(
                    target: "sanitizer",
                    "dropping {:?} token at {}",
                    token.kind,
                    token.span.start
                );
            }
        }
        Ok(())
    }

    fn open_tag(&mut self, raw_name: &str) -> Result<(), ParseError> {
        self.attrs.clear();
        while let Some(token) = self.tokens.next_token()? {
            match token.kind {
                TokenKind::AttrName => {
                    if let Some(raw) = self.source_of(token) {
                        self.attrs.push_name(raw);
                    }
                }
                TokenKind::AttrValue => {
                    if let Some(raw) = self.source_of(token) {
                        self.attrs.push_value(raw);
                    }
                }
                TokenKind::TagEnd => break,
                _ => {}
            }
        }
        if raw_name.is_empty() {
            log::debug!(target: "sanitizer", "dropping open tag without a name");
            return Ok(());
        }
        let attrs = self.attrs.finish();
        self.receiver.open_tag(&canonical_name(raw_name), attrs);
        Ok(())
    }

    /// Discard tokens up to and including the next `TagEnd`.
    fn skip_tag_body(&mut self) -> Result<(), ParseError> {
        while let Some(token) = self.tokens.next_token()? {
            if token.kind == TokenKind::TagEnd {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Events(Vec<String>);

    impl Policy for Events {
        fn open_document(&mut self) {
            self.0.push("#doc".into());
        }
        fn close_document(&mut self) {
            self.0.push("#/doc".into());
        }
        fn open_tag(&mut self, name: &str, attrs: &mut Vec<String>) {
            self.0.push(format!("<{name} {attrs:?}>"));
        }
        fn close_tag(&mut self, name: &str) {
            self.0.push(format!("</{name}>"));
        }
        fn text(&mut self, chunk: &str) {
            self.0.push(format!("{chunk:?}"));
        }
    }

    fn events(html: &str) -> Vec<String> {
        let mut policy = Events::default();
        sanitize(html, &mut policy).expect("sanitizes");
        policy.0
    }

    #[test]
    fn decodes_attributes_and_text() {
        assert_eq!(
            events("<a href=\"x&amp;y\">t&lt;1</a>"),
            [
                "#doc",
                "<a [\"href\", \"x&y\"]>",
                "\"t<1\"",
                "</a>",
                "#/doc"
            ]
        );
    }

    #[test]
    fn close_tag_attributes_are_discarded() {
        assert_eq!(
            events("<p>x</p class=y onclick='z'>after"),
            ["#doc", "<p []>", "\"x\"", "</p>", "\"after\"", "#/doc"]
        );
    }

    #[test]
    fn comments_and_directives_are_dropped() {
        assert_eq!(
            events("<!DOCTYPE html><!-- <b>hidden</b> -->shown<?xml x?>"),
            ["#doc", "\"shown\"", "#/doc"]
        );
    }

    #[test]
    fn unescaped_text_is_not_decoded() {
        assert_eq!(
            events("<script>a &amp; b</script>"),
            ["#doc", "<script []>", "\"a &amp; b\"", "</script>", "#/doc"]
        );
    }

    #[test]
    fn rcdata_text_is_decoded() {
        assert_eq!(
            events("<textarea>&lt;b&gt;</textarea>"),
            ["#doc", "<textarea []>", "\"<b>\"", "</textarea>", "#/doc"]
        );
    }

    #[test]
    fn names_are_canonicalized() {
        assert_eq!(
            events("<DIV ID=a></Div>"),
            ["#doc", "<div [\"id\", \"a\"]>", "</div>", "#/doc"]
        );
    }

    #[test]
    fn open_tag_at_end_of_input_is_still_emitted() {
        assert_eq!(
            events("<a href='x"),
            ["#doc", "<a [\"href\", \"'x\"]>", "</a>", "#/doc"]
        );
    }

    #[test]
    fn fatal_error_skips_close_document() {
        let mut policy = Events::default();
        let sanitizer = Sanitizer::new(SanitizerConfig {
            max_input_bytes: 3,
            ..SanitizerConfig::default()
        });
        let err = sanitizer.sanitize("<b>x</b>", &mut policy).unwrap_err();
        assert_eq!(err, ParseError::InputTooLarge { len: 8, limit: 3 });
        assert_eq!(policy.0, ["#doc"]);
    }

    #[test]
    fn external_token_streams_are_accepted() {
        let html = "<b x>y";
        let tokens = vec![
            Token::new(TokenKind::TagBegin, 0, 2),
            Token::new(TokenKind::AttrValue, 3, 4),
            Token::new(TokenKind::AttrName, 3, 4),
            Token::new(TokenKind::Comment, 0, 1),
            Token::new(TokenKind::TagEnd, 4, 5),
            Token::new(TokenKind::Text, 5, 6),
        ];
        let mut policy = Events::default();
        Sanitizer::default()
            .sanitize_tokens(html, tokens.into_iter(), &mut policy)
            .expect("infallible source");
        assert_eq!(
            policy.0,
            [
                "#doc",
                "<b [\"x\", \"x\"]>",
                "\"y\"",
                "</b>",
                "#/doc"
            ]
        );
    }

    #[test]
    fn nameless_open_tag_is_dropped() {
        let html = "<>";
        let tokens = vec![
            Token::new(TokenKind::TagBegin, 0, 1),
            Token::new(TokenKind::TagEnd, 1, 2),
        ];
        let mut policy = Events::default();
        Sanitizer::default()
            .sanitize_tokens(html, tokens.into_iter(), &mut policy)
            .expect("infallible source");
        assert_eq!(policy.0, ["#doc", "#/doc"]);
    }

    #[test]
    fn tokens_with_invalid_spans_are_skipped() {
        let html = "<b title=é>x";
        let tokens = vec![
            Token::new(TokenKind::TagBegin, 0, 2),
            Token::new(TokenKind::AttrName, 3, 8),
            Token::new(TokenKind::AttrValue, 9, 10),
            Token::new(TokenKind::AttrName, 3, 99),
            Token::new(TokenKind::TagEnd, 11, 12),
            Token::new(TokenKind::Text, 12, 13),
            Token::new(TokenKind::Text, 7, 3),
            Token::new(TokenKind::TagBegin, 40, 50),
        ];
        let mut policy = Events::default();
        Sanitizer::default()
            .sanitize_tokens(html, tokens.into_iter(), &mut policy)
            .expect("infallible source");
        assert_eq!(
            policy.0,
            ["#doc", "<b [\"title\", \"title\"]>", "\"x\"", "</b>", "#/doc"]
        );
    }

    #[test]
    fn policy_may_edit_attributes_in_place() {
        struct StripOn(Vec<Vec<String>>);
        impl Policy for StripOn {
            fn open_tag(&mut self, _name: &str, attrs: &mut Vec<String>) {
                let mut kept = Vec::new();
                for pair in attrs.chunks(2) {
                    if !pair[0].starts_with("on") {
                        kept.extend_from_slice(pair);
                    }
                }
                *attrs = kept;
                attrs.push("rel".into());
                attrs.push("nofollow".into());
                self.0.push(attrs.clone());
            }
            fn close_tag(&mut self, _name: &str) {}
            fn text(&mut self, _chunk: &str) {}
        }

        let mut policy = StripOn(Vec::new());
        sanitize("<a onclick=x href=y><b onload=z>", &mut policy).expect("sanitizes");
        assert_eq!(
            policy.0,
            vec![
                vec!["href", "y", "rel", "nofollow"],
                vec!["rel", "nofollow"]
            ]
        );
    }
}
