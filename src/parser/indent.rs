//! Indentation tracking (offside rule)
//!
//! Two iterator adapters sit between the scanner and the parser:
//!
//! - [`Classify`] decides, from the COLON / NEWLINE sequencing alone, which
//!   token starts a physical line and which one opens a block that has to be
//!   indented deeper than its header.
//! - [`IndentFilter`] measures the leading whitespace of every line against
//!   the indentation stack and synthesizes INDENT / DEDENT tokens, dropping
//!   the whitespace and comment tokens on the way.
//!
//! Faults are emitted in-stream as `Err` items, right before the token that
//! caused them, and never stop the stream.

use super::ast::SourceLocation;
use super::error::Diagnostic;
use super::lexer::Lexed;
use super::options::TabPolicy;
use super::token::{Token, TokenKind};
use std::collections::VecDeque;

/// Block-opening state carried across tokens by [`Classify`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentState {
    NoIndent,
    /// A block opener was seen; a NEWLINE now would open a block
    MightIndent,
    /// The next significant token starts an indented block
    MustIndent,
}

/// Tokens after which a line break opens an indented block
fn opens_block(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Colon | TokenKind::LBrace | TokenKind::LBracket
    )
}

/// Closer that ends an empty multi-line literal opened by `opener`
fn matching_closer(opener: TokenKind) -> Option<TokenKind> {
    match opener {
        TokenKind::LBracket => Some(TokenKind::RBracket),
        TokenKind::LBrace => Some(TokenKind::RBrace),
        _ => None,
    }
}

/// First pass: sets `starts_line` and `must_indent` on raw tokens.
pub struct Classify<I> {
    inner: I,
    state: IndentState,
    /// Token that moved the state to `MightIndent`
    opener: TokenKind,
    at_line_start: bool,
}

impl<I: Iterator<Item = Lexed>> Classify<I> {
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            state: IndentState::NoIndent,
            opener: TokenKind::Newline,
            at_line_start: true,
        }
    }

    fn classify(&mut self, token: &mut Token) {
        match token.kind {
            TokenKind::Newline => {
                self.at_line_start = true;
                // Blank and comment-only lines keep a pending block open.
                self.state = match self.state {
                    IndentState::NoIndent => IndentState::NoIndent,
                    IndentState::MightIndent | IndentState::MustIndent => IndentState::MustIndent,
                };
            }
            TokenKind::Whitespace | TokenKind::Comment => {}
            kind => {
                token.starts_line = self.at_line_start;
                // `[` or `{` closed on the next line is an empty literal, not a block.
                token.must_indent = self.state == IndentState::MustIndent
                    && matching_closer(self.opener) != Some(kind);
                self.at_line_start = false;
                self.state = if opens_block(kind) {
                    self.opener = kind;
                    IndentState::MightIndent
                } else {
                    IndentState::NoIndent
                };
            }
        }
    }
}

impl<I: Iterator<Item = Lexed>> Iterator for Classify<I> {
    type Item = Lexed;

    fn next(&mut self) -> Option<Lexed> {
        match self.inner.next()? {
            Ok(mut token) => {
                self.classify(&mut token);
                Some(Ok(token))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

/// Second pass: measures indentation and emits INDENT / DEDENT.
pub struct IndentFilter<I> {
    inner: I,
    tabs: TabPolicy,
    end_marker: bool,
    /// Widths of the open blocks, strictly increasing, bottom is always 0
    stack: Vec<usize>,
    pending_width: Option<usize>,
    queue: VecDeque<Lexed>,
    end_location: SourceLocation,
    finished: bool,
}

impl<I: Iterator<Item = Lexed>> IndentFilter<I> {
    pub fn new(inner: I, tabs: TabPolicy, end_marker: bool) -> Self {
        Self {
            inner,
            tabs,
            end_marker,
            stack: vec![0],
            pending_width: None,
            queue: VecDeque::new(),
            end_location: SourceLocation::new(1, 1),
            finished: false,
        }
    }

    /// Number of open blocks above the top level
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    fn top(&self) -> usize {
        self.stack.last().copied().unwrap_or(0)
    }

    fn process(&mut self, token: Token) {
        match token.kind {
            TokenKind::Whitespace => {
                if self.tabs == TabPolicy::Reject && token.text.contains('\t') {
                    self.queue.push_back(Err(Diagnostic::indentation(
                        "tab character in indentation",
                        token.location,
                    )));
                }
                self.pending_width = Some(self.tabs.measure(&token.text));
                return;
            }
            TokenKind::Comment => return,
            TokenKind::Newline => {
                self.pending_width = None;
                let lines = token.text.replace("\r\n", "\n").chars().count();
                self.end_location = SourceLocation::new(token.location.line + lines, 1);
                self.queue.push_back(Ok(token));
                return;
            }
            _ => {}
        }

        if token.starts_line {
            let width = self.pending_width.take().unwrap_or(0);
            self.measure(width, &token);
        }
        self.queue.push_back(Ok(token));
    }

    fn measure(&mut self, width: usize, token: &Token) {
        let loc = token.location;

        if token.must_indent {
            if width > self.top() {
                self.stack.push(width);
                tracing::trace!(width, depth = self.depth(), line = loc.line, "indent");
                self.queue
                    .push_back(Ok(Token::synthetic(TokenKind::Indent, loc)));
                return;
            }
            self.queue.push_back(Err(Diagnostic::indentation(
                "block must be indented",
                loc,
            )));
        }

        if width > self.top() {
            self.queue.push_back(Err(Diagnostic::indentation(
                "unexpected indentation",
                loc,
            )));
            return;
        }

        while width < self.top() {
            self.stack.pop();
            tracing::trace!(width, depth = self.depth(), line = loc.line, "dedent");
            self.queue
                .push_back(Ok(Token::synthetic(TokenKind::Dedent, loc)));
        }

        if width != self.top() {
            self.queue.push_back(Err(Diagnostic::indentation(
                "inconsistent indentation",
                loc,
            )));
        }
    }

    /// Close every open block and append the end marker
    fn finish(&mut self) {
        while self.stack.len() > 1 {
            self.stack.pop();
            self.queue
                .push_back(Ok(Token::synthetic(TokenKind::Dedent, self.end_location)));
        }
        if self.end_marker {
            self.queue
                .push_back(Ok(Token::synthetic(TokenKind::EndOfInput, self.end_location)));
        }
        self.finished = true;
    }
}

impl<I: Iterator<Item = Lexed>> Iterator for IndentFilter<I> {
    type Item = Lexed;

    fn next(&mut self) -> Option<Lexed> {
        loop {
            if let Some(item) = self.queue.pop_front() {
                return Some(item);
            }
            if self.finished {
                return None;
            }
            match self.inner.next() {
                Some(Ok(token)) => self.process(token),
                Some(Err(err)) => return Some(Err(err)),
                None => self.finish(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::Lexer;

    fn filter(source: &str, tabs: TabPolicy) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();
        for item in IndentFilter::new(Classify::new(Lexer::new(source)), tabs, true) {
            match item {
                Ok(token) => tokens.push(token),
                Err(err) => errors.push(err),
            }
        }
        (tokens, errors)
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        filter(source, TabPolicy::Raw)
            .0
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_classify_marks_block_start() {
        let tokens: Vec<Token> = Classify::new(Lexer::new("if x:\n    y\nz\n"))
            .filter_map(Result::ok)
            .collect();
        let y = tokens.iter().find(|t| t.text == "y").unwrap();
        let z = tokens.iter().find(|t| t.text == "z").unwrap();
        let x = tokens.iter().find(|t| t.text == "x").unwrap();
        assert!(y.must_indent && y.starts_line);
        assert!(!z.must_indent && z.starts_line);
        assert!(!x.starts_line);
        assert!(tokens[0].starts_line);
    }

    #[test]
    fn test_inline_colon_does_not_open_block() {
        let tokens: Vec<Token> = Classify::new(Lexer::new("y = a[1:2]\nz = {1: 2}\nw\n"))
            .filter_map(Result::ok)
            .collect();
        assert!(tokens.iter().all(|t| !t.must_indent));
    }

    #[test]
    fn test_empty_multiline_literal_needs_no_block() {
        for source in ["x = [\n]\n", "x = {\n\n}\n"] {
            let (tokens, errors) = filter(source, TabPolicy::Raw);
            assert!(errors.is_empty(), "{:?}: {:?}", source, errors);
            assert!(tokens.iter().all(|t| !t.is(TokenKind::Indent)));
        }

        // Only the closer matching the opener is exempt.
        let (_, errors) = filter("x = [\n}\n", TabPolicy::Raw);
        assert_eq!(errors[0].message, "block must be indented");
    }

    #[test]
    fn test_nested_blocks() {
        assert_eq!(
            kinds("def f():\n    if x:\n        y\n    z\n"),
            vec![
                TokenKind::Def,
                TokenKind::Identifier,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Colon,
                TokenKind::Newline,
                TokenKind::Indent,
                TokenKind::If,
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::Newline,
                TokenKind::Indent,
                TokenKind::Identifier,
                TokenKind::Newline,
                TokenKind::Dedent,
                TokenKind::Identifier,
                TokenKind::Newline,
                TokenKind::Dedent,
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_dedent_several_levels_at_once() {
        let kinds = kinds("if a:\n  if b:\n    c\nd\n");
        let dedents = kinds.iter().filter(|k| **k == TokenKind::Dedent).count();
        assert_eq!(dedents, 2);
        let d = kinds.iter().rposition(|k| *k == TokenKind::Identifier).unwrap();
        assert_eq!(kinds[d - 1], TokenKind::Dedent);
        assert_eq!(kinds[d - 2], TokenKind::Dedent);
    }

    #[test]
    fn test_blank_and_comment_lines_are_ignored() {
        let (tokens, errors) = filter("if x:\n\n  # note\n    y\n# end\n", TabPolicy::Raw);
        assert!(errors.is_empty(), "{:?}", errors);
        assert!(tokens.iter().all(|t| !t.is(TokenKind::Comment)));
        assert_eq!(tokens.iter().filter(|t| t.is(TokenKind::Indent)).count(), 1);
        assert_eq!(tokens.iter().filter(|t| t.is(TokenKind::Dedent)).count(), 1);
    }

    #[test]
    fn test_inconsistent_dedent_is_recorded() {
        let (tokens, errors) = filter("if x:\n    a\n  b\n", TabPolicy::Raw);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "inconsistent indentation");
        assert_eq!(errors[0].location.line, 3);
        assert!(tokens.iter().any(|t| t.text == "b"));
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::EndOfInput));
    }

    #[test]
    fn test_unexpected_indent_is_recorded() {
        let (_, errors) = filter("a\n    b\n", TabPolicy::Raw);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "unexpected indentation");
    }

    #[test]
    fn test_missing_block_indent_is_recorded() {
        let (tokens, errors) = filter("if x:\ny\n", TabPolicy::Raw);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "block must be indented");
        assert!(tokens.iter().all(|t| !t.is(TokenKind::Indent)));
    }

    #[test]
    fn test_multiline_literal_tokens() {
        assert_eq!(
            kinds("x = [\n    1,\n    2,\n]\n"),
            vec![
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::LBracket,
                TokenKind::Newline,
                TokenKind::Indent,
                TokenKind::Integer,
                TokenKind::Comma,
                TokenKind::Newline,
                TokenKind::Integer,
                TokenKind::Comma,
                TokenKind::Newline,
                TokenKind::Dedent,
                TokenKind::RBracket,
                TokenKind::Newline,
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_end_marker_is_optional() {
        let kinds: Vec<TokenKind> =
            IndentFilter::new(Classify::new(Lexer::new("if x:\n  y")), TabPolicy::Raw, false)
                .filter_map(Result::ok)
                .map(|t| t.kind)
                .collect();
        assert_eq!(kinds.last(), Some(&TokenKind::Dedent));
    }

    #[test]
    fn test_tab_policies() {
        let source = "if x:\n\ty\n        z\n";
        let (_, raw) = filter(source, TabPolicy::Raw);
        assert!(raw.iter().any(|e| e.message == "unexpected indentation"));

        let (_, expanded) = filter(source, TabPolicy::Expand(8));
        assert!(expanded.is_empty(), "{:?}", expanded);

        let (_, rejected) = filter(source, TabPolicy::Reject);
        assert!(rejected.iter().any(|e| e.message == "tab character in indentation"));
    }

    #[test]
    fn test_end_location_follows_last_line() {
        let (tokens, _) = filter("if x:\n  y\n\n\n", TabPolicy::Raw);
        let end = tokens.last().unwrap();
        assert!(end.is(TokenKind::EndOfInput));
        assert_eq!(end.location, SourceLocation::new(5, 1));
    }
}
