//! Token stream adapter between the indentation tracker and the parser
//!
//! The parser pulls tokens one at a time. Diagnostics travelling through the
//! pipeline are diverted into one ordered list as they are pulled, and the
//! parser records its own syntax errors into the same list.

use super::ast::SourceLocation;
use super::error::Diagnostic;
use super::indent::{Classify, IndentFilter};
use super::lexer::Lexer;
use super::options::ParseOptions;
use super::token::{Token, TokenKind};
use std::collections::VecDeque;

/// The full token pipeline: scanner, classification pass, indentation pass
pub type Pipeline = IndentFilter<Classify<Lexer>>;

/// Build the filtered token pipeline for one source string.
pub fn pipeline(source: &str, options: &ParseOptions) -> Pipeline {
    IndentFilter::new(
        Classify::new(Lexer::new(source)),
        options.tabs,
        options.end_marker,
    )
}

/// Pull-based token source for the parser
pub struct TokenStream {
    tokens: Pipeline,
    lookahead: VecDeque<Token>,
    diagnostics: Vec<Diagnostic>,
    previous: SourceLocation,
    /// Returned once the pipeline is exhausted, so the parser always sees an end
    end: Token,
}

impl TokenStream {
    pub fn new(source: &str, options: &ParseOptions) -> Self {
        Self {
            tokens: pipeline(source, options),
            lookahead: VecDeque::new(),
            diagnostics: Vec::new(),
            previous: SourceLocation::new(1, 1),
            end: Token::synthetic(TokenKind::EndOfInput, SourceLocation::new(1, 1)),
        }
    }

    /// Pull until one token is buffered, diverting diagnostics on the way
    fn fill(&mut self) {
        while self.lookahead.is_empty() {
            match self.tokens.next() {
                Some(Ok(token)) => {
                    self.end.location = token.location;
                    self.lookahead.push_back(token);
                }
                Some(Err(diag)) => self.record(diag),
                None => return,
            }
        }
    }

    /// The next token, without consuming it
    pub fn peek(&mut self) -> &Token {
        self.fill();
        self.lookahead.front().unwrap_or(&self.end)
    }

    /// Consume and return the next token. Past the end this keeps returning
    /// END_OF_INPUT.
    pub fn advance(&mut self) -> Token {
        self.fill();
        match self.lookahead.pop_front() {
            Some(token) => {
                self.previous = token.location;
                token
            }
            None => self.end.clone(),
        }
    }

    /// Return a consumed token to the front of the stream
    pub fn push_back(&mut self, token: Token) {
        self.lookahead.push_front(token);
    }

    /// Location of the most recently consumed token
    pub fn previous_location(&self) -> SourceLocation {
        self.previous
    }

    pub fn record(&mut self, diag: Diagnostic) {
        tracing::debug!(
            phase = %diag.phase,
            line = diag.location.line,
            column = diag.location.column,
            "{}",
            diag.message
        );
        self.diagnostics.push(diag);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}
