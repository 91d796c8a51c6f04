//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and the shared parsing
//! infrastructure: token helpers, error recording and the module entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, recovery and coordination
//! - `statements`: statement lines, suites and control flow
//! - `declarations`: function definitions and parameter lists
//! - `expressions`: the operator precedence levels, postfix chains and atoms
//! - `literals`: list, dict, set and parenthesised forms
//!
//! # Error recovery
//!
//! Grammar functions return `Result<Node, ParseError>`. The innermost
//! statement loop turns an `Err` into a recorded syntax diagnostic and then
//! applies the [`Recovery`] policy: permissive parsing discards the
//! offending token and carries on, conservative parsing halts and the partial
//! module is returned.

use crate::parser::ast::{Node, NodeKind, SourceLocation};
use crate::parser::error::{Diagnostic, ParseError};
use crate::parser::options::{ParseOptions, Recovery};
use crate::parser::stream::TokenStream;
use crate::parser::token::{Token, TokenKind};

/// What consumed an INDENT whose DEDENT has not been seen yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OpenBlock {
    Suite,
    Items,
    /// Thrown away by recovery; its DEDENT is swallowed too
    Discarded,
}

/// Recursive descent parser over the indentation-aware token stream
pub struct Parser {
    pub(crate) stream: TokenStream,
    options: ParseOptions,
    /// Set once conservative recovery has recorded its first syntax error
    pub(crate) halted: bool,
    /// Consumed INDENTs, innermost last. The next DEDENT closes the top entry.
    blocks: Vec<OpenBlock>,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Self::with_options(source, ParseOptions::default())
    }

    pub fn with_options(source: &str, options: ParseOptions) -> Self {
        Self {
            stream: TokenStream::new(source, &options),
            options,
            halted: false,
            blocks: Vec::new(),
        }
    }

    /// Start over on new source text, dropping all previous state and errors.
    pub fn input(&mut self, source: &str) {
        self.stream = TokenStream::new(source, &self.options);
        self.halted = false;
        self.blocks.clear();
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse the whole input into one `module` node.
    ///
    /// Always returns a module; faults are available through [`Parser::errors`].
    /// The input is consumed, so a second call without [`Parser::input`]
    /// yields an empty module.
    pub fn parse_module(&mut self) -> Node {
        let loc = self.current_location();
        let statements = self.parse_statements(false);
        let module = Node::new(NodeKind::Module, loc).with_children(statements);

        tracing::debug!(
            statements = module.children().len(),
            errors = self.stream.diagnostics().len(),
            "parsed module"
        );
        module
    }

    pub fn errors(&self) -> &[Diagnostic] {
        self.stream.diagnostics()
    }

    pub fn take_errors(&mut self) -> Vec<Diagnostic> {
        self.stream.take_diagnostics()
    }

    /// Statement loop shared by the module and indented blocks.
    ///
    /// Inside a block the loop stops at the DEDENT closing it, which is left
    /// for the caller to consume.
    pub(crate) fn parse_statements(&mut self, in_block: bool) -> Vec<Node> {
        let mut statements = Vec::new();

        while !self.halted {
            match self.peek_kind() {
                TokenKind::EndOfInput => break,
                TokenKind::Dedent if self.blocks.last() == Some(&OpenBlock::Discarded) => {
                    self.close_block();
                    self.advance();
                }
                TokenKind::Dedent if in_block => break,
                TokenKind::Dedent => {
                    let err = self.unexpected();
                    self.report(err);
                    self.advance();
                }
                TokenKind::Newline => {
                    self.advance();
                }
                _ => match self.parse_statement() {
                    Ok(mut nodes) => statements.append(&mut nodes),
                    Err(err) => {
                        self.report(err);
                        self.recover();
                    }
                },
            }
        }

        statements
    }

    /// Record a syntax error and apply the recovery policy
    pub(crate) fn report(&mut self, err: ParseError) {
        if self.halted {
            return;
        }
        self.stream.record(err.into());
        if self.options.recovery == Recovery::Conservative {
            tracing::warn!(
                line = self.stream.previous_location().line,
                "stopping at first syntax error"
            );
            self.halted = true;
        }
    }

    /// Discard the offending token. A DEDENT is left for the enclosing
    /// block loop and the end of input is never consumed.
    fn recover(&mut self) {
        if self.halted {
            return;
        }
        match self.peek_kind() {
            TokenKind::EndOfInput | TokenKind::Dedent => {}
            TokenKind::Indent => {
                self.advance();
                self.open_block(OpenBlock::Discarded);
            }
            _ => {
                self.advance();
            }
        }
    }

    /// Note an INDENT just consumed by `block`
    pub(crate) fn open_block(&mut self, block: OpenBlock) {
        self.blocks.push(block);
    }

    /// Note the DEDENT closing the innermost open block
    pub(crate) fn close_block(&mut self) {
        self.blocks.pop();
    }

    // ===== Helper methods =====

    pub(crate) fn peek(&mut self) -> &Token {
        self.stream.peek()
    }

    pub(crate) fn peek_kind(&mut self) -> TokenKind {
        self.stream.peek().kind
    }

    pub(crate) fn check(&mut self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn advance(&mut self) -> Token {
        self.stream.advance()
    }

    pub(crate) fn previous_location(&self) -> SourceLocation {
        self.stream.previous_location()
    }

    pub(crate) fn current_location(&mut self) -> SourceLocation {
        self.peek().location
    }

    /// Error naming the current token
    pub(crate) fn unexpected(&mut self) -> ParseError {
        let token = self.peek();
        ParseError::new(format!("unexpected {}", token), token.location)
    }

    pub(crate) fn expect_token(
        &mut self,
        kind: TokenKind,
        message: &str,
    ) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let token = self.peek();
            Err(ParseError::new(
                format!("{}, found {}", message, token),
                token.location,
            ))
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<Token, ParseError> {
        self.expect_token(TokenKind::Identifier, "expected identifier")
    }
}
