//! Indentation-sensitive source parser
//!
//! This module transforms source text into a syntax tree through a pull-based
//! pipeline, each stage at most one token ahead of the next:
//! - [`lexer`]: scanning (source text → raw tokens)
//! - [`indent`]: offside rule (raw tokens → tokens with INDENT / DEDENT)
//! - [`stream`]: adapter feeding the parser and collecting diagnostics
//! - [`parse`]: recursive descent grammar (tokens → [`ast::Node`])
//!
//! # Diagnostics
//!
//! Lexical, indentation and syntax faults are collected as data into one
//! ordered list. Parsing never aborts on bad input: the caller always gets a
//! module back along with the list.
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with one function per precedence
//! level. No external parser generator dependencies.

pub mod ast;
mod declarations;
pub mod error;
mod expressions;
pub mod indent;
pub mod lexer;
mod literals;
pub mod options;
pub mod parse;
mod statements;
pub mod stream;
pub mod token;

use ast::Node;
use error::Diagnostic;
use options::ParseOptions;
use parse::Parser;
use token::Token;

/// Result of parsing one source string
#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub module: Node,
    pub errors: Vec<Diagnostic>,
}

impl ParseOutput {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Tokenize with default options, keeping only the tokens.
pub fn tokenize(source: &str) -> Vec<Token> {
    tokenize_with(source, &ParseOptions::default()).0
}

/// Run the scanner and the indentation tracker, splitting the filtered
/// token stream from the diagnostics recorded along the way.
pub fn tokenize_with(source: &str, options: &ParseOptions) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    for item in stream::pipeline(source, options) {
        match item {
            Ok(token) => tokens.push(token),
            Err(err) => {
                tracing::debug!(phase = %err.phase, line = err.location.line, "{}", err.message);
                errors.push(err);
            }
        }
    }
    (tokens, errors)
}

/// Parse with default options.
pub fn parse(source: &str) -> ParseOutput {
    parse_with(source, &ParseOptions::default())
}

pub fn parse_with(source: &str, options: &ParseOptions) -> ParseOutput {
    let mut parser = Parser::with_options(source, options.clone());
    let module = parser.parse_module();
    ParseOutput {
        module,
        errors: parser.take_errors(),
    }
}
