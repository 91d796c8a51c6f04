//! # Introduction
//!
//! offside scans and parses a small Python-like scripting language whose
//! block structure is given by indentation. Leading whitespace is turned into
//! explicit INDENT / DEDENT tokens so the grammar itself stays context free.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Classify → IndentFilter → TokenStream → Parser → Node
//! ```
//!
//! 1. [`parser::lexer`]: scans raw tokens, reporting line-leading
//!    whitespace and comments as tokens of their own.
//! 2. [`parser::indent`]: marks block starts and synthesizes INDENT / DEDENT
//!    from an indentation stack.
//! 3. [`parser::stream`]: feeds the parser one token at a time and collects
//!    lexical, indentation and syntax diagnostics into one ordered list.
//! 4. [`parser::parse`]: recursive descent grammar producing a
//!    [`parser::ast::Node`] tree rooted at a `module` node.
//! 5. [`ui`]: ratatui-based viewer; not part of the stable library API.
//!
//! ## Quick start
//!
//! ```
//! let output = offside::parse("def f(a, b):\n    return a + b\n");
//! assert!(output.errors.is_empty());
//! assert_eq!(output.module.children().len(), 1);
//! ```
//!
//! Parsing never fails outright: bad input yields a (possibly partial) module
//! together with the diagnostics describing what went wrong.

pub mod parser;
pub mod ui;

pub use parser::ast::{Node, NodeKind, Scalar, SourceLocation};
pub use parser::error::{Diagnostic, Phase};
pub use parser::options::{ParseOptions, Recovery, TabPolicy};
pub use parser::parse::Parser;
pub use parser::token::{Token, TokenKind};
pub use parser::{parse, parse_with, tokenize, tokenize_with, ParseOutput};
