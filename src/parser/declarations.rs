//! Declaration parsing implementation
//!
//! This module handles function definitions and their parameter lists:
//!
//! - Function definitions: `def name(params): suite`
//! - Parameters: plain names, or names with a default value
//!
//! # Grammar
//!
//! ```text
//! function_def ::= "def" identifier "(" [param ("," param)* [","]] ")" ":" suite
//! param        ::= identifier ["=" expression]
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::error::ParseError;
use crate::parser::parse::Parser;
use crate::parser::token::TokenKind;

impl Parser {
    /// Parse function definition
    pub(crate) fn parse_function_def(&mut self) -> Result<Node, ParseError> {
        let loc = self.advance().location;
        let name = self.expect_identifier()?;
        let parameters = self.parse_parameters()?;
        self.expect_token(TokenKind::Colon, "expected ':' after function signature")?;
        let suite = self.parse_suite()?;

        Ok(Node::new(NodeKind::FunctionDef, loc)
            .with_name(name.text)
            .with_child(parameters)
            .with_child(suite))
    }

    /// Parse the parenthesised parameter list
    fn parse_parameters(&mut self) -> Result<Node, ParseError> {
        let open = self.expect_token(TokenKind::LParen, "expected '(' after function name")?;
        let mut params = Vec::new();
        let mut seen_default = false;

        while !self.check(TokenKind::RParen) {
            let param = self.parse_parameter()?;

            // Non-default parameter after a default one
            if param.children().is_empty() && seen_default {
                return Err(ParseError::new(
                    format!(
                        "parameter '{}' without a default follows a parameter with one",
                        param.text().unwrap_or_default()
                    ),
                    param.location(),
                ));
            }
            seen_default |= !param.children().is_empty();
            params.push(param);

            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        self.expect_token(TokenKind::RParen, "expected ')' after parameters")?;
        Ok(Node::new(NodeKind::Parameters, open.location).with_children(params))
    }

    fn parse_parameter(&mut self) -> Result<Node, ParseError> {
        let name = self.expect_identifier()?;
        let param = Node::new(NodeKind::Parameter, name.location).with_name(name.text);

        if self.match_token(TokenKind::Assign) {
            let default = self.parse_expression()?;
            return Ok(param.with_child(default));
        }
        Ok(param)
    }
}
