//! Expression parsing implementation
//!
//! This module handles expressions with one recursive descent function per
//! precedence level, lowest first:
//!
//! - Boolean: `or`, `and`, prefix `not`
//! - Comparison: `== != < > <= >= <> in`, `not in`, `is`, `is not`
//! - Shift: `<< >> <<< >>>`
//! - Arithmetic: `+ -`, then `* / // %`
//! - Power: `**` (right-associative)
//! - Unary: prefix `-` and `+`, binding tighter than `**`
//! - Postfix: call `f(...)`, subscript and slice `a[...]`, attribute `a.b`
//! - Atoms: names, numbers, strings, `true` / `false`, `none`, and the
//!   bracketed forms handled in `literals`
//!
//! All binary levels fold to the left, so `a - b - c` is `(a - b) - c`.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::error::ParseError;
use crate::parser::parse::Parser;
use crate::parser::token::{Token, TokenKind};

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Node, ParseError> {
        self.parse_or()
    }

    /// Parse a comma-separated expression list; a top-level comma makes a tuple.
    pub(crate) fn parse_expression_list(&mut self) -> Result<Node, ParseError> {
        let loc = self.current_location();
        let first = self.parse_expression()?;

        if !self.check(TokenKind::Comma) {
            return Ok(first);
        }

        let mut items = vec![first];
        while self.match_token(TokenKind::Comma) {
            if !self.starts_expression() {
                break;
            }
            items.push(self.parse_expression()?);
        }
        Ok(Node::new(NodeKind::Tuple, loc).with_children(items))
    }

    /// Whether the current token can begin an expression
    pub(crate) fn starts_expression(&mut self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Identifier
                | TokenKind::Integer
                | TokenKind::Float
                | TokenKind::SingleString
                | TokenKind::DoubleString
                | TokenKind::True
                | TokenKind::False
                | TokenKind::None
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::LBrace
                | TokenKind::Minus
                | TokenKind::Plus
                | TokenKind::Not
        )
    }

    /// Parse logical OR
    fn parse_or(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_and()?;

        while self.match_token(TokenKind::Or) {
            let loc = self.previous_location();
            let right = self.parse_and()?;
            left = boolean_op("or", left, right, loc);
        }

        Ok(left)
    }

    /// Parse logical AND
    fn parse_and(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_not()?;

        while self.match_token(TokenKind::And) {
            let loc = self.previous_location();
            let right = self.parse_not()?;
            left = boolean_op("and", left, right, loc);
        }

        Ok(left)
    }

    /// Parse prefix `not`
    fn parse_not(&mut self) -> Result<Node, ParseError> {
        if self.match_token(TokenKind::Not) {
            let loc = self.previous_location();
            let operand = self.parse_not()?;
            return Ok(Node::new(NodeKind::UnaryOp, loc)
                .with_name("not")
                .with_child(operand));
        }

        self.parse_comparison()
    }

    /// Parse comparison operators, including `not in` and `is not`
    fn parse_comparison(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_shift()?;

        loop {
            let loc = self.current_location();
            let op = match self.peek_kind() {
                TokenKind::EqEq
                | TokenKind::NotEq
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::Le
                | TokenKind::Ge
                | TokenKind::LtGt => self.advance().text,
                TokenKind::In => {
                    self.advance();
                    "in".to_string()
                }
                TokenKind::Is => {
                    self.advance();
                    if self.match_token(TokenKind::Not) {
                        "is not".to_string()
                    } else {
                        "is".to_string()
                    }
                }
                TokenKind::Not => {
                    let not = self.advance();
                    if !self.match_token(TokenKind::In) {
                        self.stream.push_back(not);
                        break;
                    }
                    "not in".to_string()
                }
                _ => break,
            };

            let right = self.parse_shift()?;
            left = Node::new(NodeKind::Comparison, loc)
                .with_name(op)
                .with_child(left)
                .with_child(right);
        }

        Ok(left)
    }

    /// Parse shift operators (<< >> <<< >>>)
    fn parse_shift(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_additive()?;

        while matches!(
            self.peek_kind(),
            TokenKind::LtLt | TokenKind::GtGt | TokenKind::LtLtLt | TokenKind::GtGtGt
        ) {
            let op = self.advance();
            let right = self.parse_additive()?;
            left = binary_op(op, left, right);
        }

        Ok(left)
    }

    /// Parse addition and subtraction
    fn parse_additive(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_multiplicative()?;

        while matches!(self.peek_kind(), TokenKind::Plus | TokenKind::Minus) {
            let op = self.advance();
            let right = self.parse_multiplicative()?;
            left = binary_op(op, left, right);
        }

        Ok(left)
    }

    /// Parse multiplication, division, floor division and modulo
    fn parse_multiplicative(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_power()?;

        while matches!(
            self.peek_kind(),
            TokenKind::Star | TokenKind::Slash | TokenKind::DoubleSlash | TokenKind::Percent
        ) {
            let op = self.advance();
            let right = self.parse_power()?;
            left = binary_op(op, left, right);
        }

        Ok(left)
    }

    /// Parse `**`, right-associative
    fn parse_power(&mut self) -> Result<Node, ParseError> {
        let base = self.parse_unary()?;

        if self.check(TokenKind::DoubleStar) {
            let op = self.advance();
            let exponent = self.parse_power()?;
            return Ok(binary_op(op, base, exponent));
        }

        Ok(base)
    }

    /// Parse prefix minus and plus
    fn parse_unary(&mut self) -> Result<Node, ParseError> {
        if matches!(self.peek_kind(), TokenKind::Minus | TokenKind::Plus) {
            let op = self.advance();
            let operand = self.parse_unary()?;
            return Ok(Node::new(NodeKind::UnaryOp, op.location)
                .with_name(op.text)
                .with_child(operand));
        }

        self.parse_postfix()
    }

    /// Parse postfix operators: calls, subscripts, attribute access
    fn parse_postfix(&mut self) -> Result<Node, ParseError> {
        let mut expr = self.parse_atom()?;

        loop {
            let loc = self.current_location();

            if self.match_token(TokenKind::LParen) {
                let args = self.parse_call_arguments()?;
                expr = Node::new(NodeKind::Call, loc)
                    .with_child(expr)
                    .with_children(args);
            } else if self.match_token(TokenKind::LBracket) {
                let index = self.parse_subscript_index()?;
                self.expect_token(TokenKind::RBracket, "expected ']' after subscript")?;
                expr = Node::new(NodeKind::Subscript, loc)
                    .with_child(expr)
                    .with_child(index);
            } else if self.match_token(TokenKind::Dot) {
                let name = self.expect_identifier()?;
                expr = Node::new(NodeKind::Attribute, name.location)
                    .with_name(name.text)
                    .with_child(expr);
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parse call arguments after '(' up to and including ')'
    fn parse_call_arguments(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut args = Vec::new();

        while !self.check(TokenKind::RParen) {
            args.push(self.parse_expression()?);
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        self.expect_token(TokenKind::RParen, "expected ')' after arguments")?;
        Ok(args)
    }

    /// Parse a subscript index or a `lower:upper` slice, either bound optional
    fn parse_subscript_index(&mut self) -> Result<Node, ParseError> {
        let loc = self.current_location();

        let lower = if self.match_token(TokenKind::Colon) {
            Node::new(NodeKind::None, loc)
        } else {
            let index = self.parse_expression()?;
            if !self.match_token(TokenKind::Colon) {
                return Ok(index);
            }
            index
        };

        let upper = if self.check(TokenKind::RBracket) {
            Node::new(NodeKind::None, self.current_location())
        } else {
            self.parse_expression()?
        };

        Ok(Node::new(NodeKind::Slice, loc)
            .with_child(lower)
            .with_child(upper))
    }

    /// Parse atoms
    fn parse_atom(&mut self) -> Result<Node, ParseError> {
        let loc = self.current_location();

        match self.peek_kind() {
            TokenKind::Identifier => {
                let token = self.advance();
                Ok(Node::new(NodeKind::Identifier, loc).with_name(token.text))
            }
            TokenKind::Integer | TokenKind::Float => {
                let token = self.advance();
                Ok(literal(NodeKind::Number, token))
            }
            TokenKind::SingleString | TokenKind::DoubleString => {
                let token = self.advance();
                Ok(literal(NodeKind::String, token))
            }
            TokenKind::True | TokenKind::False => {
                let value = self.advance().is(TokenKind::True);
                Ok(Node::new(NodeKind::Boolean, loc).with_value(Scalar::Bool(value)))
            }
            TokenKind::None => {
                self.advance();
                Ok(Node::new(NodeKind::None, loc))
            }
            TokenKind::LParen => self.parse_parenthesized(),
            TokenKind::LBracket => self.parse_list_literal(),
            TokenKind::LBrace => self.parse_brace_literal(),
            _ => Err(self.unexpected()),
        }
    }
}

fn binary_op(op: Token, left: Node, right: Node) -> Node {
    Node::new(NodeKind::BinaryOp, op.location)
        .with_name(op.text)
        .with_child(left)
        .with_child(right)
}

fn boolean_op(op: &str, left: Node, right: Node, loc: SourceLocation) -> Node {
    Node::new(NodeKind::BooleanOp, loc)
        .with_name(op)
        .with_child(left)
        .with_child(right)
}

/// Literal node carrying the token's decoded value
fn literal(kind: NodeKind, token: Token) -> Node {
    let node = Node::new(kind, token.location);
    match token.value {
        Some(value) => node.with_value(value),
        None => node,
    }
}
