//! Bracketed literal parsing
//!
//! Lists, dicts and sets accept an inline form and a multi-line form:
//!
//! ```text
//! inline     ::= opener [item ("," item)* [","]] closer
//! multi_line ::= opener NEWLINE INDENT item (sep item)* [sep] DEDENT closer
//!              | opener NEWLINE closer
//! sep        ::= "," | NEWLINE | "," NEWLINE
//! ```
//!
//! Both forms build the same tree. Parentheses only take the inline form:
//! `()` is an empty tuple, a single element collapses to itself and two or
//! more elements make a tuple.

use crate::parser::ast::*;
use crate::parser::error::ParseError;
use crate::parser::parse::{OpenBlock, Parser};
use crate::parser::token::TokenKind;

impl Parser {
    /// Parse `( ... )`
    pub(crate) fn parse_parenthesized(&mut self) -> Result<Node, ParseError> {
        let loc = self.advance().location;

        if self.match_token(TokenKind::RParen) {
            return Ok(Node::new(NodeKind::Tuple, loc));
        }

        let mut items = vec![self.parse_expression()?];
        while self.match_token(TokenKind::Comma) {
            if self.check(TokenKind::RParen) {
                break;
            }
            items.push(self.parse_expression()?);
        }
        self.expect_token(TokenKind::RParen, "expected ')'")?;

        match items.len() {
            1 => Ok(items.remove(0)),
            _ => Ok(Node::new(NodeKind::Tuple, loc).with_children(items)),
        }
    }

    /// Parse `[ ... ]`
    pub(crate) fn parse_list_literal(&mut self) -> Result<Node, ParseError> {
        let loc = self.advance().location;
        let items = self.parse_items(TokenKind::RBracket, Self::parse_expression)?;
        Ok(Node::new(NodeKind::List, loc).with_children(items))
    }

    /// Parse `{ ... }` as a dict when every item is `key: value`, as a set
    /// when none is. `{}` is an empty dict.
    pub(crate) fn parse_brace_literal(&mut self) -> Result<Node, ParseError> {
        let loc = self.advance().location;
        let items = self.parse_items(TokenKind::RBrace, Self::parse_brace_item)?;

        let pairs = items.iter().filter(|item| item.is(NodeKind::Pair)).count();
        let kind = if pairs == items.len() {
            NodeKind::Dict
        } else if pairs == 0 {
            NodeKind::Set
        } else {
            return Err(ParseError::new(
                "cannot mix dict entries and set elements",
                loc,
            ));
        };

        Ok(Node::new(kind, loc).with_children(items))
    }

    fn parse_brace_item(&mut self) -> Result<Node, ParseError> {
        let key = self.parse_expression()?;

        if self.match_token(TokenKind::Colon) {
            let value = self.parse_expression()?;
            return Ok(Node::new(NodeKind::Pair, key.location())
                .with_child(key)
                .with_child(value));
        }
        Ok(key)
    }

    /// Parse the items after an opener, in either form, through the closer
    fn parse_items(
        &mut self,
        closer: TokenKind,
        mut item: impl FnMut(&mut Self) -> Result<Node, ParseError>,
    ) -> Result<Vec<Node>, ParseError> {
        let closing = format!("expected '{}'", closing_text(closer));
        let mut items = Vec::new();

        if !self.match_token(TokenKind::Newline) {
            while !self.check(closer) {
                items.push(item(self)?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
            self.expect_token(closer, &closing)?;
            return Ok(items);
        }

        while self.match_token(TokenKind::Newline) {}
        if self.match_token(closer) {
            return Ok(items);
        }
        self.expect_token(TokenKind::Indent, "expected indented items after opening bracket")?;
        self.open_block(OpenBlock::Items);

        if let Err(err) = self.parse_item_block(&mut items, &mut item) {
            self.skip_item_block(closer);
            return Err(err);
        }

        self.expect_token(TokenKind::Dedent, "expected end of item block")?;
        self.close_block();
        self.expect_token(closer, &closing)?;
        Ok(items)
    }

    /// Items of the multi-line form, up to the DEDENT
    fn parse_item_block(
        &mut self,
        items: &mut Vec<Node>,
        item: &mut impl FnMut(&mut Self) -> Result<Node, ParseError>,
    ) -> Result<(), ParseError> {
        while !self.check(TokenKind::Dedent) {
            items.push(item(self)?);

            let comma = self.match_token(TokenKind::Comma);
            let mut newline = false;
            while self.match_token(TokenKind::Newline) {
                newline = true;
            }
            if !comma && !newline {
                return Err(self.expected_separator());
            }
        }
        Ok(())
    }

    /// Drop what is left of a failed item block through its DEDENT and,
    /// when present, the closer.
    fn skip_item_block(&mut self, closer: TokenKind) {
        let mut depth = 0usize;
        loop {
            match self.peek_kind() {
                TokenKind::EndOfInput => return,
                TokenKind::Dedent if depth == 0 => break,
                TokenKind::Dedent => depth -= 1,
                TokenKind::Indent => depth += 1,
                _ => {}
            }
            self.advance();
        }
        self.advance();
        self.close_block();
        self.match_token(closer);
    }

    fn expected_separator(&mut self) -> ParseError {
        let token = self.peek();
        ParseError::new(
            format!("expected ',' or end of line between items, found {}", token),
            token.location,
        )
    }
}

fn closing_text(closer: TokenKind) -> &'static str {
    match closer {
        TokenKind::RBracket => "]",
        TokenKind::RBrace => "}",
        _ => ")",
    }
}
