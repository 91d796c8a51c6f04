//! Statement parsing implementation
//!
//! This module handles statement lines, suites and the control-flow forms:
//!
//! - Simple statements: `pass`, `break`, `continue`, `return`, assignments
//!   and expression statements, several per line when separated by `;`
//! - Compound statements: `def`, `if` / `elif` / `else`, `while`, `for`
//! - Suites: an inline simple line, or NEWLINE INDENT statements DEDENT
//!
//! # Grammar
//!
//! ```text
//! statement   ::= compound | simple_line | NEWLINE
//! simple_line ::= simple (';' simple)* [';'] NEWLINE
//! simple      ::= 'pass' | 'break' | 'continue' | 'return' [exprlist]
//!               | exprlist assign_op exprlist | exprlist
//! suite       ::= simple_line | NEWLINE INDENT statement+ DEDENT
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::error::ParseError;
use crate::parser::parse::{OpenBlock, Parser};
use crate::parser::token::TokenKind;

impl Parser {
    /// Parse one statement. A simple line may hold several statements.
    pub(crate) fn parse_statement(&mut self) -> Result<Vec<Node>, ParseError> {
        match self.peek_kind() {
            TokenKind::Def => Ok(vec![self.parse_function_def()?]),
            TokenKind::If => Ok(vec![self.parse_if_statement()?]),
            TokenKind::While => Ok(vec![self.parse_while_statement()?]),
            TokenKind::For => Ok(vec![self.parse_for_statement()?]),
            TokenKind::Elif | TokenKind::Else => {
                let token = self.peek();
                Err(ParseError::new(
                    format!("'{}' without a matching 'if'", token.text),
                    token.location,
                ))
            }
            kind if is_reserved_only(kind) => {
                let token = self.peek();
                Err(ParseError::new(
                    format!("'{}' is a reserved word and cannot start a statement", token.text),
                    token.location,
                ))
            }
            _ => self.parse_simple_line(),
        }
    }

    /// Parse `simple (';' simple)* [';'] NEWLINE`
    pub(crate) fn parse_simple_line(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut statements = vec![self.parse_simple_statement()?];

        while self.match_token(TokenKind::Semicolon) {
            if self.check(TokenKind::Newline) || self.check(TokenKind::EndOfInput) {
                break;
            }
            statements.push(self.parse_simple_statement()?);
        }

        if !self.check(TokenKind::EndOfInput) {
            self.expect_token(TokenKind::Newline, "expected end of line after statement")?;
        }
        Ok(statements)
    }

    fn parse_simple_statement(&mut self) -> Result<Node, ParseError> {
        let loc = self.current_location();

        match self.peek_kind() {
            TokenKind::Pass => {
                self.advance();
                Ok(Node::new(NodeKind::Pass, loc))
            }
            TokenKind::Break => {
                self.advance();
                Ok(Node::new(NodeKind::Break, loc))
            }
            TokenKind::Continue => {
                self.advance();
                Ok(Node::new(NodeKind::Continue, loc))
            }
            TokenKind::Return => {
                self.advance();
                let node = Node::new(NodeKind::Return, loc);
                if self.at_statement_end() {
                    Ok(node)
                } else {
                    Ok(node.with_child(self.parse_expression_list()?))
                }
            }
            _ => self.parse_expression_statement(),
        }
    }

    /// Parse an assignment or a bare expression list
    fn parse_expression_statement(&mut self) -> Result<Node, ParseError> {
        let loc = self.current_location();
        let target = self.parse_expression_list()?;

        let kind = self.peek_kind();
        if !is_assign_op(kind) {
            return Ok(Node::new(NodeKind::ExpressionStmt, loc).with_child(target));
        }

        let op = self.advance();
        check_target(&target, kind)?;
        let value = self.parse_expression_list()?;

        Ok(Node::new(NodeKind::Assignment, loc)
            .with_name(op.text)
            .with_child(target)
            .with_child(value))
    }

    fn at_statement_end(&mut self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::EndOfInput | TokenKind::Dedent
        )
    }

    /// Parse a suite: an inline simple line or an indented block
    pub(crate) fn parse_suite(&mut self) -> Result<Node, ParseError> {
        let loc = self.current_location();

        if !self.match_token(TokenKind::Newline) {
            let statements = self.parse_simple_line()?;
            return Ok(Node::new(NodeKind::Suite, loc).with_children(statements));
        }

        while self.match_token(TokenKind::Newline) {}

        if !self.match_token(TokenKind::Indent) {
            let err = ParseError::new("expected an indented block", self.current_location());
            self.report(err);
            return Ok(Node::new(NodeKind::Suite, loc));
        }
        self.open_block(OpenBlock::Suite);

        let statements = self.parse_statements(true);
        if !self.halted {
            self.expect_token(TokenKind::Dedent, "expected end of block")?;
            self.close_block();
        }
        Ok(Node::new(NodeKind::Suite, loc).with_children(statements))
    }

    /// Parse `condition ':' suite` after a keyword
    fn parse_clause(&mut self, keyword: &str) -> Result<(Node, Node), ParseError> {
        let condition = self.parse_expression()?;
        self.expect_token(
            TokenKind::Colon,
            &format!("expected ':' after {} condition", keyword),
        )?;
        let suite = self.parse_suite()?;
        Ok((condition, suite))
    }

    /// Parse if statement with any number of elif branches and an optional else
    fn parse_if_statement(&mut self) -> Result<Node, ParseError> {
        let loc = self.advance().location;
        let (condition, suite) = self.parse_clause("if")?;
        let mut node = Node::new(NodeKind::If, loc)
            .with_child(condition)
            .with_child(suite);

        while self.check(TokenKind::Elif) {
            let elif_loc = self.advance().location;
            let (condition, suite) = self.parse_clause("elif")?;
            node = node.with_child(
                Node::new(NodeKind::Elif, elif_loc)
                    .with_child(condition)
                    .with_child(suite),
            );
        }

        if self.check(TokenKind::Else) {
            let else_loc = self.advance().location;
            self.expect_token(TokenKind::Colon, "expected ':' after 'else'")?;
            let suite = self.parse_suite()?;
            node = node.with_child(Node::new(NodeKind::Else, else_loc).with_child(suite));
        }

        Ok(node)
    }

    fn parse_while_statement(&mut self) -> Result<Node, ParseError> {
        let loc = self.advance().location;
        let (condition, suite) = self.parse_clause("while")?;
        Ok(Node::new(NodeKind::While, loc)
            .with_child(condition)
            .with_child(suite))
    }

    /// Parse `for target in iterable ':' suite`
    fn parse_for_statement(&mut self) -> Result<Node, ParseError> {
        let loc = self.advance().location;
        let target = self.parse_for_target()?;
        self.expect_token(TokenKind::In, "expected 'in' after for target")?;
        let iterable = self.parse_expression()?;
        self.expect_token(TokenKind::Colon, "expected ':' after for iterable")?;
        let suite = self.parse_suite()?;

        Ok(Node::new(NodeKind::For, loc)
            .with_child(target)
            .with_child(iterable)
            .with_child(suite))
    }

    /// An identifier, or a comma-separated tuple of identifiers
    fn parse_for_target(&mut self) -> Result<Node, ParseError> {
        let loc = self.current_location();
        let first = self.expect_identifier()?;
        let first = Node::new(NodeKind::Identifier, first.location).with_name(first.text);

        if !self.check(TokenKind::Comma) {
            return Ok(first);
        }

        let mut names = vec![first];
        while self.match_token(TokenKind::Comma) {
            if self.check(TokenKind::In) {
                break;
            }
            let name = self.expect_identifier()?;
            names.push(Node::new(NodeKind::Identifier, name.location).with_name(name.text));
        }
        Ok(Node::new(NodeKind::Tuple, loc).with_children(names))
    }
}

fn is_assign_op(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Assign
            | TokenKind::ColonEq
            | TokenKind::PlusEq
            | TokenKind::MinusEq
            | TokenKind::StarEq
            | TokenKind::SlashEq
            | TokenKind::DoubleSlashEq
            | TokenKind::PercentEq
            | TokenKind::DoubleStarEq
    )
}

/// Keywords that are reserved but have no statement or expression form
fn is_reserved_only(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::As
            | TokenKind::Assert
            | TokenKind::Async
            | TokenKind::Await
            | TokenKind::Begin
            | TokenKind::Class
            | TokenKind::Do
            | TokenKind::End
            | TokenKind::Except
            | TokenKind::Finally
            | TokenKind::From
            | TokenKind::Read
            | TokenKind::Then
            | TokenKind::To
            | TokenKind::Try
            | TokenKind::Write
            | TokenKind::Yield
    )
}

/// Plain `=` and `:=` may unpack into a tuple; augmented operators may not.
fn check_target(target: &Node, op: TokenKind) -> Result<(), ParseError> {
    let unpacking = matches!(op, TokenKind::Assign | TokenKind::ColonEq);
    let valid = target.kind().is_assignable()
        || (unpacking
            && target.is(NodeKind::Tuple)
            && !target.children().is_empty()
            && target.children().iter().all(|c| c.kind().is_assignable()));

    if valid {
        Ok(())
    } else {
        Err(ParseError::new(
            format!("cannot assign to {}", target.kind()),
            target.location(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::{Node, NodeKind};
    use crate::parser::parse::Parser;

    fn parse_ok(source: &str) -> Node {
        let mut parser = Parser::new(source);
        let module = parser.parse_module();
        assert!(parser.errors().is_empty(), "{:?}", parser.errors());
        module
    }

    fn parse_errors(source: &str) -> Vec<String> {
        let mut parser = Parser::new(source);
        parser.parse_module();
        parser.take_errors().into_iter().map(|d| d.message).collect()
    }

    #[test]
    fn test_if_elif_else() {
        let module = parse_ok("if a:\n    x\nelif b:\n    y\nelif c:\n    z\nelse:\n    w\n");
        let node = &module.children()[0];
        let kinds: Vec<NodeKind> = node.children().iter().map(Node::kind).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Identifier,
                NodeKind::Suite,
                NodeKind::Elif,
                NodeKind::Elif,
                NodeKind::Else
            ]
        );
        assert_eq!(node.children()[4].children().len(), 1);
    }

    #[test]
    fn test_inline_suite() {
        let module = parse_ok("while x: x -= 1; pass\n");
        let suite = module.children()[0].child(1).unwrap();
        assert_eq!(suite.children().len(), 2);
        assert_eq!(suite.children()[0].text(), Some("-="));
        assert!(suite.children()[1].is(NodeKind::Pass));
    }

    #[test]
    fn test_for_with_tuple_target() {
        let module = parse_ok("for k, v in items:\n    pass\n");
        let node = &module.children()[0];
        assert!(node.is(NodeKind::For));
        assert!(node.children()[0].is(NodeKind::Tuple));
        assert_eq!(node.children()[0].children().len(), 2);
        assert_eq!(node.children()[1].text(), Some("items"));
    }

    #[test]
    fn test_semicolons_split_statements() {
        let module = parse_ok("a = 1; b = 2;\n");
        assert_eq!(module.children().len(), 2);
    }

    #[test]
    fn test_return_forms() {
        let module = parse_ok("def f():\n    return\ndef g():\n    return 1, 2\n");
        let bare = module.children()[0].child(1).unwrap().child(0).unwrap();
        assert!(bare.is(NodeKind::Return));
        assert!(bare.children().is_empty());
        let pair = module.children()[1].child(1).unwrap().child(0).unwrap();
        assert!(pair.child(0).unwrap().is(NodeKind::Tuple));
    }

    #[test]
    fn test_tuple_unpacking_assignment() {
        let module = parse_ok("a, b = b, a\n");
        let node = &module.children()[0];
        assert!(node.is(NodeKind::Assignment));
        assert_eq!(node.text(), Some("="));
        assert!(node.children()[0].is(NodeKind::Tuple));
        assert!(node.children()[1].is(NodeKind::Tuple));
    }

    #[test]
    fn test_invalid_targets() {
        assert_eq!(parse_errors("1 = x\n"), vec!["cannot assign to number"]);
        assert_eq!(parse_errors("a, b += 1\n"), vec!["cannot assign to tuple"]);
        assert!(parse_errors("f(x) = 1\n")[0].contains("call"));
    }

    #[test]
    fn test_reserved_words_are_rejected() {
        let errors = parse_errors("class A\n");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("'class'"));

        let errors = parse_errors("else:\n    pass\n");
        assert!(errors[0].contains("without a matching 'if'"));
    }

    #[test]
    fn test_missing_block_reports_and_continues() {
        let mut parser = Parser::new("if x:\ny = 1\n");
        let module = parser.parse_module();
        assert!(parser
            .errors()
            .iter()
            .any(|d| d.message == "expected an indented block"));
        assert_eq!(module.children().len(), 2);
        assert!(module.children()[0].child(1).unwrap().children().is_empty());
    }
}
