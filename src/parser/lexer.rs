//! Lexer (scanner) for source text
//!
//! Converts raw source text into a lazy stream of raw tokens. The scanner
//! knows nothing about block structure: it only reports line-leading
//! whitespace and comments as tokens of their own so that the indentation
//! tracker in [`super::indent`] can measure and discard them.
//!
//! Faults never stop the scan. An unrecognised character is reported and
//! skipped; an unterminated string is reported and the rest of its line is
//! skipped.

use super::ast::{Scalar, SourceLocation};
use super::error::Diagnostic;
use super::token::{keyword, Token, TokenKind};

/// One item of a token stream: a token, or a fault recorded in stream order.
pub type Lexed = Result<Token, Diagnostic>;

/// Operators and punctuation, longest spelling first so that a prefix never
/// shadows a longer operator.
const OPERATORS: &[(&str, TokenKind)] = &[
    ("<<<", TokenKind::LtLtLt),
    (">>>", TokenKind::GtGtGt),
    ("**=", TokenKind::DoubleStarEq),
    ("//=", TokenKind::DoubleSlashEq),
    ("==", TokenKind::EqEq),
    ("!=", TokenKind::NotEq),
    ("<=", TokenKind::Le),
    (">=", TokenKind::Ge),
    ("<>", TokenKind::LtGt),
    ("<<", TokenKind::LtLt),
    (">>", TokenKind::GtGt),
    ("**", TokenKind::DoubleStar),
    ("//", TokenKind::DoubleSlash),
    (":=", TokenKind::ColonEq),
    ("+=", TokenKind::PlusEq),
    ("-=", TokenKind::MinusEq),
    ("*=", TokenKind::StarEq),
    ("/=", TokenKind::SlashEq),
    ("%=", TokenKind::PercentEq),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("<", TokenKind::Lt),
    (">", TokenKind::Gt),
    ("=", TokenKind::Assign),
    ("?", TokenKind::Question),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    (",", TokenKind::Comma),
    (";", TokenKind::Semicolon),
    (":", TokenKind::Colon),
    (".", TokenKind::Dot),
];

/// LF, CR LF and a bare CR all end a line
fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// Scanner over one source string
#[derive(Debug, Clone)]
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    at_line_start: bool,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    ///
    /// A trailing newline is appended when missing so the last logical line
    /// is always closed by a NEWLINE token.
    pub fn new(input: &str) -> Self {
        let mut input: Vec<char> = input.chars().collect();
        if input.last() != Some(&'\n') {
            input.push('\n');
        }
        Self {
            input,
            position: 0,
            line: 1,
            column: 1,
            at_line_start: true,
        }
    }

    /// Rewind to the start of the input
    pub fn reset(&mut self) {
        self.position = 0;
        self.line = 1;
        self.column = 1;
        self.at_line_start = true;
    }

    /// Scan the entire input, splitting tokens from faults
    pub fn tokenize(&mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();
        for item in self.by_ref() {
            match item {
                Ok(token) => tokens.push(token),
                Err(err) => errors.push(err),
            }
        }
        (tokens, errors)
    }

    fn scan(&mut self) -> Option<Lexed> {
        loop {
            let ch = self.peek()?;
            let loc = self.current_location();

            match ch {
                ' ' | '\t' if self.at_line_start => {
                    let text = self.take_while(|c| c == ' ' || c == '\t');
                    self.at_line_start = false;
                    return Some(Ok(Token::new(TokenKind::Whitespace, text, loc)));
                }
                ' ' | '\t' => {
                    self.advance();
                }
                '\n' | '\r' => return Some(Ok(self.newline(loc))),
                '#' => {
                    let text = self.take_while(|c| !is_line_break(c));
                    return Some(Ok(Token::new(TokenKind::Comment, text, loc)));
                }
                _ => {
                    self.at_line_start = false;
                    return Some(self.next_token(loc));
                }
            }
        }
    }

    /// Coalesce a run of line terminators into one NEWLINE
    fn newline(&mut self, loc: SourceLocation) -> Token {
        let mut text = String::new();
        loop {
            match self.peek() {
                Some(ch) if is_line_break(ch) => {
                    text.push(ch);
                    self.advance();
                }
                _ => break,
            }
        }
        self.at_line_start = true;
        Token::new(TokenKind::Newline, text, loc)
    }

    /// Get next significant token
    fn next_token(&mut self, loc: SourceLocation) -> Lexed {
        let ch = match self.peek() {
            Some(ch) => ch,
            None => return Err(Diagnostic::lexical("unexpected end of input", loc)),
        };

        if ch.is_ascii_digit() {
            return self.number_literal(loc);
        }

        if ch == '\'' || ch == '"' {
            return self.string_literal(ch, loc);
        }

        if ch.is_ascii_alphabetic() || ch == '_' {
            return Ok(self.identifier_or_keyword(loc));
        }

        if let Some(&(text, kind)) = OPERATORS.iter().find(|(text, _)| self.at(text)) {
            for _ in 0..text.len() {
                self.advance();
            }
            return Ok(Token::new(kind, text, loc));
        }

        self.advance();
        Err(Diagnostic::lexical(
            format!("illegal character '{}'", ch.escape_debug()),
            loc,
        ))
    }

    /// Parse numeric literal: `\d+\.\d+` is tried before `\d+`
    fn number_literal(&mut self, loc: SourceLocation) -> Lexed {
        let mut text = self.take_while(|c| c.is_ascii_digit());

        let is_float = self.peek() == Some('.')
            && self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit());

        if is_float {
            self.advance();
            text.push('.');
            text.push_str(&self.take_while(|c| c.is_ascii_digit()));
            let value = text.parse::<f64>().map_err(|_| {
                Diagnostic::lexical(format!("invalid float literal: {}", text), loc)
            })?;
            return Ok(Token::new(TokenKind::Float, text, loc).with_value(Scalar::Float(value)));
        }

        let value = text.parse::<i64>().map_err(|_| {
            Diagnostic::lexical(format!("integer literal too large: {}", text), loc)
        })?;
        Ok(Token::new(TokenKind::Integer, text, loc).with_value(Scalar::Int(value)))
    }

    /// Parse a single- or double-quoted string on one line
    fn string_literal(&mut self, quote: char, loc: SourceLocation) -> Lexed {
        let start = self.position;
        self.advance(); // opening quote
        let mut value = String::new();

        loop {
            match self.peek() {
                None => return Err(self.unterminated_string(loc)),
                Some(ch) if is_line_break(ch) => return Err(self.unterminated_string(loc)),
                Some('\\') => {
                    self.advance();
                    let escaped = match self.peek() {
                        Some(escaped) if !is_line_break(escaped) => escaped,
                        _ => return Err(self.unterminated_string(loc)),
                    };
                    self.advance();
                    match escaped {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        '0' => value.push('\0'),
                        '\\' | '\'' | '"' => value.push(escaped),
                        other => {
                            value.push('\\');
                            value.push(other);
                        }
                    }
                }
                Some(ch) if ch == quote => {
                    self.advance();
                    break;
                }
                Some(ch) => {
                    value.push(ch);
                    self.advance();
                }
            }
        }

        let text: String = self.input[start..self.position].iter().collect();
        let kind = if quote == '\'' {
            TokenKind::SingleString
        } else {
            TokenKind::DoubleString
        };
        Ok(Token::new(kind, text, loc).with_value(Scalar::Str(value)))
    }

    /// Skip the rest of the line; scanning resumes at its newline
    fn unterminated_string(&mut self, loc: SourceLocation) -> Diagnostic {
        self.take_while(|c| !is_line_break(c));
        Diagnostic::lexical("unterminated string literal", loc)
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, loc: SourceLocation) -> Token {
        let text = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let kind = keyword(&text).unwrap_or(TokenKind::Identifier);
        Token::new(kind, text, loc)
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            text.push(ch);
            self.advance();
        }
        text
    }

    /// Whether the remaining input starts with `text`
    fn at(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, c)| self.peek_ahead(i) == Some(c))
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        // CR LF counts once, on the LF
        if ch == '\n' || (ch == '\r' && self.peek() != Some('\n')) {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

impl Iterator for Lexer {
    type Item = Lexed;

    fn next(&mut self) -> Option<Lexed> {
        self.scan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, _) = Lexer::new(source).tokenize();
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_tokens() {
        let mut lexer = Lexer::new("def main(): return 0");
        let (tokens, errors) = lexer.tokenize();

        assert!(errors.is_empty());
        assert!(tokens[0].is(TokenKind::Def));
        assert!(tokens[1].is(TokenKind::Identifier) && tokens[1].text == "main");
        assert!(tokens[2].is(TokenKind::LParen));
        assert!(tokens[3].is(TokenKind::RParen));
        assert!(tokens[4].is(TokenKind::Colon));
        assert!(tokens[5].is(TokenKind::Return));
        assert_eq!(tokens[6].value, Some(Scalar::Int(0)));
        assert!(tokens[7].is(TokenKind::Newline));
        assert_eq!(tokens.len(), 8);
    }

    #[test]
    fn test_longest_operator_wins() {
        assert_eq!(
            kinds("<<< << <= <> < **= ** *= //= // /= :="),
            vec![
                TokenKind::LtLtLt,
                TokenKind::LtLt,
                TokenKind::Le,
                TokenKind::LtGt,
                TokenKind::Lt,
                TokenKind::DoubleStarEq,
                TokenKind::DoubleStar,
                TokenKind::StarEq,
                TokenKind::DoubleSlashEq,
                TokenKind::DoubleSlash,
                TokenKind::SlashEq,
                TokenKind::ColonEq,
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn test_float_is_one_token() {
        let (tokens, _) = Lexer::new("2.75 7 2.x").tokenize();
        assert!(tokens[0].is(TokenKind::Float));
        assert_eq!(tokens[0].value, Some(Scalar::Float(2.75)));
        assert!(tokens[1].is(TokenKind::Integer));
        assert!(tokens[2].is(TokenKind::Integer));
        assert!(tokens[3].is(TokenKind::Dot));
        assert!(tokens[4].is(TokenKind::Identifier));
    }

    #[test]
    fn test_comments_are_separate_tokens() {
        assert_eq!(
            kinds("x = 1 # trailing\n# whole line\n"),
            vec![
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::Integer,
                TokenKind::Comment,
                TokenKind::Newline,
                TokenKind::Comment,
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn test_whitespace_token_only_at_line_start() {
        let (tokens, _) = Lexer::new("if x:\n    y  =  1\n").tokenize();
        let whitespace: Vec<&Token> = tokens
            .iter()
            .filter(|t| t.is(TokenKind::Whitespace))
            .collect();
        assert_eq!(whitespace.len(), 1);
        assert_eq!(whitespace[0].text, "    ");
        assert_eq!(whitespace[0].location, SourceLocation::new(2, 1));
    }

    #[test]
    fn test_newlines_coalesce_and_count_lines() {
        let (tokens, _) = Lexer::new("a\n\n\r\n\nb").tokenize();
        assert!(tokens[1].is(TokenKind::Newline));
        assert_eq!(tokens[1].text, "\n\n\r\n\n");
        assert!(tokens[2].is(TokenKind::Identifier));
        assert_eq!(tokens[2].location, SourceLocation::new(5, 1));
    }

    #[test]
    fn test_bare_carriage_return_ends_line() {
        let (tokens, errors) = Lexer::new("a\rb\r\n'x\ry").tokenize();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::Newline,
                TokenKind::Identifier,
                TokenKind::Newline,
                TokenKind::Newline,
                TokenKind::Identifier,
                TokenKind::Newline,
            ]
        );
        assert_eq!(tokens[2].location, SourceLocation::new(2, 1));
        assert_eq!(tokens[5].location, SourceLocation::new(4, 1));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].location, SourceLocation::new(3, 1));
    }

    #[test]
    fn test_trailing_newline_is_appended() {
        assert_eq!(kinds("x"), vec![TokenKind::Identifier, TokenKind::Newline]);
        assert_eq!(kinds(""), vec![TokenKind::Newline]);
    }

    #[test]
    fn test_keywords_ignore_case() {
        assert_eq!(
            kinds("True FALSE None While"),
            vec![
                TokenKind::True,
                TokenKind::False,
                TokenKind::None,
                TokenKind::While,
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn test_string_literals() {
        let (tokens, errors) = Lexer::new(r#"'it\'s' "a\tb" "\q""#).tokenize();
        assert!(errors.is_empty());
        assert!(tokens[0].is(TokenKind::SingleString));
        assert_eq!(tokens[0].value, Some(Scalar::Str("it's".to_string())));
        assert_eq!(tokens[0].text, r"'it\'s'");
        assert!(tokens[1].is(TokenKind::DoubleString));
        assert_eq!(tokens[1].value, Some(Scalar::Str("a\tb".to_string())));
        assert_eq!(tokens[2].value, Some(Scalar::Str("\\q".to_string())));
    }

    #[test]
    fn test_illegal_character_skips_one() {
        let (tokens, errors) = Lexer::new("a $ b").tokenize();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].location, SourceLocation::new(1, 3));
        assert!(errors[0].message.contains('$'));
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].text, "b");
    }

    #[test]
    fn test_unterminated_string_resumes_next_line() {
        let (tokens, errors) = Lexer::new("x = \"abc\ny = 2\n").tokenize();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "unterminated string literal");
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::Newline,
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::Integer,
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn test_reset_restarts_scan() {
        let mut lexer = Lexer::new("a b");
        let first = lexer.tokenize();
        lexer.reset();
        let second = lexer.tokenize();
        assert_eq!(first, second);
    }
}
