//! Token definitions and the reserved-word table

use super::ast::{Scalar, SourceLocation};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::LazyLock;

/// All token kinds produced by the scanner and the indentation tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    And,
    As,
    Assert,
    Async,
    Await,
    Begin,
    Break,
    Class,
    Continue,
    Def,
    Do,
    Elif,
    Else,
    End,
    Except,
    False,
    Finally,
    For,
    From,
    If,
    In,
    Is,
    None,
    Not,
    Or,
    Pass,
    Read,
    Return,
    Then,
    To,
    True,
    Try,
    While,
    Write,
    Yield,

    // Literals
    Integer,
    Float,
    SingleString,
    DoubleString,
    Identifier,

    // Arithmetic
    Plus,        // +
    Minus,       // -
    Star,        // *
    Slash,       // /
    DoubleSlash, // //
    Percent,     // %
    DoubleStar,  // **

    // Comparison
    EqEq,  // ==
    NotEq, // !=
    Lt,    // <
    Gt,    // >
    Le,    // <=
    Ge,    // >=
    LtGt,  // <>

    // Assignment
    Assign,        // =
    ColonEq,       // :=
    PlusEq,        // +=
    MinusEq,       // -=
    StarEq,        // *=
    SlashEq,       // /=
    DoubleSlashEq, // //=
    PercentEq,     // %=
    DoubleStarEq,  // **=

    // Shifts
    LtLt,   // <<
    GtGt,   // >>
    LtLtLt, // <<<
    GtGtGt, // >>>

    // Punctuation
    Question,  // ?
    LParen,    // (
    RParen,    // )
    LBracket,  // [
    RBracket,  // ]
    LBrace,    // {
    RBrace,    // }
    Comma,     // ,
    Semicolon, // ;
    Colon,     // :
    Dot,       // .

    // Layout
    Whitespace,
    Comment,
    Newline,
    Indent,
    Dedent,
    EndOfInput,
}

impl TokenKind {
    /// Short human-readable name used in diagnostics and token dumps.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::And => "AND",
            TokenKind::As => "AS",
            TokenKind::Assert => "ASSERT",
            TokenKind::Async => "ASYNC",
            TokenKind::Await => "AWAIT",
            TokenKind::Begin => "BEGIN",
            TokenKind::Break => "BREAK",
            TokenKind::Class => "CLASS",
            TokenKind::Continue => "CONTINUE",
            TokenKind::Def => "DEF",
            TokenKind::Do => "DO",
            TokenKind::Elif => "ELIF",
            TokenKind::Else => "ELSE",
            TokenKind::End => "END",
            TokenKind::Except => "EXCEPT",
            TokenKind::False => "FALSE",
            TokenKind::Finally => "FINALLY",
            TokenKind::For => "FOR",
            TokenKind::From => "FROM",
            TokenKind::If => "IF",
            TokenKind::In => "IN",
            TokenKind::Is => "IS",
            TokenKind::None => "NONE",
            TokenKind::Not => "NOT",
            TokenKind::Or => "OR",
            TokenKind::Pass => "PASS",
            TokenKind::Read => "READ",
            TokenKind::Return => "RETURN",
            TokenKind::Then => "THEN",
            TokenKind::To => "TO",
            TokenKind::True => "TRUE",
            TokenKind::Try => "TRY",
            TokenKind::While => "WHILE",
            TokenKind::Write => "WRITE",
            TokenKind::Yield => "YIELD",
            TokenKind::Integer => "INTEGER",
            TokenKind::Float => "FLOAT",
            TokenKind::SingleString => "SSTRING",
            TokenKind::DoubleString => "DSTRING",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "STAR",
            TokenKind::Slash => "SLASH",
            TokenKind::DoubleSlash => "DOUBLESLASH",
            TokenKind::Percent => "PERCENT",
            TokenKind::DoubleStar => "POW",
            TokenKind::EqEq => "EQEQ",
            TokenKind::NotEq => "NOTEQ",
            TokenKind::Lt => "LT",
            TokenKind::Gt => "GT",
            TokenKind::Le => "LE",
            TokenKind::Ge => "GE",
            TokenKind::LtGt => "LTGT",
            TokenKind::Assign => "ASSIGN",
            TokenKind::ColonEq => "COLONEQ",
            TokenKind::PlusEq => "PLUSEQ",
            TokenKind::MinusEq => "MINUSEQ",
            TokenKind::StarEq => "STAREQ",
            TokenKind::SlashEq => "SLASHEQ",
            TokenKind::DoubleSlashEq => "DOUBLESLASHEQ",
            TokenKind::PercentEq => "PERCENTEQ",
            TokenKind::DoubleStarEq => "POWEQ",
            TokenKind::LtLt => "LTLT",
            TokenKind::GtGt => "GTGT",
            TokenKind::LtLtLt => "LTLTLT",
            TokenKind::GtGtGt => "GTGTGT",
            TokenKind::Question => "QUESTION",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBracket => "LBRACKET",
            TokenKind::RBracket => "RBRACKET",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::Comma => "COMMA",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Colon => "COLON",
            TokenKind::Dot => "DOT",
            TokenKind::Whitespace => "WHITESPACE",
            TokenKind::Comment => "COMMENT",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Indent => "INDENT",
            TokenKind::Dedent => "DEDENT",
            TokenKind::EndOfInput => "END_OF_INPUT",
        }
    }

    pub fn is_keyword(self) -> bool {
        KEYWORDS.values().any(|&kind| kind == self)
    }

    /// Layout tokens: line ends plus what the indentation tracker synthesizes
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent | TokenKind::EndOfInput
        )
    }

    /// Tokens the indentation tracker consumes and never forwards as-is
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reserved words, keyed by their lowercase spelling.
static KEYWORDS: LazyLock<FxHashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    [
        ("and", TokenKind::And),
        ("as", TokenKind::As),
        ("assert", TokenKind::Assert),
        ("async", TokenKind::Async),
        ("await", TokenKind::Await),
        ("begin", TokenKind::Begin),
        ("break", TokenKind::Break),
        ("class", TokenKind::Class),
        ("continue", TokenKind::Continue),
        ("def", TokenKind::Def),
        ("do", TokenKind::Do),
        ("elif", TokenKind::Elif),
        ("else", TokenKind::Else),
        ("end", TokenKind::End),
        ("except", TokenKind::Except),
        ("false", TokenKind::False),
        ("finally", TokenKind::Finally),
        ("for", TokenKind::For),
        ("from", TokenKind::From),
        ("if", TokenKind::If),
        ("in", TokenKind::In),
        ("is", TokenKind::Is),
        ("none", TokenKind::None),
        ("not", TokenKind::Not),
        ("or", TokenKind::Or),
        ("pass", TokenKind::Pass),
        ("read", TokenKind::Read),
        ("return", TokenKind::Return),
        ("then", TokenKind::Then),
        ("to", TokenKind::To),
        ("true", TokenKind::True),
        ("try", TokenKind::Try),
        ("while", TokenKind::While),
        ("write", TokenKind::Write),
        ("yield", TokenKind::Yield),
    ]
    .into_iter()
    .collect()
});

/// Look up a word in the reserved-word table, ignoring case.
pub fn keyword(word: &str) -> Option<TokenKind> {
    KEYWORDS.get(word.to_ascii_lowercase().as_str()).copied()
}

/// A token with its source position and layout flags.
///
/// `text` is the exact source lexeme (empty for synthesized tokens) and
/// `value` the decoded literal for number and string tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub value: Option<Scalar>,
    pub location: SourceLocation,
    /// First significant token of a physical line
    pub starts_line: bool,
    /// First token of a block that has to be indented deeper than its header
    pub must_indent: bool,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            text: text.into(),
            value: None,
            location,
            starts_line: false,
            must_indent: false,
        }
    }

    /// A token with no source text (INDENT, DEDENT, END_OF_INPUT)
    pub fn synthetic(kind: TokenKind, location: SourceLocation) -> Self {
        Self::new(kind, "", location)
    }

    pub fn with_value(mut self, value: Scalar) -> Self {
        self.value = Some(value);
        self
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// One-line `line:col KIND 'text'` form used by token dumps
    pub fn listing(&self) -> String {
        format!(
            "{}:{} {} '{}'",
            self.location.line,
            self.location.column,
            self.kind,
            self.text.escape_debug()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Newline => write!(f, "end of line (type NEWLINE)"),
            TokenKind::Indent => write!(f, "indent (type INDENT)"),
            TokenKind::Dedent => write!(f, "dedent (type DEDENT)"),
            TokenKind::EndOfInput => write!(f, "end of input (type END_OF_INPUT)"),
            kind => write!(f, "'{}' (type {})", self.text, kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_is_case_insensitive() {
        assert_eq!(keyword("while"), Some(TokenKind::While));
        assert_eq!(keyword("True"), Some(TokenKind::True));
        assert_eq!(keyword("NONE"), Some(TokenKind::None));
        assert_eq!(keyword("whilst"), None);
    }

    #[test]
    fn test_keyword_classification() {
        assert!(TokenKind::Def.is_keyword());
        assert!(!TokenKind::Identifier.is_keyword());
        assert!(TokenKind::Dedent.is_structural());
        assert!(TokenKind::Comment.is_trivia());
    }

    #[test]
    fn test_token_display_names_text_and_kind() {
        let token = Token::new(TokenKind::RParen, ")", SourceLocation::new(2, 7));
        assert_eq!(token.to_string(), "')' (type RPAREN)");
        let dedent = Token::synthetic(TokenKind::Dedent, SourceLocation::new(3, 1));
        assert_eq!(dedent.to_string(), "dedent (type DEDENT)");
    }

    #[test]
    fn test_listing_escapes_text() {
        let newline = Token::new(TokenKind::Newline, "\n", SourceLocation::new(1, 6));
        assert_eq!(newline.listing(), "1:6 NEWLINE '\\n'");
        let indent = Token::synthetic(TokenKind::Indent, SourceLocation::new(2, 5));
        assert_eq!(indent.listing(), "2:5 INDENT ''");
    }
}
