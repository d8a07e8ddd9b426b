//! Tokens produced by the lexer

use std::fmt;

use phf::phf_map;

use crate::position::{Position, Span};

/// Reserved words of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Keyword {
    Var,
    Del,
    And,
    Or,
    Xor,
    Not,
    If,
    Then,
    Elif,
    Else,
    For,
    To,
    Step,
    In,
    While,
    Do,
    Loop,
    Break,
    Continue,
    Return,
    Def,
    Class,
    End,
    Import,
    Export,
    As,
    Write,
    Read,
    Assert,
    Default,
}

static KEYWORDS: phf::Map<&'static str, Keyword> = phf_map! {
    "var" => Keyword::Var,
    "del" => Keyword::Del,
    "and" => Keyword::And,
    "or" => Keyword::Or,
    "xor" => Keyword::Xor,
    "not" => Keyword::Not,
    "if" => Keyword::If,
    "then" => Keyword::Then,
    "elif" => Keyword::Elif,
    "else" => Keyword::Else,
    "for" => Keyword::For,
    "to" => Keyword::To,
    "step" => Keyword::Step,
    "in" => Keyword::In,
    "while" => Keyword::While,
    "do" => Keyword::Do,
    "loop" => Keyword::Loop,
    "break" => Keyword::Break,
    "continue" => Keyword::Continue,
    "return" => Keyword::Return,
    "def" => Keyword::Def,
    "class" => Keyword::Class,
    "end" => Keyword::End,
    "import" => Keyword::Import,
    "export" => Keyword::Export,
    "as" => Keyword::As,
    "write" => Keyword::Write,
    "read" => Keyword::Read,
    "assert" => Keyword::Assert,
    "default" => Keyword::Default,
};

impl Keyword {
    /// Look up a keyword by its source text.
    pub fn lookup(text: &str) -> Option<Keyword> {
        KEYWORDS.get(text).copied()
    }

    /// Source text of the keyword.
    pub fn as_str(self) -> &'static str {
        KEYWORDS
            .entries()
            .find(|(_, kw)| **kw == self)
            .map(|(text, _)| *text)
            .unwrap_or("?")
    }

    /// Every keyword's source text (used for "did you mean" suggestions).
    pub fn all() -> impl Iterator<Item = &'static str> {
        KEYWORDS.keys().copied()
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a token, carrying the literal value where there is one.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ═══════════════════════════════════════════════════════════════════
    // Literals and names
    // ═══════════════════════════════════════════════════════════════════
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// String literal (escapes already processed)
    Str(String),
    /// Identifier
    Identifier(String),
    /// Reserved word
    Keyword(Keyword),
    /// `e`/`E` suffix glued to a decimal number
    Exponent,

    // ═══════════════════════════════════════════════════════════════════
    // Arithmetic and bitwise
    // ═══════════════════════════════════════════════════════════════════
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `//`
    DoubleSlash,
    /// `%`
    Percent,
    /// `^` (power)
    Caret,
    /// `|`
    Pipe,
    /// `&`
    Ampersand,
    /// `^^` (bitwise xor)
    DoubleCaret,
    /// `~`
    Tilde,

    // ═══════════════════════════════════════════════════════════════════
    // Assignment
    // ═══════════════════════════════════════════════════════════════════
    /// `=`
    Eq,
    /// `+=`
    PlusEq,
    /// `-=`
    MinusEq,
    /// `*=`
    StarEq,
    /// `/=`
    SlashEq,
    /// `//=`
    DoubleSlashEq,
    /// `%=`
    PercentEq,
    /// `^=`
    CaretEq,
    /// `|=`
    PipeEq,
    /// `&=`
    AmpersandEq,
    /// `^^=`
    DoubleCaretEq,

    // ═══════════════════════════════════════════════════════════════════
    // Comparison
    // ═══════════════════════════════════════════════════════════════════
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,

    // ═══════════════════════════════════════════════════════════════════
    // Punctuation
    // ═══════════════════════════════════════════════════════════════════
    /// `->`
    Arrow,
    /// `>>`
    Redirect,
    /// `!>>`
    OverwriteRedirect,
    /// `?`
    Question,
    /// `$`
    Dollar,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LSquare,
    /// `]`
    RSquare,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `:`
    Colon,
    /// Newline or `;`
    Newline,
    /// End of input
    Eof,
}

/// Operator spellings, longest first so that the lexer can take the first match.
pub(crate) const OPERATORS: &[(&str, TokenKind)] = &[
    ("!>>", TokenKind::OverwriteRedirect),
    ("//=", TokenKind::DoubleSlashEq),
    ("^^=", TokenKind::DoubleCaretEq),
    ("//", TokenKind::DoubleSlash),
    ("^^", TokenKind::DoubleCaret),
    (">>", TokenKind::Redirect),
    ("->", TokenKind::Arrow),
    ("==", TokenKind::EqEq),
    ("!=", TokenKind::NotEq),
    ("<=", TokenKind::Le),
    (">=", TokenKind::Ge),
    ("+=", TokenKind::PlusEq),
    ("-=", TokenKind::MinusEq),
    ("*=", TokenKind::StarEq),
    ("/=", TokenKind::SlashEq),
    ("%=", TokenKind::PercentEq),
    ("^=", TokenKind::CaretEq),
    ("|=", TokenKind::PipeEq),
    ("&=", TokenKind::AmpersandEq),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("^", TokenKind::Caret),
    ("|", TokenKind::Pipe),
    ("&", TokenKind::Ampersand),
    ("~", TokenKind::Tilde),
    ("=", TokenKind::Eq),
    ("<", TokenKind::Lt),
    (">", TokenKind::Gt),
    ("?", TokenKind::Question),
    ("$", TokenKind::Dollar),
    (",", TokenKind::Comma),
    (".", TokenKind::Dot),
    (":", TokenKind::Colon),
];

impl TokenKind {
    /// Whether this token is the given keyword.
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, TokenKind::Keyword(kw) if *kw == keyword)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Int(n) => write!(f, "int {}", n),
            TokenKind::Float(n) => write!(f, "float {:?}", n),
            TokenKind::Str(s) => write!(f, "string {:?}", s),
            TokenKind::Identifier(name) => write!(f, "identifier '{}'", name),
            TokenKind::Keyword(kw) => write!(f, "'{}'", kw),
            TokenKind::Exponent => write!(f, "exponent"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LSquare => write!(f, "'['"),
            TokenKind::RSquare => write!(f, "']'"),
            TokenKind::Newline => write!(f, "newline"),
            TokenKind::Eof => write!(f, "end of file"),
            other => {
                let text = OPERATORS
                    .iter()
                    .find(|(_, kind)| kind == other)
                    .map(|(text, _)| *text)
                    .unwrap_or("?");
                write!(f, "'{}'", text)
            }
        }
    }
}

/// A lexical unit with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What the token is
    pub kind: TokenKind,

    /// First character of the token
    pub pos_start: Position,

    /// One past the last character of the token
    pub pos_end: Position,
}

impl Token {
    /// Create a token.
    pub fn new(kind: TokenKind, pos_start: Position, pos_end: Position) -> Self {
        Self {
            kind,
            pos_start,
            pos_end,
        }
    }

    /// The token's span.
    pub fn span(&self) -> Span {
        Span::new(self.pos_start.clone(), self.pos_end.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_round_trips() {
        for text in Keyword::all() {
            let kw = Keyword::lookup(text).unwrap();
            assert_eq!(kw.as_str(), text);
        }
        assert_eq!(Keyword::lookup("print"), None);
    }

    #[test]
    fn test_operator_table_is_longest_first() {
        for (i, (a, _)) in OPERATORS.iter().enumerate() {
            for (b, _) in &OPERATORS[i + 1..] {
                assert!(!b.starts_with(a) || b == a, "{} shadows {}", a, b);
            }
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(TokenKind::DoubleSlashEq.to_string(), "'//='");
        assert_eq!(TokenKind::Keyword(Keyword::End).to_string(), "'end'");
        assert_eq!(TokenKind::Eof.to_string(), "end of file");
    }
}
