//! Lexer: source text to tokens
//!
//! A single forward pass over the characters of a file. Whitespace and
//! comments produce nothing, newlines and `;` fold into [`TokenKind::Newline`],
//! and the first lexical error aborts the whole pass.

mod escape;
mod meta;
mod number;

pub use meta::Metas;

use tracing::trace;

use crate::error::{LexError, LexErrorKind};
use crate::position::Position;
use crate::token::{Keyword, Token, TokenKind, OPERATORS};

/// Convert source text into tokens.
///
/// `metas` carries directive settings from a previous call (a REPL feeds
/// each line's result back in); the possibly updated settings are returned
/// alongside the tokens. The token list always ends with [`TokenKind::Eof`].
pub fn tokenize(
    file_name: &str,
    text: &str,
    metas: Metas,
) -> Result<(Vec<Token>, Metas), LexError> {
    let lexer = Lexer::new(file_name, text, metas);
    let (tokens, metas) = lexer.run()?;
    trace!(file = file_name, tokens = tokens.len(), "tokenized");
    Ok((tokens, metas))
}

/// Character cursor and output buffer for one tokenize pass.
pub(crate) struct Lexer {
    chars: Vec<char>,
    pos: Position,
    metas: Metas,
    tokens: Vec<Token>,
    /// Open brackets with the position of each opener
    brackets: Vec<(char, Position)>,
}

impl Lexer {
    fn new(file_name: &str, text: &str, metas: Metas) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: Position::start_of(file_name, text),
            metas,
            tokens: Vec::new(),
            brackets: Vec::new(),
        }
    }

    fn run(mut self) -> Result<(Vec<Token>, Metas), LexError> {
        while let Some(c) = self.current() {
            match c {
                ' ' | '\t' | '\r' => self.advance(),
                '\n' | ';' => {
                    let start = self.pos.clone();
                    self.advance();
                    self.push(TokenKind::Newline, start);
                }
                '\\' if self.line_continuation_len() > 0 => {
                    for _ in 0..self.line_continuation_len() {
                        self.advance();
                    }
                }
                '#' => self.skip_line_comment(),
                '/' if self.peek(1) == Some('*') => self.skip_block_comment()?,
                '@' => self.lex_meta()?,
                '"' | '\'' | '«' => self.lex_string()?,
                c if c.is_ascii_digit() => self.lex_number()?,
                c if is_identifier_start(c) => self.lex_identifier(),
                '(' | '[' => self.open_bracket(c),
                ')' | ']' => self.close_bracket(c)?,
                _ => self.lex_operator(c)?,
            }
        }

        if let Some((opener, pos)) = self.brackets.first() {
            return Err(LexError::new(
                LexErrorKind::UnclosedBracket,
                format!("'{}' was never closed", opener),
                pos.clone(),
                pos.advanced(Some(*opener)),
            ));
        }

        let end = self.pos.clone();
        self.tokens.push(Token::new(TokenKind::Eof, end.clone(), end));
        Ok((self.tokens, self.metas))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Cursor
    // ═══════════════════════════════════════════════════════════════════

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos.index).copied()
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos.index + offset).copied()
    }

    fn advance(&mut self) {
        let c = self.current();
        self.pos.advance(c);
    }

    fn starts_with(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, expected)| self.peek(i) == Some(expected))
    }

    fn push(&mut self, kind: TokenKind, start: Position) {
        self.tokens.push(Token::new(kind, start, self.pos.clone()));
    }

    /// Error spanning from `start` to the current position (at least one char).
    fn error_from(&self, kind: LexErrorKind, details: impl Into<String>, start: Position) -> LexError {
        let end = if self.pos.index > start.index {
            self.pos.clone()
        } else {
            start.advanced(self.current())
        };
        LexError::new(kind, details, start, end)
    }

    /// Length of a `\` line continuation at the cursor, 0 if there is none.
    fn line_continuation_len(&self) -> usize {
        match (self.peek(1), self.peek(2)) {
            (Some('\n'), _) => 2,
            (Some('\r'), Some('\n')) => 3,
            _ => 0,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Comments
    // ═══════════════════════════════════════════════════════════════════

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.current() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Skip a `/* ... */` comment; nested comments must be balanced.
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start = self.pos.clone();
        let mut depth = 0usize;

        loop {
            if self.starts_with("/*") {
                depth += 1;
                self.advance();
                self.advance();
            } else if self.starts_with("*/") {
                depth -= 1;
                self.advance();
                self.advance();
                if depth == 0 {
                    return Ok(());
                }
            } else if self.current().is_some() {
                self.advance();
            } else {
                return Err(LexError::new(
                    LexErrorKind::UnterminatedComment,
                    "block comment is never closed, expected '*/'",
                    start.clone(),
                    start.advanced(Some('/')).advanced(Some('*')),
                ));
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Identifiers, brackets and operators
    // ═══════════════════════════════════════════════════════════════════

    fn lex_identifier(&mut self) {
        let start = self.pos.clone();
        let mut text = String::new();

        while let Some(c) = self.current() {
            if !is_identifier_continue(c) {
                break;
            }
            text.push(c);
            self.advance();
        }

        let kind = match Keyword::lookup(&text) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier(text),
        };
        self.push(kind, start);
    }

    fn open_bracket(&mut self, c: char) {
        let start = self.pos.clone();
        self.brackets.push((c, start.clone()));
        self.advance();
        let kind = if c == '(' {
            TokenKind::LParen
        } else {
            TokenKind::LSquare
        };
        self.push(kind, start);
    }

    fn close_bracket(&mut self, c: char) -> Result<(), LexError> {
        let start = self.pos.clone();
        let expected_opener = if c == ')' { '(' } else { '[' };

        match self.brackets.pop() {
            Some((opener, _)) if opener == expected_opener => {}
            Some((opener, _)) => {
                return Err(self.error_from(
                    LexErrorKind::UnmatchedBracket,
                    format!("'{}' does not match '{}'", c, opener),
                    start,
                ));
            }
            None => {
                return Err(self.error_from(
                    LexErrorKind::UnmatchedBracket,
                    format!("unmatched '{}'", c),
                    start,
                ));
            }
        }

        self.advance();
        let kind = if c == ')' {
            TokenKind::RParen
        } else {
            TokenKind::RSquare
        };
        self.push(kind, start);
        Ok(())
    }

    fn lex_operator(&mut self, c: char) -> Result<(), LexError> {
        let start = self.pos.clone();

        let Some((text, kind)) = OPERATORS.iter().find(|(text, _)| self.starts_with(text)) else {
            return Err(self.error_from(
                LexErrorKind::IllegalCharacter,
                describe_char(c),
                start,
            ));
        };

        for _ in 0..text.chars().count() {
            self.advance();
        }
        self.push(kind.clone(), start);
        Ok(())
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// `U+00A7 (SECTION SIGN) '§'`
fn describe_char(c: char) -> String {
    match unicode_names2::name(c) {
        Some(name) => format!("U+{:04X} ({}) '{}'", c as u32, name, c),
        None => format!("U+{:04X} '{}'", c as u32, c.escape_debug()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        let (tokens, _) = tokenize("<test>", text, Metas::default()).unwrap();
        tokens.into_iter().map(|t| t.kind).collect()
    }

    fn lex_err(text: &str) -> LexError {
        tokenize("<test>", text, Metas::default()).unwrap_err()
    }

    #[test]
    fn test_newlines_and_semicolons_fold() {
        assert_eq!(
            kinds("a;b\nc"),
            vec![
                TokenKind::Identifier("a".into()),
                TokenKind::Newline,
                TokenKind::Identifier("b".into()),
                TokenKind::Newline,
                TokenKind::Identifier("c".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_line_continuation() {
        assert_eq!(
            kinds("1 + \\\n2"),
            vec![
                TokenKind::Int(1),
                TokenKind::Plus,
                TokenKind::Int(2),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("1 # one\n/* a /* nested */ b */ 2"),
            vec![
                TokenKind::Int(1),
                TokenKind::Newline,
                TokenKind::Int(2),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_unterminated_comment() {
        assert_eq!(
            lex_err("/* a /* b */").kind,
            LexErrorKind::UnterminatedComment
        );
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("var végé_1 end"),
            vec![
                TokenKind::Keyword(Keyword::Var),
                TokenKind::Identifier("végé_1".into()),
                TokenKind::Keyword(Keyword::End),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_bracket_errors() {
        let e = lex_err("(1, [2)");
        assert_eq!(e.kind, LexErrorKind::UnmatchedBracket);
        assert_eq!(e.pos_start.column, 6);

        let e = lex_err("x = (1 + 2");
        assert_eq!(e.kind, LexErrorKind::UnclosedBracket);
        assert_eq!(e.pos_start.column, 4);

        assert_eq!(lex_err("1)").kind, LexErrorKind::UnmatchedBracket);
    }

    #[test]
    fn test_illegal_character_names_code_point() {
        let e = lex_err("1 § 2");
        assert_eq!(e.kind, LexErrorKind::IllegalCharacter);
        assert_eq!(e.details, "U+00A7 (SECTION SIGN) '§'");
        assert_eq!(e.pos_start.column, 2);
        assert_eq!(e.pos_end.column, 3);
    }

    #[test]
    fn test_lone_bang_is_illegal() {
        assert_eq!(lex_err("!x").kind, LexErrorKind::IllegalCharacter);
    }
}
