//! String literals, escape sequences and implicit concatenation

use super::Lexer;
use crate::error::{LexError, LexErrorKind};
use crate::position::Position;
use crate::token::TokenKind;

fn closing_quote(opening: char) -> char {
    match opening {
        '«' => '»',
        other => other,
    }
}

fn is_quote(c: char) -> bool {
    matches!(c, '"' | '\'' | '«')
}

impl Lexer {
    /// Lex one string literal, merging any literals that follow it when
    /// implicit concatenation is on.
    pub(super) fn lex_string(&mut self) -> Result<(), LexError> {
        let start = self.pos.clone();
        let mut text = self.lex_string_body()?;
        let mut end = self.pos.clone();

        if self.metas.implicit_concat {
            loop {
                let saved = self.pos.clone();
                self.skip_trivia();
                match self.current() {
                    Some(c) if is_quote(c) => {
                        text.push_str(&self.lex_string_body()?);
                        end = self.pos.clone();
                    }
                    _ => {
                        self.pos = saved;
                        break;
                    }
                }
            }
        }

        self.tokens.push(crate::token::Token::new(TokenKind::Str(text), start, end));
        Ok(())
    }

    /// Lex from the opening quote through the closing quote.
    fn lex_string_body(&mut self) -> Result<String, LexError> {
        let start = self.pos.clone();
        let Some(opening) = self.current() else {
            return Ok(String::new());
        };
        let closing = closing_quote(opening);
        self.advance();

        let mut text = String::new();
        loop {
            match self.current() {
                None => {
                    return Err(LexError::new(
                        LexErrorKind::UnterminatedString,
                        format!("string literal is never closed, expected {}", closing),
                        start.clone(),
                        start.advanced(Some(opening)),
                    ));
                }
                Some(c) if c == closing => {
                    self.advance();
                    return Ok(text);
                }
                Some('\\') if self.metas.escapes => self.lex_escape(&mut text)?,
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
            }
        }
    }

    /// Skip whitespace, newlines and comments between adjacent literals.
    ///
    /// Stops without error at anything else, including an unterminated block
    /// comment (the main loop reports it after the caller rewinds).
    fn skip_trivia(&mut self) {
        loop {
            match self.current() {
                Some(' ' | '\t' | '\r' | '\n') => self.advance(),
                Some('#') => self.skip_line_comment(),
                Some('/') if self.peek(1) == Some('*') => {
                    let saved = self.pos.clone();
                    if self.skip_block_comment().is_err() {
                        self.pos = saved;
                        return;
                    }
                }
                _ => return,
            }
        }
    }

    /// Decode one escape sequence at the cursor (a backslash) into `out`.
    fn lex_escape(&mut self, out: &mut String) -> Result<(), LexError> {
        let start = self.pos.clone();
        self.advance();

        let simple = match self.current() {
            Some('n') => Some('\n'),
            Some('t') => Some('\t'),
            Some('r') => Some('\r'),
            Some('0') => Some('\0'),
            Some(c @ ('\\' | '"' | '\'' | '«' | '»')) => Some(c),
            _ => None,
        };
        if let Some(c) = simple {
            self.advance();
            out.push(c);
            return Ok(());
        }

        match self.current() {
            Some('x') => out.push(self.lex_hex_escape(2, start)?),
            Some('u') => out.push(self.lex_hex_escape(4, start)?),
            Some('U') => out.push(self.lex_hex_escape(8, start)?),
            Some('N') => out.push(self.lex_named_escape(start)?),
            // Unknown escapes keep the backslash; the next char is lexed as usual.
            _ => out.push('\\'),
        }
        Ok(())
    }

    fn lex_hex_escape(&mut self, digits: usize, start: Position) -> Result<char, LexError> {
        let letter = self.current().unwrap_or('x');
        self.advance();

        let mut hex = String::new();
        for _ in 0..digits {
            match self.current() {
                Some(c) if c.is_ascii_hexdigit() => {
                    hex.push(c);
                    self.advance();
                }
                _ => {
                    return Err(self.error_from(
                        LexErrorKind::InvalidEscape,
                        format!("expected {} hex digits after '\\{}'", digits, letter),
                        start,
                    ));
                }
            }
        }

        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| {
                self.error_from(
                    LexErrorKind::InvalidEscape,
                    format!("U+{} is not a valid character", hex.to_uppercase()),
                    start,
                )
            })
    }

    fn lex_named_escape(&mut self, start: Position) -> Result<char, LexError> {
        self.advance();
        if self.current() != Some('{') {
            return Err(self.error_from(
                LexErrorKind::InvalidEscape,
                "expected '{' after '\\N'",
                start,
            ));
        }
        self.advance();

        let mut name = String::new();
        loop {
            match self.current() {
                Some('}') => {
                    self.advance();
                    break;
                }
                Some('\n') | None => {
                    return Err(self.error_from(
                        LexErrorKind::InvalidEscape,
                        "expected '}' to close '\\N{'",
                        start,
                    ));
                }
                Some(c) => {
                    name.push(c);
                    self.advance();
                }
            }
        }

        unicode_names2::character(&name).ok_or_else(|| {
            self.error_from(
                LexErrorKind::InvalidEscape,
                format!("unknown Unicode character name '{}'", name),
                start,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::error::LexErrorKind;
    use crate::lexer::{tokenize, Metas};
    use crate::token::TokenKind;

    fn string(text: &str) -> String {
        let (tokens, _) = tokenize("<test>", text, Metas::default()).unwrap();
        match &tokens[0].kind {
            TokenKind::Str(s) => s.clone(),
            other => panic!("expected string, got {:?}", other),
        }
    }

    #[test]
    fn test_quote_styles() {
        assert_eq!(string("\"double\""), "double");
        assert_eq!(string("'single'"), "single");
        assert_eq!(string("«guillemets»"), "guillemets");
    }

    #[test]
    fn test_escapes() {
        assert_eq!(string(r#""tab\there""#), "tab\there");
        assert_eq!(string(r#""\x41é\U0001F600""#), "Aé😀");
        assert_eq!(string(r#""\N{GREEK SMALL LETTER ALPHA}""#), "α");
        assert_eq!(string(r#""\«\»""#), "«»");
        assert_eq!(string(r#""keep \q""#), "keep \\q");
    }

    #[test]
    fn test_escapes_can_be_disabled() {
        let (tokens, _) = tokenize(
            "<test>",
            "@meta escapes off\n'a\\nb'",
            Metas::default(),
        )
        .unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Str("a\\nb".into()));
    }

    #[test]
    fn test_bad_escapes() {
        let e = tokenize("<test>", r#""\x4""#, Metas::default()).unwrap_err();
        assert_eq!(e.kind, LexErrorKind::InvalidEscape);

        let e = tokenize("<test>", r#""\N{NOT A REAL NAME}""#, Metas::default()).unwrap_err();
        assert_eq!(e.kind, LexErrorKind::InvalidEscape);
    }

    #[test]
    fn test_implicit_concatenation_across_lines_and_comments() {
        let (tokens, _) = tokenize("<test>", "'a' # c\n  \"b\" /* x */ «c» 1", Metas::default())
            .unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Str("abc".into()));
        assert_eq!(tokens[1].kind, TokenKind::Int(1));
    }

    #[test]
    fn test_no_concatenation_keeps_newline() {
        let (tokens, _) = tokenize("<test>", "'a'\nb", Metas::default()).unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Newline);
    }

    #[test]
    fn test_unterminated_string() {
        let e = tokenize("<test>", "x = 'abc", Metas::default()).unwrap_err();
        assert_eq!(e.kind, LexErrorKind::UnterminatedString);
        assert_eq!(e.pos_start.column, 4);
    }
}
