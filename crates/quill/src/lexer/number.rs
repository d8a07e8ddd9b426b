//! Number literals and the exponent suffix

use super::Lexer;
use crate::error::{LexError, LexErrorKind};
use crate::token::TokenKind;

impl Lexer {
    /// Lex an integer or float literal starting at a digit.
    pub(super) fn lex_number(&mut self) -> Result<(), LexError> {
        let radix = match (self.current(), self.peek(1)) {
            (Some('0'), Some('x' | 'X')) => Some(16),
            (Some('0'), Some('o' | 'O')) => Some(8),
            (Some('0'), Some('b' | 'B')) => Some(2),
            _ => None,
        };

        match radix {
            Some(radix) => self.lex_prefixed_integer(radix),
            None => {
                self.lex_decimal()?;
                if self.metas.exponent {
                    self.lex_exponent_suffix()?;
                }
                Ok(())
            }
        }
    }

    fn lex_prefixed_integer(&mut self, radix: u32) -> Result<(), LexError> {
        let start = self.pos.clone();
        self.advance();
        self.advance();

        let mut digits = String::new();
        while let Some(c) = self.current() {
            if c == '_' {
                self.advance();
            } else if c.is_digit(radix) {
                digits.push(c);
                self.advance();
            } else {
                break;
            }
        }

        if self.current() == Some('.') && self.peek(1).is_some_and(|c| c.is_digit(radix)) {
            self.advance();
            return Err(self.error_from(
                LexErrorKind::InvalidNumber,
                format!("a base-{} number cannot have a fractional part", radix),
                start,
            ));
        }

        if digits.is_empty() {
            return Err(self.error_from(
                LexErrorKind::InvalidNumber,
                format!("expected base-{} digits after the prefix", radix),
                start,
            ));
        }

        let value = i64::from_str_radix(&digits, radix).map_err(|_| {
            self.error_from(
                LexErrorKind::InvalidNumber,
                "integer literal is too large",
                start.clone(),
            )
        })?;
        self.push(TokenKind::Int(value), start);
        Ok(())
    }

    fn lex_decimal(&mut self) -> Result<(), LexError> {
        let start = self.pos.clone();
        let mut text = String::new();
        let mut seen_dot = false;

        while let Some(c) = self.current() {
            match c {
                '_' => self.advance(),
                '0'..='9' => {
                    text.push(c);
                    self.advance();
                }
                '.' => {
                    if seen_dot {
                        self.advance();
                        return Err(self.error_from(
                            LexErrorKind::InvalidNumber,
                            "more than one dot in a number",
                            start,
                        ));
                    }
                    seen_dot = true;
                    text.push('.');
                    self.advance();
                }
                _ => break,
            }
        }

        let kind = if seen_dot {
            if text.ends_with('.') {
                text.push('0');
            }
            let value: f64 = text.parse().map_err(|_| {
                self.error_from(
                    LexErrorKind::InvalidNumber,
                    format!("invalid float literal '{}'", text),
                    start.clone(),
                )
            })?;
            TokenKind::Float(value)
        } else {
            let value: i64 = text.parse().map_err(|_| {
                self.error_from(
                    LexErrorKind::InvalidNumber,
                    "integer literal is too large",
                    start.clone(),
                )
            })?;
            TokenKind::Int(value)
        };

        self.push(kind, start);
        Ok(())
    }

    /// Split a glued `e`/`E` suffix off a decimal literal.
    ///
    /// `2e3` becomes `2 Exponent 3`, and `1e-2` becomes `1 Exponent` followed
    /// by the normally lexed `- 2`. Any other identifier run (`2else`, `3ex`)
    /// is left for the identifier lexer.
    fn lex_exponent_suffix(&mut self) -> Result<(), LexError> {
        if !matches!(self.current(), Some('e' | 'E')) {
            return Ok(());
        }

        let mut run_len = 1;
        while self
            .peek(run_len)
            .is_some_and(super::is_identifier_continue)
        {
            run_len += 1;
        }

        let rest: String = (1..run_len).filter_map(|i| self.peek(i)).collect();

        if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
            let start = self.pos.clone();
            self.advance();
            self.push(TokenKind::Exponent, start);

            let digits_start = self.pos.clone();
            for _ in 0..rest.chars().count() {
                self.advance();
            }
            let value: i64 = rest.parse().map_err(|_| {
                self.error_from(
                    LexErrorKind::InvalidNumber,
                    "integer literal is too large",
                    digits_start.clone(),
                )
            })?;
            self.push(TokenKind::Int(value), digits_start);
        } else if run_len == 1
            && matches!(self.peek(1), Some('+' | '-'))
            && self.peek(2).is_some_and(|c| c.is_ascii_digit())
        {
            let start = self.pos.clone();
            self.advance();
            self.push(TokenKind::Exponent, start);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::{tokenize, Metas};
    use crate::token::{Keyword, TokenKind};
    use pretty_assertions::assert_eq;

    fn kinds(text: &str) -> Vec<TokenKind> {
        let (tokens, _) = tokenize("<test>", text, Metas::default()).unwrap();
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_trailing_dot_is_float() {
        assert_eq!(kinds("5."), vec![TokenKind::Float(5.0), TokenKind::Eof]);
    }

    #[test]
    fn test_prefixed_fraction_rejected() {
        let e = tokenize("<test>", "0x1.8", Metas::default()).unwrap_err();
        assert!(e.details.contains("fractional"));
    }

    #[test]
    fn test_huge_integer_rejected() {
        let e = tokenize("<test>", "99999999999999999999", Metas::default()).unwrap_err();
        assert_eq!(e.details, "integer literal is too large");
    }

    #[test]
    fn test_exponent_split() {
        assert_eq!(
            kinds("2e3"),
            vec![
                TokenKind::Int(2),
                TokenKind::Exponent,
                TokenKind::Int(3),
                TokenKind::Eof
            ]
        );
        assert_eq!(
            kinds("1e-2"),
            vec![
                TokenKind::Int(1),
                TokenKind::Exponent,
                TokenKind::Minus,
                TokenKind::Int(2),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_exponent_requires_adjacency() {
        assert_eq!(
            kinds("2 e3"),
            vec![
                TokenKind::Int(2),
                TokenKind::Identifier("e3".into()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_exponent_leaves_words_alone() {
        assert_eq!(
            kinds("2else"),
            vec![TokenKind::Int(2), TokenKind::Keyword(Keyword::Else), TokenKind::Eof]
        );
        assert_eq!(
            kinds("3ex"),
            vec![TokenKind::Int(3), TokenKind::Identifier("ex".into()), TokenKind::Eof]
        );
        assert_eq!(
            kinds("1e"),
            vec![TokenKind::Int(1), TokenKind::Identifier("e".into()), TokenKind::Eof]
        );
        assert_eq!(
            kinds("1e+x"),
            vec![
                TokenKind::Int(1),
                TokenKind::Identifier("e".into()),
                TokenKind::Plus,
                TokenKind::Identifier("x".into()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_exponent_upper_case_and_signs() {
        assert_eq!(
            kinds("2.5E2"),
            vec![
                TokenKind::Float(2.5),
                TokenKind::Exponent,
                TokenKind::Int(2),
                TokenKind::Eof
            ]
        );
        assert_eq!(
            kinds("1E+2"),
            vec![
                TokenKind::Int(1),
                TokenKind::Exponent,
                TokenKind::Plus,
                TokenKind::Int(2),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_comment_breaks_exponent_adjacency() {
        assert_eq!(
            kinds("1/* c */e2"),
            vec![TokenKind::Int(1), TokenKind::Identifier("e2".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_exponent_meta_off() {
        let tokens = kinds("@meta exponent off\n2e3");
        assert_eq!(
            tokens[tokens.len() - 3..].to_vec(),
            vec![TokenKind::Int(2), TokenKind::Identifier("e3".into()), TokenKind::Eof]
        );
        assert!(!tokens.contains(&TokenKind::Exponent));
    }

    #[test]
    fn test_huge_exponent_rejected() {
        let e = tokenize("<test>", "1e99999999999999999999", Metas::default()).unwrap_err();
        assert_eq!(e.details, "integer literal is too large");
        assert_eq!((e.pos_start.column, e.pos_end.column), (2, 22));
    }
}
