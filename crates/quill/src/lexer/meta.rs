//! `@meta` directives

use super::Lexer;
use crate::error::{LexError, LexErrorKind};
use crate::token::TokenKind;

/// Lexer switches set by `@meta` directives.
///
/// Returned from [`tokenize`](super::tokenize) so a caller lexing one file
/// in several pieces (a REPL) can carry the settings forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metas {
    /// Process backslash escapes in string literals
    pub escapes: bool,

    /// Merge adjacent string literals into one token
    pub implicit_concat: bool,

    /// Split `e`/`E` suffixes off decimal literals
    pub exponent: bool,
}

impl Default for Metas {
    fn default() -> Self {
        Self {
            escapes: true,
            implicit_concat: true,
            exponent: true,
        }
    }
}

impl Metas {
    /// Set a directive by name. Fails with a message for unknown names.
    pub fn set(&mut self, name: &str, value: bool) -> Result<(), String> {
        match name {
            "escapes" => self.escapes = value,
            "implicit_concat" => self.implicit_concat = value,
            "exponent" => self.exponent = value,
            _ => return Err(format!("unknown meta '{}'", name)),
        }
        Ok(())
    }
}

fn parse_flag(text: &str) -> Option<bool> {
    match text {
        "true" | "on" | "1" => Some(true),
        "false" | "off" | "0" => Some(false),
        _ => None,
    }
}

impl Lexer {
    /// Lex `@meta name [value]` up to (not including) the end of the line.
    pub(super) fn lex_meta(&mut self) -> Result<(), LexError> {
        let start = self.pos.clone();

        if self.tokens.iter().any(|t| t.kind != TokenKind::Newline) {
            self.advance();
            return Err(self.error_from(
                LexErrorKind::InvalidMeta,
                "meta directives must come before any other code",
                start,
            ));
        }

        self.advance();
        let directive = self.read_word();
        if directive != "meta" {
            return Err(self.error_from(
                LexErrorKind::InvalidMeta,
                format!("expected 'meta' after '@', found '{}'", directive),
                start,
            ));
        }

        self.skip_inline_space();
        let name = self.read_word();
        if name.is_empty() {
            return Err(self.error_from(
                LexErrorKind::InvalidMeta,
                "expected a meta name",
                start,
            ));
        }

        self.skip_inline_space();
        let raw_value = self.read_word();
        let value = if raw_value.is_empty() {
            true
        } else {
            parse_flag(&raw_value).ok_or_else(|| {
                self.error_from(
                    LexErrorKind::InvalidMeta,
                    format!("invalid value '{}' for meta '{}'", raw_value, name),
                    start.clone(),
                )
            })?
        };

        self.metas
            .set(&name, value)
            .map_err(|details| self.error_from(LexErrorKind::InvalidMeta, details, start))
    }

    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.current() {
            if !super::is_identifier_continue(c) {
                break;
            }
            word.push(c);
            self.advance();
        }
        word
    }

    fn skip_inline_space(&mut self) {
        while matches!(self.current(), Some(' ' | '\t')) {
            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::LexErrorKind;
    use crate::lexer::{tokenize, Metas};

    #[test]
    fn test_meta_updates_settings() {
        let (_, metas) = tokenize("<test>", "@meta exponent off\n2e3", Metas::default()).unwrap();
        assert!(!metas.exponent);
        assert!(metas.escapes);
    }

    #[test]
    fn test_meta_without_value_means_true() {
        let start = Metas {
            escapes: false,
            ..Metas::default()
        };
        let (_, metas) = tokenize("<test>", "# header\n@meta escapes", start).unwrap();
        assert!(metas.escapes);
    }

    #[test]
    fn test_meta_after_code_rejected() {
        let e = tokenize("<test>", "x\n@meta escapes on", Metas::default()).unwrap_err();
        assert_eq!(e.kind, LexErrorKind::InvalidMeta);
    }

    #[test]
    fn test_unknown_meta_rejected() {
        let e = tokenize("<test>", "@meta colours on", Metas::default()).unwrap_err();
        assert_eq!(e.details, "unknown meta 'colours'");

        let e = tokenize("<test>", "@meta escapes maybe", Metas::default()).unwrap_err();
        assert_eq!(e.kind, LexErrorKind::InvalidMeta);
    }
}
