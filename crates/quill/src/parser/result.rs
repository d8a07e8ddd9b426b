//! Parse results and backtracking

use super::Parser;
use crate::error::SyntaxError;

/// Result of a parse routine: a node or the first syntax error.
pub type ParseResult<T> = Result<T, SyntaxError>;

impl Parser {
    /// Attempt a sub-parse, rewinding the cursor if it fails.
    ///
    /// The sub-parse's error is discarded; the caller treats the construct
    /// as absent. Used for optional trailing operands (`return x`,
    /// `write a >> b line`) whose absence cannot be seen from one token.
    pub(super) fn try_register<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> Option<T> {
        let saved_idx = self.idx;
        let saved_blocks = self.block_openers.len();

        match parse(self) {
            Ok(value) => Some(value),
            Err(_) => {
                self.idx = saved_idx;
                self.block_openers.truncate(saved_blocks);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::{tokenize, Metas};
    use crate::parser::Parser;
    use crate::token::TokenKind;

    #[test]
    fn test_try_register_rewinds_on_failure() {
        let (tokens, _) = tokenize("<test>", "end", Metas::default()).unwrap();
        let mut parser = Parser::new(tokens);

        assert!(parser.try_register(|p| p.parse_expr()).is_none());
        assert!(parser.current().kind.is_keyword(crate::token::Keyword::End));
    }

    #[test]
    fn test_try_register_keeps_progress_on_success() {
        let (tokens, _) = tokenize("<test>", "1 + 2\n", Metas::default()).unwrap();
        let mut parser = Parser::new(tokens);

        let node = parser.try_register(|p| p.parse_expr()).unwrap();
        assert_eq!(node.to_string(), "(+ 1 2)");
        assert_eq!(parser.current().kind, TokenKind::Newline);
    }
}
