//! Recursive-descent parser: tokens to syntax tree
//!
//! One routine ([`Parser::parse_statements`]) serves the program and every
//! block body, parameterized by the keywords that end the block. Block
//! openers are tracked on a stack so an unterminated block is reported at
//! its opening keyword rather than at the end of the file.

mod compound;
mod expr;
mod result;

pub use result::ParseResult;

use tracing::trace;

use crate::ast::{
    BreakNode, ContinueNode, ExportNode, ImportNode, Node, ReturnNode, StatementsNode,
};
use crate::error::SyntaxError;
use crate::position::{Position, Span};
use crate::stack::ensure_sufficient_stack;
use crate::token::{Keyword, Token, TokenKind};

/// Parse a token list (ending in [`TokenKind::Eof`]) into a program.
///
/// The program is a [`Node::Statements`]; the first syntax error aborts.
pub fn parse(tokens: Vec<Token>) -> ParseResult<Node> {
    let mut parser = Parser::new(tokens);
    let program = parser.parse_statements(&[])?;

    if !parser.at(&TokenKind::Eof) {
        return Err(parser.unexpected("a newline or end of file"));
    }
    Ok(program)
}

/// Token cursor with the stack of open blocks.
pub struct Parser {
    tokens: Vec<Token>,
    idx: usize,
    block_openers: Vec<Token>,
}

impl Parser {
    /// Create a parser. An `Eof` token is appended if missing.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof) {
            let end = tokens
                .last()
                .map(|t| t.pos_end.clone())
                .unwrap_or_else(|| Position::start_of("<unknown>", ""));
            tokens.push(Token::new(TokenKind::Eof, end.clone(), end));
        }

        Self {
            tokens,
            idx: 0,
            block_openers: Vec::new(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Cursor
    // ═══════════════════════════════════════════════════════════════════

    fn current(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.idx.min(last)]
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.idx += 1;
        }
        token
    }

    fn at(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    fn at_keyword(&self, keyword: Keyword) -> bool {
        self.current().kind.is_keyword(keyword)
    }

    fn at_any_keyword(&self, keywords: &[Keyword]) -> bool {
        keywords.iter().any(|kw| self.at_keyword(*kw))
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        if self.at_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> ParseResult<Token> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> ParseResult<Token> {
        if self.at_keyword(keyword) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("'{}'", keyword)))
        }
    }

    /// Consume an identifier, rejecting keywords with a dedicated message.
    fn expect_identifier(&mut self, what: &str) -> ParseResult<(String, Span)> {
        let token = self.current().clone();
        match &token.kind {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok((name.clone(), token.span()))
            }
            TokenKind::Keyword(kw) => Err(SyntaxError::at(
                format!("'{}' is a keyword and cannot be used as an identifier", kw),
                &token.span(),
            )),
            _ => Err(self.unexpected(what)),
        }
    }

    fn skip_newlines(&mut self) {
        while self.eat(&TokenKind::Newline) {}
    }

    /// End of the most recently consumed token.
    fn prev_end(&self) -> Position {
        match self.idx.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(token) => token.pos_end.clone(),
            None => self.current().pos_start.clone(),
        }
    }

    fn span_from(&self, start: &Position) -> Span {
        let end = self.prev_end();
        if end.index < start.index {
            Span::new(start.clone(), start.clone())
        } else {
            Span::new(start.clone(), end)
        }
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        let token = self.current();
        SyntaxError::at(
            format!("expected {}, found {}", expected, token.kind),
            &token.span(),
        )
    }

    // ═══════════════════════════════════════════════════════════════════
    // Blocks
    // ═══════════════════════════════════════════════════════════════════

    fn enter_block(&mut self, opener: &Token) {
        trace!(opener = %opener.kind, line = opener.pos_start.display_line(), "enter block");
        self.block_openers.push(opener.clone());
    }

    /// Consume the keyword closing the innermost block.
    fn expect_block_end(&mut self, closer: Keyword) -> ParseResult<Token> {
        if self.at_keyword(closer) {
            let token = self.advance();
            if let Some(opener) = self.block_openers.pop() {
                trace!(opener = %opener.kind, "exit block");
            }
            return Ok(token);
        }

        match self.block_openers.last() {
            Some(opener) if self.at(&TokenKind::Eof) || self.current_is_keyword() => {
                Err(SyntaxError::at(
                    format!(
                        "{} block is never closed, expected '{}'",
                        opener.kind, closer
                    ),
                    &opener.span(),
                ))
            }
            _ => Err(self.unexpected(&format!("a newline or '{}'", closer))),
        }
    }

    fn current_is_keyword(&self) -> bool {
        matches!(self.current().kind, TokenKind::Keyword(_))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Statements
    // ═══════════════════════════════════════════════════════════════════

    /// Parse `NEWLINE* statement (NEWLINE+ statement)* NEWLINE*`, stopping at
    /// end of file or at any keyword in `stop`.
    pub fn parse_statements(&mut self, stop: &[Keyword]) -> ParseResult<Node> {
        let start = self.current().pos_start.clone();
        self.skip_newlines();

        let mut statements = Vec::new();
        loop {
            if self.at(&TokenKind::Eof) || self.at_any_keyword(stop) {
                break;
            }

            statements.push(self.parse_statement()?);

            if !self.at(&TokenKind::Newline) {
                break;
            }
            self.skip_newlines();
        }

        Ok(Node::Statements(StatementsNode {
            statements,
            span: self.span_from(&start),
        }))
    }

    /// Parse one statement: a statement-only form or an expression.
    pub fn parse_statement(&mut self) -> ParseResult<Node> {
        ensure_sufficient_stack(|| self.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> ParseResult<Node> {
        let start = self.current().pos_start.clone();

        let TokenKind::Keyword(keyword) = self.current().kind else {
            return self.parse_expr();
        };

        match keyword {
            Keyword::Return => {
                self.advance();
                let value = self.try_register(|p| p.parse_expr()).map(Box::new);
                Ok(Node::Return(ReturnNode {
                    value,
                    span: self.span_from(&start),
                }))
            }
            Keyword::Break => {
                self.advance();
                let label = self.parse_label()?;
                Ok(Node::Break(BreakNode {
                    label,
                    span: self.span_from(&start),
                }))
            }
            Keyword::Continue => {
                self.advance();
                let label = self.parse_label()?;
                Ok(Node::Continue(ContinueNode {
                    label,
                    span: self.span_from(&start),
                }))
            }
            Keyword::Import => {
                self.advance();
                let (name, _) = self.expect_identifier("a module name")?;
                let alias = if self.eat_keyword(Keyword::As) {
                    Some(self.expect_identifier("an alias")?.0)
                } else {
                    None
                };
                Ok(Node::Import(ImportNode {
                    name,
                    alias,
                    span: self.span_from(&start),
                }))
            }
            Keyword::Export => self.parse_export(start),
            _ => self.parse_expr(),
        }
    }

    fn parse_export(&mut self, start: Position) -> ParseResult<Node> {
        self.advance();
        let value = self.parse_expr()?;

        let name = if self.eat_keyword(Keyword::As) {
            self.expect_identifier("an export name")?.0
        } else {
            let implied = match &value {
                Node::VarAccess(n) => Some(n.name.clone()),
                Node::FuncDef(n) => n.name.clone(),
                Node::ClassDef(n) => Some(n.name.clone()),
                _ => None,
            };
            match implied {
                Some(name) => name,
                None => return Err(self.unexpected("'as' and a name for the exported value")),
            }
        };

        Ok(Node::Export(ExportNode {
            value: Box::new(value),
            name,
            span: self.span_from(&start),
        }))
    }

    /// Optional `:label` after a loop keyword, `break` or `continue`.
    fn parse_label(&mut self) -> ParseResult<Option<String>> {
        if self.eat(&TokenKind::Colon) {
            Ok(Some(self.expect_identifier("a label")?.0))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{tokenize, Metas};

    fn parse_str(text: &str) -> ParseResult<Node> {
        let (tokens, _) = tokenize("<test>", text, Metas::default()).unwrap();
        parse(tokens)
    }

    fn render(text: &str) -> String {
        parse_str(text).unwrap().to_string()
    }

    #[test]
    fn test_statements_split_on_newlines() {
        assert_eq!(render("1\n\n2; 3"), "(block 1 2 3)");
        assert_eq!(render(""), "(block)");
    }

    #[test]
    fn test_return_operand_is_optional() {
        assert_eq!(render("return"), "(block (return))");
        assert_eq!(render("return 1 + 2"), "(block (return (+ 1 2)))");
    }

    #[test]
    fn test_labels() {
        assert_eq!(render("break:outer"), "(block (break:outer))");
        assert_eq!(render("continue"), "(block (continue))");
    }

    #[test]
    fn test_import_and_export() {
        assert_eq!(render("import math as m"), "(block (import math as m))");
        assert_eq!(render("export x"), "(block (export x as x))");
        assert_eq!(render("export 1 + 2 as three"), "(block (export (+ 1 2) as three))");
        assert!(parse_str("export 1 + 2").is_err());
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        let e = parse_str("1 2").unwrap_err();
        assert_eq!(e.details, "expected a newline or end of file, found int 2");
    }

    #[test]
    fn test_keyword_as_identifier() {
        let e = parse_str("var end = 1").unwrap_err();
        assert_eq!(
            e.details,
            "'end' is a keyword and cannot be used as an identifier"
        );
    }
}
