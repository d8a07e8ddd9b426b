//! Compound expressions: conditionals, loops, functions and classes
//!
//! Each form has an inline variant (a single statement on the same line)
//! and a block variant (a newline, then statements up to the closing
//! keyword).

use std::collections::HashSet;
use std::rc::Rc;

use super::{ParseResult, Parser};
use crate::ast::{
    ClassDefNode, DoWhileNode, ForInNode, ForNode, FuncDefNode, IfCase, IfNode, LoopNode, Node,
    WhileNode,
};
use crate::error::SyntaxError;
use crate::token::{Keyword, Token, TokenKind};

const IF_STOP: &[Keyword] = &[Keyword::Elif, Keyword::Else, Keyword::End];

impl Parser {
    /// Loop or function body: one inline statement, or a block closed by `end`.
    ///
    /// Returns the body and whether it was a block.
    fn parse_body(&mut self, opener: &Token) -> ParseResult<(Node, bool)> {
        if self.at(&TokenKind::Newline) {
            self.enter_block(opener);
            let body = self.parse_statements(&[Keyword::End])?;
            self.expect_block_end(Keyword::End)?;
            Ok((body, true))
        } else {
            Ok((self.parse_statement()?, false))
        }
    }

    pub(super) fn parse_if(&mut self) -> ParseResult<Node> {
        let opener = self.advance();
        let start = opener.pos_start.clone();

        let condition = self.parse_expr()?;
        self.expect_keyword(Keyword::Then)?;

        let mut cases = Vec::new();
        let mut else_case = None;
        let block = self.at(&TokenKind::Newline);

        if block {
            self.enter_block(&opener);
            let body = self.parse_statements(IF_STOP)?;
            cases.push(IfCase { condition, body });

            loop {
                if self.eat_keyword(Keyword::Elif) {
                    let condition = self.parse_expr()?;
                    self.expect_keyword(Keyword::Then)?;
                    let body = self.parse_statements(IF_STOP)?;
                    cases.push(IfCase { condition, body });
                } else if self.eat_keyword(Keyword::Else) {
                    else_case = Some(Box::new(self.parse_statements(&[Keyword::End])?));
                    break;
                } else {
                    break;
                }
            }
            self.expect_block_end(Keyword::End)?;
        } else {
            let body = self.parse_statement()?;
            cases.push(IfCase { condition, body });

            loop {
                if self.eat_keyword(Keyword::Elif) {
                    let condition = self.parse_expr()?;
                    self.expect_keyword(Keyword::Then)?;
                    let body = self.parse_statement()?;
                    cases.push(IfCase { condition, body });
                } else if self.eat_keyword(Keyword::Else) {
                    else_case = Some(Box::new(self.parse_statement()?));
                    break;
                } else {
                    break;
                }
            }
        }

        Ok(Node::If(IfNode {
            cases,
            else_case,
            block,
            span: self.span_from(&start),
        }))
    }

    pub(super) fn parse_for(&mut self) -> ParseResult<Node> {
        let opener = self.advance();
        let start = opener.pos_start.clone();
        let label = self.parse_label()?;
        let (var, _) = self.expect_identifier("a loop variable")?;

        if self.eat(&TokenKind::Eq) {
            let from = self.parse_expr()?;
            self.expect_keyword(Keyword::To)?;
            let to = self.parse_expr()?;
            let step = if self.eat_keyword(Keyword::Step) {
                Some(Box::new(self.parse_expr()?))
            } else {
                None
            };
            self.expect_keyword(Keyword::Then)?;
            let (body, block) = self.parse_body(&opener)?;

            Ok(Node::For(ForNode {
                label,
                var,
                start: Box::new(from),
                end: Box::new(to),
                step,
                body: Box::new(body),
                block,
                span: self.span_from(&start),
            }))
        } else if self.eat_keyword(Keyword::In) {
            let iterable = self.parse_expr()?;
            self.expect_keyword(Keyword::Then)?;
            let (body, block) = self.parse_body(&opener)?;

            Ok(Node::ForIn(ForInNode {
                label,
                var,
                iterable: Box::new(iterable),
                body: Box::new(body),
                block,
                span: self.span_from(&start),
            }))
        } else {
            Err(self.unexpected("'=' or 'in'"))
        }
    }

    pub(super) fn parse_while(&mut self) -> ParseResult<Node> {
        let opener = self.advance();
        let start = opener.pos_start.clone();
        let label = self.parse_label()?;

        let condition = self.parse_expr()?;
        self.expect_keyword(Keyword::Then)?;
        let (body, block) = self.parse_body(&opener)?;

        Ok(Node::While(WhileNode {
            label,
            condition: Box::new(condition),
            body: Box::new(body),
            block,
            span: self.span_from(&start),
        }))
    }

    pub(super) fn parse_loop(&mut self) -> ParseResult<Node> {
        let opener = self.advance();
        let start = opener.pos_start.clone();
        let label = self.parse_label()?;

        self.eat_keyword(Keyword::Then);
        let (body, block) = self.parse_body(&opener)?;

        Ok(Node::Loop(LoopNode {
            label,
            body: Box::new(body),
            block,
            span: self.span_from(&start),
        }))
    }

    /// `do body then loop while condition`
    pub(super) fn parse_do(&mut self) -> ParseResult<Node> {
        let opener = self.advance();
        let start = opener.pos_start.clone();
        let label = self.parse_label()?;

        let block = self.at(&TokenKind::Newline);
        let body = if block {
            self.enter_block(&opener);
            let body = self.parse_statements(&[Keyword::Then])?;
            self.expect_block_end(Keyword::Then)?;
            body
        } else {
            let body = self.parse_statement()?;
            self.expect_keyword(Keyword::Then)?;
            body
        };

        self.expect_keyword(Keyword::Loop)?;
        self.expect_keyword(Keyword::While)?;
        let condition = self.parse_expr()?;

        Ok(Node::DoWhile(DoWhileNode {
            label,
            body: Box::new(body),
            condition: Box::new(condition),
            block,
            span: self.span_from(&start),
        }))
    }

    pub(super) fn parse_def(&mut self) -> ParseResult<Node> {
        let opener = self.advance();
        let start = opener.pos_start.clone();

        let name = if self.at(&TokenKind::LParen) {
            None
        } else {
            Some(self.expect_identifier("a function name or '('")?.0)
        };

        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        let mut optional: Vec<(String, Rc<Node>)> = Vec::new();
        let mut seen = HashSet::new();

        if !self.at(&TokenKind::RParen) {
            loop {
                let (param, span) = self.expect_identifier("a parameter name")?;
                if !seen.insert(param.clone()) {
                    return Err(SyntaxError::at(
                        format!("duplicate parameter '{}'", param),
                        &span,
                    ));
                }

                if self.eat(&TokenKind::Eq) {
                    let default = self.parse_expr()?;
                    optional.push((param, Rc::new(default)));
                } else if !optional.is_empty() {
                    return Err(SyntaxError::at(
                        format!(
                            "required parameter '{}' cannot follow optional parameters",
                            param
                        ),
                        &span,
                    ));
                } else {
                    params.push(param);
                }

                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen)?;

        let (body, auto_return) = if self.eat(&TokenKind::Arrow) {
            (self.parse_expr()?, true)
        } else if self.at(&TokenKind::Newline) {
            self.enter_block(&opener);
            let body = self.parse_statements(&[Keyword::End])?;
            self.expect_block_end(Keyword::End)?;
            (body, false)
        } else {
            return Err(self.unexpected("'->' or a newline"));
        };

        Ok(Node::FuncDef(FuncDefNode {
            name,
            params,
            optional,
            body: Rc::new(body),
            auto_return,
            span: self.span_from(&start),
        }))
    }

    pub(super) fn parse_class(&mut self) -> ParseResult<Node> {
        let opener = self.advance();
        let start = opener.pos_start.clone();
        let (name, _) = self.expect_identifier("a class name")?;

        let parent = if self.eat(&TokenKind::LParen) {
            let parent = self.parse_chain()?;
            self.expect(&TokenKind::RParen)?;
            Some(Box::new(parent))
        } else {
            None
        };

        let body = if self.eat(&TokenKind::Arrow) {
            self.parse_statement()?
        } else if self.at(&TokenKind::Newline) {
            self.enter_block(&opener);
            let body = self.parse_statements(&[Keyword::End])?;
            self.expect_block_end(Keyword::End)?;
            body
        } else {
            return Err(self.unexpected("'->' or a newline"));
        };

        Ok(Node::ClassDef(ClassDefNode {
            name,
            parent,
            body: Box::new(body),
            span: self.span_from(&start),
        }))
    }
}
