//! Expressions, from assignment forms down to atoms

use super::{ParseResult, Parser};
use crate::ast::{
    AssertNode, AssignOp, AttributeNode, BinOpNode, BinaryOp, CallNode, CompareNode, CompareOp,
    DebugPrintNode, DefaultNode, DeleteNode, FallbackNode, ListNode, Node, Number, NumberNode,
    ReadNode, StringNode, Target, UnaryOp, UnaryOpNode, VarAccessNode, VarAssignNode, WriteNode,
};
use crate::error::SyntaxError;
use crate::position::{Position, Span};
use crate::stack::ensure_sufficient_stack;
use crate::token::{Keyword, TokenKind};

fn assign_op(kind: &TokenKind) -> Option<AssignOp> {
    let op = match kind {
        TokenKind::Eq => return Some(AssignOp::Set),
        TokenKind::PlusEq => BinaryOp::Add,
        TokenKind::MinusEq => BinaryOp::Sub,
        TokenKind::StarEq => BinaryOp::Mul,
        TokenKind::SlashEq => BinaryOp::Div,
        TokenKind::DoubleSlashEq => BinaryOp::FloorDiv,
        TokenKind::PercentEq => BinaryOp::Mod,
        TokenKind::CaretEq => BinaryOp::Pow,
        TokenKind::PipeEq => BinaryOp::BitOr,
        TokenKind::AmpersandEq => BinaryOp::BitAnd,
        TokenKind::DoubleCaretEq => BinaryOp::BitXor,
        _ => return None,
    };
    Some(AssignOp::Compound(op))
}

fn logic_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Keyword(Keyword::And) => Some(BinaryOp::And),
        TokenKind::Keyword(Keyword::Or) => Some(BinaryOp::Or),
        TokenKind::Keyword(Keyword::Xor) => Some(BinaryOp::Xor),
        TokenKind::Pipe => Some(BinaryOp::BitOr),
        TokenKind::Ampersand => Some(BinaryOp::BitAnd),
        TokenKind::DoubleCaret => Some(BinaryOp::BitXor),
        _ => None,
    }
}

fn compare_op(kind: &TokenKind) -> Option<CompareOp> {
    match kind {
        TokenKind::EqEq => Some(CompareOp::Eq),
        TokenKind::NotEq => Some(CompareOp::NotEq),
        TokenKind::Lt => Some(CompareOp::Lt),
        TokenKind::Gt => Some(CompareOp::Gt),
        TokenKind::Le => Some(CompareOp::Le),
        TokenKind::Ge => Some(CompareOp::Ge),
        _ => None,
    }
}

fn additive_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        _ => None,
    }
}

fn multiplicative_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::DoubleSlash => Some(BinaryOp::FloorDiv),
        TokenKind::Percent => Some(BinaryOp::Mod),
        _ => None,
    }
}

fn bin_op(left: Node, op: BinaryOp, right: Node) -> Node {
    let span = left.span().to(right.span());
    Node::BinOp(BinOpNode {
        left: Box::new(left),
        op,
        right: Box::new(right),
        span,
    })
}

impl Parser {
    /// Parse an expression, including the assignment-like forms.
    pub(super) fn parse_expr(&mut self) -> ParseResult<Node> {
        ensure_sufficient_stack(|| self.parse_expr_inner())
    }

    fn parse_expr_inner(&mut self) -> ParseResult<Node> {
        match self.current().kind {
            TokenKind::Keyword(Keyword::Var) => self.parse_var_assign(),
            TokenKind::Keyword(Keyword::Del) => {
                let start = self.advance().pos_start;
                let (name, _) = self.expect_identifier("a variable name")?;
                Ok(Node::Delete(DeleteNode {
                    name,
                    span: self.span_from(&start),
                }))
            }
            TokenKind::Keyword(Keyword::Write) => self.parse_write(),
            TokenKind::Keyword(Keyword::Read) => self.parse_read(),
            TokenKind::Keyword(Keyword::Assert) => {
                let start = self.advance().pos_start;
                let condition = self.parse_expr()?;
                let message = if self.eat(&TokenKind::Comma) {
                    Some(Box::new(self.parse_expr()?))
                } else {
                    None
                };
                Ok(Node::Assert(AssertNode {
                    condition: Box::new(condition),
                    message,
                    span: self.span_from(&start),
                }))
            }
            _ => self.parse_fallback(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Assignment-like forms
    // ═══════════════════════════════════════════════════════════════════

    fn parse_var_assign(&mut self) -> ParseResult<Node> {
        let start = self.advance().pos_start;

        let mut targets = vec![self.parse_target()?];
        while self.eat(&TokenKind::Comma) {
            targets.push(self.parse_target()?);
        }

        let Some(op) = assign_op(&self.current().kind) else {
            return Err(self.unexpected("'=' or a compound assignment operator"));
        };
        self.advance();

        let mut values = vec![self.parse_expr()?];
        while self.eat(&TokenKind::Comma) {
            values.push(self.parse_expr()?);
        }

        Ok(Node::VarAssign(VarAssignNode {
            targets,
            op,
            values,
            span: self.span_from(&start),
        }))
    }

    /// `name`, `a.b.name` or a chain with calls such as `get().name`.
    ///
    /// Every step may carry call suffixes except the last, which names the
    /// binding or attribute being assigned.
    fn parse_target(&mut self) -> ParseResult<Target> {
        let start = self.current().pos_start.clone();

        let mut steps = vec![self.parse_target_step("a variable name")?];
        while self.eat(&TokenKind::Dot) {
            steps.push(self.parse_target_step("an attribute name")?);
        }

        let span = self.span_from(&start);
        let Some(last) = steps.pop() else {
            return Err(self.unexpected("a variable name"));
        };
        let name = match last {
            Node::VarAccess(access) => access.name,
            other => {
                return Err(SyntaxError::at(
                    "cannot assign to the result of a call",
                    other.span(),
                ))
            }
        };

        let mut path = steps.into_iter();
        let object = path.next().map(|base| {
            let steps: Vec<Node> = path.collect();
            match steps.last() {
                None => base,
                Some(last) => {
                    let span = base.span().to(last.span());
                    Node::Attribute(AttributeNode {
                        base: Box::new(base),
                        steps,
                        span,
                    })
                }
            }
        });

        Ok(Target {
            object: object.map(Box::new),
            name,
            span,
        })
    }

    fn parse_target_step(&mut self, expected: &str) -> ParseResult<Node> {
        let (name, span) = self.expect_identifier(expected)?;
        self.parse_call_suffixes(Node::VarAccess(VarAccessNode { name, span }))
    }

    fn parse_write(&mut self) -> ParseResult<Node> {
        let start = self.advance().pos_start;
        let text = self.parse_expr()?;

        let overwrite = match self.current().kind {
            TokenKind::Redirect => false,
            TokenKind::OverwriteRedirect => true,
            _ => return Err(self.unexpected("'>>' or '!>>'")),
        };
        self.advance();

        let target = self.parse_expr()?;
        let line = self.try_register(|p| p.parse_expr()).map(Box::new);

        Ok(Node::Write(WriteNode {
            text: Box::new(text),
            overwrite,
            target: Box::new(target),
            line,
            span: self.span_from(&start),
        }))
    }

    fn parse_read(&mut self) -> ParseResult<Node> {
        let start = self.advance().pos_start;
        let target = self.parse_expr()?;

        let into = if self.eat(&TokenKind::Redirect) {
            Some(self.expect_identifier("a variable name")?.0)
        } else {
            None
        };
        let line = self.try_register(|p| p.parse_expr()).map(Box::new);

        Ok(Node::Read(ReadNode {
            target: Box::new(target),
            into,
            line,
            span: self.span_from(&start),
        }))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Operator precedence levels
    // ═══════════════════════════════════════════════════════════════════

    fn parse_fallback(&mut self) -> ParseResult<Node> {
        let first = self.parse_logic()?;
        if !self.at(&TokenKind::Question) {
            return Ok(first);
        }

        let mut operands = vec![first];
        while self.eat(&TokenKind::Question) {
            operands.push(self.parse_logic()?);
        }

        let span = operands[0].span().to(operands[operands.len() - 1].span());
        Ok(Node::Fallback(FallbackNode { operands, span }))
    }

    fn parse_logic(&mut self) -> ParseResult<Node> {
        let mut left = self.parse_comparison()?;
        while let Some(op) = logic_op(&self.current().kind) {
            self.advance();
            let right = self.parse_comparison()?;
            left = bin_op(left, op, right);
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> ParseResult<Node> {
        if self.at_keyword(Keyword::Not) {
            let start = self.advance().pos_start;
            let operand = ensure_sufficient_stack(|| self.parse_comparison())?;
            return Ok(Node::UnaryOp(UnaryOpNode {
                op: UnaryOp::Not,
                operand: Box::new(operand),
                span: self.span_from(&start),
            }));
        }

        let first = self.parse_arith()?;
        let mut rest = Vec::new();
        while let Some(op) = compare_op(&self.current().kind) {
            self.advance();
            rest.push((op, self.parse_arith()?));
        }

        if rest.is_empty() {
            return Ok(first);
        }
        let span = first.span().to(rest[rest.len() - 1].1.span());
        Ok(Node::Compare(CompareNode {
            first: Box::new(first),
            rest,
            span,
        }))
    }

    fn parse_arith(&mut self) -> ParseResult<Node> {
        let mut left = self.parse_term()?;
        while let Some(op) = additive_op(&self.current().kind) {
            self.advance();
            let right = self.parse_term()?;
            left = bin_op(left, op, right);
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> ParseResult<Node> {
        let mut left = self.parse_factor()?;
        while let Some(op) = multiplicative_op(&self.current().kind) {
            self.advance();
            let right = self.parse_factor()?;
            left = bin_op(left, op, right);
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> ParseResult<Node> {
        let op = match self.current().kind {
            TokenKind::Plus => UnaryOp::Pos,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Tilde => UnaryOp::BitNot,
            _ => return self.parse_power(),
        };

        let start = self.advance().pos_start;
        let operand = ensure_sufficient_stack(|| self.parse_factor())?;
        Ok(Node::UnaryOp(UnaryOpNode {
            op,
            operand: Box::new(operand),
            span: self.span_from(&start),
        }))
    }

    /// `chain ('^' factor)?`; the right operand recurses through `factor`,
    /// so `2 ^ 3 ^ 2` is `2 ^ (3 ^ 2)`.
    fn parse_power(&mut self) -> ParseResult<Node> {
        let base = self.parse_chain()?;
        if !self.eat(&TokenKind::Caret) {
            return Ok(base);
        }
        let exponent = ensure_sufficient_stack(|| self.parse_factor())?;
        Ok(bin_op(base, BinaryOp::Pow, exponent))
    }

    /// `call ('.' IDENT call-suffix*)*`
    pub(super) fn parse_chain(&mut self) -> ParseResult<Node> {
        let base = self.parse_call()?;
        if !self.at(&TokenKind::Dot) {
            return Ok(base);
        }

        let mut steps = Vec::new();
        while self.eat(&TokenKind::Dot) {
            let (name, span) = self.expect_identifier("an attribute name")?;
            let step = Node::VarAccess(VarAccessNode { name, span });
            steps.push(self.parse_call_suffixes(step)?);
        }

        let span = base.span().to(steps[steps.len() - 1].span());
        Ok(Node::Attribute(AttributeNode {
            base: Box::new(base),
            steps,
            span,
        }))
    }

    fn parse_call(&mut self) -> ParseResult<Node> {
        let atom = self.parse_atom()?;
        self.parse_call_suffixes(atom)
    }

    fn parse_call_suffixes(&mut self, mut callee: Node) -> ParseResult<Node> {
        while self.eat(&TokenKind::LParen) {
            let args = self.parse_arguments()?;
            let span = self.span_from(&callee.span().start);
            callee = Node::Call(CallNode {
                callee: Box::new(callee),
                args,
                span,
            });
        }
        Ok(callee)
    }

    /// Arguments after `(`, through the closing `)`.
    fn parse_arguments(&mut self) -> ParseResult<Vec<Node>> {
        let mut args = Vec::new();
        self.skip_newlines();
        if self.eat(&TokenKind::RParen) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expr()?);
            self.skip_newlines();
            if self.eat(&TokenKind::Comma) {
                self.skip_newlines();
                continue;
            }
            self.expect(&TokenKind::RParen)?;
            return Ok(args);
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Atoms
    // ═══════════════════════════════════════════════════════════════════

    fn parse_atom(&mut self) -> ParseResult<Node> {
        let token = self.current().clone();
        let start = token.pos_start.clone();

        match &token.kind {
            TokenKind::Int(n) => {
                self.advance();
                self.parse_exponent(Number::Int(*n), token.span())
            }
            TokenKind::Float(x) => {
                self.advance();
                self.parse_exponent(Number::Float(*x), token.span())
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Node::Str(StringNode {
                    value: s.clone(),
                    span: token.span(),
                }))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Node::VarAccess(VarAccessNode {
                    name: name.clone(),
                    span: token.span(),
                }))
            }
            TokenKind::Dollar => {
                self.advance();
                let (name, _) = self.expect_identifier("a variable name after '$'")?;
                Ok(Node::DebugPrint(DebugPrintNode {
                    name,
                    span: self.span_from(&start),
                }))
            }
            TokenKind::LParen => {
                self.advance();
                self.skip_newlines();
                let inner = self.parse_expr()?;
                self.skip_newlines();
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::LSquare => self.parse_list(start),
            TokenKind::Keyword(Keyword::Default) => {
                self.advance();
                Ok(Node::Default(DefaultNode { span: token.span() }))
            }
            TokenKind::Keyword(Keyword::If) => self.parse_if(),
            TokenKind::Keyword(Keyword::For) => self.parse_for(),
            TokenKind::Keyword(Keyword::While) => self.parse_while(),
            TokenKind::Keyword(Keyword::Do) => self.parse_do(),
            TokenKind::Keyword(Keyword::Loop) => self.parse_loop(),
            TokenKind::Keyword(Keyword::Def) => self.parse_def(),
            TokenKind::Keyword(Keyword::Class) => self.parse_class(),
            _ => Err(self.unexpected("an expression")),
        }
    }

    /// Optional `e[+-]digits` after a number literal.
    fn parse_exponent(&mut self, base: Number, span: Span) -> ParseResult<Node> {
        let number = Node::Number(NumberNode { value: base, span });
        if !self.at(&TokenKind::Exponent) {
            return Ok(number);
        }
        self.advance();

        let exponent_start = self.current().pos_start.clone();
        let negative = if self.eat(&TokenKind::Minus) {
            true
        } else {
            self.eat(&TokenKind::Plus);
            false
        };

        let TokenKind::Int(digits) = self.current().kind else {
            return Err(self.unexpected("exponent digits"));
        };
        self.advance();

        let exponent = Node::Number(NumberNode {
            value: Number::Int(if negative { -digits } else { digits }),
            span: self.span_from(&exponent_start),
        });
        Ok(bin_op(number, BinaryOp::Exponent, exponent))
    }

    fn parse_list(&mut self, start: Position) -> ParseResult<Node> {
        self.advance();
        let mut elements = Vec::new();
        self.skip_newlines();

        if !self.eat(&TokenKind::RSquare) {
            loop {
                elements.push(self.parse_expr()?);
                self.skip_newlines();
                if self.eat(&TokenKind::Comma) {
                    self.skip_newlines();
                    continue;
                }
                if !self.eat(&TokenKind::RSquare) {
                    return Err(self.unexpected("',' or ']'"));
                }
                break;
            }
        }

        Ok(Node::List(ListNode {
            elements,
            span: self.span_from(&start),
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::{tokenize, Metas};
    use crate::parser::parse;

    fn render(text: &str) -> String {
        let (tokens, _) = tokenize("<test>", text, Metas::default()).unwrap();
        match parse(tokens).unwrap() {
            crate::ast::Node::Statements(block) if block.statements.len() == 1 => {
                block.statements[0].to_string()
            }
            other => other.to_string(),
        }
    }

    fn error(text: &str) -> String {
        let (tokens, _) = tokenize("<test>", text, Metas::default()).unwrap();
        parse(tokens).unwrap_err().details
    }

    #[test]
    fn test_precedence() {
        assert_eq!(render("1 + 2 * 3"), "(+ 1 (* 2 3))");
        assert_eq!(render("(1 + 2) * 3"), "(* (+ 1 2) 3)");
        assert_eq!(render("-2 ^ 2"), "(- (^ 2 2))");
        assert_eq!(render("2 ^ 3 ^ 2"), "(^ 2 (^ 3 2))");
        assert_eq!(render("a or b and c"), "(and (or a b) c)");
    }

    #[test]
    fn test_chained_comparison_is_one_node() {
        assert_eq!(render("1 < 2 <= 3"), "(compare 1 < 2 <= 3)");
        assert_eq!(render("not a == b"), "(not (compare a == b))");
    }

    #[test]
    fn test_fallback_chain() {
        assert_eq!(render("a ? b ? 3"), "(? a b 3)");
    }

    #[test]
    fn test_assignment_targets() {
        assert_eq!(render("var a, b.c = 1, 2"), "(var a b.c = 1 2)");
        assert_eq!(render("var a.b.c += 1"), "(var (. a b).c += 1)");
        assert_eq!(error("var a 1"), "expected '=' or a compound assignment operator, found int 1");
    }

    #[test]
    fn test_assignment_targets_through_calls() {
        assert_eq!(render("var get().v = 5"), "(var (call get).v = 5)");
        assert_eq!(render("var a.b(1).c = 2"), "(var (. a (call b 1)).c = 2)");
        assert_eq!(error("var f() = 1"), "cannot assign to the result of a call");
        assert_eq!(error("var a.f(2) = 1"), "cannot assign to the result of a call");
    }

    #[test]
    fn test_calls_and_attributes() {
        assert_eq!(render("f(1, default)(2)"), "(call (call f 1 default) 2)");
        assert_eq!(render("a.b(1).c"), "(. a (call b 1) c)");
        assert_eq!(render("print(\n  1,\n  2\n)"), "(call print 1 2)");
    }

    #[test]
    fn test_exponent_literals() {
        assert_eq!(render("2e3"), "(e 2 3)");
        assert_eq!(render("1.5e-2"), "(e 1.5 -2)");
    }

    #[test]
    fn test_io_forms() {
        assert_eq!(render("write 'x' >> 'f.txt'"), "(write \"x\" >> \"f.txt\")");
        assert_eq!(render("write 'x' !>> 'f.txt' 3"), "(write \"x\" !>> \"f.txt\" 3)");
        assert_eq!(render("read 'f.txt' >> text 2"), "(read \"f.txt\" >> text 2)");
        assert_eq!(render("read '<stdin>'"), "(read \"<stdin>\")");
    }

    #[test]
    fn test_misc_atoms() {
        assert_eq!(render("[1, [2], 'a']"), "(list 1 (list 2) \"a\")");
        assert_eq!(render("$x"), "$x");
        assert_eq!(render("del x"), "(del x)");
        assert_eq!(render("assert x, 'msg'"), "(assert x \"msg\")");
        assert_eq!(error("1 +"), "expected an expression, found end of file");
    }
}
