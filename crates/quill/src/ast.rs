//! Syntax tree produced by the parser
//!
//! Every node carries the span of the source it was parsed from. Nodes are
//! immutable after parsing; function bodies and default-value expressions
//! are held in `Rc` so that function values can share them.

use std::fmt;
use std::rc::Rc;

use crate::position::Span;

// ═══════════════════════════════════════════════════════════════════════
// Operators
// ═══════════════════════════════════════════════════════════════════════

/// Binary operators (arithmetic, bitwise and boolean).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `//`
    FloorDiv,
    /// `%`
    Mod,
    /// `^`
    Pow,
    /// `|`
    BitOr,
    /// `&`
    BitAnd,
    /// `^^`
    BitXor,
    /// `and` (short-circuits)
    And,
    /// `or` (short-circuits)
    Or,
    /// `xor`
    Xor,
    /// `e` suffix: `left * 10 ^ right`
    Exponent,
}

impl BinaryOp {
    /// Source spelling, used in error messages and the tree printer.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "^",
            BinaryOp::BitOr => "|",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitXor => "^^",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
            BinaryOp::Exponent => "e",
        }
    }
}

/// Comparison operators; chains of these form one [`CompareNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `==`
    Eq,
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
}

impl CompareOp {
    /// Source spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Le => "<=",
            CompareOp::Ge => ">=",
        }
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `+`
    Pos,
    /// `~`
    BitNot,
    /// `not`
    Not,
}

impl UnaryOp {
    /// Source spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::BitNot => "~",
            UnaryOp::Not => "not",
        }
    }
}

/// Assignment operators; compound forms apply a [`BinaryOp`] first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    /// `=`
    Set,
    /// `op=`
    Compound(BinaryOp),
}

impl AssignOp {
    /// Source spelling.
    pub fn as_str(self) -> String {
        match self {
            AssignOp::Set => "=".to_string(),
            AssignOp::Compound(op) => format!("{}=", op.as_str()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Nodes
// ═══════════════════════════════════════════════════════════════════════

/// A syntax tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Integer or float literal
    Number(NumberNode),
    /// String literal
    Str(StringNode),
    /// `[a, b, c]`
    List(ListNode),
    /// Name lookup
    VarAccess(VarAccessNode),
    /// `$name`
    DebugPrint(DebugPrintNode),
    /// `default`
    Default(DefaultNode),
    /// `var a, b.c = x, y`
    VarAssign(VarAssignNode),
    /// `del name`
    Delete(DeleteNode),
    /// Binary operation
    BinOp(BinOpNode),
    /// Chained comparison
    Compare(CompareNode),
    /// Prefix operation
    UnaryOp(UnaryOpNode),
    /// `a ? b ? c`
    Fallback(FallbackNode),
    /// `if ... elif ... else`
    If(IfNode),
    /// Numeric `for i = a to b step c`
    For(ForNode),
    /// `for x in xs`
    ForIn(ForInNode),
    /// `while cond`
    While(WhileNode),
    /// `do ... then loop while cond`
    DoWhile(DoWhileNode),
    /// `loop`
    Loop(LoopNode),
    /// Function definition
    FuncDef(FuncDefNode),
    /// Class definition
    ClassDef(ClassDefNode),
    /// `callee(args)`
    Call(CallNode),
    /// `base.step.step`
    Attribute(AttributeNode),
    /// `return`
    Return(ReturnNode),
    /// `break`
    Break(BreakNode),
    /// `continue`
    Continue(ContinueNode),
    /// `import name as alias`
    Import(ImportNode),
    /// `export value as name`
    Export(ExportNode),
    /// `write text >> target line`
    Write(WriteNode),
    /// `read target >> name line`
    Read(ReadNode),
    /// `assert cond, message`
    Assert(AssertNode),
    /// Statement sequence
    Statements(StatementsNode),
}

/// Literal number value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
}

/// Numeric literal.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberNode {
    /// Literal value
    pub value: Number,
    /// Source span
    pub span: Span,
}

/// String literal.
#[derive(Debug, Clone, PartialEq)]
pub struct StringNode {
    /// Literal text with escapes processed
    pub value: String,
    /// Source span
    pub span: Span,
}

/// List literal.
#[derive(Debug, Clone, PartialEq)]
pub struct ListNode {
    /// Element expressions
    pub elements: Vec<Node>,
    /// Source span
    pub span: Span,
}

/// Name lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct VarAccessNode {
    /// Looked-up name
    pub name: String,
    /// Source span
    pub span: Span,
}

/// `$name` debug print.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugPrintNode {
    /// Printed name
    pub name: String,
    /// Source span
    pub span: Span,
}

/// `default` sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultNode {
    /// Source span
    pub span: Span,
}

/// Assignment target: a name, or an attribute of an object expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    /// Object owning the attribute, `None` for a plain variable
    pub object: Option<Box<Node>>,
    /// Variable or attribute name
    pub name: String,
    /// Source span
    pub span: Span,
}

/// `var targets op values`.
#[derive(Debug, Clone, PartialEq)]
pub struct VarAssignNode {
    /// Positional targets
    pub targets: Vec<Target>,
    /// Assignment operator
    pub op: AssignOp,
    /// Positional values
    pub values: Vec<Node>,
    /// Source span
    pub span: Span,
}

/// `del name`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteNode {
    /// Removed name
    pub name: String,
    /// Source span
    pub span: Span,
}

/// Binary operation.
#[derive(Debug, Clone, PartialEq)]
pub struct BinOpNode {
    /// Left operand
    pub left: Box<Node>,
    /// Operator
    pub op: BinaryOp,
    /// Right operand
    pub right: Box<Node>,
    /// Source span
    pub span: Span,
}

/// `a < b <= c`: evaluated left to right, stopping at the first false link.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareNode {
    /// First operand
    pub first: Box<Node>,
    /// Following operator/operand pairs
    pub rest: Vec<(CompareOp, Node)>,
    /// Source span
    pub span: Span,
}

/// Prefix operation.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOpNode {
    /// Operator
    pub op: UnaryOp,
    /// Operand
    pub operand: Box<Node>,
    /// Source span
    pub span: Span,
}

/// `a ? b ? c`.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackNode {
    /// Operands in order
    pub operands: Vec<Node>,
    /// Source span
    pub span: Span,
}

/// One `if`/`elif` arm.
#[derive(Debug, Clone, PartialEq)]
pub struct IfCase {
    /// Condition
    pub condition: Node,
    /// Body
    pub body: Node,
}

/// `if` expression.
#[derive(Debug, Clone, PartialEq)]
pub struct IfNode {
    /// `if` and `elif` arms in order
    pub cases: Vec<IfCase>,
    /// `else` body
    pub else_case: Option<Box<Node>>,
    /// Block form (evaluates to None)
    pub block: bool,
    /// Source span
    pub span: Span,
}

/// Numeric `for`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForNode {
    /// Loop label
    pub label: Option<String>,
    /// Loop variable
    pub var: String,
    /// Start value
    pub start: Box<Node>,
    /// End value (exclusive)
    pub end: Box<Node>,
    /// Step value, 1 when absent
    pub step: Option<Box<Node>>,
    /// Body
    pub body: Box<Node>,
    /// Block form (evaluates to None)
    pub block: bool,
    /// Source span
    pub span: Span,
}

/// `for x in iterable`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForInNode {
    /// Loop label
    pub label: Option<String>,
    /// Loop variable
    pub var: String,
    /// List or string iterated over
    pub iterable: Box<Node>,
    /// Body
    pub body: Box<Node>,
    /// Block form
    pub block: bool,
    /// Source span
    pub span: Span,
}

/// `while` loop.
#[derive(Debug, Clone, PartialEq)]
pub struct WhileNode {
    /// Loop label
    pub label: Option<String>,
    /// Condition checked before each iteration
    pub condition: Box<Node>,
    /// Body
    pub body: Box<Node>,
    /// Block form
    pub block: bool,
    /// Source span
    pub span: Span,
}

/// `do ... then loop while cond`.
#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileNode {
    /// Loop label
    pub label: Option<String>,
    /// Body, run at least once
    pub body: Box<Node>,
    /// Condition checked after each iteration
    pub condition: Box<Node>,
    /// Block form
    pub block: bool,
    /// Source span
    pub span: Span,
}

/// Unconditional `loop`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopNode {
    /// Loop label
    pub label: Option<String>,
    /// Body
    pub body: Box<Node>,
    /// Block form
    pub block: bool,
    /// Source span
    pub span: Span,
}

/// Function definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDefNode {
    /// Bound name, `None` for an anonymous function
    pub name: Option<String>,
    /// Required parameters
    pub params: Vec<String>,
    /// Optional parameters with their default expressions
    pub optional: Vec<(String, Rc<Node>)>,
    /// Body
    pub body: Rc<Node>,
    /// `->` form: the body's value is returned
    pub auto_return: bool,
    /// Source span
    pub span: Span,
}

/// Class definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDefNode {
    /// Class name
    pub name: String,
    /// Parent class expression
    pub parent: Option<Box<Node>>,
    /// Member definitions
    pub body: Box<Node>,
    /// Source span
    pub span: Span,
}

/// Call expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CallNode {
    /// Called expression
    pub callee: Box<Node>,
    /// Arguments; [`Node::Default`] marks "use the default"
    pub args: Vec<Node>,
    /// Source span
    pub span: Span,
}

/// Attribute chain `base.step.step`.
///
/// Every step is a [`Node::VarAccess`] or a call whose innermost callee is
/// one.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeNode {
    /// Leftmost expression
    pub base: Box<Node>,
    /// Steps evaluated against the previous value
    pub steps: Vec<Node>,
    /// Source span
    pub span: Span,
}

/// `return value?`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnNode {
    /// Returned expression
    pub value: Option<Box<Node>>,
    /// Source span
    pub span: Span,
}

/// `break:label?`.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakNode {
    /// Targeted loop label
    pub label: Option<String>,
    /// Source span
    pub span: Span,
}

/// `continue:label?`.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinueNode {
    /// Targeted loop label
    pub label: Option<String>,
    /// Source span
    pub span: Span,
}

/// `import name as alias`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportNode {
    /// Module name
    pub name: String,
    /// Binding name, defaults to `name`
    pub alias: Option<String>,
    /// Source span
    pub span: Span,
}

/// `export value as name`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportNode {
    /// Exported expression
    pub value: Box<Node>,
    /// Exported name
    pub name: String,
    /// Source span
    pub span: Span,
}

/// `write text >> target line` / `write text !>> target line`.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteNode {
    /// Text to write
    pub text: Box<Node>,
    /// `!>>`: replace instead of append/insert
    pub overwrite: bool,
    /// File path or `<stdout>`
    pub target: Box<Node>,
    /// 1-based line number
    pub line: Option<Box<Node>>,
    /// Source span
    pub span: Span,
}

/// `read target >> name line`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadNode {
    /// File path or `<stdin>`
    pub target: Box<Node>,
    /// Name to bind the result to
    pub into: Option<String>,
    /// 1-based line number
    pub line: Option<Box<Node>>,
    /// Source span
    pub span: Span,
}

/// `assert condition, message`.
#[derive(Debug, Clone, PartialEq)]
pub struct AssertNode {
    /// Asserted condition
    pub condition: Box<Node>,
    /// Failure message
    pub message: Option<Box<Node>>,
    /// Source span
    pub span: Span,
}

/// Statement sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementsNode {
    /// Statements in order
    pub statements: Vec<Node>,
    /// Source span
    pub span: Span,
}

impl Node {
    /// Source span of the node.
    pub fn span(&self) -> &Span {
        match self {
            Node::Number(n) => &n.span,
            Node::Str(n) => &n.span,
            Node::List(n) => &n.span,
            Node::VarAccess(n) => &n.span,
            Node::DebugPrint(n) => &n.span,
            Node::Default(n) => &n.span,
            Node::VarAssign(n) => &n.span,
            Node::Delete(n) => &n.span,
            Node::BinOp(n) => &n.span,
            Node::Compare(n) => &n.span,
            Node::UnaryOp(n) => &n.span,
            Node::Fallback(n) => &n.span,
            Node::If(n) => &n.span,
            Node::For(n) => &n.span,
            Node::ForIn(n) => &n.span,
            Node::While(n) => &n.span,
            Node::DoWhile(n) => &n.span,
            Node::Loop(n) => &n.span,
            Node::FuncDef(n) => &n.span,
            Node::ClassDef(n) => &n.span,
            Node::Call(n) => &n.span,
            Node::Attribute(n) => &n.span,
            Node::Return(n) => &n.span,
            Node::Break(n) => &n.span,
            Node::Continue(n) => &n.span,
            Node::Import(n) => &n.span,
            Node::Export(n) => &n.span,
            Node::Write(n) => &n.span,
            Node::Read(n) => &n.span,
            Node::Assert(n) => &n.span,
            Node::Statements(n) => &n.span,
        }
    }

    /// Name at the head of an attribute step (`x` in `x` or `x(1)(2)`).
    pub fn head_name(&self) -> Option<&str> {
        match self {
            Node::VarAccess(n) => Some(&n.name),
            Node::Call(n) => n.callee.head_name(),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Tree printer
// ═══════════════════════════════════════════════════════════════════════

fn parenthesize(f: &mut fmt::Formatter<'_>, name: &str, nodes: &[&Node]) -> fmt::Result {
    write!(f, "({}", name)?;
    for node in nodes {
        write!(f, " {}", node)?;
    }
    write!(f, ")")
}

fn label_suffix(label: &Option<String>) -> String {
    label
        .as_ref()
        .map(|l| format!(":{}", l))
        .unwrap_or_default()
}

/// Compact S-expression rendering, used by tests and `--dump-ast`.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Number(n) => match n.value {
                Number::Int(i) => write!(f, "{}", i),
                Number::Float(x) => write!(f, "{:?}", x),
            },
            Node::Str(n) => write!(f, "{:?}", n.value),
            Node::List(n) => {
                let elements: Vec<&Node> = n.elements.iter().collect();
                parenthesize(f, "list", &elements)
            }
            Node::VarAccess(n) => write!(f, "{}", n.name),
            Node::DebugPrint(n) => write!(f, "${}", n.name),
            Node::Default(_) => write!(f, "default"),
            Node::VarAssign(n) => {
                write!(f, "(var")?;
                for target in &n.targets {
                    match &target.object {
                        Some(object) => write!(f, " {}.{}", object, target.name)?,
                        None => write!(f, " {}", target.name)?,
                    }
                }
                write!(f, " {}", n.op.as_str())?;
                for value in &n.values {
                    write!(f, " {}", value)?;
                }
                write!(f, ")")
            }
            Node::Delete(n) => write!(f, "(del {})", n.name),
            Node::BinOp(n) => parenthesize(f, n.op.as_str(), &[&*n.left, &*n.right]),
            Node::Compare(n) => {
                write!(f, "(compare {}", n.first)?;
                for (op, operand) in &n.rest {
                    write!(f, " {} {}", op.as_str(), operand)?;
                }
                write!(f, ")")
            }
            Node::UnaryOp(n) => parenthesize(f, n.op.as_str(), &[&*n.operand]),
            Node::Fallback(n) => {
                let operands: Vec<&Node> = n.operands.iter().collect();
                parenthesize(f, "?", &operands)
            }
            Node::If(n) => {
                write!(f, "(if")?;
                for case in &n.cases {
                    write!(f, " [{} {}]", case.condition, case.body)?;
                }
                if let Some(else_case) = &n.else_case {
                    write!(f, " [else {}]", else_case)?;
                }
                write!(f, ")")
            }
            Node::For(n) => {
                write!(
                    f,
                    "(for{} {} {} {}",
                    label_suffix(&n.label),
                    n.var,
                    n.start,
                    n.end
                )?;
                if let Some(step) = &n.step {
                    write!(f, " step {}", step)?;
                }
                write!(f, " {})", n.body)
            }
            Node::ForIn(n) => write!(
                f,
                "(for{} {} in {} {})",
                label_suffix(&n.label),
                n.var,
                n.iterable,
                n.body
            ),
            Node::While(n) => write!(
                f,
                "(while{} {} {})",
                label_suffix(&n.label),
                n.condition,
                n.body
            ),
            Node::DoWhile(n) => write!(
                f,
                "(do{} {} {})",
                label_suffix(&n.label),
                n.body,
                n.condition
            ),
            Node::Loop(n) => write!(f, "(loop{} {})", label_suffix(&n.label), n.body),
            Node::FuncDef(n) => {
                write!(f, "(def {} (", n.name.as_deref().unwrap_or("<anonymous>"))?;
                let mut params: Vec<String> = n.params.clone();
                params.extend(n.optional.iter().map(|(name, value)| format!("{}={}", name, value)));
                write!(f, "{}) {})", params.join(" "), n.body)
            }
            Node::ClassDef(n) => match &n.parent {
                Some(parent) => write!(f, "(class {} ({}) {})", n.name, parent, n.body),
                None => write!(f, "(class {} {})", n.name, n.body),
            },
            Node::Call(n) => {
                write!(f, "(call {}", n.callee)?;
                for arg in &n.args {
                    write!(f, " {}", arg)?;
                }
                write!(f, ")")
            }
            Node::Attribute(n) => {
                write!(f, "(. {}", n.base)?;
                for step in &n.steps {
                    write!(f, " {}", step)?;
                }
                write!(f, ")")
            }
            Node::Return(n) => match &n.value {
                Some(value) => write!(f, "(return {})", value),
                None => write!(f, "(return)"),
            },
            Node::Break(n) => write!(f, "(break{})", label_suffix(&n.label)),
            Node::Continue(n) => write!(f, "(continue{})", label_suffix(&n.label)),
            Node::Import(n) => match &n.alias {
                Some(alias) => write!(f, "(import {} as {})", n.name, alias),
                None => write!(f, "(import {})", n.name),
            },
            Node::Export(n) => write!(f, "(export {} as {})", n.value, n.name),
            Node::Write(n) => {
                let arrow = if n.overwrite { "!>>" } else { ">>" };
                write!(f, "(write {} {} {}", n.text, arrow, n.target)?;
                if let Some(line) = &n.line {
                    write!(f, " {}", line)?;
                }
                write!(f, ")")
            }
            Node::Read(n) => {
                write!(f, "(read {}", n.target)?;
                if let Some(into) = &n.into {
                    write!(f, " >> {}", into)?;
                }
                if let Some(line) = &n.line {
                    write!(f, " {}", line)?;
                }
                write!(f, ")")
            }
            Node::Assert(n) => match &n.message {
                Some(message) => write!(f, "(assert {} {})", n.condition, message),
                None => write!(f, "(assert {})", n.condition),
            },
            Node::Statements(n) => {
                let statements: Vec<&Node> = n.statements.iter().collect();
                parenthesize(f, "block", &statements)
            }
        }
    }
}
