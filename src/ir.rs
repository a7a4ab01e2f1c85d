//! Quadruple IR
//!
//! A flat sequence of `(op, arg1, arg2, result)` instructions. Control flow
//! is expressed only through `LABEL`, `GOTO`, `IF` and `IF_NOT`.

use std::fmt;

use enum_as_inner::EnumAsInner;

use crate::ast::BinOp;

pub mod listing;

pub use listing::{listing, read_listing};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
    Label,
    Goto,
    If,
    IfNot,
    Ret,
    /// Registers a storage slot. Accepted downstream, never produced by
    /// lowering.
    Declare,
}

const OPCODES: [(Opcode, &str); 19] = [
    (Opcode::Assign, "="),
    (Opcode::Add, "+"),
    (Opcode::Sub, "-"),
    (Opcode::Mul, "*"),
    (Opcode::Div, "/"),
    (Opcode::Lt, "<"),
    (Opcode::Le, "<="),
    (Opcode::Gt, ">"),
    (Opcode::Ge, ">="),
    (Opcode::Eq, "=="),
    (Opcode::Ne, "!="),
    (Opcode::And, "&&"),
    (Opcode::Or, "||"),
    (Opcode::Label, "LABEL"),
    (Opcode::Goto, "GOTO"),
    (Opcode::If, "IF"),
    (Opcode::IfNot, "IF_NOT"),
    (Opcode::Ret, "RET"),
    (Opcode::Declare, "DECLARE"),
];

impl Opcode {
    pub fn spelling(self) -> &'static str {
        OPCODES
            .iter()
            .find_map(|(op, s)| (*op == self).then_some(*s))
            .unwrap_or("?")
    }

    pub fn from_spelling(spelling: &str) -> Option<Self> {
        OPCODES
            .iter()
            .find_map(|(op, s)| (*s == spelling).then_some(*op))
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(self, Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Opcode::Lt | Opcode::Le | Opcode::Gt | Opcode::Ge | Opcode::Eq | Opcode::Ne
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, Opcode::And | Opcode::Or)
    }

    /// Arithmetic, comparison and logical operators.
    pub fn is_binary(self) -> bool {
        self.is_arithmetic() || self.is_comparison() || self.is_logical()
    }

    /// Ops whose result slot names a label.
    pub fn targets_label(self) -> bool {
        matches!(
            self,
            Opcode::Label | Opcode::Goto | Opcode::If | Opcode::IfNot
        )
    }
}

impl From<BinOp> for Opcode {
    fn from(op: BinOp) -> Self {
        match op {
            BinOp::Mul => Opcode::Mul,
            BinOp::Div => Opcode::Div,
            BinOp::Add => Opcode::Add,
            BinOp::Sub => Opcode::Sub,
            BinOp::Lt => Opcode::Lt,
            BinOp::Le => Opcode::Le,
            BinOp::Gt => Opcode::Gt,
            BinOp::Ge => Opcode::Ge,
            BinOp::Eq => Opcode::Eq,
            BinOp::Ne => Opcode::Ne,
            BinOp::And => Opcode::And,
            BinOp::Or => Opcode::Or,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spelling())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Label {
    Numbered(u32),
    Func(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Numbered(n) => write!(f, "L{n}"),
            Label::Func(name) => write!(f, "FUNC_{name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, EnumAsInner)]
pub enum Operand {
    Var(String),
    Temp(u32),
    Label(Label),
    Int(i64),
    Real(f64),
    Empty,
}

impl Operand {
    pub fn is_immediate(&self) -> bool {
        matches!(self, Operand::Int(_) | Operand::Real(_))
    }
}

/// Prefix for variables whose spelling would read back as another operand.
pub(crate) const VAR_ESCAPE: &str = "var_";

fn is_numbered(text: &str, prefix: char) -> bool {
    text.strip_prefix(prefix)
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// `t3`, `L2`, `FUNC_x` and `_` spell temporaries, labels and the empty slot,
/// so a variable with such a name is listed as `var_<name>`. Names already
/// starting with `var_` are escaped too, keeping the mapping reversible.
fn listed_var_name(name: &str) -> std::borrow::Cow<'_, str> {
    if name == "_"
        || is_numbered(name, 't')
        || is_numbered(name, 'L')
        || name.starts_with("FUNC_")
        || name.starts_with(VAR_ESCAPE)
    {
        format!("{VAR_ESCAPE}{name}").into()
    } else {
        name.into()
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Var(name) => f.write_str(&listed_var_name(name)),
            Operand::Temp(n) => write!(f, "t{n}"),
            Operand::Label(label) => write!(f, "{label}"),
            Operand::Int(value) => write!(f, "{value}"),
            Operand::Real(value) => write!(f, "{value:?}"),
            Operand::Empty => f.write_str("_"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Quad {
    pub op: Opcode,
    pub arg1: Operand,
    pub arg2: Operand,
    pub result: Operand,
}

impl Quad {
    pub fn new(op: Opcode, arg1: Operand, arg2: Operand, result: Operand) -> Self {
        Self {
            op,
            arg1,
            arg2,
            result,
        }
    }

    pub fn assign(value: Operand, result: Operand) -> Self {
        Self::new(Opcode::Assign, value, Operand::Empty, result)
    }

    pub fn label(label: Label) -> Self {
        Self::new(
            Opcode::Label,
            Operand::Empty,
            Operand::Empty,
            Operand::Label(label),
        )
    }

    pub fn goto(label: Label) -> Self {
        Self::new(
            Opcode::Goto,
            Operand::Empty,
            Operand::Empty,
            Operand::Label(label),
        )
    }

    /// The label this quad defines or jumps to.
    pub fn target(&self) -> Option<&Label> {
        if self.op.targets_label() {
            self.result.as_label()
        } else {
            None
        }
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.op, self.arg1, self.arg2, self.result
        )
    }
}
