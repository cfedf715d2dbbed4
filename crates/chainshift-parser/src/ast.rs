use serde::{Deserialize, Serialize};

/// A parsed source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Expr(Expr),
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
    },
    /// `for` or `while`; the header is kept exactly as written, including
    /// the keyword and parentheses.
    Loop {
        header: String,
        body: Vec<Stmt>,
    },
    Block(Vec<Stmt>),
    /// `const`/`let`/`var` declaration or a `function` declaration. The
    /// initializer is kept so walkers can descend into function bodies.
    Decl {
        text: String,
        init: Option<Expr>,
    },
    Return(Option<Expr>),
    Empty,
}

/// Every expression records the exact source slice it was parsed from.
/// Argument expressions the converter does not understand are carried
/// through on that text alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    Ident(String),
    Str(String),
    /// Template literal inner text with `${...}` markers intact.
    Template(String),
    Number(String),
    Bool(bool),
    Null,
    Object(Vec<Property>),
    Array(Vec<Expr>),
    Function {
        params: Vec<String>,
        body: Vec<Stmt>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Member {
        object: Box<Expr>,
        property: String,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Unary {
        op: String,
        operand: Box<Expr>,
    },
    Binary {
        op: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    /// Anything the grammar recognized only by extent (ternaries, spread).
    Raw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub key: Expr,
    pub value: Expr,
}

impl Expr {
    pub fn is_function(&self) -> bool {
        matches!(self.kind, ExprKind::Function { .. })
    }

    /// The literal string value, if this is a plain quoted string.
    pub fn as_str_lit(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Str(s) => Some(s),
            _ => None,
        }
    }
}
