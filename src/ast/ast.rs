use std::fmt::{Display, Formatter, Result};

/// Name given to the synthetic function wrapping a top-level expression.
pub const ANONYMOUS_FUNCTION_NAME: &str = "__anon_expr";

/// Expression node.
///
/// Every variant exclusively owns its children, so a tree is dropped as a
/// whole together with its root.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal such as `1.0`.
    Number(f64),
    /// Reference to a variable, resolved when lowering.
    Variable(String),
    /// Binary operation; the operator is validated when lowering.
    Binary {
        op: char,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Function call; callee and arity are validated when lowering.
    Call { callee: String, args: Vec<Expr> },
}

impl Expr {
    pub fn number(value: f64) -> Self {
        Expr::Number(value)
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expr::Variable(name.into())
    }

    pub fn binary(op: char, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn call(callee: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: callee.into(),
            args,
        }
    }
}

/// Prints the tree in prefix form, e.g. `(+ 1 (* 2 3))`.
impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Expr::Number(value) => write!(f, "{}", value),
            Expr::Variable(name) => write!(f, "{}", name),
            Expr::Binary { op, left, right } => write!(f, "({} {} {})", op, left, right),
            Expr::Call { callee, args } => {
                write!(f, "(call {}", callee)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// The "prototype" of a function: its name and parameter names, and so
/// implicitly the number of arguments it takes.
#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    pub name: String,
    pub params: Vec<String>,
}

impl Prototype {
    pub fn new(name: impl Into<String>, params: Vec<String>) -> Self {
        Prototype {
            name: name.into(),
            params,
        }
    }

    /// Prototype of the function wrapping a top-level expression.
    pub fn anonymous() -> Self {
        Prototype::new(ANONYMOUS_FUNCTION_NAME, vec![])
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn is_anonymous(&self) -> bool {
        self.name == ANONYMOUS_FUNCTION_NAME
    }
}

impl Display for Prototype {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}({})", self.name, self.params.join(" "))
    }
}

/// A function definition: a prototype and a single-expression body.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub prototype: Prototype,
    pub body: Expr,
}

impl Function {
    pub fn new(prototype: Prototype, body: Expr) -> Self {
        Function { prototype, body }
    }
}

/// One parsed top-level form.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// `def name(params) body`
    Definition(Function),
    /// `extern name(params)`
    Extern(Prototype),
    /// A bare expression, wrapped in the anonymous function.
    Expression(Function),
}
