use super::value::CompareOp;

/// Parsed condition expression tree.
#[derive(Clone, Debug, PartialEq)]
pub(super) enum Expr {
    Or(Vec<Expr>),
    And(Vec<Expr>),
    Not(Box<Expr>),
    Compare(CompareOp, Box<Expr>, Box<Expr>),
    Number(f64),
    Str(String),
    /// A qualified name not followed by `(...)`: a bare enum literal or
    /// identifier reference.
    Ident(Vec<String>),
    /// A qualified name followed by `(args)`: a condition function call.
    /// `context.Source`/`context.Target` prefixes are stripped into
    /// `qualifier` by the parser; `path` is the remaining function name
    /// segments (almost always a single segment).
    Call { qualifier: Option<super::context::Qualifier>, path: Vec<String>, args: Vec<Expr> },
}
