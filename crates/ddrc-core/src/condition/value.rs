//! The runtime value domain condition expressions evaluate to.

use crate::config::NUMERIC_EPSILON;

/// A polymorphic value: booleans, numbers, strings, and bare identifiers
/// (enum literals like `Fire` or `RAGING` written without quotes).
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Num(f64),
    Str(String),
    /// A dotted qualified name that wasn't followed by `(...)`, e.g.
    /// `DamageType.Fire` or a bare status id used as an enum literal.
    Ident(Vec<String>),
}

impl Value {
    /// Truthiness used by `not` and by any context where a non-boolean
    /// value stands in for a predicate.
    pub fn to_bool(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Num(n) => *n != 0.0,
            Value::Str(s) => !s.is_empty() && !s.eq_ignore_ascii_case("false"),
            Value::Ident(parts) => !parts.is_empty(),
        }
    }

    /// Canonical string form used for cross-type comparisons (e.g.
    /// `DamageType.Fire == 'Fire'`).
    pub fn as_text(&self) -> String {
        match self {
            Value::Bool(b) => b.to_string(),
            Value::Num(n) => {
                if n.fract() == 0.0 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            Value::Str(s) => s.clone(),
            Value::Ident(parts) => parts.last().cloned().unwrap_or_default(),
        }
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            Value::Str(s) => s.parse().ok(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Ident(_) => None,
        }
    }
}

/// Comparison operators the grammar supports between two primaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    /// Evaluate `lhs OP rhs` per spec.md's comparison rules: numeric
    /// comparisons use an epsilon for equality, string/identifier
    /// comparisons are ordinal and case-insensitive, and ordering
    /// operators on non-numeric operands always evaluate to `false`
    /// (they're only meaningful between numbers).
    pub fn apply(self, lhs: &Value, rhs: &Value) -> bool {
        if let (Some(a), Some(b)) = (lhs.as_num(), rhs.as_num()) {
            return self.apply_numeric(a, b);
        }
        self.apply_textual(&lhs.as_text(), &rhs.as_text())
    }

    fn apply_numeric(self, a: f64, b: f64) -> bool {
        match self {
            CompareOp::Eq => (a - b).abs() <= NUMERIC_EPSILON,
            CompareOp::Ne => (a - b).abs() > NUMERIC_EPSILON,
            CompareOp::Lt => a < b - NUMERIC_EPSILON,
            CompareOp::Le => a <= b + NUMERIC_EPSILON,
            CompareOp::Gt => a > b + NUMERIC_EPSILON,
            CompareOp::Ge => a >= b - NUMERIC_EPSILON,
        }
    }

    fn apply_textual(self, a: &str, b: &str) -> bool {
        match self {
            CompareOp::Eq => a.eq_ignore_ascii_case(b),
            CompareOp::Ne => !a.eq_ignore_ascii_case(b),
            CompareOp::Lt => a.to_ascii_lowercase() < b.to_ascii_lowercase(),
            CompareOp::Le => a.to_ascii_lowercase() <= b.to_ascii_lowercase(),
            CompareOp::Gt => a.to_ascii_lowercase() > b.to_ascii_lowercase(),
            CompareOp::Ge => a.to_ascii_lowercase() >= b.to_ascii_lowercase(),
        }
    }
}
