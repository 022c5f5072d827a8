use crate::error::WarnOnce;

use super::ast::Expr;
use super::context::ConditionContext;
use super::functions::{lookup, subject};
use super::value::Value;

/// Evaluates a parsed expression tree to a [`Value`]. Unknown function
/// names fail closed: the call evaluates to `Value::Bool(false)` and a
/// warning is emitted (deduplicated per canonical call text via
/// `warn_once`) rather than panicking or propagating a hard error — a
/// single bad reference in source data must not take down the whole
/// boolean expression it's embedded in.
pub(super) fn eval(expr: &Expr, ctx: &ConditionContext<'_>, warn_once: &WarnOnce) -> Value {
    match expr {
        Expr::Or(terms) => Value::Bool(terms.iter().any(|t| eval(t, ctx, warn_once).to_bool())),
        Expr::And(terms) => Value::Bool(terms.iter().all(|t| eval(t, ctx, warn_once).to_bool())),
        Expr::Not(inner) => Value::Bool(!eval(inner, ctx, warn_once).to_bool()),
        Expr::Compare(op, lhs, rhs) => {
            let l = eval(lhs, ctx, warn_once);
            let r = eval(rhs, ctx, warn_once);
            Value::Bool(op.apply(&l, &r))
        }
        Expr::Number(n) => Value::Num(*n),
        Expr::Str(s) => Value::Str(s.clone()),
        Expr::Ident(parts) => Value::Ident(parts.clone()),
        Expr::Call { qualifier, path, args } => {
            let name = path.join(".");
            let Some(func) = lookup(&name) else {
                if warn_once.first_time(&format!("condition-fn:{name}")) {
                    tracing::warn!(function = %name, "unknown condition function, evaluating to false");
                }
                return Value::Bool(false);
            };
            let who = subject(ctx, *qualifier);
            let arg_values: Vec<Value> = args.iter().map(|a| eval(a, ctx, warn_once)).collect();
            func(ctx, who, &arg_values)
        }
    }
}
