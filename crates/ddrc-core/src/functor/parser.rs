//! Parses a functor chain string, e.g.
//! `IF(IsDowned()):Stabilize();DealDamage(1d4,Fire)`, into an ordered list
//! of [`FunctorTerm`]s. Parsing never fails (spec.md §4.E: "unknown
//! functor names become `Unknown` and are logged at execution"); the
//! worst a malformed term can do is become `FunctorKind::Unknown`.

use crate::condition::Condition;
use crate::dsl_common::{parse_call, split_top_level, unquote};

use super::catalog::FunctorKind;

/// Which combatant a term's effects route to, overriding whatever the
/// caller's default target routing would otherwise be.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TargetRouting {
    #[default]
    Default,
    SelfEntity,
    Target,
}

/// One term in a functor chain: an optional `IF(...)` gate, an optional
/// `SELF:`/`TARGET:` routing override, and the parsed functor call.
#[derive(Clone, Debug)]
pub struct FunctorTerm {
    pub condition: Option<Condition>,
    pub routing: TargetRouting,
    pub kind: FunctorKind,
}

/// Parses a full chain into its terms. A condition that fails to compile
/// is logged and treated as always-false (the term becomes inert rather
/// than taking down the rest of the chain) — mirrors the fail-closed
/// posture spec.md §4.D mandates for condition evaluation generally.
pub fn parse_chain(chain: &str) -> Vec<FunctorTerm> {
    split_top_level(chain, ';').into_iter().map(parse_term).collect()
}

fn parse_term(raw: &str) -> FunctorTerm {
    let mut rest = raw.trim();
    let mut condition = None;

    if let Some(after_if) = rest.strip_prefix("IF(") {
        if let Some(close) = find_matching_close(after_if) {
            let cond_source = &after_if[..close];
            rest = after_if[close + 1..].trim_start_matches(':').trim();
            condition = Some(match Condition::compile(cond_source) {
                Ok(c) => c,
                Err(err) => {
                    tracing::debug!(cond_source, error = %err, "functor IF(...) condition failed to parse, term gated false");
                    always_false_condition()
                }
            });
        }
    }

    let (routing, rest) = if let Some(stripped) = rest.strip_prefix("SELF:") {
        (TargetRouting::SelfEntity, stripped)
    } else if let Some(stripped) = rest.strip_prefix("TARGET:") {
        (TargetRouting::Target, stripped)
    } else {
        (TargetRouting::Default, rest)
    };

    let Some((name, raw_args)) = parse_call(rest) else {
        return FunctorTerm { condition, routing, kind: FunctorKind::Unknown { name: rest.to_string(), args: Vec::new() } };
    };

    // The positional `SELF`/`TARGET` first-argument form is an alternate
    // way of expressing routing (spec.md §4.E point 2): strip it if the
    // prefix form wasn't already used.
    let (routing, raw_args) = if routing == TargetRouting::Default {
        match raw_args.first().map(|a| unquote(a)) {
            Some("SELF") => (TargetRouting::SelfEntity, &raw_args[1..]),
            Some("TARGET") => (TargetRouting::Target, &raw_args[1..]),
            _ => (routing, &raw_args[..]),
        }
    } else {
        (routing, &raw_args[..])
    };

    let unquoted: Vec<&str> = raw_args.iter().map(|a| unquote(a)).collect();
    let kind = FunctorKind::parse(name, &unquoted);
    FunctorTerm { condition, routing, kind }
}

/// Finds the index (relative to the start of `s`, i.e. right after the
/// opening `IF(`) of the `)` that closes it, respecting nested parens
/// inside the condition text itself (e.g. `IF(SpellLevel() >= 3):...`).
fn find_matching_close(s: &str) -> Option<usize> {
    let mut depth = 1i32;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn always_false_condition() -> Condition {
    // `not ''` has no valid grammar for a literal `false`; instead compile
    // a condition that calls a function guaranteed absent from the
    // registry, which fails closed per spec.md §4.D.
    Condition::compile("__never_true_functor_guard__()").unwrap_or_else(|_| {
        // compile() only errors on a genuine parse failure, and this
        // source always parses; this branch is unreachable in practice.
        unreachable!("'__never_true_functor_guard__()' is valid condition syntax")
    })
}
