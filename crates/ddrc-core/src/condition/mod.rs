//! Condition evaluator (component D): a hand-rolled tokenizer and
//! recursive-descent parser over boolean predicate expressions, plus a
//! closed function registry that reads combatant state through
//! [`CombatView`].
//!
//! ```text
//! IsMeleeAttack() and not HasStatus('RAGING')
//! SpellLevel() >= 3 and HasPassive('Sneak_Attack')
//! context.Target.HasStatus('PRONE')
//! ```
//!
//! Parsing happens once per source string (`Condition::compile`); the
//! resulting tree is pure data and can be evaluated repeatedly against
//! different [`ConditionContext`]s without re-parsing.

mod ast;
mod context;
mod eval;
mod functions;
mod lexer;
mod parser;
mod token;
mod value;

pub use context::{CombatView, ConditionContext, Qualifier};
pub use value::{CompareOp, Value};

use crate::error::WarnOnce;
use ast::Expr;

/// A parsed, reusable condition expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Condition {
    source: String,
    expr: Expr,
}

impl Condition {
    /// Parses `source` into a reusable expression tree. Syntax errors are
    /// returned as `Err` so callers (the registry's field coercion) can
    /// attach them to the owning definition's warning list instead of
    /// failing the whole load.
    pub fn compile(source: &str) -> Result<Self, String> {
        if source.trim().is_empty() {
            // Unconditional: an absent IF(...) wrapper or empty condition
            // field always applies (spec.md §4.D "empty/whitespace
            // condition -> true").
            return Ok(Self { source: source.to_string(), expr: Expr::Number(1.0) });
        }
        let outcome = parser::parse(source)?;
        for warning in outcome.warnings {
            tracing::debug!(source, warning, "condition compiled with lexer warnings");
        }
        Ok(Self { source: source.to_string(), expr: outcome.expr })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluates the condition to a boolean. Never panics: malformed
    /// runtime data (an unknown function) resolves to `false` through
    /// [`eval::eval`]'s fail-closed handling.
    pub fn evaluate(&self, ctx: &ConditionContext<'_>, warn_once: &WarnOnce) -> bool {
        eval::eval(&self.expr, ctx, warn_once).to_bool()
    }
}

/// Convenience one-shot evaluation for call sites that don't need to keep
/// the compiled form around (tests, ad-hoc checks). Production call sites
/// that evaluate the same condition repeatedly should cache a
/// [`Condition`] instead.
pub fn evaluate_source(source: &str, ctx: &ConditionContext<'_>, warn_once: &WarnOnce) -> bool {
    match Condition::compile(source) {
        Ok(cond) => cond.evaluate(ctx, warn_once),
        Err(err) => {
            if warn_once.first_time(&format!("condition-parse:{source}")) {
                tracing::warn!(source, error = %err, "condition failed to parse, evaluating to false");
            }
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AttackFlavor, EntityId, Faction, LifeState};
    use std::collections::HashSet;

    struct FakeView {
        statuses: HashSet<(EntityId, String)>,
        life: LifeState,
    }

    impl CombatView for FakeView {
        fn has_status(&self, who: EntityId, status_id: &str) -> bool {
            self.statuses.contains(&(who, status_id.to_string()))
        }
        fn has_status_type(&self, _who: EntityId, _status_type: &str) -> bool {
            false
        }
        fn has_passive(&self, _who: EntityId, _passive_id: &str) -> bool {
            false
        }
        fn life_state(&self, _who: EntityId) -> Option<LifeState> {
            Some(self.life)
        }
        fn faction(&self, _who: EntityId) -> Option<Faction> {
            None
        }
        fn resource_current(&self, _who: EntityId, _resource_id: &str) -> Option<i64> {
            None
        }
        fn resource_max(&self, _who: EntityId, _resource_id: &str) -> Option<i64> {
            None
        }
        fn ability_score(&self, _who: EntityId, _ability: &str) -> Option<i32> {
            None
        }
        fn ability_modifier(&self, _who: EntityId, _ability: &str) -> Option<i32> {
            None
        }
        fn distance(&self, _a: EntityId, _b: EntityId) -> Option<f64> {
            None
        }
    }

    #[test]
    fn evaluates_melee_and_not_raging() {
        let barbarian = EntityId(1);
        let mut statuses = HashSet::new();
        statuses.insert((barbarian, "RAGING".to_string()));
        let view = FakeView { statuses, life: LifeState::Alive };
        let ctx = ConditionContext::new(&view, barbarian).with_attack_flavor(AttackFlavor::MeleeWeapon);
        let warn = WarnOnce::new();

        assert!(evaluate_source("IsMeleeAttack() and HasStatus('RAGING')", &ctx, &warn));
        assert!(!evaluate_source("IsMeleeAttack() and not HasStatus('RAGING')", &ctx, &warn));
    }

    #[test]
    fn unknown_function_fails_closed() {
        let view = FakeView { statuses: HashSet::new(), life: LifeState::Alive };
        let ctx = ConditionContext::new(&view, EntityId(1));
        let warn = WarnOnce::new();
        assert!(!evaluate_source("TotallyMadeUpFunction()", &ctx, &warn));
    }

    #[test]
    fn target_qualifier_rebinds_subject() {
        let source = EntityId(1);
        let target = EntityId(2);
        let mut statuses = HashSet::new();
        statuses.insert((target, "PRONE".to_string()));
        let view = FakeView { statuses, life: LifeState::Alive };
        let ctx = ConditionContext::new(&view, source).with_target(target);
        let warn = WarnOnce::new();

        assert!(evaluate_source("context.Target.HasStatus('PRONE')", &ctx, &warn));
        assert!(!evaluate_source("HasStatus('PRONE')", &ctx, &warn));
    }

    #[test]
    fn empty_condition_is_unconditional() {
        let view = FakeView { statuses: HashSet::new(), life: LifeState::Alive };
        let ctx = ConditionContext::new(&view, EntityId(1));
        let warn = WarnOnce::new();
        assert!(evaluate_source("", &ctx, &warn));
        assert!(evaluate_source("   ", &ctx, &warn));
    }

    #[test]
    fn malformed_source_fails_closed() {
        let view = FakeView { statuses: HashSet::new(), life: LifeState::Alive };
        let ctx = ConditionContext::new(&view, EntityId(1));
        let warn = WarnOnce::new();
        assert!(!evaluate_source("IsMeleeAttack(", &ctx, &warn));
    }
}
