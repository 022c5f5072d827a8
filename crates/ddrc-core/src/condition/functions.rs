//! The closed catalog of condition functions. Unlike the boost and functor
//! catalogs there is no data-carrying `Unrecognized` variant here — an
//! unknown function name fails the whole expression closed (spec.md design
//! note resolving the condition-evaluator Open Question), logged once via
//! [`crate::error::WarnOnce`] rather than repeated every evaluation.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::types::{AttackFlavor, EntityId, Faction, LifeState};

use super::context::{ConditionContext, Qualifier};
use super::value::Value;

pub(super) type ConditionFn = fn(&ConditionContext<'_>, EntityId, &[Value]) -> Value;

pub(super) fn lookup(name: &str) -> Option<ConditionFn> {
    table().get(name.to_ascii_lowercase().as_str()).copied()
}

fn table() -> &'static HashMap<&'static str, ConditionFn> {
    static TABLE: OnceLock<HashMap<&'static str, ConditionFn>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut m: HashMap<&'static str, ConditionFn> = HashMap::new();
        m.insert("ismeleeattack", |ctx, _, _| {
            Value::Bool(ctx.attack_flavor.is_some_and(AttackFlavor::is_melee))
        });
        m.insert("israngedattack", |ctx, _, _| {
            Value::Bool(ctx.attack_flavor.is_some_and(AttackFlavor::is_ranged))
        });
        m.insert("isweaponattack", |ctx, _, _| {
            Value::Bool(ctx.attack_flavor.is_some_and(AttackFlavor::is_weapon))
        });
        m.insert("isspellattack", |ctx, _, _| {
            Value::Bool(ctx.attack_flavor.is_some_and(AttackFlavor::is_spell))
        });
        m.insert("ishit", |ctx, _, _| Value::Bool(ctx.is_hit.unwrap_or(false)));
        m.insert("iscritical", |ctx, _, _| Value::Bool(ctx.is_critical.unwrap_or(false)));
        m.insert("isself", |ctx, _, _| Value::Bool(ctx.target == Some(ctx.source)));
        m.insert("hasstatus", |ctx, who, args| {
            let Some(id) = args.first().map(Value::as_text) else {
                return Value::Bool(false);
            };
            Value::Bool(ctx.view.has_status(who, &id))
        });
        m.insert("hasstatustype", |ctx, who, args| {
            let Some(kind) = args.first().map(Value::as_text) else {
                return Value::Bool(false);
            };
            Value::Bool(ctx.view.has_status_type(who, &kind))
        });
        m.insert("haspassive", |ctx, who, args| {
            let Some(id) = args.first().map(Value::as_text) else {
                return Value::Bool(false);
            };
            Value::Bool(ctx.view.has_passive(who, &id))
        });
        m.insert("isalive", |ctx, who, _| {
            Value::Bool(ctx.view.life_state(who) == Some(LifeState::Alive))
        });
        m.insert("isdowned", |ctx, who, _| {
            Value::Bool(ctx.view.life_state(who) == Some(LifeState::Downed))
        });
        m.insert("isdead", |ctx, who, _| {
            Value::Bool(ctx.view.life_state(who) == Some(LifeState::Dead))
        });
        m.insert("ishostile", |ctx, who, _| {
            Value::Bool(ctx.view.faction(who) == Some(Faction::Hostile))
        });
        m.insert("isplayer", |ctx, who, _| {
            Value::Bool(ctx.view.faction(who) == Some(Faction::Player))
        });
        m.insert("spelllevel", |ctx, _, _| Value::Num(ctx.spell_level.unwrap_or(0) as f64));
        m.insert("spellschoolis", |ctx, _, args| {
            let Some(name) = args.first().map(Value::as_text) else {
                return Value::Bool(false);
            };
            Value::Bool(ctx.spell_school.as_deref().is_some_and(|s| s.eq_ignore_ascii_case(&name)))
        });
        m.insert("damagetypeis", |ctx, _, args| {
            let Some(name) = args.first().map(Value::as_text) else {
                return Value::Bool(false);
            };
            Value::Bool(ctx.damage_type.is_some_and(|d| d.to_string().eq_ignore_ascii_case(&name)))
        });
        m.insert("resourcecurrent", |ctx, who, args| {
            let Some(id) = args.first().map(Value::as_text) else {
                return Value::Num(0.0);
            };
            Value::Num(ctx.view.resource_current(who, &id).unwrap_or(0) as f64)
        });
        m.insert("resourcemax", |ctx, who, args| {
            let Some(id) = args.first().map(Value::as_text) else {
                return Value::Num(0.0);
            };
            Value::Num(ctx.view.resource_max(who, &id).unwrap_or(0) as f64)
        });
        m.insert("abilityscore", |ctx, who, args| {
            let Some(name) = args.first().map(Value::as_text) else {
                return Value::Num(0.0);
            };
            Value::Num(ctx.view.ability_score(who, &name).unwrap_or(0) as f64)
        });
        m.insert("abilitymodifier", |ctx, who, args| {
            let Some(name) = args.first().map(Value::as_text) else {
                return Value::Num(0.0);
            };
            Value::Num(ctx.view.ability_modifier(who, &name).unwrap_or(0) as f64)
        });
        m.insert("distanceto", |ctx, _, _| {
            let Some(target) = ctx.target else {
                return Value::Num(f64::INFINITY);
            };
            Value::Num(ctx.view.distance(ctx.source, target).unwrap_or(f64::INFINITY))
        });
        m
    })
}

/// Resolves a possibly-empty call qualifier against a context, defaulting
/// unqualified calls to `Source` per the grammar's stated default.
pub(super) fn subject(ctx: &ConditionContext<'_>, qualifier: Option<Qualifier>) -> EntityId {
    ctx.resolve(qualifier.unwrap_or(Qualifier::Source))
}
