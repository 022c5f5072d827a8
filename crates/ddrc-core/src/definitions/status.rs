//! `StatusDefinition`: the closed set of status types plus the boost
//! string, lifecycle functor hooks, and removal rules spec.md §3
//! describes.

use std::str::FromStr;

use crate::statblock::RawRecord;

use super::coerce::{num_or_default, semicolon_list};

/// Closed set of status types the source data uses, with a `Custom`
/// escape hatch for an unrecognized `type "..."` value — logged once by
/// the registry rather than rejecting the whole status (spec.md §3 lists
/// this as a closed set, but new types do appear across content patches,
/// so an unknown one degrades instead of failing load).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusType {
    Boost,
    Incapacitated,
    Invisible,
    Polymorphed,
    Reaction,
    Dying,
    Prone,
    Sleeping,
    Doused,
    Charmed,
    KnockedDown,
    Custom(String),
}

impl FromStr for StatusType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "boost" => Self::Boost,
            "incapacitated" => Self::Incapacitated,
            "invisible" => Self::Invisible,
            "polymorphed" => Self::Polymorphed,
            "reaction" => Self::Reaction,
            "dying" => Self::Dying,
            "prone" => Self::Prone,
            "sleeping" => Self::Sleeping,
            "doused" => Self::Doused,
            "charmed" => Self::Charmed,
            "knockeddown" | "knocked_down" | "knocked-down" => Self::KnockedDown,
            _ => Self::Custom(s.to_string()),
        })
    }
}

impl std::fmt::Display for StatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Custom(s) => write!(f, "{s}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// How long a status lasts before an automatic tick-based removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DurationRule {
    Turns(u32),
    Infinite,
}

impl DurationRule {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(n) if n < 0 => Self::Infinite,
            Ok(n) => Self::Turns(n as u32),
            Err(_) => Self::Turns(0),
        }
    }
}

/// Names which save success removes this status, per spec.md §4.F
/// "save-to-remove".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoveOnSave {
    pub ability: String,
    pub dc: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusDefinition {
    pub id: String,
    pub display_name: String,
    pub status_type: StatusType,
    pub boosts: String,
    pub passives: Vec<String>,
    pub stack_id: Option<String>,
    pub groups: Vec<String>,
    pub duration: DurationRule,
    pub on_apply: Option<String>,
    pub on_remove: Option<String>,
    pub on_tick: Option<String>,
    pub remove_on_save: Option<RemoveOnSave>,
    /// Whether this status persists through the combatant's death —
    /// spec.md §3 lifecycle: "expire by ... death (unless the definition
    /// survives death)".
    pub survives_death: bool,
}

impl StatusDefinition {
    pub fn coerce(id: &str, record: &RawRecord) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();
        let status_type = record
            .get("StatusType")
            .map(|raw| StatusType::from_str(raw).expect("StatusType::from_str is infallible"))
            .unwrap_or(StatusType::Boost);
        if let StatusType::Custom(ref name) = status_type {
            warnings.push(format!("status '{id}' uses unrecognized StatusType '{name}', treating as Custom"));
        }

        let remove_on_save = record.get("RemoveEvent").and_then(|raw| {
            // Expected shape: "SaveSuccess:Dexterity:15"
            let mut parts = raw.split(':');
            if parts.next()?.trim().eq_ignore_ascii_case("SaveSuccess") {
                let ability = parts.next()?.trim().to_string();
                let dc = parts.next()?.trim().parse().ok()?;
                Some(RemoveOnSave { ability, dc })
            } else {
                None
            }
        });
        if record.get("RemoveEvent").is_some() && remove_on_save.is_none() {
            warnings.push(format!("status '{id}' has unrecognized RemoveEvent '{}'", record.get("RemoveEvent").unwrap()));
        }

        let def = Self {
            id: id.to_string(),
            display_name: record.get("DisplayName").unwrap_or(id).to_string(),
            status_type,
            boosts: record.get("Boosts").unwrap_or_default().to_string(),
            passives: semicolon_list(record, "Passives"),
            stack_id: record.get("StackId").map(str::to_string),
            groups: semicolon_list(record, "StatusGroups"),
            duration: DurationRule::parse(record.get("Duration").unwrap_or("0")),
            on_apply: record.get("OnApplyFunctors").map(str::to_string),
            on_remove: record.get("OnRemoveFunctors").map(str::to_string),
            on_tick: record.get("OnTickFunctors").map(str::to_string),
            remove_on_save,
            survives_death: num_or_default(record, "SurvivesDeath", 0, &mut warnings) != 0,
        };
        (def, warnings)
    }
}
