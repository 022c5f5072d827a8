//! Dice expression parsing and rolling: `NdM`, `NdM+K`, `NdM-K`, or a bare
//! flat integer. Shared by the boost DSL (`RollBonus`, `Advantage` terms
//! never roll, but value terms like damage boosts do) and the functor
//! pipeline (`DealDamage`, `RegainHitPoints`).

use std::fmt;

use crate::query::QueryRng;

/// A parsed dice expression: `count`d`sides` plus a flat modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiceExpr {
    pub count: u32,
    pub sides: u32,
    pub modifier: i32,
}

impl DiceExpr {
    /// A constant value with no dice, e.g. a bare `5` functor argument.
    pub fn flat(value: i32) -> Self {
        Self { count: 0, sides: 0, modifier: value }
    }

    /// The minimum possible roll (all dice at 1).
    pub fn min(&self) -> i32 {
        self.count as i32 + self.modifier
    }

    /// The maximum possible roll (all dice at max face).
    pub fn max(&self) -> i32 {
        (self.count * self.sides) as i32 + self.modifier
    }

    /// Roll the expression using the supplied RNG, clamped at zero — damage
    /// and healing never go negative even if a modifier would push the
    /// total below it.
    pub fn roll(&self, rng: &mut dyn QueryRng) -> u32 {
        let mut total: i32 = self.modifier;
        for _ in 0..self.count {
            total += rng.roll_die(self.sides) as i32;
        }
        total.max(0) as u32
    }
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count > 0 {
            write!(f, "{}d{}", self.count, self.sides)?;
        } else if self.modifier == 0 {
            return write!(f, "0");
        }
        match self.modifier.cmp(&0) {
            std::cmp::Ordering::Greater if self.count > 0 => write!(f, "+{}", self.modifier),
            std::cmp::Ordering::Less => write!(f, "{}", self.modifier),
            _ if self.count == 0 => write!(f, "{}", self.modifier),
            _ => Ok(()),
        }
    }
}

/// Parses a dice expression from a trimmed string. Accepts `NdM`, `NdM+K`,
/// `NdM-K`, and bare integers. Returns `None` on anything else; callers
/// treat a failed parse as an `Unrecognized` boost/functor argument rather
/// than a hard error.
pub fn parse_dice(s: &str) -> Option<DiceExpr> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(d_pos) = s.find(['d', 'D']) {
        let (count_str, rest) = s.split_at(d_pos);
        let rest = &rest[1..];
        let count: u32 = count_str.trim().parse().ok()?;

        let (sides_str, modifier) = split_modifier(rest);
        let sides: u32 = sides_str.trim().parse().ok()?;
        if sides == 0 {
            return None;
        }
        Some(DiceExpr { count, sides, modifier })
    } else {
        s.parse::<i32>().ok().map(DiceExpr::flat)
    }
}

/// Splits `"6+1"` or `"6-1"` into `("6", 1)` / `("6", -1)`. Returns
/// `(whole, 0)` when there is no trailing modifier.
fn split_modifier(s: &str) -> (&str, i32) {
    let s = s.trim();
    for (idx, ch) in s.char_indices().skip(1) {
        if ch == '+' || ch == '-' {
            let (head, tail) = s.split_at(idx);
            if let Ok(m) = tail.parse::<i32>() {
                return (head, m);
            }
        }
    }
    (s, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_dice() {
        let d = parse_dice("2d6").unwrap();
        assert_eq!(d, DiceExpr { count: 2, sides: 6, modifier: 0 });
    }

    #[test]
    fn parses_dice_with_positive_modifier() {
        let d = parse_dice("1d4+2").unwrap();
        assert_eq!(d, DiceExpr { count: 1, sides: 4, modifier: 2 });
    }

    #[test]
    fn parses_dice_with_negative_modifier() {
        let d = parse_dice("1d8-1").unwrap();
        assert_eq!(d, DiceExpr { count: 1, sides: 8, modifier: -1 });
    }

    #[test]
    fn parses_flat_integer() {
        assert_eq!(parse_dice("5"), Some(DiceExpr::flat(5)));
    }

    #[test]
    fn rejects_zero_sided_dice() {
        assert_eq!(parse_dice("1d0"), None);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_dice("fireball"), None);
    }

    #[test]
    fn min_max_bounds() {
        let d = parse_dice("2d6+1").unwrap();
        assert_eq!(d.min(), 3);
        assert_eq!(d.max(), 13);
    }
}
