//! Shared coercion helpers used by every per-kind definition coercer in
//! this module: pulling a numeric field with a default, an ordered
//! semicolon-delimited list, or a closed enum from a raw field map,
//! collecting a warning instead of failing the whole record when a field
//! is missing or malformed (spec.md §4.B: "numeric defaults, enum
//! parsing, semicolon-delimited lists preserved in order").

use std::str::FromStr;

use crate::statblock::RawRecord;

/// Reads a numeric field, falling back to `default` and recording a
/// warning if the field is present but unparseable. A genuinely missing
/// field is not itself a warning — most fields are optional and inherit
/// from the parent chain already folded into `record`.
pub(super) fn num_or_default(record: &RawRecord, key: &str, default: i32, warnings: &mut Vec<String>) -> i32 {
    match record.get(key) {
        None => default,
        Some(raw) => match raw.trim().parse::<i32>() {
            Ok(n) => n,
            Err(_) => {
                warnings.push(format!("field '{key}' = '{raw}' is not a valid integer, using default {default}"));
                default
            }
        },
    }
}

/// Reads a field as a closed enum via `FromStr`, recording a warning and
/// returning `None` on a value the enum doesn't recognize.
pub(super) fn parse_enum<T: FromStr>(record: &RawRecord, key: &str, warnings: &mut Vec<String>) -> Option<T> {
    let raw = record.get(key)?;
    match T::from_str(raw.trim()) {
        Ok(v) => Some(v),
        Err(_) => {
            warnings.push(format!("field '{key}' = '{raw}' is not a recognized value"));
            None
        }
    }
}

/// Splits a semicolon-delimited field into an ordered list of trimmed,
/// non-empty strings. Missing field yields an empty list, not a warning.
pub(super) fn semicolon_list(record: &RawRecord, key: &str) -> Vec<String> {
    record
        .get(key)
        .map(|raw| raw.split(';').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect())
        .unwrap_or_default()
}
