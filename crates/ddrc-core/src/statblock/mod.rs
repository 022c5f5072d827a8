//! Stat-block reader: lexes the "new entry / type / using / data" text
//! format into raw record trees.
//!
//! The format is a sequence of records:
//!
//! ```text
//! new entry "Fighter_Base"
//! type "Character"
//! using "Character_Base"
//! data "Strength" "16"
//! data "Boosts" "AC(2);Resistance(Fire,Resistant)"
//! ```
//!
//! Blank and comment (`//` or `--`) lines are skipped. Values are opaque
//! strings preserved verbatim, including embedded delimiters. The reader
//! never fails outright: unterminated quotes or a `data`/`type`/`using`
//! line outside of any record are recoverable — warn, skip to the next
//! `new entry`.

mod lexer;
mod record;

pub use record::{ParseWarning, RawRecord};

use lexer::{Line, classify_line};

/// Result of reading a stat-block source file: the parsed records in
/// file order, plus every recoverable warning encountered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadOutcome {
    pub records: Vec<RawRecord>,
    pub warnings: Vec<ParseWarning>,
}

/// Parse a stat-block text source into raw records.
///
/// This never returns `Err`: malformed input degrades to warnings and the
/// reader resynchronizes at the next `new entry` line.
pub fn read(source: &str) -> ReadOutcome {
    let mut records = Vec::new();
    let mut warnings = Vec::new();
    let mut current: Option<RawRecord> = None;

    for (lineno, raw_line) in source.lines().enumerate() {
        let lineno = lineno + 1;
        match classify_line(raw_line) {
            Line::Blank | Line::Comment => {}
            Line::NewEntry(Ok(name)) => {
                if let Some(rec) = current.take() {
                    records.push(rec);
                }
                current = Some(RawRecord::new(name));
            }
            Line::NewEntry(Err(reason)) => {
                if let Some(rec) = current.take() {
                    records.push(rec);
                }
                warnings.push(ParseWarning::new(lineno, format!("malformed new entry: {reason}")));
                current = None;
            }
            Line::Type(Ok(kind)) => {
                if let Some(rec) = current.as_mut() {
                    if rec.kind.is_some() {
                        warnings.push(ParseWarning::new(
                            lineno,
                            format!("duplicate type line for \"{}\", keeping last", rec.name),
                        ));
                    }
                    rec.kind = Some(kind);
                } else {
                    warnings.push(ParseWarning::new(lineno, "type line outside any record, skipped".into()));
                }
            }
            Line::Using(Ok(parent)) => {
                if let Some(rec) = current.as_mut() {
                    if rec.parent.is_some() {
                        warnings.push(ParseWarning::new(
                            lineno,
                            format!("duplicate using line for \"{}\", keeping last", rec.name),
                        ));
                    }
                    rec.parent = Some(parent);
                } else {
                    warnings.push(ParseWarning::new(lineno, "using line outside any record, skipped".into()));
                }
            }
            Line::Data(Ok((key, value))) => {
                if let Some(rec) = current.as_mut() {
                    if rec.data.insert(key.clone(), value).is_some() {
                        warnings.push(ParseWarning::new(
                            lineno,
                            format!("duplicate key \"{key}\" in \"{}\", keeping last", rec.name),
                        ));
                    }
                } else {
                    warnings.push(ParseWarning::new(lineno, "data line outside any record, skipped".into()));
                }
            }
            Line::Type(Err(reason)) | Line::Using(Err(reason)) | Line::Data(Err(reason)) => {
                warnings.push(ParseWarning::new(lineno, reason));
            }
            Line::Unknown => {
                warnings.push(ParseWarning::new(lineno, "unrecognized line, skipped".into()));
            }
        }
    }

    if let Some(rec) = current.take() {
        records.push(rec);
    }

    ReadOutcome { records, warnings }
}
