//! Tokenizing helpers shared by the boost and functor DSLs: both are
//! semicolon/comma-separated lists of `Name(arg, arg, ...)` terms where
//! arguments can themselves contain nested parens (`Resistance(Fire,
//! Resistant)` inside a larger functor chain), so naive `split(',')` would
//! cut them apart incorrectly.

/// Splits `s` on top-level occurrences of `delim`, ignoring any `delim`
/// found inside balanced `(...)`. Each returned slice is trimmed.
pub(crate) fn split_top_level(s: &str, delim: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            c if c == delim && depth == 0 => {
                parts.push(s[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(s[start..].trim());
    parts.into_iter().filter(|p| !p.is_empty()).collect()
}

/// Parses a single `Name(arg1, arg2, ...)` or bare `Name` term, returning
/// the name and the raw (untrimmed-of-quotes, not recursively parsed)
/// argument strings. Returns `None` for input that isn't shaped like a
/// term at all (e.g. empty string).
pub(crate) fn parse_call(term: &str) -> Option<(&str, Vec<&str>)> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    match term.find('(') {
        None => Some((term, Vec::new())),
        Some(open) => {
            let name = term[..open].trim();
            let close = term.rfind(')')?;
            if close < open {
                return None;
            }
            let inner = &term[open + 1..close];
            let args = if inner.trim().is_empty() { Vec::new() } else { split_top_level(inner, ',') };
            Some((name, args))
        }
    }
}

/// Strips a single layer of matching `'...'` or `"..."` quoting, if
/// present. Source data quotes string-like arguments (`'RAGING'`) but the
/// coercion layer accepts bare identifiers too (`RAGING`), so this is a
/// permissive unwrap rather than a strict parse.
pub(crate) fn unquote(s: &str) -> &str {
    let s = s.trim();
    if s.len() >= 2 {
        let bytes = s.as_bytes();
        if (bytes[0] == b'\'' && bytes[s.len() - 1] == b'\'') || (bytes[0] == b'"' && bytes[s.len() - 1] == b'"') {
            return &s[1..s.len() - 1];
        }
    }
    s
}
