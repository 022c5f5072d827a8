//! Line classification for the stat-block format.
//!
//! Each source line is classified independently; there is no lookahead
//! across lines here, which is what makes the reader able to resynchronize
//! after a malformed line by just moving on to the next one.

/// The classification of a single source line.
pub(super) enum Line {
    Blank,
    Comment,
    NewEntry(Result<String, String>),
    Type(Result<String, String>),
    Using(Result<String, String>),
    Data(Result<(String, String), String>),
    Unknown,
}

pub(super) fn classify_line(raw: &str) -> Line {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }
    if trimmed.starts_with("//") || trimmed.starts_with("--") {
        return Line::Comment;
    }

    if let Some(rest) = strip_keyword(trimmed, "new entry") {
        return Line::NewEntry(parse_single_quoted(rest));
    }
    if let Some(rest) = strip_keyword(trimmed, "type") {
        return Line::Type(parse_single_quoted(rest));
    }
    if let Some(rest) = strip_keyword(trimmed, "using") {
        return Line::Using(parse_single_quoted(rest));
    }
    if let Some(rest) = strip_keyword(trimmed, "data") {
        return Line::Data(parse_two_quoted(rest));
    }

    Line::Unknown
}

fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// Parses exactly one `"quoted string"` from the remainder of a line.
fn parse_single_quoted(rest: &str) -> Result<String, String> {
    let mut chars = rest.char_indices();
    match chars.next() {
        Some((_, '"')) => {}
        _ => return Err("expected opening quote".to_string()),
    }
    read_quoted(rest, 1).map(|(value, _)| value)
}

/// Parses two `"quoted string"` values separated by whitespace, as used
/// by `data "Key" "Value"` lines.
fn parse_two_quoted(rest: &str) -> Result<(String, String), String> {
    if !rest.starts_with('"') {
        return Err("expected opening quote for key".to_string());
    }
    let (key, consumed) = read_quoted(rest, 1)?;
    let remainder = rest[consumed..].trim_start();
    if !remainder.starts_with('"') {
        return Err(format!("expected opening quote for value after key \"{key}\""));
    }
    let offset = rest.len() - remainder.len();
    let (value, _) = read_quoted(rest, offset + 1)?;
    Ok((key, value))
}

/// Reads a quoted string starting at byte offset `start` (just past the
/// opening quote), returning the unescaped contents and the byte offset
/// just past the closing quote. Supports `\"` and `\\` escapes.
fn read_quoted(s: &str, start: usize) -> Result<(String, usize), String> {
    let bytes = s.as_bytes();
    let mut out = String::new();
    let mut i = start;
    let mut escaped = false;
    while i < bytes.len() {
        let c = s[i..].chars().next().unwrap();
        let len = c.len_utf8();
        if escaped {
            match c {
                '"' => out.push('"'),
                '\\' => out.push('\\'),
                other => {
                    out.push('\\');
                    out.push(other);
                }
            }
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            return Ok((out, i + len));
        } else {
            out.push(c);
        }
        i += len;
    }
    Err("unterminated quoted string".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_keyword_with_space() {
        assert_eq!(strip_keyword("type \"X\"", "type"), Some("\"X\""));
        assert_eq!(strip_keyword("typewriter", "type"), None);
    }

    #[test]
    fn reads_quoted_with_escapes() {
        let (value, consumed) = read_quoted(r#""a\"b""#, 1).unwrap();
        assert_eq!(value, "a\"b");
        assert_eq!(consumed, r#""a\"b""#.len());
    }

    #[test]
    fn two_quoted_parses_key_and_value() {
        let (k, v) = parse_two_quoted(r#""Boosts" "AC(2);DealDamage(1d4, Fire)""#).unwrap();
        assert_eq!(k, "Boosts");
        assert_eq!(v, "AC(2);DealDamage(1d4, Fire)");
    }

    #[test]
    fn unterminated_quote_errors() {
        assert!(parse_single_quoted("\"oops").is_err());
    }
}
