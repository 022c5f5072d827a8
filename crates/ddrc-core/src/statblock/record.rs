use std::collections::BTreeMap;

/// A single parsed record: `new entry "Name"` plus its `type`, `using`,
/// and `data` lines. Values are preserved verbatim as opaque strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub name: String,
    pub kind: Option<String>,
    pub parent: Option<String>,
    /// Ordered so downstream coercion can preserve semicolon-list order
    /// deterministically when several keys feed the same logical list.
    pub data: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            parent: None,
            data: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
}

/// A recoverable issue encountered while reading a stat-block source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseWarning {
    pub line: usize,
    pub message: String,
}

impl ParseWarning {
    pub fn new(line: usize, message: String) -> Self {
        Self { line, message }
    }
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}
