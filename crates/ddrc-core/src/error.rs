//! Common error infrastructure shared across the rules core.
//!
//! Most of the DDRC never returns `Err` at all: per the "unknown or
//! malformed data must never silently grant a benefit" principle, a bad
//! boost string, an unresolvable function name, or a dangling status
//! reference degrades to an inert value (`false`, `Unrecognized`, a
//! warning) rather than propagating a failure. `Err` is reserved for
//! genuine programmer-facing misuse: querying a combatant id that was
//! never registered, asking the registry to resolve a cyclic `using`
//! chain, and the like.

use std::fmt;

/// Severity level of an error, used for categorization and recovery
/// strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable — caller may retry with the same or alternative input.
    Recoverable,
    /// Validation — invalid input, should not be retried unchanged.
    Validation,
    /// Internal — unexpected state inconsistency, indicates a bug.
    Internal,
    /// Fatal — game state is corrupted and cannot continue.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to an error for diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Identifier of the combatant or definition involved, if any.
    pub subject: Option<String>,
    /// Optional static message providing additional context.
    pub message: Option<&'static str>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait for all DDRC errors, mirroring the severity/context
/// classification used across the rest of the engine.
pub trait GameError: fmt::Display + fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    fn error_code(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Tracks which canonical strings have already produced a warning, so
/// "warn once per unknown function name" / "once per canonical boost
/// term" requirements don't spam the log on every evaluation.
#[derive(Debug, Default)]
pub struct WarnOnce {
    seen: std::sync::Mutex<std::collections::HashSet<String>>,
}

impl WarnOnce {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` the first time this key is seen, `false` on every
    /// subsequent call — callers log only on the `true` case.
    pub fn first_time(&self, key: &str) -> bool {
        let mut seen = self.seen.lock().unwrap_or_else(|poison| poison.into_inner());
        seen.insert(key.to_string())
    }

    pub fn clear(&self) {
        let mut seen = self.seen.lock().unwrap_or_else(|poison| poison.into_inner());
        seen.clear();
    }
}
