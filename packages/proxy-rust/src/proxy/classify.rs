//! Read/write classification of method names.

use std::fmt;

/// Whether a call is served by the primary delegate or fanned out to all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    Read,
    Write,
}

impl CallKind {
    /// Lowercase label used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a method by name: a read iff the name contains `get` or `find`
/// anywhere (case-sensitive), otherwise a write.
///
/// This is a substring match, not a prefix match. `findOrCreate` is a read
/// and `count` is a write.
#[must_use]
pub fn classify(method: &str) -> CallKind {
    if method.contains("get") || method.contains("find") {
        CallKind::Read
    } else {
        CallKind::Write
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
