//! Non-fatal synthesis diagnostics

use std::fmt;

use entangle_sdk::MemberKind;

/// Anomaly detected during surrogate synthesis.
///
/// Both kinds are recoverable: the engine logs them and carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Strategies were supplied again for an already built (origin, variation)
    /// pair. The original definition was kept.
    Redefinition {
        /// Origin class name
        origin: String,
        /// Variation label
        variation: String,
        /// Surrogate that was kept
        surrogate: String,
    },
    /// The surrogate name already belonged to another (origin, variation)
    /// pair. The name was rebound to the new definition.
    NameCollision {
        /// Surrogate name
        name: String,
        /// Origin that owned the name before
        previous_origin: String,
        /// Variation that owned the name before
        previous_variation: String,
        /// Origin now owning the name
        origin: String,
        /// Variation now owning the name
        variation: String,
    },
    /// A variation named a handler strategy that is not registered. The
    /// kind was left without a handler.
    UnknownHandler {
        /// Strategy name
        name: String,
        /// Slot kind it was requested for
        kind: MemberKind,
        /// Variation label
        variation: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Redefinition { origin, variation, surrogate } => write!(
                f,
                "attempted redefinition of surrogate '{}' for {} (variation '{}'); keeping the original",
                surrogate, origin, variation
            ),
            Diagnostic::NameCollision {
                name,
                previous_origin,
                previous_variation,
                origin,
                variation,
            } => write!(
                f,
                "surrogate name '{}' already used by {} (variation '{}'); overwriting with {} (variation '{}')",
                name, previous_origin, previous_variation, origin, variation
            ),
            Diagnostic::UnknownHandler { name, kind, variation } => write!(
                f,
                "no handler strategy registered as '{}'; {} slots of variation '{}' left undefined",
                name, kind, variation
            ),
        }
    }
}

/// Sink for diagnostics: logs each one and optionally keeps it
#[derive(Debug)]
pub struct DiagnosticLog {
    retain: bool,
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    /// Create a log
    pub fn new(retain: bool) -> Self {
        Self {
            retain,
            entries: Vec::new(),
        }
    }

    /// Report a diagnostic
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(target: "entangle", "{}", diagnostic);
        if self.retain {
            self.entries.push(diagnostic);
        }
    }

    /// Retained diagnostics, oldest first
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Drain retained diagnostics
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.entries)
    }

    /// Number of retained diagnostics
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is retained
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::new(true)
    }
}
