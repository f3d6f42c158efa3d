//! Attributable diagnostics
//!
//! Every failure the pipeline detects ends up as a [`Diagnostic`]. Nothing is
//! thrown across stage boundaries: stages return diagnostics and the
//! orchestrator forwards them to the host's [`DiagnosticSink`].

use std::fmt;

use crate::declaration::DeclId;

/// What went wrong, at the granularity hosts and tests care about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum DiagnosticKind {
    /// A marked type is not accessible to generated code
    PrivateType,
    /// A marked field is owned by something other than a struct
    FieldOutsideType,
    /// A marked field sits in a type without the type marker
    UnmarkedEnclosingType,
    /// A marked field is not accessible to generated code
    PrivateField,
    /// A marked field cannot be assigned by generated code
    ImmutableField,
    /// The mapping domain rejected a declaration while extracting it
    Extraction,
    /// A cross-column or cross-type invariant does not hold
    Aggregate,
    /// A generator failed for one type
    Generation,
    /// Anything outside the per-declaration model
    Fault,
}

/// An error message attributed to the declaration that caused it
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Diagnostic {
    pub declaration: Option<DeclId>,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(declaration: DeclId, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            declaration: Some(declaration),
            kind,
            message: message.into(),
        }
    }

    /// A round-level diagnostic that cannot be pinned on a declaration
    pub fn unattributed(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            declaration: None,
            kind,
            message: message.into(),
        }
    }

    pub fn extraction(declaration: DeclId, message: impl Into<String>) -> Self {
        Self::new(declaration, DiagnosticKind::Extraction, message)
    }

    pub fn aggregate(declaration: DeclId, message: impl Into<String>) -> Self {
        Self::new(declaration, DiagnosticKind::Aggregate, message)
    }

    pub fn is_attributed_to(&self, id: DeclId) -> bool {
        self.declaration == Some(id)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.declaration {
            Some(id) => write!(f, "[{}] {}: {}", self.kind, id, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

/// One-way sink the host routes diagnostics through
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Round-scoped accumulator for diagnostics
#[derive(Debug, Default)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::trace!("diagnostic: {}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Forget everything collected so far
    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }

    /// Hand every collected diagnostic to `sink`, leaving the buffer empty
    pub fn drain_into(&mut self, sink: &mut dyn DiagnosticSink) -> usize {
        let count = self.diagnostics.len();
        for diagnostic in self.diagnostics.drain(..) {
            sink.report(diagnostic);
        }
        count
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        for diagnostic in iter {
            self.push(diagnostic);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_into_empties_buffer() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::extraction(DeclId::new(3), "bad column"));
        diagnostics.push(Diagnostic::unattributed(DiagnosticKind::Fault, "sink closed"));

        let mut sink: Vec<Diagnostic> = Vec::new();
        assert_eq!(diagnostics.drain_into(&mut sink), 2);
        assert!(diagnostics.is_empty());
        assert_eq!(sink.len(), 2);
        assert!(sink[0].is_attributed_to(DeclId::new(3)));
        assert_eq!(sink[1].declaration, None);
    }

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::new(DeclId::new(1), DiagnosticKind::PrivateField, "nope");
        assert_eq!(diagnostic.to_string(), "[private-field] #1: nope");
    }
}
