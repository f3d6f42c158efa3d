//! Round orchestration
//!
//! A [`Processor`] drives one round at a time through
//! `Idle → Discovering → Extracting → Validating → Generating → Done`.
//! Failures are local: a declaration that fails any stage is reported and
//! left behind while the others carry on, and the round always reaches
//! `Done`, even when a generator panics or the artifact sink gives out.

use std::any::Any;
use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};

use crate::declaration::DeclId;
use crate::diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink, Diagnostics};
use crate::domain::MappingDomain;
use crate::extract::{extract_columns, extract_types};
use crate::generate::GeneratorSet;
use crate::meta::{ProcessingResult, ProcessingResultBuilder};
use crate::sink::ArtifactSink;

/// Where a processor is within its current round
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum RoundState {
    Idle,
    Discovering,
    Extracting,
    Validating,
    Generating,
    Done,
}

/// Summary of one finished round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundReport {
    /// Declarations carrying the type marker
    pub discovered: usize,
    /// Qualified names of types that received all their artifacts
    pub generated: Vec<String>,
    /// Types left without artifacts, whatever the stage that excluded them
    pub excluded: BTreeSet<DeclId>,
    pub artifacts_written: usize,
    pub diagnostics: usize,
}

impl RoundReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics == 0
    }
}

/// Runs discovery, extraction, validation and generation for a domain
pub struct Processor<D: MappingDomain> {
    domain: D,
    generators: GeneratorSet<D::TypeAttrs, D::ColumnAttrs>,
    state: RoundState,
    diagnostics: Diagnostics,
}

impl<D: MappingDomain> Processor<D> {
    /// Processor using the domain's own generators
    pub fn new(domain: D) -> Self {
        let generators = domain.generators();
        Self::with_generators(domain, generators)
    }

    /// Processor using `generators` in place of the domain's
    pub fn with_generators(domain: D, generators: GeneratorSet<D::TypeAttrs, D::ColumnAttrs>) -> Self {
        Self {
            domain,
            generators,
            state: RoundState::Idle,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn domain(&self) -> &D {
        &self.domain
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    /// Run one full round over `host`.
    ///
    /// Artifacts go to `artifacts`, diagnostics to `diagnostics`. Nothing
    /// from a previous round is carried over.
    pub fn process_round(
        &mut self,
        host: &D::Host,
        artifacts: &mut dyn ArtifactSink,
        diagnostics: &mut dyn DiagnosticSink,
    ) -> RoundReport {
        self.diagnostics.clear();
        self.state = RoundState::Idle;
        let mut report = RoundReport::default();

        self.transition(RoundState::Discovering);
        let mut builder = ProcessingResultBuilder::new();
        let (discovered, excluded) =
            extract_types(&self.domain, host, &mut builder, &mut self.diagnostics);
        report.discovered = discovered;
        report.excluded = excluded;

        self.transition(RoundState::Extracting);
        extract_columns(&self.domain, host, &mut builder, &mut self.diagnostics);
        let result = builder.freeze();

        self.transition(RoundState::Validating);
        match self.validate(&result) {
            Some(blocked) => report.excluded.extend(blocked),
            None => report.excluded.extend(result.iter().map(|(id, _)| id)),
        }

        self.transition(RoundState::Generating);
        self.generate(&result, artifacts, &mut report);

        self.transition(RoundState::Done);
        report.diagnostics = self.diagnostics.drain_into(diagnostics);
        log::debug!(
            "round done: {} discovered, {} generated, {} artifact(s), {} diagnostic(s)",
            report.discovered,
            report.generated.len(),
            report.artifacts_written,
            report.diagnostics
        );
        report
    }

    fn transition(&mut self, next: RoundState) {
        log::trace!("round state {} -> {}", self.state, next);
        self.state = next;
    }

    /// Run aggregate validation, returning the types it rules out.
    ///
    /// `None` means validation itself failed and no type can be trusted.
    fn validate(
        &mut self,
        result: &ProcessingResult<D::TypeAttrs, D::ColumnAttrs>,
    ) -> Option<BTreeSet<DeclId>> {
        let domain = &self.domain;
        let found = match panic::catch_unwind(AssertUnwindSafe(|| domain.validate_aggregate(result))) {
            Ok(found) => found,
            Err(payload) => {
                self.diagnostics.push(Diagnostic::unattributed(
                    DiagnosticKind::Fault,
                    format!(
                        "problem occurred while validating mappings: {}",
                        panic_message(payload.as_ref())
                    ),
                ));
                return None;
            }
        };

        let mut blocked = BTreeSet::new();
        for diagnostic in found {
            if let Some(owner) = diagnostic.declaration.and_then(|id| result.owner_of(id)) {
                blocked.insert(owner);
            }
            self.diagnostics.push(diagnostic);
        }
        log::debug!("aggregate validation blocked {} type(s)", blocked.len());
        Some(blocked)
    }

    fn generate(
        &mut self,
        result: &ProcessingResult<D::TypeAttrs, D::ColumnAttrs>,
        sink: &mut dyn ArtifactSink,
        report: &mut RoundReport,
    ) {
        for (id, meta) in result.iter() {
            if report.excluded.contains(&id) {
                continue;
            }

            let generators = &self.generators;
            let artifacts = match panic::catch_unwind(AssertUnwindSafe(|| generators.generate_all(meta))) {
                Ok(Ok(artifacts)) => artifacts,
                Ok(Err(err)) => {
                    self.diagnostics.push(Diagnostic::new(
                        err.declaration.unwrap_or(id),
                        DiagnosticKind::Generation,
                        err.message,
                    ));
                    report.excluded.insert(id);
                    continue;
                }
                Err(payload) => {
                    self.diagnostics.push(Diagnostic::unattributed(
                        DiagnosticKind::Fault,
                        format!(
                            "problem occurred while generating {}: {}",
                            meta.qualified_name,
                            panic_message(payload.as_ref())
                        ),
                    ));
                    report.excluded.insert(id);
                    continue;
                }
            };

            for artifact in artifacts {
                if let Err(err) = sink.write(artifact) {
                    self.diagnostics.push(Diagnostic::unattributed(
                        DiagnosticKind::Fault,
                        format!("problem occurred while writing artifacts: {err}"),
                    ));
                    // nothing from this type on reaches the sink
                    let remaining = result.iter().map(|(other, _)| other);
                    report
                        .excluded
                        .extend(remaining.skip_while(|other| *other != id));
                    return;
                }
                report.artifacts_written += 1;
            }
            report.generated.push(meta.qualified_name.clone());
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
