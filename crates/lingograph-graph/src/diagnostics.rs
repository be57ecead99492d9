//! Advisory diagnostics for data curators.
//!
//! Nothing in the pipeline fails because of bad data. Each problem is recorded
//! here (and mirrored as a `tracing` event) and the load carries on with a
//! best-effort graph.

use lingograph_ingest::{IngestIssue, RecordKind};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DiagnosticKind {
    /// A code that names no entity of the expected kind.
    UnresolvedReference,
    /// A second occurrence of something already loaded.
    DuplicateInput,
    /// A hierarchy walk went deeper than the configured limit.
    DepthExceeded,
    /// A hierarchy walk came back to a node already on its path.
    CycleDetected,
    /// A row with the wrong shape; dropped.
    MalformedRow,
    /// A containment edge between scopes that cannot nest.
    IllegalContainment,
    /// A vocabulary value that did not parse; the field was left empty.
    UnknownValue,
    /// A row that carried nothing to apply.
    EmptyRecord,
    /// A population above its territory's population, lowered to fit.
    ValueClamped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Stage {
    Ingest,
    Link,
    Synthesize,
    Reconcile,
    Aggregate,
    TerritoryRollup,
    Indigeneity,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Ingest => "ingest",
            Stage::Link => "link",
            Stage::Synthesize => "synthesize",
            Stage::Reconcile => "reconcile",
            Stage::Aggregate => "aggregate",
            Stage::TerritoryRollup => "territory-rollup",
            Stage::Indigeneity => "indigeneity",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub stage: Stage,
    pub kind: DiagnosticKind,
    pub severity: Severity,
    /// ID of the entity (or row) the diagnostic is about.
    pub subject: Option<String>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subject {
            Some(subject) => write!(f, "[{}] {:?} {}: {}", self.stage, self.kind, subject, self.message),
            None => write!(f, "[{}] {:?}: {}", self.stage, self.kind, self.message),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(
        &mut self,
        stage: Stage,
        kind: DiagnosticKind,
        subject: Option<&str>,
        message: impl Into<String>,
    ) {
        let severity = match kind {
            DiagnosticKind::DepthExceeded
            | DiagnosticKind::CycleDetected
            | DiagnosticKind::MalformedRow
            | DiagnosticKind::IllegalContainment => Severity::Warning,
            _ => Severity::Info,
        };
        let diagnostic = Diagnostic {
            stage,
            kind,
            severity,
            subject: subject.map(str::to_string),
            message: message.into(),
        };
        match severity {
            Severity::Warning => tracing::warn!(
                stage = %diagnostic.stage,
                kind = ?diagnostic.kind,
                subject = diagnostic.subject.as_deref().unwrap_or("-"),
                "{}",
                diagnostic.message
            ),
            Severity::Info => tracing::debug!(
                stage = %diagnostic.stage,
                kind = ?diagnostic.kind,
                subject = diagnostic.subject.as_deref().unwrap_or("-"),
                "{}",
                diagnostic.message
            ),
        }
        self.items.push(diagnostic);
    }

    pub(crate) fn absorb_ingest(&mut self, issues: &[IngestIssue]) {
        for issue in issues {
            let kind = match (&issue.error, issue.dropped) {
                (lingograph_ingest::IngestError::DuplicateId { .. }, _) => {
                    DiagnosticKind::DuplicateInput
                }
                (lingograph_ingest::IngestError::UnknownValue(_), false) => {
                    DiagnosticKind::UnknownValue
                }
                (_, true) => DiagnosticKind::MalformedRow,
                (_, false) => DiagnosticKind::UnknownValue,
            };
            let subject = format!("{} row {}", record_label(issue.record), issue.index);
            let action = if issue.dropped { "dropped" } else { "kept" };
            self.report(
                Stage::Ingest,
                kind,
                Some(&subject),
                format!("{} ({})", issue.error, action),
            );
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.kind == kind)
    }

    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.of_kind(kind).next().is_some()
    }

    pub fn counts_by_kind(&self) -> BTreeMap<DiagnosticKind, usize> {
        let mut counts = BTreeMap::new();
        for item in &self.items {
            *counts.entry(item.kind).or_insert(0) += 1;
        }
        counts
    }
}

fn record_label(record: RecordKind) -> &'static str {
    match record {
        RecordKind::Language => "language",
        RecordKind::Locale => "locale",
        RecordKind::Territory => "territory",
        RecordKind::WritingSystem => "writing system",
        RecordKind::VariantTag => "variant tag",
        RecordKind::Census => "census",
    }
}
