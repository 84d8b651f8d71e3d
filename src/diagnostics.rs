//! Recoverable data-quality diagnostics.
//!
//! Generation never aborts on bad rows or missing templates; it reports a
//! [`Diagnostic`] to a [`DiagnosticSink`] and continues with the documented
//! degraded output. Fatal conditions use [`crate::error::GenerationError`]
//! instead and never pass through here.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::config::TemplateKind;

/// Severity classification for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Degraded output (skipped element, missing reference block, ...).
    Warning,
    /// Malformed row data (failed fill-down, unreadable column).
    Error,
}

/// A single recoverable data-quality event.
///
/// The `Display` impl produces the user-facing message; sinks decide where
/// it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A cell in the contiguous empty prefix could not be filled because the
    /// previous row is empty there too. The cell stays empty.
    FillDownGap {
        line: usize,
        column: usize,
        column_name: Option<String>,
    },
    /// A row is too short to have a cell at the requested column.
    ColumnOutOfRange {
        line: usize,
        column: usize,
        column_name: Option<String>,
    },
    /// More than one row rests at a node; only the first supplies properties.
    MultiplePropertyRows {
        id: String,
        name: String,
        lines: Vec<usize>,
    },
    /// No element template resolves for a column; the element is skipped.
    MissingElementTemplate {
        column: usize,
        id: String,
        name: String,
    },
    /// A reference flag is on but no reference template resolves for the
    /// column; the element renders without that reference block.
    MissingReferenceTemplate {
        kind: TemplateKind,
        column: usize,
        id: String,
        name: String,
    },
    /// No property template resolves for a property column; that property is
    /// omitted for the element.
    MissingPropertyTemplate {
        property_column: usize,
        id: String,
        name: String,
    },
    /// A global default template is not configured.
    MissingDefaultTemplate { kind: TemplateKind },
    /// `propertyColumns` is malformed; property columns are ignored.
    InvalidPropertyColumns { value: String },
    /// `numericStartId` is malformed; the numeric counter starts at 0.
    InvalidNumericStartId { value: String },
    /// A settings line has no tab separator and is skipped.
    SettingsLineWithoutTab { line: usize },
    /// A settings continuation line has no preceding key and is skipped.
    SettingsContinuationWithoutKey { line: usize },
    /// A configured header/footer file is absent or not a regular file; the
    /// section is skipped.
    SectionFileUnavailable {
        section: &'static str,
        path: PathBuf,
    },
}

impl Diagnostic {
    /// Severity of this event.
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::FillDownGap { .. } | Diagnostic::ColumnOutOfRange { .. } => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

/// Formats `Some("rank")` as ` ('rank')`, and `None` as nothing.
fn named(column_name: &Option<String>) -> String {
    match column_name {
        Some(name) => format!(" ('{name}')"),
        None => String::new(),
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::FillDownGap {
                line,
                column,
                column_name,
            } => write!(
                f,
                "could not fill down column {column}{} in line {line}",
                named(column_name)
            ),
            Diagnostic::ColumnOutOfRange {
                line,
                column,
                column_name,
            } => write!(
                f,
                "cannot find column {column}{} in line {line}",
                named(column_name)
            ),
            Diagnostic::MultiplePropertyRows { id, name, lines } => {
                let mut listed = String::new();
                for (i, line) in lines.iter().enumerate() {
                    if i > 0 {
                        listed.push_str(if i + 1 == lines.len() { " and " } else { ", " });
                    }
                    listed.push_str(&line.to_string());
                }
                let first = lines.first().copied().unwrap_or_default();
                write!(
                    f,
                    "multiple lines supply properties for element {id} ('{name}'): \
                     lines {listed}; only the properties of line {first} are used"
                )
            }
            Diagnostic::MissingElementTemplate { column, id, name } => write!(
                f,
                "there is no ElementTemplate for column {column}; element {id} ('{name}') is skipped"
            ),
            Diagnostic::MissingReferenceTemplate {
                kind,
                column,
                id,
                name,
            } => write!(
                f,
                "there is no {kind} for column {column}; references for element {id} ('{name}') are not emitted"
            ),
            Diagnostic::MissingPropertyTemplate {
                property_column,
                id,
                name,
            } => write!(
                f,
                "there is no PropertyTemplate for column {property_column}; \
                 this property is not emitted for element {id} ('{name}')"
            ),
            Diagnostic::MissingDefaultTemplate { kind } => {
                write!(f, "there is no default{kind} configured")
            }
            Diagnostic::InvalidPropertyColumns { value } => write!(
                f,
                "settings parameter 'propertyColumns' must be comma separated integers \
                 larger than 0, but is '{value}'; property columns are ignored"
            ),
            Diagnostic::InvalidNumericStartId { value } => write!(
                f,
                "settings parameter 'numericStartId' must be a non-negative integer, \
                 but is '{value}'; the counter starts at 0"
            ),
            Diagnostic::SettingsLineWithoutTab { line } => write!(
                f,
                "settings line {line} does not contain a tab separator; the line is skipped"
            ),
            Diagnostic::SettingsContinuationWithoutKey { line } => write!(
                f,
                "settings line {line} starts with a tab but there is no previous \
                 setting to continue; the line is skipped"
            ),
            Diagnostic::SectionFileUnavailable { section, path } => write!(
                f,
                "{section} file '{}' is not a readable file; the section is skipped",
                path.display()
            ),
        }
    }
}

/// Receiver for diagnostics.
///
/// Implementors can log, collect, or forward events.
pub trait DiagnosticSink: Send + Sync {
    /// Called once per reported event, in emission order.
    fn report(&self, diagnostic: &Diagnostic);
}

/// Logs diagnostics to stderr.
#[derive(Debug, Default)]
pub struct StdErrSink;

impl DiagnosticSink for StdErrSink {
    fn report(&self, diagnostic: &Diagnostic) {
        eprintln!("[taxogen][{:?}] {diagnostic}", diagnostic.severity());
    }
}

/// Collects diagnostics in memory, mainly for tests and embedders that want
/// to inspect data quality after a run.
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    /// Create an empty collecting sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far, in emission order.
    pub fn collected(&self) -> Vec<Diagnostic> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// True if nothing has been reported.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().map(|e| e.is_empty()).unwrap_or(true)
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(diagnostic.clone());
        }
    }
}

/// Fans a diagnostic out to a list of sinks.
#[derive(Default)]
pub struct CompositeSink {
    sinks: Vec<Arc<dyn DiagnosticSink>>,
}

impl CompositeSink {
    /// Create a new composite sink from a list of sinks.
    pub fn new(sinks: Vec<Arc<dyn DiagnosticSink>>) -> Self {
        Self { sinks }
    }
}

impl fmt::Debug for CompositeSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeSink")
            .field("sinks_len", &self.sinks.len())
            .finish()
    }
}

impl DiagnosticSink for CompositeSink {
    fn report(&self, diagnostic: &Diagnostic) {
        for sink in &self.sinks {
            sink.report(diagnostic);
        }
    }
}
