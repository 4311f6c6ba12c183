use std::fmt;

/// A non-fatal condition noticed while building or solving a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Diagnostic {
    /// A constraint with both bounds infinite. It is kept but contributes no rows.
    FreeConstraint { index: usize },
    /// An objective was set while another one was already active.
    ObjectiveReplaced,
    /// Solve was called without an objective; the zero objective is used.
    MissingObjective,
    /// The objective direction was never chosen; it is maximized.
    MissingSense,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::FreeConstraint { index } => {
                write!(f, "constraint {} has no finite bound and has no effect", index)
            }
            Diagnostic::ObjectiveReplaced => write!(f, "overwriting previously set objective"),
            Diagnostic::MissingObjective => write!(f, "no objective set, solving for feasibility"),
            Diagnostic::MissingSense => write!(f, "objective direction not set, maximizing"),
        }
    }
}

/// Receiver for diagnostics.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
        self.push(diagnostic);
    }
}

/// Forwards diagnostics to the `log` facade and keeps nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
    }
}
