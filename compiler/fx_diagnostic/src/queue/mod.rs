//! Diagnostic queue for collecting, deduplicating, and sorting diagnostics.
//!
//! Binding visits children before parents, so diagnostics are produced in
//! post-order. The queue restores source order on [`DiagnosticQueue::flush`]:
//! sorted by span start, then span end, ties kept in emission order.

use crate::Diagnostic;

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiagnosticConfig {
    /// Maximum number of errors kept (0 = unlimited).
    pub error_limit: usize,
    /// Drop a diagnostic identical to one already queued.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Keep everything (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Anything diagnostics can be reported into.
///
/// IR rewrite passes report through this so they stay agnostic of how the
/// host collects output.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Queue for collecting, deduplicating, and sorting diagnostics.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            error_count: 0,
            config,
        }
    }

    /// Add a diagnostic.
    ///
    /// Returns `true` if it was kept, `false` if the error limit or
    /// deduplication filtered it.
    pub fn push(&mut self, diag: Diagnostic) -> bool {
        let is_error = diag.is_error();
        if is_error && self.limit_reached() {
            return false;
        }
        if self.config.deduplicate && self.diagnostics.contains(&diag) {
            return false;
        }
        if is_error {
            self.error_count += 1;
        }
        self.diagnostics.push(diag);
        true
    }

    pub fn extend(&mut self, diags: impl IntoIterator<Item = Diagnostic>) {
        for diag in diags {
            self.push(diag);
        }
    }

    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics in emission order, without clearing.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Sort diagnostics by source position and return them, clearing the queue.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let already_sorted = self
            .diagnostics
            .windows(2)
            .all(|w| w[0].span <= w[1].span);

        if !already_sorted {
            // Stable: equal spans keep emission order.
            self.diagnostics.sort_by_key(|d| d.span);
        }

        self.error_count = 0;
        std::mem::take(&mut self.diagnostics)
    }
}

impl DiagnosticSink for DiagnosticQueue {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}
