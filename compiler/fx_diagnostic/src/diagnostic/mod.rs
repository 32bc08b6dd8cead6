//! Core diagnostic type.

use std::fmt;

use fx_ir::Span;

use crate::MessageKey;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A located, localizable diagnostic.
///
/// `args` are positional substitutions for the host's message template; the
/// meaning of each position is documented on the [`MessageKey`] variant.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub span: Span,
    pub severity: Severity,
    pub key: MessageKey,
    pub args: Vec<String>,
}

impl Diagnostic {
    /// Diagnostic at `span` with the key's default severity.
    #[cold]
    pub fn new(key: MessageKey, span: Span) -> Self {
        Diagnostic {
            span,
            severity: key.default_severity(),
            key,
            args: Vec::new(),
        }
    }

    #[cold]
    pub fn error(key: MessageKey, span: Span) -> Self {
        Self::new(key, span).with_severity(Severity::Error)
    }

    #[cold]
    pub fn warning(key: MessageKey, span: Span) -> Self {
        Self::new(key, span).with_severity(Severity::Warning)
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Append one message argument.
    pub fn with_arg(mut self, arg: impl fmt::Display) -> Self {
        self.args.push(arg.to_string());
        self
    }

    pub fn with_args<I, T>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: fmt::Display,
    {
        self.args.extend(args.into_iter().map(|a| a.to_string()));
        self
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Localization key the host resolves to text.
    #[inline]
    pub fn message_key(&self) -> &'static str {
        self.key.key()
    }
}

impl fmt::Display for Diagnostic {
    /// Debug rendering for logs and test failures; not user-facing text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} at {}", self.severity, self.key, self.span)?;
        if !self.args.is_empty() {
            write!(f, " ({})", self.args.join(", "))?;
        }
        Ok(())
    }
}
