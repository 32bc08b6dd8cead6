//! Engine configuration.

use fx_bind::BindOptions;
use fx_diagnostic::DiagnosticConfig;
use fx_types::CoercionRules;

/// Settings fixed for the lifetime of an [`Engine`](crate::Engine).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub numeric: CoercionRules,
    pub case_insensitive_globals: bool,
    pub allow_side_effects: bool,
    pub diagnostics: DiagnosticConfig,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse the lossy numeric conversions (`Number -> Decimal`, number and
    /// date-time interchange).
    #[must_use]
    pub fn strict_numeric(mut self, enabled: bool) -> Self {
        self.numeric.strict_numeric = enabled;
        self
    }

    /// Unify mismatched branch and row types through conversions, not only
    /// widenings.
    #[must_use]
    pub fn loose_unification(mut self, enabled: bool) -> Self {
        self.numeric.loose_unification = enabled;
        self
    }

    #[must_use]
    pub fn case_insensitive_globals(mut self, enabled: bool) -> Self {
        self.case_insensitive_globals = enabled;
        self
    }

    /// Permit behavior functions and `;` chaining.
    #[must_use]
    pub fn allow_side_effects(mut self, enabled: bool) -> Self {
        self.allow_side_effects = enabled;
        self
    }

    /// Keep at most `limit` errors per expression (0 = unlimited).
    #[must_use]
    pub fn error_limit(mut self, limit: usize) -> Self {
        self.diagnostics.error_limit = limit;
        self
    }

    pub(crate) fn bind_options(&self) -> BindOptions {
        BindOptions {
            rules: self.numeric,
            case_insensitive_globals: self.case_insensitive_globals,
            allow_side_effects: self.allow_side_effects,
            diagnostics: self.diagnostics.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_every_field() {
        let config = EngineConfig::new()
            .strict_numeric(true)
            .loose_unification(true)
            .case_insensitive_globals(true)
            .allow_side_effects(true)
            .error_limit(3);
        let options = config.bind_options();
        assert!(options.rules.strict_numeric);
        assert!(options.rules.loose_unification);
        assert!(options.case_insensitive_globals);
        assert!(options.allow_side_effects);
        assert_eq!(options.diagnostics.error_limit, 3);
    }

    #[test]
    fn default_matches_bind_defaults() {
        assert_eq!(EngineConfig::default().bind_options(), BindOptions::default());
    }
}
