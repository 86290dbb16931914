//! Human/agent context detection
//!
//! Determines whether rich output should be enabled based on the execution context.

use console::Term;

/// Display context representing the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayContext {
    /// Agent context - plain output for logs, pipes and CI
    Agent,
    /// Human context - rich styled output
    #[default]
    Human,
}

impl DisplayContext {
    /// Auto-detect the display context from environment, for stdout
    #[must_use]
    pub fn detect() -> Self {
        Self::detect_for(&Term::stdout())
    }

    /// Auto-detect the display context for output written to `term`
    #[must_use]
    pub fn detect_for(term: &Term) -> Self {
        if rich_from(|var| std::env::var_os(var).is_some(), term.is_term()) {
            Self::Human
        } else {
            Self::Agent
        }
    }

    /// Check if this is a human context (rich output enabled)
    #[must_use]
    pub fn is_human(&self) -> bool {
        matches!(self, Self::Human)
    }

    /// Check if this is an agent context (plain output)
    #[must_use]
    pub fn is_agent(&self) -> bool {
        matches!(self, Self::Agent)
    }
}

/// Environment markers that mean nobody is watching a terminal.
const AGENT_MARKERS: &[&str] = &["CI", "AGENT_MODE", "RICHDEMO_PLAIN", "NO_COLOR"];

/// Determine if rich output should be enabled on stdout
#[must_use]
pub fn should_enable_rich() -> bool {
    DisplayContext::detect().is_human()
}

/// Decision logic behind [`should_enable_rich`], with the environment and
/// terminal check injected.
pub(crate) fn rich_from(is_set: impl Fn(&str) -> bool, is_term: bool) -> bool {
    // Explicit enable always wins
    if is_set("RICHDEMO_FORCE_COLOR") {
        return true;
    }
    if AGENT_MARKERS.iter().any(|var| is_set(var)) {
        return false;
    }
    is_term
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with(vars: &'static [&'static str]) -> impl Fn(&str) -> bool {
        move |name| vars.contains(&name)
    }

    #[test]
    fn test_default_is_human() {
        assert!(DisplayContext::default().is_human());
        assert!(!DisplayContext::default().is_agent());
    }

    #[test]
    fn test_terminal_without_markers_is_rich() {
        assert!(rich_from(env_with(&[]), true));
    }

    #[test]
    fn test_pipe_is_plain() {
        assert!(!rich_from(env_with(&[]), false));
    }

    #[test]
    fn test_no_color_disables_rich() {
        assert!(!rich_from(env_with(&["NO_COLOR"]), true));
        assert!(!rich_from(env_with(&["CI"]), true));
    }

    #[test]
    fn test_force_color_wins() {
        assert!(rich_from(env_with(&["RICHDEMO_FORCE_COLOR", "NO_COLOR"]), false));
    }
}
