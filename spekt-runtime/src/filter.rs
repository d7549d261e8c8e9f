//! Stack Trace Filtering
//!
//! Reported traces should point at user code, not at runtime plumbing.
//! The supervisor runs every carried trace through a [`StackTraceFilter`]
//! before the failure reaches the host.

use spekt_model::StackTrace;

/// Scrubs frames from captured traces before reporting.
pub trait StackTraceFilter {
    /// Filter `trace` in place.
    fn filter(&self, trace: &mut StackTrace);
}

/// Filter that keeps every frame, for hosts that want raw traces.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepAllFrames;

impl StackTraceFilter for KeepAllFrames {
    fn filter(&self, _trace: &mut StackTrace) {}
}

/// Drops frames whose function path starts with a hidden prefix.
#[derive(Debug, Clone)]
pub struct FrameworkStackTraceFilter {
    hidden_prefixes: Vec<String>,
}

impl FrameworkStackTraceFilter {
    /// Filter hiding the given function-path prefixes.
    pub fn new(hidden_prefixes: Vec<String>) -> Self {
        Self { hidden_prefixes }
    }

    /// The prefixes hidden by default: runtime internals and the panic
    /// machinery they sit on.
    pub fn default_prefixes() -> Vec<String> {
        [
            "spekt_runtime::",
            "spekt_model::",
            "core::panicking",
            "std::panicking",
        ]
        .iter()
        .map(|prefix| prefix.to_string())
        .collect()
    }
}

impl Default for FrameworkStackTraceFilter {
    fn default() -> Self {
        Self::new(Self::default_prefixes())
    }
}

impl StackTraceFilter for FrameworkStackTraceFilter {
    fn filter(&self, trace: &mut StackTrace) {
        trace.frames.retain(|frame| {
            !self
                .hidden_prefixes
                .iter()
                .any(|prefix| frame.function.starts_with(prefix))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spekt_model::StackFrame;

    fn mixed_trace() -> StackTrace {
        StackTrace::from_frames(vec![
            StackFrame::new("core::panicking::panic", "panicking.rs", 50),
            StackFrame::new("spekt_runtime::supervisor::drive", "supervisor.rs", 10),
            StackFrame::new("calc::divide", "calc.rs", 3),
            StackFrame::new("calc_spec::divides_numbers", "calc_spec.rs", 21),
        ])
    }

    #[test]
    fn test_framework_frames_are_dropped() {
        let mut trace = mixed_trace();
        FrameworkStackTraceFilter::default().filter(&mut trace);
        let functions: Vec<_> = trace.frames.iter().map(|f| f.function.as_str()).collect();
        assert_eq!(functions, ["calc::divide", "calc_spec::divides_numbers"]);
    }

    #[test]
    fn test_keep_all_is_identity() {
        let mut trace = mixed_trace();
        KeepAllFrames.filter(&mut trace);
        assert_eq!(trace.frames.len(), 4);
    }

    #[test]
    fn test_custom_prefixes() {
        let filter = FrameworkStackTraceFilter::new(vec!["calc::".to_string()]);
        let mut trace = mixed_trace();
        filter.filter(&mut trace);
        assert!(trace
            .frames
            .iter()
            .all(|frame| !frame.function.starts_with("calc::")));
    }
}
