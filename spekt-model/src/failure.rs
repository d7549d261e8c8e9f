//! Test Failures
//!
//! Failure values raised by user code or synthesized by the runtime,
//! carried through the supervisor to the host. The variants mirror what a
//! host can usefully distinguish: plain assertion failures, diff-capable
//! comparisons, composites from multi-assertion helpers, runtime-detected
//! conditions, and everything else.

use crate::DataValue;
use thiserror::Error;

/// One frame of a captured stack trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    /// Fully qualified function path.
    pub function: String,
    /// Source file.
    pub file: String,
    /// Source line.
    pub line: u32,
}

impl StackFrame {
    /// Frame at a source position.
    pub fn new(function: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            function: function.into(),
            file: file.into(),
            line,
        }
    }
}

/// A captured stack trace, innermost frame first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StackTrace {
    /// Frames, innermost first.
    pub frames: Vec<StackFrame>,
}

impl StackTrace {
    /// Trace with no frames.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Trace from captured frames.
    pub fn from_frames(frames: Vec<StackFrame>) -> Self {
        Self { frames }
    }
}

/// Structured form of a failed assertion's expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionInfo {
    /// Operator joining the operands, when the expression is a binary
    /// comparison.
    pub operator: Option<String>,
    /// Evaluated operand values, left to right.
    pub operands: Vec<DataValue>,
}

impl ExpressionInfo {
    /// A binary comparison expression.
    pub fn comparison(operator: impl Into<String>, left: DataValue, right: DataValue) -> Self {
        Self {
            operator: Some(operator.into()),
            operands: vec![left, right],
        }
    }

    /// An expression with no operator breakdown.
    pub fn opaque(operands: Vec<DataValue>) -> Self {
        Self {
            operator: None,
            operands,
        }
    }

    /// True for `==` between exactly two operands; such failures qualify
    /// for diff-friendly comparison reporting.
    pub fn is_equality_comparison(&self) -> bool {
        self.operator.as_deref() == Some("==") && self.operands.len() == 2
    }
}

/// An assertion failure as raised by the condition machinery.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionFailure {
    /// Failure message.
    pub message: String,
    /// Structured expression, when the machinery captured one.
    pub expression: Option<ExpressionInfo>,
    /// Captured stack trace.
    pub trace: StackTrace,
}

impl ConditionFailure {
    /// Condition failure without a structured expression.
    pub fn new(message: impl Into<String>, trace: StackTrace) -> Self {
        Self {
            message: message.into(),
            expression: None,
            trace,
        }
    }

    /// Attach the structured expression.
    pub fn with_expression(mut self, expression: ExpressionInfo) -> Self {
        self.expression = Some(expression);
        self
    }
}

/// A diff-capable failure carrying rendered expected and actual values.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonFailure {
    /// Original failure message.
    pub message: String,
    /// Rendered expected value.
    pub expected: String,
    /// Rendered actual value.
    pub actual: String,
    /// Trace carried over from the original failure.
    pub trace: StackTrace,
}

/// A failure raised during a spec run, or synthesized by the runtime.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TestFailure {
    /// An assertion did not hold.
    #[error("{}", .0.message)]
    Condition(ConditionFailure),

    /// An equality assertion converted into diff-friendly form.
    #[error("{}", .0.message)]
    Comparison(ComparisonFailure),

    /// Several failures raised by one method call; reported one by one.
    #[error("{} constituent failures", .0.len())]
    Multiple(Vec<TestFailure>),

    /// A condition the runtime detected on its own.
    #[error("{message}")]
    Execution {
        /// What went wrong.
        message: String,
        /// Trace, usually empty for synthesized failures.
        trace: StackTrace,
    },

    /// Any other error raised by user code.
    #[error("{message}")]
    Error {
        /// The error's message.
        message: String,
        /// Captured stack trace.
        trace: StackTrace,
    },
}

impl TestFailure {
    /// A generic error failure with no trace.
    pub fn error(message: impl Into<String>) -> Self {
        TestFailure::Error {
            message: message.into(),
            trace: StackTrace::empty(),
        }
    }

    /// A runtime-synthesized failure with no trace.
    pub fn execution(message: impl Into<String>) -> Self {
        TestFailure::Execution {
            message: message.into(),
            trace: StackTrace::empty(),
        }
    }

    /// The failure's message; for composites, the first constituent's.
    pub fn message(&self) -> &str {
        match self {
            TestFailure::Condition(condition) => &condition.message,
            TestFailure::Comparison(comparison) => &comparison.message,
            TestFailure::Multiple(parts) => parts.first().map(|f| f.message()).unwrap_or(""),
            TestFailure::Execution { message, .. } | TestFailure::Error { message, .. } => message,
        }
    }

    /// The captured trace, when this variant carries one directly.
    pub fn trace(&self) -> Option<&StackTrace> {
        match self {
            TestFailure::Condition(condition) => Some(&condition.trace),
            TestFailure::Comparison(comparison) => Some(&comparison.trace),
            TestFailure::Multiple(_) => None,
            TestFailure::Execution { trace, .. } | TestFailure::Error { trace, .. } => Some(trace),
        }
    }

    /// Mutable trace access, for in-place filtering.
    pub fn trace_mut(&mut self) -> Option<&mut StackTrace> {
        match self {
            TestFailure::Condition(condition) => Some(&mut condition.trace),
            TestFailure::Comparison(comparison) => Some(&mut comparison.trace),
            TestFailure::Multiple(_) => None,
            TestFailure::Execution { trace, .. } | TestFailure::Error { trace, .. } => Some(trace),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_equality_comparison_detection() {
        let eq = ExpressionInfo::comparison("==", json!(4), json!(5));
        assert!(eq.is_equality_comparison());

        let lt = ExpressionInfo::comparison("<", json!(4), json!(5));
        assert!(!lt.is_equality_comparison());

        let opaque = ExpressionInfo::opaque(vec![json!(false)]);
        assert!(!opaque.is_equality_comparison());
    }

    #[test]
    fn test_message_of_composite_is_first_constituent() {
        let failure = TestFailure::Multiple(vec![
            TestFailure::error("first"),
            TestFailure::error("second"),
        ]);
        assert_eq!(failure.message(), "first");
        assert_eq!(TestFailure::Multiple(Vec::new()).message(), "");
    }

    #[test]
    fn test_display_uses_message() {
        let failure = TestFailure::Condition(
            ConditionFailure::new("condition not satisfied", StackTrace::empty())
                .with_expression(ExpressionInfo::comparison("==", json!(1), json!(2))),
        );
        assert_eq!(failure.to_string(), "condition not satisfied");
    }

    #[test]
    fn test_trace_accessors() {
        let trace = StackTrace::from_frames(vec![StackFrame::new("calc::add", "calc.rs", 12)]);
        let mut failure = TestFailure::Error {
            message: "boom".to_string(),
            trace,
        };
        assert_eq!(failure.trace().unwrap().frames.len(), 1);
        failure.trace_mut().unwrap().frames.clear();
        assert!(failure.trace().unwrap().frames.is_empty());
        assert!(TestFailure::Multiple(Vec::new()).trace().is_none());
    }
}
