#![warn(missing_docs)]

//! Spekt Runtime Model
//!
//! The typed tree a built spec lives in: a [`SpecInfo`] arena owning field,
//! method, and feature nodes addressed by index handles, plus the failure
//! and event records a run produces. Nodes are passive data; all build and
//! run behavior lives in `spekt-runtime`.
//!
//! The model is deliberately single-threaded (`Rc`/`RefCell`, not
//! `Arc`/`Mutex`): one spec run is driven by exactly one executor at a time.

mod describe;
mod event;
mod failure;
mod feature;
mod listener;
mod method;
mod spec;

pub use describe::Description;
pub use event::{ErrorInfo, IterationInfo};
pub use failure::{
    ComparisonFailure, ConditionFailure, ExpressionInfo, StackFrame, StackTrace, TestFailure,
};
pub use feature::{BlockInfo, DataProviderInfo, FeatureInfo};
pub use listener::RunListener;
pub use method::{MethodInfo, MethodKind};
pub use spec::{FeatureId, FieldId, FieldInfo, MethodId, SpecInfo};

/// Data values exchanged with user code: iteration rows, rendered operands,
/// annotation arguments.
pub type DataValue = serde_json::Value;
