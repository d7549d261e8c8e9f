//! Run Events
//!
//! Records the executor hands to the supervisor: one per iteration of a
//! parameterized feature, and one per reported failure.

use crate::failure::TestFailure;
use crate::spec::{FeatureId, MethodId};
use crate::DataValue;

/// One execution of a feature against one row of data.
#[derive(Debug, Clone)]
pub struct IterationInfo {
    /// The feature being iterated.
    pub feature: FeatureId,
    /// The row of data values, in parameter order.
    pub data_values: Vec<DataValue>,
}

impl IterationInfo {
    /// Iteration of `feature` over one data row.
    pub fn new(feature: FeatureId, data_values: Vec<DataValue>) -> Self {
        Self {
            feature,
            data_values,
        }
    }
}

/// A failure tied to the method it was raised in.
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Method the failure was raised in; its kind decides how far the
    /// executor unwinds.
    pub method: MethodId,
    /// The failure value.
    pub failure: TestFailure,
}

impl ErrorInfo {
    /// Failure raised in `method`.
    pub fn new(method: MethodId, failure: TestFailure) -> Self {
        Self { method, failure }
    }
}
