//! Run Listeners
//!
//! Internal lifecycle observers. Directive processors register them on the
//! spec at build time; the supervisor forwards every lifecycle callback to
//! them before any host notification goes out.

use crate::event::{ErrorInfo, IterationInfo};
use crate::spec::{FeatureId, SpecInfo};

/// Observer of one spec run's lifecycle.
///
/// Every callback defaults to a no-op; implementations override the ones
/// they care about. Callbacks must not register further listeners on the
/// spec.
pub trait RunListener {
    /// The spec run is starting.
    fn before_spec(&mut self, _spec: &SpecInfo) {}

    /// A feature is about to run.
    fn before_feature(&mut self, _spec: &SpecInfo, _feature: FeatureId) {}

    /// One iteration of a parameterized feature is about to run.
    fn before_iteration(&mut self, _spec: &SpecInfo, _iteration: &IterationInfo) {}

    /// A failure was reported.
    fn error(&mut self, _spec: &SpecInfo, _error: &ErrorInfo) {}

    /// One iteration finished.
    fn after_iteration(&mut self, _spec: &SpecInfo, _iteration: &IterationInfo) {}

    /// A feature finished.
    fn after_feature(&mut self, _spec: &SpecInfo, _feature: FeatureId) {}

    /// The spec run finished.
    fn after_spec(&mut self, _spec: &SpecInfo) {}

    /// The whole spec was skipped; replaces the before/after pair.
    fn spec_skipped(&mut self, _spec: &SpecInfo) {}

    /// One feature was skipped without running; replaces its before/after
    /// pair.
    fn feature_skipped(&mut self, _spec: &SpecInfo, _feature: FeatureId) {}
}
