//! Method Nodes

use crate::spec::FeatureId;
use spekt_meta::{Annotation, MethodRef};

/// The role a method plays in a spec.
///
/// Closed on purpose: the supervisor's unwind decision matches on this
/// exhaustively, so adding a role forces that decision at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// A feature (scenario) method.
    Feature,
    /// Per-feature setup fixture.
    Setup,
    /// Per-feature cleanup fixture.
    Cleanup,
    /// One-time spec setup fixture.
    SetupSpec,
    /// One-time spec cleanup fixture.
    CleanupSpec,
    /// Compiler-derived method mapping provider rows to feature arguments.
    DataProcessor,
    /// Compiler-derived method producing one data variable's values.
    DataProvider,
    /// The synthetic frame driving one feature's iterations.
    FeatureExecution,
    /// The synthetic frame driving the whole spec.
    SpecExecution,
}

impl MethodKind {
    /// Whether this kind is one of the four fixture roles.
    pub fn is_fixture(self) -> bool {
        matches!(
            self,
            MethodKind::Setup
                | MethodKind::Cleanup
                | MethodKind::SetupSpec
                | MethodKind::CleanupSpec
        )
    }
}

/// A callable unit of the spec: feature, fixture, or compiler-derived
/// helper.
#[derive(Debug, Clone)]
pub struct MethodInfo {
    name: String,
    kind: MethodKind,
    reference: Option<MethodRef>,
    annotations: Vec<Annotation>,
    feature: Option<FeatureId>,
}

impl MethodInfo {
    /// A method backed by artifact code.
    pub fn new(
        name: impl Into<String>,
        kind: MethodKind,
        reference: MethodRef,
        annotations: Vec<Annotation>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            reference: Some(reference),
            annotations,
            feature: None,
        }
    }

    /// A stub for a fixture the class does not declare. Stubs carry no
    /// annotations and are skipped by directive processing.
    pub fn stub(name: impl Into<String>, kind: MethodKind) -> Self {
        Self {
            name: name.into(),
            kind,
            reference: None,
            annotations: Vec::new(),
            feature: None,
        }
    }

    /// Method name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Role of this method.
    pub fn kind(&self) -> MethodKind {
        self.kind
    }

    /// Handle to the artifact method; absent for stubs.
    pub fn reference(&self) -> Option<MethodRef> {
        self.reference
    }

    /// True when no artifact method backs this node.
    pub fn is_stub(&self) -> bool {
        self.reference.is_none()
    }

    /// Annotations declared on the method.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Find an annotation by name.
    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.name == name)
    }

    /// Owning feature; set exactly for `Feature` methods.
    pub fn feature(&self) -> Option<FeatureId> {
        self.feature
    }

    /// Link to the owning feature.
    pub fn set_feature(&mut self, feature: Option<FeatureId>) {
        self.feature = feature;
    }
}
