#![warn(missing_docs)]
//! # Spekt
//!
//! Specification-style testing runtime for Rust: a typed spec model, built
//! from compiled artifacts, and a supervisor that reports runs to any host
//! test framework.
//!
//! Spekt provides the machinery behind a specification language:
//! - **Typed Spec Model**: fields, fixture methods, features, blocks, and
//!   data providers reconstructed from versioned metadata embedded in the
//!   compiled artifact
//! - **Directive Processing**: annotation-driven processors that inspect and
//!   rewrite the model before execution, with one processor instance per
//!   directive type per build
//! - **Host Integration**: [`HostSupervisor`] translates execution lifecycle
//!   events into the notification protocol of the embedding test runner
//! - **Data-Driven Features**: parameterized features detect dried-up
//!   providers, and `unroll` reports each iteration as its own test with
//!   `#token` name templates
//! - **Failure Reporting**: composite failures are split into individual
//!   notifications, equality conditions become expected/actual comparisons,
//!   and framework frames are scrubbed from stack traces
//! - **Link-Time Discovery**: compiled specs announce themselves through an
//!   inventory-based registry
//!
//! ## Quick Start
//!
//! ```ignore
//! use spekt::prelude::*;
//! use std::rc::Rc;
//!
//! // Artifacts normally come out of the compiler; the registry holds the
//! // directive processors the host wants active.
//! let registry = ProcessorRegistry::new();
//! let spec = Rc::new(SpecInfoBuilder::new(artifact, &registry).build()?);
//!
//! // Drive a run, reporting through the host's notifier.
//! let mut supervisor = HostSupervisor::new(Rc::clone(&spec), ConsoleNotifier::stdout());
//! supervisor.before_spec();
//! for feature in spec.feature_ids() {
//!     supervisor.before_feature(feature);
//!     // ... executor fires iteration and error callbacks ...
//!     supervisor.after_feature(feature);
//! }
//! supervisor.after_spec();
//! ```
//!
//! ## Custom Directives
//!
//! ```ignore
//! struct Timeout;
//!
//! impl DirectiveProcessor for Timeout {
//!     fn visit_feature(
//!         &mut self,
//!         annotation: &Annotation,
//!         spec: &mut SpecInfo,
//!         feature: FeatureId,
//!     ) -> Result<(), DirectiveError> {
//!         let seconds = annotation.int_arg("seconds").unwrap_or(60);
//!         // ... adjust the model ...
//!         Ok(())
//!     }
//! }
//!
//! let mut registry = ProcessorRegistry::new();
//! registry.register("timeout", || Timeout);
//! ```

// Re-export metadata types
pub use spekt_meta::{
    registered_specs, Annotation, ArtifactBuilder, ArtifactField, ArtifactMethod, BlockKind,
    BlockMetadata, ConventionalNames, FeatureMetadata, FieldRef, MetadataError, MethodRef,
    NamingScheme, ProcessorId, ProviderMetadata, SpecArtifact, SpecMetadata, SpecRegistration,
    METADATA_VERSION, UNROLL_DIRECTIVE,
};

// Re-export model types
pub use spekt_model::{
    BlockInfo, ComparisonFailure, ConditionFailure, DataProviderInfo, DataValue, Description,
    ErrorInfo, ExpressionInfo, FeatureId, FeatureInfo, FieldId, FieldInfo, IterationInfo, MethodId,
    MethodInfo, MethodKind, RunListener, SpecInfo, StackFrame, StackTrace, TestFailure,
};

// Re-export runtime types
pub use spekt_runtime::{
    BuildError, ConsoleNotifier, DiffConfig, DirectiveError, DirectiveProcessor, FailureNotice,
    FilterConfig, FrameworkStackTraceFilter, HostEvent, HostSupervisor, JsonRenderer,
    KeepAllFrames, MasterRunListener, ObjectRenderer, ProcessorRegistry, RecordingNotifier,
    RunNotifier, RunStatus, RunSupervisor, RunnerConfig, SpecInfoBuilder, SpektConfig,
    StackTraceFilter, UnrolledNameGenerator,
};

/// Internal re-exports for generated code
#[doc(hidden)]
pub mod internal {
    pub use inventory;
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Annotation, ConsoleNotifier, DirectiveError, DirectiveProcessor, ErrorInfo, FeatureId,
        HostSupervisor, IterationInfo, ProcessorRegistry, RunListener, RunNotifier, RunStatus,
        RunSupervisor, SpecArtifact, SpecInfo, SpecInfoBuilder, TestFailure,
    };
}
