//! Directive Processing
//!
//! Annotations tagged as directives are dispatched at build time to
//! processors resolved from a [`ProcessorRegistry`]. The registry is owned
//! by whoever calls the builder and passed in explicitly; the builder keeps
//! its own per-build instance cache, so one processor instance sees every
//! occurrence of its directive within a single spec and nothing beyond it.

use fxhash::FxHashMap;
use spekt_meta::{Annotation, ProcessorId};
use spekt_model::{FeatureId, FieldId, MethodId, SpecInfo};
use thiserror::Error;

/// Error a directive processor rejects its input with.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DirectiveError {
    message: String,
}

impl DirectiveError {
    /// Error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Build-time handler for one directive annotation type.
///
/// Every callback defaults to accepting silently; processors override the
/// node kinds their directive is meaningful on and reject the rest with a
/// [`DirectiveError`].
pub trait DirectiveProcessor {
    /// The directive appeared on the spec class itself.
    fn visit_spec(
        &mut self,
        _annotation: &Annotation,
        _spec: &mut SpecInfo,
    ) -> Result<(), DirectiveError> {
        Ok(())
    }

    /// The directive appeared on a field.
    fn visit_field(
        &mut self,
        _annotation: &Annotation,
        _spec: &mut SpecInfo,
        _field: FieldId,
    ) -> Result<(), DirectiveError> {
        Ok(())
    }

    /// The directive appeared on a declared fixture method.
    fn visit_fixture_method(
        &mut self,
        _annotation: &Annotation,
        _spec: &mut SpecInfo,
        _method: MethodId,
    ) -> Result<(), DirectiveError> {
        Ok(())
    }

    /// The directive appeared on a feature method.
    fn visit_feature(
        &mut self,
        _annotation: &Annotation,
        _spec: &mut SpecInfo,
        _feature: FeatureId,
    ) -> Result<(), DirectiveError> {
        Ok(())
    }

    /// Called once per build after every annotated node has been visited.
    fn after_build(&mut self, _spec: &mut SpecInfo) -> Result<(), DirectiveError> {
        Ok(())
    }
}

/// Factory producing a fresh processor instance for one build.
pub type ProcessorFactory = Box<dyn Fn() -> Box<dyn DirectiveProcessor>>;

/// Explicit mapping from processor identifiers to factories.
///
/// Nothing registers itself here implicitly; the embedding host decides
/// which directives exist.
#[derive(Default)]
pub struct ProcessorRegistry {
    factories: FxHashMap<ProcessorId, ProcessorFactory>,
}

impl ProcessorRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `id`, replacing any previous registration.
    pub fn register<F, P>(&mut self, id: impl Into<ProcessorId>, factory: F)
    where
        F: Fn() -> P + 'static,
        P: DirectiveProcessor + 'static,
    {
        self.factories
            .insert(id.into(), Box::new(move || Box::new(factory())));
    }

    /// Instantiate the processor registered under `id`.
    pub fn instantiate(&self, id: &ProcessorId) -> Option<Box<dyn DirectiveProcessor>> {
        self.factories.get(id).map(|factory| factory())
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: &ProcessorId) -> bool {
        self.factories.contains_key(id)
    }
}
