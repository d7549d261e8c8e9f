//! Spec Builder
//!
//! Decodes a compiled artifact into the runtime model. The build runs in a
//! fixed order: validate the marker, decode spec metadata, construct fields
//! (skipping synthetic ones), construct features with their data machinery
//! and blocks, sort features, attach fixture methods (stubbed when absent),
//! then dispatch directive annotations. Any error aborts the whole build;
//! no partial model ever escapes.

use crate::directive::{DirectiveError, DirectiveProcessor, ProcessorRegistry};
use fxhash::FxHashMap;
use spekt_meta::{
    Annotation, ArtifactMethod, ConventionalNames, FeatureMetadata, MetadataError, MethodRef,
    NamingScheme, ProcessorId, ProviderMetadata, SpecArtifact, SpecMetadata, CLEANUP_METHOD,
    CLEANUP_SPEC_METHOD, SETUP_METHOD, SETUP_SPEC_METHOD,
};
use spekt_model::{
    BlockInfo, DataProviderInfo, FeatureId, FeatureInfo, FieldId, FieldInfo, MethodId, MethodInfo,
    MethodKind, SpecInfo,
};
use std::collections::hash_map::Entry;
use std::rc::Rc;
use thiserror::Error;
use tracing::debug;

/// Errors aborting a spec build.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuildError {
    /// The artifact is not recognizable as a spec. This is a user error:
    /// the class lacks both the marker attribute and the base type.
    #[error(
        "class '{class}' is not a spec (mark it with the spec attribute \
         or inherit the base specification type)"
    )]
    NotASpec {
        /// Offending class name.
        class: String,
    },

    /// Embedded metadata is missing, undecodable, or from a foreign schema
    /// version. The artifact and runtime disagree about the compiler; no
    /// user action can fix the spec itself.
    #[error("class '{class}' has not been compiled correctly: {source}")]
    Internal {
        /// Class whose artifact is inconsistent.
        class: String,
        /// Underlying schema error.
        source: MetadataError,
    },

    /// An annotation references a processor the registry does not know.
    #[error("no directive processor registered for '{id}' (annotation '{annotation}')")]
    UnknownProcessor {
        /// The unresolved processor id.
        id: ProcessorId,
        /// Name of the annotation carrying the reference.
        annotation: String,
    },

    /// A directive processor rejected the build.
    #[error("directive processor '{id}' failed: {source}")]
    Directive {
        /// Processor that failed.
        id: ProcessorId,
        /// The processor's error.
        source: DirectiveError,
    },
}

/// Builds the runtime model for one compiled artifact.
pub struct SpecInfoBuilder<'a> {
    artifact: Rc<SpecArtifact>,
    registry: &'a ProcessorRegistry,
    naming: &'a dyn NamingScheme,
}

impl<'a> SpecInfoBuilder<'a> {
    /// Builder over `artifact`, resolving directives from `registry`.
    pub fn new(artifact: Rc<SpecArtifact>, registry: &'a ProcessorRegistry) -> Self {
        Self {
            artifact,
            registry,
            naming: &ConventionalNames,
        }
    }

    /// Override the compiler naming scheme used to find derived methods.
    pub fn naming(mut self, naming: &'a dyn NamingScheme) -> Self {
        self.naming = naming;
        self
    }

    /// Build the spec model.
    pub fn build(self) -> Result<SpecInfo, BuildError> {
        self.check_is_spec()?;
        let metadata = self.spec_metadata()?;
        let mut spec = SpecInfo::new(
            self.artifact.class_name.clone(),
            metadata.filename,
            Rc::clone(&self.artifact),
        );
        self.build_fields(&mut spec);
        self.build_features(&mut spec)?;
        spec.sort_features();
        self.build_fixture_methods(&mut spec);
        debug!(
            spec = %spec.name(),
            features = spec.feature_count(),
            "spec model built"
        );
        self.process_directives(&mut spec)?;
        Ok(spec)
    }

    fn check_is_spec(&self) -> Result<(), BuildError> {
        if self.artifact.is_spec() {
            Ok(())
        } else {
            Err(BuildError::NotASpec {
                class: self.artifact.class_name.clone(),
            })
        }
    }

    fn spec_metadata(&self) -> Result<SpecMetadata, BuildError> {
        SpecMetadata::decode(self.artifact.metadata.as_ref())
            .map_err(|source| self.internal(source))
    }

    fn internal(&self, source: MetadataError) -> BuildError {
        BuildError::Internal {
            class: self.artifact.class_name.clone(),
            source,
        }
    }

    fn build_fields(&self, spec: &mut SpecInfo) {
        for reference in self.artifact.field_refs() {
            let field = self.artifact.field(reference);
            if field.synthetic {
                continue;
            }
            spec.push_field(FieldInfo::new(
                field.name.clone(),
                reference,
                field.annotations.clone(),
            ));
        }
    }

    fn build_features(&self, spec: &mut SpecInfo) -> Result<(), BuildError> {
        for reference in self.artifact.method_refs() {
            let method = self.artifact.method(reference);
            if method.feature_metadata.is_none() {
                continue;
            }
            let metadata = self.decode_feature(method)?;
            self.build_feature(spec, reference, metadata)?;
        }
        Ok(())
    }

    fn decode_feature(&self, method: &ArtifactMethod) -> Result<FeatureMetadata, BuildError> {
        FeatureMetadata::decode(method.feature_metadata.as_ref())
            .map_err(|source| self.internal(source))
    }

    fn build_feature(
        &self,
        spec: &mut SpecInfo,
        reference: MethodRef,
        metadata: FeatureMetadata,
    ) -> Result<(), BuildError> {
        let method = self.artifact.method(reference);
        let feature_method = spec.push_method(MethodInfo::new(
            method.name.clone(),
            MethodKind::Feature,
            reference,
            method.annotations.clone(),
        ));

        let mut feature = FeatureInfo::new(
            metadata.name,
            metadata.order,
            metadata.parameter_names,
            feature_method,
        );
        for block in metadata.blocks {
            feature.push_block(BlockInfo::new(block.kind, block.texts));
        }
        let feature_id = spec.push_feature(feature);
        spec.method_mut(feature_method).set_feature(Some(feature_id));

        // Data machinery exists only behind a data processor; providers
        // without one are unreachable code and stay out of the model.
        let processor_name = self.naming.data_processor_name(&method.name);
        if let Some(processor_ref) = self.artifact.find_method(&processor_name) {
            let processor = self.artifact.method(processor_ref);
            let processor_id = spec.push_method(MethodInfo::new(
                processor.name.clone(),
                MethodKind::DataProcessor,
                processor_ref,
                processor.annotations.clone(),
            ));
            spec.feature_mut(feature_id).set_data_processor_method(processor_id);
            self.build_data_providers(spec, feature_id, &method.name)?;
        }
        Ok(())
    }

    fn build_data_providers(
        &self,
        spec: &mut SpecInfo,
        feature: FeatureId,
        feature_method_name: &str,
    ) -> Result<(), BuildError> {
        // Provider indices are dense from zero; the first gap terminates.
        let mut index = 0;
        while let Some(reference) = self
            .artifact
            .find_method(&self.naming.data_provider_name(feature_method_name, index))
        {
            let method = self.artifact.method(reference);
            let metadata = ProviderMetadata::decode(method.provider_metadata.as_ref())
                .map_err(|source| self.internal(source))?;
            let provider_method = spec.push_method(MethodInfo::new(
                method.name.clone(),
                MethodKind::DataProvider,
                reference,
                method.annotations.clone(),
            ));
            spec.feature_mut(feature).push_data_provider(DataProviderInfo::new(
                metadata.line,
                metadata.column,
                metadata.data_variables,
                provider_method,
                feature,
            ));
            index += 1;
        }
        Ok(())
    }

    fn build_fixture_methods(&self, spec: &mut SpecInfo) {
        let setup = self.fixture_method(spec, SETUP_METHOD, MethodKind::Setup);
        spec.set_setup_method(setup);
        let cleanup = self.fixture_method(spec, CLEANUP_METHOD, MethodKind::Cleanup);
        spec.set_cleanup_method(cleanup);
        let setup_spec = self.fixture_method(spec, SETUP_SPEC_METHOD, MethodKind::SetupSpec);
        spec.set_setup_spec_method(setup_spec);
        let cleanup_spec = self.fixture_method(spec, CLEANUP_SPEC_METHOD, MethodKind::CleanupSpec);
        spec.set_cleanup_spec_method(cleanup_spec);
    }

    fn fixture_method(&self, spec: &mut SpecInfo, name: &str, kind: MethodKind) -> MethodId {
        let method = match self.artifact.find_method(name) {
            Some(reference) => {
                let found = self.artifact.method(reference);
                MethodInfo::new(found.name.clone(), kind, reference, found.annotations.clone())
            }
            None => MethodInfo::stub(name, kind),
        };
        spec.push_method(method)
    }

    fn process_directives(&self, spec: &mut SpecInfo) -> Result<(), BuildError> {
        let work = self.directive_worklist(spec);
        if work.is_empty() {
            return Ok(());
        }
        let mut cache = ProcessorCache::default();
        for (node, annotation) in &work {
            // The worklist only holds directives, so the id is present.
            let Some(id) = annotation.directive.as_ref() else {
                continue;
            };
            let processor = cache.resolve(self.registry, id, annotation)?;
            let outcome = match *node {
                DirectiveNode::Spec => processor.visit_spec(annotation, spec),
                DirectiveNode::Field(field) => processor.visit_field(annotation, spec, field),
                DirectiveNode::FixtureMethod(method) => {
                    processor.visit_fixture_method(annotation, spec, method)
                }
                DirectiveNode::Feature(feature) => {
                    processor.visit_feature(annotation, spec, feature)
                }
            };
            outcome.map_err(|source| BuildError::Directive {
                id: id.clone(),
                source,
            })?;
        }
        debug!(
            spec = %spec.name(),
            directives = work.len(),
            processors = cache.distinct(),
            "directives processed"
        );
        cache.finish(spec)
    }

    /// Snapshot of every directive annotation with the node it sits on, in
    /// visit order: spec, fields, fixture methods, features.
    fn directive_worklist(&self, spec: &SpecInfo) -> Vec<(DirectiveNode, Annotation)> {
        let mut work = Vec::new();
        collect_directives(&mut work, DirectiveNode::Spec, &self.artifact.annotations);
        for (id, field) in spec.fields() {
            collect_directives(&mut work, DirectiveNode::Field(id), field.annotations());
        }
        for id in spec.fixture_method_ids() {
            // Stubs never carry annotations, so this visits only declared
            // fixtures.
            collect_directives(
                &mut work,
                DirectiveNode::FixtureMethod(id),
                spec.method(id).annotations(),
            );
        }
        for (id, feature) in spec.features() {
            collect_directives(
                &mut work,
                DirectiveNode::Feature(id),
                spec.method(feature.feature_method()).annotations(),
            );
        }
        work
    }
}

#[derive(Debug, Clone, Copy)]
enum DirectiveNode {
    Spec,
    Field(FieldId),
    FixtureMethod(MethodId),
    Feature(FeatureId),
}

fn collect_directives(
    work: &mut Vec<(DirectiveNode, Annotation)>,
    node: DirectiveNode,
    annotations: &[Annotation],
) {
    for annotation in annotations {
        if annotation.is_directive() {
            work.push((node, annotation.clone()));
        }
    }
}

/// Per-build processor instances, one per directive type, with
/// first-instantiation order retained for the end-of-build pass.
#[derive(Default)]
struct ProcessorCache {
    order: Vec<ProcessorId>,
    instances: FxHashMap<ProcessorId, Box<dyn DirectiveProcessor>>,
}

impl ProcessorCache {
    fn resolve(
        &mut self,
        registry: &ProcessorRegistry,
        id: &ProcessorId,
        annotation: &Annotation,
    ) -> Result<&mut dyn DirectiveProcessor, BuildError> {
        match self.instances.entry(id.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut().as_mut()),
            Entry::Vacant(entry) => {
                let instance =
                    registry
                        .instantiate(id)
                        .ok_or_else(|| BuildError::UnknownProcessor {
                            id: id.clone(),
                            annotation: annotation.name.clone(),
                        })?;
                self.order.push(id.clone());
                Ok(entry.insert(instance).as_mut())
            }
        }
    }

    fn distinct(&self) -> usize {
        self.order.len()
    }

    fn finish(mut self, spec: &mut SpecInfo) -> Result<(), BuildError> {
        for id in &self.order {
            if let Some(processor) = self.instances.get_mut(id) {
                processor.after_build(spec).map_err(|source| BuildError::Directive {
                    id: id.clone(),
                    source,
                })?;
            }
        }
        Ok(())
    }
}
