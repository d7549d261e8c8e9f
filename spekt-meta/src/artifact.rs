//! Compiled Spec Artifacts
//!
//! The runtime never inspects source text or host reflection. A
//! [`SpecArtifact`] is the stand-in the spec compiler emits for one class:
//! its marker attributes, declared fields and methods, annotations, and the
//! embedded metadata blobs. [`ArtifactBuilder`] assembles one the same way
//! emitted code does, which also makes artifacts easy to construct in tests.

use crate::schema::{FeatureMetadata, ProviderMetadata, SpecMetadata};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifier of a directive processor, as referenced by annotations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessorId(String);

impl ProcessorId {
    /// Wrap a processor identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProcessorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProcessorId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProcessorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// An annotation attached to a class, field, or method.
///
/// Annotations are inert name/argument pairs unless they reference a
/// directive processor, in which case the builder dispatches them at build
/// time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation name.
    pub name: String,
    /// Set when the annotation is a directive: the processor that must
    /// handle it.
    #[serde(default)]
    pub directive: Option<ProcessorId>,
    /// Free-form annotation arguments.
    #[serde(default)]
    pub args: Value,
}

impl Annotation {
    /// A plain annotation with no directive and no arguments.
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            directive: None,
            args: Value::Null,
        }
    }

    /// A directive annotation handled by `processor`.
    pub fn directive(name: impl Into<String>, processor: impl Into<ProcessorId>) -> Self {
        Self {
            name: name.into(),
            directive: Some(processor.into()),
            args: Value::Null,
        }
    }

    /// Attach arguments.
    pub fn with_args(mut self, args: Value) -> Self {
        self.args = args;
        self
    }

    /// Whether this annotation references a directive processor.
    pub fn is_directive(&self) -> bool {
        self.directive.is_some()
    }

    /// Look up a string argument by key.
    pub fn string_arg(&self, key: &str) -> Option<&str> {
        self.args.get(key)?.as_str()
    }

    /// Look up a boolean argument by key.
    pub fn bool_arg(&self, key: &str) -> Option<bool> {
        self.args.get(key)?.as_bool()
    }

    /// Look up an integer argument by key.
    pub fn int_arg(&self, key: &str) -> Option<i64> {
        self.args.get(key)?.as_i64()
    }
}

/// Handle to a field in an artifact's field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRef(usize);

impl FieldRef {
    /// Position in the artifact's field table.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to a method in an artifact's method table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodRef(usize);

impl MethodRef {
    /// Position in the artifact's method table.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A declared field of the spec class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactField {
    /// Field name.
    pub name: String,
    /// True for compiler-generated fields, which never surface in the
    /// runtime model.
    #[serde(default)]
    pub synthetic: bool,
    /// Annotations on the field.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// A declared method of the spec class.
///
/// Feature methods keep their display name; compiler-derived helpers carry
/// the names produced by the naming scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMethod {
    /// Method name.
    pub name: String,
    /// Annotations on the method.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Feature metadata blob, present exactly when this method defines a
    /// feature.
    #[serde(default)]
    pub feature_metadata: Option<Value>,
    /// Provider metadata blob, present exactly when this method is a data
    /// provider.
    #[serde(default)]
    pub provider_metadata: Option<Value>,
}

/// The compiled representation of one spec class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecArtifact {
    /// Simple class name.
    pub class_name: String,
    /// True when the class carries the spec marker attribute.
    #[serde(default)]
    pub has_spec_marker: bool,
    /// True when the class inherits the base specification type.
    #[serde(default)]
    pub inherits_base: bool,
    /// Spec-level metadata blob.
    #[serde(default)]
    pub metadata: Option<Value>,
    /// Class-level annotations.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Declared fields, in declaration order.
    #[serde(default)]
    pub fields: Vec<ArtifactField>,
    /// Declared methods, in declaration order.
    #[serde(default)]
    pub methods: Vec<ArtifactMethod>,
}

impl SpecArtifact {
    /// Start building an artifact for `class_name`.
    pub fn builder(class_name: impl Into<String>) -> ArtifactBuilder {
        ArtifactBuilder::new(class_name)
    }

    /// Whether the class is recognizable as a spec at all.
    pub fn is_spec(&self) -> bool {
        self.has_spec_marker || self.inherits_base
    }

    /// Find a declared method by name.
    pub fn find_method(&self, name: &str) -> Option<MethodRef> {
        self.methods.iter().position(|m| m.name == name).map(MethodRef)
    }

    /// The method behind a handle.
    ///
    /// Handles are only meaningful for the artifact that issued them.
    pub fn method(&self, reference: MethodRef) -> &ArtifactMethod {
        &self.methods[reference.0]
    }

    /// The field behind a handle.
    pub fn field(&self, reference: FieldRef) -> &ArtifactField {
        &self.fields[reference.0]
    }

    /// Handles for all declared fields, in declaration order.
    pub fn field_refs(&self) -> impl Iterator<Item = FieldRef> {
        (0..self.fields.len()).map(FieldRef)
    }

    /// Handles for all declared methods, in declaration order.
    pub fn method_refs(&self) -> impl Iterator<Item = MethodRef> {
        (0..self.methods.len()).map(MethodRef)
    }
}

/// Assembles a [`SpecArtifact`] the way compiler-emitted code does.
///
/// Metadata records are serialized into their embedded blob form on the way
/// in, so the artifact always stores the schema the builder would have to
/// decode again.
#[derive(Debug)]
pub struct ArtifactBuilder {
    artifact: SpecArtifact,
}

impl ArtifactBuilder {
    fn new(class_name: impl Into<String>) -> Self {
        Self {
            artifact: SpecArtifact {
                class_name: class_name.into(),
                has_spec_marker: false,
                inherits_base: false,
                metadata: None,
                annotations: Vec::new(),
                fields: Vec::new(),
                methods: Vec::new(),
            },
        }
    }

    /// Mark the class with the spec marker attribute.
    pub fn marked(mut self) -> Self {
        self.artifact.has_spec_marker = true;
        self
    }

    /// Record that the class inherits the base specification type.
    pub fn inherits_base(mut self) -> Self {
        self.artifact.inherits_base = true;
        self
    }

    /// Attach spec-level metadata.
    pub fn metadata(mut self, metadata: SpecMetadata) -> Self {
        self.artifact.metadata = Some(metadata.encode());
        self
    }

    /// Attach a raw metadata blob, bypassing the schema.
    pub fn raw_metadata(mut self, blob: Value) -> Self {
        self.artifact.metadata = Some(blob);
        self
    }

    /// Add a class-level annotation.
    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.artifact.annotations.push(annotation);
        self
    }

    /// Declare a field.
    pub fn field(self, name: impl Into<String>) -> Self {
        self.push_field(name, false, Vec::new())
    }

    /// Declare a compiler-generated field.
    pub fn synthetic_field(self, name: impl Into<String>) -> Self {
        self.push_field(name, true, Vec::new())
    }

    /// Declare a field with annotations.
    pub fn annotated_field(self, name: impl Into<String>, annotations: Vec<Annotation>) -> Self {
        self.push_field(name, false, annotations)
    }

    /// Declare a plain method.
    pub fn method(self, name: impl Into<String>) -> Self {
        self.push_method(name, Vec::new(), None, None)
    }

    /// Declare a plain method with annotations.
    pub fn annotated_method(self, name: impl Into<String>, annotations: Vec<Annotation>) -> Self {
        self.push_method(name, annotations, None, None)
    }

    /// Declare a feature method carrying its metadata.
    pub fn feature_method(self, name: impl Into<String>, metadata: FeatureMetadata) -> Self {
        self.push_method(name, Vec::new(), Some(metadata.encode()), None)
    }

    /// Declare a feature method with annotations (directives included).
    pub fn annotated_feature_method(
        self,
        name: impl Into<String>,
        metadata: FeatureMetadata,
        annotations: Vec<Annotation>,
    ) -> Self {
        self.push_method(name, annotations, Some(metadata.encode()), None)
    }

    /// Declare a feature method with a raw metadata blob, bypassing the
    /// schema.
    pub fn raw_feature_method(self, name: impl Into<String>, blob: Value) -> Self {
        self.push_method(name, Vec::new(), Some(blob), None)
    }

    /// Declare a data-provider method carrying its metadata.
    pub fn provider_method(self, name: impl Into<String>, metadata: ProviderMetadata) -> Self {
        self.push_method(name, Vec::new(), None, Some(metadata.encode()))
    }

    /// Finish, yielding the artifact.
    pub fn build(self) -> SpecArtifact {
        self.artifact
    }

    fn push_field(
        mut self,
        name: impl Into<String>,
        synthetic: bool,
        annotations: Vec<Annotation>,
    ) -> Self {
        self.artifact.fields.push(ArtifactField {
            name: name.into(),
            synthetic,
            annotations,
        });
        self
    }

    fn push_method(
        mut self,
        name: impl Into<String>,
        annotations: Vec<Annotation>,
        feature_metadata: Option<Value>,
        provider_metadata: Option<Value>,
    ) -> Self {
        self.artifact.methods.push(ArtifactMethod {
            name: name.into(),
            annotations,
            feature_metadata,
            provider_metadata,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_assembles_artifact() {
        let artifact = SpecArtifact::builder("CalcSpec")
            .marked()
            .metadata(SpecMetadata::new("calc_spec.rs"))
            .field("calculator")
            .synthetic_field("__captures")
            .feature_method("adds numbers", FeatureMetadata::new("adds numbers", 0))
            .method("setup")
            .build();

        assert_eq!(artifact.class_name, "CalcSpec");
        assert!(artifact.is_spec());
        assert_eq!(artifact.fields.len(), 2);
        assert_eq!(artifact.methods.len(), 2);
        assert!(artifact.methods[0].feature_metadata.is_some());
        assert!(artifact.methods[1].feature_metadata.is_none());
    }

    #[test]
    fn test_is_spec_requires_marker_or_base() {
        let plain = SpecArtifact::builder("NotASpec").build();
        assert!(!plain.is_spec());

        let inherited = SpecArtifact::builder("ChildSpec").inherits_base().build();
        assert!(inherited.is_spec());
    }

    #[test]
    fn test_find_method_returns_first_match() {
        let artifact = SpecArtifact::builder("S")
            .method("setup")
            .method("cleanup")
            .build();
        let setup = artifact.find_method("setup").unwrap();
        assert_eq!(setup.index(), 0);
        assert_eq!(artifact.method(setup).name, "setup");
        assert!(artifact.find_method("missing").is_none());
    }

    #[test]
    fn test_annotation_args() {
        let annotation = Annotation::directive("unroll", "unroll")
            .with_args(json!({ "value": "#a plus #b", "strict": true, "depth": 3 }));
        assert!(annotation.is_directive());
        assert_eq!(annotation.string_arg("value"), Some("#a plus #b"));
        assert_eq!(annotation.bool_arg("strict"), Some(true));
        assert_eq!(annotation.int_arg("depth"), Some(3));
        assert_eq!(annotation.string_arg("missing"), None);
    }

    #[test]
    fn test_plain_annotation_is_not_directive() {
        assert!(!Annotation::plain("deprecated").is_directive());
    }

    #[test]
    fn test_artifact_serde_round_trip() {
        let artifact = SpecArtifact::builder("RoundTrip")
            .marked()
            .annotation(Annotation::directive("ignore", "ignore"))
            .field("subject")
            .feature_method("works", FeatureMetadata::new("works", 1))
            .build();
        let encoded = serde_json::to_string(&artifact).unwrap();
        let decoded: SpecArtifact = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, artifact);
    }
}
