//! Spec Node & Arena
//!
//! [`SpecInfo`] owns every node of one built spec. Links between nodes are
//! index handles into its vectors rather than references, so back-links (a
//! feature method to its owning feature) never form ownership cycles.
//! Handles are only meaningful for the spec that issued them.

use crate::describe::Description;
use crate::feature::FeatureInfo;
use crate::listener::RunListener;
use crate::method::MethodInfo;
use spekt_meta::{Annotation, FieldRef, SpecArtifact};
use std::cell::{OnceCell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Handle to a field node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(u32);

/// Handle to a method node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodId(u32);

/// Handle to a feature node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureId(u32);

/// A declared instance field of the spec class.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    name: String,
    reference: FieldRef,
    annotations: Vec<Annotation>,
}

impl FieldInfo {
    /// Field node over an artifact field.
    pub fn new(name: impl Into<String>, reference: FieldRef, annotations: Vec<Annotation>) -> Self {
        Self {
            name: name.into(),
            reference,
            annotations,
        }
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Handle into the artifact's field table.
    pub fn reference(&self) -> FieldRef {
        self.reference
    }

    /// Annotations declared on the field.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

/// Root node of a built spec: owns the node arena, the fixture-method
/// handles, registered run listeners, and cached host descriptions.
pub struct SpecInfo {
    name: String,
    filename: String,
    artifact: Rc<SpecArtifact>,
    fields: Vec<FieldInfo>,
    methods: Vec<MethodInfo>,
    features: Vec<FeatureInfo>,
    setup_method: Option<MethodId>,
    cleanup_method: Option<MethodId>,
    setup_spec_method: Option<MethodId>,
    cleanup_spec_method: Option<MethodId>,
    listeners: RefCell<Vec<Box<dyn RunListener>>>,
    description: OnceCell<Description>,
}

impl SpecInfo {
    /// Create the root node. Children are attached by the builder.
    pub fn new(
        name: impl Into<String>,
        filename: impl Into<String>,
        artifact: Rc<SpecArtifact>,
    ) -> Self {
        Self {
            name: name.into(),
            filename: filename.into(),
            artifact,
            fields: Vec::new(),
            methods: Vec::new(),
            features: Vec::new(),
            setup_method: None,
            cleanup_method: None,
            setup_spec_method: None,
            cleanup_spec_method: None,
            listeners: RefCell::new(Vec::new()),
            description: OnceCell::new(),
        }
    }

    /// Spec display name (the simple class name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source file the spec was declared in.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The compiled artifact this spec was built from.
    pub fn artifact(&self) -> &Rc<SpecArtifact> {
        &self.artifact
    }

    /// Attach a field node, returning its handle.
    pub fn push_field(&mut self, field: FieldInfo) -> FieldId {
        let id = FieldId(self.fields.len() as u32);
        self.fields.push(field);
        id
    }

    /// Attach a method node, returning its handle.
    pub fn push_method(&mut self, method: MethodInfo) -> MethodId {
        let id = MethodId(self.methods.len() as u32);
        self.methods.push(method);
        id
    }

    /// Attach a feature node, returning its handle.
    pub fn push_feature(&mut self, feature: FeatureInfo) -> FeatureId {
        let id = FeatureId(self.features.len() as u32);
        self.features.push(feature);
        id
    }

    /// The field behind a handle.
    pub fn field(&self, id: FieldId) -> &FieldInfo {
        &self.fields[id.0 as usize]
    }

    /// The method behind a handle.
    pub fn method(&self, id: MethodId) -> &MethodInfo {
        &self.methods[id.0 as usize]
    }

    /// Mutable access to a method node.
    pub fn method_mut(&mut self, id: MethodId) -> &mut MethodInfo {
        &mut self.methods[id.0 as usize]
    }

    /// The feature behind a handle.
    pub fn feature(&self, id: FeatureId) -> &FeatureInfo {
        &self.features[id.0 as usize]
    }

    /// Mutable access to a feature node.
    pub fn feature_mut(&mut self, id: FeatureId) -> &mut FeatureInfo {
        &mut self.features[id.0 as usize]
    }

    /// Fields with their handles, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (FieldId, &FieldInfo)> {
        self.fields
            .iter()
            .enumerate()
            .map(|(index, field)| (FieldId(index as u32), field))
    }

    /// Methods with their handles.
    pub fn methods(&self) -> impl Iterator<Item = (MethodId, &MethodInfo)> {
        self.methods
            .iter()
            .enumerate()
            .map(|(index, method)| (MethodId(index as u32), method))
    }

    /// Features with their handles, in execution order.
    pub fn features(&self) -> impl Iterator<Item = (FeatureId, &FeatureInfo)> {
        self.features
            .iter()
            .enumerate()
            .map(|(index, feature)| (FeatureId(index as u32), feature))
    }

    /// Feature handles in execution order.
    pub fn feature_ids(&self) -> impl Iterator<Item = FeatureId> {
        (0..self.features.len() as u32).map(FeatureId)
    }

    /// Number of features.
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Record the per-feature setup method.
    pub fn set_setup_method(&mut self, id: MethodId) {
        self.setup_method = Some(id);
    }

    /// The per-feature setup method. `None` only mid-build; every built
    /// spec has one (a stub when the class declares none).
    pub fn setup_method(&self) -> Option<MethodId> {
        self.setup_method
    }

    /// Record the per-feature cleanup method.
    pub fn set_cleanup_method(&mut self, id: MethodId) {
        self.cleanup_method = Some(id);
    }

    /// The per-feature cleanup method.
    pub fn cleanup_method(&self) -> Option<MethodId> {
        self.cleanup_method
    }

    /// Record the one-time spec setup method.
    pub fn set_setup_spec_method(&mut self, id: MethodId) {
        self.setup_spec_method = Some(id);
    }

    /// The one-time spec setup method.
    pub fn setup_spec_method(&self) -> Option<MethodId> {
        self.setup_spec_method
    }

    /// Record the one-time spec cleanup method.
    pub fn set_cleanup_spec_method(&mut self, id: MethodId) {
        self.cleanup_spec_method = Some(id);
    }

    /// The one-time spec cleanup method.
    pub fn cleanup_spec_method(&self) -> Option<MethodId> {
        self.cleanup_spec_method
    }

    /// Fixture-method handles in directive visit order: spec setup, setup,
    /// cleanup, spec cleanup.
    pub fn fixture_method_ids(&self) -> impl Iterator<Item = MethodId> {
        [
            self.setup_spec_method,
            self.setup_method,
            self.cleanup_method,
            self.cleanup_spec_method,
        ]
        .into_iter()
        .flatten()
    }

    /// Stable-sort features by declared order; ties keep declaration order.
    ///
    /// Feature handles are positional, so method back-links and provider
    /// owners are re-linked to the post-sort positions before this returns.
    pub fn sort_features(&mut self) {
        self.features.sort_by_key(|feature| feature.order());
        for index in 0..self.features.len() {
            let id = FeatureId(index as u32);
            let feature_method = self.features[index].feature_method();
            self.methods[feature_method.0 as usize].set_feature(Some(id));
            for provider in self.features[index].data_providers_mut() {
                provider.set_feature(id);
            }
        }
    }

    /// Register a lifecycle listener. Listeners must not register further
    /// listeners from inside a callback.
    pub fn add_listener(&self, listener: Box<dyn RunListener>) {
        self.listeners.borrow_mut().push(listener);
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Run `f` for each registered listener, in registration order.
    pub fn each_listener(&self, mut f: impl FnMut(&mut dyn RunListener)) {
        for listener in self.listeners.borrow_mut().iter_mut() {
            f(listener.as_mut());
        }
    }

    /// Host description for the whole spec: a suite of its features, in
    /// execution order. Created on first use and cached.
    pub fn description(&self) -> &Description {
        self.description.get_or_init(|| {
            let children = self
                .features
                .iter()
                .map(|feature| feature.description(&self.name).clone())
                .collect();
            Description::suite(&self.name, children)
        })
    }

    /// Host description for one feature. Created on first use and cached on
    /// the feature node.
    pub fn feature_description(&self, id: FeatureId) -> &Description {
        self.feature(id).description(&self.name)
    }
}

impl fmt::Debug for SpecInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecInfo")
            .field("name", &self.name)
            .field("filename", &self.filename)
            .field("features", &self.features.len())
            .finish_non_exhaustive()
    }
}
