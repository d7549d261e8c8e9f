//! Feature Nodes

use crate::describe::Description;
use crate::spec::{FeatureId, MethodId};
use spekt_meta::BlockKind;
use std::cell::OnceCell;

/// One narrative block of a feature. Purely descriptive; execution order is
/// compiled into the feature method itself.
#[derive(Debug, Clone)]
pub struct BlockInfo {
    kind: BlockKind,
    texts: Vec<String>,
}

impl BlockInfo {
    /// Block of `kind` with its description texts.
    pub fn new(kind: BlockKind, texts: Vec<String>) -> Self {
        Self { kind, texts }
    }

    /// Role the block plays in the scenario.
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    /// Description texts attached to the block.
    pub fn texts(&self) -> &[String] {
        &self.texts
    }
}

/// One data provider feeding a parameterized feature.
#[derive(Debug, Clone)]
pub struct DataProviderInfo {
    line: u32,
    column: u32,
    data_variables: Vec<String>,
    provider_method: MethodId,
    feature: FeatureId,
}

impl DataProviderInfo {
    /// Provider node at a source position.
    pub fn new(
        line: u32,
        column: u32,
        data_variables: Vec<String>,
        provider_method: MethodId,
        feature: FeatureId,
    ) -> Self {
        Self {
            line,
            column,
            data_variables,
            provider_method,
            feature,
        }
    }

    /// Source line of the provider expression.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Source column of the provider expression.
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Data variables the provider binds.
    pub fn data_variables(&self) -> &[String] {
        &self.data_variables
    }

    /// The provider method node.
    pub fn provider_method(&self) -> MethodId {
        self.provider_method
    }

    /// Owning feature.
    pub fn feature(&self) -> FeatureId {
        self.feature
    }

    pub(crate) fn set_feature(&mut self, feature: FeatureId) {
        self.feature = feature;
    }
}

/// One scenario definition: the feature method plus its data machinery and
/// narrative blocks.
#[derive(Debug)]
pub struct FeatureInfo {
    name: String,
    order: i32,
    parameter_names: Vec<String>,
    feature_method: MethodId,
    data_processor_method: Option<MethodId>,
    data_providers: Vec<DataProviderInfo>,
    blocks: Vec<BlockInfo>,
    description: OnceCell<Description>,
}

impl FeatureInfo {
    /// Feature node; data machinery and blocks are attached by the builder.
    pub fn new(
        name: impl Into<String>,
        order: i32,
        parameter_names: Vec<String>,
        feature_method: MethodId,
    ) -> Self {
        Self {
            name: name.into(),
            order,
            parameter_names,
            feature_method,
            data_processor_method: None,
            data_providers: Vec::new(),
            blocks: Vec::new(),
            description: OnceCell::new(),
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared ordering key; lower runs first.
    pub fn order(&self) -> i32 {
        self.order
    }

    /// Data variable names the feature is parameterized over.
    pub fn parameter_names(&self) -> &[String] {
        &self.parameter_names
    }

    /// The feature method node.
    pub fn feature_method(&self) -> MethodId {
        self.feature_method
    }

    /// The data-processor method; present exactly when the feature is
    /// data-driven.
    pub fn data_processor_method(&self) -> Option<MethodId> {
        self.data_processor_method
    }

    /// Record the data-processor method.
    pub fn set_data_processor_method(&mut self, id: MethodId) {
        self.data_processor_method = Some(id);
    }

    /// Data providers in provider-index order.
    pub fn data_providers(&self) -> &[DataProviderInfo] {
        &self.data_providers
    }

    /// Attach a data provider.
    pub fn push_data_provider(&mut self, provider: DataProviderInfo) {
        self.data_providers.push(provider);
    }

    pub(crate) fn data_providers_mut(&mut self) -> &mut [DataProviderInfo] {
        &mut self.data_providers
    }

    /// Narrative blocks in declaration order.
    pub fn blocks(&self) -> &[BlockInfo] {
        &self.blocks
    }

    /// Attach a block.
    pub fn push_block(&mut self, block: BlockInfo) {
        self.blocks.push(block);
    }

    /// True when at least one data provider feeds the feature.
    pub fn is_parameterized(&self) -> bool {
        !self.data_providers.is_empty()
    }

    /// Host description for this feature under `spec_name`. Created on
    /// first use and cached.
    pub fn description(&self, spec_name: &str) -> &Description {
        self.description
            .get_or_init(|| Description::test(spec_name, &self.name))
    }
}
