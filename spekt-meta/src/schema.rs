//! Embedded Metadata Records
//!
//! The compiler serializes these records into opaque blobs on the artifact;
//! the builder decodes them back through serde. Decoding is the only place
//! schema-version skew can surface, so every record checks in through
//! [`MetadataError`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Why an embedded metadata blob could not be read.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MetadataError {
    /// No blob is present where the schema requires one.
    #[error("embedded metadata is missing")]
    Missing,

    /// The blob was written by a different schema revision.
    #[error("metadata version mismatch: found {found}, expected {expected}")]
    Version {
        /// Version stamped into the artifact.
        found: u32,
        /// Version this runtime understands.
        expected: u32,
    },

    /// The blob does not decode as the expected record.
    #[error("malformed metadata: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Spec-level metadata embedded on the class artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecMetadata {
    /// Schema revision the artifact was compiled against.
    pub version: u32,
    /// Source file the spec was declared in.
    pub filename: String,
}

impl SpecMetadata {
    /// Metadata stamped with the current schema version.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            version: crate::METADATA_VERSION,
            filename: filename.into(),
        }
    }

    /// Serialize into the embedded blob form.
    pub fn encode(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    /// Decode from an artifact blob.
    ///
    /// Rejects absent blobs and blobs stamped with a foreign schema version;
    /// both mean the artifact cannot be trusted.
    pub fn decode(blob: Option<&Value>) -> Result<Self, MetadataError> {
        let value = blob.ok_or(MetadataError::Missing)?;
        let metadata: Self = serde_json::from_value(value.clone())?;
        if metadata.version != crate::METADATA_VERSION {
            return Err(MetadataError::Version {
                found: metadata.version,
                expected: crate::METADATA_VERSION,
            });
        }
        Ok(metadata)
    }
}

/// Feature metadata embedded on a feature method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMetadata {
    /// Display name of the feature.
    pub name: String,
    /// Declared ordering key; lower runs first.
    pub order: i32,
    /// Names of the data variables the feature is parameterized over, in
    /// parameter order.
    #[serde(default)]
    pub parameter_names: Vec<String>,
    /// Narrative blocks in declaration order.
    #[serde(default)]
    pub blocks: Vec<BlockMetadata>,
}

impl FeatureMetadata {
    /// Plain feature metadata with no parameters or blocks.
    pub fn new(name: impl Into<String>, order: i32) -> Self {
        Self {
            name: name.into(),
            order,
            parameter_names: Vec::new(),
            blocks: Vec::new(),
        }
    }

    /// Serialize into the embedded blob form.
    pub fn encode(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    /// Decode from an artifact blob.
    pub fn decode(blob: Option<&Value>) -> Result<Self, MetadataError> {
        let value = blob.ok_or(MetadataError::Missing)?;
        Ok(serde_json::from_value(value.clone())?)
    }
}

/// One narrative block of a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockMetadata {
    /// Role the block plays in the scenario.
    pub kind: BlockKind,
    /// Description texts attached to the block.
    #[serde(default)]
    pub texts: Vec<String>,
}

impl BlockMetadata {
    /// Block of `kind` with description texts.
    pub fn new(kind: BlockKind, texts: Vec<String>) -> Self {
        Self { kind, texts }
    }
}

/// The block kinds a feature can be narrated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// Arrange state for the scenario.
    Setup,
    /// Assert without a distinct stimulus.
    Expect,
    /// Apply the stimulus.
    When,
    /// Assert on the response.
    Then,
    /// Tear down scenario state.
    Cleanup,
    /// Bind data variables.
    Where,
}

/// Provider metadata embedded on a data-provider method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderMetadata {
    /// Source line of the provider expression.
    pub line: u32,
    /// Source column of the provider expression.
    pub column: u32,
    /// Data variables this provider binds.
    #[serde(default)]
    pub data_variables: Vec<String>,
}

impl ProviderMetadata {
    /// Provider metadata at a source position.
    pub fn new(line: u32, column: u32, data_variables: Vec<String>) -> Self {
        Self {
            line,
            column,
            data_variables,
        }
    }

    /// Serialize into the embedded blob form.
    pub fn encode(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    /// Decode from an artifact blob.
    pub fn decode(blob: Option<&Value>) -> Result<Self, MetadataError> {
        let value = blob.ok_or(MetadataError::Missing)?;
        Ok(serde_json::from_value(value.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_metadata_round_trip() {
        let metadata = SpecMetadata::new("calculator_spec.rs");
        let decoded = SpecMetadata::decode(Some(&metadata.encode())).unwrap();
        assert_eq!(decoded, metadata);
        assert_eq!(decoded.version, crate::METADATA_VERSION);
    }

    #[test]
    fn test_spec_metadata_missing() {
        let err = SpecMetadata::decode(None).unwrap_err();
        assert!(matches!(err, MetadataError::Missing));
    }

    #[test]
    fn test_spec_metadata_version_mismatch() {
        let mut metadata = SpecMetadata::new("old_spec.rs");
        metadata.version = 99;
        let err = SpecMetadata::decode(Some(&metadata.encode())).unwrap_err();
        match err {
            MetadataError::Version { found, expected } => {
                assert_eq!(found, 99);
                assert_eq!(expected, crate::METADATA_VERSION);
            }
            other => panic!("expected version mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_spec_metadata_malformed_blob() {
        let blob = serde_json::json!({ "version": "not a number" });
        let err = SpecMetadata::decode(Some(&blob)).unwrap_err();
        assert!(matches!(err, MetadataError::Decode(_)));
    }

    #[test]
    fn test_feature_metadata_defaults() {
        // Older compilers omit empty lists; decoding fills the defaults.
        let blob = serde_json::json!({ "name": "adds numbers", "order": 0 });
        let metadata = FeatureMetadata::decode(Some(&blob)).unwrap();
        assert_eq!(metadata.name, "adds numbers");
        assert!(metadata.parameter_names.is_empty());
        assert!(metadata.blocks.is_empty());
    }

    #[test]
    fn test_feature_metadata_with_blocks() {
        let mut metadata = FeatureMetadata::new("divides numbers", 3);
        metadata.parameter_names = vec!["a".to_string(), "b".to_string()];
        metadata.blocks = vec![
            BlockMetadata::new(BlockKind::When, vec!["dividing".to_string()]),
            BlockMetadata::new(BlockKind::Then, vec!["quotient is exact".to_string()]),
        ];
        let decoded = FeatureMetadata::decode(Some(&metadata.encode())).unwrap();
        assert_eq!(decoded, metadata);
        assert_eq!(decoded.blocks[0].kind, BlockKind::When);
    }

    #[test]
    fn test_provider_metadata_round_trip() {
        let metadata = ProviderMetadata::new(42, 9, vec!["a".to_string()]);
        let decoded = ProviderMetadata::decode(Some(&metadata.encode())).unwrap();
        assert_eq!(decoded, metadata);
    }

    #[test]
    fn test_block_kind_serializes_lowercase() {
        let value = serde_json::to_value(BlockKind::Where).unwrap();
        assert_eq!(value, serde_json::json!("where"));
    }
}
