#![warn(missing_docs)]

//! Spekt Metadata Schema
//!
//! Everything the runtime knows about a spec it learns from the compiled
//! artifact: a [`SpecArtifact`] carrying the class shape plus embedded,
//! versioned metadata records. This crate defines that contract: the
//! records themselves, the naming scheme for compiler-derived helper
//! methods, and the link-time registry compiled specs announce themselves
//! through.

mod artifact;
mod naming;
mod registry;
mod schema;

pub use artifact::{
    Annotation, ArtifactBuilder, ArtifactField, ArtifactMethod, FieldRef, MethodRef, ProcessorId,
    SpecArtifact,
};
pub use naming::{
    ConventionalNames, NamingScheme, CLEANUP_METHOD, CLEANUP_SPEC_METHOD, SETUP_METHOD,
    SETUP_SPEC_METHOD,
};
pub use registry::{registered_specs, SpecRegistration};
pub use schema::{
    BlockKind, BlockMetadata, FeatureMetadata, MetadataError, ProviderMetadata, SpecMetadata,
};

/// Metadata schema version. Bumped on every incompatible change to the
/// embedded records; the builder rejects artifacts stamped with any other
/// version.
pub const METADATA_VERSION: u32 = 1;

/// Directive name the supervisor recognizes for per-iteration reporting of
/// parameterized features.
pub const UNROLL_DIRECTIVE: &str = "unroll";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        // The schema version is stamped into every artifact; a silent bump
        // would orphan previously compiled specs.
        assert_eq!(METADATA_VERSION, 1);
    }

    #[test]
    fn test_unroll_directive_name() {
        assert_eq!(UNROLL_DIRECTIVE, "unroll");
    }
}
