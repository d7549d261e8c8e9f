//! Conventional Method Naming
//!
//! The compiler derives helper-method names from the feature method's own
//! name. That derivation is part of the compiler contract, not of the
//! runtime, so the builder receives it as an injected [`NamingScheme`] and
//! alternate compilers can plug in their own rules.

/// Fixture method name: per-feature setup.
pub const SETUP_METHOD: &str = "setup";
/// Fixture method name: per-feature cleanup.
pub const CLEANUP_METHOD: &str = "cleanup";
/// Fixture method name: one-time spec setup.
pub const SETUP_SPEC_METHOD: &str = "setup_spec";
/// Fixture method name: one-time spec cleanup.
pub const CLEANUP_SPEC_METHOD: &str = "cleanup_spec";

/// Name-derivation contract for compiler-generated helper methods.
pub trait NamingScheme {
    /// Name of the data-processor method derived for a feature method.
    fn data_processor_name(&self, feature_method: &str) -> String;

    /// Name of the data-provider method at `index` derived for a feature
    /// method. Indices are dense from zero.
    fn data_provider_name(&self, feature_method: &str, index: usize) -> String;
}

/// The naming convention the bundled compiler emits.
///
/// The double-underscore infix is reserved by the compiler, so derived names
/// cannot collide with user-written methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConventionalNames;

impl NamingScheme for ConventionalNames {
    fn data_processor_name(&self, feature_method: &str) -> String {
        format!("{}__data_processor", feature_method)
    }

    fn data_provider_name(&self, feature_method: &str, index: usize) -> String {
        format!("{}__data_provider_{}", feature_method, index)
    }
}
