//! Spec Registry
//!
//! Compiled specs announce themselves at link time through
//! `inventory::submit!`; a host runner discovers them with
//! [`registered_specs`] and never touches reflection.

use crate::artifact::SpecArtifact;

/// A spec registered by compiler-emitted code.
#[derive(Debug, Clone, Copy)]
pub struct SpecRegistration {
    /// Simple class name, unique within a suite.
    pub name: &'static str,
    /// Constructor for the compiled artifact.
    pub artifact: fn() -> SpecArtifact,
}

inventory::collect!(SpecRegistration);

/// Iterate all registered specs, in link order.
pub fn registered_specs() -> impl Iterator<Item = &'static SpecRegistration> {
    inventory::iter::<SpecRegistration>.into_iter()
}

/// Anchor to prevent LTO from stripping inventory entries
#[used]
#[doc(hidden)]
pub static REGISTRY_ANCHOR: fn() = || {
    for _ in inventory::iter::<SpecRegistration> {}
};
