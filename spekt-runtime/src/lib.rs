#![warn(missing_docs)]

//! Spekt Runtime
//!
//! Builds the runtime model from compiled artifacts and supervises spec
//! execution against a host test runner:
//!
//! - [`SpecInfoBuilder`] decodes a [`spekt_meta::SpecArtifact`] into the
//!   [`spekt_model::SpecInfo`] tree and dispatches directive annotations to
//!   processors resolved from an explicit [`ProcessorRegistry`]
//! - [`HostSupervisor`] maps the executor's lifecycle callbacks onto host
//!   notifications, handling unrolled naming, multi-failure splitting,
//!   empty-provider detection, and comparison-diff conversion
//!
//! The run protocol is single-threaded: one executor drives one supervisor
//! over one spec at a time.

mod builder;
mod config;
mod directive;
mod filter;
mod host;
mod render;
mod supervisor;
mod unroll;

pub use builder::{BuildError, SpecInfoBuilder};
pub use config::{DiffConfig, FilterConfig, RunnerConfig, SpektConfig};
pub use directive::{DirectiveError, DirectiveProcessor, ProcessorFactory, ProcessorRegistry};
pub use filter::{FrameworkStackTraceFilter, KeepAllFrames, StackTraceFilter};
pub use host::{ConsoleNotifier, FailureNotice, HostEvent, RecordingNotifier, RunNotifier};
pub use render::{JsonRenderer, ObjectRenderer};
pub use supervisor::{HostSupervisor, MasterRunListener, RunStatus, RunSupervisor};
pub use unroll::{UnrolledNameGenerator, DEFAULT_UNROLL_TEMPLATE};
