//! Spekt Example Run
//!
//! This example embeds the runtime the way a host test framework would: it
//! builds the typed model from a compiled artifact, registers a directive
//! processor, and drives a scripted run against the console notifier. The
//! artifact is hand-assembled here; in a real suite the spec compiler emits
//! it together with the registry entry.
//!
//! Run with:
//!   cargo run --example calculator

use serde_json::json;
use spekt::prelude::*;
use spekt::{
    registered_specs, BlockKind, BlockMetadata, BuildError, ConditionFailure, ExpressionInfo,
    FeatureMetadata, ProviderMetadata, SpecMetadata, SpecRegistration, StackTrace,
};
use std::rc::Rc;

// ============================================================================
// Compiled Artifact
// ============================================================================

/// The artifact the compiler would emit for a small calculator spec.
fn calculator_artifact() -> SpecArtifact {
    let mut adds = FeatureMetadata::new("adds numbers", 0);
    adds.blocks = vec![
        BlockMetadata::new(BlockKind::When, vec!["two numbers are added".to_string()]),
        BlockMetadata::new(BlockKind::Then, vec!["the sum comes back".to_string()]),
    ];

    let mut rounds = FeatureMetadata::new("rounds halves up", 1);
    rounds.blocks = vec![BlockMetadata::new(
        BlockKind::Expect,
        vec!["2.5 rounds to 3".to_string()],
    )];

    let mut maximum = FeatureMetadata::new("maximum of #a and #b", 2);
    maximum.parameter_names = vec!["a".to_string(), "b".to_string(), "expected".to_string()];
    maximum.blocks = vec![
        BlockMetadata::new(BlockKind::Expect, vec!["max picks the larger".to_string()]),
        BlockMetadata::new(BlockKind::Where, Vec::new()),
    ];

    SpecArtifact::builder("CalculatorSpec")
        .marked()
        .metadata(SpecMetadata::new("calculator_spec.rs"))
        .annotation(Annotation::directive("summarize", "summarize"))
        .field("calculator")
        .method("setup")
        .method("cleanup")
        .feature_method("adds numbers", adds)
        .feature_method("rounds halves up", rounds)
        .annotated_feature_method(
            "maximum of #a and #b",
            maximum,
            vec![Annotation::plain("unroll")
                .with_args(json!({ "value": "max(#a, #b) == #expected" }))],
        )
        .method("maximum of #a and #b__data_processor")
        .provider_method(
            "maximum of #a and #b__data_provider_0",
            ProviderMetadata::new(
                31,
                9,
                vec!["a".to_string(), "b".to_string(), "expected".to_string()],
            ),
        )
        .annotated_feature_method(
            "multiplies large numbers",
            FeatureMetadata::new("multiplies large numbers", 3),
            vec![Annotation::plain("ignore").with_args(json!({ "reason": "overflows on 32-bit" }))],
        )
        .build()
}

spekt::internal::inventory::submit! {
    SpecRegistration {
        name: "CalculatorSpec",
        artifact: calculator_artifact,
    }
}

// ============================================================================
// Directives
// ============================================================================

/// Listener counting what actually ran; prints one line at the end.
struct RunSummary {
    features: u32,
    failures: u32,
}

impl RunListener for RunSummary {
    fn error(&mut self, _spec: &SpecInfo, _error: &ErrorInfo) {
        self.failures += 1;
    }

    fn after_feature(&mut self, _spec: &SpecInfo, _feature: FeatureId) {
        self.features += 1;
    }

    fn after_spec(&mut self, spec: &SpecInfo) {
        println!(
            "[summary] {}: {} feature(s) ran, {} failure(s)",
            spec.name(),
            self.features,
            self.failures
        );
    }
}

/// Directive that wires a [`RunSummary`] into the spec at build time.
struct Summarize;

impl DirectiveProcessor for Summarize {
    fn after_build(&mut self, spec: &mut SpecInfo) -> Result<(), DirectiveError> {
        spec.add_listener(Box::new(RunSummary {
            features: 0,
            failures: 0,
        }));
        Ok(())
    }
}

// ============================================================================
// Scripted Executor
// ============================================================================

/// Drive one run, scripting the outcomes a real executor would get from
/// evaluating user code.
fn run_spec<N: RunNotifier>(spec: &Rc<SpecInfo>, supervisor: &mut HostSupervisor<N>) {
    supervisor.before_spec();

    for feature in spec.feature_ids().collect::<Vec<_>>() {
        let method = spec.feature(feature).feature_method();
        if spec.method(method).annotation("ignore").is_some() {
            supervisor.feature_skipped(feature);
            continue;
        }

        supervisor.before_feature(feature);
        match spec.feature(feature).name() {
            "rounds halves up" => {
                let iteration = IterationInfo::new(feature, Vec::new());
                supervisor.before_iteration(&iteration);
                let failure = TestFailure::Condition(
                    ConditionFailure::new("condition not satisfied", StackTrace::empty())
                        .with_expression(ExpressionInfo::comparison("==", json!(3), json!(2))),
                );
                // EndFeature: the executor abandons the remaining blocks.
                let _ = supervisor.error(ErrorInfo::new(method, failure));
                supervisor.after_iteration(&iteration);
            }
            "maximum of #a and #b" => {
                for (a, b, expected) in [(1, 3, 3), (7, 4, 7), (5, 5, 5)] {
                    let iteration =
                        IterationInfo::new(feature, vec![json!(a), json!(b), json!(expected)]);
                    supervisor.before_iteration(&iteration);
                    supervisor.after_iteration(&iteration);
                }
            }
            _ => {
                let iteration = IterationInfo::new(feature, Vec::new());
                supervisor.before_iteration(&iteration);
                supervisor.after_iteration(&iteration);
            }
        }
        supervisor.after_feature(feature);
    }

    supervisor.after_spec();
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn run() -> Result<(), BuildError> {
    tracing_subscriber::fmt()
        .with_env_filter("spekt_runtime=debug")
        .init();

    // Discover the compiled spec through the link-time registry.
    let registration = registered_specs()
        .find(|r| r.name == "CalculatorSpec")
        .expect("example spec is registered above");

    let mut registry = ProcessorRegistry::new();
    registry.register("summarize", || Summarize);

    let artifact = Rc::new((registration.artifact)());
    let spec = Rc::new(SpecInfoBuilder::new(artifact, &registry).build()?);

    println!("spec: {} (from {})", spec.name(), spec.filename());
    for (_, feature) in spec.features() {
        println!("  feature: {}", feature.name());
        for block in feature.blocks() {
            for text in block.texts() {
                println!("    {:?}: {}", block.kind(), text);
            }
        }
    }
    println!();

    let mut supervisor = HostSupervisor::new(Rc::clone(&spec), ConsoleNotifier::stdout());
    run_spec(&spec, &mut supervisor);
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
