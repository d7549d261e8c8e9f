//! Execution Supervisor
//!
//! Translates the executor's lifecycle callbacks into host notifications.
//! The supervisor owns all reporting policy: internal listeners fire before
//! the host hears anything, parameterized features can be unrolled into one
//! reported test per iteration, composite failures are split, equality
//! failures become diff-capable comparisons, and dried-up data providers
//! are detected and reported as failures.

use crate::config::SpektConfig;
use crate::filter::{FrameworkStackTraceFilter, StackTraceFilter};
use crate::host::{FailureNotice, RunNotifier};
use crate::render::{JsonRenderer, ObjectRenderer};
use crate::unroll::{UnrolledNameGenerator, DEFAULT_UNROLL_TEMPLATE};
use spekt_meta::UNROLL_DIRECTIVE;
use spekt_model::{
    ComparisonFailure, ConditionFailure, Description, ErrorInfo, FeatureId, IterationInfo,
    MethodId, MethodKind, SpecInfo, TestFailure,
};
use std::rc::Rc;
use tracing::debug;

const NO_DATA_MESSAGE: &str = "Data provider has no data";

/// How far the executor must unwind after a failure.
///
/// Statuses form a severity order; combining two keeps the larger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunStatus {
    /// Keep going.
    Ok,
    /// Abandon the current iteration, continue with the next.
    EndIteration,
    /// Abandon the current feature, continue with the next.
    EndFeature,
    /// Abandon the whole spec.
    EndSpec,
}

/// Lifecycle callbacks an executor drives a spec run through.
///
/// For one run the order is: `before_spec`; per feature `before_feature`,
/// then per iteration `before_iteration`/`after_iteration`, then
/// `after_feature`; finally `after_spec`. `error` may arrive at any point
/// inside the run. `spec_skipped` and `feature_skipped` replace the
/// before/after pair of their node.
pub trait RunSupervisor {
    /// The spec run is starting.
    fn before_spec(&mut self);

    /// `feature` is about to run.
    fn before_feature(&mut self, feature: FeatureId);

    /// One iteration of the current feature is about to run.
    fn before_iteration(&mut self, iteration: &IterationInfo);

    /// A failure was raised; returns how far the executor must unwind.
    fn error(&mut self, error: ErrorInfo) -> RunStatus;

    /// One iteration finished.
    fn after_iteration(&mut self, iteration: &IterationInfo);

    /// `feature` finished.
    fn after_feature(&mut self, feature: FeatureId);

    /// The spec run finished.
    fn after_spec(&mut self);

    /// The whole spec was skipped.
    fn spec_skipped(&mut self);

    /// `feature` was skipped without running.
    fn feature_skipped(&mut self, feature: FeatureId);
}

/// Fans supervisor callbacks out to the listeners registered on the spec.
pub struct MasterRunListener {
    spec: Rc<SpecInfo>,
}

impl MasterRunListener {
    /// Listener multiplexer over `spec`'s registered listeners.
    pub fn new(spec: Rc<SpecInfo>) -> Self {
        Self { spec }
    }

    /// Forward a spec start.
    pub fn before_spec(&self) {
        self.spec.each_listener(|listener| listener.before_spec(&self.spec));
    }

    /// Forward a feature start.
    pub fn before_feature(&self, feature: FeatureId) {
        self.spec
            .each_listener(|listener| listener.before_feature(&self.spec, feature));
    }

    /// Forward an iteration start.
    pub fn before_iteration(&self, iteration: &IterationInfo) {
        self.spec
            .each_listener(|listener| listener.before_iteration(&self.spec, iteration));
    }

    /// Forward a reported failure.
    pub fn error(&self, error: &ErrorInfo) {
        self.spec.each_listener(|listener| listener.error(&self.spec, error));
    }

    /// Forward an iteration end.
    pub fn after_iteration(&self, iteration: &IterationInfo) {
        self.spec
            .each_listener(|listener| listener.after_iteration(&self.spec, iteration));
    }

    /// Forward a feature end.
    pub fn after_feature(&self, feature: FeatureId) {
        self.spec
            .each_listener(|listener| listener.after_feature(&self.spec, feature));
    }

    /// Forward a spec end.
    pub fn after_spec(&self) {
        self.spec.each_listener(|listener| listener.after_spec(&self.spec));
    }

    /// Forward a spec skip.
    pub fn spec_skipped(&self) {
        self.spec.each_listener(|listener| listener.spec_skipped(&self.spec));
    }

    /// Forward a feature skip.
    pub fn feature_skipped(&self, feature: FeatureId) {
        self.spec
            .each_listener(|listener| listener.feature_skipped(&self.spec, feature));
    }
}

/// Supervisor reporting a spec run to a host [`RunNotifier`].
pub struct HostSupervisor<N: RunNotifier> {
    spec: Rc<SpecInfo>,
    master: MasterRunListener,
    notifier: N,
    filter: Box<dyn StackTraceFilter>,
    renderer: Box<dyn ObjectRenderer>,
    default_template: String,
    feature: Option<FeatureId>,
    unroll: Option<UnrolledNameGenerator>,
    unrolled_description: Option<Description>,
    iteration_count: u32,
    error_since_reset: bool,
}

impl<N: RunNotifier> HostSupervisor<N> {
    /// Supervisor with the default trace filter and renderer.
    pub fn new(spec: Rc<SpecInfo>, notifier: N) -> Self {
        Self::with_collaborators(
            spec,
            notifier,
            Box::new(FrameworkStackTraceFilter::default()),
            Box::new(JsonRenderer::new()),
        )
    }

    /// Supervisor with explicit filtering and rendering collaborators.
    pub fn with_collaborators(
        spec: Rc<SpecInfo>,
        notifier: N,
        filter: Box<dyn StackTraceFilter>,
        renderer: Box<dyn ObjectRenderer>,
    ) -> Self {
        let master = MasterRunListener::new(Rc::clone(&spec));
        Self {
            spec,
            master,
            notifier,
            filter,
            renderer,
            default_template: DEFAULT_UNROLL_TEMPLATE.to_string(),
            feature: None,
            unroll: None,
            unrolled_description: None,
            iteration_count: 0,
            error_since_reset: false,
        }
    }

    /// Supervisor configured from `config`.
    pub fn configured(spec: Rc<SpecInfo>, notifier: N, config: &SpektConfig) -> Self {
        let mut supervisor = Self::with_collaborators(
            spec,
            notifier,
            Box::new(FrameworkStackTraceFilter::new(
                config.filter.hidden_prefixes.clone(),
            )),
            Box::new(JsonRenderer::truncated(config.diff.max_rendered_len)),
        );
        supervisor.default_template = config.runner.unroll_template.clone();
        supervisor
    }

    /// The spec this supervisor reports on.
    pub fn spec(&self) -> &Rc<SpecInfo> {
        &self.spec
    }

    fn current_description(&self) -> Description {
        if let Some(description) = self.unrolled_description.as_ref() {
            return description.clone();
        }
        match self.feature {
            Some(feature) => self.spec.feature_description(feature).clone(),
            None => self.spec.description().clone(),
        }
    }

    fn current_feature_parameterized(&self) -> bool {
        self.feature
            .map(|id| self.spec.feature(id).is_parameterized())
            .unwrap_or(false)
    }

    /// Unwind distance for a failure raised in `method`.
    ///
    /// Setup, cleanup, and feature failures end one iteration when the
    /// feature is data-driven (later rows may still pass) and the whole
    /// feature otherwise. Data processors poison only the row being mapped;
    /// providers and the feature frame poison the feature; spec-level
    /// methods poison the spec.
    fn status_for(&self, method: MethodId) -> RunStatus {
        match self.spec.method(method).kind() {
            MethodKind::DataProcessor => RunStatus::EndIteration,
            MethodKind::Feature | MethodKind::Setup | MethodKind::Cleanup => {
                if self.current_feature_parameterized() {
                    RunStatus::EndIteration
                } else {
                    RunStatus::EndFeature
                }
            }
            MethodKind::DataProvider | MethodKind::FeatureExecution => RunStatus::EndFeature,
            MethodKind::SetupSpec | MethodKind::CleanupSpec | MethodKind::SpecExecution => {
                RunStatus::EndSpec
            }
        }
    }

    fn convert_if_comparison(&self, failure: TestFailure) -> TestFailure {
        match failure {
            TestFailure::Condition(ConditionFailure {
                message,
                expression: Some(expression),
                trace,
            }) if expression.is_equality_comparison() => {
                let expected = self.renderer.render(&expression.operands[0]);
                let actual = self.renderer.render(&expression.operands[1]);
                TestFailure::Comparison(ComparisonFailure {
                    message,
                    expected,
                    actual,
                    trace,
                })
            }
            other => other,
        }
    }

    fn report_split(&mut self, method: MethodId, parts: Vec<TestFailure>) -> RunStatus {
        // A composite is as severe as its worst constituent.
        let mut status = RunStatus::Ok;
        for part in parts {
            status = status.max(self.error(ErrorInfo::new(method, part)));
        }
        status
    }
}

impl<N: RunNotifier> RunSupervisor for HostSupervisor<N> {
    fn before_spec(&mut self) {
        self.master.before_spec();
    }

    fn before_feature(&mut self, feature: FeatureId) {
        self.master.before_feature(feature);
        self.feature = Some(feature);

        let unroll_annotation = self
            .spec
            .method(self.spec.feature(feature).feature_method())
            .annotation(UNROLL_DIRECTIVE)
            .cloned();
        match unroll_annotation {
            Some(annotation) => {
                let template = annotation
                    .string_arg("value")
                    .filter(|value| !value.is_empty())
                    .unwrap_or(self.default_template.as_str())
                    .to_string();
                let node = self.spec.feature(feature);
                debug!(
                    spec = %self.spec.name(),
                    feature = node.name(),
                    template = %template,
                    "feature unrolled"
                );
                self.unroll = Some(UnrolledNameGenerator::new(
                    node.name(),
                    node.parameter_names().to_vec(),
                    template,
                ));
            }
            None => {
                let description = self.spec.feature_description(feature).clone();
                self.notifier.fire_test_started(&description);
            }
        }

        if self.spec.feature(feature).is_parameterized() {
            self.iteration_count = 0;
            self.error_since_reset = false;
        }
    }

    fn before_iteration(&mut self, iteration: &IterationInfo) {
        self.master.before_iteration(iteration);
        self.iteration_count += 1;
        if let Some(generator) = self.unroll.as_mut() {
            let name = generator.name_for(&iteration.data_values);
            let description = Description::test(self.spec.name(), &name);
            self.notifier.fire_test_started(&description);
            // Fresh per iteration; never cached on the feature node.
            self.unrolled_description = Some(description);
        }
    }

    fn error(&mut self, error: ErrorInfo) -> RunStatus {
        let ErrorInfo { method, failure } = error;
        let failure = match failure {
            TestFailure::Multiple(parts) => return self.report_split(method, parts),
            other => other,
        };

        let mut failure = self.convert_if_comparison(failure);
        if let Some(trace) = failure.trace_mut() {
            self.filter.filter(trace);
        }
        let info = ErrorInfo::new(method, failure);
        self.master.error(&info);
        debug!(
            spec = %self.spec.name(),
            method = self.spec.method(method).name(),
            message = info.failure.message(),
            "failure reported"
        );
        let notice = FailureNotice::new(self.current_description(), info.failure);
        self.notifier.fire_test_failure(notice);
        self.error_since_reset = true;
        self.status_for(method)
    }

    fn after_iteration(&mut self, iteration: &IterationInfo) {
        self.master.after_iteration(iteration);
        if let Some(description) = self.unrolled_description.take() {
            self.notifier.fire_test_finished(&description);
        }
    }

    fn after_feature(&mut self, feature: FeatureId) {
        let node = self.spec.feature(feature);
        if node.is_parameterized() && self.iteration_count == 0 && !self.error_since_reset {
            // The provider chain ran dry without reporting anything; the
            // host would otherwise see a silently absent test.
            let notice = FailureNotice::new(
                self.spec.feature_description(feature).clone(),
                TestFailure::execution(NO_DATA_MESSAGE),
            );
            self.notifier.fire_test_failure(notice);
        }
        self.master.after_feature(feature);
        if self.unroll.is_none() {
            let description = self.spec.feature_description(feature).clone();
            self.notifier.fire_test_finished(&description);
        }
        self.feature = None;
        self.unroll = None;
        self.unrolled_description = None;
    }

    fn after_spec(&mut self) {
        self.master.after_spec();
    }

    fn spec_skipped(&mut self) {
        self.master.spec_skipped();
        let description = self.spec.description().clone();
        self.notifier.fire_test_ignored(&description);
    }

    fn feature_skipped(&mut self, feature: FeatureId) {
        self.master.feature_skipped(feature);
        let description = self.spec.feature_description(feature).clone();
        self.notifier.fire_test_ignored(&description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingNotifier;
    use serde_json::json;
    use spekt_meta::{Annotation, FeatureMetadata, ProviderMetadata, SpecArtifact, SpecMetadata};
    use spekt_model::{ExpressionInfo, StackFrame, StackTrace};

    struct Fixture {
        spec: Rc<SpecInfo>,
        plain: FeatureId,
        unrolled: FeatureId,
    }

    /// A spec with one plain feature and one parameterized, unrolled one.
    fn fixture() -> Fixture {
        let registry = crate::ProcessorRegistry::new();
        let mut unrolled_meta = FeatureMetadata::new("maps #a to #b", 1);
        unrolled_meta.parameter_names = vec!["a".to_string(), "b".to_string()];
        let artifact = SpecArtifact::builder("CalcSpec")
            .marked()
            .metadata(SpecMetadata::new("calc_spec.rs"))
            .feature_method("adds", FeatureMetadata::new("adds", 0))
            .annotated_feature_method(
                "maps #a to #b",
                unrolled_meta,
                vec![Annotation::plain(UNROLL_DIRECTIVE)
                    .with_args(json!({ "value": "maps #a to #b" }))],
            )
            .method("maps #a to #b__data_processor")
            .provider_method(
                "maps #a to #b__data_provider_0",
                ProviderMetadata::new(12, 5, vec!["a".to_string()]),
            )
            .build();
        let spec = Rc::new(
            crate::SpecInfoBuilder::new(Rc::new(artifact), &registry)
                .build()
                .unwrap(),
        );
        let mut ids = spec.feature_ids();
        let plain = ids.next().unwrap();
        let unrolled = ids.next().unwrap();
        Fixture {
            spec,
            plain,
            unrolled,
        }
    }

    fn supervisor(
        spec: &Rc<SpecInfo>,
        notifier: RecordingNotifier,
    ) -> HostSupervisor<RecordingNotifier> {
        HostSupervisor::new(Rc::clone(spec), notifier)
    }

    #[test]
    fn test_plain_feature_reports_feature_description() {
        let fixture = fixture();
        let recorder = RecordingNotifier::new();
        let mut supervisor = supervisor(&fixture.spec, recorder.clone());

        supervisor.before_spec();
        supervisor.before_feature(fixture.plain);
        supervisor.after_feature(fixture.plain);
        supervisor.after_spec();

        assert_eq!(recorder.started(), ["adds(CalcSpec)"]);
        assert_eq!(recorder.finished(), ["adds(CalcSpec)"]);
        assert!(recorder.failures().is_empty());
    }

    #[test]
    fn test_unrolled_feature_reports_per_iteration() {
        let fixture = fixture();
        let recorder = RecordingNotifier::new();
        let mut supervisor = supervisor(&fixture.spec, recorder.clone());

        supervisor.before_feature(fixture.unrolled);
        let first = IterationInfo::new(fixture.unrolled, vec![json!(1), json!(2)]);
        supervisor.before_iteration(&first);
        supervisor.after_iteration(&first);
        let second = IterationInfo::new(fixture.unrolled, vec![json!("x"), json!("y")]);
        supervisor.before_iteration(&second);
        supervisor.after_iteration(&second);
        supervisor.after_feature(fixture.unrolled);

        // No feature-level start/finish; one pair per iteration instead.
        assert_eq!(
            recorder.started(),
            ["maps 1 to 2(CalcSpec)", "maps x to y(CalcSpec)"]
        );
        assert_eq!(recorder.finished(), recorder.started());
    }

    #[test]
    fn test_parameterized_feature_without_unroll_reports_once() {
        // Without unroll, the whole data table runs under a single
        // feature-level announcement, however many rows it has.
        let registry = crate::ProcessorRegistry::new();
        let mut meta = FeatureMetadata::new("doubles", 0);
        meta.parameter_names = vec!["n".to_string()];
        let artifact = SpecArtifact::builder("NumSpec")
            .marked()
            .metadata(SpecMetadata::new("num_spec.rs"))
            .feature_method("doubles", meta)
            .method("doubles__data_processor")
            .provider_method(
                "doubles__data_provider_0",
                ProviderMetadata::new(1, 1, vec!["n".to_string()]),
            )
            .build();
        let spec = Rc::new(
            crate::SpecInfoBuilder::new(Rc::new(artifact), &registry)
                .build()
                .unwrap(),
        );
        let feature = spec.feature_ids().next().unwrap();
        assert!(spec.feature(feature).is_parameterized());

        let recorder = RecordingNotifier::new();
        let mut supervisor = HostSupervisor::new(Rc::clone(&spec), recorder.clone());
        supervisor.before_feature(feature);
        for n in [2, 3] {
            let iteration = IterationInfo::new(feature, vec![json!(n)]);
            supervisor.before_iteration(&iteration);
            supervisor.after_iteration(&iteration);
        }
        supervisor.after_feature(feature);

        assert_eq!(recorder.started(), ["doubles(NumSpec)"]);
        assert_eq!(recorder.finished(), ["doubles(NumSpec)"]);
        assert!(recorder.failures().is_empty());
    }

    #[test]
    fn test_failure_goes_to_current_iteration_description() {
        let fixture = fixture();
        let recorder = RecordingNotifier::new();
        let mut supervisor = supervisor(&fixture.spec, recorder.clone());

        supervisor.before_feature(fixture.unrolled);
        let iteration = IterationInfo::new(fixture.unrolled, vec![json!(3), json!(4)]);
        supervisor.before_iteration(&iteration);

        let feature_method = fixture.spec.feature(fixture.unrolled).feature_method();
        let status = supervisor.error(ErrorInfo::new(feature_method, TestFailure::error("boom")));

        // Parameterized feature: only this iteration is abandoned.
        assert_eq!(status, RunStatus::EndIteration);
        let failures = recorder.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].description.display_name(), "maps 3 to 4(CalcSpec)");
    }

    #[test]
    fn test_unparameterized_failure_ends_feature() {
        let fixture = fixture();
        let recorder = RecordingNotifier::new();
        let mut supervisor = supervisor(&fixture.spec, recorder.clone());

        supervisor.before_feature(fixture.plain);
        let feature_method = fixture.spec.feature(fixture.plain).feature_method();
        let status = supervisor.error(ErrorInfo::new(feature_method, TestFailure::error("boom")));
        assert_eq!(status, RunStatus::EndFeature);
    }

    #[test]
    fn test_spec_level_failure_ends_spec() {
        let fixture = fixture();
        let recorder = RecordingNotifier::new();
        let mut supervisor = supervisor(&fixture.spec, recorder.clone());

        let setup_spec = fixture.spec.setup_spec_method().unwrap();
        let status =
            supervisor.error(ErrorInfo::new(setup_spec, TestFailure::error("no database")));
        assert_eq!(status, RunStatus::EndSpec);
        // No feature running: reported against the spec description.
        assert_eq!(
            recorder.failures()[0].description.display_name(),
            "CalcSpec"
        );
    }

    #[test]
    fn test_composite_failure_splits_into_individual_reports() {
        let fixture = fixture();
        let recorder = RecordingNotifier::new();
        let mut supervisor = supervisor(&fixture.spec, recorder.clone());

        supervisor.before_feature(fixture.plain);
        let feature_method = fixture.spec.feature(fixture.plain).feature_method();

        let composite = TestFailure::Multiple(vec![
            TestFailure::error("first"),
            TestFailure::Multiple(vec![TestFailure::error("nested")]),
            TestFailure::error("last"),
        ]);
        let status = supervisor.error(ErrorInfo::new(feature_method, composite));
        assert_eq!(status, RunStatus::EndFeature);

        let messages: Vec<_> = recorder
            .failures()
            .iter()
            .map(|notice| notice.failure.message().to_string())
            .collect();
        assert_eq!(messages, ["first", "nested", "last"]);
    }

    #[test]
    fn test_composite_severity_is_worst_constituent() {
        let fixture = fixture();
        let recorder = RecordingNotifier::new();
        let mut supervisor = supervisor(&fixture.spec, recorder.clone());

        supervisor.before_feature(fixture.plain);
        let feature_method = fixture.spec.feature(fixture.plain).feature_method();

        // The last constituent reports nothing on its own; the composite
        // must still unwind as far as its worst part.
        let composite = TestFailure::Multiple(vec![
            TestFailure::error("real failure"),
            TestFailure::Multiple(Vec::new()),
        ]);
        let status = supervisor.error(ErrorInfo::new(feature_method, composite));
        assert_eq!(status, RunStatus::EndFeature);
        assert_eq!(recorder.failures().len(), 1);
    }

    #[test]
    fn test_empty_composite_is_ok() {
        let fixture = fixture();
        let recorder = RecordingNotifier::new();
        let mut supervisor = supervisor(&fixture.spec, recorder.clone());

        let feature_method = fixture.spec.feature(fixture.plain).feature_method();
        let status = supervisor.error(ErrorInfo::new(
            feature_method,
            TestFailure::Multiple(Vec::new()),
        ));
        assert_eq!(status, RunStatus::Ok);
        assert!(recorder.failures().is_empty());
    }

    #[test]
    fn test_equality_condition_becomes_comparison() {
        let fixture = fixture();
        let recorder = RecordingNotifier::new();
        let mut supervisor = supervisor(&fixture.spec, recorder.clone());

        supervisor.before_feature(fixture.plain);
        let feature_method = fixture.spec.feature(fixture.plain).feature_method();
        let trace =
            StackTrace::from_frames(vec![StackFrame::new("calc::check", "calc.rs", 12)]);
        let failure = TestFailure::Condition(
            ConditionFailure::new("condition not satisfied", trace)
                .with_expression(ExpressionInfo::comparison("==", json!(4), json!(5))),
        );
        supervisor.error(ErrorInfo::new(feature_method, failure));

        match &recorder.failures()[0].failure {
            TestFailure::Comparison(comparison) => {
                assert_eq!(comparison.expected, "4");
                assert_eq!(comparison.actual, "5");
                assert_eq!(comparison.message, "condition not satisfied");
                assert_eq!(comparison.trace.frames[0].function, "calc::check");
            }
            other => panic!("expected comparison failure, got {other:?}"),
        }
    }

    #[test]
    fn test_non_equality_condition_stays_condition() {
        let fixture = fixture();
        let recorder = RecordingNotifier::new();
        let mut supervisor = supervisor(&fixture.spec, recorder.clone());

        supervisor.before_feature(fixture.plain);
        let feature_method = fixture.spec.feature(fixture.plain).feature_method();
        let failure = TestFailure::Condition(
            ConditionFailure::new("condition not satisfied", StackTrace::empty())
                .with_expression(ExpressionInfo::comparison("<", json!(9), json!(5))),
        );
        supervisor.error(ErrorInfo::new(feature_method, failure));
        assert!(matches!(
            recorder.failures()[0].failure,
            TestFailure::Condition(_)
        ));
    }

    #[test]
    fn test_traces_are_filtered_before_reporting() {
        let fixture = fixture();
        let recorder = RecordingNotifier::new();
        let mut supervisor = supervisor(&fixture.spec, recorder.clone());

        supervisor.before_feature(fixture.plain);
        let feature_method = fixture.spec.feature(fixture.plain).feature_method();
        let trace = StackTrace::from_frames(vec![
            StackFrame::new("spekt_runtime::supervisor::drive", "supervisor.rs", 10),
            StackFrame::new("calc::divide", "calc.rs", 3),
        ]);
        supervisor.error(ErrorInfo::new(
            feature_method,
            TestFailure::Error {
                message: "division by zero".to_string(),
                trace,
            },
        ));

        let failures = recorder.failures();
        let frames = &failures[0].failure.trace().unwrap().frames;
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].function, "calc::divide");
    }

    #[test]
    fn test_empty_provider_synthesizes_failure() {
        let fixture = fixture();
        let recorder = RecordingNotifier::new();
        let mut supervisor = supervisor(&fixture.spec, recorder.clone());

        supervisor.before_feature(fixture.unrolled);
        supervisor.after_feature(fixture.unrolled);

        let failures = recorder.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].failure.message(), "Data provider has no data");
        assert_eq!(
            failures[0].description.display_name(),
            "maps #a to #b(CalcSpec)"
        );
    }

    #[test]
    fn test_failed_empty_feature_does_not_double_report() {
        let fixture = fixture();
        let recorder = RecordingNotifier::new();
        let mut supervisor = supervisor(&fixture.spec, recorder.clone());

        supervisor.before_feature(fixture.unrolled);
        let processor = fixture
            .spec
            .feature(fixture.unrolled)
            .data_processor_method()
            .unwrap();
        supervisor.error(ErrorInfo::new(processor, TestFailure::error("bad row")));
        supervisor.after_feature(fixture.unrolled);

        // The real failure was already reported; no synthesized one on top.
        assert_eq!(recorder.failures().len(), 1);
        assert_eq!(recorder.failures()[0].failure.message(), "bad row");
    }

    #[test]
    fn test_iteration_with_zero_rows_counts_as_ran() {
        let fixture = fixture();
        let recorder = RecordingNotifier::new();
        let mut supervisor = supervisor(&fixture.spec, recorder.clone());

        supervisor.before_feature(fixture.unrolled);
        let iteration = IterationInfo::new(fixture.unrolled, vec![json!(1), json!(1)]);
        supervisor.before_iteration(&iteration);
        supervisor.after_iteration(&iteration);
        supervisor.after_feature(fixture.unrolled);

        assert!(recorder.failures().is_empty());
    }

    #[test]
    fn test_skips_are_reported_ignored() {
        let fixture = fixture();
        let recorder = RecordingNotifier::new();
        let mut supervisor = supervisor(&fixture.spec, recorder.clone());

        supervisor.feature_skipped(fixture.plain);
        supervisor.spec_skipped();

        assert_eq!(recorder.ignored(), ["adds(CalcSpec)", "CalcSpec"]);
        assert!(recorder.started().is_empty());
    }

    #[test]
    fn test_listeners_hear_callbacks_before_host() {
        use std::cell::RefCell;

        struct Journal(Rc<RefCell<Vec<&'static str>>>);

        impl spekt_model::RunListener for Journal {
            fn before_feature(&mut self, _spec: &SpecInfo, _feature: FeatureId) {
                self.0.borrow_mut().push("listener");
            }
        }

        let fixture = fixture();
        let journal = Rc::new(RefCell::new(Vec::new()));
        fixture.spec.add_listener(Box::new(Journal(Rc::clone(&journal))));

        let recorder = RecordingNotifier::new();
        let mut supervisor = supervisor(&fixture.spec, recorder.clone());
        supervisor.before_feature(fixture.plain);

        assert_eq!(*journal.borrow(), ["listener"]);
        assert_eq!(recorder.started().len(), 1);
    }

    #[test]
    fn test_unroll_uses_default_template_without_value() {
        // The fixture's unroll annotation carries no "value" argument, so
        // the default template applies; its tokens come from the feature
        // name and a zero-based iteration counter.
        let registry = crate::ProcessorRegistry::new();
        let mut meta = FeatureMetadata::new("squares", 0);
        meta.parameter_names = vec!["n".to_string()];
        let artifact = SpecArtifact::builder("NumSpec")
            .marked()
            .metadata(SpecMetadata::new("num_spec.rs"))
            .annotated_feature_method(
                "squares",
                meta,
                vec![Annotation::plain(UNROLL_DIRECTIVE)],
            )
            .method("squares__data_processor")
            .provider_method(
                "squares__data_provider_0",
                ProviderMetadata::new(1, 1, vec!["n".to_string()]),
            )
            .build();
        let spec = Rc::new(
            crate::SpecInfoBuilder::new(Rc::new(artifact), &registry)
                .build()
                .unwrap(),
        );
        let feature = spec.feature_ids().next().unwrap();

        let recorder = RecordingNotifier::new();
        let mut supervisor = HostSupervisor::new(Rc::clone(&spec), recorder.clone());
        supervisor.before_feature(feature);
        for n in [2, 3] {
            let iteration = IterationInfo::new(feature, vec![json!(n)]);
            supervisor.before_iteration(&iteration);
            supervisor.after_iteration(&iteration);
        }
        assert_eq!(
            recorder.started(),
            ["squares[0](NumSpec)", "squares[1](NumSpec)"]
        );
    }

    #[test]
    fn test_severity_order() {
        assert!(RunStatus::Ok < RunStatus::EndIteration);
        assert!(RunStatus::EndIteration < RunStatus::EndFeature);
        assert!(RunStatus::EndFeature < RunStatus::EndSpec);
        assert_eq!(
            RunStatus::EndFeature.max(RunStatus::EndIteration),
            RunStatus::EndFeature
        );
    }
}
