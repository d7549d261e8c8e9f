//! Host Notification Protocol
//!
//! The supervisor reports through [`RunNotifier`]; an embedding host adapts
//! the four notification kinds to whatever its own runner understands. Two
//! notifiers ship with the runtime: [`ConsoleNotifier`] writes one line per
//! event, [`RecordingNotifier`] captures events for assertions in tests.

use spekt_model::{Description, TestFailure};
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

/// A failure tied to the description it is reported under.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureNotice {
    /// Description the failure belongs to.
    pub description: Description,
    /// The failure.
    pub failure: TestFailure,
}

impl FailureNotice {
    /// Notice binding `failure` to `description`.
    pub fn new(description: Description, failure: TestFailure) -> Self {
        Self {
            description,
            failure,
        }
    }
}

/// Host-runner notification sink.
///
/// Start/finish pair up by description equality; a failure does not imply
/// a finish, and a skipped test gets neither start nor finish.
pub trait RunNotifier {
    /// A test began.
    fn fire_test_started(&mut self, description: &Description);

    /// A test finished, passing or failing alike.
    fn fire_test_finished(&mut self, description: &Description);

    /// A failure was reported.
    fn fire_test_failure(&mut self, notice: FailureNotice);

    /// A test was skipped without running.
    fn fire_test_ignored(&mut self, description: &Description);
}

impl<T: RunNotifier + ?Sized> RunNotifier for &mut T {
    fn fire_test_started(&mut self, description: &Description) {
        (**self).fire_test_started(description);
    }

    fn fire_test_finished(&mut self, description: &Description) {
        (**self).fire_test_finished(description);
    }

    fn fire_test_failure(&mut self, notice: FailureNotice) {
        (**self).fire_test_failure(notice);
    }

    fn fire_test_ignored(&mut self, description: &Description) {
        (**self).fire_test_ignored(description);
    }
}

/// Notifier writing one line per event to a writer.
pub struct ConsoleNotifier<W: Write> {
    out: W,
}

impl<W: Write> ConsoleNotifier<W> {
    /// Notifier writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the notifier, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl ConsoleNotifier<std::io::Stdout> {
    /// Notifier writing to stdout.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> RunNotifier for ConsoleNotifier<W> {
    fn fire_test_started(&mut self, description: &Description) {
        let _ = writeln!(self.out, "running {}", description);
    }

    fn fire_test_finished(&mut self, description: &Description) {
        let _ = writeln!(self.out, "finished {}", description);
    }

    fn fire_test_failure(&mut self, notice: FailureNotice) {
        let _ = writeln!(
            self.out,
            "FAILED {}: {}",
            notice.description,
            notice.failure.message()
        );
        if let TestFailure::Comparison(comparison) = &notice.failure {
            let _ = writeln!(self.out, "  expected: {}", comparison.expected);
            let _ = writeln!(self.out, "  actual:   {}", comparison.actual);
        }
    }

    fn fire_test_ignored(&mut self, description: &Description) {
        let _ = writeln!(self.out, "ignored {}", description);
    }
}

/// One recorded host notification.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// A test began.
    Started(Description),
    /// A test finished.
    Finished(Description),
    /// A failure was reported.
    Failed(FailureNotice),
    /// A test was skipped.
    Ignored(Description),
}

/// Notifier recording every event for later inspection.
///
/// Clones share one log, so a test can keep a handle while the supervisor
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    events: Rc<RefCell<Vec<HostEvent>>>,
}

impl RecordingNotifier {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events, in order.
    pub fn events(&self) -> Vec<HostEvent> {
        self.events.borrow().clone()
    }

    /// Display names of started tests, in order.
    pub fn started(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                HostEvent::Started(description) => Some(description.display_name().to_string()),
                _ => None,
            })
            .collect()
    }

    /// Display names of finished tests, in order.
    pub fn finished(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                HostEvent::Finished(description) => Some(description.display_name().to_string()),
                _ => None,
            })
            .collect()
    }

    /// Recorded failure notices, in order.
    pub fn failures(&self) -> Vec<FailureNotice> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                HostEvent::Failed(notice) => Some(notice.clone()),
                _ => None,
            })
            .collect()
    }

    /// Display names of ignored tests, in order.
    pub fn ignored(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                HostEvent::Ignored(description) => Some(description.display_name().to_string()),
                _ => None,
            })
            .collect()
    }
}

impl RunNotifier for RecordingNotifier {
    fn fire_test_started(&mut self, description: &Description) {
        self.events
            .borrow_mut()
            .push(HostEvent::Started(description.clone()));
    }

    fn fire_test_finished(&mut self, description: &Description) {
        self.events
            .borrow_mut()
            .push(HostEvent::Finished(description.clone()));
    }

    fn fire_test_failure(&mut self, notice: FailureNotice) {
        self.events.borrow_mut().push(HostEvent::Failed(notice));
    }

    fn fire_test_ignored(&mut self, description: &Description) {
        self.events
            .borrow_mut()
            .push(HostEvent::Ignored(description.clone()));
    }
}
