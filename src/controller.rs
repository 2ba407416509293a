//! Interactive triage state machine.
//!
//! The controller never touches the terminal or the disk directly. Key presses
//! and operation outcomes come in as [`Message`]s, one at a time, and the
//! caller carries out the returned [`Command`].

use crate::domain::{Decision, FileBatch, Tally};
use crate::filesystem::FileOperations;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a decision on the current file
    FileManage,
    /// A keep or delete is in flight
    Processing,
    /// Every file has been handled
    End,
    /// An operation failed; the message is on screen
    Error,
}

/// Result of a dispatched keep/delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpOutcome {
    Succeeded,
    Failed(String),
}

/// A user decision, already stripped of any key binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Keep,
    Delete,
    Skip,
    Quit,
    /// Any other key; only meaningful on the End and Error screens
    Other,
}

/// Input to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Key(Input),
    Outcome(OpOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Keep,
    Delete,
}

impl From<JobKind> for Decision {
    fn from(kind: JobKind) -> Self {
        match kind {
            JobKind::Keep => Decision::Keep,
            JobKind::Delete => Decision::Delete,
        }
    }
}

/// A single pending filesystem operation.
///
/// Captures the filename at dispatch time so the outcome handler never has to
/// look at shared state.
#[derive(Clone)]
pub struct Job {
    pub kind: JobKind,
    pub filename: String,
    ops: Arc<dyn FileOperations>,
}

impl Job {
    /// Runs the operation on the calling thread
    pub fn run(&self) -> OpOutcome {
        let result = match self.kind {
            JobKind::Keep => self.ops.keep(&self.filename),
            JobKind::Delete => self.ops.delete(&self.filename),
        };

        match result {
            Ok(()) => OpOutcome::Succeeded,
            Err(e) => OpOutcome::Failed(e.to_string()),
        }
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("kind", &self.kind)
            .field("filename", &self.filename)
            .finish_non_exhaustive()
    }
}

/// What the caller must do after an update
#[derive(Debug)]
pub enum Command {
    None,
    Dispatch(Job),
    Quit,
}

#[derive(Debug)]
pub struct Controller {
    phase: Phase,
    error_message: Option<String>,
    batch: FileBatch,
    ops: Arc<dyn FileOperations>,
    tally: Tally,
    pending: Option<JobKind>,
}

impl Controller {
    pub fn new(batch: FileBatch, ops: Arc<dyn FileOperations>) -> Self {
        Self {
            phase: Phase::FileManage,
            error_message: None,
            batch,
            ops,
            tally: Tally::default(),
            pending: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Set exactly when the phase is `Error`
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn batch(&self) -> &FileBatch {
        &self.batch
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    /// Kind of the operation in flight, if any
    pub fn pending(&self) -> Option<JobKind> {
        self.pending
    }

    /// True when the run ended in `Error`
    pub fn is_failed(&self) -> bool {
        self.phase == Phase::Error
    }

    /// Applies one message and returns the side effect to perform
    pub fn update(&mut self, msg: Message) -> Command {
        match (self.phase, msg) {
            (Phase::End | Phase::Error, Message::Key(_)) => Command::Quit,

            (_, Message::Key(Input::Quit)) => {
                if self.phase == Phase::Processing {
                    info!("quit with an operation in flight");
                }
                Command::Quit
            }

            (Phase::FileManage, Message::Key(Input::Keep)) => self.dispatch(JobKind::Keep),
            (Phase::FileManage, Message::Key(Input::Delete)) => self.dispatch(JobKind::Delete),
            (Phase::FileManage, Message::Key(Input::Skip)) => {
                debug!(file = ?self.batch.current(), "skipped");
                self.tally.record(Decision::Skip);
                self.advance();
                Command::None
            }

            (Phase::Processing, Message::Outcome(outcome)) => {
                self.finish(outcome);
                Command::None
            }

            (phase, Message::Outcome(outcome)) => {
                warn!(?phase, ?outcome, "ignoring operation outcome outside processing");
                Command::None
            }

            _ => Command::None,
        }
    }

    fn dispatch(&mut self, kind: JobKind) -> Command {
        let Some(filename) = self.batch.current() else {
            return Command::None;
        };

        let job = Job {
            kind,
            filename: filename.to_string(),
            ops: Arc::clone(&self.ops),
        };
        debug!(?kind, file = %job.filename, "dispatching operation");

        self.pending = Some(kind);
        self.phase = Phase::Processing;
        Command::Dispatch(job)
    }

    fn finish(&mut self, outcome: OpOutcome) {
        let kind = self.pending.take();

        match outcome {
            OpOutcome::Succeeded => {
                if let Some(kind) = kind {
                    self.tally.record(kind.into());
                }
                self.advance();
            }
            OpOutcome::Failed(message) => {
                let message = if message.trim().is_empty() {
                    "unknown error".to_string()
                } else {
                    message
                };
                warn!(file = ?self.batch.current(), error = %message, "operation failed");
                self.error_message = Some(message);
                self.phase = Phase::Error;
            }
        }
    }

    fn advance(&mut self) {
        self.batch.advance();
        self.phase = if self.batch.is_complete() {
            info!(total = self.batch.total(), "batch complete");
            Phase::End
        } else {
            Phase::FileManage
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FilerError, Result};
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct RecordingOps {
        calls: Mutex<Vec<(JobKind, String)>>,
        fail_with: Option<String>,
    }

    impl RecordingOps {
        fn failing(message: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_with: Some(message.to_string()),
            }
        }

        fn record(&self, kind: JobKind, filename: &str) -> Result<()> {
            self.calls.lock().unwrap().push((kind, filename.to_string()));
            match self.fail_with {
                Some(ref msg) => Err(FilerError::Validation(msg.clone())),
                None => Ok(()),
            }
        }

        fn calls(&self) -> Vec<(JobKind, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl FileOperations for RecordingOps {
        fn keep(&self, filename: &str) -> Result<()> {
            self.record(JobKind::Keep, filename)
        }

        fn delete(&self, filename: &str) -> Result<()> {
            self.record(JobKind::Delete, filename)
        }
    }

    fn controller_with(files: &[&str], ops: Arc<RecordingOps>) -> Controller {
        let batch = FileBatch::new(files.iter().map(|s| s.to_string()).collect()).unwrap();
        Controller::new(batch, ops)
    }

    fn expect_job(cmd: Command) -> Job {
        match cmd {
            Command::Dispatch(job) => job,
            other => panic!("expected Dispatch, got {:?}", other),
        }
    }

    mod transition_tests {
        use super::*;

        #[test]
        fn test_keep_flow() {
            let ops = Arc::new(RecordingOps::default());
            let mut ctrl = controller_with(&["a.txt", "b.txt"], Arc::clone(&ops));
            assert_eq!(ctrl.phase(), Phase::FileManage);

            let job = expect_job(ctrl.update(Message::Key(Input::Keep)));
            assert_eq!(ctrl.phase(), Phase::Processing);
            assert_eq!(ctrl.pending(), Some(JobKind::Keep));
            assert_eq!(job.kind, JobKind::Keep);
            assert_eq!(job.filename, "a.txt");

            ctrl.update(Message::Outcome(OpOutcome::Succeeded));
            assert_eq!(ctrl.phase(), Phase::FileManage);
            assert_eq!(ctrl.batch().current(), Some("b.txt"));

            let job = expect_job(ctrl.update(Message::Key(Input::Keep)));
            assert_eq!(job.filename, "b.txt");
            ctrl.update(Message::Outcome(OpOutcome::Succeeded));

            assert_eq!(ctrl.phase(), Phase::End);
            assert!(ctrl.batch().is_complete());
            assert_eq!(ctrl.tally().kept, 2);
            // The controller itself never ran anything
            assert!(ops.calls().is_empty());
        }

        #[test]
        fn test_error_flow_keeps_cursor() {
            let ops = Arc::new(RecordingOps::default());
            let mut ctrl = controller_with(&["a.txt", "b.txt"], ops);

            let job = expect_job(ctrl.update(Message::Key(Input::Delete)));
            assert_eq!(job.kind, JobKind::Delete);

            ctrl.update(Message::Outcome(OpOutcome::Failed(
                "permission denied".to_string(),
            )));

            assert_eq!(ctrl.phase(), Phase::Error);
            assert_eq!(ctrl.error_message(), Some("permission denied"));
            assert_eq!(ctrl.batch().current(), Some("a.txt"));
            assert!(ctrl.is_failed());
            assert_eq!(ctrl.tally().deleted, 0);
        }

        #[test]
        fn test_empty_failure_message_is_replaced() {
            let ops = Arc::new(RecordingOps::default());
            let mut ctrl = controller_with(&["a.txt"], ops);

            ctrl.update(Message::Key(Input::Keep));
            ctrl.update(Message::Outcome(OpOutcome::Failed(String::new())));

            assert_eq!(ctrl.phase(), Phase::Error);
            assert_eq!(ctrl.error_message(), Some("unknown error"));
        }

        #[test]
        fn test_skip_advances_without_dispatch() {
            let ops = Arc::new(RecordingOps::default());
            let mut ctrl = controller_with(&["a.txt", "b.txt"], ops);

            assert!(matches!(
                ctrl.update(Message::Key(Input::Skip)),
                Command::None
            ));
            assert_eq!(ctrl.phase(), Phase::FileManage);
            assert_eq!(ctrl.batch().current(), Some("b.txt"));

            ctrl.update(Message::Key(Input::Skip));
            assert_eq!(ctrl.phase(), Phase::End);
            assert_eq!(ctrl.tally().skipped, 2);
            assert_eq!(ctrl.batch().progress(), 2);
        }

        #[test]
        fn test_unrecognized_keys_are_ignored() {
            let ops = Arc::new(RecordingOps::default());
            let mut ctrl = controller_with(&["a.txt"], ops);

            assert!(matches!(
                ctrl.update(Message::Key(Input::Other)),
                Command::None
            ));
            assert_eq!(ctrl.phase(), Phase::FileManage);
            assert_eq!(ctrl.batch().current(), Some("a.txt"));
        }

        #[test]
        fn test_keys_ignored_while_processing() {
            let ops = Arc::new(RecordingOps::default());
            let mut ctrl = controller_with(&["a.txt", "b.txt"], ops);

            ctrl.update(Message::Key(Input::Keep));
            for action in [Input::Keep, Input::Delete, Input::Skip] {
                assert!(matches!(ctrl.update(Message::Key(action)), Command::None));
            }

            assert_eq!(ctrl.phase(), Phase::Processing);
            assert_eq!(ctrl.batch().current(), Some("a.txt"));
        }

        #[test]
        fn test_stale_outcome_is_ignored() {
            let ops = Arc::new(RecordingOps::default());
            let mut ctrl = controller_with(&["a.txt", "b.txt"], ops);

            ctrl.update(Message::Outcome(OpOutcome::Succeeded));
            assert_eq!(ctrl.phase(), Phase::FileManage);
            assert_eq!(ctrl.batch().current(), Some("a.txt"));

            ctrl.update(Message::Outcome(OpOutcome::Failed("late".to_string())));
            assert_eq!(ctrl.phase(), Phase::FileManage);
            assert!(ctrl.error_message().is_none());
        }
    }

    mod quit_tests {
        use super::*;

        #[test]
        fn test_quit_from_file_manage() {
            let mut ctrl = controller_with(&["a.txt"], Arc::new(RecordingOps::default()));
            assert!(matches!(
                ctrl.update(Message::Key(Input::Quit)),
                Command::Quit
            ));
            assert_eq!(ctrl.batch().current(), Some("a.txt"));
        }

        #[test]
        fn test_quit_from_processing() {
            let mut ctrl = controller_with(&["a.txt"], Arc::new(RecordingOps::default()));
            ctrl.update(Message::Key(Input::Delete));

            assert!(matches!(
                ctrl.update(Message::Key(Input::Quit)),
                Command::Quit
            ));
            assert_eq!(ctrl.batch().current(), Some("a.txt"));
        }

        #[test]
        fn test_any_key_quits_from_end() {
            let mut ctrl = controller_with(&["a.txt"], Arc::new(RecordingOps::default()));
            ctrl.update(Message::Key(Input::Skip));
            assert_eq!(ctrl.phase(), Phase::End);

            assert!(matches!(
                ctrl.update(Message::Key(Input::Other)),
                Command::Quit
            ));
            assert_eq!(ctrl.batch().progress(), 1);
        }

        #[test]
        fn test_any_key_quits_from_error() {
            let mut ctrl = controller_with(&["a.txt"], Arc::new(RecordingOps::default()));
            ctrl.update(Message::Key(Input::Keep));
            ctrl.update(Message::Outcome(OpOutcome::Failed("boom".to_string())));

            assert!(matches!(
                ctrl.update(Message::Key(Input::Keep)),
                Command::Quit
            ));
            assert_eq!(ctrl.batch().current(), Some("a.txt"));
        }
    }

    mod job_tests {
        use super::*;

        #[test]
        fn test_job_runs_against_backend() {
            let ops = Arc::new(RecordingOps::default());
            let mut ctrl = controller_with(&["a.txt"], Arc::clone(&ops));

            let job = expect_job(ctrl.update(Message::Key(Input::Keep)));
            assert_eq!(job.run(), OpOutcome::Succeeded);

            assert_eq!(ops.calls(), vec![(JobKind::Keep, "a.txt".to_string())]);
        }

        #[test]
        fn test_failed_job_carries_error_text() {
            let ops = Arc::new(RecordingOps::failing("permission denied"));
            let mut ctrl = controller_with(&["a.txt"], Arc::clone(&ops));

            let job = expect_job(ctrl.update(Message::Key(Input::Delete)));
            let outcome = job.run();
            assert_eq!(outcome, OpOutcome::Failed("permission denied".to_string()));

            ctrl.update(Message::Outcome(outcome));
            assert_eq!(ctrl.error_message(), Some("permission denied"));
        }

        #[test]
        fn test_job_debug_omits_backend() {
            let ops = Arc::new(RecordingOps::default());
            let mut ctrl = controller_with(&["a.txt"], ops);

            let job = expect_job(ctrl.update(Message::Key(Input::Keep)));
            let debug = format!("{:?}", job);
            assert!(debug.contains("a.txt"));
            assert!(!debug.contains("RecordingOps"));
        }
    }
}
