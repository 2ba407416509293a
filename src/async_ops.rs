// Background execution of keep/delete jobs for the synchronous TUI loop

use crate::controller::{Job, OpOutcome};
use std::io;
use tokio::sync::oneshot;
use tracing::{debug, error};

/// Runs one filesystem job at a time off the UI thread.
///
/// The UI loop dispatches a job and then polls without blocking; the single
/// outcome is handed back exactly once.
pub struct OperationRunner {
    runtime: tokio::runtime::Runtime,
    /// Receiver for the job currently in flight
    pending: Option<oneshot::Receiver<OpOutcome>>,
}

impl OperationRunner {
    pub fn new() -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("filer-ops")
            .enable_all()
            .build()?;

        Ok(Self {
            runtime,
            pending: None,
        })
    }

    /// Starts `job` in the background.
    ///
    /// A job dispatched while another is pending replaces its receiver; the
    /// earlier outcome is then dropped.
    pub fn dispatch(&mut self, job: Job) {
        let (tx, rx) = oneshot::channel();
        debug!(kind = ?job.kind, file = %job.filename, "running job");

        self.runtime.spawn(async move {
            let outcome = match tokio::task::spawn_blocking(move || job.run()).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(error = %e, "job panicked");
                    OpOutcome::Failed(format!("Operation panicked: {}", e))
                }
            };
            let _ = tx.send(outcome);
        });

        self.pending = Some(rx);
    }

    /// Returns the outcome once it is ready (non-blocking)
    pub fn poll(&mut self) -> Option<OpOutcome> {
        let rx = self.pending.as_mut()?;

        match rx.try_recv() {
            Ok(outcome) => {
                self.pending = None;
                Some(outcome)
            }
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.pending = None;
                Some(OpOutcome::Failed("Operation channel closed".to_string()))
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }
}
