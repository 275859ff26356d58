//! Shutdown snapshot lifecycle
//!
//! The controller is a single-fire state machine:
//!
//! ```text
//!   Idle ──signal──▶ Saving ──write finished (ok or err)──▶ Done
//! ```
//!
//! It awaits the caller's cancellation future once, writes one snapshot, and
//! posts the outcome on a one-shot channel. The owning process waits on the
//! [`ShutdownHandle`] before exiting; `wait` consumes the handle, so the
//! outcome can be observed exactly once. There is no retry and no timeout:
//! a failed write is reported and the process exits anyway.
//!
//! ## Usage
//!
//! ```ignore
//! let db = Arc::new(db);
//! let handle = LifecycleController::spawn(db.clone(), "state/db.snap", shutdown_signal());
//!
//! // ... serve requests ...
//!
//! match handle.wait().await {
//!     Ok(outcome) => info!(?outcome, "shutdown complete"),
//!     Err(e) => error!(error = %e, "snapshot lost"),
//! }
//! ```

use crate::error::LifecycleError;
use rowstore_core::Row;
use rowstore_durability::{write_snapshot, SnapshotReport};
use rowstore_storage::Database;
use std::future::Future;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{error, info};

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Waiting for the shutdown signal
    Idle,
    /// Signal received; snapshot write in progress
    Saving,
    /// Outcome posted (terminal)
    Done,
}

impl LifecycleState {
    fn as_u8(self) -> u8 {
        match self {
            LifecycleState::Idle => 0,
            LifecycleState::Saving => 1,
            LifecycleState::Done => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => LifecycleState::Idle,
            1 => LifecycleState::Saving,
            _ => LifecycleState::Done,
        }
    }
}

#[derive(Debug)]
struct StateCell(AtomicU8);

impl StateCell {
    fn new() -> Self {
        StateCell(AtomicU8::new(LifecycleState::Idle.as_u8()))
    }

    fn get(&self) -> LifecycleState {
        LifecycleState::from_u8(self.0.load(Ordering::Acquire))
    }

    fn set(&self, state: LifecycleState) {
        self.0.store(state.as_u8(), Ordering::Release);
    }
}

/// What the controller did once the signal fired
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// A snapshot was written
    Saved(SnapshotReport),
    /// Persistence is disabled; nothing was written
    Skipped,
}

/// Outcome posted by the controller
pub type ShutdownResult = Result<ShutdownOutcome, LifecycleError>;

/// Owner's side of a running controller
#[derive(Debug)]
pub struct ShutdownHandle {
    state: Arc<StateCell>,
    completion: oneshot::Receiver<ShutdownResult>,
}

impl ShutdownHandle {
    /// Current controller state
    pub fn state(&self) -> LifecycleState {
        self.state.get()
    }

    /// Check if the outcome has been posted
    pub fn is_done(&self) -> bool {
        self.state() == LifecycleState::Done
    }

    /// Wait for the shutdown snapshot to finish.
    ///
    /// Resolves only after the signal has fired and the write (successful or
    /// not) has completed.
    pub async fn wait(self) -> ShutdownResult {
        self.completion.await.unwrap_or(Err(LifecycleError::Abandoned))
    }

    /// Blocking variant of [`wait`](Self::wait) for synchronous shutdown paths.
    ///
    /// # Panics
    ///
    /// Panics if called from within an async runtime thread.
    pub fn wait_blocking(self) -> ShutdownResult {
        self.completion
            .blocking_recv()
            .unwrap_or(Err(LifecycleError::Abandoned))
    }
}

/// Spawns the task that snapshots a database on shutdown
pub struct LifecycleController;

impl LifecycleController {
    /// Snapshot `db` to `path` once `signal` resolves.
    ///
    /// # Panics
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<R, F>(
        db: Arc<Database<R>>,
        path: impl Into<PathBuf>,
        signal: F,
    ) -> ShutdownHandle
    where
        R: Row,
        F: Future<Output = ()> + Send + 'static,
    {
        Self::spawn_inner(Some((db, path.into())), signal)
    }

    /// Follow the lifecycle without persisting anything.
    ///
    /// The handle still moves through every state, so ephemeral and
    /// persistent stores shut down the same way.
    pub fn spawn_disabled<F>(signal: F) -> ShutdownHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self::spawn_inner::<(), F>(None, signal)
    }

    fn spawn_inner<R, F>(job: Option<(Arc<Database<R>>, PathBuf)>, signal: F) -> ShutdownHandle
    where
        R: Row,
        F: Future<Output = ()> + Send + 'static,
    {
        let state = Arc::new(StateCell::new());
        let (tx, rx) = oneshot::channel();
        let task_state = Arc::clone(&state);

        tokio::spawn(async move {
            signal.await;
            task_state.set(LifecycleState::Saving);
            info!("shutdown signal received");

            let outcome = match job {
                None => Ok(ShutdownOutcome::Skipped),
                Some((db, path)) => {
                    match tokio::task::spawn_blocking(move || write_snapshot(&db, &path)).await {
                        Ok(Ok(report)) => Ok(ShutdownOutcome::Saved(report)),
                        Ok(Err(e)) => Err(LifecycleError::Snapshot(e)),
                        Err(e) => Err(LifecycleError::Task(e.to_string())),
                    }
                }
            };

            match &outcome {
                Ok(ShutdownOutcome::Saved(report)) => info!(
                    path = %report.path.display(),
                    rows = report.rows,
                    "shutdown snapshot complete"
                ),
                Ok(ShutdownOutcome::Skipped) => info!("persistence disabled, no snapshot written"),
                Err(e) => error!(error = %e, "shutdown snapshot failed"),
            }

            task_state.set(LifecycleState::Done);
            // The owner may have stopped listening; the outcome is already logged
            let _ = tx.send(outcome);
        });

        ShutdownHandle {
            state,
            completion: rx,
        }
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
///
/// If a listener cannot be installed, that source never fires.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    #[cfg(not(unix))]
    ctrl_c.await;
}
