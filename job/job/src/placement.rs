use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::Mutex;
use pnp::board::BoardHandle;
use pnp::placement::{Placement, PlacementId};
use thiserror::Error;

use crate::board_location::{BoardLocationHandle, BoardLocationId};

/// Reconciliation identity of a job placement.
///
/// One job placement exists per (board location, placement) pair; the job
/// and board are invariant for a given pair and do not participate in the
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobPlacementKey {
    pub board_location: BoardLocationId,
    pub placement: PlacementId,
}

impl Display for JobPlacementKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "location={}::placement={}", self.board_location, self.placement)
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Status {
    /// Disabled for the job run, will not be processed.
    Disabled,
    /// Enabled, not yet processed.
    Pending,
    /// Currently being worked on.
    Processing,
    /// Processing failed, error is retained until the user intervenes.
    Error,
    /// Finished.
    Done,
}

impl Default for Status {
    fn default() -> Self {
        Self::Pending
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Disabled => f.write_str("Disabled"),
            Status::Pending => f.write_str("Pending"),
            Status::Processing => f.write_str("Processing"),
            Status::Error => f.write_str("Error"),
            Status::Done => f.write_str("Done"),
        }
    }
}

/// What a run does when a placement's physical execution fails.
#[derive(Debug, serde::Serialize, serde::Deserialize, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorOption {
    /// Halt on this placement; the placement transitions to `Error`.
    Raise,
    /// Record the failure and continue; the placement transitions to `Done`.
    Skip,
}

impl Default for ErrorOption {
    fn default() -> Self {
        Self::Raise
    }
}

impl Display for ErrorOption {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorOption::Raise => f.write_str("Raise"),
            ErrorOption::Skip => f.write_str("Skip"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StatusError {
    #[error("Invalid status transition. from: '{from}', action: '{action}'")]
    InvalidTransition { from: Status, action: &'static str },
}

struct JobState {
    status: Status,
    enabled: bool,
    error_option: ErrorOption,
}

/// One unit of work: a placement realized at a specific board location,
/// carrying job-scoped execution state.
///
/// Never constructed directly by consumers; always derived by the owning
/// job's reconciliation. The placement definition itself is read live from
/// the board, so edits made through the board are always visible here.
pub struct JobPlacement {
    board_location: BoardLocationHandle,
    board: BoardHandle,
    placement_id: PlacementId,
    state: Mutex<JobState>,
}

pub type JobPlacementHandle = Arc<JobPlacement>;

impl JobPlacement {
    pub(crate) fn new(
        board_location: BoardLocationHandle,
        board: BoardHandle,
        placement_id: PlacementId,
    ) -> JobPlacementHandle {
        Arc::new(Self {
            board_location,
            board,
            placement_id,
            state: Mutex::new(JobState {
                status: Status::default(),
                enabled: true,
                error_option: ErrorOption::default(),
            }),
        })
    }

    pub fn key(&self) -> JobPlacementKey {
        JobPlacementKey {
            board_location: self.board_location.id(),
            placement: self.placement_id.clone(),
        }
    }

    pub fn board_location(&self) -> &BoardLocationHandle {
        &self.board_location
    }

    pub fn board(&self) -> &BoardHandle {
        &self.board
    }

    pub fn placement_id(&self) -> &PlacementId {
        &self.placement_id
    }

    /// Current placement definition, read live from the board.
    ///
    /// `None` when the backing placement has been removed since the list
    /// this instance belongs to was last reconciled.
    pub fn placement(&self) -> Option<Placement> {
        self.board.placement(&self.placement_id)
    }

    pub fn status(&self) -> Status {
        self.state.lock().status
    }

    pub fn enabled(&self) -> bool {
        self.state.lock().enabled
    }

    /// Disabling forces the status to `Disabled` from any state; re-enabling
    /// a disabled placement returns it to `Pending`.
    pub fn set_enabled(&self, enabled: bool) {
        let mut state = self.state.lock();
        state.enabled = enabled;
        match (enabled, state.status) {
            (false, _) => state.status = Status::Disabled,
            (true, Status::Disabled) => state.status = Status::Pending,
            (true, _) => {}
        }
    }

    pub fn error_option(&self) -> ErrorOption {
        self.state.lock().error_option
    }

    pub fn set_error_option(&self, error_option: ErrorOption) {
        self.state.lock().error_option = error_option;
    }

    /// Pending → Processing, when the run starts working on this placement.
    pub fn begin(&self) -> Result<(), StatusError> {
        self.transition(Status::Pending, Status::Processing, "begin")
    }

    /// Processing → Done.
    pub fn complete(&self) -> Result<(), StatusError> {
        self.transition(Status::Processing, Status::Done, "complete")
    }

    /// Processing → Error or Done, depending on the error option. Returns
    /// the resulting status. Failures are never retried automatically.
    pub fn fail(&self) -> Result<Status, StatusError> {
        let mut state = self.state.lock();
        if state.status != Status::Processing {
            return Err(StatusError::InvalidTransition {
                from: state.status,
                action: "fail",
            });
        }
        state.status = match state.error_option {
            ErrorOption::Raise => Status::Error,
            ErrorOption::Skip => Status::Done,
        };
        Ok(state.status)
    }

    /// Error → Processing, user-triggered.
    pub fn retry(&self) -> Result<(), StatusError> {
        self.transition(Status::Error, Status::Processing, "retry")
    }

    /// Error → Done, user-triggered.
    pub fn skip(&self) -> Result<(), StatusError> {
        self.transition(Status::Error, Status::Done, "skip")
    }

    /// Back to Pending for a fresh run.
    pub fn reset(&self) -> Result<(), StatusError> {
        let mut state = self.state.lock();
        match state.status {
            Status::Disabled | Status::Processing => Err(StatusError::InvalidTransition {
                from: state.status,
                action: "reset",
            }),
            _ => {
                state.status = Status::Pending;
                Ok(())
            }
        }
    }

    fn transition(&self, from: Status, to: Status, action: &'static str) -> Result<(), StatusError> {
        let mut state = self.state.lock();
        if state.status != from {
            return Err(StatusError::InvalidTransition {
                from: state.status,
                action,
            });
        }
        state.status = to;
        Ok(())
    }
}

impl PartialEq for JobPlacement {
    fn eq(&self, other: &Self) -> bool {
        self.board_location.id() == other.board_location.id() && self.placement_id == other.placement_id
    }
}

impl Eq for JobPlacement {}

impl Hash for JobPlacement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.board_location.id().hash(state);
        self.placement_id.hash(state);
    }
}
