use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use indexmap::IndexSet;
use notify::{Listener, Notifier};
use parking_lot::{Mutex, RwLock};
use pnp::board::BoardHandle;
use thiserror::Error;
use tracing::{debug, info};

use crate::board_location::{BoardLocationEvent, BoardLocationHandle, BoardLocationId};
use crate::placement::{JobPlacement, JobPlacementHandle, JobPlacementKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    BoardLocationAdded(BoardLocationId),
    BoardLocationRemoved(BoardLocationId),
    /// Forwarded from an observed board location.
    BoardLocation(BoardLocationEvent),
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Board location already present. location: '{0}'")]
    DuplicateBoardLocation(BoardLocationId),

    #[error("Unknown board location. location: '{0}'")]
    UnknownBoardLocation(BoardLocationId),

    #[error("Duplicate placement id on board. board: '{board}', placement: '{placement}'")]
    DuplicatePlacement {
        board: String,
        placement: JobPlacementKey,
    },

    #[error("Ordinal out of bounds. ordinal: {ordinal}, count: {count}")]
    OrdinalOutOfBounds { ordinal: usize, count: usize },

    #[error("Job placement is not part of this job. placement: '{0}'")]
    UnknownJobPlacement(JobPlacementKey),
}

/// Orchestrates the work list: an ordered list of board locations and the
/// derived, explicitly ordered list of job placements.
///
/// The job placement list is reconciled against current board state on every
/// read, so consumers always see one job placement per (board location,
/// placement) pair that currently exists, in a user-adjustable order.
pub struct Job {
    board_locations: RwLock<Vec<BoardLocationHandle>>,
    /// Ordering is user-significant; reconciliation and ordinal moves both
    /// require exclusive access for their full duration.
    job_placements: Mutex<Vec<JobPlacementHandle>>,
    dirty: AtomicBool,
    notifier: Notifier<JobEvent>,
}

pub type JobHandle = Arc<Job>;

impl Job {
    pub fn new() -> JobHandle {
        Arc::new(Self {
            board_locations: RwLock::new(Vec::new()),
            job_placements: Mutex::new(Vec::new()),
            dirty: AtomicBool::new(false),
            notifier: Notifier::new(),
        })
    }

    pub fn board_locations(&self) -> Vec<BoardLocationHandle> {
        self.board_locations.read().clone()
    }

    pub fn add_board_location(self: &Arc<Self>, board_location: BoardLocationHandle) -> Result<(), JobError> {
        {
            let mut board_locations = self.board_locations.write();
            if board_locations
                .iter()
                .any(|existing| existing.id() == board_location.id())
            {
                return Err(JobError::DuplicateBoardLocation(board_location.id()));
            }
            board_locations.push(board_location.clone());
        }
        board_location
            .notifier()
            .subscribe(Arc::downgrade(self) as Weak<dyn Listener<BoardLocationEvent>>);

        info!(
            "Board location added. location: '{}', board: '{}'",
            board_location.id(),
            board_location.board().name()
        );
        self.dirty.store(true, Ordering::SeqCst);
        self.notifier
            .notify(&JobEvent::BoardLocationAdded(board_location.id()));
        Ok(())
    }

    pub fn remove_board_location(self: &Arc<Self>, board_location: &BoardLocationHandle) -> Result<(), JobError> {
        {
            let mut board_locations = self.board_locations.write();
            let index = board_locations
                .iter()
                .position(|existing| existing.id() == board_location.id())
                .ok_or_else(|| JobError::UnknownBoardLocation(board_location.id()))?;
            board_locations.remove(index);
        }
        board_location
            .notifier()
            .unsubscribe(&(Arc::downgrade(self) as Weak<dyn Listener<BoardLocationEvent>>));

        info!("Board location removed. location: '{}'", board_location.id());
        self.dirty.store(true, Ordering::SeqCst);
        self.notifier
            .notify(&JobEvent::BoardLocationRemoved(board_location.id()));
        Ok(())
    }

    /// Modified since the last save, including changes observed from boards
    /// and board locations.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Called by the persistence collaborator after a successful save.
    pub fn mark_clean(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }

    /// The reconciled work list, in execution order.
    ///
    /// Reconciliation runs on every read: board mutation is observed
    /// asynchronously relative to reads, so only a read of current board
    /// state can produce a correct list.
    pub fn job_placements(&self) -> Result<Vec<JobPlacementHandle>, JobError> {
        let mut job_placements = self.job_placements.lock();
        self.reconcile(&mut job_placements)?;
        Ok(job_placements.clone())
    }

    /// Reconciles the stored list against the current (board location,
    /// placement) pairs. Returns whether the list changed.
    ///
    /// Surviving entries keep their instance, position, and job-scoped
    /// state; new pairs are appended in board-location then board-authoring
    /// order; pairs that no longer exist are dropped. Idempotent: a second
    /// call without intervening board mutation changes nothing.
    fn reconcile(&self, job_placements: &mut Vec<JobPlacementHandle>) -> Result<bool, JobError> {
        let board_locations = self.board_locations.read().clone();

        // master: every pair currently reachable, in order
        let mut master_keys: IndexSet<JobPlacementKey> = IndexSet::new();
        let mut master: Vec<(JobPlacementKey, BoardLocationHandle, BoardHandle)> = Vec::new();
        for board_location in board_locations {
            let board = board_location.board();
            for placement in board.placements() {
                let key = JobPlacementKey {
                    board_location: board_location.id(),
                    placement: placement.id,
                };
                if !master_keys.insert(key.clone()) {
                    // data-integrity condition, surfaced rather than absorbed
                    return Err(JobError::DuplicatePlacement {
                        board: board.name(),
                        placement: key,
                    });
                }
                master.push((key, board_location.clone(), board.clone()));
            }
        }

        // drop entries whose pair no longer exists
        let count_before = job_placements.len();
        job_placements.retain(|job_placement| {
            let retain = master_keys.contains(&job_placement.key());
            if !retain {
                info!("Removing job placement. placement: '{}'", job_placement.key());
            }
            retain
        });
        let mut modified = job_placements.len() != count_before;

        // append pairs not present yet; existing entries are kept as-is so
        // their status/enabled/error-option survive
        let existing_keys: IndexSet<JobPlacementKey> = job_placements
            .iter()
            .map(|job_placement| job_placement.key())
            .collect();
        for (key, board_location, board) in master {
            if !existing_keys.contains(&key) {
                info!("New job placement. placement: '{}'", key);
                job_placements.push(JobPlacement::new(board_location, board, key.placement));
                modified = true;
            }
        }

        if modified {
            debug!("Job placements reconciled. count: {}", job_placements.len());
            self.dirty.store(true, Ordering::SeqCst);
        }

        Ok(modified)
    }

    /// Current index of the placement within the stored work list.
    ///
    /// Ordinal is a view, not a stored attribute; it changes implicitly
    /// whenever placements are added or removed earlier in the list.
    pub fn ordinal_of(&self, job_placement: &JobPlacementHandle) -> Option<usize> {
        self.job_placements
            .lock()
            .iter()
            .position(|candidate| Arc::ptr_eq(candidate, job_placement))
    }

    /// Moves the placement to `ordinal` within the stored list.
    ///
    /// This is the only reordering operation; board authoring order decides
    /// where *appended* entries land, never where existing ones move.
    pub fn set_ordinal(&self, job_placement: &JobPlacementHandle, ordinal: usize) -> Result<(), JobError> {
        let mut job_placements = self.job_placements.lock();
        let index = job_placements
            .iter()
            .position(|candidate| Arc::ptr_eq(candidate, job_placement))
            .ok_or_else(|| JobError::UnknownJobPlacement(job_placement.key()))?;
        if ordinal >= job_placements.len() {
            return Err(JobError::OrdinalOutOfBounds {
                ordinal,
                count: job_placements.len(),
            });
        }
        let moved = job_placements.remove(index);
        job_placements.insert(ordinal, moved);

        debug!(
            "Job placement moved. placement: '{}', ordinal: {}",
            job_placement.key(),
            ordinal
        );
        self.dirty.store(true, Ordering::SeqCst);
        Ok(())
    }

    pub fn notifier(&self) -> &Notifier<JobEvent> {
        &self.notifier
    }
}

impl Listener<BoardLocationEvent> for Job {
    /// Marks the job modified; never touches the placement list, so change
    /// notification cannot re-enter reconciliation.
    fn notify(&self, event: &BoardLocationEvent) {
        self.dirty.store(true, Ordering::SeqCst);
        self.notifier
            .notify(&JobEvent::BoardLocation(event.clone()));
    }
}
