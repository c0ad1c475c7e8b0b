use std::sync::Arc;

use notify::Notifier;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::debug;

use crate::placement::{Placement, PlacementId};

/// Fired after the corresponding mutation has been applied. Observers that
/// read the board back see the post-mutation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    PlacementAdded(PlacementId),
    PlacementRemoved(PlacementId),
    PlacementChanged(PlacementId),
    NameChanged,
}

/// Authored template of component placements, independent of machine
/// position.
///
/// A board is shared; multiple board locations may reference the same board
/// (panelized boards) and each holds a [`BoardHandle`], never a copy.
/// Placement mutations are atomic with respect to readers: a concurrent
/// reader observes either the full pre- or full post-state of a mutation.
///
/// Placement order is authoring order, not execution order.
pub struct Board {
    name: RwLock<String>,
    placements: RwLock<Vec<Placement>>,
    notifier: Notifier<BoardEvent>,
}

pub type BoardHandle = Arc<Board>;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Duplicate placement id. id: '{0}'")]
    DuplicatePlacementId(PlacementId),

    #[error("Unknown placement id. id: '{0}'")]
    UnknownPlacement(PlacementId),
}

impl Board {
    pub fn new(name: String) -> BoardHandle {
        Arc::new(Self {
            name: RwLock::new(name),
            placements: RwLock::new(Vec::new()),
            notifier: Notifier::new(),
        })
    }

    pub fn name(&self) -> String {
        self.name.read().clone()
    }

    pub fn set_name(&self, name: String) {
        *self.name.write() = name;
        self.notifier.notify(&BoardEvent::NameChanged);
    }

    /// Snapshot of the current placements, in authoring order.
    pub fn placements(&self) -> Vec<Placement> {
        self.placements.read().clone()
    }

    pub fn placement(&self, id: &PlacementId) -> Option<Placement> {
        self.placements
            .read()
            .iter()
            .find(|placement| placement.id.eq(id))
            .cloned()
    }

    /// Appends a placement. Ids must be unique within the board.
    pub fn add_placement(&self, placement: Placement) -> Result<(), BoardError> {
        let id = placement.id.clone();
        {
            let mut placements = self.placements.write();
            if placements
                .iter()
                .any(|existing| existing.id.eq(&id))
            {
                return Err(BoardError::DuplicatePlacementId(id));
            }
            placements.push(placement);
        }
        debug!("Placement added. board: '{}', placement: '{}'", self.name(), id);
        self.notifier
            .notify(&BoardEvent::PlacementAdded(id));
        Ok(())
    }

    pub fn remove_placement(&self, id: &PlacementId) -> Result<Placement, BoardError> {
        let removed = {
            let mut placements = self.placements.write();
            let index = placements
                .iter()
                .position(|placement| placement.id.eq(id))
                .ok_or_else(|| BoardError::UnknownPlacement(id.clone()))?;
            placements.remove(index)
        };
        debug!("Placement removed. board: '{}', placement: '{}'", self.name(), id);
        self.notifier
            .notify(&BoardEvent::PlacementRemoved(id.clone()));
        Ok(removed)
    }

    /// Replaces the stored placement that has the same id.
    pub fn update_placement(&self, placement: Placement) -> Result<(), BoardError> {
        let id = placement.id.clone();
        {
            let mut placements = self.placements.write();
            let existing = placements
                .iter_mut()
                .find(|existing| existing.id.eq(&id))
                .ok_or_else(|| BoardError::UnknownPlacement(id.clone()))?;
            *existing = placement;
        }
        debug!("Placement updated. board: '{}', placement: '{}'", self.name(), id);
        self.notifier
            .notify(&BoardEvent::PlacementChanged(id));
        Ok(())
    }

    pub fn notifier(&self) -> &Notifier<BoardEvent> {
        &self.notifier
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Weak};

    use notify::Listener;

    use crate::board::{Board, BoardError, BoardEvent};
    use crate::placement::Placement;

    struct RecordingListener {
        events: parking_lot::Mutex<Vec<BoardEvent>>,
        count: AtomicUsize,
    }

    impl RecordingListener {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                events: parking_lot::Mutex::new(Vec::new()),
                count: AtomicUsize::new(0),
            })
        }
    }

    impl Listener<BoardEvent> for RecordingListener {
        fn notify(&self, event: &BoardEvent) {
            self.events.lock().push(event.clone());
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn add_and_remove_placements() {
        // given
        let board = Board::new("test board".to_string());

        // when
        board
            .add_placement(Placement::new("R1".into()))
            .expect("should add");
        board
            .add_placement(Placement::new("R2".into()))
            .expect("should add");

        // then
        assert_eq!(board.placements().len(), 2);

        // when
        let removed = board
            .remove_placement(&"R1".into())
            .expect("should remove");

        // then
        assert_eq!(removed.id, "R1".into());
        assert_eq!(board.placements().len(), 1);
        assert!(board.placement(&"R1".into()).is_none());
    }

    #[test]
    fn duplicate_placement_id_is_rejected() {
        // given
        let board = Board::new("test board".to_string());
        board
            .add_placement(Placement::new("R1".into()))
            .expect("should add");

        // when
        let result = board.add_placement(Placement::new("R1".into()));

        // then
        assert!(matches!(result, Err(BoardError::DuplicatePlacementId(_))));
        assert_eq!(board.placements().len(), 1);
    }

    #[test]
    fn removing_unknown_placement_is_rejected() {
        // given
        let board = Board::new("test board".to_string());

        // when
        let result = board.remove_placement(&"R1".into());

        // then
        assert!(matches!(result, Err(BoardError::UnknownPlacement(_))));
    }

    #[test]
    fn mutations_notify_observers() {
        // given
        let board = Board::new("test board".to_string());
        let listener = RecordingListener::new();
        board
            .notifier()
            .subscribe(Arc::downgrade(&listener) as Weak<dyn Listener<BoardEvent>>);

        // when
        board
            .add_placement(Placement::new("R1".into()))
            .expect("should add");
        board
            .update_placement(Placement {
                glue: true,
                ..Placement::default()
            })
            .expect("should update");
        board
            .remove_placement(&"R1".into())
            .expect("should remove");

        // then
        let events = listener.events.lock();
        assert_eq!(*events, vec![
            BoardEvent::PlacementAdded("R1".into()),
            BoardEvent::PlacementChanged("R1".into()),
            BoardEvent::PlacementRemoved("R1".into()),
        ]);
    }
}
