use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Weak};

use notify::{Listener, Notifier};
use parking_lot::RwLock;
use pnp::board::{BoardEvent, BoardHandle};
use pnp::location::{Location, Side};
use pnp::placement::{PlacementId, PlacementType};
use uuid::Uuid;

/// Stable identity of one physical board instance on the machine bed.
///
/// Two board locations sharing the same board still have distinct ids; the
/// id is what keys per-instance state such as the placed map and the job
/// placement identity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoardLocationId(Uuid);

impl BoardLocationId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for BoardLocationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardLocationEvent {
    /// Forwarded from the observed board.
    Board(BoardEvent),
    BoardReplaced,
    LocationChanged,
    FiducialOverridesChanged,
    SideChanged,
    PanelIdChanged,
    EnabledChanged,
    CheckFiducialsChanged,
    /// Carries the new value only; at map granularity there is no
    /// meaningful old value.
    PlacedChanged {
        placement: PlacementId,
        placed: bool,
    },
    PlacedCleared,
}

struct State {
    board: BoardHandle,
    location: Location,
    fiducial_overrides: Option<Location>,
    side: Side,
    panel_id: String,
    enabled: bool,
    check_fiducials: bool,
    placed: BTreeMap<PlacementId, bool>,
}

/// One physical instance of a board placed on the machine bed.
///
/// Observes its board and forwards change events to its own observers, so a
/// job only ever subscribes to its board locations.
pub struct BoardLocation {
    id: BoardLocationId,
    state: RwLock<State>,
    notifier: Notifier<BoardLocationEvent>,
}

pub type BoardLocationHandle = Arc<BoardLocation>;

impl BoardLocation {
    pub fn new(board: BoardHandle) -> BoardLocationHandle {
        let board_location = Arc::new(Self {
            id: BoardLocationId::new(),
            state: RwLock::new(State {
                board: board.clone(),
                location: Location::default(),
                fiducial_overrides: None,
                side: Side::Top,
                panel_id: "Panel1".to_string(),
                enabled: true,
                check_fiducials: false,
                placed: BTreeMap::new(),
            }),
            notifier: Notifier::new(),
        });
        board
            .notifier()
            .subscribe(Arc::downgrade(&board_location) as Weak<dyn Listener<BoardEvent>>);
        board_location
    }

    pub fn id(&self) -> BoardLocationId {
        self.id
    }

    pub fn board(&self) -> BoardHandle {
        self.state.read().board.clone()
    }

    /// Replaces the board this location references.
    ///
    /// The subscription moves with it: the old board no longer notifies this
    /// location.
    pub fn set_board(self: &Arc<Self>, board: BoardHandle) {
        let listener = Arc::downgrade(self) as Weak<dyn Listener<BoardEvent>>;
        let old_board = {
            let mut state = self.state.write();
            std::mem::replace(&mut state.board, board.clone())
        };
        old_board.notifier().unsubscribe(&listener);
        board.notifier().subscribe(listener);
        self.notifier
            .notify(&BoardLocationEvent::BoardReplaced);
    }

    pub fn location(&self) -> Location {
        self.state.read().location
    }

    pub fn set_location(&self, location: Location) {
        self.state.write().location = location;
        self.notifier
            .notify(&BoardLocationEvent::LocationChanged);
    }

    pub fn fiducial_overrides(&self) -> Option<Location> {
        self.state.read().fiducial_overrides
    }

    /// Set after a successful fiducial check; cleared when the check is
    /// invalidated.
    pub fn set_fiducial_overrides(&self, location: Location) {
        self.state.write().fiducial_overrides = Some(location);
        self.notifier
            .notify(&BoardLocationEvent::FiducialOverridesChanged);
    }

    pub fn clear_fiducial_overrides(&self) {
        self.state.write().fiducial_overrides = None;
        self.notifier
            .notify(&BoardLocationEvent::FiducialOverridesChanged);
    }

    /// The location to use for machine motion: the fiducial-corrected
    /// location when present, the authored location otherwise.
    pub fn effective_location(&self) -> Location {
        let state = self.state.read();
        state
            .fiducial_overrides
            .unwrap_or(state.location)
    }

    pub fn side(&self) -> Side {
        self.state.read().side
    }

    pub fn set_side(&self, side: Side) {
        self.state.write().side = side;
        self.notifier
            .notify(&BoardLocationEvent::SideChanged);
    }

    pub fn panel_id(&self) -> String {
        self.state.read().panel_id.clone()
    }

    pub fn set_panel_id(&self, panel_id: String) {
        self.state.write().panel_id = panel_id;
        self.notifier
            .notify(&BoardLocationEvent::PanelIdChanged);
    }

    pub fn enabled(&self) -> bool {
        self.state.read().enabled
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.state.write().enabled = enabled;
        self.notifier
            .notify(&BoardLocationEvent::EnabledChanged);
    }

    pub fn check_fiducials(&self) -> bool {
        self.state.read().check_fiducials
    }

    pub fn set_check_fiducials(&self, check_fiducials: bool) {
        self.state.write().check_fiducials = check_fiducials;
        self.notifier
            .notify(&BoardLocationEvent::CheckFiducialsChanged);
    }

    /// Whether the placement has already been executed on this instance.
    ///
    /// Ids that are absent from the map, including ids no longer present on
    /// the board, read as not placed.
    pub fn placed(&self, id: &PlacementId) -> bool {
        self.state
            .read()
            .placed
            .get(id)
            .copied()
            .unwrap_or(false)
    }

    pub fn set_placed(&self, id: PlacementId, placed: bool) {
        self.state
            .write()
            .placed
            .insert(id.clone(), placed);
        self.notifier
            .notify(&BoardLocationEvent::PlacedChanged {
                placement: id,
                placed,
            });
    }

    pub fn clear_all_placed(&self) {
        self.state.write().placed.clear();
        self.notifier
            .notify(&BoardLocationEvent::PlacedCleared);
    }

    /// Placements on this instance's side with `Place` intent that are not
    /// yet marked placed.
    ///
    /// Recomputed from current board state on every call; the board can
    /// mutate at any time, so the result must never be cached.
    pub fn active_placements(&self) -> usize {
        let state = self.state.read();
        state
            .board
            .placements()
            .iter()
            .filter(|placement| {
                placement.side == state.side
                    && placement.placement_type == PlacementType::Place
                    && !state
                        .placed
                        .get(&placement.id)
                        .copied()
                        .unwrap_or(false)
            })
            .count()
    }

    /// Same as [`BoardLocation::active_placements`], regardless of
    /// placed-state.
    pub fn total_active_placements(&self) -> usize {
        let state = self.state.read();
        state
            .board
            .placements()
            .iter()
            .filter(|placement| {
                placement.side == state.side && placement.placement_type == PlacementType::Place
            })
            .count()
    }

    pub fn notifier(&self) -> &Notifier<BoardLocationEvent> {
        &self.notifier
    }
}

impl Listener<BoardEvent> for BoardLocation {
    fn notify(&self, event: &BoardEvent) {
        self.notifier
            .notify(&BoardLocationEvent::Board(event.clone()));
    }
}
