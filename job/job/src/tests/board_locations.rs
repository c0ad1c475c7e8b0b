use pnp::board::Board;
use pnp::location::{Location, Side};
use pnp::placement::{Placement, PlacementType};
use rust_decimal_macros::dec;

use crate::board_location::BoardLocation;
use crate::job::Job;

#[test]
fn effective_location_prefers_fiducial_overrides() {
    // given
    let board = Board::new("board a".to_string());
    let board_location = BoardLocation::new(board);
    let authored = Location::new(dec!(10), dec!(20), dec!(0));
    board_location.set_location(authored);

    // then - no override yet
    assert_eq!(board_location.effective_location(), authored);

    // when - a fiducial check succeeds
    let corrected = Location::new(dec!(10.12), dec!(19.97), dec!(0.3));
    board_location.set_fiducial_overrides(corrected);

    // then
    assert_eq!(board_location.effective_location(), corrected);

    // when - the check is invalidated
    board_location.clear_fiducial_overrides();

    // then
    assert_eq!(board_location.effective_location(), authored);
}

#[test]
fn placed_state_is_scoped_per_instance() {
    // given - two locations sharing one board
    let board = Board::new("board a".to_string());
    board
        .add_placement(Placement::new("R1".into()))
        .expect("should add placement");
    let first = BoardLocation::new(board.clone());
    let second = BoardLocation::new(board);

    // when
    first.set_placed("R1".into(), true);

    // then
    assert!(first.placed(&"R1".into()));
    assert!(!second.placed(&"R1".into()));
}

#[test]
fn absent_and_stale_placed_ids_read_as_not_placed() {
    // given
    let board = Board::new("board a".to_string());
    board
        .add_placement(Placement::new("R1".into()))
        .expect("should add placement");
    let board_location = BoardLocation::new(board.clone());
    board_location.set_placed("R1".into(), true);

    // when - the backing placement disappears
    board
        .remove_placement(&"R1".into())
        .expect("should remove placement");

    // then - the stale entry is harmless, an unknown id reads false
    assert!(board_location.placed(&"R1".into()));
    assert!(!board_location.placed(&"R99".into()));
    assert_eq!(board_location.active_placements(), 0);
}

#[test]
fn clear_all_placed_resets_every_mark() {
    // given
    let board = Board::new("board a".to_string());
    board
        .add_placement(Placement::new("R1".into()))
        .expect("should add placement");
    board
        .add_placement(Placement::new("R2".into()))
        .expect("should add placement");
    let board_location = BoardLocation::new(board);
    board_location.set_placed("R1".into(), true);
    board_location.set_placed("R2".into(), true);
    assert_eq!(board_location.active_placements(), 0);

    // when
    board_location.clear_all_placed();

    // then
    assert_eq!(board_location.active_placements(), 2);
}

#[test]
fn active_placement_counts_filter_by_side_type_and_placed_state() {
    // given - a board with a bottom placement, a fiducial, and two top parts
    let board = Board::new("board a".to_string());
    board
        .add_placement(Placement::new("R1".into()))
        .expect("should add placement");
    board
        .add_placement(Placement::new("R2".into()))
        .expect("should add placement");
    board
        .add_placement(Placement::new("R3".into()).with_side(Side::Bottom))
        .expect("should add placement");
    board
        .add_placement(Placement::new("FID1".into()).with_type(PlacementType::Fiducial))
        .expect("should add placement");
    let board_location = BoardLocation::new(board);

    // then - only top-side Place placements count
    assert_eq!(board_location.total_active_placements(), 2);
    assert_eq!(board_location.active_placements(), 2);

    // when - one of them is executed
    board_location.set_placed("R1".into(), true);

    // then - the total is unaffected, the remaining count drops
    assert_eq!(board_location.total_active_placements(), 2);
    assert_eq!(board_location.active_placements(), 1);

    // when - the instance is flipped to the bottom side
    board_location.set_side(Side::Bottom);

    // then
    assert_eq!(board_location.total_active_placements(), 1);
}

#[test]
fn replacing_the_board_moves_the_subscription() {
    // given
    let old_board = Board::new("old board".to_string());
    let new_board = Board::new("new board".to_string());
    let board_location = BoardLocation::new(old_board.clone());
    let job = Job::new();
    job.add_board_location(board_location.clone())
        .expect("should add board location");
    let _ = job.job_placements().expect("should reconcile");
    job.mark_clean();

    // when
    board_location.set_board(new_board.clone());
    job.mark_clean();

    // and - the old board changes
    old_board
        .add_placement(Placement::new("R1".into()))
        .expect("should add placement");

    // then - the old board no longer reaches this location's observers
    assert!(!job.is_dirty());

    // when - the new board changes
    new_board
        .add_placement(Placement::new("C1".into()))
        .expect("should add placement");

    // then
    assert!(job.is_dirty());
    let job_placements = job.job_placements().expect("should reconcile");
    assert_eq!(job_placements.len(), 1);
    assert_eq!(job_placements[0].placement_id().to_string(), "C1");
}
