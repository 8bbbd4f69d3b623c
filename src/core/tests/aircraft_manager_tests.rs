use crate::core::aircraft::EventPath;
use crate::core::aircraft_manager::AircraftManager;
use crate::core::errors::SimError;
use crate::core::output::ResolvedBy;

#[test]
fn test_fleet_cycle_lifecycle() {
    let mut mgr = AircraftManager::new();
    let des_id = mgr.begin_fleet_cycle(4, 0.0, 12.0, 7, EventPath::InitialFleet);
    mgr.close_fleet(des_id, 12.0).unwrap();
    mgr.install_part(des_id, (9, 1), 12.0).unwrap();
    mgr.complete_cycle(des_id).unwrap();

    let log = mgr.drain_log();
    assert_eq!(log.len(), 1);
    let row = &log[0];
    assert_eq!(row.ac_id, 4);
    assert_eq!(row.fleet_part, Some(7));
    assert_eq!(row.fleet_start, Some(0.0));
    assert_eq!(row.fleet_end, Some(12.0));
    assert_eq!(row.fleet_duration, Some(12.0));
    assert_eq!(row.install_part, Some((9, 1)));
    assert_eq!(row.install_start, Some(12.0));
    assert_eq!(row.install_end, Some(12.0));
    assert_eq!(row.micap_start, None);
    assert_eq!(row.event_path, EventPath::InitialFleet);
}

#[test]
fn test_micap_cycle_queues_immediately() {
    let mut mgr = AircraftManager::new();
    let des_id = mgr
        .begin_micap_cycle(2, 0.0, EventPath::InitialMicap)
        .unwrap();
    assert_eq!(mgr.micap_count(), 1);
    assert_eq!(mgr.peek_micap().map(|e| e.des_id), Some(des_id));
    assert_eq!(mgr.get(des_id).and_then(|r| r.micap_start), Some(0.0));
}

#[test]
fn test_backorders_resolve_fifo() {
    let mut mgr = AircraftManager::new();
    let des_a = mgr.begin_fleet_cycle(0, 0.0, 5.0, 0, EventPath::InitialFleet);
    let des_b = mgr.begin_fleet_cycle(1, 0.0, 5.0, 1, EventPath::InitialFleet);
    mgr.close_fleet(des_a, 5.0).unwrap();
    mgr.close_fleet(des_b, 5.0).unwrap();
    mgr.enter_backorder(des_a, 5.0).unwrap();
    mgr.enter_backorder(des_b, 6.0).unwrap();

    assert_eq!(mgr.peek_micap().map(|e| e.ac_id), Some(0));
    let resolved = mgr.resolve_backorder(0, 9.0, ResolvedBy::DepotPart).unwrap();
    assert_eq!(resolved, Some(des_a));
    assert_eq!(mgr.peek_micap().map(|e| e.ac_id), Some(1));

    let record = mgr.get(des_a).unwrap();
    assert_eq!(record.micap_start, Some(5.0));
    assert_eq!(record.micap_end, Some(9.0));
    assert_eq!(record.micap_duration, Some(4.0));
}

#[test]
fn test_duplicate_backorder_surfaces_and_preserves_state() {
    let mut mgr = AircraftManager::new();
    let des_a = mgr.begin_fleet_cycle(3, 0.0, 5.0, 0, EventPath::InitialFleet);
    mgr.close_fleet(des_a, 5.0).unwrap();
    mgr.enter_backorder(des_a, 5.0).unwrap();

    // Same aircraft on a second cycle while still queued.
    let des_b = mgr.begin_fleet_cycle(3, 5.0, 5.0, 1, EventPath::Relaunch);
    assert_eq!(
        mgr.enter_backorder(des_b, 10.0),
        Err(SimError::DuplicateBackorder(3))
    );
    assert_eq!(mgr.micap_count(), 1);
    assert_eq!(mgr.peek_micap().map(|e| e.des_id), Some(des_a));
    // The rejected cycle never records a micap start.
    assert_eq!(mgr.get(des_b).and_then(|r| r.micap_start), None);
}

#[test]
fn test_resolve_unqueued_aircraft_returns_none() {
    let mut mgr = AircraftManager::new();
    assert_eq!(
        mgr.resolve_backorder(5, 1.0, ResolvedBy::NewPart).unwrap(),
        None
    );
    assert!(mgr.drain_micap_history().is_empty());
}

#[test]
fn test_resolution_history_records_source() {
    let mut mgr = AircraftManager::new();
    let des_a = mgr
        .begin_micap_cycle(0, 0.0, EventPath::InitialMicap)
        .unwrap();
    let des_b = mgr
        .begin_micap_cycle(1, 0.0, EventPath::InitialMicap)
        .unwrap();
    mgr.resolve_backorder(0, 3.0, ResolvedBy::InitialSpare)
        .unwrap();
    mgr.resolve_backorder(1, 8.0, ResolvedBy::NewPart).unwrap();

    let history = mgr.drain_micap_history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].des_id, des_a);
    assert_eq!(history[0].resolved_by, ResolvedBy::InitialSpare);
    assert_eq!(history[0].micap_duration, 3.0);
    assert_eq!(history[1].des_id, des_b);
    assert_eq!(history[1].resolved_by, ResolvedBy::NewPart);
    assert_eq!(history[1].micap_duration, 8.0);
}

#[test]
fn test_close_fleet_rejects_time_reversal() {
    let mut mgr = AircraftManager::new();
    let des_id = mgr.begin_fleet_cycle(0, 10.0, 5.0, 0, EventPath::InitialFleet);
    assert!(matches!(
        mgr.close_fleet(des_id, 9.0),
        Err(SimError::NonMonotonicTime { .. })
    ));
}
