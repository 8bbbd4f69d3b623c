use crate::core::config::SimConfig;
use crate::core::engine::{run_replications, SimulationEngine};
use crate::core::errors::ConfigError;
use crate::core::output::{ResolvedBy, RunOutput};
use crate::core::sampling::DurationDist;

fn deterministic_config() -> SimConfig {
    SimConfig {
        n_total_aircraft: 3,
        n_total_parts: 2,
        mission_capable_rate: 1.0,
        fleet_dist: DurationDist::Fixed { value: 10.0 },
        repair_dist: DurationDist::Fixed { value: 5.0 },
        depot_capacity: 1,
        condemn_cycle: 100,
        condemn_fraction: 0.0,
        part_order_lag: 30.0,
        parts_in_depot: 0,
        parts_in_cond_f: 0,
        parts_in_cond_a: 0,
        sim_time: 40.0,
        seed: 1,
    }
}

#[test]
fn test_invalid_config_reports_all_violations() {
    let config = SimConfig {
        n_total_aircraft: 0,
        depot_capacity: 0,
        mission_capable_rate: 1.5,
        ..deterministic_config()
    };
    match SimulationEngine::new(config) {
        Err(ConfigError::Invalid(problems)) => {
            assert!(problems.len() >= 3, "got {:?}", problems);
        }
        Ok(_) => panic!("validation should fail"),
    }
}

#[test]
fn test_allocation_must_sum_to_part_count() {
    let config = SimConfig {
        parts_in_cond_a: 1, // 2 installed + 1 spare > 2 parts
        ..deterministic_config()
    };
    assert!(SimulationEngine::new(config).is_err());
}

/// Three aircraft share two parts through a single repair slot. Every
/// timestamp below is forced by the fixed durations, so the whole run is
/// checkable by hand.
#[test]
fn test_contended_pool_timeline() {
    let engine = SimulationEngine::new(deterministic_config()).unwrap();
    let output = engine.run().unwrap();

    assert_eq!(output.end_time, 40.0);
    assert_eq!(output.events_processed, 9);

    // Both parts complete two full cycles inside the horizon.
    assert_eq!(output.parts.len(), 4);
    let p = &output.parts;
    assert_eq!((p[0].part_id, p[0].cycle), (0, 1));
    assert_eq!(p[0].fleet_start, Some(0.0));
    assert_eq!(p[0].fleet_end, Some(10.0));
    assert_eq!(p[0].condition_f_start, Some(10.0));
    assert_eq!(p[0].condition_f_end, Some(10.0));
    assert_eq!(p[0].depot_start, Some(10.0));
    assert_eq!(p[0].depot_end, Some(15.0));
    assert_eq!(p[0].install_end, Some(15.0));

    // Part 1 waits for the single slot: its repair starts exactly when
    // part 0's ends.
    assert_eq!((p[1].part_id, p[1].cycle), (1, 1));
    assert_eq!(p[1].condition_f_start, Some(10.0));
    assert_eq!(p[1].condition_f_end, Some(15.0));
    assert_eq!(p[1].depot_start, p[0].depot_end);
    assert_eq!(p[1].depot_end, Some(20.0));

    assert_eq!((p[2].part_id, p[2].cycle), (0, 2));
    assert_eq!(p[2].fleet_start, Some(15.0));
    assert_eq!(p[2].depot_start, Some(25.0));
    assert_eq!(p[2].depot_end, Some(30.0));
    assert_eq!((p[3].part_id, p[3].cycle), (1, 2));
    assert_eq!(p[3].depot_start, Some(30.0));
    assert_eq!(p[3].depot_end, Some(35.0));

    // Four aircraft cycles close; the initially grounded aircraft's first
    // cycle has no fleet stage at all.
    assert_eq!(output.aircraft.len(), 4);
    let grounded = &output.aircraft[0];
    assert_eq!(grounded.ac_id, 2);
    assert_eq!(grounded.fleet_start, None);
    assert_eq!(grounded.micap_start, Some(0.0));
    assert_eq!(grounded.micap_end, Some(15.0));
    assert_eq!(grounded.install_end, Some(15.0));
    assert!(output.aircraft[1..].iter().all(|row| row.fleet_end.is_some()));

    // Backorders resolve strictly FIFO.
    let resolutions: Vec<(u32, f64, f64)> = output
        .micap_history
        .iter()
        .map(|r| (r.ac_id, r.micap_start, r.micap_end))
        .collect();
    assert_eq!(
        resolutions,
        vec![
            (2, 0.0, 15.0),
            (0, 10.0, 20.0),
            (1, 10.0, 30.0),
            (2, 25.0, 35.0),
        ]
    );
    assert!(output
        .micap_history
        .iter()
        .all(|r| r.resolved_by == ResolvedBy::DepotPart));

    // Worst contention: all three aircraft grounded at once.
    let peak = output
        .wip_history
        .iter()
        .map(|s| s.aircraft_micap)
        .max()
        .unwrap_or(0);
    assert_eq!(peak, 3);

    assert!(output.warnings.is_empty());
}

/// A part condemned on its first repair; the single aircraft waits out the
/// reorder lead time for the replacement.
#[test]
fn test_condemnation_triggers_reorder() {
    let config = SimConfig {
        n_total_aircraft: 1,
        n_total_parts: 1,
        condemn_cycle: 0,
        part_order_lag: 3.0,
        sim_time: 20.0,
        ..deterministic_config()
    };
    let output = SimulationEngine::new(config).unwrap().run().unwrap();

    assert_eq!(output.parts.len(), 2);
    let condemned = &output.parts[0];
    assert_eq!(condemned.part_id, 0);
    assert!(condemned.condemned);
    assert_eq!(condemned.cycle, 1);
    assert_eq!(condemned.depot_end, Some(15.0));
    assert_eq!(condemned.install_start, None);

    // Replacement arrives lag after condemnation, opens in serviceable
    // stock, and installs immediately.
    let replacement = &output.parts[1];
    assert_eq!(replacement.part_id, 1);
    assert!(!replacement.condemned);
    assert_eq!(replacement.cycle, 0);
    assert_eq!(replacement.fleet_start, None);
    assert_eq!(replacement.condition_a_start, Some(18.0));
    assert_eq!(replacement.install_end, Some(18.0));

    assert_eq!(output.micap_history.len(), 1);
    let resolution = &output.micap_history[0];
    assert_eq!(resolution.micap_start, 10.0);
    assert_eq!(resolution.micap_end, 18.0);
    assert_eq!(resolution.resolved_by, ResolvedBy::NewPart);

    assert_eq!(output.aircraft.len(), 1);
    assert_eq!(output.aircraft[0].fleet_end, Some(10.0));
    assert_eq!(output.aircraft[0].install_end, Some(18.0));
    assert_eq!(output.end_time, 18.0);
}

#[test]
fn test_initial_spares_resolve_grounded_aircraft_at_time_zero() {
    let config = SimConfig {
        n_total_aircraft: 3,
        n_total_parts: 3,
        parts_in_cond_a: 1,
        mission_capable_rate: 2.0 / 3.0,
        ..deterministic_config()
    };
    // 2 installed + 1 spare = 3 parts; aircraft 2 starts grounded but the
    // spare covers it immediately.
    let output = SimulationEngine::new(config).unwrap().run().unwrap();
    let first = &output.micap_history[0];
    assert_eq!(first.ac_id, 2);
    assert_eq!(first.micap_start, 0.0);
    assert_eq!(first.micap_end, 0.0);
    assert_eq!(first.resolved_by, ResolvedBy::InitialSpare);
}

#[test]
fn test_initial_depot_stock_occupies_slots() {
    let config = SimConfig {
        n_total_aircraft: 2,
        n_total_parts: 3,
        parts_in_depot: 1,
        mission_capable_rate: 1.0,
        depot_capacity: 1,
        sim_time: 12.0,
        ..deterministic_config()
    };
    // The seeded depot part repairs over [0, 5] and becomes a spare; both
    // fleet completions at t=10 then contend for it.
    let output = SimulationEngine::new(config).unwrap().run().unwrap();
    let seeded = output
        .parts
        .iter()
        .find(|row| row.part_id == 2)
        .expect("seeded depot part should close its cycle");
    assert_eq!(seeded.depot_start, Some(0.0));
    assert_eq!(seeded.depot_end, Some(5.0));
    assert_eq!(seeded.install_end, Some(10.0));

    // One aircraft takes the spare at t=10; the other is still backordered
    // at the horizon, so it shows up in the WIP series but not in the
    // resolution history.
    assert!(output.micap_history.is_empty());
    let last = output.wip_history.last().unwrap();
    assert_eq!(last.time, 10.0);
    assert_eq!(last.aircraft_micap, 1);
    assert_eq!(last.spares_available, 0);
}

#[test]
fn test_same_seed_reproduces_stochastic_run() {
    let config = SimConfig {
        n_total_aircraft: 8,
        n_total_parts: 10,
        mission_capable_rate: 0.75,
        fleet_dist: DurationDist::Weibull {
            shape: 2.0,
            scale: 80.0,
        },
        repair_dist: DurationDist::Normal {
            mean: 20.0,
            sd: 4.0,
        },
        depot_capacity: 2,
        condemn_cycle: 4,
        condemn_fraction: 0.05,
        part_order_lag: 15.0,
        parts_in_depot: 2,
        parts_in_cond_f: 1,
        parts_in_cond_a: 1,
        sim_time: 600.0,
        seed: 42,
    };
    let a = SimulationEngine::new(config.clone()).unwrap().run().unwrap();
    let b = SimulationEngine::new(config).unwrap().run().unwrap();

    // Everything except the per-run id must match bit for bit.
    assert_eq!(a.parts, b.parts);
    assert_eq!(a.aircraft, b.aircraft);
    assert_eq!(a.micap_history, b.micap_history);
    assert_eq!(a.wip_history, b.wip_history);
    assert_eq!(a.events_processed, b.events_processed);
    assert_eq!(a.end_time, b.end_time);
    assert_ne!(a.run_id, b.run_id);
}

#[test]
fn test_stochastic_run_invariants() {
    let config = SimConfig {
        n_total_aircraft: 6,
        n_total_parts: 8,
        mission_capable_rate: 0.8,
        fleet_dist: DurationDist::Uniform {
            min: 20.0,
            max: 60.0,
        },
        repair_dist: DurationDist::Uniform {
            min: 5.0,
            max: 15.0,
        },
        depot_capacity: 2,
        condemn_cycle: 3,
        condemn_fraction: 0.1,
        part_order_lag: 10.0,
        parts_in_depot: 1,
        parts_in_cond_f: 1,
        parts_in_cond_a: 1,
        sim_time: 500.0,
        seed: 7,
    };
    let output = SimulationEngine::new(config).unwrap().run().unwrap();

    assert!(output.end_time <= 500.0);
    for row in &output.parts {
        stage_pair_ordered(row.fleet_start, row.fleet_end);
        stage_pair_ordered(row.condition_f_start, row.condition_f_end);
        stage_pair_ordered(row.depot_start, row.depot_end);
        stage_pair_ordered(row.condition_a_start, row.condition_a_end);
        stage_pair_ordered(row.install_start, row.install_end);
        if let (Some(cf_end), Some(depot_start)) = (row.condition_f_end, row.depot_start) {
            assert_eq!(cf_end, depot_start);
        }
        if let (Some(start), Some(end), Some(duration)) =
            (row.fleet_start, row.fleet_end, row.fleet_duration)
        {
            assert!((end - start - duration).abs() < 1e-9);
        }
    }
    for resolution in &output.micap_history {
        assert!(resolution.micap_duration >= 0.0);
    }
    // (part_id, cycle) pairs are unique across the log.
    let mut seen = std::collections::HashSet::new();
    for row in &output.parts {
        assert!(seen.insert((row.part_id, row.cycle)), "duplicate cycle row");
    }
}

fn stage_pair_ordered(start: Option<f64>, end: Option<f64>) {
    if let (Some(start), Some(end)) = (start, end) {
        assert!(start <= end);
    }
}

#[test]
fn test_replications_derive_distinct_seeds() {
    let base = deterministic_config();
    let outputs: Vec<RunOutput> = run_replications(&base, 3).unwrap();
    assert_eq!(outputs.len(), 3);
    // Fixed distributions: identical tables regardless of seed.
    assert_eq!(outputs[0].parts, outputs[1].parts);
    assert_eq!(outputs[1].parts, outputs[2].parts);

    let stochastic = SimConfig {
        fleet_dist: DurationDist::Weibull {
            shape: 1.5,
            scale: 30.0,
        },
        sim_time: 200.0,
        ..deterministic_config()
    };
    let outputs = run_replications(&stochastic, 2).unwrap();
    // Different derived seeds give different draws.
    assert_ne!(outputs[0].parts, outputs[1].parts);
}
