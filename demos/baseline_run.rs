use sustainsim::{DurationDist, SimConfig, SimulationEngine};

fn main() -> Result<(), String> {
    env_logger::init();

    println!("Closed-loop sustainment baseline");
    println!("================================");

    let config = SimConfig {
        n_total_aircraft: 20,
        n_total_parts: 24,
        mission_capable_rate: 0.60,
        fleet_dist: DurationDist::Weibull {
            shape: 9.17,
            scale: 384.13,
        },
        repair_dist: DurationDist::Normal {
            mean: 40.0,
            sd: 1.2,
        },
        depot_capacity: 10,
        condemn_cycle: 10,
        condemn_fraction: 0.10,
        part_order_lag: 365.0,
        parts_in_depot: 5,
        parts_in_cond_f: 5,
        parts_in_cond_a: 2,
        sim_time: 4200.0,
        seed: 132,
    };

    println!(
        "{} aircraft sharing {} parts, {} repair slots, horizon {} days",
        config.n_total_aircraft, config.n_total_parts, config.depot_capacity, config.sim_time
    );

    let engine = SimulationEngine::new(config).map_err(|e| e.to_string())?;
    let output = engine.run().map_err(|e| e.to_string())?;

    println!("\nRun {} finished at t={:.1}", output.run_id, output.end_time);
    println!("  events processed:    {}", output.events_processed);
    println!("  part cycle rows:     {}", output.parts.len());
    println!("  aircraft cycle rows: {}", output.aircraft.len());
    println!("  resolved backorders: {}", output.micap_history.len());
    println!("  warnings:            {}", output.warnings.len());

    let condemned = output.parts.iter().filter(|row| row.condemned).count();
    println!("  condemned parts:     {}", condemned);

    if !output.micap_history.is_empty() {
        let total_wait: f64 = output
            .micap_history
            .iter()
            .map(|r| r.micap_duration)
            .sum();
        let max_wait = output
            .micap_history
            .iter()
            .map(|r| r.micap_duration)
            .fold(0.0_f64, f64::max);
        println!(
            "  backorder wait:      mean {:.1}, max {:.1}",
            total_wait / output.micap_history.len() as f64,
            max_wait
        );
    }

    let peak_micap = output
        .wip_history
        .iter()
        .map(|s| s.aircraft_micap)
        .max()
        .unwrap_or(0);
    println!("  peak grounded fleet: {}", peak_micap);

    Ok(())
}
