use sustainsim::{run_replications, DurationDist, SimConfig};

fn main() -> Result<(), String> {
    env_logger::init();

    println!("Replication sweep: backorder exposure vs. depot capacity");
    println!("========================================================");

    let replications = 20;
    for depot_capacity in [4, 6, 8, 10] {
        let base = SimConfig {
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
            depot_capacity,
            condemn_cycle: 10,
            condemn_fraction: 0.10,
            part_order_lag: 365.0,
            parts_in_depot: 4,
            parts_in_cond_f: 6,
            parts_in_cond_a: 2,
            sim_time: 4200.0,
            seed: 9000,
        };

        let outputs = run_replications(&base, replications).map_err(|e| e.to_string())?;

        let mean_backorders: f64 = outputs
            .iter()
            .map(|o| o.micap_history.len() as f64)
            .sum::<f64>()
            / outputs.len() as f64;
        let mean_wait: f64 = {
            let (total, count) = outputs.iter().fold((0.0, 0usize), |(t, c), o| {
                (
                    t + o.micap_history.iter().map(|r| r.micap_duration).sum::<f64>(),
                    c + o.micap_history.len(),
                )
            });
            if count == 0 {
                0.0
            } else {
                total / count as f64
            }
        };
        let worst_peak = outputs
            .iter()
            .flat_map(|o| o.wip_history.iter().map(|s| s.aircraft_micap))
            .max()
            .unwrap_or(0);

        println!(
            "capacity {:2}: {:5.1} backorders/run, mean wait {:6.1}, worst grounded fleet {}",
            depot_capacity, mean_backorders, mean_wait, worst_peak
        );
    }

    println!("\n{} replications per capacity point", replications);
    Ok(())
}
