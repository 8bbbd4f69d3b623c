use log::{debug, info, warn};
use rayon::prelude::*;
use std::collections::VecDeque;
use uuid::Uuid;

use super::aircraft::EventPath;
use super::aircraft_manager::AircraftManager;
use super::config::SimConfig;
use super::depot::DepotScheduler;
use super::errors::{ConfigError, RunError, SimError};
use super::event::EventKind;
use super::event_queue::EventQueue;
use super::output::{ResolvedBy, RunOutput, RunWarning, WarningKind, WipSample};
use super::part_manager::PartManager;
use super::sampling::Sampler;
use super::types::{AcId, DesId, PartId, SimId, Stage};

/// Discrete-event simulation of the closed-loop sustainment process.
///
/// The engine is the only driver of state change: it pops the earliest
/// event, dispatches to the matching handler, and lets handlers schedule
/// follow-on events at times no earlier than the current one. Parts that
/// become ready for the depot are not assigned inside handlers; they collect
/// in a pending batch that is flushed once per simulated instant, sorted by
/// ready time, so the capacity scheduler always sees a chronological feed
/// regardless of which path (fleet duty or backorder release) freed the part.
pub struct SimulationEngine {
    config: SimConfig,
    queue: EventQueue,
    depot: DepotScheduler,
    parts: PartManager,
    aircraft: AircraftManager,
    sampler: Sampler,
    /// Parts ready for repair, awaiting the per-instant assignment pass.
    pending_depot: Vec<(f64, SimId)>,
    /// Serviceable condition A stock, FIFO by the time it became available.
    spares: VecDeque<SimId>,
    in_depot: u32,
    warnings: Vec<RunWarning>,
    wip_history: Vec<WipSample>,
    events_processed: u64,
    now: f64,
}

impl SimulationEngine {
    /// Validate the configuration and build an engine ready to run.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let sampler = Sampler::new(config.seed, &config.fleet_dist, &config.repair_dist)
            .map_err(|e| ConfigError::Invalid(vec![e]))?;
        Ok(Self {
            depot: DepotScheduler::new(config.depot_capacity),
            parts: PartManager::new(config.condemn_cycle),
            aircraft: AircraftManager::new(),
            queue: EventQueue::new(),
            sampler,
            pending_depot: Vec::new(),
            spares: VecDeque::new(),
            in_depot: 0,
            warnings: Vec::new(),
            wip_history: Vec::new(),
            events_processed: 0,
            now: 0.0,
            config,
        })
    }

    /// Run to queue exhaustion or the configured horizon and assemble the
    /// output tables.
    pub fn run(mut self) -> Result<RunOutput, SimError> {
        self.initialize()?;
        self.flush_depot_queue()?;
        self.record_wip();

        while let Some(t) = self.queue.peek_time() {
            if t > self.config.sim_time {
                // Everything left is beyond the horizon; discarded, not executed.
                debug!(
                    "horizon {} reached with {} events unexecuted",
                    self.config.sim_time,
                    self.queue.len()
                );
                break;
            }
            self.now = t;
            // Drain every event at this instant before assigning depot slots.
            loop {
                let event = match self.queue.pop_next() {
                    Some(event) => event,
                    None => break,
                };
                debug!("t={} dispatch {:?}", event.time, event.kind);
                self.dispatch(event.kind)?;
                self.events_processed += 1;
                self.record_wip();
                match self.queue.peek_time() {
                    Some(next) if next == t => continue,
                    _ => break,
                }
            }
            self.flush_depot_queue()?;
        }

        let parts = self.parts.drain_log();
        let aircraft = self.aircraft.drain_log();
        let micap_history = self.aircraft.drain_micap_history();
        info!(
            "run complete: t={} events={} part_rows={} aircraft_rows={} resolutions={} warnings={}",
            self.now,
            self.events_processed,
            parts.len(),
            aircraft.len(),
            micap_history.len(),
            self.warnings.len()
        );
        Ok(RunOutput {
            run_id: Uuid::new_v4(),
            parts,
            aircraft,
            micap_history,
            wip_history: self.wip_history,
            warnings: self.warnings,
            events_processed: self.events_processed,
            end_time: self.now,
        })
    }

    /// Seed the time-zero population.
    ///
    /// Order matters for reproducibility: fleet aircraft in ascending id
    /// order, then backordered aircraft, then depot stock (claiming slots
    /// first), then condition F stock, then condition A stock resolving
    /// initial backorders FIFO.
    fn initialize(&mut self) -> Result<(), SimError> {
        let n_with_parts = self.config.aircraft_with_parts();
        for ac_id in 0..n_with_parts {
            let part_id = self.parts.register_part();
            self.launch_cycle(ac_id, part_id, EventPath::InitialFleet)?;
        }
        for ac_id in n_with_parts..self.config.n_total_aircraft {
            self.aircraft
                .begin_micap_cycle(ac_id, 0.0, EventPath::InitialMicap)?;
        }
        for _ in 0..self.config.parts_in_depot {
            let part_id = self.parts.register_part();
            let start = self.depot.assign(0.0)?;
            let sim_id = self.parts.open_instance(part_id, Stage::Depot, start)?;
            self.schedule_repair(sim_id, start)?;
        }
        for _ in 0..self.config.parts_in_cond_f {
            let part_id = self.parts.register_part();
            let sim_id = self.parts.open_instance(part_id, Stage::ConditionF, 0.0)?;
            self.pending_depot.push((0.0, sim_id));
        }
        for _ in 0..self.config.parts_in_cond_a {
            let part_id = self.parts.register_part();
            let sim_id = self.parts.open_instance(part_id, Stage::ConditionA, 0.0)?;
            self.offer_spare(sim_id, ResolvedBy::InitialSpare)?;
        }
        debug!(
            "initialized: {} flying, {} backordered, {} in depot, {} awaiting repair, {} spare",
            n_with_parts,
            self.config.n_total_aircraft - n_with_parts,
            self.config.parts_in_depot,
            self.config.parts_in_cond_f,
            self.spares.len()
        );
        Ok(())
    }

    fn dispatch(&mut self, kind: EventKind) -> Result<(), SimError> {
        match kind {
            EventKind::FleetComplete { des_id } => self.handle_fleet_complete(des_id),
            EventKind::DepotComplete { sim_id } => self.handle_depot_complete(sim_id),
            EventKind::NewPartArrives { part_id } => self.handle_new_part_arrives(part_id),
        }
    }

    /// An aircraft's fleet stage ends: its part comes off-wing toward the
    /// depot, and the aircraft either swaps in a spare immediately or joins
    /// the backorder queue.
    fn handle_fleet_complete(&mut self, des_id: DesId) -> Result<(), SimError> {
        let (ac_id, on_wing) = match self.aircraft.get(des_id) {
            Some(record) => (record.ac_id, record.fleet_part),
            None => {
                self.soft_warn(
                    WarningKind::MissingLinkage,
                    format!("fleet completion for unknown aircraft cycle {}", des_id),
                );
                return Ok(());
            }
        };
        self.aircraft.close_fleet(des_id, self.now)?;

        match on_wing.and_then(|sim_id| self.parts.get(sim_id).map(|p| (sim_id, p.part_id))) {
            Some((sim_id, part_id)) => {
                self.parts.close_stage(sim_id, self.now)?;
                self.parts
                    .open_instance(part_id, Stage::ConditionF, self.now)?;
                self.pending_depot.push((self.now, sim_id));
            }
            None => self.soft_warn(
                WarningKind::MissingLinkage,
                format!(
                    "aircraft cycle {} has no resolvable on-wing part instance",
                    des_id
                ),
            ),
        }

        if let Some(spare) = self.spares.pop_front() {
            let part_id = self.install_part_on(spare, des_id, ac_id)?;
            self.launch_cycle(ac_id, part_id, EventPath::Relaunch)?;
        } else {
            match self.aircraft.enter_backorder(des_id, self.now) {
                Ok(()) => {
                    if self.aircraft.micap_count() > self.config.n_total_aircraft as usize {
                        self.soft_warn(
                            WarningKind::MicapCountExceeded,
                            format!(
                                "active backorders ({}) exceed total aircraft ({})",
                                self.aircraft.micap_count(),
                                self.config.n_total_aircraft
                            ),
                        );
                    }
                }
                // Internal-consistency breach: drop this event, keep running.
                Err(SimError::DuplicateBackorder(ac)) => self.soft_warn(
                    WarningKind::DuplicateBackorder,
                    format!("aircraft {} was already backordered", ac),
                ),
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// A part finishes repair: count the cycle, condemn or return it to
    /// serviceable stock, and let a freed part resolve the oldest backorder.
    fn handle_depot_complete(&mut self, sim_id: SimId) -> Result<(), SimError> {
        self.parts.close_stage(sim_id, self.now)?;
        self.in_depot -= 1;
        let draw = self.sampler.condemn_draw(self.config.condemn_fraction);
        let condemned = self.parts.advance_cycle(sim_id, draw)?;
        let part_id = self
            .parts
            .get(sim_id)
            .ok_or(SimError::UnknownInstance(sim_id))?
            .part_id;
        if condemned {
            self.parts.complete_instance(sim_id)?;
            let replacement = self.parts.register_part();
            let arrival = self.now + self.config.part_order_lag;
            self.queue
                .schedule(arrival, EventKind::NewPartArrives { part_id: replacement })?;
            debug!(
                "t={} part {} condemned; replacement {} arrives at {}",
                self.now, part_id, replacement, arrival
            );
        } else {
            self.parts
                .open_instance(part_id, Stage::ConditionA, self.now)?;
            self.offer_spare(sim_id, ResolvedBy::DepotPart)?;
        }
        Ok(())
    }

    /// A replacement part arrives: it opens a zero-cycle instance in
    /// condition A and follows the same resolve-or-pool path as a repair.
    fn handle_new_part_arrives(&mut self, part_id: PartId) -> Result<(), SimError> {
        let sim_id = self
            .parts
            .open_instance(part_id, Stage::ConditionA, self.now)?;
        self.offer_spare(sim_id, ResolvedBy::NewPart)
    }

    /// Route a serviceable part to the oldest backordered aircraft, or to
    /// the spare pool when nobody is waiting.
    fn offer_spare(&mut self, sim_id: SimId, resolved_by: ResolvedBy) -> Result<(), SimError> {
        // Peek, then remove by the same id, so queue and record stay in step.
        let entry = match self.aircraft.peek_micap().copied() {
            Some(entry) => entry,
            None => {
                self.spares.push_back(sim_id);
                return Ok(());
            }
        };
        let des_id = match self
            .aircraft
            .resolve_backorder(entry.ac_id, self.now, resolved_by)?
        {
            Some(des_id) => des_id,
            None => {
                self.soft_warn(
                    WarningKind::MissingLinkage,
                    format!("peeked backorder for aircraft {} vanished", entry.ac_id),
                );
                self.spares.push_back(sim_id);
                return Ok(());
            }
        };
        let part_id = self.install_part_on(sim_id, des_id, entry.ac_id)?;
        self.launch_cycle(entry.ac_id, part_id, EventPath::Relaunch)
    }

    /// Zero-length installation: close the part's condition A stage, run its
    /// install stage, link both records, and retire both cycles to the logs.
    fn install_part_on(
        &mut self,
        sim_id: SimId,
        des_id: DesId,
        ac_id: AcId,
    ) -> Result<PartId, SimError> {
        let part_id = self
            .parts
            .get(sim_id)
            .ok_or(SimError::UnknownInstance(sim_id))?
            .part_id;
        self.parts.close_stage(sim_id, self.now)?;
        self.parts.open_instance(part_id, Stage::Install, self.now)?;
        self.parts.close_stage(sim_id, self.now)?;
        self.parts.link_install(sim_id, des_id, ac_id)?;
        self.parts.complete_instance(sim_id)?;
        self.aircraft.install_part(des_id, (sim_id, part_id), self.now)?;
        self.aircraft.complete_cycle(des_id)?;
        Ok(part_id)
    }

    /// Open the next fleet cycle for `ac_id` flying `part_id` from `now`.
    /// One fleet duration draw covers both records.
    fn launch_cycle(&mut self, ac_id: AcId, part_id: PartId, path: EventPath) -> Result<(), SimError> {
        let duration = self.sampler.fleet_duration();
        let sim_id = self.parts.open_instance(part_id, Stage::Fleet, self.now)?;
        self.parts.set_fleet_duration(sim_id, duration)?;
        let des_id = self
            .aircraft
            .begin_fleet_cycle(ac_id, self.now, duration, sim_id, path);
        self.parts.link_fleet(sim_id, des_id, ac_id)?;
        self.queue
            .schedule(self.now + duration, EventKind::FleetComplete { des_id })
    }

    /// Assign every pending-ready part to a depot slot, in ready-time order.
    ///
    /// Called only between simulated instants; sorting the whole batch here
    /// closes the ordering hazard where a part freed from one path could
    /// carry an earlier ready time than one already assigned from another.
    fn flush_depot_queue(&mut self) -> Result<(), SimError> {
        if self.pending_depot.is_empty() {
            return Ok(());
        }
        let mut batch = std::mem::take(&mut self.pending_depot);
        batch.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        for (ready_time, sim_id) in batch {
            let start = self.depot.assign(ready_time)?;
            let part_id = self
                .parts
                .get(sim_id)
                .ok_or(SimError::UnknownInstance(sim_id))?
                .part_id;
            // Condition F ends the moment the repair slot opens.
            self.parts.close_stage(sim_id, start)?;
            self.parts.open_instance(part_id, Stage::Depot, start)?;
            self.schedule_repair(sim_id, start)?;
        }
        Ok(())
    }

    /// Sample the repair duration, book the slot's new free time, and
    /// schedule the completion event.
    fn schedule_repair(&mut self, sim_id: SimId, start: f64) -> Result<(), SimError> {
        let duration = self.sampler.repair_duration();
        self.depot.release(start + duration);
        self.in_depot += 1;
        self.queue
            .schedule(start + duration, EventKind::DepotComplete { sim_id })
    }

    fn record_wip(&mut self) {
        self.wip_history.push(WipSample {
            time: self.now,
            aircraft_micap: self.aircraft.micap_count() as u32,
            parts_in_depot: self.in_depot,
            spares_available: self.spares.len() as u32,
        });
    }

    fn soft_warn(&mut self, kind: WarningKind, message: String) {
        warn!("t={} {:?}: {}", self.now, kind, message);
        self.warnings.push(RunWarning {
            time: self.now,
            kind,
            message,
        });
    }
}

/// Run `count` independent replications on the rayon pool, one derived seed
/// each. The base configuration is validated once up front.
pub fn run_replications(base: &SimConfig, count: u64) -> Result<Vec<RunOutput>, RunError> {
    base.validate()?;
    (0..count)
        .into_par_iter()
        .map(|replication| {
            let mut config = base.clone();
            config.seed = base.seed.wrapping_add(replication);
            let engine = SimulationEngine::new(config).map_err(RunError::Config)?;
            engine.run().map_err(RunError::Sim)
        })
        .collect()
}
