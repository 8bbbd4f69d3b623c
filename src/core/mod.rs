pub mod aircraft;
pub mod aircraft_manager;
pub mod config;
pub mod depot;
pub mod engine;
pub mod errors;
pub mod event;
pub mod event_queue;
pub mod micap_queue;
pub mod output;
pub mod part;
pub mod part_manager;
pub mod sampling;
pub mod types;

#[cfg(test)]
mod tests;
