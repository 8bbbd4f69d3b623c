mod aircraft_manager_tests;
mod engine_tests;
