// simulation_engine/mod.rs
pub mod event_loop;
pub mod stimulation;
