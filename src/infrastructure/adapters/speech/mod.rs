//! Speech Engine Adapters

mod simulated_engine;

pub use simulated_engine::{SimulatedSpeechEngine, SimulatedSpeechEngineConfig};
