pub mod download;
pub mod orchestrator;
pub mod state;
