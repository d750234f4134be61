//! Fan-out orchestration.

pub mod orchestrator;

pub use orchestrator::FanoutOrchestrator;
