//! Pipeline module.
//!
//! Drives the three phases (imputation, outlier handling, scaling) over
//! single columns or whole frames.

mod orchestrator;

pub use orchestrator::PhaseOrchestrator;
