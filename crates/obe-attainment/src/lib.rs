//! Outcome-based education attainment engine.
//!
//! Turns per-assessment cohort counts and indirect survey responses into
//! attainment scores for course learning outcomes (CLOs) and the programme
//! outcomes (POs) and programme-specific outcomes (PSOs) they map onto.

pub mod attainment;
pub mod config;
pub mod dataset;
pub mod error;
pub mod telemetry;
