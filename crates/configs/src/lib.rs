//! # configs
//!
//! Layered settings for the forum engine and the tracing bootstrap.

pub mod settings;
pub mod telemetry;

pub use settings::*;
pub use telemetry::init_tracing;
