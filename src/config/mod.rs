//! CDST Configuration Module
//!
//! All tunable constants (the normative reference table, tier cuts, formula
//! weights, economics figures, and the treatment catalog) loaded from TOML
//! and validated before an engine will start.
//!
//! ## Loading Order
//!
//! 1. `KP_CDST_CONFIG` environment variable (path to TOML file)
//! 2. `cdst_config.toml` in the current working directory
//! 3. Built-in defaults (published constants)
//!
//! The loaded config is passed explicitly into `Engine::new()`; there is no
//! process-global config state, so tests and concurrent deployments can hold
//! differently tuned engines side by side.

mod cdst_config;
pub mod defaults;
pub mod validation;

pub use cdst_config::*;
