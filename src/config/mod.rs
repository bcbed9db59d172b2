//! Configuration loading and management for the payroll engine.
//!
//! This module provides functionality to load a payroll configuration from
//! YAML files: metadata, the component catalog and salary structures.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/standard").unwrap();
//! println!("Loaded payroll config: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{ComponentsConfig, PayrollConfig, PayrollMetadata, StructuresConfig};
