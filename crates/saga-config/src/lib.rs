//! Configuration management for the saga catalog.
//!
//! This crate discovers the `.saga/` data directory and loads the layered
//! configuration stored in `.saga/config.yaml`.

pub mod config;
pub mod data_dir;

pub use config::{ConfigError, SagaConfig, load_config, save_config};
pub use data_dir::{ensure_data_dir, find_data_dir};
