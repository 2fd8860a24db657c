//! Configuration module for news-harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so a run without a configuration file is valid.
//!
//! # Example
//!
//! ```no_run
//! use news_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Images go to: {}", config.output.image_dir);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{Config, HarvestConfig, OutputConfig, UserAgentConfig};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
