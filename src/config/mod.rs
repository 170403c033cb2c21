//! Configuration module for Sumi-Robots
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sumi_robots::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("robots.toml")).unwrap();
//! println!("Requests will identify as: {}", config.user_agent.header_value());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetchConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
