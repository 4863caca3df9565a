//! Configuration module for critiq
//!
//! This module handles:
//! - User-level configuration (~/.config/critiq/config.toml)
//! - Environment variable overrides
//! - Defaults for persona, debounce, and the extension allow-list

mod user_config;

pub use user_config::UserConfig;
