//! Configuration file handling for lapd
//!
//! This module contains:
//! - `lapd.yml` data structures (deployments and their file filters)
//! - Loading, with synthesis of a default file when none exists

pub mod deployment;
pub mod loader;

pub use deployment::{Config, Filter};
pub use loader::{DEFAULT_CONFIG_FILE, load};
