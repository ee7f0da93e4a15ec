//! Optional `.ux-metrics.toml` configuration.
//!
//! The file is looked up in the working directory and up to nine parent
//! directories, ten in total. Its only section pins default metric versions:
//!
//! ```toml
//! [versions]
//! desirability = "v1"
//! usefulness = "v2"
//! ```
//!
//! A missing file is not an error. A file that cannot be parsed is logged
//! and skipped.

mod core;
mod loader;

pub use core::EngineConfig;
pub use loader::{
    directory_ancestors, load_config, load_config_file, load_config_from, parse_config,
    CONFIG_FILE_NAME,
};
