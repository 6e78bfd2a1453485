//! Utility functions and configuration.
//!
//! ## Modules
//!
//! - [`app_data`] - Application data directory and JSON config
//! - [`content`] - Binary detection and byte-offset to line mapping
//!
//! ```no_run
//! use fxs::utils::{AppConfig, LineIndex};
//!
//! let config = AppConfig::load().unwrap();
//! println!("default algorithm: {}", config.default_algorithm);
//!
//! let lines = LineIndex::new(b"one\ntwo");
//! assert_eq!(lines.locate(4), (2, 0));
//! ```

pub mod app_data;
pub mod content;

pub use app_data::*;
pub use content::*;
