//! # FXS - Exact Substring Search
//!
//! FXS finds every occurrence of a pattern in a text using one of three
//! classical algorithms, and applies them to files and directory trees from
//! the command line.
//!
//! ## Architecture
//!
//! - [`matcher`] - Boyer-Moore, Knuth-Morris-Pratt and Rabin-Karp scanners
//! - [`scan`] - Directory walking and parallel per-file matching
//! - [`output`] - Result formatting (ripgrep-style and JSON)
//! - [`utils`] - Config and content helpers
//!
//! ## Quick Start
//!
//! ```
//! use fxs::matcher::{search_str, Algorithm};
//!
//! let text = "ABAAABCDABABCABCABCABC";
//! for algorithm in Algorithm::ALL {
//!     assert_eq!(search_str(algorithm, text, "ABABCABCABCABC"), vec![15]);
//! }
//! ```
//!
//! All scanners report overlapping matches in ascending order, and return
//! nothing for an empty pattern or a pattern longer than the text.

pub mod matcher;
pub mod output;
pub mod scan;
pub mod utils;
