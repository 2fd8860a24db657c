//! Output module for reporting harvest results
//!
//! This module handles:
//! - Statistics over the stored articles (`--stats`)
//! - The end-of-run summary

pub mod stats;

pub use stats::{load_statistics, print_run_summary, print_statistics, ArticleStatistics};
