//! Command handlers for the `planout` CLI.
//!
//! Each handler prints its own output and exits non-zero on failure. The
//! rendering helpers they share are public for tests.

mod ops;
mod run;

pub use ops::{format_vocabulary, list_operators};
pub use run::{evaluate, run_file, RunReport};
