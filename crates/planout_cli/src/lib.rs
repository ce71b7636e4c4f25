//! PlanOut CLI - library half of the `planout` binary.
//!
//! Loading experiment files, applying command-line assignments and
//! rendering results live here so they can be tested without a process.

use std::sync::Once;

pub mod commands;
pub mod experiment;

static TRACING_INIT: Once = Once::new();

/// Install the log subscriber if `RUST_LOG` is set.
///
/// Safe to call more than once; only the first call has any effect.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
        }
    });
}
