//! Runtime for the ok language: the host standard library, a file runner and
//! an interactive REPL built on the `ok` core.

pub mod repl;
pub mod runner;
pub mod stdlib;

use std::sync::Once;

use ok::Environment;

pub use repl::{Outcome, Session, run_repl};
pub use runner::{RunError, Source, run_sources};
pub use stdlib::register_stdlib;

static TRACING_INIT: Once = Once::new();

/// Install the stderr log subscriber, filtered by `OK_LOG` (default `warn`).
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        let filter = EnvFilter::try_from_env("OK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .init();
    });
}

/// The default environment with the host standard library installed in the
/// user scope.
pub fn host_environment() -> Environment {
    let mut env = ok::default_environment();
    register_stdlib(&mut env);
    env
}
