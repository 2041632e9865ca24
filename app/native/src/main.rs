#![allow(clippy::multiple_crate_versions)]

//! Stackwm entry point.
//!
//! Logging is configured from `RUST_LOG` when set, otherwise it defaults to
//! `info`. The process exits non-zero when the window manager dies.

use std::process::ExitCode;

fn main() -> ExitCode {
    init_tracing();

    match stackwm_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("died: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    if let Ok(env_filter) = tracing_subscriber::EnvFilter::try_from_default_env() {
        tracing_subscriber::fmt().compact().with_env_filter(env_filter).init();
    } else {
        tracing_subscriber::fmt().compact().init();
    }
}
