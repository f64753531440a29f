//! Per-module switchable logging.
//!
//! Hot paths (one call per mutation batch or click) log through these macros
//! instead of `log::*` directly so a module can be silenced without touching
//! `RUST_LOG`. The calling module must define the switch:
//!
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_debug, log_info};
//!
//! log_debug!("rows changed by {}", delta);
//! ```

/// `log::debug!` gated on the caller's `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}

/// `log::info!` gated on the caller's `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// `log::warn!` gated on the caller's `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Picks the default level filter: `Debug` when `ORDER_ALERT_DEBUG` is `1` or
/// `true`, `Info` otherwise. Per-module `RUST_LOG` directives still apply.
pub fn default_level() -> log::LevelFilter {
    let debug_mode = std::env::var("ORDER_ALERT_DEBUG")
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    if debug_mode {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    }
}

pub fn init() {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(default_level());
    // A second init (tests, embedding) keeps the first logger.
    let _ = builder.try_init();
}
