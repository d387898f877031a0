//! Configuration for the PRISM rounding engine.
//!
//! The engine reads its settings from the environment once, on first use,
//! and keeps them in a process-wide slot that embedders and tests may
//! replace explicitly:
//!
//! ```
//! use prism_config::{global_config, set_global_config, EngineConfig};
//!
//! set_global_config(EngineConfig::default().with_seed(42));
//! assert_eq!(global_config().seed, Some(42));
//! ```
//!
//! # Logging
//!
//! [`init_tracing`] installs a `tracing_subscriber` formatter on stderr.
//! It runs automatically when the environment enables debug tracing;
//! hosts that install their own subscriber first keep it.

#![warn(missing_docs)]

mod config;
mod error;

pub use config::{EngineConfig, DEBUG_VAR, ISA_VAR, SEED_VAR};
pub use error::{ConfigError, ConfigResult};

use parking_lot::{const_rwlock, RwLock};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

static GLOBAL: RwLock<Option<EngineConfig>> = const_rwlock(None);

/// The active configuration, loaded from the environment on first call.
#[must_use]
pub fn global_config() -> EngineConfig {
    if let Some(config) = GLOBAL.read().as_ref() {
        return config.clone();
    }
    GLOBAL.write().get_or_insert_with(load_from_env).clone()
}

/// Replace the active configuration, returning the previous one.
///
/// Components that cache derived state (the selected dispatch target, the
/// per-thread streams) keep what they already derived.
pub fn set_global_config(config: EngineConfig) -> Option<EngineConfig> {
    GLOBAL.write().replace(config)
}

/// Forget the active configuration so the next read consults the
/// environment again.
pub fn reset_global_config() {
    GLOBAL.write().take();
}

fn load_from_env() -> EngineConfig {
    let config = EngineConfig::from_env_lossy();
    if config.debug {
        if let Err(err) = init_tracing(&config) {
            debug!(%err, "keeping the host's tracing subscriber");
        }
    }
    debug!(?config, "loaded engine configuration");
    config
}

/// Install a stderr tracing subscriber.
///
/// Debug configurations log at `TRACE`, others at `WARN`.
pub fn init_tracing(config: &EngineConfig) -> ConfigResult<()> {
    let level = if config.debug { Level::TRACE } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
