//! Engine configuration.
//!
//! Three environment variables are recognised:
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `PRISM_RNG_SEED` | Decimal `u64` seed shared by every thread's streams |
//! | `PRISM_DEBUG` | `1`/`true` enables step-by-step tracing on stderr |
//! | `PRISM_ISA` | Name of the dispatch target to use instead of the best one |

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Seed override variable.
pub const SEED_VAR: &str = "PRISM_RNG_SEED";

/// Debug tracing variable.
pub const DEBUG_VAR: &str = "PRISM_DEBUG";

/// Dispatch target override variable.
pub const ISA_VAR: &str = "PRISM_ISA";

/// Engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed seed for reproducible runs; derived from the clock when unset.
    pub seed: Option<u64>,

    /// Emit a trace event for every rounded operation.
    pub debug: bool,

    /// Dispatch target name (`scalar`, `sse4`, `avx2`, `avx512`, `neon`).
    pub isa: Option<String>,
}

impl EngineConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the configuration from the process environment, logging and
    /// ignoring malformed values.
    #[must_use]
    pub fn from_env_lossy() -> Self {
        Self::from_lookup_lossy(|var| std::env::var(var).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        Ok(Self {
            seed: parse_seed(SEED_VAR, lookup(SEED_VAR))?,
            debug: parse_flag(DEBUG_VAR, lookup(DEBUG_VAR))?,
            isa: non_empty(lookup(ISA_VAR)),
        })
    }

    /// Like [`from_lookup`](Self::from_lookup), but a malformed variable
    /// falls back to its default.
    #[must_use]
    pub fn from_lookup_lossy(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let seed = parse_seed(SEED_VAR, lookup(SEED_VAR)).unwrap_or_else(|err| {
            warn!(%err, "ignoring seed override");
            None
        });
        let debug = parse_flag(DEBUG_VAR, lookup(DEBUG_VAR)).unwrap_or_else(|err| {
            warn!(%err, "ignoring debug flag");
            false
        });
        Self {
            seed,
            debug,
            isa: non_empty(lookup(ISA_VAR)),
        }
    }

    /// Set a fixed seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable or disable debug tracing.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Request a dispatch target by name.
    #[must_use]
    pub fn with_isa(mut self, isa: impl Into<String>) -> Self {
        self.isa = Some(isa.into());
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn parse_seed(var: &'static str, value: Option<String>) -> ConfigResult<Option<u64>> {
    match non_empty(value) {
        None => Ok(None),
        Some(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|source| ConfigError::InvalidSeed { var, value, source }),
    }
}

fn parse_flag(var: &'static str, value: Option<String>) -> ConfigResult<bool> {
    match non_empty(value).as_deref() {
        None => Ok(false),
        Some(v) if v == "1" || v.eq_ignore_ascii_case("true") => Ok(true),
        Some(v) if v == "0" || v.eq_ignore_ascii_case("false") => Ok(false),
        Some(v) => Err(ConfigError::InvalidFlag {
            var,
            value: v.to_owned(),
        }),
    }
}
