//! Evaluation policy, fixed for the duration of a guard pass.

use cg_core::Config;
use serde::Serialize;

/// Switches that change how the guard classifies candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GuardPolicy {
    /// Exclude every `always_run` candidate. When off, `always_run`
    /// candidates that are also `run_on_change` are judged by checksum.
    pub always_ignoring_run_always: bool,

    /// Strip `classpath:` from paths for identity matching and reporting.
    pub ignore_classpath_prefix: bool,
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self {
            always_ignoring_run_always: true,
            ignore_classpath_prefix: true,
        }
    }
}

impl GuardPolicy {
    /// The policy with `always_ignoring_run_always` turned off.
    pub fn strict() -> Self {
        Self {
            always_ignoring_run_always: false,
            ..Self::default()
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            always_ignoring_run_always: config.always_ignoring_run_always,
            ignore_classpath_prefix: config.ignore_classpath_prefix,
        }
    }

    pub fn is_strict(&self) -> bool {
        !self.always_ignoring_run_always
    }
}
