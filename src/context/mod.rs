// ============================================================================
// File: packages/jobcomp/src/context/mod.rs
// ----------------------------------------------------------------------------
// Thread-safe dispatch context for job completion logging.
//
// Owns the currently bound backend and serializes access to it:
// - Lifecycle state machine (uninitialized / noop / active)
// - Single lock around every lifecycle transition and backend call
// - Lock-free fast path while no backend is configured
// - Process-wide context for the daemon
// ============================================================================

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::backends::{BackendRegistry, JobCompBackend, JobCompConfig};
use crate::error::{JobCompError, JobCompResult};

// Submodules
mod dispatch;
mod global;
mod lifecycle;


// Re-exports
pub use dispatch::JobCompHandle;
pub use global::{global_jobcomp, init_global_jobcomp};

/// Observable lifecycle state of a context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LifecycleState {
    /// `init` has not run, or `fini` ran since
    Uninitialized = 0,
    /// No backend configured; every call succeeds without doing anything
    Noop = 1,
    /// A backend is bound
    Active = 2,
}

impl LifecycleState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => LifecycleState::Noop,
            2 => LifecycleState::Active,
            _ => LifecycleState::Uninitialized,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Noop => "noop",
            LifecycleState::Active => "active",
        })
    }
}

pub(crate) enum Lifecycle {
    Uninitialized,
    Noop,
    Active(Box<dyn JobCompBackend>),
}

impl Lifecycle {
    pub(crate) fn state(&self) -> LifecycleState {
        match self {
            Lifecycle::Uninitialized => LifecycleState::Uninitialized,
            Lifecycle::Noop => LifecycleState::Noop,
            Lifecycle::Active(_) => LifecycleState::Active,
        }
    }
}

/// Everything guarded by the context lock
pub(crate) struct Slot {
    pub(crate) config: JobCompConfig,
    pub(crate) lifecycle: Lifecycle,
}

/// Job completion dispatch context
///
/// Holds the backend registry, the active configuration and the bound
/// backend. At most one backend operation runs at a time. The lifecycle
/// state is mirrored in an atomic so callers in NOOP mode never touch the
/// lock; the mirror is only written while the lock is held.
pub struct JobCompContext {
    registry: BackendRegistry,
    slot: Mutex<Slot>,
    state: AtomicU8,
}

impl JobCompContext {
    /// Create an uninitialized context
    ///
    /// # Arguments
    /// * `registry` - Backends selectable by name
    /// * `config` - Configuration used by the next `init`
    pub fn new(registry: BackendRegistry, config: JobCompConfig) -> Self {
        Self {
            registry,
            slot: Mutex::new(Slot {
                config,
                lifecycle: Lifecycle::Uninitialized,
            }),
            state: AtomicU8::new(LifecycleState::Uninitialized as u8),
        }
    }

    /// Create a context with the bundled backends and `JOBCOMP_*` settings
    pub fn from_env() -> JobCompResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create a context with the bundled backends and `JOBCOMP_*` settings
    /// read through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> JobCompResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self::new(
            BackendRegistry::with_builtin(),
            JobCompConfig::from_lookup(lookup)?,
        ))
    }

    /// Current lifecycle state
    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Backends this context can bind
    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    /// Type of the bound backend, `None` unless active
    pub fn active_backend(&self) -> JobCompResult<Option<&'static str>> {
        let slot = self.lock()?;
        Ok(match &slot.lifecycle {
            Lifecycle::Active(backend) => Some(backend.backend_type()),
            _ => None,
        })
    }

    /// Snapshot of the configuration used by the next `init`
    pub fn config(&self) -> JobCompResult<JobCompConfig> {
        Ok(self.lock()?.config.clone())
    }

    pub(crate) fn lock(&self) -> JobCompResult<MutexGuard<'_, Slot>> {
        self.slot
            .lock()
            .map_err(|e| JobCompError::internal(format!("Failed to acquire jobcomp lock: {e}")))
    }

    pub(crate) fn publish_state(&self, slot: &Slot) {
        self.state.store(slot.lifecycle.state() as u8, Ordering::Release);
    }
}

impl fmt::Debug for JobCompContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobCompContext")
            .field("registry", &self.registry)
            .field("state", &self.state())
            .finish()
    }
}
