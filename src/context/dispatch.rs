// ============================================================================
// File: packages/jobcomp/src/context/dispatch.rs
// ----------------------------------------------------------------------------
// Call forwarding from the daemon to the bound backend
// ============================================================================

use crate::backends::{JobCompBackend, JobCompEvent};
use crate::error::JobCompResult;
use crate::jobs::{JobCompRecord, JobCond, JobRecord};

use super::{JobCompContext, Lifecycle, LifecycleState};

/// Dispatch handle obtained from an initialized context
///
/// Only `JobCompContext::init` and `JobCompContext::handle` hand these
/// out, so dispatch normally cannot happen before initialization. Using a
/// handle after `fini` is a caller bug and panics.
#[derive(Debug, Clone, Copy)]
pub struct JobCompHandle<'a> {
    context: &'a JobCompContext,
}

impl<'a> JobCompHandle<'a> {
    pub(crate) fn new(context: &'a JobCompContext) -> Self {
        Self { context }
    }

    pub(crate) fn for_context(context: &'a JobCompContext) -> Option<Self> {
        (context.state() != LifecycleState::Uninitialized).then(|| Self::new(context))
    }

    /// Context this handle dispatches through
    pub fn context(&self) -> &'a JobCompContext {
        self.context
    }

    /// Current lifecycle state of the underlying context
    pub fn state(&self) -> LifecycleState {
        self.context.state()
    }

    /// Record that a job started
    ///
    /// # Returns
    /// The backend's status verbatim; always `Ok` in NOOP mode
    pub fn record_job_start(&self, job: &JobRecord) -> JobCompResult<()> {
        self.forward("record_job_start", || (), |backend| {
            backend.record_job_start(job, JobCompEvent::JobStart)
        })
    }

    /// Record that a job finished
    ///
    /// # Returns
    /// The backend's status verbatim; always `Ok` in NOOP mode
    pub fn record_job_end(&self, job: &JobRecord) -> JobCompResult<()> {
        self.forward("record_job_end", || (), |backend| {
            backend.record_job_end(job, JobCompEvent::JobFinish)
        })
    }

    /// Query historical completion records
    ///
    /// # Returns
    /// Records owned by the caller; empty in NOOP mode
    pub fn get_jobs(&self, cond: &JobCond) -> JobCompResult<Vec<JobCompRecord>> {
        self.forward("get_jobs", Vec::new, |backend| backend.get_jobs(cond))
    }

    /// Re-run the backend's location setup, e.g. after log rotation
    pub fn set_location(&self) -> JobCompResult<()> {
        self.forward("set_location", || (), |backend| backend.set_location())
    }

    fn forward<T, N, F>(&self, op: &'static str, noop: N, call: F) -> JobCompResult<T>
    where
        N: FnOnce() -> T,
        F: FnOnce(&mut dyn JobCompBackend) -> JobCompResult<T>,
    {
        match self.context.state() {
            LifecycleState::Uninitialized => dispatch_before_init(op),
            LifecycleState::Noop => return Ok(noop()),
            LifecycleState::Active => {}
        }

        let mut slot = self.context.lock()?;
        if let Lifecycle::Active(backend) = &mut slot.lifecycle {
            log::debug!("jobcomp {op} -> {}", backend.backend_type());
            return call(backend.as_mut());
        }

        // fini (and possibly a NOOP re-init) won the race for the lock
        let state = slot.lifecycle.state();
        drop(slot);
        match state {
            LifecycleState::Noop => Ok(noop()),
            _ => dispatch_before_init(op),
        }
    }
}

#[cold]
#[track_caller]
fn dispatch_before_init(op: &str) -> ! {
    panic!("jobcomp {op} called before jobcomp init");
}
