// ============================================================================
// File: packages/jobcomp/src/jobs/cond.rs
// ----------------------------------------------------------------------------
// Historical query filter
// ============================================================================

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::{JobCompRecord, TIME_FORMAT};

/// Query filter for `get_jobs`
///
/// The dispatch facade treats it as opaque; only backends interpret it.
/// Empty lists and unset bounds match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCond {
    pub job_ids: Vec<u32>,
    pub user_names: Vec<String>,
    pub partitions: Vec<String>,
    pub states: Vec<String>,

    /// Only jobs still running at or after this instant
    pub usable_start: Option<DateTime<Utc>>,

    /// Only jobs started at or before this instant
    pub usable_end: Option<DateTime<Utc>>,
}

impl JobCond {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_job_id(mut self, job_id: u32) -> Self {
        self.job_ids.push(job_id);
        self
    }

    pub fn with_user<U: Into<String>>(mut self, user_name: U) -> Self {
        self.user_names.push(user_name.into());
        self
    }

    pub fn with_partition<P: Into<String>>(mut self, partition: P) -> Self {
        self.partitions.push(partition.into());
        self
    }

    pub fn with_state<S: Into<String>>(mut self, state: S) -> Self {
        self.states.push(state.into());
        self
    }

    pub fn with_window(mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        self.usable_start = start;
        self.usable_end = end;
        self
    }

    /// Check whether a completion record passes this filter
    pub fn matches(&self, record: &JobCompRecord) -> bool {
        if !self.job_ids.is_empty() && !record.job_id.is_some_and(|id| self.job_ids.contains(&id)) {
            return false;
        }
        if !contains(&self.user_names, record.uid_name.as_deref())
            || !contains(&self.partitions, record.partition.as_deref())
        {
            return false;
        }
        if !self.states.is_empty()
            && !record
                .state
                .as_deref()
                .is_some_and(|s| self.states.iter().any(|want| want.eq_ignore_ascii_case(s)))
        {
            return false;
        }

        // Records with missing or unparsable times are not excluded by the window
        if let (Some(start), Some(ended)) = (self.usable_start, parse_time(&record.end_time))
            && ended < start
        {
            return false;
        }
        if let (Some(end), Some(started)) = (self.usable_end, parse_time(&record.start_time))
            && started > end
        {
            return false;
        }

        true
    }
}

fn contains(wanted: &[String], value: Option<&str>) -> bool {
    wanted.is_empty() || value.is_some_and(|v| wanted.iter().any(|w| w == v))
}

fn parse_time(field: &Option<String>) -> Option<DateTime<Utc>> {
    field
        .as_deref()
        .and_then(|s| NaiveDateTime::parse_from_str(s, TIME_FORMAT).ok())
        .map(|t| t.and_utc())
}
