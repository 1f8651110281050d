// ============================================================================
// File: packages/jobcomp/src/jobs/job.rs
// ----------------------------------------------------------------------------
// Job snapshot passed from the daemon to backends
// ============================================================================

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Job state as seen by completion logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    Pending,
    Running,
    Suspended,
    Completed,
    Cancelled,
    Failed,
    Timeout,
    NodeFail,
    Preempted,
    BootFail,
    Deadline,
    OutOfMemory,
}

impl JobState {
    /// Uppercase name used in completion records
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Pending => "PENDING",
            JobState::Running => "RUNNING",
            JobState::Suspended => "SUSPENDED",
            JobState::Completed => "COMPLETED",
            JobState::Cancelled => "CANCELLED",
            JobState::Failed => "FAILED",
            JobState::Timeout => "TIMEOUT",
            JobState::NodeFail => "NODE_FAIL",
            JobState::Preempted => "PREEMPTED",
            JobState::BootFail => "BOOT_FAIL",
            JobState::Deadline => "DEADLINE",
            JobState::OutOfMemory => "OUT_OF_MEMORY",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Block allocation details for partitions scheduled as node blocks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockGeometry {
    pub block_id: Option<String>,
    pub connection: Option<String>,
    pub reboot: bool,
    pub rotate: bool,
    pub geometry: Option<String>,
    pub start_point: Option<String>,
}

/// Snapshot of a job at a state transition
///
/// Backends read it during a single call and must not keep references to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: u32,
    pub name: Option<String>,
    pub user_id: u32,
    pub user_name: Option<String>,
    pub group_id: u32,
    pub group_name: Option<String>,
    pub partition: Option<String>,
    pub nodes: Option<String>,
    pub node_cnt: u32,
    pub cpu_cnt: u32,
    pub state: JobState,

    /// Time limit in minutes, `None` is unlimited
    pub time_limit: Option<u32>,

    pub submit_time: Option<DateTime<Utc>>,
    pub eligible_time: Option<DateTime<Utc>>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub work_dir: Option<String>,
    pub resv_name: Option<String>,
    pub tres_req_str: Option<String>,
    pub account: Option<String>,
    pub qos_name: Option<String>,
    pub wckey: Option<String>,
    pub cluster: Option<String>,

    /// Raw wait status of the batch step
    pub exit_code: u32,

    /// Highest wait status over all steps
    pub derived_ec: u32,

    pub block: Option<BlockGeometry>,
}

impl JobRecord {
    /// Create a pending job snapshot with every optional field unset
    pub fn new(job_id: u32) -> Self {
        Self {
            job_id,
            name: None,
            user_id: 0,
            user_name: None,
            group_id: 0,
            group_name: None,
            partition: None,
            nodes: None,
            node_cnt: 0,
            cpu_cnt: 0,
            state: JobState::Pending,
            time_limit: None,
            submit_time: None,
            eligible_time: None,
            start_time: None,
            end_time: None,
            work_dir: None,
            resv_name: None,
            tres_req_str: None,
            account: None,
            qos_name: None,
            wckey: None,
            cluster: None,
            exit_code: 0,
            derived_ec: 0,
            block: None,
        }
    }

    pub fn with_name<N: Into<String>>(mut self, name: N) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_user<U: Into<String>>(mut self, uid: u32, user_name: U) -> Self {
        self.user_id = uid;
        self.user_name = Some(user_name.into());
        self
    }

    pub fn with_group<G: Into<String>>(mut self, gid: u32, group_name: G) -> Self {
        self.group_id = gid;
        self.group_name = Some(group_name.into());
        self
    }

    pub fn with_partition<P: Into<String>>(mut self, partition: P) -> Self {
        self.partition = Some(partition.into());
        self
    }

    pub fn with_nodes<N: Into<String>>(mut self, nodes: N, node_cnt: u32, cpu_cnt: u32) -> Self {
        self.nodes = Some(nodes.into());
        self.node_cnt = node_cnt;
        self.cpu_cnt = cpu_cnt;
        self
    }

    pub fn with_state(mut self, state: JobState) -> Self {
        self.state = state;
        self
    }

    pub fn with_time_limit(mut self, minutes: u32) -> Self {
        self.time_limit = Some(minutes);
        self
    }

    pub fn with_submit_time(mut self, at: DateTime<Utc>) -> Self {
        self.submit_time = Some(at);
        self
    }

    pub fn with_eligible_time(mut self, at: DateTime<Utc>) -> Self {
        self.eligible_time = Some(at);
        self
    }

    pub fn with_start_time(mut self, at: DateTime<Utc>) -> Self {
        self.start_time = Some(at);
        self
    }

    pub fn with_end_time(mut self, at: DateTime<Utc>) -> Self {
        self.end_time = Some(at);
        self
    }

    pub fn with_work_dir<W: Into<String>>(mut self, dir: W) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    pub fn with_account<A: Into<String>>(mut self, account: A) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn with_qos<Q: Into<String>>(mut self, qos: Q) -> Self {
        self.qos_name = Some(qos.into());
        self
    }

    pub fn with_cluster<C: Into<String>>(mut self, cluster: C) -> Self {
        self.cluster = Some(cluster.into());
        self
    }

    pub fn with_exit_code(mut self, exit_code: u32, derived_ec: u32) -> Self {
        self.exit_code = exit_code;
        self.derived_ec = derived_ec;
        self
    }

    pub fn with_block(mut self, block: BlockGeometry) -> Self {
        self.block = Some(block);
        self
    }
}
