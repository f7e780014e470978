use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Frame indices held by a paged allocation. Most jobs need only a handful of
/// 4 KB frames, so inline storage for 8 keeps the common case off the heap.
pub type FrameList = SmallVec<[u32; 8]>;

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
pub enum JobState {
    Ready,
    Running,
    Finished,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Ready => write!(f, "READY"),
            JobState::Running => write!(f, "RUNNING"),
            JobState::Finished => write!(f, "FINISHED"),
        }
    }
}

/// A job's memory allocation handle. Shape depends on the active strategy:
/// infinite jobs never hold one, first-fit jobs hold a KB start index,
/// paged jobs hold the list of frames they were assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Allocation {
    None,
    Contiguous { start_kb: u32 },
    Paged { frames: FrameList },
}

impl Allocation {
    pub fn is_none(&self) -> bool {
        matches!(self, Allocation::None)
    }

    pub fn frames(&self) -> &[u32] {
        match self {
            Allocation::Paged { frames } => frames.as_slice(),
            _ => &[],
        }
    }
}

/// Immutable descriptor for one input job, set once at construction.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct JobSpec {
    pub name: CompactString,
    pub arrival_time: u64,
    pub service_time: u64,
    pub memory_req: u64,
}

/// Mutable scheduling state for one job, advanced tick by tick by the
/// scheduler (and, for `alloc`, by the memory manager).
#[derive(Debug, Clone)]
pub struct JobRuntime {
    pub state: JobState,
    pub cpu_used: u64,
    pub completion_time: Option<u64>,
    pub alloc: Allocation,
    pub last_used: Option<u64>,
}

impl JobRuntime {
    pub fn new() -> Self {
        Self {
            state: JobState::Ready,
            cpu_used: 0,
            completion_time: None,
            alloc: Allocation::None,
            last_used: None,
        }
    }

    pub fn remaining_time(&self, spec: &JobSpec) -> u64 {
        spec.service_time.saturating_sub(self.cpu_used)
    }

    pub fn is_finished(&self) -> bool {
        self.state == JobState::Finished
    }
}

impl Default for JobRuntime {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing `JobSpec`s in tests and benchmarks, mirroring the
/// teacher's `JobBuilder` pattern for readable scenario setup.
#[derive(Default)]
pub struct JobBuilder {
    name: Option<CompactString>,
    arrival_time: u64,
    service_time: u64,
    memory_req: u64,
}

impl JobBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(CompactString::from(name.into()));
        self
    }

    pub fn arrival_time(mut self, arrival_time: u64) -> Self {
        self.arrival_time = arrival_time;
        self
    }

    pub fn service_time(mut self, service_time: u64) -> Self {
        self.service_time = service_time;
        self
    }

    pub fn memory_req(mut self, memory_req: u64) -> Self {
        self.memory_req = memory_req;
        self
    }

    pub fn build(self) -> JobSpec {
        JobSpec {
            name: self.name.unwrap_or_else(|| CompactString::const_new("job")),
            arrival_time: self.arrival_time,
            service_time: self.service_time,
            memory_req: self.memory_req,
        }
    }
}
