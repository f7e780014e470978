use crate::core::error::SimError;
use crate::core::job::{Allocation, JobRuntime, JobSpec, JobState};
use crate::core::memory::{AdmitOutcome, MemoryManager};
use crate::core::queue::ReadyQueue;
use crate::core::stats::{JobOutcome, Statistics};
use crate::core::trace::{MemoryField, TraceEvent};
use crate::core::Strategy;
use std::collections::HashSet;

/// Everything a completed run produced: the line-oriented event trace and the
/// three end-of-run statistics.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub trace: Vec<TraceEvent>,
    pub statistics: Statistics,
}

fn validate_name(name: &str) -> Result<(), SimError> {
    let ok = !name.is_empty() && name.len() <= 8 && name.chars().all(|c| c.is_ascii_alphanumeric());
    if ok {
        Ok(())
    } else {
        Err(SimError::InvalidJobName {
            name: name.to_string(),
        })
    }
}

fn validate_jobs(jobs: &[JobSpec], capacity_kb: Option<u64>) -> Result<(), SimError> {
    if jobs.is_empty() {
        return Err(SimError::NoJobs);
    }
    let mut seen = HashSet::new();
    for job in jobs {
        validate_name(job.name.as_str())?;
        if !seen.insert(job.name.clone()) {
            return Err(SimError::DuplicateJobName {
                name: job.name.clone(),
            });
        }
        if job.service_time == 0 {
            return Err(SimError::NonPositiveServiceTime {
                name: job.name.clone(),
            });
        }
        if job.memory_req == 0 {
            return Err(SimError::NonPositiveMemoryRequirement {
                name: job.name.clone(),
            });
        }
        if let Some(capacity) = capacity_kb {
            if job.memory_req > capacity {
                return Err(SimError::MemoryRequirementExceedsCapacity {
                    name: job.name.clone(),
                    memory_req: job.memory_req,
                    capacity,
                });
            }
        }
    }
    Ok(())
}

/// Drives the job list to completion: a single-CPU round-robin scheduler
/// coupled with one memory allocation strategy. Owns every piece of
/// simulation state; the memory manager and ready queue are subordinate, not
/// peers (see the concurrency model: one actor, no locks).
pub struct Scheduler {
    specs: Vec<JobSpec>,
    runtimes: Vec<JobRuntime>,
    queue: ReadyQueue,
    memory: MemoryManager,
    quantum: u64,
    time: u64,
    next_arrival_idx: usize,
    finished_count: usize,
    trace: Vec<TraceEvent>,
}

impl Scheduler {
    /// Jobs must already be sorted by non-decreasing `arrival_time`, as the
    /// external input contract guarantees.
    pub fn new(jobs: Vec<JobSpec>, strategy: Strategy, quantum: u64) -> Result<Self, SimError> {
        if quantum == 0 {
            return Err(SimError::NonPositiveQuantum);
        }
        let memory = MemoryManager::new(strategy);
        validate_jobs(&jobs, memory.capacity_kb())?;

        let runtimes = jobs.iter().map(|_| JobRuntime::new()).collect();
        Ok(Self {
            specs: jobs,
            runtimes,
            queue: ReadyQueue::new(),
            memory,
            quantum,
            time: 0,
            next_arrival_idx: 0,
            finished_count: 0,
            trace: Vec::new(),
        })
    }

    fn admit_arrivals(&mut self) {
        while self.next_arrival_idx < self.specs.len()
            && self.specs[self.next_arrival_idx].arrival_time <= self.time
        {
            let idx = self.next_arrival_idx;
            self.queue.push_back(idx);
            self.runtimes[idx].state = JobState::Ready;
            self.next_arrival_idx += 1;
            tracing::debug!(
                time = self.time,
                job = %self.specs[idx].name,
                "job admitted to the ready queue"
            );
        }
    }

    fn next_arrival_time(&self) -> Option<u64> {
        self.specs.get(self.next_arrival_idx).map(|s| s.arrival_time)
    }

    /// True if `candidate`'s `last_used` is strictly older than `current`'s,
    /// treating "never run" (`None`) as older than any tick. Ties keep
    /// `current` so the lowest job index wins (callers scan ascending).
    fn is_older(candidate: Option<u64>, current: Option<u64>) -> bool {
        match (candidate, current) {
            (None, None) => false,
            (None, Some(_)) => true,
            (Some(_), None) => false,
            (Some(a), Some(b)) => a < b,
        }
    }

    fn evict_lru(&mut self) -> Result<(), SimError> {
        let mut victim = None;
        for idx in 0..self.specs.len() {
            let rt = &self.runtimes[idx];
            if rt.state == JobState::Finished || rt.state == JobState::Running {
                continue;
            }
            if rt.alloc.frames().is_empty() {
                continue;
            }
            victim = match victim {
                None => Some(idx),
                Some(v) if Self::is_older(rt.last_used, self.runtimes[v].last_used) => Some(idx),
                Some(v) => Some(v),
            };
        }
        let victim = victim.ok_or(SimError::EvictionFoundNoVictim)?;
        let frames: Vec<u32> = self.runtimes[victim].alloc.frames().to_vec();
        tracing::info!(
            time = self.time,
            job = %self.specs[victim].name,
            frame_count = frames.len(),
            last_used = ?self.runtimes[victim].last_used,
            "evicting LRU victim to admit the head of the queue"
        );
        self.trace.push(TraceEvent::Evicted {
            time: self.time,
            frames: frames.into_iter().collect(),
        });
        self.memory
            .free(&self.runtimes[victim].alloc, self.specs[victim].memory_req);
        self.runtimes[victim].alloc = Allocation::None;
        Ok(())
    }

    /// Loops `admit` on the head until it is resident, rotating (first-fit)
    /// or evicting (paged) as the memory manager demands. A no-op for jobs
    /// that already hold a valid allocation from a prior quantum.
    fn ensure_residency(&mut self) -> Result<(), SimError> {
        let mut rotations_without_progress = 0usize;
        loop {
            let head = self.queue.front().ok_or(SimError::QueueUnderflow)?;
            if !self.runtimes[head].alloc.is_none() {
                return Ok(());
            }
            match self.memory.admit(self.specs[head].memory_req) {
                AdmitOutcome::Admitted(alloc) => {
                    self.runtimes[head].alloc = alloc;
                    return Ok(());
                }
                AdmitOutcome::NeedsRotation => {
                    tracing::debug!(
                        time = self.time,
                        job = %self.specs[head].name,
                        memory_req = self.specs[head].memory_req,
                        "head does not fit in the arena yet, rotating"
                    );
                    self.queue.rotate();
                    rotations_without_progress += 1;
                    // validate_jobs guarantees every job's memory_req fits the
                    // arena in isolation, so a full lap of the queue without a
                    // single admission means the arena can never drain far
                    // enough: a bug, not a reachable runtime state.
                    if rotations_without_progress > self.queue.len() {
                        tracing::warn!(
                            job = %self.specs[head].name,
                            "a full lap of the queue admitted nothing, admission is infeasible"
                        );
                        return Err(SimError::AdmissionInfeasible {
                            name: self.specs[head].name.clone(),
                        });
                    }
                }
                AdmitOutcome::NeedsEviction => {
                    tracing::debug!(
                        time = self.time,
                        job = %self.specs[head].name,
                        memory_req = self.specs[head].memory_req,
                        "head needs frames, triggering LRU eviction"
                    );
                    self.evict_lru()?;
                }
            }
        }
    }

    fn memory_field(&self, idx: usize) -> Option<MemoryField> {
        match &self.runtimes[idx].alloc {
            Allocation::None => None,
            Allocation::Contiguous { start_kb } => Some(MemoryField::Contiguous {
                utilization_pct: self
                    .memory
                    .utilization()
                    .expect("contiguous strategy reports utilization"),
                start_kb: *start_kb,
            }),
            Allocation::Paged { frames } => Some(MemoryField::Paged {
                utilization_pct: self
                    .memory
                    .utilization()
                    .expect("paged strategy reports utilization"),
                frames: frames.clone(),
            }),
        }
    }

    /// Frees `idx`'s allocation. Under paged, emits the EVICTED line for the
    /// freed frames before freeing them, matching natural-completion release.
    fn release(&mut self, idx: usize) {
        let alloc = self.runtimes[idx].alloc.clone();
        if let Allocation::Paged { frames } = &alloc {
            if !frames.is_empty() {
                self.trace.push(TraceEvent::Evicted {
                    time: self.time,
                    frames: frames.clone(),
                });
            }
        }
        self.memory.free(&alloc, self.specs[idx].memory_req);
        self.runtimes[idx].alloc = Allocation::None;
    }

    /// Runs every job to completion and returns the full trace plus
    /// statistics. Consumes the scheduler: a run is one-shot.
    pub fn run(mut self) -> Result<RunOutput, SimError> {
        let total = self.specs.len();
        loop {
            self.admit_arrivals();
            if self.finished_count == total {
                break;
            }

            let head = match self.queue.front() {
                Some(head) => head,
                None => {
                    let next_t = self
                        .next_arrival_time()
                        .expect("queue empty with jobs remaining implies a pending arrival");
                    tracing::debug!(
                        from = self.time,
                        to = next_t,
                        "CPU idle, jumping to the next arrival"
                    );
                    self.time = next_t;
                    continue;
                }
            };

            self.ensure_residency()?;

            if self.runtimes[head].state == JobState::Ready {
                self.runtimes[head].state = JobState::Running;
                let remaining = self.runtimes[head].remaining_time(&self.specs[head]);
                let memory = self.memory_field(head);
                self.trace.push(TraceEvent::Running {
                    time: self.time,
                    name: self.specs[head].name.clone(),
                    remaining_time: remaining,
                    memory,
                });
            }

            self.runtimes[head].cpu_used += self.quantum;
            self.time += self.quantum;
            self.runtimes[head].last_used = Some(self.time - self.quantum);
            self.admit_arrivals();

            if self.runtimes[head].cpu_used >= self.specs[head].service_time {
                self.runtimes[head].state = JobState::Finished;
                self.runtimes[head].completion_time = Some(self.time);
                self.release(head);
                self.queue.pop_front();
                self.finished_count += 1;
                let proc_remaining = self.queue.len();
                tracing::debug!(
                    time = self.time,
                    job = %self.specs[head].name,
                    proc_remaining,
                    "job finished"
                );
                self.trace.push(TraceEvent::Finished {
                    time: self.time,
                    name: self.specs[head].name.clone(),
                    proc_remaining,
                });
            } else if self.queue.len() > 1 {
                tracing::debug!(
                    time = self.time,
                    job = %self.specs[head].name,
                    "quantum elapsed, rotating to the next ready job"
                );
                self.queue.rotate();
                self.runtimes[head].state = JobState::Ready;
            }
        }

        let outcomes: Vec<JobOutcome> = self
            .specs
            .iter()
            .zip(self.runtimes.iter())
            .map(|(spec, rt)| JobOutcome {
                arrival_time: spec.arrival_time,
                completion_time: rt
                    .completion_time
                    .expect("loop only exits once every job is finished"),
                service_time: spec.service_time,
            })
            .collect();
        let statistics = Statistics::compute(&outcomes);
        Ok(RunOutput {
            trace: self.trace,
            statistics,
        })
    }
}

/// Builder for assembling a `Scheduler` from loosely-typed pieces, for
/// readable test and CLI setup.
#[derive(Default)]
pub struct SchedulerBuilder {
    jobs: Vec<JobSpec>,
    strategy: Option<Strategy>,
    quantum: Option<u64>,
}

impl SchedulerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jobs(mut self, jobs: Vec<JobSpec>) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn quantum(mut self, quantum: u64) -> Self {
        self.quantum = Some(quantum);
        self
    }

    pub fn build(self) -> Result<Scheduler, SimError> {
        let strategy = self.strategy.unwrap_or(Strategy::Infinite);
        let quantum = self.quantum.unwrap_or(1);
        Scheduler::new(self.jobs, strategy, quantum)
    }
}
