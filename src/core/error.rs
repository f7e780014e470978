use compact_str::CompactString;
use std::fmt;

/// Errors the simulator can raise: malformed input is the caller's fault,
/// invariant violations are ours.
#[derive(Debug)]
pub enum SimError {
    /// The input job list is empty; there is nothing to schedule.
    NoJobs,
    /// A job name is empty, longer than 8 characters, or not alphanumeric.
    InvalidJobName { name: String },
    /// Two jobs in the input share a name.
    DuplicateJobName { name: CompactString },
    /// `service_time` must be a positive integer.
    NonPositiveServiceTime { name: CompactString },
    /// `memory_req` must be a positive integer.
    NonPositiveMemoryRequirement { name: CompactString },
    /// `memory_req` exceeds the capacity the selected strategy can ever grant.
    MemoryRequirementExceedsCapacity {
        name: CompactString,
        memory_req: u64,
        capacity: u64,
    },
    /// `quantum` must be a positive integer.
    NonPositiveQuantum,
    /// Attempted to dequeue from an empty ready queue.
    QueueUnderflow,
    /// Paged eviction was asked for a victim but no non-running job holds frames.
    EvictionFoundNoVictim,
    /// First-fit admission can never succeed for this job under any queue order.
    AdmissionInfeasible { name: CompactString },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::NoJobs => write!(f, "job list is empty: nothing to schedule"),
            SimError::InvalidJobName { name } => {
                write!(f, "job name {name:?} must be 1-8 alphanumeric characters")
            }
            SimError::DuplicateJobName { name } => {
                write!(f, "job name {name} is not unique across the run")
            }
            SimError::NonPositiveServiceTime { name } => {
                write!(f, "job {name} has a non-positive service_time")
            }
            SimError::NonPositiveMemoryRequirement { name } => {
                write!(f, "job {name} has a non-positive memory_req")
            }
            SimError::MemoryRequirementExceedsCapacity {
                name,
                memory_req,
                capacity,
            } => write!(
                f,
                "job {name} requires {memory_req} KB, which exceeds the {capacity} KB capacity"
            ),
            SimError::NonPositiveQuantum => write!(f, "quantum must be a positive integer"),
            SimError::QueueUnderflow => {
                write!(f, "invariant violated: dequeue on an empty ready queue")
            }
            SimError::EvictionFoundNoVictim => write!(
                f,
                "invariant violated: LRU eviction found no non-running victim holding frames"
            ),
            SimError::AdmissionInfeasible { name } => write!(
                f,
                "invariant violated: job {name} can never be admitted under first-fit"
            ),
        }
    }
}

impl std::error::Error for SimError {}
