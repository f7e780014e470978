use std::fmt;

/// Per-job facts needed to compute end-of-run statistics. Distinct from
/// `JobRuntime` because statistics only ever look at finished jobs, by value,
/// after the run is over.
#[derive(Debug, Clone, Copy)]
pub struct JobOutcome {
    pub arrival_time: u64,
    pub completion_time: u64,
    pub service_time: u64,
}

impl JobOutcome {
    pub fn turnaround(&self) -> u64 {
        self.completion_time - self.arrival_time
    }

    pub fn overhead(&self) -> f64 {
        self.turnaround() as f64 / self.service_time as f64
    }
}

fn ceil_div(numerator: u64, denominator: u64) -> u64 {
    (numerator + denominator - 1) / denominator
}

/// `f64::round` already rounds half away from zero, matching the contract.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub avg_turnaround: u64,
    pub max_overhead: f64,
    pub avg_overhead: f64,
    pub makespan: u64,
}

impl Statistics {
    /// Computes the three end-of-run statistics from every job's outcome.
    /// Panics if `outcomes` is empty; unreachable in practice because
    /// `Scheduler::new` rejects an empty job list with `SimError::NoJobs`
    /// before a run can ever reach completion.
    pub fn compute(outcomes: &[JobOutcome]) -> Self {
        assert!(!outcomes.is_empty(), "cannot compute statistics over zero jobs");

        let n = outcomes.len() as u64;
        let turnaround_sum: u64 = outcomes.iter().map(JobOutcome::turnaround).sum();
        let avg_turnaround = ceil_div(turnaround_sum, n);

        let overheads: Vec<f64> = outcomes.iter().map(JobOutcome::overhead).collect();
        let max_overhead = round2(overheads.iter().cloned().fold(f64::MIN, f64::max));
        let avg_overhead = round2(overheads.iter().sum::<f64>() / n as f64);

        let makespan = outcomes
            .iter()
            .map(|o| o.completion_time)
            .max()
            .expect("checked non-empty above");

        Statistics {
            avg_turnaround,
            max_overhead,
            avg_overhead,
            makespan,
        }
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Turnaround time {}", self.avg_turnaround)?;
        writeln!(
            f,
            "Time overhead {:.2} {:.2}",
            self.max_overhead, self.avg_overhead
        )?;
        write!(f, "Makespan {}", self.makespan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s1_scenario_matches_spec_s6() {
        let outcomes = vec![
            JobOutcome {
                arrival_time: 0,
                completion_time: 12,
                service_time: 6,
            },
            JobOutcome {
                arrival_time: 1,
                completion_time: 9,
                service_time: 3,
            },
        ];
        let stats = Statistics::compute(&outcomes);
        assert_eq!(stats.avg_turnaround, 10);
        assert_eq!(stats.makespan, 12);
        assert!((stats.max_overhead - 2.67).abs() < f64::EPSILON);
        assert!((stats.avg_overhead - 2.33).abs() < f64::EPSILON);
    }

    #[test]
    fn display_formats_two_decimal_places() {
        let outcomes = vec![JobOutcome {
            arrival_time: 0,
            completion_time: 6,
            service_time: 6,
        }];
        let stats = Statistics::compute(&outcomes);
        let rendered = stats.to_string();
        assert_eq!(rendered, "Turnaround time 6\nTime overhead 1.00 1.00\nMakespan 6");
    }

    #[test]
    fn avg_turnaround_rounds_up() {
        let outcomes = vec![
            JobOutcome {
                arrival_time: 0,
                completion_time: 1,
                service_time: 1,
            },
            JobOutcome {
                arrival_time: 0,
                completion_time: 2,
                service_time: 1,
            },
        ];
        // sum = 3, n = 2, ceil(3/2) = 2.
        assert_eq!(Statistics::compute(&outcomes).avg_turnaround, 2);
    }
}
