use crate::core::job::FrameList;
use compact_str::CompactString;
use std::fmt;

/// The memory-related fields appended to a RUNNING line, if any. Absent under
/// the infinite strategy, which emits no memory fields at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryField {
    Contiguous { utilization_pct: u32, start_kb: u32 },
    Paged { utilization_pct: u32, frames: FrameList },
}

/// One line of the event trace, in the exact grammar of the external output
/// contract. `Display` is the only way this type produces text; there is no
/// other formatting path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    Running {
        time: u64,
        name: CompactString,
        remaining_time: u64,
        memory: Option<MemoryField>,
    },
    Finished {
        time: u64,
        name: CompactString,
        proc_remaining: usize,
    },
    Evicted {
        time: u64,
        frames: FrameList,
    },
}

fn write_frame_list(f: &mut fmt::Formatter<'_>, frames: &[u32]) -> fmt::Result {
    write!(f, "[")?;
    for (idx, frame) in frames.iter().enumerate() {
        if idx > 0 {
            write!(f, ",")?;
        }
        write!(f, "{frame}")?;
    }
    write!(f, "]")
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Running {
                time,
                name,
                remaining_time,
                memory,
            } => {
                write!(
                    f,
                    "{time},RUNNING,process-name={name},remaining-time={remaining_time}"
                )?;
                match memory {
                    None => Ok(()),
                    Some(MemoryField::Contiguous {
                        utilization_pct,
                        start_kb,
                    }) => write!(f, ",mem-usage={utilization_pct}%,allocated-at={start_kb}"),
                    Some(MemoryField::Paged {
                        utilization_pct,
                        frames,
                    }) => {
                        write!(f, ",mem-usage={utilization_pct}%,mem-frames=")?;
                        write_frame_list(f, frames)
                    }
                }
            }
            TraceEvent::Finished {
                time,
                name,
                proc_remaining,
            } => write!(
                f,
                "{time},FINISHED,process-name={name},proc-remaining={proc_remaining}"
            ),
            TraceEvent::Evicted { time, frames } => {
                write!(f, "{time},EVICTED,evicted-frames=")?;
                write_frame_list(f, frames)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_without_memory_field() {
        let ev = TraceEvent::Running {
            time: 0,
            name: CompactString::from("P1"),
            remaining_time: 6,
            memory: None,
        };
        assert_eq!(ev.to_string(), "0,RUNNING,process-name=P1,remaining-time=6");
    }

    #[test]
    fn running_with_contiguous_memory_field() {
        let ev = TraceEvent::Running {
            time: 0,
            name: CompactString::from("A"),
            remaining_time: 6,
            memory: Some(MemoryField::Contiguous {
                utilization_pct: 49,
                start_kb: 0,
            }),
        };
        assert_eq!(
            ev.to_string(),
            "0,RUNNING,process-name=A,remaining-time=6,mem-usage=49%,allocated-at=0"
        );
    }

    #[test]
    fn running_with_paged_memory_field_has_no_spaces_in_frame_list() {
        let ev = TraceEvent::Running {
            time: 3,
            name: CompactString::from("B"),
            remaining_time: 3,
            memory: Some(MemoryField::Paged {
                utilization_pct: 100,
                frames: FrameList::from_slice(&[0, 1, 2]),
            }),
        };
        assert_eq!(
            ev.to_string(),
            "3,RUNNING,process-name=B,remaining-time=3,mem-usage=100%,mem-frames=[0,1,2]"
        );
    }

    #[test]
    fn finished_line() {
        let ev = TraceEvent::Finished {
            time: 9,
            name: CompactString::from("P2"),
            proc_remaining: 1,
        };
        assert_eq!(ev.to_string(), "9,FINISHED,process-name=P2,proc-remaining=1");
    }

    #[test]
    fn evicted_line_lists_frames_ascending_with_no_spaces() {
        let ev = TraceEvent::Evicted {
            time: 6,
            frames: FrameList::from_slice(&[0, 1, 255]),
        };
        assert_eq!(ev.to_string(), "6,EVICTED,evicted-frames=[0,1,255]");
    }
}
