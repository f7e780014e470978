use crate::core::job::{Allocation, FrameList};
use crate::core::Strategy;

/// Capacity of the contiguous first-fit arena, in KB.
pub const CONTIGUOUS_CAPACITY_KB: u64 = 2048;
/// Frame count and size of the paged allocator.
pub const PAGED_FRAME_COUNT: usize = 512;
pub const PAGED_FRAME_SIZE_KB: u64 = 4;
/// Total addressable capacity under the paged strategy, in KB.
pub const PAGED_CAPACITY_KB: u64 = PAGED_FRAME_COUNT as u64 * PAGED_FRAME_SIZE_KB;

/// Outcome of a residency request against the memory manager: admitted
/// outright, or blocked pending a rotation (first-fit) or eviction (paged).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmitOutcome {
    Admitted(Allocation),
    NeedsRotation,
    NeedsEviction,
}

fn ceil_div(numerator: u64, denominator: u64) -> u64 {
    (numerator + denominator - 1) / denominator
}

fn ceil_percent(count: u64, total: u64) -> u32 {
    ((count * 100 + total - 1) / total) as u32
}

#[derive(Debug)]
struct ContiguousAllocator {
    cells: Vec<bool>,
}

impl ContiguousAllocator {
    fn new() -> Self {
        Self {
            cells: vec![false; CONTIGUOUS_CAPACITY_KB as usize],
        }
    }

    fn admit(&mut self, memory_req: u64) -> AdmitOutcome {
        let needed = memory_req as usize;
        let mut run_start = None;
        let mut run_len = 0usize;
        for (idx, occupied) in self.cells.iter().enumerate() {
            if *occupied {
                run_start = None;
                run_len = 0;
                continue;
            }
            if run_start.is_none() {
                run_start = Some(idx);
            }
            run_len += 1;
            if run_len >= needed {
                break;
            }
        }
        match run_start {
            Some(start) if run_len >= needed => {
                for cell in &mut self.cells[start..start + needed] {
                    *cell = true;
                }
                AdmitOutcome::Admitted(Allocation::Contiguous {
                    start_kb: start as u32,
                })
            }
            _ => AdmitOutcome::NeedsRotation,
        }
    }

    fn free(&mut self, start_kb: u32, memory_req: u64) {
        let start = start_kb as usize;
        let end = start + memory_req as usize;
        for cell in &mut self.cells[start..end] {
            *cell = false;
        }
    }

    fn utilization(&self) -> u32 {
        let occupied = self.cells.iter().filter(|c| **c).count() as u64;
        ceil_percent(occupied, CONTIGUOUS_CAPACITY_KB)
    }
}

#[derive(Debug)]
struct PagedAllocator {
    frames: Vec<bool>,
}

impl PagedAllocator {
    fn new() -> Self {
        Self {
            frames: vec![false; PAGED_FRAME_COUNT],
        }
    }

    fn admit(&mut self, memory_req: u64) -> AdmitOutcome {
        let needed = ceil_div(memory_req, PAGED_FRAME_SIZE_KB) as usize;
        let free_frames: FrameList = self
            .frames
            .iter()
            .enumerate()
            .filter(|(_, occupied)| !**occupied)
            .take(needed)
            .map(|(idx, _)| idx as u32)
            .collect();
        if free_frames.len() < needed {
            return AdmitOutcome::NeedsEviction;
        }
        for &frame in &free_frames {
            self.frames[frame as usize] = true;
        }
        AdmitOutcome::Admitted(Allocation::Paged { frames: free_frames })
    }

    fn free(&mut self, frames: &[u32]) {
        for &frame in frames {
            self.frames[frame as usize] = false;
        }
    }

    fn utilization(&self) -> u32 {
        let bound = self.frames.iter().filter(|f| **f).count() as u64;
        ceil_percent(bound, PAGED_FRAME_COUNT as u64)
    }
}

/// Strategy-specific admission/eviction over a fixed KB arena or page array.
/// A tagged variant with three arms, selected once at startup and never
/// changed mid-run — this avoids virtual dispatch for what is, at scheduler
/// call sites, always a single match on a known-at-construction tag.
#[derive(Debug)]
pub enum MemoryManager {
    Infinite,
    Contiguous(ContiguousAllocator),
    Paged(PagedAllocator),
}

impl MemoryManager {
    pub fn new(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Infinite => MemoryManager::Infinite,
            Strategy::FirstFit => MemoryManager::Contiguous(ContiguousAllocator::new()),
            Strategy::Paged => MemoryManager::Paged(PagedAllocator::new()),
        }
    }

    /// Capacity a single job's `memory_req` must not exceed, or `None` for
    /// the infinite strategy (which has no capacity to exceed).
    pub fn capacity_kb(&self) -> Option<u64> {
        match self {
            MemoryManager::Infinite => None,
            MemoryManager::Contiguous(_) => Some(CONTIGUOUS_CAPACITY_KB),
            MemoryManager::Paged(_) => Some(PAGED_CAPACITY_KB),
        }
    }

    pub fn admit(&mut self, memory_req: u64) -> AdmitOutcome {
        match self {
            MemoryManager::Infinite => AdmitOutcome::Admitted(Allocation::None),
            MemoryManager::Contiguous(arena) => arena.admit(memory_req),
            MemoryManager::Paged(frames) => frames.admit(memory_req),
        }
    }

    /// Free the cells/frames named by `alloc`. `memory_req` is needed for the
    /// contiguous strategy, whose allocation handle carries only a start
    /// index, not a length.
    pub fn free(&mut self, alloc: &Allocation, memory_req: u64) {
        match (self, alloc) {
            (MemoryManager::Infinite, _) => {}
            (MemoryManager::Contiguous(arena), Allocation::Contiguous { start_kb }) => {
                arena.free(*start_kb, memory_req)
            }
            (MemoryManager::Paged(frames), Allocation::Paged { frames: held }) => {
                frames.free(held)
            }
            _ => {}
        }
    }

    /// Utilization percent, rounded up. `None` for the infinite strategy,
    /// which is never queried for it (it emits no memory fields).
    pub fn utilization(&self) -> Option<u32> {
        match self {
            MemoryManager::Infinite => None,
            MemoryManager::Contiguous(arena) => Some(arena.utilization()),
            MemoryManager::Paged(frames) => Some(frames.utilization()),
        }
    }
}
