use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Frame metadata - carries frame number and timing info
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    pub time: f32,
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32) -> Self {
        Self { number, time, delta }
    }
}

/// Frame driver: yields one item per frame the viewer should render
pub trait FrameSource: Iterator<Item = FrameInfo> {
    /// Delta time of the last yielded frame in seconds
    fn delta_time(&self) -> f32;

    /// Number of frames yielded so far
    fn frame_count(&self) -> u64;
}

const RUNNING: u8 = 0;
const PAUSED: u8 = 1;
const CANCELLED: u8 = 2;

/// Shared switch for stopping or pausing a frame source from outside the loop
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    state: Arc<AtomicU8>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop for good. Later `resume` calls have no effect.
    pub fn cancel(&self) {
        self.state.store(CANCELLED, Ordering::Release);
    }

    pub fn pause(&self) {
        let _ = self
            .state
            .compare_exchange(RUNNING, PAUSED, Ordering::AcqRel, Ordering::Acquire);
    }

    pub fn resume(&self) {
        let _ = self
            .state
            .compare_exchange(PAUSED, RUNNING, Ordering::AcqRel, Ordering::Acquire);
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.load(Ordering::Acquire) == CANCELLED
    }

    pub fn is_paused(&self) -> bool {
        self.state.load(Ordering::Acquire) == PAUSED
    }

    fn is_running(&self) -> bool {
        self.state.load(Ordering::Acquire) == RUNNING
    }
}

/// Wall-clock frame source, infinite until cancelled.
/// While paused `next` returns `None` and the clock keeps running.
pub struct FrameIterator {
    frame_number: u64,
    start_time: Instant,
    last_frame_time: Instant,
    last_delta: f32,
    handle: CancelHandle,
}

impl FrameIterator {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            frame_number: 0,
            start_time: now,
            last_frame_time: now,
            last_delta: 0.0,
            handle: CancelHandle::new(),
        }
    }

    pub fn handle(&self) -> CancelHandle {
        self.handle.clone()
    }

    pub fn time(&self) -> f32 {
        self.start_time.elapsed().as_secs_f32()
    }
}

impl Default for FrameIterator {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for FrameIterator {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        if !self.handle.is_running() {
            return None;
        }

        let now = Instant::now();
        let delta = now.duration_since(self.last_frame_time).as_secs_f32();
        let time = now.duration_since(self.start_time).as_secs_f32();

        let info = FrameInfo::new(self.frame_number, time, delta);

        self.frame_number += 1;
        self.last_frame_time = now;
        self.last_delta = delta;

        Some(info)
    }
}

impl FrameSource for FrameIterator {
    fn delta_time(&self) -> f32 {
        self.last_delta
    }

    fn frame_count(&self) -> u64 {
        self.frame_number
    }
}

/// Deterministic frame source with a fixed delta, for tests and headless runs
#[derive(Debug, Clone)]
pub struct FixedStep {
    frame_number: u64,
    delta: f32,
    limit: Option<u64>,
    handle: CancelHandle,
}

impl FixedStep {
    /// Infinite source ticking at `fps`
    pub fn new(fps: f32) -> Self {
        Self {
            frame_number: 0,
            delta: if fps > 0.0 { 1.0 / fps } else { 0.0 },
            limit: None,
            handle: CancelHandle::new(),
        }
    }

    /// Stop after `frames` frames
    pub fn with_limit(mut self, frames: u64) -> Self {
        self.limit = Some(frames);
        self
    }

    pub fn handle(&self) -> CancelHandle {
        self.handle.clone()
    }
}

impl Iterator for FixedStep {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        if !self.handle.is_running() || self.limit.is_some_and(|limit| self.frame_number >= limit) {
            return None;
        }

        let info = FrameInfo::new(
            self.frame_number,
            self.frame_number as f32 * self.delta,
            self.delta,
        );
        self.frame_number += 1;
        Some(info)
    }
}

impl FrameSource for FixedStep {
    fn delta_time(&self) -> f32 {
        self.delta
    }

    fn frame_count(&self) -> u64 {
        self.frame_number
    }
}
