//! Rolling window of frame timings.
//!
//! Each loop iteration stamps the current slot's start and end, then
//! [`FrameInfoBuffer::advance`] moves to the next slot. Slots are not reset
//! on advance, so once the ring has wrapped the statistics always cover a
//! full window of past frames.

use crate::error::FrameInfoError;

/// Start and end of one frame in milliseconds. `-1` marks an unset field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    pub start: i64,
    pub end: i64,
}

impl FrameInfo {
    pub const UNSET: FrameInfo = FrameInfo { start: -1, end: -1 };

    pub fn is_complete(&self) -> bool {
        self.start != -1 && self.end != -1
    }
}

impl Default for FrameInfo {
    fn default() -> Self {
        Self::UNSET
    }
}

#[derive(Debug, Clone)]
pub struct FrameInfoBuffer {
    frames: Vec<FrameInfo>,
    current: usize,
}

impl FrameInfoBuffer {
    pub fn new(capacity: usize) -> Result<Self, FrameInfoError> {
        if capacity == 0 {
            return Err(FrameInfoError::ZeroCapacity);
        }
        Ok(Self {
            frames: vec![FrameInfo::UNSET; capacity],
            current: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.frames.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &FrameInfo {
        &self.frames[self.current]
    }

    pub fn current_mut(&mut self) -> &mut FrameInfo {
        &mut self.frames[self.current]
    }

    pub fn frames(&self) -> &[FrameInfo] {
        &self.frames
    }

    pub fn start_frame(&mut self, now_ms: i64) {
        self.current_mut().start = now_ms;
    }

    pub fn end_frame(&mut self, now_ms: i64) {
        self.current_mut().end = now_ms;
    }

    /// Move to the next slot, wrapping around. The slot keeps its old stamps
    /// until they are overwritten.
    pub fn advance(&mut self) {
        self.current = (self.current + 1) % self.frames.len();
    }

    /// Mean active time of every complete slot except the current one.
    ///
    /// `None` when no slot qualifies yet; this is never reported as zero.
    pub fn average_active_time(&self) -> Option<i64> {
        let mut total = 0i64;
        let mut count = 0i64;
        for (i, frame) in self.frames.iter().enumerate() {
            if i == self.current || !frame.is_complete() {
                continue;
            }
            total += frame.end - frame.start;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        Some(total / count)
    }

    /// Frames per second estimated from the spread of recorded start times.
    ///
    /// `n` starts spanning `duration` ms describe `n - 1` frame intervals.
    /// This is an average over the whole window, not an instantaneous rate.
    /// `None` until two distinct start times have been recorded.
    pub fn average_fps(&self) -> Option<i64> {
        let mut min_start = i64::MAX;
        let mut max_start = i64::MIN;
        let mut samples = 0i64;
        for frame in &self.frames {
            if frame.start == -1 {
                continue;
            }
            min_start = min_start.min(frame.start);
            max_start = max_start.max(frame.start);
            samples += 1;
        }
        if samples < 2 {
            return None;
        }
        let duration = max_start - min_start;
        if duration <= 0 {
            return None;
        }
        Some((samples - 1) * 1000 / duration)
    }

    /// Average active time as a percentage of the frame budget.
    pub fn load_percent(&self, target_frame_ms: i64) -> Option<i64> {
        if target_frame_ms <= 0 {
            return None;
        }
        self.average_active_time()
            .map(|active| active * 100 / target_frame_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp(ring: &mut FrameInfoBuffer, start: i64, end: i64) {
        ring.start_frame(start);
        ring.end_frame(end);
        ring.advance();
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(
            FrameInfoBuffer::new(0).unwrap_err(),
            FrameInfoError::ZeroCapacity
        );
    }

    #[test]
    fn test_new_ring_is_unset() {
        let ring = FrameInfoBuffer::new(4).unwrap();
        assert_eq!(ring.capacity(), 4);
        assert_eq!(ring.current_index(), 0);
        assert!(ring.frames().iter().all(|f| *f == FrameInfo::UNSET));
        assert_eq!(ring.average_active_time(), None);
        assert_eq!(ring.average_fps(), None);
    }

    #[test]
    fn test_advance_wraps_without_resetting() {
        let mut ring = FrameInfoBuffer::new(3).unwrap();
        stamp(&mut ring, 10, 12);
        stamp(&mut ring, 20, 22);
        stamp(&mut ring, 30, 32);
        assert_eq!(ring.current_index(), 0);
        assert_eq!(*ring.current(), FrameInfo { start: 10, end: 12 });
    }

    #[test]
    fn test_average_active_time_skips_current_and_unset() {
        let mut ring = FrameInfoBuffer::new(4).unwrap();
        stamp(&mut ring, 0, 4);
        stamp(&mut ring, 33, 39);
        // Current slot half-stamped: excluded either way.
        ring.start_frame(66);
        assert_eq!(ring.average_active_time(), Some(5));

        // A zero-length frame is real data, not "no data".
        let mut ring = FrameInfoBuffer::new(2).unwrap();
        stamp(&mut ring, 5, 5);
        assert_eq!(ring.average_active_time(), Some(0));
    }

    #[test]
    fn test_average_active_time_ignores_half_stamped_slot() {
        let mut ring = FrameInfoBuffer::new(3).unwrap();
        ring.start_frame(100);
        ring.advance();
        assert_eq!(ring.average_active_time(), None);
    }

    #[test]
    fn test_average_fps() {
        let mut ring = FrameInfoBuffer::new(4).unwrap();
        stamp(&mut ring, 1000, 1001);
        assert_eq!(ring.average_fps(), None);
        stamp(&mut ring, 1100, 1101);
        stamp(&mut ring, 1200, 1201);
        stamp(&mut ring, 1300, 1301);
        // Four starts over 300ms: three 100ms intervals.
        assert_eq!(ring.average_fps(), Some(10));
    }

    #[test]
    fn test_average_fps_same_start_is_no_data() {
        let mut ring = FrameInfoBuffer::new(3).unwrap();
        stamp(&mut ring, 7, 8);
        stamp(&mut ring, 7, 9);
        assert_eq!(ring.average_fps(), None);
    }

    #[test]
    fn test_load_percent() {
        let mut ring = FrameInfoBuffer::new(3).unwrap();
        stamp(&mut ring, 0, 11);
        assert_eq!(ring.load_percent(33), Some(33));
        assert_eq!(ring.load_percent(0), None);
    }
}
