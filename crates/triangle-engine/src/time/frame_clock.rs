use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Averages over one reporting window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameSummary {
    pub frames: u64,
    /// Mean clamped delta time in milliseconds.
    pub avg_frame_ms: f32,
    pub fps: f32,
}

/// Frame clock producing `FrameTime` snapshots and periodic summaries.
///
/// Delta time is clamped so a stall (debugger, minimized window) does not
/// produce a pathological value.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,

    report_every: Duration,
    window_start: Instant,
    window_frames: u64,
    window_dt: Duration,
}

impl FrameClock {
    /// Default clamps are 0.1 ms and 250 ms; summaries every 5 s.
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self {
            last: now,
            frame_index: 0,
            dt_min,
            dt_max,
            report_every: Duration::from_secs(5),
            window_start: now,
            window_frames: 0,
            window_dt: Duration::ZERO,
        }
    }

    /// Sets how much wall time each `FrameSummary` covers.
    pub fn report_every(mut self, interval: Duration) -> Self {
        self.report_every = interval;
        self
    }

    /// Resets the baseline, e.g. after the window was restored.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);
        self.window_frames += 1;
        self.window_dt += dt;

        ft
    }

    /// Returns the summary for the current window once `report_every` has
    /// elapsed, and starts a new window.
    pub fn take_summary(&mut self) -> Option<FrameSummary> {
        self.take_summary_at(Instant::now())
    }

    fn take_summary_at(&mut self, now: Instant) -> Option<FrameSummary> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.report_every || self.window_frames == 0 {
            return None;
        }

        let summary = FrameSummary {
            frames: self.window_frames,
            avg_frame_ms: self.window_dt.as_secs_f32() * 1000.0 / self.window_frames as f32,
            fps: self.window_frames as f32 / elapsed.as_secs_f32(),
        };

        self.window_start = now;
        self.window_frames = 0;
        self.window_dt = Duration::ZERO;
        Some(summary)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_clamped_both_ways() {
        let mut clock = FrameClock::new();
        let start = clock.last;

        let ft = clock.tick_at(start);
        assert!((ft.dt - 0.0001).abs() < 1e-6);

        let ft = clock.tick_at(start + Duration::from_secs(10));
        assert!((ft.dt - 0.25).abs() < 1e-6);
    }

    #[test]
    fn frame_index_counts_from_zero() {
        let mut clock = FrameClock::new();
        let start = clock.last;
        let a = clock.tick_at(start + Duration::from_millis(16));
        let b = clock.tick_at(start + Duration::from_millis(32));
        assert_eq!((a.frame_index, b.frame_index), (0, 1));
    }

    #[test]
    fn summary_only_after_interval() {
        let mut clock = FrameClock::new().report_every(Duration::from_secs(1));
        let start = clock.window_start;

        for i in 1..=10 {
            clock.tick_at(start + Duration::from_millis(50 * i));
        }
        assert_eq!(clock.take_summary_at(start + Duration::from_millis(500)), None);

        let summary = clock
            .take_summary_at(start + Duration::from_secs(1))
            .unwrap();
        assert_eq!(summary.frames, 10);
        assert!((summary.avg_frame_ms - 50.0).abs() < 0.01);
        assert!((summary.fps - 10.0).abs() < 0.01);

        assert_eq!(clock.take_summary_at(start + Duration::from_secs(3)), None);
    }
}
