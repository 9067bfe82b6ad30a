//! # Frame Timing
//!
//! Rolling frame-time statistics used for the demo caption and the periodic
//! log line.
//!
//! ```rust
//! use std::time::Duration;
//! use tessera::performance::PerformanceMonitor;
//!
//! let mut monitor = PerformanceMonitor::new();
//! monitor.record_frame(Duration::from_millis(16), 3);
//! assert!(monitor.metrics().fps > 60.0);
//! ```

use std::collections::VecDeque;
use std::time::Duration;

/// Snapshot of the rolling window.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceMetrics {
    /// Frames per second over the window
    pub fps: f32,
    /// Average frame time in milliseconds
    pub frame_time_ms: f32,
    pub min_frame_time_ms: f32,
    pub max_frame_time_ms: f32,
    /// Entity render calls in the last frame
    pub draw_calls: usize,
    /// Frames recorded since creation
    pub total_frames: u64,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time_ms: 0.0,
            min_frame_time_ms: 0.0,
            max_frame_time_ms: 0.0,
            draw_calls: 0,
            total_frames: 0,
        }
    }
}

/// Keeps the most recent frame times and derives [`PerformanceMetrics`].
#[derive(Debug, Clone)]
pub struct PerformanceMonitor {
    frame_times: VecDeque<Duration>,
    max_samples: usize,
    metrics: PerformanceMetrics,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::with_samples(120) // ~2 seconds at 60fps
    }

    pub fn with_samples(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples,
            metrics: PerformanceMetrics::default(),
        }
    }

    /// Records one finished frame and refreshes the metrics.
    pub fn record_frame(&mut self, frame_time: Duration, draw_calls: usize) {
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(frame_time);

        self.metrics.draw_calls = draw_calls;
        self.metrics.total_frames += 1;
        self.update_metrics();
    }

    fn update_metrics(&mut self) {
        let total: Duration = self.frame_times.iter().sum();
        let avg_ms = total.as_secs_f32() * 1000.0 / self.frame_times.len() as f32;

        let (min, max) = self
            .frame_times
            .iter()
            .fold((f32::MAX, 0.0f32), |(min, max), t| {
                let ms = t.as_secs_f32() * 1000.0;
                (min.min(ms), max.max(ms))
            });

        self.metrics.frame_time_ms = avg_ms;
        self.metrics.fps = if avg_ms > 0.0 { 1000.0 / avg_ms } else { 0.0 };
        self.metrics.min_frame_time_ms = min;
        self.metrics.max_frame_time_ms = max;
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }

    pub fn reset(&mut self) {
        self.frame_times.clear();
        self.metrics = PerformanceMetrics::default();
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_from_average_frame_time() {
        let mut monitor = PerformanceMonitor::new();
        for _ in 0..10 {
            monitor.record_frame(Duration::from_millis(20), 2);
        }
        let metrics = monitor.metrics();
        assert!((metrics.fps - 50.0).abs() < 0.01);
        assert_eq!(metrics.draw_calls, 2);
        assert_eq!(metrics.total_frames, 10);
    }

    #[test]
    fn test_window_drops_oldest_samples() {
        let mut monitor = PerformanceMonitor::with_samples(2);
        monitor.record_frame(Duration::from_millis(100), 0);
        monitor.record_frame(Duration::from_millis(10), 0);
        monitor.record_frame(Duration::from_millis(10), 0);
        let metrics = monitor.metrics();
        assert!((metrics.max_frame_time_ms - 10.0).abs() < 0.01);
        assert_eq!(metrics.total_frames, 3);
    }

    #[test]
    fn test_zero_frame_time_reports_zero_fps() {
        let mut monitor = PerformanceMonitor::new();
        monitor.record_frame(Duration::ZERO, 0);
        assert_eq!(monitor.metrics().fps, 0.0);
    }
}
