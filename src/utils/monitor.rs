use crate::domain::model::SessionSummary;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct SessionStats {
    pub frames: u64,
    pub frames_per_second: f64,
    pub match_rate_percent: f64,
    pub memory_usage_mb: u64,
    pub peak_memory_mb: u64,
    pub elapsed_time: Duration,
}

/// Periodic throughput and memory logging for the frame loop.
#[cfg(feature = "cli")]
pub struct SessionMonitor {
    system: System,
    pid: Option<Pid>,
    start_time: Instant,
    peak_memory_mb: u64,
    interval_frames: u64,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl SessionMonitor {
    pub fn new(enabled: bool, interval_frames: u64) -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                tracing::warn!("Process memory stats unavailable: {}", e);
                None
            }
        };

        Self {
            system: System::new(),
            pid,
            start_time: Instant::now(),
            peak_memory_mb: 0,
            interval_frames,
            enabled,
        }
    }

    fn process_memory_mb(&mut self) -> u64 {
        let Some(pid) = self.pid else {
            return 0;
        };
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        let memory_mb = self
            .system
            .process(pid)
            .map(|process| process.memory() / 1024 / 1024)
            .unwrap_or(0);

        if memory_mb > self.peak_memory_mb {
            self.peak_memory_mb = memory_mb;
        }
        memory_mb
    }

    pub fn get_stats(&mut self, summary: &SessionSummary) -> Option<SessionStats> {
        if !self.enabled {
            return None;
        }

        let elapsed_time = self.start_time.elapsed();
        let seconds = elapsed_time.as_secs_f64();
        let frames_per_second = if seconds > 0.0 {
            summary.frames as f64 / seconds
        } else {
            0.0
        };
        let match_rate_percent = if summary.hands_evaluated > 0 {
            summary.matches as f64 / summary.hands_evaluated as f64 * 100.0
        } else {
            0.0
        };
        let memory_usage_mb = self.process_memory_mb();

        Some(SessionStats {
            frames: summary.frames,
            frames_per_second,
            match_rate_percent,
            memory_usage_mb,
            peak_memory_mb: self.peak_memory_mb,
            elapsed_time,
        })
    }

    pub fn record_frame(&mut self, summary: &SessionSummary) {
        if !self.enabled || self.interval_frames == 0 || summary.frames % self.interval_frames != 0 {
            return;
        }
        if let Some(stats) = self.get_stats(summary) {
            tracing::info!(
                "📊 Frame {} - {:.1} fps, match rate {:.1}%, Memory: {}MB, Peak: {}MB",
                stats.frames,
                stats.frames_per_second,
                stats.match_rate_percent,
                stats.memory_usage_mb,
                stats.peak_memory_mb
            );
        }
    }

    pub fn log_final_stats(&mut self, summary: &SessionSummary) {
        if let Some(stats) = self.get_stats(summary) {
            tracing::info!(
                "📊 Final Stats - Frames: {} ({} skipped), Matches: {}, Registrations: {}, Total Time: {:?}, Peak Memory: {}MB",
                summary.frames,
                summary.skipped_frames,
                summary.matches,
                summary.registrations,
                stats.elapsed_time,
                stats.peak_memory_mb
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

// 非 CLI 環境下的空實現
#[cfg(not(feature = "cli"))]
pub struct SessionMonitor;

#[cfg(not(feature = "cli"))]
impl SessionMonitor {
    pub fn new(_enabled: bool, _interval_frames: u64) -> Self {
        Self
    }

    pub fn record_frame(&mut self, _summary: &SessionSummary) {}

    pub fn log_final_stats(&mut self, _summary: &SessionSummary) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_monitor_reports_nothing() {
        let mut monitor = SessionMonitor::new(false, 10);
        assert!(!monitor.is_enabled());
        assert!(monitor.get_stats(&SessionSummary::default()).is_none());
    }

    #[test]
    fn test_match_rate() {
        let mut monitor = SessionMonitor::new(true, 10);
        let summary = SessionSummary {
            frames: 4,
            hands_evaluated: 4,
            matches: 1,
            ..SessionSummary::default()
        };
        let stats = monitor.get_stats(&summary).unwrap();
        assert_eq!(stats.frames, 4);
        assert!((stats.match_rate_percent - 25.0).abs() < 1e-9);
        assert!(stats.peak_memory_mb >= stats.memory_usage_mb);
    }
}
