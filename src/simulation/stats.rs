//! Running statistics for a simulation

use super::roadway::TickReport;

/// Counters accumulated across ticks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimStats {
    pub ticks: u64,
    /// Simulated time in seconds
    pub elapsed: f64,
    pub total_spawned: u64,
    pub total_removed: u64,
    pub total_crashes: u64,
    pub total_recoveries: u64,
}

impl SimStats {
    pub(crate) fn record(&mut self, dt: f32, report: &TickReport) {
        self.ticks += 1;
        self.elapsed += f64::from(dt);
        if report.spawned.is_some() {
            self.total_spawned += 1;
        }
        self.total_removed += report.removed as u64;
        self.total_crashes += report.crashes as u64;
        self.total_recoveries += report.recoveries as u64;
    }

    /// Share of spawned vehicles that made it off the far end, in percent
    pub fn throughput_rate(&self) -> f32 {
        if self.total_spawned > 0 {
            self.total_removed as f32 / self.total_spawned as f32 * 100.0
        } else {
            0.0
        }
    }
}
