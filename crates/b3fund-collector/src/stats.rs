//! Collection statistics.

use serde::Serialize;
use std::time::Duration;

/// Per-stage statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct CollectionStats {
    /// Pages or tickers attempted
    pub total: usize,
    /// Attempts that produced data
    pub success: usize,
    /// Attempts skipped (metrics page reported "not found")
    pub skipped: usize,
    /// Rows in the resulting table
    pub rows: usize,
    /// Elapsed time
    #[serde(skip)]
    pub elapsed: Duration,
}

impl CollectionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Success rate (%)
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }

    /// Logs a one-line summary
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            total = self.total,
            success = self.success,
            skipped = self.skipped,
            rows = self.rows,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "stage finished"
        );
    }
}
