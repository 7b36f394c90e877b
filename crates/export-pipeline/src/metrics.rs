// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-stage timing for an export run.

use std::time::Duration;

/// Timing of one pipeline stage.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StageMetrics {
    pub stage: &'static str,
    pub duration: Duration,
}

/// Aggregate metrics for a complete export run.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ExportMetrics {
    pub stages: Vec<StageMetrics>,
    /// Encoded graph size in bytes.
    pub graph_bytes: usize,
}

impl ExportMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, stage: &'static str, duration: Duration) {
        self.stages.push(StageMetrics { stage, duration });
    }

    /// Sum of all recorded stages.
    pub fn total_duration(&self) -> Duration {
        self.stages.iter().map(|s| s.duration).sum()
    }

    pub fn stage(&self, name: &str) -> Option<Duration> {
        self.stages
            .iter()
            .find(|s| s.stage == name)
            .map(|s| s.duration)
    }

    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        let stages: Vec<String> = self
            .stages
            .iter()
            .map(|s| format!("{} {:.2}ms", s.stage, s.duration.as_secs_f64() * 1000.0))
            .collect();
        format!(
            "Export: {:.2}ms total ({}), graph {:.1} KB",
            self.total_duration().as_secs_f64() * 1000.0,
            stages.join(", "),
            self.graph_bytes as f64 / 1024.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_total() {
        let mut m = ExportMetrics::new();
        m.record("load", Duration::from_millis(3));
        m.record("convert", Duration::from_millis(5));
        assert_eq!(m.total_duration(), Duration::from_millis(8));
        assert_eq!(m.stage("convert"), Some(Duration::from_millis(5)));
        assert_eq!(m.stage("publish"), None);
    }

    #[test]
    fn test_summary_format() {
        let mut m = ExportMetrics::new();
        m.record("load", Duration::from_millis(1));
        m.graph_bytes = 2048;
        let s = m.summary();
        assert!(s.contains("Export:"));
        assert!(s.contains("load 1.00ms"));
        assert!(s.contains("graph 2.0 KB"));
    }
}
