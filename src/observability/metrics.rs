//! Thread-safe metrics collection
//!
//! Atomic counters for MCP traffic and mutex-protected per-tool statistics.
//! There is no export endpoint; the binary logs a snapshot at shutdown.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Per-tool latency samples kept for averages
const MAX_TIMING_SAMPLES: usize = 1000;

/// Global metrics collector instance
pub static METRICS: Lazy<MetricsCollector> = Lazy::new(MetricsCollector::new);

/// Get reference to global metrics collector
pub fn metrics() -> &'static MetricsCollector {
    &METRICS
}

pub struct MetricsCollector {
    requests_received: AtomicU64,
    requests_failed: AtomicU64,
    tool_stats: Mutex<HashMap<String, ToolExecutionStats>>,
    uptime_start: AtomicU64,
}

#[derive(Debug, Clone, Default)]
struct ToolExecutionStats {
    executions: u64,
    failures: u64,
    execution_times: Vec<u64>,
    last_execution: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToolExecutionStatsSnapshot {
    pub executions: u64,
    pub failures: u64,
    pub avg_duration_ms: f64,
    pub max_duration_ms: u64,
    pub last_execution: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub requests_received: u64,
    pub requests_failed: u64,
    pub tools: HashMap<String, ToolExecutionStatsSnapshot>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            requests_received: AtomicU64::new(0),
            requests_failed: AtomicU64::new(0),
            tool_stats: Mutex::new(HashMap::new()),
            uptime_start: AtomicU64::new(current_timestamp()),
        }
    }

    pub fn request_received(&self) {
        self.requests_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn request_failed(&self) {
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Update tool execution statistics (pure function)
    fn update_tool_execution_stats(
        tool_stats: &mut ToolExecutionStats,
        duration: Duration,
        success: bool,
    ) {
        tool_stats.executions += 1;
        tool_stats.last_execution = current_timestamp();
        tool_stats.execution_times.push(duration.as_millis() as u64);

        if tool_stats.execution_times.len() > MAX_TIMING_SAMPLES {
            tool_stats.execution_times.remove(0);
        }

        if !success {
            tool_stats.failures += 1;
        }
    }

    pub fn tool_executed(&self, tool_name: &str, duration: Duration, success: bool) {
        if let Ok(mut stats) = self.tool_stats.lock() {
            let tool_stats = stats.entry(tool_name.to_string()).or_default();
            Self::update_tool_execution_stats(tool_stats, duration, success);
        }
    }

    /// Create tool execution snapshot (pure function)
    fn create_tool_snapshot(stats: &ToolExecutionStats) -> ToolExecutionStatsSnapshot {
        let samples = &stats.execution_times;
        let avg_duration_ms = if samples.is_empty() {
            0.0
        } else {
            samples.iter().sum::<u64>() as f64 / samples.len() as f64
        };

        ToolExecutionStatsSnapshot {
            executions: stats.executions,
            failures: stats.failures,
            avg_duration_ms,
            max_duration_ms: samples.iter().copied().max().unwrap_or(0),
            last_execution: stats.last_execution,
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let tools = self
            .tool_stats
            .lock()
            .map(|stats| {
                stats
                    .iter()
                    .map(|(name, stats)| (name.clone(), Self::create_tool_snapshot(stats)))
                    .collect()
            })
            .unwrap_or_default();

        MetricsSnapshot {
            uptime_secs: current_timestamp()
                .saturating_sub(self.uptime_start.load(Ordering::Relaxed)),
            requests_received: self.requests_received.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            tools,
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
