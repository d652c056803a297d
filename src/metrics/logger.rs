// Metrics logger

use anyhow::{Context, Result};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use super::types::RouteMetric;
use crate::router::ResponseSource;

pub struct MetricsLogger {
    metrics_dir: PathBuf,
}

impl MetricsLogger {
    pub fn new(metrics_dir: PathBuf) -> Result<Self> {
        // Create metrics directory if it doesn't exist
        fs::create_dir_all(&metrics_dir).with_context(|| {
            format!(
                "Failed to create metrics directory: {}",
                metrics_dir.display()
            )
        })?;

        Ok(Self { metrics_dir })
    }

    fn log_file_for(&self, date: &str) -> PathBuf {
        self.metrics_dir.join(format!("{}.jsonl", date))
    }

    fn today() -> String {
        Utc::now().format("%Y-%m-%d").to_string()
    }

    /// Append a route metric to today's JSONL file
    pub fn log(&self, metric: &RouteMetric) -> Result<()> {
        let log_file = self.log_file_for(&Self::today());

        let mut line = serde_json::to_string(metric).context("Failed to serialize metric")?;
        line.push('\n');

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .and_then(|mut file| file.write_all(line.as_bytes()))
            .with_context(|| format!("Failed to append to metrics log: {}", log_file.display()))?;

        Ok(())
    }

    /// Hash a query for privacy (SHA256)
    pub fn hash_query(query: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(query.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Read metrics for a specific date. A corrupt line reports which file
    /// and line number failed to parse.
    pub fn read_metrics(&self, date: &str) -> Result<Vec<RouteMetric>> {
        let log_file = self.log_file_for(date);

        if !log_file.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&log_file)
            .with_context(|| format!("Failed to read metrics log: {}", log_file.display()))?;

        let mut metrics = Vec::new();
        for (lineno, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let metric: RouteMetric = serde_json::from_str(line).with_context(|| {
                format!("Bad metric at {}:{}", log_file.display(), lineno + 1)
            })?;
            metrics.push(metric);
        }

        Ok(metrics)
    }

    /// Get summary statistics for today
    pub fn get_today_summary(&self) -> Result<RouteSummary> {
        let metrics = self.read_metrics(&Self::today())?;

        let total = metrics.len();
        let dataset_count = metrics
            .iter()
            .filter(|m| m.source == ResponseSource::Dataset)
            .count();
        let generative_count = total - dataset_count;

        let support_count = metrics.iter().filter(|m| m.support_classified).count();
        let fallback_count = metrics.iter().filter(|m| m.fallback_used).count();
        let degraded_count = metrics.iter().filter(|m| m.degraded).count();

        let avg_dataset_time = if dataset_count > 0 {
            metrics
                .iter()
                .filter(|m| m.source == ResponseSource::Dataset)
                .map(|m| m.response_time_ms)
                .sum::<u64>()
                / dataset_count as u64
        } else {
            0
        };

        let avg_generative_time = if generative_count > 0 {
            metrics
                .iter()
                .filter(|m| m.source == ResponseSource::Generative)
                .map(|m| m.response_time_ms)
                .sum::<u64>()
                / generative_count as u64
        } else {
            0
        };

        Ok(RouteSummary {
            total,
            dataset_count,
            generative_count,
            support_count,
            fallback_count,
            degraded_count,
            avg_dataset_time,
            avg_generative_time,
        })
    }
}

#[derive(Debug)]
pub struct RouteSummary {
    pub total: usize,
    pub dataset_count: usize,
    pub generative_count: usize,
    pub support_count: usize,
    pub fallback_count: usize,
    pub degraded_count: usize,
    pub avg_dataset_time: u64,
    pub avg_generative_time: u64,
}
