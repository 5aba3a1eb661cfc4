//! Performance bookkeeping for pagination passes

use std::collections::HashMap;

/// Performance monitor for measuring operation times
#[derive(Debug, Clone, Default)]
pub struct PerformanceMonitor {
    measurements: HashMap<String, Vec<f64>>,
}

/// Keep the last N samples per operation
const MAX_SAMPLES: usize = 64;

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self {
            measurements: HashMap::new(),
        }
    }

    pub fn record_measurement(&mut self, operation: &str, duration_ms: f64) {
        let samples = self.measurements.entry(operation.to_string()).or_default();
        if samples.len() == MAX_SAMPLES {
            samples.remove(0);
        }
        samples.push(duration_ms.max(0.0));
    }

    pub fn get_average_time(&self, operation: &str) -> Option<f64> {
        self.measurements.get(operation).map(|times| {
            if times.is_empty() {
                0.0
            } else {
                times.iter().sum::<f64>() / times.len() as f64
            }
        })
    }

    pub fn last_time(&self, operation: &str) -> Option<f64> {
        self.measurements.get(operation).and_then(|times| times.last().copied())
    }

    pub fn sample_count(&self, operation: &str) -> usize {
        self.measurements.get(operation).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_and_window() {
        let mut monitor = PerformanceMonitor::new();
        assert_eq!(monitor.get_average_time("pass"), None);

        for i in 0..(MAX_SAMPLES + 6) {
            monitor.record_measurement("pass", i as f64);
        }
        assert_eq!(monitor.sample_count("pass"), MAX_SAMPLES);
        assert_eq!(monitor.last_time("pass"), Some((MAX_SAMPLES + 5) as f64));
    }
}
