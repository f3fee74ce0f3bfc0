//! Sample statistics
//!
//! Mean and population standard deviation over per-trial timings, computed
//! in one pass with Welford's update. A series of identical samples has a
//! standard deviation of exactly zero.

/// Running mean and variance.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunningStats {
    count: usize,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    /// No samples yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one sample.
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Number of samples.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Arithmetic mean; 0 without samples.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population standard deviation; 0 without samples.
    pub fn std_dev(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        (self.m2 / self.count as f64).max(0.0).sqrt()
    }
}

impl FromIterator<f64> for RunningStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = Self::new();
        for value in iter {
            stats.push(value);
        }
        stats
    }
}

/// Arithmetic mean of `samples`.
pub fn mean(samples: &[f64]) -> f64 {
    samples.iter().copied().collect::<RunningStats>().mean()
}

/// Population standard deviation of `samples`.
pub fn std_dev(samples: &[f64]) -> f64 {
    samples.iter().copied().collect::<RunningStats>().std_dev()
}

/// What gets reported for one operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleSummary {
    /// Wall time of the whole sampling loop, in milliseconds
    pub elapsed_ms: f64,
    /// Mean trial time, in milliseconds
    pub mean_ms: f64,
    /// Population standard deviation of trial times, in milliseconds
    pub std_dev_ms: f64,
}

impl SampleSummary {
    /// Summarizes per-trial timings taken over a loop lasting `elapsed_ms`.
    pub fn new(elapsed_ms: f64, samples: &[f64]) -> Self {
        let stats: RunningStats = samples.iter().copied().collect();
        Self {
            elapsed_ms,
            mean_ms: stats.mean(),
            std_dev_ms: stats.std_dev(),
        }
    }

    /// Standard deviation as a percentage of the mean (0 when the mean is 0).
    pub fn relative_std_dev(&self) -> f64 {
        if self.mean_ms == 0.0 {
            0.0
        } else {
            self.std_dev_ms / self.mean_ms * 100.0
        }
    }

    /// The three report lines.
    pub fn report_lines(&self) -> [String; 3] {
        [
            format!("elapsed time: {}", self.elapsed_ms),
            format!("average time: {}", self.mean_ms),
            format!(
                "stddev: {} ({:.2}%)",
                self.std_dev_ms,
                self.relative_std_dev()
            ),
        ]
    }
}
