//! Report module: prints human-readable timing results for each scenario.

use std::time::Duration;

/// Results from a benchmark run of one insert scenario.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub contacts_per_company: usize,
    pub durations: Vec<Duration>,
    /// Parent plus child rows written across all sampled iterations.
    pub rows_written: usize,
}

impl ScenarioResult {
    pub fn new(scenario_name: &str, contacts_per_company: usize) -> Self {
        Self {
            scenario_name: scenario_name.to_string(),
            contacts_per_company,
            durations: Vec::new(),
            rows_written: 0,
        }
    }

    pub fn add_sample(&mut self, elapsed: Duration, rows: usize) {
        self.durations.push(elapsed);
        self.rows_written += rows;
    }

    pub fn iterations(&self) -> usize {
        self.durations.len()
    }

    pub fn total(&self) -> Duration {
        self.durations.iter().sum()
    }

    pub fn mean_us(&self) -> f64 {
        if self.durations.is_empty() {
            return 0.0;
        }
        self.total().as_secs_f64() * 1e6 / self.durations.len() as f64
    }

    pub fn percentile_us(&self, pct: f64) -> f64 {
        if self.durations.is_empty() {
            return 0.0;
        }
        let mut sorted: Vec<f64> = self
            .durations
            .iter()
            .map(|d| d.as_secs_f64() * 1e6)
            .collect();
        sorted.sort_by(f64::total_cmp);
        let idx = ((pct / 100.0) * (sorted.len() - 1) as f64).round() as usize;
        sorted[idx.min(sorted.len() - 1)]
    }

    /// Completed iterations per second of measured time.
    pub fn iterations_per_sec(&self) -> f64 {
        let secs = self.total().as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.durations.len() as f64 / secs
    }

    /// Rows (companies and contacts) written per second of measured time.
    pub fn rows_per_sec(&self) -> f64 {
        let secs = self.total().as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.rows_written as f64 / secs
    }
}

/// Mean time of each result relative to the fastest non-empty one. Every
/// ratio is 0.0 when no result has a positive mean.
pub fn mean_ratios(results: &[ScenarioResult]) -> Vec<f64> {
    let fastest = results
        .iter()
        .map(ScenarioResult::mean_us)
        .filter(|m| *m > 0.0)
        .fold(f64::INFINITY, f64::min);

    results
        .iter()
        .map(|r| {
            if fastest.is_finite() {
                r.mean_us() / fastest
            } else {
                0.0
            }
        })
        .collect()
}

/// Print a formatted report comparing scenario results.
pub fn print_report(results: &[ScenarioResult]) {
    println!("\n{}", "=".repeat(80));
    println!("  CRM Insert Benchmark Report");
    println!("{}", "=".repeat(80));

    for result in results {
        println!(
            "\n  Scenario: {} | Contacts per company: {}",
            result.scenario_name, result.contacts_per_company
        );
        println!("  {}", "-".repeat(60));
        println!("  Iterations:      {:>10}", result.iterations());
        println!(
            "  Mean:            {:>10.0}µs  ({:.2}ms)",
            result.mean_us(),
            result.mean_us() / 1000.0
        );
        println!("  p50:             {:>10.0}µs", result.percentile_us(50.0));
        println!("  p95:             {:>10.0}µs", result.percentile_us(95.0));
        println!("  p99:             {:>10.0}µs", result.percentile_us(99.0));
        println!(
            "  Throughput:      {:>10.1} companies/s",
            result.iterations_per_sec()
        );
        println!("  Rows:            {:>10.1} rows/s", result.rows_per_sec());
    }

    println!("\n{}", "=".repeat(80));

    if results.len() >= 2 {
        println!("\n  Comparison Summary:");
        println!(
            "  {:20} {:>12} {:>12} {:>12} {:>8}",
            "Scenario", "Mean (µs)", "p95 (µs)", "Companies/s", "Ratio"
        );
        println!("  {}", "-".repeat(68));

        for (r, ratio) in results.iter().zip(mean_ratios(results)) {
            println!(
                "  {:20} {:>12.0} {:>12.0} {:>12.1} {:>7.2}x",
                r.scenario_name,
                r.mean_us(),
                r.percentile_us(95.0),
                r.iterations_per_sec(),
                ratio
            );
        }
    }

    println!();
}
