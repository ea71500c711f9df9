//! In-process driver: runs a scenario for a number of isolated iterations.
//!
//! Every iteration goes through the full `setup -> execute -> cleanup`
//! cycle. Only `execute` is timed. The first error aborts the run.

use crate::report::ScenarioResult;
use crate::scenario::{settle, InsertScenario};
use anyhow::{Context, Result};
use crm_core::{BenchConfig, Company};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct RunParams {
    pub warmup_iterations: u32,
    pub sample_iterations: u32,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            warmup_iterations: 10,
            sample_iterations: 200,
        }
    }
}

/// Outcome of a run: timings plus the first saved aggregate for spot checks.
#[derive(Debug)]
pub struct RunOutcome {
    pub result: ScenarioResult,
    pub sample: Option<Company>,
}

fn timed_iteration<S: InsertScenario>(
    scenario: &S,
    config: &BenchConfig,
) -> Result<(Duration, Company)> {
    let mut iteration = scenario.setup(config)?;

    let start = Instant::now();
    let executed = scenario.execute(&mut iteration);
    let elapsed = start.elapsed();

    let company = settle(executed, scenario.cleanup(iteration))?;
    Ok((elapsed, company))
}

pub fn run_scenario<S: InsertScenario>(
    scenario: &S,
    config: &BenchConfig,
    params: RunParams,
) -> Result<RunOutcome> {
    let name = scenario.name();
    log::debug!(
        "{name}: {} warmup + {} sample iterations, {} contacts per company",
        params.warmup_iterations,
        params.sample_iterations,
        config.contacts_per_company
    );

    for i in 0..params.warmup_iterations {
        timed_iteration(scenario, config)
            .with_context(|| format!("{name}: warmup iteration {i}"))?;
    }

    let mut result = ScenarioResult::new(name, config.contacts_per_company);
    let mut sample = None;
    for i in 0..params.sample_iterations {
        let (elapsed, company) = timed_iteration(scenario, config)
            .with_context(|| format!("{name}: sample iteration {i}"))?;
        log::trace!("{name}: iteration {i} took {elapsed:?}");

        result.add_sample(elapsed, company.row_count());
        if sample.is_none() {
            sample = Some(company);
        }
    }

    log::info!(
        "{name}: {} iterations, mean {:.0}µs",
        result.iterations(),
        result.mean_us()
    );
    Ok(RunOutcome { result, sample })
}
