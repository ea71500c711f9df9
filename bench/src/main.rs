//! Standalone benchmark runner that prints the formatted report.
//!
//! Both stores are configured through the environment (a `.env` file in the
//! working directory is honoured):
//!
//!   BaseEFCoreConnectionString   sea-orm URL, e.g. `sqlite://crm_orm.db?mode=rwc`
//!   BaseDapperConnectionString   SQLite path, e.g. `crm_sql.db`
//!   NumeroContatosPorCompanhia   contacts per company (default 1)
//!
//! Usage:
//!   cargo run --release

use anyhow::{bail, Result};
use crm_bench::driver::{run_scenario, RunOutcome, RunParams};
use crm_bench::report::print_report;
use crm_bench::scenario::explicit_sql::ExplicitSqlScenario;
use crm_bench::scenario::mapped::MappedEntityScenario;
use crm_bench::scenario::InsertScenario;
use crm_bench::schema::{self, RowCounts};
use crm_core::BenchConfig;
use std::process;

const WARMUP_ITERATIONS: u32 = 10;
const SAMPLE_ITERATIONS: u32 = 200;

/// Every sampled and warm-up iteration must have added exactly one company
/// and `contacts_per_company` contacts.
fn verify_rows(
    scenario_name: &str,
    config: &BenchConfig,
    params: RunParams,
    delta: RowCounts,
) -> Result<()> {
    let iterations = u64::from(params.warmup_iterations + params.sample_iterations);
    let expected = RowCounts {
        companies: iterations,
        contacts: iterations * config.contacts_per_company as u64,
    };
    if delta != expected {
        bail!("{scenario_name}: expected {expected:?} new rows, found {delta:?}");
    }
    log::info!("{scenario_name}: row counts verified ({delta:?})");
    Ok(())
}

fn log_sample<S: InsertScenario>(scenario: &S, outcome: &RunOutcome) {
    if let Some(company) = &outcome.sample {
        log::debug!(
            "{}: sample company #{} {:?} ({}) in {} with {} contacts",
            scenario.name(),
            company.id,
            company.name,
            company.tax_id,
            company.city,
            company.contacts.len()
        );
    }
}

fn run(config: &BenchConfig) -> Result<()> {
    let params = RunParams {
        warmup_iterations: WARMUP_ITERATIONS,
        sample_iterations: SAMPLE_ITERATIONS,
    };

    println!("Running CRM insert benchmark...");
    println!("  Warmup iterations:    {WARMUP_ITERATIONS}");
    println!("  Sample iterations:    {SAMPLE_ITERATIONS}");
    println!("  Contacts per company: {}", config.contacts_per_company);

    let mapped = MappedEntityScenario::new()?;
    mapped.block_on(schema::ensure_orm_schema(&config.orm_connection_string))?;
    schema::ensure_sql_schema(&config.sql_connection_string)?;

    let mut results = Vec::new();

    eprint!("  Benchmarking {}...", mapped.name());
    let before = mapped.block_on(schema::orm_row_counts(&config.orm_connection_string))?;
    let outcome = run_scenario(&mapped, config, params)?;
    let after = mapped.block_on(schema::orm_row_counts(&config.orm_connection_string))?;
    eprintln!(" done ({:.2}ms mean)", outcome.result.mean_us() / 1000.0);
    verify_rows(mapped.name(), config, params, after.since(before))?;
    log_sample(&mapped, &outcome);
    results.push(outcome.result);

    let explicit = ExplicitSqlScenario::new();
    eprint!("  Benchmarking {}...", explicit.name());
    let before = schema::sql_row_counts(&config.sql_connection_string)?;
    let outcome = run_scenario(&explicit, config, params)?;
    let after = schema::sql_row_counts(&config.sql_connection_string)?;
    eprintln!(" done ({:.2}ms mean)", outcome.result.mean_us() / 1000.0);
    verify_rows(explicit.name(), config, params, after.since(before))?;
    log_sample(&explicit, &outcome);
    results.push(outcome.result);

    print_report(&results);
    Ok(())
}

fn main() {
    let config = BenchConfig::load().unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {e:#}. Exiting.");
        process::exit(1);
    });

    crm_core::initialize_logger(config.log_level, config.log_file.as_deref()).unwrap_or_else(
        |e| {
            eprintln!("Failed to initialize logger: {e:#}. Exiting.");
            process::exit(1);
        },
    );

    if let Some(path) = &config.env_file {
        log::debug!("Loaded environment overrides from {}", path.display());
    }
    log::info!("Starting CRM insert benchmark");

    if let Err(e) = run(&config) {
        log::error!("Benchmark aborted: {e:#}");
        process::exit(1);
    }
}
