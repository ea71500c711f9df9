//! Criterion benchmark harness: insert throughput of one company aggregate
//! through the mapped-entity and the explicit-SQL paths.
//!
//! Each measured iteration gets its own setup and cleanup, neither of which
//! is timed. When `BaseEFCoreConnectionString` and `BaseDapperConnectionString`
//! are set those stores are used; otherwise both live in a temporary
//! directory for the duration of the run.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use crm_bench::scenario::explicit_sql::ExplicitSqlScenario;
use crm_bench::scenario::mapped::MappedEntityScenario;
use crm_bench::scenario::InsertScenario;
use crm_bench::schema;
use crm_core::BenchConfig;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Contact counts to benchmark, unless the environment pins one.
fn contact_levels(config: &BenchConfig) -> Vec<usize> {
    if std::env::var(crm_core::config::CONTACTS_PER_COMPANY_VAR).is_ok() {
        vec![config.contacts_per_company]
    } else {
        vec![1, 5, 20]
    }
}

/// Resolve the stores and make sure both schemas exist.
fn bench_config(mapped: &MappedEntityScenario) -> (BenchConfig, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let orm = format!("sqlite://{}?mode=rwc", dir.path().join("orm.db").display());
    let sql = dir.path().join("sql.db").display().to_string();
    let config = BenchConfig::from_lookup_or(|key| std::env::var(key).ok(), &orm, &sql);

    mapped
        .block_on(schema::ensure_orm_schema(&config.orm_connection_string))
        .expect("Failed to create ORM schema");
    schema::ensure_sql_schema(&config.sql_connection_string).expect("Failed to create SQL schema");

    (config, dir)
}

/// Time `execute` only, with a fresh setup and cleanup around every iteration.
fn measure<S: InsertScenario>(scenario: &S, config: &BenchConfig, iters: u64) -> Duration {
    let mut total = Duration::ZERO;
    for _ in 0..iters {
        let mut iteration = scenario.setup(config).expect("setup failed");
        let start = Instant::now();
        let company = scenario.execute(&mut iteration).expect("insert failed");
        total += start.elapsed();
        black_box(company);
        scenario.cleanup(iteration).expect("cleanup failed");
    }
    total
}

fn bench_insert(c: &mut Criterion) {
    let mapped = MappedEntityScenario::new().expect("Failed to build runtime");
    let explicit = ExplicitSqlScenario::new();
    let (base_config, _dir) = bench_config(&mapped);

    let mut group = c.benchmark_group("insert");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(50);

    for contacts in contact_levels(&base_config) {
        let config = base_config.clone().with_contacts_per_company(contacts);

        group.bench_with_input(
            BenchmarkId::new(mapped.name(), contacts),
            &config,
            |b, config| b.iter_custom(|iters| measure(&mapped, config, iters)),
        );
        group.bench_with_input(
            BenchmarkId::new(explicit.name(), contacts),
            &config,
            |b, config| b.iter_custom(|iters| measure(&explicit, config, iters)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_insert);
criterion_main!(benches);
