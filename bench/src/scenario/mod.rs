//! Insert scenarios and the common `InsertScenario` trait.
//!
//! Two implementations are provided:
//! - [`mapped::MappedEntityScenario`] persists the aggregate through sea-orm
//! - [`explicit_sql::ExplicitSqlScenario`] writes each row with hand-written SQL
//!
//! An iteration goes `setup -> execute -> cleanup`. `setup` hands back the
//! state the iteration owns, `execute` borrows it and is the only timed step,
//! and `cleanup` consumes it so nothing leaks into the next iteration.

pub mod explicit_sql;
pub mod mapped;

use anyhow::Result;
use crm_core::{BenchConfig, Company};

pub trait InsertScenario {
    /// State owned by a single iteration.
    type Iteration;

    /// Human-readable name for reports.
    fn name(&self) -> &'static str;

    /// Prepare everything one iteration needs. Not measured.
    fn setup(&self, config: &BenchConfig) -> Result<Self::Iteration>;

    /// Insert one company with its contacts and return what was saved.
    fn execute(&self, iteration: &mut Self::Iteration) -> Result<Company>;

    /// Release the iteration's resources. Not measured.
    fn cleanup(&self, iteration: Self::Iteration) -> Result<()>;

    /// Setup, execute and cleanup in one go. Cleanup runs even when execute fails.
    fn run_once(&self, config: &BenchConfig) -> Result<Company> {
        let mut iteration = self.setup(config)?;
        let executed = self.execute(&mut iteration);
        settle(executed, self.cleanup(iteration))
    }
}

/// Combine the outcome of `execute` with that of the `cleanup` that followed.
/// An execute error is returned as is; a cleanup error behind it is only logged.
pub(crate) fn settle<T>(executed: Result<T>, cleaned: Result<()>) -> Result<T> {
    match (executed, cleaned) {
        (Err(e), Err(cleanup)) => {
            log::error!("Cleanup after a failed iteration also failed: {cleanup:#}");
            Err(e)
        }
        (executed, cleaned) => cleaned.and(executed),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use anyhow::anyhow;

    /// Scenario whose steps fail on demand without touching a database.
    pub(crate) struct Scripted {
        pub execute_fails: bool,
        pub cleanup_fails: bool,
    }

    impl InsertScenario for Scripted {
        type Iteration = ();

        fn name(&self) -> &'static str {
            "scripted"
        }

        fn setup(&self, _config: &BenchConfig) -> Result<()> {
            Ok(())
        }

        fn execute(&self, _iteration: &mut ()) -> Result<Company> {
            if self.execute_fails {
                return Err(anyhow!("insert rejected"));
            }
            Ok(Company {
                id: 1,
                name: "Acme".into(),
                tax_id: "11222333000181".into(),
                city: "Recife".into(),
                contacts: Vec::new(),
            })
        }

        fn cleanup(&self, _iteration: ()) -> Result<()> {
            if self.cleanup_fails {
                return Err(anyhow!("close failed"));
            }
            Ok(())
        }
    }

    pub(crate) fn config() -> BenchConfig {
        BenchConfig::new("sqlite::memory:", ":memory:", 0)
    }

    #[test]
    fn execute_error_wins_over_cleanup_error() {
        let scenario = Scripted {
            execute_fails: true,
            cleanup_fails: true,
        };
        let err = scenario.run_once(&config()).unwrap_err();
        assert_eq!(err.to_string(), "insert rejected");
    }

    #[test]
    fn cleanup_error_surfaces_after_successful_execute() {
        let scenario = Scripted {
            execute_fails: false,
            cleanup_fails: true,
        };
        let err = scenario.run_once(&config()).unwrap_err();
        assert_eq!(err.to_string(), "close failed");
    }

    #[test]
    fn clean_iteration_returns_the_company() {
        let scenario = Scripted {
            execute_fails: false,
            cleanup_fails: false,
        };
        assert_eq!(scenario.run_once(&config()).unwrap().id, 1);
    }
}
