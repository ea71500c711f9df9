//! Benchmark configuration resolved from the process environment.
//!
//! The configuration is read once at process start and then passed by
//! reference into every scenario; nothing below re-reads the environment
//! per iteration.

use anyhow::{anyhow, Result};
use log::LevelFilter;
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

/// Connection string for the mapped-entity (ORM) store.
pub const ORM_CONNECTION_VAR: &str = "BaseEFCoreConnectionString";
/// Connection string for the explicit-SQL store.
pub const SQL_CONNECTION_VAR: &str = "BaseDapperConnectionString";
/// Number of contacts created for every company.
pub const CONTACTS_PER_COMPANY_VAR: &str = "NumeroContatosPorCompanhia";
pub const LOG_LEVEL_VAR: &str = "CRM_BENCH_LOG_LEVEL";
pub const LOG_FILE_VAR: &str = "CRM_BENCH_LOG_FILE";

pub const DEFAULT_CONTACTS_PER_COMPANY: usize = 1;
pub const DEFAULT_ENV_FILE: &str = ".env";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    pub orm_connection_string: String,
    pub sql_connection_string: String,
    pub contacts_per_company: usize,
    pub log_level: LevelFilter,
    pub log_file: Option<String>,
    /// Dotenv file that supplied settings, if one was found.
    pub env_file: Option<PathBuf>,
}

impl BenchConfig {
    /// Configuration with default logging, for callers that pick the stores themselves.
    pub fn new(
        orm_connection_string: impl Into<String>,
        sql_connection_string: impl Into<String>,
        contacts_per_company: usize,
    ) -> Self {
        Self {
            orm_connection_string: orm_connection_string.into(),
            sql_connection_string: sql_connection_string.into(),
            contacts_per_company,
            log_level: LevelFilter::Info,
            log_file: None,
            env_file: None,
        }
    }

    /// Resolve from the real environment, falling back to `.env` in the
    /// working directory.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_ENV_FILE), |key| env::var(key).ok())
    }

    /// Resolve every setting through `lookup` first and the dotenv file at
    /// `path` second. A missing file counts as empty.
    pub fn load_from<F>(path: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = read_env_file(path)?;
        let mut config = Self::from_lookup(|key| {
            lookup(key).or_else(|| file.as_ref().and_then(|vars| vars.get(key).cloned()))
        })?;
        config.env_file = file.map(|_| path.to_path_buf());
        Ok(config)
    }

    /// Resolve every setting through `lookup`, which returns `None` for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| anyhow!("environment variable {key} is not set"))
        };
        let orm = required(ORM_CONNECTION_VAR)?;
        let sql = required(SQL_CONNECTION_VAR)?;
        Ok(Self::with_stores(&lookup, orm, sql))
    }

    /// Like [`from_lookup`](Self::from_lookup), but when either connection
    /// string is unset both stores are replaced by the fallbacks. The contact
    /// count and logging settings still come from `lookup`.
    pub fn from_lookup_or<F>(lookup: F, orm_fallback: &str, sql_fallback: &str) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let (orm, sql) = lookup(ORM_CONNECTION_VAR)
            .zip(lookup(SQL_CONNECTION_VAR))
            .unwrap_or_else(|| (orm_fallback.to_string(), sql_fallback.to_string()));
        Self::with_stores(&lookup, orm, sql)
    }

    fn with_stores<F>(lookup: &F, orm_connection_string: String, sql_connection_string: String) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            orm_connection_string,
            sql_connection_string,
            contacts_per_company: parse_contacts_per_company(
                lookup(CONTACTS_PER_COMPANY_VAR).as_deref(),
            ),
            log_level: parse_log_level(lookup(LOG_LEVEL_VAR).as_deref()),
            log_file: lookup(LOG_FILE_VAR).filter(|s| !s.trim().is_empty()),
            env_file: None,
        }
    }

    /// Same configuration with a different contact count.
    pub fn with_contacts_per_company(mut self, contacts_per_company: usize) -> Self {
        self.contacts_per_company = contacts_per_company;
        self
    }
}

/// Unset, blank or non-integer values fall back to the default. Negative
/// integers are accepted and mean no contacts at all.
pub fn parse_contacts_per_company(raw: Option<&str>) -> usize {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return DEFAULT_CONTACTS_PER_COMPANY;
    };

    match raw.parse::<i32>() {
        Ok(n) => usize::try_from(n).unwrap_or(0),
        Err(_) => {
            log::warn!(
                "{CONTACTS_PER_COMPANY_VAR}={raw:?} is not an integer, using {DEFAULT_CONTACTS_PER_COMPANY}"
            );
            DEFAULT_CONTACTS_PER_COMPANY
        }
    }
}

/// Key/value pairs of a dotenv file, or `None` when there is no such file.
fn read_env_file(path: &Path) -> Result<Option<HashMap<String, String>>> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => return Ok(None),
        Err(e) => return Err(anyhow!("reading {}: {e}", path.display())),
    };
    let vars = iter
        .collect::<Result<HashMap<_, _>, _>>()
        .map_err(|e| anyhow!("parsing {}: {e}", path.display()))?;
    Ok(Some(vars))
}

fn parse_log_level(raw: Option<&str>) -> LevelFilter {
    raw.and_then(|s| s.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}
