//! Explicit-SQL path: one connection, one transaction, one INSERT per row.
//!
//! Rows are written through the [`SqlInsert`] micro-mapper: each row type
//! knows its own INSERT statement and parameter binding and returns the
//! generated key.

use super::InsertScenario;
use crate::schema::configure_connection;
use anyhow::{Context, Result};
use crm_core::{BenchConfig, Company, CompanyDraft, Contact, CrmFaker};
use rusqlite::{params, Connection};

/// A row that can insert itself and report the key SQLite assigned to it.
pub trait SqlInsert {
    const INSERT: &'static str;

    fn insert(&self, conn: &Connection) -> rusqlite::Result<i64>;
}

pub struct CompanyRow<'a> {
    pub name: &'a str,
    pub tax_id: &'a str,
    pub city: &'a str,
}

impl SqlInsert for CompanyRow<'_> {
    const INSERT: &'static str = "INSERT INTO companies (name, tax_id, city) VALUES (?1, ?2, ?3)";

    fn insert(&self, conn: &Connection) -> rusqlite::Result<i64> {
        conn.prepare_cached(Self::INSERT)?
            .execute(params![self.name, self.tax_id, self.city])?;
        Ok(conn.last_insert_rowid())
    }
}

pub struct ContactRow<'a> {
    pub company_id: i64,
    pub name: &'a str,
    pub phone: &'a str,
}

impl SqlInsert for ContactRow<'_> {
    const INSERT: &'static str =
        "INSERT INTO contacts (company_id, name, phone) VALUES (?1, ?2, ?3)";

    fn insert(&self, conn: &Connection) -> rusqlite::Result<i64> {
        conn.prepare_cached(Self::INSERT)?
            .execute(params![self.company_id, self.name, self.phone])?;
        Ok(conn.last_insert_rowid())
    }
}

/// Insert the parent, then every child carrying the parent's generated key.
///
/// Callers pass a transaction (which derefs to `Connection`); nothing here
/// commits.
pub fn insert_aggregate(conn: &Connection, draft: CompanyDraft) -> Result<Company> {
    let company_id = CompanyRow {
        name: &draft.name,
        tax_id: &draft.tax_id,
        city: &draft.city,
    }
    .insert(conn)
    .context("inserting company")?;

    let mut contacts = Vec::with_capacity(draft.contacts.len());
    for contact in draft.contacts {
        let id = ContactRow {
            company_id,
            name: &contact.name,
            phone: &contact.phone,
        }
        .insert(conn)
        .context("inserting contact")?;

        contacts.push(Contact {
            id,
            company_id,
            name: contact.name,
            phone: contact.phone,
        });
    }

    Ok(Company {
        id: company_id,
        name: draft.name,
        tax_id: draft.tax_id,
        city: draft.city,
        contacts,
    })
}

pub struct ExplicitSqlScenario;

impl ExplicitSqlScenario {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ExplicitSqlScenario {
    fn default() -> Self {
        Self::new()
    }
}

/// The connection itself is opened inside `execute`, so opening it is part
/// of the measured work.
pub struct ExplicitSqlIteration {
    connection_string: String,
    faker: CrmFaker,
    contacts_per_company: usize,
}

impl InsertScenario for ExplicitSqlScenario {
    type Iteration = ExplicitSqlIteration;

    fn name(&self) -> &'static str {
        "explicit-sql"
    }

    fn setup(&self, config: &BenchConfig) -> Result<ExplicitSqlIteration> {
        Ok(ExplicitSqlIteration {
            connection_string: config.sql_connection_string.clone(),
            faker: CrmFaker::new(),
            contacts_per_company: config.contacts_per_company,
        })
    }

    fn execute(&self, iteration: &mut ExplicitSqlIteration) -> Result<Company> {
        let draft = CompanyDraft::generate(&mut iteration.faker, iteration.contacts_per_company);

        let mut conn = Connection::open(&iteration.connection_string)
            .with_context(|| format!("opening {}", iteration.connection_string))?;
        configure_connection(&conn)?;

        // An early return drops the transaction (rollback) before the
        // connection (close).
        let tx = conn.transaction()?;
        let company = insert_aggregate(&tx, draft)?;
        tx.commit().context("committing company")?;

        if let Err((_, e)) = conn.close() {
            return Err(e.into());
        }

        log::trace!(
            "explicit-sql: saved company {} with {} contacts",
            company.id,
            company.contacts.len()
        );
        Ok(company)
    }

    fn cleanup(&self, iteration: ExplicitSqlIteration) -> Result<()> {
        drop(iteration);
        Ok(())
    }
}
