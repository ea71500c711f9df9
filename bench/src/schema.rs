//! Schema provisioning for both stores.
//!
//! The explicit-SQL store is created from hand-written DDL; the mapped store
//! derives its tables from the sea-orm entities. Both describe the same
//! `companies` / `contacts` layout and are safe to run repeatedly.

use crate::entity::{company, contact};
use anyhow::{Context, Result};
use rusqlite::Connection;
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Schema};

const CREATE_TABLES: &str = "
    CREATE TABLE IF NOT EXISTS companies (
        id      INTEGER PRIMARY KEY AUTOINCREMENT,
        name    TEXT NOT NULL,
        tax_id  TEXT NOT NULL,
        city    TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS contacts (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        company_id  INTEGER NOT NULL REFERENCES companies (id) ON DELETE CASCADE,
        name        TEXT NOT NULL,
        phone       TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_contacts_company_id ON contacts (company_id);
";

/// Per-connection settings for the explicit-SQL store.
///
/// Foreign key enforcement is off by default in SQLite and has to be enabled
/// on every connection.
pub fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(())
}

pub fn create_sql_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)
        .context("creating explicit-SQL schema")?;
    Ok(())
}

/// Open the explicit-SQL store at `connection_string` and create its tables.
pub fn ensure_sql_schema(connection_string: &str) -> Result<()> {
    let conn = Connection::open(connection_string)
        .with_context(|| format!("opening {connection_string}"))?;
    create_sql_tables(&conn)?;
    log::debug!("Explicit-SQL schema ready at {connection_string}");
    Ok(())
}

async fn create_entity_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait + Copy,
{
    let backend = db.get_database_backend();

    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(backend.build(&table))
        .await
        .with_context(|| format!("creating table {}", entity.table_name()))?;

    for mut index in schema.create_index_from_entity(entity) {
        index.if_not_exists();
        db.execute(backend.build(&index)).await?;
    }
    Ok(())
}

pub async fn create_orm_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());
    create_entity_table(db, &schema, company::Entity).await?;
    create_entity_table(db, &schema, contact::Entity).await?;
    Ok(())
}

/// Connect to the mapped store at `connection_string` and create its tables.
pub async fn ensure_orm_schema(connection_string: &str) -> Result<()> {
    let db = sea_orm::Database::connect(connection_string)
        .await
        .with_context(|| format!("connecting to {connection_string}"))?;
    create_orm_tables(&db).await?;
    db.close().await?;
    log::debug!("Mapped-entity schema ready at {connection_string}");
    Ok(())
}

/// Rows currently stored in one of the stores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowCounts {
    pub companies: u64,
    pub contacts: u64,
}

impl RowCounts {
    pub fn since(self, earlier: RowCounts) -> RowCounts {
        RowCounts {
            companies: self.companies.saturating_sub(earlier.companies),
            contacts: self.contacts.saturating_sub(earlier.contacts),
        }
    }
}

pub fn row_counts(conn: &Connection) -> Result<RowCounts> {
    let companies: i64 = conn.query_row("SELECT COUNT(*) FROM companies", [], |r| r.get(0))?;
    let contacts: i64 = conn.query_row("SELECT COUNT(*) FROM contacts", [], |r| r.get(0))?;
    Ok(RowCounts {
        companies: companies as u64,
        contacts: contacts as u64,
    })
}

pub fn sql_row_counts(connection_string: &str) -> Result<RowCounts> {
    let conn = Connection::open(connection_string)
        .with_context(|| format!("opening {connection_string}"))?;
    row_counts(&conn)
}

pub async fn orm_row_counts(connection_string: &str) -> Result<RowCounts> {
    let db = sea_orm::Database::connect(connection_string)
        .await
        .with_context(|| format!("connecting to {connection_string}"))?;
    let counts = RowCounts {
        companies: company::Entity::find().count(&db).await?,
        contacts: contact::Entity::find().count(&db).await?,
    };
    db.close().await?;
    Ok(counts)
}

/// Contacts whose `company_id` does not match an existing company.
pub fn orphan_contacts(conn: &Connection) -> Result<i64> {
    let orphans = conn.query_row(
        "SELECT COUNT(*) FROM contacts c
         LEFT JOIN companies p ON p.id = c.company_id
         WHERE p.id IS NULL",
        [],
        |r| r.get(0),
    )?;
    Ok(orphans)
}
