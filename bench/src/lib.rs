//! CRM Insert Benchmark
//!
//! Compares two ways of writing a company with its contacts to SQLite:
//! - **Mapped-entity path**: the aggregate is saved through sea-orm
//! - **Explicit-SQL path**: hand-written INSERTs through rusqlite in one
//!   explicit transaction
//!
//! Run benchmarks: `cargo bench`
//! Run the standalone report: `cargo run --release`
//! Run tests: `cargo test`

pub mod driver;
pub mod entity;
pub mod report;
pub mod scenario;
pub mod schema;
