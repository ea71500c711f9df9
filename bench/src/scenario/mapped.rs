//! Mapped-entity path: the aggregate is persisted through sea-orm.
//!
//! Each iteration gets its own `DatabaseConnection`, the persistence context
//! of this path. The scenario owns a current-thread tokio runtime and blocks
//! on the async ORM calls so the driver can stay synchronous.

use super::InsertScenario;
use crate::entity::{company, contact};
use anyhow::{Context, Result};
use crm_core::{BenchConfig, Company, CompanyDraft, Contact, CrmFaker};
use sea_orm::{
    ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set, TransactionTrait,
};
use tokio::runtime::{Builder, Runtime};

/// Save a company aggregate in a single call.
///
/// The parent is inserted first so its generated key can be assigned to the
/// children; everything happens in one ORM transaction that is rolled back if
/// any insert fails.
pub async fn save_aggregate<C>(db: &C, draft: CompanyDraft) -> Result<Company>
where
    C: TransactionTrait,
{
    let txn = db.begin().await.context("beginning ORM transaction")?;

    let saved = company::ActiveModel {
        name: Set(draft.name),
        tax_id: Set(draft.tax_id),
        city: Set(draft.city),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .context("inserting company")?;

    let mut contacts: Vec<Contact> = Vec::with_capacity(draft.contacts.len());
    for contact in draft.contacts {
        let model = contact::ActiveModel {
            company_id: Set(saved.id),
            name: Set(contact.name),
            phone: Set(contact.phone),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("inserting contact")?;
        contacts.push(model.into());
    }

    txn.commit().await.context("committing ORM transaction")?;

    Ok(Company {
        id: saved.id,
        name: saved.name,
        tax_id: saved.tax_id,
        city: saved.city,
        contacts,
    })
}

impl From<contact::Model> for Contact {
    fn from(model: contact::Model) -> Self {
        Contact {
            id: model.id,
            company_id: model.company_id,
            name: model.name,
            phone: model.phone,
        }
    }
}

pub struct MappedEntityScenario {
    runtime: Runtime,
}

impl MappedEntityScenario {
    pub fn new() -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .context("building tokio runtime")?;
        Ok(Self { runtime })
    }

    /// Run a future on the scenario's runtime.
    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

pub struct MappedIteration {
    db: DatabaseConnection,
    faker: CrmFaker,
    contacts_per_company: usize,
}

impl InsertScenario for MappedEntityScenario {
    type Iteration = MappedIteration;

    fn name(&self) -> &'static str {
        "mapped-entity"
    }

    fn setup(&self, config: &BenchConfig) -> Result<MappedIteration> {
        let mut options = ConnectOptions::new(config.orm_connection_string.clone());
        options
            .max_connections(1)
            .sqlx_logging_level(log::LevelFilter::Trace);

        let db = self
            .runtime
            .block_on(Database::connect(options))
            .with_context(|| format!("connecting to {}", config.orm_connection_string))?;

        Ok(MappedIteration {
            db,
            faker: CrmFaker::new(),
            contacts_per_company: config.contacts_per_company,
        })
    }

    fn execute(&self, iteration: &mut MappedIteration) -> Result<Company> {
        let draft = CompanyDraft::generate(&mut iteration.faker, iteration.contacts_per_company);
        let company = self.runtime.block_on(save_aggregate(&iteration.db, draft))?;

        log::trace!(
            "mapped-entity: saved company {} with {} contacts",
            company.id,
            company.contacts.len()
        );
        Ok(company)
    }

    fn cleanup(&self, iteration: MappedIteration) -> Result<()> {
        self.runtime
            .block_on(iteration.db.close())
            .context("closing ORM connection")?;
        Ok(())
    }
}
