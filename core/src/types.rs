//! CRM records written by the benchmarks.
//!
//! Drafts are what a scenario builds in memory before persisting; the saved
//! types carry the keys the database generated.

use crate::faker::CrmFaker;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub phone: String,
}

/// Company aggregate before it has been persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyDraft {
    pub name: String,
    pub tax_id: String,
    pub city: String,
    pub contacts: Vec<ContactDraft>,
}

impl CompanyDraft {
    /// Build a company with exactly `contacts_per_company` generated contacts.
    pub fn generate(faker: &mut CrmFaker, contacts_per_company: usize) -> Self {
        let mut company = CompanyDraft {
            name: faker.company_name(),
            tax_id: faker.cnpj(false),
            city: faker.city(),
            contacts: Vec::with_capacity(contacts_per_company),
        };
        for _ in 0..contacts_per_company {
            company.contacts.push(ContactDraft {
                name: faker.full_name(),
                phone: faker.phone_number(),
            });
        }
        company
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: i64,
    pub company_id: i64,
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub tax_id: String,
    pub city: String,
    pub contacts: Vec<Contact>,
}

impl Company {
    /// Parent row plus one row per contact.
    pub fn row_count(&self) -> usize {
        1 + self.contacts.len()
    }

    /// True when every contact points back at this company.
    pub fn is_linked(&self) -> bool {
        self.contacts.iter().all(|c| c.company_id == self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faker::is_valid_cnpj;

    #[test]
    fn generate_honours_contact_count() {
        let mut faker = CrmFaker::new();
        for n in [0, 1, 3, 10] {
            let draft = CompanyDraft::generate(&mut faker, n);
            assert_eq!(draft.contacts.len(), n);
            assert!(!draft.name.is_empty());
            assert!(!draft.city.is_empty());
            assert!(is_valid_cnpj(&draft.tax_id));
            assert!(draft.contacts.iter().all(|c| !c.name.is_empty() && !c.phone.is_empty()));
        }
    }

    #[test]
    fn linked_and_row_count() {
        let contact = |id, company_id| Contact {
            id,
            company_id,
            name: "Ana".into(),
            phone: "(11) 91234-5678".into(),
        };
        let mut company = Company {
            id: 7,
            name: "Silva Ltda.".into(),
            tax_id: "11222333000181".into(),
            city: "Campinas".into(),
            contacts: vec![contact(1, 7), contact(2, 7)],
        };
        assert_eq!(company.row_count(), 3);
        assert!(company.is_linked());

        company.contacts.push(contact(3, 8));
        assert!(!company.is_linked());
    }
}
