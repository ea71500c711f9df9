//! sea-orm entities for the mapped-entity store.

pub mod company;
pub mod contact;
