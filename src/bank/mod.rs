//! The institution: account registry, factories, transfers, and reports.

pub mod factory;
pub mod institution;
