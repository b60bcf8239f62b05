//! # banking-engine
//!
//! Multi-currency retail banking engine for a single institution.
//!
//! Accounts come in two variants with different withdrawal rules — checking
//! accounts may overdraw up to a limit and can take part in transfers,
//! savings accounts keep a retained minimum and a monthly withdrawal cap.
//! Balances are kept in one of a fixed set of currencies with constant
//! conversion rates, every state change is published to per-account
//! observers, and the institution-level transfer protocol compensates the
//! sender when the receiving leg fails.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: accounts, withdrawal policies,
//!   currencies, customers, notification channel
//! - **bank** — The institution: account registry, variant factories,
//!   transfers, aggregate reports

pub mod bank;
pub mod core;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::bank::factory::{
        AccountFactory, CheckingAccountFactory, SavingsAccountFactory,
    };
    pub use crate::bank::institution::{Bank, BankError};
    pub use crate::core::account::{
        Account, AccountError, AccountNumber, Counterparty, RoutingCode,
    };
    pub use crate::core::checking::CheckingPolicy;
    pub use crate::core::currency::Currency;
    pub use crate::core::customer::Customer;
    pub use crate::core::events::{AccountEvent, AccountObserver};
    pub use crate::core::policy::AccountKind;
    pub use crate::core::savings::SavingsPolicy;
}
