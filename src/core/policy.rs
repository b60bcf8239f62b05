use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::checking::CheckingPolicy;
use super::currency::Currency;
use super::savings::SavingsPolicy;

/// Tag identifying the concrete account variant.
///
/// Part of account equality: two accounts are equal only when they share a
/// kind and a number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum AccountKind {
    Checking,
    Savings,
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountKind::Checking => write!(f, "checking"),
            AccountKind::Savings => write!(f, "savings"),
        }
    }
}

/// The variant-specific half of the withdrawal contract.
///
/// The account runs the uniform envelope (lock gate, amount validation,
/// balance mutation, notification) and consults the policy twice: once to
/// ask whether the withdrawal may proceed, once to let it record the
/// withdrawal afterwards. Keeping the two steps separate lets each variant
/// define "allowed" on its own terms without touching the envelope.
pub trait WithdrawalPolicy {
    /// Decide whether withdrawing `amount` from the given balance is
    /// permitted. May mutate policy bookkeeping (e.g. rolling a monthly
    /// accumulator into a new period) but never the balance itself.
    fn is_withdrawal_allowed(
        &mut self,
        balance: Decimal,
        currency: Currency,
        amount: Decimal,
    ) -> bool;

    /// Record a withdrawal that the envelope has just applied.
    fn on_withdrawn(&mut self, _amount: Decimal) {}

    /// Rescale the policy's own monetary fields when the account switches
    /// currency. `factor` is the rate ratio the balance was rescaled by.
    fn rescale(&mut self, _factor: Decimal) {}
}

/// Variant state stored inside an account.
///
/// An enum rather than a boxed trait object so the whole account tree stays
/// cloneable and serializable for snapshots; behavior still flows through
/// [`WithdrawalPolicy`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AccountVariant {
    Checking(CheckingPolicy),
    Savings(SavingsPolicy),
}

impl AccountVariant {
    pub fn kind(&self) -> AccountKind {
        match self {
            AccountVariant::Checking(_) => AccountKind::Checking,
            AccountVariant::Savings(_) => AccountKind::Savings,
        }
    }

    /// Whether this variant may take part in transfers, as sender or
    /// receiver.
    pub fn supports_transfers(&self) -> bool {
        matches!(self, AccountVariant::Checking(_))
    }

    pub fn as_checking(&self) -> Option<&CheckingPolicy> {
        match self {
            AccountVariant::Checking(policy) => Some(policy),
            AccountVariant::Savings(_) => None,
        }
    }

    pub fn as_savings(&self) -> Option<&SavingsPolicy> {
        match self {
            AccountVariant::Savings(policy) => Some(policy),
            AccountVariant::Checking(_) => None,
        }
    }

    pub(crate) fn policy_mut(&mut self) -> &mut dyn WithdrawalPolicy {
        match self {
            AccountVariant::Checking(policy) => policy,
            AccountVariant::Savings(policy) => policy,
        }
    }
}
