use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::core::account::{Account, AccountNumber};
use crate::core::checking::CheckingPolicy;
use crate::core::customer::Customer;
use crate::core::savings::SavingsPolicy;

/// Chooses which account variant the institution instantiates.
///
/// [`Bank::create_account`](crate::bank::institution::Bank::create_account)
/// allocates the number and hands it to the factory together with the
/// owner; the factory decides everything variant-specific.
pub trait AccountFactory {
    fn create(&self, owner: Customer, number: AccountNumber) -> Account;
}

/// Builds checking-style accounts with a fixed overdraft limit.
#[derive(Debug, Clone)]
pub struct CheckingAccountFactory {
    policy: CheckingPolicy,
}

impl CheckingAccountFactory {
    /// Overdraft limit granted to newly opened accounts.
    pub const DEFAULT_OVERDRAFT_LIMIT: Decimal = dec!(20);

    /// Build a factory granting the given overdraft limit.
    ///
    /// # Panics
    ///
    /// Panics if `overdraft_limit` is negative.
    pub fn new(overdraft_limit: Decimal) -> Self {
        Self {
            policy: CheckingPolicy::new(overdraft_limit),
        }
    }
}

impl Default for CheckingAccountFactory {
    fn default() -> Self {
        Self::new(Self::DEFAULT_OVERDRAFT_LIMIT)
    }
}

impl AccountFactory for CheckingAccountFactory {
    fn create(&self, owner: Customer, number: AccountNumber) -> Account {
        Account::checking(owner, number, self.policy.clone())
    }
}

/// Builds savings-style accounts with a fixed interest rate.
#[derive(Debug, Clone)]
pub struct SavingsAccountFactory {
    interest_rate: Decimal,
}

impl SavingsAccountFactory {
    pub fn new(interest_rate: Decimal) -> Self {
        Self { interest_rate }
    }
}

impl Default for SavingsAccountFactory {
    fn default() -> Self {
        Self::new(SavingsPolicy::DEFAULT_INTEREST_RATE)
    }
}

impl AccountFactory for SavingsAccountFactory {
    fn create(&self, owner: Customer, number: AccountNumber) -> Account {
        Account::savings(
            owner,
            number,
            SavingsPolicy::with_interest_rate(self.interest_rate),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::core::policy::AccountKind;

    fn owner() -> Customer {
        Customer::new(
            "Jane",
            "Doe",
            "1 Main Street",
            NaiveDate::from_ymd_opt(1990, 3, 2).unwrap(),
        )
    }

    #[test]
    fn test_checking_factory_binds_owner_and_number() {
        let factory = CheckingAccountFactory::default();
        let account = factory.create(owner(), AccountNumber::new(7));

        assert_eq!(account.number(), AccountNumber::new(7));
        assert_eq!(account.owner(), &owner());
        assert_eq!(account.kind(), AccountKind::Checking);
        let policy = account.variant().as_checking().unwrap();
        assert_eq!(
            policy.overdraft_limit(),
            CheckingAccountFactory::DEFAULT_OVERDRAFT_LIMIT
        );
    }

    #[test]
    fn test_savings_factory_sets_interest_rate() {
        let factory = SavingsAccountFactory::new(dec!(0.05));
        let account = factory.create(owner(), AccountNumber::new(8));

        assert_eq!(account.kind(), AccountKind::Savings);
        let policy = account.variant().as_savings().unwrap();
        assert_eq!(policy.interest_rate(), dec!(0.05));
    }

    #[test]
    #[should_panic(expected = "must not be negative")]
    fn test_checking_factory_rejects_negative_limit() {
        CheckingAccountFactory::new(dec!(-10));
    }
}
