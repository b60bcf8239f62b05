use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::currency::Currency;
use super::policy::WithdrawalPolicy;

/// Withdrawal policy of a checking-style account.
///
/// The balance may go negative down to the overdraft limit. Checking
/// accounts are the only variant that participates in transfers.
///
/// # Examples
///
/// ```
/// use banking_engine::core::checking::CheckingPolicy;
/// use banking_engine::core::currency::Currency;
/// use banking_engine::core::policy::WithdrawalPolicy;
/// use rust_decimal_macros::dec;
///
/// let mut policy = CheckingPolicy::new(dec!(500));
/// assert!(policy.is_withdrawal_allowed(dec!(20), Currency::Eur, dec!(520)));
/// assert!(!policy.is_withdrawal_allowed(dec!(20), Currency::Eur, dec!(521)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckingPolicy {
    overdraft_limit: Decimal,
}

impl CheckingPolicy {
    /// Overdraft limit of a standard checking account.
    pub const DEFAULT_OVERDRAFT_LIMIT: Decimal = dec!(500);

    /// Create a policy with the given overdraft limit, expressed in the
    /// account's currency.
    ///
    /// # Panics
    ///
    /// Panics if `overdraft_limit` is negative.
    pub fn new(overdraft_limit: Decimal) -> Self {
        assert!(
            overdraft_limit >= Decimal::ZERO,
            "overdraft limit must not be negative, got {}",
            overdraft_limit
        );
        Self { overdraft_limit }
    }

    /// How far below zero the balance may fall.
    pub fn overdraft_limit(&self) -> Decimal {
        self.overdraft_limit
    }
}

impl Default for CheckingPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_OVERDRAFT_LIMIT)
    }
}

impl WithdrawalPolicy for CheckingPolicy {
    fn is_withdrawal_allowed(
        &mut self,
        balance: Decimal,
        _currency: Currency,
        amount: Decimal,
    ) -> bool {
        balance - amount >= -self.overdraft_limit
    }

    fn rescale(&mut self, factor: Decimal) {
        self.overdraft_limit *= factor;
    }
}
