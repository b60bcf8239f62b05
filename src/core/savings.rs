use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::currency::Currency;
use super::policy::WithdrawalPolicy;

/// Cumulative amount a savings account may pay out per calendar month,
/// expressed in the reference currency.
pub const MONTHLY_WITHDRAWAL_CAP: Decimal = dec!(2000);

/// Balance a savings account must retain after any withdrawal, in the
/// account's current currency.
pub const MINIMUM_RETAINED_BALANCE: Decimal = dec!(0.50);

/// A calendar month, the granularity at which the withdrawal cap resets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn current() -> Self {
        Self::from_date(Utc::now().date_naive())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }
}

/// Withdrawal policy of a savings-style account.
///
/// The balance never drops below a small retained minimum, and withdrawals
/// within one calendar month may not exceed a fixed cap. The cap is a
/// reference-currency constant converted into the account's currency at
/// every check, so a currency switch cannot widen or shrink it. Savings
/// accounts do not participate in transfers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsPolicy {
    /// Annual interest rate as a fraction (0.03 = 3 %). Display only; the
    /// engine does not compound it.
    interest_rate: Decimal,
    withdrawn_this_month: Decimal,
    period_anchor: Period,
}

impl SavingsPolicy {
    pub const DEFAULT_INTEREST_RATE: Decimal = dec!(0.03);

    pub fn new() -> Self {
        Self::with_interest_rate(Self::DEFAULT_INTEREST_RATE)
    }

    pub fn with_interest_rate(interest_rate: Decimal) -> Self {
        Self {
            interest_rate,
            withdrawn_this_month: Decimal::ZERO,
            period_anchor: Period::current(),
        }
    }

    pub fn interest_rate(&self) -> Decimal {
        self.interest_rate
    }

    pub fn withdrawn_this_month(&self) -> Decimal {
        self.withdrawn_this_month
    }

    /// The month the accumulator applies to.
    pub fn period_anchor(&self) -> Period {
        self.period_anchor
    }

    /// Reset the accumulator when the anchor month has passed.
    fn roll_period(&mut self) {
        let now = Period::current();
        if now != self.period_anchor {
            self.withdrawn_this_month = Decimal::ZERO;
            self.period_anchor = now;
        }
    }
}

impl Default for SavingsPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl WithdrawalPolicy for SavingsPolicy {
    fn is_withdrawal_allowed(
        &mut self,
        balance: Decimal,
        currency: Currency,
        amount: Decimal,
    ) -> bool {
        self.roll_period();
        let cap = currency.from_reference(MONTHLY_WITHDRAWAL_CAP);
        balance - amount >= MINIMUM_RETAINED_BALANCE
            && self.withdrawn_this_month + amount <= cap
    }

    fn on_withdrawn(&mut self, amount: Decimal) {
        self.withdrawn_this_month += amount;
        self.period_anchor = Period::current();
    }

    fn rescale(&mut self, factor: Decimal) {
        self.withdrawn_this_month *= factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_retained_minimum() {
        let mut policy = SavingsPolicy::new();
        assert!(policy.is_withdrawal_allowed(dec!(100), Currency::Eur, dec!(99.50)));
        assert!(!policy.is_withdrawal_allowed(dec!(100), Currency::Eur, dec!(99.51)));
    }

    #[test]
    fn test_enforces_monthly_cap() {
        let mut policy = SavingsPolicy::new();
        assert!(policy.is_withdrawal_allowed(dec!(5000), Currency::Eur, dec!(2000)));
        policy.on_withdrawn(dec!(1800));
        assert!(policy.is_withdrawal_allowed(dec!(3200), Currency::Eur, dec!(200)));
        assert!(!policy.is_withdrawal_allowed(dec!(3200), Currency::Eur, dec!(200.01)));
    }

    #[test]
    fn test_cap_is_converted_into_account_currency() {
        let mut policy = SavingsPolicy::new();
        // 2000 EUR is 3911.66 BGN.
        assert!(policy.is_withdrawal_allowed(dec!(10000), Currency::Bgn, dec!(3911.66)));
        assert!(!policy.is_withdrawal_allowed(dec!(10000), Currency::Bgn, dec!(3911.67)));
    }

    #[test]
    fn test_new_month_resets_accumulator() {
        let mut policy = SavingsPolicy::new();
        policy.on_withdrawn(dec!(2000));
        assert!(!policy.is_withdrawal_allowed(dec!(5000), Currency::Eur, dec!(1)));

        // Pretend the last withdrawal happened in an earlier month.
        policy.period_anchor = Period {
            year: 2020,
            month: 1,
        };
        assert!(policy.is_withdrawal_allowed(dec!(5000), Currency::Eur, dec!(1)));
        assert_eq!(policy.withdrawn_this_month(), Decimal::ZERO);
        assert_eq!(policy.period_anchor(), Period::current());
    }

    #[test]
    fn test_refused_check_leaves_accumulator_unchanged() {
        let mut policy = SavingsPolicy::new();
        policy.on_withdrawn(dec!(500));
        assert!(!policy.is_withdrawal_allowed(dec!(5000), Currency::Eur, dec!(1600)));
        assert_eq!(policy.withdrawn_this_month(), dec!(500));
    }

    #[test]
    fn test_rescale_follows_currency_switch() {
        let mut policy = SavingsPolicy::new();
        policy.on_withdrawn(dec!(100));
        policy.rescale(dec!(1.95583));
        assert_eq!(policy.withdrawn_this_month(), dec!(195.583));
    }
}
