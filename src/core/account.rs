use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use thiserror::Error;

use super::checking::CheckingPolicy;
use super::currency::{self, convert, validate_amount, Currency, InvalidAmount};
use super::customer::Customer;
use super::events::{AccountEvent, AccountObserver, EventChannel};
use super::policy::{AccountKind, AccountVariant};
use super::savings::SavingsPolicy;

/// Unique identifier of an account within one institution.
///
/// Assigned once at creation and never reused, it is the account's sort and
/// equality key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AccountNumber(u64);

impl AccountNumber {
    pub fn new(number: u64) -> Self {
        Self(number)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for AccountNumber {
    fn from(number: u64) -> Self {
        Self::new(number)
    }
}

/// Identifier of an institution, carried on transfer legs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoutingCode(u64);

impl RoutingCode {
    pub fn new(code: u64) -> Self {
        Self(code)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RoutingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors raised by account operations.
///
/// These mark misuse or integrity faults and propagate to the caller;
/// business refusals (insufficient funds, exceeded cap) are reported as
/// boolean results instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error(transparent)]
    InvalidAmount(#[from] InvalidAmount),
    #[error("account {0} is locked")]
    Locked(AccountNumber),
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// The far side of a transfer leg: who is being paid or who paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterparty {
    pub name: String,
    pub number: AccountNumber,
    pub routing_code: RoutingCode,
}

impl Counterparty {
    pub fn new(name: impl Into<String>, number: AccountNumber, routing_code: RoutingCode) -> Self {
        Self {
            name: name.into(),
            number,
            routing_code,
        }
    }
}

/// A bank account.
///
/// Owns its balance, currency, lock flag and notification channel; the
/// variant-specific withdrawal rules live in an [`AccountVariant`] consulted
/// through the [`WithdrawalPolicy`](super::policy::WithdrawalPolicy)
/// capability. Every mutation goes through
/// the operations here — nothing outside the account touches its fields.
///
/// While locked, operations that could harm the owner (withdrawing,
/// changing the owner) are refused. Deposits and currency switches stay
/// available.
///
/// # Examples
///
/// ```
/// use banking_engine::core::account::{Account, AccountNumber};
/// use banking_engine::core::checking::CheckingPolicy;
/// use banking_engine::core::customer::Customer;
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let owner = Customer::new(
///     "Jane",
///     "Doe",
///     "1 Main Street",
///     NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
/// );
/// let mut account =
///     Account::checking(owner, AccountNumber::new(7), CheckingPolicy::new(dec!(500)));
///
/// account.deposit(dec!(20)).unwrap();
/// assert!(account.withdraw(dec!(30)).unwrap());
/// assert_eq!(account.balance(), dec!(-10));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    number: AccountNumber,
    owner: Customer,
    currency: Currency,
    balance: Decimal,
    locked: bool,
    variant: AccountVariant,
    #[serde(skip, default)]
    channel: EventChannel,
}

impl Account {
    /// Open a checking-style account: balance zero, reference currency,
    /// unlocked.
    pub fn checking(owner: Customer, number: AccountNumber, policy: CheckingPolicy) -> Self {
        Self::with_variant(owner, number, AccountVariant::Checking(policy))
    }

    /// Open a savings-style account: balance zero, reference currency,
    /// unlocked.
    pub fn savings(owner: Customer, number: AccountNumber, policy: SavingsPolicy) -> Self {
        Self::with_variant(owner, number, AccountVariant::Savings(policy))
    }

    fn with_variant(owner: Customer, number: AccountNumber, variant: AccountVariant) -> Self {
        Self {
            number,
            owner,
            currency: Currency::REFERENCE,
            balance: Decimal::ZERO,
            locked: false,
            variant,
            channel: EventChannel::new(),
        }
    }

    /// Denominate a freshly opened account in `currency`.
    ///
    /// Unlike [`set_currency`](Self::set_currency) this rescales nothing;
    /// the variant's monetary fields are taken to be expressed in the given
    /// currency already.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    // --- Accessors ---

    pub fn number(&self) -> AccountNumber {
        self.number
    }

    pub fn owner(&self) -> &Customer {
        &self.owner
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn kind(&self) -> AccountKind {
        self.variant.kind()
    }

    pub fn variant(&self) -> &AccountVariant {
        &self.variant
    }

    /// Balance with currency code, two decimal places.
    pub fn formatted_balance(&self) -> String {
        format!("{} {:>10.2}", self.currency, self.balance)
    }

    // --- Operations ---

    /// Add `amount` to the balance. Permitted even while locked.
    pub fn deposit(&mut self, amount: Decimal) -> Result<(), AccountError> {
        let amount = validate_amount(amount)?;
        let old = self.balance;
        self.balance += amount;
        self.publish_balance(old);
        Ok(())
    }

    /// Deposit an amount given in a foreign currency; it is converted into
    /// the account's currency first.
    pub fn deposit_in(&mut self, amount: Decimal, currency: Currency) -> Result<(), AccountError> {
        let converted = convert(amount, currency, self.currency)?;
        self.deposit(converted)
    }

    /// Take `amount` from the balance if the variant's rules permit it.
    ///
    /// Returns `Ok(true)` when the money was paid out, `Ok(false)` when the
    /// variant refused — a refusal changes nothing and notifies nobody.
    /// Fails with [`AccountError::Locked`] on a locked account and with
    /// [`AccountError::InvalidAmount`] on a negative amount.
    pub fn withdraw(&mut self, amount: Decimal) -> Result<bool, AccountError> {
        if self.locked {
            return Err(AccountError::Locked(self.number));
        }
        let amount = validate_amount(amount)?;
        if !self
            .variant
            .policy_mut()
            .is_withdrawal_allowed(self.balance, self.currency, amount)
        {
            return Ok(false);
        }
        let old = self.balance;
        self.balance -= amount;
        self.publish_balance(old);
        self.variant.policy_mut().on_withdrawn(amount);
        Ok(true)
    }

    /// Withdraw an amount given in a foreign currency; it is converted into
    /// the account's currency first.
    pub fn withdraw_in(
        &mut self,
        amount: Decimal,
        currency: Currency,
    ) -> Result<bool, AccountError> {
        let converted = convert(amount, currency, self.currency)?;
        self.withdraw(converted)
    }

    /// Hand the account to a new owner. Refused while locked.
    pub fn set_owner(&mut self, new_owner: Customer) -> Result<(), AccountError> {
        if self.locked {
            return Err(AccountError::Locked(self.number));
        }
        if new_owner == self.owner {
            return Ok(());
        }
        let old = std::mem::replace(&mut self.owner, new_owner);
        self.channel.publish(
            self.number,
            &AccountEvent::OwnerChanged {
                old,
                new: self.owner.clone(),
            },
        );
        Ok(())
    }

    /// Switch the currency the account is kept in.
    ///
    /// The balance and the variant's monetary fields (overdraft limit,
    /// monthly accumulator) are rescaled by the same conversion factor, so
    /// the account's value is unchanged. Permitted while locked.
    pub fn set_currency(&mut self, new: Currency) {
        if new == self.currency {
            return;
        }
        let factor = currency::conversion_factor(self.currency, new);
        let old = self.currency;
        self.balance *= factor;
        self.variant.policy_mut().rescale(factor);
        self.currency = new;
        self.channel
            .publish(self.number, &AccountEvent::CurrencyChanged { old, new });
    }

    /// Forbid operations that could harm the owner.
    pub fn lock(&mut self) {
        if !self.locked {
            self.locked = true;
            self.channel
                .publish(self.number, &AccountEvent::LockChanged { locked: true });
        }
    }

    /// Allow all operations again.
    pub fn unlock(&mut self) {
        if self.locked {
            self.locked = false;
            self.channel
                .publish(self.number, &AccountEvent::LockChanged { locked: false });
        }
    }

    // --- Notifications ---

    /// Register an observer for this account's state changes.
    pub fn subscribe(&mut self, observer: Rc<dyn AccountObserver>) {
        self.channel.subscribe(observer);
    }

    /// Remove a previously registered observer.
    pub fn unsubscribe(&mut self, observer: &Rc<dyn AccountObserver>) {
        self.channel.unsubscribe(observer);
    }

    fn publish_balance(&self, old: Decimal) {
        if old != self.balance {
            self.channel.publish(
                self.number,
                &AccountEvent::BalanceChanged {
                    old,
                    new: self.balance,
                },
            );
        }
    }

    // --- Transfer capability ---

    /// Whether this account may take part in transfers.
    pub fn supports_transfers(&self) -> bool {
        self.variant.supports_transfers()
    }

    /// Obtain the transfer capability, if the variant carries it.
    ///
    /// Savings-style accounts return `None`; sending or receiving a
    /// transfer leg is only expressible through the returned handle.
    pub fn as_transfer_party(&mut self) -> Option<TransferParty<'_>> {
        if self.variant.supports_transfers() {
            Some(TransferParty { account: self })
        } else {
            None
        }
    }
}

/// Capability handle of a transfer-capable account.
///
/// Borrowed from [`Account::as_transfer_party`]; holding one proves the
/// variant supports transfers, so the legs themselves only validate their
/// inputs and the lock state.
#[derive(Debug)]
pub struct TransferParty<'a> {
    account: &'a mut Account,
}

impl TransferParty<'_> {
    /// Send a transfer leg: an internal withdrawal under the variant's
    /// usual rules.
    ///
    /// Returns `Ok(false)` when the withdrawal rules refuse the amount.
    /// Fails with [`AccountError::Locked`] on a locked sender and with a
    /// validation error on a negative amount or empty payee name/memo.
    pub fn try_send(
        &mut self,
        amount: Decimal,
        payee: &Counterparty,
        memo: &str,
    ) -> Result<bool, AccountError> {
        let account = &mut *self.account;
        if account.locked {
            return Err(AccountError::Locked(account.number));
        }
        if payee.name.is_empty() {
            return Err(AccountError::InvalidArgument(
                "payee name must not be empty",
            ));
        }
        if memo.is_empty() {
            return Err(AccountError::InvalidArgument("memo must not be empty"));
        }
        let amount = validate_amount(amount)?;
        if !account
            .variant
            .policy_mut()
            .is_withdrawal_allowed(account.balance, account.currency, amount)
        {
            return Ok(false);
        }
        let old = account.balance;
        account.balance -= amount;
        account.publish_balance(old);
        account.variant.policy_mut().on_withdrawn(amount);
        Ok(true)
    }

    /// Receive a transfer leg: an internal deposit.
    ///
    /// Never consults the lock flag — refusing incoming funds would only
    /// harm the owner further. Fails on a negative amount or empty payer
    /// name/memo.
    pub fn receive(
        &mut self,
        amount: Decimal,
        payer: &Counterparty,
        memo: &str,
    ) -> Result<(), AccountError> {
        if payer.name.is_empty() {
            return Err(AccountError::InvalidArgument(
                "payer name must not be empty",
            ));
        }
        if memo.is_empty() {
            return Err(AccountError::InvalidArgument("memo must not be empty"));
        }
        let amount = validate_amount(amount)?;
        let account = &mut *self.account;
        let old = account.balance;
        account.balance += amount;
        account.publish_balance(old);
        Ok(())
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.number == other.number
    }
}

impl Eq for Account {}

impl Hash for Account {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        self.number.hash(state);
    }
}

impl Ord for Account {
    fn cmp(&self, other: &Self) -> Ordering {
        self.number
            .cmp(&other.number)
            .then_with(|| self.kind().cmp(&other.kind()))
    }
}

impl PartialOrd for Account {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            AccountKind::Checking => writeln!(f, "-- CHECKING ACCOUNT --")?,
            AccountKind::Savings => writeln!(f, "-- SAVINGS ACCOUNT --")?,
        }
        writeln!(f, "Number:  {:>10}", self.number)?;
        writeln!(f, "Owner:   {}", self.owner)?;
        writeln!(f, "Balance: {}", self.formatted_balance())?;
        if self.locked {
            writeln!(f, "LOCKED")?;
        }
        match &self.variant {
            AccountVariant::Checking(policy) => writeln!(
                f,
                "Overdraft limit: {} {:.2}",
                self.currency,
                policy.overdraft_limit()
            ),
            AccountVariant::Savings(policy) => writeln!(
                f,
                "Interest rate: {}%",
                policy.interest_rate() * Decimal::ONE_HUNDRED
            ),
        }
    }
}
