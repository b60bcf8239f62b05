use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use thiserror::Error;

use crate::bank::factory::AccountFactory;
use crate::core::account::{Account, AccountError, AccountNumber, Counterparty, RoutingCode};
use crate::core::customer::Customer;

/// Errors raised at the institution boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    #[error("account {0} does not exist")]
    AccountNotFound(AccountNumber),
    #[error(transparent)]
    Account(#[from] AccountError),
}

/// The institution: owns the accounts and orchestrates everything that
/// spans more than one of them.
///
/// Accounts are keyed by their number in a `BTreeMap`, so every report
/// iterates in ascending number order. Numbers are assigned from a counter
/// that never goes backwards — a deleted account's number stays retired.
/// The bank never touches account internals; each operation delegates to
/// the account, which enforces its own rules and notifies its observers.
///
/// # Examples
///
/// ```
/// use banking_engine::prelude::*;
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let mut bank = Bank::new(RoutingCode::new(10020030));
/// let owner = Customer::new(
///     "Jane",
///     "Doe",
///     "1 Main Street",
///     NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
/// );
/// let number = bank.create_account(&CheckingAccountFactory::default(), owner);
///
/// bank.deposit(number, dec!(100)).unwrap();
/// assert_eq!(bank.balance(number).unwrap(), dec!(100));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bank {
    routing_code: RoutingCode,
    last_assigned: u64,
    accounts: BTreeMap<AccountNumber, Account>,
}

impl Bank {
    pub fn new(routing_code: RoutingCode) -> Self {
        Self {
            routing_code,
            last_assigned: 0,
            accounts: BTreeMap::new(),
        }
    }

    pub fn routing_code(&self) -> RoutingCode {
        self.routing_code
    }

    /// Open a new account for `owner`, with the variant the factory
    /// chooses, and return its freshly assigned number.
    ///
    /// # Panics
    ///
    /// Panics if the factory binds the account to a different number than
    /// the one it was handed.
    pub fn create_account(
        &mut self,
        factory: &dyn AccountFactory,
        owner: Customer,
    ) -> AccountNumber {
        self.last_assigned += 1;
        let number = AccountNumber::new(self.last_assigned);
        let account = factory.create(owner, number);
        assert_eq!(
            account.number(),
            number,
            "factory must bind the account to the assigned number"
        );
        self.accounts.insert(number, account);
        number
    }

    /// Drop the account with the given number. Returns whether it existed;
    /// its number is never handed out again.
    pub fn delete_account(&mut self, number: AccountNumber) -> bool {
        self.accounts.remove(&number).is_some()
    }

    pub fn account(&self, number: AccountNumber) -> Option<&Account> {
        self.accounts.get(&number)
    }

    /// Mutable access for front-ends that drive an account directly
    /// (deposit, withdraw, lock, subscribe) through its own contract.
    pub fn account_mut(&mut self, number: AccountNumber) -> Option<&mut Account> {
        self.accounts.get_mut(&number)
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn account_numbers(&self) -> Vec<AccountNumber> {
        self.accounts.keys().copied().collect()
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    fn existing(&self, number: AccountNumber) -> Result<&Account, BankError> {
        self.accounts
            .get(&number)
            .ok_or(BankError::AccountNotFound(number))
    }

    fn existing_mut(&mut self, number: AccountNumber) -> Result<&mut Account, BankError> {
        self.accounts
            .get_mut(&number)
            .ok_or(BankError::AccountNotFound(number))
    }

    /// Pay `amount` into the account. Propagates the account's validation
    /// error on a negative amount.
    pub fn deposit(&mut self, number: AccountNumber, amount: Decimal) -> Result<(), BankError> {
        self.existing_mut(number)?.deposit(amount)?;
        Ok(())
    }

    /// Take `amount` out of the account and report whether it worked.
    ///
    /// A withdrawal refused by the account — locked, bad amount, or the
    /// variant's rules — is an expected business outcome here, so it comes
    /// back as `Ok(false)` with a logged note rather than an error. Only an
    /// unknown number is a fault.
    pub fn withdraw(&mut self, number: AccountNumber, amount: Decimal) -> Result<bool, BankError> {
        let account = self.existing_mut(number)?;
        match account.withdraw(amount) {
            Ok(withdrawn) => Ok(withdrawn),
            Err(err) => {
                log::warn!("withdrawal of {amount} from account {number} refused: {err}");
                Ok(false)
            }
        }
    }

    pub fn balance(&self, number: AccountNumber) -> Result<Decimal, BankError> {
        Ok(self.existing(number)?.balance())
    }

    /// Move `amount` from one account of this institution to another.
    ///
    /// Fails with [`BankError::AccountNotFound`] when either number is
    /// unknown. Returns `Ok(false)` without touching anything when either
    /// party lacks the transfer capability, either party is locked, or the
    /// send leg refuses. If the receive leg rejects after the send leg
    /// succeeded, the amount is deposited back into the source — the sender
    /// never loses money that never arrived.
    pub fn transfer(
        &mut self,
        from: AccountNumber,
        to: AccountNumber,
        amount: Decimal,
        memo: &str,
    ) -> Result<bool, BankError> {
        let sender = self.existing(from)?;
        let receiver = self.existing(to)?;

        if !sender.supports_transfers() || !receiver.supports_transfers() {
            return Ok(false);
        }
        if sender.is_locked() || receiver.is_locked() {
            return Ok(false);
        }

        let payee = Counterparty::new(receiver.owner().full_name(), to, self.routing_code);
        let payer = Counterparty::new(sender.owner().full_name(), from, self.routing_code);

        let sent = {
            let Some(mut party) = self.existing_mut(from)?.as_transfer_party() else {
                return Ok(false);
            };
            match party.try_send(amount, &payee, memo) {
                Ok(sent) => sent,
                Err(err) => {
                    log::warn!("transfer of {amount} from account {from} refused: {err}");
                    return Ok(false);
                }
            }
        };
        if !sent {
            return Ok(false);
        }

        let received = {
            match self.existing_mut(to)?.as_transfer_party() {
                Some(mut party) => party.receive(amount, &payer, memo),
                None => Err(AccountError::InvalidArgument(
                    "receiving account does not support transfers",
                )),
            }
        };
        match received {
            Ok(()) => Ok(true),
            Err(err) => {
                // the receive leg left no state behind; return the money
                if let Err(refund_err) = self.existing_mut(from)?.deposit(amount) {
                    log::error!(
                        "compensation deposit of {amount} to account {from} failed: {refund_err}"
                    );
                }
                log::warn!(
                    "transfer of {amount} to account {to} rejected ({err}); funds returned to {from}"
                );
                Ok(false)
            }
        }
    }

    /// Lock every account whose balance is negative. Never unlocks.
    pub fn lock_overdrawn_accounts(&mut self) {
        for account in self.accounts.values_mut() {
            if account.balance() < Decimal::ZERO {
                account.lock();
            }
        }
    }

    /// Owners of every account holding at least `minimum`, in account
    /// number order. An owner appears once per qualifying account.
    pub fn customers_with_minimum_balance(&self, minimum: Decimal) -> Vec<&Customer> {
        self.accounts
            .values()
            .filter(|account| account.balance() >= minimum)
            .map(|account| account.owner())
            .collect()
    }

    /// One line per distinct customer with name and birth date, sorted by
    /// name.
    pub fn customer_birthday_report(&self) -> String {
        let mut owners: Vec<&Customer> = self.accounts.values().map(Account::owner).collect();
        owners.sort_by(|a, b| {
            (a.first_name(), a.last_name()).cmp(&(b.first_name(), b.last_name()))
        });
        owners.dedup();

        let mut report = String::new();
        for owner in owners {
            let _ = writeln!(
                report,
                "Name: {}. Born: {}",
                owner.full_name(),
                owner.birth_date()
            );
        }
        report
    }

    /// Every number in `[1, highest assigned]` that no account currently
    /// holds — the holes left behind by deletions.
    pub fn free_account_number_gaps(&self) -> Vec<AccountNumber> {
        (1..=self.last_assigned)
            .map(AccountNumber::new)
            .filter(|number| !self.accounts.contains_key(number))
            .collect()
    }

    /// One line per account with its number and formatted balance.
    pub fn summary(&self) -> String {
        let mut listing = String::new();
        for account in self.accounts.values() {
            let _ = writeln!(
                listing,
                "Account {:>10}: {}",
                account.number(),
                account.formatted_balance()
            );
        }
        listing
    }
}
