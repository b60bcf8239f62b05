//! banking-engine demo
//!
//! Walks one institution through the account life cycle on the console:
//! opening accounts through factories, deposits and refused withdrawals,
//! a failing and a succeeding transfer, a currency switch, the aggregate
//! reports, and a JSON snapshot of the whole state.
//!
//! Set `RUST_LOG=warn` to see the institution's log of refused operations.

use std::error::Error;
use std::rc::Rc;

use banking_engine::prelude::*;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

/// Console observer standing in for a front-end binding: prints every
/// account state change as it happens.
struct ConsoleWatcher;

impl AccountObserver for ConsoleWatcher {
    fn account_changed(&self, number: AccountNumber, event: &AccountEvent) {
        match event {
            AccountEvent::BalanceChanged { old, new } => {
                println!("[watch] account {number}: balance {old} -> {new}");
            }
            AccountEvent::LockChanged { locked } => {
                let state = if *locked { "locked" } else { "unlocked" };
                println!("[watch] account {number}: {state}");
            }
            AccountEvent::OwnerChanged { old, new } => {
                println!(
                    "[watch] account {number}: owner {} -> {}",
                    old.full_name(),
                    new.full_name()
                );
            }
            AccountEvent::CurrencyChanged { old, new } => {
                println!("[watch] account {number}: currency {old} -> {new}");
            }
        }
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut bank = Bank::new(RoutingCode::new(10020030));
    let checking = CheckingAccountFactory::new(dec!(500));
    let savings = SavingsAccountFactory::default();

    let alice = bank.create_account(
        &checking,
        Customer::new("Alice", "Archer", "1 Main Street", date(1976, 7, 13)),
    );
    let bob = bank.create_account(
        &checking,
        Customer::new("Bob", "Baker", "2 Side Street", date(1985, 11, 2)),
    );
    let carol = bank.create_account(
        &savings,
        Customer::new("Carol", "Clay", "3 Back Lane", date(1992, 4, 30)),
    );

    let watcher: Rc<dyn AccountObserver> = Rc::new(ConsoleWatcher);
    for number in [alice, bob, carol] {
        if let Some(account) = bank.account_mut(number) {
            account.subscribe(Rc::clone(&watcher));
        }
    }

    println!("== deposits ==");
    bank.deposit(alice, dec!(20))?;
    bank.deposit(carol, dec!(2500))?;

    println!("\n== overdraft ==");
    println!("withdraw 30 from {alice}: {}", bank.withdraw(alice, dec!(30))?);
    println!("withdraw 530 from {alice}: {}", bank.withdraw(alice, dec!(530))?);
    println!("balance of {alice}: {}", bank.balance(alice)?);

    println!("\n== monthly cap ==");
    println!("withdraw 1800 from {carol}: {}", bank.withdraw(carol, dec!(1800))?);
    println!("withdraw 300 from {carol}: {}", bank.withdraw(carol, dec!(300))?);

    println!("\n== transfers ==");
    bank.deposit(alice, dec!(100))?;
    if let Some(account) = bank.account_mut(bob) {
        account.lock();
    }
    println!(
        "to locked {bob}: {}",
        bank.transfer(alice, bob, dec!(50), "rent")?
    );
    if let Some(account) = bank.account_mut(bob) {
        account.unlock();
    }
    println!(
        "to unlocked {bob}: {}",
        bank.transfer(alice, bob, dec!(50), "rent")?
    );
    println!(
        "to savings {carol}: {}",
        bank.transfer(alice, carol, dec!(10), "gift")?
    );

    println!("\n== currency switch ==");
    if let Some(account) = bank.account_mut(carol) {
        account.set_currency(Currency::Bgn);
    }

    println!("\n== lock overdrawn ==");
    bank.lock_overdrawn_accounts();

    println!("\n== accounts ==");
    for number in [alice, bob, carol] {
        if let Some(account) = bank.account(number) {
            println!("{account}");
        }
    }

    println!("== summary ==");
    print!("{}", bank.summary());

    println!("\n== birthdays ==");
    print!("{}", bank.customer_birthday_report());

    println!("\n== customers holding at least 50 ==");
    for customer in bank.customers_with_minimum_balance(dec!(50)) {
        println!("{customer}");
    }

    bank.delete_account(bob);
    println!("\n== free number gaps after deleting {bob} ==");
    println!("{:?}", bank.free_account_number_gaps());

    println!("\n== snapshot ==");
    println!("{}", serde_json::to_string_pretty(&bank)?);

    Ok(())
}
