use approx::assert_relative_eq;
use banking_engine::core::currency::convert;
use banking_engine::prelude::*;
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn owner() -> Customer {
    Customer::new(
        "Jane",
        "Doe",
        "1 Main Street",
        NaiveDate::from_ymd_opt(1990, 3, 2).unwrap(),
    )
}

/// Generate an amount with two decimal places, up to 10,000.00.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Generate a currency from the full set.
fn arb_currency() -> impl Strategy<Value = Currency> {
    prop::sample::select(vec![Currency::Eur, Currency::Bgn, Currency::Ltl, Currency::Km])
}

/// Generate a deposit (true) or withdrawal (false) with an amount.
fn arb_operations() -> impl Strategy<Value = Vec<(bool, Decimal)>> {
    prop::collection::vec((any::<bool>(), arb_amount()), 1..40)
}

proptest! {
    // ===================================================================
    // INVARIANT 1: A checking balance never falls below the overdraft
    // limit, no matter what sequence of deposits and withdrawals runs.
    // ===================================================================
    #[test]
    fn checking_balance_never_breaches_overdraft(
        limit_cents in 0i64..100_000,
        ops in arb_operations(),
    ) {
        let limit = Decimal::new(limit_cents, 2);
        let mut account = Account::checking(
            owner(),
            AccountNumber::new(1),
            CheckingPolicy::new(limit),
        );

        for (is_deposit, amount) in ops {
            if is_deposit {
                account.deposit(amount).unwrap();
            } else {
                account.withdraw(amount).unwrap();
            }
            prop_assert!(
                account.balance() >= -limit,
                "balance {} fell below -{}",
                account.balance(),
                limit
            );
        }
    }

    // ===================================================================
    // INVARIANT 2: A savings balance never goes negative, and the monthly
    // accumulator never exceeds the cap expressed in the account currency.
    // ===================================================================
    #[test]
    fn savings_balance_and_cap_hold(ops in arb_operations()) {
        let mut account = Account::savings(
            owner(),
            AccountNumber::new(1),
            SavingsPolicy::new(),
        );

        for (is_deposit, amount) in ops {
            if is_deposit {
                account.deposit(amount).unwrap();
            } else {
                account.withdraw(amount).unwrap();
            }
            prop_assert!(account.balance() >= Decimal::ZERO);
            let policy = account.variant().as_savings().unwrap();
            prop_assert!(policy.withdrawn_this_month() <= dec!(2000));
        }
    }

    // ===================================================================
    // INVARIANT 3: A refused withdrawal is a no-op. Balance and variant
    // bookkeeping stay exactly as they were.
    // ===================================================================
    #[test]
    fn refused_withdrawal_changes_nothing(
        start in arb_amount(),
        attempt in arb_amount(),
    ) {
        let mut account = Account::checking(
            owner(),
            AccountNumber::new(1),
            CheckingPolicy::new(dec!(50)),
        );
        account.deposit(start).unwrap();

        let balance_before = account.balance();
        let variant_before = account.variant().clone();

        let withdrawn = account.withdraw(attempt).unwrap();
        if !withdrawn {
            prop_assert_eq!(account.balance(), balance_before);
            prop_assert_eq!(account.variant(), &variant_before);
            prop_assert!(!account.is_locked());
        }
    }

    // ===================================================================
    // INVARIANT 4: Conversion round-trips. Converting there and back
    // lands on the original amount within floating tolerance.
    // ===================================================================
    #[test]
    fn conversion_round_trips(
        amount in arb_amount(),
        from in arb_currency(),
        to in arb_currency(),
    ) {
        let there = convert(amount, from, to).unwrap();
        let back = convert(there, to, from).unwrap();

        let original: f64 = amount.to_string().parse().unwrap();
        let returned: f64 = back.to_string().parse().unwrap();
        assert_relative_eq!(original, returned, max_relative = 1e-12, epsilon = 1e-12);
    }

    // ===================================================================
    // INVARIANT 5: Conversion never flips the sign of the validation —
    // every non-negative amount converts, in every direction.
    // ===================================================================
    #[test]
    fn conversion_accepts_all_non_negative(
        amount in arb_amount(),
        from in arb_currency(),
        to in arb_currency(),
    ) {
        let converted = convert(amount, from, to).unwrap();
        prop_assert!(converted >= Decimal::ZERO);
    }

    // ===================================================================
    // INVARIANT 6: Account numbers only grow. Deletions never make the
    // institution hand a number out twice.
    // ===================================================================
    #[test]
    fn account_numbers_strictly_increase(plan in prop::collection::vec(any::<bool>(), 1..60)) {
        let mut bank = Bank::new(RoutingCode::new(12));
        let factory = CheckingAccountFactory::default();
        let mut assigned: Vec<AccountNumber> = Vec::new();

        for create in plan {
            if create || assigned.is_empty() {
                let number = bank.create_account(&factory, owner());
                if let Some(last) = assigned.last() {
                    prop_assert!(number > *last, "number {number} was not fresh");
                }
                assigned.push(number);
            } else {
                // delete the oldest still-listed account; its number stays retired
                let number = assigned[0];
                bank.delete_account(number);
            }
        }
    }

    // ===================================================================
    // INVARIANT 7: Transfers conserve money. Whatever a transfer does,
    // the two balances sum to the same total afterwards.
    // ===================================================================
    #[test]
    fn transfers_conserve_total(
        start_a in arb_amount(),
        start_b in arb_amount(),
        amounts in prop::collection::vec(arb_amount(), 1..10),
    ) {
        let mut bank = Bank::new(RoutingCode::new(12));
        let factory = CheckingAccountFactory::new(dec!(500));
        let a = bank.create_account(&factory, owner());
        let b = bank.create_account(&factory, owner());
        bank.deposit(a, start_a).unwrap();
        bank.deposit(b, start_b).unwrap();
        let total = start_a + start_b;

        for amount in amounts {
            bank.transfer(a, b, amount, "shuffle").unwrap();
            let sum = bank.balance(a).unwrap() + bank.balance(b).unwrap();
            prop_assert_eq!(sum, total, "transfer leaked money");
        }
    }
}
