use rust_decimal::Decimal;
use std::fmt;
use std::rc::Rc;

use super::account::AccountNumber;
use super::currency::Currency;
use super::customer::Customer;

/// A state change on an account, carrying the old and new values.
#[derive(Debug, Clone, PartialEq)]
pub enum AccountEvent {
    BalanceChanged { old: Decimal, new: Decimal },
    LockChanged { locked: bool },
    OwnerChanged { old: Customer, new: Customer },
    CurrencyChanged { old: Currency, new: Currency },
}

/// Receives account state changes.
///
/// Delivery is synchronous, inside the call that triggered the change, and
/// follows registration order. Observers are expected not to panic; a panic
/// propagates to the caller of the triggering operation.
pub trait AccountObserver {
    fn account_changed(&self, number: AccountNumber, event: &AccountEvent);
}

/// Per-account publish/subscribe channel.
///
/// Each account owns its own channel; there is no global registry. An event
/// is published only when the underlying value actually changed, so locking
/// an already-locked account or depositing zero stays silent.
///
/// Subscriptions are live wiring, not state: a cloned or deserialized
/// channel starts out empty.
#[derive(Default)]
pub struct EventChannel {
    subscribers: Vec<Rc<dyn AccountObserver>>,
}

impl EventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer at the end of the delivery order.
    pub fn subscribe(&mut self, observer: Rc<dyn AccountObserver>) {
        self.subscribers.push(observer);
    }

    /// Remove a previously registered observer, matched by handle identity.
    pub fn unsubscribe(&mut self, observer: &Rc<dyn AccountObserver>) {
        self.subscribers
            .retain(|subscriber| !Rc::ptr_eq(subscriber, observer));
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub(crate) fn publish(&self, number: AccountNumber, event: &AccountEvent) {
        for subscriber in &self.subscribers {
            subscriber.account_changed(number, event);
        }
    }
}

impl fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Clone for EventChannel {
    fn clone(&self) -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::cell::RefCell;

    struct Recorder {
        label: &'static str,
        seen: Rc<RefCell<Vec<(&'static str, AccountEvent)>>>,
    }

    impl AccountObserver for Recorder {
        fn account_changed(&self, _number: AccountNumber, event: &AccountEvent) {
            self.seen.borrow_mut().push((self.label, event.clone()));
        }
    }

    fn balance_event() -> AccountEvent {
        AccountEvent::BalanceChanged {
            old: dec!(0),
            new: dec!(10),
        }
    }

    #[test]
    fn test_delivery_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut channel = EventChannel::new();
        channel.subscribe(Rc::new(Recorder {
            label: "first",
            seen: Rc::clone(&seen),
        }));
        channel.subscribe(Rc::new(Recorder {
            label: "second",
            seen: Rc::clone(&seen),
        }));

        channel.publish(AccountNumber::new(1), &balance_event());

        let order: Vec<&str> = seen.borrow().iter().map(|(label, _)| *label).collect();
        assert_eq!(order, vec!["first", "second"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let observer: Rc<dyn AccountObserver> = Rc::new(Recorder {
            label: "only",
            seen: Rc::clone(&seen),
        });

        let mut channel = EventChannel::new();
        channel.subscribe(Rc::clone(&observer));
        channel.unsubscribe(&observer);
        channel.publish(AccountNumber::new(1), &balance_event());

        assert!(seen.borrow().is_empty());
        assert_eq!(channel.subscriber_count(), 0);
    }

    #[test]
    fn test_clone_drops_subscribers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut channel = EventChannel::new();
        channel.subscribe(Rc::new(Recorder {
            label: "original",
            seen: Rc::clone(&seen),
        }));

        let copy = channel.clone();
        assert_eq!(channel.subscriber_count(), 1);
        assert_eq!(copy.subscriber_count(), 0);
    }
}
