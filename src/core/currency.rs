use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A monetary amount failed validation.
///
/// Raised whenever a negative amount reaches a conversion or an account
/// operation. Amounts are carried as [`Decimal`], so non-finite values
/// cannot occur and the sign check is the whole validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid monetary amount: {amount}")]
pub struct InvalidAmount {
    pub amount: Decimal,
}

/// Reject negative amounts, pass everything else through.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, InvalidAmount> {
    if amount < Decimal::ZERO {
        return Err(InvalidAmount { amount });
    }
    Ok(amount)
}

/// The currencies the institution trades in.
///
/// Each currency carries a fixed conversion rate against the reference
/// currency (EUR): one unit of EUR buys `rate_to_reference()` units of the
/// currency. Rates are positive constants for the process lifetime.
///
/// # Examples
///
/// ```
/// use banking_engine::core::currency::{convert, Currency};
/// use rust_decimal_macros::dec;
///
/// let lev = convert(dec!(100), Currency::Eur, Currency::Bgn).unwrap();
/// assert_eq!(lev, dec!(195.583));
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Currency {
    /// Euro, the reference currency.
    #[default]
    Eur,
    /// Bulgarian lev.
    Bgn,
    /// Lithuanian litas.
    Ltl,
    /// Convertible mark.
    Km,
}

impl Currency {
    /// The currency every conversion rate is expressed against.
    pub const REFERENCE: Currency = Currency::Eur;

    /// Units of this currency per one unit of the reference currency.
    pub fn rate_to_reference(self) -> Decimal {
        match self {
            Currency::Eur => Decimal::ONE,
            Currency::Bgn => dec!(1.95583),
            Currency::Ltl => dec!(3.4528),
            Currency::Km => dec!(1.95583),
        }
    }

    /// ISO-style code used in formatted balances.
    pub fn code(self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Bgn => "BGN",
            Currency::Ltl => "LTL",
            Currency::Km => "KM",
        }
    }

    /// Express a reference-currency amount in this currency.
    pub fn from_reference(self, amount: Decimal) -> Decimal {
        amount * self.rate_to_reference()
    }

    /// Express an amount of this currency in the reference currency.
    pub fn to_reference(self, amount: Decimal) -> Decimal {
        amount / self.rate_to_reference()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Convert `amount` from one currency into another.
///
/// Fails with [`InvalidAmount`] when the amount is negative. Converting a
/// currency to itself returns the input unchanged; every other pair routes
/// through the reference currency.
pub fn convert(amount: Decimal, from: Currency, to: Currency) -> Result<Decimal, InvalidAmount> {
    let amount = validate_amount(amount)?;
    if from == to {
        return Ok(amount);
    }
    Ok(to.from_reference(from.to_reference(amount)))
}

/// Plain rate ratio between two currencies.
///
/// Used to rescale stored amounts on a currency switch. Unlike [`convert`]
/// this applies to signed values, since a balance being rescaled may be
/// negative.
pub(crate) fn conversion_factor(from: Currency, to: Currency) -> Decimal {
    to.rate_to_reference() / from.rate_to_reference()
}
