use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A customer of the institution.
///
/// Pure value type: name, postal address, and birth date. The whole value
/// is the customer's identity — two customers with identical fields are the
/// same person for reporting purposes.
///
/// # Examples
///
/// ```
/// use banking_engine::core::customer::Customer;
/// use chrono::NaiveDate;
///
/// let birth = NaiveDate::from_ymd_opt(1976, 7, 13).unwrap();
/// let customer = Customer::new("Dorothea", "Hubrich", "12 Sample Street", birth);
/// assert_eq!(customer.full_name(), "Dorothea Hubrich");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Customer {
    first_name: String,
    last_name: String,
    address: String,
    birth_date: NaiveDate,
}

impl Customer {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address: impl Into<String>,
        birth_date: NaiveDate,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            address: address.into(),
            birth_date,
        }
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    /// First and last name joined with a space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.full_name(), self.address)
    }
}
