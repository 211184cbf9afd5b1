//! Money and the agent/platform earnings split.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Agent share of a completed service's final price, in percent.
pub const AGENT_SHARE_PERCENT: i64 = 85;

/// An amount of money in integer cents.
///
/// Stored and computed as `i64` cents so that the earnings split conserves
/// the final price exactly. Serialized as raw cents on the wire; `Display`
/// renders the conventional `"850.00"` form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Whole currency units, e.g. `from_major(1000)` == 1000.00.
    pub fn from_major(units: i64) -> Self {
        Self(units * 100)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Checked addition; `None` on overflow.
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Checked multiplication by a quantity; `None` on overflow.
    pub fn checked_mul(self, qty: i64) -> Option<Money> {
        self.0.checked_mul(qty).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

/// Fixed 85/15 split of a completed service's final price.
///
/// The agent share is floored to whole cents and the platform takes the
/// exact remainder, so `agent + platform == final_price` for every input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EarningsSplit {
    pub agent: Money,
    pub platform: Money,
}

impl EarningsSplit {
    pub fn of(final_price: Money) -> Self {
        let agent = final_price.cents() * AGENT_SHARE_PERCENT / 100;
        Self {
            agent: Money::from_cents(agent),
            platform: Money::from_cents(final_price.cents() - agent),
        }
    }
}
