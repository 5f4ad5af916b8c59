use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A signed amount in minor currency units (cents).
///
/// This is the representation every upstream record carries. It is never
/// converted through a float: see [`MinorUnits::to_major`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinorUnits(pub i64);

/// A signed amount in major currency units (dollars), as written to the batch document.
///
/// Wraps `rust_decimal::Decimal` so that `a / 100` is exact for every `i64` input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct MajorUnits(Decimal);

impl MinorUnits {
    pub const ZERO: Self = Self(0);

    pub fn new(cents: i64) -> Self {
        Self(cents)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Returns `None` when the sum does not fit in an `i64`.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sum<I: IntoIterator<Item = Self>>(amounts: I) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Self::ZERO, |total, amount| total.checked_add(amount))
    }

    /// Scales to major units by moving the decimal point two places.
    pub fn to_major(self) -> MajorUnits {
        MajorUnits(Decimal::new(self.0, 2))
    }
}

impl MajorUnits {
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl From<MinorUnits> for MajorUnits {
    fn from(amount: MinorUnits) -> Self {
        amount.to_major()
    }
}

impl From<MajorUnits> for Decimal {
    fn from(amount: MajorUnits) -> Self {
        amount.0
    }
}


// Shortest exact form: "11.1", "-88.8", "0.01", "0".
impl fmt::Display for MajorUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}
