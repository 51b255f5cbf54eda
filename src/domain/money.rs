use {
    super::error::{DecodeError, OplatiError},
    rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive},
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// Amount in minor currency units (kopecks). 545 ~ 5.45 BYN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoneyAmount(i64);

impl MoneyAmount {
    pub const ZERO: MoneyAmount = MoneyAmount(0);

    pub fn new(minor: i64) -> Result<Self, OplatiError> {
        if minor < 0 {
            return Err(OplatiError::Validation(format!(
                "MoneyAmount cannot be negative, got: {minor}"
            )));
        }
        Ok(Self(minor))
    }

    pub fn minor_units(&self) -> i64 {
        self.0
    }

    pub fn checked_add(self, other: MoneyAmount) -> Option<MoneyAmount> {
        self.0.checked_add(other.0).map(MoneyAmount)
    }

    /// Sums in minor units; `None` on overflow.
    pub fn checked_sum<I>(amounts: I) -> Option<MoneyAmount>
    where
        I: IntoIterator<Item = MoneyAmount>,
    {
        amounts
            .into_iter()
            .try_fold(MoneyAmount::ZERO, MoneyAmount::checked_add)
    }

    /// Exact major-unit value (`minor / 100`).
    pub fn to_major(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Scales a major-unit value back to minor units, rounding half away from zero
    /// so float noise such as `5.449999` still lands on 545.
    pub fn from_major(major: Decimal) -> Result<Self, DecodeError> {
        let minor = major
            .checked_mul(Decimal::ONE_HUNDRED)
            .map(|v| v.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|v| v.to_i64())
            .ok_or_else(|| DecodeError::Field(format!("amount out of range: {major}")))?;
        if minor < 0 {
            return Err(DecodeError::Field(format!("negative amount: {major}")));
        }
        Ok(Self(minor))
    }
}

impl fmt::Display for MoneyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_major())
    }
}
