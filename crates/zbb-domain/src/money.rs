//! Fixed-point money with exactly two fractional digits.

use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

const MINOR_PER_MAJOR: i64 = 100;
const FRACTION_DIGITS: usize = 2;
/// Largest magnitude accepted from text, in minor units (10^13 major units).
pub const MAX_PARSED_CENTS: i64 = 1_000_000_000_000_000;

/// Signed monetary amount stored as integer minor units (cents).
///
/// Positive values are inflows, negative values are outflows. Textual
/// input and output always use a 2-decimal string such as `-12.34`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates an amount from integer minor units.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Creates an amount from whole major units.
    pub const fn from_major(units: i64) -> Self {
        Self(units * MINOR_PER_MAJOR)
    }

    /// Returns the raw value in minor units.
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Parses a decimal string, rounding half-up to two fractional digits.
    pub fn parse(input: &str) -> Result<Self, MoneyError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(MoneyError::Empty);
        }
        let invalid = || MoneyError::Invalid(trimmed.to_string());

        let (negative, digits) = match trimmed.as_bytes()[0] {
            b'-' => (true, &trimmed[1..]),
            b'+' => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        let (major_str, fraction_str) = match digits.split_once('.') {
            Some((major, fraction)) => (major, fraction),
            None => (digits, ""),
        };
        if major_str.is_empty() && fraction_str.is_empty() {
            return Err(invalid());
        }
        if !major_str.chars().all(|c| c.is_ascii_digit())
            || !fraction_str.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let major: i64 = if major_str.is_empty() {
            0
        } else {
            major_str.parse().map_err(|_| MoneyError::OutOfRange)?
        };

        let mut minor: i64 = 0;
        for (idx, ch) in fraction_str
            .chars()
            .chain(std::iter::repeat('0'))
            .take(FRACTION_DIGITS)
            .enumerate()
        {
            let digit = i64::from(ch as u8 - b'0');
            minor += digit * if idx == 0 { 10 } else { 1 };
        }
        let round_up = fraction_str
            .as_bytes()
            .get(FRACTION_DIGITS)
            .is_some_and(|digit| *digit >= b'5');

        let mut cents = major
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|value| value.checked_add(minor))
            .ok_or(MoneyError::OutOfRange)?;
        if round_up {
            cents = cents.checked_add(1).ok_or(MoneyError::OutOfRange)?;
        }
        if cents > MAX_PARSED_CENTS {
            return Err(MoneyError::OutOfRange);
        }
        Ok(Self(if negative { -cents } else { cents }))
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Divides by an integer count, rounding half-up (away from zero).
    ///
    /// Returns `None` when `divisor` is zero.
    pub fn div_round(self, divisor: i64) -> Option<Self> {
        if divisor == 0 {
            return None;
        }
        let numerator = i128::from(self.0);
        let denominator = i128::from(divisor);
        let quotient = numerator / denominator;
        let remainder = numerator % denominator;
        let adjusted = if remainder.abs() * 2 >= denominator.abs() {
            if (numerator < 0) == (denominator < 0) {
                quotient + 1
            } else {
                quotient - 1
            }
        } else {
            quotient
        };
        i64::try_from(adjusted).ok().map(Self)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = MINOR_PER_MAJOR as u64;
        write!(f, "{sign}{}.{:02}", abs / scale, abs % scale)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Money::parse(&raw).map_err(de::Error::custom)
    }
}

/// Errors produced while parsing [`Money`] values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    Empty,
    Invalid(String),
    OutOfRange,
}

impl fmt::Display for MoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyError::Empty => f.write_str("amount is empty"),
            MoneyError::Invalid(raw) => write!(f, "invalid amount `{raw}`"),
            MoneyError::OutOfRange => f.write_str("amount is out of range"),
        }
    }
}

impl std::error::Error for MoneyError {}
