use std::fmt;

use crate::index::{Index9, Index9Semantics};

/// A Sudoku digit, 1 through 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Digit {
    /// Digit 1.
    D1,
    /// Digit 2.
    D2,
    /// Digit 3.
    D3,
    /// Digit 4.
    D4,
    /// Digit 5.
    D5,
    /// Digit 6.
    D6,
    /// Digit 7.
    D7,
    /// Digit 8.
    D8,
    /// Digit 9.
    D9,
}

impl Digit {
    /// All nine digits, in ascending order.
    pub const ALL: [Self; 9] = [
        Self::D1,
        Self::D2,
        Self::D3,
        Self::D4,
        Self::D5,
        Self::D6,
        Self::D7,
        Self::D8,
        Self::D9,
    ];

    /// Builds a digit from its numeric value (1-9).
    ///
    /// Returns `None` if `value` is not in the range 1-9.
    ///
    /// # Examples
    ///
    /// ```
    /// use lucidoku_core::Digit;
    ///
    /// assert_eq!(Digit::from_value(5), Some(Digit::D5));
    /// assert_eq!(Digit::from_value(0), None);
    /// assert_eq!(Digit::from_value(10), None);
    /// ```
    #[must_use]
    #[inline]
    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::D1),
            2 => Some(Self::D2),
            3 => Some(Self::D3),
            4 => Some(Self::D4),
            5 => Some(Self::D5),
            6 => Some(Self::D6),
            7 => Some(Self::D7),
            8 => Some(Self::D8),
            9 => Some(Self::D9),
            _ => None,
        }
    }

    /// Returns the numeric value (1-9) of this digit.
    ///
    /// # Examples
    ///
    /// ```
    /// use lucidoku_core::Digit;
    ///
    /// assert_eq!(Digit::D7.value(), 7);
    /// ```
    #[must_use]
    #[inline]
    pub const fn value(self) -> u8 {
        self as u8 + 1
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl From<Digit> for u8 {
    #[inline]
    fn from(digit: Digit) -> Self {
        digit.value()
    }
}

/// Maps digits 1-9 to indices 0-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitSemantics;

impl Index9Semantics for DigitSemantics {
    type Value = Digit;

    #[inline]
    fn to_index(value: Digit) -> Index9 {
        Index9::new(value as u8)
    }

    #[inline]
    fn from_index(index: Index9) -> Digit {
        Digit::ALL[usize::from(index.index())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_round_trip() {
        for digit in Digit::ALL {
            assert_eq!(Digit::from_value(digit.value()), Some(digit));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Digit::D3.to_string(), "3");
    }

    #[test]
    fn test_from_value_out_of_range() {
        assert_eq!(Digit::from_value(0), None);
        assert_eq!(Digit::from_value(10), None);
    }
}
