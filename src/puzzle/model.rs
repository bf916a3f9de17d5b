use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupColor {
    Red,
    Green,
    Blue,
}

impl GroupColor {
    pub const ALL: [GroupColor; 3] = [GroupColor::Red, GroupColor::Green, GroupColor::Blue];

    pub fn index(self) -> usize {
        match self {
            GroupColor::Red => 0,
            GroupColor::Green => 1,
            GroupColor::Blue => 2,
        }
    }

    /// Time unit at which this colour's first car boards.
    pub fn boarding_offset(self) -> i64 {
        match self {
            GroupColor::Red => 0,
            GroupColor::Green => 1,
            GroupColor::Blue => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GroupColor::Red => "red",
            GroupColor::Green => "green",
            GroupColor::Blue => "blue",
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum CountError {
    #[error("group size is empty")]
    Empty,
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("'{0}' is negative; group sizes must be >= 0")]
    Negative(String),
    #[error("'{0}' is not a whole number")]
    Fractional(String),
    #[error("'{0}' exceeds the largest supported group size {max}", max = u32::MAX)]
    TooLarge(String),
}

/// Number of people in one colour group. Always a non-negative integer.
#[derive(
    Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GroupCount(u32);

impl GroupCount {
    pub const ZERO: GroupCount = GroupCount(0);

    pub const fn new(count: u32) -> Self {
        Self(count)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Floors and clamps a numeric value into a count. NaN and infinities map to zero.
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() || value <= 0.0 {
            return Self::ZERO;
        }
        let floored = value.floor();
        if floored >= f64::from(u32::MAX) {
            Self(u32::MAX)
        } else {
            Self(floored as u32)
        }
    }

    /// Lenient parse used for interactive input: anything unreadable becomes zero.
    ///
    /// A string that is not a number as a whole still yields its leading
    /// integer prefix, so `"12 people"` counts as 12.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::ZERO;
        }
        if let Ok(value) = trimmed.parse::<f64>() {
            return Self::from_f64(value);
        }
        leading_integer(trimmed)
            .map(Self::from_f64)
            .unwrap_or(Self::ZERO)
    }

    pub fn parse_strict(raw: &str) -> Result<Self, CountError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CountError::Empty);
        }
        match trimmed.parse::<i64>() {
            Ok(value) if value < 0 => Err(CountError::Negative(trimmed.to_string())),
            Ok(value) => u32::try_from(value)
                .map(Self)
                .map_err(|_| CountError::TooLarge(trimmed.to_string())),
            Err(_) => {
                let value = trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| CountError::NotANumber(trimmed.to_string()))?;
                if value < 0.0 {
                    Err(CountError::Negative(trimmed.to_string()))
                } else if value.fract() != 0.0 {
                    Err(CountError::Fractional(trimmed.to_string()))
                } else if value <= f64::from(u32::MAX) {
                    Ok(Self(value as u32))
                } else {
                    Err(CountError::TooLarge(trimmed.to_string()))
                }
            }
        }
    }
}

fn leading_integer(input: &str) -> Option<f64> {
    let (sign, digits) = match input.as_bytes().first() {
        Some(b'-') => (-1.0, &input[1..]),
        Some(b'+') => (1.0, &input[1..]),
        _ => (1.0, input),
    };
    let end = digits
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<f64>().ok().map(|value| sign * value)
}

/// The three group sizes fed into one calculation.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct CrossingInput {
    #[serde(default)]
    pub red: GroupCount,
    #[serde(default)]
    pub green: GroupCount,
    #[serde(default)]
    pub blue: GroupCount,
}

impl CrossingInput {
    pub fn new(red: u32, green: u32, blue: u32) -> Self {
        Self {
            red: GroupCount::new(red),
            green: GroupCount::new(green),
            blue: GroupCount::new(blue),
        }
    }

    pub fn from_raw(red: &str, green: &str, blue: &str) -> Self {
        Self {
            red: GroupCount::from_raw(red),
            green: GroupCount::from_raw(green),
            blue: GroupCount::from_raw(blue),
        }
    }

    pub fn is_empty(&self) -> bool {
        GroupColor::ALL.iter().all(|color| self[*color] == GroupCount::ZERO)
    }
}

impl Index<GroupColor> for CrossingInput {
    type Output = GroupCount;

    fn index(&self, color: GroupColor) -> &Self::Output {
        match color {
            GroupColor::Red => &self.red,
            GroupColor::Green => &self.green,
            GroupColor::Blue => &self.blue,
        }
    }
}

impl IndexMut<GroupColor> for CrossingInput {
    fn index_mut(&mut self, color: GroupColor) -> &mut Self::Output {
        match color {
            GroupColor::Red => &mut self.red,
            GroupColor::Green => &mut self.green,
            GroupColor::Blue => &mut self.blue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_parse_floors_and_clamps() {
        assert_eq!(GroupCount::from_raw("7"), GroupCount::new(7));
        assert_eq!(GroupCount::from_raw(" 3.9 "), GroupCount::new(3));
        assert_eq!(GroupCount::from_raw("-4"), GroupCount::ZERO);
        assert_eq!(GroupCount::from_raw("-0.5"), GroupCount::ZERO);
        assert_eq!(GroupCount::from_raw(""), GroupCount::ZERO);
        assert_eq!(GroupCount::from_raw("abc"), GroupCount::ZERO);
        assert_eq!(GroupCount::from_raw("NaN"), GroupCount::ZERO);
        assert_eq!(GroupCount::from_raw("inf"), GroupCount::ZERO);
    }

    #[test]
    fn lenient_parse_keeps_leading_integer() {
        assert_eq!(GroupCount::from_raw("12 people"), GroupCount::new(12));
        assert_eq!(GroupCount::from_raw("-3x"), GroupCount::ZERO);
        assert_eq!(GroupCount::from_raw("x12"), GroupCount::ZERO);
    }

    #[test]
    fn lenient_parse_saturates_huge_values() {
        assert_eq!(
            GroupCount::from_raw("99999999999999999999"),
            GroupCount::new(u32::MAX)
        );
    }

    #[test]
    fn strict_parse_accepts_whole_numbers() {
        assert_eq!(GroupCount::parse_strict("0"), Ok(GroupCount::ZERO));
        assert_eq!(GroupCount::parse_strict(" 42 "), Ok(GroupCount::new(42)));
        assert_eq!(GroupCount::parse_strict("1e2"), Ok(GroupCount::new(100)));
        assert_eq!(GroupCount::parse_strict("4.0"), Ok(GroupCount::new(4)));
    }

    #[test]
    fn strict_parse_reports_each_failure() {
        assert_eq!(GroupCount::parse_strict("  "), Err(CountError::Empty));
        assert!(matches!(
            GroupCount::parse_strict("three"),
            Err(CountError::NotANumber(_))
        ));
        assert!(matches!(
            GroupCount::parse_strict("-1"),
            Err(CountError::Negative(_))
        ));
        assert!(matches!(
            GroupCount::parse_strict("2.5"),
            Err(CountError::Fractional(_))
        ));
        assert!(matches!(
            GroupCount::parse_strict("4294967296"),
            Err(CountError::TooLarge(_))
        ));
        assert!(matches!(
            GroupCount::parse_strict("inf"),
            Err(CountError::NotANumber(_))
        ));
    }

    #[test]
    fn crossing_input_indexes_by_color() {
        let mut input = CrossingInput::new(3, 3, 1);
        assert_eq!(input[GroupColor::Green], GroupCount::new(3));
        input[GroupColor::Blue] = GroupCount::new(8);
        assert_eq!(input.blue, GroupCount::new(8));
        assert!(!input.is_empty());
        assert!(CrossingInput::default().is_empty());
    }

    #[test]
    fn color_order_and_offsets_are_fixed() {
        let offsets: Vec<i64> = GroupColor::ALL
            .iter()
            .map(|color| color.boarding_offset())
            .collect();
        assert_eq!(offsets, vec![0, 1, 2]);
        for (position, color) in GroupColor::ALL.iter().enumerate() {
            assert_eq!(color.index(), position);
        }
    }
}
