use std::fmt;

pub use fixed_map::Key as FixedKey;
pub use fixed_map::Key;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A linguistic term: a fieldless enum usable as a `fixed_map` key.
pub trait Term: FixedKey + Copy + PartialEq + fmt::Debug + 'static {
    /// Every term, in declaration order
    const ALL: &'static [Self];

    fn name(self) -> &'static str;
}

/// Terms shared by the service and food ratings.
#[derive(Clone, Copy, Debug, Eq, Hash, Key, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Rating {
    /// A zero-star rating
    Absent,
    Mediocre,
    Poor,
    Average,
    Good,
    Excellent,
}

impl Term for Rating {
    const ALL: &'static [Self] = &[
        Self::Absent,
        Self::Mediocre,
        Self::Poor,
        Self::Average,
        Self::Good,
        Self::Excellent,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Mediocre => "mediocre",
            Self::Poor => "poor",
            Self::Average => "average",
            Self::Good => "good",
            Self::Excellent => "excellent",
        }
    }
}

/// Terms of the recommended tip.
#[derive(Clone, Copy, Debug, Eq, Hash, Key, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TipLevel {
    /// Exactly nothing
    Zero,
    VeryLow,
    Low,
    Medium,
    High,
    /// The top of the scale and nothing below it
    VeryHigh,
}

impl Term for TipLevel {
    const ALL: &'static [Self] = &[
        Self::Zero,
        Self::VeryLow,
        Self::Low,
        Self::Medium,
        Self::High,
        Self::VeryHigh,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::VeryLow => "very_low",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::VeryHigh => "very_high",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for TipLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[test]
fn test_names_are_unique() {
    let mut names: Vec<_> = Rating::ALL.iter().map(|t| t.name()).collect();
    names.sort_unstable();
    names.dedup();

    assert_eq!(names.len(), Rating::ALL.len());
    assert_eq!(TipLevel::VeryHigh.to_string(), "very_high");
}

#[test]
fn test_terms_are_map_keys() {
    use fixed_map::Map as FixedMap;

    let mut levels = FixedMap::new();
    levels.insert(TipLevel::High, 12.);
    levels.insert(TipLevel::Zero, 0.);

    assert_eq!(levels.get(TipLevel::High), Some(&12.));
    assert_eq!(levels.iter().map(|(level, _)| level).collect::<Vec<_>>(), vec![TipLevel::Zero, TipLevel::High]);
}
