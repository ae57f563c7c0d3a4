//! Cohort identification: sex, age, and the table a row comes from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnthroError;

/// Biological sex of the subject. Exactly two categories are tabulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Builds a `Sex` from the `male` column of a reference table.
    pub fn from_is_male(is_male: bool) -> Self {
        if is_male {
            Sex::Male
        } else {
            Sex::Female
        }
    }

    pub fn is_male(self) -> bool {
        matches!(self, Sex::Male)
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => f.write_str("male"),
            Sex::Female => f.write_str("female"),
        }
    }
}

/// Parses a sex label, case-insensitively.
///
/// Accepts `male`/`m` and `female`/`f`. Any other label is rejected rather
/// than folded into one of the two categories.
///
/// # Examples
///
/// ```
/// use anthro_score::Sex;
///
/// assert_eq!("Male".parse::<Sex>().unwrap(), Sex::Male);
/// assert_eq!(" FEMALE ".parse::<Sex>().unwrap(), Sex::Female);
/// assert!("unknown".parse::<Sex>().is_err());
/// ```
impl FromStr for Sex {
    type Err = AnthroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            other => Err(AnthroError::InvalidInput(format!(
                "unrecognized sex '{other}', expected 'male' or 'female'"
            ))),
        }
    }
}

/// Key of a row-group in every reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CohortKey {
    pub is_male: bool,
    pub age: u32,
}

impl CohortKey {
    pub fn new(sex: Sex, age: u32) -> Self {
        Self {
            is_male: sex.is_male(),
            age,
        }
    }

    pub fn sex(&self) -> Sex {
        Sex::from_is_male(self.is_male)
    }
}

/// The three reference tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableId {
    Height,
    Weight,
    HawParams,
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableId::Height => f.write_str("height"),
            TableId::Weight => f.write_str("weight"),
            TableId::HawParams => f.write_str("height-adjusted-weight parameter"),
        }
    }
}
