//! The submitted intake form and its validation.

use crate::error::IntakeError;
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
        }
    }
}

impl FromStr for Gender {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            _ => Err(IntakeError::InvalidGender(s.to_string())),
        }
    }
}

/// Birth as either a bare year or a full calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Birth {
    Year(i32),
    Date(NaiveDate),
}

impl Birth {
    pub fn year(&self) -> i32 {
        match self {
            Self::Year(year) => *year,
            Self::Date(date) => date.year(),
        }
    }
}

impl fmt::Display for Birth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year(year) => write!(f, "{year}"),
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl FromStr for Birth {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || IntakeError::InvalidBirth(s.to_string());

        let birth = if trimmed.len() == 4 && trimmed.chars().all(|c| c.is_ascii_digit()) {
            Self::Year(trimmed.parse().map_err(|_| invalid())?)
        } else {
            Self::Date(NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| invalid())?)
        };

        let current_year = Utc::now().year();
        if !(1900..=current_year).contains(&birth.year()) {
            return Err(invalid());
        }
        Ok(birth)
    }
}

/// Raw, untrimmed field values as typed at the front-end.
#[derive(Debug, Clone, Default)]
pub struct IntakeDraft {
    pub name: String,
    pub gender: String,
    pub birth: String,
    pub option_a: String,
    pub option_b: String,
    pub background: String,
}

/// A validated intake form. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeForm {
    name: String,
    gender: Gender,
    birth: Birth,
    option_a: String,
    option_b: String,
    background: String,
}

impl IntakeForm {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn birth(&self) -> Birth {
        self.birth
    }

    pub fn option_a(&self) -> &str {
        &self.option_a
    }

    pub fn option_b(&self) -> &str {
        &self.option_b
    }

    pub fn background(&self) -> &str {
        &self.background
    }
}

/// Step one of the form: who the person is.
pub fn validate_identity(draft: &IntakeDraft) -> Result<(String, Gender, Birth), IntakeError> {
    let name = required("name", &draft.name)?;
    required("gender", &draft.gender)?;
    required("birth", &draft.birth)?;
    let gender = draft.gender.parse()?;
    let birth = draft.birth.parse()?;
    Ok((name, gender, birth))
}

/// Step two of the form: the decision and its context.
pub fn validate_decision(draft: &IntakeDraft) -> Result<(String, String, String), IntakeError> {
    Ok((
        required("optionA", &draft.option_a)?,
        required("optionB", &draft.option_b)?,
        required("background", &draft.background)?,
    ))
}

impl TryFrom<IntakeDraft> for IntakeForm {
    type Error = IntakeError;

    fn try_from(draft: IntakeDraft) -> Result<Self, Self::Error> {
        let (name, gender, birth) = validate_identity(&draft)?;
        let (option_a, option_b, background) = validate_decision(&draft)?;
        Ok(Self {
            name,
            gender,
            birth,
            option_a,
            option_b,
            background,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, IntakeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(IntakeError::MissingField(field));
    }
    Ok(trimmed.to_string())
}
