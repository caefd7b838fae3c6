// Person model: the four attributes collected during a session, each
// guarded by its own setter. A rejected value never replaces a stored one.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::InvalidInput;

pub const AGE_RANGE: RangeInclusive<i64> = 5..=19;
pub const HEIGHT_RANGE_CM: RangeInclusive<f64> = 50.0..=250.0;
pub const WEIGHT_RANGE_KG: RangeInclusive<f64> = 5.0..=250.0;

/// Biological sex, used to pick the boys or girls reference curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn plural(self) -> &'static str {
        match self {
            Sex::Male => "boys",
            Sex::Female => "girls",
        }
    }
}

/// Gender as typed by the user, normalized to one of
/// "M", "Male", "F" or "Female". The short and long spellings are kept
/// apart so the value reads back the way it was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gender {
    sex: Sex,
    short: bool,
}

impl Gender {
    pub const VALID: [&'static str; 4] = ["M", "Male", "F", "Female"];

    pub fn sex(self) -> Sex {
        self.sex
    }

    pub fn as_str(self) -> &'static str {
        match (self.sex, self.short) {
            (Sex::Male, true) => "M",
            (Sex::Male, false) => "Male",
            (Sex::Female, true) => "F",
            (Sex::Female, false) => "Female",
        }
    }
}

impl FromStr for Gender {
    type Err = InvalidInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sex, short) = match title_case(s.trim()).as_str() {
            "M" => (Sex::Male, true),
            "Male" => (Sex::Male, false),
            "F" => (Sex::Female, true),
            "Female" => (Sex::Female, false),
            _ => return Err(InvalidInput::Gender),
        };
        Ok(Gender { sex, short })
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upper-cases the first letter of every alphabetic run and lower-cases
/// the rest ("mALE" -> "Male", "f" -> "F").
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Anything that can be turned into a measurement. Strings are parsed,
/// numbers pass through; NaN and infinities are not measurements.
pub trait Measure {
    fn measure(&self) -> Option<f64>;
}

impl Measure for f64 {
    fn measure(&self) -> Option<f64> {
        self.is_finite().then_some(*self)
    }
}

impl Measure for f32 {
    fn measure(&self) -> Option<f64> {
        f64::from(*self).measure()
    }
}

macro_rules! measure_int {
    ($($t:ty),*) => {
        $(impl Measure for $t {
            fn measure(&self) -> Option<f64> {
                Some(*self as f64)
            }
        })*
    };
}

measure_int!(u8, u16, u32, i32, i64);

impl Measure for str {
    fn measure(&self) -> Option<f64> {
        self.trim().parse::<f64>().ok()?.measure()
    }
}

impl Measure for String {
    fn measure(&self) -> Option<f64> {
        self.as_str().measure()
    }
}

impl<T: Measure + ?Sized> Measure for &T {
    fn measure(&self) -> Option<f64> {
        (**self).measure()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    gender: Gender,
    age: u8,
    height: f64, // cm
    weight: f64, // kg
}

impl Default for Person {
    fn default() -> Self {
        Self {
            gender: Gender { sex: Sex::Female, short: true },
            age: 5,
            height: 50.0,
            weight: 5.0,
        }
    }
}

impl Person {
    /// Builds a person, running every value through its setter.
    pub fn new(gender: &str, age: i64, height: impl Measure, weight: impl Measure) -> Result<Self, InvalidInput> {
        let mut person = Person::default();
        person.set_gender(gender)?;
        person.set_age(age)?;
        person.set_height(height)?;
        person.set_weight(weight)?;
        Ok(person)
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn set_gender(&mut self, gender: &str) -> Result<(), InvalidInput> {
        self.gender = gender.parse()?;
        Ok(())
    }

    pub fn set_age(&mut self, age: i64) -> Result<(), InvalidInput> {
        if !AGE_RANGE.contains(&age) {
            return Err(InvalidInput::Age);
        }
        self.age = age as u8;
        Ok(())
    }

    pub fn set_height(&mut self, height: impl Measure) -> Result<(), InvalidInput> {
        let height = height.measure().ok_or(InvalidInput::NotANumber { field: "Height" })?;
        if !HEIGHT_RANGE_CM.contains(&height) {
            return Err(InvalidInput::Height);
        }
        self.height = height;
        Ok(())
    }

    pub fn set_weight(&mut self, weight: impl Measure) -> Result<(), InvalidInput> {
        let weight = weight.measure().ok_or(InvalidInput::NotANumber { field: "Weight" })?;
        if !WEIGHT_RANGE_KG.contains(&weight) {
            return Err(InvalidInput::Weight);
        }
        self.weight = weight;
        Ok(())
    }

    /// Body Mass Index in kg/m².
    pub fn compute_bmi(&self) -> f64 {
        let meters = self.height / 100.0;
        self.weight / (meters * meters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_matches_word_boundaries() {
        assert_eq!(title_case("mALE"), "Male");
        assert_eq!(title_case("f"), "F");
        assert_eq!(title_case("male female"), "Male Female");
        assert_eq!(title_case("x-ray"), "X-Ray");
    }

    #[test]
    fn gender_keeps_spelling() {
        assert_eq!("  male ".parse::<Gender>().unwrap().as_str(), "Male");
        assert_eq!("m".parse::<Gender>().unwrap().as_str(), "M");
        assert_eq!("FEMALE".parse::<Gender>().unwrap().sex(), Sex::Female);
        assert!("ma le".parse::<Gender>().is_err());
        assert!("".parse::<Gender>().is_err());
    }

    #[test]
    fn measure_rejects_non_finite() {
        assert_eq!(f64::NAN.measure(), None);
        assert_eq!("inf".measure(), None);
        assert_eq!(" 12.5 ".measure(), Some(12.5));
        assert_eq!(160u8.measure(), Some(160.0));
    }
}
