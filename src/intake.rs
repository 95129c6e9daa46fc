//! Request Intake and Validation
//!
//! Converts collaborator input (age in months or years) into the
//! engine's month-based signature and rejects values the engine is not
//! meant to see. The engine itself never range-checks age.

use crate::error::{Result, ScreeningError};
use crate::reference::{Gender, MAX_AGE_MONTHS};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeUnit {
    Months,
    Years,
}

impl FromStr for AgeUnit {
    type Err = ScreeningError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "months" | "month" | "m" | "bulan" | "b" => Ok(AgeUnit::Months),
            "years" | "year" | "y" | "tahun" | "t" => Ok(AgeUnit::Years),
            other => Err(ScreeningError::InvalidInput(format!("unrecognised age unit '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Age {
    pub value: f64,
    pub unit: AgeUnit,
}

impl Age {
    pub fn months(value: f64) -> Self {
        Self { value, unit: AgeUnit::Months }
    }

    pub fn years(value: f64) -> Self {
        Self { value, unit: AgeUnit::Years }
    }

    pub fn in_months(&self) -> f64 {
        match self.unit {
            AgeUnit::Months => self.value,
            AgeUnit::Years => self.value * 12.0,
        }
    }
}

/// Raw request as a collaborator collects it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningRequest {
    #[serde(default)]
    pub name: Option<String>,
    pub gender: Gender,
    pub age: Age,
    pub height_cm: f64,
    pub weight_kg: f64,
}

/// Validated engine input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub gender: Gender,
    pub age_months: f64,
    pub height_cm: f64,
    pub weight_kg: f64,
}

impl ScreeningRequest {
    pub fn validate(&self) -> Result<Measurement> {
        let age_months = self.age.in_months();
        if !age_months.is_finite() || age_months < 0.0 || age_months > MAX_AGE_MONTHS as f64 {
            return Err(ScreeningError::InvalidInput(format!(
                "age must be between 0 and {} months, got {}",
                MAX_AGE_MONTHS, age_months
            )));
        }
        positive("height_cm", self.height_cm)?;
        positive("weight_kg", self.weight_kg)?;

        Ok(Measurement {
            gender: self.gender,
            age_months,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
        })
    }
}

fn positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ScreeningError::InvalidInput(format!(
            "{} must be a positive number, got {}",
            field, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(age: Age) -> ScreeningRequest {
        ScreeningRequest {
            name: Some("Budi".to_string()),
            gender: Gender::Male,
            age,
            height_cm: 87.0,
            weight_kg: 12.0,
        }
    }

    #[test]
    fn test_years_convert_to_months() {
        let m = request(Age::years(1.5)).validate().unwrap();
        assert_eq!(m.age_months, 18.0);
    }

    #[test]
    fn test_age_range() {
        assert!(request(Age::months(0.0)).validate().is_ok());
        assert!(request(Age::months(60.0)).validate().is_ok());
        assert!(request(Age::years(5.0)).validate().is_ok());
        assert!(request(Age::months(61.0)).validate().is_err());
        assert!(request(Age::months(-1.0)).validate().is_err());
        assert!(request(Age::years(6.0)).validate().is_err());
        assert!(request(Age::months(f64::NAN)).validate().is_err());
    }

    #[test]
    fn test_measurements_must_be_positive() {
        let mut req = request(Age::months(24.0));
        req.height_cm = 0.0;
        assert!(matches!(req.validate(), Err(ScreeningError::InvalidInput(_))));

        let mut req = request(Age::months(24.0));
        req.weight_kg = f64::INFINITY;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_age_unit_parsing() {
        assert_eq!("Bulan".parse::<AgeUnit>().unwrap(), AgeUnit::Months);
        assert_eq!("t".parse::<AgeUnit>().unwrap(), AgeUnit::Years);
        assert!("weeks".parse::<AgeUnit>().is_err());
    }

    #[test]
    fn test_request_from_json() {
        let json = r#"{"gender": "female", "age": {"value": 2, "unit": "years"},
                       "height_cm": 85.5, "weight_kg": 11.2}"#;
        let req: ScreeningRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.name, None);
        assert_eq!(req.validate().unwrap().age_months, 24.0);
    }
}
