//! Plan request: the user's goals and constraints

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::prompts::Fields;

/// Accepted body weight range in kg
pub const WEIGHT_RANGE_KG: RangeInclusive<f64> = 30.0..=200.0;

/// Accepted age range in years
pub const AGE_RANGE: RangeInclusive<u32> = 10..=100;

/// Accepted plan duration in weeks
pub const WEEKS_RANGE: RangeInclusive<u32> = 1..=12;

/// Gender options offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "other" | "o" => Ok(Gender::Other),
            other => Err(format!("Unknown gender '{}'. Expected Male, Female or Other", other)),
        }
    }
}

/// Everything the plan template needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub workout_type: String,
    pub diet_type: String,
    /// Current body weight in kg
    pub current_weight: f64,
    /// Target body weight in kg
    pub target_weight: f64,
    pub dietary_restrictions: String,
    pub health_conditions: String,
    pub age: u32,
    pub gender: Gender,
    pub number_of_weeks: u32,
    /// Free-text extra instructions, may be empty
    pub comments: String,
}

impl Default for PlanRequest {
    fn default() -> Self {
        Self {
            workout_type: String::new(),
            diet_type: String::new(),
            current_weight: 75.0,
            target_weight: 70.0,
            dietary_restrictions: String::new(),
            health_conditions: String::new(),
            age: 30,
            gender: Gender::Male,
            number_of_weeks: 4,
            comments: String::new(),
        }
    }
}

impl PlanRequest {
    /// The field mapping consumed by the plan template
    pub fn to_fields(&self) -> Fields {
        debug!(weeks = self.number_of_weeks, "PlanRequest::to_fields: called");
        Fields::new()
            .with("workout_type", self.workout_type.as_str())
            .with("diet_type", self.diet_type.as_str())
            .with("current_weight", self.current_weight)
            .with("target_weight", self.target_weight)
            .with("dietary_restrictions", self.dietary_restrictions.as_str())
            .with("health_conditions", self.health_conditions.as_str())
            .with("age", self.age)
            .with("gender", self.gender.as_str())
            .with("number_of_weeks", self.number_of_weeks)
            .with("comments", self.comments.as_str())
    }

    /// Check the numeric bounds offered by the input form
    ///
    /// Returns every problem found, so the user can fix them in one pass.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut problems = Vec::new();
        if !WEIGHT_RANGE_KG.contains(&self.current_weight) {
            problems.push(format!(
                "current weight {} kg is outside {}-{} kg",
                self.current_weight,
                WEIGHT_RANGE_KG.start(),
                WEIGHT_RANGE_KG.end()
            ));
        }
        if !WEIGHT_RANGE_KG.contains(&self.target_weight) {
            problems.push(format!(
                "target weight {} kg is outside {}-{} kg",
                self.target_weight,
                WEIGHT_RANGE_KG.start(),
                WEIGHT_RANGE_KG.end()
            ));
        }
        if !AGE_RANGE.contains(&self.age) {
            problems.push(format!(
                "age {} is outside {}-{}",
                self.age,
                AGE_RANGE.start(),
                AGE_RANGE.end()
            ));
        }
        if !WEEKS_RANGE.contains(&self.number_of_weeks) {
            problems.push(format!(
                "plan duration {} weeks is outside {}-{} weeks",
                self.number_of_weeks,
                WEEKS_RANGE.start(),
                WEEKS_RANGE.end()
            ));
        }

        if problems.is_empty() { Ok(()) } else { Err(problems) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::{FieldValue, PLAN_FIELDS};

    fn request() -> PlanRequest {
        PlanRequest {
            workout_type: "Fat Loss".to_string(),
            diet_type: "Keto".to_string(),
            current_weight: 80.0,
            target_weight: 70.0,
            dietary_restrictions: "None".to_string(),
            health_conditions: "None".to_string(),
            age: 28,
            gender: Gender::Male,
            number_of_weeks: 4,
            comments: String::new(),
        }
    }

    #[test]
    fn test_to_fields_covers_plan_template() {
        let fields = request().to_fields();
        assert_eq!(fields.len(), PLAN_FIELDS.len());
        for name in PLAN_FIELDS {
            assert!(fields.contains(name), "missing {}", name);
        }
        assert_eq!(fields.get("current_weight"), Some(&FieldValue::Decimal(80.0)));
        assert_eq!(fields.get("gender"), Some(&FieldValue::Text("Male".to_string())));
    }

    #[test]
    fn test_gender_parsing() {
        assert_eq!("female".parse::<Gender>(), Ok(Gender::Female));
        assert_eq!(" Other ".parse::<Gender>(), Ok(Gender::Other));
        assert_eq!("M".parse::<Gender>(), Ok(Gender::Male));
        assert!("robot".parse::<Gender>().is_err());
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(PlanRequest::default().validate().is_ok());
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_validate_collects_every_problem() {
        let mut req = request();
        req.current_weight = 250.0;
        req.age = 5;
        req.number_of_weeks = 13;
        let problems = req.validate().unwrap_err();
        assert_eq!(problems.len(), 3);
        assert!(problems[0].contains("current weight"));
    }
}
