use crate::domain::model::{ColumnNames, CoordinateRange, SanitizerRules};
use crate::utils::error::{EtlError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_float(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a finite number greater than 0".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_coordinate_range(field_name: &str, range: &CoordinateRange) -> Result<()> {
    if !(range.min <= range.max) {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: range.to_string(),
            reason: "Range minimum must not exceed its maximum".to_string(),
        });
    }
    Ok(())
}

pub fn validate_distinct(field_name: &str, values: &[&str]) -> Result<()> {
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(*value) {
            return Err(EtlError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: value.to_string(),
                reason: "Value is used more than once".to_string(),
            });
        }
    }
    Ok(())
}

impl Validate for ColumnNames {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("columns.name", &self.name)?;
        validate_non_empty_string("columns.description", &self.description)?;
        validate_non_empty_string("columns.latitude", &self.latitude)?;
        validate_non_empty_string("columns.longitude", &self.longitude)?;
        validate_distinct("columns", &self.required())
    }
}

impl Validate for SanitizerRules {
    fn validate(&self) -> Result<()> {
        validate_range("sanitizer.equality_decimals", self.equality_decimals, 0, 12)?;
        validate_coordinate_range("sanitizer.suspicious_lat", &self.suspicious_lat)?;
        validate_coordinate_range("sanitizer.suspicious_lng", &self.suspicious_lng)?;
        validate_coordinate_range("sanitizer.region_lat", &self.region_lat)?;
        validate_coordinate_range("sanitizer.region_lng", &self.region_lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("input", "Facility list.csv").is_ok());
        assert!(validate_path("input", "").is_err());
        assert!(validate_path("input", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_positive_float() {
        assert!(validate_positive_float("cell_size_deg", 0.01).is_ok());
        assert!(validate_positive_float("cell_size_deg", 0.0).is_err());
        assert!(validate_positive_float("cell_size_deg", f64::NAN).is_err());
        assert!(validate_positive_float("cell_size_deg", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_coordinate_range() {
        assert!(validate_coordinate_range("r", &CoordinateRange::new(0.0, 30.0)).is_ok());
        assert!(validate_coordinate_range("r", &CoordinateRange::new(5.0, 5.0)).is_ok());
        assert!(validate_coordinate_range("r", &CoordinateRange::new(30.0, 0.0)).is_err());
        assert!(validate_coordinate_range("r", &CoordinateRange::new(f64::NAN, 0.0)).is_err());
    }

    #[test]
    fn test_default_rules_and_columns_are_valid() {
        assert!(SanitizerRules::default().validate().is_ok());
        assert!(ColumnNames::default().validate().is_ok());

        let duplicated = ColumnNames {
            longitude: "Latitude".to_string(),
            ..ColumnNames::default()
        };
        assert!(duplicated.validate().is_err());

        let too_precise = SanitizerRules {
            equality_decimals: 20,
            ..SanitizerRules::default()
        };
        assert!(too_precise.validate().is_err());
    }
}
