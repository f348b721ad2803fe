use std::str::FromStr;

use chrono::NaiveDate;
use validator::Validate;

use crate::{ServiceError, ServiceResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Validate)]
struct EmailValidator {
    #[validate(email)]
    email: String,
}

pub fn validate_email(email: &str) -> ServiceResult<String> {
    let validator = EmailValidator {
        email: email.trim().to_string(),
    };
    if validator.validate().is_err() {
        return ServiceError::validation(format!("Invalid email: {}", validator.email));
    }
    Ok(validator.email)
}

pub fn parse_date(field: &str, value: &str) -> ServiceResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        ServiceError::Validation(format!("{} must be a date in YYYY-MM-DD format", field))
    })
}

pub fn parse_number<T: FromStr>(field: &str, value: &str) -> ServiceResult<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ServiceError::Validation(format!("{} must be a number", field)))
}

pub fn parse_count(field: &str, value: &str) -> ServiceResult<i64> {
    let count: i64 = parse_number(field, value)?;
    if count < 0 {
        return ServiceError::validation(format!("{} cannot be negative", field));
    }
    Ok(count)
}

/// Trims the value and enforces the column limits of the storage schema.
pub fn required_text(field: &str, value: &str, max_len: usize) -> ServiceResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return ServiceError::validation(format!("{} is required", field));
    }
    if value.chars().count() > max_len {
        return ServiceError::validation(format!(
            "{} must be at most {} characters",
            field, max_len
        ));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("Date of birth", "2005-03-14").ok(),
            NaiveDate::from_ymd_opt(2005, 3, 14)
        );
        assert!(matches!(
            parse_date("Date of birth", "14/03/2005"),
            Err(ServiceError::Validation(msg)) if msg.starts_with("Date of birth")
        ));
        assert!(parse_date("Match date", "2024-02-30").is_err());
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_number::<f64>("Height", " 1.91 ").ok(), Some(1.91));
        assert!(parse_number::<f64>("Height", "tall").is_err());
        assert_eq!(parse_count("Points", "12").ok(), Some(12));
        assert!(parse_count("Points", "-1").is_err());
        assert!(parse_count("Points", "1.5").is_err());
    }

    #[test]
    fn test_required_text() {
        assert_eq!(
            required_text("Position", "  Center ", 20).ok(),
            Some("Center".to_string())
        );
        assert!(required_text("Position", "   ", 20).is_err());
        assert!(required_text("Position", &"x".repeat(21), 20).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(
            validate_email(" coach@club.example ").ok(),
            Some("coach@club.example".to_string())
        );
        assert!(validate_email("not-an-email").is_err());
    }
}
