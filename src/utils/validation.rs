//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! de entrada y conversión de tipos.

use chrono::{DateTime, Utc};
use validator::ValidationError;

use crate::models::vin::{has_valid_vin_characters, sanitize_vin_input};

/// Limpiar y validar el VIN escrito por el usuario
pub fn validate_vin_input(value: &str) -> Result<String, ValidationError> {
    let vin = sanitize_vin_input(value);
    if !has_valid_vin_characters(&vin) {
        let mut error = ValidationError::new("vin");
        error.add_param("value".into(), &value.to_string());
        error.message = Some("Please enter a valid 17-character VIN".into());
        return Err(error);
    }
    Ok(vin)
}

/// Validar y convertir string a datetime
pub fn validate_datetime(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            let mut error = ValidationError::new("datetime");
            error.add_param("value".into(), &value.to_string());
            error.add_param("format".into(), &"RFC3339".to_string());
            error
        })
}

/// Validar que un valor esté en un rango específico
pub fn validate_range<T: PartialOrd + std::fmt::Display + serde::Serialize>(
    value: T,
    min: T,
    max: T,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        let mut error = ValidationError::new("range");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_vin_input() {
        assert_eq!(validate_vin_input(" wdd2040082r088866 ").unwrap(), "WDD2040082R088866");
        assert_eq!(validate_vin_input("WDD-2040082-R088866").unwrap(), "WDD2040082R088866");
        assert!(validate_vin_input("WDD123456789012").is_err());
        assert!(validate_vin_input("WDD12345I789O123Q").is_err());
        assert!(validate_vin_input("").is_err());
    }

    #[test]
    fn test_validate_datetime() {
        assert!(validate_datetime("2025-01-15T10:30:00Z").is_ok());
        assert!(validate_datetime("2025-01-15T12:30:00+02:00").is_ok());
        assert!(validate_datetime("15/01/2025").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range(80.0, 0.0, 100.0).is_ok());
        assert!(validate_range(-1.0, 0.0, 100.0).is_err());
        assert!(validate_range(101.0, 0.0, 100.0).is_err());
    }
}
