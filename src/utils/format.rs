//! Utilidades de formato
//!
//! Formato de presentación para montos en rand, kilómetros, hashes y
//! timestamps en hora de Sudáfrica.

use chrono::{DateTime, FixedOffset};

/// Espacio duro usado como separador de miles (locale en-ZA)
pub const NBSP: char = '\u{a0}';

/// Placeholder para valores ausentes
pub const MISSING: &str = "—";

/// Africa/Johannesburg: UTC+02:00 todo el año, sin horario de verano
const SAST_OFFSET_SECS: i32 = 2 * 3600;

/// Agrupa un entero en miles con espacio duro: 125000 -> "125 000"
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(NBSP);
        }
        grouped.push(ch);
    }
    grouped
}

/// Monto en rand sin decimales: 125000.0 -> "R 125 000"
pub fn format_zar(amount: f64) -> String {
    if !amount.is_finite() {
        return MISSING.to_string();
    }
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}R{}{}", sign, NBSP, group_thousands(rounded.abs() as u64))
}

/// Kilometraje: 15000.0 -> "15 000 km"
pub fn format_km(km: Option<f64>) -> String {
    match km {
        Some(value) if value.is_finite() && value >= 0.0 => {
            format!("{} km", group_thousands(value.round() as u64))
        }
        _ => MISSING.to_string(),
    }
}

/// Acorta un identificador largo conservando los extremos: "abc123…789xyz"
pub fn short_middle(value: Option<&str>, left: usize, right: usize) -> String {
    let Some(value) = value else {
        return MISSING.to_string();
    };
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= left + right + 1 {
        return value.to_string();
    }
    let head: String = chars[..left].iter().collect();
    let tail: String = chars[chars.len() - right..].iter().collect();
    format!("{}…{}", head, tail)
}

/// Timestamp RFC 3339 en hora SAST: "15 January 2025, 12:30".
/// Un valor que no se puede interpretar se devuelve tal cual.
pub fn format_sast_timestamp(iso: Option<&str>) -> String {
    let Some(iso) = iso else {
        return "Unknown".to_string();
    };
    let Some(offset) = FixedOffset::east_opt(SAST_OFFSET_SECS) else {
        return iso.to_string();
    };
    match DateTime::parse_from_rfc3339(iso) {
        Ok(parsed) => parsed.with_timezone(&offset).format("%-d %B %Y, %H:%M").to_string(),
        Err(_) => iso.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1\u{a0}000");
        assert_eq!(group_thousands(1250000), "1\u{a0}250\u{a0}000");
    }

    #[test]
    fn test_format_zar() {
        assert_eq!(format_zar(125000.0), "R\u{a0}125\u{a0}000");
        assert_eq!(format_zar(999.5), "R\u{a0}1\u{a0}000");
        assert_eq!(format_zar(-250.0), "-R\u{a0}250");
        assert_eq!(format_zar(f64::NAN), MISSING);
    }

    #[test]
    fn test_format_km() {
        assert_eq!(format_km(Some(15000.0)), "15\u{a0}000 km");
        assert_eq!(format_km(None), MISSING);
    }

    #[test]
    fn test_short_middle() {
        assert_eq!(short_middle(Some("abc123def456"), 6, 6), "abc123def456");
        assert_eq!(short_middle(Some("0123456789abcdefXYZ"), 6, 6), "012345…defXYZ");
        assert_eq!(short_middle(None, 6, 6), MISSING);
    }

    #[test]
    fn test_format_sast_timestamp() {
        assert_eq!(
            format_sast_timestamp(Some("2025-01-15T10:30:00Z")),
            "15 January 2025, 12:30"
        );
        assert_eq!(format_sast_timestamp(Some("yesterday")), "yesterday");
        assert_eq!(format_sast_timestamp(None), "Unknown");
    }
}
