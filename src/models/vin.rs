//! Modelo de VIN
//!
//! Normalización y validación sintáctica del Vehicle Identification Number.
//! No decodifica año ni dígito de control: solo formato y WMI.

use lazy_static::lazy_static;
use regex::Regex;

/// Longitud fija de un VIN
pub const VIN_LENGTH: usize = 17;

/// Longitud del World Manufacturer Identifier
pub const WMI_LENGTH: usize = 3;

lazy_static! {
    /// 17 caracteres alfanuméricos sin I, O ni Q
    static ref VIN_REGEX: Regex = Regex::new(r"^[A-HJ-NPR-Z0-9]{17}$").unwrap();
    static ref WMI_REGEX: Regex = Regex::new(r"^[A-HJ-NPR-Z0-9]{3}$").unwrap();
}

/// Trim + mayúsculas. Una entrada ausente se trata como cadena vacía.
pub fn normalize_vin(raw: Option<&str>) -> String {
    raw.unwrap_or_default().trim().to_uppercase()
}

/// Longitud en caracteres (no en bytes)
pub fn vin_length(vin: &str) -> usize {
    vin.chars().count()
}

/// Verifica el juego de caracteres de un VIN ya normalizado
pub fn has_valid_vin_characters(vin: &str) -> bool {
    VIN_REGEX.is_match(vin)
}

/// Verifica que un prefijo sea un WMI sintácticamente válido
pub fn is_valid_wmi(wmi: &str) -> bool {
    WMI_REGEX.is_match(wmi)
}

/// Extrae el WMI de un VIN ya validado
pub fn wmi(vin: &str) -> Option<&str> {
    if has_valid_vin_characters(vin) {
        Some(&vin[..WMI_LENGTH])
    } else {
        None
    }
}

/// Limpieza del campo de entrada del formulario: mayúsculas, sin separadores,
/// recortado a 17 caracteres.
pub fn sanitize_vin_input(raw: &str) -> String {
    raw.to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(VIN_LENGTH)
        .collect()
}
