//! Resolución de códigos DTC
//!
//! Descripciones legibles para códigos OBD-II (SAE J2012) que el backend
//! no anotó, más el armado de la lista de advertencias que se muestra.
//! Nunca falla: la ausencia de descripción es un resultado normal.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;

use crate::models::passport::{DtcCode, DtcReport, DtcStatus};
use crate::services::Tone;

/// Máximo de advertencias listadas
pub const MAX_ADVISORIES: usize = 5;

lazy_static! {
    static ref DTC_FORMAT: Regex = Regex::new(r"^[PCBU][0-9A-F]{4}$").unwrap();
    static ref MISFIRE: Regex = Regex::new(r"^P030([1-8])$").unwrap();
    static ref O2_BANK_1: Regex = Regex::new(r"^P013[0-9A-F]$").unwrap();
    static ref O2_BANK_2: Regex = Regex::new(r"^P015[0-9A-F]$").unwrap();
    static ref EVAP_FAMILY: Regex = Regex::new(r"^P044[0-9A-F]$").unwrap();

    static ref KNOWN_CODES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        // Emisiones / catalizador
        m.insert("P0420", "Catalyst system efficiency below threshold (Bank 1)");
        m.insert("P0430", "Catalyst system efficiency below threshold (Bank 2)");
        // Mezcla aire/combustible
        m.insert("P0171", "System too lean (Bank 1)");
        m.insert("P0174", "System too lean (Bank 2)");
        m.insert("P0172", "System too rich (Bank 1)");
        m.insert("P0175", "System too rich (Bank 2)");
        // EVAP
        m.insert("P0440", "Evaporative emission control system (generic fault)");
        m.insert("P0442", "Evaporative emission system leak detected (small leak)");
        m.insert("P0455", "Evaporative emission system leak detected (large leak)");
        // Encendido
        m.insert("P0300", "Random/multiple cylinder misfire detected");
        // Admisión / MAF / O2
        m.insert("P0101", "MAF/VAF circuit range/performance problem");
        m.insert("P0113", "Intake air temperature sensor 1 circuit high");
        m.insert("P0128", "Coolant thermostat (below regulating temperature)");
        m.insert("P0130", "O2 sensor circuit (Bank 1, Sensor 1)");
        // Velocidad / TCM
        m.insert("P0500", "Vehicle speed sensor (VSS) malfunction");
        m.insert("P0700", "Transmission control system (TCM) malfunction (request MIL)");
        m
    };
}

fn system_label(letter: char) -> &'static str {
    match letter {
        'P' => "Powertrain",
        'B' => "Body",
        'C' => "Chassis",
        'U' => "Network/Comm",
        _ => "Unknown system",
    }
}

/// Segundo carácter de un código P
fn powertrain_family(digit: char) -> &'static str {
    match digit {
        '0' => "generic (SAE)",
        '1' | '2' | '3' => "manufacturer-specific",
        _ => "unspecified",
    }
}

/// Tercer carácter de un código P
fn powertrain_area(digit: char) -> &'static str {
    match digit {
        '0' => "generic fault",
        '1' => "fuel/air metering",
        '2' => "fuel/air metering (injector circuit)",
        '3' => "ignition/misfire",
        '4' => "auxiliary emission controls",
        '5' => "vehicle speed/idle/aux inputs",
        '6' => "computer/output circuits",
        '7' | '8' => "transmission",
        '9' => "SAE reserved",
        'A' => "hybrid/EV (manufacturer-specific)",
        _ => "unspecified area",
    }
}

fn normalize(code: &str) -> String {
    code.trim().to_uppercase()
}

/// ¿Tiene el código formato `[PCBU]` + 4 hex? (sin distinguir mayúsculas)
pub fn is_dtc_code(code: &str) -> bool {
    DTC_FORMAT.is_match(&normalize(code))
}

/// Describir un DTC. Devuelve `None` si el formato no es válido.
pub fn describe(code: &str) -> Option<String> {
    let code = normalize(code);
    if !DTC_FORMAT.is_match(&code) {
        return None;
    }

    if let Some(known) = KNOWN_CODES.get(code.as_str()) {
        return Some((*known).to_string());
    }

    if let Some(caps) = MISFIRE.captures(&code) {
        return Some(format!("Cylinder {} misfire detected", &caps[1]));
    }

    if O2_BANK_1.is_match(&code) {
        return Some("O2 sensor circuit (Bank 1)".to_string());
    }
    if O2_BANK_2.is_match(&code) {
        return Some("O2 sensor circuit (Bank 2)".to_string());
    }

    if EVAP_FAMILY.is_match(&code) {
        return Some("Evaporative emission system fault".to_string());
    }

    // El formato ya garantiza 5 caracteres ASCII
    let chars: Vec<char> = code.chars().collect();
    let system = system_label(chars[0]);
    if chars[0] == 'P' {
        return Some(format!(
            "{} ({}) — {} ({}xx)",
            system,
            powertrain_family(chars[1]),
            powertrain_area(chars[2]),
            &code[..3]
        ));
    }
    Some(format!("{} fault", system))
}

/// Chip de estado DTC
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DtcStatusChip {
    pub label: &'static str,
    pub tone: Tone,
}

pub fn status_chip(status: Option<DtcStatus>) -> DtcStatusChip {
    let (label, tone) = match status {
        Some(DtcStatus::Green) => ("No faults", Tone::Good),
        Some(DtcStatus::Amber) => ("Advisories", Tone::Warning),
        Some(DtcStatus::Red) => ("Critical faults", Tone::Critical),
        Some(DtcStatus::NotApplicable) | None => ("N/A", Tone::Neutral),
    };
    DtcStatusChip { label, tone }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advisory {
    pub code: String,
    pub description: String,
}

/// Lista de advertencias lista para mostrar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DtcSummary {
    pub chip: DtcStatusChip,
    pub advisories: Vec<Advisory>,
    /// Códigos válidos que no entraron en la lista
    pub more: usize,
    /// Texto cuando no hay nada que listar
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
}

/// Filtra códigos mal formados, completa descripciones y recorta la lista.
/// La descripción del backend tiene prioridad sobre la del diccionario.
pub fn summarize(report: Option<&DtcReport>) -> DtcSummary {
    let status = report.and_then(|r| r.status);
    let codes: &[DtcCode] = report.map(|r| r.codes.as_slice()).unwrap_or_default();

    let enriched: Vec<Advisory> = codes
        .iter()
        .filter(|c| is_dtc_code(&c.code))
        .map(|c| {
            let code = normalize(&c.code);
            let description = c
                .desc
                .clone()
                .filter(|d| !d.trim().is_empty())
                .or_else(|| describe(&code))
                .unwrap_or_else(|| "Diagnostic advisory".to_string());
            Advisory { code, description }
        })
        .collect();

    let chip = status_chip(status);
    if status == Some(DtcStatus::Green) || enriched.is_empty() {
        return DtcSummary {
            chip,
            advisories: Vec::new(),
            more: 0,
            empty_message: Some("No advisories reported."),
        };
    }

    let more = enriched.len().saturating_sub(MAX_ADVISORIES);
    let advisories = enriched.into_iter().take(MAX_ADVISORIES).collect();
    DtcSummary {
        chip,
        advisories,
        more,
        empty_message: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dictionary_hits() {
        assert_eq!(
            describe("P0420").as_deref(),
            Some("Catalyst system efficiency below threshold (Bank 1)")
        );
        // P0130 está en el diccionario y gana a la familia O2
        assert_eq!(describe("p0130").as_deref(), Some("O2 sensor circuit (Bank 1, Sensor 1)"));
        assert_eq!(
            describe("P0442").as_deref(),
            Some("Evaporative emission system leak detected (small leak)")
        );
    }

    #[test]
    fn test_cylinder_misfire() {
        assert_eq!(describe("P0301").as_deref(), Some("Cylinder 1 misfire detected"));
        assert_eq!(describe("P0308").as_deref(), Some("Cylinder 8 misfire detected"));
        assert_eq!(
            describe("P0309").as_deref(),
            Some("Powertrain (generic (SAE)) — ignition/misfire (P03xx)")
        );
    }

    #[test]
    fn test_family_hints() {
        assert_eq!(describe("P013A").as_deref(), Some("O2 sensor circuit (Bank 1)"));
        assert_eq!(describe("P0155").as_deref(), Some("O2 sensor circuit (Bank 2)"));
        assert_eq!(describe("P0446").as_deref(), Some("Evaporative emission system fault"));
    }

    #[test]
    fn test_generic_fallback() {
        assert_eq!(
            describe("P1351").as_deref(),
            Some("Powertrain (manufacturer-specific) — ignition/misfire (P13xx)")
        );
        assert_eq!(
            describe("P0A80").as_deref(),
            Some("Powertrain (generic (SAE)) — hybrid/EV (manufacturer-specific) (P0Axx)")
        );
        assert_eq!(
            describe("PFB00").as_deref(),
            Some("Powertrain (unspecified) — unspecified area (PFBxx)")
        );
        assert_eq!(describe("B1600").as_deref(), Some("Body fault"));
        assert_eq!(describe("c0035").as_deref(), Some("Chassis fault"));
        assert_eq!(describe("U0100").as_deref(), Some("Network/Comm fault"));
    }

    #[test]
    fn test_invalid_format() {
        for code in ["Z9999", "", "P042", "P04200", "P0G00", "  "] {
            assert_eq!(describe(code), None, "{:?}", code);
        }
    }

    #[test]
    fn test_status_chip() {
        assert_eq!(status_chip(Some(DtcStatus::Green)).label, "No faults");
        assert_eq!(status_chip(Some(DtcStatus::Amber)).tone, Tone::Warning);
        assert_eq!(status_chip(Some(DtcStatus::Red)).label, "Critical faults");
        assert_eq!(status_chip(None).label, "N/A");
    }

    #[test]
    fn test_summarize_enriches_and_truncates() {
        let codes = ["p0301", "BAD", "P0420", "B1600", "U0100", "C0035", "P0171", "P0172"]
            .iter()
            .map(|c| DtcCode { code: c.to_string(), desc: None })
            .collect();
        let report = DtcReport { status: Some(DtcStatus::Amber), codes };

        let summary = summarize(Some(&report));
        assert_eq!(summary.advisories.len(), MAX_ADVISORIES);
        assert_eq!(summary.more, 2);
        assert_eq!(summary.advisories[0].code, "P0301");
        assert_eq!(summary.advisories[0].description, "Cylinder 1 misfire detected");
        assert!(summary.empty_message.is_none());
    }

    #[test]
    fn test_summarize_keeps_backend_description() {
        let report = DtcReport {
            status: Some(DtcStatus::Red),
            codes: vec![DtcCode {
                code: "B1600".to_string(),
                desc: Some("Critical: Battery system fault".to_string()),
            }],
        };
        let summary = summarize(Some(&report));
        assert_eq!(summary.advisories[0].description, "Critical: Battery system fault");
    }

    #[test]
    fn test_summarize_green_or_empty() {
        let green = DtcReport {
            status: Some(DtcStatus::Green),
            codes: vec![DtcCode { code: "P0420".to_string(), desc: None }],
        };
        let summary = summarize(Some(&green));
        assert!(summary.advisories.is_empty());
        assert_eq!(summary.empty_message, Some("No advisories reported."));

        let summary = summarize(None);
        assert_eq!(summary.chip.label, "N/A");
        assert_eq!(summary.empty_message, Some("No advisories reported."));
    }
}
