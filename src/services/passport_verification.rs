//! Verificación de pasaportes
//!
//! Traduce la respuesta del backend (registro + `/verify`) a uno de tres
//! resultados. Un pasaporte sellado es evidencia inmutable: los fallos se
//! reportan, nunca se corrigen.

use serde::Serialize;

use crate::models::passport::{PassportSealed, VerifyResponse};
use crate::models::vin::normalize_vin;
use crate::services::Tone;

/// Motivo agregado cuando el registro sellado pertenece a otro VIN
pub const SEALED_VIN_MISMATCH: &str = "sealed_vin_mismatch";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerificationOutcome {
    Verified,
    Failed { reasons: Vec<String> },
    NoSealedPassport,
}

impl VerificationOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationOutcome::Verified)
    }

    pub fn title(&self) -> &'static str {
        match self {
            VerificationOutcome::Verified => "Passport Verified",
            VerificationOutcome::Failed { .. } => "Verification Failed",
            VerificationOutcome::NoSealedPassport => "No Sealed Passport Found",
        }
    }

    pub fn subtitle(&self) -> String {
        match self {
            VerificationOutcome::Verified => {
                "This vehicle passport is cryptographically sealed and verified".to_string()
            }
            VerificationOutcome::Failed { reasons } if reasons.is_empty() => {
                "Integrity issues detected: Unknown error".to_string()
            }
            VerificationOutcome::Failed { reasons } => {
                format!("Integrity issues detected: {}", reasons.join(", "))
            }
            VerificationOutcome::NoSealedPassport => {
                "This VIN does not have a sealed digital passport".to_string()
            }
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            VerificationOutcome::Verified => Tone::Good,
            VerificationOutcome::Failed { .. } => Tone::Critical,
            VerificationOutcome::NoSealedPassport => Tone::Warning,
        }
    }
}

/// Resultado listo para la página pública de verificación
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationReport {
    pub vin: String,
    #[serde(flatten)]
    pub outcome: VerificationOutcome,
    pub title: &'static str,
    pub subtitle: String,
    pub tone: Tone,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sealed_ts: Option<String>,
}

impl VerificationReport {
    pub fn new(vin: &str, outcome: VerificationOutcome, sealed: Option<&PassportSealed>) -> Self {
        Self {
            vin: vin.to_string(),
            title: outcome.title(),
            subtitle: outcome.subtitle(),
            tone: outcome.tone(),
            key_id: sealed.map(|s| s.seal.key_id.clone()),
            sealed_ts: sealed.map(|s| s.seal.sealed_ts.clone()),
            outcome,
        }
    }
}

/// Comprobaciones locales sobre el registro sellado
pub fn local_integrity_reasons(vin: &str, sealed: &PassportSealed) -> Vec<String> {
    let mut reasons = Vec::new();
    if normalize_vin(Some(&sealed.inspection.vin)) != normalize_vin(Some(vin)) {
        reasons.push(SEALED_VIN_MISMATCH.to_string());
    }
    reasons
}

/// Resultado para un registro sellado. `verify` es la respuesta de
/// `/verify` o el mensaje de error de esa llamada.
pub fn outcome_for_sealed(
    vin: &str,
    sealed: &PassportSealed,
    verify: Result<&VerifyResponse, &str>,
) -> VerificationOutcome {
    let mut reasons = local_integrity_reasons(vin, sealed);

    match verify {
        Ok(response) => {
            if response.valid && reasons.is_empty() {
                return VerificationOutcome::Verified;
            }
            if !response.valid {
                reasons.extend(response.reasons.iter().flatten().cloned());
            }
        }
        Err(message) => reasons.push(format!("Verification failed: {}", message)),
    }

    VerificationOutcome::Failed { reasons }
}
