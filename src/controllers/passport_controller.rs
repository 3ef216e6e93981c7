//! Controlador de pasaportes
//!
//! Orquesta las dos llamadas al backend y delega la interpretación en los
//! servicios de verificación y de vista.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::PassportBackend;
use crate::models::passport::PassportRecord;
use crate::services::battery_health::SocThresholds;
use crate::services::passport_verification::{
    outcome_for_sealed, VerificationOutcome, VerificationReport,
};
use crate::services::passport_view::{build_summary, Audience, PassportSummary, SummaryContext};
use crate::services::vin_classifier::VinClassifier;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::validate_vin_input;

pub struct PassportController {
    backend: Arc<dyn PassportBackend>,
    classifier: VinClassifier,
    soc_thresholds: SocThresholds,
}

/// VIN escrito por el usuario → VIN canónico o 400
pub fn parse_vin(raw: &str) -> AppResult<String> {
    validate_vin_input(raw).map_err(|e| {
        AppError::BadRequest(
            e.message
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Invalid VIN".to_string()),
        )
    })
}

impl PassportController {
    pub fn new(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
            classifier: state.classifier.clone(),
            soc_thresholds: state.soc_thresholds(),
        }
    }

    /// Registro del backend; un 404 es un resultado normal (`None`)
    async fn fetch(&self, vin: &str) -> AppResult<Option<PassportRecord>> {
        match self.backend.get_passport(vin).await {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_not_found() => {
                info!("🔍 Sin pasaporte para VIN {}", vin);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn verify_record(&self, vin: &str, record: &PassportRecord) -> VerificationOutcome {
        let Some(sealed) = record.sealed.as_ref() else {
            return VerificationOutcome::NoSealedPassport;
        };

        match self.backend.verify_passport(vin).await {
            Ok(response) => outcome_for_sealed(vin, sealed, Ok(&response)),
            Err(e) => {
                warn!("⚠️ Verificación fallida para VIN {}: {}", vin, e);
                outcome_for_sealed(vin, sealed, Err(e.to_string().as_str()))
            }
        }
    }

    pub async fn verify(&self, raw_vin: &str) -> AppResult<VerificationReport> {
        let vin = parse_vin(raw_vin)?;

        let report = match self.fetch(&vin).await? {
            Some(record) => {
                let outcome = self.verify_record(&vin, &record).await;
                VerificationReport::new(&vin, outcome, record.sealed.as_ref())
            }
            None => VerificationReport::new(&vin, VerificationOutcome::NoSealedPassport, None),
        };

        info!("✅ Verificación de {}: {}", vin, report.title);
        Ok(report)
    }

    pub async fn summary(
        &self,
        raw_vin: &str,
        audience: Audience,
        now: DateTime<Utc>,
    ) -> AppResult<PassportSummary> {
        let vin = parse_vin(raw_vin)?;

        let record = self
            .fetch(&vin)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No passport found for VIN {}", vin)))?;

        let verification = if record.is_sealed() {
            Some(self.verify_record(&vin, &record).await)
        } else {
            None
        };

        let context = SummaryContext {
            audience,
            classifier: &self.classifier,
            soc_thresholds: self.soc_thresholds,
            now,
            verification: verification.as_ref(),
        };

        Ok(build_summary(&record, &context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vin() {
        assert_eq!(parse_vin("wdd 2040082 r088866").unwrap(), "WDD2040082R088866");
        match parse_vin("WDD123") {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Please enter a valid 17-character VIN"),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }
}
