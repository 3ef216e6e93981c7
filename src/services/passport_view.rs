//! Vista resumida del pasaporte
//!
//! Un único resumen parametrizado por audiencia: el cliente ve el hash
//! acortado, el equipo interno ve además el hash completo, la firma y la
//! procedencia de la captura.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ev::EvDetectionResult;
use crate::models::passport::{PassportDraft, PassportRecord, Provenance, Seal};
use crate::services::auction_state::{self, AuctionView};
use crate::services::battery_health::{self, BatteryHealthView, SocThresholds};
use crate::services::dtc_resolver::{self, DtcSummary};
use crate::services::passport_verification::VerificationOutcome;
use crate::services::tyre_assessment::{self, TyreAssessment, WheelReading};
use crate::services::vin_classifier::VinClassifier;
use crate::utils::format::{format_km, format_sast_timestamp, short_middle, MISSING};

/// Caracteres visibles a cada lado del hash acortado
const HASH_EDGE: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    #[default]
    Customer,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SealView {
    pub hash_short: String,
    pub key_id: String,
    pub sealed_at: String,
    pub integrity: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DekraView {
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub inspected_at: String,
    pub site: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TyreView {
    pub wheels: Vec<WheelReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<TyreAssessment>,
    pub legal_notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvView {
    pub detection: EvDetectionResult,
    pub detection_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_capacity_kwh: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery: Option<BatteryHealthView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineItem {
    pub when: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassportSummary {
    pub vin: String,
    pub audience: Audience,
    pub sealed: bool,
    pub lot_id: String,
    pub odometer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seal: Option<SealView>,
    pub dekra: DekraView,
    pub dtc: DtcSummary,
    pub tyres: TyreView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ev: Option<EvView>,
    pub auction: AuctionView,
    pub timeline: Vec<TimelineItem>,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
}

/// Dependencias de la vista que no vienen en el registro
pub struct SummaryContext<'a> {
    pub audience: Audience,
    pub classifier: &'a VinClassifier,
    pub soc_thresholds: SocThresholds,
    pub now: DateTime<Utc>,
    pub verification: Option<&'a VerificationOutcome>,
}

fn seal_view(seal: &Seal, audience: Audience, verified: bool) -> SealView {
    let internal = audience == Audience::Internal;
    SealView {
        hash_short: short_middle(Some(&seal.hash), HASH_EDGE, HASH_EDGE),
        key_id: seal.key_id.clone(),
        sealed_at: format_sast_timestamp(Some(&seal.sealed_ts)),
        integrity: if verified {
            "Integrity Seal: Verified"
        } else {
            "Integrity Seal: Verification unavailable"
        },
        hash: internal.then(|| seal.hash.clone()),
        signature: internal.then(|| seal.sig.clone()),
    }
}

fn dekra_view(inspection: &PassportDraft) -> DekraView {
    let dekra = inspection.dekra.as_ref();
    let url = dekra.and_then(|d| d.url.clone()).filter(|u| !u.trim().is_empty());
    DekraView {
        label: if url.is_some() { "DEKRA linked" } else { "DEKRA pending" },
        url,
        inspected_at: format_sast_timestamp(dekra.and_then(|d| d.inspection_ts.as_deref())),
        site: dekra
            .and_then(|d| d.site.clone())
            .unwrap_or_else(|| MISSING.to_string()),
    }
}

/// El bloque EV aparece si el VIN clasifica como eléctrico o si el
/// registro trae su propio bloque `ev` marcado como eléctrico.
fn ev_view(vin: &str, inspection: &PassportDraft, ctx: &SummaryContext<'_>) -> Option<EvView> {
    let detection = ctx.classifier.classify(Some(vin));
    let section = inspection.ev.as_ref();
    let declared = section.map_or(false, |ev| ev.is_electric);

    if !detection.is_electric && !declared {
        return None;
    }

    Some(EvView {
        detection_label: detection.detection_label(),
        battery_capacity_kwh: section
            .and_then(|ev| ev.battery_capacity_kwh)
            .or(detection.battery_estimate_kwh),
        battery: section
            .and_then(|ev| ev.battery_health.as_ref())
            .map(|health| battery_health::derive(health, &ctx.soc_thresholds)),
        detection,
    })
}

pub fn build_summary(record: &PassportRecord, ctx: &SummaryContext<'_>) -> PassportSummary {
    let empty = PassportDraft::default();
    let inspection = record.inspection().unwrap_or(&empty);
    let tyres = inspection.tyres_mm.unwrap_or_default();
    let verified = ctx.verification.map_or(false, VerificationOutcome::is_verified);

    PassportSummary {
        vin: record.vin.clone(),
        audience: ctx.audience,
        sealed: record.is_sealed(),
        lot_id: inspection
            .lot_id
            .clone()
            .unwrap_or_else(|| MISSING.to_string()),
        odometer: format_km(inspection.odometer.as_ref().and_then(|o| o.km)),
        seal: record
            .sealed
            .as_ref()
            .map(|sealed| seal_view(&sealed.seal, ctx.audience, verified)),
        dekra: dekra_view(inspection),
        dtc: dtc_resolver::summarize(inspection.dtc.as_ref()),
        tyres: TyreView {
            wheels: tyre_assessment::wheel_readings(&tyres),
            assessment: tyre_assessment::assess(&tyres),
            legal_notes: tyre_assessment::legal_notes(),
        },
        ev: ev_view(&record.vin, inspection, ctx),
        auction: auction_state::view_for(inspection.auction.as_ref(), ctx.now),
        timeline: inspection
            .timeline
            .iter()
            .map(|entry| TimelineItem {
                when: format_sast_timestamp(Some(&entry.ts)),
                title: entry.title.clone(),
                note: entry.note.clone(),
            })
            .collect(),
        updated_at: format_sast_timestamp(Some(&record.updated_at)),
        provenance: match ctx.audience {
            Audience::Internal => inspection.provenance.clone(),
            Audience::Customer => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::passport::{
        BatteryHealth, DekraReport, EvSection, Odometer, PassportSealed, TyreDepths,
    };
    use crate::services::battery_health::HealthBand;
    use crate::services::tyre_assessment::TyreStatus;
    use chrono::TimeZone;

    fn sealed_record(vin: &str) -> PassportRecord {
        PassportRecord {
            vin: vin.to_string(),
            draft: None,
            sealed: Some(PassportSealed {
                inspection: PassportDraft {
                    vin: vin.to_string(),
                    lot_id: Some("LOT-2025-001".to_string()),
                    odometer: Some(Odometer { km: Some(15000.0) }),
                    tyres_mm: Some(TyreDepths {
                        fl: Some(6.5),
                        fr: Some(6.2),
                        rl: Some(5.8),
                        rr: Some(6.0),
                    }),
                    dekra: Some(DekraReport {
                        url: Some("https://dekra.example/report/1".to_string()),
                        inspection_ts: Some("2025-01-15T08:00:00Z".to_string()),
                        site: Some("Johannesburg".to_string()),
                    }),
                    provenance: Some(Provenance {
                        captured_by: Some("inspector-7".to_string()),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
                seal: Seal {
                    hash: "0123456789abcdef0123456789abcdef".to_string(),
                    sig: "signature123".to_string(),
                    key_id: "key-001".to_string(),
                    sealed_ts: "2025-01-15T10:30:00Z".to_string(),
                },
            }),
            updated_at: "2025-01-15T10:30:00Z".to_string(),
        }
    }

    fn context<'a>(
        classifier: &'a VinClassifier,
        audience: Audience,
        verification: Option<&'a VerificationOutcome>,
    ) -> SummaryContext<'a> {
        SummaryContext {
            audience,
            classifier,
            soc_thresholds: SocThresholds::default(),
            now: Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap(),
            verification,
        }
    }

    #[test]
    fn test_customer_summary() {
        let classifier = VinClassifier::default();
        let verified = VerificationOutcome::Verified;
        let summary = build_summary(
            &sealed_record("WDD2040082R088866"),
            &context(&classifier, Audience::Customer, Some(&verified)),
        );

        assert!(summary.sealed);
        assert_eq!(summary.lot_id, "LOT-2025-001");
        assert_eq!(summary.odometer, "15\u{a0}000 km");
        let seal = summary.seal.unwrap();
        assert_eq!(seal.hash_short, "012345…abcdef");
        assert_eq!(seal.sealed_at, "15 January 2025, 12:30");
        assert_eq!(seal.integrity, "Integrity Seal: Verified");
        assert!(seal.hash.is_none());
        assert!(seal.signature.is_none());
        assert!(summary.provenance.is_none());
        assert_eq!(summary.dekra.label, "DEKRA linked");
        assert_eq!(summary.tyres.assessment.unwrap().status, TyreStatus::Good);
        assert_eq!(summary.tyres.legal_notes.len(), 3);
        assert_eq!(summary.dtc.empty_message, Some("No advisories reported."));
    }

    #[test]
    fn test_internal_summary_shows_full_seal() {
        let classifier = VinClassifier::default();
        let summary = build_summary(
            &sealed_record("WDD2040082R088866"),
            &context(&classifier, Audience::Internal, None),
        );
        let seal = summary.seal.unwrap();
        assert_eq!(seal.hash.as_deref(), Some("0123456789abcdef0123456789abcdef"));
        assert_eq!(seal.signature.as_deref(), Some("signature123"));
        assert_eq!(seal.integrity, "Integrity Seal: Verification unavailable");
        assert_eq!(
            summary.provenance.unwrap().captured_by.as_deref(),
            Some("inspector-7")
        );
    }

    #[test]
    fn test_ev_section_from_vin() {
        let classifier = VinClassifier::default();
        let summary = build_summary(
            &sealed_record("WDD2040082R088866"),
            &context(&classifier, Audience::Customer, None),
        );
        let ev = summary.ev.unwrap();
        assert_eq!(ev.detection_label, "VIN analysis (70% confidence)");
        assert_eq!(ev.battery_capacity_kwh, Some(80.0));
        assert!(ev.battery.is_none());
    }

    #[test]
    fn test_ev_section_from_record() {
        let classifier = VinClassifier::default();
        let mut record = sealed_record("MAJFXXMTKFJP14265");
        if let Some(sealed) = record.sealed.as_mut() {
            sealed.inspection.ev = Some(EvSection {
                is_electric: true,
                battery_capacity_kwh: Some(107.8),
                battery_health: Some(BatteryHealth {
                    soh_pct: Some(76.8),
                    ..Default::default()
                }),
                ..Default::default()
            });
        }

        let summary = build_summary(&record, &context(&classifier, Audience::Customer, None));
        let ev = summary.ev.unwrap();
        assert!(!ev.detection.is_electric);
        assert_eq!(ev.battery_capacity_kwh, Some(107.8));
        assert_eq!(
            ev.battery.unwrap().state_of_health.unwrap().band,
            HealthBand::Critical
        );
    }

    #[test]
    fn test_non_ev_draft_summary() {
        let classifier = VinClassifier::default();
        let record = PassportRecord {
            vin: "MAJFXXMTKFJP14265".to_string(),
            draft: Some(PassportDraft {
                vin: "MAJFXXMTKFJP14265".to_string(),
                ..Default::default()
            }),
            sealed: None,
            updated_at: "not a date".to_string(),
        };
        let summary = build_summary(&record, &context(&classifier, Audience::Customer, None));
        assert!(!summary.sealed);
        assert!(summary.seal.is_none());
        assert!(summary.ev.is_none());
        assert_eq!(summary.lot_id, MISSING);
        assert_eq!(summary.odometer, MISSING);
        assert_eq!(summary.dekra.label, "DEKRA pending");
        assert_eq!(summary.dekra.inspected_at, "Unknown");
        assert!(summary.tyres.assessment.is_none());
        assert_eq!(summary.updated_at, "not a date");
    }
}
