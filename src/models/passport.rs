//! Modelo de Passport
//!
//! Registros tal como los devuelve el backend de pasaportes. Este servicio
//! no es dueño de estos datos: solo los lee. Un registro sellado es evidencia
//! inmutable y nunca se corrige localmente.

use serde::{Deserialize, Deserializer, Serialize};

/// Listas que el backend puede mandar como `null`
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Severidad DTC calculada por el backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DtcStatus {
    Green,
    Amber,
    Red,
    #[serde(rename = "n/a")]
    NotApplicable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DtcCode {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DtcReport {
    #[serde(default)]
    pub status: Option<DtcStatus>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub codes: Vec<DtcCode>,
}

/// Profundidad de dibujo por rueda, en milímetros
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TyreDepths {
    #[serde(default, alias = "FL")]
    pub fl: Option<f64>,
    #[serde(default, alias = "FR")]
    pub fr: Option<f64>,
    #[serde(default, alias = "RL")]
    pub rl: Option<f64>,
    #[serde(default, alias = "RR")]
    pub rr: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DekraReport {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub inspection_ts: Option<String>,
    #[serde(default)]
    pub site: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Odometer {
    #[serde(default)]
    pub km: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub captured_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub ts: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Estado de carga reportado por la telemetría
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargingStatus {
    Charging,
    Discharging,
    Idle,
}

/// Telemetría de batería (porcentajes 0-100)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatteryHealth {
    #[serde(default)]
    pub soh_pct: Option<f64>,
    #[serde(default)]
    pub soc_pct: Option<f64>,
    #[serde(default, rename = "rangeKm")]
    pub range_km: Option<f64>,
    #[serde(default, rename = "chargingStatus")]
    pub charging_status: Option<ChargingStatus>,
    #[serde(default, rename = "lastUpdated")]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvCapabilities {
    #[serde(default)]
    pub obd_ev_pids: bool,
    #[serde(default)]
    pub smartcar_oauth: bool,
    #[serde(default)]
    pub manual: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvProvenance {
    #[serde(default)]
    pub detection: Option<String>,
    #[serde(default)]
    pub detection_confidence: Option<f64>,
    #[serde(default)]
    pub battery_source: Option<String>,
}

/// Bloque EV del pasaporte
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvSection {
    #[serde(default)]
    pub is_electric: bool,
    #[serde(default)]
    pub battery_capacity_kwh: Option<f64>,
    #[serde(default)]
    pub smartcar_compatible: Option<bool>,
    #[serde(default)]
    pub capabilities: Option<EvCapabilities>,
    #[serde(default)]
    pub provenance: Option<EvProvenance>,
    #[serde(default)]
    pub battery_health: Option<BatteryHealth>,
}

/// Datos de subasta. Los timestamps llegan como texto RFC 3339.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionInfo {
    #[serde(default)]
    pub open_at: Option<String>,
    #[serde(default)]
    pub close_at: Option<String>,
    #[serde(default)]
    pub reserve_met: Option<bool>,
    #[serde(default)]
    pub current_bid: Option<f64>,
    #[serde(default)]
    pub bids: Option<u32>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Campos de inspección, compartidos por el borrador y la versión sellada
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassportDraft {
    pub vin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dekra: Option<DekraReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odometer: Option<Odometer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tyres_mm: Option<TyreDepths>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dtc: Option<DtcReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ev: Option<EvSection>,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub timeline: Vec<TimelineEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auction: Option<AuctionInfo>,
}

/// Sello criptográfico emitido por la autoridad de inspección
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seal {
    pub hash: String,
    pub sig: String,
    pub key_id: String,
    pub sealed_ts: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassportSealed {
    #[serde(flatten)]
    pub inspection: PassportDraft,
    pub seal: Seal,
}

/// Registro completo devuelto por `GET /passports/{vin}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassportRecord {
    pub vin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<PassportDraft>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sealed: Option<PassportSealed>,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl PassportRecord {
    pub fn is_sealed(&self) -> bool {
        self.sealed.is_some()
    }

    /// Datos de inspección a mostrar: la versión sellada si existe, si no el borrador
    pub fn inspection(&self) -> Option<&PassportDraft> {
        self.sealed
            .as_ref()
            .map(|sealed| &sealed.inspection)
            .or(self.draft.as_ref())
    }
}

/// Respuesta de `GET /verify?vin=`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasons: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sealed_record() {
        let json = r#"{
            "vin": "WDD2040082R088866",
            "updatedAt": "2025-01-15T10:30:00Z",
            "sealed": {
                "vin": "WDD2040082R088866",
                "lot_id": "LOT-2025-001",
                "seal": { "hash": "abc123def456", "sig": "signature123", "key_id": "key-001", "sealed_ts": "2025-01-15T10:30:00Z" },
                "odometer": { "km": 15000 },
                "tyres_mm": { "fl": 6.5, "fr": 6.2, "rl": 5.8, "rr": null },
                "dtc": { "status": "n/a", "codes": [{ "code": "P0420" }] },
                "ev": {
                    "isElectric": true,
                    "batteryCapacityKwh": 107.8,
                    "batteryHealth": { "soh_pct": 94.2, "soc_pct": 78, "rangeKm": 425, "chargingStatus": "idle" }
                }
            }
        }"#;

        let record: PassportRecord = serde_json::from_str(json).unwrap();
        assert!(record.is_sealed());
        let inspection = record.inspection().unwrap();
        assert_eq!(inspection.lot_id.as_deref(), Some("LOT-2025-001"));
        assert_eq!(inspection.tyres_mm.unwrap().rr, None);
        assert_eq!(inspection.dtc.as_ref().unwrap().status, Some(DtcStatus::NotApplicable));
        let health = inspection.ev.as_ref().unwrap().battery_health.as_ref().unwrap();
        assert_eq!(health.charging_status, Some(ChargingStatus::Idle));
        assert_eq!(record.sealed.unwrap().seal.key_id, "key-001");
    }

    #[test]
    fn test_draft_only_record() {
        let json = r#"{ "vin": "MAJFXXMTKFJP14265", "updatedAt": "2025-01-15T14:00:00Z", "draft": { "vin": "MAJFXXMTKFJP14265" } }"#;
        let record: PassportRecord = serde_json::from_str(json).unwrap();
        assert!(!record.is_sealed());
        assert_eq!(record.inspection().unwrap().vin, "MAJFXXMTKFJP14265");
    }

    #[test]
    fn test_null_lists_read_as_empty() {
        let json = r#"{
            "vin": "WDD2040082R088866",
            "dtc": { "status": "green", "codes": null },
            "timeline": null
        }"#;
        let inspection: PassportDraft = serde_json::from_str(json).unwrap();
        assert!(inspection.dtc.unwrap().codes.is_empty());
        assert!(inspection.timeline.is_empty());

        let inspection: PassportDraft = serde_json::from_str(r#"{ "vin": "WDD2040082R088866" }"#).unwrap();
        assert!(inspection.timeline.is_empty());
    }

    #[test]
    fn test_uppercase_wheel_keys() {
        let depths: TyreDepths = serde_json::from_str(r#"{ "FL": 1.5, "FR": 6 }"#).unwrap();
        assert_eq!(depths.fl, Some(1.5));
        assert_eq!(depths.rl, None);
    }
}
