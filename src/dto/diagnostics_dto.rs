use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::passport::{AuctionInfo, BatteryHealth, ChargingStatus};
use crate::services::battery_health::SocThresholds;
use crate::services::tyre_assessment::{TyreAssessment, WheelReading};

// Query para detección EV (`?vin=` puede faltar)
#[derive(Debug, Deserialize)]
pub struct EvDetectionQuery {
    pub vin: Option<String>,
}

// Response de descripción DTC
#[derive(Debug, Serialize)]
pub struct DtcDescriptionResponse {
    pub code: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TyreMetricsDisplay {
    pub min: String,
    pub avg: String,
    pub variation: String,
}

// Response de evaluación de neumáticos
#[derive(Debug, Serialize)]
pub struct TyreAssessResponse {
    pub wheels: Vec<WheelReading>,
    /// Ausente si no llegó ninguna lectura
    pub assessment: Option<TyreAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<TyreMetricsDisplay>,
    pub legal_notes: Vec<String>,
}

// Request de salud de batería
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BatteryHealthRequest {
    #[serde(default, alias = "soh_pct")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub soh_pct: Option<f64>,

    #[serde(default, alias = "soc_pct")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub soc_pct: Option<f64>,

    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub range_km: Option<f64>,

    #[serde(default)]
    pub charging_status: Option<ChargingStatus>,

    #[serde(default)]
    pub last_updated: Option<String>,

    /// Umbrales de SoC propios de quien llama; si faltan se usan los configurados
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0))]
    pub soc_good_pct: Option<f64>,

    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0))]
    pub soc_warning_pct: Option<f64>,
}

impl BatteryHealthRequest {
    pub fn health(&self) -> BatteryHealth {
        BatteryHealth {
            soh_pct: self.soh_pct,
            soc_pct: self.soc_pct,
            range_km: self.range_km,
            charging_status: self.charging_status,
            last_updated: self.last_updated.clone(),
        }
    }

    pub fn thresholds(&self, configured: SocThresholds) -> SocThresholds {
        SocThresholds {
            good_pct: self.soc_good_pct.unwrap_or(configured.good_pct),
            warning_pct: self.soc_warning_pct.unwrap_or(configured.warning_pct),
        }
    }
}

// Request de estado de subasta
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AuctionStateRequest {
    #[serde(default)]
    pub open_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub close_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub reserve_met: Option<bool>,

    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub current_bid: Option<f64>,

    #[serde(default)]
    pub bids: Option<u32>,

    #[serde(default)]
    pub url: Option<String>,

    /// Reloj explícito; por defecto la hora del servidor
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

impl AuctionStateRequest {
    pub fn auction_info(&self) -> AuctionInfo {
        AuctionInfo {
            open_at: self.open_at.map(|t| t.to_rfc3339()),
            close_at: self.close_at.map(|t| t.to_rfc3339()),
            reserve_met: self.reserve_met,
            current_bid: self.current_bid,
            bids: self.bids,
            url: self.url.clone(),
        }
    }
}
