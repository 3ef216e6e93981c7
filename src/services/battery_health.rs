//! Salud de batería EV
//!
//! Bandas de color para State-of-Charge y State-of-Health y tono del
//! estado de carga.

use serde::Serialize;

use crate::models::passport::{BatteryHealth, ChargingStatus};
use crate::services::Tone;

pub const SOH_GOOD_PCT: f64 = 90.0;
pub const SOH_WARNING_PCT: f64 = 80.0;

/// Umbrales de SoC elegidos por quien llama
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SocThresholds {
    pub good_pct: f64,
    pub warning_pct: f64,
}

impl Default for SocThresholds {
    fn default() -> Self {
        Self {
            good_pct: 80.0,
            warning_pct: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthBand {
    Good,
    Warning,
    Critical,
}

impl HealthBand {
    pub fn tone(&self) -> Tone {
        match self {
            HealthBand::Good => Tone::Good,
            HealthBand::Warning => Tone::Warning,
            HealthBand::Critical => Tone::Critical,
        }
    }
}

fn band(pct: f64, good: f64, warning: f64) -> HealthBand {
    if pct >= good {
        HealthBand::Good
    } else if pct >= warning {
        HealthBand::Warning
    } else {
        HealthBand::Critical
    }
}

pub fn soc_band(pct: f64, thresholds: &SocThresholds) -> HealthBand {
    band(pct, thresholds.good_pct, thresholds.warning_pct)
}

pub fn soh_band(pct: f64) -> HealthBand {
    band(pct, SOH_GOOD_PCT, SOH_WARNING_PCT)
}

/// charging → positivo, discharging → precaución, idle → neutro
pub fn charging_tone(status: ChargingStatus) -> Tone {
    match status {
        ChargingStatus::Charging => Tone::Good,
        ChargingStatus::Discharging => Tone::Warning,
        ChargingStatus::Idle => Tone::Neutral,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentReading {
    pub pct: f64,
    /// Redondeado: "78%"
    pub display: String,
    pub band: HealthBand,
}

impl PercentReading {
    fn new(pct: f64, band: HealthBand) -> Self {
        Self {
            pct,
            display: format!("{}%", pct.round() as i64),
            band,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargingView {
    pub status: ChargingStatus,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatteryHealthView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_of_charge: Option<PercentReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_of_health: Option<PercentReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charging: Option<ChargingView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// Cada lectura se evalúa por separado; las que faltan o no son finitas se omiten.
pub fn derive(health: &BatteryHealth, thresholds: &SocThresholds) -> BatteryHealthView {
    let finite = |value: Option<f64>| value.filter(|v| v.is_finite());

    BatteryHealthView {
        state_of_charge: finite(health.soc_pct)
            .map(|pct| PercentReading::new(pct, soc_band(pct, thresholds))),
        state_of_health: finite(health.soh_pct).map(|pct| PercentReading::new(pct, soh_band(pct))),
        charging: health.charging_status.map(|status| ChargingView {
            status,
            tone: charging_tone(status),
        }),
        range_km: finite(health.range_km),
        last_updated: health.last_updated.clone(),
    }
}
