//! Evaluación de desgaste de neumáticos
//!
//! Evaluación agregada sobre las cuatro ruedas y banda independiente por
//! rueda. Umbrales según la norma sudafricana (mínimo legal 1.6mm).

use serde::Serialize;

use crate::models::passport::TyreDepths;
use crate::services::Tone;
use crate::utils::format::MISSING;

/// Mínimo legal en Sudáfrica
pub const LEGAL_MINIMUM_MM: f64 = 1.6;
/// Reemplazo recomendado (informativo)
pub const RECOMMENDED_REPLACEMENT_MM: f64 = 3.0;
/// Rango de un neumático nuevo
pub const NEW_TYRE_MIN_MM: f64 = 8.0;
pub const NEW_TYRE_MAX_MM: f64 = 12.0;

const POOR_BELOW_MM: f64 = 2.0;
const FAIR_BELOW_MM: f64 = 4.0;
const UNEVEN_VARIANCE_MM: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WheelPosition {
    FL,
    FR,
    RL,
    RR,
}

impl WheelPosition {
    pub const ALL: [WheelPosition; 4] = [
        WheelPosition::FL,
        WheelPosition::FR,
        WheelPosition::RL,
        WheelPosition::RR,
    ];

    fn depth(&self, depths: &TyreDepths) -> Option<f64> {
        match self {
            WheelPosition::FL => depths.fl,
            WheelPosition::FR => depths.fr,
            WheelPosition::RL => depths.rl,
            WheelPosition::RR => depths.rr,
        }
    }
}

/// Estado agregado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TyreStatus {
    Critical,
    Poor,
    Fair,
    #[serde(rename = "Uneven Wear")]
    UnevenWear,
    Good,
}

impl TyreStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TyreStatus::Critical => "Critical",
            TyreStatus::Poor => "Poor",
            TyreStatus::Fair => "Fair",
            TyreStatus::UnevenWear => "Uneven Wear",
            TyreStatus::Good => "Good",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            TyreStatus::Critical => {
                "Vehicle has tyres below legal minimum (1.6mm). Immediate replacement required before use."
            }
            TyreStatus::Poor => "Vehicle has tyres at or near legal minimum. Replacement urgently needed.",
            TyreStatus::Fair => "Tyres show moderate wear. Replacement should be planned within 6 months.",
            TyreStatus::UnevenWear => {
                "Significant variation in tyre wear detected. May indicate alignment or suspension issues."
            }
            TyreStatus::Good => "All tyres in good condition with adequate remaining tread.",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            TyreStatus::Critical => "Do not drive - replace immediately",
            TyreStatus::Poor => "Budget for immediate tyre replacement",
            TyreStatus::Fair => "Plan for replacement in coming months",
            TyreStatus::UnevenWear => "Inspect for underlying mechanical issues",
            TyreStatus::Good => "No immediate action required",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            TyreStatus::Critical | TyreStatus::Poor => Tone::Critical,
            TyreStatus::Fair | TyreStatus::UnevenWear => Tone::Warning,
            TyreStatus::Good => Tone::Good,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TyreAssessment {
    pub status: TyreStatus,
    pub message: &'static str,
    pub recommendation: &'static str,
    pub tone: Tone,
    pub min_mm: f64,
    pub max_mm: f64,
    pub avg_mm: f64,
    /// max - min
    pub variance_mm: f64,
    pub readings: usize,
}

impl TyreAssessment {
    /// Métricas con un decimal: (mínimo, promedio, variación)
    pub fn display_metrics(&self) -> (String, String, String) {
        (
            format!("{:.1}mm", self.min_mm),
            format!("{:.1}mm", self.avg_mm),
            format!("{:.1}mm", self.variance_mm),
        )
    }
}

/// Evaluación agregada. `None` si no hay ninguna lectura válida.
/// El orden de las reglas importa: los umbrales de profundidad se evalúan
/// antes que la variación.
pub fn assess(depths: &TyreDepths) -> Option<TyreAssessment> {
    let values: Vec<f64> = WheelPosition::ALL
        .iter()
        .filter_map(|position| position.depth(depths))
        .filter(|d| d.is_finite())
        .collect();

    if values.is_empty() {
        return None;
    }

    let min_mm = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max_mm = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg_mm = values.iter().sum::<f64>() / values.len() as f64;
    let variance_mm = max_mm - min_mm;

    let status = if min_mm < LEGAL_MINIMUM_MM {
        TyreStatus::Critical
    } else if min_mm < POOR_BELOW_MM {
        TyreStatus::Poor
    } else if min_mm < FAIR_BELOW_MM {
        TyreStatus::Fair
    } else if variance_mm > UNEVEN_VARIANCE_MM {
        TyreStatus::UnevenWear
    } else {
        TyreStatus::Good
    };

    Some(TyreAssessment {
        status,
        message: status.message(),
        recommendation: status.recommendation(),
        tone: status.tone(),
        min_mm,
        max_mm,
        avg_mm,
        variance_mm,
        readings: values.len(),
    })
}

/// Banda por rueda
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TyreBand {
    Excellent,
    Good,
    Fair,
    #[serde(rename = "Legal Minimum")]
    LegalMinimum,
    #[serde(rename = "Below Legal")]
    BelowLegal,
}

impl TyreBand {
    pub fn description(&self) -> &'static str {
        match self {
            TyreBand::Excellent => "Like new condition",
            TyreBand::Good => "Good remaining life",
            TyreBand::Fair => "Consider replacement soon",
            TyreBand::LegalMinimum => "At legal limit - replace immediately",
            TyreBand::BelowLegal => "Unsafe - immediate replacement required",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            TyreBand::Excellent | TyreBand::Good => Tone::Good,
            TyreBand::Fair => Tone::Warning,
            TyreBand::LegalMinimum | TyreBand::BelowLegal => Tone::Critical,
        }
    }
}

pub fn band_for_depth(depth_mm: f64) -> TyreBand {
    if depth_mm >= NEW_TYRE_MIN_MM {
        TyreBand::Excellent
    } else if depth_mm >= FAIR_BELOW_MM {
        TyreBand::Good
    } else if depth_mm >= POOR_BELOW_MM {
        TyreBand::Fair
    } else if depth_mm >= LEGAL_MINIMUM_MM {
        TyreBand::LegalMinimum
    } else {
        TyreBand::BelowLegal
    }
}

/// Celda por rueda
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WheelReading {
    pub position: WheelPosition,
    pub depth_mm: Option<f64>,
    /// "6.5" o "—"
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<TyreBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

pub fn wheel_readings(depths: &TyreDepths) -> Vec<WheelReading> {
    WheelPosition::ALL
        .iter()
        .map(|&position| {
            let depth_mm = position.depth(depths).filter(|d| d.is_finite());
            let band = depth_mm.map(band_for_depth);
            WheelReading {
                position,
                depth_mm,
                display: depth_mm
                    .map(|d| format!("{:.1}", d))
                    .unwrap_or_else(|| MISSING.to_string()),
                band,
                description: band.map(|b| b.description()),
            }
        })
        .collect()
}

/// Notas legales que acompañan la evaluación
pub fn legal_notes() -> Vec<String> {
    vec![
        format!("South African legal minimum: {:.1}mm", LEGAL_MINIMUM_MM),
        format!("Recommended replacement: {:.1}mm", RECOMMENDED_REPLACEMENT_MM),
        format!("New tyre depth: {}-{}mm", NEW_TYRE_MIN_MM, NEW_TYRE_MAX_MM),
    ]
}
