//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: la
//! clasificación de VIN y las derivaciones de presentación que se
//! calculan sobre los registros del backend de pasaportes.

use serde::Serialize;

pub mod auction_state;
pub mod battery_health;
pub mod dtc_resolver;
pub mod passport_verification;
pub mod passport_view;
pub mod tyre_assessment;
pub mod vin_classifier;

pub use passport_verification::*;
pub use vin_classifier::*;

/// Tono visual compartido por todos los indicadores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Good,
    Warning,
    Critical,
    Neutral,
}
