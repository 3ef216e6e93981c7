//! Modelo de detección de vehículos eléctricos
//!
//! Tabla estática WMI → capacidades EV y el resultado derivado de la
//! heurística por VIN. La tabla es configuración: se puede reemplazar
//! cargando un JSON al arrancar.

use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

use super::vin::is_valid_wmi;

/// Origen constante de toda detección hecha aquí
pub const DETECTION_SOURCE: &str = "vin_heuristic";

/// Confianza fija asignada a cualquier acierto en la tabla
pub const HEURISTIC_CONFIDENCE: f64 = 0.7;

/// Motivo por el que un VIN fue rechazado antes de consultar la tabla
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VinError {
    InvalidVinLength,
    InvalidVinCharacters,
}

impl VinError {
    pub fn code(&self) -> &'static str {
        match self {
            VinError::InvalidVinLength => "invalid_vin_length",
            VinError::InvalidVinCharacters => "invalid_vin_characters",
        }
    }
}

impl fmt::Display for VinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Entrada de la tabla de capacidades
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvCapability {
    pub make: String,
    pub smartcar_supported: bool,
    pub battery_kwh: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl EvCapability {
    fn new(make: &str, smartcar_supported: bool, battery_kwh: f64, note: Option<&str>) -> Self {
        Self {
            make: make.to_string(),
            smartcar_supported,
            battery_kwh,
            note: note.map(str::to_string),
        }
    }
}

/// Errores al cargar una tabla externa
#[derive(Debug, Error)]
pub enum EvTableError {
    #[error("Cannot read EV capability table: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot parse EV capability table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid WMI key in EV capability table: '{0}'")]
    InvalidWmi(String),
}

/// Tabla WMI → capacidades EV
#[derive(Debug, Clone, PartialEq)]
pub struct EvCapabilityTable {
    entries: HashMap<String, EvCapability>,
}

impl Default for EvCapabilityTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EvCapabilityTable {
    /// Tabla incorporada
    pub fn builtin() -> Self {
        let mut entries = HashMap::new();
        entries.insert("WDD".to_string(), EvCapability::new("Mercedes-Benz", true, 80.0, None));
        entries.insert("WBA".to_string(), EvCapability::new("BMW", true, 85.0, None));
        entries.insert("JYJ".to_string(), EvCapability::new("Tesla", true, 75.0, None));
        entries.insert("WVW".to_string(), EvCapability::new("Volkswagen", true, 77.0, None));
        entries.insert(
            "LGX".to_string(),
            EvCapability::new("BYD", false, 60.0, Some("Confirm locally")),
        );
        Self { entries }
    }

    /// Construir desde un JSON `{ "WMI": { make, smartcarSupported, batteryKwh, note? } }`.
    /// Las claves se normalizan a mayúsculas.
    pub fn from_json(json: &str) -> Result<Self, EvTableError> {
        let raw: HashMap<String, EvCapability> = serde_json::from_str(json)?;
        let mut entries = HashMap::with_capacity(raw.len());
        for (key, capability) in raw {
            let wmi = key.trim().to_uppercase();
            if !is_valid_wmi(&wmi) {
                return Err(EvTableError::InvalidWmi(key));
            }
            entries.insert(wmi, capability);
        }
        Ok(Self { entries })
    }

    pub fn from_path(path: &Path) -> Result<Self, EvTableError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn lookup(&self, wmi: &str) -> Option<&EvCapability> {
        self.entries.get(wmi)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resultado de la heurística. `error` y `caveat` son excluyentes.
///
/// En JSON se añade además `notes`, la vista combinada de ambos.
#[derive(Debug, Clone, PartialEq)]
pub struct EvDetectionResult {
    pub is_electric: bool,
    pub make: Option<String>,
    pub smartcar_compatible: bool,
    pub battery_estimate_kwh: Option<f64>,
    pub confidence: f64,
    pub source: &'static str,
    pub error: Option<VinError>,
    pub caveat: Option<String>,
}

impl Serialize for EvDetectionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("EvDetectionResult", 9)?;
        state.serialize_field("isElectric", &self.is_electric)?;
        if let Some(make) = &self.make {
            state.serialize_field("make", make)?;
        }
        state.serialize_field("smartcarCompatible", &self.smartcar_compatible)?;
        if let Some(kwh) = self.battery_estimate_kwh {
            state.serialize_field("batteryEstimateKwh", &kwh)?;
        }
        state.serialize_field("confidence", &self.confidence)?;
        state.serialize_field("source", self.source)?;
        if let Some(error) = &self.error {
            state.serialize_field("error", error)?;
        }
        if let Some(caveat) = &self.caveat {
            state.serialize_field("caveat", caveat)?;
        }
        if let Some(notes) = self.notes() {
            state.serialize_field("notes", notes)?;
        }
        state.end()
    }
}

impl EvDetectionResult {
    pub fn rejected(error: VinError) -> Self {
        Self {
            error: Some(error),
            ..Self::not_electric()
        }
    }

    pub fn not_electric() -> Self {
        Self {
            is_electric: false,
            make: None,
            smartcar_compatible: false,
            battery_estimate_kwh: None,
            confidence: 0.0,
            source: DETECTION_SOURCE,
            error: None,
            caveat: None,
        }
    }

    pub fn matched(capability: &EvCapability) -> Self {
        Self {
            is_electric: true,
            make: Some(capability.make.clone()),
            smartcar_compatible: capability.smartcar_supported,
            battery_estimate_kwh: Some(capability.battery_kwh),
            confidence: HEURISTIC_CONFIDENCE,
            source: DETECTION_SOURCE,
            error: None,
            caveat: capability.note.clone(),
        }
    }

    /// Vista combinada para clientes que aún leen un único campo `notes`
    pub fn notes(&self) -> Option<&str> {
        match (&self.error, &self.caveat) {
            (Some(error), _) => Some(error.code()),
            (None, Some(caveat)) => Some(caveat.as_str()),
            (None, None) => None,
        }
    }

    /// Etiqueta "VIN analysis (70% confidence)"
    pub fn detection_label(&self) -> String {
        format!("VIN analysis ({}% confidence)", (self.confidence * 100.0).round() as i64)
    }
}
