//! Clasificador de VIN
//!
//! Valida la sintaxis del VIN y deriva un veredicto EV a partir del prefijo
//! WMI. Es una función total: cualquier entrada produce un resultado.

use lazy_static::lazy_static;
use std::sync::Arc;

use crate::models::ev::{EvCapabilityTable, EvDetectionResult, VinError};
use crate::models::vin::{has_valid_vin_characters, normalize_vin, vin_length, wmi, VIN_LENGTH};

lazy_static! {
    static ref BUILTIN_TABLE: EvCapabilityTable = EvCapabilityTable::builtin();
}

/// Clasificador con una tabla de capacidades inyectada
#[derive(Debug, Clone)]
pub struct VinClassifier {
    table: Arc<EvCapabilityTable>,
}

impl Default for VinClassifier {
    fn default() -> Self {
        Self::new(Arc::new(EvCapabilityTable::builtin()))
    }
}

impl VinClassifier {
    pub fn new(table: Arc<EvCapabilityTable>) -> Self {
        Self { table }
    }

    pub fn classify(&self, vin_raw: Option<&str>) -> EvDetectionResult {
        classify_with(&self.table, vin_raw)
    }
}

/// Clasificar con la tabla incorporada
pub fn classify(vin_raw: &str) -> EvDetectionResult {
    classify_with(&BUILTIN_TABLE, Some(vin_raw))
}

/// La longitud se comprueba antes que los caracteres.
pub fn classify_with(table: &EvCapabilityTable, vin_raw: Option<&str>) -> EvDetectionResult {
    let vin = normalize_vin(vin_raw);

    if vin_length(&vin) != VIN_LENGTH {
        return EvDetectionResult::rejected(VinError::InvalidVinLength);
    }

    if !has_valid_vin_characters(&vin) {
        return EvDetectionResult::rejected(VinError::InvalidVinCharacters);
    }

    match wmi(&vin).and_then(|prefix| table.lookup(prefix)) {
        Some(capability) => EvDetectionResult::matched(capability),
        None => EvDetectionResult::not_electric(),
    }
}
