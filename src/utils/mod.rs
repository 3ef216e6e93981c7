//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación
//! de entradas y formato de presentación.

pub mod errors;
pub mod format;
pub mod validation;

pub use errors::*;
