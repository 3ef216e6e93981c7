//! Configuración del proyecto
//!
//! Este módulo contiene las variables de entorno y la configuración del
//! backend de pasaportes.

pub mod environment;

pub use environment::*;
