//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos: VIN, detección EV y los
//! registros de pasaporte consumidos desde el backend externo.

pub mod ev;
pub mod passport;
pub mod vin;

pub use ev::*;
pub use passport::*;
