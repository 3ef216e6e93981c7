//! Vehicle Passport
//!
//! Servicio HTTP que clasifica VINs (detección EV por WMI), deriva los
//! estados de presentación de un pasaporte de inspección y consulta la
//! verificación del sello en el backend de pasaportes.

pub mod clients;
pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_app;
pub use state::AppState;
