//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;
use tracing::info;

use crate::clients::{HttpPassportClient, PassportBackend};
use crate::config::environment::EnvironmentConfig;
use crate::models::ev::EvCapabilityTable;
use crate::services::battery_health::SocThresholds;
use crate::services::vin_classifier::VinClassifier;
use crate::utils::errors::{AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnvironmentConfig>,
    pub backend: Arc<dyn PassportBackend>,
    pub classifier: VinClassifier,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        backend: Arc<dyn PassportBackend>,
        classifier: VinClassifier,
    ) -> Self {
        Self {
            config: Arc::new(config),
            backend,
            classifier,
        }
    }

    /// Construir el estado real: cliente HTTP y tabla EV según la configuración
    pub fn from_config(config: EnvironmentConfig) -> AppResult<Self> {
        let table = match &config.ev_capability_table_path {
            Some(path) => {
                let table = EvCapabilityTable::from_path(path)?;
                info!("🔋 Tabla EV cargada desde {} ({} entradas)", path.display(), table.len());
                table
            }
            None => EvCapabilityTable::builtin(),
        };

        let client = HttpPassportClient::new(
            &config.passport_api_base_url,
            config.passport_api_key.clone(),
            config.passport_api_timeout(),
        )
        .map_err(|e| AppError::Config(format!("Cannot build passport client: {}", e)))?;

        info!("🌐 Backend de pasaportes: {}", client.base_url());

        Ok(Self::new(
            config,
            Arc::new(client),
            VinClassifier::new(Arc::new(table)),
        ))
    }

    pub fn soc_thresholds(&self) -> SocThresholds {
        self.config.soc_thresholds()
    }
}
