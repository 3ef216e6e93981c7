//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.
//! Un valor inválido se reporta como `AppError::Config`, nunca con un panic.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::services::battery_health::SocThresholds;
use crate::utils::errors::{config_error, AppResult};
use crate::utils::validation::validate_range;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    // Backend de pasaportes
    pub passport_api_base_url: String,
    pub passport_api_key: Option<String>,
    pub passport_api_timeout_secs: u64,
    // Detección EV y bandas de batería
    pub ev_capability_table_path: Option<PathBuf>,
    pub soc_good_pct: f64,
    pub soc_warning_pct: f64,
    pub log_level: String,
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> AppResult<T> {
    match lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(raw) => raw
            .parse()
            .map_err(|_| config_error(name, &format!("invalid value '{}'", raw))),
        None => Ok(default),
    }
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl EnvironmentConfig {
    /// Leer la configuración del proceso (llamar después de `dotenvy::dotenv()`)
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Leer la configuración desde una fuente arbitraria de variables
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let passport_api_base_url = optional(&lookup, "PASSPORT_API_BASE_URL")
            .ok_or_else(|| config_error("PASSPORT_API_BASE_URL", "must be set"))?
            .trim_end_matches('/')
            .to_string();

        if !passport_api_base_url.starts_with("http://") && !passport_api_base_url.starts_with("https://") {
            return Err(config_error(
                "PASSPORT_API_BASE_URL",
                "must start with http:// or https://",
            ));
        }

        let config = Self {
            environment: optional(&lookup, "ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            port: parse_or(&lookup, "PORT", 3000)?,
            host: optional(&lookup, "HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            cors_origins: optional(&lookup, "CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            passport_api_base_url,
            passport_api_key: optional(&lookup, "PASSPORT_API_KEY"),
            passport_api_timeout_secs: parse_or(&lookup, "PASSPORT_API_TIMEOUT_SECS", 10)?,
            ev_capability_table_path: optional(&lookup, "EV_CAPABILITY_TABLE_PATH").map(PathBuf::from),
            soc_good_pct: parse_or(&lookup, "SOC_GOOD_PCT", 80.0)?,
            soc_warning_pct: parse_or(&lookup, "SOC_WARNING_PCT", 20.0)?,
            log_level: optional(&lookup, "LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        };

        for (name, value) in [
            ("SOC_GOOD_PCT", config.soc_good_pct),
            ("SOC_WARNING_PCT", config.soc_warning_pct),
        ] {
            if validate_range(value, 0.0, 100.0).is_err() {
                return Err(config_error(name, "must be between 0 and 100"));
            }
        }

        if config.soc_warning_pct > config.soc_good_pct {
            return Err(config_error(
                "SOC_WARNING_PCT",
                "must not be greater than SOC_GOOD_PCT",
            ));
        }

        Ok(config)
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn passport_api_timeout(&self) -> Duration {
        Duration::from_secs(self.passport_api_timeout_secs)
    }

    pub fn soc_thresholds(&self) -> SocThresholds {
        SocThresholds {
            good_pct: self.soc_good_pct,
            warning_pct: self.soc_warning_pct,
        }
    }
}
