use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use vehicle_passport::config::environment::EnvironmentConfig;
use vehicle_passport::{create_app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Error de configuración: {}", e))?;

    // Configurar logging
    let level: tracing::Level = config.log_level.parse().unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚗 Vehicle Passport - Verificación y detección EV");
    info!("================================================");
    info!("🌍 Entorno: {}", config.environment);

    let addr: SocketAddr = config.server_url().parse()?;

    let app_state = match AppState::from_config(config) {
        Ok(state) => state,
        Err(e) => {
            error!("❌ Error inicializando el estado: {}", e);
            return Err(anyhow::anyhow!("Error de inicialización: {}", e));
        }
    };

    let app = create_app(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔋 Diagnóstico:");
    info!("   GET  /api/vin/:vin/ev - Detección EV por VIN");
    info!("   GET  /api/ev-detection?vin= - Detección EV (query)");
    info!("   GET  /api/dtc/:code - Descripción de código DTC");
    info!("   POST /api/tyres/assess - Evaluación de neumáticos");
    info!("   POST /api/battery/health - Bandas de salud de batería");
    info!("   POST /api/auction/state - Estado de subasta");
    info!("📄 Pasaportes:");
    info!("   GET  /api/passports/:vin/verify - Verificar sello");
    info!("   GET  /api/passports/:vin/summary?audience= - Resumen del pasaporte");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
