//! # Logging
//! src/logging.rs
//!
//! Inicializa el subscriber de `tracing`. `RUST_LOG` tiene prioridad sobre el
//! nivel configurado; si no existe, se usa `--log-level`.

use tracing_subscriber::EnvFilter;

/// Instala el subscriber global de logs
///
/// Falla si ya había un subscriber instalado (por ejemplo, al llamarla dos
/// veces en el mismo proceso).
pub fn init_logging(level: &str) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .try_init()
        .map_err(|e| format!("Failed to initialize logging: {}", e))
}
