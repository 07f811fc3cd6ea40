//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración por argumentos CLI o variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./webserver --port 8080 --host 0.0.0.0 --public-dir ./public
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=3000 LOG_LEVEL=debug ./webserver
//! ```

use clap::Parser;
use serde::Serialize;
use std::net::IpAddr;
use std::time::Duration;

/// Niveles de log aceptados por `--log-level`
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Configuración del servidor HTTP/1.1
#[derive(Debug, Clone, Parser, Serialize)]
#[command(name = "webserver")]
#[command(about = "Servidor HTTP/1.1 mínimo: una petición por conexión")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor (0 = puerto efímero)
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// IP en la que escucha (0.0.0.0 = todas las interfaces)
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio de archivos estáticos
    #[arg(long = "public-dir", default_value = "./public", env = "PUBLIC_DIR")]
    pub public_dir: String,

    /// Nivel de log por defecto (RUST_LOG tiene prioridad)
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,

    /// Timeout de lectura/escritura por conexión en milisegundos (0 = sin timeout)
    #[arg(long = "io-timeout-ms", default_value = "0", env = "IO_TIMEOUT_MS")]
    pub io_timeout_ms: u64,
}

impl Config {
    /// Crea la configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Dirección completa para bind (host:port)
    ///
    /// ```rust
    /// use webserver::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8080");
    /// ```
    pub fn address(&self) -> String {
        match self.host.parse::<IpAddr>() {
            Ok(IpAddr::V6(ip)) => format!("[{}]:{}", ip, self.port),
            _ => format!("{}:{}", self.host, self.port),
        }
    }

    /// Timeout por conexión, si está activado
    pub fn io_timeout(&self) -> Option<Duration> {
        (self.io_timeout_ms > 0).then(|| Duration::from_millis(self.io_timeout_ms))
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), String> {
        if self.host.parse::<IpAddr>().is_err() {
            return Err(format!("Host must be an IP address, got {:?}", self.host));
        }

        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Log level must be one of {}, got {:?}",
                LOG_LEVELS.join(", "),
                self.log_level
            ));
        }

        Ok(())
    }

    /// Resumen de una línea en JSON para el log de arranque
    pub fn summary(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            public_dir: "./public".to_string(),
            log_level: "info".to_string(),
            io_timeout_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.public_dir, "./public");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.io_timeout_ms, 0);
    }

    #[test]
    fn test_address() {
        let config = Config::default();
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_address_custom() {
        let mut config = Config::default();
        config.host = "127.0.0.1".to_string();
        config.port = 3000;
        assert_eq!(config.address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_address_ipv6() {
        let mut config = Config::default();
        config.host = "::1".to_string();
        assert_eq!(config.address(), "[::1]:8080");
    }

    #[test]
    fn test_validate_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_host() {
        let mut config = Config::default();
        config.host = "localhost".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().contains("Host must be an IP"));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.log_level = "verbose".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().contains("Log level"));
    }

    #[test]
    fn test_validate_log_level_case_insensitive() {
        let mut config = Config::default();
        config.log_level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_io_timeout() {
        let mut config = Config::default();
        assert_eq!(config.io_timeout(), None);

        config.io_timeout_ms = 1500;
        assert_eq!(config.io_timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_parse_from_args() {
        let config = Config::parse_from([
            "webserver",
            "--port",
            "9000",
            "--host",
            "127.0.0.1",
            "--public-dir",
            "/srv/www",
            "--io-timeout-ms",
            "250",
        ]);

        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.public_dir, "/srv/www");
        assert_eq!(config.io_timeout_ms, 250);
    }

    #[test]
    fn test_summary_is_json() {
        let summary = Config::default().summary();
        let value: serde_json::Value = serde_json::from_str(&summary).unwrap();
        assert_eq!(value["port"], 8080);
        assert_eq!(value["host"], "0.0.0.0");
    }
}
