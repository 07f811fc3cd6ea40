//! # Errores del Servidor
//! src/server/error.rs
//!
//! - [`ServerError`]: fallas al preparar el socket de escucha. Abortan el
//!   arranque; quien llama decide si termina el proceso.
//! - [`ConnectionError`]: fallas de una sola conexión. Se registran y el
//!   loop de accept sigue.

use crate::http::ParseError;
use std::io;

/// Error fatal de arranque del servidor
#[derive(Debug)]
pub enum ServerError {
    /// Host/puerto no forman una dirección IP válida
    InvalidAddress(String),

    /// No se pudo crear el socket
    Socket(io::Error),

    /// No se pudo activar una opción del socket (ej: SO_REUSEADDR)
    SetOption(io::Error),

    /// Falló el bind a la dirección
    Bind { address: String, source: io::Error },

    /// Falló el listen
    Listen(io::Error),

    /// Se pidió `serve()` sin un socket de escucha
    NotListening,
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerError::InvalidAddress(a) => write!(f, "Invalid listen address: {}", a),
            ServerError::Socket(e) => write!(f, "Could not create socket: {}", e),
            ServerError::SetOption(e) => write!(f, "setsockopt failed: {}", e),
            ServerError::Bind { address, source } => {
                write!(f, "Bind to {} failed: {}", address, source)
            }
            ServerError::Listen(e) => write!(f, "Listen failed: {}", e),
            ServerError::NotListening => write!(f, "Server is not listening"),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::Socket(e) | ServerError::SetOption(e) | ServerError::Listen(e) => Some(e),
            ServerError::Bind { source, .. } => Some(source),
            ServerError::InvalidAddress(_) | ServerError::NotListening => None,
        }
    }
}

/// Error al atender una conexión
#[derive(Debug)]
pub enum ConnectionError {
    /// Falló la lectura o escritura en el socket
    Io(io::Error),

    /// El request no se pudo parsear (Content-Length inválido)
    Parse(ParseError),
}

impl std::fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionError::Io(e) => write!(f, "I/O error: {}", e),
            ConnectionError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConnectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConnectionError::Io(e) => Some(e),
            ConnectionError::Parse(e) => Some(e),
        }
    }
}

impl From<io::Error> for ConnectionError {
    fn from(e: io::Error) -> Self {
        ConnectionError::Io(e)
    }
}

impl From<ParseError> for ConnectionError {
    fn from(e: ParseError) -> Self {
        ConnectionError::Parse(e)
    }
}
