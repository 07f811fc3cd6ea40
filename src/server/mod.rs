//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! 1. Escucha en un puerto (`tcp`)
//! 2. Acepta conexiones, una a la vez
//! 3. Por cada una: lee, parsea, rutea, responde y cierra (`connection`)

pub mod connection;
pub mod error;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use connection::{handle_connection, serve_connection, ConnectionOutcome, READ_BUFFER_SIZE};
pub use error::{ConnectionError, ServerError};
pub use tcp::{Server, ServerState, ShutdownHandle};
