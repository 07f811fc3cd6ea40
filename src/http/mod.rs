//! # Módulo HTTP
//!
//! Implementa el subconjunto de HTTP/1.1 que usa el servidor, sin librerías
//! de alto nivel:
//!
//! - Parsing permisivo de requests
//! - Construcción y serialización de responses
//! - Códigos de estado conocidos
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path HTTP/1.1\r\n
//! Header-Name: Header-Value\r\n
//! \r\n
//! [body de Content-Length bytes]
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: application/json\r\n
//! Content-Length: 13\r\n
//! \r\n
//! {"ok": true}
//! ```
//!
//! No hay keep-alive, chunked encoding ni pipelining: una petición por conexión.

pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use request::{ParseError, Request};
pub use response::{Response, DEFAULT_CONTENT_TYPE, NOT_FOUND_PAGE};
pub use status::StatusCode;
