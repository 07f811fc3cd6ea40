//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! Los handlers reciben una `Response` por defecto (`HTTP/1.1 200 OK`, sin
//! headers ni body) y la modifican en su lugar. Al final la conexión la
//! convierte a bytes con [`Response::to_bytes`].
//!
//! ## Formato en el cable
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 13\r\n
//! \r\n
//! <h1>Hola</h1>
//! ```
//!
//! El orden de los headers no está definido (vienen de un `HashMap`).

use super::StatusCode;
use std::collections::HashMap;

/// Content-Type que usa [`Response::set_html`]
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

/// Página fija para rutas inexistentes y archivos estáticos faltantes
pub const NOT_FOUND_PAGE: &str = "<html><body><h1>404 Not Found</h1></body></html>";

/// Representa una respuesta HTTP completa
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Versión HTTP de la status line
    version: String,

    /// Código de estado (200, 404, etc.)
    status_code: u16,

    /// Reason phrase (texto libre, "OK" por defecto)
    status_message: String,

    /// Headers sin duplicados
    headers: HashMap<String, String>,

    /// Cuerpo crudo, se envía sin re-codificar
    body: Vec<u8>,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            version: "HTTP/1.1".to_string(),
            status_code: StatusCode::Ok.as_u16(),
            status_message: StatusCode::Ok.reason_phrase().to_string(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }
}

impl Response {
    /// Respuesta por defecto: `HTTP/1.1 200 OK`, sin headers ni body
    pub fn new() -> Self {
        Self::default()
    }

    /// Respuesta 404 con la página fija de "404 Not Found"
    pub fn not_found() -> Self {
        let mut response = Self::new();
        response.set_status_code(StatusCode::NotFound);
        response.set_html(NOT_FOUND_PAGE);
        response
    }

    /// Establece el body junto con `Content-Type` y `Content-Length`
    ///
    /// `Content-Length` queda igual a la cantidad exacta de bytes del body.
    ///
    /// # Ejemplo
    /// ```
    /// use webserver::http::Response;
    ///
    /// let mut response = Response::new();
    /// response.set_content("abc", "text/plain");
    ///
    /// assert_eq!(response.header("Content-Length"), Some("3"));
    /// assert_eq!(response.header("Content-Type"), Some("text/plain"));
    /// ```
    pub fn set_content(&mut self, content: impl Into<Vec<u8>>, content_type: &str) {
        self.body = content.into();
        self.headers
            .insert("Content-Type".to_string(), content_type.to_string());
        self.headers
            .insert("Content-Length".to_string(), self.body.len().to_string());
    }

    /// Igual que [`Response::set_content`] con `Content-Type: text/html`
    pub fn set_html(&mut self, content: impl Into<Vec<u8>>) {
        self.set_content(content, DEFAULT_CONTENT_TYPE);
    }

    /// Cambia código y mensaje de estado
    pub fn set_status(&mut self, code: u16, message: &str) {
        self.status_code = code;
        self.status_message = message.to_string();
    }

    /// Cambia el estado usando un código conocido y su reason phrase
    pub fn set_status_code(&mut self, status: StatusCode) {
        self.set_status(status.as_u16(), status.reason_phrase());
    }

    /// Cambia la versión de la status line
    pub fn set_version(&mut self, version: &str) {
        self.version = version.to_string();
    }

    /// Agrega un header; si ya existe, se sobrescribe
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }

    /// Quita un header, devolviendo su valor anterior
    pub fn remove_header(&mut self, name: &str) -> Option<String> {
        self.headers.remove(name)
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// - Status line: `<version> <status> <message>\r\n`
    /// - Headers: `Name: Value\r\n` (orden no definido)
    /// - Línea vacía: `\r\n`
    /// - Body: bytes tal cual
    pub fn to_bytes(&self) -> Vec<u8> {
        let status_line = format!(
            "{} {} {}\r\n",
            self.version, self.status_code, self.status_message
        );

        let mut result = Vec::with_capacity(status_line.len() + self.body.len() + 128);
        result.extend_from_slice(status_line.as_bytes());

        for (name, value) in &self.headers {
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }

        result.extend_from_slice(b"\r\n");
        result.extend_from_slice(&self.body);

        result
    }

    // === Accesores ===

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
