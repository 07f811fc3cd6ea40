//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Parser permisivo: un request malformado produce campos vacíos o parciales
//! en vez de un error. La única falla dura es un `Content-Length` que no es
//! un entero no negativo.
//!
//! ## Formato de un Request
//!
//! ```text
//! POST /api/data HTTP/1.1\r\n
//! Host: localhost:8080\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hello
//! ```
//!
//! 1. **Request Line**: `METHOD PATH VERSION` separados por espacios
//! 2. **Headers**: `Name: Value`, hasta la primera línea vacía
//! 3. **Body**: exactamente `Content-Length` bytes, si el header existe
//!
//! Las líneas pueden terminar en `\r\n` o en `\n` solo.

use percent_encoding::percent_decode_str;
use std::collections::HashMap;
use tracing::warn;

/// Representa un request HTTP parseado
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// Método tal cual llegó (ej: "GET"), vacío si faltaba
    method: String,

    /// Path literal, incluyendo la query string; es la llave de routing
    path: String,

    /// Versión HTTP (ej: "HTTP/1.1")
    version: String,

    /// Headers con los nombres tal cual llegaron; el último duplicado gana
    headers: HashMap<String, String>,

    /// Body, solo presente si el request trae `Content-Length`
    body: Option<Vec<u8>>,

    /// Valor declarado en `Content-Length`
    content_length: Option<usize>,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// `Content-Length` no es un entero no negativo
    InvalidContentLength(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidContentLength(v) => write!(f, "Invalid Content-Length: {:?}", v),
        }
    }
}

impl std::error::Error for ParseError {}

/// Recorre un buffer línea por línea, recordando la posición en bytes
struct LineCursor<'a> {
    buffer: &'a [u8],
    pos: usize,
}

impl<'a> LineCursor<'a> {
    fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, pos: 0 }
    }

    /// Siguiente línea sin el `\n`; la última puede no tenerlo
    fn next_line(&mut self) -> Option<&'a [u8]> {
        if self.pos >= self.buffer.len() {
            return None;
        }

        let rest = &self.buffer[self.pos..];
        match rest.iter().position(|&b| b == b'\n') {
            Some(newline) => {
                self.pos += newline + 1;
                Some(&rest[..newline])
            }
            None => {
                self.pos = self.buffer.len();
                Some(rest)
            }
        }
    }

    /// Bytes que quedan sin consumir
    fn remaining(&self) -> &'a [u8] {
        &self.buffer[self.pos.min(self.buffer.len())..]
    }
}

/// Quita un `\r` final si existe
fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

impl Request {
    /// Parsea un request desde los bytes leídos del socket
    ///
    /// # Retorna
    ///
    /// * `Ok(Request)` - siempre que `Content-Length` sea válido o no exista
    /// * `Err(ParseError)` - si `Content-Length` no es numérico
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use webserver::http::Request;
    ///
    /// let raw = b"POST /echo HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello world";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.method(), "POST");
    /// assert_eq!(request.path(), "/echo");
    /// assert_eq!(request.body(), b"hello");
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        let mut cursor = LineCursor::new(buffer);
        let mut request = Request::default();

        // 1. Request line: los tokens que falten quedan vacíos
        if let Some(line) = cursor.next_line() {
            let line = String::from_utf8_lossy(line);
            let mut parts = line.split_whitespace();
            request.method = parts.next().unwrap_or_default().to_string();
            request.path = parts.next().unwrap_or_default().to_string();
            request.version = parts.next().unwrap_or_default().to_string();
        }

        // 2. Headers hasta la línea vacía (o el fin del buffer)
        while let Some(line) = cursor.next_line() {
            let line = strip_cr(line);
            if line.is_empty() {
                break;
            }
            Self::parse_header_line(line, &mut request.headers);
        }

        // 3. Body
        if let Some(value) = request.headers.get("Content-Length") {
            let declared = value
                .trim()
                .parse::<usize>()
                .map_err(|_| ParseError::InvalidContentLength(value.clone()))?;

            let available = cursor.remaining();
            let take = declared.min(available.len());
            if take < declared {
                warn!(
                    declared,
                    available = available.len(),
                    "Body truncado: Content-Length excede los bytes leídos"
                );
            }

            request.content_length = Some(declared);
            request.body = Some(available[..take].to_vec());
        }

        Ok(request)
    }

    /// Agrega un header `Name: Value`; las líneas sin ':' se ignoran
    fn parse_header_line(line: &[u8], headers: &mut HashMap<String, String>) {
        let line = String::from_utf8_lossy(line);
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim_start_matches([' ', '\t']);
            headers.insert(name.to_string(), value.to_string());
        }
    }

    // === Accesores ===

    /// Método HTTP tal cual llegó
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Path literal del request (incluye la query string)
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Versión HTTP
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Todos los headers
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Un header específico; la búsqueda distingue mayúsculas
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    /// Body del request (vacío si no hubo `Content-Length`)
    pub fn body(&self) -> &[u8] {
        self.body.as_deref().unwrap_or_default()
    }

    /// Indica si el request declaró un body
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Body como String, si es UTF-8 válido
    pub fn body_string(&self) -> Option<String> {
        String::from_utf8(self.body().to_vec()).ok()
    }

    /// Valor declarado en `Content-Length`
    pub fn content_length(&self) -> Option<usize> {
        self.content_length
    }

    /// Indica si el body declarado no cabía en los bytes leídos
    pub fn is_body_truncated(&self) -> bool {
        match (self.content_length, &self.body) {
            (Some(declared), Some(body)) => body.len() < declared,
            _ => false,
        }
    }

    // === Query string ===
    //
    // Solo son ayudas para los handlers: el routing sigue usando `path()`
    // completo, con la query incluida.

    /// Texto después del primer '?' del path
    pub fn query(&self) -> Option<&str> {
        self.path.split_once('?').map(|(_, query)| query)
    }

    /// Query parameters decodificados (ej: `?text=hola%20mundo`)
    ///
    /// ```
    /// use webserver::http::Request;
    ///
    /// let request = Request::parse(b"GET /search?q=rust+http&page=2 HTTP/1.1\r\n\r\n").unwrap();
    /// assert_eq!(request.query_param("q").as_deref(), Some("rust http"));
    /// assert_eq!(request.query_param("page").as_deref(), Some("2"));
    /// assert_eq!(request.path(), "/search?q=rust+http&page=2");
    /// ```
    pub fn query_params(&self) -> HashMap<String, String> {
        let mut params = HashMap::new();
        let Some(query) = self.query() else {
            return params;
        };

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            params.insert(url_decode(key), url_decode(value));
        }

        params
    }

    /// Un query parameter específico
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.query_params().remove(name)
    }
}

/// Decodifica un componente de query: '+' es espacio, luego `%XX`
fn url_decode(s: &str) -> String {
    let s = s.replace('+', " ");
    percent_decode_str(&s).decode_utf8_lossy().into_owned()
}
