//! # Rutas de Archivos Estáticos
//! src/router/static_file.rs
//!
//! Un handler que sirve el contenido actual de un archivo. No hay caché: el
//! archivo se lee completo en cada request, así que los cambios en disco se
//! ven de inmediato.

use crate::http::{Request, Response, StatusCode, NOT_FOUND_PAGE};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Tabla de sufijos → Content-Type, en orden de prueba
const CONTENT_TYPES: &[(&str, &str)] = &[
    (".html", "text/html"),
    (".htm", "text/html"),
    (".css", "text/css"),
    (".js", "application/javascript"),
    (".json", "application/json"),
    (".png", "image/png"),
    (".jpg", "image/jpeg"),
    (".jpeg", "image/jpeg"),
    (".gif", "image/gif"),
];

/// Content-Type para sufijos desconocidos
const FALLBACK_CONTENT_TYPE: &str = "text/plain";

/// Adivina el Content-Type por el sufijo del path (distingue mayúsculas)
///
/// ```
/// use webserver::router::content_type_for;
///
/// assert_eq!(content_type_for("public/app.js"), "application/javascript");
/// assert_eq!(content_type_for("README"), "text/plain");
/// ```
pub fn content_type_for(file_path: impl AsRef<Path>) -> &'static str {
    let file_path = file_path.as_ref().to_string_lossy();

    CONTENT_TYPES
        .iter()
        .find(|(suffix, _)| file_path.ends_with(suffix))
        .map(|(_, content_type)| *content_type)
        .unwrap_or(FALLBACK_CONTENT_TYPE)
}

/// Construye el handler para servir `file_path`
///
/// Si el archivo no se puede leer, la respuesta es 404 con la página fija.
pub fn static_file_handler(
    file_path: impl Into<PathBuf>,
) -> impl Fn(&Request, &mut Response) + Send + Sync + 'static {
    let file_path = file_path.into();
    let content_type = content_type_for(&file_path);

    move |_req: &Request, res: &mut Response| match fs::read(&file_path) {
        Ok(contents) => res.set_content(contents, content_type),
        Err(e) => {
            debug!(file = %file_path.display(), error = %e, "Archivo estático no disponible");
            res.set_status_code(StatusCode::NotFound);
            res.set_html(NOT_FOUND_PAGE);
        }
    }
}
