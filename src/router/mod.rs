//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Mapea paths exactos a handlers.
//!
//! ```text
//! Request → Router → Handler(&Request, &mut Response)
//! ```
//!
//! La búsqueda es por igualdad exacta de strings: `/foo` no coincide con
//! `/foo/`, y `/search?q=x` solo coincide con una ruta registrada con esa
//! misma query. Si no hay handler, la respuesta es el 404 fijo.
//!
//! La tabla se llena antes de arrancar el servidor y luego solo se lee.

pub mod static_file;

pub use static_file::{content_type_for, static_file_handler};

use crate::http::{Request, Response};
use std::collections::HashMap;
use std::path::PathBuf;

/// Handler: recibe el request y modifica la respuesta en su lugar
pub type Handler = Box<dyn Fn(&Request, &mut Response) + Send + Sync + 'static>;

/// Router que mapea paths a handlers
#[derive(Default)]
pub struct Router {
    /// Mapa de path → handler
    routes: HashMap<String, Handler>,
}

impl Router {
    /// Crea un router vacío
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra una ruta; si el path ya existía, el nuevo handler lo reemplaza
    ///
    /// # Ejemplo
    /// ```
    /// use webserver::router::Router;
    ///
    /// let mut router = Router::new();
    /// router.register("/hello", |_req, res| res.set_content("hi", "text/plain"));
    /// assert!(router.contains("/hello"));
    /// ```
    pub fn register<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        self.routes.insert(path.to_string(), Box::new(handler));
    }

    /// Registra una ruta que sirve un archivo, leído de nuevo en cada request
    pub fn register_static_file(&mut self, path: &str, file_path: impl Into<PathBuf>) {
        self.register(path, static_file_handler(file_path));
    }

    /// Busca el handler para un path exacto
    pub fn resolve(&self, path: &str) -> Option<&Handler> {
        self.routes.get(path)
    }

    /// Ejecuta el handler del request sobre una respuesta nueva
    ///
    /// Si no hay handler para el path, retorna [`Response::not_found`].
    ///
    /// ```
    /// use webserver::http::Request;
    /// use webserver::router::Router;
    ///
    /// let router = Router::new();
    /// let request = Request::parse(b"GET /missing HTTP/1.1\r\n\r\n").unwrap();
    /// assert_eq!(router.route(&request).status_code(), 404);
    /// ```
    pub fn route(&self, request: &Request) -> Response {
        match self.resolve(request.path()) {
            Some(handler) => {
                let mut response = Response::new();
                handler(request, &mut response);
                response
            }
            None => Response::not_found(),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.routes.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut paths: Vec<&String> = self.routes.keys().collect();
        paths.sort();
        f.debug_struct("Router").field("routes", &paths).finish()
    }
}
