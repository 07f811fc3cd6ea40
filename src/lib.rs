//! # Webserver
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo: acepta conexiones TCP, parsea un único request
//! por conexión, lo despacha al handler registrado para ese path exacto y
//! escribe la respuesta serializada antes de cerrar.
//!
//! ## Arquitectura
//!
//! ```text
//! Server (loop de accept) → connection → Request::parse → Router → Handler → Response::to_bytes
//! ```
//!
//! - `http`: Parsing de requests, construcción de responses, status codes
//! - `router`: Rutas exactas y rutas de archivos estáticos
//! - `server`: Socket de escucha, loop de accept y ciclo por conexión
//! - `config`: Argumentos CLI / variables de entorno
//! - `logging`: Inicialización de `tracing`
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use webserver::config::Config;
//! use webserver::server::Server;
//!
//! let mut server = Server::new(Config::default());
//! server.add_route("/", |_req, res| {
//!     res.set_html("<html><body><h1>Hello, World!</h1></body></html>");
//! });
//! server.start().expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod http;
pub mod logging;
pub mod router;
pub mod server;
