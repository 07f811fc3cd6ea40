//! # Webserver - Entry Point
//! src/main.rs
//!
//! Lee la configuración, registra las rutas de ejemplo y arranca el loop de
//! accept. Si el servidor no puede iniciar, el proceso termina con código 1.

use serde_json::json;
use std::path::Path;
use tracing::{error, info};
use webserver::config::Config;
use webserver::logging::init_logging;
use webserver::server::Server;

fn main() {
    let config = Config::new();

    if let Err(e) = config.validate() {
        eprintln!("Configuración inválida: {}", e);
        std::process::exit(2);
    }

    if let Err(e) = init_logging(&config.log_level) {
        eprintln!("{}", e);
    }

    info!(config = %config.summary(), "Configuración cargada");

    let index_path = Path::new(&config.public_dir).join("index.html");
    let mut server = Server::new(config);

    server.add_route("/", |_req, res| {
        res.set_html(
            "<html><body><h1>Hello, World!</h1><p>Welcome to my Rust Web Server</p></body></html>",
        );
    });

    server.add_route("/api/data", |_req, res| {
        let body = json!({ "message": "This is JSON data" });
        res.set_content(body.to_string(), "application/json");
    });

    server.add_static_file_route("/index.html", index_path);

    // Bloquea el thread hasta que se detenga el servidor
    if let Err(e) = server.start() {
        error!(error = %e, "Error fatal");
        std::process::exit(1);
    }
}
