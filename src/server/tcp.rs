//! # Servidor TCP
//! src/server/tcp.rs
//!
//! Loop de accept síncrono: cada conexión se atiende completa (leer,
//! responder, cerrar) antes del siguiente `accept`. No hay threads de
//! trabajo, así que un peer lento bloquea a todos los demás.
//!
//! ## Estados
//!
//! ```text
//! Stopped ──bind()──▶ Listening ──stop() / fin del loop──▶ Stopped
//! ```

use super::connection::serve_connection;
use super::error::ServerError;
use crate::config::Config;
use crate::http::{Request, Response};
use crate::router::Router;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{SocketAddr, TcpListener};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Backlog de `listen`; el kernel lo recorta a su SOMAXCONN
const LISTEN_BACKLOG: i32 = 1024;

/// Estado del ciclo de vida del servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Sin socket de escucha (estado inicial y final)
    Stopped,

    /// Socket abierto, aceptando conexiones
    Listening,
}

/// Permite pedir que el servidor se detenga desde otro thread
///
/// El loop revisa la bandera antes de cada `accept`, así que la parada se
/// nota cuando termina la conexión en curso (o llega la siguiente).
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    running: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Servidor HTTP/1.1 de una petición por conexión
pub struct Server {
    config: Config,
    router: Router,
    listener: Option<TcpListener>,
    running: Arc<AtomicBool>,
}

impl Server {
    /// Crea un servidor detenido, sin rutas
    pub fn new(config: Config) -> Self {
        Self {
            config,
            router: Router::new(),
            listener: None,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Registra un handler para un path exacto
    ///
    /// Las rutas se registran antes de `start()`; durante el servicio la
    /// tabla solo se lee.
    pub fn add_route<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        self.router.register(path, handler);
    }

    /// Registra un path que sirve un archivo del disco
    pub fn add_static_file_route(&mut self, path: &str, file_path: impl Into<PathBuf>) {
        self.router.register_static_file(path, file_path);
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> ServerState {
        if self.listener.is_some() {
            ServerState::Listening
        } else {
            ServerState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            running: Arc::clone(&self.running),
        }
    }

    /// Dirección real del socket de escucha (útil con puerto 0)
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Abre el socket de escucha y pasa a `Listening`
    ///
    /// Si algún paso falla, el servidor queda en `Stopped` y el socket
    /// parcialmente configurado se cierra al salir de esta función.
    pub fn bind(&mut self) -> Result<SocketAddr, ServerError> {
        if let Some(addr) = self.local_addr() {
            return Ok(addr);
        }

        match Self::open_listener(&self.config.address()) {
            Ok(listener) => {
                let local = listener
                    .local_addr()
                    .map_err(ServerError::Socket)?;
                self.listener = Some(listener);
                self.running.store(true, Ordering::SeqCst);
                info!(address = %local, "Servidor escuchando");
                Ok(local)
            }
            Err(e) => {
                error!(error = %e, "No se pudo iniciar el servidor");
                self.stop();
                Err(e)
            }
        }
    }

    /// socket → SO_REUSEADDR → bind → listen
    fn open_listener(address: &str) -> Result<TcpListener, ServerError> {
        let addr: SocketAddr = address
            .parse()
            .map_err(|_| ServerError::InvalidAddress(address.to_string()))?;

        let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))
            .map_err(ServerError::Socket)?;

        socket
            .set_reuse_address(true)
            .map_err(ServerError::SetOption)?;

        socket.bind(&addr.into()).map_err(|source| ServerError::Bind {
            address: address.to_string(),
            source,
        })?;

        socket.listen(LISTEN_BACKLOG).map_err(ServerError::Listen)?;

        Ok(socket.into())
    }

    /// Loop de accept; retorna cuando se pide la parada
    ///
    /// Un `accept` fallido se registra y el loop sigue.
    pub fn serve(&mut self) -> Result<(), ServerError> {
        let io_timeout = self.config.io_timeout();
        let listener = self.listener.as_ref().ok_or(ServerError::NotListening)?;

        while self.running.load(Ordering::SeqCst) {
            match listener.accept() {
                Ok((stream, _)) => serve_connection(stream, &self.router, io_timeout),
                Err(e) => warn!(error = %e, "Error al aceptar conexión"),
            }
        }

        info!("Loop de accept terminado");
        self.stop();
        Ok(())
    }

    /// Abre el socket y atiende conexiones hasta que se pida la parada
    ///
    /// # Ejemplo
    /// ```no_run
    /// use webserver::config::Config;
    /// use webserver::server::Server;
    ///
    /// let mut server = Server::new(Config::default());
    /// server.add_route("/", |_req, res| res.set_html("<h1>Hola</h1>"));
    /// server.start().expect("Error al iniciar servidor");
    /// ```
    pub fn start(&mut self) -> Result<(), ServerError> {
        self.bind()?;
        self.serve()
    }

    /// Baja la bandera y cierra el socket de escucha, si existe
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(listener) = self.listener.take() {
            drop(listener);
            info!("Socket de escucha cerrado");
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.stop();
    }
}
