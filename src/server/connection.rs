//! # Manejo de una Conexión
//! src/server/connection.rs
//!
//! Un ciclo por conexión: leer → parsear → rutear → escribir → cerrar.
//!
//! Se hace UNA sola lectura de hasta [`READ_BUFFER_SIZE`] bytes. Lo que no
//! llegue en esa lectura (headers largos, bodies grandes) se pierde: el
//! parser recorta el body a lo disponible.

use super::error::ConnectionError;
use crate::http::Request;
use crate::router::Router;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Tamaño del buffer de la única lectura por conexión
pub const READ_BUFFER_SIZE: usize = 8192;

/// Resultado de atender una conexión
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionOutcome {
    /// El peer no envió nada; no se escribió respuesta
    Empty,

    /// Se envió una respuesta completa
    Responded { status: u16, bytes_written: usize },
}

/// Atiende un request sobre cualquier stream de bytes
///
/// No cierra el stream; eso le toca a quien lo posee (ver
/// [`serve_connection`]). Un `Content-Length` inválido aborta antes de
/// escribir nada.
pub fn handle_connection<S: Read + Write>(
    stream: &mut S,
    router: &Router,
) -> Result<ConnectionOutcome, ConnectionError> {
    let start = Instant::now();

    let mut buffer = [0u8; READ_BUFFER_SIZE];
    let bytes_read = stream.read(&mut buffer)?;

    if bytes_read == 0 {
        return Ok(ConnectionOutcome::Empty);
    }
    debug!(bytes_read, "Request recibido");

    let request = Request::parse(&buffer[..bytes_read])?;
    let response = router.route(&request);

    let bytes = response.to_bytes();
    stream.write_all(&bytes)?;
    stream.flush()?;

    info!(
        method = request.method(),
        path = request.path(),
        status = response.status_code(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Request atendido"
    );

    Ok(ConnectionOutcome::Responded {
        status: response.status_code(),
        bytes_written: bytes.len(),
    })
}

/// Atiende una conexión TCP aceptada y la cierra, pase lo que pase
pub fn serve_connection(mut stream: TcpStream, router: &Router, io_timeout: Option<Duration>) {
    let peer = stream
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    debug!(peer = %peer, "Cliente conectado");

    if let Some(timeout) = io_timeout {
        let applied = stream
            .set_read_timeout(Some(timeout))
            .and_then(|_| stream.set_write_timeout(Some(timeout)));
        if let Err(e) = applied {
            warn!(peer = %peer, error = %e, "No se pudo aplicar el timeout");
        }
    }

    match handle_connection(&mut stream, router) {
        Ok(ConnectionOutcome::Empty) => debug!(peer = %peer, "Conexión cerrada sin datos"),
        Ok(ConnectionOutcome::Responded { .. }) => {}
        Err(e) => warn!(peer = %peer, error = %e, "Error atendiendo conexión"),
    }

    // El peer pudo haber cerrado ya; no hay nada que hacer si esto falla
    let _ = stream.shutdown(Shutdown::Both);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::NOT_FOUND_PAGE;
    use std::io::{self, Cursor};
    use std::net::TcpListener;
    use std::thread;

    /// Stream en memoria: lee de `input`, escribe en `output`
    struct MockStream {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
    }

    impl MockStream {
        fn new(input: &[u8]) -> Self {
            Self {
                input: Cursor::new(input.to_vec()),
                output: Vec::new(),
            }
        }

        fn output_text(&self) -> String {
            String::from_utf8_lossy(&self.output).into_owned()
        }
    }

    impl Read for MockStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for MockStream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.output.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Stream cuya lectura siempre falla
    struct BrokenStream;

    impl Read for BrokenStream {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        }
    }

    impl Write for BrokenStream {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn hello_router() -> Router {
        let mut router = Router::new();
        router.register("/", |_req, res| {
            res.set_html("<html><body><h1>Hello, World!</h1></body></html>");
        });
        router.register("/len", |req, res| {
            res.set_content(req.body().len().to_string(), "text/plain");
        });
        router
    }

    #[test]
    fn test_handle_connection_ok() {
        let router = hello_router();
        let mut stream = MockStream::new(b"GET / HTTP/1.1\r\n\r\n");

        let outcome = handle_connection(&mut stream, &router).unwrap();

        let text = stream.output_text();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Length: 48\r\n"));
        assert!(text.ends_with("\r\n\r\n<html><body><h1>Hello, World!</h1></body></html>"));
        assert_eq!(
            outcome,
            ConnectionOutcome::Responded {
                status: 200,
                bytes_written: stream.output.len()
            }
        );
    }

    #[test]
    fn test_handle_connection_not_found() {
        let router = hello_router();
        let mut stream = MockStream::new(b"GET /nope HTTP/1.1\r\n\r\n");

        let outcome = handle_connection(&mut stream, &router).unwrap();

        let text = stream.output_text();
        assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(text.ends_with(NOT_FOUND_PAGE));
        assert!(matches!(outcome, ConnectionOutcome::Responded { status: 404, .. }));
    }

    #[test]
    fn test_handle_connection_empty_read() {
        let router = hello_router();
        let mut stream = MockStream::new(b"");

        let outcome = handle_connection(&mut stream, &router).unwrap();

        assert_eq!(outcome, ConnectionOutcome::Empty);
        assert!(stream.output.is_empty());
    }

    #[test]
    fn test_handle_connection_invalid_content_length() {
        let router = hello_router();
        let mut stream = MockStream::new(b"POST / HTTP/1.1\r\nContent-Length: lots\r\n\r\n");

        let result = handle_connection(&mut stream, &router);

        assert!(matches!(result, Err(ConnectionError::Parse(_))));
        assert!(stream.output.is_empty(), "no debe enviarse respuesta");
    }

    #[test]
    fn test_handle_connection_read_error() {
        let router = hello_router();
        let result = handle_connection(&mut BrokenStream, &router);

        assert!(matches!(result, Err(ConnectionError::Io(_))));
    }

    #[test]
    fn test_single_read_caps_request_at_buffer_size() {
        let router = hello_router();
        let head = b"POST /len HTTP/1.1\r\nContent-Length: 10000\r\n\r\n";
        let mut raw = head.to_vec();
        raw.extend(std::iter::repeat(b'x').take(10_000));
        let mut stream = MockStream::new(&raw);

        handle_connection(&mut stream, &router).unwrap();

        // El handler solo ve lo que cupo en la única lectura
        let expected = (READ_BUFFER_SIZE - head.len()).to_string();
        assert!(stream.output_text().ends_with(&format!("\r\n\r\n{}", expected)));
    }

    #[test]
    fn test_serve_connection_over_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let router = hello_router();
            let (stream, _) = listener.accept().unwrap();
            serve_connection(stream, &router, Some(Duration::from_secs(5)));
        });

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(b"GET / HTTP/1.1\r\n\r\n").unwrap();

        // El servidor cierra la conexión, así que read_to_end termina
        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();
        let text = String::from_utf8_lossy(&buf);

        assert!(text.starts_with("HTTP/1.1 200 OK"));
        assert!(text.contains("Hello, World!"));

        server.join().unwrap();
    }

    #[test]
    fn test_serve_connection_peer_closed_immediately() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let router = hello_router();
            let (stream, _) = listener.accept().unwrap();
            // read retorna 0 y la función termina sin responder
            serve_connection(stream, &router, None);
        });

        drop(TcpStream::connect(addr).unwrap());

        server.join().unwrap();
    }
}
