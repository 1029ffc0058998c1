//! Minimal blocking HTTP/1.1 server for the introspection endpoints.
//!
//! One request per connection, `Connection: close`, GET/HEAD only. Header
//! parsing is done by `httparse`; request bodies are never read.

use super::app::{App, Endpoint};
use super::version;
use crate::error::{Result, StencilError};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::time::Duration;

/// Maximum header section size (32 KiB)
const MAX_HEADER_SIZE: usize = 32 * 1024;

/// Idle clients are dropped after this long so they cannot stall the loop.
pub const IO_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
}

#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl HttpResponse {
    fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: body.into().into_bytes(),
        }
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Read and parse one request head from a stream.
///
/// Returns None if the connection closed before anything was received.
pub fn read_request(stream: &mut impl Read) -> Option<std::result::Result<HttpRequest, String>> {
    let mut header_buf = Vec::with_capacity(1024);
    let mut byte = [0u8; 1];
    loop {
        match stream.read(&mut byte) {
            Ok(0) => {
                if header_buf.is_empty() {
                    return None;
                }
                return Some(Err("Connection closed mid-request".to_string()));
            }
            Ok(_) => {
                header_buf.push(byte[0]);
                if header_buf.len() > MAX_HEADER_SIZE {
                    return Some(Err("Headers too large".to_string()));
                }
                if header_buf.ends_with(b"\r\n\r\n") {
                    break;
                }
            }
            Err(e) => {
                if header_buf.is_empty() {
                    return None;
                }
                return Some(Err(format!("Read error: {}", e)));
            }
        }
    }

    let mut parsed_headers = [httparse::EMPTY_HEADER; 64];
    let mut req = httparse::Request::new(&mut parsed_headers);
    match req.parse(&header_buf) {
        Ok(httparse::Status::Complete(_)) => {}
        Ok(httparse::Status::Partial) => return Some(Err("Incomplete HTTP request".to_string())),
        Err(e) => return Some(Err(format!("HTTP parse error: {}", e))),
    }
    let method = req.method.unwrap_or("").to_string();
    let raw_path = req.path.unwrap_or("/");
    // query strings do not take part in routing
    let path = raw_path.split('?').next().unwrap_or("/").to_string();
    Some(Ok(HttpRequest { method, path }))
}

/// Write a response; errors are ignored since the client may be gone.
pub fn write_response(stream: &mut impl Write, response: &HttpResponse, head_only: bool) {
    let mut head = format!("HTTP/1.1 {} {}\r\n", response.status, reason(response.status));
    head.push_str(&format!("Content-Type: {}\r\n", response.content_type));
    head.push_str(&format!("Content-Length: {}\r\n", response.body.len()));
    head.push_str("Connection: close\r\n\r\n");
    let _ = stream.write_all(head.as_bytes());
    if !head_only && !response.body.is_empty() {
        let _ = stream.write_all(&response.body);
    }
    let _ = stream.flush();
}

/// Route a request against `app`.
pub fn handle(app: &App, excludes: &[String], req: &HttpRequest) -> HttpResponse {
    let Some(route) = app.find(&req.path) else {
        return HttpResponse::text(404, "Not Found");
    };
    if !route.methods.iter().any(|m| m == &req.method) {
        return HttpResponse::text(405, "Method Not Allowed");
    }
    if req.method == "OPTIONS" {
        return HttpResponse::text(200, "");
    }
    match route.endpoint {
        Endpoint::Version => match version::describe(&app.root) {
            Ok(v) => HttpResponse::text(200, v),
            Err(e) => {
                tracing::error!(error = %e, "version lookup failed");
                HttpResponse::text(500, "Internal Server Error")
            }
        },
        Endpoint::Sitemap => match serde_json::to_vec(&app.sitemap(excludes)) {
            Ok(body) => HttpResponse {
                status: 200,
                content_type: "application/json",
                body,
            },
            Err(e) => HttpResponse::text(500, e.to_string()),
        },
        Endpoint::Static | Endpoint::Custom => HttpResponse::text(404, "Not Found"),
    }
}

/// Bound reads and writes on an accepted connection.
pub fn limit_io(stream: &TcpStream, timeout: Duration) -> std::io::Result<()> {
    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))
}

/// Serve `app` on `host:port` until the process is stopped.
pub fn serve(app: &App, excludes: &[String], host: &str, port: u16) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr)
        .map_err(|e| StencilError::Other(format!("failed to bind {addr}: {e}")))?;
    tracing::info!(%addr, app = %app.name, "serving");
    for conn in listener.incoming() {
        let mut stream = match conn {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "accept failed");
                continue;
            }
        };
        if let Err(e) = limit_io(&stream, IO_TIMEOUT) {
            tracing::warn!(error = %e, "failed to set socket timeout");
            continue;
        }
        let resp = match read_request(&mut stream) {
            None => continue,
            Some(Err(msg)) => {
                write_response(&mut stream, &HttpResponse::text(400, msg), false);
                continue;
            }
            Some(Ok(req)) => {
                let resp = handle(app, excludes, &req);
                tracing::debug!(method = %req.method, path = %req.path, status = resp.status, "request");
                (resp, req.method == "HEAD")
            }
        };
        write_response(&mut stream, &resp.0, resp.1);
    }
    Ok(())
}
