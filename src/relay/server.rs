//! XP relay server.
//!
//! Activity hooks POST events over plain HTTP; game clients subscribe over a
//! WebSocket on the same port. Each connection is peeked to tell the two
//! apart.

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use super::error::RelayError;
use super::validation::{
    cli_action, cli_xp, is_known_source, parse_event, secure_headers, ValidationError,
    XpBroadcast,
};
use crate::config::RelayConfig;

const MAX_HEADER_BYTES: usize = 8 * 1024;
const BROADCAST_CAPACITY: usize = 100;
const PEEK_RETRY: Duration = Duration::from_millis(5);

/// The parts of an HTTP request the relay routes on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn new(method: &str, path: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            body: body.into(),
        }
    }
}

/// Request line plus the one header the relay needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    pub method: String,
    pub path: String,
    pub content_length: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self {
            status,
            body: value.to_string(),
        }
    }

    pub fn empty(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }

    pub fn error(err: &ValidationError) -> Self {
        Self::json(err.status(), &json!({ "error": err.to_string() }))
    }

    fn not_found() -> Self {
        Self::json(404, &json!({ "error": "Not found" }))
    }

    fn status_text(&self) -> &'static str {
        match self.status {
            200 => "OK",
            400 => "Bad Request",
            404 => "Not Found",
            413 => "Payload Too Large",
            _ => "Internal Server Error",
        }
    }

    /// Serializes the response with `headers` and a closing connection.
    pub fn to_bytes(&self, headers: &[(&'static str, String)]) -> Vec<u8> {
        let mut out = format!("HTTP/1.1 {} {}\r\n", self.status, self.status_text());
        for (name, value) in headers {
            out.push_str(&format!("{}: {}\r\n", name, value));
        }
        out.push_str(&format!("Content-Length: {}\r\n", self.body.len()));
        out.push_str("Connection: close\r\n\r\n");
        out.push_str(&self.body);
        out.into_bytes()
    }
}

/// Parses the request line and `Content-Length` from a header block.
/// Query strings are dropped from the path.
pub fn parse_head(head: &str) -> Result<RequestHead, RelayError> {
    let mut lines = head.split("\r\n");
    let request_line = lines.next().ok_or(RelayError::MalformedRequest)?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().ok_or(RelayError::MalformedRequest)?;
    let target = parts.next().ok_or(RelayError::MalformedRequest)?;
    let path = target.split('?').next().unwrap_or(target);

    let mut content_length = 0;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value
                    .trim()
                    .parse()
                    .map_err(|_| RelayError::MalformedRequest)?;
            }
        }
    }

    Ok(RequestHead {
        method: method.to_ascii_uppercase(),
        path: path.to_string(),
        content_length,
    })
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

enum ReadOutcome {
    Request(HttpRequest),
    TooLarge,
}

async fn read_request(stream: &mut TcpStream, max_body: usize) -> Result<ReadOutcome, RelayError> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        if let Some(pos) = find_header_end(&buf) {
            break pos;
        }
        if buf.len() > MAX_HEADER_BYTES {
            return Err(RelayError::MalformedRequest);
        }
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Err(RelayError::MalformedRequest);
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = std::str::from_utf8(&buf[..header_end]).map_err(|_| RelayError::MalformedRequest)?;
    let head = parse_head(head)?;
    if head.content_length > max_body {
        return Ok(ReadOutcome::TooLarge);
    }

    let mut body = buf[header_end + 4..].to_vec();
    while body.len() < head.content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }
    body.truncate(head.content_length);

    Ok(ReadOutcome::Request(HttpRequest {
        method: head.method,
        path: head.path,
        body,
    }))
}

/// Shared relay state: config, subscriber channel and connection count.
pub struct RelayServer {
    config: RelayConfig,
    tx: broadcast::Sender<String>,
    clients: AtomicUsize,
    started: Instant,
}

impl RelayServer {
    pub fn new(config: RelayConfig) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            config,
            tx,
            clients: AtomicUsize::new(0),
            started: Instant::now(),
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    /// Connected WebSocket clients.
    pub fn client_count(&self) -> usize {
        self.clients.load(Ordering::SeqCst)
    }

    pub fn uptime_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Sends `msg` to every subscriber. Having none is not an error.
    pub fn broadcast(&self, msg: &XpBroadcast) -> Result<(), RelayError> {
        let text = serde_json::to_string(msg)?;
        let receivers = self.tx.send(text).unwrap_or(0);
        info!(
            event_type = %msg.event_type,
            amount = msg.amount,
            source = %msg.source_name,
            receivers,
            "broadcast xp"
        );
        Ok(())
    }

    /// Routes one request. Every path through here produces a response.
    pub fn handle(&self, req: &HttpRequest) -> HttpResponse {
        if req.body.len() > self.config.max_body_bytes {
            return HttpResponse::error(&ValidationError::BodyTooLarge);
        }

        match (req.method.as_str(), req.path.as_str()) {
            ("OPTIONS", _) => HttpResponse::empty(200),
            ("POST", "/event") => self.handle_event(&req.body),
            ("GET", "/health") => self.health(),
            ("POST", path) => match path.strip_prefix("/cli/") {
                Some(source) if !source.is_empty() && !source.contains('/') => {
                    self.handle_cli(source, &req.body)
                }
                _ => HttpResponse::not_found(),
            },
            _ => HttpResponse::not_found(),
        }
    }

    fn handle_event(&self, body: &[u8]) -> HttpResponse {
        let event = match parse_event(body) {
            Ok(event) => event,
            Err(err) => {
                debug!(error = %err, "rejected event");
                return HttpResponse::error(&err);
            }
        };
        let xp = event.xp();
        self.publish(XpBroadcast::now(&event.event_type, xp, &event.source))
    }

    fn handle_cli(&self, source: &str, body: &[u8]) -> HttpResponse {
        if !is_known_source(source) {
            return HttpResponse::error(&ValidationError::UnknownCliSource);
        }
        let action = cli_action(body);
        self.publish(XpBroadcast::now(&action, cli_xp(source), source))
    }

    fn publish(&self, msg: XpBroadcast) -> HttpResponse {
        match self.broadcast(&msg) {
            Ok(()) => HttpResponse::json(
                200,
                &json!({ "success": true, "xp": msg.amount, "source": msg.source }),
            ),
            Err(e) => {
                warn!(error = %e, "broadcast failed");
                HttpResponse::json(500, &json!({ "error": "broadcast failed" }))
            }
        }
    }

    fn health(&self) -> HttpResponse {
        HttpResponse::json(
            200,
            &json!({
                "status": "ok",
                "clients": self.client_count(),
                "uptime": self.uptime_secs(),
            }),
        )
    }
}

/// Binds the configured port on all interfaces and serves forever.
pub async fn start_relay_server(server: Arc<RelayServer>) -> Result<(), RelayError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], server.config.port));
    let listener = TcpListener::bind(addr).await?;
    info!(port = server.config.port, "xp relay listening");
    serve(listener, server).await;
    Ok(())
}

/// Accept loop over an already bound listener.
pub async fn serve(listener: TcpListener, server: Arc<RelayServer>) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let server = Arc::clone(&server);
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, addr, server).await {
                        debug!(%addr, error = %e, "connection error");
                    }
                });
            }
            Err(e) => {
                warn!(error = %e, "accept error");
            }
        }
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    addr: SocketAddr,
    server: Arc<RelayServer>,
) -> Result<(), RelayError> {
    let limit = Duration::from_millis(server.config.request_timeout_ms);
    let head = tokio::time::timeout(limit, peek_head(&stream))
        .await
        .map_err(|_| RelayError::Timeout)??;
    if head.is_empty() {
        return Ok(());
    }
    let head = String::from_utf8_lossy(&head).to_ascii_lowercase();
    if head.starts_with("get") && head.contains("upgrade: websocket") {
        return serve_websocket(stream, addr, server).await;
    }

    let read = read_request(&mut stream, server.config.max_body_bytes);
    let response = match tokio::time::timeout(limit, read)
        .await
        .unwrap_or(Err(RelayError::Timeout))
    {
        Ok(ReadOutcome::Request(req)) => {
            debug!(%addr, method = %req.method, path = %req.path, "http request");
            server.handle(&req)
        }
        Ok(ReadOutcome::TooLarge) => HttpResponse::error(&ValidationError::BodyTooLarge),
        Err(RelayError::MalformedRequest) => {
            HttpResponse::json(400, &json!({ "error": "Malformed request" }))
        }
        Err(e) => return Err(e),
    };

    let headers = secure_headers(&server.config.allowed_origin);
    stream.write_all(&response.to_bytes(&headers)).await?;
    stream.shutdown().await?;
    Ok(())
}

/// Peeks until the whole header block is buffered, the header limit is
/// reached or the peer closes. Nothing is consumed from the stream.
async fn peek_head(stream: &TcpStream) -> Result<Vec<u8>, RelayError> {
    let mut buf = vec![0u8; MAX_HEADER_BYTES];
    let mut seen = 0;
    loop {
        let n = stream.peek(&mut buf).await?;
        if n == 0 || n == buf.len() || find_header_end(&buf[..n]).is_some() {
            buf.truncate(n);
            return Ok(buf);
        }
        if n == seen {
            tokio::time::sleep(PEEK_RETRY).await;
        }
        seen = n;
    }
}

async fn serve_websocket(
    stream: TcpStream,
    addr: SocketAddr,
    server: Arc<RelayServer>,
) -> Result<(), RelayError> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // Subscribe before counting so a visible client never misses a broadcast.
    let mut rx = server.subscribe();
    let clients = server.clients.fetch_add(1, Ordering::SeqCst) + 1;
    info!(%addr, clients, "game client connected");

    let send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(text) => {
                    if ws_sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "game client lagged");
                    continue;
                }
            }
        }
    });

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => {}
        }
    }

    send_task.abort();
    let clients = server.clients.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
    info!(%addr, clients, "game client disconnected");
    Ok(())
}
