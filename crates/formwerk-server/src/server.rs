// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document generation server: a TCP accept loop that speaks just enough
// HTTP/1.1 to serve the routes in `routes.rs`.
//
// Each connection carries one request and is closed after the response.
// Requests are handled concurrently, each in its own task, and share a
// single read-only `ServiceState`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info, info_span, warn};

use formwerk_core::AppConfig;
use formwerk_core::error::{FormwerkError, Result};
use formwerk_core::types::ServerStatus;

use crate::http::{HttpResponse, read_request, send_response};
use crate::routes::{ServiceState, dispatch};

/// State shared by every connection task.
struct SharedState {
    service: ServiceState,
    active_connections: Arc<AtomicU32>,
    max_request_bytes: usize,
    read_timeout: Duration,
}

/// The HTTP document service.
pub struct DocumentServer {
    config: AppConfig,
    status: ServerStatus,
    /// Address actually bound, known once started.
    local_addr: Option<SocketAddr>,
    shutdown_signal: Arc<Notify>,
    task_handle: Option<JoinHandle<()>>,
    active_connections: Arc<AtomicU32>,
}

impl DocumentServer {
    /// Create a server in `Stopped` state. Call [`start`](Self::start) to
    /// begin accepting connections.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            status: ServerStatus::Stopped,
            local_addr: None,
            shutdown_signal: Arc::new(Notify::new()),
            task_handle: None,
            active_connections: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn status(&self) -> ServerStatus {
        self.status
    }

    /// The bound address, or `None` before [`start`](Self::start).
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    pub fn active_connections(&self) -> u32 {
        self.active_connections.load(Ordering::Relaxed)
    }

    /// Validate the configuration, bind the listener and spawn the accept loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the HTTP client for
    /// logo downloads cannot be built, or the address cannot be bound.
    pub async fn start(&mut self) -> Result<()> {
        if self.status == ServerStatus::Running {
            debug!(addr = ?self.local_addr, "server already running");
            return Ok(());
        }

        self.status = ServerStatus::Starting;
        match self.bind_and_spawn().await {
            Ok(addr) => {
                self.local_addr = Some(addr);
                self.status = ServerStatus::Running;
                info!(%addr, "document server listening");
                Ok(())
            }
            Err(e) => {
                self.status = ServerStatus::Error;
                error!(error = %e, "document server failed to start");
                Err(e)
            }
        }
    }

    async fn bind_and_spawn(&mut self) -> Result<SocketAddr> {
        self.config.validate()?;

        let bind_addr = SocketAddr::new(self.config.server.bind_address, self.config.server.port);
        let listener = TcpListener::bind(bind_addr)
            .await
            .map_err(|e| FormwerkError::Server(format!("bind {bind_addr}: {e}")))?;
        let addr = listener
            .local_addr()
            .map_err(|e| FormwerkError::Server(format!("local address: {e}")))?;

        let shared = Arc::new(SharedState {
            service: ServiceState::new(self.config.clone())?,
            active_connections: Arc::clone(&self.active_connections),
            max_request_bytes: self.config.server.max_request_bytes,
            read_timeout: Duration::from_secs(self.config.server.read_timeout_secs),
        });
        let shutdown = Arc::clone(&self.shutdown_signal);

        self.task_handle = Some(tokio::spawn(async move {
            Self::accept_loop(listener, shutdown, shared).await;
        }));
        Ok(addr)
    }

    /// Signal the accept loop to exit and wait for it. In-flight requests
    /// run to completion in their own tasks.
    pub async fn stop(&mut self) -> Result<()> {
        if self.status != ServerStatus::Running {
            return Ok(());
        }

        info!(addr = ?self.local_addr, "stopping document server");
        self.shutdown_signal.notify_one();

        if let Some(handle) = self.task_handle.take() {
            handle
                .await
                .map_err(|e| FormwerkError::Server(format!("task join: {e}")))?;
        }

        self.status = ServerStatus::Stopped;
        info!("document server stopped");
        Ok(())
    }

    async fn accept_loop(listener: TcpListener, shutdown: Arc<Notify>, shared: Arc<SharedState>) {
        loop {
            tokio::select! {
                _ = shutdown.notified() => {
                    debug!("accept loop received shutdown signal");
                    break;
                }

                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, peer_addr)) => {
                            let state = Arc::clone(&shared);
                            let span = info_span!(
                                "request",
                                id = %uuid::Uuid::new_v4(),
                                peer = %peer_addr,
                            );
                            tokio::spawn(
                                async move {
                                    state.active_connections.fetch_add(1, Ordering::Relaxed);
                                    if let Err(e) = Self::handle_connection(stream, &state).await {
                                        warn!(error = %e, "connection handler error");
                                    }
                                    state.active_connections.fetch_sub(1, Ordering::Relaxed);
                                }
                                .instrument(span),
                            );
                        }
                        Err(e) => {
                            error!(error = %e, "failed to accept connection");
                        }
                    }
                }
            }
        }
    }

    /// Read one request, route it and write the response. A client that
    /// has not sent a complete request within the read timeout gets 408.
    async fn handle_connection(mut stream: TcpStream, state: &SharedState) -> Result<()> {
        let read = tokio::time::timeout(
            state.read_timeout,
            read_request(&mut stream, state.max_request_bytes),
        )
        .await
        .unwrap_or(Err(FormwerkError::RequestTimeout {
            secs: state.read_timeout.as_secs(),
        }));

        let response = match read {
            Ok(Some(request)) => {
                debug!(
                    method = %request.method,
                    path = %request.path,
                    bytes = request.body.len(),
                    "received request"
                );
                dispatch(&request, &state.service).await
            }
            Ok(None) => {
                debug!("peer closed without a request");
                return Ok(());
            }
            Err(FormwerkError::Io(e)) => return Err(FormwerkError::Io(e)),
            Err(e) => {
                warn!(error = %e, "rejected request");
                HttpResponse::error(e.status_code(), &e.to_string())
            }
        };

        info!(status = response.status, "responding");
        send_response(&mut stream, &response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.server.bind_address = IpAddr::V4(Ipv4Addr::LOCALHOST);
        config.server.port = 0;
        config.server.max_request_bytes = 4096;
        config.server.read_timeout_secs = 1;
        config.branding.header_logo_url = None;
        config.branding.footer_logo_url = None;
        config
    }

    async fn started() -> (DocumentServer, SocketAddr) {
        let mut server = DocumentServer::new(test_config());
        server.start().await.unwrap();
        let addr = server.local_addr().unwrap();
        (server, addr)
    }

    async fn roundtrip(addr: SocketAddr, raw: &[u8]) -> Vec<u8> {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(raw).await.unwrap();
        let mut out = Vec::new();
        stream.read_to_end(&mut out).await.unwrap();
        out
    }

    fn post(path: &str, body: &str) -> Vec<u8> {
        format!(
            "POST {path} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        )
        .into_bytes()
    }

    #[tokio::test]
    async fn lifecycle() {
        let mut server = DocumentServer::new(test_config());
        assert_eq!(server.status(), ServerStatus::Stopped);
        assert!(server.local_addr().is_none());

        server.start().await.unwrap();
        assert_eq!(server.status(), ServerStatus::Running);
        assert_ne!(server.local_addr().unwrap().port(), 0);

        // Starting twice is a no-op.
        server.start().await.unwrap();

        server.stop().await.unwrap();
        assert_eq!(server.status(), ServerStatus::Stopped);
        assert_eq!(server.active_connections(), 0);
    }

    #[tokio::test]
    async fn invalid_config_sets_error_status() {
        let mut config = test_config();
        config.download_name.clear();
        let mut server = DocumentServer::new(config);
        assert!(server.start().await.is_err());
        assert_eq!(server.status(), ServerStatus::Error);
    }

    #[tokio::test]
    async fn serves_health_over_tcp() {
        let (mut server, addr) = started().await;
        let out = roundtrip(addr, b"GET /health HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"), "{text}");
        assert!(text.ends_with(r#"{"status":"healthy"}"#), "{text}");
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn generates_document_over_tcp() {
        let (mut server, addr) = started().await;
        let request = post("/generate-document", r##"{"text":"# Hello\n\nWorld"}"##);
        let out = roundtrip(addr, &request).await;

        let split = out.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
        let head = String::from_utf8_lossy(&out[..split]).to_string();
        assert!(head.starts_with("HTTP/1.1 200 OK"), "{head}");
        assert!(head.contains("filename=\"fearless_document.docx\""));
        assert_eq!(&out[split + 4..split + 6], b"PK");
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn empty_text_is_400_over_tcp() {
        let (mut server, addr) = started().await;
        let out = roundtrip(addr, &post("/generate-document", r#"{"text":""}"#)).await;
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("HTTP/1.1 400 Bad Request\r\n"), "{text}");
        assert!(text.ends_with(r#"{"error":"No text provided"}"#), "{text}");
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn oversize_body_is_413() {
        let (mut server, addr) = started().await;
        // Declared length alone is enough to refuse; the body is never sent.
        let head = "POST /generate-document HTTP/1.1\r\nContent-Length: 100000\r\n\r\n";
        let out = roundtrip(addr, head.as_bytes()).await;
        let text = String::from_utf8_lossy(&out).to_string();
        assert!(text.starts_with("HTTP/1.1 413 "), "{text}");
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn idle_client_is_timed_out_with_408() {
        let (mut server, addr) = started().await;
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(b"POST /generate-document HTTP/1.1\r\n").await.unwrap();

        let mut out = Vec::new();
        tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut out))
            .await
            .expect("server should close an idle connection")
            .unwrap();
        let text = String::from_utf8_lossy(&out).to_string();
        assert!(text.starts_with("HTTP/1.1 408 Request Timeout\r\n"), "{text}");
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn malformed_request_line_is_400() {
        let (mut server, addr) = started().await;
        let out = roundtrip(addr, b"NONSENSE\r\n\r\n").await;
        let text = String::from_utf8_lossy(&out).to_string();
        assert!(text.starts_with("HTTP/1.1 400 "), "{text}");
        server.stop().await.unwrap();
    }
}
