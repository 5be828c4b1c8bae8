// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Minimal HTTP/1.1 framing over raw TCP.
//
// The service has two endpoints and always answers with `Connection: close`,
// so a full HTTP stack is unnecessary. We read until the end of the header
// block, honour `Content-Length` for the body, and write a single response.
// Chunked request bodies are refused.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use formwerk_core::error::{FormwerkError, Result};

/// Header terminator.
const HEADER_END: &[u8] = b"\r\n\r\n";

/// Read granularity.
const READ_CHUNK: usize = 8192;

/// Largest header block accepted, independent of the overall request cap.
pub const MAX_HEADER_BYTES: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A fully read HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: String,
    /// Path without query string.
    pub path: String,
    /// Header names are lower-cased.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// First value of a header, by lower-case name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Request line and headers, before the body has been read.
#[derive(Debug)]
struct RequestHead {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
    content_length: usize,
}

/// Parse the header block (everything before the blank line).
fn parse_head(head: &[u8]) -> Result<RequestHead> {
    let text = String::from_utf8_lossy(head);
    let mut lines = text.split("\r\n");

    let request_line = lines
        .next()
        .filter(|l| !l.is_empty())
        .ok_or_else(|| FormwerkError::Http("missing request line".into()))?;
    let mut parts = request_line.split_whitespace();
    let (method, target, version) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(m), Some(t), Some(v), None) => (m, t, v),
        _ => {
            return Err(FormwerkError::Http(format!(
                "bad request line {request_line:?}"
            )));
        }
    };
    if !version.starts_with("HTTP/1.") {
        return Err(FormwerkError::Http(format!("unsupported version {version}")));
    }

    let mut headers = Vec::new();
    for line in lines {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| FormwerkError::Http(format!("bad header line {line:?}")))?;
        headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
    }

    let chunked = headers.iter().any(|(n, v)| {
        n == "transfer-encoding" && v.to_ascii_lowercase().contains("chunked")
    });
    if chunked {
        return Err(FormwerkError::Http(
            "chunked request bodies are not supported, send Content-Length".into(),
        ));
    }

    let content_length = match headers.iter().find(|(n, _)| n == "content-length") {
        Some((_, v)) => v
            .parse::<usize>()
            .map_err(|_| FormwerkError::Http(format!("bad Content-Length {v:?}")))?,
        None => 0,
    };

    let path = target.split('?').next().unwrap_or(target).to_string();

    Ok(RequestHead {
        method: method.to_ascii_uppercase(),
        path,
        headers,
        content_length,
    })
}

/// Find the first occurrence of `needle` in `haystack`.
fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Read one request from `stream`, refusing anything over `max_bytes`.
///
/// Returns `Ok(None)` when the peer closes without sending anything.
pub async fn read_request<R>(stream: &mut R, max_bytes: usize) -> Result<Option<HttpRequest>>
where
    R: AsyncRead + Unpin,
{
    let mut buf: Vec<u8> = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];

    // Bytes already searched for the terminator; only the tail that could
    // hold a split terminator is searched again.
    let mut scanned: usize = 0;
    let header_end = loop {
        let from = scanned.saturating_sub(HEADER_END.len() - 1);
        if let Some(pos) = find_subsequence(&buf[from..], HEADER_END) {
            break from + pos;
        }
        scanned = buf.len();
        if buf.len() > max_bytes {
            return Err(FormwerkError::PayloadTooLarge { limit: max_bytes });
        }
        if buf.len() > MAX_HEADER_BYTES {
            return Err(FormwerkError::HeadersTooLarge {
                limit: MAX_HEADER_BYTES,
            });
        }
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            if buf.is_empty() {
                return Ok(None);
            }
            return Err(FormwerkError::Http(
                "connection closed before end of headers".into(),
            ));
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = parse_head(&buf[..header_end])?;
    let body_offset = header_end + HEADER_END.len();
    let total = body_offset
        .checked_add(head.content_length)
        .filter(|&total| total <= max_bytes)
        .ok_or(FormwerkError::PayloadTooLarge { limit: max_bytes })?;

    while buf.len() < total {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Err(FormwerkError::Http(format!(
                "body ended after {} of {} bytes",
                buf.len() - body_offset,
                head.content_length
            )));
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    buf.truncate(total);
    let body = buf.split_off(body_offset);

    Ok(Some(HttpRequest {
        method: head.method,
        path: head.path,
        headers: head.headers,
        body,
    }))
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// A complete response, serialised in one write.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn with_body(self, content_type: &str, body: Vec<u8>) -> Self {
        let mut response = self.with_header("Content-Type", content_type);
        response.body = body;
        response
    }

    /// JSON body from any serialisable value.
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status).with_body("application/json", value.to_string().into_bytes())
    }

    /// `{"error": message}` with the given status.
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, &serde_json::json!({ "error": message }))
    }

    /// Status line, headers and body as wire bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!("HTTP/1.1 {} {}\r\n", self.status, reason_phrase(self.status));
        for (name, value) in &self.headers {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }
        head.push_str(&format!(
            "Content-Length: {}\r\nConnection: close\r\n\r\n",
            self.body.len()
        ));

        let mut out = head.into_bytes();
        out.extend_from_slice(&self.body);
        out
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        413 => "Payload Too Large",
        431 => "Request Header Fields Too Large",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Write a response and flush.
pub async fn send_response<W>(stream: &mut W, response: &HttpResponse) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    stream
        .write_all(&response.to_bytes())
        .await
        .map_err(|e| FormwerkError::Server(format!("write response: {e}")))?;
    stream
        .flush()
        .await
        .map_err(|e| FormwerkError::Server(format!("flush: {e}")))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
