// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Request routing and the two service endpoints.
//
//   POST /generate-document   {"text": "..."} → DOCX attachment
//   GET  /health              → {"status": "healthy"}

use serde::Deserialize;
use tracing::{error, info, instrument};

use formwerk_core::AppConfig;
use formwerk_core::error::{Result, require_text};
use formwerk_document::{DOCX_MIME_TYPE, DocxWriter, StyleResolver};

use crate::branding::LogoFetcher;
use crate::http::{HttpRequest, HttpResponse};

/// Document generation endpoint.
pub const GENERATE_PATH: &str = "/generate-document";

/// Liveness endpoint.
pub const HEALTH_PATH: &str = "/health";

/// Characters of request text echoed into the log.
const INPUT_PREVIEW_CHARS: usize = 200;

/// Everything a request handler needs, shared across connection tasks.
pub struct ServiceState {
    resolver: StyleResolver,
    writer: DocxWriter,
    fetcher: LogoFetcher,
    config: AppConfig,
}

impl ServiceState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let fetcher = LogoFetcher::new(std::time::Duration::from_secs(
            config.branding.fetch_timeout_secs,
        ))?;
        Ok(Self {
            resolver: StyleResolver::new(config.styles.clone()),
            writer: DocxWriter::new(config.page),
            fetcher,
            config,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Body of a generation request. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct GenerateRequest {
    #[serde(default)]
    text: Option<String>,
}

/// Route a request to its handler.
pub async fn dispatch(request: &HttpRequest, state: &ServiceState) -> HttpResponse {
    match (request.method.as_str(), request.path.as_str()) {
        ("POST", GENERATE_PATH) => generate_document(request, state).await,
        ("GET", HEALTH_PATH) => health(),
        (_, GENERATE_PATH) => method_not_allowed("POST"),
        (_, HEALTH_PATH) => method_not_allowed("GET"),
        (_, path) => HttpResponse::error(404, &format!("no route for {path}")),
    }
}

fn health() -> HttpResponse {
    HttpResponse::json(200, &serde_json::json!({ "status": "healthy" }))
}

fn method_not_allowed(allow: &str) -> HttpResponse {
    HttpResponse::error(405, "method not allowed").with_header("Allow", allow)
}

#[instrument(skip_all, fields(body_bytes = request.body.len()))]
async fn generate_document(request: &HttpRequest, state: &ServiceState) -> HttpResponse {
    let payload: GenerateRequest = match serde_json::from_slice(&request.body) {
        Ok(payload) => payload,
        Err(e) => return HttpResponse::error(400, &format!("invalid JSON body: {e}")),
    };

    let text = payload.text.unwrap_or_default();
    if let Err(e) = require_text(&text) {
        return HttpResponse::error(e.status_code(), &e.to_string());
    }

    let preview: String = text.chars().take(INPUT_PREVIEW_CHARS).collect();
    info!(chars = text.chars().count(), preview = %preview, "Generating document");

    let blocks = state.resolver.transform(&text);
    let branding = state.fetcher.branding(&state.config.branding).await;

    match state.writer.build(&blocks, &branding) {
        Ok(bytes) => {
            info!(blocks = blocks.len(), bytes = bytes.len(), "Document generated");
            HttpResponse::new(200)
                .with_header(
                    "Content-Disposition",
                    format!("attachment; filename=\"{}\"", state.config.download_name),
                )
                .with_body(DOCX_MIME_TYPE, bytes)
        }
        Err(e) => {
            error!(error = %e, "document assembly failed");
            HttpResponse::error(e.status_code(), &e.to_string())
        }
    }
}
