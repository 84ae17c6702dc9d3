use std::sync::OnceLock;
use std::time::Duration;

use chrono::{DateTime, Utc};
use regex::Regex;

use super::protocol::{ChatRequest, ChatResponse, ExportFile, ExportRequest};

/// Error type for backend calls
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("could not reach the backend: {0}")]
    Transport(String),
    #[error("backend returned status {0}")]
    Status(u16),
    #[error("malformed backend response: {0}")]
    Decode(String),
}

/// Blocking client for the assistant and export services. Both calls are
/// plain request/response with a single global timeout — no retry, no
/// cancellation.
pub struct BackendClient {
    agent: ureq::Agent,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(60)))
            .build();
        BackendClient {
            agent: config.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// POST the plan + selection context to `/ai/chat`.
    pub fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, RemoteError> {
        let url = format!("{}/ai/chat", self.base_url);
        let mut response = self
            .agent
            .post(&url)
            .send_json(request)
            .map_err(map_ureq_error)?;
        response
            .body_mut()
            .read_json::<ChatResponse>()
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }

    /// POST the plan to `/export/excel` and hand back the file bytes plus
    /// the filename the backend suggested (or a timestamped fallback).
    pub fn export(&self, request: &ExportRequest) -> Result<ExportFile, RemoteError> {
        let url = format!("{}/export/excel", self.base_url);
        let mut response = self
            .agent
            .post(&url)
            .send_json(request)
            .map_err(map_ureq_error)?;

        let filename = response
            .headers()
            .get("content-disposition")
            .and_then(|value| value.to_str().ok())
            .and_then(disposition_filename)
            .unwrap_or_else(|| fallback_export_filename(Utc::now()));

        let bytes = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        Ok(ExportFile { filename, bytes })
    }
}

fn map_ureq_error(error: ureq::Error) -> RemoteError {
    match error {
        ureq::Error::StatusCode(code) => RemoteError::Status(code),
        other => RemoteError::Transport(other.to_string()),
    }
}

/// Pull the suggested filename out of a `Content-Disposition` header.
pub fn disposition_filename(header: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r#"(?i)filename="?([^";]+)"?"#).expect("static pattern")
    });
    re.captures(header)
        .map(|caps| caps[1].to_string())
}

/// Default export name when the backend suggests none: a second-precision
/// ISO timestamp with filesystem-hostile characters replaced.
pub fn fallback_export_filename(now: DateTime<Utc>) -> String {
    format!("workplan-export-{}.xlsx", now.format("%Y-%m-%dT%H-%M-%S"))
}
