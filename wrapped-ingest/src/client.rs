//! Upload client for the statement-processing service.

use reqwest::multipart::{Form, Part};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};
use wrapped_core::Statement;

use crate::error::Result;
use crate::payload::{rejection_from_body, statement_from_body};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const PROCESS_PATH: &str = "/process-statement/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub struct IngestClient {
    http: reqwest::Client,
    base_url: String,
}

impl IngestClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), PROCESS_PATH)
    }

    /// POST the document as multipart `file`, plus `password` when one was given.
    pub async fn upload(
        &self,
        document: Vec<u8>,
        file_name: &str,
        password: Option<&str>,
    ) -> Result<Statement> {
        let url = self.endpoint();
        let size = document.len();

        let mut form = Form::new().part(
            "file",
            Part::bytes(document)
                .file_name(file_name.to_string())
                .mime_str("application/pdf")?,
        );
        if let Some(pw) = password.filter(|p| !p.is_empty()) {
            form = form.text("password", pw.to_string());
        }

        debug!(%url, file_name, size, "uploading statement");
        let resp = self.http.post(&url).multipart(form).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let err = rejection_from_body(status.as_u16(), &body);
            warn!(status = status.as_u16(), error = %err, "statement rejected");
            return Err(err);
        }

        let statement = statement_from_body(&body)?;
        info!(
            transactions = statement.transaction_count(),
            "statement processed"
        );
        Ok(statement)
    }

    pub async fn upload_file(&self, path: &Path, password: Option<&str>) -> Result<Statement> {
        let document = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("statement.pdf")
            .to_string();
        self.upload(document, &file_name, password).await
    }
}
