use std::fmt;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use wrapped_core::Statement;
use wrapped_ingest::IngestClient;

#[derive(Clone)]
pub struct UploadRequest {
    pub request_id: u64,
    pub path: PathBuf,
    pub password: Option<String>,
}

impl fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadRequest")
            .field("request_id", &self.request_id)
            .field("path", &self.path)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum UploadEvent {
    Started { request_id: u64 },
    Completed { request_id: u64, statement: Box<Statement> },
    Failed { request_id: u64, message: String },
}

impl UploadEvent {
    pub fn request_id(&self) -> u64 {
        match self {
            UploadEvent::Started { request_id }
            | UploadEvent::Completed { request_id, .. }
            | UploadEvent::Failed { request_id, .. } => *request_id,
        }
    }
}

/// Send to the viewer. False once it has quit; the event is dropped.
fn deliver(tx: &std::sync::mpsc::Sender<UploadEvent>, event: UploadEvent) -> bool {
    let request_id = event.request_id();
    let sent = tx.send(event).is_ok();
    if !sent {
        debug!(request_id, "viewer gone; upload event dropped");
    }
    sent
}

async fn process(client: &IngestClient, req: &UploadRequest) -> UploadEvent {
    match client.upload_file(&req.path, req.password.as_deref()).await {
        Ok(statement) => UploadEvent::Completed {
            request_id: req.request_id,
            statement: Box::new(statement),
        },
        Err(e) => {
            warn!(error = %e, path = %req.path.display(), "upload failed");
            UploadEvent::Failed {
                request_id: req.request_id,
                message: e.user_message(),
            }
        }
    }
}

pub async fn run_worker(
    client: IngestClient,
    mut rx: mpsc::UnboundedReceiver<UploadRequest>,
    tx: std::sync::mpsc::Sender<UploadEvent>,
) {
    let mut current: Option<tokio::task::JoinHandle<()>> = None;

    while let Some(req) = rx.recv().await {
        // one upload at a time; a newer request replaces the old one
        if let Some(h) = current.take() {
            h.abort();
        }

        let tx2 = tx.clone();
        let client = client.clone();
        current = Some(tokio::spawn(async move {
            if !deliver(
                &tx2,
                UploadEvent::Started {
                    request_id: req.request_id,
                },
            ) {
                return;
            }
            let event = process(&client, &req).await;
            deliver(&tx2, event);
        }));
    }
}
