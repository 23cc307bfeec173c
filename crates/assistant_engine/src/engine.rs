use std::io;
use std::path::Path;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use assistant_logging::{assistant_info, assistant_warn, clip_for_log};

use crate::backend::Backend;
use crate::{ApiError, Endpoint, EngineCommand, EngineEvent, FailureKind, UploadPayload};

/// Runs backend requests on a private tokio runtime and reports results as events.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(backend: Arc<dyn Backend>) -> io::Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::Builder::new()
            .name("assistant-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let backend = backend.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(backend.as_ref(), command, event_tx).await;
                    });
                }
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    backend: &dyn Backend,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::Upload { file_name, path } => {
            assistant_info!("Uploading {} from {:?}", file_name, path);
            let result = match read_upload(&file_name, &path).await {
                Ok(payload) => backend.upload(payload).await,
                Err(err) => Err(err),
            };
            if let Err(err) = &result {
                assistant_warn!("Upload of {} failed: {}", file_name, err);
            }
            EngineEvent::UploadCompleted(result)
        }
        EngineCommand::Ask { question } => {
            assistant_info!("Asking: {}", clip_for_log(&question, 80));
            let result = backend.ask(&question).await;
            if let Err(err) = &result {
                assistant_warn!("Question failed: {}", err);
            }
            EngineEvent::AnswerCompleted(result)
        }
        EngineCommand::CheckHealth => EngineEvent::HealthCompleted(backend.health().await),
    };
    let _ = event_tx.send(event);
}

async fn read_upload(file_name: &str, path: &Path) -> Result<UploadPayload, ApiError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| ApiError::new(Endpoint::Upload, FailureKind::Io, err.to_string()))?;
    Ok(UploadPayload {
        file_name: file_name.to_string(),
        bytes,
    })
}
