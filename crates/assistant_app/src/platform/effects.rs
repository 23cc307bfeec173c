use assistant_core::{Effect, Msg};
use assistant_engine::{EngineCommand, EngineEvent, EngineHandle};
use assistant_logging::{assistant_info, assistant_warn};

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    /// Hands network effects to the engine and returns notifications for the screen.
    pub fn enqueue(&self, effects: Vec<Effect>) -> Vec<String> {
        let mut notices = Vec::new();
        for effect in effects {
            match effect {
                Effect::Notify(text) => notices.push(text),
                Effect::UploadFile { file } => {
                    assistant_info!("UploadFile name={} path={:?}", file.name, file.path);
                    self.engine.send(EngineCommand::Upload {
                        file_name: file.name,
                        path: file.path,
                    });
                }
                Effect::AskQuestion { question } => {
                    assistant_info!("AskQuestion len={}", question.len());
                    self.engine.send(EngineCommand::Ask { question });
                }
                Effect::CheckHealth => self.engine.send(EngineCommand::CheckHealth),
            }
        }
        notices
    }

    /// Drains finished requests as core messages.
    pub fn poll(&self) -> Vec<Msg> {
        let mut msgs = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            msgs.push(map_event(event));
        }
        msgs
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::UploadCompleted(Ok(reply)) => Msg::UploadSucceeded {
            message: reply.message,
        },
        EngineEvent::UploadCompleted(Err(err)) => Msg::UploadFailed {
            reason: err.to_string(),
        },
        EngineEvent::AnswerCompleted(Ok(reply)) => Msg::AnswerReceived {
            answer: reply.answer,
            sources: reply.sources,
        },
        EngineEvent::AnswerCompleted(Err(err)) => Msg::AnswerFailed {
            reason: err.to_string(),
        },
        EngineEvent::HealthCompleted(Ok(reply)) => Msg::HealthChecked {
            ready: reply.is_ready(),
            detail: reply.status,
        },
        EngineEvent::HealthCompleted(Err(err)) => {
            assistant_warn!("Health check failed: {}", err);
            Msg::HealthChecked {
                ready: false,
                detail: err.to_string(),
            }
        }
    }
}
