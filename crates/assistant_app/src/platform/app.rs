use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use assistant_core::{update, AppState, Msg, Screen};
use assistant_engine::{ApiSettings, EngineHandle, ReqwestBackend};
use assistant_logging::{assistant_error, assistant_info};

use super::effects::EffectRunner;
use super::input::{parse_line, InputAction};
use super::logging;
use super::ui::constants::{BUSY_HINT, CMD_CHAT_QUIT};
use super::ui::render::{self, Renderer};

const TICK_INTERVAL: Duration = Duration::from_millis(50);

pub fn run_app() -> anyhow::Result<()> {
    logging::initialize();

    let settings = ApiSettings::default();
    assistant_info!("Starting against {}", settings.base_url);
    let backend = ReqwestBackend::new(settings).context("failed to build HTTP client")?;
    let engine = EngineHandle::new(Arc::new(backend)).context("failed to start engine")?;

    let (event_tx, event_rx) = mpsc::channel::<LoopEvent>();
    spawn_stdin_reader(event_tx.clone());
    // Background tick to poll the engine and coalesce rendering.
    thread::spawn(move || {
        while event_tx.send(LoopEvent::Tick).is_ok() {
            thread::sleep(TICK_INTERVAL);
        }
    });

    let stdout = io::stdout();
    let mut session = Session::new(
        EffectRunner::new(engine),
        Renderer::new(render::local_clock()),
        stdout.lock(),
    );
    session.start()?;

    while let Ok(event) = event_rx.recv() {
        match event {
            LoopEvent::Input(line) => {
                if session.handle_line(&line)? == Flow::Quit {
                    break;
                }
            }
            LoopEvent::Tick => session.pump()?,
            LoopEvent::InputClosed => break,
        }
    }

    assistant_info!("Exiting");
    Ok(())
}

enum LoopEvent {
    Input(String),
    Tick,
    InputClosed,
}

fn spawn_stdin_reader(event_tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if event_tx.send(LoopEvent::Input(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    assistant_error!("Failed to read stdin: {}", err);
                    break;
                }
            }
        }
        let _ = event_tx.send(LoopEvent::InputClosed);
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Owns the state and is the only caller of `update`.
pub struct Session<W: Write> {
    state: AppState,
    effects: EffectRunner,
    renderer: Renderer,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(effects: EffectRunner, renderer: Renderer, out: W) -> Self {
        Self {
            state: AppState::new(),
            effects,
            renderer,
            out,
        }
    }

    pub fn start(&mut self) -> io::Result<()> {
        self.dispatch_msg(Msg::Started)?;
        self.render()
    }

    pub fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        let view = self.state.view();
        if view.screen == Screen::Chat && !view.question_input_enabled {
            if line.trim() == CMD_CHAT_QUIT {
                return Ok(Flow::Quit);
            }
            writeln!(self.out, "{}", render::notice(BUSY_HINT))?;
            return Ok(Flow::Continue);
        }
        match parse_line(view.screen, line, self.state.pending_question()) {
            InputAction::Dispatch(msgs) => {
                for msg in msgs {
                    self.dispatch_msg(msg)?;
                }
            }
            InputAction::Quit => return Ok(Flow::Quit),
            InputAction::Rejected(text) => writeln!(self.out, "{}", render::notice(&text))?,
        }
        self.render()?;
        Ok(Flow::Continue)
    }

    /// Feeds finished requests back into the state and redraws if needed.
    pub fn pump(&mut self) -> io::Result<()> {
        for msg in self.effects.poll() {
            self.dispatch_msg(msg)?;
        }
        self.dispatch_msg(Msg::Tick)?;
        self.render()
    }

    #[cfg(test)]
    fn state(&self) -> &AppState {
        &self.state
    }

    fn dispatch_msg(&mut self, msg: Msg) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for text in self.effects.enqueue(effects) {
            writeln!(self.out, "{}", render::notice(&text))?;
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        if !self.state.consume_dirty() && !self.renderer.is_pristine() {
            return Ok(());
        }
        for line in self.renderer.render(&self.state.view()) {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Mutex;
    use std::time::Instant;

    use super::*;
    use assistant_core::{Message, Role, UploadState};
    use assistant_engine::{
        AnswerReply, ApiError, Backend, Endpoint, FailureKind, HealthReply, UploadPayload,
        UploadReply,
    };
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    /// Backend double with canned replies.
    #[derive(Default)]
    struct FakeBackend {
        uploads: Mutex<usize>,
        fail_upload: bool,
    }

    #[async_trait::async_trait]
    impl Backend for FakeBackend {
        async fn upload(&self, _payload: UploadPayload) -> Result<UploadReply, ApiError> {
            *self.uploads.lock().unwrap() += 1;
            if self.fail_upload {
                return Err(ApiError::new(
                    Endpoint::Upload,
                    FailureKind::HttpStatus(500),
                    "500 Internal Server Error",
                ));
            }
            Ok(UploadReply {
                message: "Processed 42 pages".to_string(),
            })
        }

        async fn ask(&self, question: &str) -> Result<AnswerReply, ApiError> {
            if question == "test" {
                return Err(ApiError::new(
                    Endpoint::Ask,
                    FailureKind::HttpStatus(500),
                    "500 Internal Server Error",
                ));
            }
            Ok(AnswerReply {
                answer: "Drain the sump...".to_string(),
                sources: Some("p.34".to_string()),
            })
        }

        async fn health(&self) -> Result<HealthReply, ApiError> {
            Ok(HealthReply {
                status: "ready".to_string(),
            })
        }
    }

    fn session_with(backend: Arc<FakeBackend>) -> Session<Vec<u8>> {
        let engine = EngineHandle::new(backend).expect("engine");
        Session::new(
            EffectRunner::new(engine),
            Renderer::new(Arc::new(|| "09:30".to_string())),
            Vec::new(),
        )
    }

    fn pump_until(session: &mut Session<Vec<u8>>, done: impl Fn(&AppState) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done(session.state()) {
            assert!(Instant::now() < deadline, "timed out waiting for engine");
            session.pump().unwrap();
            thread::sleep(Duration::from_millis(10));
        }
    }

    fn upload_manual(session: &mut Session<Vec<u8>>, temp: &TempDir) {
        let path = temp.path().join("manual.pdf");
        fs::write(&path, b"%PDF-1.4").unwrap();
        session
            .handle_line(&format!("open {}", path.display()))
            .unwrap();
        session.handle_line("upload").unwrap();
        assert_eq!(session.state().upload_state(), UploadState::Uploading);
        pump_until(session, |state| {
            state.upload_state() != UploadState::Uploading
        });
    }

    #[test]
    fn upload_switches_to_chat_and_shows_message() {
        let temp = TempDir::new().unwrap();
        let backend = Arc::new(FakeBackend::default());
        let mut session = session_with(backend.clone());
        session.start().unwrap();

        upload_manual(&mut session, &temp);

        assert_eq!(session.state().upload_state(), UploadState::Uploaded);
        assert_eq!(*backend.uploads.lock().unwrap(), 1);
        let output = String::from_utf8(session.into_output()).unwrap();
        assert!(output.contains(">> Processed 42 pages"));
        assert!(output.contains("== Chat =="));
    }

    #[test]
    fn failed_upload_stays_on_upload_screen() {
        let temp = TempDir::new().unwrap();
        let backend = Arc::new(FakeBackend {
            fail_upload: true,
            ..FakeBackend::default()
        });
        let mut session = session_with(backend);

        upload_manual(&mut session, &temp);

        assert_eq!(session.state().upload_state(), UploadState::NotUploaded);
        assert!(session.state().selected_file().is_some());
        let output = String::from_utf8(session.into_output()).unwrap();
        assert!(output.contains(">> Error: Upload failed (HTTP 500)"));
    }

    #[test]
    fn question_and_answer_are_printed_in_order() {
        let temp = TempDir::new().unwrap();
        let mut session = session_with(Arc::new(FakeBackend::default()));
        upload_manual(&mut session, &temp);

        session.handle_line("How do I change the oil?").unwrap();
        assert!(session.state().is_loading());
        pump_until(&mut session, |state| !state.is_loading());

        assert_eq!(
            session.state().transcript(),
            &[
                Message::user("How do I change the oil?"),
                Message::bot("Drain the sump...", Some("p.34".to_string())),
            ]
        );
        let output = String::from_utf8(session.into_output()).unwrap();
        let question = output.find("[09:30] You: How do I change the oil?").unwrap();
        let answer = output.find("[09:30] Bot: Drain the sump...").unwrap();
        assert!(question < answer);
        assert!(output.contains("Sources: p.34"));
    }

    #[test]
    fn server_error_answer_is_reported_in_transcript() {
        let temp = TempDir::new().unwrap();
        let mut session = session_with(Arc::new(FakeBackend::default()));
        upload_manual(&mut session, &temp);

        session.handle_line("test").unwrap();
        pump_until(&mut session, |state| !state.is_loading());

        let last = session.state().transcript().last().unwrap();
        assert_eq!(last.role, Role::Bot);
        assert!(last.text.starts_with("Error:"));
        assert_eq!(last.sources, None);
    }

    #[test]
    fn input_while_waiting_is_dropped() {
        let temp = TempDir::new().unwrap();
        let mut session = session_with(Arc::new(FakeBackend::default()));
        upload_manual(&mut session, &temp);

        session.handle_line("first").unwrap();
        session.handle_line("second").unwrap();
        pump_until(&mut session, |state| !state.is_loading());

        assert_eq!(session.state().transcript().len(), 2);
        let output = String::from_utf8(session.into_output()).unwrap();
        assert!(output.contains(BUSY_HINT));
    }

    #[test]
    fn quit_commands_end_the_session() {
        let temp = TempDir::new().unwrap();
        let mut session = session_with(Arc::new(FakeBackend::default()));
        assert_eq!(session.handle_line("quit").unwrap(), Flow::Quit);

        upload_manual(&mut session, &temp);
        assert_eq!(session.handle_line("/quit").unwrap(), Flow::Quit);
    }

    #[test]
    fn blank_line_then_quit_sends_nothing() {
        let temp = TempDir::new().unwrap();
        let mut session = session_with(Arc::new(FakeBackend::default()));
        upload_manual(&mut session, &temp);

        assert_eq!(session.handle_line("   ").unwrap(), Flow::Continue);
        assert!(!session.state().is_loading());
        assert_eq!(session.handle_line("/quit").unwrap(), Flow::Quit);
        assert!(session.state().transcript().is_empty());
    }
}
