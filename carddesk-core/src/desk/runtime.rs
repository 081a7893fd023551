//! Single-consumer event loop driving [`DeskState`].
//!
//! Every input (operator commands, wedge keystrokes, camera codes, backend
//! results) is a [`Message`] on one channel. Messages are handled one at a
//! time and run to completion; only backend calls suspend, and those run as
//! spawned tasks that post their outcome back as another message.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::messages::{Command, Message};
use super::notice::Notice;
use super::update::update;
use super::DeskState;
use crate::batch::ScanBatch;
use crate::dispatch::DispatchSubmitter;
use crate::error::DecoderError;
use crate::infra::BackendApi;
use crate::scan::{CameraSession, KeyEvent};

/// Cloneable entry point for input producers.
#[derive(Debug, Clone)]
pub struct DeskHandle {
    tx: mpsc::UnboundedSender<Message>,
}

impl DeskHandle {
    /// Queue a message. Returns `false` once the desk has shut down.
    pub fn send(&self, message: Message) -> bool {
        self.tx.send(message).is_ok()
    }

    /// Deliver one key press to the wedge listener. Returns `false` once
    /// the desk has shut down.
    pub fn press(&self, key: KeyEvent) -> bool {
        self.send(Message::Key(key))
    }

    /// Deliver a full line as wedge keystrokes, Enter included.
    pub fn type_line(&self, line: &str) -> bool {
        KeyEvent::typed(line).all(|key| self.press(key))
    }
}

pub struct DeskRuntime {
    state: DeskState,
    api: Arc<dyn BackendApi>,
    submitter: DispatchSubmitter,
    camera: Option<CameraSession>,
    tx: mpsc::UnboundedSender<Message>,
    rx: mpsc::UnboundedReceiver<Message>,
}

impl std::fmt::Debug for DeskRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeskRuntime")
            .field("state", &self.state)
            .field("camera", &self.camera)
            .finish_non_exhaustive()
    }
}

impl DeskRuntime {
    pub fn new(api: Arc<dyn BackendApi>, batch: ScanBatch) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: DeskState::new(batch),
            submitter: DispatchSubmitter::new(api.clone()),
            api,
            camera: None,
            tx,
            rx,
        }
    }

    /// Use `camera` for `StartScanning`. Without one, scanning requests
    /// fail with a notice.
    pub fn with_camera(mut self, camera: CameraSession) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn handle(&self) -> DeskHandle {
        DeskHandle {
            tx: self.tx.clone(),
        }
    }

    pub fn state(&self) -> &DeskState {
        &self.state
    }

    /// Process messages until a `Shutdown` arrives.
    ///
    /// `observer` sees the state and the notices produced after every
    /// message. Returns the final state.
    pub async fn run<F>(mut self, mut observer: F) -> DeskState
    where
        F: FnMut(&DeskState, &[Notice]),
    {
        info!("desk started");
        // `self.tx` keeps the channel open, so `recv` only ends on shutdown.
        while let Some(message) = self.rx.recv().await {
            debug!(?message, "desk message");
            let command = update(&mut self.state, message);
            let exit = self.perform(command).await;

            let notices = self.state.take_notices();
            observer(&self.state, &notices);

            if exit {
                break;
            }
        }
        self.shutdown().await;
        info!("desk stopped");
        self.state
    }

    async fn perform(&mut self, command: Command) -> bool {
        let mut exit = false;
        for command in command.flatten() {
            match command {
                Command::None | Command::Batch(_) => {}
                Command::LoadMessengers => {
                    let api = self.api.clone();
                    self.spawn(async move {
                        Message::MessengersLoaded(
                            api.list_messengers()
                                .await
                                .map_err(|err| err.to_string()),
                        )
                    });
                }
                Command::Submit(request) => {
                    let submitter = self.submitter.clone();
                    self.spawn(async move {
                        Message::SubmitFinished(
                            submitter
                                .send(request)
                                .await
                                .map_err(|err| err.to_string()),
                        )
                    });
                }
                Command::RefreshToday => {
                    let api = self.api.clone();
                    self.spawn(async move {
                        Message::TodayLoaded(
                            api.today_dispatches()
                                .await
                                .map_err(|err| err.to_string()),
                        )
                    });
                }
                Command::RefreshReport(date) => {
                    let api = self.api.clone();
                    self.spawn(async move {
                        Message::ReportLoaded(
                            api.daily_report(date)
                                .await
                                .map_err(|err| err.to_string()),
                        )
                    });
                }
                Command::StartCamera => {
                    let reply = self.start_camera().await;
                    self.post(reply);
                }
                Command::StopCamera => {
                    if let Some(camera) = self.camera.as_mut()
                        && let Err(err) = camera.stop_scanning().await
                    {
                        debug!(error = %err, "camera stop ignored");
                    }
                    self.post(Message::ScannerStopped);
                }
                Command::Exit => exit = true,
            }
        }
        exit
    }

    async fn start_camera(&mut self) -> Message {
        let Some(camera) = self.camera.as_mut() else {
            return Message::ScannerFailed("no camera decoder configured".into());
        };
        match camera.start_scanning(self.tx.clone(), Message::from).await {
            Ok(()) => Message::ScannerStarted,
            // Only reachable when a previous session is still pumping.
            Err(DecoderError::AlreadyScanning) => Message::ScannerStarted,
            Err(err) => {
                warn!(error = %err, "camera failed to start");
                Message::ScannerFailed(err.to_string())
            }
        }
    }

    fn spawn<Fut>(&self, work: Fut)
    where
        Fut: Future<Output = Message> + Send + 'static,
    {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            // The desk may have shut down while the call was in flight.
            let _ = tx.send(work.await);
        });
    }

    fn post(&self, message: Message) {
        let _ = self.tx.send(message);
    }

    async fn shutdown(&mut self) {
        self.state.wedge.deactivate();
        if let Some(camera) = self.camera.as_mut()
            && camera.is_scanning()
        {
            let _ = camera.stop_scanning().await;
        }
    }
}
