//! Camera decoder boundary.
//!
//! Barcode recognition itself happens in an external component; the desk
//! only sees a stream of decoded strings. A [`CameraSession`] owns the
//! capture device for as long as it scans and refuses a second concurrent
//! start.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::DecoderError;

pub type CodeStream = BoxStream<'static, String>;

/// A source of decoded barcodes, typically a camera plus recognizer.
#[async_trait]
pub trait CodeDecoder: Send {
    /// Acquire the device and start emitting decoded codes.
    async fn start(&mut self) -> Result<CodeStream, DecoderError>;

    /// Release the device. Called after the stream has been dropped.
    async fn stop(&mut self);
}

/// What a running session reports back to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraEvent {
    Detected(String),
    /// The decoder closed its stream on its own.
    FeedEnded,
}

/// Exclusive owner of one [`CodeDecoder`].
pub struct CameraSession {
    decoder: Box<dyn CodeDecoder>,
    pump: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for CameraSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSession")
            .field("scanning", &self.is_scanning())
            .finish()
    }
}

impl CameraSession {
    pub fn new(decoder: impl CodeDecoder + 'static) -> Self {
        Self {
            decoder: Box::new(decoder),
            pump: None,
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.pump.as_ref().is_some_and(|pump| !pump.is_finished())
    }

    /// Start the decoder and forward its codes into `sink`.
    ///
    /// Fails with [`DecoderError::AlreadyScanning`] while a session is
    /// running; the running session is left untouched.
    pub async fn start_scanning<M, F>(
        &mut self,
        sink: mpsc::UnboundedSender<M>,
        wrap: F,
    ) -> Result<(), DecoderError>
    where
        M: Send + 'static,
        F: Fn(CameraEvent) -> M + Send + 'static,
    {
        if self.is_scanning() {
            return Err(DecoderError::AlreadyScanning);
        }
        if self.pump.take().is_some() {
            // Previous feed ended by itself; release it before reacquiring.
            self.decoder.stop().await;
        }

        let mut codes = self.decoder.start().await?;
        info!("camera scanning started");

        self.pump = Some(tokio::spawn(async move {
            while let Some(code) = codes.next().await {
                let code = code.trim().to_string();
                if code.is_empty() {
                    continue;
                }
                debug!(code = %code, "camera code decoded");
                if sink.send(wrap(CameraEvent::Detected(code))).is_err() {
                    return;
                }
            }
            debug!("camera feed ended");
            let _ = sink.send(wrap(CameraEvent::FeedEnded));
        }));
        Ok(())
    }

    pub async fn stop_scanning(&mut self) -> Result<(), DecoderError> {
        let Some(pump) = self.pump.take() else {
            return Err(DecoderError::NotScanning);
        };
        pump.abort();
        self.decoder.stop().await;
        info!("camera scanning stopped");
        Ok(())
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
    }
}

/// Reads codes, one per line, from a file or FIFO written by an external
/// recognizer process. The session ends when the writer closes the feed.
#[derive(Debug, Clone)]
pub struct LineFeedDecoder {
    path: PathBuf,
}

impl LineFeedDecoder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CodeDecoder for LineFeedDecoder {
    async fn start(&mut self) -> Result<CodeStream, DecoderError> {
        let file = tokio::fs::File::open(&self.path).await.map_err(|err| {
            DecoderError::Unavailable(format!(
                "cannot open feed {}: {err}",
                self.path.display()
            ))
        })?;

        let lines = BufReader::new(file).lines();
        let path = self.path.clone();
        let stream = futures::stream::unfold(lines, move |mut lines| {
            let path = path.clone();
            async move {
                match lines.next_line().await {
                    Ok(Some(line)) => Some((line, lines)),
                    Ok(None) => None,
                    Err(err) => {
                        warn!(feed = %path.display(), error = %err, "camera feed read failed");
                        None
                    }
                }
            }
        });
        Ok(stream.boxed())
    }

    async fn stop(&mut self) {}
}
