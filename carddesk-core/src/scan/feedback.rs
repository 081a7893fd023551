use std::io::Write;

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
#[error("confirmation cue unavailable: {0}")]
pub struct CueError(#[from] pub std::io::Error);

/// Short audible confirmation played when a card is accepted.
pub trait ConfirmationCue: Send + Sync {
    fn play(&self) -> Result<(), CueError>;
}

/// Rings the terminal bell on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl ConfirmationCue for TerminalBell {
    fn play(&self) -> Result<(), CueError> {
        let mut stderr = std::io::stderr().lock();
        stderr.write_all(b"\x07")?;
        stderr.flush()?;
        Ok(())
    }
}

/// Plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl ConfirmationCue for Silent {
    fn play(&self) -> Result<(), CueError> {
        Ok(())
    }
}

/// Fire-and-forget: a cue that fails is logged and otherwise ignored.
pub(crate) fn play_best_effort(cue: &dyn ConfirmationCue) {
    if let Err(err) = cue.play() {
        debug!(error = %err, "confirmation cue failed");
    }
}
