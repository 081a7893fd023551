//! Desk messages and the commands `update` hands back to the runtime.

use carddesk_model::{
    CreateDispatchRequest, DailyReport, DispatchSummary, Messenger,
    MessengerId, ReportDate,
};

use crate::dispatch::DispatchConfirmation;
use crate::scan::{CameraEvent, KeyEvent};

/// Where a decoded code came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeSource {
    Keyboard,
    Camera,
}

/// Everything that can happen to the desk.
///
/// Failures of background work arrive as display strings; the typed error
/// has already been logged where it happened.
#[derive(Debug, Clone)]
pub enum Message {
    // Operator actions
    /// Fetch the courier list
    LoadMessengers,
    /// Choose the courier of the next dispatch, or clear the choice
    SelectCourier(Option<MessengerId>),
    /// Answer to the pending client-label prompt
    LabelEntered(String),
    /// Drop the card waiting for its label
    LabelCancelled,
    /// Add a card by hand
    ManualAdd {
        card_number: String,
        client_name: String,
    },
    /// Remove the card at a zero-based position
    RemoveItem(usize),
    /// Discard the whole batch
    ClearBatch,
    Submit,
    StartScanning,
    StopScanning,
    /// Attach the keyboard-wedge listener
    EnableWedge,
    DisableWedge,
    RefreshToday,
    /// Load the report of a day (today when `None`)
    RefreshReport(Option<ReportDate>),
    Shutdown,
    /// Marker stored in `DeskState::checkpoint` when handled. Messages run
    /// in order, so everything queued before it has been handled too
    Checkpoint(u64),

    // Scanner input
    /// One key press from the keyboard wedge
    Key(KeyEvent),
    CodeDecoded {
        code: String,
        source: CodeSource,
    },
    ScannerStarted,
    ScannerStopped,
    ScannerFailed(String),
    CameraFeedEnded,

    // Backend results
    MessengersLoaded(Result<Vec<Messenger>, String>),
    SubmitFinished(Result<DispatchConfirmation, String>),
    TodayLoaded(Result<Vec<DispatchSummary>, String>),
    ReportLoaded(Result<DailyReport, String>),
}

impl Message {
    pub fn keyboard_code(code: impl Into<String>) -> Self {
        Message::CodeDecoded {
            code: code.into(),
            source: CodeSource::Keyboard,
        }
    }
}

impl From<CameraEvent> for Message {
    fn from(event: CameraEvent) -> Self {
        match event {
            CameraEvent::Detected(code) => Message::CodeDecoded {
                code,
                source: CodeSource::Camera,
            },
            CameraEvent::FeedEnded => Message::CameraFeedEnded,
        }
    }
}

/// Side effects requested by `update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    None,
    Batch(Vec<Command>),
    LoadMessengers,
    Submit(CreateDispatchRequest),
    RefreshToday,
    RefreshReport(ReportDate),
    StartCamera,
    StopCamera,
    Exit,
}

impl Command {
    pub fn batch(commands: impl IntoIterator<Item = Command>) -> Self {
        let commands: Vec<_> = commands
            .into_iter()
            .filter(|command| !matches!(command, Command::None))
            .collect();
        match commands.len() {
            0 => Command::None,
            _ => Command::Batch(commands),
        }
    }

    /// Leaf commands in execution order.
    pub fn flatten(self) -> Vec<Command> {
        match self {
            Command::None => Vec::new(),
            Command::Batch(commands) => {
                commands.into_iter().flat_map(Command::flatten).collect()
            }
            leaf => vec![leaf],
        }
    }
}
