//! The desk: one state object, a pure `update` function and the event loop
//! that feeds it.

pub mod messages;
pub mod notice;
pub mod runtime;
pub mod update;

use std::collections::VecDeque;

use carddesk_model::{
    DailyReport, DispatchSummary, Messenger, MessengerId, ReportDate,
};

use crate::batch::ScanBatch;
use crate::dispatch::DispatchConfirmation;
use crate::scan::WedgeListener;

pub use messages::{CodeSource, Command, Message};
pub use notice::{Notice, NoticeLevel};
pub use runtime::{DeskHandle, DeskRuntime};
pub use update::update;

/// Lifecycle of the in-progress dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPhase {
    Empty,
    Accumulating,
    Submitting,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScannerStatus {
    #[default]
    Idle,
    /// Start requested, waiting for the device.
    Starting,
    Active,
}

/// Everything the operator sees and acts on.
#[derive(Debug, Default)]
pub struct DeskState {
    pub messengers: Vec<Messenger>,
    pub selected_courier: Option<MessengerId>,
    pub batch: ScanBatch,
    /// Bare card numbers waiting for a client label, oldest first.
    pub pending_labels: VecDeque<String>,
    pub submitting: bool,
    pub scanner: ScannerStatus,
    pub wedge: WedgeListener,
    pub notices: VecDeque<Notice>,
    pub today: Vec<DispatchSummary>,
    /// Bumped on every successful load of `today`.
    pub today_generation: u64,
    pub report: Option<DailyReport>,
    /// Bumped on every successful load of `report`.
    pub report_generation: u64,
    pub report_date: ReportDate,
    pub last_confirmation: Option<DispatchConfirmation>,
    /// Last [`Message::Checkpoint`] handled.
    pub checkpoint: u64,
}

impl DeskState {
    pub fn new(batch: ScanBatch) -> Self {
        Self {
            batch,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> BatchPhase {
        if self.submitting {
            BatchPhase::Submitting
        } else if self.batch.is_empty() {
            BatchPhase::Empty
        } else {
            BatchPhase::Accumulating
        }
    }

    /// Card the label prompt is currently asking about.
    pub fn awaiting_label(&self) -> Option<&str> {
        self.pending_labels.front().map(String::as_str)
    }

    pub fn selected_messenger(&self) -> Option<&Messenger> {
        let id = self.selected_courier.as_ref()?;
        self.messengers.iter().find(|m| &m.id == id)
    }

    pub fn is_scanning(&self) -> bool {
        self.scanner != ScannerStatus::Idle
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }
}
