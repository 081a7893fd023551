//! Interactive dispatch session.
//!
//! Stdin stands in for the keyboard wedge: every plain line is replayed as
//! keystrokes plus Enter, on the same channel as every other desk message.
//! Lines starting with `:` are operator commands. While a card waits for its
//! client, the desk takes the next typed line as that client.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use carddesk_core::config::DeskConfig;
use carddesk_core::desk::{DeskHandle, DeskRuntime, DeskState, Message};
use carddesk_core::infra::BackendApi;
use carddesk_core::scan::{CameraSession, LineFeedDecoder, TerminalBell};
use carddesk_core::ScanBatch;
use carddesk_model::{
    DailyReport, DispatchSummary, Messenger, MessengerId, ReportDate,
    ScannedItem,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{debug, info};

use super::render;

pub const HELP: &str = "\
Scan a card, or type it and press Enter. CARD|CLIENT adds both at once.

  :courier <id>        select the messenger (no id clears the choice)
  :couriers            list messengers
  :reload              reload messengers from the backend
  :add <card> <client> add a card by hand
  :rm <n>              remove card number n of the list
  :list                show the current dispatch
  :clear               discard the current dispatch
  :submit              send the dispatch
  :skip                discard the card waiting for its client
  :camera on|off       start or stop the camera feed
  :wedge on|off        attach or detach the scanner listener
  :today               refresh today's dispatches
  :report [YYYY-MM-DD] load the daily report
  :help                this text
  :quit                leave
";

/// Panels the session can print on request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Batch,
    Couriers,
}

/// One line of operator input, classified.
#[derive(Debug, Clone)]
pub enum SessionInput {
    /// Replay as wedge keystrokes.
    Scan(String),
    /// Send straight to the desk.
    Desk(Message),
    Show(View),
    Help,
    Quit,
    Empty,
}

/// Classify `line`.
pub fn parse_line(line: &str) -> Result<SessionInput, String> {
    let line = line.trim();
    let Some(command) = line.strip_prefix(':') else {
        if line.is_empty() {
            return Ok(SessionInput::Empty);
        }
        return Ok(SessionInput::Scan(line.to_string()));
    };

    let mut words = command.split_whitespace();
    let name = words.next().unwrap_or_default();
    let rest: Vec<&str> = words.collect();

    let input = match (name, rest.as_slice()) {
        ("courier", []) => SessionInput::Desk(Message::SelectCourier(None)),
        ("courier", [id]) => {
            let id = MessengerId::new(*id).map_err(|err| err.to_string())?;
            SessionInput::Desk(Message::SelectCourier(Some(id)))
        }
        ("couriers", []) => SessionInput::Show(View::Couriers),
        ("reload", []) => SessionInput::Desk(Message::LoadMessengers),
        ("add", [card, client @ ..]) if !client.is_empty() => {
            SessionInput::Desk(Message::ManualAdd {
                card_number: card.to_string(),
                client_name: client.join(" "),
            })
        }
        ("rm", [position]) => {
            let position: usize = position
                .parse()
                .ok()
                .filter(|p| *p > 0)
                .ok_or_else(|| format!("not a list position: {position}"))?;
            SessionInput::Desk(Message::RemoveItem(position - 1))
        }
        ("list", []) => SessionInput::Show(View::Batch),
        ("clear", []) => SessionInput::Desk(Message::ClearBatch),
        ("submit", []) => SessionInput::Desk(Message::Submit),
        ("skip", []) => SessionInput::Desk(Message::LabelCancelled),
        ("camera", ["on"]) => SessionInput::Desk(Message::StartScanning),
        ("camera", ["off"]) => SessionInput::Desk(Message::StopScanning),
        ("wedge", ["on"]) => SessionInput::Desk(Message::EnableWedge),
        ("wedge", ["off"]) => SessionInput::Desk(Message::DisableWedge),
        ("today", []) => SessionInput::Desk(Message::RefreshToday),
        ("report", []) => SessionInput::Desk(Message::RefreshReport(None)),
        ("report", [date]) => {
            let date: ReportDate =
                date.parse().map_err(|err: carddesk_model::ModelError| {
                    err.to_string()
                })?;
            SessionInput::Desk(Message::RefreshReport(Some(date)))
        }
        ("help", []) => SessionInput::Help,
        ("quit" | "q" | "exit", []) => SessionInput::Quit,
        _ => return Err(format!("unknown command ':{command}', try :help")),
    };
    Ok(input)
}

/// What the input side needs to know about the desk.
#[derive(Debug, Clone, Default)]
struct SessionView {
    checkpoint: u64,
    items: Arc<[ScannedItem]>,
    courier: Option<String>,
    messengers: Vec<Messenger>,
}

impl SessionView {
    fn from_state(state: &DeskState) -> Self {
        Self {
            checkpoint: state.checkpoint,
            items: state.batch.items(),
            courier: state.selected_messenger().map(|m| m.name.clone()).or_else(
                || state.selected_courier.as_ref().map(|id| id.to_string()),
            ),
            messengers: state.messengers.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub courier: Option<MessengerId>,
    pub camera_feed: Option<PathBuf>,
}

/// Run the interactive desk until `:quit` or end of input.
pub async fn run(
    config: &DeskConfig,
    api: Arc<dyn BackendApi>,
    options: SessionOptions,
) -> anyhow::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let state = drive(config, api, options, stdin).await;
    if !state.batch.is_empty() {
        println!("{} unsent card(s) discarded", state.batch.len());
    }
    Ok(())
}

async fn drive<R>(
    config: &DeskConfig,
    api: Arc<dyn BackendApi>,
    options: SessionOptions,
    input: R,
) -> DeskState
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let batch = if config.audible_confirmation {
        ScanBatch::with_cue(Arc::new(TerminalBell))
    } else {
        ScanBatch::new()
    };

    let mut runtime = DeskRuntime::new(api, batch);
    let feed = options.camera_feed.or_else(|| config.camera_feed.clone());
    if let Some(feed) = feed {
        info!(feed = %feed.display(), "camera feed configured");
        let camera = CameraSession::new(LineFeedDecoder::new(feed));
        runtime = runtime.with_camera(camera);
    }
    let handle = runtime.handle();

    // Queued ahead of any operator input, so the first scan already finds
    // the wedge attached.
    handle.send(Message::EnableWedge);
    handle.send(Message::LoadMessengers);
    handle.send(Message::RefreshToday);
    if let Some(courier) = options.courier {
        handle.send(Message::SelectCourier(Some(courier)));
    }

    println!("{HELP}");

    let (view_tx, view_rx) = watch::channel(SessionView::default());
    let reader = tokio::spawn(read_input(input, handle, view_rx));

    let mut seen_today = 0;
    let mut seen_report = 0;
    let mut prompted: Option<String> = None;
    let state = runtime
        .run(move |state, notices| {
            for notice in notices {
                println!("{}", render::notice(notice));
            }
            if state.today_generation != seen_today {
                seen_today = state.today_generation;
                print!("{}", today_panel(&state.today));
            }
            if state.report_generation != seen_report {
                seen_report = state.report_generation;
                if let Some(report) = &state.report {
                    print!("{}", report_panel(report));
                }
            }
            if let Some(prompt) =
                label_prompt(&mut prompted, state.awaiting_label())
            {
                println!("{prompt}");
            }
            view_tx.send_replace(SessionView::from_state(state));
        })
        .await;

    reader.abort();
    state
}

async fn read_input<R>(
    input: R,
    handle: DeskHandle,
    mut view_rx: watch::Receiver<SessionView>,
) where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut marks = 0;
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                debug!(error = %err, "input closed");
                break;
            }
        };
        let delivered = match parse_line(&line) {
            Ok(SessionInput::Scan(code)) => handle.type_line(&code),
            Ok(SessionInput::Desk(message)) => handle.send(message),
            Ok(SessionInput::Show(which)) => {
                // Render only once the desk has caught up with everything
                // typed before.
                marks += 1;
                handle.send(Message::Checkpoint(marks));
                let caught_up =
                    view_rx.wait_for(|v| v.checkpoint >= marks).await;
                let shown = match caught_up {
                    Ok(view) => show(&view, which),
                    Err(_) => break,
                };
                print!("{shown}");
                true
            }
            Ok(SessionInput::Help) => {
                println!("{HELP}");
                true
            }
            Ok(SessionInput::Quit) => break,
            Ok(SessionInput::Empty) => true,
            Err(err) => {
                eprintln!("{err}");
                true
            }
        };
        if !delivered {
            debug!("desk stopped, input no longer read");
            return;
        }
    }
    handle.send(Message::Shutdown);
}

/// Prompt line for the card awaiting its client, only when that card changed
/// since the last call.
fn label_prompt(
    prompted: &mut Option<String>,
    awaiting: Option<&str>,
) -> Option<String> {
    if awaiting == prompted.as_deref() {
        return None;
    }
    *prompted = awaiting.map(str::to_string);
    awaiting.map(|card| format!("client for card {card}:"))
}

fn show(view: &SessionView, which: View) -> String {
    match which {
        View::Batch => render::batch(&view.items, view.courier.as_deref()),
        View::Couriers => render::messengers(&view.messengers),
    }
}

fn today_panel(today: &[DispatchSummary]) -> String {
    format!("-- today --\n{}", render::today(today))
}

fn report_panel(report: &DailyReport) -> String {
    format!("-- report --\n{}", render::report(report))
}

/// Resolve the courier option given on the command line.
pub fn courier_arg(raw: Option<&str>) -> anyhow::Result<Option<MessengerId>> {
    raw.map(|raw| MessengerId::new(raw).context("invalid --messenger"))
        .transpose()
}
