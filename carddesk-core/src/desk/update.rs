//! Desk update logic

use tracing::{debug, info, warn};

use super::messages::{CodeSource, Command, Message};
use super::notice::Notice;
use super::{DeskState, ScannerStatus};
use crate::dispatch::DispatchSubmitter;
use crate::error::BatchError;
use crate::scan::{KeyEvent, ScannedCode};

const SUBMITTING: &str = "a dispatch is being submitted, please wait";

/// Apply `message` to `state` and return the follow-up work.
pub fn update(state: &mut DeskState, message: Message) -> Command {
    match message {
        Message::LoadMessengers => Command::LoadMessengers,

        Message::MessengersLoaded(Ok(messengers)) => {
            debug!(count = messengers.len(), "messengers loaded");
            state.messengers = messengers;
            if state.selected_courier.is_some()
                && state.selected_messenger().is_none()
            {
                state.selected_courier = None;
                state.notify(Notice::warning(
                    "selected messenger no longer exists",
                ));
            }
            Command::None
        }

        Message::MessengersLoaded(Err(err)) => {
            state.notify(Notice::error(format!(
                "could not load messengers: {err}"
            )));
            Command::None
        }

        Message::SelectCourier(choice) => {
            if state.submitting {
                state.notify(Notice::warning(SUBMITTING));
                return Command::None;
            }
            match choice {
                Some(id)
                    if !state.messengers.is_empty()
                        && !state.messengers.iter().any(|m| m.id == id) =>
                {
                    state.notify(Notice::warning(format!(
                        "unknown messenger {id}"
                    )));
                }
                Some(id) => {
                    let name = state
                        .messengers
                        .iter()
                        .find(|m| m.id == id)
                        .map(|m| m.name.clone())
                        .unwrap_or_else(|| id.to_string());
                    state.selected_courier = Some(id);
                    state.notify(Notice::info(format!(
                        "dispatching with {name}"
                    )));
                }
                None => state.selected_courier = None,
            }
            Command::None
        }

        Message::Key(key) => {
            match state.wedge.feed(key) {
                Ok(Some(code)) => {
                    handle_decoded(state, &code, CodeSource::Keyboard)
                }
                Ok(None) => {}
                // One notice per line, not per character.
                Err(err) if key == KeyEvent::Enter => {
                    state.notify(Notice::warning(format!(
                        "{err}, input ignored"
                    )));
                }
                Err(_) => {}
            }
            Command::None
        }

        Message::CodeDecoded { code, source } => {
            handle_decoded(state, &code, source);
            Command::None
        }

        Message::LabelEntered(label) => {
            handle_label(state, &label);
            Command::None
        }

        Message::LabelCancelled => {
            if let Some(card) = state.pending_labels.pop_front() {
                state.notify(Notice::info(format!("card {card} discarded")));
            }
            Command::None
        }

        Message::ManualAdd {
            card_number,
            client_name,
        } => {
            if state.submitting {
                state.notify(Notice::warning(SUBMITTING));
                return Command::None;
            }
            let card = card_number.trim().to_string();
            match state.batch.submit_code(&card, &client_name) {
                Ok(()) => added(state, &card),
                Err(err) => rejected(state, &err),
            }
            Command::None
        }

        Message::RemoveItem(index) => {
            if state.submitting {
                state.notify(Notice::warning(SUBMITTING));
                return Command::None;
            }
            match state.batch.remove_at(index) {
                Ok(item) => state.notify(Notice::info(format!(
                    "card {} removed",
                    item.card_number
                ))),
                Err(err) => rejected(state, &err),
            }
            Command::None
        }

        Message::ClearBatch => {
            if state.submitting {
                state.notify(Notice::warning(SUBMITTING));
                return Command::None;
            }
            state.batch.clear();
            state.pending_labels.clear();
            state.notify(Notice::info("dispatch cleared"));
            Command::None
        }

        Message::Submit => {
            if state.submitting {
                state.notify(Notice::warning(
                    "this dispatch is already being submitted",
                ));
                return Command::None;
            }
            match DispatchSubmitter::prepare(
                state.selected_courier.as_ref(),
                &state.batch,
            ) {
                Ok(request) => {
                    info!(
                        messenger_id = %request.messenger_id,
                        items = request.items.len(),
                        "submitting dispatch"
                    );
                    state.submitting = true;
                    Command::Submit(request)
                }
                Err(err) => {
                    state.notify(Notice::error(err.to_string()));
                    Command::None
                }
            }
        }

        Message::SubmitFinished(Ok(confirmation)) => {
            state.submitting = false;
            state.batch.clear();
            state.selected_courier = None;
            state.notify(Notice::success(format!(
                "dispatch created for {} with {} card(s)",
                confirmation.messenger_name, confirmation.item_count
            )));
            state.last_confirmation = Some(confirmation);
            Command::batch([
                Command::RefreshToday,
                Command::RefreshReport(state.report_date),
            ])
        }

        Message::SubmitFinished(Err(err)) => {
            state.submitting = false;
            state.notify(Notice::error(format!(
                "dispatch was not created: {err}"
            )));
            Command::None
        }

        Message::StartScanning => {
            if state.selected_courier.is_none() {
                state.notify(Notice::warning(
                    "select a messenger before scanning",
                ));
                return Command::None;
            }
            if state.scanner != ScannerStatus::Idle {
                debug!(status = ?state.scanner, "scanner already running");
                return Command::None;
            }
            state.scanner = ScannerStatus::Starting;
            Command::StartCamera
        }

        Message::ScannerStarted => {
            state.scanner = ScannerStatus::Active;
            state.notify(Notice::info("camera scanning"));
            Command::None
        }

        Message::ScannerFailed(err) => {
            state.scanner = ScannerStatus::Idle;
            state.notify(Notice::error(format!("camera unavailable: {err}")));
            Command::None
        }

        Message::StopScanning => {
            if state.scanner == ScannerStatus::Idle {
                return Command::None;
            }
            Command::StopCamera
        }

        Message::ScannerStopped => {
            state.scanner = ScannerStatus::Idle;
            state.notify(Notice::info("camera stopped"));
            Command::None
        }

        Message::CameraFeedEnded => {
            state.scanner = ScannerStatus::Idle;
            state.notify(Notice::info("camera feed ended"));
            Command::None
        }

        Message::EnableWedge => {
            if state.wedge.activate() {
                state.notify(Notice::info("keyboard scanner attached"));
            }
            Command::None
        }

        Message::DisableWedge => {
            if state.wedge.deactivate() {
                state.notify(Notice::info("keyboard scanner detached"));
            }
            Command::None
        }

        Message::RefreshToday => Command::RefreshToday,

        Message::TodayLoaded(Ok(today)) => {
            state.today = today;
            state.today_generation += 1;
            Command::None
        }

        Message::TodayLoaded(Err(err)) => {
            state.notify(Notice::error(format!(
                "could not load today's dispatches: {err}"
            )));
            Command::None
        }

        Message::RefreshReport(date) => {
            if let Some(date) = date {
                state.report_date = date;
            }
            Command::RefreshReport(state.report_date)
        }

        Message::ReportLoaded(Ok(report)) => {
            state.report = Some(report);
            state.report_generation += 1;
            Command::None
        }

        Message::ReportLoaded(Err(err)) => {
            state.notify(Notice::error(format!(
                "could not load report: {err}"
            )));
            Command::None
        }

        Message::Checkpoint(mark) => {
            state.checkpoint = mark;
            Command::None
        }

        Message::Shutdown => Command::Exit,
    }
}

/// Keyboard input typed while a card waits for its client answers that
/// prompt. Camera codes are always scans.
fn handle_decoded(state: &mut DeskState, code: &str, source: CodeSource) {
    if source == CodeSource::Keyboard && !state.pending_labels.is_empty() {
        handle_label(state, code);
    } else {
        handle_code(state, code, source);
    }
}

fn handle_code(state: &mut DeskState, raw: &str, source: CodeSource) {
    if state.submitting {
        warn!(?source, "scan ignored while submitting");
        state.notify(Notice::warning(SUBMITTING));
        return;
    }

    let Some(code) = ScannedCode::parse(raw) else {
        debug!(?source, raw, "ignoring code without card number");
        return;
    };

    let card = code.card_number().to_string();
    if state.batch.contains(&card)
        || state.pending_labels.iter().any(|pending| *pending == card)
    {
        rejected(
            state,
            &BatchError::DuplicateCard {
                card_number: card,
            },
        );
        return;
    }

    match code {
        ScannedCode::Labeled(item) => match state.batch.push_item(&item) {
            Ok(()) => added(state, &item.card_number),
            Err(err) => rejected(state, &err),
        },
        ScannedCode::NeedsLabel(card) => {
            state.notify(Notice::info(format!(
                "enter the client for card {card}"
            )));
            state.pending_labels.push_back(card);
        }
    }
}

fn handle_label(state: &mut DeskState, label: &str) {
    if state.submitting {
        state.notify(Notice::warning(SUBMITTING));
        return;
    }
    let Some(card) = state.pending_labels.front().cloned() else {
        state.notify(Notice::warning("no card is waiting for a client"));
        return;
    };

    match state.batch.submit_code(&card, label) {
        Ok(()) => {
            state.pending_labels.pop_front();
            added(state, &card);
        }
        // Keep asking for the same card.
        Err(BatchError::EmptyClientLabel) => {
            state.notify(Notice::warning(format!(
                "a client is required for card {card}"
            )));
        }
        Err(err) => {
            state.pending_labels.pop_front();
            rejected(state, &err);
        }
    }
}

fn added(state: &mut DeskState, card: &str) {
    let total = state.batch.len();
    state.notify(Notice::success(format!(
        "card {card} added ({total} in dispatch)"
    )));
}

fn rejected(state: &mut DeskState, err: &BatchError) {
    state.notify(Notice::error(err.to_string()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desk::{BatchPhase, NoticeLevel};
    use crate::dispatch::DispatchConfirmation;
    use carddesk_model::{
        DispatchId, Messenger, MessengerId, ReportDate, ScannedItem,
    };
    use chrono::Utc;

    fn m1() -> MessengerId {
        MessengerId::new("m1").unwrap()
    }

    fn messenger(id: &str, name: &str) -> Messenger {
        Messenger {
            id: MessengerId::new(id).unwrap(),
            name: name.into(),
            contact_number: "555-0100".into(),
            created_at: Utc::now(),
        }
    }

    fn code(raw: &str) -> Message {
        Message::keyboard_code(raw)
    }

    fn camera(raw: &str) -> Message {
        Message::CodeDecoded {
            code: raw.into(),
            source: CodeSource::Camera,
        }
    }

    fn type_line(state: &mut DeskState, line: &str) {
        for key in KeyEvent::typed(line) {
            update(state, Message::Key(key));
        }
    }

    fn last_level(state: &DeskState) -> Option<NoticeLevel> {
        state.notices.back().map(|n| n.level)
    }

    fn cards(state: &DeskState) -> Vec<String> {
        state
            .batch
            .iter()
            .map(|item| item.card_number.clone())
            .collect()
    }

    #[test]
    fn labeled_code_is_added_directly() {
        let mut state = DeskState::default();
        update(&mut state, code("4000-1|Ana"));
        assert_eq!(
            state.batch.items().to_vec(),
            vec![ScannedItem::new("4000-1", "Ana")]
        );
        assert_eq!(last_level(&state), Some(NoticeLevel::Success));
    }

    #[test]
    fn bare_code_waits_for_label() {
        let mut state = DeskState::default();
        update(&mut state, code("1234-5678"));
        assert!(state.batch.is_empty());
        assert_eq!(state.awaiting_label(), Some("1234-5678"));

        update(&mut state, Message::LabelEntered("  ".into()));
        assert_eq!(state.awaiting_label(), Some("1234-5678"));
        assert_eq!(last_level(&state), Some(NoticeLevel::Warning));

        update(&mut state, Message::LabelEntered("Ana".into()));
        assert_eq!(state.awaiting_label(), None);
        assert_eq!(cards(&state), ["1234-5678"]);
    }

    #[test]
    fn cancelled_label_discards_card() {
        let mut state = DeskState::default();
        update(&mut state, code("777"));
        update(&mut state, Message::LabelCancelled);
        assert!(state.pending_labels.is_empty());
        assert!(state.batch.is_empty());
    }

    #[test]
    fn camera_codes_queue_behind_an_open_prompt() {
        let mut state = DeskState::default();
        update(&mut state, camera("111"));
        update(&mut state, camera("222"));
        update(&mut state, Message::LabelEntered("A".into()));
        assert_eq!(state.awaiting_label(), Some("222"));
        update(&mut state, Message::LabelEntered("B".into()));
        assert_eq!(cards(&state), ["111", "222"]);
    }

    #[test]
    fn duplicate_scan_is_rejected_at_arrival() {
        let mut state = DeskState::default();
        update(&mut state, code("555|Ana"));
        update(&mut state, code("555"));
        assert!(state.pending_labels.is_empty());
        assert_eq!(state.batch.len(), 1);
        assert_eq!(last_level(&state), Some(NoticeLevel::Error));

        update(&mut state, camera("888"));
        update(&mut state, camera("888"));
        assert_eq!(state.pending_labels.len(), 1);
    }

    #[test]
    fn submit_without_courier_is_refused() {
        let mut state = DeskState::default();
        update(&mut state, code("1|a"));
        assert_eq!(update(&mut state, Message::Submit), Command::None);
        assert!(!state.submitting);
        assert_eq!(last_level(&state), Some(NoticeLevel::Error));
    }

    #[test]
    fn submit_with_empty_batch_is_refused() {
        let mut state = DeskState::default();
        update(&mut state, Message::SelectCourier(Some(m1())));
        assert_eq!(update(&mut state, Message::Submit), Command::None);
        assert_eq!(state.phase(), BatchPhase::Empty);
    }

    #[test]
    fn second_submit_while_in_flight_is_refused() {
        let mut state = DeskState::default();
        update(&mut state, Message::SelectCourier(Some(m1())));
        update(&mut state, code("1|a"));

        let first = update(&mut state, Message::Submit);
        assert!(matches!(first, Command::Submit(_)));
        assert_eq!(state.phase(), BatchPhase::Submitting);

        assert_eq!(update(&mut state, Message::Submit), Command::None);
        assert_eq!(last_level(&state), Some(NoticeLevel::Warning));
    }

    #[test]
    fn scans_are_refused_while_submitting() {
        let mut state = DeskState::default();
        update(&mut state, Message::SelectCourier(Some(m1())));
        update(&mut state, code("1|a"));
        update(&mut state, Message::Submit);

        update(&mut state, code("2|b"));
        update(&mut state, Message::RemoveItem(0));
        update(&mut state, Message::ClearBatch);
        assert_eq!(cards(&state), ["1"]);
    }

    #[test]
    fn success_clears_batch_and_courier_and_refreshes() {
        let mut state = DeskState::default();
        let date: ReportDate = "2024-03-09".parse().unwrap();
        state.report_date = date;
        update(&mut state, Message::SelectCourier(Some(m1())));
        update(&mut state, code("A1|x"));
        update(&mut state, code("A2|y"));
        let Command::Submit(request) = update(&mut state, Message::Submit)
        else {
            panic!("expected a submit command");
        };
        assert_eq!(request.messenger_id, m1());
        assert_eq!(request.items.len(), 2);

        let next = update(
            &mut state,
            Message::SubmitFinished(Ok(DispatchConfirmation {
                dispatch_id: DispatchId::new("d1").unwrap(),
                messenger_name: "Ana".into(),
                item_count: 2,
            })),
        );
        assert_eq!(
            next,
            Command::Batch(vec![
                Command::RefreshToday,
                Command::RefreshReport(date)
            ])
        );
        assert!(state.batch.is_empty());
        assert_eq!(state.selected_courier, None);
        assert_eq!(state.phase(), BatchPhase::Empty);
    }

    #[test]
    fn failure_keeps_batch_for_retry() {
        let mut state = DeskState::default();
        update(&mut state, Message::SelectCourier(Some(m1())));
        update(&mut state, code("X|x"));
        update(&mut state, Message::Submit);

        update(&mut state, Message::SubmitFinished(Err("status 500".into())));
        assert_eq!(cards(&state), ["X"]);
        assert_eq!(state.selected_courier, Some(m1()));
        assert_eq!(state.phase(), BatchPhase::Accumulating);
        assert!(matches!(
            update(&mut state, Message::Submit),
            Command::Submit(_)
        ));
    }

    #[test]
    fn unknown_courier_is_not_selected() {
        let mut state = DeskState::default();
        update(
            &mut state,
            Message::MessengersLoaded(Ok(vec![messenger("m1", "Ana")])),
        );
        update(
            &mut state,
            Message::SelectCourier(Some(MessengerId::new("m9").unwrap())),
        );
        assert_eq!(state.selected_courier, None);

        update(&mut state, Message::SelectCourier(Some(m1())));
        assert_eq!(
            state.selected_messenger().map(|m| m.name.as_str()),
            Some("Ana")
        );
    }

    #[test]
    fn scanning_requires_courier_and_starts_once() {
        let mut state = DeskState::default();
        assert_eq!(update(&mut state, Message::StartScanning), Command::None);

        update(&mut state, Message::SelectCourier(Some(m1())));
        assert_eq!(
            update(&mut state, Message::StartScanning),
            Command::StartCamera
        );
        assert_eq!(update(&mut state, Message::StartScanning), Command::None);

        update(&mut state, Message::ScannerStarted);
        assert_eq!(update(&mut state, Message::StartScanning), Command::None);
        assert_eq!(
            update(&mut state, Message::StopScanning),
            Command::StopCamera
        );
        update(&mut state, Message::ScannerStopped);
        assert!(!state.is_scanning());
    }

    #[test]
    fn wedge_attaches_once() {
        let mut state = DeskState::default();
        update(&mut state, Message::EnableWedge);
        update(&mut state, Message::EnableWedge);
        assert!(state.wedge.is_active());
        assert_eq!(state.take_notices().len(), 1);

        type_line(&mut state, "4000-1|Ana");
        assert_eq!(cards(&state), ["4000-1"]);
        assert!(state.pending_labels.is_empty());

        update(&mut state, Message::DisableWedge);
        update(&mut state, Message::DisableWedge);
        assert!(!state.wedge.is_active());
        assert_eq!(state.take_notices().len(), 2);
    }

    #[test]
    fn typed_label_answers_the_open_prompt() {
        let mut state = DeskState::default();
        update(&mut state, Message::EnableWedge);

        type_line(&mut state, "1234-5678");
        type_line(&mut state, "Ana");
        assert_eq!(
            state.batch.items().to_vec(),
            vec![ScannedItem::new("1234-5678", "Ana")]
        );
        assert!(state.pending_labels.is_empty());

        type_line(&mut state, "1234-5678");
        assert!(state.pending_labels.is_empty());
        assert_eq!(state.batch.len(), 1);
        assert_eq!(last_level(&state), Some(NoticeLevel::Error));
    }

    #[test]
    fn typed_input_while_detached_is_reported_once_per_line() {
        let mut state = DeskState::default();
        type_line(&mut state, "999|Bob");
        assert!(state.batch.is_empty());
        let notices = state.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
    }

    #[test]
    fn camera_code_during_prompt_is_a_new_scan() {
        let mut state = DeskState::default();
        update(&mut state, Message::EnableWedge);
        type_line(&mut state, "111");
        update(&mut state, camera("222|Bea"));
        type_line(&mut state, "Ana");
        assert_eq!(cards(&state), ["222", "111"]);
    }

    #[test]
    fn checkpoint_is_recorded() {
        let mut state = DeskState::default();
        update(&mut state, Message::Checkpoint(3));
        assert_eq!(state.checkpoint, 3);
    }
}
