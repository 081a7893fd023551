//! Plain-text views of desk data.

use std::fmt::Write;

use carddesk_core::desk::Notice;
use carddesk_model::{
    DailyReport, Dispatch, DispatchSummary, Messenger, ScannedItem,
};
use chrono::{DateTime, Local, Utc};

fn clock(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}

pub fn messengers(list: &[Messenger]) -> String {
    if list.is_empty() {
        return "No messengers registered.\n".to_string();
    }
    let mut out = String::new();
    for messenger in list {
        let _ = writeln!(
            out,
            "{:<38} {:<24} {}",
            messenger.id, messenger.name, messenger.contact_number
        );
    }
    out
}

/// Numbered batch listing; positions are 1-based, matching `:rm`.
pub fn batch(items: &[ScannedItem], courier: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Dispatch for {}: {} card(s)",
        courier.unwrap_or("(no messenger selected)"),
        items.len()
    );
    for (position, item) in items.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {:<24} {}",
            position + 1,
            item.card_number,
            item.client_name
        );
    }
    out
}

pub fn today(dispatches: &[DispatchSummary]) -> String {
    if dispatches.is_empty() {
        return "No dispatches today.\n".to_string();
    }
    let total: u32 = dispatches.iter().map(|d| d.total_cards).sum();
    let mut out = String::new();
    for dispatch in dispatches {
        let _ = writeln!(
            out,
            "{}  {:<24} {:>4} card(s)",
            clock(&dispatch.created_at),
            dispatch.messenger_name,
            dispatch.total_cards
        );
    }
    let _ = writeln!(out, "{} dispatch(es), {total} card(s)", dispatches.len());
    out
}

pub fn dispatches(list: &[Dispatch]) -> String {
    if list.is_empty() {
        return "No matching dispatches.\n".to_string();
    }
    let mut out = String::new();
    for dispatch in list {
        let _ = writeln!(
            out,
            "{} {}  {:<24} {:>4} card(s)",
            dispatch.created_at.with_timezone(&Local).format("%Y-%m-%d"),
            clock(&dispatch.created_at),
            dispatch.messenger_name,
            dispatch.total_cards
        );
        for item in &dispatch.items {
            let _ = writeln!(
                out,
                "        {:<24} {}",
                item.card_number, item.client_name
            );
        }
    }
    out
}

pub fn report(report: &DailyReport) -> String {
    let mut out = String::new();
    if let Some(date) = report.date {
        let _ = writeln!(out, "Report for {date}");
    }
    let _ = writeln!(
        out,
        "{} card(s) in {} dispatch(es) by {} messenger(s)",
        report.total_cards, report.total_dispatches, report.total_messengers
    );
    for (_, section) in report.by_name() {
        let _ = writeln!(
            out,
            "\n{} ({}): {} card(s)",
            section.messenger_name,
            section.messenger_contact,
            section.total_cards
        );
        for dispatch in &section.dispatches {
            let _ = writeln!(
                out,
                "  {}  {:>4} card(s)",
                clock(&dispatch.time),
                dispatch.cards
            );
        }
    }
    out
}

pub fn notice(notice: &Notice) -> String {
    notice.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use carddesk_model::{MessengerId, MessengerReport};
    use std::collections::BTreeMap;

    #[test]
    fn batch_positions_are_one_based() {
        let items =
            vec![ScannedItem::new("111", "Ana"), ScannedItem::new("222", "Bea")];
        let text = batch(&items, Some("Cleo"));
        assert!(text.starts_with("Dispatch for Cleo: 2 card(s)"));
        assert!(text.contains("  1. 111"));
        assert!(text.contains("  2. 222"));
    }

    #[test]
    fn empty_views_say_so() {
        assert_eq!(today(&[]), "No dispatches today.\n");
        assert_eq!(messengers(&[]), "No messengers registered.\n");
        assert!(batch(&[], None).contains("(no messenger selected)"));
    }

    #[test]
    fn report_sections_are_sorted_by_name() {
        let section = |name: &str, cards| MessengerReport {
            messenger_name: name.into(),
            messenger_contact: "555".into(),
            total_cards: cards,
            dispatches: Vec::new(),
        };
        let daily = DailyReport {
            date: Some("2024-03-09".parse().unwrap()),
            total_cards: 5,
            total_dispatches: 2,
            total_messengers: 2,
            messengers: BTreeMap::from([
                (MessengerId::new("a").unwrap(), section("Zoe", 3)),
                (MessengerId::new("b").unwrap(), section("Ana", 2)),
            ]),
        };
        let text = report(&daily);
        assert!(text.starts_with("Report for 2024-03-09"));
        let ana = text.find("Ana").unwrap();
        let zoe = text.find("Zoe").unwrap();
        assert!(ana < zoe);
    }
}
