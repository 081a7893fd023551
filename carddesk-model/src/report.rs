use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    error::ModelError,
    ids::{DispatchId, MessengerId},
    item::ScannedItem,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Calendar day a report or dispatch listing covers, rendered `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReportDate(NaiveDate);

impl ReportDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Today in UTC, which is the day the backend files new dispatches under.
    pub fn today() -> Self {
        Self(Utc::now().date_naive())
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl Default for ReportDate {
    fn default() -> Self {
        Self::today()
    }
}

impl fmt::Display for ReportDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for ReportDate {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .map(ReportDate)
            .map_err(|_| ModelError::InvalidDate(s.to_string()))
    }
}

impl Serialize for ReportDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReportDate {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Per-day totals grouped by courier (`GET /reports/daily`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<ReportDate>,
    pub total_cards: u32,
    pub total_dispatches: u32,
    pub total_messengers: u32,
    #[serde(default)]
    pub messengers: BTreeMap<MessengerId, MessengerReport>,
}

impl DailyReport {
    /// Courier sections ordered by name, for stable rendering.
    pub fn by_name(&self) -> Vec<(&MessengerId, &MessengerReport)> {
        let mut sections: Vec<_> = self.messengers.iter().collect();
        sections.sort_by(|a, b| a.1.messenger_name.cmp(&b.1.messenger_name));
        sections
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessengerReport {
    pub messenger_name: String,
    #[serde(default)]
    pub messenger_contact: String,
    pub total_cards: u32,
    #[serde(default)]
    pub dispatches: Vec<ReportDispatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDispatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DispatchId>,
    pub time: DateTime<Utc>,
    pub cards: u32,
    #[serde(default)]
    pub items: Vec<ScannedItem>,
}
