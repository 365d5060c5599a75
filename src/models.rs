use serde::{Deserialize, Serialize};

/// The three reset cadences a counter can follow. Closed set; every
/// per-kind behavior is a `match` over these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Daily,
    Weekly,
    Monthly,
}

impl PeriodKind {
    pub const ALL: [PeriodKind; 3] = [PeriodKind::Daily, PeriodKind::Weekly, PeriodKind::Monthly];

    pub fn noun(self) -> &'static str {
        match self {
            PeriodKind::Daily => "day",
            PeriodKind::Weekly => "week",
            PeriodKind::Monthly => "month",
        }
    }

    pub fn noun_plural(self) -> &'static str {
        match self {
            PeriodKind::Daily => "days",
            PeriodKind::Weekly => "weeks",
            PeriodKind::Monthly => "months",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            PeriodKind::Daily => "Daily",
            PeriodKind::Weekly => "Weekly",
            PeriodKind::Monthly => "Monthly",
        }
    }
}

/// A single habit counter. `period_key` identifies the bucket the counter
/// was last reset (or created) in and is the only boundary marker — no
/// timestamp is stored. Invariants: `progress <= target`, `target >= 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    pub id: String,
    pub title: String,
    pub kind: PeriodKind,
    pub progress: u32,
    pub target: u32,
    pub period_key: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRecord {
    pub current: u32,
    pub best: u32,
}

/// One record per period kind; mutated only by the rollover engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streaks {
    pub daily: StreakRecord,
    pub weekly: StreakRecord,
    pub monthly: StreakRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppData {
    pub counters: Vec<Counter>,
    pub streaks: Streaks,
}

#[derive(Debug, Deserialize)]
pub struct CreateCounterRequest {
    pub title: String,
    pub kind: PeriodKind,
}

#[derive(Debug, Deserialize)]
pub struct TitleRequest {
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct ValueRequest {
    pub value: i64,
}

#[derive(Debug, Deserialize)]
pub struct KindRequest {
    pub value: PeriodKind,
}

#[derive(Debug, Serialize)]
pub struct CounterResponse {
    pub id: String,
    pub title: String,
    pub kind: PeriodKind,
    pub progress: u32,
    pub target: u32,
    pub period_key: String,
    pub done: bool,
}

#[derive(Debug, Serialize)]
pub struct StreakResponse {
    pub kind: PeriodKind,
    pub current: u32,
    pub best: u32,
    pub preview: u32,
}

#[derive(Debug, Serialize)]
pub struct RolloverResponse {
    pub changed: bool,
}
