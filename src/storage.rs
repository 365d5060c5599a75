use crate::errors::AppError;
use crate::models::{AppData, Counter, PeriodKind, StreakRecord, Streaks};
use serde::Deserialize;
use serde_json::Value;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

// The data file is a single JSON object holding two independent records
// under versioned keys, so either record can migrate without touching
// the other.
const COUNTERS_KEY: &str = "counters_v2";
const COUNTERS_V1_KEY: &str = "counters_v1";
const STREAKS_KEY: &str = "streaks_v1";
const STREAKS_V0_KEY: &str = "streaks_v0";

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/habits.json"))
}

// Pre-target counter schema: a bare count per habit.
#[derive(Debug, Deserialize)]
struct CounterV1 {
    id: String,
    title: String,
    kind: PeriodKind,
    #[serde(default)]
    count: u32,
    period_key: String,
}

// Pre-best streak schema: a bare integer per kind.
#[derive(Debug, Default, Deserialize)]
struct StreaksV0 {
    #[serde(default)]
    daily: u32,
    #[serde(default)]
    weekly: u32,
    #[serde(default)]
    monthly: u32,
}

/// Loads stored state, upgrading older record versions field by field.
/// Anything missing, corrupt, or unparsable degrades to an empty default
/// for that record; a bad data file must never prevent startup.
pub async fn load_data(path: &Path) -> AppData {
    let root: Value = match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(err) => {
                error!("failed to parse data file: {err}");
                return AppData::default();
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return AppData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            return AppData::default();
        }
    };

    let mut data = AppData {
        counters: load_counters(&root),
        streaks: load_streaks(&root),
    };
    restore_invariants(&mut data);
    data
}

fn load_counters(root: &Value) -> Vec<Counter> {
    if let Some(value) = root.get(COUNTERS_KEY) {
        match serde_json::from_value(value.clone()) {
            Ok(counters) => return counters,
            Err(err) => {
                error!("failed to parse {COUNTERS_KEY}: {err}");
                return Vec::new();
            }
        }
    }

    if let Some(value) = root.get(COUNTERS_V1_KEY) {
        match serde_json::from_value::<Vec<CounterV1>>(value.clone()) {
            Ok(old) => return old.into_iter().map(upgrade_counter).collect(),
            Err(err) => error!("failed to parse {COUNTERS_V1_KEY}: {err}"),
        }
    }

    Vec::new()
}

fn upgrade_counter(old: CounterV1) -> Counter {
    // The v1 schema had no target; default to 1 and clamp the carried
    // count into range.
    let target = 1;
    Counter {
        id: old.id,
        title: old.title,
        kind: old.kind,
        progress: old.count.min(target),
        target,
        period_key: old.period_key,
    }
}

fn load_streaks(root: &Value) -> Streaks {
    if let Some(value) = root.get(STREAKS_KEY) {
        match serde_json::from_value(value.clone()) {
            Ok(streaks) => return streaks,
            Err(err) => {
                error!("failed to parse {STREAKS_KEY}: {err}");
                return Streaks::default();
            }
        }
    }

    if let Some(value) = root.get(STREAKS_V0_KEY) {
        match serde_json::from_value::<StreaksV0>(value.clone()) {
            Ok(old) => {
                return Streaks {
                    daily: upgrade_streak(old.daily),
                    weekly: upgrade_streak(old.weekly),
                    monthly: upgrade_streak(old.monthly),
                };
            }
            Err(err) => error!("failed to parse {STREAKS_V0_KEY}: {err}"),
        }
    }

    Streaks::default()
}

fn upgrade_streak(current: u32) -> StreakRecord {
    StreakRecord {
        current,
        best: current,
    }
}

// Stored data may predate an invariant or have been edited by hand.
fn restore_invariants(data: &mut AppData) {
    for counter in &mut data.counters {
        counter.target = counter.target.max(1);
        counter.progress = counter.progress.min(counter.target);
    }
    for kind in PeriodKind::ALL {
        let record = data.streaks.get_mut(kind);
        record.best = record.best.max(record.current);
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let mut root = serde_json::Map::new();
    root.insert(
        COUNTERS_KEY.to_string(),
        serde_json::to_value(&data.counters).map_err(AppError::internal)?,
    );
    root.insert(
        STREAKS_KEY.to_string(),
        serde_json::to_value(&data.streaks).map_err(AppError::internal)?,
    );

    let payload = serde_json::to_vec_pretty(&root).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}
