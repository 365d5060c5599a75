use crate::models::{AppData, Counter, PeriodKind};
use crate::period::key_for;
use chrono::NaiveDate;
use uuid::Uuid;

pub fn create_counter(
    data: &mut AppData,
    title: &str,
    kind: PeriodKind,
    today: NaiveDate,
) -> Counter {
    let counter = Counter {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        kind,
        progress: 0,
        target: 1,
        period_key: key_for(kind, today),
    };
    // Newest first: display order is insertion order.
    data.counters.insert(0, counter.clone());
    counter
}

pub fn delete_counter(data: &mut AppData, id: &str) -> bool {
    let before = data.counters.len();
    data.counters.retain(|counter| counter.id != id);
    data.counters.len() != before
}

/// Moves progress by `delta`, clamped to `[0, target]`. Out-of-range
/// deltas clamp silently instead of erroring.
pub fn adjust_progress(data: &mut AppData, id: &str, delta: i64) -> Option<Counter> {
    let counter = counter_mut(data, id)?;
    let moved = i64::from(counter.progress) + delta;
    counter.progress = moved.clamp(0, i64::from(counter.target)) as u32;
    Some(counter.clone())
}

pub fn set_progress(data: &mut AppData, id: &str, value: i64) -> Option<Counter> {
    let counter = counter_mut(data, id)?;
    counter.progress = value.clamp(0, i64::from(counter.target)) as u32;
    Some(counter.clone())
}

/// Updates the target (floored at 1). A target below the current progress
/// clamps progress down; raising the target never touches progress.
pub fn set_target(data: &mut AppData, id: &str, value: i64) -> Option<Counter> {
    let counter = counter_mut(data, id)?;
    counter.target = value.clamp(1, i64::from(u32::MAX)) as u32;
    if counter.progress > counter.target {
        counter.progress = counter.target;
    }
    Some(counter.clone())
}

pub fn set_title(data: &mut AppData, id: &str, title: &str) -> Option<Counter> {
    let counter = counter_mut(data, id)?;
    counter.title = title.to_string();
    Some(counter.clone())
}

/// Moves the counter to another cadence. The period key is re-derived for
/// the new kind; progress is carried over, not reset.
pub fn set_kind(data: &mut AppData, id: &str, kind: PeriodKind, today: NaiveDate) -> Option<Counter> {
    let counter = counter_mut(data, id)?;
    if counter.kind != kind {
        counter.kind = kind;
        counter.period_key = key_for(kind, today);
    }
    Some(counter.clone())
}

/// Starts a fresh period. Called only by the rollover engine.
pub fn reset_for_boundary(counter: &mut Counter, new_key: &str) {
    counter.progress = 0;
    counter.period_key = new_key.to_string();
}

fn counter_mut<'a>(data: &'a mut AppData, id: &str) -> Option<&'a mut Counter> {
    data.counters.iter_mut().find(|counter| counter.id == id)
}
