use crate::counters::reset_for_boundary;
use crate::models::{AppData, PeriodKind};
use crate::period::key_for;
use chrono::NaiveDate;
use tracing::info;

/// Runs one boundary check for every period kind and returns whether any
/// stored state changed.
///
/// There is no remembered transition state: each call recomputes from the
/// counters' stored period keys, so repeated calls within the same period
/// are no-ops and any number of missed periods collapse into a single
/// boundary per kind. A streak measures "was the most recently ended
/// period successful", not how many periods elapsed.
pub fn run_rollover(data: &mut AppData, today: NaiveDate) -> bool {
    let mut changed = false;

    for kind in PeriodKind::ALL {
        let current_key = key_for(kind, today);

        // One pass over the kind's group, before anything is reset: the
        // completion verdict must use the progress the old period ended
        // with.
        let mut members = 0usize;
        let mut stale = false;
        let mut complete = true;
        for counter in data.counters.iter().filter(|counter| counter.kind == kind) {
            members += 1;
            if counter.period_key != current_key {
                stale = true;
            }
            if counter.progress < counter.target {
                complete = false;
            }
        }

        // An empty group never produces a boundary, and a group whose
        // keys are all current has nothing to roll over.
        if members == 0 || !stale {
            continue;
        }

        data.streaks.get_mut(kind).record_boundary(complete);

        for counter in data
            .counters
            .iter_mut()
            .filter(|counter| counter.kind == kind && counter.period_key != current_key)
        {
            reset_for_boundary(counter, &current_key);
        }

        info!(
            "{} boundary crossed (group complete: {complete}, streak: {})",
            kind.noun(),
            data.streaks.get(kind).current
        );
        changed = true;
    }

    changed
}

/// True iff the kind's group is non-empty and every member has met its
/// target right now.
pub fn group_complete(data: &AppData, kind: PeriodKind) -> bool {
    let mut any = false;
    for counter in data.counters.iter().filter(|counter| counter.kind == kind) {
        if counter.progress < counter.target {
            return false;
        }
        any = true;
    }
    any
}

/// Display-only projection: what the streak would become if the current
/// period ended right now. Reads live progress, mutates nothing.
pub fn preview_streak(data: &AppData, kind: PeriodKind) -> u32 {
    let record = data.streaks.get(kind);
    if group_complete(data, kind) {
        record.current.saturating_add(1)
    } else {
        record.current
    }
}
