use crate::models::{PeriodKind, StreakRecord, Streaks};

impl Streaks {
    pub fn get(&self, kind: PeriodKind) -> StreakRecord {
        match kind {
            PeriodKind::Daily => self.daily,
            PeriodKind::Weekly => self.weekly,
            PeriodKind::Monthly => self.monthly,
        }
    }

    pub fn get_mut(&mut self, kind: PeriodKind) -> &mut StreakRecord {
        match kind {
            PeriodKind::Daily => &mut self.daily,
            PeriodKind::Weekly => &mut self.weekly,
            PeriodKind::Monthly => &mut self.monthly,
        }
    }
}

impl StreakRecord {
    /// Applies the outcome of one period boundary: a fully met group
    /// extends the streak, anything else breaks it. `best` ratchets and
    /// never decreases.
    pub fn record_boundary(&mut self, group_was_complete: bool) {
        if group_was_complete {
            self.current = self.current.saturating_add(1);
        } else {
            self.current = 0;
        }
        self.best = self.best.max(self.current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_boundaries_extend_the_streak() {
        let mut record = StreakRecord::default();
        record.record_boundary(true);
        record.record_boundary(true);
        assert_eq!(record.current, 2);
        assert_eq!(record.best, 2);
    }

    #[test]
    fn incomplete_boundary_resets_current_but_keeps_best() {
        let mut record = StreakRecord { current: 4, best: 4 };
        record.record_boundary(false);
        assert_eq!(record.current, 0);
        assert_eq!(record.best, 4);
    }

    #[test]
    fn best_ratchets_past_earlier_runs() {
        let mut record = StreakRecord { current: 2, best: 5 };
        record.record_boundary(true);
        assert_eq!(record.current, 3);
        assert_eq!(record.best, 5);

        for _ in 0..3 {
            record.record_boundary(true);
        }
        assert_eq!(record.current, 6);
        assert_eq!(record.best, 6);
    }

    #[test]
    fn streaks_are_tracked_per_kind() {
        let mut streaks = Streaks::default();
        streaks.get_mut(PeriodKind::Weekly).record_boundary(true);
        assert_eq!(streaks.get(PeriodKind::Weekly).current, 1);
        assert_eq!(streaks.get(PeriodKind::Daily).current, 0);
        assert_eq!(streaks.get(PeriodKind::Monthly).current, 0);
    }
}
