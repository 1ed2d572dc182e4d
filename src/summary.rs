//! Per-day headline counts shown above the marking table.

use crate::model::AttendanceStatus;
use crate::store::AttendanceRecordStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DaySummary {
    pub present: usize,
    pub absent: usize,
    pub half_day: usize,
    pub permission: usize,
    pub pending: usize,
}

impl DaySummary {
    pub fn of(store: &AttendanceRecordStore) -> Self {
        let mut summary = Self::default();
        for (_, draft) in store.drafts() {
            match draft.status {
                AttendanceStatus::Pending => summary.pending += 1,
                AttendanceStatus::Present => summary.present += 1,
                AttendanceStatus::Absent => summary.absent += 1,
                AttendanceStatus::HalfDay(_) => summary.half_day += 1,
                AttendanceStatus::Permission => summary.permission += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.present + self.absent + self.half_day + self.permission + self.pending
    }
}
