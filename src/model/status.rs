use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Shift half covered by a half-day record. Wire value is lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HalfDayType {
    Morning,
    Afternoon,
}

/// Day status for one (user, date) pair. Exactly one holds at a time;
/// statuses are never combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    Pending,
    Present,
    Absent,
    HalfDay(HalfDayType),
    Permission,
}

impl AttendanceStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, AttendanceStatus::Pending)
    }

    /// Check-in/check-out times are meaningful only for these two.
    pub fn wants_times(&self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::HalfDay(_))
    }

    pub fn label(&self) -> String {
        match self {
            AttendanceStatus::Pending => "pending".to_string(),
            AttendanceStatus::Present => "present".to_string(),
            AttendanceStatus::Absent => "absent".to_string(),
            AttendanceStatus::HalfDay(half) => format!("half-day ({half})"),
            AttendanceStatus::Permission => "permission".to_string(),
        }
    }
}
