use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::status::HalfDayType;
use super::user::UserId;
use crate::utils::timefmt;

pub type RecordId = String;

/// Persisted attendance row as returned by `GET /attendance?date=`.
/// The server enforces that at most one record shape (absence,
/// half-day, permission, plain times) is set per row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: RecordId,
    pub user_id: UserId,
    pub date: NaiveDate,
    #[serde(default, with = "timefmt::hhmm_opt")]
    pub check_in: Option<NaiveTime>,
    #[serde(default, with = "timefmt::hhmm_opt")]
    pub check_out: Option<NaiveTime>,
    #[serde(default)]
    pub is_absent: bool,
    #[serde(default)]
    pub absence_reason: Option<String>,
    #[serde(default)]
    pub half_day_type: Option<HalfDayType>,
    /// `"HH:mm-HH:mm"` when a permission window exists.
    #[serde(default)]
    pub permission_time: Option<String>,
    #[serde(default)]
    pub permission_reason: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}
