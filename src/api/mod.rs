pub mod client;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::error::MarkerError;
use crate::model::{AttendanceRecord, HalfDayType, User};
use crate::utils::timefmt;

pub use client::HttpAttendanceApi;

/// Remote attendance API surface this crate consumes. One
/// implementation speaks HTTP; tests substitute their own.
#[async_trait]
pub trait AttendanceApi: Send + Sync {
    /// `GET /attendance?date=YYYY-MM-DD`
    async fn records_for_date(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>, MarkerError>;

    /// `POST /attendance/manual`
    async fn create_manual(&self, payload: &ManualEntryPayload) -> Result<AttendanceRecord, MarkerError>;

    /// `PUT /attendance/{id}`
    async fn update_record(&self, id: &str, payload: &ManualEntryPayload) -> Result<AttendanceRecord, MarkerError>;

    /// `POST /attendance/permission`. Creation only; updates to
    /// permission records go through `update_record`.
    async fn create_permission(&self, payload: &PermissionEntryPayload) -> Result<AttendanceRecord, MarkerError>;

    /// `GET /users`
    async fn roster(&self) -> Result<Vec<User>, MarkerError>;
}

/// Body for `POST /attendance/manual` and `PUT /attendance/{id}`.
///
/// Every optional field is serialized (as `null` when unset): an update
/// replaces the row's shape wholesale, so nothing may be omitted and
/// left stale from a prior status.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualEntryPayload {
    pub user_id: String,
    pub date: NaiveDate,
    pub manual_entry: bool,
    #[serde(with = "timefmt::hhmm_opt")]
    pub check_in: Option<NaiveTime>,
    #[serde(with = "timefmt::hhmm_opt")]
    pub check_out: Option<NaiveTime>,
    pub is_absent: bool,
    pub absence_reason: Option<String>,
    pub half_day_type: Option<HalfDayType>,
    /// `"HH:mm-HH:mm"` when the draft carries a permission window.
    pub permission_time: Option<String>,
    pub permission_reason: Option<String>,
    pub notes: Option<String>,
}

/// Body for `POST /attendance/permission`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionEntryPayload {
    pub user_id: String,
    pub date: NaiveDate,
    #[serde(with = "timefmt::hhmm")]
    pub permission_from: NaiveTime,
    #[serde(with = "timefmt::hhmm")]
    pub permission_to: NaiveTime,
    pub reason: String,
    #[serde(with = "timefmt::hhmm_opt")]
    pub check_in: Option<NaiveTime>,
    #[serde(with = "timefmt::hhmm_opt")]
    pub check_out: Option<NaiveTime>,
    pub notes: Option<String>,
}
