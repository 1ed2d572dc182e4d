use chrono::NaiveTime;

use super::record::{AttendanceRecord, RecordId};
use super::status::AttendanceStatus;
use crate::utils::timefmt;

/// Approved temporary-absence window within an otherwise-attended day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionWindow {
    pub from: NaiveTime,
    pub to: NaiveTime,
}

/// Working state for one (user, date) pair on the marking screen.
///
/// Field presence follows the status: an absent draft carries only a
/// reason, a permission draft only its window and reason, and so on.
/// `already_persisted` holds exactly when `server_record_id` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceDraft {
    pub status: AttendanceStatus,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub absence_reason: Option<String>,
    pub permission: Option<PermissionWindow>,
    pub permission_reason: Option<String>,
    pub notes: Option<String>,
    pub already_persisted: bool,
    pub server_record_id: Option<RecordId>,
}

/// Partial edit coming from the marking form. Fields left `None` keep
/// their current value.
#[derive(Debug, Clone, Default)]
pub struct DraftPatch {
    pub status: Option<AttendanceStatus>,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub absence_reason: Option<String>,
    pub permission: Option<PermissionWindow>,
    pub permission_reason: Option<String>,
    pub notes: Option<String>,
}

impl AttendanceDraft {
    /// Fresh editable draft for a user with no record on the selected
    /// day. Times are pre-filled so a plain present mark needs no typing.
    pub fn fresh(check_in: NaiveTime, check_out: NaiveTime) -> Self {
        Self {
            status: AttendanceStatus::Pending,
            check_in: Some(check_in),
            check_out: Some(check_out),
            absence_reason: None,
            permission: None,
            permission_reason: None,
            notes: None,
            already_persisted: false,
            server_record_id: None,
        }
    }

    /// Rank a fetched record into a draft. First match wins; the server
    /// stores one shape per row, so the ordering only settles rows that
    /// arrive malformed.
    pub fn from_record(rec: &AttendanceRecord) -> Self {
        let status = if rec.is_absent {
            AttendanceStatus::Absent
        } else if let Some(half) = rec.half_day_type {
            AttendanceStatus::HalfDay(half)
        } else if rec.permission_time.is_some() {
            AttendanceStatus::Permission
        } else if rec.check_in.is_some() {
            // check-in without check-out is a presence still in progress
            AttendanceStatus::Present
        } else {
            AttendanceStatus::Pending
        };

        let permission = rec
            .permission_time
            .as_deref()
            .and_then(timefmt::parse_window)
            .map(|(from, to)| PermissionWindow { from, to });

        let mut draft = Self {
            status,
            check_in: rec.check_in,
            check_out: rec.check_out,
            absence_reason: rec.absence_reason.clone(),
            permission,
            permission_reason: rec.permission_reason.clone(),
            notes: rec.notes.clone(),
            already_persisted: true,
            server_record_id: Some(rec.id.clone()),
        };
        draft.retain_status_fields();
        draft
    }

    /// Merge a partial edit. A status change re-opens a persisted draft
    /// (the record must be resubmitted to take effect) and drops fields
    /// the new status does not use.
    pub fn apply_patch(&mut self, patch: DraftPatch) {
        let status_changed = matches!(patch.status, Some(s) if s != self.status);

        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(t) = patch.check_in {
            self.check_in = Some(t);
        }
        if let Some(t) = patch.check_out {
            self.check_out = Some(t);
        }
        if let Some(reason) = patch.absence_reason {
            self.absence_reason = Some(reason);
        }
        if let Some(window) = patch.permission {
            self.permission = Some(window);
        }
        if let Some(reason) = patch.permission_reason {
            self.permission_reason = Some(reason);
        }
        if let Some(notes) = patch.notes {
            self.notes = Some(notes);
        }

        if status_changed {
            self.clear_persisted();
        }
        self.retain_status_fields();
    }

    /// Null every field the current status does not use. Pending keeps
    /// its pre-filled times so switching to present needs no retyping.
    pub fn retain_status_fields(&mut self) {
        match self.status {
            AttendanceStatus::Pending
            | AttendanceStatus::Present
            | AttendanceStatus::HalfDay(_) => {
                self.absence_reason = None;
                self.permission = None;
                self.permission_reason = None;
            }
            AttendanceStatus::Absent => {
                self.check_in = None;
                self.check_out = None;
                self.permission = None;
                self.permission_reason = None;
            }
            AttendanceStatus::Permission => {
                self.check_in = None;
                self.check_out = None;
                self.absence_reason = None;
            }
        }
    }

    pub fn mark_persisted(&mut self, id: RecordId) {
        self.already_persisted = true;
        self.server_record_id = Some(id);
    }

    pub fn clear_persisted(&mut self) {
        self.already_persisted = false;
        self.server_record_id = None;
    }
}
