//! Create-vs-update reconciliation for one (user, date, draft).

use chrono::NaiveDate;
use tracing::debug;

use crate::api::{AttendanceApi, ManualEntryPayload, PermissionEntryPayload};
use crate::error::{MarkerError, ValidationError};
use crate::model::{AttendanceDraft, AttendanceStatus, RecordId};
use crate::utils::timefmt;

/// What a submission did server-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub record_id: RecordId,
    pub created: bool,
}

fn non_blank(v: Option<&str>) -> bool {
    v.is_some_and(|s| !s.trim().is_empty())
}

/// Field-presence check mirroring the draft's status invariant.
pub fn validate_draft(draft: &AttendanceDraft) -> Result<(), ValidationError> {
    match draft.status {
        AttendanceStatus::Pending => Err(ValidationError::IncompleteStatus),
        AttendanceStatus::Absent => {
            if non_blank(draft.absence_reason.as_deref()) {
                Ok(())
            } else {
                Err(ValidationError::MissingReason)
            }
        }
        AttendanceStatus::Permission => {
            if draft.permission.is_some() && non_blank(draft.permission_reason.as_deref()) {
                Ok(())
            } else {
                Err(ValidationError::MissingPermissionFields)
            }
        }
        AttendanceStatus::Present | AttendanceStatus::HalfDay(_) => {
            if draft.check_in.is_some() && draft.check_out.is_some() {
                Ok(())
            } else {
                Err(ValidationError::MissingTimes)
            }
        }
    }
}

/// Generic manual-entry body for a draft. The draft keeps only the
/// fields its status uses (see `retain_status_fields`), so everything
/// else lands on the wire as an explicit `null` and an update wipes
/// any prior shape.
pub fn manual_payload(user_id: &str, date: NaiveDate, draft: &AttendanceDraft) -> ManualEntryPayload {
    ManualEntryPayload {
        user_id: user_id.to_string(),
        date,
        manual_entry: true,
        check_in: draft.check_in,
        check_out: draft.check_out,
        is_absent: draft.status == AttendanceStatus::Absent,
        absence_reason: draft.absence_reason.clone(),
        half_day_type: match draft.status {
            AttendanceStatus::HalfDay(half) => Some(half),
            _ => None,
        },
        permission_time: draft
            .permission
            .map(|w| timefmt::format_window(w.from, w.to)),
        permission_reason: draft.permission_reason.clone(),
        notes: draft.notes.clone(),
    }
}

/// Existing record id for (user, date): prefer what the draft already
/// knows, otherwise re-query the day; a concurrent session may have
/// created the row since the last load.
async fn resolve_existing(
    api: &dyn AttendanceApi,
    user_id: &str,
    date: NaiveDate,
    draft: &AttendanceDraft,
) -> Result<Option<RecordId>, MarkerError> {
    if let Some(id) = &draft.server_record_id {
        return Ok(Some(id.clone()));
    }
    let records = api.records_for_date(date).await?;
    Ok(records.into_iter().find(|r| r.user_id == user_id).map(|r| r.id))
}

/// Submit one draft: update in place when a server row exists, create
/// otherwise. Permission creation has its own endpoint; permission
/// updates go through the generic update like every other status.
pub async fn submit_draft(
    api: &dyn AttendanceApi,
    user_id: &str,
    date: NaiveDate,
    draft: &AttendanceDraft,
) -> Result<SubmitOutcome, MarkerError> {
    validate_draft(draft)?;

    if let Some(id) = resolve_existing(api, user_id, date, draft).await? {
        let payload = manual_payload(user_id, date, draft);
        let updated = api.update_record(&id, &payload).await?;
        debug!(user_id, record_id = %updated.id, "attendance record updated");
        return Ok(SubmitOutcome {
            record_id: updated.id,
            created: false,
        });
    }

    let created = match draft.status {
        AttendanceStatus::Permission => {
            // validate_draft guarantees window and reason here
            let window = draft
                .permission
                .ok_or(ValidationError::MissingPermissionFields)?;
            let reason = draft
                .permission_reason
                .clone()
                .ok_or(ValidationError::MissingPermissionFields)?;
            let payload = PermissionEntryPayload {
                user_id: user_id.to_string(),
                date,
                permission_from: window.from,
                permission_to: window.to,
                reason,
                check_in: draft.check_in,
                check_out: draft.check_out,
                notes: draft.notes.clone(),
            };
            api.create_permission(&payload).await?
        }
        _ => api.create_manual(&manual_payload(user_id, date, draft)).await?,
    };
    debug!(user_id, record_id = %created.id, "attendance record created");
    Ok(SubmitOutcome {
        record_id: created.id,
        created: true,
    })
}
