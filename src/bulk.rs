//! Uniform actions over a selected set of users: one validated apply,
//! one fail-independent submit.

use chrono::{NaiveDate, NaiveTime};
use futures::future::join_all;
use tracing::{info, warn};

use crate::api::AttendanceApi;
use crate::error::{MarkerError, ValidationError};
use crate::model::{
    AttendanceDraft, AttendanceStatus, HalfDayType, PermissionWindow, RecordId, UserId,
};
use crate::store::AttendanceRecordStore;
use crate::submit::{self, SubmitOutcome};

/// Action picked in the bulk toolbar. Half-day carries its shift half,
/// matching the two separate menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Present,
    Absent,
    HalfDay(HalfDayType),
    Permission,
}

/// Shared values applied identically to every selected user.
#[derive(Debug, Clone, Default)]
pub struct BulkFields {
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub absence_reason: Option<String>,
    pub permission_from: Option<NaiveTime>,
    pub permission_to: Option<NaiveTime>,
    pub permission_reason: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedUser {
    pub user_id: UserId,
    pub user_name: String,
    pub record_id: RecordId,
    pub created: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedUser {
    pub user_id: UserId,
    pub user_name: Option<String>,
    pub error: String,
}

/// Per-user outcome lists for the "X succeeded, Y failed" banner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkSubmissionResult {
    pub succeeded: Vec<SubmittedUser>,
    pub failed: Vec<FailedUser>,
}

fn non_blank(v: Option<&str>) -> bool {
    v.is_some_and(|s| !s.trim().is_empty())
}

/// Apply `action` to every selected draft. Validation is batch-level
/// and fail-closed: any rejection leaves every draft untouched.
/// Returns how many drafts were overwritten.
pub fn apply_bulk(
    store: &mut AttendanceRecordStore,
    selected: &[UserId],
    action: BulkAction,
    fields: &BulkFields,
) -> Result<usize, MarkerError> {
    if selected.is_empty() {
        return Err(ValidationError::EmptySelection.into());
    }
    match action {
        BulkAction::Absent => {
            if !non_blank(fields.absence_reason.as_deref()) {
                return Err(ValidationError::MissingReason.into());
            }
        }
        BulkAction::Permission => {
            if fields.permission_from.is_none()
                || fields.permission_to.is_none()
                || !non_blank(fields.permission_reason.as_deref())
            {
                return Err(ValidationError::MissingPermissionFields.into());
            }
        }
        BulkAction::Present | BulkAction::HalfDay(_) => {}
    }

    let (default_in, default_out) = store.default_times();
    let mut updated = 0;
    for user_id in selected {
        let Some(draft) = store.draft_mut(user_id) else {
            continue;
        };

        let mut next = AttendanceDraft::fresh(
            fields.check_in.unwrap_or(default_in),
            fields.check_out.unwrap_or(default_out),
        );
        next.status = match action {
            BulkAction::Present => AttendanceStatus::Present,
            BulkAction::Absent => AttendanceStatus::Absent,
            BulkAction::HalfDay(half) => AttendanceStatus::HalfDay(half),
            BulkAction::Permission => AttendanceStatus::Permission,
        };
        next.absence_reason = fields.absence_reason.clone();
        next.permission = match (fields.permission_from, fields.permission_to) {
            (Some(from), Some(to)) => Some(PermissionWindow { from, to }),
            _ => None,
        };
        next.permission_reason = fields.permission_reason.clone();
        next.notes = fields.notes.clone();
        next.retain_status_fields();
        // a bulk-applied draft is always pending submission again, even
        // when the new values match the persisted row
        next.clear_persisted();

        *draft = next;
        updated += 1;
    }

    info!(updated, action = ?action, "bulk action applied");
    Ok(updated)
}

/// Submit every selected draft independently: one failure never stops
/// the rest, and every input id lands in exactly one result list.
///
/// Succeeded drafts are marked persisted with their returned id;
/// failed ones keep their edits, unpersisted, so a retry resubmits
/// instead of silently skipping.
pub async fn submit_bulk(
    store: &mut AttendanceRecordStore,
    api: &dyn AttendanceApi,
    selected: &[UserId],
    date: NaiveDate,
) -> BulkSubmissionResult {
    let mut result = BulkSubmissionResult::default();

    // Snapshot drafts first so the submissions can run concurrently;
    // outcomes are written back only after all of them settle.
    let mut jobs: Vec<(UserId, Option<String>, AttendanceDraft)> = Vec::new();
    for user_id in selected {
        match store.draft(user_id) {
            Some(draft) => jobs.push((
                user_id.clone(),
                store.user_name(user_id).map(str::to_string),
                draft.clone(),
            )),
            None => result.failed.push(FailedUser {
                user_id: user_id.clone(),
                user_name: None,
                error: "no draft loaded for this user".to_string(),
            }),
        }
    }

    let outcomes = join_all(
        jobs.iter()
            .map(|(user_id, _, draft)| submit::submit_draft(api, user_id, date, draft)),
    )
    .await;

    for ((user_id, user_name, _), outcome) in jobs.into_iter().zip(outcomes) {
        match outcome {
            Ok(SubmitOutcome { record_id, created }) => {
                store.mark_persisted(&user_id, record_id.clone());
                result.succeeded.push(SubmittedUser {
                    user_id,
                    user_name: user_name.unwrap_or_default(),
                    record_id,
                    created,
                });
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "bulk submission entry failed");
                result.failed.push(FailedUser {
                    user_id,
                    user_name,
                    error: e.user_message(),
                });
            }
        }
    }

    info!(
        succeeded = result.succeeded.len(),
        failed = result.failed.len(),
        "bulk submission finished"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ManualEntryPayload, PermissionEntryPayload};
    use crate::model::{AttendanceRecord, DraftPatch, User};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            name: format!("User {id}"),
            employee_id: format!("EMP-{id}"),
            department: "Engineering".to_string(),
            designation: "Engineer".to_string(),
        }
    }

    fn loaded_store(user_ids: &[&str]) -> AttendanceRecordStore {
        let mut store = AttendanceRecordStore::new();
        let date = d("2025-01-10");
        store.select_date(date);
        store.apply_day(date, user_ids.iter().map(|id| user(id)).collect(), vec![]);
        store
    }

    fn ids(v: &[&str]) -> Vec<UserId> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_selection_is_rejected() {
        let mut store = loaded_store(&["u1"]);
        let err = apply_bulk(&mut store, &[], BulkAction::Present, &BulkFields::default())
            .unwrap_err();
        assert!(matches!(
            err,
            MarkerError::Validation(ValidationError::EmptySelection)
        ));
    }

    #[test]
    fn missing_reason_leaves_every_draft_untouched() {
        let mut store = loaded_store(&["u1", "u2"]);
        let before: Vec<_> = store.drafts().map(|(id, dr)| (id.clone(), dr.clone())).collect();

        let err = apply_bulk(
            &mut store,
            &ids(&["u1", "u2"]),
            BulkAction::Absent,
            &BulkFields {
                absence_reason: Some("   ".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MarkerError::Validation(ValidationError::MissingReason)
        ));

        let after: Vec<_> = store.drafts().map(|(id, dr)| (id.clone(), dr.clone())).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn missing_permission_fields_rejected() {
        let mut store = loaded_store(&["u1"]);
        let err = apply_bulk(
            &mut store,
            &ids(&["u1"]),
            BulkAction::Permission,
            &BulkFields {
                permission_from: Some(t(9, 0)),
                permission_reason: Some("Bank".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MarkerError::Validation(ValidationError::MissingPermissionFields)
        ));
    }

    #[test]
    fn absent_apply_overwrites_selected_only() {
        let mut store = loaded_store(&["u1", "u2", "u3"]);
        let updated = apply_bulk(
            &mut store,
            &ids(&["u1", "u3"]),
            BulkAction::Absent,
            &BulkFields {
                absence_reason: Some("Team offsite".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated, 2);

        for id in ["u1", "u3"] {
            let draft = store.draft(id).unwrap();
            assert_eq!(draft.status, AttendanceStatus::Absent);
            assert_eq!(draft.absence_reason.as_deref(), Some("Team offsite"));
            assert_eq!(draft.check_in, None);
            assert!(!draft.already_persisted);
        }
        assert_eq!(store.draft("u2").unwrap().status, AttendanceStatus::Pending);
    }

    #[test]
    fn bulk_apply_clears_persisted_even_for_persisted_drafts() {
        let mut store = loaded_store(&["u1"]);
        store
            .draft_mut("u1")
            .unwrap()
            .mark_persisted("rec-1".to_string());

        apply_bulk(
            &mut store,
            &ids(&["u1"]),
            BulkAction::Present,
            &BulkFields::default(),
        )
        .unwrap();

        let draft = store.draft("u1").unwrap();
        assert!(!draft.already_persisted);
        assert_eq!(draft.server_record_id, None);
        // defaults flow in when the toolbar left the times blank
        assert_eq!(draft.check_in, Some(t(9, 30)));
        assert_eq!(draft.check_out, Some(t(19, 0)));
    }

    #[test]
    fn half_day_apply_sets_shift_half() {
        let mut store = loaded_store(&["u1"]);
        apply_bulk(
            &mut store,
            &ids(&["u1"]),
            BulkAction::HalfDay(HalfDayType::Afternoon),
            &BulkFields {
                check_in: Some(t(13, 0)),
                check_out: Some(t(19, 0)),
                ..Default::default()
            },
        )
        .unwrap();

        let draft = store.draft("u1").unwrap();
        assert_eq!(draft.status, AttendanceStatus::HalfDay(HalfDayType::Afternoon));
        assert_eq!(draft.check_in, Some(t(13, 0)));
    }

    /// Fails any submission for the configured user ids.
    #[derive(Default)]
    struct FlakyApi {
        fail_for: HashSet<String>,
        created: Mutex<u32>,
    }

    #[async_trait]
    impl AttendanceApi for FlakyApi {
        async fn records_for_date(
            &self,
            _date: NaiveDate,
        ) -> Result<Vec<AttendanceRecord>, MarkerError> {
            Ok(vec![])
        }

        async fn create_manual(
            &self,
            payload: &ManualEntryPayload,
        ) -> Result<AttendanceRecord, MarkerError> {
            if self.fail_for.contains(&payload.user_id) {
                return Err(MarkerError::Remote {
                    status: 500,
                    message: "simulated failure".to_string(),
                });
            }
            let mut n = self.created.lock().unwrap();
            *n += 1;
            Ok(AttendanceRecord {
                id: format!("rec-{n}"),
                user_id: payload.user_id.clone(),
                date: payload.date,
                check_in: payload.check_in,
                check_out: payload.check_out,
                is_absent: payload.is_absent,
                absence_reason: payload.absence_reason.clone(),
                half_day_type: payload.half_day_type,
                permission_time: payload.permission_time.clone(),
                permission_reason: payload.permission_reason.clone(),
                notes: payload.notes.clone(),
            })
        }

        async fn update_record(
            &self,
            _id: &str,
            _payload: &ManualEntryPayload,
        ) -> Result<AttendanceRecord, MarkerError> {
            unreachable!("no persisted rows in these tests")
        }

        async fn create_permission(
            &self,
            _payload: &PermissionEntryPayload,
        ) -> Result<AttendanceRecord, MarkerError> {
            unreachable!("no permission drafts in these tests")
        }

        async fn roster(&self) -> Result<Vec<User>, MarkerError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn one_failure_never_stops_the_rest() {
        let mut store = loaded_store(&["u1", "u2"]);
        apply_bulk(
            &mut store,
            &ids(&["u1", "u2"]),
            BulkAction::Absent,
            &BulkFields {
                absence_reason: Some("Strike day".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        let api = FlakyApi {
            fail_for: HashSet::from(["u1".to_string()]),
            ..Default::default()
        };
        let result = submit_bulk(&mut store, &api, &ids(&["u1", "u2"]), d("2025-01-10")).await;

        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.failed[0].user_id, "u1");
        assert_eq!(result.failed[0].error, "simulated failure");
        assert_eq!(result.succeeded.len(), 1);
        assert_eq!(result.succeeded[0].user_id, "u2");
        assert_eq!(result.succeeded[0].user_name, "User u2");
        assert!(result.succeeded[0].created);

        // u2 is now persisted with the returned id, u1 stays editable
        let u2 = store.draft("u2").unwrap();
        assert!(u2.already_persisted);
        assert_eq!(u2.server_record_id, Some(result.succeeded[0].record_id.clone()));
        let u1 = store.draft("u1").unwrap();
        assert!(!u1.already_persisted);
        assert_eq!(u1.status, AttendanceStatus::Absent);
    }

    #[tokio::test]
    async fn pending_draft_fails_validation_inside_the_batch() {
        let mut store = loaded_store(&["u1", "u2"]);
        store.edit_draft(
            "u2",
            DraftPatch {
                status: Some(AttendanceStatus::Absent),
                absence_reason: Some("Sick".to_string()),
                ..Default::default()
            },
        );

        let api = FlakyApi::default();
        let result = submit_bulk(&mut store, &api, &ids(&["u1", "u2"]), d("2025-01-10")).await;

        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.failed[0].user_id, "u1");
        assert_eq!(result.failed[0].error, "attendance status has not been chosen");
        assert_eq!(result.succeeded.len(), 1);
        assert_eq!(result.succeeded[0].user_id, "u2");
    }

    #[tokio::test]
    async fn unknown_selected_id_lands_in_failed() {
        let mut store = loaded_store(&["u1"]);
        store.edit_draft(
            "u1",
            DraftPatch {
                status: Some(AttendanceStatus::Present),
                ..Default::default()
            },
        );

        let api = FlakyApi::default();
        let result = submit_bulk(&mut store, &api, &ids(&["u1", "ghost"]), d("2025-01-10")).await;

        assert_eq!(result.succeeded.len(), 1);
        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.failed[0].user_id, "ghost");
        assert_eq!(result.failed[0].user_name, None);
    }
}
