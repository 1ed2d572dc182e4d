//! Day-scoped draft map: one [`AttendanceDraft`] per roster user for
//! the selected date, reconciled against whatever the server already
//! holds for that day.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use tracing::debug;

use crate::api::AttendanceApi;
use crate::error::MarkerError;
use crate::model::{AttendanceDraft, AttendanceRecord, DraftPatch, RecordId, User, UserId};

pub struct AttendanceRecordStore {
    date: Option<NaiveDate>,
    roster: BTreeMap<UserId, User>,
    drafts: BTreeMap<UserId, AttendanceDraft>,
    default_check_in: NaiveTime,
    default_check_out: NaiveTime,
}

fn builtin_default_times() -> (NaiveTime, NaiveTime) {
    (
        NaiveTime::from_hms_opt(9, 30, 0).expect("literal time"),
        NaiveTime::from_hms_opt(19, 0, 0).expect("literal time"),
    )
}

impl Default for AttendanceRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AttendanceRecordStore {
    pub fn new() -> Self {
        let (check_in, check_out) = builtin_default_times();
        Self::with_default_times(check_in, check_out)
    }

    /// Store whose fresh drafts are pre-filled with the given times
    /// instead of the built-in 09:30 / 19:00.
    pub fn with_default_times(check_in: NaiveTime, check_out: NaiveTime) -> Self {
        Self {
            date: None,
            roster: BTreeMap::new(),
            drafts: BTreeMap::new(),
            default_check_in: check_in,
            default_check_out: check_out,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    pub fn draft(&self, user_id: &str) -> Option<&AttendanceDraft> {
        self.drafts.get(user_id)
    }

    pub fn drafts(&self) -> impl Iterator<Item = (&UserId, &AttendanceDraft)> {
        self.drafts.iter()
    }

    pub fn user_name(&self, user_id: &str) -> Option<&str> {
        self.roster.get(user_id).map(|u| u.name.as_str())
    }

    pub fn default_times(&self) -> (NaiveTime, NaiveTime) {
        (self.default_check_in, self.default_check_out)
    }

    /// Point the store at a day. Drops every draft; responses from
    /// loads issued for other dates will be discarded by [`Self::apply_day`].
    pub fn select_date(&mut self, date: NaiveDate) {
        self.date = Some(date);
        self.roster.clear();
        self.drafts.clear();
    }

    /// Install a fetched day. Returns `false` (and changes nothing)
    /// when the store has moved to a different date since the fetch was
    /// issued: a stale response is dropped, never merged.
    ///
    /// On success the map is replaced wholesale with exactly one draft
    /// per user in `users`: persisted rows rank into their draft,
    /// everyone else gets a fresh pending one.
    pub fn apply_day(
        &mut self,
        date: NaiveDate,
        users: Vec<User>,
        records: Vec<AttendanceRecord>,
    ) -> bool {
        if self.date != Some(date) {
            debug!(%date, current = ?self.date, "dropping stale day load");
            return false;
        }

        let mut by_user: BTreeMap<UserId, AttendanceRecord> = BTreeMap::new();
        for rec in records {
            by_user.insert(rec.user_id.clone(), rec);
        }

        self.roster.clear();
        self.drafts.clear();
        for user in users {
            let draft = match by_user.remove(&user.id) {
                Some(rec) => AttendanceDraft::from_record(&rec),
                None => AttendanceDraft::fresh(self.default_check_in, self.default_check_out),
            };
            self.drafts.insert(user.id.clone(), draft);
            self.roster.insert(user.id.clone(), user);
        }
        true
    }

    /// Fetch the day's records and install drafts for it.
    pub async fn load_for_date(
        &mut self,
        api: &dyn AttendanceApi,
        date: NaiveDate,
        users: Vec<User>,
    ) -> Result<(), MarkerError> {
        self.select_date(date);
        let records = api.records_for_date(date).await?;
        self.apply_day(date, users, records);
        Ok(())
    }

    /// Merge a partial edit into one user's draft. Unknown users are
    /// ignored; the form only references loaded rows.
    pub fn edit_draft(&mut self, user_id: &str, patch: DraftPatch) {
        if let Some(draft) = self.drafts.get_mut(user_id) {
            draft.apply_patch(patch);
        }
    }

    pub(crate) fn draft_mut(&mut self, user_id: &str) -> Option<&mut AttendanceDraft> {
        self.drafts.get_mut(user_id)
    }

    pub(crate) fn mark_persisted(&mut self, user_id: &str, record_id: RecordId) {
        if let Some(draft) = self.drafts.get_mut(user_id) {
            draft.mark_persisted(record_id);
        }
    }
}
