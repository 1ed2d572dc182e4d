pub mod draft;
pub mod record;
pub mod status;
pub mod user;

pub use draft::{AttendanceDraft, DraftPatch, PermissionWindow};
pub use record::{AttendanceRecord, RecordId};
pub use status::{AttendanceStatus, HalfDayType};
pub use user::{User, UserId};
