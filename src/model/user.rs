use serde::{Deserialize, Serialize};

pub type UserId = String;

/// Roster entry as served by `GET /users`. Identity data is owned by
/// the user-management side; this crate never writes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub employee_id: String,
    pub department: String,
    pub designation: String,
}
