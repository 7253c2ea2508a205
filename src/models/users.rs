use chrono::NaiveDateTime;
use diesel::Queryable;
use serde::Serialize;

/// Account row referenced by uploads, audit entries and file requests.
/// Accounts are provisioned by the external auth system, never by this
/// service, so there is no insertable counterpart.
#[derive(Debug, Queryable, Serialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: Option<String>,
    pub is_admin: bool,
    pub created_at: NaiveDateTime,
}
