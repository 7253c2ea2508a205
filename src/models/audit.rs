use chrono::NaiveDateTime;
use diesel::{Insertable, Queryable};
use serde::Serialize;

/// Append-only lifecycle audit event. One row per audited transition; rows
/// are never updated or deleted.
#[derive(Debug, Queryable, Serialize)]
pub struct FileTimeStamp {
    pub id: i32,
    pub file_id: i32,
    pub version_id: Option<i32>,
    pub event_type: String,
    pub timestamp: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::file_time_stamps)]
pub struct NewFileTimeStamp {
    pub file_id: i32,
    pub version_id: Option<i32>,
    pub event_type: String,
    pub timestamp: NaiveDateTime,
}

/// Append-only audit event for non-lifecycle actions (uploads, folder
/// create/delete). `file_id` is 0 for folder-level actions.
#[derive(Debug, Queryable, Serialize)]
pub struct AccessLog {
    pub id: i32,
    pub file_id: i32,
    pub accessed_by: i32,
    pub action: String,
    pub access_time: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::access_logs)]
pub struct NewAccessLog {
    pub file_id: i32,
    pub accessed_by: i32,
    pub action: String,
    pub access_time: NaiveDateTime,
}
