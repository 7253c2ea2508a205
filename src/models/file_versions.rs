use chrono::NaiveDateTime;
use diesel::{AsChangeset, Insertable, Queryable};
use serde::Serialize;

/// A revision of a primary file. `version_id` lives in its own id space,
/// independent of `file_id`; callers holding a bare numeric id must try this
/// table before `files`.
#[derive(Debug, Clone, Queryable, Serialize)]
pub struct FileVersion {
    pub version_id: i32,
    pub file_id: i32,
    pub filename: String,
    pub file_path: String,
    pub file_size: i64,
    pub file_type: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::file_versions)]
pub struct NewFileVersion {
    pub file_id: i32,
    pub filename: String,
    pub file_path: String,
    pub file_size: i64,
    pub file_type: String,
    pub status: String,
}

/// Changeset applied by the version update endpoint. Path, size and type
/// only change when a replacement upload accompanied the request.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::file_versions)]
pub struct UpdateFileVersion<'a> {
    pub filename: &'a str,
    pub file_path: Option<&'a str>,
    pub file_size: Option<i64>,
    pub file_type: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}
