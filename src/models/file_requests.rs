use chrono::NaiveDateTime;
use diesel::Queryable;
use serde::Serialize;

/// A staff/faculty request referencing a file. Requests are filed from the
/// staff portal; this service lists them for review.
#[derive(Debug, Queryable, Serialize)]
pub struct FileRequest {
    pub id: i32,
    pub file_id: i32,
    pub user_id: i32,
    pub request_status: String,
    pub created_at: NaiveDateTime,
}
