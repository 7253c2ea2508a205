use chrono::NaiveDateTime;
use diesel::{AsChangeset, Insertable, Queryable};
use serde::{Deserialize, Serialize};

/// A primary document record. `filename` never contains the stored
/// extension; `file_path` is relative to the storage disk and must point at
/// an existing on-disk object while status != deleted.
#[derive(Debug, Clone, Queryable, Serialize)]
pub struct File {
    pub file_id: i32,
    pub filename: String,
    pub file_path: String,
    pub file_size: i64,
    pub file_type: String,
    pub uploaded_by: i32,
    pub category: String,
    pub published_by: String,
    pub year_published: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::files)]
pub struct NewFile {
    pub filename: String,
    pub file_path: String,
    pub file_size: i64,
    pub file_type: String,
    pub uploaded_by: i32,
    pub category: String,
    pub published_by: String,
    pub year_published: String,
    pub description: Option<String>,
    pub status: String,
}

/// Changeset applied by the primary-file update endpoint. `file_path` and
/// `file_size` are only present when a replacement upload or a rename
/// changed them; `description` always overwrites, including to NULL.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::files)]
pub struct UpdateFile<'a> {
    pub filename: &'a str,
    pub category: &'a str,
    pub published_by: Option<&'a str>,
    pub year_published: Option<&'a str>,
    pub description: Option<Option<&'a str>>,
    pub status: &'a str,
    pub file_path: Option<&'a str>,
    pub file_size: Option<i64>,
    pub updated_at: NaiveDateTime,
}

/// Document categories accepted by the upload endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    Capstone,
    Thesis,
    FacultyRequest,
    Accreditation,
    AdminDocs,
}

impl FileCategory {
    pub const ALL: [FileCategory; 5] = [
        FileCategory::Capstone,
        FileCategory::Thesis,
        FileCategory::FacultyRequest,
        FileCategory::Accreditation,
        FileCategory::AdminDocs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Capstone => "capstone",
            FileCategory::Thesis => "thesis",
            FileCategory::FacultyRequest => "faculty_request",
            FileCategory::Accreditation => "accreditation",
            FileCategory::AdminDocs => "admin_docs",
        }
    }

    pub fn parse(s: &str) -> Option<FileCategory> {
        FileCategory::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_strings() {
        for cat in FileCategory::ALL {
            assert_eq!(FileCategory::parse(cat.as_str()), Some(cat));
        }
        assert_eq!(FileCategory::parse("memo"), None);
        assert_eq!(FileCategory::parse(""), None);
    }
}
