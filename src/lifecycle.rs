//! Lifecycle transitions for files and file versions, and the resolver for
//! operations handed a bare numeric id that may name either table.
//!
//! Guarded transitions (archive/unarchive/trash/restore) and the unguarded
//! `set_status` escape hatch are deliberately separate operations: the
//! update endpoints may move a record to any status regardless of its
//! current one, while the guarded calls carry the per-endpoint checks and
//! audit writes of the admin panel.

use chrono::Utc;

use crate::database::DbPool;
use crate::error::ApiError;
use crate::models::audit::NewFileTimeStamp;
use crate::repositories::{audit, file_versions, files};

/// Visibility bucket of a file or version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Active,
    Pending,
    Inactive,
    Deactivated,
    Archived,
    Deleted,
}

impl FileStatus {
    pub const ALL: [FileStatus; 6] = [
        FileStatus::Active,
        FileStatus::Pending,
        FileStatus::Inactive,
        FileStatus::Deactivated,
        FileStatus::Archived,
        FileStatus::Deleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Active => "active",
            FileStatus::Pending => "pending",
            FileStatus::Inactive => "inactive",
            FileStatus::Deactivated => "deactivated",
            FileStatus::Archived => "archived",
            FileStatus::Deleted => "deleted",
        }
    }

    pub fn parse(s: &str) -> Option<FileStatus> {
        FileStatus::ALL.into_iter().find(|v| v.as_str() == s)
    }
}

/// Tagged result of the ambiguous-id lookup. Version ids and file ids live
/// in independent id spaces; when both tables contain the id, the version
/// wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRef {
    File(i32),
    Version(i32),
}

/// Resolution order for a bare numeric id: versions first, then files.
fn pick_ref(id: i32, version_exists: bool, file_exists: bool) -> Option<FileRef> {
    if version_exists {
        Some(FileRef::Version(id))
    } else if file_exists {
        Some(FileRef::File(id))
    } else {
        None
    }
}

/// Resolves a bare numeric id against file_versions, then files.
pub fn resolve_ref(pool: &DbPool, id: i32) -> Result<FileRef, ApiError> {
    let version = file_versions::find_version_optional(pool, id)?;
    let file = files::find_file_optional(pool, id)?;

    pick_ref(id, version.is_some(), file.is_some())
        .ok_or_else(|| ApiError::NotFound("File not found!".to_string()))
}

fn record_event(
    pool: &DbPool,
    file_id: i32,
    version_id: Option<i32>,
    event_type: String,
) -> Result<(), ApiError> {
    audit::insert_time_stamp(
        pool,
        &NewFileTimeStamp {
            file_id,
            version_id,
            event_type,
            timestamp: Utc::now().naive_utc(),
        },
    )?;

    Ok(())
}

pub fn archive_event(file_id: i32) -> String {
    format!("File ID {} Archived", file_id)
}

pub fn unarchive_file_event(file_id: i32) -> String {
    format!("File ID {} Unarchived", file_id)
}

pub fn unarchive_version_event(version_id: i32) -> String {
    format!("File Version ID {} Unarchived", version_id)
}

pub fn restore_event(file_id: i32) -> String {
    format!("File ID {} Restored from Trash", file_id)
}

/// Archives a file and records one audit event. No current-state guard;
/// archiving an archived file records another event.
pub fn archive_file(pool: &DbPool, id: i32) -> Result<(), ApiError> {
    let file = files::find_file_optional(pool, id)?
        .ok_or_else(|| ApiError::NotFound("File not found".to_string()))?;

    files::set_file_status(pool, file.file_id, FileStatus::Archived.as_str())?;
    record_event(pool, file.file_id, None, archive_event(file.file_id))
}

/// Admin-only archive: rejects an already-archived file. Unlike the plain
/// archive this endpoint records no audit event.
pub fn admin_archive_file(pool: &DbPool, id: i32) -> Result<(), ApiError> {
    let file = files::find_file_optional(pool, id)?
        .ok_or_else(|| ApiError::NotFound("File not found".to_string()))?;

    if file.status == FileStatus::Archived.as_str() {
        return Err(ApiError::AlreadyInDesiredState(
            "This file is already archived.".to_string(),
        ));
    }

    files::set_file_status(pool, file.file_id, FileStatus::Archived.as_str())?;
    Ok(())
}

/// Unarchives whatever the bare id resolves to, recording one audit event
/// for either outcome.
pub fn unarchive(pool: &DbPool, id: i32) -> Result<FileRef, ApiError> {
    match resolve_ref(pool, id)? {
        FileRef::Version(version_id) => {
            let version = file_versions::find_version(pool, version_id)?;
            file_versions::set_version_status(pool, version_id, FileStatus::Active.as_str())?;
            record_event(
                pool,
                version.file_id,
                Some(version_id),
                unarchive_version_event(version_id),
            )?;
            Ok(FileRef::Version(version_id))
        }
        FileRef::File(file_id) => {
            files::set_file_status(pool, file_id, FileStatus::Active.as_str())?;
            record_event(pool, file_id, None, unarchive_file_event(file_id))?;
            Ok(FileRef::File(file_id))
        }
    }
}

/// Moves a file to the trash. Records no audit event.
pub fn trash_file(pool: &DbPool, id: i32) -> Result<(), ApiError> {
    let file = files::find_file_optional(pool, id)?
        .ok_or_else(|| ApiError::NotFound("File not found.".to_string()))?;

    files::set_file_status(pool, file.file_id, FileStatus::Deleted.as_str())?;
    Ok(())
}

/// Restores a trashed file to active and records one audit event.
pub fn restore_file(pool: &DbPool, id: i32) -> Result<(), ApiError> {
    let file = files::find_file_optional(pool, id)?
        .ok_or_else(|| ApiError::NotFound("File not found".to_string()))?;

    files::set_file_status(pool, file.file_id, FileStatus::Active.as_str())?;
    record_event(pool, file.file_id, None, restore_event(file.file_id))
}

/// Unguarded status write: moves a record to any status regardless of its
/// current one, with no audit event. Backs the version lifecycle endpoints
/// and the metadata-update escape hatch.
pub fn set_status(pool: &DbPool, target: FileRef, new_status: FileStatus) -> Result<(), ApiError> {
    let affected = match target {
        FileRef::File(id) => files::set_file_status(pool, id, new_status.as_str())?,
        FileRef::Version(id) => file_versions::set_version_status(pool, id, new_status.as_str())?,
    };

    if affected == 0 {
        return Err(ApiError::NotFound("File not found".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for s in FileStatus::ALL {
            assert_eq!(FileStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(FileStatus::parse("archived "), None);
        assert_eq!(FileStatus::parse("trashed"), None);
    }

    #[test]
    fn ambiguous_id_prefers_the_version_table() {
        assert_eq!(pick_ref(7, true, true), Some(FileRef::Version(7)));
        assert_eq!(pick_ref(7, true, false), Some(FileRef::Version(7)));
        assert_eq!(pick_ref(7, false, true), Some(FileRef::File(7)));
        assert_eq!(pick_ref(7, false, false), None);
    }

    #[test]
    fn audit_events_embed_the_entity_id() {
        assert_eq!(archive_event(7), "File ID 7 Archived");
        assert_eq!(unarchive_file_event(7), "File ID 7 Unarchived");
        assert_eq!(unarchive_version_event(12), "File Version ID 12 Unarchived");
        assert_eq!(restore_event(3), "File ID 3 Restored from Trash");
    }
}
