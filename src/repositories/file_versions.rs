use crate::database::{DbPool, get_db_conn};
use crate::models::file_versions::{FileVersion, NewFileVersion, UpdateFileVersion};
use crate::schema::file_versions::dsl::*;
use diesel::prelude::*;

/// Inserts a new version record and returns the created record
pub fn insert_version(
    pool: &DbPool,
    new: &NewFileVersion,
) -> Result<FileVersion, diesel::result::Error> {
    let mut conn = get_db_conn(pool)?;

    diesel::insert_into(file_versions)
        .values(new)
        .get_result(&mut conn)
}

/// Finds a version record by its version ID.
pub fn find_version(pool: &DbPool, id: i32) -> Result<FileVersion, diesel::result::Error> {
    let mut conn = get_db_conn(pool)?;

    file_versions
        .filter(version_id.eq(id))
        .first::<FileVersion>(&mut conn)
}

/// Finds a version record by its version ID, None when absent.
pub fn find_version_optional(
    pool: &DbPool,
    id: i32,
) -> Result<Option<FileVersion>, diesel::result::Error> {
    let mut conn = get_db_conn(pool)?;

    file_versions
        .filter(version_id.eq(id))
        .first::<FileVersion>(&mut conn)
        .optional()
}

/// Applies a metadata changeset and returns the updated record.
pub fn update_version(
    pool: &DbPool,
    id: i32,
    changes: &UpdateFileVersion,
) -> Result<FileVersion, diesel::result::Error> {
    let mut conn = get_db_conn(pool)?;

    diesel::update(file_versions.filter(version_id.eq(id)))
        .set(changes)
        .get_result(&mut conn)
}

/// Sets the lifecycle status of a version, touching updated_at.
pub fn set_version_status(
    pool: &DbPool,
    id: i32,
    new_status: &str,
) -> Result<usize, diesel::result::Error> {
    let mut conn = get_db_conn(pool)?;

    diesel::update(file_versions.filter(version_id.eq(id)))
        .set((
            status.eq(new_status),
            updated_at.eq(chrono::Utc::now().naive_utc()),
        ))
        .execute(&mut conn)
}

/// All versions belonging to the given files.
pub fn list_versions_for_files(
    pool: &DbPool,
    ids: &[i32],
) -> Result<Vec<FileVersion>, diesel::result::Error> {
    let mut conn = get_db_conn(pool)?;

    file_versions
        .filter(file_id.eq_any(ids))
        .load::<FileVersion>(&mut conn)
}

/// All versions in a given status, optionally narrowed by filename substring
/// and file type. Versions carry no category, so no category filter exists.
pub fn list_by_status(
    pool: &DbPool,
    status_is: &str,
    search: Option<&str>,
    file_type_is: Option<&str>,
) -> Result<Vec<FileVersion>, diesel::result::Error> {
    let mut conn = get_db_conn(pool)?;

    let mut query = file_versions.filter(status.eq(status_is)).into_boxed();
    if let Some(term) = search {
        query = query.filter(filename.ilike(format!("%{}%", term)));
    }
    if let Some(ext) = file_type_is {
        query = query.filter(file_type.eq(ext.to_string()));
    }

    query
        .order(updated_at.desc())
        .load::<FileVersion>(&mut conn)
}
