use crate::database::{DbPool, get_db_conn};
use crate::models::files::{File, NewFile, UpdateFile};
use crate::models::users::User;
use crate::schema::files::dsl::*;
use crate::schema::users;
use diesel::pg::Pg;
use diesel::prelude::*;

/// Filters accepted by the main files listing.
#[derive(Debug, Default)]
pub struct FileFilter {
    pub search: Option<String>,
    pub file_type_is: Option<String>,
    pub subfolder: Option<String>,
}

fn filtered(filter: &FileFilter) -> crate::schema::files::BoxedQuery<'static, Pg> {
    let mut query = files.into_boxed();

    if let Some(term) = &filter.search {
        query = query.filter(filename.ilike(format!("%{}%", term)));
    }
    if let Some(ext) = &filter.file_type_is {
        query = query.filter(file_type.eq(ext.clone()));
    }
    if let Some(folder) = &filter.subfolder {
        query = query.filter(file_path.like(format!("uploads/{}/%", folder)));
    }

    query
}

/// Inserts a new file record and returns the created record
pub fn insert_file(pool: &DbPool, new: &NewFile) -> Result<File, diesel::result::Error> {
    let mut conn = get_db_conn(pool)?;

    diesel::insert_into(files).values(new).get_result(&mut conn)
}

/// Finds a file record by its ID.
pub fn find_file(pool: &DbPool, id: i32) -> Result<File, diesel::result::Error> {
    let mut conn = get_db_conn(pool)?;

    files.filter(file_id.eq(id)).first::<File>(&mut conn)
}

/// Finds a file record by its ID, None when absent.
pub fn find_file_optional(pool: &DbPool, id: i32) -> Result<Option<File>, diesel::result::Error> {
    let mut conn = get_db_conn(pool)?;

    files
        .filter(file_id.eq(id))
        .first::<File>(&mut conn)
        .optional()
}

/// Applies a metadata changeset and returns the updated record.
pub fn update_file(
    pool: &DbPool,
    id: i32,
    changes: &UpdateFile,
) -> Result<File, diesel::result::Error> {
    let mut conn = get_db_conn(pool)?;

    diesel::update(files.filter(file_id.eq(id)))
        .set(changes)
        .get_result(&mut conn)
}

/// Sets the lifecycle status of a file, touching updated_at.
pub fn set_file_status(
    pool: &DbPool,
    id: i32,
    new_status: &str,
) -> Result<usize, diesel::result::Error> {
    let mut conn = get_db_conn(pool)?;

    diesel::update(files.filter(file_id.eq(id)))
        .set((
            status.eq(new_status),
            updated_at.eq(chrono::Utc::now().naive_utc()),
        ))
        .execute(&mut conn)
}

/// One page of the files listing plus the unpaginated total.
pub fn list_files_page(
    pool: &DbPool,
    filter: &FileFilter,
    page: i64,
    per_page: i64,
) -> Result<(Vec<File>, i64), diesel::result::Error> {
    let mut conn = get_db_conn(pool)?;

    let total = filtered(filter).count().get_result::<i64>(&mut conn)?;
    let rows = filtered(filter)
        .order(created_at.desc())
        .limit(per_page)
        .offset((page - 1) * per_page)
        .load::<File>(&mut conn)?;

    Ok((rows, total))
}

/// All files in a given status, optionally narrowed by filename substring,
/// file type and category. Used by the archived and trash views.
pub fn list_by_status(
    pool: &DbPool,
    status_is: &str,
    search: Option<&str>,
    file_type_is: Option<&str>,
    category_is: Option<&str>,
) -> Result<Vec<File>, diesel::result::Error> {
    let mut conn = get_db_conn(pool)?;

    let mut query = files.filter(status.eq(status_is)).into_boxed();
    if let Some(term) = search {
        query = query.filter(filename.ilike(format!("%{}%", term)));
    }
    if let Some(ext) = file_type_is {
        query = query.filter(file_type.eq(ext.to_string()));
    }
    if let Some(cat) = category_is {
        query = query.filter(category.eq(cat.to_string()));
    }

    query.order(updated_at.desc()).load::<File>(&mut conn)
}

/// Trash view rows: deleted files joined with the uploading user.
pub fn list_trashed_with_uploader(
    pool: &DbPool,
    search: Option<&str>,
    file_type_is: Option<&str>,
    category_is: Option<&str>,
    page: i64,
    per_page: i64,
) -> Result<(Vec<(File, User)>, i64), diesel::result::Error> {
    let mut conn = get_db_conn(pool)?;

    let base = |search: Option<&str>, file_type_is: Option<&str>, category_is: Option<&str>| {
        let mut query = files
            .inner_join(users::table)
            .filter(status.eq("deleted"))
            .into_boxed();
        if let Some(term) = search {
            query = query.filter(filename.ilike(format!("%{}%", term)));
        }
        if let Some(ext) = file_type_is {
            query = query.filter(file_type.eq(ext.to_string()));
        }
        if let Some(cat) = category_is {
            query = query.filter(category.eq(cat.to_string()));
        }
        query
    };

    let total = base(search, file_type_is, category_is)
        .count()
        .get_result::<i64>(&mut conn)?;
    let rows = base(search, file_type_is, category_is)
        .order(updated_at.desc())
        .limit(per_page)
        .offset((page - 1) * per_page)
        .load::<(File, User)>(&mut conn)?;

    Ok((rows, total))
}

/// Counts files in a given lifecycle status.
pub fn count_by_status(pool: &DbPool, status_is: &str) -> Result<i64, diesel::result::Error> {
    let mut conn = get_db_conn(pool)?;

    files
        .filter(status.eq(status_is))
        .count()
        .get_result(&mut conn)
}

/// Counts files created at or after the cutoff; None counts everything.
pub fn count_created_since(
    pool: &DbPool,
    cutoff: Option<chrono::NaiveDateTime>,
) -> Result<i64, diesel::result::Error> {
    let mut conn = get_db_conn(pool)?;

    match cutoff {
        Some(cutoff) => files
            .filter(created_at.ge(cutoff))
            .count()
            .get_result(&mut conn),
        None => files.count().get_result(&mut conn),
    }
}

/// Most recently updated files, newest first.
pub fn recent_files(pool: &DbPool, limit: i64) -> Result<Vec<File>, diesel::result::Error> {
    let mut conn = get_db_conn(pool)?;

    files
        .order(updated_at.desc())
        .limit(limit)
        .load::<File>(&mut conn)
}
