use crate::database::{DbPool, get_db_conn};
use crate::models::audit::{AccessLog, FileTimeStamp, NewAccessLog, NewFileTimeStamp};
use diesel::prelude::*;

/// Appends a lifecycle audit event. Rows in file_time_stamps are immutable;
/// there is no update or delete counterpart.
pub fn insert_time_stamp(
    pool: &DbPool,
    new: &NewFileTimeStamp,
) -> Result<FileTimeStamp, diesel::result::Error> {
    use crate::schema::file_time_stamps::dsl::*;

    let mut conn = get_db_conn(pool)?;

    diesel::insert_into(file_time_stamps)
        .values(new)
        .get_result(&mut conn)
}

/// Appends an access-log event for non-lifecycle actions.
pub fn insert_access_log(
    pool: &DbPool,
    new: &NewAccessLog,
) -> Result<AccessLog, diesel::result::Error> {
    use crate::schema::access_logs::dsl::*;

    let mut conn = get_db_conn(pool)?;

    diesel::insert_into(access_logs)
        .values(new)
        .get_result(&mut conn)
}
