use crate::database::{DbPool, get_db_conn};
use crate::models::file_requests::FileRequest;
use crate::models::files::File;
use crate::models::users::User;
use crate::schema::file_requests::dsl::*;
use crate::schema::{files, users};
use diesel::prelude::*;

/// Requests in a given status joined with the referenced file and the
/// requesting user, newest first.
pub fn list_by_status(
    pool: &DbPool,
    status_is: &str,
) -> Result<Vec<(FileRequest, File, User)>, diesel::result::Error> {
    let mut conn = get_db_conn(pool)?;

    file_requests
        .inner_join(files::table)
        .inner_join(users::table)
        .filter(request_status.eq(status_is))
        .order(created_at.desc())
        .load::<(FileRequest, File, User)>(&mut conn)
}
