use actix_web::{HttpRequest, HttpResponse, web};

use crate::auth::Identity;
use crate::database::DbPool;
use crate::error::ApiError;
use crate::handlers::{redirect_back_error, redirect_back_success};
use crate::lifecycle::{self, FileRef, FileStatus};

/// POST /admin/files/{id}/archive
/// Plain archive: no state guard, one audit event, flash redirect.
pub async fn archive_file(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    match lifecycle::archive_file(&pool, path.into_inner()) {
        Ok(()) => Ok(redirect_back_success(&req, "File successfully archived")),
        Err(ApiError::NotFound(msg)) => Ok(redirect_back_error(&req, &msg)),
        Err(e) => Err(e),
    }
}

/// POST /admin/files/{id}/admin-archive
/// Guarded archive: requires an admin identity and rejects an
/// already-archived file. Records no audit event.
pub async fn admin_archive_file(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    if !identity.is_admin {
        return Ok(redirect_back_error(
            &req,
            "Unauthorized: You do not have permission.",
        ));
    }

    match lifecycle::admin_archive_file(&pool, path.into_inner()) {
        Ok(()) => Ok(redirect_back_success(&req, "File archived successfully!")),
        Err(ApiError::AlreadyInDesiredState(msg)) => Ok(redirect_back_error(&req, &msg)),
        Err(e) => Err(e),
    }
}

/// POST /admin/files/{id}/trash
/// Moves a file to the trash. Failures surface as flash errors, success as
/// a flash message; no audit event is recorded.
pub async fn trash_file(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    match lifecycle::trash_file(&pool, path.into_inner()) {
        Ok(()) => Ok(redirect_back_success(
            &req,
            "File successfully marked as trashed.",
        )),
        Err(ApiError::NotFound(msg)) => Ok(redirect_back_error(&req, &msg)),
        Err(_) => Ok(redirect_back_error(
            &req,
            "An error occurred while deleting the file.",
        )),
    }
}

/// POST /admin/files/{id}/restore
/// Restores a trashed file to active, recording one audit event.
pub async fn restore_file(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    lifecycle::restore_file(&pool, path.into_inner())?;

    Ok(redirect_back_success(&req, "File restored successfully!"))
}

/// POST /admin/unarchive/{id}
/// Unarchives by bare numeric id: the id is tried against versions first,
/// then files.
pub async fn unarchive(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    match lifecycle::unarchive(&pool, path.into_inner()) {
        Ok(FileRef::Version(_)) => Ok(redirect_back_success(
            &req,
            "File version unarchived successfully!",
        )),
        Ok(FileRef::File(_)) => Ok(redirect_back_success(
            &req,
            "Original file unarchived successfully!",
        )),
        Err(ApiError::NotFound(msg)) => Ok(redirect_back_error(&req, &msg)),
        Err(e) => Err(e),
    }
}

async fn move_version(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    id: i32,
    status: FileStatus,
    message: &str,
) -> Result<HttpResponse, ApiError> {
    lifecycle::set_status(&pool, FileRef::Version(id), status)?;

    Ok(redirect_back_success(&req, message))
}

/// POST /admin/versions/{id}/archive
pub async fn archive_version(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    move_version(
        req,
        pool,
        path.into_inner(),
        FileStatus::Archived,
        "File version archived successfully!",
    )
    .await
}

/// POST /admin/versions/{id}/unarchive
pub async fn unarchive_version(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    move_version(
        req,
        pool,
        path.into_inner(),
        FileStatus::Active,
        "File version unarchived successfully!",
    )
    .await
}

/// POST /admin/versions/{id}/restore
pub async fn restore_version(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    move_version(
        req,
        pool,
        path.into_inner(),
        FileStatus::Active,
        "File version restored successfully!",
    )
    .await
}

/// POST /admin/versions/{id}/trash
pub async fn trash_version(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    move_version(
        req,
        pool,
        path.into_inner(),
        FileStatus::Deleted,
        "File version placed on trash successfully!",
    )
    .await
}
