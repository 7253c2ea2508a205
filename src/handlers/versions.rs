use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use serde_json::json;

use crate::auth::Identity;
use crate::config::MAX_REPLACEMENT_BYTES;
use crate::database::DbPool;
use crate::error::ApiError;
use crate::handlers::{redirect_back_error, redirect_back_success};
use crate::lifecycle::FileStatus;
use crate::models::audit::NewAccessLog;
use crate::models::file_versions::{NewFileVersion, UpdateFileVersion};
use crate::repositories::{audit, file_versions, files};
use crate::requests::multipart::collect;
use crate::storage::{FilesStorage, paths};

/// GET /admin/versions/{id}
/// Single version record, as loaded by the edit form.
pub async fn get_version(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let version = file_versions::find_version(&pool, path.into_inner())?;

    Ok(HttpResponse::Ok().json(version))
}

/// POST /admin/files/{id}/versions
/// Uploads a new revision of an existing file into uploads/files and
/// records it as active.
pub async fn create_version(
    pool: web::Data<DbPool>,
    storage: web::Data<FilesStorage>,
    identity: Identity,
    path: web::Path<i32>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let file = files::find_file(&pool, path.into_inner())?;

    let form = collect(payload, MAX_REPLACEMENT_BYTES).await?;
    let Some(upload) = &form.file else {
        return Err(ApiError::Validation("No file detected.".to_string()));
    };

    let file_path = paths::replacement_path(paths::VERSION_FILES_DIR, &upload.filename)?;
    storage.save(&file_path, &upload.bytes)?;

    let version = file_versions::insert_version(
        &pool,
        &NewFileVersion {
            file_id: file.file_id,
            filename: paths::file_stem(&upload.filename).to_string(),
            file_path,
            file_size: upload.bytes.len() as i64,
            file_type: paths::extension(&upload.filename).to_string(),
            status: FileStatus::Active.as_str().to_string(),
        },
    )?;

    audit::insert_access_log(
        &pool,
        &NewAccessLog {
            file_id: file.file_id,
            accessed_by: identity.user_id,
            action: "Uploaded file version - Successful".to_string(),
            access_time: Utc::now().naive_utc(),
        },
    )?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "File version uploaded successfully!",
        "version_id": version.version_id,
    })))
}

/// PUT /admin/versions/{id}
/// Version update. A replacement upload lands in uploads/files and updates
/// path, size and type; the previous on-disk object is left in place. The
/// filename is always overwritten.
pub async fn update_version(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    storage: web::Data<FilesStorage>,
    path: web::Path<i32>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let form = collect(payload, MAX_REPLACEMENT_BYTES).await?;

    file_versions::find_version(&pool, id)?;

    let filename_input = form.require_text("filename")?;
    if filename_input.len() > 255 {
        return Err(ApiError::Validation(
            "The filename field may not be greater than 255 characters.".to_string(),
        ));
    }

    let (new_path, new_size, new_type) = match &form.file {
        Some(upload) => {
            let replacement = paths::replacement_path(paths::VERSION_FILES_DIR, &upload.filename)?;
            storage.save(&replacement, &upload.bytes)?;

            let ext = paths::extension(&upload.filename).to_string();
            (
                Some(replacement),
                Some(upload.bytes.len() as i64),
                Some(ext),
            )
        }
        None => (None, None, None),
    };

    file_versions::update_version(
        &pool,
        id,
        &UpdateFileVersion {
            filename: paths::file_stem(filename_input),
            file_path: new_path.as_deref(),
            file_size: new_size,
            file_type: new_type.as_deref(),
            updated_at: Utc::now().naive_utc(),
        },
    )?;

    Ok(redirect_back_success(
        &req,
        "File version updated successfully!",
    ))
}

/// GET /files/versions/download/{filename}
/// Downloads a revision; revisions live only under uploads/files.
pub async fn download_version(
    req: HttpRequest,
    storage: web::Data<FilesStorage>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let filename = path.into_inner();
    paths::ensure_safe_relative(&filename)?;

    let relative = format!("{}/{}", paths::VERSION_FILES_DIR, filename);
    if !storage.exists(&relative) {
        return Ok(redirect_back_error(&req, "File not found."));
    }

    super::files::stream_attachment(&storage, &relative).await
}
