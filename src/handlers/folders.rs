use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde_json::json;
use std::path::Path;

use crate::auth::Identity;
use crate::config::STORAGE_ROOT;
use crate::database::DbPool;
use crate::error::ApiError;
use crate::models::audit::NewAccessLog;
use crate::repositories::audit;
use crate::requests::folders::{CreateFolderRequest, DeleteFolderRequest};
use crate::requests::query::FolderPathQuery;
use crate::storage::{FilesStorage, paths};

/// Parent path for the UI "Back" affordance: the directory name of the
/// base path, or None at the storage root.
fn parent_path(base: &str) -> Option<String> {
    Path::new(base)
        .parent()
        .and_then(|p| p.to_str())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}

/// Folder mutations report their failures softly: the AJAX panel expects a
/// 200 with `success:false` rather than an error status.
fn soft_failure(message: &str) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": false,
        "message": message,
    }))
}

/// Creates the directory, failing with AlreadyExists when it is present.
fn create_directory(storage: &FilesStorage, path: &str) -> Result<(), ApiError> {
    if storage.exists(path) {
        return Err(ApiError::AlreadyExists("Folder already exists.".to_string()));
    }

    storage.make_dir(path)?;
    Ok(())
}

/// Recursively deletes the directory, failing with NotFound when absent.
fn remove_directory(storage: &FilesStorage, path: &str) -> Result<(), ApiError> {
    if !storage.exists(path) {
        return Err(ApiError::NotFound("Folder does not exist.".to_string()));
    }

    storage.remove_dir(path)?;
    Ok(())
}

/// Folder-level audit writes are non-fatal: a failed insert is logged and
/// the already-applied filesystem change stands.
fn record_folder_action(pool: &DbPool, identity: Identity, action: String) {
    let entry = NewAccessLog {
        file_id: 0,
        accessed_by: identity.user_id,
        action,
        access_time: Utc::now().naive_utc(),
    };

    if let Err(e) = audit::insert_access_log(pool, &entry) {
        log::warn!("failed to record folder access log: {}", e);
    }
}

/// GET /admin/folders
/// Direct child folders of the given base path (names only) plus the parent
/// path for navigation.
pub async fn list_folders(
    storage: web::Data<FilesStorage>,
    query: web::Query<FolderPathQuery>,
) -> Result<HttpResponse, ApiError> {
    let base_path = query
        .into_inner()
        .path
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| STORAGE_ROOT.to_string());
    paths::ensure_safe_relative(&base_path)?;

    let folders = storage.list_dirs(&base_path).unwrap_or_default();

    Ok(HttpResponse::Ok().json(json!({
        "folders": folders,
        "base_path": base_path,
        "parent_path": parent_path(&base_path),
    })))
}

/// POST /admin/folders
/// Creates a subfolder. An existing target reports a soft failure without
/// touching the filesystem or the audit log.
pub async fn create_folder(
    pool: web::Data<DbPool>,
    storage: web::Data<FilesStorage>,
    identity: Identity,
    body: web::Json<CreateFolderRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let folder_name = body.folder_name.trim().to_string();
    if folder_name.is_empty() {
        return Err(ApiError::Validation(
            "The folderName field is required.".to_string(),
        ));
    }

    let base_path = body
        .base_path
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| STORAGE_ROOT.to_string());
    paths::ensure_safe_relative(&base_path)?;
    paths::ensure_safe_relative(&folder_name)?;

    let new_path = format!("{}/{}", base_path, folder_name);

    match create_directory(&storage, &new_path) {
        Ok(()) => {}
        Err(ApiError::AlreadyExists(msg)) => return Ok(soft_failure(&msg)),
        Err(ApiError::Storage(e)) => {
            log::error!("failed to create folder {}: {}", new_path, e);
            return Ok(soft_failure(&format!("Failed to create folder: {}", e)));
        }
        Err(e) => return Err(e),
    }

    record_folder_action(
        &pool,
        identity,
        format!(
            "Created folder '{}' under '{}' - Successful",
            folder_name, base_path
        ),
    );
    log::info!("user {} created folder: {}", identity.user_id, new_path);

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// DELETE /admin/folders
/// Recursively deletes a subfolder. A missing target reports a soft failure.
pub async fn delete_folder(
    pool: web::Data<DbPool>,
    storage: web::Data<FilesStorage>,
    identity: Identity,
    body: web::Json<DeleteFolderRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let folder_name = body.folder_name.trim().to_string();
    let base_path = body.base_path.trim().to_string();
    if folder_name.is_empty() || base_path.is_empty() {
        return Err(ApiError::Validation(
            "The folderName and basePath fields are required.".to_string(),
        ));
    }
    paths::ensure_safe_relative(&base_path)?;
    paths::ensure_safe_relative(&folder_name)?;

    let full_path = format!("{}/{}", base_path, folder_name);

    match remove_directory(&storage, &full_path) {
        Ok(()) => {}
        Err(ApiError::NotFound(msg)) => {
            log::warn!(
                "attempted to delete non-existent folder {} (user {})",
                full_path,
                identity.user_id
            );
            return Ok(soft_failure(&msg));
        }
        Err(ApiError::Storage(e)) => {
            log::error!("failed to delete folder {}: {}", full_path, e);
            return Ok(soft_failure("Failed to delete folder."));
        }
        Err(e) => return Err(e),
    }

    record_folder_action(
        &pool,
        identity,
        format!(
            "Deleted subfolder '{}' under '{}' - Successful",
            folder_name, base_path
        ),
    );
    log::info!("user {} deleted folder: {}", identity.user_id, full_path);

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> (tempfile::TempDir, FilesStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = FilesStorage::new(dir.path());
        storage.ensure_root_exists().unwrap();
        (dir, storage)
    }

    #[test]
    fn parent_of_a_subfolder_is_its_directory() {
        assert_eq!(parent_path("uploads/capstone").as_deref(), Some("uploads"));
        assert_eq!(
            parent_path("uploads/capstone/2024").as_deref(),
            Some("uploads/capstone")
        );
    }

    #[test]
    fn the_root_has_no_parent() {
        assert_eq!(parent_path("uploads"), None);
        assert_eq!(parent_path(""), None);
    }

    #[test]
    fn creating_an_existing_folder_fails_without_touching_disk() {
        let (_dir, storage) = storage();
        storage.make_dir("uploads/capstone").unwrap();
        storage.save("uploads/capstone/report.pdf", b"pdf").unwrap();

        let result = create_directory(&storage, "uploads/capstone");

        assert!(matches!(result, Err(ApiError::AlreadyExists(_))));
        assert!(storage.exists("uploads/capstone/report.pdf"));
    }

    #[test]
    fn removing_a_missing_folder_reports_not_found() {
        let (_dir, storage) = storage();

        let result = remove_directory(&storage, "uploads/absent");

        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
