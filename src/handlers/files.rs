use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use chrono::{Datelike, Utc};
use serde::Serialize;
use serde_json::json;

use crate::auth::Identity;
use crate::config::{
    ACTIVE_FILES_PER_PAGE, ARCHIVED_FILES_PER_PAGE, MAX_REPLACEMENT_BYTES, MAX_UPLOAD_BYTES,
    STORAGE_ROOT, TRASHED_FILES_PER_PAGE,
};
use crate::database::DbPool;
use crate::error::ApiError;
use crate::handlers::{redirect_back_error, redirect_back_success};
use crate::lifecycle::FileStatus;
use crate::models::audit::NewAccessLog;
use crate::models::file_versions::FileVersion;
use crate::models::files::{File, FileCategory, NewFile, UpdateFile};
use crate::models::users::User;
use crate::pagination::{PaginatedResponse, requested_page};
use crate::repositories::files::FileFilter;
use crate::repositories::{audit, file_versions, files};
use crate::requests::multipart::collect;
use crate::requests::query::{ArchivedListQuery, FileListQuery, TrashListQuery, non_empty};
use crate::storage::{FilesStorage, paths};

/// Exactly four ASCII digits, the accepted year_published format.
fn is_valid_year(year: &str) -> bool {
    year.len() == 4 && year.chars().all(|c| c.is_ascii_digit())
}

/// Streams a stored object as an attachment download.
pub(super) async fn stream_attachment(
    storage: &FilesStorage,
    relative: &str,
) -> Result<HttpResponse, ApiError> {
    let file = storage.open(relative).await?;
    let stream = tokio_util::io::ReaderStream::new(file);

    let name = paths::file_stem(relative);
    let ext = paths::extension(relative);
    let attachment_name = if ext.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", name, ext)
    };

    let content_type = mime_guess::from_path(relative)
        .first()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    Ok(HttpResponse::Ok()
        .append_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", attachment_name),
        ))
        .append_header((header::CONTENT_TYPE, content_type))
        .streaming(stream))
}

/// POST /admin/upload
/// Accepts a multipart upload with its catalog metadata, stores the bytes
/// under the requested subfolder and inserts the file record as active.
pub async fn upload_file(
    pool: web::Data<DbPool>,
    storage: web::Data<FilesStorage>,
    identity: Identity,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let form = collect(payload, MAX_UPLOAD_BYTES).await?;

    let category = form.require_text("category")?;
    let category = FileCategory::parse(category)
        .ok_or_else(|| ApiError::Validation("The selected category is invalid.".to_string()))?;

    let published_by = form.require_text("published_by")?;
    if published_by.len() > 255 {
        return Err(ApiError::Validation(
            "The published_by field may not be greater than 255 characters.".to_string(),
        ));
    }

    let year_published = form.require_text("year_published")?;
    if !is_valid_year(year_published) {
        return Err(ApiError::Validation(
            "The year_published field must be a 4-digit year.".to_string(),
        ));
    }

    let description = form.text("description");
    if description.is_some_and(|d| d.len() > 1000) {
        return Err(ApiError::Validation(
            "The description field may not be greater than 1000 characters.".to_string(),
        ));
    }

    let folder = form.text("folder");
    if folder.is_some_and(|f| f.len() > 255) {
        return Err(ApiError::Validation(
            "The folder field may not be greater than 255 characters.".to_string(),
        ));
    }

    let Some(upload) = &form.file else {
        return Err(ApiError::Validation("No file detected.".to_string()));
    };

    let file_path = paths::upload_path(folder, &upload.filename)?;
    storage.save(&file_path, &upload.bytes)?;

    // Status is forced to active; any status hint in the form is ignored.
    // A failed insert here leaves the stored bytes behind (long-standing
    // behavior of this panel, kept as-is).
    let entry = files::insert_file(
        &pool,
        &NewFile {
            filename: paths::file_stem(&upload.filename).to_string(),
            file_path,
            file_size: upload.bytes.len() as i64,
            file_type: paths::extension(&upload.filename).to_string(),
            uploaded_by: identity.user_id,
            category: category.as_str().to_string(),
            published_by: published_by.to_string(),
            year_published: year_published.to_string(),
            description: description.map(str::to_string),
            status: FileStatus::Active.as_str().to_string(),
        },
    )?;

    audit::insert_access_log(
        &pool,
        &NewAccessLog {
            file_id: entry.file_id,
            accessed_by: identity.user_id,
            action: "Uploaded file - Successful".to_string(),
            access_time: Utc::now().naive_utc(),
        },
    )?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "File uploaded successfully and marked as active!"
    })))
}

/// GET /admin/files
/// Paginated files listing with search, file-type and subfolder filters;
/// carries the versions of the listed files and the current subfolders.
pub async fn list_files(
    pool: web::Data<DbPool>,
    storage: web::Data<FilesStorage>,
    query: web::Query<FileListQuery>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    let filter = FileFilter {
        search: non_empty(query.search),
        file_type_is: non_empty(query.file_type),
        subfolder: non_empty(query.subfolder),
    };
    let page = requested_page(query.page);

    let (rows, total) = files::list_files_page(&pool, &filter, page, ACTIVE_FILES_PER_PAGE)?;

    let ids: Vec<i32> = rows.iter().map(|f| f.file_id).collect();
    let versions = file_versions::list_versions_for_files(&pool, &ids)?;

    let subfolders = storage.list_dirs(STORAGE_ROOT).unwrap_or_default();

    Ok(HttpResponse::Ok().json(json!({
        "files": PaginatedResponse::new(rows, total, page, ACTIVE_FILES_PER_PAGE),
        "file_versions": versions,
        "subfolders": subfolders,
    })))
}

/// GET /admin/files/{id}
/// Single file record, as loaded by the edit form.
pub async fn get_file(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let file = files::find_file(&pool, path.into_inner())?;

    Ok(HttpResponse::Ok().json(file))
}

/// Merged archived listing entry: either a primary file or a version.
#[derive(Serialize)]
#[serde(untagged)]
enum ArchivedEntry {
    Version(FileVersion),
    File(File),
}

impl ArchivedEntry {
    fn updated_at(&self) -> chrono::NaiveDateTime {
        match self {
            ArchivedEntry::Version(v) => v.updated_at,
            ArchivedEntry::File(f) => f.updated_at,
        }
    }
}

/// GET /admin/files/archived
/// Archived files and archived versions merged into one listing, newest
/// update first. Versions carry no category, so that filter narrows files
/// only.
pub async fn list_archived(
    pool: web::Data<DbPool>,
    query: web::Query<ArchivedListQuery>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    let search = non_empty(query.search);
    let file_type = non_empty(query.file_type);
    let category = non_empty(query.category);
    let page = requested_page(query.page);

    let archived_files = files::list_by_status(
        &pool,
        FileStatus::Archived.as_str(),
        search.as_deref(),
        file_type.as_deref(),
        category.as_deref(),
    )?;
    let archived_versions = file_versions::list_by_status(
        &pool,
        FileStatus::Archived.as_str(),
        search.as_deref(),
        file_type.as_deref(),
    )?;

    let mut merged: Vec<ArchivedEntry> = archived_files
        .into_iter()
        .map(ArchivedEntry::File)
        .chain(archived_versions.into_iter().map(ArchivedEntry::Version))
        .collect();
    merged.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));

    Ok(HttpResponse::Ok().json(PaginatedResponse::slice(
        merged,
        page,
        ARCHIVED_FILES_PER_PAGE,
    )))
}

#[derive(Serialize)]
struct TrashedEntry {
    #[serde(flatten)]
    file: File,
    user: User,
}

/// GET /admin/files/trash
/// Trashed files with their uploader, filtered and paginated.
pub async fn list_trash(
    pool: web::Data<DbPool>,
    query: web::Query<TrashListQuery>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    let search = non_empty(query.search);
    let file_type = non_empty(query.file_type);
    let category = non_empty(query.category);
    let page = requested_page(query.page);

    let (rows, total) = files::list_trashed_with_uploader(
        &pool,
        search.as_deref(),
        file_type.as_deref(),
        category.as_deref(),
        page,
        TRASHED_FILES_PER_PAGE,
    )?;

    let data: Vec<TrashedEntry> = rows
        .into_iter()
        .map(|(file, user)| TrashedEntry { file, user })
        .collect();

    Ok(HttpResponse::Ok().json(PaginatedResponse::new(
        data,
        total,
        page,
        TRASHED_FILES_PER_PAGE,
    )))
}

/// PUT /admin/files/{id}
/// Primary-file update. A replacement upload moves the document into
/// uploads/primaryFiles and deletes the old object; a plain metadata edit
/// renames the stored object in place, preserving its extension.
pub async fn update_primary_file(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    storage: web::Data<FilesStorage>,
    path: web::Path<i32>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let form = collect(payload, MAX_REPLACEMENT_BYTES).await?;

    let file = files::find_file(&pool, id)?;

    let filename_input = form.require_text("filename")?;
    if filename_input.len() > 255 {
        return Err(ApiError::Validation(
            "The filename field may not be greater than 255 characters.".to_string(),
        ));
    }

    let category = form.require_text("category")?;
    if category.len() > 50 {
        return Err(ApiError::Validation(
            "The category field may not be greater than 50 characters.".to_string(),
        ));
    }

    let status = form.require_text("status")?;
    let status = FileStatus::parse(status)
        .ok_or_else(|| ApiError::Validation("The selected status is invalid.".to_string()))?;

    let year_published = form.text("year_published");
    if let Some(year) = year_published {
        let current = Utc::now().year();
        let valid = year
            .parse::<i32>()
            .is_ok_and(|y| (1900..=current).contains(&y));
        if !valid {
            return Err(ApiError::Validation(
                "The year_published field must be between 1900 and the current year.".to_string(),
            ));
        }
    }

    let published_by = form.text("published_by");
    let description = form.text("description");

    let (new_path, new_size) = if let Some(upload) = &form.file {
        let replacement = paths::replacement_path(paths::PRIMARY_FILES_DIR, &upload.filename)?;
        storage.save(&replacement, &upload.bytes)?;

        if !file.file_path.is_empty() {
            if let Err(e) = storage.delete(&file.file_path) {
                log::warn!("failed to delete replaced file {}: {}", file.file_path, e);
            }
        }

        (Some(replacement), Some(upload.bytes.len() as i64))
    } else {
        match paths::rename_within(&file.file_path, filename_input) {
            Some(renamed) => {
                storage.rename(&file.file_path, &renamed)?;
                (Some(renamed), None)
            }
            None => (None, None),
        }
    };

    files::update_file(
        &pool,
        id,
        &UpdateFile {
            filename: paths::file_stem(filename_input),
            category,
            published_by,
            year_published,
            description: Some(description),
            status: status.as_str(),
            file_path: new_path.as_deref(),
            file_size: new_size,
            updated_at: Utc::now().naive_utc(),
        },
    )?;

    Ok(redirect_back_success(&req, "File updated successfully!"))
}

/// GET /files/download/{path}
/// Resolves the requested name through the fallback chain and streams it;
/// a miss redirects back with a flash error.
pub async fn download_file(
    req: HttpRequest,
    storage: web::Data<FilesStorage>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let given = path.into_inner();
    paths::ensure_safe_relative(&given)?;

    match storage.resolve_download(&given) {
        Some(relative) => stream_attachment(&storage, &relative).await,
        None => Ok(redirect_back_error(&req, "File not found.")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_must_be_exactly_four_digits() {
        assert!(is_valid_year("2024"));
        assert!(is_valid_year("1999"));
        assert!(!is_valid_year("999"));
        assert!(!is_valid_year("20244"));
        assert!(!is_valid_year("20a4"));
        assert!(!is_valid_year(""));
    }

    #[test]
    fn archived_entries_sort_by_update_time() {
        let base = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();

        let file = File {
            file_id: 1,
            filename: "report".to_string(),
            file_path: "uploads/report.pdf".to_string(),
            file_size: 10,
            file_type: "pdf".to_string(),
            uploaded_by: 1,
            category: "thesis".to_string(),
            published_by: "Registrar".to_string(),
            year_published: "2024".to_string(),
            description: None,
            status: "archived".to_string(),
            created_at: base,
            updated_at: base,
        };
        let version = FileVersion {
            version_id: 9,
            file_id: 1,
            filename: "report-v2".to_string(),
            file_path: "uploads/files/report-v2.pdf".to_string(),
            file_size: 12,
            file_type: "pdf".to_string(),
            status: "archived".to_string(),
            created_at: base,
            updated_at: base + chrono::Duration::hours(1),
        };

        let mut merged = vec![ArchivedEntry::File(file), ArchivedEntry::Version(version)];
        merged.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));

        assert!(matches!(merged[0], ArchivedEntry::Version(_)));
        assert!(matches!(merged[1], ArchivedEntry::File(_)));
    }
}
